//! NDJSON payload for the `_bulk` endpoint.
//!
//! ```text
//! {"index":{"_index":"sonar"}}
//! {"name":"a.com","type":"a","address":"1.2.3.4"}
//! {"create":{"_index":"sonar","_id":"2"}}
//! {"name":"b.com","type":"mx","priority":10,"value":"mail.b.com"}
//! ```

use serde::{Deserialize, Serialize};
use sonar_ingest_domain::{BulkOperation, BulkSummary, OpType};

#[derive(Serialize)]
struct ActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    document_type: Option<&'a str>,

    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Action<'a> {
    Index(ActionMeta<'a>),
    Create(ActionMeta<'a>),
}

/// Renders action and source lines for every operation, with the trailing
/// newline the endpoint requires.
pub fn render_bulk_body(
    operations: &[BulkOperation],
    include_document_type: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    let mut body = Vec::with_capacity(operations.len() * 160);

    for op in operations {
        let meta = ActionMeta {
            index: &op.index,
            document_type: include_document_type.then_some(op.document_type.as_str()),
            id: op.id.as_deref(),
        };
        let action = match op.op_type {
            OpType::Index => Action::Index(meta),
            OpType::Create => Action::Create(meta),
        };

        serde_json::to_writer(&mut body, &action)?;
        body.push(b'\n');
        serde_json::to_writer(&mut body, &op.document)?;
        body.push(b'\n');
    }

    Ok(body)
}

#[derive(Debug, Default, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    took: u64,

    #[serde(default)]
    errors: bool,
}

/// Reads `took` and `errors` from a bulk response; anything unreadable is
/// reported as an empty summary.
pub fn parse_bulk_summary(body: &[u8]) -> BulkSummary {
    let response: BulkResponse = serde_json::from_slice(body).unwrap_or_default();
    BulkSummary {
        took_ms: response.took,
        item_errors: response.errors,
    }
}
