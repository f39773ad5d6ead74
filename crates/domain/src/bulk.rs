use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::CanonicalDocument;

pub const DEFAULT_BATCH_SIZE: usize = 10_000;

pub const DEFAULT_DOCUMENT_TYPE: &str = "_doc";

/// How written documents get their identity.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Store-assigned ids, written with the `index` op-type.
    #[default]
    Auto,

    /// Caller-assigned ids `1, 2, 3, ...`, written with the `create` op-type.
    Sequential,
}

impl IdPolicy {
    pub fn op_type(&self) -> OpType {
        match self {
            Self::Auto => OpType::Index,
            Self::Sequential => OpType::Create,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Sequential => "sequential",
        }
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown id policy: {}", other)),
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    /// Overwrites an existing document with the same id.
    Index,
    /// Rejects a document whose id already exists.
    Create,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Index => "index",
            OpType::Create => "create",
        }
    }
}

/// One entry of a bulk write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperation {
    pub index: String,
    pub document_type: String,
    pub id: Option<String>,
    pub op_type: OpType,
    pub document: CanonicalDocument,
}

/// Informational outcome of a successful bulk call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub took_ms: u64,
    pub item_errors: bool,
}

/// Ordered group of pending bulk operations with a fixed capacity.
#[derive(Debug)]
pub struct Batch {
    capacity: usize,
    operations: Vec<BulkOperation>,
}

impl Batch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            operations: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, operation: BulkOperation) {
        debug_assert!(!self.is_full());
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.operations.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hands out the pending operations and leaves an empty batch behind.
    pub fn take(&mut self) -> Vec<BulkOperation> {
        std::mem::replace(&mut self.operations, Vec::with_capacity(self.capacity))
    }
}
