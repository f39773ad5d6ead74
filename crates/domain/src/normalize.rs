//! Mapping of raw passive-DNS observations onto the canonical document schema.
//!
//! Dispatch is an exact match on the lowercase record type tag. Rules apply in
//! this order: skip list, address types, pass-through types, `mx`, the
//! `unk_in_` namespace, then everything else.

use std::collections::HashSet;
use std::fmt;

use crate::record::{non_empty, CanonicalDocument, RawRecord};

/// Types whose payloads are binary or structured and do not fit a flat keyword schema.
pub const DEFAULT_SKIP_TYPES: &[&str] = &[
    "hinfo",
    "rsig",
    "rrsig",
    "ds",
    "cds",
    "caa",
    "wks",
    "dnskey",
    "cdnskey",
    "spf",
    "tlsa",
    "nsec3param",
    "sshfp",
    "any",
];

pub const ADDRESS_TYPES: &[&str] = &["a", "aaaa"];

pub const PASS_THROUGH_TYPES: &[&str] = &["ns", "ptr", "soa", "cname", "srv", "txt"];

pub const PRIORITY_TYPE: &str = "mx";

pub const UNKNOWN_TYPE_PREFIX: &str = "unk_in_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    Skipped,
    Address,
    PassThrough,
    Priority,
    Namespaced,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    Skipped,
    UnknownNamespaced,
    Unrecognized(String),
    MalformedPriority(String),
    EmptyPayload,
}

impl DropReason {
    /// Whether the drop deserves an operator-facing diagnostic.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            DropReason::Unrecognized(_) | DropReason::MalformedPriority(_)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Skipped => "skipped",
            DropReason::UnknownNamespaced => "namespaced",
            DropReason::Unrecognized(_) => "unrecognized",
            DropReason::MalformedPriority(_) => "malformed",
            DropReason::EmptyPayload => "empty",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Unrecognized(t) => write!(f, "unrecognized record type {}", t),
            DropReason::MalformedPriority(detail) => write!(f, "mx: {}", detail),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Keep(CanonicalDocument),
    Drop(DropReason),
}

/// Immutable rule set, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct NormalizationRules {
    skip_types: HashSet<String>,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self::with_skip_types(DEFAULT_SKIP_TYPES.iter().copied())
    }
}

impl NormalizationRules {
    pub fn with_skip_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip_types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_skipped(&self, record_type: &str) -> bool {
        self.skip_types.contains(record_type)
    }

    pub fn classify(&self, record_type: &str) -> RecordClass {
        if self.is_skipped(record_type) {
            RecordClass::Skipped
        } else if ADDRESS_TYPES.contains(&record_type) {
            RecordClass::Address
        } else if PASS_THROUGH_TYPES.contains(&record_type) {
            RecordClass::PassThrough
        } else if record_type == PRIORITY_TYPE {
            RecordClass::Priority
        } else if record_type.starts_with(UNKNOWN_TYPE_PREFIX) {
            RecordClass::Namespaced
        } else {
            RecordClass::Unrecognized
        }
    }

    pub fn normalize(&self, raw: &RawRecord) -> Normalized {
        let mut doc = CanonicalDocument::from_raw(raw);

        match self.classify(&raw.record_type) {
            RecordClass::Skipped => return Normalized::Drop(DropReason::Skipped),
            RecordClass::Namespaced => return Normalized::Drop(DropReason::UnknownNamespaced),
            RecordClass::Unrecognized => {
                return Normalized::Drop(DropReason::Unrecognized(raw.record_type.clone()))
            }
            RecordClass::Address => {
                doc.address = doc.value.take();
            }
            RecordClass::PassThrough => {}
            RecordClass::Priority => match parse_priority(&raw.value) {
                Ok((priority, target)) => {
                    doc.priority = Some(priority);
                    doc.value = non_empty(target);
                }
                Err(detail) => return Normalized::Drop(DropReason::MalformedPriority(detail)),
            },
        }

        if !doc.has_payload() {
            return Normalized::Drop(DropReason::EmptyPayload);
        }

        Normalized::Keep(doc)
    }
}

/// Splits `"<priority> <target>"` into its two tokens.
fn parse_priority(value: &str) -> Result<(i16, &str), String> {
    let mut tokens = value.split(' ');
    let first = tokens.next().unwrap_or_default();
    let priority = first
        .parse::<i16>()
        .map_err(|e| format!("parse priority {:?}: {}", first, e))?;
    let target = tokens
        .next()
        .ok_or_else(|| format!("missing target in {:?}", value))?;
    Ok((priority, target))
}
