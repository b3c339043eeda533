//! Aliasdrift core types: canonical alias records, the flattened
//! declared-configuration view, and error kinds shared by the transforms.

#![forbid(unsafe_code)]

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured filter document attached to an alias (a JSON object).
pub type FilterDoc = serde_json::Map<String, Value>;

/// Canonical, engine-facing alias record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub name: String,
    /// `None` means the alias has no filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterDoc>,
    #[serde(default)]
    pub index_routing: String,
    #[serde(default)]
    pub routing: String,
    #[serde(default)]
    pub search_routing: String,
    #[serde(default)]
    pub is_hidden: bool,
    /// Whether this alias designates its index as the write target.
    #[serde(default)]
    pub is_write_index: bool,
    /// Declared intent: an external rollover may flip `is_write_index`
    /// without it counting as drift.
    #[serde(default)]
    pub allow_rollover: bool,
    /// Derived during reconciliation; never user-settable.
    #[serde(default)]
    pub rollover_detected: bool,
}

/// Unordered alias set keyed by alias name. Iteration order is
/// unspecified; callers must not depend on it.
pub type AliasSet = FxHashMap<String, AliasRecord>;

/// User-facing flattened view written back into declared configuration
/// for display and diffing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredAliasView {
    pub name: String,
    /// Encoded filter document; empty when the alias has no filter.
    pub filter: String,
    pub index_routing: String,
    pub routing: String,
    pub search_routing: String,
    pub is_hidden: bool,
    pub is_write_index: bool,
    pub allow_rollover: bool,
    pub rollover_detected: bool,
}

/// Strongly-typed decode target for a loosely-validated declared entry.
///
/// `name` is required; every other field defaults to unset, matching the
/// declared-configuration schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredAliasEntry {
    pub name: String,
    /// Filter document as its string form; empty means no filter.
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub index_routing: String,
    #[serde(default)]
    pub routing: String,
    #[serde(default)]
    pub search_routing: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_write_index: bool,
    #[serde(default)]
    pub allow_rollover: bool,
    #[serde(default)]
    pub rollover_detected: bool,
}

impl DeclaredAliasEntry {
    /// Decode one untyped configuration record into a typed entry.
    ///
    /// Missing or mistyped fields surface as a single `InvalidEntry`
    /// naming the offending field rather than scattered assertions.
    pub fn from_value(value: Value) -> AliasResult<Self> {
        let entry: Self = serde_json::from_value(value)
            .map_err(|e| AliasError::InvalidEntry { detail: e.to_string() })?;
        if entry.name.is_empty() {
            return Err(AliasError::InvalidEntry {
                detail: "name must be a non-empty string".into(),
            });
        }
        Ok(entry)
    }
}

/// Errors raised by the alias transforms.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("malformed filter for alias {name:?}: {source}")]
    MalformedFilter {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode filter for alias {name:?}: {source}")]
    FilterEncode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate alias name {name:?}")]
    DuplicateName { name: String },
    #[error("invalid alias entry: {detail}")]
    InvalidEntry { detail: String },
}

pub type AliasResult<T> = Result<T, AliasError>;
