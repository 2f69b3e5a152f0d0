//! Command result model
//!
//! Every CLI command maps its outcome to one or more records before
//! rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The operation a record reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Get,
    Set,
    Has,
    Remove,
    Flush,
    Info,
    List,
}

/// Outcome of a single cache operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub op: Op,

    /// Logical key as given by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Key after version suffixing, as stored on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_key: Option<String>,

    /// Soft success flag
    pub ok: bool,

    /// Payload; `null` is a real value, absence means nothing was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Record {
    pub fn new(op: Op, ok: bool) -> Self {
        Self {
            op,
            key: None,
            physical_key: None,
            ok,
            value: None,
        }
    }

    pub fn with_key(mut self, key: &str, physical_key: String) -> Self {
        self.key = Some(key.to_string());
        self.physical_key = Some(physical_key);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}
