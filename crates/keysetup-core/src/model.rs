//! Records returned by the remote query API

use serde::{Deserialize, Serialize};

/// Field type value the remote system uses for computed fields
pub const FORMULA_TYPE: &str = "Formula";

/// An app as listed by the apps endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteApp {
    pub id: i64,
    pub name: String,
}

impl RemoteApp {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A field as listed by the fields-by-app endpoint
///
/// `field_type` is passed through as the server sends it; only
/// [`FORMULA_TYPE`] carries meaning here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteField {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl RemoteField {
    pub fn new(id: i64, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    /// Whether the server computes this field's value
    pub fn is_formula(&self) -> bool {
        self.field_type == FORMULA_TYPE
    }
}
