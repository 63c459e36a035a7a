use serde::{Deserialize, Serialize};

/// A single number to call, as read from the uploaded list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTarget {
    /// Unique within one import batch
    pub id: String,

    /// Phone number exactly as written in the file (not validated)
    pub number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Notes shipped with the list, used to seed the notes buffer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
