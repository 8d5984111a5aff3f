//! Contact sync types.

use serde::{Deserialize, Serialize};

/// One entry of a `contacts.upsert` batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactUpsert {
    /// Contact JID.
    pub id: String,

    /// Address book name.
    #[serde(default)]
    pub name: Option<String>,

    /// Push name.
    #[serde(default)]
    pub notify: Option<String>,
}
