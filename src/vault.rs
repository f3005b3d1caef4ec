//! Vault model.

use crate::item::compare_names;
use serde::{Deserialize, Serialize};

/// A named collection of items, addressed through its share id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    /// Display name, also used to scope `item list`
    pub name: String,
    /// Vault identifier
    pub vault_id: String,
    /// Share identifier
    pub share_id: String,
}

impl Vault {
    /// Creates a vault value.
    pub fn new(
        name: impl Into<String>,
        vault_id: impl Into<String>,
        share_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vault_id: vault_id.into(),
            share_id: share_id.into(),
        }
    }
}

/// Sorts vaults by name.
pub fn sort_vaults(vaults: &mut [Vault]) {
    vaults.sort_by(|a, b| compare_names(&a.name, &b.name));
}
