use serde::{Deserialize, Serialize};

use crate::claim::ClaimType;
use crate::types::InsurerId;

/// An insurance provider directory entry.
///
/// Directory entries are shared reference data, not caller-owned records;
/// search is the only read path exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Insurer {
    /// Directory identifier.
    pub id: InsurerId,
    /// Display name.
    pub name: String,
    /// Claim types this insurer accepts.
    pub claim_types: Vec<ClaimType>,
}

impl Insurer {
    #[must_use]
    pub fn new(
        id: impl Into<InsurerId>,
        name: impl Into<String>,
        claim_types: Vec<ClaimType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            claim_types,
        }
    }

    /// Case-insensitive match against the entry's name or id.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.id.as_str().contains(&q)
    }
}
