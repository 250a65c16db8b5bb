use async_trait::async_trait;

use claimdesk_core::{ClaimType, Insurer, InsurerId, PageLimit};
use claimdesk_state::error::StoreError;
use claimdesk_state::store::{InsurerDirectory, InsurerPage};

/// In-memory [`InsurerDirectory`] over a fixed entry list.
///
/// The directory is reference data loaded once at startup; there is no
/// mutation path, so a plain `Vec` is enough.
#[derive(Debug)]
pub struct MemoryInsurerDirectory {
    entries: Vec<Insurer>,
}

impl MemoryInsurerDirectory {
    /// Create a directory over the given entries.
    #[must_use]
    pub fn new(entries: Vec<Insurer>) -> Self {
        Self { entries }
    }

    /// Create a directory seeded with the built-in demo insurers.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            Insurer::new(
                "prov_abc",
                "Acme Insurance",
                vec![ClaimType::Auto, ClaimType::Home, ClaimType::Health],
            ),
            Insurer::new(
                "prov_xyz",
                "Zen Assurance",
                vec![ClaimType::Travel, ClaimType::Other],
            ),
        ])
    }
}

impl Default for MemoryInsurerDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl InsurerDirectory for MemoryInsurerDirectory {
    async fn search(
        &self,
        query: &str,
        limit: PageLimit,
        after: Option<String>,
    ) -> Result<InsurerPage, StoreError> {
        let matching: Vec<Insurer> = self
            .entries
            .iter()
            .filter(|entry| entry.matches(query))
            .cloned()
            .collect();

        let start = match &after {
            Some(after) => matching
                .iter()
                .position(|entry| entry.id.as_str() == after)
                .map_or(matching.len(), |pos| pos + 1),
            None => 0,
        };

        let rest: Vec<Insurer> = matching.into_iter().skip(start).collect();
        let has_more = rest.len() > limit.get();
        let items: Vec<Insurer> = rest.into_iter().take(limit.get()).collect();
        let next_after = if has_more {
            items.last().map(|entry| entry.id.to_string())
        } else {
            None
        };

        Ok(InsurerPage { items, next_after })
    }

    async fn get(&self, id: &InsurerId) -> Result<Insurer, StoreError> {
        self.entries
            .iter()
            .find(|entry| entry.id == *id)
            .cloned()
            .ok_or(StoreError::NotFound("insurer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_matches_name_substring() {
        let dir = MemoryInsurerDirectory::seeded();
        let page = dir
            .search("acme", PageLimit::default(), None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "prov_abc");
    }

    #[tokio::test]
    async fn empty_query_returns_all() {
        let dir = MemoryInsurerDirectory::seeded();
        let page = dir.search("", PageLimit::default(), None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.next_after.is_none());
    }

    #[tokio::test]
    async fn limit_one_pages_through() {
        let dir = MemoryInsurerDirectory::seeded();
        let limit = PageLimit::new(1).unwrap();

        let first = dir.search("", limit, None).await.unwrap();
        assert_eq!(first.items.len(), 1);
        let after = first.next_after.expect("a second page should exist");

        let second = dir.search("", limit, Some(after)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_ne!(second.items[0].id, first.items[0].id);
        assert!(second.next_after.is_none());
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let dir = MemoryInsurerDirectory::seeded();
        let err = dir.get(&InsurerId::from("prov_nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("insurer")));
    }
}
