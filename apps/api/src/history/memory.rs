//! In-process `HistoryStore` with the same retention and sharing rules as the
//! PostgreSQL store. One mutex guards all state, so every `record` is serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::store::{HistoryStore, MAX_HISTORY_PER_USER};
use crate::models::listing::JobListing;
use crate::models::search::{SearchRecord, SearchRecordRow};
use crate::search::presentation::dedupe_by_link;

#[derive(Default)]
struct State {
    listings: HashMap<Uuid, JobListing>,
    listing_ids_by_link: HashMap<String, Uuid>,
    records: Vec<SearchRecordRow>,
    /// (search id, listing id) in insertion order.
    joins: Vec<(Uuid, Uuid)>,
    last_created_at: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps keep "oldest" well defined.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }

    fn results_for(&self, search_id: Uuid) -> Vec<JobListing> {
        self.joins
            .iter()
            .filter(|(sid, _)| *sid == search_id)
            .filter_map(|(_, lid)| self.listings.get(lid).cloned())
            .collect()
    }
}

#[derive(Default)]
pub struct InMemoryHistoryStore {
    state: Mutex<State>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn listing_count(&self) -> usize {
        self.state.lock().await.listings.len()
    }

    pub async fn join_count(&self, search_id: Uuid) -> usize {
        let state = self.state.lock().await;
        state.joins.iter().filter(|(sid, _)| *sid == search_id).count()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn record(
        &self,
        user_id: Uuid,
        query: &str,
        listings: &[JobListing],
    ) -> Result<SearchRecord, AppError> {
        let mut state = self.state.lock().await;

        let mut owned: Vec<&SearchRecordRow> =
            state.records.iter().filter(|r| r.user_id == user_id).collect();
        owned.sort_by_key(|r| (r.created_at, r.id));
        let overflow = (owned.len() + 1).saturating_sub(MAX_HISTORY_PER_USER);
        let evicted: Vec<Uuid> = owned.iter().take(overflow).map(|r| r.id).collect();

        state.joins.retain(|(sid, _)| !evicted.contains(sid));
        state.records.retain(|r| !evicted.contains(&r.id));

        let record = SearchRecordRow {
            id: Uuid::new_v4(),
            user_id,
            query: query.to_string(),
            created_at: state.next_timestamp(),
        };
        state.records.push(record.clone());

        for listing in dedupe_by_link(listings.to_vec()) {
            let existing = state.listing_ids_by_link.get(&listing.link).copied();
            let listing_id = match existing {
                Some(id) => id,
                None => {
                    let id = Uuid::new_v4();
                    state.listing_ids_by_link.insert(listing.link.clone(), id);
                    state.listings.insert(id, listing);
                    id
                }
            };
            state.joins.push((record.id, listing_id));
        }

        let results = state.results_for(record.id);
        Ok(record.into_record(results))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SearchRecord>, AppError> {
        let state = self.state.lock().await;

        let mut owned: Vec<&SearchRecordRow> =
            state.records.iter().filter(|r| r.user_id == user_id).collect();
        owned.sort_by_key(|r| std::cmp::Reverse((r.created_at, r.id)));

        Ok(owned
            .into_iter()
            .map(|r| r.clone().into_record(state.results_for(r.id)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, link: &str) -> JobListing {
        JobListing {
            title: title.to_string(),
            link: link.to_string(),
            description: "desc".to_string(),
            publication_date: "2024-01-01".to_string(),
            source: "remote.io".to_string(),
            company: None,
            location: None,
            salary: None,
        }
    }

    #[tokio::test]
    async fn test_sixth_record_evicts_oldest() {
        let store = InMemoryHistoryStore::new();
        let user = Uuid::new_v4();

        let mut ids = Vec::new();
        for i in 0..MAX_HISTORY_PER_USER {
            let record = store
                .record(user, &format!("query {i}"), &[listing("Job", &format!("https://x/{i}"))])
                .await
                .unwrap();
            ids.push(record.id);
        }

        store
            .record(user, "query 5", &[listing("Job", "https://x/5")])
            .await
            .unwrap();

        let history = store.list(user).await.unwrap();
        assert_eq!(history.len(), MAX_HISTORY_PER_USER);
        assert!(history.iter().all(|r| r.id != ids[0]));
        assert_eq!(store.join_count(ids[0]).await, 0);
        assert!(history.iter().any(|r| r.id == ids[1]));
    }

    #[tokio::test]
    async fn test_shared_link_is_stored_once_first_write_wins() {
        let store = InMemoryHistoryStore::new();
        let user = Uuid::new_v4();

        let first = store
            .record(user, "rust", &[listing("Original title", "https://x/shared")])
            .await
            .unwrap();
        let second = store
            .record(
                user,
                "rust remote",
                &[
                    listing("Changed title", "https://x/shared"),
                    listing("Other", "https://x/other"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(store.listing_count().await, 2);
        assert_eq!(first.results[0].title, "Original title");
        assert_eq!(second.results[0].title, "Original title");
        assert_eq!(second.results[1].link, "https://x/other");
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped_to_user() {
        let store = InMemoryHistoryStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        for query in ["a", "b", "c"] {
            store.record(user, query, &[]).await.unwrap();
        }
        store.record(other, "someone else", &[]).await.unwrap();

        let history = store.list(user).await.unwrap();
        let queries: Vec<_> = history.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["c", "b", "a"]);
        assert!(history
            .windows(2)
            .all(|pair| pair[0].created_at > pair[1].created_at));
    }

    #[tokio::test]
    async fn test_duplicate_links_within_one_search_join_once() {
        let store = InMemoryHistoryStore::new();
        let user = Uuid::new_v4();

        let record = store
            .record(
                user,
                "rust",
                &[listing("A", "https://x/1"), listing("A again", "https://x/1")],
            )
            .await
            .unwrap();

        assert_eq!(record.results.len(), 1);
        assert_eq!(store.join_count(record.id).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_respect_cap() {
        let store = std::sync::Arc::new(InMemoryHistoryStore::new());
        let user = Uuid::new_v4();

        let writers: Vec<_> = (0..12)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.record(user, &format!("q{i}"), &[]).await.unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        assert_eq!(store.list(user).await.unwrap().len(), MAX_HISTORY_PER_USER);
    }
}
