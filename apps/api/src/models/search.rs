use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::listing::JobListing;

/// A persisted query plus the listings it produced, owned by one user.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub results: Vec<JobListing>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SearchRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl SearchRecordRow {
    pub fn into_record(self, results: Vec<JobListing>) -> SearchRecord {
        SearchRecord {
            id: self.id,
            user_id: self.user_id,
            query: self.query,
            created_at: self.created_at,
            results,
        }
    }
}
