//! History Store: per-user search history, capped at `MAX_HISTORY_PER_USER` records.
//!
//! The cap is enforced at write time. Eviction and insertion for one user happen inside a
//! single transaction that holds a row lock on the owning user, so concurrent writers for
//! the same user are serialized and cannot jointly exceed the cap.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::listing::{JobListing, JobListingRow};
use crate::models::search::{SearchRecord, SearchRecordRow};
use crate::search::presentation::dedupe_by_link;

pub const MAX_HISTORY_PER_USER: usize = 5;

/// Carried in `AppState` as `Arc<dyn HistoryStore>`.
/// Callers must pass an already-verified user id; the store does no authentication.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists `query` and its listings as a new record, evicting the user's oldest
    /// records first if the cap would otherwise be exceeded. Listings are shared across
    /// records by link; an existing listing keeps the fields it was first stored with.
    async fn record(
        &self,
        user_id: Uuid,
        query: &str,
        listings: &[JobListing],
    ) -> Result<SearchRecord, AppError>;

    /// The user's records, newest first, each with its listings in original order.
    async fn list(&self, user_id: Uuid) -> Result<Vec<SearchRecord>, AppError>;
}

pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SearchResultRow {
    search_id: Uuid,
    #[sqlx(flatten)]
    listing: JobListingRow,
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn record(
        &self,
        user_id: Uuid,
        query: &str,
        listings: &[JobListing],
    ) -> Result<SearchRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the owner serializes concurrent writers for this user.
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owner.is_none() {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM search_records WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let overflow = existing - (MAX_HISTORY_PER_USER as i64 - 1);
        if overflow > 0 {
            let evicted: Vec<Uuid> = sqlx::query_scalar(
                r#"
                SELECT id FROM search_records
                WHERE user_id = $1
                ORDER BY created_at ASC, id ASC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(overflow)
            .fetch_all(&mut *tx)
            .await?;

            // Children before parents: no cascading delete at the storage layer.
            sqlx::query("DELETE FROM search_results WHERE search_id = ANY($1)")
                .bind(&evicted)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM search_records WHERE id = ANY($1)")
                .bind(&evicted)
                .execute(&mut *tx)
                .await?;

            info!("Evicted {} oldest search records for user {user_id}", evicted.len());
        }

        let record = sqlx::query_as::<_, SearchRecordRow>(
            r#"
            INSERT INTO search_records (id, user_id, query)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, query, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(query)
        .fetch_one(&mut *tx)
        .await?;

        let unique = dedupe_by_link(listings.to_vec());
        let mut results = Vec::with_capacity(unique.len());
        for (position, listing) in unique.iter().enumerate() {
            let stored = upsert_listing(&mut *tx, listing).await?;

            sqlx::query(
                "INSERT INTO search_results (search_id, listing_id, position) VALUES ($1, $2, $3)",
            )
            .bind(record.id)
            .bind(stored.id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            results.push(JobListing::from(stored));
        }

        tx.commit().await?;

        info!(
            "Recorded search {} for user {user_id} with {} listings",
            record.id,
            results.len()
        );

        Ok(record.into_record(results))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SearchRecord>, AppError> {
        let records = sqlx::query_as::<_, SearchRecordRow>(
            r#"
            SELECT id, user_id, query, created_at
            FROM search_records
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let rows = sqlx::query_as::<_, SearchResultRow>(
            r#"
            SELECT sr.search_id, jl.*
            FROM search_results sr
            JOIN job_listings jl ON jl.id = sr.listing_id
            WHERE sr.search_id = ANY($1)
            ORDER BY sr.search_id, sr.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_search: HashMap<Uuid, Vec<JobListing>> = HashMap::new();
        for row in rows {
            by_search
                .entry(row.search_id)
                .or_default()
                .push(row.listing.into());
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let results = by_search.remove(&record.id).unwrap_or_default();
                record.into_record(results)
            })
            .collect())
    }
}

/// Inserts the listing if its link is new; otherwise returns the stored row untouched.
async fn upsert_listing(
    conn: &mut PgConnection,
    listing: &JobListing,
) -> Result<JobListingRow, sqlx::Error> {
    let inserted = sqlx::query_as::<_, JobListingRow>(
        r#"
        INSERT INTO job_listings
            (id, link, title, description, pub_date, source, company, location, salary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (link) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&listing.link)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(&listing.publication_date)
    .bind(&listing.source)
    .bind(&listing.company)
    .bind(&listing.location)
    .bind(&listing.salary)
    .fetch_optional(&mut *conn)
    .await?;

    match inserted {
        Some(row) => Ok(row),
        None => {
            sqlx::query_as::<_, JobListingRow>("SELECT * FROM job_listings WHERE link = $1")
                .bind(&listing.link)
                .fetch_one(&mut *conn)
                .await
        }
    }
}
