use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single job posting. Identity is `link`: two listings with the same link are the same job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub link: String,
    /// May contain markup.
    #[serde(default)]
    pub description: String,
    /// Source-provided, not normalised.
    #[serde(rename = "pubDate", alias = "publication_date", default)]
    pub publication_date: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobListingRow {
    pub id: Uuid,
    pub link: String,
    pub title: String,
    pub description: String,
    pub pub_date: String,
    pub source: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobListingRow> for JobListing {
    fn from(row: JobListingRow) -> Self {
        Self {
            title: row.title,
            link: row.link,
            description: row.description,
            publication_date: row.pub_date,
            source: row.source,
            company: row.company,
            location: row.location,
            salary: row.salary,
        }
    }
}
