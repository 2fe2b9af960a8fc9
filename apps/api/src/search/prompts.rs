/// Prompt for model-assisted listing extraction from an HTML search-results page.
/// Placeholders: `{query}`, `{html}`.
pub const LISTING_EXTRACTION_PROMPT: &str = r#"You are a job extraction assistant. Given the following HTML from a job board
and a user query, extract the relevant jobs as JSON objects with the fields:
"title", "link", "description", "pubDate", "company", "location", "salary".
Only include jobs that match the query. Use absolute URLs for "link".
Omit fields you cannot find rather than inventing values.

User query: "{query}"

HTML:
{html}

Return only a JSON array of jobs."#;

/// Prompt for deriving a search query from CV text. Placeholder: `{cv_text}`.
pub const CV_QUERY_PROMPT: &str = r#"Given the following CV text, extract a concise job search query that best matches
the candidate's desired positions, skills, or interests. Return only the query string.

CV:
{cv_text}"#;
