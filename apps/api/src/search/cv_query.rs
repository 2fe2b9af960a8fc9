//! Derives a job-search query from free-form CV text.

use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::{strip_code_fences, CompletionService};
use crate::search::prompts::CV_QUERY_PROMPT;

pub async fn extract_query_from_cv(
    cv_text: &str,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    let prompt = CV_QUERY_PROMPT.replace("{cv_text}", cv_text);
    let answer = llm
        .complete(&prompt, PLAIN_TEXT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("CV query extraction failed: {e}")))?;

    let query = clean_query(&answer);
    if query.is_empty() {
        return Err(AppError::Llm(
            "CV query extraction returned an empty query".to_string(),
        ));
    }
    Ok(query)
}

/// First non-empty line of the answer, without fences or surrounding quotes.
fn clean_query(answer: &str) -> String {
    strip_code_fences(answer)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}
