//! HTTP adapters for the interview server
//!
//! Both endpoints live on the same server: `GET /get_question` and `POST /upload`.

mod analysis;
mod questions;

pub use analysis::HttpAnalysisBackend;
pub use questions::HttpQuestionSource;

/// Join a server base URL and an endpoint path
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
