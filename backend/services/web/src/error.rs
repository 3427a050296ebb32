use axum::http::StatusCode;
use famtree_common::error::FamtreeError;

use crate::render::escape::escape_html;
use crate::reply::{Page, Reply};

/// A handler failure on its way to becoming a page.
pub struct PageError(pub FamtreeError);

impl From<FamtreeError> for PageError {
    fn from(err: FamtreeError) -> Self {
        Self(err)
    }
}

impl PageError {
    pub fn into_reply(self) -> Reply {
        match &self.0 {
            FamtreeError::NotFound(what) => {
                tracing::debug!(%what, "not found");
                Reply::message("Person not found.")
            }
            FamtreeError::Validation(msg) => Reply::message(&escape_html(msg)),
            other => {
                if other.is_storage() {
                    tracing::error!(error = %other, "storage failure");
                } else {
                    tracing::warn!(error = %other, "request failed");
                }
                Reply::Html(
                    Page::new("<p>An internal error occurred.</p>\n".to_string())
                        .with_status(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
        }
    }
}
