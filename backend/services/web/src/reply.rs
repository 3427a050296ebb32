use axum::http::StatusCode;

pub const SITE_TITLE: &str = "Family Tree";

/// One rendered HTML page: the content region plus what the layout needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub content: String,
    pub status: StatusCode,
}

impl Page {
    pub fn new(content: String) -> Self {
        Self {
            title: SITE_TITLE.to_string(),
            content,
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// The outcome of one dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Html(Page),
    Json(serde_json::Value),
    /// The request could not be served at all; rendered without the layout.
    Fatal { heading: String, message: String },
}

impl Reply {
    pub fn page(content: String) -> Self {
        Self::Html(Page::new(content))
    }

    /// Single-paragraph page. `text` is inserted verbatim.
    pub fn message(text: &str) -> Self {
        Self::page(format!("<p>{text}</p>\n"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Html(page) => page.status,
            Self::Json(_) => StatusCode::OK,
            Self::Fatal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Html(_) | Self::Fatal { .. } => "text/html; charset=UTF-8",
        }
    }

    /// Full response body.
    pub fn into_body(self) -> String {
        match self {
            Self::Html(page) => crate::render::layout::render_document(&page),
            Self::Json(value) => value.to_string(),
            Self::Fatal { heading, message } => {
                crate::render::layout::render_fatal(&heading, &message)
            }
        }
    }
}
