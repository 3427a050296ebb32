//! One-shot CGI front end: environment and stdin in, headers and body out.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use famtree_common::error::{FamtreeError, FamtreeResult};
use famtree_config::AppConfig;
use famtree_db::family::sqlite_repository::SqliteFamilyRepository;

use crate::dispatch::dispatch;
use crate::params::{is_form_post, QueryParams};
use crate::reply::Reply;

pub fn is_cgi_invocation() -> bool {
    std::env::var_os("GATEWAY_INTERFACE").is_some()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CgiRequest {
    pub method: String,
    pub query: Option<String>,
    pub body: Option<String>,
}

impl CgiRequest {
    /// Build the request from CGI meta-variables and the body stream.
    ///
    /// The body is only read for urlencoded POSTs, and never past
    /// `CONTENT_LENGTH`.
    pub fn from_env<F, R>(lookup: F, body: R) -> FamtreeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
        R: Read,
    {
        let method = lookup("REQUEST_METHOD").unwrap_or_else(|| "GET".to_string());
        let query = lookup("QUERY_STRING");
        let content_type = lookup("CONTENT_TYPE");

        let body = if is_form_post(&method, content_type.as_deref()) {
            let length: u64 = lookup("CONTENT_LENGTH")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            let mut buf = Vec::new();
            body.take(length)
                .read_to_end(&mut buf)
                .map_err(|e| FamtreeError::Internal(format!("reading request body: {e}")))?;
            Some(String::from_utf8_lossy(&buf).into_owned())
        } else {
            None
        };

        Ok(Self {
            method,
            query,
            body,
        })
    }

    pub fn params(&self) -> QueryParams {
        QueryParams::from_request(self.query.as_deref(), self.body.as_deref())
    }
}

/// Write the CGI response: header block, blank line, body.
pub fn write_reply<W: Write>(out: &mut W, reply: Reply) -> io::Result<()> {
    let status = reply.status();
    if !status.is_success() {
        write!(
            out,
            "Status: {} {}\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )?;
    }
    write!(out, "Content-Type: {}\r\n\r\n", reply.content_type())?;
    out.write_all(reply.into_body().as_bytes())?;
    out.flush()
}

fn emit(reply: Reply) -> ExitCode {
    let failed = !reply.status().is_success();
    let stdout = io::stdout();
    if let Err(e) = write_reply(&mut stdout.lock(), reply) {
        tracing::error!(error = %e, "failed to write response");
        return ExitCode::FAILURE;
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub fn fatal(heading: &str, message: &str) -> ExitCode {
    emit(Reply::Fatal {
        heading: heading.to_string(),
        message: message.to_string(),
    })
}

/// Serve exactly one request, then close the store.
pub async fn run(config: &AppConfig) -> ExitCode {
    let request = match CgiRequest::from_env(|key| std::env::var(key).ok(), io::stdin().lock()) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "unreadable request");
            return fatal("Request Error", "Could not read the request.");
        }
    };
    tracing::info!(method = %request.method, query = ?request.query, "cgi request");

    let pool = match famtree_db::open_store(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, url = %config.database_url, "store unavailable");
            return fatal("Database Error", "Could not initialize database.");
        }
    };

    let params = request.params();
    tracing::debug!(param_count = params.len(), "parameters parsed");
    let repo = SqliteFamilyRepository::new(pool.clone());
    let reply = dispatch(&repo, config, &params).await;
    pool.close().await;

    emit(reply)
}
