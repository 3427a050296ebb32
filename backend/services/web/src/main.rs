mod action;
mod cgi;
mod dispatch;
mod error;
mod params;
mod people;
mod render;
mod reply;
mod server;
mod tree;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use famtree_config::{init_tracing, AppConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let loaded = AppConfig::from_env();
    init_tracing(loaded.as_ref().map_or("info", |c| c.log_level.as_str()));

    let cgi_mode = cgi::is_cgi_invocation();
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            if cgi_mode {
                return cgi::fatal("Configuration Error", "The application is misconfigured.");
            }
            return ExitCode::FAILURE;
        }
    };

    if cgi_mode {
        tracing::debug!(service = "famtree-web", "cgi request");
        cgi::run(&config).await
    } else {
        tracing::info!(service = "famtree-web", "starting development server");
        server::serve(config).await
    }
}
