//! Environment-driven settings and logging setup shared by both front ends.

pub mod env;
pub mod tracing_init;

pub use env::{AppConfig, DEFAULT_DATABASE_URL};
pub use tracing_init::init_tracing;
