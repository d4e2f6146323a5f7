pub mod bootstrap;
pub mod config;

pub use bootstrap::{build_facade, init_tracing};
pub use config::AppConfig;
