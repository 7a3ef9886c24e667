mod app_context;
mod config_warnings;
mod project_root;

pub use app_context::{AppContext, build_engine, session_ttl};
pub use config_warnings::warn_unconfigured;
pub use project_root::resolve_project_root;
