//! Caddyfile Language Server
//!
//! LSP server for Caddyfiles, providing:
//! - Diagnostics (parse errors, unknown or misplaced directives, placeholders)
//! - Completions (directive, subdirective and snippet names)
//! - Hover documentation for directives

mod completion;
mod config;
mod diagnostics;
mod docs;
mod document;
mod hover;
mod server;

pub use config::{LoadConfigError, UserConfig, config_path, load_config, load_config_from};
pub use document::DocumentStore;
pub use server::{CaddyLanguageServer, init_logging, run};
pub use diagnostics::compute_diagnostics;
