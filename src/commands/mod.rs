//! Command handlers for maruadmin
//!
//! Each subcommand of the CLI maps to one handler here.

pub mod history;
pub mod serve;
pub mod settings;

pub use history::handle_history;
pub use serve::run_server;
pub use settings::handle_settings;
