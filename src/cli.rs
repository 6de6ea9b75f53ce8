//! CLI domain: parse, route, output, and presentation only.
//! No run orchestration here; the route table dispatches to the orchestrator and friends.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_init_preview, format_init_summary, format_run_outcome, format_status_json,
    format_status_text, format_validation_outcome,
};
pub use route::CommandContext;
