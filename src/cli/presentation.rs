//! CLI presentation: text and json formatters per command family.

mod init;
mod run;
mod status;

pub use init::{format_init_preview, format_init_summary};
pub use run::{format_run_outcome, format_validation_outcome};
pub use status::{format_status_json, format_status_text};
