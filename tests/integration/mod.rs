//! Integration tests for the reelflow pipeline

mod cli_binary;
mod contract_violation;
mod end_to_end;
mod qc_gate;
mod resume_rules;
mod test_utils;

pub use test_utils::{ScriptedProvider, Studio};
