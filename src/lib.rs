//! reelflow: Staged Short-Video Content Pipeline
//!
//! Runs a fixed sequence of agent stages (trend scan through quality review), each producing
//! one contract-checked markdown artifact in a per-run directory. A run halts at the QC gate
//! or waits for a human curator decision, and resumes into distribution once approved. Every
//! invocation is recorded in an append-only YAML manifest with input and output digests.

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod gate;
pub mod hasher;
pub mod init;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod project;
pub mod provider;
pub mod stage;
