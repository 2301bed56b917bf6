//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod jsonl_run_log;
#[cfg(feature = "web")]
pub mod web;
