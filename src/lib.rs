//! MySQL health checks reporting to the local monitoring client
//!
//! Reads connection usage, replication state and uptime from one MySQL
//! server, emits one event per condition to the local client socket and
//! reports the worst condition as the process outcome.

pub mod client;
pub mod config;
pub mod event;
pub mod health;
pub mod runner;
