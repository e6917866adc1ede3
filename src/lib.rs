//! quorum-merge - merge a pull request once a majority of reviewers approve
//!
//! The library holds the approval state machine and the GitHub gateway it
//! talks through. The `quorum-merge` binary wires them to a CI job.

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod monitor;
pub mod platform;
pub mod types;
