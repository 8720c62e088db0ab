//! seedctl library
//!
//! Client-side state and API plumbing for the SEED deployment platform.

pub mod app;
pub mod authn;
pub mod cli;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod stores;
pub mod utils;
pub mod wizard;
pub mod workers;
