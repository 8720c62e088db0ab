//! Wire models for the SEED backend REST API.

pub mod models;
