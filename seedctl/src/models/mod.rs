//! Client-side models that are not plain wire DTOs

pub mod status;

pub use status::{ServerStatus, StatusCategory, StatusInfo, StatusReport};
