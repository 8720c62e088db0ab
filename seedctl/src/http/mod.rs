pub mod builds;
pub mod client;
pub mod projects;
pub mod registry;
pub mod reports;
pub mod users;

pub use client::HttpClient;
