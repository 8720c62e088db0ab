//! Client-side state containers, each owning one file

pub mod projects;
pub mod theme;
pub mod user;
pub mod wizard;
