pub mod layout;
pub mod persisted;
pub mod settings;
