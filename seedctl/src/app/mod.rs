pub mod options;
pub mod output;
pub mod state;
