//! Integration tests for the seedctl library

mod test_http;
mod test_poller;
mod test_stores;
mod test_wizard;
