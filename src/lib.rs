pub mod admin;
pub mod config;
pub mod content;
pub mod filter_engine;
pub mod load_coordinator;
pub mod logger;
pub mod query_string;
pub mod server;
pub mod site_controller;
pub mod store;
pub mod text_utils;
pub mod util;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_data;
