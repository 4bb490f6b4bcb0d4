pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod structure;
pub mod utils;
