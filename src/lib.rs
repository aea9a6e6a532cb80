pub mod config;
pub mod error;
pub mod keyboard;
pub mod messages;
pub mod mux;
pub mod node;
pub mod translator;
