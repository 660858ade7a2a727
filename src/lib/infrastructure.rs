//! Adapters to the outside world

pub mod config;
pub mod email;
pub mod http;
