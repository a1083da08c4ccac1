pub mod bot;
pub mod config;
pub mod error;
pub mod mention;
pub mod relay;
pub mod types;
pub mod webhook;

pub use bot::run;
