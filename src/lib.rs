pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod output;

pub use client::{ClientOptions, LookupRequest, Response, SnusbaseClient};
pub use config::{ApiKey, Config};
pub use error::{Error, Result};
