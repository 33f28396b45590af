pub mod api;
pub use api::Client;

mod config;
pub use config::*;

mod error;
pub use error::{Error, Result};

pub mod dashboard;
pub mod logger;
pub mod rank;
pub mod view;
