mod client;
pub use client::{decode, Client};

mod de;

mod model;
pub use model::*;

pub use crate::error::{Error, Result};
