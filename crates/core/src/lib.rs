pub mod config;
pub mod error;
pub mod notification;

pub use config::Config;
pub use error::*;
pub use notification::*;
