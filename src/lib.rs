pub mod cli;
pub mod client;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod probe;
pub mod session;
pub mod template;

pub use error::{ConsoleError, Result, ValidationError};
