pub mod assign;
pub mod config;
pub mod copier;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod expand;
pub mod header;
pub mod index;
pub mod io;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod pipeline;
pub mod symbol;

pub use error::{Result, ToolError};
