pub mod assemble;
pub mod destinations;
pub mod error;
pub mod expand;
pub mod io;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod reshape;

pub use error::{Result, ToolError};
