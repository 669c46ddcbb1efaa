//! Library side of the `hapi-convert` command line tool.

pub mod logging;
pub mod pipeline;
pub mod types;
