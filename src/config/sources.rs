//! Configuration sources, added to the builder in precedence order.

pub mod environment;
pub mod project_file;
