// This makes it easy to import the logging stuff

#![allow(unused_imports)]
pub use crate::critical;
pub use crate::debug;
pub use crate::error;
pub use crate::log_internal;
pub use crate::profiling;
pub use crate::verbose;
pub use crate::logging::LogLevel;
