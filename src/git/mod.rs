pub mod log;

pub use log::{LogSource, GIT_LOG_ARGS};
