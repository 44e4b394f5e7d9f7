//! Configuration section definitions.

mod convert;
mod serve;
mod watch;

pub use convert::{ConvertConfig, KATEX_ENV};
pub use serve::ServeConfig;
pub use watch::WatchConfig;
