//! The `logger` module is a simple utility that requires manual verification.
//! See `bin/settings_demo.rs` for a test binary demonstrating bootstrap and
//! filter reload.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
