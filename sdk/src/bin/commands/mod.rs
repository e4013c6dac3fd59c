// CLI command implementations

pub mod config;
pub mod pools;
pub mod positions;
pub mod swap;
pub mod utils;
pub mod watch;
