pub mod graceful_shutdown;
pub mod panic;

pub use graceful_shutdown::{GracefulShutdown, ShutdownReason};
pub use panic::panic_message;
