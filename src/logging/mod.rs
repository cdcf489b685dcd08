//! Console logging for the CLI.

mod subscriber;

pub use subscriber::init_subscriber;
