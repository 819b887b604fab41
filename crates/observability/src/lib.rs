//! Process-wide logging setup.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Install the global subscriber, reading `RUST_LOG` and `LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
