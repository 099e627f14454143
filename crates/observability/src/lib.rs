//! Tracing / logging setup shared by every binary.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &LogConfig) {
    tracing::init(config);
}
