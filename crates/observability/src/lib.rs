//! Logging setup shared by the resource-hub binaries.

/// Subscriber configuration (filter, output format).
pub mod tracing;

pub use crate::tracing::{ENV_LOG_FORMAT, LogFormat};

/// Initialize process-wide logging at `info`, in the format named by
/// `RESOURCE_HUB_LOG_FORMAT` (JSON when unset).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info", LogFormat::from_env());
}
