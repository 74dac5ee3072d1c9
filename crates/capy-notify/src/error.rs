//! Error types for capy-notify

/// Errors reported by notification hosts and collaborators.
///
/// The pipeline components never hand these back to the host callback; they
/// are logged and dropped where they occur.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Channel registration not supported by host")]
    Unsupported,

    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Token forward failed: {0}")]
    Forward(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
