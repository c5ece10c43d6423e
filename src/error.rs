use thiserror::Error;

/// Everything the bridge can fail with. Collaborators (artifact resolution,
/// task tracking) report through `Bridge`, since their failures are opaque
/// to us.
#[derive(Error, Debug)]
pub enum JavaError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing dependency: {0}")]
    MissingDependency(String),

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    #[error("the JVM has already been started and cannot be started again in this process")]
    UnsupportedOperation,

    #[error(transparent)]
    Bridge(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JavaError>;
