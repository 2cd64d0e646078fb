use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Failed to start {resource}: {source}")]
    StartupFailure {
        resource: String,
        #[source]
        source: ResourceError,
    },

    #[error("Error stopping {resource}: {message}")]
    ShutdownWarning { resource: String, message: String },

    #[error("System error: {message}")]
    System { message: String },
}

impl SiteError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn shutdown_warning<S: Into<String>, M: Into<String>>(resource: S, message: M) -> Self {
        Self::ShutdownWarning {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Name of the resource this error is attributed to, if any
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::StartupFailure { resource, .. } | Self::ShutdownWarning { resource, .. } => {
                Some(resource)
            }
            _ => None,
        }
    }
}

/// Failures reported by the collaborators behind each resource
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Bot error: {message}")]
    Bot { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Listener error: {message}")]
    Listener { message: String },
}

impl ResourceError {
    pub fn bot<S: Into<String>>(message: S) -> Self {
        Self::Bot {
            message: message.into(),
        }
    }

    pub fn listener<S: Into<String>>(message: S) -> Self {
        Self::Listener {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
