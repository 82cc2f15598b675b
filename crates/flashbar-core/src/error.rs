use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlashbarError {
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid color '{0}': expected rgba(r, g, b, a), rgb(r, g, b) or #RRGGBB[AA]")]
    InvalidColor(String),

    #[error("invalid flash mode '{0}': expected top-bar, indicator, 0 or 1")]
    InvalidMode(String),

    #[error("home directory not found: set HOME or XDG_CONFIG_HOME")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, FlashbarError>;
