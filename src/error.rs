use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Setup errors. Anything that goes wrong during a request is carried in
/// [`crate::client::Response::Failure`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "SNUSBASE_API_KEY not set: use --api-key, export it, add it to .env, or set api.key in the config file"
    )]
    MissingApiKey,

    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_mentions_variable() {
        let err = Error::MissingApiKey;
        assert!(err.to_string().contains("SNUSBASE_API_KEY"));
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = Error::Io {
            path: PathBuf::from("/tmp/.env"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/.env"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_toml_error_includes_path() {
        let source = toml::from_str::<toml::Value>("api = [").unwrap_err();
        let err = Error::Toml {
            path: PathBuf::from("config.toml"),
            source,
        };
        assert!(err.to_string().starts_with("Invalid config file config.toml"));
    }
}
