use thiserror::Error;

use crate::catalog::{CatalogError, RouteError};
use crate::io::ResultCode;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeckError {
    /// Result code reported in the JSON envelope.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Catalog(_) => ResultCode::CatalogError,
            Self::Route(_) => ResultCode::InvalidRoute,
            Self::Config(_) => ResultCode::ConfigError,
            Self::Io(_) | Self::Serialization(_) => ResultCode::InternalError,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Route(_) => Some("Use a bare key like 'react' or a path like /topics/databases/sql"),
            Self::Catalog(CatalogError::UnknownDefault(_)) => {
                Some("Set catalogs.default_key to one of the keys listed by 'topicdeck catalogs'")
            }
            Self::Config(_) => Some("Run 'topicdeck init --force' to regenerate the settings file"),
            _ => None,
        }
    }
}

pub type DeckResult<T> = Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions_pick_result_code() {
        let err: DeckError = RouteError::NotTopicRoute("/blog".to_string()).into();
        assert_eq!(err.result_code(), ResultCode::InvalidRoute);
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("/blog"));

        let err: DeckError = CatalogError::Empty.into();
        assert_eq!(err.result_code(), ResultCode::CatalogError);
        assert_eq!(err.to_string(), "No catalogs loaded");
        assert!(err.hint().is_none());
    }
}
