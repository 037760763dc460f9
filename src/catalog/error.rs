use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("Catalog '{catalog}' has a topic with an empty id")]
    EmptyTopicId { catalog: String },

    #[error("Catalog '{catalog}' defines topic '{id}' more than once")]
    DuplicateTopicId { catalog: String, id: String },

    #[error("Catalog '{catalog}' derives from unknown catalog '{source_key}'")]
    UnknownDeriveSource { catalog: String, source_key: String },

    #[error("Catalog '{catalog}' names unknown parent '{parent}'")]
    UnknownParent { catalog: String, parent: String },

    #[error("Default catalog '{0}' is not defined")]
    UnknownDefault(String),

    #[error("No catalogs loaded")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("Not a topic route: {0} (expected /topics/<category>[/<subcategory>])")]
    NotTopicRoute(String),

    #[error("Too many segments in route: {0}")]
    TooManySegments(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
