use std::fmt;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failures surfaced by the catalog client, store, and controller.
#[derive(Debug)]
pub enum CatalogError {
    /// Transport failure: connection refused, DNS, timeout.
    Network(reqwest::Error),
    /// The service answered with a non-2xx status, or a 2xx body that
    /// did not parse as the expected payload.
    Server { status: u16 },
    /// A store operation referenced an id that is not in the collection.
    NotFound { id: String },
    /// A draft failed field validation; no remote call was issued.
    Validation(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(err) => write!(f, "network error: {}", err),
            CatalogError::Server { status } => write!(f, "server returned status {}", status),
            CatalogError::NotFound { id } => write!(f, "no book with id {}", id),
            CatalogError::Validation(message) => write!(f, "invalid book: {}", message),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err)
    }
}
