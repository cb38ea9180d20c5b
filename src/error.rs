use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaferError {
    /// The snapshot page reported RECORD NOT FOUND or RECORD INACTIVE.
    #[error("company not found")]
    CompanyNotFound,

    #[error("{status} response from SAFER")]
    Status { status: StatusCode },

    #[error("request to SAFER failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid SAFER endpoint {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl SaferError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CompanyNotFound)
    }

    /// Everything that went wrong on the way to or from SAFER, as opposed to an
    /// answer saying the company does not exist.
    pub fn is_transport(&self) -> bool {
        !self.is_not_found()
    }
}

pub type Result<T> = std::result::Result<T, SaferError>;
