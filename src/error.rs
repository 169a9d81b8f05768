use thiserror::Error;

pub type AttendanceResult<T> = Result<T, AttendanceError>;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by an `AttendanceStore` backend
    #[error("Store error: {0}")]
    Store(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset parsing error: {0}")]
    Dataset(#[from] serde_yaml::Error),
}

impl AttendanceError {
    /// HTTP status code reported to API clients for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AttendanceError::BadRequest(_) => 400,
            AttendanceError::NotFound(_) => 404,
            AttendanceError::Store(_)
            | AttendanceError::Export(_)
            | AttendanceError::Io(_)
            | AttendanceError::Dataset(_) => 500,
        }
    }
}
