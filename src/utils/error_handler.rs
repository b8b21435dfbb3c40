use std::fmt::{Display, Formatter, Result as FmtResult};

/// Failures that end a reminder run before it completes.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    UploadQuery(anyhow::Error),
    AnyError(anyhow::Error),
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self::AnyError(err.into())
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::UploadQuery(err) => write!(f, "Upload lookup failed: {err:#}"),
            Self::AnyError(err) => write!(f, "Something went wrong: {err:#}"),
        }
    }
}
