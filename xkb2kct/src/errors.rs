use keycodes_core::{KeycodesError, TableError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KctError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Compile(#[from] KeycodesError),

    #[error("No keycodes section {0} found")]
    NoSection(String),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Binary write error: {0}")]
    BinaryWrite(String),
}

pub type Result<T> = std::result::Result<T, KctError>;
