use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Invalid magic code: expected 'XKBK', got {0:?}")]
    InvalidMagicCode([u8; 4]),

    #[error("Unsupported version: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("File too small: {0} bytes")]
    FileTooSmall(usize),

    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    #[error("Keycode {keycode} outside table range {min}-{max}")]
    KeycodeOutOfRange { keycode: u32, min: u32, max: u32 },

    #[error("Invalid indicator index {0}")]
    InvalidIndicator(u8),

    #[error("Table too large: {0} entries")]
    TooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
