use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeycodesError {
    #[error("Out of memory growing key name table to {requested} entries")]
    OutOfMemory { requested: usize },

    #[error("Failed to compile keycodes section {section}: {errors} error(s)")]
    Compile { section: String, errors: u32 },

    #[error("Illegal include statement \"{0}\"")]
    IllegalInclude(String),
}

pub type Result<T> = std::result::Result<T, KeycodesError>;
