pub mod types;
pub mod ast;
pub mod atom;
pub mod context;
pub mod diag;
pub mod keymap;
pub mod resolver;
pub mod keycodes;
pub mod table;

pub use types::*;

// Re-export commonly used types
pub use ast::{IncludeLink, IncludeStmt, Stmt, StmtList, XkbFile, FileType, MapFlags};
pub use context::Context;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use keymap::{Key, KeyAlias, Keymap};
pub use resolver::{IncludeResolver, MemoryResolver};
pub use keycodes::{compile_keycodes, KeyNamesInfo, KeycodesCompiler};
pub use table::{KctLoader, TableError};
