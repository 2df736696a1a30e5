//! Parse tree for XKB source: statements, expressions, include chains and
//! section files. Nodes own their children; dropping a node drops its
//! whole subtree.

pub mod expr;
pub mod stmt;
pub mod keysym;
pub mod include;
pub mod file;
pub mod resolve;

pub use expr::*;
pub use stmt::*;
pub use keysym::*;
pub use include::*;
pub use file::*;
