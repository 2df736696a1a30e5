//! Compiled keycodes table (KCT): a little-endian snapshot of an installed
//! [`Keymap`](crate::keymap::Keymap).
//!
//! ```text
//! header      magic "XKBK", major u8, minor u8, min u32, max u32,
//!             key count u32, alias count u16, indicator count u8, flags u8
//! name        u16 byte length + UTF-8 (present when FLAG_SECTION_NAME is set)
//! keys        keycode u32 + 4 name bytes, ascending keycode
//! aliases     4 alias bytes + 4 real bytes
//! indicators  index u8 (1-based) + u16 byte length + UTF-8
//! ```

pub mod error;
pub mod loader;

pub use error::{Result, TableError};
pub use loader::KctLoader;

pub const MAGIC: &[u8; 4] = b"XKBK";
pub const MAJOR_VERSION: u8 = 1;
pub const MINOR_VERSION: u8 = 0;
pub const HEADER_SIZE: usize = 22;

/// Header flag: the section asked for computed key names
pub const FLAG_AUTO_KEY_NAMES: u8 = 0x01;

/// Header flag: the section name field holds a name, possibly empty
pub const FLAG_SECTION_NAME: u8 = 0x02;
