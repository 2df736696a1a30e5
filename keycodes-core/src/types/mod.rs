pub mod keycode;
pub mod key_name;
pub mod merge;
pub mod errors;

pub use keycode::*;
pub use key_name::*;
pub use merge::*;
pub use errors::*;
