/// Physical key identifier
pub type Keycode = u32;

/// Identifier handed out per parsed file, used as definition provenance
pub type FileId = u32;

/// Highest keycode a keycodes section may bind or declare as a bound
pub const KEYCODE_MAX: Keycode = 0xffff;

/// Number of indicator (LED) slots; indicator indices are 1-based
pub const NUM_INDICATORS: usize = 32;
