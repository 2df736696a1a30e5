use std::fmt;

/// Number of characters in a key name
pub const KEY_NAME_LENGTH: usize = 4;

/// A 4-character key name packed into one integer.
///
/// The first character lives in bits 24-31, the fourth in bits 0-7. Names
/// shorter than four characters are NUL-padded on the right. The zero value
/// is reserved and means "no name".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyName(u32);

impl KeyName {
    pub const NONE: KeyName = KeyName(0);

    pub fn from_packed(value: u32) -> Self {
        KeyName(value)
    }

    pub fn from_bytes(bytes: [u8; KEY_NAME_LENGTH]) -> Self {
        KeyName(u32::from_be_bytes(bytes))
    }

    /// Packs the first four bytes of `text`; anything longer is cut off
    pub fn new(text: &str) -> Self {
        let mut bytes = [0u8; KEY_NAME_LENGTH];
        for (slot, byte) in bytes.iter_mut().zip(text.bytes()) {
            *slot = byte;
        }
        Self::from_bytes(bytes)
    }

    pub fn packed(self) -> u32 {
        self.0
    }

    pub fn to_bytes(self) -> [u8; KEY_NAME_LENGTH] {
        self.0.to_be_bytes()
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The name without its NUL padding
    pub fn text(self) -> String {
        self.to_bytes()
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }
}

impl From<&str> for KeyName {
    fn from(text: &str) -> Self {
        KeyName::new(text)
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.text())
    }
}
