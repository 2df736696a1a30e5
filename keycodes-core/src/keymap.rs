use crate::types::{KeyName, Keycode, NUM_INDICATORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Key {
    pub name: KeyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAlias {
    pub alias: KeyName,
    pub real: KeyName,
}

/// Keymap state the compiled keycodes section is installed into
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    pub min_key_code: Keycode,
    pub max_key_code: Keycode,
    /// Indexed by keycode, `max_key_code + 1` entries
    pub keys: Vec<Key>,
    pub keycodes_section_name: Option<String>,
    /// Indexed by indicator index - 1
    pub indicator_names: [Option<String>; NUM_INDICATORS],
    pub key_aliases: Vec<KeyAlias>,
    /// Set by the "computed" pseudo-include
    pub auto_key_names: bool,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            min_key_code: 0,
            max_key_code: 0,
            keys: Vec::new(),
            keycodes_section_name: None,
            indicator_names: std::array::from_fn(|_| None),
            key_aliases: Vec::new(),
            auto_key_names: false,
        }
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self, keycode: Keycode) -> Option<&Key> {
        self.keys.get(keycode as usize)
    }

    /// Name bound to `keycode`, if any
    pub fn key_name(&self, keycode: Keycode) -> Option<KeyName> {
        self.key(keycode).map(|k| k.name).filter(|n| !n.is_none())
    }

    /// Keycode whose real name is `name`; aliases are not consulted
    pub fn find_named_key(&self, name: KeyName) -> Option<Keycode> {
        if name.is_none() {
            return None;
        }
        self.keys
            .iter()
            .position(|k| k.name == name)
            .map(|kc| kc as Keycode)
    }

    pub fn find_alias(&self, alias: KeyName) -> Option<&KeyAlias> {
        self.key_aliases.iter().find(|a| a.alias == alias)
    }

    /// Resolves `name` as a real key first, then through the alias table
    pub fn resolve_key(&self, name: KeyName) -> Option<Keycode> {
        self.find_named_key(name)
            .or_else(|| self.find_alias(name).and_then(|a| self.find_named_key(a.real)))
    }

    pub fn indicator_name(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.indicator_names.get(i))
            .and_then(|n| n.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let mut keymap = Keymap::new();
        keymap.keys = vec![Key::default(); 10];
        keymap.keys[9].name = KeyName::new("ESC");
        keymap.key_aliases.push(KeyAlias {
            alias: KeyName::new("ESCP"),
            real: KeyName::new("ESC"),
        });
        keymap.indicator_names[0] = Some("Caps Lock".to_string());

        assert_eq!(keymap.find_named_key(KeyName::new("ESC")), Some(9));
        assert_eq!(keymap.find_named_key(KeyName::NONE), None);
        assert_eq!(keymap.resolve_key(KeyName::new("ESCP")), Some(9));
        assert_eq!(keymap.key_name(9), Some(KeyName::new("ESC")));
        assert_eq!(keymap.key_name(3), None);
        assert_eq!(keymap.indicator_name(1), Some("Caps Lock"));
        assert_eq!(keymap.indicator_name(0), None);
    }
}
