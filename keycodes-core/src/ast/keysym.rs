/// Keysym value
pub type Keysym = u32;

pub const KEYSYM_NO_SYMBOL: Keysym = 0;
pub const KEYSYM_VOID_SYMBOL: Keysym = 0x00ff_ffff;

/// Keysyms per shift level, stored flat.
///
/// `syms_map_index[i]` is the offset of level `i` in `syms` and
/// `syms_num_entries[i]` how many symbols the level holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysymList {
    pub syms: Vec<String>,
    pub syms_map_index: Vec<usize>,
    pub syms_num_entries: Vec<usize>,
}

impl KeysymList {
    pub fn new(sym: impl Into<String>) -> Self {
        Self {
            syms: vec![sym.into()],
            syms_map_index: vec![0],
            syms_num_entries: vec![1],
        }
    }

    /// Collapses every symbol into a single level
    pub fn into_multi(mut self) -> Self {
        self.syms_map_index = vec![0];
        self.syms_num_entries = vec![self.syms.len()];
        self
    }

    /// Appends `sym` as a new one-entry level
    pub fn append(mut self, sym: impl Into<String>) -> Self {
        self.syms_map_index.push(self.syms.len());
        self.syms_num_entries.push(1);
        self.syms.push(sym.into());
        self
    }

    /// Appends the levels of `other`, shifting its offsets past our symbols
    pub fn append_multi(mut self, other: KeysymList) -> Self {
        let offset = self.syms.len();
        self.syms_map_index
            .extend(other.syms_map_index.iter().map(|&start| start + offset));
        self.syms_num_entries.extend(other.syms_num_entries);
        self.syms.extend(other.syms);
        self
    }

    pub fn num_levels(&self) -> usize {
        self.syms_map_index.len()
    }

    pub fn level(&self, index: usize) -> Option<&[String]> {
        let start = *self.syms_map_index.get(index)?;
        let count = *self.syms_num_entries.get(index)?;
        self.syms.get(start..start + count)
    }
}

const KEYSYM_NAMES: &[(&str, Keysym)] = &[
    ("space", 0x0020),
    ("exclam", 0x0021),
    ("quotedbl", 0x0022),
    ("numbersign", 0x0023),
    ("dollar", 0x0024),
    ("percent", 0x0025),
    ("ampersand", 0x0026),
    ("apostrophe", 0x0027),
    ("parenleft", 0x0028),
    ("parenright", 0x0029),
    ("asterisk", 0x002a),
    ("plus", 0x002b),
    ("comma", 0x002c),
    ("minus", 0x002d),
    ("period", 0x002e),
    ("slash", 0x002f),
    ("colon", 0x003a),
    ("semicolon", 0x003b),
    ("less", 0x003c),
    ("equal", 0x003d),
    ("greater", 0x003e),
    ("question", 0x003f),
    ("at", 0x0040),
    ("bracketleft", 0x005b),
    ("backslash", 0x005c),
    ("bracketright", 0x005d),
    ("asciicircum", 0x005e),
    ("underscore", 0x005f),
    ("grave", 0x0060),
    ("braceleft", 0x007b),
    ("bar", 0x007c),
    ("braceright", 0x007d),
    ("asciitilde", 0x007e),
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Return", 0xff0d),
    ("Pause", 0xff13),
    ("Scroll_Lock", 0xff14),
    ("Escape", 0xff1b),
    ("Delete", 0xffff),
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Prior", 0xff55),
    ("Next", 0xff56),
    ("End", 0xff57),
    ("Insert", 0xff63),
    ("Menu", 0xff67),
    ("Num_Lock", 0xff7f),
    ("KP_Enter", 0xff8d),
    ("F1", 0xffbe),
    ("F2", 0xffbf),
    ("F3", 0xffc0),
    ("F4", 0xffc1),
    ("F5", 0xffc2),
    ("F6", 0xffc3),
    ("F7", 0xffc4),
    ("F8", 0xffc5),
    ("F9", 0xffc6),
    ("F10", 0xffc7),
    ("F11", 0xffc8),
    ("F12", 0xffc9),
    ("Shift_L", 0xffe1),
    ("Shift_R", 0xffe2),
    ("Control_L", 0xffe3),
    ("Control_R", 0xffe4),
    ("Caps_Lock", 0xffe5),
    ("Meta_L", 0xffe7),
    ("Meta_R", 0xffe8),
    ("Alt_L", 0xffe9),
    ("Alt_R", 0xffea),
    ("Super_L", 0xffeb),
    ("Super_R", 0xffec),
    ("ISO_Level3_Shift", 0xfe03),
];

/// Resolves a keysym name.
///
/// `any`/`nosymbol` give [`KEYSYM_NO_SYMBOL`] and `none`/`voidsymbol` give
/// [`KEYSYM_VOID_SYMBOL`], case-insensitively. Otherwise single Latin-1
/// characters, the built-in name table, `0x` hex values and `U`/`U+` hex
/// Unicode forms are accepted.
pub fn lookup_keysym(text: &str) -> Option<Keysym> {
    if text.eq_ignore_ascii_case("any") || text.eq_ignore_ascii_case("nosymbol") {
        return Some(KEYSYM_NO_SYMBOL);
    }
    if text.eq_ignore_ascii_case("none") || text.eq_ignore_ascii_case("voidsymbol") {
        return Some(KEYSYM_VOID_SYMBOL);
    }

    let mut chars = text.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphanumeric() {
            return Some(ch as Keysym);
        }
    }

    if let Some(&(_, sym)) = KEYSYM_NAMES.iter().find(|(name, _)| *name == text) {
        return Some(sym);
    }

    if let Some(hex) = text.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok().filter(|&sym| sym != KEYSYM_NO_SYMBOL);
    }

    let unicode = text.strip_prefix("U+").or_else(|| text.strip_prefix('U'))?;
    let code = u32::from_str_radix(unicode, 16).ok()?;
    char::from_u32(code)?;
    if (0x20..0x7f).contains(&code) || (0xa0..=0xff).contains(&code) {
        Some(code)
    } else {
        Some(0x0100_0000 | code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bookkeeping() {
        let list = KeysymList::new("a").append("A").append("b");
        assert_eq!(list.syms_map_index, vec![0, 1, 2]);
        assert_eq!(list.syms_num_entries, vec![1, 1, 1]);

        let multi = KeysymList::new("x").append("y").into_multi();
        assert_eq!(multi.num_levels(), 1);
        assert_eq!(multi.syms_num_entries, vec![2]);

        let merged = list.append_multi(multi);
        assert_eq!(merged.num_levels(), 4);
        assert_eq!(merged.syms_map_index[3], 3);
        assert_eq!(merged.level(3), Some(&["x".to_string(), "y".to_string()][..]));
    }

    #[test]
    fn test_append_multi_shifts_every_level() {
        let dst = KeysymList::new("a");
        let src = KeysymList::new("b").append("c");
        let merged = dst.append_multi(src);

        assert_eq!(merged.syms_map_index, vec![0, 1, 2]);
        assert_eq!(merged.syms_num_entries, vec![1, 1, 1]);
    }

    #[test]
    fn test_reserved_spellings() {
        assert_eq!(lookup_keysym("Any"), Some(KEYSYM_NO_SYMBOL));
        assert_eq!(lookup_keysym("NOSYMBOL"), Some(KEYSYM_NO_SYMBOL));
        assert_eq!(lookup_keysym("none"), Some(KEYSYM_VOID_SYMBOL));
        assert_eq!(lookup_keysym("VoidSymbol"), Some(KEYSYM_VOID_SYMBOL));
    }

    #[test]
    fn test_named_and_numeric_keysyms() {
        assert_eq!(lookup_keysym("a"), Some(0x61));
        assert_eq!(lookup_keysym("Escape"), Some(0xff1b));
        assert_eq!(lookup_keysym("0xff0d"), Some(0xff0d));
        assert_eq!(lookup_keysym("U1000"), Some(0x0100_1000));
        assert_eq!(lookup_keysym("U+00E9"), Some(0xe9));
        assert_eq!(lookup_keysym("NoSuchKeysym"), None);
    }
}
