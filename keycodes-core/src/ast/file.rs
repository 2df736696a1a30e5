use super::stmt::StmtList;
use crate::context::Context;
use crate::types::FileId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Keymap,
    Types,
    Compat,
    Symbols,
    Keycodes,
    Geometry,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileType::Keymap => "keymap",
            FileType::Types => "types",
            FileType::Compat => "compat",
            FileType::Symbols => "symbols",
            FileType::Keycodes => "keycodes",
            FileType::Geometry => "geometry",
        };
        f.write_str(text)
    }
}

/// Section flags written before the section keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapFlags(u16);

impl MapFlags {
    pub const DEFAULT: MapFlags = MapFlags(1 << 0);
    pub const PARTIAL: MapFlags = MapFlags(1 << 1);
    pub const HIDDEN: MapFlags = MapFlags(1 << 2);
    pub const ALPHANUMERIC_KEYS: MapFlags = MapFlags(1 << 3);
    pub const MODIFIER_KEYS: MapFlags = MapFlags(1 << 4);
    pub const KEYPAD_KEYS: MapFlags = MapFlags(1 << 5);
    pub const FUNCTION_KEYS: MapFlags = MapFlags(1 << 6);
    pub const ALTERNATE_GROUP: MapFlags = MapFlags(1 << 7);

    pub fn empty() -> Self {
        MapFlags(0)
    }

    pub fn contains(self, other: MapFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: MapFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: MapFlags) {
        self.0 &= !other.0;
    }
}

/// One parsed section, e.g. `default xkb_keycodes "evdev" { ... };`
#[derive(Debug, Clone, PartialEq)]
pub struct XkbFile {
    pub file_type: FileType,
    /// Name as written, before sanitizing
    pub top_name: Option<String>,
    pub name: Option<String>,
    pub defs: StmtList,
    pub id: FileId,
    pub flags: MapFlags,
}

impl XkbFile {
    pub fn new(
        ctx: &mut Context,
        file_type: FileType,
        name: Option<String>,
        defs: StmtList,
        flags: MapFlags,
    ) -> Self {
        Self {
            file_type,
            top_name: name.clone(),
            name: name.map(|n| safe_map_name(&n)),
            defs,
            id: ctx.take_file_id(),
            flags,
        }
    }

    pub fn is_default(&self) -> bool {
        self.flags.contains(MapFlags::DEFAULT)
    }

    pub fn display_name(&self) -> &str {
        self.top_name.as_deref().unwrap_or("(unnamed)")
    }
}

/// Latin-1 alphanumerics plus parens, slash, minus, underscore and wildcards
fn is_component_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '(' | ')' | '*' | '-' | '/' | '?' | '_')
        || (('\u{c0}'..='\u{ff}').contains(&ch) && ch != '\u{d7}' && ch != '\u{f7}')
}

/// Replaces every character not legal in a component name with `_`
pub fn safe_map_name(name: &str) -> String {
    name.chars()
        .map(|ch| if is_component_char(ch) { ch } else { '_' })
        .collect()
}

/// Keeps only the first `default` flag among `maps`
pub fn check_default_map(ctx: &mut Context, maps: &mut [XkbFile], file_name: Option<&str>) {
    let mut default_name: Option<String> = None;

    for map in maps.iter_mut() {
        if !map.is_default() {
            continue;
        }
        match &default_name {
            None => default_name = Some(map.name.clone().unwrap_or_else(|| "(first)".to_string())),
            Some(first) => {
                if ctx.diag.level() > 2 {
                    ctx.diag.warn(format!(
                        "Multiple default components in {}",
                        file_name.unwrap_or("(unknown)")
                    ));
                    ctx.diag.action(format!(
                        "Using {}, ignoring {}",
                        first,
                        map.name.as_deref().unwrap_or("(subsequent)")
                    ));
                }
                map.flags.remove(MapFlags::DEFAULT);
            }
        }
    }
}

/// Picks the section an include refers to: the named map, else the default
/// map, else the first one
pub fn select_map(maps: Vec<XkbFile>, map: Option<&str>) -> Option<XkbFile> {
    match map {
        Some(wanted) => maps
            .into_iter()
            .find(|m| m.name.as_deref() == Some(wanted)),
        None => {
            let position = maps.iter().position(XkbFile::is_default).unwrap_or(0);
            maps.into_iter().nth(position)
        }
    }
}
