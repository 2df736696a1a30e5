use std::collections::HashMap;

/// Interned string handle; [`Atom::NONE`] never names a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Atom(u32);

impl Atom {
    pub const NONE: Atom = Atom(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Default)]
pub struct AtomTable {
    strings: Vec<String>,
    index: HashMap<String, Atom>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&atom) = self.index.get(text) {
            return atom;
        }
        self.strings.push(text.to_string());
        let atom = Atom(self.strings.len() as u32);
        self.index.insert(text.to_string(), atom);
        atom
    }

    pub fn text(&self, atom: Atom) -> Option<&str> {
        if atom.is_none() {
            return None;
        }
        self.strings.get(atom.0 as usize - 1).map(String::as_str)
    }

    /// Like [`AtomTable::text`] but never fails, for use in messages
    pub fn display(&self, atom: Atom) -> &str {
        self.text(atom).unwrap_or("(none)")
    }
}
