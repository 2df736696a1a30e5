use crate::atom::AtomTable;
use crate::diag::Diagnostics;
use crate::types::FileId;

/// Collaborator resources shared by one compile invocation
#[derive(Debug, Default)]
pub struct Context {
    pub atoms: AtomTable,
    pub diag: Diagnostics,
    next_file_id: FileId,
}

impl Context {
    pub fn new(warning_level: u8) -> Self {
        Self {
            atoms: AtomTable::new(),
            diag: Diagnostics::new(warning_level),
            next_file_id: 0,
        }
    }

    /// Hands out a fresh provenance id for a parsed file; ids start at 1
    pub fn take_file_id(&mut self) -> FileId {
        self.next_file_id += 1;
        self.next_file_id
    }
}
