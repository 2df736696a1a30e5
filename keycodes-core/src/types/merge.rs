use std::fmt;

/// Policy for how a new definition interacts with an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// The file-level policy applies
    #[default]
    Default,
    /// Existing definition wins
    Augment,
    /// New definition wins
    Override,
    /// New definition wins, reported distinctly from override
    Replace,
}

impl MergeMode {
    /// True for the modes where a new definition replaces an old one
    pub fn new_wins(self) -> bool {
        matches!(self, MergeMode::Override | MergeMode::Replace)
    }

    /// Merge operator for the link following an include separator
    pub fn from_separator(op: char) -> Self {
        if op == '|' {
            MergeMode::Augment
        } else {
            MergeMode::Override
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MergeMode::Default => "default",
            MergeMode::Augment => "augment",
            MergeMode::Override => "override",
            MergeMode::Replace => "replace",
        };
        f.write_str(text)
    }
}
