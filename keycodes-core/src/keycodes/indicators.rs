use super::info::{effective_merge, KeyNamesInfo};
use crate::ast::resolve::resolve_string;
use crate::ast::IndicatorNameDef;
use crate::atom::{Atom, AtomTable};
use crate::context::Context;
use crate::diag::Diagnostics;
use crate::types::{FileId, MergeMode, NUM_INDICATORS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorNameInfo {
    pub merge: MergeMode,
    pub file_id: FileId,
    /// 1-based
    pub ndx: usize,
    pub name: Atom,
    pub is_virtual: bool,
}

fn kind(is_virtual: bool) -> &'static str {
    if is_virtual {
        "virtual"
    } else {
        "real"
    }
}

/// Indicator names of one section. At most one record per index and one
/// per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorNames {
    leds: Vec<IndicatorNameInfo>,
}

impl IndicatorNames {
    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndicatorNameInfo> {
        self.leds.iter()
    }

    pub fn find_by_index(&self, ndx: usize) -> Option<&IndicatorNameInfo> {
        self.leds.iter().find(|led| led.ndx == ndx)
    }

    pub fn find_by_name(&self, name: Atom) -> Option<&IndicatorNameInfo> {
        self.leds.iter().find(|led| led.name == name)
    }

    /// Reconciles `new` against the records already present. Only the
    /// messages depend on the warning level.
    pub fn add(
        &mut self,
        diag: &mut Diagnostics,
        atoms: &AtomTable,
        merge: MergeMode,
        new: IndicatorNameInfo,
    ) {
        let replace = merge.new_wins();

        if let Some(pos) = self.leds.iter().position(|led| led.name == new.name) {
            let old = &mut self.leds[pos];
            let report = diag.reports_collision(old.file_id == new.file_id);

            if old.ndx == new.ndx {
                if old.is_virtual != new.is_virtual {
                    if replace {
                        old.is_virtual = new.is_virtual;
                    }
                    if report {
                        diag.warn(format!(
                            "Multiple indicators named {}",
                            atoms.display(new.name)
                        ));
                        diag.action(format!(
                            "Using {} instead of {}",
                            kind(old.is_virtual),
                            kind(!old.is_virtual)
                        ));
                    }
                } else if report {
                    diag.warn(format!(
                        "Multiple indicators named {}",
                        atoms.display(new.name)
                    ));
                    diag.action("Identical definitions ignored");
                }
                return;
            }

            if report {
                diag.warn(format!(
                    "Multiple indicators named {}",
                    atoms.display(new.name)
                ));
                if replace {
                    diag.action(format!("Ignoring {}, using {}", old.ndx, new.ndx));
                } else {
                    diag.action(format!("Using {}, ignoring {}", old.ndx, new.ndx));
                }
            }
            if !replace {
                return;
            }
            self.leds.remove(pos);
        }

        if let Some(old) = self.leds.iter_mut().find(|led| led.ndx == new.ndx) {
            if diag.reports_collision(old.file_id == new.file_id) {
                diag.warn(format!("Multiple names for indicator {}", new.ndx));
                if old.name == new.name && old.is_virtual == new.is_virtual {
                    diag.action("Identical definitions ignored");
                } else {
                    let (using, ignoring) = if replace { (&new, &*old) } else { (&*old, &new) };
                    diag.action(format!(
                        "Using {} {}, ignoring {} {}",
                        kind(using.is_virtual),
                        atoms.display(using.name),
                        kind(ignoring.is_virtual),
                        atoms.display(ignoring.name)
                    ));
                }
            }
            if replace {
                old.name = new.name;
                old.is_virtual = new.is_virtual;
            }
            return;
        }

        self.leds.push(new);
    }

    /// Folds every record of `other` into `self`. A non-default `merge`
    /// overrides each record's own mode.
    pub fn merge_from(
        &mut self,
        diag: &mut Diagnostics,
        atoms: &AtomTable,
        other: IndicatorNames,
        merge: MergeMode,
    ) {
        for mut led in other.leds {
            if merge != MergeMode::Default {
                led.merge = merge;
            }
            let mode = led.merge;
            self.add(diag, atoms, mode, led);
        }
    }
}

impl IntoIterator for IndicatorNames {
    type Item = IndicatorNameInfo;
    type IntoIter = std::vec::IntoIter<IndicatorNameInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.leds.into_iter()
    }
}

impl KeyNamesInfo {
    /// `indicator 1 = "Caps Lock";`. Returns false for a recoverable error.
    pub fn handle_indicator_name_def(
        &mut self,
        ctx: &mut Context,
        def: &IndicatorNameDef,
        merge: MergeMode,
    ) -> bool {
        if def.ndx < 1 || def.ndx > NUM_INDICATORS as i64 {
            ctx.diag.error(format!(
                "Name specified for illegal indicator index {}",
                def.ndx
            ));
            ctx.diag.action("Ignored");
            return false;
        }

        let Some(text) = resolve_string(&mut ctx.diag, &def.name) else {
            ctx.diag.error(format!(
                "The name of indicator {} must be a string",
                def.ndx
            ));
            ctx.diag.action(format!(
                "Ignoring illegal assignment in indicator {}",
                def.ndx
            ));
            return false;
        };

        let info = IndicatorNameInfo {
            merge: self.merge,
            file_id: self.file_id,
            ndx: def.ndx as usize,
            name: ctx.atoms.intern(&text),
            is_virtual: def.is_virtual,
        };
        let merge = effective_merge(def.merge, merge);
        self.leds.add(&mut ctx.diag, &ctx.atoms, merge, info);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprDef;
    use crate::diag::Severity;

    fn led(atoms: &mut AtomTable, ndx: usize, name: &str, is_virtual: bool, file_id: FileId) -> IndicatorNameInfo {
        IndicatorNameInfo {
            merge: MergeMode::Default,
            file_id,
            ndx,
            name: atoms.intern(name),
            is_virtual,
        }
    }

    #[test]
    fn test_distinct_records_accumulate() {
        let mut atoms = AtomTable::new();
        let mut diag = Diagnostics::new(0);
        let mut leds = IndicatorNames::default();

        let caps = led(&mut atoms, 1, "Caps Lock", false, 1);
        let num = led(&mut atoms, 2, "Num Lock", false, 1);
        leds.add(&mut diag, &atoms, MergeMode::Default, caps);
        leds.add(&mut diag, &atoms, MergeMode::Default, num);

        assert_eq!(leds.len(), 2);
        assert_eq!(leds.find_by_index(2).map(|l| l.name), Some(atoms.intern("Num Lock")));
    }

    #[test]
    fn test_same_name_different_index() {
        let mut atoms = AtomTable::new();
        let mut diag = Diagnostics::new(0);

        let mut leds = IndicatorNames::default();
        let first = led(&mut atoms, 1, "Caps Lock", false, 1);
        let moved = led(&mut atoms, 3, "Caps Lock", false, 1);
        leds.add(&mut diag, &atoms, MergeMode::Default, first.clone());
        leds.add(&mut diag, &atoms, MergeMode::Override, moved.clone());
        assert_eq!(leds.len(), 1);
        assert_eq!(leds.find_by_name(first.name).map(|l| l.ndx), Some(3));

        let mut leds = IndicatorNames::default();
        leds.add(&mut diag, &atoms, MergeMode::Default, first.clone());
        leds.add(&mut diag, &atoms, MergeMode::Augment, moved);
        assert_eq!(leds.len(), 1);
        assert_eq!(leds.find_by_name(first.name).map(|l| l.ndx), Some(1));
        assert!(leds.find_by_index(3).is_none());
    }

    #[test]
    fn test_virtual_flag_follows_merge() {
        let mut atoms = AtomTable::new();
        let mut diag = Diagnostics::new(0);

        let real = led(&mut atoms, 1, "Caps Lock", false, 1);
        let virt = led(&mut atoms, 1, "Caps Lock", true, 1);

        let mut leds = IndicatorNames::default();
        leds.add(&mut diag, &atoms, MergeMode::Default, real.clone());
        leds.add(&mut diag, &atoms, MergeMode::Augment, virt.clone());
        assert_eq!(leds.find_by_index(1).map(|l| l.is_virtual), Some(false));

        leds.add(&mut diag, &atoms, MergeMode::Replace, virt);
        assert_eq!(leds.find_by_index(1).map(|l| l.is_virtual), Some(true));
        assert_eq!(leds.len(), 1);
    }

    #[test]
    fn test_index_collision_renames_under_override() {
        let mut atoms = AtomTable::new();
        let mut diag = Diagnostics::new(1);
        let mut leds = IndicatorNames::default();

        let caps = led(&mut atoms, 1, "Caps Lock", false, 1);
        let shift = led(&mut atoms, 1, "Shift Lock", true, 1);
        leds.add(&mut diag, &atoms, MergeMode::Default, caps);
        leds.add(&mut diag, &atoms, MergeMode::Override, shift.clone());

        let record = leds.find_by_index(1).unwrap();
        assert_eq!(record.name, shift.name);
        assert!(record.is_virtual);
        assert!(diag.contains(Severity::Warning, "Multiple names for indicator 1"));
    }

    #[test]
    fn test_reconciliation_ignores_warning_level() {
        let mut atoms = AtomTable::new();
        let caps = led(&mut atoms, 1, "Caps Lock", false, 1);
        let other = led(&mut atoms, 1, "Other", false, 2);

        let mut outcomes = Vec::new();
        for level in [0, 5, 10] {
            let mut diag = Diagnostics::new(level);
            let mut leds = IndicatorNames::default();
            leds.add(&mut diag, &atoms, MergeMode::Default, caps.clone());
            leds.add(&mut diag, &atoms, MergeMode::Override, other.clone());
            outcomes.push(leds);
        }
        assert_eq!(outcomes[0], outcomes[1]);
        assert_eq!(outcomes[1], outcomes[2]);
    }

    #[test]
    fn test_handle_def_rejects_index_out_of_range() {
        let mut ctx = Context::new(0);
        let mut info = KeyNamesInfo::new(1);

        for ndx in [0, 33] {
            let def = IndicatorNameDef::new(ndx, ExprDef::string("Bad"), false);
            assert!(!info.handle_indicator_name_def(&mut ctx, &def, MergeMode::Default));
        }
        let def = IndicatorNameDef::new(32, ExprDef::string("Last"), false);
        assert!(info.handle_indicator_name_def(&mut ctx, &def, MergeMode::Default));

        assert_eq!(info.leds.len(), 1);
        assert_eq!(ctx.diag.count(Severity::Error), 2);
    }

    #[test]
    fn test_handle_def_requires_string() {
        let mut ctx = Context::new(0);
        let mut info = KeyNamesInfo::new(1);
        let def = IndicatorNameDef::new(1, ExprDef::int(5), false);
        assert!(!info.handle_indicator_name_def(&mut ctx, &def, MergeMode::Default));
        assert!(info.leds.is_empty());
    }
}
