use super::aliases::Aliases;
use super::indicators::IndicatorNames;
use crate::ast::resolve::{resolve_keycode, resolve_lhs};
use crate::ast::{KeycodeDef, VarDef};
use crate::diag::Diagnostics;
use crate::types::{FileId, KeyName, Keycode, KeycodesError, MergeMode, Result, KEYCODE_MAX};

/// Working state for one keycodes section
#[derive(Debug)]
pub struct KeyNamesInfo {
    /// e.g. `evdev+aliases(qwerty)`
    pub name: Option<String>,
    pub error_count: u32,
    pub file_id: FileId,
    pub merge: MergeMode,
    /// Lowest keycode stored; `KEYCODE_MAX` while no key is stored
    pub computed_min: Keycode,
    /// Highest keycode stored
    pub computed_max: Keycode,
    /// 0 means unset
    pub explicit_min: Keycode,
    /// 0 means unset
    pub explicit_max: Keycode,
    names: Vec<KeyName>,
    files: Vec<FileId>,
    pub leds: IndicatorNames,
    pub aliases: Aliases,
}

impl Default for KeyNamesInfo {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimum,
    Maximum,
}

impl Bound {
    fn field(self) -> &'static str {
        match self {
            Bound::Minimum => "minimum",
            Bound::Maximum => "maximum",
        }
    }
}

/// Merge mode a definition is applied with: its own prefix if it has one,
/// else the file's. `replace` on a single definition acts as `override`.
pub fn effective_merge(stmt_merge: MergeMode, file_merge: MergeMode) -> MergeMode {
    match stmt_merge {
        MergeMode::Default => file_merge,
        MergeMode::Replace => MergeMode::Override,
        other => other,
    }
}

impl KeyNamesInfo {
    pub fn new(file_id: FileId) -> Self {
        Self {
            name: None,
            error_count: 0,
            file_id,
            merge: MergeMode::Default,
            computed_min: KEYCODE_MAX,
            computed_max: 0,
            explicit_min: 0,
            explicit_max: 0,
            names: Vec::new(),
            files: Vec::new(),
            leds: IndicatorNames::default(),
            aliases: Aliases::default(),
        }
    }

    pub fn has_keys(&self) -> bool {
        self.computed_min <= self.computed_max
    }

    pub fn name_at(&self, kc: Keycode) -> KeyName {
        self.names.get(kc as usize).copied().unwrap_or(KeyName::NONE)
    }

    pub fn file_at(&self, kc: Keycode) -> FileId {
        self.files.get(kc as usize).copied().unwrap_or(0)
    }

    /// Capacity of the keycode-indexed arrays
    pub fn capacity(&self) -> usize {
        self.names.len()
    }

    /// Every assigned `(keycode, name)` pair in keycode order
    pub fn bound_keys(&self) -> impl Iterator<Item = (Keycode, KeyName)> + '_ {
        self.observed_range()
            .map(move |kc| (kc, self.name_at(kc)))
            .filter(|(_, name)| !name.is_none())
    }

    /// Empty while no key is stored
    fn observed_range(&self) -> std::ops::RangeInclusive<Keycode> {
        self.computed_min..=self.computed_max
    }

    /// Grows both keycode-indexed arrays so `new_max` is addressable
    pub(crate) fn resize(&mut self, new_max: Keycode) -> Result<()> {
        let wanted = new_max as usize + 1;
        if wanted <= self.names.len() {
            return Ok(());
        }
        let extra = wanted - self.names.len();
        let oom = |_| KeycodesError::OutOfMemory { requested: wanted };
        self.names.try_reserve(extra).map_err(oom)?;
        self.files.try_reserve(extra).map_err(oom)?;
        self.names.resize(wanted, KeyName::NONE);
        self.files.resize(wanted, 0);
        Ok(())
    }

    pub fn find_key_by_name(&self, name: KeyName) -> Option<Keycode> {
        self.observed_range().find(|&kc| self.name_at(kc) == name)
    }

    fn clear_slot(&mut self, kc: Keycode) {
        self.names[kc as usize] = KeyName::NONE;
        self.files[kc as usize] = 0;
    }

    /// Binds `name` to `kc`, keeping the table injective in both directions.
    ///
    /// An occupied slot keeps its name under augment and is cleared
    /// otherwise. A name already bound to another keycode moves only under
    /// override; in every other mode the old binding stays and `kc` is left
    /// as it is after the slot step.
    pub fn add_key_name(
        &mut self,
        diag: &mut Diagnostics,
        kc: Keycode,
        name: KeyName,
        merge: MergeMode,
        file_id: FileId,
        report_collisions: bool,
    ) -> Result<()> {
        self.resize(kc)?;

        if kc < self.computed_min {
            self.computed_min = kc;
        }
        if kc > self.computed_max {
            self.computed_max = kc;
        }

        let report = report_collisions
            && (diag.level() > 7 || (diag.level() > 0 && file_id == self.file_at(kc)));

        let existing = self.name_at(kc);
        if !existing.is_none() {
            if existing == name {
                if report {
                    diag.warn("Multiple identical key name definitions");
                    diag.action(format!(
                        "Later occurences of \"{} = {}\" ignored",
                        existing, kc
                    ));
                }
                return Ok(());
            }
            if merge == MergeMode::Augment {
                if report {
                    diag.warn(format!("Multiple names for keycode {}", kc));
                    diag.action(format!("Using {}, ignoring {}", existing, name));
                }
                return Ok(());
            }
            if report {
                diag.warn(format!("Multiple names for keycode {}", kc));
                diag.action(format!("Using {}, ignoring {}", name, existing));
            }
            self.clear_slot(kc);
        }

        if let Some(old) = self.find_key_by_name(name).filter(|&old| old != kc) {
            if merge == MergeMode::Override {
                self.clear_slot(old);
                if report {
                    diag.warn(format!("Key name {} assigned to multiple keys", name));
                    diag.action(format!("Using {}, ignoring {}", kc, old));
                }
            } else {
                if report && diag.level() > 3 {
                    diag.warn(format!("Key name {} assigned to multiple keys", name));
                    diag.action(format!("Using {}, ignoring {}", old, kc));
                }
                return Ok(());
            }
        }

        self.names[kc as usize] = name;
        self.files[kc as usize] = file_id;
        Ok(())
    }

    /// `<ESC> = 9;`. Returns `Ok(false)` for a recoverable error.
    pub fn handle_keycode_def(
        &mut self,
        diag: &mut Diagnostics,
        stmt: &KeycodeDef,
        merge: MergeMode,
    ) -> Result<bool> {
        let upper = if self.explicit_max != 0 {
            self.explicit_max
        } else {
            KEYCODE_MAX
        };
        if stmt.value > KEYCODE_MAX as u64
            || (self.explicit_min != 0 && stmt.value < self.explicit_min as u64)
            || (self.explicit_max != 0 && stmt.value > self.explicit_max as u64)
        {
            diag.error(format!(
                "Illegal keycode {} for name {}",
                stmt.value, stmt.name
            ));
            diag.action(format!(
                "Must be in the range {}-{} inclusive",
                self.explicit_min, upper
            ));
            return Ok(false);
        }

        let merge = effective_merge(stmt.merge, merge);
        let file_id = self.file_id;
        self.add_key_name(diag, stmt.value as Keycode, stmt.name, merge, file_id, true)?;
        Ok(true)
    }

    /// `minimum = 8;` / `maximum = 255;`. A rejected value leaves the
    /// previous bound in place.
    pub fn handle_key_name_var(&mut self, diag: &mut Diagnostics, stmt: &VarDef) -> bool {
        let Some(name) = &stmt.name else {
            diag.internal("Variable definition without a name");
            return false;
        };
        let Some(lhs) = resolve_lhs(diag, name) else {
            return false;
        };

        if let Some(element) = lhs.element {
            diag.error(format!("Unknown element {} encountered", element));
            diag.action(format!("Default for field {} ignored", lhs.field));
            return false;
        }

        let which = if lhs.field.eq_ignore_ascii_case("minimum") {
            Bound::Minimum
        } else if lhs.field.eq_ignore_ascii_case("maximum") {
            Bound::Maximum
        } else {
            diag.error("Unknown field encountered");
            diag.action(format!("Assignment to field {} ignored", lhs.field));
            return false;
        };

        if lhs.index.is_some() {
            diag.error(format!("The {} setting is not an array", lhs.field));
            diag.action("Illegal array reference ignored");
            return false;
        }

        let resolved = stmt.value.as_ref().and_then(|value| resolve_keycode(diag, value));
        let Some(value) = resolved else {
            diag.action(format!("Assignment to field {} ignored", lhs.field));
            return false;
        };

        if value < 0 || value > KEYCODE_MAX as i64 {
            diag.error(format!(
                "Illegal keycode {} (must be in the range 0-{} inclusive)",
                value, KEYCODE_MAX
            ));
            diag.action(format!("Value of \"{}\" not changed", which.field()));
            return false;
        }
        let value = value as Keycode;

        match which {
            Bound::Minimum => {
                if self.explicit_max > 0 && self.explicit_max < value {
                    diag.error(format!(
                        "Minimum key code ({}) must be <= maximum key code ({})",
                        value, self.explicit_max
                    ));
                    diag.action("Minimum key code value not changed");
                    return false;
                }
                if self.has_keys() && self.computed_min < value {
                    diag.error(format!(
                        "Minimum key code ({}) must be <= lowest defined key ({})",
                        value, self.computed_min
                    ));
                    diag.action("Minimum key code value not changed");
                    return false;
                }
                self.explicit_min = value;
            }
            Bound::Maximum => {
                if self.explicit_min > 0 && self.explicit_min > value {
                    diag.error(format!(
                        "Maximum code ({}) must be >= minimum key code ({})",
                        value, self.explicit_min
                    ));
                    diag.action("Maximum code value not changed");
                    return false;
                }
                if self.has_keys() && self.computed_max > value {
                    diag.error(format!(
                        "Maximum code ({}) must be >= highest defined key ({})",
                        value, self.computed_max
                    ));
                    diag.action("Maximum code value not changed");
                    return false;
                }
                self.explicit_max = value;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprDef;
    use crate::diag::Severity;

    fn add(info: &mut KeyNamesInfo, diag: &mut Diagnostics, kc: Keycode, name: &str, merge: MergeMode) {
        let file_id = info.file_id;
        info.add_key_name(diag, kc, KeyName::new(name), merge, file_id, true)
            .unwrap();
    }

    fn bound(name: &str, value: i64) -> VarDef {
        VarDef::new(ExprDef::ident(name), ExprDef::int(value))
    }

    #[test]
    fn test_distinct_bindings_are_bijective() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
        add(&mut info, &mut diag, 23, "TAB", MergeMode::Default);
        add(&mut info, &mut diag, 36, "RTRN", MergeMode::Default);

        let keys: Vec<_> = info.bound_keys().collect();
        assert_eq!(
            keys,
            vec![
                (9, KeyName::new("ESC")),
                (23, KeyName::new("TAB")),
                (36, KeyName::new("RTRN")),
            ]
        );
        assert_eq!(info.find_key_by_name(KeyName::new("TAB")), Some(23));
        assert_eq!((info.computed_min, info.computed_max), (9, 36));
        assert_eq!(info.capacity(), 37);
    }

    #[test]
    fn test_identical_redefinition_is_idempotent() {
        let mut diag = Diagnostics::new(1);
        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Override);

        assert_eq!(info.bound_keys().count(), 1);
        assert!(diag.contains(Severity::Warning, "identical"));
    }

    #[test]
    fn test_augment_keeps_existing_name() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
        add(&mut info, &mut diag, 9, "FOO", MergeMode::Augment);
        assert_eq!(info.name_at(9), KeyName::new("ESC"));
    }

    #[test]
    fn test_non_augment_replaces_slot() {
        for merge in [MergeMode::Default, MergeMode::Override, MergeMode::Replace] {
            let mut diag = Diagnostics::new(0);
            let mut info = KeyNamesInfo::new(1);
            add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
            add(&mut info, &mut diag, 9, "FOO", merge);
            assert_eq!(info.name_at(9), KeyName::new("FOO"), "merge mode {}", merge);
            assert_eq!(info.find_key_by_name(KeyName::new("ESC")), None);
        }
    }

    #[test]
    fn test_name_moves_only_under_override() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
        add(&mut info, &mut diag, 10, "ESC", MergeMode::Override);
        assert_eq!(info.name_at(9), KeyName::NONE);
        assert_eq!(info.find_key_by_name(KeyName::new("ESC")), Some(10));

        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);
        add(&mut info, &mut diag, 10, "ESC", MergeMode::Augment);
        assert_eq!(info.find_key_by_name(KeyName::new("ESC")), Some(9));
        assert_eq!(info.name_at(10), KeyName::NONE);
    }

    #[test]
    fn test_cross_file_collisions_quiet_at_low_level() {
        let mut diag = Diagnostics::new(3);
        let mut info = KeyNamesInfo::new(1);
        info.add_key_name(&mut diag, 9, KeyName::new("ESC"), MergeMode::Default, 1, true)
            .unwrap();
        info.add_key_name(&mut diag, 9, KeyName::new("FOO"), MergeMode::Default, 2, true)
            .unwrap();
        assert_eq!(diag.count(Severity::Warning), 0);

        info.add_key_name(&mut diag, 9, KeyName::new("BAR"), MergeMode::Default, 2, true)
            .unwrap();
        assert!(diag.contains(Severity::Warning, "Multiple names for keycode 9"));
    }

    #[test]
    fn test_keycode_def_range_check() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        info.explicit_min = 8;
        info.explicit_max = 100;

        assert!(!info.handle_keycode_def(&mut diag, &KeycodeDef::new("LOW", 5), MergeMode::Default).unwrap());
        assert!(!info.handle_keycode_def(&mut diag, &KeycodeDef::new("HIGH", 101), MergeMode::Default).unwrap());
        assert!(info.handle_keycode_def(&mut diag, &KeycodeDef::new("ESC", 9), MergeMode::Default).unwrap());
        assert!(diag.contains(Severity::Error, "Illegal keycode 5"));
        assert_eq!(info.bound_keys().count(), 1);
    }

    #[test]
    fn test_keycode_def_above_representable_range() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        let def = KeycodeDef::new("HUGE", KEYCODE_MAX as u64 + 1);
        assert!(!info.handle_keycode_def(&mut diag, &def, MergeMode::Default).unwrap());
        assert!(!info.has_keys());
    }

    #[test]
    fn test_replace_prefix_acts_as_override() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);
        add(&mut info, &mut diag, 9, "ESC", MergeMode::Default);

        let mut def = KeycodeDef::new("ESC", 10);
        def.merge = MergeMode::Replace;
        assert!(info.handle_keycode_def(&mut diag, &def, MergeMode::Augment).unwrap());
        assert_eq!(info.find_key_by_name(KeyName::new("ESC")), Some(10));
    }

    #[test]
    fn test_bounds_validation() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);

        assert!(info.handle_key_name_var(&mut diag, &bound("maximum", 50)));
        assert!(!info.handle_key_name_var(&mut diag, &bound("minimum", 60)));
        assert_eq!(info.explicit_min, 0);

        add(&mut info, &mut diag, 20, "KEY", MergeMode::Default);
        assert!(!info.handle_key_name_var(&mut diag, &bound("minimum", 21)));
        assert!(info.handle_key_name_var(&mut diag, &bound("MINIMUM", 20)));
        assert_eq!(info.explicit_min, 20);

        assert!(!info.handle_key_name_var(&mut diag, &bound("maximum", 10)));
        assert_eq!(info.explicit_max, 50);
        assert!(!info.handle_key_name_var(&mut diag, &bound("maximum", -1)));
        assert!(!info.handle_key_name_var(&mut diag, &bound("maximum", KEYCODE_MAX as i64 + 1)));
        assert_eq!(info.explicit_max, 50);
    }

    #[test]
    fn test_bounds_reject_other_targets() {
        let mut diag = Diagnostics::new(0);
        let mut info = KeyNamesInfo::new(1);

        let element = VarDef::new(ExprDef::field_ref("keys", "minimum"), ExprDef::int(8));
        assert!(!info.handle_key_name_var(&mut diag, &element));
        assert!(diag.contains(Severity::Error, "Unknown element keys"));

        assert!(!info.handle_key_name_var(&mut diag, &bound("middle", 8)));
        assert!(diag.contains(Severity::Error, "Unknown field"));

        let array = VarDef::new(ExprDef::array_ref(None, "minimum", ExprDef::int(0)), ExprDef::int(8));
        assert!(!info.handle_key_name_var(&mut diag, &array));
        assert!(diag.contains(Severity::Error, "not an array"));

        let string = VarDef::new(ExprDef::ident("minimum"), ExprDef::string("8"));
        assert!(!info.handle_key_name_var(&mut diag, &string));
        assert_eq!(info.explicit_min, 0);
    }
}
