use crate::ast::KeyAliasDef;
use crate::diag::Diagnostics;
use crate::keymap::{KeyAlias, Keymap};
use crate::types::{FileId, KeyName, MergeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasInfo {
    pub merge: MergeMode,
    pub file_id: FileId,
    pub alias: KeyName,
    pub real: KeyName,
}

/// Reconciles a redefinition of `old.alias`. Provenance always moves to the
/// newer definition; the real name does too unless `new` augments.
fn handle_collision(diag: &mut Diagnostics, old: &mut AliasInfo, new: &AliasInfo) {
    let report = diag.reports_collision(old.file_id == new.file_id);

    if new.real == old.real {
        if report {
            diag.warn(format!(
                "Alias of {} for {} declared more than once",
                new.alias, new.real
            ));
            diag.action("First definition ignored");
        }
    } else {
        let (using, ignoring) = if new.merge == MergeMode::Augment {
            (old.real, new.real)
        } else {
            (new.real, old.real)
        };
        if report {
            diag.warn(format!("Multiple definitions for alias {}", old.alias));
            diag.action(format!("Using {}, ignoring {}", using, ignoring));
        }
        old.real = using;
    }

    old.file_id = new.file_id;
    old.merge = new.merge;
}

/// Alias definitions of one section, unique by alias name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    aliases: Vec<AliasInfo>,
}

impl Aliases {
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AliasInfo> {
        self.aliases.iter()
    }

    pub fn find(&self, alias: KeyName) -> Option<&AliasInfo> {
        self.aliases.iter().find(|a| a.alias == alias)
    }

    /// `alias <MENU> = <COMP>;`
    pub fn handle_alias_def(
        &mut self,
        diag: &mut Diagnostics,
        def: &KeyAliasDef,
        merge: MergeMode,
        file_id: FileId,
    ) {
        let new = AliasInfo {
            merge,
            file_id,
            alias: def.alias,
            real: def.real,
        };
        self.add(diag, new);
    }

    fn add(&mut self, diag: &mut Diagnostics, new: AliasInfo) {
        match self.aliases.iter_mut().find(|a| a.alias == new.alias) {
            Some(old) => handle_collision(diag, old, &new),
            None => self.aliases.push(new),
        }
    }

    /// Folds `other` into `self`. A default `how` keeps each record's own
    /// merge mode.
    pub fn merge_from(&mut self, diag: &mut Diagnostics, other: Aliases, how: MergeMode) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        for mut record in other.aliases {
            if how != MergeMode::Default {
                record.merge = how;
            }
            self.add(diag, record);
        }
    }

    /// Installs the surviving aliases into `keymap`. An alias whose target
    /// is unknown, or whose name is already a real key, is dropped. One
    /// matching an alias the keymap already has updates that entry instead.
    pub fn apply(self, diag: &mut Diagnostics, keymap: &mut Keymap) {
        let mut survivors = Vec::with_capacity(self.aliases.len());

        for info in self.aliases {
            if keymap.find_named_key(info.real).is_none() {
                if diag.level() > 4 {
                    diag.warn(format!(
                        "Attempt to alias {} to non-existent key {}",
                        info.alias, info.real
                    ));
                    diag.action("Ignored");
                }
                continue;
            }

            if keymap.find_named_key(info.alias).is_some() {
                if diag.level() > 4 {
                    diag.warn("Attempt to create alias with the name of a real key");
                    diag.action(format!(
                        "Alias \"{} = {}\" ignored",
                        info.alias, info.real
                    ));
                }
                continue;
            }

            if let Some(existing) = keymap
                .key_aliases
                .iter_mut()
                .find(|a| a.alias == info.alias)
            {
                let mut old = AliasInfo {
                    merge: MergeMode::Augment,
                    file_id: 0,
                    alias: existing.alias,
                    real: existing.real,
                };
                handle_collision(diag, &mut old, &info);
                existing.real = old.real;
                continue;
            }

            survivors.push(KeyAlias {
                alias: info.alias,
                real: info.real,
            });
        }

        keymap.key_aliases.extend(survivors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Key;
    use crate::diag::Severity;

    fn keymap_with(names: &[(usize, &str)]) -> Keymap {
        let mut keymap = Keymap::new();
        keymap.keys = vec![Key::default(); 64];
        for &(kc, name) in names {
            keymap.keys[kc].name = KeyName::new(name);
        }
        keymap
    }

    fn def(alias: &str, real: &str) -> KeyAliasDef {
        KeyAliasDef::new(alias, real)
    }

    #[test]
    fn test_redefinition_same_real() {
        let mut diag = Diagnostics::new(1);
        let mut aliases = Aliases::default();
        aliases.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Default, 1);
        aliases.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Override, 1);

        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.find(KeyName::new("MENU")).map(|a| a.merge), Some(MergeMode::Override));
        assert!(diag.contains(Severity::Warning, "declared more than once"));
    }

    #[test]
    fn test_redefinition_different_real() {
        let mut diag = Diagnostics::new(0);
        let mut aliases = Aliases::default();
        aliases.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Default, 1);
        aliases.handle_alias_def(&mut diag, &def("MENU", "RWIN"), MergeMode::Augment, 2);
        let record = *aliases.find(KeyName::new("MENU")).unwrap();
        assert_eq!(record.real, KeyName::new("COMP"));
        assert_eq!(record.file_id, 2);

        aliases.handle_alias_def(&mut diag, &def("MENU", "RWIN"), MergeMode::Default, 3);
        assert_eq!(aliases.find(KeyName::new("MENU")).map(|a| a.real), Some(KeyName::new("RWIN")));
    }

    #[test]
    fn test_merge_into_empty_adopts() {
        let mut diag = Diagnostics::new(0);
        let mut from = Aliases::default();
        from.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Augment, 2);

        let mut into = Aliases::default();
        into.merge_from(&mut diag, from.clone(), MergeMode::Override);
        assert_eq!(into, from);
    }

    #[test]
    fn test_merge_how_overrides_record_mode() {
        let mut diag = Diagnostics::new(0);
        let mut into = Aliases::default();
        into.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Default, 1);

        let mut from = Aliases::default();
        from.handle_alias_def(&mut diag, &def("MENU", "RWIN"), MergeMode::Override, 2);
        into.merge_from(&mut diag, from.clone(), MergeMode::Augment);
        assert_eq!(into.find(KeyName::new("MENU")).map(|a| a.real), Some(KeyName::new("COMP")));

        into.merge_from(&mut diag, from, MergeMode::Default);
        assert_eq!(into.find(KeyName::new("MENU")).map(|a| a.real), Some(KeyName::new("RWIN")));
    }

    #[test]
    fn test_apply_drops_invalid_aliases() {
        let mut diag = Diagnostics::new(5);
        let mut keymap = keymap_with(&[(9, "ESC"), (35, "COMP")]);
        let mut aliases = Aliases::default();
        aliases.handle_alias_def(&mut diag, &def("MENU", "COMP"), MergeMode::Default, 1);
        aliases.handle_alias_def(&mut diag, &def("FOO", "NONE"), MergeMode::Default, 1);
        aliases.handle_alias_def(&mut diag, &def("ESC", "COMP"), MergeMode::Default, 1);

        aliases.apply(&mut diag, &mut keymap);

        assert_eq!(
            keymap.key_aliases,
            vec![KeyAlias {
                alias: KeyName::new("MENU"),
                real: KeyName::new("COMP"),
            }]
        );
        assert!(diag.contains(Severity::Warning, "non-existent key <NONE>"));
        assert!(diag.contains(Severity::Warning, "name of a real key"));
    }

    #[test]
    fn test_apply_quiet_below_level_five() {
        let mut diag = Diagnostics::new(4);
        let mut keymap = keymap_with(&[(9, "ESC")]);
        let mut aliases = Aliases::default();
        aliases.handle_alias_def(&mut diag, &def("FOO", "NONE"), MergeMode::Default, 1);
        aliases.apply(&mut diag, &mut keymap);

        assert!(keymap.key_aliases.is_empty());
        assert_eq!(diag.count(Severity::Warning), 0);
    }

    #[test]
    fn test_apply_updates_existing_keymap_alias() {
        let mut diag = Diagnostics::new(0);
        let mut keymap = keymap_with(&[(9, "ESC"), (10, "COMP"), (11, "RWIN")]);
        keymap.key_aliases.push(KeyAlias {
            alias: KeyName::new("MENU"),
            real: KeyName::new("COMP"),
        });

        let mut aliases = Aliases::default();
        aliases.handle_alias_def(&mut diag, &def("MENU", "RWIN"), MergeMode::Override, 1);
        aliases.apply(&mut diag, &mut keymap);

        assert_eq!(keymap.key_aliases.len(), 1);
        assert_eq!(keymap.key_aliases[0].real, KeyName::new("RWIN"));
    }
}
