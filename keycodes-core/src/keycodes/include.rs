use super::info::{effective_merge, KeyNamesInfo};
use crate::ast::{FileType, IncludeLink, IncludeStmt, Stmt, XkbFile};
use crate::context::Context;
use crate::keymap::Keymap;
use crate::resolver::IncludeResolver;
use crate::types::{MergeMode, Result, KEYCODE_MAX};

/// A section is abandoned once its error count passes this. Each failed
/// statement counts once, including an out-of-range indicator index.
pub const MAX_ERRORS: u32 = 10;

/// Nesting limit for include directives
pub const MAX_INCLUDE_DEPTH: usize = 15;

const INCLUDE_FAILURE_PENALTY: u32 = 10;

/// Pseudo-file that turns on automatic key names instead of reading a file
const COMPUTED_FILE: &str = "computed";

/// Walks a keycodes section and everything it includes
pub struct KeycodesCompiler<'a> {
    ctx: &'a mut Context,
    resolver: &'a mut dyn IncludeResolver,
    keymap: &'a mut Keymap,
    depth: usize,
}

impl<'a> KeycodesCompiler<'a> {
    pub fn new(
        ctx: &'a mut Context,
        resolver: &'a mut dyn IncludeResolver,
        keymap: &'a mut Keymap,
    ) -> Self {
        Self {
            ctx,
            resolver,
            keymap,
            depth: 0,
        }
    }

    /// Applies every statement of `file` to `info` in order
    pub fn handle_file(
        &mut self,
        file: &XkbFile,
        merge: MergeMode,
        info: &mut KeyNamesInfo,
    ) -> Result<()> {
        info.name = file.name.clone();
        info.merge = merge;

        for stmt in file.defs.iter() {
            let ok = match stmt {
                Stmt::Include(include) => self.handle_include(include, info)?,
                Stmt::KeycodeDef(def) => info.handle_keycode_def(&mut self.ctx.diag, def, merge)?,
                Stmt::KeyAliasDef(def) => {
                    let file_id = info.file_id;
                    let mode = effective_merge(def.merge, merge);
                    info.aliases
                        .handle_alias_def(&mut self.ctx.diag, def, mode, file_id);
                    true
                }
                Stmt::VarDef(def) => info.handle_key_name_var(&mut self.ctx.diag, def),
                Stmt::IndicatorNameDef(def) => {
                    info.handle_indicator_name_def(self.ctx, def, merge)
                }
                Stmt::InterpDef(_) | Stmt::VModDef(_) => {
                    self.ctx
                        .diag
                        .error("Keycode files may define key and indicator names only");
                    self.ctx
                        .diag
                        .action(format!("Ignoring definition of {}", stmt.kind_name()));
                    false
                }
                other => {
                    self.ctx.diag.internal(format!(
                        "Unexpected statement type {} in keycodes file",
                        other.kind_name()
                    ));
                    true
                }
            };

            if !ok {
                info.error_count += 1;
            }
            if info.error_count > MAX_ERRORS {
                self.ctx.diag.action(format!(
                    "Abandoning keycodes file \"{}\"",
                    file.display_name()
                ));
                break;
            }
        }
        Ok(())
    }

    /// Resolves one include link and compiles it into a fresh state.
    /// `None` means the include failed and has been reported.
    fn compile_link(&mut self, link: &IncludeLink) -> Result<Option<(KeyNamesInfo, MergeMode)>> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            self.ctx.diag.error(format!(
                "Exceeded include depth threshold ({})",
                MAX_INCLUDE_DEPTH
            ));
            self.ctx
                .diag
                .action(format!("Ignoring include of \"{}\"", link.describe()));
            return Ok(None);
        }

        let Some((file, merge)) = self.resolver.resolve(self.ctx, link, FileType::Keycodes) else {
            return Ok(None);
        };

        let mut included = KeyNamesInfo::new(file.id);
        self.depth += 1;
        let handled = self.handle_file(&file, MergeMode::Override, &mut included);
        self.depth -= 1;
        handled?;

        let merge = match merge {
            MergeMode::Default => MergeMode::Override,
            other => other,
        };
        Ok(Some((included, merge)))
    }

    fn use_computed_names(&mut self, info: &mut KeyNamesInfo) {
        self.keymap.auto_key_names = true;
        info.explicit_min = 0;
        info.explicit_max = KEYCODE_MAX;
    }

    /// `include "evdev+aliases(qwerty)"`. The links are folded left to
    /// right into one state, which is then merged into `info`. A self link
    /// stands for whatever `info` held when the directive was reached.
    fn handle_include(&mut self, stmt: &IncludeStmt, info: &mut KeyNamesInfo) -> Result<bool> {
        let Some(first) = stmt.first() else {
            return Ok(true);
        };

        let caller_file_id = info.file_id;
        let caller_merge = info.merge;
        let mut have_self = false;
        let mut new_merge = MergeMode::Override;

        let mut included = if first.is_self() {
            have_self = true;
            std::mem::take(info)
        } else if first.file.as_deref() == Some(COMPUTED_FILE) {
            self.use_computed_names(info);
            return Ok(info.error_count == 0);
        } else {
            match self.compile_link(first)? {
                Some((mut sub, merge)) => {
                    if let Some(label) = &stmt.stmt {
                        sub.name = Some(label.clone());
                    }
                    new_merge = merge;
                    sub
                }
                None => {
                    info.error_count += INCLUDE_FAILURE_PENALTY;
                    return Ok(false);
                }
            }
        };

        if included.error_count < 1 {
            for link in stmt.links.iter().skip(1) {
                if link.is_self() {
                    have_self = true;
                    let current = std::mem::take(info);
                    included.merge_included(self.ctx, current, link.merge)?;
                } else if link.file.as_deref() == Some(COMPUTED_FILE) {
                    self.use_computed_names(&mut included);
                } else {
                    match self.compile_link(link)? {
                        Some((sub, op)) => included.merge_included(self.ctx, sub, op)?,
                        None => {
                            info.error_count += INCLUDE_FAILURE_PENALTY;
                            return Ok(false);
                        }
                    }
                }
            }
        }

        if have_self {
            *info = included;
            info.file_id = caller_file_id;
            info.merge = caller_merge;
        } else {
            info.merge_included(self.ctx, included, new_merge)?;
        }
        Ok(info.error_count == 0)
    }
}

impl KeyNamesInfo {
    /// Folds a finished sub-state into `self`. A sub-state with errors
    /// contributes only its error count.
    pub fn merge_included(
        &mut self,
        ctx: &mut Context,
        from: KeyNamesInfo,
        merge: MergeMode,
    ) -> Result<()> {
        if from.error_count > 0 {
            self.error_count += from.error_count;
            return Ok(());
        }

        if self.name.is_none() {
            self.name = from.name.clone();
        }

        if from.has_keys() {
            self.resize(from.computed_max)?;
            for (kc, name) in from.bound_keys() {
                let file_id = from.file_at(kc);
                self.add_key_name(&mut ctx.diag, kc, name, merge, file_id, false)?;
            }
        }

        self.leds
            .merge_from(&mut ctx.diag, &ctx.atoms, from.leds, merge);
        self.aliases.merge_from(&mut ctx.diag, from.aliases, merge);

        if from.explicit_min != 0 && (self.explicit_min == 0 || self.explicit_min > from.explicit_min) {
            self.explicit_min = from.explicit_min;
        }
        if from.explicit_max != 0 && (self.explicit_max == 0 || self.explicit_max < from.explicit_max) {
            self.explicit_max = from.explicit_max;
        }
        Ok(())
    }
}
