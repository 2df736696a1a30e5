//! Compiler for `xkb_keycodes` sections: builds a table of key names,
//! indicator names and aliases from a parsed section and its includes, then
//! installs it into a [`Keymap`].

pub mod info;
pub mod indicators;
pub mod aliases;
pub mod include;

pub use aliases::{AliasInfo, Aliases};
pub use include::{KeycodesCompiler, MAX_ERRORS, MAX_INCLUDE_DEPTH};
pub use indicators::{IndicatorNameInfo, IndicatorNames};
pub use info::KeyNamesInfo;

use crate::ast::XkbFile;
use crate::context::Context;
use crate::keymap::{Key, Keymap};
use crate::resolver::IncludeResolver;
use crate::types::{KeycodesError, MergeMode, Result};
use log::debug;

/// Compiles `file` and installs the result into `keymap`. Nothing is
/// installed when the section had errors.
pub fn compile_keycodes(
    ctx: &mut Context,
    resolver: &mut dyn IncludeResolver,
    file: &XkbFile,
    keymap: &mut Keymap,
    merge: MergeMode,
) -> Result<()> {
    let mut info = KeyNamesInfo::new(file.id);
    KeycodesCompiler::new(ctx, resolver, keymap).handle_file(file, merge, &mut info)?;

    if info.error_count != 0 {
        return Err(KeycodesError::Compile {
            section: file.display_name().to_string(),
            errors: info.error_count,
        });
    }

    install(ctx, info, keymap)
}

fn install(ctx: &mut Context, info: KeyNamesInfo, keymap: &mut Keymap) -> Result<()> {
    keymap.min_key_code = if info.explicit_min > 0 {
        info.explicit_min
    } else {
        info.computed_min
    };
    keymap.max_key_code = if info.explicit_max > 0 {
        info.explicit_max
    } else {
        info.computed_max
    };

    let len = keymap.max_key_code as usize + 1;
    keymap.keys.clear();
    keymap
        .keys
        .try_reserve(len)
        .map_err(|_| KeycodesError::OutOfMemory { requested: len })?;
    keymap.keys.resize(len, Key::default());

    for (kc, name) in info.bound_keys() {
        if kc < keymap.min_key_code || kc > keymap.max_key_code {
            ctx.diag.warn(format!(
                "Key {} ({}) lies outside the keycode range {}-{}",
                name, kc, keymap.min_key_code, keymap.max_key_code
            ));
            ctx.diag.action("Key name ignored");
            continue;
        }
        keymap.keys[kc as usize].name = name;
    }

    keymap.keycodes_section_name = info.name.clone();

    for led in info.leds.iter() {
        keymap.indicator_names[led.ndx - 1] = ctx.atoms.text(led.name).map(str::to_string);
    }

    info.aliases.apply(&mut ctx.diag, keymap);

    debug!(
        "Installed keycodes {}: range {}-{}, {} aliases",
        keymap.keycodes_section_name.as_deref().unwrap_or("(unnamed)"),
        keymap.min_key_code,
        keymap.max_key_code,
        keymap.key_aliases.len()
    );
    Ok(())
}
