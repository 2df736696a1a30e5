pub mod lexer;
pub mod parser;
pub mod binary;
pub mod errors;
pub mod include_processor;

pub use keycodes_core::*;
pub use errors::{KctError, Result};
pub use include_processor::FsResolver;

use include_processor::read_source;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Settings for one compile run
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// XKB data directories searched for includes, in order
    pub include_dirs: Vec<PathBuf>,
    /// 0 (quiet) to 10 (everything)
    pub warning_level: u8,
    /// Section to compile when the input holds several
    pub map: Option<String>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.include_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_warning_level(mut self, level: u8) -> Self {
        self.warning_level = level;
        self
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }
}

/// Picks the keycodes section to compile: the named one, else the default,
/// else the first
pub fn select_keycodes_section(files: Vec<XkbFile>, map: Option<&str>) -> Result<XkbFile> {
    let keycodes: Vec<XkbFile> = files
        .into_iter()
        .filter(|f| f.file_type == FileType::Keycodes)
        .collect();
    ast::select_map(keycodes, map).ok_or_else(|| {
        KctError::NoSection(map.map_or_else(|| "(default)".to_string(), |m| format!("\"{}\"", m)))
    })
}

/// Parses and compiles keycodes source with an explicit context, so the
/// caller can inspect the diagnostics afterwards
pub fn compile_keycodes_with(
    ctx: &mut Context,
    input: &str,
    file_name: Option<&str>,
    resolver: &mut dyn IncludeResolver,
    options: &CompileOptions,
) -> Result<Keymap> {
    let files = parser::Parser::new(input).parse(ctx, file_name)?;
    let section = select_keycodes_section(files, options.map.as_deref())?;

    let mut keymap = Keymap::new();
    compile_keycodes(ctx, resolver, &section, &mut keymap, MergeMode::Override)?;
    Ok(keymap)
}

pub fn compile_keycodes_str(input: &str, options: &CompileOptions) -> Result<Keymap> {
    let mut ctx = Context::new(options.warning_level);
    let mut resolver = FsResolver::new().with_include_dirs(&options.include_dirs);
    compile_keycodes_with(&mut ctx, input, None, &mut resolver, options)
}

pub fn compile_keycodes_file(input_path: &Path, options: &CompileOptions) -> Result<Keymap> {
    let input = read_source(input_path)?;

    // Includes next to the input are found after the configured directories
    let mut resolver = FsResolver::new().with_include_dirs(&options.include_dirs);
    if let Some(parent) = input_path.parent() {
        resolver = resolver.with_include_dir(parent);
    }

    let mut ctx = Context::new(options.warning_level);
    let file_name = input_path.file_name().and_then(|n| n.to_str());
    compile_keycodes_with(&mut ctx, &input, file_name, &mut resolver, options)
}

pub fn convert_xkb_to_kct(input_path: &Path, output_path: &Path, options: &CompileOptions) -> Result<()> {
    let keymap = compile_keycodes_file(input_path, options)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    binary::KctWriter::new(writer).write_keymap(&keymap)?;

    info!(
        "Wrote {} ({} keys, {} aliases)",
        output_path.display(),
        (keymap.min_key_code..=keymap.max_key_code)
            .filter(|&kc| keymap.key_name(kc).is_some())
            .count(),
        keymap.key_aliases.len()
    );
    Ok(())
}
