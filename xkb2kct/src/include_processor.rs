use crate::errors::Result;
use crate::parser::Parser;
use keycodes_core::ast::{select_map, FileType, IncludeLink, XkbFile};
use keycodes_core::resolver::accept_resolved;
use keycodes_core::{Context, IncludeResolver, MergeMode};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads source text, dropping a UTF-8 BOM if present
pub fn read_source(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Parses every section of the file at `path`
pub fn load_sections(ctx: &mut Context, path: &Path) -> Result<Vec<XkbFile>> {
    let content = read_source(path)?;
    let name = path.file_name().and_then(|n| n.to_str());
    Parser::new(&content).parse(ctx, name)
}

/// Resolves include links against a list of XKB data directories.
///
/// A link `evdev` for a keycodes include is looked up as
/// `<dir>/keycodes/evdev`, then `<dir>/evdev`, for each directory in order.
#[derive(Debug, Default)]
pub struct FsResolver {
    include_dirs: Vec<PathBuf>,
}

impl FsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.include_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.include_dirs
            .extend(dirs.into_iter().map(|d| d.as_ref().to_path_buf()));
        self
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn find_file(&self, name: &str, file_type: FileType) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }

        let type_dir = file_type.to_string();
        self.include_dirs
            .iter()
            .flat_map(|dir| [dir.join(&type_dir).join(name), dir.join(name)])
            .find(|candidate| candidate.is_file())
    }
}

impl IncludeResolver for FsResolver {
    fn resolve(
        &mut self,
        ctx: &mut Context,
        link: &IncludeLink,
        file_type: FileType,
    ) -> Option<(XkbFile, MergeMode)> {
        let name = link.file.as_deref()?;

        let Some(path) = self.find_file(name, file_type) else {
            ctx.diag
                .error(format!("Can't find file \"{}\" for {} include", name, file_type));
            ctx.diag.action("Exiting");
            return None;
        };
        debug!("Including {} from {}", link.describe(), path.display());

        let maps = match load_sections(ctx, &path) {
            Ok(maps) => maps,
            Err(e) => {
                ctx.diag.error(format!(
                    "Error interpreting include file \"{}\": {}",
                    path.display(),
                    e
                ));
                return None;
            }
        };

        let Some(file) = select_map(maps, link.map.as_deref()) else {
            ctx.diag.error(format!(
                "No map named \"{}\" in \"{}\"",
                link.map.as_deref().unwrap_or("(default)"),
                name
            ));
            return None;
        };
        accept_resolved(ctx, link, file, file_type)
    }
}
