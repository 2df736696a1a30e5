use crate::ast::{select_map, FileType, IncludeLink, XkbFile};
use crate::context::Context;
use crate::types::MergeMode;
use std::collections::HashMap;

/// Locates and parses the file an include link refers to.
///
/// Implementations report their own failures through `ctx.diag` and return
/// `None`; the compiler treats that as a failed include.
pub trait IncludeResolver {
    fn resolve(
        &mut self,
        ctx: &mut Context,
        link: &IncludeLink,
        file_type: FileType,
    ) -> Option<(XkbFile, MergeMode)>;
}

/// Checks a resolved section against the expected type and returns it with
/// the link's merge operator
pub fn accept_resolved(
    ctx: &mut Context,
    link: &IncludeLink,
    file: XkbFile,
    file_type: FileType,
) -> Option<(XkbFile, MergeMode)> {
    if file.file_type != file_type {
        ctx.diag.error(format!(
            "Include file \"{}\" has wrong type (expected {}, got {})",
            link.describe(),
            file_type,
            file.file_type
        ));
        ctx.diag.action("Include file ignored");
        return None;
    }
    Some((file, link.merge))
}

/// Resolver over source files already parsed into memory, keyed by file name
#[derive(Debug, Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<XkbFile>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, maps: Vec<XkbFile>) {
        self.files.insert(name.into(), maps);
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(
        &mut self,
        ctx: &mut Context,
        link: &IncludeLink,
        file_type: FileType,
    ) -> Option<(XkbFile, MergeMode)> {
        let name = link.file.as_deref()?;
        let Some(maps) = self.files.get(name) else {
            ctx.diag.error(format!("Can't find file \"{}\" for {} include", name, file_type));
            ctx.diag.action("Exiting");
            return None;
        };

        let Some(mut file) = select_map(maps.clone(), link.map.as_deref()) else {
            ctx.diag.error(format!(
                "No map named \"{}\" in \"{}\"",
                link.map.as_deref().unwrap_or("(default)"),
                name
            ));
            return None;
        };
        // fresh provenance per inclusion
        file.id = ctx.take_file_id();
        accept_resolved(ctx, link, file, file_type)
    }
}
