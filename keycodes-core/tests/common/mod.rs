use keycodes_core::ast::{
    ExprDef, IncludeStmt, IndicatorNameDef, KeyAliasDef, KeycodeDef, VarDef,
};
use keycodes_core::{
    compile_keycodes, Context, FileType, Keymap, KeycodesError, MapFlags, MemoryResolver,
    MergeMode, Stmt, StmtList, XkbFile,
};

/// Creates a keycodes section from statements
pub fn section(ctx: &mut Context, name: &str, stmts: Vec<Stmt>) -> XkbFile {
    XkbFile::new(
        ctx,
        FileType::Keycodes,
        Some(name.to_string()),
        StmtList::from(stmts),
        MapFlags::empty(),
    )
}

/// `<name> = value;`
pub fn key(name: &str, value: u64) -> Stmt {
    KeycodeDef::new(name, value).into()
}

/// `<name> = value;` with a merge prefix
#[allow(dead_code)]
pub fn key_with(merge: MergeMode, name: &str, value: u64) -> Stmt {
    let mut def = KeycodeDef::new(name, value);
    def.merge = merge;
    def.into()
}

/// `alias <alias> = <real>;`
#[allow(dead_code)]
pub fn alias(alias: &str, real: &str) -> Stmt {
    KeyAliasDef::new(alias, real).into()
}

/// `indicator ndx = "name";`
#[allow(dead_code)]
pub fn indicator(ndx: i64, name: &str) -> Stmt {
    IndicatorNameDef::new(ndx, ExprDef::string(name), false).into()
}

/// `minimum = value;` / `maximum = value;`
#[allow(dead_code)]
pub fn bound(field: &str, value: i64) -> Stmt {
    VarDef::new(ExprDef::ident(field), ExprDef::int(value)).into()
}

/// `include "text";`
#[allow(dead_code)]
pub fn include(text: &str) -> Stmt {
    IncludeStmt::parse(text, MergeMode::Default)
        .expect("valid include")
        .into()
}

/// Compiles `file` into a fresh keymap with override merge
pub fn compile(
    ctx: &mut Context,
    resolver: &mut MemoryResolver,
    file: &XkbFile,
) -> Result<Keymap, KeycodesError> {
    let mut keymap = Keymap::new();
    compile_keycodes(ctx, resolver, file, &mut keymap, MergeMode::Override)?;
    Ok(keymap)
}

/// Registers a single-section file with the resolver
#[allow(dead_code)]
pub fn add_single(ctx: &mut Context, resolver: &mut MemoryResolver, name: &str, stmts: Vec<Stmt>) {
    let file = section(ctx, name, stmts);
    resolver.add_file(name, vec![file]);
}
