//! Compiling keycodes source text end to end

mod common;
use common::*;

use pretty_assertions::assert_eq;
use xkb2kct::*;

fn compile(body: &str) -> Result<Keymap> {
    compile_keycodes_str(&keycodes_section("test", body), &CompileOptions::new())
}

#[test]
fn test_plain_keys() {
    let keymap = compile("<ESC> = 9; <TAB> = 23;").unwrap();
    assert_eq!((keymap.min_key_code, keymap.max_key_code), (9, 23));
    assert_eq!(keymap.key_name(9), Some(KeyName::new("ESC")));
    assert_eq!(keymap.key_name(23), Some(KeyName::new("TAB")));
    assert_eq!((9..=23).filter(|&kc| keymap.key_name(kc).is_some()).count(), 2);
}

#[test]
fn test_redefined_keycode_takes_new_name() {
    let mut ctx = Context::new(1);
    let source = keycodes_section("dup", "<A> = 5; <B> = 5;");
    let keymap = compile_keycodes_with(
        &mut ctx,
        &source,
        None,
        &mut MemoryResolver::new(),
        &CompileOptions::new(),
    )
    .unwrap();

    assert_eq!(keymap.key_name(5), Some(KeyName::new("B")));
    assert!(ctx.diag.contains(Severity::Warning, "Multiple names for keycode 5"));
}

#[test]
fn test_single_code_range() {
    let keymap = compile("minimum = 8; maximum = 8; <X> = 8;").unwrap();
    assert_eq!((keymap.min_key_code, keymap.max_key_code), (8, 8));
}

#[test]
fn test_bounds_from_expressions() {
    let keymap = compile("minimum = 4 * 2; maximum = 0xff; <ESC> = 9;").unwrap();
    assert_eq!((keymap.min_key_code, keymap.max_key_code), (8, 255));
    assert_eq!(keymap.keys.len(), 256);
}

#[test]
fn test_rejected_minimum_fails_compile() {
    let err = compile("<X> = 5; minimum = 20;").unwrap_err();
    assert!(matches!(err, KctError::Compile(KeycodesError::Compile { errors: 1, .. })));
}

#[test]
fn test_overflowing_bound_is_rejected() {
    let err = compile("minimum = -(-9223372036854775807 - 1); <ESC> = 9;").unwrap_err();
    assert!(matches!(err, KctError::Compile(KeycodesError::Compile { errors: 1, .. })));
}

#[test]
fn test_indicator_names_concatenate() {
    let keymap = compile(r#"<CAPS> = 66; indicator 1 = "Caps" + " Lock";"#).unwrap();
    assert_eq!(keymap.indicator_name(1), Some("Caps Lock"));
}

#[test]
fn test_symbol_definitions_rejected() {
    let mut ctx = Context::new(0);
    let source = keycodes_section(
        "odd",
        "<ESC> = 9; virtual_modifiers NumLock; interpret Num_Lock { virtualModifier = NumLock; };",
    );
    let err = compile_keycodes_with(
        &mut ctx,
        &source,
        None,
        &mut MemoryResolver::new(),
        &CompileOptions::new(),
    )
    .unwrap_err();

    assert!(matches!(err, KctError::Compile(KeycodesError::Compile { errors: 2, .. })));
    assert!(ctx.diag.contains(Severity::Action, "Ignoring definition of virtual modifiers"));
    assert!(ctx.diag.contains(Severity::Action, "Ignoring definition of a symbol interpretation"));
}

#[test]
fn test_map_selection() {
    let source = r#"
xkb_keycodes "first" { <ONE> = 1; };
default xkb_keycodes "second" { <TWO> = 2; };
xkb_keycodes "third" { <THRE> = 3; };
"#;
    let keymap = compile_keycodes_str(source, &CompileOptions::new()).unwrap();
    assert_eq!(keymap.keycodes_section_name.as_deref(), Some("second"));

    let keymap = compile_keycodes_str(source, &CompileOptions::new().with_map("third")).unwrap();
    assert_eq!(keymap.key_name(3), Some(KeyName::new("THRE")));

    let err = compile_keycodes_str(source, &CompileOptions::new().with_map("fourth")).unwrap_err();
    assert!(matches!(err, KctError::NoSection(_)));
}

#[test]
fn test_keymap_wrapper() {
    let source = r#"
xkb_keymap {
    xkb_keycodes "inner" { <ESC> = 9; alias <ESCP> = <ESC>; };
    xkb_types "basic" { virtual_modifiers NumLock; };
};
"#;
    let keymap = compile_keycodes_str(source, &CompileOptions::new()).unwrap();
    assert_eq!(keymap.resolve_key(KeyName::new("ESCP")), Some(9));
}

#[test]
fn test_computed_names() {
    let keymap = compile(r#"include "computed" <ESC> = 9;"#).unwrap();
    assert!(keymap.auto_key_names);
    assert_eq!(keymap.max_key_code, KEYCODE_MAX);
}
