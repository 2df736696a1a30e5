use std::fs;
use xkb2kct::*;

mod common;
use common::*;

#[test]
fn test_conversion_writes_table() {
    let root = scratch_dir("convert");
    let input = write_file(
        &root,
        "small",
        &keycodes_section("small", "minimum = 8; maximum = 10; <ESC> = 9; alias <ESCP> = <ESC>;"),
    );
    let output = root.join("small.kct");

    let result = convert_xkb_to_kct(&input, &output, &CompileOptions::new());
    assert!(result.is_ok(), "Conversion failed: {:?}", result);

    let data = fs::read(&output).expect("Failed to read output");
    let expected = concat!(
        "584b424b", "0100",           // magic, version 1.0
        "08000000", "0a000000",       // min 8, max 10
        "01000000", "0100", "00", "02", // 1 key, 1 alias, 0 indicators, named
        "0500", "736d616c6c",         // "small"
        "09000000", "45534300",       // 9 = <ESC>
        "45534350", "45534300",       // <ESCP> -> <ESC>
    );
    assert_eq!(hex::encode(&data), expected);

    let keymap = KctLoader::load(&data).unwrap();
    assert_eq!(keymap.resolve_key(KeyName::new("ESCP")), Some(9));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_indicators_and_flags_encoded() {
    let source = keycodes_section("leds", r#"include "computed" <CAPS> = 66; indicator 2 = "Num";"#);
    let keymap = compile_keycodes_str(&source, &CompileOptions::new()).unwrap();

    let mut buffer = Vec::new();
    binary::KctWriter::new(&mut buffer).write_keymap(&keymap).unwrap();

    assert_eq!(buffer[20], 1, "one indicator");
    assert_eq!(buffer[21], 0x03, "auto key names and section name flags");
    assert_eq!(hex::encode(&buffer[buffer.len() - 6..]), "0203004e756d");

    let loaded = KctLoader::load(&buffer).unwrap();
    assert_eq!(loaded, keymap);
}

#[test]
fn test_failed_compile_writes_nothing() {
    let root = scratch_dir("failed");
    let input = write_file(&root, "bad", &keycodes_section("bad", "indicator 0 = \"Zero\";"));
    let output = root.join("bad.kct");

    assert!(convert_xkb_to_kct(&input, &output, &CompileOptions::new()).is_err());
    assert!(!output.exists());

    let _ = fs::remove_dir_all(&root);
}
