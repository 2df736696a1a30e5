use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Creates an empty scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("xkb2kct_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

/// Writes `content` to `dir/relative`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// Wraps declarations in a single keycodes section
#[allow(dead_code)]
pub fn keycodes_section(name: &str, body: &str) -> String {
    format!("xkb_keycodes \"{}\" {{\n{}\n}};\n", name, body)
}
