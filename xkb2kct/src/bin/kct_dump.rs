use anyhow::{bail, Context, Result};
use xkb2kct::KctLoader;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        bail!("Usage: {} <kct_file>", args[0]);
    }

    let data = std::fs::read(&args[1]).with_context(|| format!("Failed to read {}", args[1]))?;
    let keymap = KctLoader::load(&data).with_context(|| format!("Failed to load {}", args[1]))?;

    println!(
        "Section: {}",
        keymap.keycodes_section_name.as_deref().unwrap_or("(unnamed)")
    );
    println!("Range: {}-{}", keymap.min_key_code, keymap.max_key_code);
    if keymap.auto_key_names {
        println!("Computed key names: yes");
    }

    println!("\n=== KEYS ===");
    for kc in keymap.min_key_code..=keymap.max_key_code {
        if let Some(name) = keymap.key_name(kc) {
            println!("{:<8} = {};", name.to_string(), kc);
        }
    }

    if !keymap.key_aliases.is_empty() {
        println!("\n=== ALIASES ===");
        for alias in &keymap.key_aliases {
            println!("alias {} = {};", alias.alias, alias.real);
        }
    }

    let indicators: Vec<_> = (1..=keymap.indicator_names.len())
        .filter_map(|i| keymap.indicator_name(i).map(|n| (i, n)))
        .collect();
    if !indicators.is_empty() {
        println!("\n=== INDICATORS ===");
        for (index, name) in indicators {
            println!("indicator {} = \"{}\";", index, name);
        }
    }

    Ok(())
}
