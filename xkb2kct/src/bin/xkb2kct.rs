use clap::Parser;
use std::path::PathBuf;
use xkb2kct::{convert_xkb_to_kct, CompileOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "XKB keycodes to KCT table converter", long_about = None)]
struct Args {
    /// Input XKB keycodes file path
    input: PathBuf,

    /// Output KCT file path (defaults to input with .kct extension)
    output: Option<PathBuf>,

    /// XKB data directory to search for includes (repeatable)
    #[arg(short = 'I', long = "include")]
    include_dirs: Vec<PathBuf>,

    /// Warning level, 0 (quiet) to 10 (everything)
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
    warning_level: u8,

    /// Name of the section to compile
    #[arg(short, long)]
    map: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    // Determine output path
    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("kct");
        path
    });

    let options = CompileOptions {
        include_dirs: args.include_dirs,
        warning_level: args.warning_level,
        map: args.map,
    };

    if args.verbose {
        println!("Converting {} to {}", args.input.display(), output_path.display());
    }

    match convert_xkb_to_kct(&args.input, &output_path, &options) {
        Ok(()) => {
            if args.verbose {
                println!("Conversion successful!");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
