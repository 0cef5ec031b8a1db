//! MOD to JSON converter

use clap::Parser;
use modplay::format::{load_file, ModuleJson};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mod2json")]
#[command(version = "0.1.0")]
#[command(about = "Dump MOD files as JSON", long_about = None)]
struct Args {
    /// Input MOD file (optionally gzipped)
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,

    /// Include the non-empty cells of every pattern
    #[arg(short, long)]
    patterns: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let module = load_file(&args.input)?;
    let module_json = ModuleJson::new(&module, args.patterns);

    let json_string = if args.compact {
        serde_json::to_string(&module_json)?
    } else {
        serde_json::to_string_pretty(&module_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
