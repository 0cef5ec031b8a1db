use clap::{Parser, ValueEnum};
use modplay::export::{export_to_wav, ExportConfig};
use modplay::{Module, PanLaw, PlayerConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PanArg {
    Legacy,
    Amiga,
}

impl From<PanArg> for PanLaw {
    fn from(arg: PanArg) -> Self {
        match arg {
            PanArg::Legacy => PanLaw::Legacy,
            PanArg::Amiga => PanLaw::Amiga,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "modplay")]
#[command(version = "0.1.0")]
#[command(about = "Render ProTracker MOD files to WAV", long_about = None)]
struct Args {
    /// Input MOD file (optionally gzipped)
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long, required_unless_present = "info")]
    output: Option<PathBuf>,

    /// Output sample rate in Hz
    #[arg(short, long, default_value_t = 44_100)]
    rate: u32,

    /// Seconds of audio to render
    #[arg(short, long, default_value_t = 60.0)]
    seconds: f32,

    /// Stereo panning law
    #[arg(long, value_enum, default_value_t = PanArg::Legacy)]
    pan_law: PanArg,

    /// Print module information
    #[arg(long)]
    info: bool,
}

fn print_info(module: &Module) {
    println!("Title:     {}", module.title);
    println!("Channels:  {}", module.channel_count);
    println!(
        "Positions: {} (restart at {})",
        module.position_count, module.position_loop_point
    );
    println!("Patterns:  {}", module.pattern_count);
    println!("Samples:   {} bytes", module.sample_bytes());
    for (i, sample) in module.samples.iter().enumerate() {
        if sample.name.is_empty() && sample.length == 0 {
            continue;
        }
        println!(
            "  {:2} {:22} len={:6} vol={:2} ft={:2} loop={}+{}",
            i + 1,
            sample.name,
            sample.length,
            sample.volume,
            sample.finetune,
            sample.repeat_offset,
            sample.repeat_length
        );
    }
}

fn main() -> Result<(), modplay::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let module = modplay::format::load_file(&args.input)?;

    if args.info {
        print_info(&module);
    }

    if let Some(output) = &args.output {
        let config = ExportConfig::default()
            .sample_rate(args.rate)
            .duration(args.seconds)
            .player(PlayerConfig::default().pan_law(args.pan_law.into()));
        export_to_wav(&module, output, config)?;
    }

    Ok(())
}
