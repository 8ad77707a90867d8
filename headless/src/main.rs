use clap::Parser;
use headless::{HeadlessOptions, RunSettings};
use shared::water::WavePreset;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Runs the wave simulation without a window", long_about = None)]
struct Args {
    /// RON wave config; overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// demo, hills or still; defaults to the saved waves.ron, then demo
    #[arg(short, long)]
    preset: Option<WavePreset>,

    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    #[arg(short = 'r', long, default_value_t = 60.0)]
    frame_rate: f64,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Where to write the final height field
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[arg(short, long, default_value_t = 60)]
    log_every: u64,
}

fn main() {
    let args = Args::parse();

    if !args.frame_rate.is_finite() || args.frame_rate <= 0.0 {
        eprintln!("Error: frame_rate must be a positive number.");
        eprintln!("Got: {}", args.frame_rate);
        std::process::exit(1);
    }
    if args.frames == 0 {
        eprintln!("Error: frames must be at least 1.");
        std::process::exit(1);
    }

    let exit = headless::init(HeadlessOptions {
        config_path: args.config,
        preset: args.preset,
        seed: args.seed,
        frame_rate: args.frame_rate,
        run: RunSettings {
            frames: args.frames,
            log_every: args.log_every,
            snapshot_path: args.snapshot,
        },
    });

    if exit.is_error() {
        std::process::exit(1);
    }
}
