use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use photomask::{run, CompositeMode, PairOutcome, PairReport, RunConfig};

#[derive(Parser)]
#[command(
    name = "photomask",
    about = "Batch-composite main/mask image pairs via alpha cutout or darken blending",
    version,
    after_help = "Pairs are matched by base name: photo_main.png + photo_mask.png.\n\
                  Composite output is written as {base}_{mode}.png; extract mode\n\
                  writes one object_{n}.png per connected mask region."
)]
struct Cli {
    /// Directory containing *_main.png / *_mask.png pairs
    input_dir: PathBuf,

    /// Directory receiving the outputs (created if missing)
    output_dir: PathBuf,

    /// Pixel-combination mode
    #[arg(short, long, value_enum, default_value = "cutout")]
    mode: Mode,

    /// Suppress per-pair output, print only warnings, failures and the summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Mask luminance becomes output transparency
    Cutout,
    /// Per-channel minimum of main and mask, fully opaque
    Darken,
    /// One cropped, alpha-matted file per connected mask region
    Extract,
}

impl From<Mode> for CompositeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Cutout => CompositeMode::Cutout,
            Mode::Darken => CompositeMode::Darken,
            Mode::Extract => CompositeMode::ExtractObjects,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.input_dir.is_dir() {
        eprintln!(
            "Error: input path is not a directory: {}",
            cli.input_dir.display()
        );
        process::exit(1);
    }

    let config = RunConfig {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        mode: cli.mode.into(),
    };

    if !cli.quiet {
        eprintln!(
            "Processing pairs in {} mode; leave the output directory alone until the run completes.",
            config.mode.label()
        );
        eprintln!();
    }

    let report = match run(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    for pair in &report.pairs {
        print_pair(pair, cli.quiet);
    }

    if !cli.quiet || report.failed() > 0 {
        eprintln!();
        eprintln!("[Summary] {}", report.summary());
    }

    if report.failed() > 0 {
        process::exit(1);
    }
}

fn print_pair(pair: &PairReport, quiet: bool) {
    match &pair.outcome {
        PairOutcome::Written(path) => {
            if !quiet {
                eprintln!("[OK] {}: wrote {}", pair.key, path.display());
            }
        }
        PairOutcome::ObjectsWritten(count) => {
            if !quiet {
                eprintln!("[OK] {}: extracted {count} object(s)", pair.key);
            }
        }
        PairOutcome::NoMaskFound => {
            eprintln!("[WARN] {}: no mask found", pair.key);
        }
        PairOutcome::Failed(e) => {
            eprintln!("[FAIL] {}: {e}", pair.key);
        }
    }
}
