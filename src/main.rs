use anyhow::{Context, Result};
use clap::Parser;
use fgeval::output::{DirectorySink, ScorecardSink};
use fgeval::scoring::{Binarization, ResizeFilter, ScorecardStyle, SegmentationScorer};
use fgeval::source::{DirectoryPairs, Pairing};
use fgeval::{run_pipeline, FailurePolicy, PipelineOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing ground truth masks
    #[arg(long, default_value = "GT")]
    ground_truth: PathBuf,

    /// Directory containing predicted foreground masks
    #[arg(long, default_value = "FG")]
    foreground: PathBuf,

    /// Directory where per-frame scorecards are written (created if absent)
    #[arg(long, default_value = "SC")]
    scorecards: PathBuf,

    /// Do not write scorecards
    #[arg(long)]
    no_scorecards: bool,

    /// Write scorecards as PNG regardless of the ground truth file format
    #[arg(long)]
    png: bool,

    /// How foreground files are matched to ground truth files
    #[arg(long, value_enum, default_value_t = Pairing::Name)]
    pairing: Pairing,

    /// Binarize both masks with value >= THRESHOLD as foreground.
    /// Without it, only exact 0/255 values are classified and anything else
    /// is counted as unknown
    #[arg(long)]
    threshold: Option<u8>,

    /// Resampling used when a foreground mask differs in size from its ground truth
    #[arg(long, value_enum, default_value_t = ResizeFilter::Nearest)]
    resize_filter: ResizeFilter,

    /// Scorecard color scheme
    #[arg(long, value_enum, default_value_t = ScorecardStyle::Falsecolor)]
    style: ScorecardStyle,

    /// What to do with a frame that cannot be loaded or written
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    on_error: FailurePolicy,

    /// Worker threads for loading and classifying frames
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,

    /// Save the final report (.json for JSON, anything else for text)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("fgeval starting");

    let binarization = match args.threshold {
        Some(t) => Binarization::Threshold(t),
        None => Binarization::Strict,
    };
    let options = PipelineOptions {
        scorer: SegmentationScorer::new(binarization, args.resize_filter, args.style),
        on_error: args.on_error,
        jobs: args.jobs as usize,
    };

    let source = DirectoryPairs::new(&args.ground_truth, &args.foreground, args.pairing)
        .context("Failed to pair mask files")?;

    // Initialize output unless disabled
    let mut sink = if args.no_scorecards {
        tracing::info!("Scorecard output disabled");
        None
    } else {
        Some(
            DirectorySink::new(&args.scorecards)
                .context("Failed to initialize scorecard output")?
                .force_png(args.png),
        )
    };

    let summary = run_pipeline(
        &source,
        sink.as_mut().map(|s| s as &mut dyn ScorecardSink),
        &options,
    )?;

    let report = summary.report();
    println!("Score:");
    print!("{}", report.render_text());

    if let Some(path) = &args.report {
        report.save(path)?;
    }

    Ok(())
}
