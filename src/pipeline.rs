use crate::error::EvalError;
use crate::output::{Report, ScorecardSink};
use crate::scoring::{metrics, ConfusionCounts, FrameCounts, Scorecard, SegmentationScorer};
use crate::source::{FramePair, FramePairSource};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// What to do when a frame cannot be loaded or its scorecard cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Leave the frame out of the totals and keep going
    #[default]
    Skip,
    /// Stop the run with the frame's error
    Abort,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub scorer: SegmentationScorer,
    pub on_error: FailurePolicy,
    /// Worker threads used to load and classify frames; 1 runs everything inline
    pub jobs: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scorer: SegmentationScorer::default(),
            on_error: FailurePolicy::Skip,
            jobs: 1,
        }
    }
}

/// Totals of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub counts: ConfusionCounts,
    pub frames_scored: usize,
    pub frames_skipped: usize,
}

impl RunSummary {
    pub fn report(&self) -> Report {
        Report::new(self.counts, self.frames_scored, self.frames_skipped)
    }
}

struct ScoredFrame {
    scorecard: Scorecard,
    counts: FrameCounts,
    load_time: Duration,
    score_time: Duration,
}

fn score_frame<S>(
    source: &S,
    scorer: &SegmentationScorer,
    pair: &FramePair,
) -> Result<ScoredFrame, EvalError>
where
    S: FramePairSource + ?Sized,
{
    let load_start = Instant::now();
    let loaded = source.load(pair)?;
    let load_time = load_start.elapsed();

    let score_start = Instant::now();
    let (scorecard, counts) =
        scorer.classify_frame_pair(&loaded.ground_truth, &loaded.predicted);
    let score_time = score_start.elapsed();

    Ok(ScoredFrame {
        scorecard,
        counts,
        load_time,
        score_time,
    })
}

/// Score every frame pair of `source`, writing scorecards to `sink` if given.
///
/// Frames are classified in chunks; with `jobs > 1` each chunk is classified
/// on a rayon pool. Counts are always merged in source order, and a frame
/// only reaches the running total once it was loaded, classified and (if a
/// sink is present) written.
pub fn run_pipeline<S>(
    source: &S,
    mut sink: Option<&mut dyn ScorecardSink>,
    options: &PipelineOptions,
) -> Result<RunSummary>
where
    S: FramePairSource + ?Sized,
{
    let pairs = source.pairs();
    let jobs = options.jobs.max(1);
    let scorer = options.scorer;

    let pool = if jobs > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("Failed to build scoring thread pool")?,
        )
    } else {
        None
    };
    let chunk_size = if jobs > 1 { jobs * 4 } else { 1 };

    tracing::info!(
        "Scoring {} frame pairs with {} worker(s), binarization={:?}, on_error={:?}",
        pairs.len(),
        jobs,
        scorer.binarization(),
        options.on_error
    );

    let mut summary = RunSummary::default();
    let mut total_load_time = Duration::ZERO;
    let mut total_score_time = Duration::ZERO;
    let mut total_write_time = Duration::ZERO;

    for chunk in pairs.chunks(chunk_size) {
        let results: Vec<Result<ScoredFrame, EvalError>> = match &pool {
            Some(pool) => pool.install(|| {
                chunk
                    .par_iter()
                    .map(|pair| score_frame(source, &scorer, pair))
                    .collect()
            }),
            None => chunk
                .iter()
                .map(|pair| score_frame(source, &scorer, pair))
                .collect(),
        };

        for (pair, result) in chunk.iter().zip(results) {
            let frame = match result {
                Ok(frame) => frame,
                Err(e) => {
                    handle_failure(options.on_error, pair, anyhow::Error::new(e))?;
                    summary.frames_skipped += 1;
                    continue;
                }
            };

            if let Some(sink) = sink.as_deref_mut() {
                let write_start = Instant::now();
                let written = sink.write_scorecard(&pair.name, &frame.scorecard);
                total_write_time += write_start.elapsed();

                if let Err(e) = written {
                    handle_failure(options.on_error, pair, e)?;
                    summary.frames_skipped += 1;
                    continue;
                }
            }

            tracing::debug!(
                "{}: TP={} FP={} TN={} FN={} unknown={} similarity={}",
                pair.name,
                frame.counts.true_positive,
                frame.counts.false_positive,
                frame.counts.true_negative,
                frame.counts.false_negative,
                frame.counts.unknown,
                metrics::similarity(&frame.counts)
            );

            summary.counts = summary.counts.accumulate(frame.counts);
            summary.frames_scored += 1;
            total_load_time += frame.load_time;
            total_score_time += frame.score_time;

            // Log stats every 30 frames
            if summary.frames_scored % 30 == 0 {
                let n = summary.frames_scored as f64;
                tracing::info!(
                    "Frame {}: load={:.1}ms, score={:.1}ms, write={:.1}ms",
                    summary.frames_scored,
                    total_load_time.as_secs_f64() * 1000.0 / n,
                    total_score_time.as_secs_f64() * 1000.0 / n,
                    total_write_time.as_secs_f64() * 1000.0 / n
                );
            }
        }
    }

    tracing::info!(
        "Scored {} frames, skipped {}",
        summary.frames_scored,
        summary.frames_skipped
    );

    Ok(summary)
}

fn handle_failure(policy: FailurePolicy, pair: &FramePair, error: anyhow::Error) -> Result<()> {
    match policy {
        FailurePolicy::Skip => {
            tracing::warn!("Skipping frame {}: {:#}", pair.name, error);
            Ok(())
        }
        FailurePolicy::Abort => {
            Err(error.context(format!("Failed to score frame {}", pair.name)))
        }
    }
}
