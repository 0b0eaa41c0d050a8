use fgeval::output::{DirectorySink, ScorecardSink};
use fgeval::scoring::{Binarization, Mask, ResizeFilter, Score, ScorecardStyle, SegmentationScorer};
use fgeval::source::{DirectoryPairs, Pairing};
use fgeval::{run_pipeline, FailurePolicy, PipelineOptions};
use image::{Luma, Rgb};
use std::fs;
use std::path::{Path, PathBuf};

struct Fixture {
    _tmp: tempfile::TempDir,
    gt: PathBuf,
    fg: PathBuf,
    sc: PathBuf,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let gt = tmp.path().join("GT");
    let fg = tmp.path().join("FG");
    let sc = tmp.path().join("SC");
    fs::create_dir_all(&gt).unwrap();
    fs::create_dir_all(&fg).unwrap();
    Fixture {
        _tmp: tmp,
        gt,
        fg,
        sc,
    }
}

fn save(dir: &Path, name: &str, mask: &Mask) {
    mask.save(dir.join(name)).unwrap();
}

// Left half foreground
fn half(width: u32, height: u32) -> Mask {
    Mask::from_fn(width, height, |x, _| Luma([if x < width / 2 { 255 } else { 0 }]))
}

#[test]
fn scores_directories_and_writes_scorecards() {
    let f = fixture();
    // Frame 1: perfect agreement
    save(&f.gt, "in000001.png", &half(4, 4));
    save(&f.fg, "in000001.png", &half(4, 4));
    // Frame 2: prediction is half resolution, still agrees after resizing
    save(&f.gt, "in000002.png", &half(8, 4));
    save(&f.fg, "in000002.png", &half(4, 2));
    // Frame 3: empty prediction
    save(&f.gt, "in000003.png", &half(4, 4));
    save(&f.fg, "in000003.png", &Mask::new(4, 4));

    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Name).unwrap();
    let mut sink = DirectorySink::new(&f.sc).unwrap();
    let summary = run_pipeline(
        &source,
        Some(&mut sink as &mut dyn ScorecardSink),
        &PipelineOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.frames_scored, 3);
    assert_eq!(summary.frames_skipped, 0);
    assert_eq!(summary.counts.true_positive, 8 + 16);
    assert_eq!(summary.counts.true_negative, 8 + 16 + 8);
    assert_eq!(summary.counts.false_negative, 8);
    assert_eq!(summary.counts.false_positive, 0);
    assert_eq!(summary.counts.unknown, 0);
    assert_eq!(summary.counts.total(), 16 + 32 + 16);

    let metrics = summary.report().metrics;
    assert_eq!(metrics.precision, Score::Value(1.0));
    assert_eq!(metrics.recall, Score::Value(0.75));

    // One scorecard per ground truth frame, sized like the ground truth
    assert_eq!(sink.written(), 3);
    let resized = image::open(f.sc.join("in000002.png")).unwrap().into_rgb8();
    assert_eq!(resized.dimensions(), (8, 4));
    let missed = image::open(f.sc.join("in000003.png")).unwrap().into_rgb8();
    assert_eq!(missed.get_pixel(0, 0), &Rgb([0, 255, 0]));
    assert_eq!(missed.get_pixel(3, 0), &Rgb([0, 0, 0]));
}

#[test]
fn unreadable_frame_is_skipped_without_touching_totals() {
    let f = fixture();
    save(&f.gt, "a.png", &half(4, 4));
    save(&f.fg, "a.png", &half(4, 4));
    save(&f.gt, "b.png", &half(4, 4));
    fs::write(f.fg.join("b.png"), b"garbage").unwrap();

    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Name).unwrap();
    let summary = run_pipeline(&source, None, &PipelineOptions::default()).unwrap();

    assert_eq!(summary.frames_scored, 1);
    assert_eq!(summary.frames_skipped, 1);
    assert_eq!(summary.counts.total(), 16);
    assert!(!f.sc.exists());
}

#[test]
fn unreadable_frame_aborts_when_requested() {
    let f = fixture();
    save(&f.gt, "a.png", &half(4, 4));
    fs::write(f.fg.join("a.png"), b"garbage").unwrap();

    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Name).unwrap();
    let options = PipelineOptions {
        on_error: FailurePolicy::Abort,
        ..PipelineOptions::default()
    };

    assert!(run_pipeline(&source, None, &options).is_err());
}

#[test]
fn linear_resize_artifacts_are_unknown_unless_thresholded() {
    let f = fixture();
    let gt = Mask::from_fn(9, 9, |x, _| Luma([if x < 4 { 255 } else { 0 }]));
    let fg = Mask::from_fn(3, 3, |x, _| Luma([if x == 0 { 255 } else { 0 }]));
    save(&f.gt, "edge.png", &gt);
    save(&f.fg, "edge.png", &fg);
    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Name).unwrap();

    let strict = PipelineOptions {
        scorer: SegmentationScorer::new(
            Binarization::Strict,
            ResizeFilter::Linear,
            ScorecardStyle::Falsecolor,
        ),
        ..PipelineOptions::default()
    };
    let thresholded = PipelineOptions {
        scorer: SegmentationScorer::new(
            Binarization::Threshold(128),
            ResizeFilter::Linear,
            ScorecardStyle::Falsecolor,
        ),
        ..PipelineOptions::default()
    };

    let strict = run_pipeline(&source, None, &strict).unwrap();
    let thresholded = run_pipeline(&source, None, &thresholded).unwrap();

    assert!(strict.counts.unknown > 0);
    assert_eq!(strict.counts.total(), 81);
    assert_eq!(thresholded.counts.unknown, 0);
    assert_eq!(thresholded.counts.classified(), 81);
}

#[test]
fn report_round_trips_through_json_file() {
    let f = fixture();
    save(&f.gt, "a.png", &Mask::new(4, 4));
    save(&f.fg, "a.png", &Mask::from_pixel(4, 4, Luma([255])));

    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Name).unwrap();
    let summary = run_pipeline(&source, None, &PipelineOptions::default()).unwrap();
    let path = f.sc.join("report.json");
    summary.report().save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["counts"]["false_positive"], serde_json::json!(16));
    assert!(value["metrics"]["recall"].is_null());
    assert!(value["metrics"]["fscore"].is_null());
    assert_eq!(value["metrics"]["precision"], serde_json::json!(0.0));
}

#[test]
fn position_pairing_counts_unpartnered_frames_as_failures() {
    let f = fixture();
    save(&f.gt, "a.png", &half(4, 4));
    save(&f.gt, "b.png", &half(4, 4));
    save(&f.gt, "c.png", &half(4, 4));
    save(&f.fg, "bin000001.png", &half(4, 4));

    let source = DirectoryPairs::new(&f.gt, &f.fg, Pairing::Position).unwrap();

    let skipped = run_pipeline(&source, None, &PipelineOptions::default()).unwrap();
    assert_eq!(skipped.frames_scored, 1);
    assert_eq!(skipped.frames_skipped, 2);
    assert_eq!(skipped.counts.total(), 16);

    let abort = PipelineOptions {
        on_error: FailurePolicy::Abort,
        ..PipelineOptions::default()
    };
    let err = run_pipeline(&source, None, &abort).unwrap_err();
    assert!(format!("{err:#}").contains("b.png"));
}
