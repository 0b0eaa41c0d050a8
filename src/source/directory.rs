use super::{FramePair, FramePairSource, LoadedPair};
use crate::error::EvalError;
use crate::scoring::Mask;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How predicted files are matched to ground truth files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Pairing {
    /// Same file name, falling back to the same stem with any image extension
    #[default]
    Name,
    /// N-th ground truth file (sorted by name) with the N-th predicted file
    Position,
}

/// Mask pairs read from a ground truth directory and a foreground directory
pub struct DirectoryPairs {
    pairs: Vec<FramePair>,
}

impl DirectoryPairs {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        ground_truth_dir: P,
        foreground_dir: Q,
        pairing: Pairing,
    ) -> Result<Self, EvalError> {
        let gt_dir = ground_truth_dir.as_ref();
        let fg_dir = foreground_dir.as_ref();

        tracing::info!(
            "Pairing ground truth in {} with foreground masks in {} by {:?}",
            gt_dir.display(),
            fg_dir.display(),
            pairing
        );

        let gt_files = list_images(gt_dir)?;
        if gt_files.is_empty() {
            return Err(EvalError::NoFramePairs {
                dir: gt_dir.to_path_buf(),
            });
        }
        let fg_files = list_images(fg_dir)?;

        let pairs = match pairing {
            Pairing::Name => pair_by_name(&gt_files, &fg_files),
            Pairing::Position => pair_by_position(&gt_files, &fg_files),
        };

        tracing::info!("Found {} frame pairs", pairs.len());

        Ok(Self { pairs })
    }
}

impl FramePairSource for DirectoryPairs {
    fn pairs(&self) -> &[FramePair] {
        &self.pairs
    }

    fn load(&self, pair: &FramePair) -> Result<LoadedPair, EvalError> {
        let predicted = pair.predicted.as_ref().ok_or_else(|| EvalError::Unpaired {
            name: pair.name.clone(),
        })?;

        Ok(LoadedPair {
            ground_truth: load_mask(&pair.ground_truth)?,
            predicted: load_mask(predicted)?,
        })
    }
}

/// Read an image file as a single-channel mask
pub fn load_mask(path: &Path) -> Result<Mask, EvalError> {
    if !path.is_file() {
        return Err(EvalError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mask = image::open(path)
        .map_err(|source| EvalError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();

    if mask.width() == 0 || mask.height() == 0 {
        return Err(EvalError::EmptyMask {
            path: path.to_path_buf(),
        });
    }

    Ok(mask)
}

/// Image files directly inside `dir`, sorted by file name
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, EvalError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    return None;
                }
            };
            if !path.is_file() {
                return None;
            }
            if image::ImageFormat::from_path(&path).is_err() {
                tracing::debug!("Ignoring non-image file {}", path.display());
                return None;
            }
            Some(path)
        })
        .collect();

    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn pair_by_name(gt_files: &[PathBuf], fg_files: &[PathBuf]) -> Vec<FramePair> {
    let by_name: HashMap<String, &PathBuf> =
        fg_files.iter().map(|p| (file_name(p), p)).collect();

    // fg_files is sorted, so the first file seen wins for a repeated stem
    let mut by_stem: HashMap<String, &PathBuf> = HashMap::new();
    for path in fg_files {
        by_stem.entry(file_stem(path)).or_insert(path);
    }

    gt_files
        .iter()
        .map(|gt| {
            let name = file_name(gt);
            let predicted = by_name
                .get(&name)
                .or_else(|| by_stem.get(&file_stem(gt)))
                .map(|path| (*path).clone());
            if predicted.is_none() {
                tracing::warn!("No foreground mask matches {}", name);
            }

            FramePair {
                name,
                ground_truth: gt.clone(),
                predicted,
            }
        })
        .collect()
}

fn pair_by_position(gt_files: &[PathBuf], fg_files: &[PathBuf]) -> Vec<FramePair> {
    if gt_files.len() != fg_files.len() {
        tracing::warn!(
            "{} ground truth files but {} foreground files",
            gt_files.len(),
            fg_files.len()
        );
    }
    if fg_files.len() > gt_files.len() {
        tracing::warn!(
            "Ignoring {} foreground files without ground truth",
            fg_files.len() - gt_files.len()
        );
    }

    // Every ground truth frame yields a pair; frames past the end of the
    // foreground listing fail on load
    gt_files
        .iter()
        .enumerate()
        .map(|(i, gt)| FramePair {
            name: file_name(gt),
            ground_truth: gt.clone(),
            predicted: fg_files.get(i).cloned(),
        })
        .collect()
}
