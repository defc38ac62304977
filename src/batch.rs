//! Directory scanning, pair matching and per-pair batch execution.
//!
//! The runner owns all filesystem traversal. Pixel work is delegated to
//! [`crate::compositing`] and [`crate::extraction`], which never touch the
//! disk. Every pair is loaded, combined and released before the next one
//! starts; one corrupt file can never prevent the rest of the batch from
//! completing.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use tracing::{info, warn};

use crate::compositing;
use crate::error::{Error, Result};
use crate::extraction;
use crate::naming::{self, PairMatch, Role};

/// Pixel-combination policy applied to every pair in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Mask luminance becomes output transparency.
    Cutout,
    /// Per-channel minimum of main and mask, fully opaque output.
    Darken,
    /// Split the main image into one cutout per connected mask region.
    ExtractObjects,
}

impl CompositeMode {
    /// Label used in composite output filenames (`{base}_{label}.png`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CompositeMode::Cutout => "cutout",
            CompositeMode::Darken => "darken",
            CompositeMode::ExtractObjects => "extract",
        }
    }
}

/// Configuration for one batch run.
///
/// Replaces any notion of ambient "currently selected folder" state: shells
/// collect these three values and pass them in explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory scanned (non-recursively) for `_main.png`/`_mask.png` files.
    pub input_dir: PathBuf,
    /// Directory receiving outputs; created if missing, parents included.
    pub output_dir: PathBuf,
    /// Pixel-combination policy for the whole run.
    pub mode: CompositeMode,
}

/// What happened to one main file during a run.
#[derive(Debug)]
pub enum PairOutcome {
    /// Composite written to the contained path.
    Written(PathBuf),
    /// Extraction mode: this many object files were written for the pair.
    ObjectsWritten(usize),
    /// No mask file shared the main file's base name.
    NoMaskFound,
    /// The pair failed; the batch continued without it.
    Failed(Error),
}

/// Outcome of one main file, keyed by the pair's base name.
#[derive(Debug)]
pub struct PairReport {
    /// Base identifier shared by the pair.
    pub key: String,
    /// What happened to it.
    pub outcome: PairOutcome,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// True when either file partition was empty and nothing was attempted.
    /// A no-op outcome, not a failure.
    pub nothing_to_do: bool,
    /// Per-pair outcomes in main-file discovery order.
    pub pairs: Vec<PairReport>,
}

impl RunReport {
    /// Number of matched pairs that were attempted.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.pairs.len() - self.unmatched()
    }

    /// Number of pairs whose output(s) were written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.pairs
            .iter()
            .filter(|p| {
                matches!(
                    p.outcome,
                    PairOutcome::Written(_) | PairOutcome::ObjectsWritten(_)
                )
            })
            .count()
    }

    /// Number of pairs that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.pairs
            .iter()
            .filter(|p| matches!(p.outcome, PairOutcome::Failed(_)))
            .count()
    }

    /// Number of main files without a matching mask.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.pairs
            .iter()
            .filter(|p| matches!(p.outcome, PairOutcome::NoMaskFound))
            .count()
    }

    /// One-line summary suitable for a shell's completion notice.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.nothing_to_do {
            return format!(
                "nothing to do: no {} / {} files found",
                naming::MAIN_SUFFIX,
                naming::MASK_SUFFIX
            );
        }
        format!(
            "{} processed, {} succeeded, {} failed, {} unmatched",
            self.processed(),
            self.succeeded(),
            self.failed(),
            self.unmatched()
        )
    }
}

/// Run one batch: scan `input_dir`, match pairs, composite, write.
///
/// Decode, resize and write problems are captured in the affected pair's
/// [`PairOutcome`] and never abort the batch.
///
/// # Errors
///
/// Returns an error only when the run cannot start at all: the input
/// directory is unreadable or the output directory cannot be created.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    fs::create_dir_all(&config.output_dir)?;

    let names = list_file_names(&config.input_dir)?;
    let main_files: Vec<String> = names
        .iter()
        .filter(|n| Role::Main.matches(n))
        .cloned()
        .collect();
    let mask_files: Vec<String> = names
        .iter()
        .filter(|n| Role::Mask.matches(n))
        .cloned()
        .collect();

    if main_files.is_empty() || mask_files.is_empty() {
        info!(dir = %config.input_dir.display(), "no main/mask candidates found");
        return Ok(RunReport {
            nothing_to_do: true,
            pairs: Vec::new(),
        });
    }

    let matches = naming::match_pairs(&main_files, &mask_files);
    info!(
        mode = config.mode.label(),
        mains = main_files.len(),
        masks = mask_files.len(),
        "starting batch"
    );

    let pairs = match config.mode {
        CompositeMode::Cutout => run_composites(config, &matches, compositing::cutout),
        CompositeMode::Darken => run_composites(config, &matches, compositing::darken_blend),
        CompositeMode::ExtractObjects => run_extraction(config, &matches),
    };

    Ok(RunReport {
        nothing_to_do: false,
        pairs,
    })
}

type CompositeOp = fn(&DynamicImage, &DynamicImage) -> RgbaImage;

/// Composite every matched pair with `op`, one output file per pair.
///
/// Pairs are independent, so with the `cli` feature enabled they fan out
/// across a rayon pool and the per-pair outcomes are collected back into
/// discovery order.
fn run_composites(config: &RunConfig, matches: &[PairMatch], op: CompositeOp) -> Vec<PairReport> {
    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        matches
            .par_iter()
            .map(|pair| composite_pair(config, pair, op))
            .collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        matches
            .iter()
            .map(|pair| composite_pair(config, pair, op))
            .collect()
    }
}

fn composite_pair(config: &RunConfig, pair: &PairMatch, op: CompositeOp) -> PairReport {
    let outcome = match &pair.mask {
        None => {
            warn!(main = %pair.main, "no mask found");
            PairOutcome::NoMaskFound
        }
        Some(mask_file) => match composite_one(config, pair, mask_file, op) {
            Ok(path) => PairOutcome::Written(path),
            Err(e) => {
                warn!(pair = %pair.key, error = %e, "pair failed");
                PairOutcome::Failed(e)
            }
        },
    };
    PairReport {
        key: pair.key.clone(),
        outcome,
    }
}

fn composite_one(
    config: &RunConfig,
    pair: &PairMatch,
    mask_file: &str,
    op: CompositeOp,
) -> Result<PathBuf> {
    let main = load_image(&config.input_dir.join(&pair.main))?;
    let mask = load_image(&config.input_dir.join(mask_file))?;
    ensure_resizable(&main)?;

    let result = op(&main, &mask);
    let out_path = config
        .output_dir
        .join(format!("{}_{}.png", pair.key, config.mode.label()));
    save_png(&result, &out_path)?;
    info!(pair = %pair.key, output = %out_path.display(), "pair composited");
    Ok(out_path)
}

/// Extract mask components of every matched pair into `object_{n}.png` files.
///
/// Runs sequentially: the object counter spans the whole batch in pair
/// discovery order, so outputs from different pairs cannot overwrite each
/// other.
fn run_extraction(config: &RunConfig, matches: &[PairMatch]) -> Vec<PairReport> {
    let mut next_object = 1usize;
    matches
        .iter()
        .map(|pair| {
            let outcome = match &pair.mask {
                None => {
                    warn!(main = %pair.main, "no mask found");
                    PairOutcome::NoMaskFound
                }
                Some(mask_file) => match extract_one(config, pair, mask_file, &mut next_object) {
                    Ok(count) => PairOutcome::ObjectsWritten(count),
                    Err(e) => {
                        warn!(pair = %pair.key, error = %e, "pair failed");
                        PairOutcome::Failed(e)
                    }
                },
            };
            PairReport {
                key: pair.key.clone(),
                outcome,
            }
        })
        .collect()
}

fn extract_one(
    config: &RunConfig,
    pair: &PairMatch,
    mask_file: &str,
    next_object: &mut usize,
) -> Result<usize> {
    let main = load_image(&config.input_dir.join(&pair.main))?;
    let mask = load_image(&config.input_dir.join(mask_file))?;
    ensure_resizable(&main)?;

    let mask = compositing::conform(&mask, main.width(), main.height()).to_luma8();
    let blobs = extraction::extract_blobs(&main, &mask);
    let count = blobs.len();
    for blob in blobs {
        let path = config.output_dir.join(format!("object_{next_object}.png"));
        save_png(&blob, &path)?;
        *next_object += 1;
    }
    info!(pair = %pair.key, objects = count, "objects extracted");
    Ok(count)
}

/// List file names in `dir`, non-recursively, sorted for a deterministic
/// listing order. Entries without a UTF-8 name are skipped.
fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject zero-area combination targets before any resampling happens.
fn ensure_resizable(main: &DynamicImage) -> Result<()> {
    if main.width() == 0 || main.height() == 0 {
        return Err(Error::Resize {
            width: main.width(),
            height: main.height(),
        });
    }
    Ok(())
}

/// Save `image` as PNG. If the save fails because the output directory
/// vanished mid-run, recreate it once and retry; a second failure is the
/// pair's error.
fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    match image.save(path) {
        Ok(()) => Ok(()),
        Err(first) => {
            let dir_missing = path.parent().is_some_and(|p| !p.exists());
            if dir_missing {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                image.save(path).map_err(|source| Error::Write {
                    path: path.to_path_buf(),
                    source,
                })
            } else {
                Err(Error::Write {
                    path: path.to_path_buf(),
                    source: first,
                })
            }
        }
    }
}
