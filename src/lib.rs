//! Batch-composite pairs of `_main.png` / `_mask.png` images.
//!
//! A directory is scanned (non-recursively) for files named
//! `<base>_main.png` and `<base>_mask.png`. Each matched pair is combined
//! with one of two pixel policies and written to an output directory:
//!
//! - **cutout**: the mask's luminance becomes the output's alpha channel
//! - **darken**: per-channel minimum of main and mask, fully opaque
//!
//! A third mode splits the main image into one alpha-matted file per
//! connected region of the mask (`object_1.png`, `object_2.png`, ...).
//!
//! One corrupt or unmatched file never stops the batch: each pair's
//! outcome is recorded in the returned [`RunReport`] and processing
//! continues with the next pair.
//!
//! # Quick Start
//!
//! ```no_run
//! use photomask::{run, CompositeMode, RunConfig};
//!
//! let config = RunConfig {
//!     input_dir: "shoot/raw".into(),
//!     output_dir: "shoot/cut".into(),
//!     mode: CompositeMode::Cutout,
//! };
//! let report = run(&config).expect("batch could not start");
//! println!("{}", report.summary());
//! ```

#![deny(missing_docs)]

pub mod batch;
pub mod compositing;
pub mod error;
pub mod extraction;
pub mod naming;

pub use batch::{run, CompositeMode, PairOutcome, PairReport, RunConfig, RunReport};
pub use error::{Error, Result};
