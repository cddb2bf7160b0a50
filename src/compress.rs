//! Image compressor: decode → scale to 60% → re-encode as JPEG at quality 0.7.
//!
//! The transformation is fixed; neither factor is configurable. A single
//! image goes through [`compress_image`]. [`Compressor`] wraps that in a
//! [`Generation`] so a newer run supersedes an older in-flight one, and
//! [`compress_batch`] fans a list of files out over the rayon pool.
//!
//! ## Batch output
//!
//! ```text
//! photos/
//! ├── dawn.jpg
//! ├── dawn-compressed.jpg      # written next to the source
//! └── trip/
//!     ├── beach.png
//!     └── beach-compressed.jpg # always JPEG, whatever the input format
//! ```
//!
//! With an output directory, every result lands flat in that directory instead.
//! Inputs that would share an output name (`photo.jpg` and `photo.png`, or
//! two `x.jpg` from different folders flattened into one directory) are
//! numbered in input order: `photo-compressed.jpg`, `photo-2-compressed.jpg`.

use crate::imaging::{
    Dimensions, EncodedImage, ImagingError, Quality, decode_image, is_supported_image,
    scale_and_encode,
};
use crate::session::{Generation, Ticket};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Linear scale applied to both axes.
pub const SCALE_FACTOR: f64 = 0.6;

/// Encoder quality as a 0..1 fraction.
pub const QUALITY_FRACTION: f64 = 0.7;

/// Suffix appended to the source stem for batch outputs.
pub const OUTPUT_SUFFIX: &str = "-compressed";

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] ImagingError),
    #[error("compression run was superseded by a newer one")]
    Superseded,
    #[error("no supported images found in the given paths")]
    NoInputs,
}

/// Outcome of compressing one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub source: Dimensions,
    pub output: EncodedImage,
}

impl CompressionReport {
    pub fn compressed_bytes(&self) -> u64 {
        self.output.bytes.len() as u64
    }
}

/// Quality used for every compressed output.
pub fn quality() -> Quality {
    Quality::from_fraction(QUALITY_FRACTION)
}

/// Compress one encoded image held in memory.
pub fn compress_image(bytes: &[u8]) -> Result<CompressionReport, CompressError> {
    let source = decode_image(bytes)?;
    let output = scale_and_encode(&source, SCALE_FACTOR, quality())?;
    debug!(
        source_width = source.width(),
        source_height = source.height(),
        width = output.width,
        height = output.height,
        original_bytes = bytes.len(),
        compressed_bytes = output.bytes.len(),
        "compress: image re-encoded"
    );
    Ok(CompressionReport {
        original_bytes: bytes.len() as u64,
        source: Dimensions::of(&source),
        output,
    })
}

/// Byte count as kilobytes with two decimals: `1536` → `1.50 KB`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Single-image compressor whose newest run wins.
#[derive(Debug, Default)]
pub struct Compressor {
    generation: Generation,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run; every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        self.generation.begin()
    }

    /// Hand a finished result back. Stale results are dropped.
    pub fn finish(
        &self,
        ticket: Ticket,
        result: Result<CompressionReport, CompressError>,
    ) -> Result<CompressionReport, CompressError> {
        if !self.generation.is_current(ticket) {
            warn!(ticket = ticket.id(), "compress: dropping superseded result");
            return Err(CompressError::Superseded);
        }
        result
    }

    /// Begin, compress and finish in one call.
    ///
    /// `None` (no file chosen) is a no-op and does not supersede anything.
    pub fn run(&self, file: Option<&[u8]>) -> Result<Option<CompressionReport>, CompressError> {
        let Some(bytes) = file else {
            return Ok(None);
        };
        let ticket = self.begin();
        self.finish(ticket, compress_image(bytes)).map(Some)
    }
}

// ============================================================================
// Batch mode
// ============================================================================

/// Progress reported per input file during a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressEvent {
    Done {
        index: usize,
        source: PathBuf,
        output: PathBuf,
        original_bytes: u64,
        compressed_bytes: u64,
        width: u32,
        height: u32,
    },
    Failed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

/// Totals over a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

fn is_previous_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(OUTPUT_SUFFIX))
}

/// Expand files and directories into the list of images to compress.
///
/// Directories are walked recursively in sorted order. Files named directly
/// are taken as given; walked files must have a supported extension and are
/// skipped if they already look like a previous `-compressed` output.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CompressError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                let candidate = entry.path();
                if entry.file_type().is_file()
                    && is_supported_image(candidate)
                    && !is_previous_output(candidate)
                {
                    inputs.push(candidate.to_path_buf());
                }
            }
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            return Err(CompressError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
    }
    if inputs.is_empty() {
        return Err(CompressError::NoInputs);
    }
    Ok(inputs)
}

fn numbered_output_path(source: &Path, output_dir: Option<&Path>, n: usize) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = match n {
        1 => format!("{stem}{OUTPUT_SUFFIX}.jpg"),
        n => format!("{stem}-{n}{OUTPUT_SUFFIX}.jpg"),
    };
    match output_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// Where the compressed copy of `source` goes when nothing else claims it.
pub fn output_path(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    numbered_output_path(source, output_dir, 1)
}

/// One distinct output path per input, in input order.
///
/// The first input to claim a name keeps [`output_path`]; later ones get
/// the lowest free `-N` before the suffix.
pub fn output_paths(inputs: &[PathBuf], output_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|source| {
            let target = (1..)
                .map(|n| numbered_output_path(source, output_dir, n))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| output_path(source, output_dir));
            if target != output_path(source, output_dir) {
                debug!(
                    source = %source.display(),
                    output = %target.display(),
                    "compress: output name already taken, numbering"
                );
            }
            taken.insert(target.clone());
            target
        })
        .collect()
}

fn compress_file(source: &Path, target: &Path) -> Result<CompressionReport, CompressError> {
    let bytes = fs::read(source)?;
    let report = compress_image(&bytes)?;
    fs::write(target, &report.output.bytes)?;
    info!(
        source = %source.display(),
        output = %target.display(),
        "compress: wrote output"
    );
    Ok(report)
}

/// Compress every input in parallel, writing `<stem>-compressed.jpg` files.
///
/// Output names come from [`output_paths`], so no two inputs write the same
/// file. Failures are per file: one bad input does not stop the others. Each
/// finished file is reported on `progress` as soon as it completes, so event
/// order follows completion, not input order.
pub fn compress_batch(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    progress: Option<Sender<CompressEvent>>,
) -> Result<BatchSummary, CompressError> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let targets = output_paths(inputs, output_dir);
    let events: Vec<CompressEvent> = inputs
        .par_iter()
        .zip(targets.par_iter())
        .enumerate()
        .map_with(progress, |tx, (i, (source, target))| {
            let event = match compress_file(source, target) {
                Ok(report) => CompressEvent::Done {
                    index: i + 1,
                    source: source.clone(),
                    output: target.clone(),
                    original_bytes: report.original_bytes,
                    compressed_bytes: report.compressed_bytes(),
                    width: report.output.width,
                    height: report.output.height,
                },
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "compress: file failed");
                    CompressEvent::Failed {
                        index: i + 1,
                        source: source.clone(),
                        error: e.to_string(),
                    }
                }
            };
            if let Some(tx) = tx {
                // Receiver gone just means nobody is listening for progress
                tx.send(event.clone()).ok();
            }
            event
        })
        .collect();

    Ok(events
        .iter()
        .fold(BatchSummary::default(), |mut summary, event| {
            match event {
                CompressEvent::Done {
                    original_bytes,
                    compressed_bytes,
                    ..
                } => {
                    summary.succeeded += 1;
                    summary.original_bytes += original_bytes;
                    summary.compressed_bytes += compressed_bytes;
                }
                CompressEvent::Failed { .. } => summary.failed += 1,
            }
            summary
        }))
}
