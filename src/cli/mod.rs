/// Shared plumbing for the `box-extract` binary
///
/// The extraction core knows nothing about files or output formats; this
/// module adds both around it.
///
/// Modules:
/// - output: JSON and NDJSON writers for per-file results
/// - parallel: directory discovery and parallel per-file extraction with Rayon
pub mod output;
pub mod parallel;

pub use output::{FileExtraction, OutputFormat, OutputWriter};
pub use parallel::{ExtractionConfig, ParallelExtractor};
