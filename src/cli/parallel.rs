/// Parallel extraction over a directory tree
///
/// Files are discovered with walkdir and extracted on a dedicated Rayon pool.
/// Every file is parsed and extracted with its own state; the only thing
/// shared between workers is the compiled matcher configuration.
use crate::error::Result;
use crate::extract::extract;
use crate::language::{Dialect, parse_file};
use crate::matchers::CompiledMatchers;
use crate::resolver::LiteralResolver;
use super::output::FileExtraction;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for parallel extraction
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Number of parallel threads (defaults to CPU count)
    pub num_threads: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
        }
    }
}

pub struct ParallelExtractor {
    config: ExtractionConfig,
    matchers: CompiledMatchers,
}

impl ParallelExtractor {
    pub fn new(config: ExtractionConfig, matchers: CompiledMatchers) -> Self {
        Self { config, matchers }
    }

    /// Parse and extract a single file
    pub fn extract_file(&self, path: &Path) -> Result<FileExtraction> {
        let (source, tree) = parse_file(path)?;
        let result = extract(
            &tree,
            &source,
            &self.matchers.as_matchers(),
            &LiteralResolver::new(),
        )
        .unwrap_or_else(|never| match never {});

        Ok(FileExtraction {
            path: path.display().to_string(),
            result,
        })
    }

    /// Extract every supported file under `directory`, in path order
    ///
    /// Files that fail to read or parse are logged and left out.
    pub fn extract_directory(&self, directory: &Path) -> anyhow::Result<Vec<FileExtraction>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()?;

        let files = self.discover_files(directory);
        debug!(
            "Found {} files under {} ({} threads)",
            files.len(),
            directory.display(),
            self.config.num_threads
        );

        let extracted: Vec<FileExtraction> = pool.install(|| {
            files
                .par_iter()
                .filter_map(|file| match self.extract_file(file) {
                    Ok(extraction) => Some(extraction),
                    Err(e) => {
                        warn!("Skipping {}: {}", file.display(), e);
                        None
                    }
                })
                .collect()
        });
        Ok(extracted)
    }

    /// Supported source files under `directory`, sorted by path
    pub(crate) fn discover_files(&self, directory: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| Dialect::is_supported(path))
            .collect();
        files.sort();
        files
    }
}
