//! Batch conversion of a VMT folder
//!
//! Enumerates source files, then parses, resolves and persists each one in
//! turn. Per-file and per-texture problems become log entries; only a missing
//! source folder or an empty file list stops the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::assets::materials::{MaterialResolver, ResolveStatus, VmtParser};
use crate::assets::{AssetError, AssetIndex};
use crate::core::config::ConverterConfig;
use crate::foundation::files;
use crate::report::LogSink;

/// Run-level failures
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source folder does not exist
    #[error("Source folder not found: {0:?}")]
    SourceNotFound(PathBuf),

    /// Nothing to convert
    #[error("No .{extension} files found in {folder:?}")]
    NoInputFiles {
        /// Folder that was searched
        folder: PathBuf,
        /// Extension searched for
        extension: String,
    },

    /// Enumerating the source folder failed
    #[error("Failed to scan {folder:?}: {source}")]
    Scan {
        /// Folder being scanned
        folder: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Shared flag checked between files
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create an untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running batch to stop before its next file
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress report passed to the per-file callback
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Files finished so far, including this one
    pub completed: usize,
    /// Files in the batch
    pub total: usize,
    /// File just processed
    pub path: &'a Path,
    /// What happened to it
    pub outcome: FileOutcome,
}

impl BatchProgress<'_> {
    /// Completion ratio in `0.0..=1.0`
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Per-file result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File could not be read
    ReadFailed,
    /// Resolution reached this terminal state
    Resolved(ResolveStatus),
}

impl FileOutcome {
    /// Whether the file counts as failed
    pub fn is_error(self) -> bool {
        match self {
            Self::ReadFailed => true,
            Self::Resolved(status) => status.is_error(),
        }
    }
}

/// Totals for a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Source files found
    pub files_found: usize,
    /// Source files handled before completion or cancellation
    pub files_processed: usize,
    /// New records written
    pub created: usize,
    /// Existing records updated
    pub updated: usize,
    /// Files without any managed texture key
    pub skipped: usize,
    /// Files that could not be read
    pub read_failures: usize,
    /// Files whose record could not be created because the shader is missing
    pub shader_failures: usize,
    /// Files whose record could not be loaded or saved
    pub store_failures: usize,
    /// Texture slots bound
    pub textures_bound: usize,
    /// Texture slots left unresolved
    pub textures_unresolved: usize,
    /// Dirty records saved at the end of the batch
    pub records_flushed: usize,
    /// The batch stopped early on request
    pub cancelled: bool,
}

impl BatchSummary {
    /// Files that hit an error
    pub fn failed(&self) -> usize {
        self.read_failures + self.shader_failures + self.store_failures
    }

    /// Every file processed without error and the batch ran to completion
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }

    fn record(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        match outcome {
            FileOutcome::ReadFailed => self.read_failures += 1,
            FileOutcome::Resolved(ResolveStatus::NoTextures) => self.skipped += 1,
            FileOutcome::Resolved(ResolveStatus::ShaderMissing) => self.shader_failures += 1,
            FileOutcome::Resolved(ResolveStatus::StoreFailed) => self.store_failures += 1,
            FileOutcome::Resolved(ResolveStatus::Created) => self.created += 1,
            FileOutcome::Resolved(ResolveStatus::Updated) => self.updated += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} files: {} created, {} updated, {} skipped, {} failed; {} textures bound, {} unresolved",
            self.files_processed,
            self.files_found,
            self.created,
            self.updated,
            self.skipped,
            self.failed(),
            self.textures_bound,
            self.textures_unresolved,
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

/// Converts every VMT file under a folder
pub struct BatchConverter {
    resolver: MaterialResolver,
    cancel: CancellationToken,
}

impl BatchConverter {
    /// Create a converter
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            resolver: MaterialResolver::new(config),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this converter's batches
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolver used for each file
    pub fn resolver(&self) -> &MaterialResolver {
        &self.resolver
    }

    /// Source files the batch would process, in processing order
    pub fn find_sources(&self, source_root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        if !source_root.is_dir() {
            return Err(ConvertError::SourceNotFound(source_root.to_path_buf()));
        }
        files::find_files_with_extension(source_root, &self.resolver.config().source_extension)
            .map_err(|source| ConvertError::Scan {
                folder: source_root.to_path_buf(),
                source,
            })
    }

    /// Convert every source file under `source_root`
    pub fn run(
        &self,
        source_root: impl AsRef<Path>,
        index: &mut dyn AssetIndex,
        log: &mut dyn LogSink,
    ) -> Result<BatchSummary, ConvertError> {
        self.run_with_progress(source_root, index, log, |_| {})
    }

    /// Convert every source file, calling `progress` after each one
    pub fn run_with_progress<F>(
        &self,
        source_root: impl AsRef<Path>,
        index: &mut dyn AssetIndex,
        log: &mut dyn LogSink,
        mut progress: F,
    ) -> Result<BatchSummary, ConvertError>
    where
        F: FnMut(BatchProgress<'_>),
    {
        let source_root = source_root.as_ref();
        log.info("Starting material conversion...");

        let sources = match self.find_sources(source_root) {
            Ok(sources) if sources.is_empty() => {
                let err = ConvertError::NoInputFiles {
                    folder: source_root.to_path_buf(),
                    extension: self.resolver.config().source_extension.clone(),
                };
                log.error(&err.to_string());
                return Err(err);
            }
            Ok(sources) => sources,
            Err(err) => {
                log.error(&err.to_string());
                return Err(err);
            }
        };

        let mut summary = BatchSummary {
            files_found: sources.len(),
            ..BatchSummary::default()
        };
        log.info(&format!("Found {} VMT files to process.", sources.len()));

        for path in &sources {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                log.warn("Conversion cancelled.");
                break;
            }

            let outcome = self.convert_file(path, source_root, index, log, &mut summary);
            summary.record(outcome);
            progress(BatchProgress {
                completed: summary.files_processed,
                total: summary.files_found,
                path,
                outcome,
            });
        }

        match index.flush() {
            Ok(saved) => summary.records_flushed = saved,
            Err(e) => {
                log.error(&format!("Failed to save updated materials: {e}"));
                summary.store_failures += 1;
            }
        }

        log.info("");
        log.info(&format!("Material conversion complete! {summary}"));
        Ok(summary)
    }

    fn convert_file(
        &self,
        path: &Path,
        source_root: &Path,
        index: &mut dyn AssetIndex,
        log: &mut dyn LogSink,
        summary: &mut BatchSummary,
    ) -> FileOutcome {
        let name = path.file_stem().map_or_else(
            || path.display().to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );
        log.info("");
        log.info(&format!("Processing material: {name}"));

        let parsed = match VmtParser::parse_file(path, source_root) {
            Ok(parsed) => parsed,
            Err(e) => {
                log.error(&format!("  - ERROR parsing VMT file: {}", describe(&e)));
                return FileOutcome::ReadFailed;
            }
        };

        let resolution = self.resolver.resolve(&parsed, index);
        resolution.write_to(log);
        summary.textures_bound += resolution.bound_count();
        summary.textures_unresolved += resolution.unresolved_count();

        FileOutcome::Resolved(resolution.status)
    }
}

fn describe(error: &AssetError) -> String {
    match error {
        AssetError::ReadFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{InMemoryAssetIndex, TextureSlot};
    use crate::report::{BoundedLog, NullLog};
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_empty_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "readme.txt", b"nothing here");
        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        let mut log = BoundedLog::new(1000);

        let result = BatchConverter::new(ConverterConfig::default()).run(dir.path(), &mut index, &mut log);

        assert!(matches!(result, Err(ConvertError::NoInputFiles { .. })));
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn test_missing_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = InMemoryAssetIndex::new();
        let mut log = BoundedLog::new(1000);

        let result = BatchConverter::new(ConverterConfig::default()).run(
            dir.path().join("missing"),
            &mut index,
            &mut log,
        );

        assert!(matches!(result, Err(ConvertError::SourceNotFound(_))));
    }

    #[test]
    fn test_headless_batch_without_retained_log() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "walls/brick.vmt", br#"$basetexture "brick/diffuse.vtf""#);

        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        index.add_image("brick/diffuse.png");

        let summary = BatchConverter::new(ConverterConfig::default())
            .run(dir.path(), &mut index, &mut NullLog)
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.created, 1);
        let record = index.record("walls/brick.mat").unwrap();
        assert_eq!(record.slot_texture(TextureSlot::Albedo), Some("brick/diffuse.png"));
    }

    #[test]
    fn test_bad_file_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a_broken.vmt", &[0xff, 0xfe, 0xfd]);
        write(dir.path(), "b_plain.vmt", br#""$color" "[1 1 1]""#);
        write(dir.path(), "c_good.vmt", br#""$basetexture" "good/albedo""#);

        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        index.add_image("good/albedo.png");
        let mut log = BoundedLog::new(10_000);

        let summary = BatchConverter::new(ConverterConfig::default())
            .run(dir.path(), &mut index, &mut log)
            .unwrap();

        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.read_failures, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.textures_bound, 1);
        assert!(!summary.is_success());
        assert!(index.record_exists("c_good.mat"));
        assert!(log.text().contains("Material conversion complete!"));
    }

    #[test]
    fn test_progress_called_once_per_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one.vmt", br#""$basetexture" "x""#);
        write(dir.path(), "sub/two.vmt", br#""$basetexture" "y""#);

        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        let mut log = BoundedLog::new(10_000);
        let mut seen = Vec::new();

        let summary = BatchConverter::new(ConverterConfig::default())
            .run_with_progress(dir.path(), &mut index, &mut log, |p| {
                seen.push((p.completed, p.total, p.outcome));
            })
            .unwrap();

        let created = FileOutcome::Resolved(ResolveStatus::Created);
        assert_eq!(seen, vec![(1, 2, created), (2, 2, created)]);
        assert_eq!(summary.textures_unresolved, 2);
        assert!(summary.is_success());
    }

    #[test]
    fn test_cancellation_stops_between_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.vmt", br#""$basetexture" "x""#);
        write(dir.path(), "b.vmt", br#""$basetexture" "y""#);
        write(dir.path(), "c.vmt", br#""$basetexture" "z""#);

        let converter = BatchConverter::new(ConverterConfig::default());
        let token = converter.cancellation_token();
        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        let mut log = BoundedLog::new(10_000);

        let summary = converter
            .run_with_progress(dir.path(), &mut index, &mut log, |p| {
                if p.completed == 1 {
                    token.cancel();
                }
            })
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.files_processed, 1);
        assert_eq!(index.record_count(), 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_progress_fraction() {
        let path = Path::new("a.vmt");
        let progress = BatchProgress {
            completed: 1,
            total: 4,
            path,
            outcome: FileOutcome::ReadFailed,
        };
        assert!((progress.fraction() - 0.25).abs() < f32::EPSILON);
    }
}
