//! Command-line interface for batch reordering of ASCII graymap files

use crate::algorithm::builder::Linkage;
use crate::algorithm::distance::Metric;
use crate::algorithm::executor::{PipelineConfig, Reorderer};
use crate::algorithm::ordering::{OrderingReport, Strategy};
use crate::dataset::shuffle::shuffle_rows;
use crate::io::configuration::{
    DEFAULT_OPTIMAL_LEAF_LIMIT, DEFAULT_SEED, PGM_EXTENSION, PREVIEW_EXTENSION, PREVIEW_SUFFIX,
};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::image::export_raster_as_png;
use crate::io::pgm::{read_pgm, write_pgm};
use crate::io::progress::ProgressManager;
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Which strategies to run on each input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StrategySelection {
    /// Local junction heuristic only
    Local,
    /// Optimal leaf ordering only
    Optimal,
    /// Both strategies, each on a fresh tree
    #[default]
    Both,
}

impl StrategySelection {
    /// Strategies to run, in order
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            Self::Local => vec![Strategy::Local],
            Self::Optimal => vec![Strategy::Optimal],
            Self::Both => vec![Strategy::Local, Strategy::Optimal],
        }
    }
}

#[derive(Parser)]
#[command(name = "leaforder")]
#[command(
    author,
    version,
    about = "Reorder raster rows so that similar rows sit next to each other"
)]
/// Command-line arguments for the row reordering tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PGM file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for the row shuffle applied before clustering
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Cluster the rows in their file order instead of shuffling first
    #[arg(long)]
    pub no_shuffle: bool,

    /// Reordering strategies to run
    #[arg(short = 'S', long, value_enum, default_value_t)]
    pub strategy: StrategySelection,

    /// Row distance metric
    #[arg(short, long, value_enum, default_value_t = Metric::Euclidean)]
    pub metric: Metric,

    /// Cluster linkage rule
    #[arg(short, long, value_enum, default_value_t = Linkage::Average)]
    pub linkage: Linkage,

    /// Largest row count for the optimal strategy before falling back to local
    #[arg(long, default_value_t = DEFAULT_OPTIMAL_LEAF_LIMIT)]
    pub optimal_limit: usize,

    /// Run the optimal strategy regardless of row count
    #[arg(long)]
    pub no_optimal_limit: bool,

    /// Also write a PNG preview of each reordered raster
    #[arg(short, long)]
    pub png: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Suppress progress output and all logging below errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Check if rows are shuffled before the first build
    pub const fn should_shuffle(&self) -> bool {
        !self.no_shuffle
    }

    /// Log level implied by the verbosity flags; `--quiet` wins over `--verbose`
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Install the global logger; `RUST_LOG` refines the flag-derived level
    pub fn init_logging(&self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.log_level());
        builder.parse_default_env();
        // A logger installed earlier (tests, embedding) keeps precedence
        let _ = builder.try_init();
    }

    /// Pipeline configuration selected by the flags, for the given strategy
    pub const fn pipeline_config(&self, strategy: Strategy) -> PipelineConfig {
        PipelineConfig {
            metric: self.metric,
            linkage: self.linkage,
            strategy,
            optimal_leaf_limit: if self.no_optimal_limit {
                None
            } else {
                Some(self.optimal_limit)
            },
        }
    }
}

/// Orchestrates batch processing of PGM files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_pgm(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a PGM image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in
                std::fs::read_dir(&self.cli.target).with_path(&self.cli.target, "read directory")?
            {
                let path = entry.with_path(&self.cli.target, "read directory")?.path();
                if is_pgm(&path) && !is_generated_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a PGM file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let all_exist = self
            .cli
            .strategy
            .strategies()
            .into_iter()
            .all(|strategy| Self::get_output_path(input_path, strategy).exists());
        if all_exist {
            info!("Skipping: {} (output exists)", input_path.display());
        }
        !all_exist
    }

    /// Reorder one file with every selected strategy and write the results
    ///
    /// Each strategy runs on a fresh tree built from the same shuffled rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the reordered
    /// tree fails validation, or an output cannot be written
    pub fn process_file(&mut self, input_path: &Path, index: usize) -> Result<Vec<OrderingReport>> {
        let start_time = Instant::now();
        let strategies = self.cli.strategy.strategies();
        let name = input_path.display().to_string();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, 1 + 3 * strategies.len());
        }

        let raster = read_pgm(input_path)?;
        let rows = if self.cli.should_shuffle() {
            shuffle_rows(raster.rows(), self.cli.seed)
        } else {
            raster.rows().to_vec()
        };

        let mut reports = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            let mut reorderer = Reorderer::new(self.cli.pipeline_config(strategy));

            self.advance(index, &format!("clustering ({strategy})"));
            reorderer.build(&rows)?;
            info!(
                "{name}: overall distance before ordering with {strategy} strategy: {:.3}",
                reorderer.score()
            );

            self.advance(index, &format!("ordering ({strategy})"));
            let report = reorderer.sort()?;
            info!(
                "{name}: overall distance after ordering with {} strategy: {:.3}",
                report.applied, report.score_after
            );

            self.advance(index, &format!("writing ({strategy})"));
            let output = raster.with_rows(reorderer.ordered_rows())?;
            write_pgm(&Self::get_output_path(input_path, strategy), &output)?;
            if self.cli.png {
                export_raster_as_png(&output, &Self::get_preview_path(input_path, strategy))?;
            }

            reorderer.clear();
            reports.push(report);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(reports)
    }

    fn advance(&mut self, index: usize, stage: &str) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.advance(index, stage);
        }
    }

    /// Output path for a strategy: `<stem>_<strategy>.pgm` beside the input
    pub fn get_output_path(input_path: &Path, strategy: Strategy) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}_{strategy}.{PGM_EXTENSION}", stem.to_string_lossy());
        sibling(input_path, output_name)
    }

    /// Preview path for a strategy: `<stem>_<strategy>_preview.png` beside the input
    pub fn get_preview_path(input_path: &Path, strategy: Strategy) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let preview_name = format!(
            "{}_{strategy}{PREVIEW_SUFFIX}.{PREVIEW_EXTENSION}",
            stem.to_string_lossy()
        );
        sibling(input_path, preview_name)
    }
}

fn is_pgm(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PGM_EXTENSION))
}

/// Whether the file stem carries a suffix this tool appends to its outputs
fn is_generated_output(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
        return false;
    };
    Strategy::value_variants()
        .iter()
        .map(|strategy| format!("_{strategy}"))
        .chain([PREVIEW_SUFFIX.to_owned()])
        .any(|suffix| stem.ends_with(suffix.as_str()))
}

fn sibling(input_path: &Path, name: String) -> PathBuf {
    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}
