use std::path::{Path, PathBuf};

use tracing::debug;

use crate::detect::{FileSet, RunIdentity, detect_files};
use crate::error::DataError;
use crate::kind::DataKind;
use crate::portfolio::Portfolio;
use crate::table::{AppEdgeCost, AppToHw, EdgeLoad, FromRow, HwToApp, NodeLoad, Table};

/// Every table of a placement run, with node loading split into its core
/// and mailbox partitions.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub app_edge_costs: Vec<AppEdgeCost>,
    pub app_to_hw: Vec<AppToHw>,
    pub hw_edge_loading: Vec<EdgeLoad>,
    pub hw_to_app: Vec<HwToApp>,
    pub core_loading: Vec<NodeLoad>,
    pub mailbox_loading: Vec<NodeLoad>,
}

struct Loader<'a> {
    dir: &'a Path,
    files: &'a FileSet,
    portfolio: &'a Portfolio,
}

impl Loader<'_> {
    fn fname(&self, kind: DataKind) -> &str {
        // checked complete by load_tables
        self.files.get(kind).unwrap_or_default()
    }

    fn read(&self, kind: DataKind) -> Result<String, DataError> {
        let path = self.dir.join(self.fname(kind));
        debug!("reading {kind} from {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| DataError::Io(path, e))
    }

    fn table(&self, kind: DataKind) -> Result<Table, DataError> {
        let text = self.read(kind)?;
        Table::parse(self.fname(kind), &text, self.portfolio.columns(kind))
    }

    fn records<T: FromRow>(&self, kind: DataKind) -> Result<Vec<T>, DataError> {
        self.table(kind)?
            .drop_blank_rows()
            .records(self.fname(kind))
    }
}

/// Reads every table named by `files` from `dir`.
pub fn load_tables(
    dir: impl AsRef<Path>,
    files: &FileSet,
    portfolio: &Portfolio,
) -> Result<Tables, DataError> {
    if !files.is_complete() {
        Err(DataError::NotDetected(files.unresolved()))?
    }
    let loader = Loader {
        dir: dir.as_ref(),
        files,
        portfolio,
    };
    let fname = loader.fname(DataKind::NodeLoading);
    let (core, mailbox) = loader
        .table(DataKind::NodeLoading)?
        .split_partitions(fname)?;
    Ok(Tables {
        app_edge_costs: loader.records(DataKind::AppEdgeCosts)?,
        app_to_hw: loader.records(DataKind::AppToHw)?,
        hw_edge_loading: loader.records(DataKind::HwEdgeLoading)?,
        hw_to_app: loader.records(DataKind::HwToApp)?,
        core_loading: core.records(fname)?,
        mailbox_loading: mailbox.records(fname)?,
    })
}

/// The complete, validated output of one placement run.
///
/// Only [`PlacementDataset::open`] creates one, so every dataset has passed
/// detection and loading.
#[derive(Clone, Debug)]
pub struct PlacementDataset {
    dir: PathBuf,
    files: FileSet,
    run: RunIdentity,
    tables: Tables,
    diagnostics: String,
}

impl PlacementDataset {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        Self::open_with(dir, Portfolio::standard())
    }

    pub fn open_with(dir: impl AsRef<Path>, portfolio: &Portfolio) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        let (files, run) = detect_files(dir, portfolio)?;
        let tables = load_tables(dir, &files, portfolio)?;
        let diagnostics = Loader {
            dir,
            files: &files,
            portfolio,
        }
        .read(DataKind::Diagnostics)?;
        Ok(PlacementDataset {
            dir: dir.to_path_buf(),
            files,
            run,
            tables,
            diagnostics,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn run(&self) -> &RunIdentity {
        &self.run
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// The placement diagnostics file, verbatim.
    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }
}
