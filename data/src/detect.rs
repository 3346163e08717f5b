use std::path::Path;

use enum_map::EnumMap;
use tracing::{debug, info};

use crate::error::DataError;
use crate::kind::DataKind;
use crate::portfolio::Portfolio;

/// The application and timestamp shared by every file of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunIdentity {
    /// `None` only if no matched file name carries an application name.
    pub appname: Option<String>,
    pub timestamp: String,
}

/// Maps each kind of file to its name within the run directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSet {
    files: EnumMap<DataKind, Option<String>>,
}

impl FileSet {
    pub fn get(&self, kind: DataKind) -> Option<&str> {
        self.files[kind].as_deref()
    }

    pub fn unresolved(&self) -> Vec<DataKind> {
        self.files
            .iter()
            .filter(|(_, fname)| fname.is_none())
            .map(|(kind, _)| kind)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.files.values().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataKind, &str)> {
        self.files
            .iter()
            .filter_map(|(kind, fname)| Some((kind, fname.as_deref()?)))
    }
}

#[derive(Debug, Default)]
struct Detector {
    files: FileSet,
    appname: Option<String>,
    timestamp: Option<String>,
}

impl Detector {
    fn visit(&mut self, portfolio: &Portfolio, fname: &str) -> Result<(), DataError> {
        for (kind, spec) in &portfolio.specs {
            let Some(caps) = spec.captures(fname) else {
                continue;
            };
            if let Some(ref first) = self.files.files[kind] {
                Err(DataError::DuplicateFile {
                    kind,
                    first: first.clone(),
                    second: fname.to_string(),
                })?
            }
            self.files.files[kind] = Some(fname.to_string());

            match self.timestamp {
                Some(ref timestamp) if timestamp != caps.timestamp => {
                    Err(DataError::TimestampMismatch {
                        file: fname.to_string(),
                        expected: timestamp.clone(),
                        found: caps.timestamp.to_string(),
                    })?
                }
                Some(_) => (),
                None => self.timestamp = Some(caps.timestamp.to_string()),
            }

            if let Some(appname) = caps.appname {
                match self.appname {
                    Some(ref first) if first != appname => Err(DataError::AppnameMismatch {
                        file: fname.to_string(),
                        expected: first.clone(),
                        found: appname.to_string(),
                    })?,
                    Some(_) => (),
                    None => self.appname = Some(appname.to_string()),
                }
            }
            return Ok(());
        }
        debug!("ignoring {fname}");
        Ok(())
    }

    fn finish(self) -> Result<(FileSet, RunIdentity), DataError> {
        let missing = self.files.unresolved();
        if !missing.is_empty() {
            Err(DataError::MissingFiles(missing))?
        }
        let run = RunIdentity {
            appname: self.appname,
            timestamp: self.timestamp.unwrap_or_default(),
        };
        Ok((self.files, run))
    }
}

/// Finds the files of a single placement run in `dir`.
///
/// Fails if `dir` is not a directory, if any kind of file is missing or
/// present more than once, or if the file names disagree on the
/// application name or timestamp. Entries that match no known kind are
/// ignored.
pub fn detect_files(
    dir: impl AsRef<Path>,
    portfolio: &Portfolio,
) -> Result<(FileSet, RunIdentity), DataError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        Err(DataError::NotADirectory(dir.to_path_buf()))?
    }
    let entries = std::fs::read_dir(dir).map_err(|e| DataError::Io(dir.to_path_buf(), e))?;
    let mut fnames = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| DataError::Io(dir.to_path_buf(), e))?;
        match entry.file_name().into_string() {
            Ok(fname) => fnames.push(fname),
            Err(fname) => debug!("ignoring {}", fname.to_string_lossy()),
        }
    }
    fnames.sort();

    let mut detector = Detector::default();
    for fname in &fnames {
        detector.visit(portfolio, fname)?;
    }
    let (files, run) = detector.finish()?;
    info!(
        "detected placement run {} at {}",
        run.appname.as_deref().unwrap_or("<unnamed>"),
        run.timestamp
    );
    Ok((files, run))
}
