//! Detection, validation and loading of the files the Orchestrator writes
//! for one placement run.

pub mod dataset;
pub mod detect;
pub mod error;
pub mod kind;
pub mod portfolio;
pub mod table;

pub use dataset::{PlacementDataset, Tables, load_tables};
pub use detect::{FileSet, RunIdentity, detect_files};
pub use error::DataError;
pub use kind::DataKind;
pub use portfolio::Portfolio;
pub use table::{AppEdgeCost, AppToHw, EdgeLoad, HwToApp, NodeLoad};
