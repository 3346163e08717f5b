use std::sync::LazyLock;

use enum_map::{EnumMap, enum_map};
use regex::Regex;

use crate::kind::DataKind;

// YYYY-MM-DDTHH-MM-SS
const RE_TIMESTAMP: &str = "[0-9]{4}(?:-[0-9]{2}){2}T[0-9]{2}(?:-[0-9]{2}){2}";
const RE_APPNAME: &str = ".+";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Num,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

const COLS_APP_EDGE_COSTS: &[Column] = &[
    col("from", ColumnType::Str),
    col("to", ColumnType::Str),
    col("cost", ColumnType::Num),
];
const COLS_APP_TO_HW: &[Column] = &[
    col("appnode", ColumnType::Str),
    col("hwnode", ColumnType::Str),
];
const COLS_HW_EDGE_LOADING: &[Column] = &[
    col("from", ColumnType::Str),
    col("to", ColumnType::Str),
    col("load", ColumnType::Int),
];
const COLS_HW_TO_APP: &[Column] = &[
    col("hwnode", ColumnType::Str),
    col("appnode", ColumnType::Str),
];
const COLS_NODE_LOADING: &[Column] = &[col("node", ColumnType::Str), col("load", ColumnType::Int)];

#[derive(Debug)]
pub struct PatternSpec {
    pub regex: Regex,
    /// Empty for files that are not tables.
    pub columns: &'static [Column],
}

/// What a matching file name tells us about its run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameCaptures<'a> {
    pub appname: Option<&'a str>,
    pub timestamp: &'a str,
}

impl PatternSpec {
    fn new(pattern: &str, columns: &'static [Column]) -> Self {
        let regex = Regex::new(&format!("^{pattern}$")).unwrap();
        assert!(matches!(regex.captures_len(), 2 | 3));
        PatternSpec { regex, columns }
    }

    pub fn captures<'a>(&self, fname: &'a str) -> Option<NameCaptures<'a>> {
        let caps = self.regex.captures(fname)?;
        if caps.len() == 3 {
            Some(NameCaptures {
                appname: Some(caps.get(1)?.as_str()),
                timestamp: caps.get(2)?.as_str(),
            })
        } else {
            Some(NameCaptures {
                appname: None,
                timestamp: caps.get(1)?.as_str(),
            })
        }
    }
}

/// The set of files making up one placement run.
#[derive(Debug)]
pub struct Portfolio {
    pub specs: EnumMap<DataKind, PatternSpec>,
}

impl Portfolio {
    pub fn new() -> Self {
        let app_ts = format!("({RE_APPNAME})_({RE_TIMESTAMP})");
        let ts = format!("({RE_TIMESTAMP})");
        Portfolio {
            specs: enum_map! {
                DataKind::AppEdgeCosts => PatternSpec::new(
                    &format!(r"placement_gi_edges_{app_ts}\.csv"),
                    COLS_APP_EDGE_COSTS,
                ),
                DataKind::AppToHw => PatternSpec::new(
                    &format!(r"placement_gi_to_hardware_{app_ts}\.csv"),
                    COLS_APP_TO_HW,
                ),
                DataKind::Diagnostics => PatternSpec::new(
                    &format!(r"placement_diagnostics_{app_ts}\.txt"),
                    &[],
                ),
                DataKind::HwEdgeLoading => PatternSpec::new(
                    &format!(r"placement_edge_loading_{ts}\.csv"),
                    COLS_HW_EDGE_LOADING,
                ),
                DataKind::HwToApp => PatternSpec::new(
                    &format!(r"placement_hardware_to_gi_{app_ts}\.csv"),
                    COLS_HW_TO_APP,
                ),
                DataKind::NodeLoading => PatternSpec::new(
                    &format!(r"placement_node_loading_{ts}\.csv"),
                    COLS_NODE_LOADING,
                ),
            },
        }
    }

    /// The portfolio written by the Orchestrator.
    pub fn standard() -> &'static Portfolio {
        static PORTFOLIO: LazyLock<Portfolio> = LazyLock::new(Portfolio::new);
        &PORTFOLIO
    }

    pub fn spec(&self, kind: DataKind) -> &PatternSpec {
        &self.specs[kind]
    }

    pub fn columns(&self, kind: DataKind) -> &'static [Column] {
        self.specs[kind].columns
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2020-01-01T00-00-00";

    fn matching(fname: &str) -> Vec<DataKind> {
        let portfolio = Portfolio::standard();
        DataKind::ALL
            .into_iter()
            .filter(|&kind| portfolio.spec(kind).captures(fname).is_some())
            .collect()
    }

    #[test]
    fn test_patterns_exclusive() {
        for (fname, kind) in [
            (format!("placement_gi_edges_demo_{TS}.csv"), DataKind::AppEdgeCosts),
            (format!("placement_gi_to_hardware_demo_{TS}.csv"), DataKind::AppToHw),
            (format!("placement_diagnostics_demo_{TS}.txt"), DataKind::Diagnostics),
            (format!("placement_edge_loading_{TS}.csv"), DataKind::HwEdgeLoading),
            (format!("placement_hardware_to_gi_demo_{TS}.csv"), DataKind::HwToApp),
            (format!("placement_node_loading_{TS}.csv"), DataKind::NodeLoading),
        ] {
            assert_eq!(matching(&fname), vec![kind], "{fname}");
        }
    }

    #[test]
    fn test_captures() {
        let portfolio = Portfolio::standard();
        let caps = portfolio
            .spec(DataKind::AppToHw)
            .captures("placement_gi_to_hardware_my_app_2021-12-31T23-59-58.csv")
            .unwrap();
        assert_eq!(caps.appname, Some("my_app"));
        assert_eq!(caps.timestamp, "2021-12-31T23-59-58");
        let fname = format!("placement_node_loading_{TS}.csv");
        let caps = portfolio
            .spec(DataKind::NodeLoading)
            .captures(&fname)
            .unwrap();
        assert_eq!(caps.appname, None);
        assert_eq!(caps.timestamp, TS);
    }

    #[test]
    fn test_no_match() {
        assert!(matching("readme.md").is_empty());
        assert!(matching(&format!("placement_node_loading_{TS}.csv.bak")).is_empty());
        assert!(matching("placement_node_loading_2020-01-01.csv").is_empty());
        assert!(matching(&format!("placement_gi_edges__{TS}.csv")).is_empty());
    }
}
