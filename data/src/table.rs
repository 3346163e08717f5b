use crate::error::DataError;
use crate::portfolio::{Column, ColumnType};

#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Empty,
    Str(String),
    Int(u64),
    Num(f64),
}

impl Field {
    pub fn is_empty(&self) -> bool {
        matches!(self, Field::Empty)
    }
}

/// A headerless CSV file, typed per the column schema of its kind.
#[derive(Clone, Debug)]
pub struct Table {
    pub columns: &'static [Column],
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug)]
pub struct Row {
    /// 1-based line in the source file.
    pub line: usize,
    pub fields: Vec<Field>,
}

impl Row {
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(Field::is_empty)
    }

    pub fn is_incomplete(&self) -> bool {
        self.fields.iter().any(Field::is_empty)
    }
}

fn parse_field(file: &str, line: usize, column: &Column, raw: &str) -> Result<Field, DataError> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    if raw.is_empty() {
        return Ok(Field::Empty);
    }
    let malformed = || DataError::MalformedRow {
        file: file.to_string(),
        line,
        column: column.name,
        value: raw.to_string(),
    };
    Ok(match column.ty {
        ColumnType::Str => Field::Str(raw.to_string()),
        ColumnType::Int => Field::Int(raw.parse().map_err(|_| malformed())?),
        ColumnType::Num => Field::Num(raw.parse().map_err(|_| malformed())?),
    })
}

impl Table {
    /// Parses `text` against `columns`. `file` is only used for error
    /// messages. Blank lines are kept as blank rows.
    pub fn parse(file: &str, text: &str, columns: &'static [Column]) -> Result<Table, DataError> {
        let mut rows = vec![];
        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let raw: Vec<&str> = if line.trim().is_empty() {
                vec![]
            } else {
                line.split(',').collect()
            };
            if raw.len() > columns.len() {
                Err(DataError::TooManyFields {
                    file: file.to_string(),
                    line: lineno,
                    expected: columns.len(),
                    found: raw.len(),
                })?
            }
            let mut fields = Vec::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                fields.push(match raw.get(i) {
                    Some(raw) => parse_field(file, lineno, column, raw)?,
                    None => Field::Empty,
                });
            }
            rows.push(Row {
                line: lineno,
                fields,
            });
        }
        Ok(Table { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn drop_blank_rows(mut self) -> Self {
        self.rows.retain(|row| !row.is_blank());
        self
    }

    pub fn records<T: FromRow>(&self, file: &str) -> Result<Vec<T>, DataError> {
        self.rows
            .iter()
            .map(|row| T::from_row(row, self.columns, file))
            .collect()
    }

    /// Splits the node loading table into its core and mailbox partitions.
    ///
    /// Rows with an empty field mark partition boundaries: the first row is
    /// the core partition label, and the second boundary (a blank row or a
    /// mailbox partition label) starts the mailbox partition. Blank rows
    /// join the boundary they follow. A label right after the core label
    /// still starts the mailbox partition, leaving the core one empty.
    pub fn split_partitions(self, file: &str) -> Result<(Table, Table), DataError> {
        let mut boundaries = vec![];
        let mut prev_boundary = false;
        for (idx, row) in self.rows.iter().enumerate() {
            let boundary = idx == 0 || row.is_incomplete();
            let opens = if idx == 0 {
                true
            } else if !boundary {
                false
            } else if !prev_boundary {
                true
            } else {
                !row.is_blank() && boundaries.len() == 1
            };
            if opens {
                boundaries.push(idx);
            }
            prev_boundary = boundary;
        }
        let Some(&split) = boundaries.get(1) else {
            Err(DataError::MissingPartition {
                file: file.to_string(),
            })?
        };
        let columns = self.columns;
        let mut rows = self.rows;
        let mut mailbox = rows.split_off(split);
        let mut core = rows;
        let core_start = core
            .iter()
            .position(|row| !row.is_incomplete())
            .unwrap_or(core.len())
            .max(1);
        core.drain(..core_start.min(core.len()));
        let mailbox_start = mailbox
            .iter()
            .position(|row| !row.is_incomplete())
            .unwrap_or(mailbox.len());
        mailbox.drain(..mailbox_start);
        mailbox.retain(|row| !row.is_blank());
        Ok((
            Table {
                columns,
                rows: core,
            },
            Table {
                columns,
                rows: mailbox,
            },
        ))
    }
}

pub trait FromRow: Sized {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError>;
}

fn missing(row: &Row, columns: &'static [Column], idx: usize, file: &str) -> DataError {
    DataError::MalformedRow {
        file: file.to_string(),
        line: row.line,
        column: columns[idx].name,
        value: String::new(),
    }
}

fn get_str(row: &Row, columns: &'static [Column], idx: usize, file: &str) -> Result<String, DataError> {
    match row.fields.get(idx) {
        Some(Field::Str(s)) => Ok(s.clone()),
        _ => Err(missing(row, columns, idx, file)),
    }
}

fn get_int(row: &Row, columns: &'static [Column], idx: usize, file: &str) -> Result<u64, DataError> {
    match row.fields.get(idx) {
        Some(&Field::Int(n)) => Ok(n),
        _ => Err(missing(row, columns, idx, file)),
    }
}

fn get_num(row: &Row, columns: &'static [Column], idx: usize, file: &str) -> Result<f64, DataError> {
    match row.fields.get(idx) {
        Some(&Field::Num(n)) => Ok(n),
        Some(&Field::Int(n)) => Ok(n as f64),
        _ => Err(missing(row, columns, idx, file)),
    }
}

/// Number of application nodes placed on one core or mailbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeLoad {
    pub node: String,
    pub load: u64,
}

/// Number of application edges routed over one hardware edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeLoad {
    pub from: String,
    pub to: String,
    pub load: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppEdgeCost {
    pub from: String,
    pub to: String,
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppToHw {
    pub appnode: String,
    pub hwnode: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HwToApp {
    pub hwnode: String,
    pub appnode: String,
}

impl FromRow for NodeLoad {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError> {
        Ok(NodeLoad {
            node: get_str(row, columns, 0, file)?,
            load: get_int(row, columns, 1, file)?,
        })
    }
}

impl FromRow for EdgeLoad {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError> {
        Ok(EdgeLoad {
            from: get_str(row, columns, 0, file)?,
            to: get_str(row, columns, 1, file)?,
            load: get_int(row, columns, 2, file)?,
        })
    }
}

impl FromRow for AppEdgeCost {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError> {
        Ok(AppEdgeCost {
            from: get_str(row, columns, 0, file)?,
            to: get_str(row, columns, 1, file)?,
            cost: get_num(row, columns, 2, file)?,
        })
    }
}

impl FromRow for AppToHw {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError> {
        Ok(AppToHw {
            appnode: get_str(row, columns, 0, file)?,
            hwnode: get_str(row, columns, 1, file)?,
        })
    }
}

impl FromRow for HwToApp {
    fn from_row(row: &Row, columns: &'static [Column], file: &str) -> Result<Self, DataError> {
        Ok(HwToApp {
            hwnode: get_str(row, columns, 0, file)?,
            appnode: get_str(row, columns, 1, file)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::kind::DataKind;
    use crate::portfolio::Portfolio;

    fn node_table(text: &str) -> Table {
        let columns = Portfolio::standard().columns(DataKind::NodeLoading);
        Table::parse("nodes.csv", text, columns).unwrap()
    }

    fn loads(table: &Table) -> Vec<(String, u64)> {
        table
            .records::<NodeLoad>("nodes.csv")
            .unwrap()
            .into_iter()
            .map(|r| (r.node, r.load))
            .collect()
    }

    #[test]
    fn test_split_blank_rows() {
        let table = node_table("Core loading\n\ncore,5\ncore,3\n\nmbox,2\nmbox,7\n");
        assert_eq!(table.len(), 7);
        let (core, mbox) = table.split_partitions("nodes.csv").unwrap();
        assert_eq!(loads(&core), [("core".to_string(), 5), ("core".to_string(), 3)]);
        assert_eq!(loads(&mbox), [("mbox".to_string(), 2), ("mbox".to_string(), 7)]);
    }

    #[test]
    fn test_split_label_rows() {
        let table = node_table("Core loading,\nc0,1\nc1,2\nc2,4\nMailbox loading,\nm0,3\n");
        let total = table.len();
        let (core, mbox) = table.split_partitions("nodes.csv").unwrap();
        assert_eq!(core.len() + mbox.len(), total - 2);
        assert_eq!(loads(&core)[2], ("c2".to_string(), 4));
        assert_eq!(loads(&mbox), [("m0".to_string(), 3)]);
    }

    #[test]
    fn test_split_empty_core() {
        let table = node_table("Core loading,\nMailbox loading,\nm0,3\nm1,4\n");
        let (core, mbox) = table.split_partitions("nodes.csv").unwrap();
        assert!(core.is_empty());
        assert_eq!(loads(&mbox), [("m0".to_string(), 3), ("m1".to_string(), 4)]);

        let table = node_table("Core loading\n\nMailbox loading\nm0,3\n");
        let (core, mbox) = table.split_partitions("nodes.csv").unwrap();
        assert!(core.is_empty());
        assert_eq!(loads(&mbox), [("m0".to_string(), 3)]);
    }

    #[test]
    fn test_split_blank_then_label() {
        let table = node_table("Core loading,\nc0,1\n\nMailbox loading,\nm0,3\n");
        let (core, mbox) = table.split_partitions("nodes.csv").unwrap();
        assert_eq!(loads(&core), [("c0".to_string(), 1)]);
        assert_eq!(loads(&mbox), [("m0".to_string(), 3)]);
    }

    #[test]
    fn test_split_missing_boundary() {
        let table = node_table("Core loading\ncore,5\ncore,3\n");
        assert_matches!(
            table.split_partitions("nodes.csv"),
            Err(DataError::MissingPartition { .. })
        );
    }

    #[test]
    fn test_malformed() {
        let columns = Portfolio::standard().columns(DataKind::HwEdgeLoading);
        assert_matches!(
            Table::parse("edges.csv", "a,b,1\na,c,lots\n", columns),
            Err(DataError::MalformedRow { line: 2, column: "load", .. })
        );
        assert_matches!(
            Table::parse("edges.csv", "a,b,1,2\n", columns),
            Err(DataError::TooManyFields {
                expected: 3,
                found: 4,
                ..
            })
        );
    }

    #[test]
    fn test_incomplete_record() {
        let columns = Portfolio::standard().columns(DataKind::AppToHw);
        let table = Table::parse("map.csv", "a0,O_.x.y.Ay.B00.M00\na1\n", columns).unwrap();
        assert_matches!(
            table.records::<AppToHw>("map.csv"),
            Err(DataError::MalformedRow {
                line: 2,
                column: "hwnode",
                ..
            })
        );
    }

    #[test]
    fn test_costs_accept_integers() {
        let columns = Portfolio::standard().columns(DataKind::AppEdgeCosts);
        let table = Table::parse("costs.csv", "a,b,3\n\"a\",c,0.5\n", columns)
            .unwrap()
            .drop_blank_rows();
        let costs = table.records::<AppEdgeCost>("costs.csv").unwrap();
        assert_eq!(costs[0].cost, 3.0);
        assert_eq!(costs[1].from, "a");
        assert_eq!(costs[1].cost, 0.5);
    }
}
