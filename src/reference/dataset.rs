//! Raw reference dataset: named sheets of header plus rows.
//!
//! A dataset mirrors the carrier's rate workbook. On disk it is a directory
//! holding one YAML file per sheet:
//!
//! ```text
//! data/reference/
//! ├── base_rates.yaml    # "Base Rates": Weight (lbs), Zone 1 .. Zone 8
//! ├── zone_chart.yaml    # "Zone Chart": Origin Prefix, Destination, Zone
//! ├── das_zips.yaml      # "DAS Zips": Zip
//! ├── edas_zips.yaml     # "EDAS Zips": Zip
//! └── remote_zips.yaml   # "Remote Zips": Zip
//! ```
//!
//! No interpretation happens here; [`RateTableIndex`](super::RateTableIndex)
//! checks the schema and builds the lookup structures.

use std::fmt;
use std::path::Path;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::config::load_yaml;
use crate::error::{EngineError, EngineResult};

/// Expected name, file and headers of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    /// Sheet name.
    pub name: &'static str,
    /// File name inside a dataset directory.
    pub file: &'static str,
    /// Exact header row.
    pub columns: &'static [&'static str],
}

/// The base-rate matrix sheet.
pub const BASE_RATES: SheetSchema = SheetSchema {
    name: "Base Rates",
    file: "base_rates.yaml",
    columns: &[
        "Weight (lbs)",
        "Zone 1",
        "Zone 2",
        "Zone 3",
        "Zone 4",
        "Zone 5",
        "Zone 6",
        "Zone 7",
        "Zone 8",
    ],
};

/// The zone chart sheet.
pub const ZONE_CHART: SheetSchema = SheetSchema {
    name: "Zone Chart",
    file: "zone_chart.yaml",
    columns: &["Origin Prefix", "Destination", "Zone"],
};

/// Delivery Area Surcharge zips.
pub const DAS_ZIPS: SheetSchema = SheetSchema {
    name: "DAS Zips",
    file: "das_zips.yaml",
    columns: &["Zip"],
};

/// Extended Delivery Area Surcharge zips.
pub const EDAS_ZIPS: SheetSchema = SheetSchema {
    name: "EDAS Zips",
    file: "edas_zips.yaml",
    columns: &["Zip"],
};

/// Remote Area Surcharge zips.
pub const REMOTE_ZIPS: SheetSchema = SheetSchema {
    name: "Remote Zips",
    file: "remote_zips.yaml",
    columns: &["Zip"],
};

/// Every sheet a dataset must contain.
pub const REQUIRED_SHEETS: [SheetSchema; 5] =
    [BASE_RATES, ZONE_CHART, DAS_ZIPS, EDAS_ZIPS, REMOTE_ZIPS];

/// A single sheet cell, kept as text.
///
/// Numeric YAML scalars are accepted and stored in their textual form, so
/// `8.00` and `"8.00"` are the same cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cell(String);

impl Cell {
    /// Returns the cell text with surrounding whitespace removed.
    pub fn as_str(&self) -> &str {
        self.0.trim()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell(value)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl Visitor<'_> for CellVisitor {
            type Value = Cell;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Cell, E> {
                Ok(Cell(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Cell, E> {
                Ok(Cell(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Cell, E> {
                Ok(Cell(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Cell, E> {
                Ok(Cell(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Cell, E> {
                Ok(Cell(value.to_string()))
            }
        }

        deserializer.deserialize_str(CellVisitor)
    }
}

/// One sheet of a reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    /// Header row.
    pub columns: Vec<String>,
    /// Data rows.
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Builds a sheet from string slices.
    ///
    /// # Example
    ///
    /// ```
    /// use parcel_rate_engine::reference::Sheet;
    ///
    /// let sheet = Sheet::new("DAS Zips", &["Zip"], vec![vec!["11930"], vec!["606"]]);
    /// assert_eq!(sheet.rows.len(), 2);
    /// ```
    pub fn new(name: &str, columns: &[&str], rows: Vec<Vec<&str>>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::from).collect())
                .collect(),
        }
    }
}

/// A set of named sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDataset {
    sheets: Vec<Sheet>,
}

impl ReferenceDataset {
    /// Builds a dataset from in-memory sheets.
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Reads every required sheet file from a dataset directory.
    ///
    /// # Errors
    ///
    /// `DataLoad` naming the sheet if its file is missing, is not valid YAML,
    /// or is not shaped like a sheet.
    pub fn load_dir<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let sheets = REQUIRED_SHEETS
            .iter()
            .map(|schema| {
                load_yaml::<Sheet>(&path.join(schema.file))
                    .map_err(|error| sheet_file_error(schema, error))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        info!(
            path = %path.display(),
            sheets = sheets.len(),
            rows = sheets.iter().map(|s| s.rows.len()).sum::<usize>(),
            "Read reference dataset"
        );

        Ok(Self { sheets })
    }

    /// Returns the sheet with the given name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Returns all sheets in load order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Adds or replaces a sheet by name.
    pub fn insert(&mut self, sheet: Sheet) {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }
}

fn sheet_file_error(schema: &SheetSchema, error: EngineError) -> EngineError {
    let message = match error {
        EngineError::ConfigNotFound { path } => format!("sheet file '{path}' not found"),
        EngineError::ConfigParseError { path, message } => {
            format!("sheet file '{path}' could not be read: {message}")
        }
        other => other.to_string(),
    };
    EngineError::data_load(schema.name, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cells_accept_numbers_and_strings() {
        let yaml = r#"
name: Base Rates
columns: ["Weight (lbs)", "Zone 1"]
rows:
  - [1, 8.25]
  - ["2", "9.10"]
"#;
        let sheet: Sheet = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(sheet.rows[0][0].as_str(), "1");
        assert_eq!(sheet.rows[0][1].as_str(), "8.25");
        assert_eq!(sheet.rows[1][1].as_str(), "9.10");
    }

    #[test]
    fn test_sheet_without_rows() {
        let sheet: Sheet = serde_yaml::from_str("name: EDAS Zips\ncolumns: [Zip]\n").unwrap();
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut dataset = ReferenceDataset::from_sheets(vec![Sheet::new(
            "DAS Zips",
            &["Zip"],
            vec![vec!["11930"]],
        )]);
        dataset.insert(Sheet::new("DAS Zips", &["Zip"], vec![]));
        dataset.insert(Sheet::new("EDAS Zips", &["Zip"], vec![]));

        assert_eq!(dataset.sheets().len(), 2);
        assert!(dataset.sheet("DAS Zips").unwrap().rows.is_empty());
        assert!(dataset.sheet("Remote Zips").is_none());
    }

    #[test]
    fn test_load_dir_missing_sheet_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base_rates.yaml"),
            "name: Base Rates\ncolumns: []\n",
        )
        .unwrap();

        let result = ReferenceDataset::load_dir(dir.path());

        match result {
            Err(EngineError::DataLoad { sheet, message }) => {
                assert_eq!(sheet, "Zone Chart");
                assert!(message.contains("zone_chart.yaml"));
                assert!(message.contains("not found"));
            }
            other => panic!("expected DataLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dir_sheet_without_columns() {
        let dir = TempDir::new().unwrap();
        for schema in REQUIRED_SHEETS {
            fs::write(dir.path().join(schema.file), format!("name: {}
", schema.name)).unwrap();
        }

        let err = ReferenceDataset::load_dir(dir.path()).unwrap_err();

        assert_eq!(err.code(), crate::error::ErrorCode::DataLoadError);
        match err {
            EngineError::DataLoad { sheet, message } => {
                assert_eq!(sheet, "Base Rates");
                assert!(message.contains("columns"), "{message}");
            }
            other => panic!("expected DataLoad, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dir_reads_all_sheets() {
        let dir = TempDir::new().unwrap();
        for schema in REQUIRED_SHEETS {
            let columns: Vec<String> = schema.columns.iter().map(|c| format!("{c:?}")).collect();
            fs::write(
                dir.path().join(schema.file),
                format!("name: {}\ncolumns: [{}]\nrows: []\n", schema.name, columns.join(", ")),
            )
            .unwrap();
        }

        let dataset = ReferenceDataset::load_dir(dir.path()).unwrap();

        assert_eq!(dataset.sheets().len(), 5);
        let base = dataset.sheet("Base Rates").unwrap();
        assert_eq!(base.columns[0], "Weight (lbs)");
        assert_eq!(base.columns[8], "Zone 8");
    }
}
