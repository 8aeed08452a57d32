/// RPL Header Locator
///
/// Survey metadata lives in fixed cells of the first rows of the sheet.
/// The positions are collected in [`HeaderLayout`] so a different export
/// layout only needs a different layout value.
use serde::Serialize;

use crate::rpl::models::{cell_text, RawSheet};

pub const UNKNOWN_ENGINEER: &str = "unknown";

/// Zero-based absolute cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where the header metadata sits and how many preamble rows precede the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub header_rows: usize,
    pub cable_system_name: CellRef,
    pub main_route: CellRef,
    pub issue: CellRef,
    pub engineer: CellRef,
    pub issue_date: CellRef,
}

impl Default for HeaderLayout {
    /// Standard RPL export:
    /// ```text
    /// Row 0: ... F: cable system name ... P: issue label
    /// Row 1: ... F: main route        ... P: engineer (may be blank)
    /// Row 2:                          ... P: issue date
    /// Rows 3-4: column titles
    /// Row 5+: data, two rows per position
    /// ```
    fn default() -> Self {
        Self {
            header_rows: 5,
            cable_system_name: CellRef::new(0, 5),
            main_route: CellRef::new(1, 5),
            issue: CellRef::new(0, 15),
            engineer: CellRef::new(1, 15),
            issue_date: CellRef::new(2, 15),
        }
    }
}

impl HeaderLayout {
    /// Minimum sheet height: all header rows plus one data row
    pub fn min_rows(&self) -> usize {
        self.header_rows + 1
    }

    /// Extract the survey metadata from the header cells
    pub fn extract(&self, sheet: &RawSheet) -> SurveyMetadata {
        let text = |cell: CellRef| sheet.cell(cell.row, cell.col).and_then(cell_text);

        SurveyMetadata {
            cable_system_name: text(self.cable_system_name).unwrap_or_default(),
            main_route: text(self.main_route).unwrap_or_default(),
            issue: text(self.issue).unwrap_or_default(),
            engineer: text(self.engineer).unwrap_or_else(|| UNKNOWN_ENGINEER.to_string()),
            issue_date: text(self.issue_date).unwrap_or_default(),
        }
    }
}

/// Header metadata of one survey, immutable after extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyMetadata {
    pub cable_system_name: String,
    pub main_route: String,
    pub issue: String,
    pub engineer: String,
    pub issue_date: String,
}

impl SurveyMetadata {
    pub const GEODETIC_DATUM: &'static str = "WGS84";
    /// Lowest astronomical tide
    pub const VERTICAL_DATUM: &'static str = "LAT";
    pub const BOUNDING_BOX: &'static str = "xmin, ymin, xmax, ymax";
    pub const UNITS: &'static str =
        "meters (depth), kilometers (distances), percentages (slack)";
}
