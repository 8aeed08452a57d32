// Shared fixtures for integration tests: synthetic RPL workbooks
#![allow(dead_code)]

use hdf5::types::VarLenUnicode;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

enum FixtureCell {
    Text(String),
    Number(f64),
    Date(ExcelDateTime),
}

/// Builds an RPL workbook in memory.
///
/// Rows are zero-based sheet rows; data starts at row 5.
pub struct RplWorkbook {
    cells: Vec<(u32, u16, FixtureCell)>,
}

impl RplWorkbook {
    /// Standard header: CableX / IssueY / no engineer / 2025-01-01
    pub fn standard() -> Self {
        Self { cells: Vec::new() }
            .text(0, 5, "CableX")
            .text(1, 5, "Landing A - Landing B")
            .text(0, 15, "IssueY")
            .text(2, 15, "2025-01-01")
            .text(3, 0, "Pos No.")
            .text(3, 1, "Latitude")
            .text(3, 2, "Longitude")
            .text(3, 3, "Depth")
    }

    pub fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn text(mut self, row: u32, col: u16, value: &str) -> Self {
        self.cells.push((row, col, FixtureCell::Text(value.to_string())));
        self
    }

    pub fn number(mut self, row: u32, col: u16, value: f64) -> Self {
        self.cells.push((row, col, FixtureCell::Number(value)));
        self
    }

    /// A real date cell formatted as yyyy-mm-dd
    pub fn date(mut self, row: u32, col: u16, year: u16, month: u8, day: u8) -> Self {
        let date = ExcelDateTime::from_ymd(year, month, day).expect("Invalid fixture date");
        self.cells.push((row, col, FixtureCell::Date(date)));
        self
    }

    /// One logical record spread over rows `row` and `row + 1`:
    /// position and coordinates on the first row, depth on the second
    pub fn position(self, row: u32, pos_no: f64, lat: &str, lon: &str, depth: f64) -> Self {
        self.number(row, 0, pos_no)
            .text(row, 1, lat)
            .text(row, 2, lon)
            .number(row + 1, 3, depth)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        for (row, col, cell) in &self.cells {
            match cell {
                FixtureCell::Text(s) => {
                    worksheet.write_string(*row, *col, s).expect("Failed to write text cell");
                }
                FixtureCell::Number(n) => {
                    worksheet.write_number(*row, *col, *n).expect("Failed to write number cell");
                }
                FixtureCell::Date(d) => {
                    worksheet
                        .write_datetime_with_format(*row, *col, d, &date_format)
                        .expect("Failed to write date cell");
                }
            }
        }
        workbook.save_to_buffer().expect("Failed to build workbook")
    }
}

pub fn read_str_attr(location: &hdf5::Location, name: &str) -> String {
    location
        .attr(name)
        .unwrap_or_else(|e| panic!("Missing attribute {name}: {e}"))
        .read_scalar::<VarLenUnicode>()
        .expect("Failed to read string attribute")
        .as_str()
        .to_string()
}

pub fn read_strings(file: &hdf5::File, path: &str) -> Vec<String> {
    file.dataset(path)
        .unwrap_or_else(|e| panic!("Missing dataset {path}: {e}"))
        .read_raw::<VarLenUnicode>()
        .expect("Failed to read string dataset")
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

pub fn read_f64(file: &hdf5::File, path: &str) -> Vec<f64> {
    file.dataset(path)
        .unwrap_or_else(|e| panic!("Missing dataset {path}: {e}"))
        .read_raw::<f64>()
        .expect("Failed to read f64 dataset")
}

pub fn read_i64(file: &hdf5::File, path: &str) -> Vec<i64> {
    file.dataset(path)
        .unwrap_or_else(|e| panic!("Missing dataset {path}: {e}"))
        .read_raw::<i64>()
        .expect("Failed to read i64 dataset")
}
