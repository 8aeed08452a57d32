// RPL (Route Position List) module
//
// This module turns a submarine cable route survey workbook into a clean table.
// RPL sheets contain:
// - 5 header rows: cable system name, main route, issue label, engineer, issue date
// - Data rows: two physical rows per surveyed position, 16 columns each

pub mod coordinate;
pub mod header;
pub mod models;
pub mod normalizer;
pub mod record_merger;

pub use coordinate::{parse_coordinate, Axis, Coordinate, CoordinateError};
pub use header::{CellRef, HeaderLayout, SurveyMetadata};
pub use models::{LogicalRecord, RawRow, RawSheet, RouteRecord, RouteTable, RplColumn};
pub use normalizer::{normalize_sheet, read_first_sheet};
pub use record_merger::merge_row_pairs;
