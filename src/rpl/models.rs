use calamine::{Data, Range};
use chrono::NaiveTime;
use serde::Serialize;

use crate::rpl::coordinate::Coordinate;

/// The 16 data columns of an RPL sheet, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RplColumn {
    PosNo,
    Latitude,
    Longitude,
    Depth,
    Heading,
    CourseChange,
    RouteDistanceBetween,
    RouteDistanceTotal,
    Slack,
    CableDistanceBetween,
    CableDistanceTotal,
    CableSpan,
    CableType,
    Comments,
    AutoLabel,
    Label,
}

impl RplColumn {
    pub const COUNT: usize = 16;

    pub const ALL: [RplColumn; RplColumn::COUNT] = [
        RplColumn::PosNo,
        RplColumn::Latitude,
        RplColumn::Longitude,
        RplColumn::Depth,
        RplColumn::Heading,
        RplColumn::CourseChange,
        RplColumn::RouteDistanceBetween,
        RplColumn::RouteDistanceTotal,
        RplColumn::Slack,
        RplColumn::CableDistanceBetween,
        RplColumn::CableDistanceTotal,
        RplColumn::CableSpan,
        RplColumn::CableType,
        RplColumn::Comments,
        RplColumn::AutoLabel,
        RplColumn::Label,
    ];

    /// Zero-based sheet column
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical column name
    pub fn label(self) -> &'static str {
        match self {
            RplColumn::PosNo => "Pos No.",
            RplColumn::Latitude => "Latitude",
            RplColumn::Longitude => "Longitude",
            RplColumn::Depth => "Depth",
            RplColumn::Heading => "Heading",
            RplColumn::CourseChange => "Course Change",
            RplColumn::RouteDistanceBetween => "Route Distance Between",
            RplColumn::RouteDistanceTotal => "Route Distance Total",
            RplColumn::Slack => "Slack",
            RplColumn::CableDistanceBetween => "Cable Distance Between",
            RplColumn::CableDistanceTotal => "Cable Distance Total",
            RplColumn::CableSpan => "Cable Span",
            RplColumn::CableType => "Cable Type",
            RplColumn::Comments => "Comments",
            RplColumn::AutoLabel => "Auto Label",
            RplColumn::Label => "Label",
        }
    }
}

/// The unmodified worksheet grid, addressed by absolute (row, col)
#[derive(Debug, Clone)]
pub struct RawSheet {
    range: Range<Data>,
}

impl RawSheet {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }

    /// Cell at an absolute position; `None` outside the used range
    pub fn cell(&self, row: usize, col: usize) -> Option<&Data> {
        let row = u32::try_from(row).ok()?;
        let col = u32::try_from(col).ok()?;
        self.range.get_value((row, col))
    }

    /// Number of rows counted from the top of the sheet, including leading empty rows
    pub fn height(&self) -> usize {
        self.range
            .end()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(0)
    }

    /// The 16 data cells of one physical row
    pub fn row(&self, row: usize) -> RawRow {
        let cells = RplColumn::ALL
            .iter()
            .map(|column| self.cell(row, column.index()).cloned().unwrap_or(Data::Empty))
            .collect();
        RawRow {
            source_row: row,
            cells,
        }
    }

    pub fn range(&self) -> &Range<Data> {
        &self.range
    }
}

/// One physical data row before merging
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Absolute sheet row the row was read from (the first row of a merged pair)
    pub source_row: usize,
    cells: Vec<Data>,
}

impl RawRow {
    pub fn new(source_row: usize, mut cells: Vec<Data>) -> Self {
        cells.resize(RplColumn::COUNT, Data::Empty);
        Self { source_row, cells }
    }

    pub fn get(&self, column: RplColumn) -> &Data {
        &self.cells[column.index()]
    }

    pub fn cells(&self) -> &[Data] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Data] {
        &mut self.cells
    }
}

/// Whether a cell counts as missing: empty, whitespace-only text, or an Excel error
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a cell as text. Numbers lose a zero fraction, dates become ISO-8601.
pub fn cell_text(cell: &Data) -> Option<String> {
    if is_blank(cell) {
        return None;
    }
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == NaiveTime::MIN => {
                datetime.date().format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => return None,
    };
    Some(text)
}

/// Read a cell as a number. Text is parsed; anything else non-numeric is an error.
pub fn cell_number(cell: &Data) -> Result<Option<f64>, String> {
    if is_blank(cell) {
        return Ok(None);
    }
    match cell {
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("expected a number, got {s:?}")),
        other => Err(format!("expected a number, got {other:?}")),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One surveyed position after its two physical rows were merged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogicalRecord {
    pub position_number: Option<i64>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub depth: Option<f64>,
    pub heading: Option<f64>,
    pub course_change: Option<f64>,
    pub route_distance_between: Option<f64>,
    pub route_distance_total: Option<f64>,
    pub slack: Option<f64>,
    pub cable_distance_between: Option<f64>,
    pub cable_distance_total: Option<f64>,
    pub cable_span: Option<f64>,
    pub cable_type: Option<String>,
    pub comments: Option<String>,
    pub auto_label: Option<String>,
    pub label: Option<String>,
}

impl LogicalRecord {
    /// Position number, or -1 when the sheet leaves it blank
    pub fn event_number(&self) -> i64 {
        self.position_number.unwrap_or(-1)
    }
}

/// A logical record plus its decoded coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    #[serde(flatten)]
    pub fields: LogicalRecord,
    pub latitude_coord: Option<Coordinate>,
    pub longitude_coord: Option<Coordinate>,
}

/// The canonical table handed to the container writer, in merge order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTable {
    pub records: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteRecord> {
        self.records.iter()
    }
}
