/// RPL Sheet Normalizer
///
/// Turns the raw worksheet into a [`RouteTable`] plus [`SurveyMetadata`]:
/// header extraction, header row removal, row pair merging, typed fields and
/// coordinate decoding. Any malformed position aborts the whole sheet.
use calamine::{Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, info, instrument};

use crate::error::ConversionError;
use crate::rpl::coordinate::{parse_coordinate, Axis, Coordinate};
use crate::rpl::header::{HeaderLayout, SurveyMetadata};
use crate::rpl::models::{
    cell_number, cell_text, LogicalRecord, RawRow, RawSheet, RouteRecord, RouteTable, RplColumn,
};
use crate::rpl::record_merger::merge_row_pairs;

/// Open an XLSX workbook from memory and return its first worksheet
pub fn read_first_sheet(bytes: &[u8]) -> Result<RawSheet, ConversionError> {
    let mut workbook: Xlsx<Cursor<&[u8]>> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ConversionError::UnreadableSpreadsheet(format!("Failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConversionError::UnreadableSpreadsheet("Workbook has no worksheets".to_string()))?
        .map_err(|e| {
            ConversionError::UnreadableSpreadsheet(format!("Failed to read first worksheet: {e}"))
        })?;

    debug!("Read first worksheet with dimensions {:?}", range.get_size());
    Ok(RawSheet::new(range))
}

#[instrument(skip_all, fields(rows = sheet.height()))]
pub fn normalize_sheet(
    sheet: &RawSheet,
    layout: &HeaderLayout,
) -> Result<(RouteTable, SurveyMetadata), ConversionError> {
    let height = sheet.height();
    if height < layout.min_rows() {
        return Err(ConversionError::InsufficientRows {
            header_rows: layout.header_rows,
            required: layout.min_rows(),
            found: height,
        });
    }

    let metadata = layout.extract(sheet);
    info!(
        "Survey header: cable system {:?}, issue {:?}, engineer {:?}",
        metadata.cable_system_name, metadata.issue, metadata.engineer
    );

    let raw_rows: Vec<RawRow> = (layout.header_rows..height).map(|row| sheet.row(row)).collect();
    let merged = merge_row_pairs(raw_rows);

    let records = merged
        .iter()
        .enumerate()
        .map(|(index, row)| route_record(index, row))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Normalized {} route positions", records.len());
    Ok((RouteTable { records }, metadata))
}

fn route_record(index: usize, row: &RawRow) -> Result<RouteRecord, ConversionError> {
    let fields = logical_record(row)?;
    let latitude_coord = decode(index, fields.latitude.as_deref(), Axis::Latitude)?;
    let longitude_coord = decode(index, fields.longitude.as_deref(), Axis::Longitude)?;

    Ok(RouteRecord {
        fields,
        latitude_coord,
        longitude_coord,
    })
}

/// Blank coordinate cells decode to `None`; present ones must parse
fn decode(index: usize, raw: Option<&str>, axis: Axis) -> Result<Option<Coordinate>, ConversionError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    parse_coordinate(raw, axis)
        .map(Some)
        .map_err(|source| ConversionError::MalformedCoordinate {
            record: index,
            column: match axis {
                Axis::Latitude => RplColumn::Latitude.label(),
                Axis::Longitude => RplColumn::Longitude.label(),
            },
            source,
        })
}

fn logical_record(row: &RawRow) -> Result<LogicalRecord, ConversionError> {
    let text = |column: RplColumn| cell_text(row.get(column));
    let number = |column: RplColumn| {
        cell_number(row.get(column)).map_err(|msg| {
            ConversionError::UnreadableSpreadsheet(format!(
                "row {}, column {:?}: {msg}",
                row.source_row + 1,
                column.label()
            ))
        })
    };

    Ok(LogicalRecord {
        // Position numbers are whole numbers; truncate like an integer cast
        position_number: number(RplColumn::PosNo)?.map(|n| n as i64),
        latitude: text(RplColumn::Latitude),
        longitude: text(RplColumn::Longitude),
        depth: number(RplColumn::Depth)?,
        heading: number(RplColumn::Heading)?,
        course_change: number(RplColumn::CourseChange)?,
        route_distance_between: number(RplColumn::RouteDistanceBetween)?,
        route_distance_total: number(RplColumn::RouteDistanceTotal)?,
        slack: number(RplColumn::Slack)?,
        cable_distance_between: number(RplColumn::CableDistanceBetween)?,
        cable_distance_total: number(RplColumn::CableDistanceTotal)?,
        cable_span: number(RplColumn::CableSpan)?,
        cable_type: text(RplColumn::CableType),
        comments: text(RplColumn::Comments),
        auto_label: text(RplColumn::AutoLabel),
        label: text(RplColumn::Label),
    })
}
