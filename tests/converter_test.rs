// End-to-end conversion tests: workbook bytes in, HDF5 container out

mod common;

use common::{read_f64, read_i64, read_str_attr, read_strings, RplWorkbook};
use rpl_converter::rpl::CoordinateError;
use rpl_converter::{ConversionError, RplConverter};

#[test]
fn test_minimal_sheet_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .to_bytes();

    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .expect("conversion should succeed");
    assert_eq!(path, dir.path().join("survey.h5"));

    let file = hdf5::File::open(&path).unwrap();
    assert_eq!(read_str_attr(&file, "FileName"), "survey.h5");
    assert_eq!(read_str_attr(&file, "CableSystemName"), "CableX");
    assert_eq!(read_str_attr(&file, "MainRoute"), "Landing A - Landing B");
    assert_eq!(read_str_attr(&file, "Issue"), "IssueY");
    assert_eq!(read_str_attr(&file, "Engineer"), "unknown");
    assert_eq!(read_str_attr(&file, "IssueDate"), "2025-01-01");
    assert_eq!(read_str_attr(&file, "GeodeticDatum"), "WGS84");
    assert_eq!(read_str_attr(&file, "VerticalDatum"), "LAT");

    assert_eq!(read_f64(&file, "Group_Positioning/Depth"), vec![100.0]);
    assert_eq!(read_strings(&file, "Group_Positioning/Latitude"), vec!["N 10 30"]);
    assert_eq!(read_strings(&file, "Group_Positioning/Longitude"), vec!["W 20 15"]);

    let list = "Group_Data/Route_Position_List";
    assert_eq!(read_i64(&file, &format!("{list}/Event_Number")), vec![1]);
    assert_eq!(read_f64(&file, &format!("{list}/Latitude_Degrees")), vec![10.0]);
    assert_eq!(read_f64(&file, &format!("{list}/Latitude_Minutes")), vec![30.0]);
    assert_eq!(read_strings(&file, &format!("{list}/Latitude_Direction")), vec!["N"]);
    assert_eq!(read_strings(&file, &format!("{list}/Longitude_Direction")), vec!["W"]);
    assert_eq!(
        read_f64(&file, &format!("{list}/Longitude_Decimal_Degrees")),
        vec![20.25]
    );
    assert_eq!(read_f64(&file, &format!("{list}/Water_Depth")), vec![100.0]);

    let record_count: i64 = file
        .group(list)
        .unwrap()
        .attr("RecordCount")
        .unwrap()
        .read_scalar()
        .unwrap();
    assert_eq!(record_count, 1);
}

#[test]
fn test_issue_date_cell_formatted_as_date() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::empty()
        .text(0, 5, "CableX")
        .date(2, 15, 2024, 3, 15)
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .to_bytes();

    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    assert_eq!(read_str_attr(&file, "IssueDate"), "2024-03-15");
}

#[test]
fn test_line_break_inside_coordinate_cell() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10\n30", "W 20\n15", 100.0)
        .to_bytes();

    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    let list = "Group_Data/Route_Position_List";
    assert_eq!(read_f64(&file, &format!("{list}/Latitude_Decimal_Degrees")), vec![10.5]);
    assert_eq!(read_f64(&file, &format!("{list}/Longitude_Decimal_Degrees")), vec![20.25]);
}

#[test]
fn test_fixed_schema_scaffolding() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .to_bytes();
    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    let group_f = file.group("Group_F").unwrap();
    assert_eq!(read_str_attr(&group_f, "FeatureNames"), "SubmarineCable, Repeater");
    assert_eq!(group_f.dataset("FeatureCatalogue").unwrap().size(), 0);

    let container = file.group("Feature_Container_1").unwrap();
    assert_eq!(read_str_attr(&container, "ClassName"), "SubmarineCableSegment");
    let instance = container.group("Feature_Instance_1").unwrap();
    assert_eq!(read_str_attr(&instance, "FeatureID"), "CableSegment001");

    let depth = file.dataset("Group_Positioning/Depth").unwrap();
    assert_eq!(read_str_attr(&depth, "Units"), "meters");
    let slack = file.dataset("Group_Data/Route_Position_List/Slack").unwrap();
    assert_eq!(read_str_attr(&slack, "Units"), "percentages");
}

#[test]
fn test_comment_groups_only_for_commented_positions() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .text(6, 13, "Beach manhole")
        .position(7, 2.0, "N 10 31", "W 20 16", 120.0)
        .position(9, 3.0, "N 10 32", "W 20 17", 150.0)
        .text(9, 13, "Repeater 1")
        .to_bytes();
    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    let list = file.group("Group_Data/Route_Position_List").unwrap();
    let mut position_groups: Vec<String> = list
        .member_names()
        .unwrap()
        .into_iter()
        .filter(|name| name.starts_with("Position_"))
        .collect();
    position_groups.sort();
    assert_eq!(position_groups, vec!["Position_1", "Position_3"]);

    let first = list.group("Position_1").unwrap();
    assert_eq!(read_str_attr(&first, "Comments"), "Beach manhole");
    let third = list.group("Position_3").unwrap();
    assert_eq!(read_str_attr(&third, "Comments"), "Repeater 1");
}

#[test]
fn test_missing_values_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    // Second record has no position number, no depth, no slack, no label
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .number(5, 8, 2.5)
        .text(5, 12, "LW")
        .text(5, 15, "BMH")
        .text(7, 1, "N 10 31")
        .text(7, 2, "W 20 16")
        .text(8, 12, "SA")
        .to_bytes();
    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    let list = "Group_Data/Route_Position_List";
    assert_eq!(read_i64(&file, &format!("{list}/Event_Number")), vec![1, -1]);
    assert_eq!(read_f64(&file, &format!("{list}/Slack")), vec![2.5, 0.0]);
    assert_eq!(read_f64(&file, &format!("{list}/Water_Depth")), vec![100.0, 0.0]);
    assert_eq!(read_strings(&file, &format!("{list}/Event_Label")), vec!["BMH", ""]);
    assert_eq!(read_strings(&file, &format!("{list}/Cable_Type")), vec!["LW", "SA"]);

    // Raw positioning depth keeps the gap
    let depth = read_f64(&file, "Group_Positioning/Depth");
    assert_eq!(depth[0], 100.0);
    assert!(depth[1].is_nan());
}

#[test]
fn test_records_keep_merge_order() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 10.0, "N 1 0", "E 1 0", 10.0)
        .position(7, 20.0, "N 2 0", "E 2 0", 20.0)
        .position(9, 30.0, "N 3 0", "E 3 0", 30.0)
        .to_bytes();
    let path = RplConverter::new()
        .convert(&bytes, "survey.xlsx", dir.path())
        .unwrap();

    let file = hdf5::File::open(&path).unwrap();
    assert_eq!(
        read_i64(&file, "Group_Data/Route_Position_List/Event_Number"),
        vec![10, 20, 30]
    );
    assert_eq!(read_f64(&file, "Group_Positioning/Depth"), vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_malformed_coordinate_fails_and_leaves_no_container() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .position(7, 2.0, "1234", "W 20 16", 110.0)
        .to_bytes();

    let result = RplConverter::new().convert(&bytes, "survey.xlsx", dir.path());
    match result {
        Err(ConversionError::MalformedCoordinate { record, source, .. }) => {
            assert_eq!(record, 1);
            assert_eq!(source, CoordinateError::MissingDirection("1234".to_string()));
        }
        other => panic!("Expected MalformedCoordinate, got {other:?}"),
    }
    assert!(!dir.path().join("survey.h5").exists());
}

#[test]
fn test_header_only_sheet_is_insufficient() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard().to_bytes();

    let result = RplConverter::new().convert(&bytes, "survey.xlsx", dir.path());
    assert!(matches!(result, Err(ConversionError::InsufficientRows { .. })));
}

#[test]
fn test_duplicate_commented_positions_fail_and_leave_no_container() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = RplWorkbook::standard()
        .position(5, 4.0, "N 10 30", "W 20 15", 100.0)
        .text(5, 13, "first")
        .position(7, 4.0, "N 10 31", "W 20 16", 110.0)
        .text(7, 13, "second")
        .to_bytes();

    let result = RplConverter::new().convert(&bytes, "survey.xlsx", dir.path());
    assert!(matches!(result, Err(ConversionError::ContainerWriteFailure(_))));
    assert!(!dir.path().join("survey.h5").exists());
}

#[test]
fn test_unwritable_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .to_bytes();

    let result = RplConverter::new().convert(&bytes, "survey.xlsx", &missing);
    assert!(matches!(result, Err(ConversionError::ContainerWriteFailure(_))));
}

#[test]
fn test_existing_output_kept_when_it_cannot_be_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("survey.h5");

    // An open handle stops HDF5 from truncating the file
    let existing = hdf5::File::create(&target).unwrap();
    existing
        .new_attr::<i64>()
        .shape(())
        .create("Marker")
        .unwrap()
        .write_scalar(&7_i64)
        .unwrap();
    existing.flush().unwrap();

    let bytes = RplWorkbook::standard()
        .position(5, 1.0, "N 10 30", "W 20 15", 100.0)
        .to_bytes();
    let result = RplConverter::new().convert(&bytes, "survey.xlsx", dir.path());
    assert!(matches!(result, Err(ConversionError::ContainerWriteFailure(_))));
    assert!(target.exists());

    drop(existing);
    let reopened = hdf5::File::open(&target).unwrap();
    let marker: i64 = reopened.attr("Marker").unwrap().read_scalar().unwrap();
    assert_eq!(marker, 7);
}

#[test]
fn test_normalize_reports_metadata_without_writing() {
    let bytes = RplWorkbook::standard()
        .text(1, 15, "J. Smith")
        .position(5, 1.0, "S 33 45", "E 151 12.5", 42.0)
        .to_bytes();

    let (table, metadata) = RplConverter::new().normalize(&bytes).unwrap();
    assert_eq!(metadata.engineer, "J. Smith");
    assert_eq!(table.len(), 1);

    let lat = table.records[0].latitude_coord.as_ref().unwrap();
    assert_eq!(lat.direction, 'S');
    assert!((lat.decimal - 33.75).abs() < 1e-12);
    assert!((lat.signed_decimal() + 33.75).abs() < 1e-12);
}
