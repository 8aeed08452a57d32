use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File, Group, Location};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::container::schema::{
    self, units, FEATURE_CATALOGUE, CABLE_SEGMENT, FEATURE_CATALOGUE_DATASET, GROUP_DATA, GROUP_F,
    GROUP_POSITIONING, ROUTE_POSITION_LIST,
};
use crate::error::ConversionError;
use crate::rpl::coordinate::Coordinate;
use crate::rpl::header::SurveyMetadata;
use crate::rpl::models::{RouteRecord, RouteTable};

/// Create the HDF5 file at `path`, truncating an existing one.
///
/// If this fails, whatever was at `path` before is still there.
pub fn create_container(path: &Path) -> Result<File, ConversionError> {
    Ok(File::create(path)?)
}

/// Write the route table and survey header into a freshly created container.
///
/// The file is closed when this returns. On error it may be left incomplete.
#[instrument(skip_all, fields(path = %file.filename(), records = table.len()))]
pub fn populate_container(
    file: File,
    table: &RouteTable,
    metadata: &SurveyMetadata,
) -> Result<(), ConversionError> {
    let file_name = Path::new(&file.filename())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let writer = ContainerWriter { table, metadata };
    writer.write_root_attributes(&file, &file_name)?;
    writer.write_feature_catalogue(&file)?;
    writer.write_feature_instance(&file)?;
    writer.write_positioning(&file)?;
    writer.write_route_position_list(&file)?;

    file.flush()?;
    info!("Wrote HDF5 container {} ({} positions)", file_name, table.len());
    Ok(())
}

struct ContainerWriter<'a> {
    table: &'a RouteTable,
    metadata: &'a SurveyMetadata,
}

impl ContainerWriter<'_> {
    fn write_root_attributes(&self, file: &File, file_name: &str) -> Result<(), ConversionError> {
        let m = self.metadata;
        write_str_attr(file, "FileName", file_name)?;
        write_str_attr(file, "CableSystemName", &m.cable_system_name)?;
        write_str_attr(file, "MainRoute", &m.main_route)?;
        write_str_attr(file, "Issue", &m.issue)?;
        write_str_attr(file, "Engineer", &m.engineer)?;
        write_str_attr(file, "IssueDate", &m.issue_date)?;
        write_str_attr(file, "GeodeticDatum", SurveyMetadata::GEODETIC_DATUM)?;
        write_str_attr(file, "VerticalDatum", SurveyMetadata::VERTICAL_DATUM)?;
        write_str_attr(file, "BoundingBox", SurveyMetadata::BOUNDING_BOX)?;
        write_str_attr(file, "Units", SurveyMetadata::UNITS)?;
        Ok(())
    }

    fn write_feature_catalogue(&self, file: &File) -> Result<(), ConversionError> {
        let group_f = file.create_group(GROUP_F)?;
        write_str_attr(&group_f, "FeatureNames", FEATURE_CATALOGUE.names)?;
        write_str_attr(&group_f, "FeatureDefinitions", FEATURE_CATALOGUE.definitions)?;
        // Placeholder: no catalogue rows yet
        group_f
            .new_dataset::<f64>()
            .shape(0)
            .create(FEATURE_CATALOGUE_DATASET)?;
        Ok(())
    }

    fn write_feature_instance(&self, file: &File) -> Result<(), ConversionError> {
        let template = CABLE_SEGMENT;
        let container = file.create_group(template.container_name)?;
        write_str_attr(&container, "ClassName", template.class_name)?;
        write_str_attr(&container, "FeatureMetadata", template.feature_metadata)?;

        let instance = container.create_group(template.instance_name)?;
        write_str_attr(&instance, "FeatureID", template.feature_id)?;
        write_str_attr(&instance, "InstanceMetadata", template.instance_metadata)?;
        write_str_attr(&instance, "SpatialParameters", template.spatial_parameters)?;
        Ok(())
    }

    fn write_positioning(&self, file: &File) -> Result<(), ConversionError> {
        let group = file.create_group(GROUP_POSITIONING)?;

        write_str_dataset(&group, "Latitude", self.text(|r| r.fields.latitude.as_deref()))?;
        write_str_dataset(&group, "Longitude", self.text(|r| r.fields.longitude.as_deref()))?;

        // Raw depth keeps gaps as NaN instead of substituting a default
        let depth: Vec<f64> = self
            .table
            .iter()
            .map(|r| r.fields.depth.unwrap_or(f64::NAN))
            .collect();
        let dataset = write_f64_dataset(&group, "Depth", &depth)?;
        write_str_attr(&dataset, "Units", units::METERS)?;
        Ok(())
    }

    fn write_route_position_list(&self, file: &File) -> Result<(), ConversionError> {
        let group_data = file.create_group(GROUP_DATA)?;
        let list = group_data.create_group(ROUTE_POSITION_LIST)?;
        write_i64_attr(&list, "RecordCount", self.table.len() as i64)?;

        let event_numbers: Vec<i64> = self.table.iter().map(|r| r.fields.event_number()).collect();
        let dataset = write_i64_dataset(&list, "Event_Number", &event_numbers)?;
        write_str_attr(&dataset, "Description", "Position number of the event")?;

        write_str_dataset(&list, "Event_Label", self.text(|r| r.fields.label.as_deref()))?;

        self.write_coordinate_fields(&list, "Latitude", |r| r.latitude_coord.as_ref())?;
        self.write_coordinate_fields(&list, "Longitude", |r| r.longitude_coord.as_ref())?;

        self.write_measure(&list, "Water_Depth", units::METERS, |r| r.fields.depth)?;
        self.write_measure(&list, "Heading", units::DEGREES, |r| r.fields.heading)?;
        self.write_measure(&list, "Course_Change", units::DEGREES, |r| r.fields.course_change)?;
        self.write_measure(&list, "Route_Distance_From_Last_Position", units::KILOMETERS, |r| {
            r.fields.route_distance_between
        })?;
        self.write_measure(&list, "Cumulative_Route_Distance", units::KILOMETERS, |r| {
            r.fields.route_distance_total
        })?;
        self.write_measure(&list, "Slack", units::PERCENTAGES, |r| r.fields.slack)?;
        self.write_measure(&list, "Cable_Distance_From_Last_Position", units::KILOMETERS, |r| {
            r.fields.cable_distance_between
        })?;
        self.write_measure(&list, "Cumulative_Cable_Distance", units::KILOMETERS, |r| {
            r.fields.cable_distance_total
        })?;

        let span = self.numeric(|r| r.fields.cable_span);
        let dataset = write_f64_dataset(&list, "Cable_Span", &span)?;
        write_str_attr(&dataset, "Description", "Cable span reported by the survey")?;

        write_str_dataset(&list, "Cable_Type", self.text(|r| r.fields.cable_type.as_deref()))?;
        write_str_dataset(&list, "Auto_Label", self.text(|r| r.fields.auto_label.as_deref()))?;
        write_str_dataset(
            &list,
            "Additional_Route_Features",
            self.text(|r| r.fields.label.as_deref()),
        )?;

        self.write_comment_groups(&list)
    }

    /// Degrees, minutes, unsigned decimal degrees and direction for one axis
    fn write_coordinate_fields<F>(&self, list: &Group, axis: &str, coord: F) -> Result<(), ConversionError>
    where
        F: Fn(&RouteRecord) -> Option<&Coordinate>,
    {
        let degrees = self.numeric(|r| coord(r).map(|c| c.degrees));
        write_f64_dataset(list, &format!("{axis}_Degrees"), &degrees)?;

        let minutes = self.numeric(|r| coord(r).map(|c| c.minutes));
        write_f64_dataset(list, &format!("{axis}_Minutes"), &minutes)?;

        let decimal = self.numeric(|r| coord(r).map(|c| c.decimal));
        let dataset = write_f64_dataset(list, &format!("{axis}_Decimal_Degrees"), &decimal)?;
        write_str_attr(&dataset, "Units", units::DEGREES)?;

        let directions: Vec<String> = self
            .table
            .iter()
            .map(|r| coord(r).map(|c| c.direction.to_string()).unwrap_or_default())
            .collect();
        write_str_dataset(list, &format!("{axis}_Direction"), directions)?;
        Ok(())
    }

    fn write_measure<F>(&self, list: &Group, name: &str, unit: &str, value: F) -> Result<(), ConversionError>
    where
        F: Fn(&RouteRecord) -> Option<f64>,
    {
        let values = self.numeric(value);
        let dataset = write_f64_dataset(list, name, &values)?;
        write_str_attr(&dataset, "Units", unit)
    }

    fn write_comment_groups(&self, list: &Group) -> Result<(), ConversionError> {
        let mut written = 0usize;
        for record in self.table.iter() {
            let Some(comment) = record.fields.comments.as_deref() else {
                continue;
            };
            let name = schema::position_group_name(record.fields.event_number());
            if list.link_exists(&name) {
                return Err(ConversionError::ContainerWriteFailure(format!(
                    "Duplicate comment group {name}: position numbers must be unique"
                )));
            }
            let group = list.create_group(&name)?;
            write_str_attr(&group, "Comments", comment)?;
            written += 1;
        }
        debug!("Wrote {} position comment groups", written);
        Ok(())
    }

    /// Numeric column with 0 for missing values
    fn numeric<F>(&self, value: F) -> Vec<f64>
    where
        F: Fn(&RouteRecord) -> Option<f64>,
    {
        self.table.iter().map(|r| value(r).unwrap_or(0.0)).collect()
    }

    /// Text column with "" for missing values
    fn text<F>(&self, value: F) -> Vec<String>
    where
        F: Fn(&RouteRecord) -> Option<&str>,
    {
        self.table
            .iter()
            .map(|r| value(r).unwrap_or_default().to_string())
            .collect()
    }
}

fn to_varlen(value: &str) -> Result<VarLenUnicode, ConversionError> {
    value.parse::<VarLenUnicode>().map_err(|e| {
        ConversionError::ContainerWriteFailure(format!("Cannot store string {value:?}: {e}"))
    })
}

fn write_str_attr(location: &Location, name: &str, value: &str) -> Result<(), ConversionError> {
    let value = to_varlen(value)?;
    let attr = location.new_attr::<VarLenUnicode>().shape(()).create(name)?;
    attr.write_scalar(&value)?;
    Ok(())
}

fn write_i64_attr(location: &Location, name: &str, value: i64) -> Result<(), ConversionError> {
    let attr = location.new_attr::<i64>().shape(()).create(name)?;
    attr.write_scalar(&value)?;
    Ok(())
}

fn write_f64_dataset(group: &Group, name: &str, values: &[f64]) -> Result<Dataset, ConversionError> {
    Ok(group.new_dataset_builder().with_data(values).create(name)?)
}

fn write_i64_dataset(group: &Group, name: &str, values: &[i64]) -> Result<Dataset, ConversionError> {
    Ok(group.new_dataset_builder().with_data(values).create(name)?)
}

fn write_str_dataset(group: &Group, name: &str, values: Vec<String>) -> Result<Dataset, ConversionError> {
    let values = values
        .iter()
        .map(|v| to_varlen(v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(group
        .new_dataset_builder()
        .with_data(values.as_slice())
        .create(name)?)
}
