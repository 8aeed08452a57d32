/// Fixed names and scaffolding values of the container layout
pub const GROUP_F: &str = "Group_F";
pub const FEATURE_CATALOGUE_DATASET: &str = "FeatureCatalogue";
pub const GROUP_POSITIONING: &str = "Group_Positioning";
pub const GROUP_DATA: &str = "Group_Data";
pub const ROUTE_POSITION_LIST: &str = "Route_Position_List";

pub const MIME_TYPE: &str = "application/x-hdf5";
pub const FILE_EXTENSION: &str = "h5";

pub mod units {
    pub const METERS: &str = "meters";
    pub const KILOMETERS: &str = "kilometers";
    pub const PERCENTAGES: &str = "percentages";
    pub const DEGREES: &str = "degrees";
}

/// Name of the group holding the comment of one route position
pub fn position_group_name(event_number: i64) -> String {
    format!("Position_{event_number}")
}

/// Feature catalogue metadata written to `Group_F`
#[derive(Debug, Clone, Copy)]
pub struct FeatureCatalogue {
    pub names: &'static str,
    pub definitions: &'static str,
}

pub const FEATURE_CATALOGUE: FeatureCatalogue = FeatureCatalogue {
    names: "SubmarineCable, Repeater",
    definitions: "Definitions of SubmarineCable and Repeater",
};

/// A feature container with a single feature instance.
///
/// Currently one static cable segment per file. Emitting one instance per
/// route position means building these per record instead of using
/// [`CABLE_SEGMENT`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureInstanceTemplate {
    pub container_name: &'static str,
    pub class_name: &'static str,
    pub feature_metadata: &'static str,
    pub instance_name: &'static str,
    pub feature_id: &'static str,
    pub instance_metadata: &'static str,
    pub spatial_parameters: &'static str,
}

pub const CABLE_SEGMENT: FeatureInstanceTemplate = FeatureInstanceTemplate {
    container_name: "Feature_Container_1",
    class_name: "SubmarineCableSegment",
    feature_metadata: "Metadata for SubmarineCableSegment",
    instance_name: "Feature_Instance_1",
    feature_id: "CableSegment001",
    instance_metadata: "InstallationDate: 2025-01-01; MaintenanceStatus: Operational",
    spatial_parameters: "xmin, ymin, xmax, ymax",
};
