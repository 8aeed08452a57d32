// HDF5 container output
//
// The container layout is fixed:
// - root attributes: file name, survey header, datum and unit conventions
// - Group_F: feature catalogue
// - Feature_Container_1/Feature_Instance_1: the cable segment feature
// - Group_Positioning: raw positions and depths
// - Group_Data/Route_Position_List: one dataset per route field, plus a
//   Position_<n> group for every commented position

pub mod schema;
pub mod writer;

pub use schema::{FeatureCatalogue, FeatureInstanceTemplate, CABLE_SEGMENT, FEATURE_CATALOGUE};
pub use writer::{create_container, populate_container};
