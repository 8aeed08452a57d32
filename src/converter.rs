use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::container::schema::FILE_EXTENSION;
use crate::container::{create_container, populate_container};
use crate::error::ConversionError;
use crate::rpl::{normalize_sheet, read_first_sheet, HeaderLayout, RouteTable, SurveyMetadata};

/// Converts RPL workbooks into HDF5 containers.
///
/// Stateless apart from the header layout, so one converter can serve
/// concurrent callers as long as each uses its own output directory.
#[derive(Debug, Clone, Default)]
pub struct RplConverter {
    layout: HeaderLayout,
}

impl RplConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: HeaderLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    /// Parse and normalize a workbook without writing anything
    pub fn normalize(&self, workbook: &[u8]) -> Result<(RouteTable, SurveyMetadata), ConversionError> {
        let sheet = read_first_sheet(workbook)?;
        normalize_sheet(&sheet, &self.layout)
    }

    /// Convert a workbook into `<output_dir>/<source stem>.h5`.
    ///
    /// `source_name` is only used to name the output. A container that fails
    /// half way is removed before the error is returned. If the output file
    /// cannot be created, any existing file at that path is left alone.
    #[instrument(skip(self, workbook), fields(bytes = workbook.len()))]
    pub fn convert(
        &self,
        workbook: &[u8],
        source_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, ConversionError> {
        let start_time = Instant::now();
        let (table, metadata) = self.normalize(workbook)?;

        let output_path = output_dir.join(output_file_name(source_name));
        let file = create_container(&output_path)?;
        if let Err(e) = populate_container(file, &table, &metadata) {
            discard_partial(&output_path);
            return Err(e);
        }

        info!(
            "Converted {} ({} positions) to {} in {:?}",
            source_name,
            table.len(),
            output_path.display(),
            start_time.elapsed()
        );
        Ok(output_path)
    }
}

/// Output file name: the source file name with its extension swapped for `.h5`
pub fn output_file_name(source_name: &str) -> String {
    let file_name = Path::new(source_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "route_position_list".to_string());

    Path::new(&file_name)
        .with_extension(FILE_EXTENSION)
        .to_string_lossy()
        .into_owned()
}

fn discard_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove partial container {}: {}", path.display(), e);
        }
    }
}
