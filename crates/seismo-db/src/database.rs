//! An opened seismogram database.

use std::path::Path;

use seismo_common::{DatabaseInfo, DatabaseMetadata, ExtentRequest, SeismogramExtent};
use tracing::info;

use crate::error::DbResult;
use crate::extent::seismogram_times;
use crate::layout::DatabaseLayout;
use crate::locator::locate;

/// Layout and static properties of a database.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct SeismoDatabase {
    layout: DatabaseLayout,
    info: DatabaseInfo,
}

impl SeismoDatabase {
    /// Locate the data files under `root` and attach `metadata`.
    pub fn open(root: impl AsRef<Path>, metadata: DatabaseMetadata) -> DbResult<Self> {
        let root = root.as_ref();
        let layout = locate(root)?;
        let info = DatabaseInfo::new(layout.is_reciprocal(), layout.component_tags(), metadata)?;

        info!(
            root = %root.display(),
            kind = %layout.kind,
            components = ?info.components,
            "Opened seismogram database"
        );

        Ok(Self { layout, info })
    }

    pub fn layout(&self) -> &DatabaseLayout {
        &self.layout
    }

    pub fn info(&self) -> &DatabaseInfo {
        &self.info
    }

    /// Time extent of the seismograms this database can produce.
    pub fn extent(&self, request: &ExtentRequest) -> DbResult<SeismogramExtent> {
        seismogram_times(&self.info, request)
    }
}
