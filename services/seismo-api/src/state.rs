//! Application state for the seismogram API.

use std::sync::Arc;

use anyhow::{Context, Result};
use seismo_db::SeismoDatabase;
use seismo_protocol::{ParameterValidator, SeismogramsQuery, TravelTimeProvider, TravelTimeQuery};

use crate::config::ServiceConfig;
use crate::extent::DatabaseExtent;
use crate::extraction::SeismogramExtractor;

/// Shared application state. Read-only after startup.
pub struct AppState {
    /// The opened database.
    pub database: Arc<SeismoDatabase>,

    /// Extent queries against the database.
    pub extent: DatabaseExtent,

    /// Optional travel time backend; phase-relative times need it.
    pub travel_times: Option<Arc<dyn TravelTimeProvider>>,

    /// Optional extraction backend; `/seismograms` answers 503 without it.
    pub extractor: Option<Arc<dyn SeismogramExtractor>>,

    pub seismograms_validator: ParameterValidator,
    pub ttime_validator: ParameterValidator,

    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(database: SeismoDatabase, config: ServiceConfig) -> Self {
        let database = Arc::new(database);
        Self {
            extent: DatabaseExtent::new(Arc::clone(&database)),
            database,
            travel_times: None,
            extractor: None,
            seismograms_validator: SeismogramsQuery::validator(),
            ttime_validator: TravelTimeQuery::validator(),
            config,
        }
    }

    /// Open the database at `root` with the metadata from `config`.
    pub fn open(root: &str, config: ServiceConfig) -> Result<Self> {
        let metadata = config.database_metadata()?;
        let database = SeismoDatabase::open(root, metadata)
            .with_context(|| format!("Failed to open database at {}", root))?;
        Ok(Self::new(database, config))
    }

    pub fn with_travel_times(mut self, provider: Arc<dyn TravelTimeProvider>) -> Self {
        self.travel_times = Some(provider);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn SeismogramExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn travel_time_provider(&self) -> Option<&dyn TravelTimeProvider> {
        self.travel_times.as_deref()
    }
}
