//! Extent queries answered by the opened database.

use std::sync::Arc;

use async_trait::async_trait;
use seismo_common::{ExtentRequest, SeismogramExtent};
use seismo_db::{DatabaseError, SeismoDatabase};
use seismo_protocol::{ExtentProvider, SeismoError};

/// [`ExtentProvider`] backed by database metadata.
#[derive(Debug, Clone)]
pub struct DatabaseExtent {
    database: Arc<SeismoDatabase>,
}

impl DatabaseExtent {
    pub fn new(database: Arc<SeismoDatabase>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ExtentProvider for DatabaseExtent {
    async fn extent(&self, request: &ExtentRequest) -> Result<SeismogramExtent, SeismoError> {
        self.database.extent(request).map_err(|e| match e {
            DatabaseError::InvalidExtent(msg) => SeismoError::InvalidValue(msg),
            other => SeismoError::Internal(other.to_string()),
        })
    }
}
