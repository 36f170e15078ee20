//! Weather Lookup Workflows
//!
//! Create: ask the provider for current conditions, then store the request and
//! the raw payload under a fresh id. Nothing is stored unless both succeed.
//! Retrieve: point lookup in the store.

use std::sync::Arc;

use storage::{RecordId, RecordStore, StorageError, StoredRecord, WeatherRequest};
use tracing::{error, info, instrument, warn};
use weather_gateway::WeatherProvider;

use crate::error::ServiceError;

/// Create/retrieve operations over an injected provider and store
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn RecordStore>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { provider, store }
    }

    /// Fetch current conditions for the request and record them
    #[instrument(skip(self, request), fields(location = %request.location))]
    pub async fn create(&self, request: WeatherRequest) -> Result<RecordId, ServiceError> {
        let weather_data = match self.provider.current(&request.location).await {
            Ok(data) => data,
            Err(e) if e.is_timeout() => {
                warn!("Weather provider timed out: {}", e);
                return Err(ServiceError::RequestTimeout);
            }
            Err(e) => {
                error!("Failed to fetch weather data: {}", e);
                return Err(ServiceError::UpstreamFailure);
            }
        };

        let id = RecordId::generate();
        let record = StoredRecord {
            id: id.clone(),
            request,
            weather_data,
        };

        self.store.insert(record).map_err(|e| {
            error!("Failed to store weather record: {}", e);
            ServiceError::UpstreamFailure
        })?;

        info!("Stored weather record {}", id);
        Ok(id)
    }

    /// Return the full record for `id`
    pub fn get(&self, id: &RecordId) -> Result<StoredRecord, ServiceError> {
        self.store.get(id).map_err(|e| match e {
            StorageError::NotFound(_) => ServiceError::NotFound,
            other => {
                error!("Failed to read weather record {}: {}", id, other);
                ServiceError::Internal
            }
        })
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }
}
