//! Validating front for the host's two persistent key-value areas.

use crate::types::{KeyQuery, SettingsObject};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tabgate_core::{GateError, Metrics, Result, StorageArea, StorageHost};
use tracing::{debug, warn};

pub struct KeyValueStore {
    host: Arc<dyn StorageHost>,
    metrics: Arc<Metrics>,
}

impl KeyValueStore {
    pub fn new(host: Arc<dyn StorageHost>) -> Self {
        Self::with_metrics(host, Metrics::new())
    }

    pub fn with_metrics(host: Arc<dyn StorageHost>, metrics: Arc<Metrics>) -> Self {
        Self { host, metrics }
    }

    /// Write every pair of `obj` to `area` as one batch.
    ///
    /// Fails with `InvalidArgument` unless `obj` is a non-empty object; in
    /// that case the host is never called.
    pub async fn save(&self, area: StorageArea, obj: Value) -> Result<()> {
        let settings = SettingsObject::try_from(obj)?;
        self.write(area, settings).await
    }

    /// Serialize `value` and save it. `value` must serialize to a non-empty
    /// object, e.g. a settings struct.
    pub async fn save_typed<T: Serialize + ?Sized>(&self, area: StorageArea, value: &T) -> Result<()> {
        let settings = SettingsObject::from_serializable(value)?;
        self.write(area, settings).await
    }

    pub async fn write(&self, area: StorageArea, settings: SettingsObject) -> Result<()> {
        let count = settings.len();
        self.metrics.inc_host_calls();
        self.host.set(area, settings.into_inner()).await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("Storage write to {} area failed: {}", area, e);
            GateError::host_operation(e)
        })?;

        debug!("Stored {} key(s) in {} area", count, area);
        Ok(())
    }

    /// Read keys back from `area`. Only keys that exist appear in the result.
    ///
    /// `KeyQuery::All` (or an empty single key) returns every stored key; an
    /// explicit empty key list is rejected without calling the host.
    pub async fn get(&self, area: StorageArea, keys: impl Into<KeyQuery>) -> Result<Map<String, Value>> {
        let query: KeyQuery = keys.into();
        let filter = query.into_filter()?;

        self.metrics.inc_host_calls();
        let items = self.host.get(area, &filter).await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("Storage read from {} area failed: {}", area, e);
            GateError::host_operation(e)
        })?;

        debug!("Read {} key(s) from {} area", items.len(), area);
        Ok(items)
    }

    /// Read keys back and deserialize the resulting object into `T`.
    pub async fn get_typed<T: DeserializeOwned>(
        &self,
        area: StorageArea,
        keys: impl Into<KeyQuery>,
    ) -> Result<T> {
        let items = self.get(area, keys).await?;
        Ok(serde_json::from_value(Value::Object(items))?)
    }

    pub async fn save_sync(&self, obj: Value) -> Result<()> {
        self.save(StorageArea::Sync, obj).await
    }

    pub async fn get_sync(&self, keys: impl Into<KeyQuery>) -> Result<Map<String, Value>> {
        self.get(StorageArea::Sync, keys).await
    }

    pub async fn save_local(&self, obj: Value) -> Result<()> {
        self.save(StorageArea::Local, obj).await
    }

    pub async fn get_local(&self, keys: impl Into<KeyQuery>) -> Result<Map<String, Value>> {
        self.get(StorageArea::Local, keys).await
    }
}
