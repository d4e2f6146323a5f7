use crate::facade::OperationFacade;
use serde_json::{Map, Value};
use tabgate_core::Result;
use tabgate_memory::KeyQuery;

impl OperationFacade {
    /// Persist settings in the synced area.
    pub async fn save_setting(&self, obj: Value) -> Result<()> {
        self.store.save_sync(obj).await
    }

    /// Read settings back from the synced area.
    pub async fn get_setting(&self, keys: impl Into<KeyQuery>) -> Result<Map<String, Value>> {
        self.store.get_sync(keys).await
    }
}
