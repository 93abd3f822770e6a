use std::sync::Arc;

use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload, PutResult};
use serde_json::Value;
use tracing::debug;

use common::settings::Settings;

/// Namespace under which accepted reports are keyed.
pub const REPORTS_NAMESPACE: &str = "reports";

/// Key-value persistence for incoming reports. Write-only from the API
/// surface; `get` exists for verification and tooling.
#[derive(Debug, Clone)]
pub struct ReportStore {
    inner: Arc<dyn ObjectStore>,
}

impl ReportStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }

    /// Process-lifetime storage, used when no store path is configured.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    pub fn persistent(path: &str) -> Result<Self, object_store::Error> {
        std::fs::create_dir_all(path).map_err(|source| object_store::Error::Generic {
            store: "LocalFileSystem",
            source: Box::new(source),
        })?;
        Ok(Self::new(Arc::new(LocalFileSystem::new_with_prefix(path)?)))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, object_store::Error> {
        match &settings.store.path {
            Some(path) => Self::persistent(path),
            None => Ok(Self::in_memory()),
        }
    }

    fn location(namespace: &str, key: &str) -> Path {
        Path::from(format!("{namespace}/{key}.json"))
    }

    /// Store `value` under `namespace`/`key`. The returned ack confirms the
    /// write was committed; callers must not treat an error as a success.
    pub async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: &Value,
    ) -> Result<PutResult, object_store::Error> {
        let location = Self::location(namespace, key);
        let payload = PutPayload::from(value.to_string().into_bytes());
        let ack = self.inner.put(&location, payload).await?;
        debug!(%location, "report stored");
        Ok(ack)
    }

    pub async fn get(&self, namespace: &str, key: &str) -> Result<Value, object_store::Error> {
        let location = Self::location(namespace, key);
        let bytes = self.inner.get(&location).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| object_store::Error::Generic {
            store: "ReportStore",
            source: Box::new(source),
        })
    }
}
