use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use object_store::path::Path;
use object_store::{
    GetOptions, GetResult, ListResult, MultipartUpload, ObjectMeta, ObjectStore, PutMultipartOpts,
    PutOptions, PutPayload, PutResult, Result,
};
use std::fmt::{self, Display, Formatter};

/// Object store that fails every operation, for driving storage-error paths
/// in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingObjectStore;

fn injected_failure() -> object_store::Error {
    object_store::Error::Generic {
        store: "FailingObjectStore",
        source: "injected failure".into(),
    }
}

impl Display for FailingObjectStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FailingObjectStore")
    }
}

#[async_trait]
impl ObjectStore for FailingObjectStore {
    async fn put_opts(
        &self,
        _location: &Path,
        _payload: PutPayload,
        _opts: PutOptions,
    ) -> Result<PutResult> {
        Err(injected_failure())
    }

    async fn put_multipart_opts(
        &self,
        _location: &Path,
        _opts: PutMultipartOpts,
    ) -> Result<Box<dyn MultipartUpload>> {
        Err(injected_failure())
    }

    async fn get_opts(&self, _location: &Path, _options: GetOptions) -> Result<GetResult> {
        Err(injected_failure())
    }

    async fn delete(&self, _location: &Path) -> Result<()> {
        Err(injected_failure())
    }

    fn list(&self, _prefix: Option<&Path>) -> BoxStream<'static, Result<ObjectMeta>> {
        Box::pin(stream::once(async { Err(injected_failure()) }))
    }

    async fn list_with_delimiter(&self, _prefix: Option<&Path>) -> Result<ListResult> {
        Err(injected_failure())
    }

    async fn copy(&self, _from: &Path, _to: &Path) -> Result<()> {
        Err(injected_failure())
    }

    async fn copy_if_not_exists(&self, _from: &Path, _to: &Path) -> Result<()> {
        Err(injected_failure())
    }
}
