//! Shared fixtures for collector integration tests.

pub mod failing_object_store;

use std::sync::Arc;

use axum::Router;

use collector::routes::routes;
use collector::state::AppState;
use collector::store::ReportStore;
use common::settings::Settings;

pub use failing_object_store::FailingObjectStore;

pub fn create_settings() -> Arc<Settings> {
    Arc::new(Settings::default())
}

pub fn create_store() -> ReportStore {
    ReportStore::in_memory()
}

/// A store whose every write fails, for exercising the 500 path.
pub fn create_failing_store() -> ReportStore {
    ReportStore::new(Arc::new(FailingObjectStore))
}

pub fn create_router(store: ReportStore) -> Router {
    let state = AppState {
        store,
        settings: create_settings(),
    };
    routes(state)
}
