use std::sync::Arc;

use common::settings::Settings;

use crate::store::ReportStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ReportStore,
    pub settings: Arc<Settings>,
}
