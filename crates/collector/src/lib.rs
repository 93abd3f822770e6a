pub mod error;
pub mod report;
pub mod routes;
pub mod state;
pub mod store;
