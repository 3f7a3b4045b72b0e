pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod report;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use errors::{AppError, LedgerError};
pub use state::AppState;
pub use storage::{JsonFileStore, KeyValueStore, Store};
