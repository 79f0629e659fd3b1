//! vatkeep-store: persistence and bookkeeping around the vatkeep-core engine.

pub mod backend;
pub mod export;
pub mod history;
pub mod store;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use export::export_csv;
pub use history::{AlertSend, SendChannel, SendStatus};
pub use store::{ClientStore, ClientUpdate, DashboardStats, StoreData};
