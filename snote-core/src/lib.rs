pub mod error;
pub mod types;
pub mod config;
pub mod kv;
pub mod memory;
pub mod file;

pub use error::{Error, Result};
pub use types::*;
pub use config::{IdScheme, StoreConfig};
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use file::FileStore;
