pub mod store;

pub use store::{STORE_FILE_NAME, StoreError, TaskStore};
