pub mod store;
pub mod types;

pub use store::KeyValueStore;
pub use types::{KeyQuery, SettingsObject};
