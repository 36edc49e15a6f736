//! YAML file-backed record store.
//!
//! Layout under the data directory:
//! ```text
//! <data_dir>/children/<id>.yaml
//! <data_dir>/gifts/<id>.yaml
//! <data_dir>/reindeers/<id>.yaml
//! <data_dir>/letters/<id>.yaml
//! ```

pub mod connection;
pub mod file_store;

pub use connection::YamlConnection;
pub use file_store::FileStore;
