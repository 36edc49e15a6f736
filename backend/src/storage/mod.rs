//! # Storage Module
//!
//! Handles all data persistence for SantaCloud.
//!
//! Every other layer talks to a [`RecordStore`]: four independent
//! collections (children, gifts, reindeers, letters) of flat JSON documents
//! keyed by an opaque string ID. The store offers get, put (full upsert),
//! scan (full, unfiltered) and partial update. There are no transactions
//! across collections and no concurrency tokens; the last writer wins.
//!
//! ## Current Implementation
//!
//! - **MemoryStore**: process-local maps, used when no data directory is set
//! - **FileStore**: one YAML file per record under a data directory
//! - **Repository**: typed facade converting documents to `shared` records

pub mod memory;
pub mod repository;
pub mod seed;
pub mod traits;
pub mod yaml;

pub use memory::MemoryStore;
pub use repository::{Repository, StoredRecord};
pub use seed::seed_default_reindeers;
pub use traits::{Collection, Document, RecordStore, StoreError, StoreResult};
pub use yaml::{FileStore, YamlConnection};
