//! # Domain Module
//!
//! Contains the business logic of SantaCloud.
//!
//! Services here own the rules; they read and write through the storage
//! layer's [`RecordStore`](crate::storage::RecordStore) and know nothing
//! about HTTP.
//!
//! ## Module Organization
//!
//! - **child_service**: child records, search, and the gift cascade on creation
//! - **gift_service**: gift status changes and workshop progress
//! - **reindeer_service**: reindeer reads and manual status changes
//! - **letter_service**: letters to Santa and persisted replies
//! - **dashboard_service**: aggregate counts, recomputed on every call
//! - **simulator**: the reindeer status Markov chain and its scheduler
//! - **reply_generator**: text-generation client with canned fallbacks
//!
//! ## Business Rules
//!
//! - Only nice children with a non-empty wishlist get gifts, one per item
//! - Gift priority is fixed at creation from the child's nice score
//!   (>= 90 high, >= 70 medium, otherwise low)
//! - Gift status may jump between any two states
//! - Reindeer energy always stays within `[0, 100]`
//! - Reply generation never fails because of the text-generation service

pub mod child_service;
pub mod dashboard_service;
pub mod error;
pub mod gift_service;
pub mod letter_service;
pub mod reindeer_service;
pub mod reply_generator;
pub mod simulator;

pub use child_service::ChildService;
pub use dashboard_service::DashboardService;
pub use error::{DomainError, DomainResult};
pub use gift_service::GiftService;
pub use letter_service::LetterService;
pub use reindeer_service::ReindeerService;
pub use reply_generator::{HttpTextGenerator, ReplyGenerator, TextGenerationError, TextGenerator};
pub use simulator::{SimulationTables, SimulatorScheduler, StatusSimulator, TableError};
