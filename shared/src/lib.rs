use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Nice/naughty classification of a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildStatus {
    Nice,
    Naughty,
}

/// A child known to the North Pole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub country: String,
    pub status: ChildStatus,
    /// Gift names in the order the child asked for them
    #[serde(default)]
    pub wishlist: Vec<String>,
    /// Behaviour score, 0-100
    pub nice_score: u8,
}

impl Child {
    /// Generate a fresh opaque child ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_nice(&self) -> bool {
        self.status == ChildStatus::Nice
    }
}

/// Stage of a gift in the workshop pipeline.
///
/// Conceptually linear (manufacturing → wrapping → ready → delivered), but
/// updates may jump to any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatus {
    Manufacturing,
    Wrapping,
    Ready,
    Delivered,
}

impl GiftStatus {
    /// All stages in pipeline order
    pub const ALL: [GiftStatus; 4] = [
        GiftStatus::Manufacturing,
        GiftStatus::Wrapping,
        GiftStatus::Ready,
        GiftStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GiftStatus::Manufacturing => "manufacturing",
            GiftStatus::Wrapping => "wrapping",
            GiftStatus::Ready => "ready",
            GiftStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery priority of a gift, fixed when the gift is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftPriority {
    Low,
    Medium,
    High,
}

impl GiftPriority {
    /// Derive the priority from the owning child's nice score:
    /// 90 and above is high, 70 and above is medium, anything else is low.
    pub fn from_nice_score(nice_score: u8) -> Self {
        if nice_score >= 90 {
            GiftPriority::High
        } else if nice_score >= 70 {
            GiftPriority::Medium
        } else {
            GiftPriority::Low
        }
    }
}

/// A gift being prepared for a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: String,
    /// Weak reference to the owning child; existence is never enforced
    pub child_id: String,
    /// Copy of the child's name at gift creation time
    pub child_name: String,
    pub gift_name: String,
    pub status: GiftStatus,
    pub priority: GiftPriority,
}

impl Gift {
    /// Gift IDs are `{child_id}-{wishlist_index}`
    pub fn generate_id(child_id: &str, index: usize) -> String {
        format!("{}-{}", child_id, index)
    }
}

/// Activity state of a reindeer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReindeerStatus {
    Resting,
    Training,
    Flying,
}

impl ReindeerStatus {
    /// Fixed enumeration order used when walking transition probabilities
    pub const ALL: [ReindeerStatus; 3] = [
        ReindeerStatus::Resting,
        ReindeerStatus::Training,
        ReindeerStatus::Flying,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReindeerStatus::Resting => "resting",
            ReindeerStatus::Training => "training",
            ReindeerStatus::Flying => "flying",
        }
    }

    /// Anything other than resting counts as active
    pub fn is_active(&self) -> bool {
        *self != ReindeerStatus::Resting
    }
}

impl fmt::Display for ReindeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of the sleigh team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reindeer {
    pub id: String,
    pub name: String,
    pub status: ReindeerStatus,
    pub location: String,
    /// Energy gauge, 0-100
    pub energy_level: u8,
}

/// A letter received from a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: String,
    /// Free text, not a reference to a Child record
    pub child_name: String,
    pub message: String,
    /// RFC 3339 timestamp
    pub received_date: String,
    #[serde(default)]
    pub replied: bool,
    /// Reply text, present once a reply has been saved onto the letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl Letter {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Derived dashboard summary, recomputed on every request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_children: usize,
    pub nice_children: usize,
    pub naughty_children: usize,
    pub gifts_ready: usize,
    pub gifts_in_progress: usize,
    pub active_reindeers: usize,
    pub unread_letters: usize,
}

/// One bar of the gift progress chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftProgressStat {
    pub label: String,
    pub value: usize,
    pub color: String,
}

/// Request for creating a new child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub status: ChildStatus,
    #[serde(default)]
    pub wishlist: Vec<String>,
    pub nice_score: u8,
}

/// Response after creating a child, including any gifts created from the wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildResponse {
    pub child: Child,
    pub gifts: Vec<Gift>,
}

/// Request body for changing a gift's status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGiftStatusRequest {
    pub status: GiftStatus,
}

/// Request body for changing a reindeer's status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReindeerStatusRequest {
    pub status: ReindeerStatus,
}

/// Request for submitting a new letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLetterRequest {
    pub child_name: String,
    pub message: String,
    /// Optional RFC 3339 timestamp - uses current time if not provided
    #[serde(default)]
    pub received_date: Option<String>,
}

/// Request for a generated reply to a child's letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub child_name: String,
    pub original_message: String,
    /// When set, the reply is saved onto this letter and it is marked replied
    #[serde(default)]
    pub letter_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<Letter>,
}

/// Result of moving one reindeer during a simulator pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindeerTransition {
    pub id: String,
    pub name: String,
    pub previous_status: ReindeerStatus,
    pub status: ReindeerStatus,
    pub previous_location: String,
    pub location: String,
    pub previous_energy_level: u8,
    pub energy_level: u8,
}

/// A reindeer the simulator could not update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of one simulator pass over the reindeer collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub updated: Vec<ReindeerTransition>,
    pub failures: Vec<RecordFailure>,
}

/// JSON error body returned by the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// True when the caller may retry the same request
    pub retryable: bool,
}
