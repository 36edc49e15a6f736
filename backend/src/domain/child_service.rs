use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::storage::{RecordStore, Repository};
use shared::{Child, CreateChildRequest, CreateChildResponse, Gift, GiftPriority, GiftStatus};

const MAX_NAME_LENGTH: usize = 100;
const MAX_AGE: u32 = 150;
const MAX_NICE_SCORE: u8 = 100;

/// Service for managing children and the gifts created from their wishlists
#[derive(Clone)]
pub struct ChildService {
    children: Repository<Child>,
    gifts: Repository<Gift>,
}

impl ChildService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            children: Repository::new(store.clone()),
            gifts: Repository::new(store),
        }
    }

    /// Create a new child.
    ///
    /// A nice child with a non-empty wishlist also gets one gift per
    /// wishlist item. The child and each gift are separate puts; if a gift
    /// put fails the error is returned and earlier writes stay in place.
    pub async fn create_child(&self, request: CreateChildRequest) -> DomainResult<CreateChildResponse> {
        info!(
            "Creating child: name={}, country={}, status={:?}, wishlist={}",
            request.name,
            request.country,
            request.status,
            request.wishlist.len()
        );

        self.validate_create_request(&request)?;

        let child = Child {
            id: Child::generate_id(),
            name: request.name.trim().to_string(),
            age: request.age,
            country: request.country.trim().to_string(),
            status: request.status,
            wishlist: request.wishlist.iter().map(|item| item.trim().to_string()).collect(),
            nice_score: request.nice_score,
        };

        self.children.put(&child).await?;
        info!("Created child: {} with ID: {}", child.name, child.id);

        let gifts = gifts_for(&child);
        for gift in &gifts {
            self.gifts.put(gift).await?;
        }
        if !gifts.is_empty() {
            info!("Created {} gifts for child {}", gifts.len(), child.id);
        }

        Ok(CreateChildResponse { child, gifts })
    }

    /// Get a child by ID
    pub async fn get_child(&self, child_id: &str) -> DomainResult<Child> {
        info!("Getting child: {}", child_id);

        match self.children.get(child_id).await? {
            Some(child) => Ok(child),
            None => {
                warn!("Child not found: {}", child_id);
                Err(DomainError::not_found("Child", child_id))
            }
        }
    }

    /// List all children, ordered by name
    pub async fn list_children(&self) -> DomainResult<Vec<Child>> {
        let mut children = self.children.scan().await?;
        children.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        info!("Found {} children", children.len());
        Ok(children)
    }

    /// Case-insensitive substring search over name and country.
    /// The query is matched as given, whitespace included; an empty query
    /// returns every child.
    pub async fn search_children(&self, query: &str) -> DomainResult<Vec<Child>> {
        let needle = query.to_lowercase();
        let children = self.list_children().await?;
        if needle.is_empty() {
            return Ok(children);
        }

        let matches: Vec<Child> = children
            .into_iter()
            .filter(|child| {
                child.name.to_lowercase().contains(&needle)
                    || child.country.to_lowercase().contains(&needle)
            })
            .collect();

        info!("Search '{}' matched {} children", query, matches.len());
        Ok(matches)
    }

    fn validate_create_request(&self, request: &CreateChildRequest) -> DomainResult<()> {
        if request.name.trim().is_empty() {
            return Err(DomainError::validation("Child name cannot be empty"));
        }

        if request.name.trim().chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Child name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }

        if request.country.trim().is_empty() {
            return Err(DomainError::validation("Country cannot be empty"));
        }

        if request.age > MAX_AGE {
            return Err(DomainError::validation(format!("Age must be at most {}", MAX_AGE)));
        }

        if request.nice_score > MAX_NICE_SCORE {
            return Err(DomainError::validation("Nice score must be between 0 and 100"));
        }

        if request.wishlist.iter().any(|item| item.trim().is_empty()) {
            return Err(DomainError::validation("Wishlist items cannot be empty"));
        }

        Ok(())
    }
}

/// Gifts owed to a freshly created child: one per wishlist item, nice children only
fn gifts_for(child: &Child) -> Vec<Gift> {
    if !child.is_nice() {
        return Vec::new();
    }

    let priority = GiftPriority::from_nice_score(child.nice_score);
    child
        .wishlist
        .iter()
        .enumerate()
        .map(|(index, gift_name)| Gift {
            id: Gift::generate_id(&child.id, index),
            child_id: child.id.clone(),
            child_name: child.name.clone(),
            gift_name: gift_name.clone(),
            status: GiftStatus::Manufacturing,
            priority,
        })
        .collect()
}
