use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::reply_generator::ReplyGenerator;
use crate::storage::{Document, RecordStore, Repository};
use shared::{CreateLetterRequest, Letter, ReplyRequest, ReplyResponse};

/// Service for letters to Santa and his replies
#[derive(Clone)]
pub struct LetterService {
    letters: Repository<Letter>,
    replies: ReplyGenerator,
}

impl LetterService {
    pub fn new(store: Arc<dyn RecordStore>, replies: ReplyGenerator) -> Self {
        Self {
            letters: Repository::new(store),
            replies,
        }
    }

    /// All letters, newest first
    pub async fn list_letters(&self) -> DomainResult<Vec<Letter>> {
        let mut letters = self.letters.scan().await?;
        letters.sort_by(|a, b| b.received_date.cmp(&a.received_date));
        Ok(letters)
    }

    pub async fn get_letter(&self, letter_id: &str) -> DomainResult<Letter> {
        match self.letters.get(letter_id).await? {
            Some(letter) => Ok(letter),
            None => {
                warn!("Letter not found: {}", letter_id);
                Err(DomainError::not_found("Letter", letter_id))
            }
        }
    }

    pub async fn create_letter(&self, request: CreateLetterRequest) -> DomainResult<Letter> {
        if request.child_name.trim().is_empty() {
            return Err(DomainError::validation("Child name cannot be empty"));
        }
        if request.message.trim().is_empty() {
            return Err(DomainError::validation("Letter message cannot be empty"));
        }

        let received_date = match request.received_date {
            Some(date) if !date.trim().is_empty() => date,
            _ => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let letter = Letter {
            id: Letter::generate_id(),
            child_name: request.child_name.trim().to_string(),
            message: request.message,
            received_date,
            replied: false,
            reply: None,
        };

        self.letters.put(&letter).await?;
        info!("Received letter {} from {}", letter.id, letter.child_name);
        Ok(letter)
    }

    /// Generate Santa's reply.
    ///
    /// With a `letter_id` the letter must exist and the reply is written
    /// from its stored child name and message, then stored on it with the
    /// letter marked replied. Text generation itself never
    /// fails the request.
    pub async fn generate_reply(&self, request: ReplyRequest) -> DomainResult<ReplyResponse> {
        let Some(letter_id) = request.letter_id.as_deref() else {
            let reply = self
                .replies
                .generate(&request.child_name, &request.original_message)
                .await;
            return Ok(ReplyResponse { reply, letter: None });
        };

        // The stored letter is authoritative over the request's copy
        let stored = self.get_letter(letter_id).await?;
        let reply = self.replies.generate(&stored.child_name, &stored.message).await;

        let mut fields = Document::new();
        fields.insert("reply".to_string(), json!(reply));
        fields.insert("replied".to_string(), json!(true));

        // The letter may have vanished between the read and this write
        let letter = self
            .letters
            .update(letter_id, fields)
            .await?
            .ok_or_else(|| DomainError::not_found("Letter", letter_id))?;

        info!("Replied to letter {}", letter_id);
        Ok(ReplyResponse {
            reply,
            letter: Some(letter),
        })
    }
}
