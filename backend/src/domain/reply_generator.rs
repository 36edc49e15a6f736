//! Santa's letter replies.
//!
//! The primary path asks an external text-generation service for a reply.
//! Any failure there is absorbed: [`ReplyGenerator::generate`] always
//! returns one of two canned replies instead.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum TextGenerationError {
    #[error("Text generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed text generation response: {0}")]
    Malformed(String),
}

/// External text-generation collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, TextGenerationError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest<'a> {
    input_text: &'a str,
    text_generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_token_count: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationResult {
    output_text: Option<String>,
}

/// Text generator that POSTs to an HTTP endpoint speaking the
/// `inputText` / `results[0].outputText` JSON shape
pub struct HttpTextGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpTextGenerator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TextGenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, TextGenerationError> {
        let request = GenerationRequest {
            input_text: prompt,
            text_generation_config: GenerationConfig {
                max_token_count: 300,
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        let response: GenerationResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_output(response)
    }
}

fn extract_output(response: GenerationResponse) -> Result<String, TextGenerationError> {
    let text = response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.output_text)
        .ok_or_else(|| TextGenerationError::Malformed("missing results[0].outputText".to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(TextGenerationError::Malformed("empty outputText".to_string()));
    }
    Ok(text.to_string())
}

fn santa_prompt(child_name: &str, original_message: &str) -> String {
    format!(
        "You are Santa Claus, writing a personalized reply to a child's letter. \
The child is named {child_name}, and their letter says: \"{original_message}\"\n\n\
Please write a warm, magical, and personalized response from Santa Claus. Include:\n\
- A warm greeting using the child's name\n\
- Reference to something specific from their letter if possible\n\
- Encouragement about being on the Nice List\n\
- Mention of Christmas magic, elves, or reindeer\n\
- A reminder about cookies and milk for Santa and carrots for reindeer\n\
- A cheerful sign-off from Santa\n\n\
Keep the tone joyful, magical, and fatherly. Use Christmas emojis sparingly but effectively. \
Make it feel personal and special.\n\n\
Response:"
    )
}

fn fallback_reply(index: usize, child_name: &str) -> String {
    match index {
        0 => format!(
            "Ho Ho Ho, dear {child_name}!\n\n\
Thank you so much for your wonderful letter! Mrs. Claus and I read every word, \
and the elves were so happy to hear from you.\n\n\
I've noted your wishes in my special book, and I can see you've been working very hard \
to be on the Nice List. Keep up the wonderful work!\n\n\
Remember to leave out some cookies and milk on Christmas Eve, and don't forget the carrots \
for my reindeer. Rudolph especially loves them!\n\n\
With lots of Christmas magic and joy,\nSanta Claus"
        ),
        _ => format!(
            "Dear {child_name}, Ho Ho Ho!\n\n\
What a lovely letter you've sent to the North Pole! It made its way through the magical \
mailbox just perfectly.\n\n\
I've been watching, and I must say you've been doing a fantastic job this year! \
The elves are already working on something very special for you.\n\n\
Don't forget to dream of sugarplums and be kind to everyone around you. \
That's the true Christmas spirit!\n\n\
Sending you warm hugs from the North Pole,\nSanta & the Reindeer Team"
        ),
    }
}

const FALLBACK_COUNT: usize = 2;

#[derive(Clone)]
pub struct ReplyGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    rng: Arc<Mutex<StdRng>>,
}

impl ReplyGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self::with_rng(generator, StdRng::from_entropy())
    }

    pub fn with_rng(generator: Option<Arc<dyn TextGenerator>>, rng: StdRng) -> Self {
        Self {
            generator,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Reply to a letter. Never fails; falls back to a canned reply when the
    /// text generator is absent or errors.
    pub async fn generate(&self, child_name: &str, original_message: &str) -> String {
        if let Some(generator) = &self.generator {
            let prompt = santa_prompt(child_name, original_message);
            match generator.generate_text(&prompt).await {
                Ok(reply) => {
                    info!("Generated reply for {}", child_name);
                    return reply;
                }
                Err(e) => warn!("Falling back to canned reply for {}: {}", child_name, e),
            }
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(0..FALLBACK_COUNT)
        };
        fallback_reply(index, child_name)
    }
}
