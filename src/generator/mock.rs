use super::GeneratorService;
use crate::models::{CharacterRecord, Field, GenerationRequest, GenerationResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned outcome for one mocked generation call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Envelope(GenerationResponse),
    Transport(String),
    Malformed,
}

#[derive(Clone)]
pub struct MockGeneratorClient {
    replies: Arc<Mutex<Vec<(MockReply, Option<Duration>)>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGeneratorClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push((reply, None));
        self
    }

    /// Queue a reply that is only delivered after `delay`.
    pub fn with_delayed_reply(self, reply: MockReply, delay: Duration) -> Self {
        self.replies.lock().unwrap().push((reply, Some(delay)));
        self
    }

    pub fn with_character(self, character: CharacterRecord) -> Self {
        self.with_reply(MockReply::Envelope(GenerationResponse::succeeded(character)))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGeneratorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeneratorService for MockGeneratorClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let (reply, delay) = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            self.requests.lock().unwrap().push(request.clone());

            let replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                // Default mock response
                let character = CharacterRecord {
                    character_name: format!("Mock {}", request.yokai_type.trim()),
                    species: request.yokai_type.clone().into(),
                    power_level: request.power_level.to_string().into(),
                    element: request
                        .element
                        .clone()
                        .map_or(Field::Missing, Field::Value),
                    ..Default::default()
                };
                (MockReply::Envelope(GenerationResponse::succeeded(character)), None)
            } else {
                let index = (*count - 1) % replies.len();
                replies[index].clone()
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Envelope(response) => Ok(response),
            MockReply::Transport(message) => Err(Error::Transport(message)),
            MockReply::Malformed => Err(Error::GenerationFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerLevel;

    #[tokio::test]
    async fn test_mock_generator_default_reply() {
        let client = MockGeneratorClient::new();
        let request = GenerationRequest::new("kitsune", PowerLevel::default(), "fire");

        let response = client.generate(&request).await.unwrap();
        let character = response.into_character().unwrap();
        assert_eq!(character.character_name, "Mock kitsune");
        assert_eq!(character.element.as_str(), Some("fire"));
    }

    #[tokio::test]
    async fn test_mock_generator_cycles_replies() {
        let client = MockGeneratorClient::new()
            .with_reply(MockReply::Transport("Failed to fetch".to_string()))
            .with_reply(MockReply::Envelope(GenerationResponse::failed()));
        let request = GenerationRequest::new("oni", PowerLevel::Stage5, "");

        assert!(matches!(
            client.generate(&request).await,
            Err(Error::Transport(_))
        ));
        assert!(!client.generate(&request).await.unwrap().success);

        // Should cycle back
        assert!(matches!(
            client.generate(&request).await,
            Err(Error::Transport(_))
        ));
        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.get_requests().len(), 3);
    }
}
