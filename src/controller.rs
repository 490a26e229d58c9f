//! Character request/render controller
//!
//! [`FormState`] is the whole UI state; every change goes through
//! [`FormState::apply`], a pure transition. [`Controller`] owns one state
//! value and drives a single generation call against a [`GeneratorService`].

use crate::generator::GeneratorService;
use crate::models::{CharacterRecord, GenerationRequest, GenerationResponse, PowerLevel};
use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Discrete events that move the form from one state to the next.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    YokaiTypeChanged(String),
    PowerLevelChanged(PowerLevel),
    ElementChanged(String),
    /// Local validation rejected the inputs; no request was sent.
    Rejected(String),
    /// A request tagged with `token` was sent.
    Started { token: u64 },
    /// The request tagged with `token` settled.
    Settled {
        token: u64,
        outcome: std::result::Result<CharacterRecord, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    yokai_type: String,
    power_level: PowerLevel,
    element: String,
    character: Option<CharacterRecord>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<u64>,
}

impl FormState {
    pub fn with_inputs(yokai_type: &str, power_level: PowerLevel, element: &str) -> Self {
        Self {
            yokai_type: yokai_type.to_string(),
            power_level,
            element: element.to_string(),
            ..Default::default()
        }
    }

    pub fn yokai_type(&self) -> &str {
        &self.yokai_type
    }

    pub fn power_level(&self) -> PowerLevel {
        self.power_level
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn character(&self) -> Option<&CharacterRecord> {
        self.character.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Inputs are locked while a request is in flight.
    pub fn inputs_disabled(&self) -> bool {
        self.loading
    }

    /// Whether `token` names the request this state is still waiting on.
    pub fn is_current(&self, token: u64) -> bool {
        self.in_flight == Some(token)
    }

    /// Check the inputs and build the request body they describe.
    pub fn request(&self) -> Result<GenerationRequest> {
        if self.yokai_type.trim().is_empty() {
            return Err(Error::Validation);
        }
        Ok(GenerationRequest::new(
            &self.yokai_type,
            self.power_level,
            &self.element,
        ))
    }

    /// Pure transition: `(state, event) -> state`.
    pub fn apply(mut self, event: FormEvent) -> Self {
        match event {
            FormEvent::YokaiTypeChanged(value) if !self.loading => self.yokai_type = value,
            FormEvent::PowerLevelChanged(value) if !self.loading => self.power_level = value,
            FormEvent::ElementChanged(value) if !self.loading => self.element = value,
            FormEvent::YokaiTypeChanged(_)
            | FormEvent::PowerLevelChanged(_)
            | FormEvent::ElementChanged(_) => {}
            FormEvent::Rejected(message) => self.error = Some(message),
            FormEvent::Started { token } => {
                self.loading = true;
                self.error = None;
                self.character = None;
                self.in_flight = Some(token);
            }
            FormEvent::Settled { token, outcome } => {
                // A superseded request never overwrites the newer one.
                if !self.is_current(token) {
                    return self;
                }
                self.loading = false;
                self.in_flight = None;
                match outcome {
                    Ok(character) => {
                        self.character = Some(character);
                        self.error = None;
                    }
                    Err(message) => {
                        self.character = None;
                        self.error = Some(message);
                    }
                }
            }
        }
        self
    }
}

/// Owns the form state and issues generation requests.
pub struct Controller {
    generator: Box<dyn GeneratorService>,
    state: Mutex<FormState>,
    next_token: AtomicU64,
}

impl Controller {
    pub fn new(generator: Box<dyn GeneratorService>) -> Self {
        Self::with_state(generator, FormState::default())
    }

    pub fn with_state(generator: Box<dyn GeneratorService>, state: FormState) -> Self {
        Self {
            generator,
            state: Mutex::new(state),
            next_token: AtomicU64::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState> {
        // State is only ever replaced wholesale, so a poisoned lock still
        // holds a consistent value.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(state: &mut FormState, event: FormEvent) {
        let current = std::mem::take(state);
        *state = current.apply(event);
    }

    /// Apply one event and return the resulting state.
    pub fn dispatch(&self, event: FormEvent) -> FormState {
        let mut state = self.lock_state();
        Self::transition(&mut state, event);
        state.clone()
    }

    pub fn snapshot(&self) -> FormState {
        self.lock_state().clone()
    }

    pub fn set_yokai_type(&self, value: impl Into<String>) {
        self.dispatch(FormEvent::YokaiTypeChanged(value.into()));
    }

    pub fn set_power_level(&self, value: PowerLevel) {
        self.dispatch(FormEvent::PowerLevelChanged(value));
    }

    pub fn set_element(&self, value: impl Into<String>) {
        self.dispatch(FormEvent::ElementChanged(value.into()));
    }

    /// Run one generation attempt with the current inputs.
    ///
    /// The outcome is recorded in the form state before it is returned, and
    /// `loading` is cleared on every path once this request settles.
    pub async fn generate(&self) -> Result<CharacterRecord> {
        let (request, token) = {
            let mut state = self.lock_state();
            let request = match state.request() {
                Ok(request) => request,
                Err(e) => {
                    warn!("Rejected generation request: {}", e);
                    Self::transition(&mut state, FormEvent::Rejected(e.to_string()));
                    return Err(e);
                }
            };
            let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
            Self::transition(&mut state, FormEvent::Started { token });
            (request, token)
        };

        info!(
            "[{}] Generating {} ({})",
            token, request.yokai_type, request.power_level
        );

        let result = self
            .generator
            .generate(&request)
            .await
            .and_then(GenerationResponse::into_character);

        let outcome = match &result {
            Ok(character) => {
                info!("[{}] Generated character {}", token, character.character_name);
                Ok(character.clone())
            }
            Err(e) => {
                warn!("[{}] Generation failed: {}", token, e);
                Err(e.to_string())
            }
        };

        let mut state = self.lock_state();
        if state.is_current(token) {
            Self::transition(&mut state, FormEvent::Settled { token, outcome });
        } else {
            debug!("[{}] Superseded by a newer request, discarding outcome", token);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{MockGeneratorClient, MockReply};
    use crate::models::{Ability, Relationships};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    fn kuzuha() -> CharacterRecord {
        CharacterRecord {
            character_name: "Kuzuha".to_string(),
            species: "Kitsune".into(),
            abilities: vec![Ability::Label("Fox Fire".to_string())].into(),
            relationships: Relationships::Summary("None known".to_string()).into(),
            ..Default::default()
        }
    }

    fn controller_with(
        generator: MockGeneratorClient,
        yokai_type: &str,
        element: &str,
    ) -> Controller {
        Controller::with_state(
            Box::new(generator),
            FormState::with_inputs(yokai_type, PowerLevel::default(), element),
        )
    }

    #[tokio::test]
    async fn test_blank_yokai_type_is_rejected_without_request() {
        for input in ["", "   ", "\t\n"] {
            let generator = MockGeneratorClient::new();
            let recorder = generator.clone();
            let controller = controller_with(generator, input, "");

            let err = controller.generate().await.unwrap_err();
            assert!(matches!(err, Error::Validation));

            let state = controller.snapshot();
            assert_eq!(state.error(), Some("Please enter a yokai type!"));
            assert!(!state.loading());
            assert_eq!(recorder.get_call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_default_inputs_build_minimal_body() {
        let generator = MockGeneratorClient::new().with_character(kuzuha());
        let recorder = generator.clone();
        let controller = controller_with(generator, "kitsune", "");

        controller.generate().await.unwrap();

        let requests = recorder.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            serde_json::to_value(&requests[0]).unwrap(),
            serde_json::json!({ "yokai_type": "kitsune", "power_level": "stage 3 boss" })
        );
    }

    #[tokio::test]
    async fn test_success_adopts_character_exactly() {
        let generator = MockGeneratorClient::new().with_character(kuzuha());
        let controller = controller_with(generator, "kitsune", "fire");

        let character = controller.generate().await.unwrap();
        let state = controller.snapshot();

        assert_eq!(character, kuzuha());
        assert_eq!(state.character(), Some(&kuzuha()));
        assert_eq!(state.error(), None);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_logical_failure_sets_generic_error() {
        let generator = MockGeneratorClient::new()
            .with_character(kuzuha())
            .with_reply(MockReply::Envelope(GenerationResponse::failed()));
        let controller = controller_with(generator, "kitsune", "");

        controller.generate().await.unwrap();
        assert!(controller.snapshot().character().is_some());

        let err = controller.generate().await.unwrap_err();
        assert!(matches!(err, Error::GenerationFailed));

        let state = controller.snapshot();
        assert_eq!(state.character(), None);
        assert_eq!(state.error(), Some("Failed to generate character"));
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_success_flag_with_missing_character_is_failure() {
        let generator = MockGeneratorClient::new().with_reply(MockReply::Envelope(
            GenerationResponse {
                success: true,
                character: None,
            },
        ));
        let controller = controller_with(generator, "kappa", "");

        assert!(controller.generate().await.is_err());
        let state = controller.snapshot();
        assert_eq!(state.error(), Some("Failed to generate character"));
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_failure() {
        let generator = MockGeneratorClient::new().with_reply(MockReply::Malformed);
        let controller = controller_with(generator, "kappa", "");

        assert!(matches!(
            controller.generate().await,
            Err(Error::GenerationFailed)
        ));
        assert!(!controller.snapshot().loading());
    }

    #[tokio::test]
    async fn test_transport_failure_reports_cause() {
        let generator =
            MockGeneratorClient::new().with_reply(MockReply::Transport("Failed to fetch".to_string()));
        let controller = controller_with(generator, "kitsune", "");

        controller.generate().await.unwrap_err();

        let state = controller.snapshot();
        assert_eq!(
            state.error(),
            Some("Error connecting to server: Failed to fetch")
        );
        assert_eq!(state.character(), None);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_overlapping_requests_keep_latest() {
        let slow = CharacterRecord {
            character_name: "Slow".to_string(),
            ..Default::default()
        };
        let fast = CharacterRecord {
            character_name: "Fast".to_string(),
            ..Default::default()
        };
        let generator = MockGeneratorClient::new()
            .with_delayed_reply(
                MockReply::Envelope(GenerationResponse::succeeded(slow)),
                Duration::from_millis(200),
            )
            .with_reply(MockReply::Envelope(GenerationResponse::succeeded(fast.clone())));
        let controller = Arc::new(controller_with(generator, "oni", ""));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.generate().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        controller.generate().await.unwrap();
        assert_eq!(controller.snapshot().character(), Some(&fast));

        // The older response still resolves for its caller but is not adopted.
        assert!(first.await.unwrap().is_ok());
        let state = controller.snapshot();
        assert_eq!(state.character(), Some(&fast));
        assert!(!state.loading());
    }

    #[test]
    fn test_inputs_are_locked_while_loading() {
        let state = FormState::with_inputs("oni", PowerLevel::Stage1, "")
            .apply(FormEvent::Started { token: 1 })
            .apply(FormEvent::YokaiTypeChanged("tengu".to_string()))
            .apply(FormEvent::PowerLevelChanged(PowerLevel::Extra));

        assert!(state.inputs_disabled());
        assert_eq!(state.yokai_type(), "oni");
        assert_eq!(state.power_level(), PowerLevel::Stage1);
    }

    #[test]
    fn test_start_clears_previous_outcome() {
        let state = FormState::with_inputs("oni", PowerLevel::Stage1, "")
            .apply(FormEvent::Rejected("Please enter a yokai type!".to_string()))
            .apply(FormEvent::Started { token: 1 })
            .apply(FormEvent::Settled {
                token: 1,
                outcome: Ok(kuzuha()),
            })
            .apply(FormEvent::Started { token: 2 });

        assert!(state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.character(), None);
    }

    #[test]
    fn test_stale_settlement_is_ignored() {
        let state = FormState::default()
            .apply(FormEvent::Started { token: 1 })
            .apply(FormEvent::Started { token: 2 })
            .apply(FormEvent::Settled {
                token: 1,
                outcome: Err("Failed to generate character".to_string()),
            });

        assert!(state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_is_current_follows_latest_start() {
        let state = FormState::default();
        assert!(!state.is_current(1));

        let state = state
            .apply(FormEvent::Started { token: 1 })
            .apply(FormEvent::Started { token: 2 });
        assert!(!state.is_current(1));
        assert!(state.is_current(2));

        let state = state.apply(FormEvent::Settled {
            token: 2,
            outcome: Ok(kuzuha()),
        });
        assert!(!state.is_current(2));
    }

    #[tokio::test]
    async fn test_late_failure_of_superseded_request_is_discarded() {
        let generator = MockGeneratorClient::new()
            .with_delayed_reply(
                MockReply::Transport("Failed to fetch".to_string()),
                Duration::from_millis(200),
            )
            .with_character(kuzuha());
        let controller = Arc::new(controller_with(generator, "kitsune", ""));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.generate().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        controller.generate().await.unwrap();

        // The caller still sees its own error, but the form keeps the newer result.
        assert!(matches!(first.await.unwrap(), Err(Error::Transport(_))));
        let state = controller.snapshot();
        assert_eq!(state.character(), Some(&kuzuha()));
        assert_eq!(state.error(), None);
        assert!(!state.loading());
    }
}
