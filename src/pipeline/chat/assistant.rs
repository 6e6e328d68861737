use serde::Serialize;

use super::notices::api_error_reply;
use super::projector::project;
use super::prompt::build_messages;
use super::store::ConversationStore;
use crate::config::CompletionConfig;
use crate::models::{DisplayMessage, Language, Turn};
use crate::pipeline::completion::{
    ChatCompletionRequest, CompletionClient, CompletionError, OpenRouterClient,
};

/// What the front end renders after every interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Exchange {
    pub display: Vec<DisplayMessage>,
    pub history: ConversationStore,
    /// New contents of the input box. Always empty after an interaction.
    pub input: String,
}

impl Exchange {
    /// Empty display, empty history, empty input.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// A single assistant notice; history passes through untouched.
    pub fn notice(text: impl Into<String>, history: ConversationStore) -> Self {
        Self {
            display: vec![DisplayMessage::assistant(text)],
            history,
            input: String::new(),
        }
    }
}

/// Sends conversations to the completion service on behalf of the user.
///
/// Backend failures never escape `converse`: they become the assistant's reply.
pub struct MedicalAssistant {
    client: Box<dyn CompletionClient + Send + Sync>,
    model: String,
    temperature: f32,
}

impl MedicalAssistant {
    pub fn new(
        client: Box<dyn CompletionClient + Send + Sync>,
        model: &str,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    /// Build an assistant backed by the real HTTP client.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        if !config.has_api_key() {
            tracing::warn!("No API key configured; completion requests will be rejected");
        }
        let client = OpenRouterClient::new(config)?;
        tracing::info!(
            endpoint = client.endpoint(),
            model = %config.model,
            "Completion client ready"
        );
        Ok(Self::new(Box::new(client), &config.model, config.temperature))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask about `user_text` given the prior `history`.
    ///
    /// The user's text is always recorded, followed by either the real reply
    /// or an `API Error: ...` reply. The language hint goes to the backend
    /// only; history keeps the original text.
    pub fn converse(
        &self,
        user_text: &str,
        mut history: ConversationStore,
        language: Option<Language>,
    ) -> Exchange {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(history.snapshot(), user_text, language),
            temperature: self.temperature,
        };

        let reply = match self.client.complete(&request) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Completion failed; replying with error text");
                api_error_reply(&e)
            }
        };

        history.append(Turn::user(user_text));
        history.append(Turn::assistant(reply));

        tracing::debug!(turns = history.len(), "Conversation updated");

        Exchange {
            display: project(history.snapshot()),
            history,
            input: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Role, DisplayRole};
    use crate::pipeline::chat::prompt::SYSTEM_PROMPT;
    use crate::pipeline::completion::MockCompletionClient;

    fn assistant_with(mock: &Arc<MockCompletionClient>) -> MedicalAssistant {
        MedicalAssistant::new(Box::new(Arc::clone(mock)), "test/model", 0.7)
    }

    #[test]
    fn successful_reply_is_recorded_and_displayed() {
        let mock = Arc::new(MockCompletionClient::replying(
            "Elevated creatinine can indicate reduced kidney function.",
        ));
        let assistant = assistant_with(&mock);

        let exchange = assistant.converse(
            "What does high creatinine mean?",
            ConversationStore::new(),
            Some(Language::English),
        );

        let turns = exchange.history.snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("What does high creatinine mean?"));
        assert_eq!(
            turns[1],
            Turn::assistant("Elevated creatinine can indicate reduced kidney function.")
        );

        assert_eq!(exchange.display.len(), 2);
        assert_eq!(exchange.display[0], DisplayMessage::user("What does high creatinine mean?"));
        assert_eq!(exchange.display[1].role, DisplayRole::Assistant);
        assert_eq!(
            exchange.display[1].content,
            "Elevated creatinine can indicate reduced kidney function."
        );
        assert_eq!(exchange.input, "");
    }

    #[test]
    fn connection_failure_is_contained_in_history() {
        let mock = Arc::new(MockCompletionClient::failing(CompletionError::Connection(
            "https://openrouter.ai/api/v1/chat/completions".into(),
        )));
        let assistant = assistant_with(&mock);

        let exchange = assistant.converse(
            "What does high creatinine mean?",
            ConversationStore::new(),
            Some(Language::English),
        );

        let turns = exchange.history.snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("What does high creatinine mean?"));
        assert_eq!(turns[1].role(), Role::Assistant);
        assert!(turns[1].content().starts_with("API Error: "));
        assert!(turns[1].content().contains("Could not connect"));
        assert_eq!(exchange.display.len(), 2);
        assert_eq!(exchange.input, "");
    }

    #[test]
    fn malformed_response_is_contained() {
        let mock = Arc::new(MockCompletionClient::failing(
            CompletionError::MalformedResponse("response has no choices".into()),
        ));
        let exchange = assistant_with(&mock).converse("q", ConversationStore::new(), None);
        assert_eq!(
            exchange.history.snapshot()[1].content(),
            "API Error: Malformed completion response: response has no choices"
        );
    }

    #[test]
    fn hindi_hint_is_sent_but_not_stored() {
        let mock = Arc::new(MockCompletionClient::replying("जवाब"));
        let assistant = assistant_with(&mock);

        let exchange = assistant.converse(
            "What is a normal platelet count?",
            ConversationStore::new(),
            Some(Language::Hindi),
        );

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let outbound_user = requests[0].messages.last().unwrap();
        assert_eq!(
            outbound_user.content(),
            "What is a normal platelet count?\n\nPlease respond in Hindi."
        );

        assert_eq!(
            exchange.history.snapshot()[0].content(),
            "What is a normal platelet count?"
        );
    }

    #[test]
    fn hint_is_added_exactly_once_across_turns() {
        let mock = Arc::new(MockCompletionClient::replying("ok"));
        let assistant = assistant_with(&mock);

        let first = assistant.converse("q1", ConversationStore::new(), Some(Language::Hindi));
        let _second = assistant.converse("q2", first.history, Some(Language::Hindi));

        let requests = mock.requests();
        let second_request = &requests[1];
        let total_hints: usize = second_request
            .messages
            .iter()
            .map(|m| m.content().matches("Please respond in Hindi.").count())
            .sum();
        assert_eq!(total_hints, 1);
    }

    #[test]
    fn request_carries_system_prompt_history_model_and_temperature() {
        let mock = Arc::new(MockCompletionClient::replying("a2"));
        let assistant = assistant_with(&mock);
        let history = ConversationStore::from(vec![Turn::user("q1"), Turn::assistant("a1")]);

        let exchange = assistant.converse("q2", history, Some(Language::English));

        let request = &mock.requests()[0];
        assert_eq!(request.model, "test/model");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0], Turn::system(SYSTEM_PROMPT));
        assert_eq!(request.messages[1], Turn::user("q1"));
        assert_eq!(request.messages[2], Turn::assistant("a1"));
        assert_eq!(request.messages[3], Turn::user("q2"));

        assert_eq!(exchange.history.len(), 4);
        assert_eq!(exchange.display.len(), 4);
    }

    #[test]
    fn system_prompt_is_never_stored() {
        let mock = Arc::new(MockCompletionClient::replying("a"));
        let exchange = assistant_with(&mock).converse("q", ConversationStore::new(), None);
        assert!(exchange
            .history
            .snapshot()
            .iter()
            .all(|t| t.role() != Role::System));
    }

    #[test]
    fn from_config_builds_http_assistant() {
        let config = CompletionConfig::new("sk-test").with_model("some/model");
        let assistant = MedicalAssistant::from_config(&config).unwrap();
        assert_eq!(assistant.model(), "some/model");
    }

    #[test]
    fn cleared_exchange_is_empty() {
        let cleared = Exchange::cleared();
        assert!(cleared.display.is_empty());
        assert!(cleared.history.is_empty());
        assert_eq!(cleared.input, "");
    }
}
