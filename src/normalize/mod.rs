//! Message Normalizer
//!
//! Turns whatever the caller passed (a prompt string or a conversation) plus
//! their [`CallOptions`] into the immutable [`ChatRequest`] an adapter sends.

mod policy;

pub use policy::{DEFAULT_SYSTEM_GREETING, MessagePolicy, SYNTHETIC_USER_PROMPT};

use validator::Validate;

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::types::{CallOptions, ChatMessage, ChatRequest, MessageInput, SamplingParams};

/// Generation defaults applied when the caller leaves a knob unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.9,
        }
    }
}

/// Builds canonical requests for one provider.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    config: &'a ProviderConfig,
    policy: MessagePolicy,
    defaults: GenerationDefaults,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a ProviderConfig, policy: MessagePolicy) -> Self {
        Self {
            config,
            policy,
            defaults: GenerationDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: GenerationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn normalize(
        &self,
        input: MessageInput,
        options: &CallOptions,
    ) -> Result<ChatRequest, LlmError> {
        options.validate()?;

        let (pinned_model, messages) = match input {
            MessageInput::Text(text) => (None, vec![ChatMessage::user(text)]),
            MessageInput::Conversation(conv) => (conv.model, conv.messages),
        };
        if messages.is_empty() {
            return Err(LlmError::InvalidInput(
                "conversation must contain at least one message".into(),
            ));
        }

        // per-call model > option-level model > provider default
        let requested = pinned_model.as_deref().or(options.model.as_deref());
        let model = self.config.resolve_model(requested);

        let messages = self.policy.apply(messages);
        let max_tokens = options.max_tokens.unwrap_or(self.defaults.max_tokens);
        let response_format = options.response_format.unwrap_or_default();

        Ok(ChatRequest::new(
            model,
            messages,
            max_tokens,
            response_format,
            self.sampling(options),
        ))
    }

    fn sampling(&self, options: &CallOptions) -> SamplingParams {
        let mut params =
            SamplingParams::new().with(SamplingParams::TEMPERATURE, self.defaults.temperature);
        for (name, value) in &options.extra {
            params.insert(name.clone(), *value);
        }
        if let Some(t) = options.temperature {
            params.insert(SamplingParams::TEMPERATURE, t);
        }
        if let Some(p) = options.top_p {
            params.insert(SamplingParams::TOP_P, p);
        }
        if let Some(k) = options.top_k {
            params.insert(SamplingParams::TOP_K, f64::from(k));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfigTable;
    use crate::types::{Conversation, MessageRole, ResponseFormat};
    use proptest::prelude::*;

    fn gemini() -> ProviderConfig {
        ProviderConfigTable::builtin().get("gemini").unwrap().clone()
    }

    #[test]
    fn bare_string_becomes_single_user_message() {
        let cfg = gemini();
        let req = Normalizer::new(&cfg, MessagePolicy::permissive())
            .normalize("Explain gravity".into(), &CallOptions::new())
            .unwrap();
        assert_eq!(req.messages(), &[ChatMessage::user("Explain gravity")]);
        assert_eq!(req.model(), "gemini-1.5-flash");
        assert_eq!(req.max_tokens(), 150);
        assert_eq!(req.sampling().temperature(), Some(0.9));
        assert_eq!(req.response_format(), ResponseFormat::Text);
    }

    #[test]
    fn model_priority() {
        let cfg = gemini();
        let n = Normalizer::new(&cfg, MessagePolicy::permissive());
        let opts = CallOptions::new().with_model("large");

        let from_options = n.normalize("hi".into(), &opts).unwrap();
        assert_eq!(from_options.model(), "gemini-1.5-pro");

        let conv = Conversation::new(vec![ChatMessage::user("hi")]).with_model("small");
        let pinned = n.normalize(conv.into(), &opts).unwrap();
        assert_eq!(pinned.model(), "gemini-1.5-flash-8b");
    }

    #[test]
    fn caller_values_win_over_defaults() {
        let cfg = gemini();
        let opts = CallOptions::new()
            .with_max_tokens(100)
            .with_temperature(0.1)
            .with_top_k(40)
            .with_param("presence_penalty", 0.5)
            .json_object();
        let req = Normalizer::new(&cfg, MessagePolicy::permissive())
            .normalize("hi".into(), &opts)
            .unwrap();
        assert_eq!(req.max_tokens(), 100);
        assert_eq!(req.sampling().temperature(), Some(0.1));
        assert_eq!(req.sampling().top_k(), Some(40));
        assert_eq!(req.sampling().get("presence_penalty"), Some(0.5));
        assert!(req.wants_json());
    }

    #[test]
    fn empty_conversation_rejected() {
        let cfg = gemini();
        let err = Normalizer::new(&cfg, MessagePolicy::strict())
            .normalize(Vec::<ChatMessage>::new().into(), &CallOptions::new())
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));
    }

    #[test]
    fn invalid_options_rejected_before_normalizing() {
        let cfg = gemini();
        let err = Normalizer::new(&cfg, MessagePolicy::strict())
            .normalize("hi".into(), &CallOptions::new().with_max_tokens(0))
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidParameter(_)));
    }

    fn arb_message() -> impl Strategy<Value = ChatMessage> {
        (
            prop_oneof![
                Just(MessageRole::System),
                Just(MessageRole::User),
                Just(MessageRole::Assistant)
            ],
            prop_oneof![Just(DEFAULT_SYSTEM_GREETING.to_string()), "[a-z ]{0,12}"],
        )
            .prop_map(|(role, content)| ChatMessage::new(role, content))
    }

    proptest! {
        #[test]
        fn strict_policy_always_alternates_from_user(
            messages in prop::collection::vec(arb_message(), 1..12)
        ) {
            let cfg = gemini();
            let req = Normalizer::new(&cfg, MessagePolicy::strict())
                .normalize(messages.into(), &CallOptions::new())
                .unwrap();
            prop_assert!(!req.messages().is_empty());
            for (i, m) in req.messages().iter().enumerate() {
                let expected = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
                prop_assert_eq!(m.role, expected);
            }
        }
    }
}
