//! Provider-specific message-shape rules.

use crate::types::{ChatMessage, MessageRole};

/// System prompt that strict providers drop when it leads the conversation.
pub const DEFAULT_SYSTEM_GREETING: &str = "You are a helpful assistant.";

/// Content of the user turn inserted ahead of a system-first conversation.
pub const SYNTHETIC_USER_PROMPT: &str = "Hello";

/// Which rewrites an adapter needs before its provider accepts a conversation.
///
/// Rules run in field order. `force_alternation` relabels purely by position
/// (even index `user`, odd index `assistant`), so a conversation that really
/// starts with an `assistant` turn gets its roles flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessagePolicy {
    pub drop_default_greeting: bool,
    pub ensure_user_first: bool,
    pub force_alternation: bool,
}

impl MessagePolicy {
    /// Leave the conversation as the caller sent it.
    pub const fn permissive() -> Self {
        Self {
            drop_default_greeting: false,
            ensure_user_first: false,
            force_alternation: false,
        }
    }

    /// Strict `user, assistant, user, ...` alternation.
    pub const fn strict() -> Self {
        Self {
            drop_default_greeting: true,
            ensure_user_first: true,
            force_alternation: true,
        }
    }

    pub fn apply(&self, mut messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        if self.drop_default_greeting && leads_with_sole_greeting(&messages) {
            messages.remove(0);
        }

        if self.ensure_user_first
            && messages
                .first()
                .is_some_and(|m| m.role == MessageRole::System)
        {
            messages.insert(0, ChatMessage::user(SYNTHETIC_USER_PROMPT));
        }

        if self.force_alternation {
            for (index, message) in messages.iter_mut().enumerate() {
                message.role = if index % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
            }
        }

        messages
    }
}

fn leads_with_sole_greeting(messages: &[ChatMessage]) -> bool {
    match messages {
        [first, second, ..] => {
            first.role == MessageRole::System
                && first.content.trim() == DEFAULT_SYSTEM_GREETING
                && second.role != MessageRole::System
        }
        _ => false,
    }
}
