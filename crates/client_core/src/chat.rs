use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    view::{ChatEntry, ChatRole, ChatView},
    DocuflowApi,
};

pub const CHAT_FAILURE_REPLY: &str = "Sorry, I couldn't reach the assistant. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Other,
}

pub struct ChatWidget<V: ChatView> {
    api: Arc<dyn DocuflowApi>,
    view: V,
    transcript: Vec<ChatEntry>,
}

impl<V: ChatView> ChatWidget<V> {
    pub fn new(api: Arc<dyn DocuflowApi>, view: V) -> Self {
        Self {
            api,
            view,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Sends the input on Enter when it has content. Returns whether a message
    /// was sent. Failures are not surfaced; they become a fixed reply.
    pub async fn on_key(&mut self, key: KeyPress, input: &mut String) -> bool {
        if key != KeyPress::Enter {
            return false;
        }
        let message = input.trim().to_string();
        if message.is_empty() {
            return false;
        }

        self.push(ChatRole::User, message.clone());
        input.clear();

        let reply = match self.api.chat(&message).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "chat request failed");
                CHAT_FAILURE_REPLY.to_string()
            }
        };
        self.push(ChatRole::Assistant, reply);
        debug!(entries = self.transcript.len(), "chat transcript updated");
        true
    }

    fn push(&mut self, role: ChatRole, text: String) {
        let entry = ChatEntry { role, text };
        self.view.append(&entry);
        self.transcript.push(entry);
    }
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
