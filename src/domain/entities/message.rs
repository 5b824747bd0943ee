use super::Invocation;

/// Result of parsing raw message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    /// Text without the command marker, carried verbatim
    NotACommand(String),
    Command(Invocation),
}

impl ParsedMessage {
    pub fn is_command(&self) -> bool {
        matches!(self, ParsedMessage::Command(_))
    }
}

/// A message extracted from a webhook payload.
///
/// `text` is `None` for messages that are not text-typed (media, location,
/// reactions); those are not processable by the command pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender_id: String,
    pub text: Option<String>,
    pub message_id: Option<String>,
}

impl InboundEvent {
    pub fn text(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: Some(text.into()),
            message_id: None,
        }
    }

    pub fn is_processable(&self) -> bool {
        self.text.is_some()
    }
}
