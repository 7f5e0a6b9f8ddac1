use std::fmt::Display;

use engai_types::{Attachment, FAILURE_MESSAGE, GREETING, Message, ModelTier};
use tracing::{debug, warn};

use crate::transport::ChatTransport;

/// A user turn ready to be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundTurn {
    pub message: String,
    pub model: ModelTier,
    pub attachment: Option<Attachment>,
}

/// Transcript and input state of one chat session.
///
/// At most one turn is in flight: while [`is_awaiting_response`] is true,
/// new submissions are no-ops.
///
/// [`is_awaiting_response`]: ConversationStore::is_awaiting_response
#[derive(Debug, Default)]
pub struct ConversationStore {
    transcript: Vec<Message>,
    input: String,
    pending: Option<Attachment>,
    model_tier: ModelTier,
    awaiting_response: bool,
}

impl ConversationStore {
    /// Empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session opened with the assistant greeting.
    pub fn with_greeting() -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    /// Replace the pending attachment, returning the one it displaced.
    pub fn select_attachment(&mut self, attachment: Attachment) -> Option<Attachment> {
        self.pending.replace(attachment)
    }

    pub fn clear_attachment(&mut self) -> Option<Attachment> {
        self.pending.take()
    }

    pub fn model_tier(&self) -> ModelTier {
        self.model_tier
    }

    pub fn set_model_tier(&mut self, tier: ModelTier) {
        self.model_tier = tier;
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Record a user turn and hand back what must be sent for it.
    ///
    /// Returns `None` without touching any state when `text` is blank and
    /// there is no attachment, or while another turn is awaiting its reply.
    /// Otherwise the input field and pending attachment are cleared,
    /// whatever happens to the request afterwards.
    pub fn append_user_turn(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Option<OutboundTurn> {
        if self.awaiting_response {
            debug!("turn already in flight; ignoring submission");
            return None;
        }
        if text.trim().is_empty() && attachment.is_none() {
            return None;
        }

        self.transcript.push(Message::user(
            text,
            attachment.as_ref().map(|a| a.original_name.clone()),
        ));
        self.input.clear();
        self.pending = None;
        self.awaiting_response = true;

        Some(OutboundTurn {
            message: text.to_owned(),
            model: self.model_tier,
            attachment,
        })
    }

    /// [`append_user_turn`](Self::append_user_turn) with the current input
    /// field and pending attachment.
    pub fn submit(&mut self) -> Option<OutboundTurn> {
        let text = std::mem::take(&mut self.input);
        let attachment = self.pending.take();
        let turn = self.append_user_turn(&text, attachment.clone());
        if turn.is_none() {
            // No-op: leave the field and attachment as the user left them.
            self.input = text;
            self.pending = attachment;
        }
        turn
    }

    /// Close the in-flight turn with the reply, or the fixed failure text.
    ///
    /// Returns `false` (and records nothing) when no turn is in flight.
    pub fn complete_turn<E: Display>(&mut self, result: Result<String, E>) -> bool {
        if !self.awaiting_response {
            warn!("reply arrived with no turn in flight; dropping it");
            return false;
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "chat request failed");
                FAILURE_MESSAGE.to_owned()
            }
        };
        self.transcript.push(Message::assistant(text));
        self.awaiting_response = false;
        true
    }

    /// Submit the current input and wait for the reply.
    ///
    /// Returns `false` when the submission was a no-op.
    pub async fn send<T>(&mut self, transport: &T) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let Some(turn) = self.submit() else {
            return false;
        };
        let result = transport.send(turn).await;
        self.complete_turn(result)
    }
}
