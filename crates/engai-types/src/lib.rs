//! Types shared by the engai server and its clients.
//!
//! - [`Message`] / [`Role`]: one immutable transcript entry.
//! - [`Attachment`] / [`AttachmentKind`]: a single file riding along with a turn.
//! - [`ModelTier`]: the two-valued model selector carried in the `model` form field.
//! - [`ChatReply`] / [`ErrorBody`]: JSON bodies of `POST /api/chat`.

mod attachment;
mod message;
mod model;
mod wire;

pub use attachment::{Attachment, AttachmentKind, PDF_MIME};
pub use message::{Message, Role};
pub use model::ModelTier;
pub use wire::{ChatReply, ErrorBody};

/// Greeting the assistant opens every fresh session with.
pub const GREETING: &str = "Welcome, Engineer. I am your specialized AI assistant. \
How can I assist you with your technical problems today?";

/// Assistant text recorded in the transcript when a turn fails for any reason.
pub const FAILURE_MESSAGE: &str =
    "Error: Failed to process your request. Please ensure the server is running.";

/// `error` field of every failed `POST /api/chat` response.
pub const SERVER_FAILURE: &str = "Failed to process request";
