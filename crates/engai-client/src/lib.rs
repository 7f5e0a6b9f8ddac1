//! engai-client – one chat session's state and its link to the server.
//!
//! [`ConversationStore`] owns the transcript, the input field and the
//! pending attachment. It lives exactly as long as the UI session that
//! created it; nothing is persisted. Turns leave the store as
//! [`OutboundTurn`]s and travel through a [`ChatTransport`], normally the
//! multipart [`HttpTransport`].

mod attachment;
mod store;
mod transport;

pub use attachment::{guess_mime, is_accepted, load_attachment};
pub use store::{ConversationStore, OutboundTurn};
pub use transport::{ChatTransport, HttpTransport, TransportError};
