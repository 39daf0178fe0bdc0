//! These models represent the conversation objects passed between the router,
//! the dispatcher and the streaming transport.
//!
//! There are several related wire formats we need to interact with:
//! - the chat interface's messages with optional file attachments
//! - openai-style chat completion messages (plain string content)
//! - openai-style multimodal messages (typed content part arrays)
//!
//! These overlap but don't match exactly, so incoming data is converted to the
//! internal structs immediately and only rendered into a provider wire format
//! at dispatch time.
pub mod attachment;
pub mod message;
pub mod role;
