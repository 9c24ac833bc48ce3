//! Language-model gateway for the taskmate platform.
//!
//! The assistant treats the language model as an untrusted, fallible
//! network service behind a single trait: hand it the new message, the
//! prior turns, and the tool schemas, get back generated text plus any
//! requested tool calls. The concrete backend speaks the Cohere chat
//! API; tests substitute their own implementation.

pub mod cohere;
pub mod error;
pub mod gateway;

pub use cohere::{CohereChatGateway, CohereConfig};
pub use error::GatewayError;
pub use gateway::{ChatGateway, ChatRequest, GatewayReply, GatewayTurn, RequestedToolCall, TurnRole};
