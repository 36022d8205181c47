//! Gateway wire protocol
//!
//! Envelope format, operation codes, and handshake payloads.

mod envelope;
mod opcodes;
mod payloads;

pub use envelope::Envelope;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
