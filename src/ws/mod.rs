//! WebSocket layer: upgrade handling, the per-connection echo loop, and
//! echo framing.
//!
//! Any request path other than `/health` is treated as a WebSocket
//! upgrade. Each upgraded connection gets its own task; connections share
//! nothing on the message path.

pub mod connection;
pub mod echo;
pub mod handler;
