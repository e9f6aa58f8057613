//! # echo-relay
//!
//! Minimal WebSocket echo relay.
//!
//! Every inbound text or binary message is answered, on the same
//! connection, with a text frame of the form `"echo: " + text`. Connections
//! are independent: each runs on its own task, replies leave in arrival
//! order, and a failing connection never affects another.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── Listener (server)          bind, accept, upgrade
//!     │      └── /health (api/)
//!     │
//!     ├── Connection Handler (ws/)   one task per connection
//!     │      └── echo framing
//!     │
//!     └── ConnectionRegistry +       lifecycle only
//!         ShutdownSignal (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod ws;
