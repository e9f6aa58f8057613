//! Domain layer: connection identity, the active-connection registry and
//! the shutdown signal.
//!
//! None of these types touch message content. They describe the lifecycle
//! of connections, which is the only state the relay keeps.

pub mod connection_entry;
pub mod connection_id;
pub mod connection_registry;
pub mod shutdown;

pub use connection_entry::ConnectionEntry;
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use shutdown::{ShutdownListener, ShutdownSignal};
