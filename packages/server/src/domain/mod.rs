//! Domain layer: connection identity, transport abstractions and the wire envelope.

pub mod connection;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod transport;
pub mod value_object;

pub use connection::Connection;
pub use envelope::Envelope;
pub use error::{EnvelopeError, TransportError, ValueObjectError};
pub use registry::ConnectionRegistry;
pub use transport::{Inbound, MessageSink, MessageSource};
pub use value_object::{ConnectionId, ConnectionIdFactory};
