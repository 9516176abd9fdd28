//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the things this demo only simulates
//! (session storage, the detection model, email delivery).

mod scorer;
mod session;
mod transport;

pub use scorer::Scorer;
pub use session::{SessionError, SessionId, SessionStore};
pub use transport::{Ack, Attachment, SendError, Transport};
