//! Adapters layer: Concrete implementations of ports.
//!
//! - `memory`: volatile per-session store
//! - `random`: random-number stand-in for the fracture model
//! - `mailer`: simulated email transport
//! - `sanitize`: redaction of contact details in logs

pub mod mailer;
pub mod memory;
pub mod random;
pub mod sanitize;

pub use mailer::SimulatedTransport;
pub use memory::MemorySessionStore;
pub use random::RandomScorer;
