pub mod content;
pub mod envelope;
pub mod performative;

pub use content::{ContentGraph, Triple, vocab};
pub use envelope::{Envelope, EnvelopeProps};
pub use performative::Performative;
