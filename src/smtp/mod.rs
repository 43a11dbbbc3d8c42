mod message;
mod transmitter;

pub(crate) use message::*;
pub use transmitter::*;
