pub mod identity;
pub mod interpreter;

pub use identity::IdentityGateway;
pub use interpreter::{DreamInterpreter, FALLBACK_INTERPRETATION, Interpreter};
