// App module for spin-wheel
// Handles application state and spin driving

pub mod confetti;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{build_session, App};
