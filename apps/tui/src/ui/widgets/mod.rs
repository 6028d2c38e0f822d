pub mod confetti;
pub mod popup;
pub mod wheel;
