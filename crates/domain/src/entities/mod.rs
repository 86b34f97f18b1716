pub mod instrument;

// Re-export for easier access
pub use instrument::{Instrument, expected_value};
