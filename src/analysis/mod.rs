pub mod error;
pub mod extreme;
pub mod fields;
pub mod legs;
pub mod relation;
pub mod swings;

pub use legs::build_legs;
pub use swings::detect_swings;
