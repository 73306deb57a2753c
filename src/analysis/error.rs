use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwingError {
    #[error(
        "bar {index} cannot be classified against bar {previous_index}: \
         high {high} vs {previous_high}, low {low} vs {previous_low}"
    )]
    UnclassifiableBarRelation {
        index: usize,
        previous_index: usize,
        high: f64,
        low: f64,
        previous_high: f64,
        previous_low: f64,
    },

    #[error("radius must be a positive bar count, got {0}")]
    InvalidRadius(usize),
}
