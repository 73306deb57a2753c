use std::num::NonZeroUsize;

use tracing::debug;

use crate::analysis::error::SwingError;
use crate::data::Extremum;

/// Half-width of the symmetric window, in bars. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Radius(NonZeroUsize);

impl Radius {
    pub fn new(bars: usize) -> Result<Self, SwingError> {
        NonZeroUsize::new(bars)
            .map(Self)
            .ok_or(SwingError::InvalidRadius(bars))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Test whether `series[index]` is the unique maximum or minimum of the window
/// `series[index - radius..=index + radius]`.
///
/// Indices too close to either end to hold a full window return `false`, as do
/// values that tie with another member of the window. Comparison is exact.
pub fn is_local_extreme(series: &[f64], index: usize, radius: Radius, extremum: Extremum) -> bool {
    let r = radius.get();
    if index < r || index + r >= series.len() {
        debug!(
            index,
            radius = r,
            len = series.len(),
            "not enough bars around index for a full window"
        );
        return false;
    }

    let window = &series[index - r..=index + r];
    let candidate = series[index];
    let extreme = window
        .iter()
        .copied()
        .fold(candidate, |best, value| extremum.pick(best, value));
    if candidate != extreme {
        return false;
    }

    let matches = window.iter().filter(|&&value| value == extreme).count();
    if matches > 1 {
        debug!(
            index,
            radius = r,
            value = extreme,
            matches,
            %extremum,
            "window extreme is shared, rejecting"
        );
    }
    matches == 1
}
