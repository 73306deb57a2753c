use crate::analysis::error::SwingError;
use crate::data::{Bar, BarRelation};

/// Classify `current` by comparing its range with the bar immediately before it.
///
/// Equal highs or lows match none of the four relations and are reported as
/// [`SwingError::UnclassifiableBarRelation`].
pub fn classify(current: &Bar, previous: &Bar) -> Result<BarRelation, SwingError> {
    let higher_high = current.high > previous.high;
    let lower_high = current.high < previous.high;
    let higher_low = current.low > previous.low;
    let lower_low = current.low < previous.low;

    if higher_high && higher_low {
        Ok(BarRelation::Up)
    } else if lower_high && lower_low {
        Ok(BarRelation::Down)
    } else if lower_high && higher_low {
        Ok(BarRelation::Inside)
    } else if higher_high && lower_low {
        Ok(BarRelation::Outside)
    } else {
        Err(SwingError::UnclassifiableBarRelation {
            index: current.index,
            previous_index: previous.index,
            high: current.high,
            low: current.low,
            previous_high: previous.high,
            previous_low: previous.low,
        })
    }
}
