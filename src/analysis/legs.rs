use crate::data::{LegDirection, PriceField, SwingLeg, SwingPoint};

/// Join consecutive swing points that alternate between highs and lows.
///
/// Two highs (or two lows) in a row do not form a leg. `bars` is the distance
/// between the two source bars whatever order the points come in.
pub fn build_legs(swings: &[SwingPoint]) -> Vec<SwingLeg> {
    swings
        .windows(2)
        .filter_map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let direction = match (from.field, to.field) {
                (PriceField::Low, PriceField::High) => LegDirection::Up,
                (PriceField::High, PriceField::Low) => LegDirection::Down,
                _ => return None,
            };
            Some(SwingLeg {
                from: from.clone(),
                to: to.clone(),
                direction,
                change: to.value - from.value,
                bars: to.source_index.abs_diff(from.source_index),
            })
        })
        .collect()
}
