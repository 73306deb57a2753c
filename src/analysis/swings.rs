use itertools::Itertools;
use tracing::debug;

use crate::analysis::error::SwingError;
use crate::analysis::extreme::{is_local_extreme, Radius};
use crate::analysis::fields::fields_to_test;
use crate::analysis::relation::classify;
use crate::data::{Bar, BarRelation, PriceField, SwingPoint};

/// Detect swing highs and lows by testing each bar's relation-selected fields
/// for a unique extreme within `radius` bars on either side.
///
/// The first bar has no predecessor and is never tested, but still takes part
/// in its neighbours' windows. Any unclassifiable pair aborts the whole run.
pub fn detect_swings(bars: &[Bar], radius: usize) -> Result<Vec<SwingPoint>, SwingError> {
    let radius = Radius::new(radius)?;

    let highs: Vec<f64> = bars.iter().map(|bar| bar.high).collect();
    let lows: Vec<f64> = bars.iter().map(|bar| bar.low).collect();

    let mut swings = Vec::new();
    for (position, (previous, bar)) in bars.iter().tuple_windows().enumerate() {
        let position = position + 1;
        let relation = classify(bar, previous)?;
        if relation == BarRelation::Inside {
            continue;
        }

        for (field, extremum) in fields_to_test(relation, bar) {
            let series = match field {
                PriceField::High => &highs,
                PriceField::Low => &lows,
            };
            if !is_local_extreme(series, position, radius, extremum) {
                continue;
            }
            debug!(index = bar.index, %relation, %field, value = bar.price(field), "swing confirmed");
            swings.push(SwingPoint {
                source_index: bar.index,
                timestamp: bar.timestamp,
                field,
                extremum,
                value: bar.price(field),
                relation,
            });
        }
    }

    Ok(swings)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::Extremum;

    fn bars_from(highs: &[f64], lows: &[f64]) -> Vec<Bar> {
        highs
            .iter()
            .zip(lows)
            .enumerate()
            .map(|(index, (&high, &low))| Bar {
                index,
                timestamp: None,
                open: low,
                high,
                low,
                close: high,
                volume: None,
            })
            .collect()
    }

    #[test]
    fn finds_top_and_bottom_of_a_wave() {
        let bars = bars_from(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0],
            &[0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0, 1.0, 2.0],
        );
        let swings = detect_swings(&bars, 2).unwrap();

        assert_eq!(swings.len(), 2);
        assert_eq!(swings[0].source_index, 4);
        assert_eq!(swings[0].field, PriceField::High);
        assert_eq!(swings[0].extremum, Extremum::Maximum);
        assert_eq!(swings[0].value, 5.0);
        assert_eq!(swings[0].relation, BarRelation::Up);
        assert_eq!(swings[1].source_index, 8);
        assert_eq!(swings[1].field, PriceField::Low);
        assert_eq!(swings[1].value, 0.0);
        assert_eq!(swings[1].relation, BarRelation::Down);
    }

    #[test]
    fn bottom_without_a_full_window_is_not_reported() {
        let bars = bars_from(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 2.0],
            &[0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0, 1.0],
        );
        let swings = detect_swings(&bars, 2).unwrap();

        assert_eq!(swings.len(), 1);
        assert_eq!(swings[0].source_index, 4);
    }

    #[test]
    fn bearish_outside_bar_yields_high_then_low() {
        let mut bars = bars_from(&[2.0, 3.0, 4.0, 3.5], &[1.0, 2.0, 0.0, 0.5]);
        bars[2].open = 3.0;
        bars[2].close = 1.0;

        let swings = detect_swings(&bars, 1).unwrap();

        assert_eq!(swings.len(), 2);
        assert!(swings.iter().all(|s| s.source_index == 2));
        assert!(swings.iter().all(|s| s.relation == BarRelation::Outside));
        assert_eq!(
            (swings[0].field, swings[0].extremum, swings[0].value),
            (PriceField::High, Extremum::Maximum, 4.0)
        );
        assert_eq!(
            (swings[1].field, swings[1].extremum, swings[1].value),
            (PriceField::Low, Extremum::Minimum, 0.0)
        );
    }

    #[test]
    fn bullish_outside_bar_yields_low_then_high() {
        let mut bars = bars_from(&[2.0, 3.0, 4.0, 3.5], &[1.0, 2.0, 0.0, 0.5]);
        bars[2].open = 1.0;
        bars[2].close = 3.0;

        let fields: Vec<PriceField> = detect_swings(&bars, 1)
            .unwrap()
            .into_iter()
            .map(|s| s.field)
            .collect();
        assert_eq!(fields, vec![PriceField::Low, PriceField::High]);
    }

    #[test]
    fn inside_bars_never_swing() {
        // bar 2 sits inside bar 1
        let bars = bars_from(&[10.0, 12.0, 11.0, 13.0, 14.0], &[5.0, 1.0, 2.0, 3.0, 4.0]);
        let swings = detect_swings(&bars, 1).unwrap();
        assert!(swings.iter().all(|s| s.source_index != 2));
        assert!(swings.iter().all(|s| s.relation != BarRelation::Inside));
    }

    #[test]
    fn first_bar_only_feeds_windows() {
        // bar 0 is never tested, yet its high keeps bar 2 from being a top
        let bars = bars_from(&[9.0, 1.0, 5.0, 4.0, 3.0], &[2.0, 0.5, 4.0, 3.0, 2.0]);
        assert!(detect_swings(&bars, 2).unwrap().is_empty());

        let mut lowered = bars.clone();
        lowered[0].high = 2.0;
        lowered[0].close = 2.0;
        let swings = detect_swings(&lowered, 2).unwrap();
        assert_eq!(swings.len(), 1);
        assert_eq!(swings[0].source_index, 2);
    }

    #[test]
    fn zero_radius_fails_before_classification() {
        // the pair is also unclassifiable, but radius is checked first
        let bars = bars_from(&[1.0, 1.0], &[0.0, 0.0]);
        assert_eq!(detect_swings(&bars, 0), Err(SwingError::InvalidRadius(0)));
    }

    #[test]
    fn unclassifiable_pair_aborts_the_run() {
        let bars = bars_from(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 3.0],
            &[0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0],
        );
        match detect_swings(&bars, 1) {
            Err(SwingError::UnclassifiableBarRelation {
                index,
                previous_index,
                ..
            }) => {
                assert_eq!(index, 5);
                assert_eq!(previous_index, 4);
            }
            other => panic!("expected classification error, got {other:?}"),
        }
    }

    #[test]
    fn short_and_empty_series_yield_nothing() {
        assert_eq!(detect_swings(&[], 1), Ok(Vec::new()));
        let bars = bars_from(&[1.0], &[0.0]);
        assert_eq!(detect_swings(&bars, 3), Ok(Vec::new()));
    }

    #[test]
    fn repeated_runs_agree() {
        let bars = bars_from(
            &[1.0, 3.0, 2.0, 4.0, 6.0, 5.0, 7.0, 4.0, 3.0, 5.0, 6.0, 2.0, 3.0],
            &[0.5, 2.0, 1.0, 3.0, 5.0, 4.0, 6.0, 3.0, 2.0, 4.0, 5.0, 1.0, 2.5],
        );
        let first = detect_swings(&bars, 2).unwrap();
        let second = detect_swings(&bars, 2).unwrap();
        assert_eq!(first, second);
        assert!(first
            .windows(2)
            .all(|pair| pair[0].source_index <= pair[1].source_index));
    }

    fn step() -> impl Strategy<Value = i32> {
        prop_oneof![-3i32..=-1, 1i32..=3]
    }

    /// Random walks for highs (around 1000) and lows (around 0) that never
    /// repeat a bound from one bar to the next, so every pair classifies.
    fn walk_strategy() -> impl Strategy<Value = Vec<Bar>> {
        proptest::collection::vec((step(), step(), any::<bool>()), 2..40).prop_map(|steps| {
            let (mut high, mut low) = (1000i32, 0i32);
            steps
                .into_iter()
                .enumerate()
                .map(|(index, (high_step, low_step, bearish))| {
                    high += high_step;
                    low += low_step;
                    let (high, low) = (f64::from(high), f64::from(low));
                    let (open, close) = if bearish { (high, low) } else { (low, high) };
                    Bar {
                        index,
                        timestamp: None,
                        open,
                        high,
                        low,
                        close,
                        volume: None,
                    }
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn swings_only_come_from_nominated_fields(
            bars in walk_strategy(),
            radius in 1usize..5,
        ) {
            let swings = detect_swings(&bars, radius).unwrap();

            for swing in &swings {
                let bar = &bars[swing.source_index];
                prop_assert!(swing.source_index > 0);
                prop_assert_ne!(swing.relation, BarRelation::Inside);
                prop_assert_eq!(
                    classify(bar, &bars[swing.source_index - 1]).unwrap(),
                    swing.relation
                );
                prop_assert!(fields_to_test(swing.relation, bar)
                    .contains(&(swing.field, swing.extremum)));
                prop_assert_eq!(swing.value, bar.price(swing.field));
            }

            for pair in swings.windows(2) {
                prop_assert!(pair[0].source_index <= pair[1].source_index);
                if pair[0].source_index == pair[1].source_index {
                    let bar = &bars[pair[0].source_index];
                    prop_assert_eq!(pair[0].relation, BarRelation::Outside);
                    prop_assert_eq!(
                        fields_to_test(BarRelation::Outside, bar),
                        vec![
                            (pair[0].field, pair[0].extremum),
                            (pair[1].field, pair[1].extremum)
                        ]
                    );
                }
            }
        }
    }
}
