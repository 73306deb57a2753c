use crate::data::{Bar, BarRelation, Extremum, PriceField};

/// Price fields worth testing for a bar, in the order swing points should be emitted.
///
/// A bearish outside bar (open above close) tops out before it bottoms, so its
/// high is tested first; any other outside bar tests the low first.
pub fn fields_to_test(relation: BarRelation, bar: &Bar) -> Vec<(PriceField, Extremum)> {
    let high = (PriceField::High, Extremum::Maximum);
    let low = (PriceField::Low, Extremum::Minimum);
    match relation {
        BarRelation::Up => vec![high],
        BarRelation::Down => vec![low],
        BarRelation::Inside => Vec::new(),
        BarRelation::Outside if bar.open > bar.close => vec![high, low],
        BarRelation::Outside => vec![low, high],
    }
}
