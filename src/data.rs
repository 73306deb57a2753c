use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

/// Single OHLC(V) bar at a fixed position in a time-ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub timestamp: Option<DateTime<Tz>>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::High => self.high,
            PriceField::Low => self.low,
        }
    }
}

/// How a bar's range relates to the range of the bar before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarRelation {
    Up,
    Down,
    Inside,
    Outside,
}

impl fmt::Display for BarRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BarRelation::Up => "Up",
            BarRelation::Down => "Down",
            BarRelation::Inside => "Inside",
            BarRelation::Outside => "Outside",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    High,
    Low,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PriceField::High => "high",
            PriceField::Low => "low",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Maximum,
    Minimum,
}

impl Extremum {
    /// Returns whichever of `a` and `b` lies further in this direction,
    /// keeping `a` when they compare equal or are unordered.
    pub fn pick(self, a: f64, b: f64) -> f64 {
        match self {
            Extremum::Maximum if b > a => b,
            Extremum::Minimum if b < a => b,
            _ => a,
        }
    }
}

impl fmt::Display for Extremum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Extremum::Maximum => "max",
            Extremum::Minimum => "min",
        })
    }
}

/// Bar price field confirmed as the unique extreme of its window.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingPoint {
    pub source_index: usize,
    pub timestamp: Option<DateTime<Tz>>,
    pub field: PriceField,
    pub extremum: Extremum,
    pub value: f64,
    pub relation: BarRelation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegDirection {
    Up,
    Down,
}

/// Directed move between two consecutive swing points of opposite fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingLeg {
    pub from: SwingPoint,
    pub to: SwingPoint,
    pub direction: LegDirection,
    pub change: f64,
    pub bars: usize,
}
