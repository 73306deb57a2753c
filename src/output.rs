use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::data::{BarRelation, Extremum, LegDirection, PriceField, SwingLeg, SwingPoint};

#[derive(Tabled)]
struct SwingRow {
    #[tabled(rename = "Bar")]
    index: usize,
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Relation")]
    relation: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Price")]
    value: String,
}

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "From")]
    from: usize,
    #[tabled(rename = "To")]
    to: usize,
    #[tabled(rename = "Dir")]
    direction: &'static str,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Bars")]
    bars: usize,
}

/// One exported swing point per CSV row.
#[derive(Debug, Serialize)]
struct SwingRecord {
    index: usize,
    timestamp: String,
    relation: BarRelation,
    field: PriceField,
    extremum: Extremum,
    value: f64,
}

fn format_timestamp(timestamp: Option<DateTime<Tz>>) -> String {
    timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn window_label(radius: usize) -> String {
    match radius.checked_mul(2).and_then(|w| w.checked_add(1)) {
        Some(width) => format!("{width} bars"),
        None => "wider than any series".to_string(),
    }
}

pub fn print_report(swings: &[SwingPoint], legs: &[SwingLeg], bar_count: usize, radius: usize) {
    println!("\n=== Swing Chart ===\n");
    println!(
        "Bars: {bar_count} | Radius: {radius} | Window: {}",
        window_label(radius)
    );

    if swings.is_empty() {
        println!("No swing points confirmed.");
        return;
    }

    let highs = swings
        .iter()
        .filter(|s| s.field == PriceField::High)
        .count();
    println!(
        "Swing points: {} ({} highs, {} lows)",
        swings.len(),
        highs,
        swings.len() - highs
    );

    let rows: Vec<SwingRow> = swings
        .iter()
        .map(|swing| SwingRow {
            index: swing.source_index,
            timestamp: format_timestamp(swing.timestamp),
            relation: swing.relation.to_string(),
            field: format!("{} ({})", swing.field, swing.extremum),
            value: format!("{:.2}", swing.value),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");

    if legs.is_empty() {
        return;
    }
    let rows: Vec<LegRow> = legs
        .iter()
        .map(|leg| LegRow {
            from: leg.from.source_index,
            to: leg.to.source_index,
            direction: match leg.direction {
                LegDirection::Up => "Up",
                LegDirection::Down => "Down",
            },
            change: format!("{:+.2}", leg.change),
            bars: leg.bars,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}\n");
}

pub fn write_swings_csv<P: AsRef<Path>>(path: P, swings: &[SwingPoint]) -> Result<()> {
    let path_ref = path.as_ref();
    let mut writer = csv::Writer::from_path(path_ref)
        .with_context(|| format!("failed to create {:?}", path_ref))?;
    for swing in swings {
        writer.serialize(SwingRecord {
            index: swing.source_index,
            timestamp: swing
                .timestamp
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default(),
            relation: swing.relation,
            field: swing.field,
            extremum: swing.extremum,
            value: swing.value,
        })?;
    }
    writer.flush()?;
    Ok(())
}
