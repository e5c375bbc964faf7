//! Categorical and monthly breakdowns for the dashboard charts.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::api::dto::{ChartDataItem, ChartsResponse, MonthlyDataItem};
use crate::entity::incident::Model;

use super::{ACCIDENT_TYPE, INCIDENT_TYPE, count_by, round2};

/// Fixed month name table; chart labels fall back to the numeral if a
/// month number ever lands outside 1–12.
const MONTH_ABBR: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

pub fn month_name(month: u32) -> String {
    match MONTH_ABBR.get(month.wrapping_sub(1) as usize) {
        Some(name) => (*name).to_string(),
        None => month.to_string(),
    }
}

pub fn compute(rows: &[Model]) -> ChartsResponse {
    ChartsResponse {
        by_type: breakdown(rows, |r| r.incident_type.as_deref()),
        by_classifier: breakdown(rows, |r| r.classifier.as_deref()),
        by_work_center: breakdown(rows, |r| r.work_center.as_deref()),
        by_position: breakdown(rows, |r| r.position.as_deref()),
        by_month: monthly_series(rows),
        by_sex: breakdown(rows, |r| r.sex.as_deref()),
        by_attention: breakdown(rows, |r| r.attention_type.as_deref()),
        cost_by_classifier: cost_breakdown(rows, |r| r.classifier.as_deref()),
    }
}

/// Count per distinct non-null value, descending by count. The sort is
/// stable, so equal counts keep first-encountered order.
fn breakdown<'a, F>(rows: &'a [Model], key: F) -> Vec<ChartDataItem>
where
    F: Fn(&'a Model) -> Option<&'a str>,
{
    let mut counts = count_by(rows, key);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(name, count)| ChartDataItem {
            name,
            count: Some(count),
            total_cost: None,
        })
        .collect()
}

/// Cost sum (and count) per distinct non-null value, descending by cost.
fn cost_breakdown<'a, F>(rows: &'a [Model], key: F) -> Vec<ChartDataItem>
where
    F: Fn(&'a Model) -> Option<&'a str>,
{
    let mut entries: Vec<(String, u64, f64)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for row in rows {
        let Some(value) = key(row) else { continue };
        match index.get(value) {
            Some(&i) => {
                entries[i].1 += 1;
                entries[i].2 += row.total_cost;
            }
            None => {
                index.insert(value, entries.len());
                entries.push((value.to_string(), 1, row.total_cost));
            }
        }
    }

    entries.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    entries
        .into_iter()
        .map(|(name, count, cost)| ChartDataItem {
            name,
            count: Some(count),
            total_cost: Some(round2(cost)),
        })
        .collect()
}

#[derive(Default)]
struct MonthAgg {
    total: u64,
    incidents: u64,
    accidents: u64,
    cost: f64,
}

/// Time series keyed by (year, month), ascending. Only rows with both a
/// date and a year participate; the year column is kept redundant in the
/// schema exactly so grouping survives partially parsed dates.
fn monthly_series(rows: &[Model]) -> Vec<MonthlyDataItem> {
    let mut buckets: BTreeMap<(i32, u32), MonthAgg> = BTreeMap::new();

    for row in rows {
        let (Some(date), Some(year)) = (row.date, row.year) else {
            continue;
        };
        let agg = buckets.entry((year, date.month())).or_default();
        agg.total += 1;
        agg.cost += row.total_cost;
        match row.incident_type.as_deref() {
            Some(INCIDENT_TYPE) => agg.incidents += 1,
            Some(ACCIDENT_TYPE) => agg.accidents += 1,
            _ => {}
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), agg)| MonthlyDataItem {
            month: month_name(month),
            year,
            total: agg.total,
            incidents: agg.incidents,
            accidents: agg.accidents,
            cost: round2(agg.cost),
        })
        .collect()
}
