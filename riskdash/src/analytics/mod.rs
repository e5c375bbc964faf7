//! The aggregation core: pure, stateless computations over the filtered
//! snapshot of incident records. Handlers fetch the snapshot once (in id
//! order, i.e. insertion order) and delegate here, so every number on the
//! dashboard is derived from the same record set.

pub mod body_map;
pub mod calendar;
pub mod charts;
pub mod kpi;
pub mod trends;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::entity::incident::Model;

/// Well-known classification values carried verbatim from the business
/// spreadsheets.
pub const INCIDENT_TYPE: &str = "INCIDENTE";
pub const ACCIDENT_TYPE: &str = "ACCIDENTE";
/// `final_status` value that marks a case as still open.
pub const ACTIVE_STATUS: &str = "EN PROCESO";

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Count and cost sum of rows whose date is in `[from, to)`, or simply
/// `>= from` when the window is open-ended.
pub(crate) fn month_slice(rows: &[Model], from: NaiveDate, to: Option<NaiveDate>) -> (u64, f64) {
    let mut count = 0u64;
    let mut cost = 0.0f64;
    for row in rows {
        let Some(date) = row.date else { continue };
        if date >= from && to.is_none_or(|t| date < t) {
            count += 1;
            cost += row.total_cost;
        }
    }
    (count, cost)
}

/// Distinct non-null values of `key` with their counts, in
/// first-encountered order. Callers sort as they see fit; a stable sort
/// on the result keeps encounter order among equal counts.
pub(crate) fn count_by<'a, F>(rows: &'a [Model], key: F) -> Vec<(String, u64)>
where
    F: Fn(&'a Model) -> Option<&'a str>,
{
    let mut entries: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for row in rows {
        let Some(value) = key(row) else { continue };
        match index.get(value) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(value, entries.len());
                entries.push((value.to_string(), 1));
            }
        }
    }
    entries
}

/// The single most frequent non-null value of `key`: one pass over the
/// tallies in encounter order, keeping the running maximum, so a tie is
/// won by whichever value was encountered first.
pub(crate) fn most_frequent<'a, F>(rows: &'a [Model], key: F) -> Option<(String, u64)>
where
    F: Fn(&'a Model) -> Option<&'a str>,
{
    let mut best: Option<(String, u64)> = None;
    for (value, count) in count_by(rows, key) {
        match &best {
            Some((_, max)) if count <= *max => {}
            _ => best = Some((value, count)),
        }
    }
    best
}


#[cfg(test)]
mod tests {
    use super::fixtures::blank;
    use super::*;

    fn with_part(id: i32, part: &str) -> Model {
        Model {
            body_part: Some(part.to_string()),
            ..blank(id)
        }
    }

    #[test]
    fn count_by_keeps_encounter_order() {
        let rows = vec![
            with_part(1, "Mano"),
            with_part(2, "Pie"),
            with_part(3, "Mano"),
            blank(4),
        ];
        let counts = count_by(&rows, |r| r.body_part.as_deref());
        assert_eq!(
            counts,
            vec![("Mano".to_string(), 2), ("Pie".to_string(), 1)]
        );
    }

    #[test]
    fn most_frequent_breaks_ties_by_first_encountered() {
        let rows = vec![
            with_part(1, "Pie"),
            with_part(2, "Mano"),
            with_part(3, "Mano"),
            with_part(4, "Pie"),
        ];
        assert_eq!(
            most_frequent(&rows, |r| r.body_part.as_deref()),
            Some(("Pie".to_string(), 2))
        );
    }

    #[test]
    fn most_frequent_of_nothing_is_none() {
        let rows = vec![blank(1), blank(2)];
        assert_eq!(most_frequent(&rows, |r| r.body_part.as_deref()), None);
    }

    #[test]
    fn month_slice_is_half_open() {
        let date = |d| chrono::NaiveDate::from_ymd_opt(2024, 3, d);
        let rows = vec![
            Model { date: date(1), total_cost: 10.0, ..blank(1) },
            Model { date: date(31), total_cost: 20.0, ..blank(2) },
            Model {
                date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
                total_cost: 40.0,
                ..blank(3)
            },
            blank(4), // no date, never counted
        ];

        let from = date(1).unwrap();
        let to = chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(month_slice(&rows, from, Some(to)), (2, 30.0));
        // Open-ended window picks up everything from `from` onward.
        assert_eq!(month_slice(&rows, from, None), (3, 70.0));
    }
}
