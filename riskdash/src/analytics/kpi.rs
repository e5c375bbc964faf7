//! Scalar KPIs over the filtered record set.

use chrono::NaiveDate;

use crate::api::dto::KpiResponse;
use crate::entity::incident::Model;

use super::calendar::month_windows;
use super::{ACCIDENT_TYPE, ACTIVE_STATUS, INCIDENT_TYPE, month_slice, round1};

pub fn compute(rows: &[Model], today: NaiveDate) -> KpiResponse {
    let count_type = |wanted: &str| {
        rows.iter()
            .filter(|r| r.incident_type.as_deref() == Some(wanted))
            .count() as u64
    };

    let total_lost_days: i64 = rows.iter().map(|r| i64::from(r.lost_days)).sum();
    let total_cost: f64 = rows.iter().map(|r| r.total_cost).sum();

    let ages: Vec<i64> = rows.iter().filter_map(|r| r.age.map(i64::from)).collect();
    let avg_age = if ages.is_empty() {
        0.0
    } else {
        round1(ages.iter().sum::<i64>() as f64 / ages.len() as f64)
    };

    let active_cases = rows
        .iter()
        .filter(|r| r.final_status.as_deref() == Some(ACTIVE_STATUS))
        .count() as u64;

    let (current_start, prev_start) = month_windows(today);
    let (incidents_this_month, cost_this_month) = month_slice(rows, current_start, None);
    let (incidents_prev_month, cost_prev_month) =
        month_slice(rows, prev_start, Some(current_start));

    KpiResponse {
        total_records: rows.len() as u64,
        total_incidents: count_type(INCIDENT_TYPE),
        total_accidents: count_type(ACCIDENT_TYPE),
        total_lost_days,
        total_cost,
        active_cases,
        avg_age,
        incidents_this_month,
        incidents_prev_month,
        cost_this_month,
        cost_prev_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::blank;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_set_is_all_zeroes() {
        let kpis = compute(&[], d(2024, 3, 15));
        assert_eq!(kpis.total_records, 0);
        assert_eq!(kpis.total_incidents, 0);
        assert_eq!(kpis.avg_age, 0.0);
        assert_eq!(kpis.total_cost, 0.0);
    }

    #[test]
    fn type_counts_and_sums() {
        let rows = vec![
            Model {
                incident_type: Some(INCIDENT_TYPE.to_string()),
                lost_days: 3,
                total_cost: 100.0,
                ..blank(1)
            },
            Model {
                incident_type: Some(ACCIDENT_TYPE.to_string()),
                lost_days: 10,
                total_cost: 250.5,
                ..blank(2)
            },
            Model {
                incident_type: Some("CUASI ACCIDENTE".to_string()),
                ..blank(3)
            },
        ];

        let kpis = compute(&rows, d(2024, 3, 15));
        assert_eq!(kpis.total_records, 3);
        assert_eq!(kpis.total_incidents, 1);
        assert_eq!(kpis.total_accidents, 1);
        assert_eq!(kpis.total_lost_days, 13);
        assert_eq!(kpis.total_cost, 350.5);
    }

    #[test]
    fn avg_age_ignores_missing_ages_and_rounds() {
        let rows = vec![
            Model { age: Some(30), ..blank(1) },
            Model { age: Some(35), ..blank(2) },
            Model { age: Some(36), ..blank(3) },
            blank(4),
        ];
        // (30 + 35 + 36) / 3 = 33.666... → 33.7
        assert_eq!(compute(&rows, d(2024, 3, 15)).avg_age, 33.7);
    }

    #[test]
    fn active_cases_match_final_status() {
        let rows = vec![
            Model {
                final_status: Some(ACTIVE_STATUS.to_string()),
                ..blank(1)
            },
            Model {
                final_status: Some("CERRADO".to_string()),
                ..blank(2)
            },
        ];
        assert_eq!(compute(&rows, d(2024, 3, 15)).active_cases, 1);
    }

    #[test]
    fn month_windows_split_counts_and_costs() {
        let rows = vec![
            Model { date: Some(d(2024, 3, 2)), total_cost: 10.0, ..blank(1) },
            Model { date: Some(d(2024, 3, 20)), total_cost: 15.0, ..blank(2) },
            Model { date: Some(d(2024, 2, 28)), total_cost: 40.0, ..blank(3) },
            Model { date: Some(d(2024, 1, 31)), total_cost: 99.0, ..blank(4) },
            blank(5),
        ];

        let kpis = compute(&rows, d(2024, 3, 15));
        assert_eq!(kpis.incidents_this_month, 2);
        assert_eq!(kpis.cost_this_month, 25.0);
        assert_eq!(kpis.incidents_prev_month, 1);
        assert_eq!(kpis.cost_prev_month, 40.0);
    }

    #[test]
    fn january_previous_month_is_december() {
        let rows = vec![
            Model { date: Some(d(2025, 1, 5)), ..blank(1) },
            Model { date: Some(d(2024, 12, 20)), ..blank(2) },
            Model { date: Some(d(2024, 11, 30)), ..blank(3) },
        ];

        let kpis = compute(&rows, d(2025, 1, 10));
        assert_eq!(kpis.incidents_this_month, 1);
        assert_eq!(kpis.incidents_prev_month, 1);
    }
}
