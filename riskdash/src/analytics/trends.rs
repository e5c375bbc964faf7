//! Month-over-month trend figures and threshold-derived alerts.

use chrono::NaiveDate;

use crate::api::dto::{AlertItem, TrendsResponse};
use crate::entity::incident::Model;

use super::calendar::month_windows;
use super::{ACTIVE_STATUS, month_slice, most_frequent, round1};

/// Percent change with a defined zero-previous rule: 100.0 signals new
/// activity against an empty previous month, 0.0 signals no activity at
/// all. Avoids a division by zero without inventing a number.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        round1((current - previous) / previous * 100.0)
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

pub fn compute(rows: &[Model], today: NaiveDate) -> TrendsResponse {
    let (current_start, prev_start) = month_windows(today);
    let (current_count, current_cost) = month_slice(rows, current_start, None);
    let (prev_count, prev_cost) = month_slice(rows, prev_start, Some(current_start));

    let month_over_month_change = percent_change(current_count as f64, prev_count as f64);
    let cost_trend = percent_change(current_cost, prev_cost);

    let most_affected = most_frequent(rows, |r| r.body_part.as_deref());
    let most_common_classifier =
        most_frequent(rows, |r| r.classifier.as_deref()).map(|(name, _)| name);

    let active_cases = rows
        .iter()
        .filter(|r| r.final_status.as_deref() == Some(ACTIVE_STATUS))
        .count() as u64;

    // Threshold rules, evaluated independently; order of the list is part
    // of the contract.
    let mut alerts = Vec::new();

    if month_over_month_change > 20.0 {
        alerts.push(AlertItem {
            alert_type: "incident_increase".to_string(),
            message: format!(
                "Incremento significativo de incidentes: {month_over_month_change:.1}% respecto al mes anterior"
            ),
            severity: "warning".to_string(),
        });
    }

    if let Some((part, count)) = &most_affected
        && *count > 3
    {
        alerts.push(AlertItem {
            alert_type: "body_part".to_string(),
            message: format!("Parte del cuerpo más afectada: {part} con {count} registros"),
            severity: "warning".to_string(),
        });
    }

    if prev_cost > 0.0 && current_cost > prev_cost * 1.5 {
        alerts.push(AlertItem {
            alert_type: "cost_increase".to_string(),
            message: format!(
                "Incremento significativo de costos: ${} este mes vs ${} mes anterior",
                format_money(current_cost),
                format_money(prev_cost)
            ),
            severity: "danger".to_string(),
        });
    }

    if active_cases > 5 {
        alerts.push(AlertItem {
            alert_type: "pending_cases".to_string(),
            message: format!("Hay {active_cases} casos en proceso pendientes de resolución"),
            severity: "info".to_string(),
        });
    }

    TrendsResponse {
        month_over_month_change,
        cost_trend,
        most_affected_body_part: most_affected.map(|(name, _)| name),
        most_common_classifier,
        alerts,
    }
}

/// Whole-unit money with thousands separators, e.g. 1234567.8 → "1,234,568".
fn format_money(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
