//! The uniform filter specification shared by every read endpoint.
//!
//! One `IncidentFilter` is built from the query string at the transport
//! boundary and converted to a single `Condition`, so KPIs, charts,
//! trends, body-map and listing always agree on which records are in
//! scope for the same filter state.

use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{ColumnTrait, Condition};
use serde::Deserialize;

use crate::entity::incident;

/// Optional predicates, AND-composed. An absent or empty value means the
/// predicate is not applied at all (open filter, not "match empty").
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IncidentFilter {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub work_center: Option<String>,
    pub position: Option<String>,
    pub incident_type: Option<String>,
    pub classifier: Option<String>,
    pub body_part: Option<String>,
    pub final_status: Option<String>,
}

/// Date bounds arrive as strings; anything that is not `YYYY-MM-DD` is
/// ignored rather than rejected — filters are best-effort conveniences.
fn parse_bound(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

impl IncidentFilter {
    pub fn date_from(&self) -> Option<NaiveDate> {
        parse_bound(self.date_from.as_deref())
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        parse_bound(self.date_to.as_deref())
    }

    /// The AND-composition of every supplied predicate.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(d) = self.date_from() {
            cond = cond.add(incident::Column::Date.gte(d));
        }
        if let Some(d) = self.date_to() {
            cond = cond.add(incident::Column::Date.lte(d));
        }

        let equals = [
            (incident::Column::WorkCenter, self.work_center.as_deref()),
            (incident::Column::Position, self.position.as_deref()),
            (incident::Column::IncidentType, self.incident_type.as_deref()),
            (incident::Column::Classifier, self.classifier.as_deref()),
            (incident::Column::BodyPart, self.body_part.as_deref()),
            (incident::Column::FinalStatus, self.final_status.as_deref()),
        ];
        for (column, value) in equals {
            if let Some(v) = non_empty(value) {
                cond = cond.add(column.eq(v));
            }
        }

        cond
    }
}

/// Case-insensitive substring match over name, rut and observation.
/// Used by the listing endpoint only.
pub fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.to_lowercase());
    let columns = [
        incident::Column::Name,
        incident::Column::Rut,
        incident::Column::Observation,
    ];

    let mut cond = Condition::any();
    for column in columns {
        cond = cond.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone()));
    }
    cond
}

/// Sort-field allow-list for the listing endpoint. Anything else falls
/// back to the default order (id descending).
pub fn sort_column(name: &str) -> Option<incident::Column> {
    let column = match name {
        "id" => incident::Column::Id,
        "number" => incident::Column::Number,
        "name" => incident::Column::Name,
        "date" => incident::Column::Date,
        "age" => incident::Column::Age,
        "lost_days" => incident::Column::LostDays,
        "total_cost" => incident::Column::TotalCost,
        "work_center" => incident::Column::WorkCenter,
        "incident_type" => incident::Column::IncidentType,
        "classifier" => incident::Column::Classifier,
        "body_part" => incident::Column::BodyPart,
        "final_status" => incident::Column::FinalStatus,
        _ => return None,
    };
    Some(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_bounds_parse() {
        let filter = IncidentFilter {
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-03-31".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.date_from(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filter.date_to(), NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn malformed_bounds_are_ignored_not_errors() {
        let filter = IncidentFilter {
            date_from: Some("01/03/2024".to_string()),
            date_to: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.date_from(), None);
        assert_eq!(filter.date_to(), None);
    }

    #[test]
    fn unknown_sort_fields_are_rejected() {
        assert!(sort_column("name").is_some());
        assert!(sort_column("total_cost").is_some());
        assert!(sort_column("observation").is_none());
        assert!(sort_column("; DROP TABLE incidents").is_none());
    }
}
