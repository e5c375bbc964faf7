//! Per-body-part frequency breakdown with drill-down incident briefs.

use crate::api::dto::{BodyMapResponse, BodyPartDetail, IncidentBrief};
use crate::entity::incident::Model;

use super::{count_by, round1};

pub fn compute(rows: &[Model]) -> BodyMapResponse {
    // Percentage base: rows that name a body part at all.
    let with_part = rows.iter().filter(|r| r.body_part.is_some()).count() as u64;

    let mut counts = count_by(rows, |r| r.body_part.as_deref());
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let parts = counts
        .into_iter()
        .map(|(name, count)| {
            let percentage = if with_part > 0 {
                round1(count as f64 / with_part as f64 * 100.0)
            } else {
                0.0
            };
            let incidents = rows
                .iter()
                .filter(|r| r.body_part.as_deref() == Some(name.as_str()))
                .map(|r| IncidentBrief {
                    id: r.id,
                    name: r.name.clone(),
                    date: r.date,
                    incident_type: r.incident_type.clone(),
                    classifier: r.classifier.clone(),
                })
                .collect();

            BodyPartDetail {
                name,
                count,
                percentage,
                incidents,
            }
        })
        .collect();

    BodyMapResponse { parts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::blank;

    fn with_part(id: i32, part: &str) -> Model {
        Model {
            body_part: Some(part.to_string()),
            ..blank(id)
        }
    }

    #[test]
    fn percentage_uses_rows_with_a_body_part_as_base() {
        let mut rows: Vec<Model> = (1..=3).map(|i| with_part(i, "Mano")).collect();
        rows.extend((4..=10).map(|i| with_part(i, "Otro")));
        // Rows without a body part do not dilute the percentages.
        rows.push(blank(11));

        let map = compute(&rows);
        assert_eq!(map.parts[0].name, "Otro");
        assert_eq!(map.parts[0].count, 7);
        assert_eq!(map.parts[0].percentage, 70.0);
        assert_eq!(map.parts[1].name, "Mano");
        assert_eq!(map.parts[1].percentage, 30.0);
    }

    #[test]
    fn briefs_carry_the_matching_incidents() {
        let rows = vec![
            Model {
                name: Some("Ana".to_string()),
                classifier: Some("Corte".to_string()),
                ..with_part(1, "Mano")
            },
            with_part(2, "Pie"),
            Model {
                name: Some("Luis".to_string()),
                ..with_part(3, "Mano")
            },
        ];

        let map = compute(&rows);
        let mano = map.parts.iter().find(|p| p.name == "Mano").unwrap();
        assert_eq!(mano.incidents.len(), 2);
        assert_eq!(mano.incidents[0].name.as_deref(), Some("Ana"));
        assert_eq!(mano.incidents[0].classifier.as_deref(), Some("Corte"));
        assert_eq!(mano.incidents[1].name.as_deref(), Some("Luis"));
    }

    #[test]
    fn empty_input_has_no_parts() {
        let map = compute(&[blank(1)]);
        assert!(map.parts.is_empty());
    }
}
