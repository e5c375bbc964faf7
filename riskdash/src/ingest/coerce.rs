//! Total coercions from raw cells to typed field values.
//!
//! Every function here degrades on malformed input instead of failing:
//! a bad cell yields `None` (or the caller's default for floats), never
//! an error, so a single cell can not abort a row or a batch.

use chrono::{NaiveDate, NaiveDateTime};

/// A typed cell value at the ingest boundary. Decouples the pipeline
/// from the workbook reader so coercion rules are testable in isolation.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// String date formats tried in order: day/month/year first (the dominant
/// format in the source files), then ISO, dashed day-month-year, and
/// month/day/year as a last resort.
const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Native date cells keep their calendar date (time of day truncated);
/// strings go through the fixed format list. Anything else is no value.
pub fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(dt) => Some(dt.date()),
        Cell::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        }
        _ => None,
    }
}

/// Numeric coercion via a float-then-truncate path so "12.0" and "12"
/// both yield 12.
pub fn coerce_int(cell: &Cell) -> Option<i32> {
    coerce_number(cell).map(|f| f.trunc() as i32)
}

/// Same tolerant path as [`coerce_int`], but falls back to `default`
/// so financial fields are always present and summable.
pub fn coerce_float(cell: &Cell, default: f64) -> f64 {
    coerce_number(cell).unwrap_or(default)
}

fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(f) => Some(*f),
        Cell::Int(i) => Some(*i as f64),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Trimmed string content, `None` when nothing remains. Non-text cells
/// are rendered so e.g. a numeric national-id column still ingests.
pub fn coerce_text(cell: &Cell) -> Option<String> {
    let rendered = match cell {
        Cell::Empty => return None,
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Cell::Int(i) => i.to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::Date(dt) => dt.date().to_string(),
    };
    if rendered.is_empty() { None } else { Some(rendered) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_formats_tried_in_order() {
        assert_eq!(coerce_date(&text("15/03/2024")), Some(d(2024, 3, 15)));
        assert_eq!(coerce_date(&text("2024-03-15")), Some(d(2024, 3, 15)));
        assert_eq!(coerce_date(&text("15-03-2024")), Some(d(2024, 3, 15)));
        assert_eq!(coerce_date(&text("03/15/2024")), Some(d(2024, 3, 15)));
    }

    #[test]
    fn native_datetime_truncates_time_of_day() {
        let dt = d(2024, 3, 15).and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(coerce_date(&Cell::Date(dt)), Some(d(2024, 3, 15)));
    }

    #[test]
    fn unparseable_dates_are_no_value_not_errors() {
        assert_eq!(coerce_date(&text("not a date")), None);
        assert_eq!(coerce_date(&text("32/13/2024")), None);
        assert_eq!(coerce_date(&Cell::Empty), None);
        assert_eq!(coerce_date(&Cell::Number(44927.0)), None);
    }

    #[test]
    fn int_accepts_float_shaped_strings() {
        assert_eq!(coerce_int(&text("12")), Some(12));
        assert_eq!(coerce_int(&text("12.0")), Some(12));
        assert_eq!(coerce_int(&text(" 12.9 ")), Some(12));
        assert_eq!(coerce_int(&Cell::Number(34.0)), Some(34));
        assert_eq!(coerce_int(&Cell::Int(7)), Some(7));
    }

    #[test]
    fn int_degrades_to_none() {
        assert_eq!(coerce_int(&text("twelve")), None);
        assert_eq!(coerce_int(&text("")), None);
        assert_eq!(coerce_int(&Cell::Empty), None);
    }

    #[test]
    fn float_falls_back_to_default() {
        assert_eq!(coerce_float(&text("1200.50"), 0.0), 1200.50);
        assert_eq!(coerce_float(&text("garbage"), 0.0), 0.0);
        assert_eq!(coerce_float(&Cell::Empty, 0.0), 0.0);
        assert_eq!(coerce_float(&Cell::Int(3), 0.0), 3.0);
    }

    #[test]
    fn text_trims_and_empties_to_none() {
        assert_eq!(coerce_text(&text("  Ana  ")), Some("Ana".to_string()));
        assert_eq!(coerce_text(&text("   ")), None);
        assert_eq!(coerce_text(&Cell::Empty), None);
    }

    #[test]
    fn numeric_cells_render_as_text() {
        // Whole floats lose the trailing ".0" so ids stay comparable.
        assert_eq!(coerce_text(&Cell::Number(12345678.0)), Some("12345678".to_string()));
        assert_eq!(coerce_text(&Cell::Int(42)), Some("42".to_string()));
    }
}
