//! Workbook ingestion pipeline.
//!
//! Turns raw spreadsheet bytes into normalized incident records: detect
//! the target sheet, map the header row to canonical fields, coerce each
//! data row, and drop rows that carry no identifying data. Malformed rows
//! never abort a batch; the only hard failure is a workbook that can not
//! be opened at all.

use std::fmt;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;
use sea_orm::Set;

use crate::entity::incident;

pub mod coerce;
pub mod headers;

pub use self::coerce::Cell;
pub use self::headers::Field;

use self::coerce::{coerce_date, coerce_float, coerce_int, coerce_text};
use self::headers::map_header;

/// Sheet name the business files use for the current data; older files
/// carry the data on their first (and only) sheet.
const PREFERRED_SHEET: &str = "HOJA NUEVA FAYMEX";

/// The workbook itself could not be opened or read. Distinct from the
/// non-error "zero valid rows" outcome, which is an empty record list.
#[derive(Debug)]
pub struct WorkbookError(pub String);

impl fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unreadable workbook: {}", self.0)
    }
}

impl std::error::Error for WorkbookError {}

/// One normalized record ready for persistence. Float fields and
/// `lost_days` are always present (defaulted) so they stay summable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRecord {
    pub number: Option<i32>,
    pub name: Option<String>,
    pub rut: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
    pub work_center: Option<String>,
    pub attention_type: Option<String>,
    pub time_type: Option<String>,
    pub lost_days: i32,
    pub sex: Option<String>,
    pub incident_type: Option<String>,
    pub classifier: Option<String>,
    pub body_part: Option<String>,
    pub observation: Option<String>,
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub attention_cost: f64,
    pub medicine_cost: f64,
    pub days_not_worked: f64,
    pub cost_per_day_not_worked: f64,
    pub total_cost: f64,
    pub status: Option<String>,
    pub final_status: Option<String>,
    pub image_url: Option<String>,
}

impl ParsedRecord {
    fn set(&mut self, field: Field, cell: &Cell) {
        match field {
            Field::Number => self.number = coerce_int(cell),
            Field::Name => self.name = coerce_text(cell),
            Field::Rut => self.rut = coerce_text(cell),
            Field::Age => self.age = coerce_int(cell),
            Field::Position => self.position = coerce_text(cell),
            Field::WorkCenter => self.work_center = coerce_text(cell),
            Field::AttentionType => self.attention_type = coerce_text(cell),
            Field::TimeType => self.time_type = coerce_text(cell),
            // lost_days is never null: a missing or malformed cell is 0.
            Field::LostDays => self.lost_days = coerce_int(cell).unwrap_or(0),
            Field::Sex => self.sex = coerce_text(cell),
            Field::IncidentType => self.incident_type = coerce_text(cell),
            Field::Classifier => self.classifier = coerce_text(cell),
            Field::BodyPart => self.body_part = coerce_text(cell),
            Field::Observation => self.observation = coerce_text(cell),
            Field::Date => self.date = coerce_date(cell),
            Field::Year => self.year = coerce_int(cell),
            Field::AttentionCost => self.attention_cost = coerce_float(cell, 0.0),
            Field::MedicineCost => self.medicine_cost = coerce_float(cell, 0.0),
            Field::DaysNotWorked => self.days_not_worked = coerce_float(cell, 0.0),
            Field::CostPerDayNotWorked => {
                self.cost_per_day_not_worked = coerce_float(cell, 0.0)
            }
            Field::TotalCost => self.total_cost = coerce_float(cell, 0.0),
            Field::Status => self.status = coerce_text(cell),
            Field::FinalStatus => self.final_status = coerce_text(cell),
            Field::ImageUrl => self.image_url = coerce_text(cell),
        }
    }

    /// Acceptance invariant: a record needs at least one of name, rut or
    /// sequence number to identify it; fully anonymous rows are noise.
    fn is_acceptable(&self) -> bool {
        self.name.is_some() || self.rut.is_some() || self.number.is_some()
    }

    pub fn into_active_model(self, upload_id: i32) -> incident::ActiveModel {
        incident::ActiveModel {
            number: Set(self.number),
            name: Set(self.name),
            rut: Set(self.rut),
            age: Set(self.age),
            position: Set(self.position),
            work_center: Set(self.work_center),
            attention_type: Set(self.attention_type),
            time_type: Set(self.time_type),
            lost_days: Set(self.lost_days),
            sex: Set(self.sex),
            incident_type: Set(self.incident_type),
            classifier: Set(self.classifier),
            body_part: Set(self.body_part),
            observation: Set(self.observation),
            date: Set(self.date),
            year: Set(self.year),
            attention_cost: Set(self.attention_cost),
            medicine_cost: Set(self.medicine_cost),
            days_not_worked: Set(self.days_not_worked),
            cost_per_day_not_worked: Set(self.cost_per_day_not_worked),
            total_cost: Set(self.total_cost),
            status: Set(self.status),
            final_status: Set(self.final_status),
            image_url: Set(self.image_url),
            upload_id: Set(upload_id),
            ..Default::default()
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Int(*i),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => Cell::Date(dt),
                None => Cell::Empty,
            },
            // Let the string date parser have a go at ISO-formatted cells.
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

/// Open the workbook and return the rows of the target sheet as typed
/// cells. Errors only when the binary itself is unreadable.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| WorkbookError(e.to_string()))?;

    let names = workbook.sheet_names();
    let target = if names.iter().any(|n| n == PREFERRED_SHEET) {
        PREFERRED_SHEET.to_string()
    } else {
        names
            .first()
            .cloned()
            .ok_or_else(|| WorkbookError("workbook has no sheets".to_string()))?
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| WorkbookError(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect())
}

/// Pure pipeline stage: first row is the header, every following row is
/// coerced independently, order preserved. Rows that are entirely empty
/// or fail the acceptance invariant are dropped silently.
pub fn records_from_rows(rows: &[Vec<Cell>]) -> Vec<ParsedRecord> {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Vec::new();
    };

    let mut columns: Vec<(usize, Field)> = Vec::new();
    for (idx, cell) in header_row.iter().enumerate() {
        if let Some(text) = coerce_text(cell)
            && let Some(field) = map_header(&text)
        {
            columns.push((idx, field));
        }
    }

    let mut records = Vec::new();
    for row in data_rows {
        if row.iter().all(Cell::is_empty) {
            continue;
        }

        let mut record = ParsedRecord::default();
        for &(idx, field) in &columns {
            // Short rows read as empty past their end.
            let cell = row.get(idx).unwrap_or(&Cell::Empty);
            record.set(field, cell);
        }

        if record.is_acceptable() {
            records.push(record);
        }
    }
    records
}

/// Full ingestion: bytes in, normalized records out.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<ParsedRecord>, WorkbookError> {
    let rows = read_rows(bytes)?;
    Ok(records_from_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn header_row(names: &[&str]) -> Vec<Cell> {
        names.iter().map(|n| text(n)).collect()
    }

    #[test]
    fn single_valid_row_with_blank_row_dropped() {
        let rows = vec![
            header_row(&["Nombre", "Edad", "Fecha", "Gasto Total"]),
            vec![text("Ana"), text("34"), text("15/03/2024"), text("1200.50")],
            vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
        ];

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.name.as_deref(), Some("Ana"));
        assert_eq!(r.age, Some(34));
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(r.total_cost, 1200.50);
        assert_eq!(r.lost_days, 0);
    }

    #[test]
    fn no_rows_yields_empty_batch() {
        assert!(records_from_rows(&[]).is_empty());
        // A header with no data rows is also empty, not an error.
        let rows = vec![header_row(&["Nombre"])];
        assert!(records_from_rows(&rows).is_empty());
    }

    #[test]
    fn rows_without_any_identity_are_rejected() {
        let rows = vec![
            header_row(&["Nombre", "RUT", "N°", "Edad"]),
            // age only: no name, rut or number
            vec![Cell::Empty, Cell::Empty, Cell::Empty, text("40")],
            // whitespace-only name is blank after trimming
            vec![text("   "), Cell::Empty, Cell::Empty, text("40")],
            // rut alone is enough
            vec![Cell::Empty, text("12.345.678-9"), Cell::Empty, Cell::Empty],
        ];

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rut.as_deref(), Some("12.345.678-9"));
    }

    #[test]
    fn malformed_cells_degrade_without_dropping_the_row() {
        let rows = vec![
            header_row(&["Nombre", "Edad", "Fecha", "Gasto Total", "Dias Perdidos"]),
            vec![
                text("Luis"),
                text("not a number"),
                text("bad date"),
                text("???"),
                text("n/a"),
            ],
        ];

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.age, None);
        assert_eq!(r.date, None);
        assert_eq!(r.total_cost, 0.0);
        assert_eq!(r.lost_days, 0);
    }

    #[test]
    fn unmapped_columns_contribute_nothing() {
        let rows = vec![
            header_row(&["Nombre", "Columna Misteriosa"]),
            vec![text("Ana"), text("dato")],
        ];

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].observation, None);
        assert_eq!(records[0].status, None);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let rows = vec![
            header_row(&["Nombre", "Edad", "Gasto Total"]),
            vec![text("Ana")],
        ];

        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age, None);
        assert_eq!(records[0].total_cost, 0.0);
    }

    #[test]
    fn row_order_is_preserved() {
        let rows = vec![
            header_row(&["Nombre"]),
            vec![text("Primero")],
            vec![text("Segundo")],
            vec![text("Tercero")],
        ];

        let names: Vec<_> = records_from_rows(&rows)
            .into_iter()
            .map(|r| r.name.unwrap())
            .collect();
        assert_eq!(names, ["Primero", "Segundo", "Tercero"]);
    }

    #[test]
    fn reingesting_identical_rows_yields_identical_records() {
        // No dedup across batches: same input, same output, every time.
        let rows = vec![
            header_row(&["Nombre", "Edad"]),
            vec![text("Ana"), text("34")],
            vec![text("Luis"), text("41")],
        ];
        assert_eq!(records_from_rows(&rows), records_from_rows(&rows));
    }

    #[test]
    fn unreadable_bytes_are_a_hard_error() {
        assert!(read_rows(b"this is not a workbook").is_err());
    }
}
