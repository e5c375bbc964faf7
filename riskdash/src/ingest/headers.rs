//! Header normalization and the canonical column mapping.
//!
//! Source workbooks are uncontrolled: header spelling varies in case,
//! whitespace and accents across files. Every known spelling is listed
//! verbatim below so a header either maps to exactly one canonical field
//! or is ignored.

/// Canonical incident fields a spreadsheet column can map to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Number,
    Name,
    Rut,
    Age,
    Position,
    WorkCenter,
    AttentionType,
    TimeType,
    LostDays,
    Sex,
    IncidentType,
    Classifier,
    BodyPart,
    Observation,
    Date,
    Year,
    AttentionCost,
    MedicineCost,
    DaysNotWorked,
    CostPerDayNotWorked,
    TotalCost,
    Status,
    FinalStatus,
    ImageUrl,
}

/// Coercion rule applied to cells of a given field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Int,
    Float,
    Text,
}

impl Field {
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Date => FieldKind::Date,
            Field::Number | Field::Age | Field::LostDays | Field::Year => FieldKind::Int,
            Field::AttentionCost
            | Field::MedicineCost
            | Field::DaysNotWorked
            | Field::CostPerDayNotWorked
            | Field::TotalCost => FieldKind::Float,
            _ => FieldKind::Text,
        }
    }
}

/// Lower-case, trim, and collapse internal whitespace runs to one space.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map a normalized header to its canonical field, or `None` for columns
/// that contribute nothing. Accented/unaccented pairs and the misspellings
/// present in the real business spreadsheets ("dia no trabajados") are
/// kept as synonyms on purpose.
pub fn canonical_field(normalized: &str) -> Option<Field> {
    let field = match normalized {
        "n°" => Field::Number,
        "nombre" => Field::Name,
        "rut" => Field::Rut,
        "edad" => Field::Age,
        "cargo" => Field::Position,
        "centro de trabajo" => Field::WorkCenter,
        "atención" | "atencion" => Field::AttentionType,
        "tiempo" => Field::TimeType,
        "dias perdidos" => Field::LostDays,
        "sexo" => Field::Sex,
        "tipo" => Field::IncidentType,
        "tipificador" => Field::Classifier,
        "parte del cuerpo" => Field::BodyPart,
        "observación" | "observacion" => Field::Observation,
        "fecha" => Field::Date,
        "año" => Field::Year,
        "gasto atención" | "gasto atencion" => Field::AttentionCost,
        "gasto remedios" => Field::MedicineCost,
        "dia no trabajados" => Field::DaysNotWorked,
        "gasto dia no trabajado" => Field::CostPerDayNotWorked,
        "gasto total" => Field::TotalCost,
        "estado" => Field::Status,
        "estado final" => Field::FinalStatus,
        "imagen" => Field::ImageUrl,
        _ => return None,
    };
    Some(field)
}

/// Convenience wrapper: normalize then look up.
pub fn map_header(raw: &str) -> Option<Field> {
    canonical_field(&normalize_header(raw))
}
