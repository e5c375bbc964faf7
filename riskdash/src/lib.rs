//! riskdash - workplace safety incident analytics
//!
//! Ingests spreadsheet-based incident records into a canonical schema and
//! serves KPIs, chart breakdowns, trends/alerts, a body-part map and a
//! paginated listing over the normalized records.

pub mod analytics;
pub mod api;
pub mod entity;
pub mod filters;
pub mod ingest;
