use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entity::{incident, upload};

// ---------- upload ----------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: i32,
    pub filename: String,
    pub records_added: u64,
    /// Running total across all uploads, after this one.
    pub total_records: u64,
}

#[derive(Debug, Serialize)]
pub struct UploadListItem {
    pub id: i32,
    pub filename: String,
    pub uploaded_at: NaiveDateTime,
    pub record_count: i32,
}

impl From<upload::Model> for UploadListItem {
    fn from(m: upload::Model) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            uploaded_at: m.uploaded_at,
            record_count: m.record_count,
        }
    }
}

// ---------- dashboard: KPIs ----------

#[derive(Debug, Default, Serialize)]
pub struct KpiResponse {
    pub total_records: u64,
    pub total_incidents: u64,
    pub total_accidents: u64,
    pub total_lost_days: i64,
    pub total_cost: f64,
    pub active_cases: u64,
    pub avg_age: f64,
    pub incidents_this_month: u64,
    pub incidents_prev_month: u64,
    pub cost_this_month: f64,
    pub cost_prev_month: f64,
}

// ---------- dashboard: charts ----------

#[derive(Debug, Serialize)]
pub struct ChartDataItem {
    pub name: String,
    pub count: Option<u64>,
    pub total_cost: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyDataItem {
    /// Three-letter month abbreviation from the fixed name table.
    pub month: String,
    pub year: i32,
    pub total: u64,
    pub incidents: u64,
    pub accidents: u64,
    pub cost: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct ChartsResponse {
    pub by_type: Vec<ChartDataItem>,
    pub by_classifier: Vec<ChartDataItem>,
    pub by_work_center: Vec<ChartDataItem>,
    pub by_position: Vec<ChartDataItem>,
    pub by_month: Vec<MonthlyDataItem>,
    pub by_sex: Vec<ChartDataItem>,
    pub by_attention: Vec<ChartDataItem>,
    pub cost_by_classifier: Vec<ChartDataItem>,
}

// ---------- dashboard: body map ----------

#[derive(Debug, Serialize)]
pub struct IncidentBrief {
    pub id: i32,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub incident_type: Option<String>,
    pub classifier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BodyPartDetail {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
    pub incidents: Vec<IncidentBrief>,
}

#[derive(Debug, Default, Serialize)]
pub struct BodyMapResponse {
    pub parts: Vec<BodyPartDetail>,
}

// ---------- dashboard: trends ----------

#[derive(Debug, Serialize)]
pub struct AlertItem {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub severity: String,
}

#[derive(Debug, Default, Serialize)]
pub struct TrendsResponse {
    pub month_over_month_change: f64,
    pub cost_trend: f64,
    pub most_affected_body_part: Option<String>,
    pub most_common_classifier: Option<String>,
    pub alerts: Vec<AlertItem>,
}

// ---------- listing ----------

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IncidentItem {
    pub id: i32,
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
    pub upload_id: i32,
}

impl From<incident::Model> for IncidentItem {
    fn from(m: incident::Model) -> Self {
        Self {
            id: m.id,
            number: m.number,
            name: m.name,
            rut: m.rut,
            age: m.age,
            position: m.position,
            work_center: m.work_center,
            attention_type: m.attention_type,
            time_type: m.time_type,
            lost_days: m.lost_days,
            sex: m.sex,
            incident_type: m.incident_type,
            classifier: m.classifier,
            body_part: m.body_part,
            observation: m.observation,
            date: m.date,
            year: m.year,
            attention_cost: m.attention_cost,
            medicine_cost: m.medicine_cost,
            days_not_worked: m.days_not_worked,
            cost_per_day_not_worked: m.cost_per_day_not_worked,
            total_cost: m.total_cost,
            status: m.status,
            final_status: m.final_status,
            image_url: m.image_url,
            upload_id: m.upload_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IncidentListResponse {
    pub items: Vec<IncidentItem>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub pages: u64,
}
