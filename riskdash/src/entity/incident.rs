use sea_orm::entity::prelude::*;

/// One normalized safety-event record, owned by exactly one upload.
/// Rows are inserted in bulk at ingestion time and are read-only
/// afterward; the only other mutation is the cascading delete when the
/// owning upload is removed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    #[sea_orm(column_type = "Text", nullable)]
    pub observation: Option<String>,
    pub date: Option<Date>,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::upload::Entity",
        from = "Column::UploadId",
        to = "super::upload::Column::Id",
        on_delete = "Cascade"
    )]
    Upload,
}

impl Related<super::upload::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upload.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
