use sea_orm_migration::prelude::*;

use crate::m20260815_000001_create_uploads::Uploads;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incidents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incidents::Number).integer().null())
                    .col(ColumnDef::new(Incidents::Name).string().null())
                    .col(ColumnDef::new(Incidents::Rut).string().null())
                    .col(ColumnDef::new(Incidents::Age).integer().null())
                    .col(ColumnDef::new(Incidents::Position).string().null())
                    .col(ColumnDef::new(Incidents::WorkCenter).string().null())
                    .col(ColumnDef::new(Incidents::AttentionType).string().null())
                    .col(ColumnDef::new(Incidents::TimeType).string().null())
                    .col(
                        ColumnDef::new(Incidents::LostDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Incidents::Sex).string().null())
                    .col(ColumnDef::new(Incidents::IncidentType).string().null())
                    .col(ColumnDef::new(Incidents::Classifier).string().null())
                    .col(ColumnDef::new(Incidents::BodyPart).string().null())
                    .col(ColumnDef::new(Incidents::Observation).text().null())
                    .col(ColumnDef::new(Incidents::Date).date().null())
                    .col(ColumnDef::new(Incidents::Year).integer().null())
                    .col(
                        ColumnDef::new(Incidents::AttentionCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Incidents::MedicineCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Incidents::DaysNotWorked)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Incidents::CostPerDayNotWorked)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Incidents::TotalCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Incidents::Status).string().null())
                    .col(ColumnDef::new(Incidents::FinalStatus).string().null())
                    .col(ColumnDef::new(Incidents::ImageUrl).string().null())
                    .col(ColumnDef::new(Incidents::UploadId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_upload_id")
                            .from(Incidents::Table, Incidents::UploadId)
                            .to(Uploads::Table, Uploads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_upload_id")
                    .table(Incidents::Table)
                    .col(Incidents::UploadId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_date")
                    .table(Incidents::Table)
                    .col(Incidents::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
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
    UploadId,
}
