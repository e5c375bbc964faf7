use axum::extract::{Multipart, Path, State};
use axum::response::Json;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::{incident, upload};
use crate::ingest;

use super::{
    ApiErr, AppState,
    dto::{UploadListItem, UploadResponse},
};

const VALID_EXTENSIONS: [&str; 3] = [".xlsx", ".xlsm", ".xls"];

/// Ingest one workbook: parse, normalize, and persist the upload plus its
/// incidents as a single transaction, so concurrent readers never observe
/// a half-written batch.
pub async fn upload_workbook(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiErr> {
    let mut filename = None;
    let mut content = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiErr::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        filename = field.file_name().map(str::to_string);
        content = Some(
            field
                .bytes()
                .await
                .map_err(|e| ApiErr::bad_request(e.to_string()))?,
        );
        break;
    }

    let content = content.ok_or_else(|| ApiErr::bad_request("No se proporcionó un archivo"))?;
    let filename = filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiErr::bad_request("No se proporcionó un archivo"))?;

    let lower = filename.to_lowercase();
    if !VALID_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(ApiErr::bad_request(
            "Formato de archivo no soportado. Use .xlsx o .xlsm",
        ));
    }

    // Unreadable workbook: rejected outright. Zero valid rows is reported
    // separately so the caller can tell the two apart.
    let records = ingest::parse_workbook(&content)
        .map_err(|e| ApiErr::bad_request(format!("Error al procesar el archivo Excel: {e}")))?;

    if records.is_empty() {
        return Err(ApiErr::bad_request(
            "No se encontraron registros válidos en el archivo",
        ));
    }
    let records_added = records.len() as u64;

    let txn = state.db.begin().await.map_err(ApiErr::internal)?;

    let batch = upload::ActiveModel {
        filename: Set(filename.clone()),
        uploaded_at: Set(Utc::now().naive_utc()),
        record_count: Set(records_added as i32),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(ApiErr::internal)?;

    incident::Entity::insert_many(records.into_iter().map(|r| r.into_active_model(batch.id)))
        .exec(&txn)
        .await
        .map_err(ApiErr::internal)?;

    txn.commit().await.map_err(ApiErr::internal)?;

    tracing::info!(
        upload_id = batch.id,
        filename = %filename,
        records = records_added,
        "workbook ingested"
    );

    let total_records = incident::Entity::find()
        .count(&state.db)
        .await
        .map_err(ApiErr::internal)?;

    Ok(Json(UploadResponse {
        upload_id: batch.id,
        filename,
        records_added,
        total_records,
    }))
}

pub async fn list_uploads(
    State(state): State<AppState>,
) -> Result<Json<Vec<UploadListItem>>, ApiErr> {
    let uploads = upload::Entity::find()
        .order_by_desc(upload::Column::UploadedAt)
        .all(&state.db)
        .await
        .map_err(ApiErr::internal)?;

    Ok(Json(uploads.into_iter().map(UploadListItem::from).collect()))
}

/// Remove an upload and every incident it owns, atomically.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let existing = upload::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(ApiErr::internal)?
        .ok_or_else(|| ApiErr::not_found("Upload no encontrado"))?;

    let txn = state.db.begin().await.map_err(ApiErr::internal)?;

    incident::Entity::delete_many()
        .filter(incident::Column::UploadId.eq(existing.id))
        .exec(&txn)
        .await
        .map_err(ApiErr::internal)?;
    upload::Entity::delete_by_id(existing.id)
        .exec(&txn)
        .await
        .map_err(ApiErr::internal)?;

    txn.commit().await.map_err(ApiErr::internal)?;

    tracing::info!(upload_id = id, "upload deleted");

    Ok(Json(serde_json::json!({
        "detail": "Upload y registros asociados eliminados correctamente"
    })))
}
