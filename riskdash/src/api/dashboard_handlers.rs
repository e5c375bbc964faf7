//! Dashboard read endpoints. Each one builds the shared filter from the
//! query string, fetches the filtered snapshot in insertion order, and
//! delegates to the pure analytics functions, so every endpoint reports
//! over exactly the same record set for the same filter state.

use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::analytics;
use crate::entity::incident;
use crate::filters::{IncidentFilter, search_condition, sort_column};

use super::{
    ApiErr, AppState,
    dto::{
        BodyMapResponse, ChartsResponse, IncidentItem, IncidentListResponse, KpiResponse,
        ListQuery, TrendsResponse,
    },
};

async fn filtered_rows(
    state: &AppState,
    filter: &IncidentFilter,
) -> Result<Vec<incident::Model>, ApiErr> {
    incident::Entity::find()
        .filter(filter.condition())
        .order_by_asc(incident::Column::Id)
        .all(&state.db)
        .await
        .map_err(ApiErr::internal)
}

pub async fn kpis(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
) -> Result<Json<KpiResponse>, ApiErr> {
    let rows = filtered_rows(&state, &filter).await?;
    Ok(Json(analytics::kpi::compute(&rows, Utc::now().date_naive())))
}

pub async fn charts(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
) -> Result<Json<ChartsResponse>, ApiErr> {
    let rows = filtered_rows(&state, &filter).await?;
    Ok(Json(analytics::charts::compute(&rows)))
}

pub async fn body_map(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
) -> Result<Json<BodyMapResponse>, ApiErr> {
    let rows = filtered_rows(&state, &filter).await?;
    Ok(Json(analytics::body_map::compute(&rows)))
}

pub async fn trends(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
) -> Result<Json<TrendsResponse>, ApiErr> {
    let rows = filtered_rows(&state, &filter).await?;
    Ok(Json(analytics::trends::compute(&rows, Utc::now().date_naive())))
}

/// Paginated, sorted, optionally searched record view. The search and the
/// sort allow-list apply here only; the filter is the shared one.
pub async fn list_incidents(
    State(state): State<AppState>,
    Query(filter): Query<IncidentFilter>,
    Query(params): Query<ListQuery>,
) -> Result<Json<IncidentListResponse>, ApiErr> {
    let page = params.page.unwrap_or(1).max(1);
    let size = params.size.unwrap_or(20).clamp(1, 100);

    let mut cond = filter.condition();
    if let Some(search) = params.search.as_deref().map(str::trim)
        && !search.is_empty()
    {
        cond = cond.add(search_condition(search));
    }

    let base = incident::Entity::find().filter(cond);
    let total = base.clone().count(&state.db).await.map_err(ApiErr::internal)?;

    // Unknown sort fields silently fall back to id descending.
    let sorted = match params.sort_by.as_deref().and_then(sort_column) {
        Some(column) => {
            if params.sort_order.as_deref() == Some("asc") {
                base.order_by_asc(column)
            } else {
                base.order_by_desc(column)
            }
        }
        None => base.order_by_desc(incident::Column::Id),
    };

    let items = sorted
        .offset((page - 1) * size)
        .limit(size)
        .all(&state.db)
        .await
        .map_err(ApiErr::internal)?;

    // An empty result still reports one page.
    let pages = if total == 0 { 1 } else { total.div_ceil(size) };

    Ok(Json(IncidentListResponse {
        items: items.into_iter().map(IncidentItem::from).collect(),
        total,
        page,
        size,
        pages,
    }))
}
