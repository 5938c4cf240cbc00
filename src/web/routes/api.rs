// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;

use crate::dashboard::DashboardFilter;
use crate::web::{state::AppState, utils};

/// Filtered drop table as JSON, same query parameters as the dashboard
pub async fn list_drops(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let filter = DashboardFilter::from_query_pairs(&params);
    let view = utils::load_view(&state.table_path, &filter)
        .map_err(|e| utils::table_error(&state.table_path, e))?;

    Ok(Json(json!({
        "table": state.table_path.display().to_string(),
        "view": view
    })))
}
