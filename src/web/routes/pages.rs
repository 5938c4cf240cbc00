// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use crate::dashboard::{DISPLAY_COLUMNS, DashboardFilter, DashboardView};
use crate::web::{state::AppState, utils};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    title: String,
    columns: [&'static str; 13],
    view: DashboardView,
}

/// Dashboard page handler
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let filter = DashboardFilter::from_query_pairs(&params);
    let view = utils::load_view(&state.table_path, &filter)
        .map_err(|e| utils::table_error(&state.table_path, e))?;

    let template = DashboardTemplate {
        title: "Stock Drop & Recovery Dashboard".to_string(),
        columns: DISPLAY_COLUMNS,
        view,
    };

    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e))
    })?))
}
