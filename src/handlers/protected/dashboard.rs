use axum::{extract::OriginalUri, Extension, Json};
use serde::Serialize;

use crate::auth::SessionUser;

/// Identity shown by the dashboard navigation
#[derive(Debug, Serialize)]
pub struct NavUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardLayout {
    pub user: NavUser,
    pub path: String,
}

/// GET /dashboard[/*] - authenticated layout, only reached through the layout guard
pub async fn layout_get(
    OriginalUri(uri): OriginalUri,
    Extension(user): Extension<SessionUser>,
) -> Json<DashboardLayout> {
    Json(DashboardLayout {
        user: NavUser {
            name: user.name,
            email: user.email,
        },
        path: uri.path().to_string(),
    })
}
