// src/handlers/rbac.rs

use axum::{response::IntoResponse, Json};

use crate::middleware::rbac::{permission_catalogue, PermissionInfo};

// GET /api/permissions (para a tela de Admin saber quais áreas existem)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Admin",
    responses(
        (status = 200, description = "Áreas com permissão própria", body = Vec<PermissionInfo>)
    )
)]
pub async fn list_permissions() -> impl IntoResponse {
    Json(permission_catalogue())
}
