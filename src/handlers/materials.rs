use axum::{http::StatusCode, response::IntoResponse};

use crate::structure::registration::{Material, MaterialResponse};
use crate::utils::success_response;

pub async fn list_materials() -> impl IntoResponse {
    let materials: Vec<MaterialResponse> =
        Material::ALL.into_iter().map(MaterialResponse::from).collect();
    success_response(StatusCode::OK, materials)
}
