use crate::dtos::WelcomeResponse;
use axum::Json;

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the voice app API".to_string(),
    })
}
