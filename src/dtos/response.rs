//! Response envelope - `{ success, data?, error? }` shared by every JSON endpoint

use crate::core::AppError;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Return type of the JSON handlers; errors render through `AppError`
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Public location of a stored upload
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadDTO {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}
