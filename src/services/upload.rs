//! Upload services - Files written under the upload directory and served from `/uploads`

use crate::core::{AppError, AppState};
use crate::dtos::{ApiResponse, ApiResult, UploadDTO};
use crate::entities::User;
use axum::{
    Extension,
    extract::{Multipart, State, multipart::Field},
};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// Sub-directory of chat attachments
pub const CHAT_UPLOAD_DIR: &str = "chat";

/// Public prefix the upload directory is served under
pub const PUBLIC_UPLOAD_PREFIX: &str = "/uploads";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^\w.\-]").unwrap();
}

/// File name safe to store: no directories, whitespace runs replaced by `_`
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let underscored = WHITESPACE.replace_all(base.trim(), "_");
    let cleaned = UNSAFE_CHARS.replace_all(&underscored, "");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Reads a file field, failing as soon as it grows past `max_bytes`
pub async fn read_limited(field: &mut Field<'_>, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > max_bytes {
            warn!("Upload exceeds {} bytes", max_bytes);
            return Err(file_too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

pub fn file_too_large(max_bytes: usize) -> AppError {
    AppError::bad_request("File too large").with_details(format!(
        "File size must be less than {}MB",
        max_bytes / (1024 * 1024)
    ))
}

/// Attempts at a free name before giving up
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Writes `bytes` as `<dir>/<millis>-<name>` and returns the stored file name
pub async fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let stamp = Utc::now().timestamp_millis();
    write_new_file(dir, stamp, &sanitize_file_name(original_name), bytes).await
}

/// Creates `<stamp>-<name>` without replacing an existing file. Taken names
/// get a counter: `<stamp>-1-<name>`, `<stamp>-2-<name>`, ...
async fn write_new_file(dir: &Path, stamp: i64, name: &str, bytes: &[u8]) -> Result<String, AppError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let file_name = match attempt {
            0 => format!("{stamp}-{name}"),
            n => format!("{stamp}-{n}-{name}"),
        };

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&file_name))
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };

        file.write_all(bytes).await?;
        file.flush().await?;

        info!("Stored upload {}", file_name);
        return Ok(file_name);
    }

    warn!("No free name for upload {}", name);
    Err(std::io::Error::from(ErrorKind::AlreadyExists).into())
}

/// Stores the `file` field as a chat attachment
#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.user_id))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    mut multipart: Multipart,
) -> ApiResult<UploadDTO> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("file").to_string();
        let bytes = read_limited(&mut field, state.max_upload_bytes).await?;

        let dir = state.upload_dir.join(CHAT_UPLOAD_DIR);
        let stored = store_upload(&dir, &original_name, &bytes).await?;

        return Ok(ApiResponse::ok(UploadDTO {
            file_url: format!("{PUBLIC_UPLOAD_PREFIX}/{CHAT_UPLOAD_DIR}/{stored}"),
        }));
    }

    warn!("Upload request without a file");
    Err(AppError::bad_request("No file uploaded"))
}
