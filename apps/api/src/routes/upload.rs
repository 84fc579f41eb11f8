use axum::extract::multipart::{Field, MultipartError};
use bytes::Bytes;

use crate::documents::{extract_text_blocking, DocumentKind, ExtractedDocument};
use crate::errors::AppError;

/// A file part read from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.filename, self.content_type.as_deref())
    }

    /// Extracts the file's text on the blocking pool.
    pub async fn extract(self, kind: DocumentKind) -> ExtractedDocument {
        let text = extract_text_blocking(self.data, kind).await;
        ExtractedDocument {
            filename: self.filename,
            text,
        }
    }
}

pub async fn read_file(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().unwrap_or("unknown").to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadedFile {
        filename,
        content_type,
        data,
    })
}

pub async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let text = field.text().await.map_err(multipart_error)?;
    Ok(text.trim().to_string())
}

pub fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}
