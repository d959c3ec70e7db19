//! HTTP handlers for the Overtype API

use axum::{
    extract::{Multipart, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use overtype_core::{decode_batch, InstructionBatch, MutationInstruction, RgbColor};
use overtype_pdf::apply_instructions;

use crate::error::ApiError;

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct EditParams {
    #[serde(default)]
    mode: Option<String>,
}

/// Export the uploaded PDF either untouched (`mode=original`) or with a
/// demo header stamped on the first page (`mode=modified`, the default).
pub async fn edit(
    Query(params): Query<EditParams>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    let file = upload.file.ok_or(ApiError::MissingFile)?;

    if params.mode.as_deref() == Some("original") {
        return Ok(pdf_response("original.pdf", file));
    }

    let stamp = header_stamp();
    let outcome =
        tokio::task::spawn_blocking(move || apply_instructions(&file, &[stamp]))
            .await
            .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(pdf_response("modified.pdf", outcome.bytes))
}

/// Apply a JSON array of mutation instructions to the uploaded PDF.
pub async fn annotate(mut multipart: Multipart) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    let file = upload.file.ok_or(ApiError::MissingFile)?;

    // Missing instructions mean "no edits", not an error; structurally
    // invalid JSON rejects the whole request before any processing.
    let batch = match upload.instructions {
        Some(json) => {
            decode_batch(&json).map_err(|e| ApiError::InvalidInstructions(e.to_string()))?
        }
        None => InstructionBatch::default(),
    };
    let undecodable = batch.undecodable;
    let instructions = batch.instructions;

    let outcome =
        tokio::task::spawn_blocking(move || apply_instructions(&file, &instructions))
            .await
            .map_err(|e| ApiError::Internal(e.into()))??;

    tracing::info!(
        applied = outcome.report.applied,
        skipped = outcome.report.skipped(),
        undecodable,
        "annotated PDF"
    );

    Ok(pdf_response("annotated.pdf", outcome.bytes))
}

/// The demo stamp `mode=modified` paints: bold blue header text whose
/// baseline sits 60pt below the page top.
fn header_stamp() -> MutationInstruction {
    MutationInstruction::Text {
        page: 1,
        x: 40.0,
        y_top: 48.0,
        text: "Edited with Overtype".to_string(),
        original_text: String::new(),
        font_size: Some(18.0),
        color: RgbColor { r: 0.2, g: 0.2, b: 0.8 },
        hide_original: false,
        original_width: 50.0,
        original_height: 12.0,
        font_family: None,
        is_bold: true,
        is_italic: false,
    }
}

#[derive(Debug, Default)]
struct Upload {
    file: Option<Vec<u8>>,
    instructions: Option<String>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadUpload(e.to_string()))?;
                upload.file = Some(bytes.to_vec());
            }
            Some("instructions") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadUpload(e.to_string()))?;
                upload.instructions = Some(text);
            }
            _ => {}
        }
    }
    Ok(upload)
}

fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
