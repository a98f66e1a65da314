//! Request extractors that reject with the application's JSON error body.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections render as `AppError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
