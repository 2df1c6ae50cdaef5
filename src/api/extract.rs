//! Extractors whose rejections render as [`AppError`] JSON bodies

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json<T>` that rejects with `invalid_input`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `Path<T>` that rejects with `invalid_input`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
