//! Student handlers: create, list/search, read, update, delete.

use crate::error::AppError;
use crate::extractors::{StudentId, ValidJson};
use crate::model::StudentRequest;
use crate::page::{PageRequest, Sort, SortDirection, SortField};
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::collections::HashMap;

/// Parsed `GET /api/students` query.
#[derive(Debug, PartialEq, Eq)]
pub struct ListParams {
    pub page: PageRequest,
    /// Non-blank search keyword, passed through as given.
    pub search: Option<String>,
}

impl ListParams {
    pub fn parse(params: &HashMap<String, String>, max_page_size: u32) -> Result<Self, AppError> {
        let page = match params.get("page") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest(format!("page must be a non-negative integer, got '{}'", v)))?,
            None => 0,
        };
        let size = match params.get("size") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest(format!("size must be a positive integer, got '{}'", v)))?,
            None => PageRequest::DEFAULT_SIZE,
        };
        if size == 0 {
            return Err(AppError::BadRequest("size must be at least 1".into()));
        }
        let size = size.min(max_page_size);
        let field = match params.get("sortBy") {
            Some(v) => v.parse::<SortField>()?,
            None => SortField::Id,
        };
        let direction = params
            .get("sortDir")
            .map(|v| SortDirection::parse_lenient(v))
            .unwrap_or_default();
        let search = params.get("search").filter(|s| !s.trim().is_empty()).cloned();
        Ok(ListParams {
            page: PageRequest::new(page, size, Sort { field, direction }),
            search,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let params = ListParams::parse(&params, state.max_page_size)?;
    let page = match params.search.as_deref() {
        Some(keyword) => state.students.search_students(keyword, params.page).await?,
        None => state.students.get_all_students(params.page).await?,
    };
    Ok(response::page_ok(page))
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(fields): ValidJson<StudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.create_student(fields).await?;
    Ok(response::created(student))
}

pub async fn read(State(state): State<AppState>, StudentId(id): StudentId) -> Result<impl IntoResponse, AppError> {
    let student = state.students.get_student_by_id(id).await?;
    Ok(response::ok(student))
}

pub async fn update(
    State(state): State<AppState>,
    StudentId(id): StudentId,
    ValidJson(fields): ValidJson<StudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.update_student(id, fields).await?;
    Ok(response::ok(student))
}

pub async fn delete(State(state): State<AppState>, StudentId(id): StudentId) -> Result<impl IntoResponse, AppError> {
    state.students.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
