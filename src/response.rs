//! Response helpers: status + JSON body pairs and the paginated body shape.

use crate::page::Page;
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Wire shape of a page of results.
#[derive(Serialize, Debug)]
pub struct PageBody<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> From<Page<T>> for PageBody<T> {
    fn from(page: Page<T>) -> Self {
        PageBody {
            total_pages: page.total_pages(),
            first: page.is_first(),
            last: page.is_last(),
            page: page.request.page,
            size: page.request.size,
            total_elements: page.total_elements,
            content: page.content,
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn page_ok<T: Serialize>(page: Page<T>) -> (StatusCode, Json<PageBody<T>>) {
    (StatusCode::OK, Json(PageBody::from(page)))
}
