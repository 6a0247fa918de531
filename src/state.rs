//! Shared application state for all routes.

use crate::config::DEFAULT_MAX_PAGE_SIZE;
use crate::repository::StudentRepository;
use crate::service::StudentService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub students: StudentService,
    /// Upper bound accepted for the `size` query parameter.
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(repo: Arc<dyn StudentRepository>) -> Self {
        AppState {
            students: StudentService::new(repo),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }
}
