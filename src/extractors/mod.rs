//! Request extractors that reject with [`crate::error::AppError`].

mod json;
mod path;
pub use json::ValidJson;
pub use path::StudentId;
