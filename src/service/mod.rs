//! StudentService and inbound validation.

mod student;
mod validation;
pub use student::StudentService;
pub use validation::{is_valid_email, Validate};
