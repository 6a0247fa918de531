//! Student entity and its wire projections.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Persisted student row. `id` is `None` until storage assigns it.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub course: String,
    pub age: i32,
}

impl Student {
    /// A not-yet-persisted student built from validated fields.
    pub fn new(fields: NewStudent) -> Self {
        Student {
            id: None,
            name: fields.name,
            email: fields.email,
            course: fields.course,
            age: fields.age,
        }
    }

    /// Overwrite all business fields in place; `id` is untouched.
    pub fn apply(&mut self, fields: NewStudent) {
        self.name = fields.name;
        self.email = fields.email;
        self.course = fields.course;
        self.age = fields.age;
    }
}

/// Inbound body for create and update. Fields are optional so that a missing
/// field is reported as a validation failure rather than a parse failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

/// A request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
    pub age: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course: String,
    pub age: i32,
}

/// Only persisted rows project; an entity without an id is an internal fault.
impl TryFrom<Student> for StudentResponse {
    type Error = AppError;

    fn try_from(s: Student) -> Result<Self, AppError> {
        let id = s
            .id
            .ok_or_else(|| AppError::Db(sqlx::Error::Protocol("student row has no id".into())))?;
        Ok(StudentResponse {
            id,
            name: s.name,
            email: s.email,
            course: s.course,
            age: s.age,
        })
    }
}
