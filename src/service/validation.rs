//! Field rules for inbound student bodies.

use crate::error::{AppError, FieldError};
use crate::model::{NewStudent, StudentRequest};
use regex::Regex;
use std::sync::OnceLock;

const TEXT_MIN: usize = 2;
const TEXT_MAX: usize = 100;
const AGE_MIN: i64 = 18;
const AGE_MAX: i64 = 100;
const EMAIL_MAX: usize = 255;
const EMAIL_LOCAL_MAX: usize = 64;
const EMAIL_LABEL_MAX: usize = 63;

/// Implemented by inbound bodies that must be checked before reaching the service.
pub trait Validate {
    type Valid;

    /// Collects every failing field instead of stopping at the first.
    fn validate(self) -> Result<Self::Valid, AppError>;
}

impl Validate for StudentRequest {
    type Valid = NewStudent;

    fn validate(self) -> Result<NewStudent, AppError> {
        let mut errors = Vec::new();
        let name = text_field(self.name, "name", "Name", &mut errors);
        let email = email_field(self.email, &mut errors);
        let course = text_field(self.course, "course", "Course", &mut errors);
        let age = age_field(self.age, &mut errors);

        match (name, email, course, age) {
            (Some(name), Some(email), Some(course), Some(age)) if errors.is_empty() => Ok(NewStudent {
                name,
                email,
                course,
                age,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn text_field(
    value: Option<String>,
    field: &'static str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.push(FieldError::new(field, format!("{} is required", label)));
            return None;
        }
    };
    let len = value.chars().count();
    if !(TEXT_MIN..=TEXT_MAX).contains(&len) {
        errors.push(FieldError::new(
            field,
            format!("{} must be between {} and {} characters", label, TEXT_MIN, TEXT_MAX),
        ));
        return None;
    }
    Some(value)
}

fn email_field(value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.push(FieldError::new("email", "Email is required"));
            return None;
        }
    };
    if !is_valid_email(&value) {
        errors.push(FieldError::new("email", "Email must be a valid email address"));
        return None;
    }
    Some(value)
}

fn age_field(value: Option<i64>, errors: &mut Vec<FieldError>) -> Option<i32> {
    let Some(age) = value else {
        errors.push(FieldError::new("age", "Age is required"));
        return None;
    };
    if age < AGE_MIN {
        errors.push(FieldError::new("age", format!("Age must be at least {}", AGE_MIN)));
        return None;
    }
    if age > AGE_MAX {
        errors.push(FieldError::new("age", format!("Age must be at most {}", AGE_MAX)));
        return None;
    }
    i32::try_from(age).ok()
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // local part, '@', dot-separated labels; no whitespace anywhere
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
            .expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(s: &str) -> bool {
    if s.chars().count() > EMAIL_MAX {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.len() > EMAIL_LOCAL_MAX || domain.split('.').any(|label| label.len() > EMAIL_LABEL_MAX) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    email_regex().is_match(s)
}
