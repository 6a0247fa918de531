//! Student business rules: uniqueness and existence checks, entity/projection mapping.

use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentResponse};
use crate::page::{Page, PageRequest};
use crate::repository::{StudentRepository, StudentTx, TxMode};
use std::sync::Arc;

/// Each operation runs in exactly one transaction; an early return drops the
/// handle, which rolls it back.
#[derive(Clone)]
pub struct StudentService {
    repo: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repo: Arc<dyn StudentRepository>) -> Self {
        StudentService { repo }
    }

    pub fn repository(&self) -> &Arc<dyn StudentRepository> {
        &self.repo
    }

    pub async fn create_student(&self, fields: NewStudent) -> Result<StudentResponse, AppError> {
        let mut tx = self.repo.begin(TxMode::ReadWrite).await?;
        if tx.exists_by_email(&fields.email).await? {
            return Err(AppError::duplicate_email(&fields.email));
        }
        let saved = tx.save(Student::new(fields)).await?;
        tx.commit().await?;
        tracing::info!(id = ?saved.id, "student created");
        StudentResponse::try_from(saved)
    }

    pub async fn get_all_students(&self, page: PageRequest) -> Result<Page<StudentResponse>, AppError> {
        let mut tx = self.repo.begin(TxMode::ReadOnly).await?;
        let rows = tx.find_all(&page).await?;
        tx.commit().await?;
        rows.try_map(StudentResponse::try_from)
    }

    pub async fn get_student_by_id(&self, id: i64) -> Result<StudentResponse, AppError> {
        let mut tx = self.repo.begin(TxMode::ReadOnly).await?;
        let student = find_existing(tx.as_mut(), id).await?;
        tx.commit().await?;
        StudentResponse::try_from(student)
    }

    pub async fn update_student(&self, id: i64, fields: NewStudent) -> Result<StudentResponse, AppError> {
        let mut tx = self.repo.begin(TxMode::ReadWrite).await?;
        let mut student = find_existing(tx.as_mut(), id).await?;
        if student.email != fields.email && tx.exists_by_email(&fields.email).await? {
            return Err(AppError::duplicate_email(&fields.email));
        }
        student.apply(fields);
        let saved = tx.save(student).await?;
        tx.commit().await?;
        tracing::info!(id, "student updated");
        StudentResponse::try_from(saved)
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.repo.begin(TxMode::ReadWrite).await?;
        let student = find_existing(tx.as_mut(), id).await?;
        tx.delete(&student).await?;
        tx.commit().await?;
        tracing::info!(id, "student deleted");
        Ok(())
    }

    pub async fn search_students(&self, keyword: &str, page: PageRequest) -> Result<Page<StudentResponse>, AppError> {
        let mut tx = self.repo.begin(TxMode::ReadOnly).await?;
        let rows = tx.search_by_keyword(keyword, &page).await?;
        tx.commit().await?;
        rows.try_map(StudentResponse::try_from)
    }
}

async fn find_existing(tx: &mut dyn StudentTx, id: i64) -> Result<Student, AppError> {
    tx.find_by_id(id).await?.ok_or_else(|| AppError::student_not_found(id))
}
