//! Data access for students. Every operation runs on a transaction handle
//! obtained from [`StudentRepository::begin`]; dropping a handle without
//! calling [`StudentTx::commit`] rolls it back.

mod memory;
mod postgres;

pub use memory::InMemoryStudentRepository;
pub use postgres::PgStudentRepository;

use crate::error::AppError;
use crate::model::Student;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

#[async_trait]
pub trait StudentRepository: Send + Sync + 'static {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn StudentTx>, AppError>;

    /// Cheap round trip used by the readiness check.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait StudentTx: Send {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Student>, AppError>;

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Student>, AppError>;

    async fn exists_by_email(&mut self, email: &str) -> Result<bool, AppError>;

    async fn find_all(&mut self, page: &PageRequest) -> Result<Page<Student>, AppError>;

    /// Case-insensitive substring match against name or course.
    async fn search_by_keyword(&mut self, keyword: &str, page: &PageRequest) -> Result<Page<Student>, AppError>;

    /// Inserts when `id` is `None`, otherwise updates that row. A unique-email
    /// violation surfaces as [`AppError::Conflict`].
    async fn save(&mut self, student: Student) -> Result<Student, AppError>;

    async fn delete(&mut self, student: &Student) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
