//! In-memory repository with the same contract as the PostgreSQL one.
//! A transaction holds the table lock for its lifetime and works on a copy;
//! commit publishes the copy, drop discards it.

use super::{StudentRepository, StudentTx, TxMode};
use crate::error::AppError;
use crate::model::Student;
use crate::page::{Page, PageRequest, SortDirection, SortField};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Student>,
    last_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryStudentRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed rows.
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn StudentTx>, AppError> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTx { guard, working, mode }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

struct InMemoryTx {
    guard: OwnedMutexGuard<Table>,
    working: Table,
    mode: TxMode,
}

impl InMemoryTx {
    fn ensure_writable(&self) -> Result<(), AppError> {
        match self.mode {
            TxMode::ReadWrite => Ok(()),
            TxMode::ReadOnly => Err(AppError::Db(sqlx::Error::Protocol(
                "cannot write in a read-only transaction".into(),
            ))),
        }
    }

    fn page_of<'a>(&self, rows: impl Iterator<Item = &'a Student>, page: &PageRequest) -> Page<Student> {
        let mut matched: Vec<Student> = rows.cloned().collect();
        matched.sort_by(|a, b| compare(a, b, page.sort.field, page.sort.direction));
        let total = matched.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let content = matched.into_iter().skip(offset).take(limit).collect();
        Page::new(content, *page, total)
    }
}

fn compare(a: &Student, b: &Student, field: SortField, direction: SortDirection) -> Ordering {
    let primary = match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Course => a.course.cmp(&b.course),
        SortField::Age => a.age.cmp(&b.age),
    };
    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl StudentTx for InMemoryTx {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Student>, AppError> {
        Ok(self.working.rows.get(&id).cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Student>, AppError> {
        Ok(self.working.rows.values().find(|s| s.email == email).cloned())
    }

    async fn exists_by_email(&mut self, email: &str) -> Result<bool, AppError> {
        Ok(self.working.rows.values().any(|s| s.email == email))
    }

    async fn find_all(&mut self, page: &PageRequest) -> Result<Page<Student>, AppError> {
        Ok(self.page_of(self.working.rows.values(), page))
    }

    async fn search_by_keyword(&mut self, keyword: &str, page: &PageRequest) -> Result<Page<Student>, AppError> {
        let needle = keyword.to_lowercase();
        let rows = self
            .working
            .rows
            .values()
            .filter(|s| contains_ignore_case(&s.name, &needle) || contains_ignore_case(&s.course, &needle));
        Ok(self.page_of(rows, page))
    }

    async fn save(&mut self, mut student: Student) -> Result<Student, AppError> {
        self.ensure_writable()?;
        let taken = self
            .working
            .rows
            .values()
            .any(|s| s.email == student.email && s.id != student.id);
        if taken {
            return Err(AppError::duplicate_email(&student.email));
        }
        let id = match student.id {
            Some(id) if self.working.rows.contains_key(&id) => id,
            Some(_) => return Err(AppError::Db(sqlx::Error::RowNotFound)),
            None => {
                self.working.last_id += 1;
                self.working.last_id
            }
        };
        student.id = Some(id);
        self.working.rows.insert(id, student.clone());
        Ok(student)
    }

    async fn delete(&mut self, student: &Student) -> Result<(), AppError> {
        self.ensure_writable()?;
        if let Some(id) = student.id {
            self.working.rows.remove(&id);
        }
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), AppError> {
        if self.mode == TxMode::ReadWrite {
            let working = std::mem::take(&mut self.working);
            *self.guard = working;
        }
        Ok(())
    }
}
