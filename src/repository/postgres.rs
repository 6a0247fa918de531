//! PostgreSQL repository built on the SQL builder and a shared `PgPool`.

use super::{StudentRepository, StudentTx, TxMode};
use crate::error::AppError;
use crate::model::Student;
use crate::page::{Page, PageRequest};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Clone)]
pub struct PgStudentRepository {
    pool: PgPool,
    schema: String,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStudentRepository {
            pool,
            schema: schema.into(),
        }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn begin(&self, mode: TxMode) -> Result<Box<dyn StudentTx>, AppError> {
        let mut tx = self.pool.begin().await?;
        if mode == TxMode::ReadOnly {
            sqlx::query("SET TRANSACTION READ ONLY").execute(&mut *tx).await?;
        }
        Ok(Box::new(PgStudentTx {
            tx,
            schema: self.schema.clone(),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

struct PgStudentTx {
    tx: Transaction<'static, Postgres>,
    schema: String,
}

impl PgStudentTx {
    async fn fetch_optional(&mut self, q: QueryBuf) -> Result<Option<Student>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        Ok(query.fetch_optional(&mut *self.tx).await?)
    }

    async fn fetch_page(&mut self, keyword: Option<&str>, page: &PageRequest) -> Result<Page<Student>, AppError> {
        let q = sql::count(&self.schema, keyword);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut count = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in q.params {
            count = count.bind(p);
        }
        let total = count.fetch_one(&mut *self.tx).await?;

        let q = sql::select_page(&self.schema, keyword, page);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut rows = sqlx::query_as::<_, Student>(&q.sql);
        for p in q.params {
            rows = rows.bind(p);
        }
        let content = rows.fetch_all(&mut *self.tx).await?;
        Ok(Page::new(content, *page, u64::try_from(total).unwrap_or(0)))
    }
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::duplicate_email(email),
        _ => AppError::Db(err),
    }
}

#[async_trait]
impl StudentTx for PgStudentTx {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Student>, AppError> {
        let q = sql::select_by_id(&self.schema, id);
        self.fetch_optional(q).await
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Student>, AppError> {
        let q = sql::select_by_email(&self.schema, email);
        self.fetch_optional(q).await
    }

    async fn exists_by_email(&mut self, email: &str) -> Result<bool, AppError> {
        let q = sql::exists_by_email(&self.schema, email);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, bool>(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        Ok(query.fetch_one(&mut *self.tx).await?)
    }

    async fn find_all(&mut self, page: &PageRequest) -> Result<Page<Student>, AppError> {
        self.fetch_page(None, page).await
    }

    async fn search_by_keyword(&mut self, keyword: &str, page: &PageRequest) -> Result<Page<Student>, AppError> {
        self.fetch_page(Some(keyword), page).await
    }

    async fn save(&mut self, student: Student) -> Result<Student, AppError> {
        let q = match student.id {
            None => sql::insert(&self.schema, &student),
            Some(id) => sql::update(&self.schema, id, &student),
        };
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        query
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_unique_violation(e, &student.email))?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn delete(&mut self, student: &Student) -> Result<(), AppError> {
        let Some(id) = student.id else {
            return Ok(());
        };
        let q = sql::delete(&self.schema, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        query.execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
