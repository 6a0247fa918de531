//! Student records: REST CRUD service for student rows in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod migration;
pub mod model;
pub mod page;
pub mod repository;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{load_from_env, AppConfig, StorageBackend};
pub use error::{AppError, ConfigError, FieldError};
pub use migration::apply_migrations;
pub use model::{NewStudent, Student, StudentRequest, StudentResponse};
pub use page::{Page, PageRequest, Sort, SortDirection, SortField};
pub use repository::{InMemoryStudentRepository, PgStudentRepository, StudentRepository, StudentTx, TxMode};
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists};
pub use routes::{app, common_routes_with_ready, student_routes};
pub use service::StudentService;
