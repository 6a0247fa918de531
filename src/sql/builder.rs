//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the students table.

use crate::model::Student;
use crate::page::PageRequest;
use crate::sql::PgBindValue;

pub const STUDENTS_TABLE: &str = "students";

const COLUMNS: &str = "\"id\", \"name\", \"email\", \"course\", \"age\"";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified students table.
pub fn qualified_table(schema: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(STUDENTS_TABLE))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

/// Escape LIKE metacharacters so the keyword matches literally, then wrap in `%`.
pub fn like_pattern(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len() + 2);
    out.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// WHERE clause for keyword search against name OR course, case-insensitive.
fn keyword_filter(q: &mut QueryBuf, keyword: Option<&str>) -> String {
    match keyword {
        Some(k) => {
            let n = q.push_param(like_pattern(k));
            format!(
                " WHERE LOWER(\"name\") LIKE LOWER(${n}) ESCAPE '\\' OR LOWER(\"course\") LIKE LOWER(${n}) ESCAPE '\\'"
            )
        }
        None => String::new(),
    }
}

pub fn select_by_id(schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("SELECT {} FROM {} WHERE \"id\" = ${}", COLUMNS, qualified_table(schema), n);
    q
}

pub fn select_by_email(schema: &str, email: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(email);
    q.sql = format!("SELECT {} FROM {} WHERE \"email\" = ${}", COLUMNS, qualified_table(schema), n);
    q
}

pub fn exists_by_email(schema: &str, email: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(email);
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE \"email\" = ${})",
        qualified_table(schema),
        n
    );
    q
}

/// One page of rows, optionally filtered by keyword. `id` breaks ties so pages are stable.
pub fn select_page(schema: &str, keyword: Option<&str>, page: &PageRequest) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = keyword_filter(&mut q, keyword);
    let sort = page.sort;
    let mut order_clause = format!(" ORDER BY {} {}", quoted(sort.field.column()), sort.direction);
    if sort.field.column() != "id" {
        order_clause.push_str(", \"id\" ASC");
    }
    let limit = q.push_param(page.limit());
    let offset = q.push_param(page.offset());
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT ${} OFFSET ${}",
        COLUMNS,
        qualified_table(schema),
        where_clause,
        order_clause,
        limit,
        offset
    );
    q
}

/// Total rows matching the same filter as [`select_page`].
pub fn count(schema: &str, keyword: Option<&str>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = keyword_filter(&mut q, keyword);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", qualified_table(schema), where_clause);
    q
}

/// INSERT without id; storage assigns it.
pub fn insert(schema: &str, student: &Student) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name = q.push_param(student.name.as_str());
    let email = q.push_param(student.email.as_str());
    let course = q.push_param(student.course.as_str());
    let age = q.push_param(student.age);
    q.sql = format!(
        "INSERT INTO {} (\"name\", \"email\", \"course\", \"age\") VALUES (${}, ${}, ${}, ${}) RETURNING {}",
        qualified_table(schema),
        name,
        email,
        course,
        age,
        COLUMNS
    );
    q
}

/// UPDATE all business columns by id.
pub fn update(schema: &str, id: i64, student: &Student) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name = q.push_param(student.name.as_str());
    let email = q.push_param(student.email.as_str());
    let course = q.push_param(student.course.as_str());
    let age = q.push_param(student.age);
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET \"name\" = ${}, \"email\" = ${}, \"course\" = ${}, \"age\" = ${} WHERE \"id\" = ${} RETURNING {}",
        qualified_table(schema),
        name,
        email,
        course,
        age,
        id_param,
        COLUMNS
    );
    q
}

/// DELETE by id.
pub fn delete(schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!("DELETE FROM {} WHERE \"id\" = ${}", qualified_table(schema), n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Sort, SortDirection, SortField};

    fn ann() -> Student {
        Student {
            id: None,
            name: "Ann Lee".into(),
            email: "ann@x.com".into(),
            course: "CS".into(),
            age: 20,
        }
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(qualified_table("public"), "\"public\".\"students\"");
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cs"), "%cs%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn page_without_keyword_orders_and_limits() {
        let page = PageRequest::new(
            2,
            5,
            Sort {
                field: SortField::Name,
                direction: SortDirection::Desc,
            },
        );
        let q = select_page("public", None, &page);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"email\", \"course\", \"age\" FROM \"public\".\"students\" \
             ORDER BY \"name\" DESC, \"id\" ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(q.params, vec![PgBindValue::BigInt(5), PgBindValue::BigInt(10)]);
    }

    #[test]
    fn page_with_keyword_matches_name_or_course() {
        let q = select_page("public", Some("cs"), &PageRequest::default());
        assert!(q.sql.contains("WHERE LOWER(\"name\") LIKE LOWER($1) ESCAPE '\\' OR LOWER(\"course\") LIKE LOWER($1)"));
        assert!(q.sql.ends_with("ORDER BY \"id\" ASC LIMIT $2 OFFSET $3"));
        assert_eq!(q.params[0], PgBindValue::Text("%cs%".into()));
    }

    #[test]
    fn count_shares_keyword_filter() {
        let q = count("s", Some("x"));
        assert!(q.sql.starts_with("SELECT COUNT(*) FROM \"s\".\"students\" WHERE"));
        assert_eq!(q.params.len(), 1);
        assert_eq!(count("s", None).sql, "SELECT COUNT(*) FROM \"s\".\"students\"");
    }

    #[test]
    fn insert_omits_id() {
        let q = insert("public", &ann());
        assert!(q.sql.starts_with("INSERT INTO \"public\".\"students\" (\"name\", \"email\", \"course\", \"age\")"));
        assert!(q.sql.contains("RETURNING \"id\""));
        assert_eq!(q.params.len(), 4);
        assert_eq!(q.params[3], PgBindValue::Int(20));
    }

    #[test]
    fn update_binds_id_last() {
        let q = update("public", 9, &ann());
        assert!(q.sql.contains("WHERE \"id\" = $5"));
        assert_eq!(q.params.last(), Some(&PgBindValue::BigInt(9)));
    }
}
