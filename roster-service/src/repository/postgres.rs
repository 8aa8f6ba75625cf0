//! PostgreSQL student store
//!
//! Listing queries are assembled with [`QueryBuilder`] so the count and the
//! windowed fetch share one filter clause. Saves run in a single transaction
//! that is rolled back when any staged change fails.

use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};

use super::error::{RepositoryError, RepositoryOperation};
use super::query::StudentQuery;
use super::traits::{RepositoryResult, StudentStore};
use super::unit_of_work::{ChangeSet, SaveSummary, StagedChange};
use crate::pagination::{PageSource, PageWindow};
use crate::students::{seed, Course, Enrollment, Grade, Student, StudentId};

/// `string_data_right_truncation`, raised when a name exceeds its column width
const SQLSTATE_TRUNCATION: &str = "22001";

/// Student store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the sample roster when the student table is empty.
    ///
    /// Returns `true` when rows were inserted.
    pub async fn seed_sample_roster(&self) -> RepositoryResult<bool> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(RepositoryOperation::Count, e))?;
        if existing > 0 {
            return Ok(false);
        }

        let save_err = |e| map_sqlx_error(RepositoryOperation::Save, e);
        let mut tx = self.pool.begin().await.map_err(save_err)?;

        let mut student_ids = Vec::new();
        for fields in seed::sample_students() {
            let id: i32 = sqlx::query_scalar(
                "INSERT INTO student (last_name, first_mid_name, enrollment_date) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(fields.last_name)
            .bind(fields.first_mid_name)
            .bind(fields.enrollment_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(save_err)?;
            student_ids.push(id);
        }

        for course in seed::sample_courses() {
            sqlx::query(
                "INSERT INTO course (course_id, title, credits) VALUES ($1, $2, $3) \
                 ON CONFLICT (course_id) DO NOTHING",
            )
            .bind(course.course_id)
            .bind(course.title)
            .bind(course.credits)
            .execute(&mut *tx)
            .await
            .map_err(save_err)?;
        }

        for (student_index, course_id, grade) in seed::sample_enrollments() {
            let Some(&student_id) = student_ids.get(student_index) else {
                continue;
            };
            sqlx::query("INSERT INTO enrollment (student_id, course_id, grade) VALUES ($1, $2, $3)")
                .bind(student_id)
                .bind(course_id)
                .bind(grade.map(|g| g.as_str()))
                .execute(&mut *tx)
                .await
                .map_err(save_err)?;
        }

        tx.commit().await.map_err(save_err)?;
        tracing::info!(students = student_ids.len(), "Seeded sample roster");
        Ok(true)
    }
}

impl PageSource<StudentQuery> for PgStudentStore {
    type Item = Student;

    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM student");
        push_filter(&mut builder, query);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(RepositoryOperation::Count, e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn fetch(
        &self,
        query: &StudentQuery,
        window: PageWindow,
    ) -> RepositoryResult<Vec<Student>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, last_name, first_mid_name, enrollment_date FROM student",
        );
        push_filter(&mut builder, query);

        // Column and direction come from closed enums, never from input
        let order = query.order();
        builder.push(format!(
            " ORDER BY {} {}, id ASC",
            order.field.column(),
            order.direction.as_sql()
        ));
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(window.take).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(window.skip).unwrap_or(i64::MAX));

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(RepositoryOperation::Fetch, e))?;

        rows.iter()
            .map(student_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error(RepositoryOperation::Fetch, e))
    }
}

impl StudentStore for PgStudentStore {
    async fn find(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        let row = sqlx::query(
            "SELECT id, last_name, first_mid_name, enrollment_date FROM student WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(RepositoryOperation::FindById, e))?;

        row.as_ref()
            .map(student_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error(RepositoryOperation::FindById, e))
    }

    async fn find_with_enrollments(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        let Some(mut student) = self.find(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT e.enrollment_id, e.course_id, e.grade, c.title, c.credits \
             FROM enrollment e JOIN course c ON c.course_id = e.course_id \
             WHERE e.student_id = $1 ORDER BY e.enrollment_id",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(RepositoryOperation::FindById, e))?;

        student.enrollments = rows
            .iter()
            .map(|row| enrollment_from_row(id, row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error(RepositoryOperation::FindById, e))?;
        Ok(Some(student))
    }

    async fn save(&self, changes: ChangeSet) -> RepositoryResult<SaveSummary> {
        let mut summary = SaveSummary::default();
        if changes.is_empty() {
            return Ok(summary);
        }

        let save_err = |e| map_sqlx_error(RepositoryOperation::Save, e);
        let mut tx = self.pool.begin().await.map_err(save_err)?;

        // Returning early drops `tx`, which rolls the transaction back
        for change in changes {
            match change {
                StagedChange::Add(fields) => {
                    let id: i32 = sqlx::query_scalar(
                        "INSERT INTO student (last_name, first_mid_name, enrollment_date) \
                         VALUES ($1, $2, $3) RETURNING id",
                    )
                    .bind(fields.last_name)
                    .bind(fields.first_mid_name)
                    .bind(fields.enrollment_date)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(save_err)?;
                    summary.added.push(StudentId::new(id));
                }
                StagedChange::Update { id, fields } => {
                    let result = sqlx::query(
                        "UPDATE student SET last_name = $1, first_mid_name = $2, \
                         enrollment_date = $3 WHERE id = $4",
                    )
                    .bind(fields.last_name)
                    .bind(fields.first_mid_name)
                    .bind(fields.enrollment_date)
                    .bind(id.get())
                    .execute(&mut *tx)
                    .await
                    .map_err(save_err)?;
                    if result.rows_affected() != 1 {
                        return Err(RepositoryError::update_conflict("Student", id.to_string()));
                    }
                    summary.updated += 1;
                }
                StagedChange::Remove(id) => {
                    let result = sqlx::query("DELETE FROM student WHERE id = $1")
                        .bind(id.get())
                        .execute(&mut *tx)
                        .await
                        .map_err(save_err)?;
                    if result.rows_affected() != 1 {
                        return Err(RepositoryError::update_conflict("Student", id.to_string()));
                    }
                    summary.removed += 1;
                }
            }
        }

        tx.commit().await.map_err(save_err)?;
        tracing::debug!(
            added = summary.added.len(),
            updated = summary.updated,
            removed = summary.removed,
            "Saved changes"
        );
        Ok(summary)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &StudentQuery) {
    if let Some(term) = query.search() {
        let pattern = format!("%{}%", escape_like(term));
        builder
            .push(" WHERE (last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR first_mid_name ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Escape `LIKE` wildcards so search terms match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn student_from_row(row: &PgRow) -> Result<Student, sqlx::Error> {
    Ok(Student {
        id: StudentId::new(row.try_get("id")?),
        last_name: row.try_get("last_name")?,
        first_mid_name: row.try_get("first_mid_name")?,
        enrollment_date: row.try_get("enrollment_date")?,
        enrollments: Vec::new(),
    })
}

fn enrollment_from_row(student_id: StudentId, row: &PgRow) -> Result<Enrollment, sqlx::Error> {
    let course_id: i32 = row.try_get("course_id")?;
    let grade: Option<String> = row.try_get("grade")?;
    Ok(Enrollment {
        enrollment_id: row.try_get("enrollment_id")?,
        course_id,
        student_id,
        grade: grade.as_deref().and_then(Grade::from_letter),
        course: Some(Course {
            course_id,
            title: row.try_get("title")?,
            credits: row.try_get("credits")?,
        }),
    })
}

/// Translate a driver error into the repository taxonomy
fn map_sqlx_error(operation: RepositoryOperation, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(ref db) => {
            let rejected = matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) || db.code().as_deref() == Some(SQLSTATE_TRUNCATION);

            if rejected {
                RepositoryError::constraint_violation(operation, db.message())
            } else {
                RepositoryError::database_error(operation, db.message())
            }
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::timeout(operation, "Timed out acquiring a database connection")
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolClosed => {
            RepositoryError::connection_failed(err.to_string()).with_operation(operation)
        }
        other => RepositoryError::database_error(operation, other.to_string()),
    }
}
