use crate::errors::AppError;
use crate::schema::{
    courses::dsl as courses_dsl, instructors::dsl as instructors_dsl,
    modules::dsl as modules_dsl,
};
use deadpool_diesel::postgres::Pool;
use diesel::dsl::exists;
use diesel::prelude::*;
use tracing::log::{debug, error, warn};

pub(super) async fn run_query<T, F>(pool: &Pool, query: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, diesel::result::Error> + Send + 'static,
    T: Send + 'static,
{
    let conn = pool.get().await?;
    debug!("DB connection object obtained from pool for interaction");

    let res = conn.interact(query).await;

    match res {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(diesel_err)) => {
            error!("Diesel query failed within interaction: {:?}", diesel_err);
            Err(diesel_err.into())
        }
        Err(interact_err) => {
            error!("Deadpool interact error: {:?}", interact_err);
            Err(interact_err.into())
        }
    }
}

/// Runs `operation` inside a single database transaction on a pooled
/// connection. Any error returned from the closure rolls the whole
/// transaction back; this is the only failure-atomicity mechanism the
/// mutation paths rely on.
pub(super) async fn run_transaction<T, F>(pool: &Pool, operation: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let conn = pool.get().await?;
    conn.interact(move |conn_sync| conn_sync.transaction(operation))
        .await?
}

pub(super) async fn ensure_instructor_exists(
    pool: &Pool,
    instructor_id: i64,
) -> Result<(), AppError> {
    let instructor_exists = run_query(pool, move |conn| {
        diesel::select(exists(instructors_dsl::instructors.find(instructor_id)))
            .get_result::<bool>(conn)
    })
    .await?;

    if !instructor_exists {
        error!("Instructor with ID {} not found.", instructor_id);
        return Err(AppError::NotFound(format!(
            "Instructor with ID {} not found.",
            instructor_id
        )));
    }
    Ok(())
}

pub(super) async fn ensure_course_exists(pool: &Pool, course_id: i64) -> Result<(), AppError> {
    let course_exists = run_query(pool, move |conn| {
        diesel::select(exists(courses_dsl::courses.find(course_id))).get_result::<bool>(conn)
    })
    .await?;

    if !course_exists {
        error!("Course with ID {} not found.", course_id);
        return Err(AppError::NotFound(format!(
            "Course with ID {} not found.",
            course_id
        )));
    }
    Ok(())
}

pub(super) async fn ensure_module_exists(pool: &Pool, module_id: i64) -> Result<(), AppError> {
    let module_exists = run_query(pool, move |conn| {
        diesel::select(exists(modules_dsl::modules.find(module_id))).get_result::<bool>(conn)
    })
    .await?;

    if !module_exists {
        error!("Module with ID {} not found.", module_id);
        return Err(AppError::NotFound(format!(
            "Module with ID {} not found.",
            module_id
        )));
    }
    Ok(())
}

/// The requesting instructor must own the course: 404 when the course does
/// not exist, 403 when it belongs to someone else.
pub(super) async fn check_instructor_course_permission(
    pool: &Pool,
    instructor_id: i64,
    course_id: i64,
) -> Result<(), AppError> {
    let owner_id: Option<i64> = run_query(pool, move |conn| {
        courses_dsl::courses
            .find(course_id)
            .select(courses_dsl::instructor_id)
            .first::<i64>(conn)
            .optional()
    })
    .await?;

    match owner_id {
        None => Err(AppError::NotFound(format!(
            "Course with ID {} not found.",
            course_id
        ))),
        Some(owner_id) if owner_id != instructor_id => {
            warn!(
                "Permission denied: instructor {} does not own course {}.",
                instructor_id, course_id
            );
            Err(AppError::Forbidden(format!(
                "Instructor {} does not own course {}.",
                instructor_id, course_id
            )))
        }
        Some(_) => Ok(()),
    }
}
