use super::helper;
use crate::engine::{create, hydrate, ordering, teardown, update};
use crate::errors::AppError;
use crate::model::course::CourseTree;
use crate::payloads::course::{
    CreateCoursePayload, DeleteCoursePayload, GetCourseDataParams, ReorderModulesPayload,
    UpdateCoursePayload,
};
use crate::response::ApiResponse;
use crate::validate;
use axum::Json;
use axum::extract::{Query, State};
use bigdecimal::BigDecimal;
use deadpool_diesel::postgres::Pool;
use tracing::instrument;
use tracing::log::{debug, info};

/// Creates a course together with its whole content tree (modules, lessons,
/// content variants, questions/answers, topic links) in one transaction.
///
/// Request Body: `CreateCoursePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `CourseTree`: the fully hydrated course as persisted (200 OK).
/// * `404 Not Found`: If the requesting instructor or a referenced topic does not exist.
/// * `422 Unprocessable Entity`: If the nested payload fails validation (raised before the transaction opens).
/// * `500 Internal Server Error`: If a database error or transaction failure occurs.
#[instrument(skip(pool, payload))]
pub async fn create_course(
    State(pool): State<Pool>,
    Json(payload): Json<CreateCoursePayload>,
) -> Result<ApiResponse<CourseTree>, AppError> {
    let instructor_id = payload.instructor_id;
    info!(
        "Attempting to create course '{}' with {} modules for instructor {}",
        payload.title,
        payload.modules.len(),
        instructor_id
    );
    debug!("Create course payload: {:?}", payload);

    validate::validate_course_payload(&payload)?;
    helper::ensure_instructor_exists(&pool, instructor_id).await?;

    let course_tree = helper::run_transaction(&pool, move |conn| {
        let course_id = create::insert_course_tree(conn, payload)?;
        hydrate::load_course_tree(conn, course_id)
    })
    .await?;

    info!(
        "Successfully created course {} for instructor {}",
        course_tree.id, instructor_id
    );
    Ok(ApiResponse::ok(course_tree))
}

/// Returns the fully hydrated course subtree.
///
/// Query Parameters:
/// * course_id as `i64`
///
/// Returns (wrapped in `ApiResponse`)
/// * `CourseTree` (200 OK).
/// * `404 Not Found`: If the course does not exist.
/// * `500 Internal Server Error`: On database errors or a lesson with missing/mismatched content.
#[instrument(skip(pool, params))]
pub async fn get_course_data(
    State(pool): State<Pool>,
    Query(params): Query<GetCourseDataParams>,
) -> Result<ApiResponse<CourseTree>, AppError> {
    let course_id = params.course_id;
    info!("Fetching course data for course {}", course_id);

    // Hydration spans several reads; running them in one transaction keeps
    // the snapshot consistent with concurrent mutations.
    let course_tree =
        helper::run_transaction(&pool, move |conn| hydrate::load_course_tree(conn, course_id))
            .await?;

    info!(
        "Successfully fetched course {} ({} modules)",
        course_id,
        course_tree.modules.len()
    );
    Ok(ApiResponse::ok(course_tree))
}

/// Partially updates a course's scalar fields, and fully replaces its topic
/// links when `topic_ids` is supplied. Ownership is immutable.
///
/// Request Body: `UpdateCoursePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `CourseTree`: the hydrated course after the update (200 OK).
/// * `403 Forbidden`: If the instructor does not own the course.
/// * `404 Not Found`: If the course or a referenced topic does not exist.
/// * `422 Unprocessable Entity`: If the patch fails validation.
/// * `500 Internal Server Error`: On database errors; the scalar update rolls back with the topic replace.
#[instrument(skip(pool, payload))]
pub async fn update_course(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateCoursePayload>,
) -> Result<ApiResponse<CourseTree>, AppError> {
    let instructor_id = payload.instructor_id;
    let course_id = payload.course_id;
    info!(
        "Attempting to update course {} requested by instructor {}",
        course_id, instructor_id
    );
    debug!("Update course payload: {:?}", payload);

    if let Some(price) = &payload.price {
        if price < &BigDecimal::from(0) {
            return Err(AppError::UnprocessableEntity(format!(
                "Course price must not be negative (got {}).",
                price
            )));
        }
    }
    helper::check_instructor_course_permission(&pool, instructor_id, course_id).await?;

    let course_tree = helper::run_transaction(&pool, move |conn| {
        update::apply_course_update(conn, payload)?;
        hydrate::load_course_tree(conn, course_id)
    })
    .await?;

    info!("Successfully updated course {}", course_id);
    Ok(ApiResponse::ok(course_tree))
}

/// Deletes a course and its entire subtree bottom-up: every lesson's content
/// (with submissions, questions, answers), comments/notes, lessons, modules,
/// topic links, then the course row. One transaction; no partial deletes are
/// ever visible.
///
/// Request Body: `DeleteCoursePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `bool`: true when the whole subtree was deleted (200 OK).
/// * `403 Forbidden`: If the instructor does not own the course.
/// * `404 Not Found`: If the course does not exist.
/// * `500 Internal Server Error`: On database errors (whole deletion rolled back).
#[instrument(skip(pool, payload))]
pub async fn delete_course(
    State(pool): State<Pool>,
    Json(payload): Json<DeleteCoursePayload>,
) -> Result<ApiResponse<bool>, AppError> {
    let instructor_id = payload.instructor_id;
    let course_id = payload.course_id;
    info!(
        "Attempting to DELETE course {} requested by instructor {}",
        course_id, instructor_id
    );

    helper::check_instructor_course_permission(&pool, instructor_id, course_id).await?;

    helper::run_transaction(&pool, move |conn| {
        teardown::delete_course_rows(conn, course_id)
    })
    .await?;

    info!("Successfully deleted course {}", course_id);
    Ok(ApiResponse::ok(true))
}

/// Bulk-assigns `order` values to modules of one course. All updates commit
/// together; no renormalization of gaps happens anywhere else.
///
/// Request Body: `ReorderModulesPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `bool`: true on success (200 OK).
/// * `404 Not Found`: If the course does not exist.
/// * `422 Unprocessable Entity`: If an id does not belong to the course.
#[instrument(skip(pool, payload))]
pub async fn reorder_modules(
    State(pool): State<Pool>,
    Json(payload): Json<ReorderModulesPayload>,
) -> Result<ApiResponse<bool>, AppError> {
    let course_id = payload.course_id;
    info!(
        "Attempting to reorder {} modules of course {}",
        payload.items.len(),
        course_id
    );
    debug!("Reorder modules payload: {:?}", payload);

    helper::ensure_course_exists(&pool, course_id).await?;

    helper::run_transaction(&pool, move |conn| {
        ordering::reorder_modules(conn, course_id, &payload.items)
    })
    .await?;

    info!("Successfully reordered modules of course {}", course_id);
    Ok(ApiResponse::ok(true))
}
