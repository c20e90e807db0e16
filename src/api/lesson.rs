use super::helper;
use crate::engine::{create, hydrate, ordering, teardown, update};
use crate::errors::AppError;
use crate::model::lesson::{LessonRow, LessonTree, LessonType};
use crate::payloads::lesson::{
    CreateLessonPayload, DeleteLessonPayload, GetLessonDataParams, ReorderQuestionsPayload,
    UpdateCodingExercisePayload, UpdateFinalTestPayload, UpdateLessonPayload,
    UpdateVideoLessonPayload,
};
use crate::response::ApiResponse;
use crate::schema::{final_test_contents::dsl as final_tests_dsl, lessons::dsl as lessons_dsl};
use crate::validate;
use anyhow::anyhow;
use axum::Json;
use axum::extract::{Query, State};
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use tracing::instrument;
use tracing::log::{debug, info};

/// Adds one lesson to an existing module, together with exactly the content
/// variant matching its `lesson_type`, in one transaction. Lessons are never
/// created bare.
///
/// Request Body: `CreateLessonPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `LessonTree`: the hydrated lesson as persisted (200 OK).
/// * `404 Not Found`: If the module does not exist.
/// * `422 Unprocessable Entity`: If the content payload does not match the declared type.
/// * `500 Internal Server Error`: On database errors (lesson and content rolled back together).
#[instrument(skip(pool, payload))]
pub async fn create_lesson(
    State(pool): State<Pool>,
    Json(payload): Json<CreateLessonPayload>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let (module_id, spec) = payload.into_spec();
    info!(
        "Attempting to create {} lesson '{}' in module {}",
        spec.lesson_type.as_str(),
        spec.title,
        module_id
    );
    debug!("Create lesson spec: {:?}", spec);

    validate::validate_lesson_spec(&spec)?;
    helper::ensure_module_exists(&pool, module_id).await?;

    let lesson_tree = helper::run_transaction(&pool, move |conn| {
        let lesson_id = create::insert_lesson_subtree(conn, module_id, spec)?;
        hydrate::load_lesson_tree(conn, lesson_id)
    })
    .await?;

    info!(
        "Successfully created lesson {} in module {}",
        lesson_tree.id, module_id
    );
    Ok(ApiResponse::ok(lesson_tree))
}

/// Returns the hydrated lesson with its content variant.
///
/// Query Parameters:
/// * lesson_id as `i64`
#[instrument(skip(pool, params))]
pub async fn get_lesson_data(
    State(pool): State<Pool>,
    Query(params): Query<GetLessonDataParams>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let lesson_id = params.lesson_id;
    info!("Fetching lesson data for lesson {}", lesson_id);

    let lesson_tree =
        helper::run_transaction(&pool, move |conn| hydrate::load_lesson_tree(conn, lesson_id))
            .await?;

    Ok(ApiResponse::ok(lesson_tree))
}

/// Partially updates a lesson's scalar fields (title, description, duration,
/// preview flag). The discriminator and the owning module are immutable.
#[instrument(skip(pool, payload))]
pub async fn update_lesson(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateLessonPayload>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let lesson_id = payload.lesson_id;
    info!("Attempting to update lesson {}", lesson_id);
    debug!("Update lesson payload: {:?}", payload);

    let lesson_tree = helper::run_transaction(&pool, move |conn| {
        let lesson_id = update::apply_lesson_update(conn, payload)?;
        hydrate::load_lesson_tree(conn, lesson_id)
    })
    .await?;

    info!("Successfully updated lesson {}", lesson_id);
    Ok(ApiResponse::ok(lesson_tree))
}

/// Updates a VIDEO lesson's content row in place.
///
/// Returns (wrapped in `ApiResponse`)
/// * `LessonTree` (200 OK).
/// * `404 Not Found`: If the lesson does not exist.
/// * `422 Unprocessable Entity`: If the lesson is not a VIDEO lesson.
#[instrument(skip(pool, payload))]
pub async fn update_video_lesson(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateVideoLessonPayload>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let lesson_id = payload.lesson_id;
    info!("Attempting to update video content of lesson {}", lesson_id);
    debug!("Update video lesson payload: {:?}", payload);

    if let Some(url) = &payload.url {
        validate::validate_url(url, "lesson video")?;
    }

    let lesson_tree = helper::run_transaction(&pool, move |conn| {
        let lesson_id = update::apply_video_update(conn, payload)?;
        hydrate::load_lesson_tree(conn, lesson_id)
    })
    .await?;

    Ok(ApiResponse::ok(lesson_tree))
}

/// Updates a CODING lesson's content row in place.
#[instrument(skip(pool, payload))]
pub async fn update_coding_exercise(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateCodingExercisePayload>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let lesson_id = payload.lesson_id;
    info!(
        "Attempting to update coding content of lesson {}",
        lesson_id
    );
    debug!("Update coding exercise payload: {:?}", payload);

    let lesson_tree = helper::run_transaction(&pool, move |conn| {
        let lesson_id = update::apply_coding_update(conn, payload)?;
        hydrate::load_lesson_tree(conn, lesson_id)
    })
    .await?;

    Ok(ApiResponse::ok(lesson_tree))
}

/// Updates a FINAL_TEST lesson's scalars in place and, when a `questions`
/// array is supplied, replaces the whole question list (all answers deleted,
/// then all questions, then the new list inserted fresh). Atomic with the
/// scalar update; partial question edits are not supported.
///
/// Returns (wrapped in `ApiResponse`)
/// * `LessonTree` (200 OK).
/// * `404 Not Found`: If the lesson does not exist.
/// * `422 Unprocessable Entity`: If the lesson is not a FINAL_TEST lesson or a
///   replacement question has no answers / no correct answer.
#[instrument(skip(pool, payload))]
pub async fn update_final_test(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateFinalTestPayload>,
) -> Result<ApiResponse<LessonTree>, AppError> {
    let lesson_id = payload.lesson_id;
    info!("Attempting to update final test of lesson {}", lesson_id);
    debug!("Update final test payload: {:?}", payload);

    if let Some(questions) = &payload.questions {
        validate::validate_questions(questions)?;
    }

    let lesson_tree = helper::run_transaction(&pool, move |conn| {
        let lesson_id = update::apply_final_test_update(conn, payload)?;
        hydrate::load_lesson_tree(conn, lesson_id)
    })
    .await?;

    info!("Successfully updated final test of lesson {}", lesson_id);
    Ok(ApiResponse::ok(lesson_tree))
}

/// Deletes a lesson bottom-up: content-variant children (submissions or
/// questions/answers), the content row, comments and notes, then the lesson
/// row itself. One transaction.
///
/// Request Body: `DeleteLessonPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `bool`: true when the lesson was deleted (200 OK).
/// * `404 Not Found`: If the lesson does not exist (never a silent no-op).
#[instrument(skip(pool, payload))]
pub async fn delete_lesson(
    State(pool): State<Pool>,
    Json(payload): Json<DeleteLessonPayload>,
) -> Result<ApiResponse<bool>, AppError> {
    let lesson_id = payload.lesson_id;
    info!("Attempting to DELETE lesson {}", lesson_id);

    helper::run_transaction(&pool, move |conn| {
        let lesson: LessonRow = lessons_dsl::lessons
            .find(lesson_id)
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                AppError::NotFound(format!("Lesson with ID {} not found.", lesson_id))
            })?;
        teardown::delete_lesson_rows(conn, &lesson)
    })
    .await?;

    info!("Successfully deleted lesson {}", lesson_id);
    Ok(ApiResponse::ok(true))
}

/// Bulk-assigns `order` values to the questions of one FINAL_TEST lesson.
///
/// Request Body: `ReorderQuestionsPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `bool`: true on success (200 OK).
/// * `404 Not Found`: If the lesson does not exist.
/// * `422 Unprocessable Entity`: If the lesson is not a FINAL_TEST lesson or
///   an id does not belong to its test.
#[instrument(skip(pool, payload))]
pub async fn reorder_questions(
    State(pool): State<Pool>,
    Json(payload): Json<ReorderQuestionsPayload>,
) -> Result<ApiResponse<bool>, AppError> {
    let lesson_id = payload.lesson_id;
    info!(
        "Attempting to reorder {} questions of lesson {}",
        payload.items.len(),
        lesson_id
    );
    debug!("Reorder questions payload: {:?}", payload);

    helper::run_transaction(&pool, move |conn| {
        let lesson: LessonRow = lessons_dsl::lessons
            .find(lesson_id)
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                AppError::NotFound(format!("Lesson with ID {} not found.", lesson_id))
            })?;
        if lesson.lesson_type != LessonType::FinalTest.as_str() {
            return Err(AppError::UnprocessableEntity(format!(
                "Lesson {} is of type {} and has no questions to reorder.",
                lesson_id, lesson.lesson_type
            )));
        }

        let final_test_id: i64 = final_tests_dsl::final_test_contents
            .filter(final_tests_dsl::lesson_id.eq(lesson_id))
            .select(final_tests_dsl::id)
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow!(
                    "FINAL_TEST lesson {} has no final test content row",
                    lesson_id
                ))
            })?;
        ordering::reorder_questions(conn, final_test_id, &payload.items)
    })
    .await?;

    info!("Successfully reordered questions of lesson {}", lesson_id);
    Ok(ApiResponse::ok(true))
}
