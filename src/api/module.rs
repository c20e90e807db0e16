use super::helper;
use crate::engine::{create, hydrate, ordering, teardown, update};
use crate::errors::AppError;
use crate::model::module::ModuleTree;
use crate::payloads::module::{
    CreateModulePayload, DeleteModulePayload, GetModuleDataParams, UpdateModulePayload,
};
use crate::response::ApiResponse;
use crate::validate;
use axum::Json;
use axum::extract::{Query, State};
use deadpool_diesel::postgres::Pool;
use tracing::instrument;
use tracing::log::{debug, info};

/// Adds a module (with an optional lesson batch) to an existing course.
/// When no `order` is given it defaults to 1 + the max sibling order,
/// computed inside the same transaction as the insert.
///
/// Request Body: `CreateModulePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `ModuleTree`: the hydrated module as persisted (200 OK).
/// * `404 Not Found`: If the course does not exist.
/// * `422 Unprocessable Entity`: If the module or a nested lesson fails validation.
/// * `500 Internal Server Error`: On database errors (whole subtree rolled back).
#[instrument(skip(pool, payload))]
pub async fn create_module(
    State(pool): State<Pool>,
    Json(payload): Json<CreateModulePayload>,
) -> Result<ApiResponse<ModuleTree>, AppError> {
    let (course_id, spec) = payload.into_spec();
    info!(
        "Attempting to create module '{}' with {} lessons in course {}",
        spec.title,
        spec.lessons.len(),
        course_id
    );
    debug!("Create module spec: {:?}", spec);

    validate::validate_module_spec(&spec)?;
    helper::ensure_course_exists(&pool, course_id).await?;

    let module_tree = helper::run_transaction(&pool, move |conn| {
        let order = match spec.order {
            Some(order) => order,
            None => ordering::next_module_order(conn, course_id)?,
        };
        let module_id = create::insert_module_subtree(conn, course_id, spec, order)?;
        hydrate::load_module_tree(conn, module_id)
    })
    .await?;

    info!(
        "Successfully created module {} in course {}",
        module_tree.id, course_id
    );
    Ok(ApiResponse::ok(module_tree))
}

/// Returns the fully hydrated module subtree (lessons with content).
///
/// Query Parameters:
/// * module_id as `i64`
#[instrument(skip(pool, params))]
pub async fn get_module_data(
    State(pool): State<Pool>,
    Query(params): Query<GetModuleDataParams>,
) -> Result<ApiResponse<ModuleTree>, AppError> {
    let module_id = params.module_id;
    info!("Fetching module data for module {}", module_id);

    let module_tree =
        helper::run_transaction(&pool, move |conn| hydrate::load_module_tree(conn, module_id))
            .await?;

    Ok(ApiResponse::ok(module_tree))
}

/// Partially updates a module's scalar fields. The owning course reference
/// is immutable; omitted fields keep their previous values.
///
/// Request Body: `UpdateModulePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `ModuleTree`: the hydrated module after the update (200 OK).
/// * `404 Not Found`: If the module does not exist.
#[instrument(skip(pool, payload))]
pub async fn update_module(
    State(pool): State<Pool>,
    Json(payload): Json<UpdateModulePayload>,
) -> Result<ApiResponse<ModuleTree>, AppError> {
    let module_id = payload.module_id;
    info!("Attempting to update module {}", module_id);
    debug!("Update module payload: {:?}", payload);

    if let Some(url) = &payload.video_url {
        validate::validate_url(url, "module preview video")?;
    }

    let module_tree = helper::run_transaction(&pool, move |conn| {
        let module_id = update::apply_module_update(conn, payload)?;
        hydrate::load_module_tree(conn, module_id)
    })
    .await?;

    info!("Successfully updated module {}", module_id);
    Ok(ApiResponse::ok(module_tree))
}

/// Deletes a module bottom-up: the full lesson teardown runs for every
/// lesson, then the module row goes. One transaction.
///
/// Request Body: `DeleteModulePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `bool`: true when the module and its lessons were deleted (200 OK).
/// * `404 Not Found`: If the module does not exist (never a silent no-op).
#[instrument(skip(pool, payload))]
pub async fn delete_module(
    State(pool): State<Pool>,
    Json(payload): Json<DeleteModulePayload>,
) -> Result<ApiResponse<bool>, AppError> {
    let module_id = payload.module_id;
    info!("Attempting to DELETE module {}", module_id);

    helper::run_transaction(&pool, move |conn| {
        teardown::delete_module_rows(conn, module_id)
    })
    .await?;

    info!("Successfully deleted module {}", module_id);
    Ok(ApiResponse::ok(true))
}
