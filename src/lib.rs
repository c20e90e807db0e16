use crate::cli::Args;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use tracing::log::info;

pub mod cli;
pub mod model;
pub mod payloads;
pub mod response;
pub mod schema;

mod api;
mod engine;
mod errors;
mod validate;

pub fn init_router(args: &Args) -> anyhow::Result<Router> {
    info!("Initializing database pool...");
    let pool = init_pool(&args.connection_str, args.db_pool_max_size)
        .context("Failed to initialize database pool")?;

    info!("Initializing router...");
    Ok(init_router_internal(pool))
}

pub fn init_test_router(pool: Pool) -> Router {
    init_router_internal(pool)
}

fn init_router_internal(pool: Pool) -> Router {
    Router::new()
        .nest("/instructor", instructor_routes())
        .nest("/content", content_routes())
        .with_state(pool)
}

fn init_pool(conn_str: &str, max_size: u32) -> anyhow::Result<Pool> {
    let manager = Manager::new(conn_str, Runtime::Tokio1);
    let pool = Pool::builder(manager).max_size(max_size as usize).build()?;
    Ok(pool)
}

fn instructor_routes() -> Router<Pool> {
    Router::new()
        .route("/create_course", post(api::course::create_course))
        .route("/update_course", post(api::course::update_course))
        .route("/delete_course", post(api::course::delete_course))
        .route("/reorder_modules", post(api::course::reorder_modules))
        .route("/create_module", post(api::module::create_module))
        .route("/update_module", post(api::module::update_module))
        .route("/delete_module", post(api::module::delete_module))
        .route("/create_lesson", post(api::lesson::create_lesson))
        .route("/update_lesson", post(api::lesson::update_lesson))
        .route(
            "/update_video_lesson",
            post(api::lesson::update_video_lesson),
        )
        .route(
            "/update_coding_exercise",
            post(api::lesson::update_coding_exercise),
        )
        .route("/update_final_test", post(api::lesson::update_final_test))
        .route("/delete_lesson", post(api::lesson::delete_lesson))
        .route("/reorder_questions", post(api::lesson::reorder_questions))
}

fn content_routes() -> Router<Pool> {
    Router::new()
        .route("/get_course_data", get(api::course::get_course_data))
        .route("/get_module_data", get(api::module::get_module_data))
        .route("/get_lesson_data", get(api::lesson::get_lesson_data))
}
