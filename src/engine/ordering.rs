use crate::errors::AppError;
use crate::payloads::course::OrderAssignment;
use crate::schema::{modules::dsl as modules_dsl, questions::dsl as questions_dsl};
use diesel::dsl::max;
use diesel::prelude::*;
use tracing::log::info;

/// Default `order` for a new module: 1 + the current max sibling order,
/// read within the surrounding transaction. Gaps left by deletes are not
/// reused.
pub fn next_module_order(conn: &mut PgConnection, course_id: i64) -> Result<i32, AppError> {
    let max_order: Option<i32> = modules_dsl::modules
        .filter(modules_dsl::course_id.eq(course_id))
        .select(max(modules_dsl::order))
        .first(conn)?;
    Ok(max_order.unwrap_or(0) + 1)
}

/// Bulk "set these module ids to these order values". All updates commit or
/// roll back together; no relative ordering among them is guaranteed. Ids
/// that do not belong to the course are rejected before any update runs.
pub fn reorder_modules(
    conn: &mut PgConnection,
    course_id: i64,
    items: &[OrderAssignment],
) -> Result<(), AppError> {
    let sibling_ids: Vec<i64> = modules_dsl::modules
        .filter(modules_dsl::course_id.eq(course_id))
        .select(modules_dsl::id)
        .load(conn)?;

    for item in items {
        if !sibling_ids.contains(&item.id) {
            return Err(AppError::UnprocessableEntity(format!(
                "Module {} does not belong to course {}.",
                item.id, course_id
            )));
        }
    }

    for item in items {
        diesel::update(modules_dsl::modules.find(item.id))
            .set(modules_dsl::order.eq(item.order))
            .execute(conn)?;
    }
    info!(
        "Reordered {} modules within course {}",
        items.len(),
        course_id
    );
    Ok(())
}

pub fn reorder_questions(
    conn: &mut PgConnection,
    final_test_id: i64,
    items: &[OrderAssignment],
) -> Result<(), AppError> {
    let sibling_ids: Vec<i64> = questions_dsl::questions
        .filter(questions_dsl::final_test_id.eq(final_test_id))
        .select(questions_dsl::id)
        .load(conn)?;

    for item in items {
        if !sibling_ids.contains(&item.id) {
            return Err(AppError::UnprocessableEntity(format!(
                "Question {} does not belong to final test {}.",
                item.id, final_test_id
            )));
        }
    }

    for item in items {
        diesel::update(questions_dsl::questions.find(item.id))
            .set(questions_dsl::order.eq(item.order))
            .execute(conn)?;
    }
    info!(
        "Reordered {} questions within final test {}",
        items.len(),
        final_test_id
    );
    Ok(())
}
