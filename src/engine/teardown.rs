use crate::errors::AppError;
use crate::model::lesson::{LessonRow, LessonType};
use crate::schema::{
    answers::dsl as answers_dsl, coding_contents::dsl as coding_dsl,
    comments::dsl as comments_dsl, course_topics::dsl as course_topics_dsl,
    courses::dsl as courses_dsl, final_test_contents::dsl as final_tests_dsl,
    lessons::dsl as lessons_dsl, modules::dsl as modules_dsl, notes::dsl as notes_dsl,
    questions::dsl as questions_dsl, submissions::dsl as submissions_dsl,
    video_contents::dsl as videos_dsl,
};
use anyhow::anyhow;
use diesel::prelude::*;
use tracing::log::info;

/// Bottom-up teardown of one lesson: the content variant's own children
/// first (answers/questions for a test, submissions for a coding exercise),
/// then the content row, then comments and notes, then the lesson row
/// itself. No orphan state is visible at any point inside the transaction.
pub fn delete_lesson_rows(conn: &mut PgConnection, lesson: &LessonRow) -> Result<(), AppError> {
    let kind = LessonType::parse(&lesson.lesson_type).ok_or_else(|| {
        AppError::InternalServerError(anyhow!(
            "Lesson {} has unknown lesson_type '{}'",
            lesson.id,
            lesson.lesson_type
        ))
    })?;

    match kind {
        LessonType::Video => {
            info!("Deleting video content for lesson {}", lesson.id);
            diesel::delete(videos_dsl::video_contents.filter(videos_dsl::lesson_id.eq(lesson.id)))
                .execute(conn)?;
        }
        LessonType::Coding => {
            let coding_ids: Vec<i64> = coding_dsl::coding_contents
                .filter(coding_dsl::lesson_id.eq(lesson.id))
                .select(coding_dsl::id)
                .load(conn)?;
            info!(
                "Deleting submissions and coding content for lesson {}",
                lesson.id
            );
            diesel::delete(
                submissions_dsl::submissions
                    .filter(submissions_dsl::coding_content_id.eq_any(&coding_ids)),
            )
            .execute(conn)?;
            diesel::delete(coding_dsl::coding_contents.filter(coding_dsl::lesson_id.eq(lesson.id)))
                .execute(conn)?;
        }
        LessonType::FinalTest => {
            let test_ids: Vec<i64> = final_tests_dsl::final_test_contents
                .filter(final_tests_dsl::lesson_id.eq(lesson.id))
                .select(final_tests_dsl::id)
                .load(conn)?;
            let question_ids: Vec<i64> = questions_dsl::questions
                .filter(questions_dsl::final_test_id.eq_any(&test_ids))
                .select(questions_dsl::id)
                .load(conn)?;
            info!(
                "Deleting {} questions (and their answers) for lesson {}",
                question_ids.len(),
                lesson.id
            );
            diesel::delete(
                answers_dsl::answers.filter(answers_dsl::question_id.eq_any(&question_ids)),
            )
            .execute(conn)?;
            diesel::delete(
                questions_dsl::questions.filter(questions_dsl::id.eq_any(&question_ids)),
            )
            .execute(conn)?;
            diesel::delete(
                final_tests_dsl::final_test_contents
                    .filter(final_tests_dsl::lesson_id.eq(lesson.id)),
            )
            .execute(conn)?;
        }
    }

    diesel::delete(comments_dsl::comments.filter(comments_dsl::lesson_id.eq(lesson.id)))
        .execute(conn)?;
    diesel::delete(notes_dsl::notes.filter(notes_dsl::lesson_id.eq(lesson.id))).execute(conn)?;

    let lesson_deleted_count =
        diesel::delete(lessons_dsl::lessons.find(lesson.id)).execute(conn)?;
    if lesson_deleted_count != 1 {
        return Err(AppError::NotFound(format!(
            "Lesson {} not found during final delete step.",
            lesson.id
        )));
    }
    info!("Deleted lesson {}", lesson.id);
    Ok(())
}

/// Loads the module's lessons eagerly, runs the full lesson teardown for
/// each, then deletes the module row. Missing module id is NotFound, never a
/// silent no-op.
pub fn delete_module_rows(conn: &mut PgConnection, module_id: i64) -> Result<(), AppError> {
    let lessons: Vec<LessonRow> = lessons_dsl::lessons
        .filter(lessons_dsl::module_id.eq(module_id))
        .load(conn)?;
    info!(
        "Tearing down {} lessons for module {}",
        lessons.len(),
        module_id
    );
    for lesson in &lessons {
        delete_lesson_rows(conn, lesson)?;
    }

    let module_deleted_count =
        diesel::delete(modules_dsl::modules.find(module_id)).execute(conn)?;
    if module_deleted_count != 1 {
        return Err(AppError::NotFound(format!(
            "Module with ID {} not found.",
            module_id
        )));
    }
    info!("Deleted module {}", module_id);
    Ok(())
}

/// Full course teardown: every module's lessons, then the modules, then the
/// topic links, then the course row.
pub fn delete_course_rows(conn: &mut PgConnection, course_id: i64) -> Result<(), AppError> {
    let module_ids: Vec<i64> = modules_dsl::modules
        .filter(modules_dsl::course_id.eq(course_id))
        .select(modules_dsl::id)
        .load(conn)?;
    info!(
        "Tearing down {} modules for course {}",
        module_ids.len(),
        course_id
    );
    for module_id in module_ids {
        delete_module_rows(conn, module_id)?;
    }

    diesel::delete(
        course_topics_dsl::course_topics.filter(course_topics_dsl::course_id.eq(course_id)),
    )
    .execute(conn)?;

    let course_deleted_count =
        diesel::delete(courses_dsl::courses.find(course_id)).execute(conn)?;
    if course_deleted_count != 1 {
        return Err(AppError::NotFound(format!(
            "Course with ID {} not found.",
            course_id
        )));
    }
    info!("Deleted course {}", course_id);
    Ok(())
}
