use crate::engine::create::{insert_questions, insert_topic_links};
use crate::errors::AppError;
use crate::model::course::CourseChangeset;
use crate::model::lesson::{
    CodingContentChangeset, FinalTestContentChangeset, LessonChangeset, LessonRow, LessonType,
    VideoContentChangeset,
};
use crate::model::module::ModuleChangeset;
use crate::payloads::course::UpdateCoursePayload;
use crate::payloads::lesson::{
    QuestionSpec, UpdateCodingExercisePayload, UpdateFinalTestPayload, UpdateLessonPayload,
    UpdateVideoLessonPayload,
};
use crate::payloads::module::UpdateModulePayload;
use crate::schema::{
    answers::dsl as answers_dsl, coding_contents::dsl as coding_dsl,
    course_topics::dsl as course_topics_dsl, courses::dsl as courses_dsl,
    final_test_contents::dsl as final_tests_dsl, lessons::dsl as lessons_dsl,
    modules::dsl as modules_dsl, questions::dsl as questions_dsl,
    video_contents::dsl as videos_dsl,
};
use anyhow::anyhow;
use chrono::Utc;
use diesel::prelude::*;
use tracing::log::info;

/// Partial scalar update of a course plus, when `topic_ids` is supplied, a
/// full replace of its topic links. Omitted fields keep their previous
/// values; the owning instructor reference is immutable.
pub fn apply_course_update(
    conn: &mut PgConnection,
    payload: UpdateCoursePayload,
) -> Result<(), AppError> {
    let course_id = payload.course_id;

    let changeset = CourseChangeset {
        title: payload.title,
        description: payload.description,
        price: payload.price,
        duration: payload.duration,
        is_published: payload.is_published,
        updated_at: Some(Utc::now()),
    };
    // a topic-only update still changes the course's observable state, so
    // updated_at is bumped for it too
    let has_updates = changeset.title.is_some()
        || changeset.description.is_some()
        || changeset.price.is_some()
        || changeset.duration.is_some()
        || changeset.is_published.is_some()
        || payload.topic_ids.is_some();

    if has_updates {
        let rows_affected = diesel::update(courses_dsl::courses.find(course_id))
            .set(&changeset)
            .execute(conn)?;
        if rows_affected != 1 {
            return Err(AppError::NotFound(format!(
                "Course with ID {} not found during update.",
                course_id
            )));
        }
        info!("Updated scalar fields of course {}", course_id);
    }

    if let Some(topic_ids) = payload.topic_ids {
        replace_topic_links(conn, course_id, &topic_ids)?;
    }
    Ok(())
}

/// Deletes *all* existing topic links for the course and inserts the new
/// set. Full replace, not a diff.
pub fn replace_topic_links(
    conn: &mut PgConnection,
    course_id: i64,
    topic_ids: &[i64],
) -> Result<(), AppError> {
    diesel::delete(
        course_topics_dsl::course_topics.filter(course_topics_dsl::course_id.eq(course_id)),
    )
    .execute(conn)?;
    insert_topic_links(conn, course_id, topic_ids)?;
    info!(
        "Replaced topic links of course {} with {} topics",
        course_id,
        topic_ids.len()
    );
    Ok(())
}

pub fn apply_module_update(
    conn: &mut PgConnection,
    payload: UpdateModulePayload,
) -> Result<i64, AppError> {
    let module_id = payload.module_id;

    let changeset = ModuleChangeset {
        order: payload.order,
        title: payload.title,
        description: payload.description,
        video_url: payload.video_url,
        video_thumbnail_url: payload.video_thumbnail_url,
        video_duration: payload.video_duration,
    };
    let has_updates = changeset.order.is_some()
        || changeset.title.is_some()
        || changeset.description.is_some()
        || changeset.video_url.is_some()
        || changeset.video_thumbnail_url.is_some()
        || changeset.video_duration.is_some();
    if !has_updates {
        return Ok(module_id);
    }

    let rows_affected = diesel::update(modules_dsl::modules.find(module_id))
        .set(&changeset)
        .execute(conn)?;
    if rows_affected != 1 {
        return Err(AppError::NotFound(format!(
            "Module with ID {} not found.",
            module_id
        )));
    }
    info!("Updated module {}", module_id);
    Ok(module_id)
}

pub fn apply_lesson_update(
    conn: &mut PgConnection,
    payload: UpdateLessonPayload,
) -> Result<i64, AppError> {
    let lesson_id = payload.lesson_id;

    let changeset = LessonChangeset {
        title: payload.title,
        description: payload.description,
        duration: payload.duration,
        is_preview: payload.is_preview,
    };
    let has_updates = changeset.title.is_some()
        || changeset.description.is_some()
        || changeset.duration.is_some()
        || changeset.is_preview.is_some();
    if !has_updates {
        return Ok(lesson_id);
    }

    let rows_affected = diesel::update(lessons_dsl::lessons.find(lesson_id))
        .set(&changeset)
        .execute(conn)?;
    if rows_affected != 1 {
        return Err(AppError::NotFound(format!(
            "Lesson with ID {} not found.",
            lesson_id
        )));
    }
    info!("Updated lesson {}", lesson_id);
    Ok(lesson_id)
}

/// In-place update of a video lesson's 1:1 content row. The lesson must
/// exist and must be a VIDEO lesson; a missing content row is an invariant
/// violation, not a client error.
pub fn apply_video_update(
    conn: &mut PgConnection,
    payload: UpdateVideoLessonPayload,
) -> Result<i64, AppError> {
    let lesson_id = payload.lesson_id;
    require_lesson_of_type(conn, lesson_id, LessonType::Video)?;

    let changeset = VideoContentChangeset {
        url: payload.url,
        thumbnail_url: payload.thumbnail_url,
        duration: payload.duration,
    };
    let has_updates =
        changeset.url.is_some() || changeset.thumbnail_url.is_some() || changeset.duration.is_some();
    if !has_updates {
        return Ok(lesson_id);
    }

    let rows_affected =
        diesel::update(videos_dsl::video_contents.filter(videos_dsl::lesson_id.eq(lesson_id)))
            .set(&changeset)
            .execute(conn)?;
    if rows_affected != 1 {
        return Err(AppError::InternalServerError(anyhow!(
            "VIDEO lesson {} has no video content row",
            lesson_id
        )));
    }
    info!("Updated video content of lesson {}", lesson_id);
    Ok(lesson_id)
}

pub fn apply_coding_update(
    conn: &mut PgConnection,
    payload: UpdateCodingExercisePayload,
) -> Result<i64, AppError> {
    let lesson_id = payload.lesson_id;
    require_lesson_of_type(conn, lesson_id, LessonType::Coding)?;

    let changeset = CodingContentChangeset {
        language: payload.language,
        problem: payload.problem,
        hint: payload.hint,
        solution: payload.solution,
        starter_code: payload.starter_code,
    };
    let has_updates = changeset.language.is_some()
        || changeset.problem.is_some()
        || changeset.hint.is_some()
        || changeset.solution.is_some()
        || changeset.starter_code.is_some();
    if !has_updates {
        return Ok(lesson_id);
    }

    let rows_affected =
        diesel::update(coding_dsl::coding_contents.filter(coding_dsl::lesson_id.eq(lesson_id)))
            .set(&changeset)
            .execute(conn)?;
    if rows_affected != 1 {
        return Err(AppError::InternalServerError(anyhow!(
            "CODING lesson {} has no coding content row",
            lesson_id
        )));
    }
    info!("Updated coding content of lesson {}", lesson_id);
    Ok(lesson_id)
}

/// Scalar update of a final test plus, when a question list is supplied, a
/// full replace of its questions and answers. Atomic with the scalar update.
pub fn apply_final_test_update(
    conn: &mut PgConnection,
    payload: UpdateFinalTestPayload,
) -> Result<i64, AppError> {
    let lesson_id = payload.lesson_id;
    require_lesson_of_type(conn, lesson_id, LessonType::FinalTest)?;

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

    let changeset = FinalTestContentChangeset {
        estimated_duration: payload.estimated_duration,
        passing_score: payload.passing_score,
    };
    if changeset.estimated_duration.is_some() || changeset.passing_score.is_some() {
        diesel::update(final_tests_dsl::final_test_contents.find(final_test_id))
            .set(&changeset)
            .execute(conn)?;
        info!("Updated final test scalars of lesson {}", lesson_id);
    }

    if let Some(questions) = payload.questions {
        replace_final_test_questions(conn, final_test_id, questions)?;
    }
    Ok(lesson_id)
}

/// Deletes all existing answers, then all existing questions, then inserts
/// the new list fresh in array order. Partial question edits are not
/// supported by this path.
pub fn replace_final_test_questions(
    conn: &mut PgConnection,
    final_test_id: i64,
    questions: Vec<QuestionSpec>,
) -> Result<(), AppError> {
    let question_ids: Vec<i64> = questions_dsl::questions
        .filter(questions_dsl::final_test_id.eq(final_test_id))
        .select(questions_dsl::id)
        .load(conn)?;
    diesel::delete(answers_dsl::answers.filter(answers_dsl::question_id.eq_any(&question_ids)))
        .execute(conn)?;
    diesel::delete(questions_dsl::questions.filter(questions_dsl::id.eq_any(&question_ids)))
        .execute(conn)?;
    info!(
        "Removed {} existing questions from final test {}; inserting replacements",
        question_ids.len(),
        final_test_id
    );
    insert_questions(conn, final_test_id, questions)
}

fn require_lesson_of_type(
    conn: &mut PgConnection,
    lesson_id: i64,
    expected: LessonType,
) -> Result<(), AppError> {
    let lesson: LessonRow = lessons_dsl::lessons
        .find(lesson_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            AppError::NotFound(format!("Lesson with ID {} not found.", lesson_id))
        })?;
    if lesson.lesson_type != expected.as_str() {
        return Err(AppError::UnprocessableEntity(format!(
            "Lesson {} is of type {} and cannot be updated as {}.",
            lesson_id,
            lesson.lesson_type,
            expected.as_str()
        )));
    }
    Ok(())
}
