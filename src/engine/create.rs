use crate::errors::AppError;
use crate::model::course::{NewCourse, NewCourseTopic};
use crate::model::lesson::{
    NewAnswer, NewCodingContent, NewFinalTestContent, NewLesson, NewQuestion, NewVideoContent,
};
use crate::model::module::NewModule;
use crate::payloads::course::CreateCoursePayload;
use crate::payloads::lesson::{LessonSpec, QuestionSpec};
use crate::payloads::module::ModuleSpec;
use crate::schema::{
    answers::dsl as answers_dsl, coding_contents::dsl as coding_dsl,
    course_topics::dsl as course_topics_dsl, courses::dsl as courses_dsl,
    final_test_contents::dsl as final_tests_dsl, lessons::dsl as lessons_dsl,
    modules::dsl as modules_dsl, questions::dsl as questions_dsl,
    video_contents::dsl as videos_dsl,
};
use crate::model::lesson::LessonType;
use anyhow::anyhow;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::log::info;

/// Top-down insert of a whole course tree: course row, topic links, then
/// modules in input order, each with its lessons and content variants.
/// Runs inside the caller's transaction; any failure rolls the whole tree
/// back.
pub fn insert_course_tree(
    conn: &mut PgConnection,
    payload: CreateCoursePayload,
) -> Result<i64, AppError> {
    let new_course = NewCourse {
        instructor_id: payload.instructor_id,
        title: payload.title,
        description: payload.description,
        price: payload.price,
        duration: payload.duration,
        is_published: payload.is_published,
    };
    let course_id = diesel::insert_into(courses_dsl::courses)
        .values(&new_course)
        .returning(courses_dsl::id)
        .get_result::<i64>(conn)?;
    info!("Inserted course with ID: {}", course_id);

    insert_topic_links(conn, course_id, &payload.topic_ids)?;

    for (index, module_spec) in payload.modules.into_iter().enumerate() {
        let order = module_spec.order.unwrap_or(index as i32 + 1);
        insert_module_subtree(conn, course_id, module_spec, order)?;
    }

    Ok(course_id)
}

/// Inserts one module row plus all of its lessons. The caller decides the
/// `order` value (explicit, input index, or max sibling + 1).
pub fn insert_module_subtree(
    conn: &mut PgConnection,
    course_id: i64,
    spec: ModuleSpec,
    order: i32,
) -> Result<i64, AppError> {
    let new_module = NewModule {
        course_id,
        order,
        title: spec.title,
        description: spec.description,
        video_url: spec.video_url,
        video_thumbnail_url: spec.video_thumbnail_url,
        video_duration: spec.video_duration,
    };
    let module_id = diesel::insert_into(modules_dsl::modules)
        .values(&new_module)
        .returning(modules_dsl::id)
        .get_result::<i64>(conn)?;
    info!(
        "Inserted module '{}' with ID: {} (order {})",
        new_module.title, module_id, order
    );

    for lesson_spec in spec.lessons {
        insert_lesson_subtree(conn, module_id, lesson_spec)?;
    }

    Ok(module_id)
}

/// Inserts a lesson row together with exactly the one content-variant row
/// matching its discriminator. A lesson is never created bare; a spec whose
/// content payload is missing (validation bypassed) is an internal error,
/// not a partial insert.
pub fn insert_lesson_subtree(
    conn: &mut PgConnection,
    module_id: i64,
    spec: LessonSpec,
) -> Result<i64, AppError> {
    let new_lesson = NewLesson {
        module_id,
        title: spec.title,
        description: spec.description,
        lesson_type: spec.lesson_type.as_str().to_string(),
        duration: spec.duration,
        is_preview: spec.is_preview,
    };
    let lesson_id = diesel::insert_into(lessons_dsl::lessons)
        .values(&new_lesson)
        .returning(lessons_dsl::id)
        .get_result::<i64>(conn)?;
    info!(
        "Inserted {} lesson '{}' with ID: {}",
        new_lesson.lesson_type, new_lesson.title, lesson_id
    );

    match spec.lesson_type {
        LessonType::Video => {
            let video_data = spec.video_data.ok_or_else(|| {
                AppError::InternalServerError(anyhow!(
                    "VIDEO lesson {} reached the engine without video data",
                    lesson_id
                ))
            })?;
            let new_video = NewVideoContent {
                lesson_id,
                url: video_data.url,
                thumbnail_url: video_data.thumbnail_url,
                duration: video_data.duration,
            };
            diesel::insert_into(videos_dsl::video_contents)
                .values(&new_video)
                .execute(conn)?;
        }
        LessonType::Coding => {
            let coding_data = spec.coding_data.ok_or_else(|| {
                AppError::InternalServerError(anyhow!(
                    "CODING lesson {} reached the engine without coding data",
                    lesson_id
                ))
            })?;
            let new_coding = NewCodingContent {
                lesson_id,
                language: coding_data.language,
                problem: coding_data.problem,
                hint: coding_data.hint,
                solution: coding_data.solution,
                starter_code: coding_data.starter_code,
            };
            diesel::insert_into(coding_dsl::coding_contents)
                .values(&new_coding)
                .execute(conn)?;
        }
        LessonType::FinalTest => {
            let final_test_data = spec.final_test_data.ok_or_else(|| {
                AppError::InternalServerError(anyhow!(
                    "FINAL_TEST lesson {} reached the engine without test data",
                    lesson_id
                ))
            })?;
            let new_test = NewFinalTestContent {
                lesson_id,
                estimated_duration: final_test_data.estimated_duration,
                passing_score: final_test_data.passing_score,
            };
            let final_test_id = diesel::insert_into(final_tests_dsl::final_test_contents)
                .values(&new_test)
                .returning(final_tests_dsl::id)
                .get_result::<i64>(conn)?;
            insert_questions(conn, final_test_id, final_test_data.questions)?;
        }
    }

    Ok(lesson_id)
}

/// Inserts questions in input order (`order = explicit ?? index + 1`),
/// each with its answer batch.
pub fn insert_questions(
    conn: &mut PgConnection,
    final_test_id: i64,
    questions: Vec<QuestionSpec>,
) -> Result<(), AppError> {
    for (index, question_spec) in questions.into_iter().enumerate() {
        let new_question = NewQuestion {
            final_test_id,
            order: question_spec.order.unwrap_or(index as i32 + 1),
            content: question_spec.content,
        };
        let question_id = diesel::insert_into(questions_dsl::questions)
            .values(&new_question)
            .returning(questions_dsl::id)
            .get_result::<i64>(conn)?;

        let new_answers: Vec<NewAnswer> = question_spec
            .answers
            .into_iter()
            .map(|answer| NewAnswer {
                question_id,
                content: answer.content,
                is_correct: answer.is_correct,
            })
            .collect();
        diesel::insert_into(answers_dsl::answers)
            .values(&new_answers)
            .execute(conn)?;
    }
    info!("Inserted questions for final test ID {}", final_test_id);
    Ok(())
}

/// Batch insert of course-topic join rows; relative order among the links is
/// irrelevant. A dangling topic id surfaces as 404 rather than a bare FK
/// error.
pub fn insert_topic_links(
    conn: &mut PgConnection,
    course_id: i64,
    topic_ids: &[i64],
) -> Result<(), AppError> {
    if topic_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<NewCourseTopic> = topic_ids
        .iter()
        .map(|&topic_id| NewCourseTopic {
            course_id,
            topic_id,
        })
        .collect();
    diesel::insert_into(course_topics_dsl::course_topics)
        .values(&links)
        .execute(conn)
        .map_err(|e| {
            if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) = e {
                AppError::NotFound("Referenced topic not found during transaction.".to_string())
            } else {
                AppError::from(e)
            }
        })?;
    info!(
        "Linked {} topics to course {}",
        topic_ids.len(),
        course_id
    );
    Ok(())
}
