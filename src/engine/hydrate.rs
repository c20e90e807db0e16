use crate::errors::AppError;
use crate::model::course::{CourseRow, CourseTree};
use crate::model::lesson::{
    AnswerRow, AnswerTree, CodingContentRow, FinalTestContentRow, LessonContent, LessonRow,
    LessonTree, LessonType, QuestionRow, QuestionTree, VideoContentRow,
};
use crate::model::module::{ModuleRow, ModuleTree};
use crate::schema::{
    answers::dsl as answers_dsl, coding_contents::dsl as coding_dsl,
    course_topics::dsl as course_topics_dsl, courses::dsl as courses_dsl,
    final_test_contents::dsl as final_tests_dsl, lessons::dsl as lessons_dsl,
    modules::dsl as modules_dsl, questions::dsl as questions_dsl,
    video_contents::dsl as videos_dsl,
};
use anyhow::anyhow;
use diesel::prelude::*;
use std::collections::HashMap;
use tracing::log::info;

/// Full nested hydration of a course: modules (ordered), lessons, content
/// variants, questions/answers and topic links, assembled from batched
/// child fetches.
pub fn load_course_tree(conn: &mut PgConnection, course_id: i64) -> Result<CourseTree, AppError> {
    let course: CourseRow = courses_dsl::courses
        .find(course_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            AppError::NotFound(format!("Course with ID {} not found.", course_id))
        })?;

    let topic_ids: Vec<i64> = course_topics_dsl::course_topics
        .filter(course_topics_dsl::course_id.eq(course_id))
        .select(course_topics_dsl::topic_id)
        .load(conn)?;

    let module_rows: Vec<ModuleRow> = modules_dsl::modules
        .filter(modules_dsl::course_id.eq(course_id))
        .order_by((modules_dsl::order.asc(), modules_dsl::id.asc()))
        .load(conn)?;

    let module_ids: Vec<i64> = module_rows.iter().map(|m| m.id).collect();
    let lesson_rows: Vec<LessonRow> = if module_ids.is_empty() {
        Vec::new()
    } else {
        lessons_dsl::lessons
            .filter(lessons_dsl::module_id.eq_any(&module_ids))
            .order_by(lessons_dsl::id.asc())
            .load(conn)?
    };

    let mut content_by_lesson = load_lesson_content_map(conn, &lesson_rows)?;
    let mut lessons_by_module: HashMap<i64, Vec<LessonTree>> = HashMap::new();
    for lesson_row in lesson_rows {
        let module_id = lesson_row.module_id;
        let lesson_tree = assemble_lesson_tree(lesson_row, &mut content_by_lesson)?;
        lessons_by_module
            .entry(module_id)
            .or_default()
            .push(lesson_tree);
    }

    let modules: Vec<ModuleTree> = module_rows
        .into_iter()
        .map(|module_row| {
            let lessons = lessons_by_module.remove(&module_row.id).unwrap_or_default();
            assemble_module_tree(module_row, lessons)
        })
        .collect();

    info!(
        "Hydrated course {} with {} modules",
        course_id,
        modules.len()
    );
    Ok(CourseTree {
        id: course.id,
        instructor_id: course.instructor_id,
        title: course.title,
        description: course.description,
        price: course.price,
        duration: course.duration,
        is_published: course.is_published,
        topic_ids,
        modules,
    })
}

pub fn load_module_tree(conn: &mut PgConnection, module_id: i64) -> Result<ModuleTree, AppError> {
    let module_row: ModuleRow = modules_dsl::modules
        .find(module_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            AppError::NotFound(format!("Module with ID {} not found.", module_id))
        })?;

    let lesson_rows: Vec<LessonRow> = lessons_dsl::lessons
        .filter(lessons_dsl::module_id.eq(module_id))
        .order_by(lessons_dsl::id.asc())
        .load(conn)?;

    let mut content_by_lesson = load_lesson_content_map(conn, &lesson_rows)?;
    let mut lessons = Vec::with_capacity(lesson_rows.len());
    for lesson_row in lesson_rows {
        lessons.push(assemble_lesson_tree(lesson_row, &mut content_by_lesson)?);
    }

    Ok(assemble_module_tree(module_row, lessons))
}

pub fn load_lesson_tree(conn: &mut PgConnection, lesson_id: i64) -> Result<LessonTree, AppError> {
    let lesson_row: LessonRow = lessons_dsl::lessons
        .find(lesson_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            AppError::NotFound(format!("Lesson with ID {} not found.", lesson_id))
        })?;

    let mut content_by_lesson =
        load_lesson_content_map(conn, std::slice::from_ref(&lesson_row))?;
    assemble_lesson_tree(lesson_row, &mut content_by_lesson)
}

/// Batched fetch of all three content-variant tables (plus questions and
/// answers for final tests) for the given lessons, keyed by lesson id.
fn load_lesson_content_map(
    conn: &mut PgConnection,
    lesson_rows: &[LessonRow],
) -> Result<HashMap<i64, LessonContent>, AppError> {
    let mut content_by_lesson = HashMap::new();
    if lesson_rows.is_empty() {
        return Ok(content_by_lesson);
    }
    let lesson_ids: Vec<i64> = lesson_rows.iter().map(|l| l.id).collect();

    let video_rows: Vec<VideoContentRow> = videos_dsl::video_contents
        .filter(videos_dsl::lesson_id.eq_any(&lesson_ids))
        .load(conn)?;
    for video in video_rows {
        content_by_lesson.insert(
            video.lesson_id,
            LessonContent::Video {
                url: video.url,
                thumbnail_url: video.thumbnail_url,
                duration: video.duration,
            },
        );
    }

    let coding_rows: Vec<CodingContentRow> = coding_dsl::coding_contents
        .filter(coding_dsl::lesson_id.eq_any(&lesson_ids))
        .load(conn)?;
    for coding in coding_rows {
        content_by_lesson.insert(
            coding.lesson_id,
            LessonContent::Coding {
                language: coding.language,
                problem: coding.problem,
                hint: coding.hint,
                solution: coding.solution,
                starter_code: coding.starter_code,
            },
        );
    }

    let test_rows: Vec<FinalTestContentRow> = final_tests_dsl::final_test_contents
        .filter(final_tests_dsl::lesson_id.eq_any(&lesson_ids))
        .load(conn)?;
    let test_ids: Vec<i64> = test_rows.iter().map(|t| t.id).collect();

    let question_rows: Vec<QuestionRow> = if test_ids.is_empty() {
        Vec::new()
    } else {
        questions_dsl::questions
            .filter(questions_dsl::final_test_id.eq_any(&test_ids))
            .order_by((questions_dsl::order.asc(), questions_dsl::id.asc()))
            .load(conn)?
    };
    let question_ids: Vec<i64> = question_rows.iter().map(|q| q.id).collect();

    let answer_rows: Vec<AnswerRow> = if question_ids.is_empty() {
        Vec::new()
    } else {
        answers_dsl::answers
            .filter(answers_dsl::question_id.eq_any(&question_ids))
            .order_by(answers_dsl::id.asc())
            .load(conn)?
    };

    let mut answers_by_question: HashMap<i64, Vec<AnswerTree>> = HashMap::new();
    for answer in answer_rows {
        answers_by_question
            .entry(answer.question_id)
            .or_default()
            .push(AnswerTree {
                id: answer.id,
                content: answer.content,
                is_correct: answer.is_correct,
            });
    }

    let mut questions_by_test: HashMap<i64, Vec<QuestionTree>> = HashMap::new();
    for question in question_rows {
        let answers = answers_by_question.remove(&question.id).unwrap_or_default();
        questions_by_test
            .entry(question.final_test_id)
            .or_default()
            .push(QuestionTree {
                id: question.id,
                order: question.order,
                content: question.content,
                answers,
            });
    }

    for test in test_rows {
        let questions = questions_by_test.remove(&test.id).unwrap_or_default();
        content_by_lesson.insert(
            test.lesson_id,
            LessonContent::FinalTest {
                estimated_duration: test.estimated_duration,
                passing_score: test.passing_score,
                questions,
            },
        );
    }

    Ok(content_by_lesson)
}

/// Pairs a lesson row with its content variant, enforcing the
/// one-matching-content-row invariant: a missing or mismatched row surfaces
/// as an internal error, never a silently skipped lesson.
fn assemble_lesson_tree(
    lesson_row: LessonRow,
    content_by_lesson: &mut HashMap<i64, LessonContent>,
) -> Result<LessonTree, AppError> {
    let lesson_type = LessonType::parse(&lesson_row.lesson_type).ok_or_else(|| {
        AppError::InternalServerError(anyhow!(
            "Lesson {} has unknown lesson_type '{}'",
            lesson_row.id,
            lesson_row.lesson_type
        ))
    })?;

    let content = content_by_lesson.remove(&lesson_row.id).ok_or_else(|| {
        AppError::InternalServerError(anyhow!(
            "Lesson {} ({}) has no content row",
            lesson_row.id,
            lesson_row.lesson_type
        ))
    })?;

    let content_matches = matches!(
        (lesson_type, &content),
        (LessonType::Video, LessonContent::Video { .. })
            | (LessonType::Coding, LessonContent::Coding { .. })
            | (LessonType::FinalTest, LessonContent::FinalTest { .. })
    );
    if !content_matches {
        return Err(AppError::InternalServerError(anyhow!(
            "Lesson {} content row does not match its {} discriminator",
            lesson_row.id,
            lesson_row.lesson_type
        )));
    }

    Ok(LessonTree {
        id: lesson_row.id,
        module_id: lesson_row.module_id,
        title: lesson_row.title,
        description: lesson_row.description,
        lesson_type,
        duration: lesson_row.duration,
        is_preview: lesson_row.is_preview,
        content,
    })
}

fn assemble_module_tree(module_row: ModuleRow, lessons: Vec<LessonTree>) -> ModuleTree {
    ModuleTree {
        id: module_row.id,
        course_id: module_row.course_id,
        order: module_row.order,
        title: module_row.title,
        description: module_row.description,
        video_url: module_row.video_url,
        video_thumbnail_url: module_row.video_thumbnail_url,
        video_duration: module_row.video_duration,
        lessons,
    }
}
