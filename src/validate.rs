use crate::errors::AppError;
use crate::model::lesson::LessonType;
use crate::payloads::course::CreateCoursePayload;
use crate::payloads::lesson::{LessonSpec, QuestionSpec};
use crate::payloads::module::ModuleSpec;
use bigdecimal::BigDecimal;
use url::Url;

/// Shape and business-rule checks for an incoming course tree. Runs before
/// any transaction is opened so client input errors never cost a rollback.
pub fn validate_course_payload(payload: &CreateCoursePayload) -> Result<(), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Course title must not be empty.".to_string(),
        ));
    }
    if payload.price < BigDecimal::from(0) {
        return Err(AppError::UnprocessableEntity(format!(
            "Course price must not be negative (got {}).",
            payload.price
        )));
    }
    for module in &payload.modules {
        validate_module_spec(module)?;
    }
    Ok(())
}

pub fn validate_module_spec(spec: &ModuleSpec) -> Result<(), AppError> {
    if spec.title.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Module title must not be empty.".to_string(),
        ));
    }
    if let Some(url) = &spec.video_url {
        validate_url(url, "module preview video")?;
    }
    for lesson in &spec.lessons {
        validate_lesson_spec(lesson)?;
    }
    Ok(())
}

/// A lesson spec must carry exactly the one content payload matching its
/// declared `lesson_type`.
pub fn validate_lesson_spec(spec: &LessonSpec) -> Result<(), AppError> {
    if spec.title.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Lesson title must not be empty.".to_string(),
        ));
    }

    match (
        spec.lesson_type,
        &spec.video_data,
        &spec.coding_data,
        &spec.final_test_data,
    ) {
        (LessonType::Video, Some(video_data), None, None) => {
            validate_url(&video_data.url, "lesson video")?;
        }
        (LessonType::Coding, None, Some(coding_data), None) => {
            if coding_data.language.trim().is_empty() {
                return Err(AppError::UnprocessableEntity(format!(
                    "Coding lesson '{}' must specify a language.",
                    spec.title
                )));
            }
            if coding_data.problem.trim().is_empty() || coding_data.solution.trim().is_empty() {
                return Err(AppError::UnprocessableEntity(format!(
                    "Coding lesson '{}' must include a problem statement and a solution.",
                    spec.title
                )));
            }
        }
        (LessonType::FinalTest, None, None, Some(final_test_data)) => {
            validate_questions(&final_test_data.questions)?;
        }
        _ => {
            return Err(AppError::UnprocessableEntity(format!(
                "Lesson '{}' declares type {} but does not carry exactly the matching content payload.",
                spec.title,
                spec.lesson_type.as_str()
            )));
        }
    }
    Ok(())
}

/// Every question needs at least one answer and at least one answer marked
/// correct. Used on create and on final-test question replacement.
pub fn validate_questions(questions: &[QuestionSpec]) -> Result<(), AppError> {
    for question in questions {
        if question.content.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "Question content must not be empty.".to_string(),
            ));
        }
        if question.answers.is_empty() {
            return Err(AppError::UnprocessableEntity(format!(
                "Question '{}' must have at least one answer.",
                question.content
            )));
        }
        if !question.answers.iter().any(|a| a.is_correct) {
            return Err(AppError::UnprocessableEntity(format!(
                "Question '{}' must have at least one correct answer.",
                question.content
            )));
        }
    }
    Ok(())
}

pub fn validate_url(raw: &str, what: &str) -> Result<(), AppError> {
    Url::parse(raw).map_err(|e| {
        AppError::UnprocessableEntity(format!("Invalid {} URL '{}': {}", what, raw, e))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::lesson::{AnswerSpec, CodingData, FinalTestData, VideoData};

    fn video_lesson() -> LessonSpec {
        LessonSpec {
            title: "Intro".to_string(),
            description: "Intro video".to_string(),
            lesson_type: LessonType::Video,
            duration: Some(300),
            is_preview: true,
            video_data: Some(VideoData {
                url: "https://cdn.example.com/intro.mp4".to_string(),
                thumbnail_url: None,
                duration: 300,
            }),
            coding_data: None,
            final_test_data: None,
        }
    }

    fn question(content: &str, answers: Vec<AnswerSpec>) -> QuestionSpec {
        QuestionSpec {
            content: content.to_string(),
            order: None,
            answers,
        }
    }

    fn answer(content: &str, is_correct: bool) -> AnswerSpec {
        AnswerSpec {
            content: content.to_string(),
            is_correct,
        }
    }

    #[test]
    fn accepts_well_formed_video_lesson() {
        assert!(validate_lesson_spec(&video_lesson()).is_ok());
    }

    #[test]
    fn rejects_lesson_missing_declared_content() {
        let mut spec = video_lesson();
        spec.video_data = None;
        assert!(matches!(
            validate_lesson_spec(&spec),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn rejects_lesson_with_extra_content_payload() {
        let mut spec = video_lesson();
        spec.coding_data = Some(CodingData {
            language: "python".to_string(),
            problem: "p".to_string(),
            hint: None,
            solution: "s".to_string(),
            starter_code: None,
        });
        assert!(matches!(
            validate_lesson_spec(&spec),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn rejects_mismatched_content_kind() {
        let mut spec = video_lesson();
        spec.lesson_type = LessonType::Coding;
        assert!(matches!(
            validate_lesson_spec(&spec),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn rejects_unparseable_video_url() {
        let mut spec = video_lesson();
        spec.video_data.as_mut().unwrap().url = "not a url".to_string();
        assert!(matches!(
            validate_lesson_spec(&spec),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn rejects_question_without_answers() {
        let questions = vec![question("Q1", vec![])];
        assert!(matches!(
            validate_questions(&questions),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn rejects_question_without_correct_answer() {
        let questions = vec![question("Q1", vec![answer("A", false), answer("B", false)])];
        assert!(matches!(
            validate_questions(&questions),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn accepts_final_test_lesson_with_valid_questions() {
        let spec = LessonSpec {
            title: "Final".to_string(),
            description: "Final test".to_string(),
            lesson_type: LessonType::FinalTest,
            duration: None,
            is_preview: false,
            video_data: None,
            coding_data: None,
            final_test_data: Some(FinalTestData {
                estimated_duration: 30,
                passing_score: 70.0,
                questions: vec![question("Q1", vec![answer("A", true), answer("B", false)])],
            }),
        };
        assert!(validate_lesson_spec(&spec).is_ok());
    }
}
