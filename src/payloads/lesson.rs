use crate::model::lesson::LessonType;
use crate::payloads::course::OrderAssignment;
use serde::{Deserialize, Serialize};

/// One lesson in a create request. Exactly the content payload matching
/// `lesson_type` must be present; `validate::validate_lesson_spec` rejects
/// anything else before a transaction is opened.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LessonSpec {
    pub title: String,
    pub description: String,
    pub lesson_type: LessonType,
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_preview: bool,
    pub video_data: Option<VideoData>,
    pub coding_data: Option<CodingData>,
    pub final_test_data: Option<FinalTestData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VideoData {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CodingData {
    pub language: String,
    pub problem: String,
    pub hint: Option<String>,
    pub solution: String,
    pub starter_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FinalTestData {
    pub estimated_duration: i32,
    pub passing_score: f64,
    pub questions: Vec<QuestionSpec>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionSpec {
    pub content: String,
    pub order: Option<i32>,
    pub answers: Vec<AnswerSpec>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnswerSpec {
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateLessonPayload {
    pub module_id: i64,
    pub title: String,
    pub description: String,
    pub lesson_type: LessonType,
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_preview: bool,
    pub video_data: Option<VideoData>,
    pub coding_data: Option<CodingData>,
    pub final_test_data: Option<FinalTestData>,
}

impl CreateLessonPayload {
    pub fn into_spec(self) -> (i64, LessonSpec) {
        let module_id = self.module_id;
        let spec = LessonSpec {
            title: self.title,
            description: self.description,
            lesson_type: self.lesson_type,
            duration: self.duration,
            is_preview: self.is_preview,
            video_data: self.video_data,
            coding_data: self.coding_data,
            final_test_data: self.final_test_data,
        };
        (module_id, spec)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateLessonPayload {
    pub lesson_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub is_preview: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateVideoLessonPayload {
    pub lesson_id: i64,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateCodingExercisePayload {
    pub lesson_id: i64,
    pub language: Option<String>,
    pub problem: Option<String>,
    pub hint: Option<String>,
    pub solution: Option<String>,
    pub starter_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateFinalTestPayload {
    pub lesson_id: i64,
    pub estimated_duration: Option<i32>,
    pub passing_score: Option<f64>,
    /// Full replace of the test's question list when present.
    pub questions: Option<Vec<QuestionSpec>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteLessonPayload {
    pub lesson_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GetLessonDataParams {
    pub lesson_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReorderQuestionsPayload {
    /// Lesson id of the FINAL_TEST lesson whose questions are reordered.
    pub lesson_id: i64,
    pub items: Vec<OrderAssignment>,
}
