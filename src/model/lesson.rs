use crate::schema::{
    answers, coding_contents, final_test_contents, lessons, questions, video_contents,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Discriminator for the three lesson content kinds. Stored as a varchar in
/// the `lessons` table; every lesson owns exactly one content row of the
/// matching kind.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Video,
    Coding,
    FinalTest,
}

impl LessonType {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Video => "VIDEO",
            LessonType::Coding => "CODING",
            LessonType::FinalTest => "FINAL_TEST",
        }
    }

    pub fn parse(value: &str) -> Option<LessonType> {
        match value {
            "VIDEO" => Some(LessonType::Video),
            "CODING" => Some(LessonType::Coding),
            "FINAL_TEST" => Some(LessonType::FinalTest),
            _ => None,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = lessons)]
pub struct NewLesson {
    pub module_id: i64,
    pub title: String,
    pub description: String,
    pub lesson_type: String,
    pub duration: Option<i32>,
    pub is_preview: bool,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = lessons)]
pub struct LessonChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub is_preview: Option<bool>,
}

#[derive(Queryable, Debug, Clone)]
pub struct LessonRow {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub description: String,
    pub lesson_type: String,
    pub duration: Option<i32>,
    pub is_preview: bool,
}

// content variant rows

#[derive(Insertable, Debug)]
#[diesel(table_name = video_contents)]
pub struct NewVideoContent {
    pub lesson_id: i64,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = video_contents)]
pub struct VideoContentChangeset {
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i32>,
}

#[derive(Queryable, Debug, Clone)]
pub struct VideoContentRow {
    pub id: i64,
    pub lesson_id: i64,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = coding_contents)]
pub struct NewCodingContent {
    pub lesson_id: i64,
    pub language: String,
    pub problem: String,
    pub hint: Option<String>,
    pub solution: String,
    pub starter_code: Option<String>,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = coding_contents)]
pub struct CodingContentChangeset {
    pub language: Option<String>,
    pub problem: Option<String>,
    pub hint: Option<String>,
    pub solution: Option<String>,
    pub starter_code: Option<String>,
}

#[derive(Queryable, Debug, Clone)]
pub struct CodingContentRow {
    pub id: i64,
    pub lesson_id: i64,
    pub language: String,
    pub problem: String,
    pub hint: Option<String>,
    pub solution: String,
    pub starter_code: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = final_test_contents)]
pub struct NewFinalTestContent {
    pub lesson_id: i64,
    pub estimated_duration: i32,
    pub passing_score: f64,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = final_test_contents)]
pub struct FinalTestContentChangeset {
    pub estimated_duration: Option<i32>,
    pub passing_score: Option<f64>,
}

#[derive(Queryable, Debug, Clone)]
pub struct FinalTestContentRow {
    pub id: i64,
    pub lesson_id: i64,
    pub estimated_duration: i32,
    pub passing_score: f64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = questions)]
pub struct NewQuestion {
    pub final_test_id: i64,
    pub order: i32,
    pub content: String,
}

#[derive(Queryable, Debug, Clone)]
pub struct QuestionRow {
    pub id: i64,
    pub final_test_id: i64,
    pub order: i32,
    pub content: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = answers)]
pub struct NewAnswer {
    pub question_id: i64,
    pub content: String,
    pub is_correct: bool,
}

#[derive(Queryable, Debug, Clone)]
pub struct AnswerRow {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub is_correct: bool,
}

// hydrated tree responses

/// Application-layer tagged union over the three per-variant content tables.
/// Hydration fails with an internal error when a lesson's row set does not
/// match its discriminator, so a `LessonTree` can never carry zero or
/// mismatched content.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonContent {
    Video {
        url: String,
        thumbnail_url: Option<String>,
        duration: i32,
    },
    Coding {
        language: String,
        problem: String,
        hint: Option<String>,
        solution: String,
        starter_code: Option<String>,
    },
    FinalTest {
        estimated_duration: i32,
        passing_score: f64,
        questions: Vec<QuestionTree>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LessonTree {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub description: String,
    pub lesson_type: LessonType,
    pub duration: Option<i32>,
    pub is_preview: bool,
    pub content: LessonContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionTree {
    pub id: i64,
    pub order: i32,
    pub content: String,
    pub answers: Vec<AnswerTree>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnswerTree {
    pub id: i64,
    pub content: String,
    pub is_correct: bool,
}
