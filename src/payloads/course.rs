use crate::payloads::module::ModuleSpec;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateCoursePayload {
    pub instructor_id: i64,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub topic_ids: Vec<i64>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateCoursePayload {
    pub instructor_id: i64,
    pub course_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub duration: Option<i32>,
    pub is_published: Option<bool>,
    /// Full replace of the course's topic links when present.
    pub topic_ids: Option<Vec<i64>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteCoursePayload {
    pub instructor_id: i64,
    pub course_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GetCourseDataParams {
    pub course_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OrderAssignment {
    pub id: i64,
    pub order: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReorderModulesPayload {
    pub course_id: i64,
    pub items: Vec<OrderAssignment>,
}
