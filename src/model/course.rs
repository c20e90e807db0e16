use crate::model::module::ModuleTree;
use crate::schema::{course_topics, courses};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Insertable, Debug)]
#[diesel(table_name = courses)]
pub struct NewCourse {
    pub instructor_id: i64,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: Option<i32>,
    pub is_published: bool,
    // created_at, updated_at have DB defaults
}

#[derive(Insertable, Debug)]
#[diesel(table_name = course_topics)]
pub struct NewCourseTopic {
    pub course_id: i64,
    pub topic_id: i64,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = courses)]
pub struct CourseChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub duration: Option<i32>,
    pub is_published: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Debug, Clone)]
pub struct CourseRow {
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: Option<i32>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully hydrated course subtree: modules, lessons, content, questions,
/// answers and topic links, the shape returned by every read endpoint and by
/// create/update calls after a successful mutation.
#[derive(Serialize, Deserialize, Debug)]
pub struct CourseTree {
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: Option<i32>,
    pub is_published: bool,
    pub topic_ids: Vec<i64>,
    pub modules: Vec<ModuleTree>,
}
