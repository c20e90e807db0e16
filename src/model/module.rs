use crate::model::lesson::LessonTree;
use crate::schema::modules;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Insertable, Debug)]
#[diesel(table_name = modules)]
pub struct NewModule {
    pub course_id: i64,
    pub order: i32,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = modules)]
pub struct ModuleChangeset {
    pub order: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
}

#[derive(Queryable, Debug, Clone)]
pub struct ModuleRow {
    pub id: i64,
    pub course_id: i64,
    pub order: i32,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ModuleTree {
    pub id: i64,
    pub course_id: i64,
    pub order: i32,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
    pub lessons: Vec<LessonTree>,
}
