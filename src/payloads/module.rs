use crate::payloads::lesson::LessonSpec;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModuleSpec {
    pub title: String,
    pub description: String,
    pub order: Option<i32>,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
    #[serde(default)]
    pub lessons: Vec<LessonSpec>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateModulePayload {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub order: Option<i32>,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
    #[serde(default)]
    pub lessons: Vec<LessonSpec>,
}

impl CreateModulePayload {
    pub fn into_spec(self) -> (i64, ModuleSpec) {
        let course_id = self.course_id;
        let spec = ModuleSpec {
            title: self.title,
            description: self.description,
            order: self.order,
            video_url: self.video_url,
            video_thumbnail_url: self.video_thumbnail_url,
            video_duration: self.video_duration,
            lessons: self.lessons,
        };
        (course_id, spec)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateModulePayload {
    pub module_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub video_url: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteModulePayload {
    pub module_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GetModuleDataParams {
    pub module_id: i64,
}
