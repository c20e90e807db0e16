use axum::http::StatusCode;
use bigdecimal::BigDecimal;
use coursehub_server::model::course::CourseTree;
use coursehub_server::model::lesson::{LessonContent, LessonTree, LessonType};
use coursehub_server::model::module::ModuleTree;
use coursehub_server::payloads::course::{CreateCoursePayload, OrderAssignment};
use coursehub_server::payloads::lesson::{
    AnswerSpec, CodingData, CreateLessonPayload, DeleteLessonPayload, FinalTestData, QuestionSpec,
    ReorderQuestionsPayload, UpdateCodingExercisePayload, UpdateFinalTestPayload,
    UpdateLessonPayload, UpdateVideoLessonPayload, VideoData,
};
use coursehub_server::payloads::module::CreateModulePayload;
use coursehub_server::response::ApiResponse;
use coursehub_server::schema;
use diesel::prelude::*;
use float_cmp::approx_eq;

mod helpers;
use helpers::{
    count_answers, count_coding_contents, count_final_tests, count_lessons, count_questions,
    count_submissions, count_video_contents, create_test_instructor, seed_submission,
    setup_test_environment,
};

async fn create_course_with_module(
    server: &helpers::TestServer,
    pool: &helpers::TestPool,
) -> i64 {
    let instructor_id = create_test_instructor(pool, 1, "creator@test.com", "Creator").await;
    let payload = CreateCoursePayload {
        instructor_id,
        title: "Lesson host".to_string(),
        description: "course holding one module".to_string(),
        price: BigDecimal::from(0),
        duration: None,
        is_published: false,
        topic_ids: vec![],
        modules: vec![],
    };
    let response = server.post("/instructor/create_course").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<CourseTree> = response.json();
    let course_id = body.data.expect("course should be created").id;

    let response = server
        .post("/instructor/create_module")
        .json(&CreateModulePayload {
            course_id,
            title: "Only module".to_string(),
            description: "holds the lessons under test".to_string(),
            order: None,
            video_url: None,
            video_thumbnail_url: None,
            video_duration: None,
            lessons: vec![],
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<ModuleTree> = response.json();
    body.data.expect("module should be created").id
}

fn video_payload(module_id: i64) -> CreateLessonPayload {
    CreateLessonPayload {
        module_id,
        title: "Watch this".to_string(),
        description: "a video".to_string(),
        lesson_type: LessonType::Video,
        duration: Some(240),
        is_preview: false,
        video_data: Some(VideoData {
            url: "https://cdn.example.com/videos/lesson.mp4".to_string(),
            thumbnail_url: None,
            duration: 240,
        }),
        coding_data: None,
        final_test_data: None,
    }
}

fn coding_payload(module_id: i64) -> CreateLessonPayload {
    CreateLessonPayload {
        module_id,
        title: "Code this".to_string(),
        description: "an exercise".to_string(),
        lesson_type: LessonType::Coding,
        duration: Some(600),
        is_preview: false,
        video_data: None,
        coding_data: Some(CodingData {
            language: "rust".to_string(),
            problem: "Implement FizzBuzz.".to_string(),
            hint: None,
            solution: "fn fizzbuzz() {}".to_string(),
            starter_code: None,
        }),
        final_test_data: None,
    }
}

fn final_test_payload(module_id: i64) -> CreateLessonPayload {
    CreateLessonPayload {
        module_id,
        title: "Prove it".to_string(),
        description: "the test".to_string(),
        lesson_type: LessonType::FinalTest,
        duration: None,
        is_preview: false,
        video_data: None,
        coding_data: None,
        final_test_data: Some(FinalTestData {
            estimated_duration: 20,
            passing_score: 75.0,
            questions: vec![
                QuestionSpec {
                    content: "Q1".to_string(),
                    order: None,
                    answers: vec![
                        AnswerSpec {
                            content: "right".to_string(),
                            is_correct: true,
                        },
                        AnswerSpec {
                            content: "wrong".to_string(),
                            is_correct: false,
                        },
                    ],
                },
                QuestionSpec {
                    content: "Q2".to_string(),
                    order: None,
                    answers: vec![
                        AnswerSpec {
                            content: "also right".to_string(),
                            is_correct: true,
                        },
                        AnswerSpec {
                            content: "also wrong".to_string(),
                            is_correct: false,
                        },
                    ],
                },
            ],
        }),
    }
}

async fn create_lesson(server: &helpers::TestServer, payload: &CreateLessonPayload) -> LessonTree {
    let response = server.post("/instructor/create_lesson").json(payload).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<LessonTree> = response.json();
    body.data.expect("create_lesson should return the tree")
}

// create_lesson

#[tokio::test]
async fn test_create_lesson_variants_are_exclusive() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;

    let video = create_lesson(&server, &video_payload(module_id)).await;
    let coding = create_lesson(&server, &coding_payload(module_id)).await;

    assert_eq!(video.lesson_type, LessonType::Video);
    assert!(matches!(video.content, LessonContent::Video { .. }));
    assert_eq!(coding.lesson_type, LessonType::Coding);
    assert!(matches!(coding.content, LessonContent::Coding { .. }));

    // one content row per lesson, in the matching table only
    assert_eq!(count_lessons(&pool).await, 2);
    assert_eq!(count_video_contents(&pool).await, 1);
    assert_eq!(count_coding_contents(&pool).await, 1);
    assert_eq!(count_final_tests(&pool).await, 0);
}

#[tokio::test]
async fn test_create_lesson_mismatched_content_returns_422() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;

    let mut payload = video_payload(module_id);
    payload.coding_data = coding_payload(module_id).coding_data;

    let response = server.post("/instructor/create_lesson").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(count_lessons(&pool).await, 0);
}

#[tokio::test]
async fn test_create_lesson_unknown_module_returns_404() {
    let (server, pool) = setup_test_environment().await;
    create_test_instructor(&pool, 1, "creator@test.com", "Creator").await;

    let response = server
        .post("/instructor/create_lesson")
        .json(&video_payload(424242))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(count_lessons(&pool).await, 0);
}

// scalar and per-variant updates

#[tokio::test]
async fn test_update_lesson_scalars() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &video_payload(module_id)).await;

    let response = server
        .post("/instructor/update_lesson")
        .json(&UpdateLessonPayload {
            lesson_id: lesson.id,
            title: Some("Watch this instead".to_string()),
            description: None,
            duration: None,
            is_preview: Some(true),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<LessonTree> = response.json();
    let updated = body.data.unwrap();

    assert_eq!(updated.title, "Watch this instead");
    assert!(updated.is_preview);
    assert_eq!(updated.description, "a video");
    // content untouched by a scalar update
    match updated.content {
        LessonContent::Video { url, .. } => {
            assert_eq!(url, "https://cdn.example.com/videos/lesson.mp4")
        }
        other => panic!("expected Video content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_video_lesson_rewrites_video_row() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &video_payload(module_id)).await;

    let response = server
        .post("/instructor/update_video_lesson")
        .json(&UpdateVideoLessonPayload {
            lesson_id: lesson.id,
            url: Some("https://cdn.example.com/videos/lesson-hd.mp4".to_string()),
            thumbnail_url: Some("https://cdn.example.com/thumbs/lesson.jpg".to_string()),
            duration: None,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<LessonTree> = response.json();
    match body.data.unwrap().content {
        LessonContent::Video {
            url,
            thumbnail_url,
            duration,
        } => {
            assert_eq!(url, "https://cdn.example.com/videos/lesson-hd.mp4");
            assert_eq!(
                thumbnail_url.as_deref(),
                Some("https://cdn.example.com/thumbs/lesson.jpg")
            );
            assert_eq!(duration, 240);
        }
        other => panic!("expected Video content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_video_lesson_rejects_unparseable_url() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &video_payload(module_id)).await;

    let response = server
        .post("/instructor/update_video_lesson")
        .json(&UpdateVideoLessonPayload {
            lesson_id: lesson.id,
            url: Some("not a url".to_string()),
            thumbnail_url: None,
            duration: None,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // stored URL is untouched
    let response = server
        .get("/content/get_lesson_data")
        .add_query_param("lesson_id", lesson.id)
        .await;
    let body: ApiResponse<LessonTree> = response.json();
    match body.data.unwrap().content {
        LessonContent::Video { url, .. } => {
            assert_eq!(url, "https://cdn.example.com/videos/lesson.mp4")
        }
        other => panic!("expected Video content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_video_lesson_on_coding_lesson_returns_422() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &coding_payload(module_id)).await;

    let response = server
        .post("/instructor/update_video_lesson")
        .json(&UpdateVideoLessonPayload {
            lesson_id: lesson.id,
            url: Some("https://cdn.example.com/videos/nope.mp4".to_string()),
            thumbnail_url: None,
            duration: None,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_coding_exercise() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &coding_payload(module_id)).await;

    let response = server
        .post("/instructor/update_coding_exercise")
        .json(&UpdateCodingExercisePayload {
            lesson_id: lesson.id,
            language: None,
            problem: None,
            hint: Some("Use the modulo operator.".to_string()),
            solution: None,
            starter_code: Some("fn fizzbuzz() { todo!() }".to_string()),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<LessonTree> = response.json();
    match body.data.unwrap().content {
        LessonContent::Coding {
            language,
            hint,
            starter_code,
            ..
        } => {
            assert_eq!(language, "rust");
            assert_eq!(hint.as_deref(), Some("Use the modulo operator."));
            assert_eq!(starter_code.as_deref(), Some("fn fizzbuzz() { todo!() }"));
        }
        other => panic!("expected Coding content, got {:?}", other),
    }
}

// final test updates

#[tokio::test]
async fn test_update_final_test_replaces_questions_in_full() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &final_test_payload(module_id)).await;

    assert_eq!(count_questions(&pool).await, 2);
    assert_eq!(count_answers(&pool).await, 4);

    let response = server
        .post("/instructor/update_final_test")
        .json(&UpdateFinalTestPayload {
            lesson_id: lesson.id,
            estimated_duration: None,
            passing_score: Some(80.0),
            questions: Some(vec![QuestionSpec {
                content: "The only question now".to_string(),
                order: None,
                answers: vec![
                    AnswerSpec {
                        content: "A".to_string(),
                        is_correct: false,
                    },
                    AnswerSpec {
                        content: "B".to_string(),
                        is_correct: true,
                    },
                    AnswerSpec {
                        content: "C".to_string(),
                        is_correct: false,
                    },
                ],
            }]),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<LessonTree> = response.json();
    match body.data.unwrap().content {
        LessonContent::FinalTest {
            estimated_duration,
            passing_score,
            questions,
        } => {
            assert_eq!(estimated_duration, 20);
            assert!(approx_eq!(f64, passing_score, 80.0, ulps = 2));
            assert_eq!(questions.len(), 1);
            assert_eq!(questions[0].content, "The only question now");
            assert_eq!(questions[0].answers.len(), 3);
        }
        other => panic!("expected FinalTest content, got {:?}", other),
    }

    // old question rows are gone, not merged
    assert_eq!(count_questions(&pool).await, 1);
    assert_eq!(count_answers(&pool).await, 3);
}

#[tokio::test]
async fn test_update_final_test_invalid_questions_leave_rows_untouched() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &final_test_payload(module_id)).await;

    let response = server
        .post("/instructor/update_final_test")
        .json(&UpdateFinalTestPayload {
            lesson_id: lesson.id,
            estimated_duration: None,
            passing_score: None,
            questions: Some(vec![QuestionSpec {
                content: "Answerless".to_string(),
                order: None,
                answers: vec![],
            }]),
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(count_questions(&pool).await, 2);
    assert_eq!(count_answers(&pool).await, 4);
}

#[tokio::test]
async fn test_update_final_test_on_video_lesson_returns_422() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &video_payload(module_id)).await;

    let response = server
        .post("/instructor/update_final_test")
        .json(&UpdateFinalTestPayload {
            lesson_id: lesson.id,
            estimated_duration: Some(10),
            passing_score: None,
            questions: None,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

// reorder_questions

#[tokio::test]
async fn test_reorder_questions() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &final_test_payload(module_id)).await;

    let (first_q, second_q) = match &lesson.content {
        LessonContent::FinalTest { questions, .. } => (questions[0].id, questions[1].id),
        other => panic!("expected FinalTest content, got {:?}", other),
    };

    let response = server
        .post("/instructor/reorder_questions")
        .json(&ReorderQuestionsPayload {
            lesson_id: lesson.id,
            items: vec![
                OrderAssignment {
                    id: first_q,
                    order: 2,
                },
                OrderAssignment {
                    id: second_q,
                    order: 1,
                },
            ],
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/content/get_lesson_data")
        .add_query_param("lesson_id", lesson.id)
        .await;
    let body: ApiResponse<LessonTree> = response.json();
    match body.data.unwrap().content {
        LessonContent::FinalTest { questions, .. } => {
            assert_eq!(questions[0].id, second_q);
            assert_eq!(questions[1].id, first_q);
        }
        other => panic!("expected FinalTest content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reorder_questions_on_non_test_lesson_returns_422() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &video_payload(module_id)).await;

    let response = server
        .post("/instructor/reorder_questions")
        .json(&ReorderQuestionsPayload {
            lesson_id: lesson.id,
            items: vec![OrderAssignment { id: 1, order: 1 }],
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

// delete_lesson

#[tokio::test]
async fn test_delete_coding_lesson_removes_submissions() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &coding_payload(module_id)).await;

    let lesson_id = lesson.id;
    let conn = pool.get().await.unwrap();
    let coding_content_id: i64 = conn
        .interact(move |conn| {
            schema::coding_contents::table
                .filter(schema::coding_contents::lesson_id.eq(lesson_id))
                .select(schema::coding_contents::id)
                .first::<i64>(conn)
        })
        .await
        .unwrap()
        .unwrap();
    seed_submission(&pool, coding_content_id, "fn main() {}").await;
    assert_eq!(count_submissions(&pool).await, 1);

    let response = server
        .post("/instructor/delete_lesson")
        .json(&DeleteLessonPayload { lesson_id })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert_eq!(count_lessons(&pool).await, 0);
    assert_eq!(count_coding_contents(&pool).await, 0);
    assert_eq!(count_submissions(&pool).await, 0);

    let response = server
        .get("/content/get_lesson_data")
        .add_query_param("lesson_id", lesson_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_final_test_lesson_removes_question_tree() {
    let (server, pool) = setup_test_environment().await;
    let module_id = create_course_with_module(&server, &pool).await;
    let lesson = create_lesson(&server, &final_test_payload(module_id)).await;

    let response = server
        .post("/instructor/delete_lesson")
        .json(&DeleteLessonPayload {
            lesson_id: lesson.id,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    assert_eq!(count_lessons(&pool).await, 0);
    assert_eq!(count_final_tests(&pool).await, 0);
    assert_eq!(count_questions(&pool).await, 0);
    assert_eq!(count_answers(&pool).await, 0);
}

#[tokio::test]
async fn test_delete_lesson_unknown_id_returns_404() {
    let (server, _pool) = setup_test_environment().await;

    let response = server
        .post("/instructor/delete_lesson")
        .json(&DeleteLessonPayload { lesson_id: 424242 })
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
