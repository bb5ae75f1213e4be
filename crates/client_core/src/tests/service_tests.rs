use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{ChapterId, GradeId, MaterialKind, SubjectId},
    error::FetchError,
    protocol::{DoubtRequest, ExplainRequest, FlashcardsGenerateRequest, QuizGenerateRequest},
};
use tokio::net::TcpListener;

use crate::service::{HttpStudyService, StudyService};

async fn list_grades() -> impl IntoResponse {
    Json(json!([
        {"id": 1, "level": "class_9", "description": "Ninth standard"}
    ]))
}

async fn grade_detail(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        Json(json!({"id": 1, "level": "class_9", "description": "Ninth standard"}))
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
    }
}

async fn list_subjects(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let all = [
        json!({"id": 5, "name": "physics", "description": "Mechanics", "grade": 1}),
        json!({"id": 6, "name": "history", "description": "Ancient india", "grade": 2}),
    ];
    let filtered: Vec<_> = all
        .into_iter()
        .filter(|subject| match params.get("grade_id") {
            Some(grade_id) => subject["grade"].to_string() == *grade_id,
            None => true,
        })
        .collect();
    Json(json!(filtered))
}

async fn list_chapters(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("subject_id").map(String::as_str) == Some("5") {
        Json(json!([
            {"id": 42, "title": "Motion", "description": "Kinematics", "chapter_number": 3,
             "content": "text", "materials": []}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn chapter_detail(Path(id): Path<i64>) -> impl IntoResponse {
    match id {
        42 => Json(json!({
            "id": 42,
            "title": "Motion",
            "description": "Kinematics",
            "chapter_number": 3,
            "content": "text",
            "materials": [
                {"id": 9, "title": "Motion notes", "material_type": "note", "source": "YouTube"}
            ],
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .into_response(),
        999 => (StatusCode::OK, "definitely not json").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn list_materials(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("chapter_id").map(String::as_str) == Some("42") {
        Json(json!([
            {"id": 9, "title": "Motion notes", "material_type": "note"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn fetch_videos(Path(id): Path<i64>) -> impl IntoResponse {
    Json(json!({
        "videos": [
            {"title": format!("Chapter {id} explained"), "channel": "Physics Lab",
             "thumbnail": "https://img.example/1.jpg", "video_id": "abc123"}
        ]
    }))
}

async fn generate_summary(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 7 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Chapter has no content to summarize"})),
        )
            .into_response();
    }
    Json(json!({"summary": "First point.\nSecond point.", "chapter_id": id})).into_response()
}

async fn generate_quiz(
    Path(id): Path<i64>,
    Json(request): Json<QuizGenerateRequest>,
) -> impl IntoResponse {
    if id == 500 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to generate quiz"})),
        )
            .into_response();
    }
    let questions: Vec<_> = (0..request.num_questions)
        .map(|i| json!({"question": format!("Question {i}"), "options": ["a", "b"], "correct_answer": 0}))
        .collect();
    Json(json!({"id": 3, "title": "AI Generated Quiz - Motion", "questions": questions}))
        .into_response()
}

async fn generate_flashcards(
    Path(_id): Path<i64>,
    Json(request): Json<FlashcardsGenerateRequest>,
) -> impl IntoResponse {
    let cards: Vec<_> = (0..request.num_cards)
        .map(|i| json!({"id": i, "question": format!("Q{i}"), "answer": format!("A{i}"), "created_at": null}))
        .collect();
    Json(json!(cards))
}

async fn ask_doubt(Json(request): Json<DoubtRequest>) -> impl IntoResponse {
    Json(json!({
        "solution": "Step 1: read the problem.",
        "problem": request.problem_description
    }))
}

async fn explain(Json(request): Json<ExplainRequest>) -> impl IntoResponse {
    Json(json!({
        "concept": request.concept,
        "explanation": format!("{} for grade {}", request.concept, request.grade)
    }))
}

fn study_router() -> Router {
    Router::new()
        .route("/api/grades/", get(list_grades))
        .route("/api/grades/:id/", get(grade_detail))
        .route("/api/subjects/", get(list_subjects))
        .route("/api/chapters/", get(list_chapters))
        .route("/api/chapters/:id/", get(chapter_detail))
        .route("/api/materials/", get(list_materials))
        .route("/api/chapters/:id/fetch_videos/", get(fetch_videos))
        .route("/api/chapters/:id/generate_summary/", post(generate_summary))
        .route("/api/chapters/:id/generate_quiz/", post(generate_quiz))
        .route(
            "/api/chapters/:id/generate_flashcards/",
            post(generate_flashcards),
        )
        .route("/api/doubt-solver/ask_doubt/", post(ask_doubt))
        .route("/api/explain/explain/", post(explain))
}

async fn spawn_study_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, study_router()).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn decodes_grade_catalog() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let grades = service.list_grades().await.expect("grades");
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].id, GradeId(1));
    assert_eq!(grades[0].level, "class_9");
}

#[tokio::test]
async fn subject_listing_carries_the_grade_filter() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let subjects = service
        .list_subjects(Some(GradeId(1)))
        .await
        .expect("subjects");
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].name, "physics");
    assert_eq!(subjects[0].grade, GradeId(1));

    let all = service.list_subjects(None).await.expect("all subjects");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn chapter_listing_carries_the_subject_filter() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let chapters = service
        .list_chapters(Some(SubjectId(5)))
        .await
        .expect("chapters");
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].id, ChapterId(42));
    assert_eq!(chapters[0].chapter_number, 3);
}

#[tokio::test]
async fn chapter_payload_includes_embedded_materials() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let chapter = service.get_chapter(ChapterId(42)).await.expect("chapter");
    assert_eq!(chapter.title, "Motion");
    assert_eq!(chapter.materials.len(), 1);
    assert_eq!(chapter.materials[0].material_type, MaterialKind::Note);
    assert!(chapter.created_at.is_some());
}

#[tokio::test]
async fn material_listing_carries_the_chapter_filter() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let materials = service
        .list_materials(Some(ChapterId(42)))
        .await
        .expect("materials");
    assert_eq!(materials.len(), 1);
    let none = service
        .list_materials(Some(ChapterId(1)))
        .await
        .expect("empty");
    assert!(none.is_empty());
}

#[tokio::test]
async fn videos_are_unwrapped_from_their_envelope() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let videos = service.fetch_videos(ChapterId(42)).await.expect("videos");
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].video_id, "abc123");
    assert_eq!(videos[0].channel, "Physics Lab");
}

#[tokio::test]
async fn missing_node_maps_to_not_found() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let err = service.get_grade(GradeId(77)).await.unwrap_err();
    assert_eq!(err, FetchError::NotFound);
}

#[tokio::test]
async fn contentless_chapter_maps_to_no_content() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let err = service.generate_summary(ChapterId(7)).await.unwrap_err();
    assert_eq!(err, FetchError::NoContent);
}

#[tokio::test]
async fn server_error_maps_to_transient_with_detail() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let err = service.generate_quiz(ChapterId(500), 10).await.unwrap_err();
    match err {
        FetchError::Transient(detail) => {
            assert!(detail.contains("Failed to generate quiz"), "detail: {detail}")
        }
        other => panic!("expected Transient, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_schema_error() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let err = service.get_chapter(ChapterId(999)).await.unwrap_err();
    assert!(matches!(err, FetchError::Schema(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_maps_to_transient() {
    // Nothing listens on this port.
    let service = HttpStudyService::new("http://127.0.0.1:9");
    let err = service.list_grades().await.unwrap_err();
    assert!(matches!(err, FetchError::Transient(_)), "got {err:?}");
}

#[tokio::test]
async fn flashcard_request_carries_the_count() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let cards = service
        .generate_flashcards(ChapterId(42), 4)
        .await
        .expect("cards");
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0].question, "Q0");
    assert_eq!(cards[0].answer, "A0");
}

#[tokio::test]
async fn quiz_request_carries_the_question_count() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let quiz = service.generate_quiz(ChapterId(42), 3).await.expect("quiz");
    assert_eq!(quiz.title, "AI Generated Quiz - Motion");
    assert_eq!(quiz.questions.len(), 3);
}

#[tokio::test]
async fn summary_is_keyed_to_the_requested_chapter() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let summary = service.generate_summary(ChapterId(42)).await.expect("summary");
    assert_eq!(summary.chapter_id, ChapterId(42));
    assert_eq!(summary.summary.lines().count(), 2);
}

#[tokio::test]
async fn doubt_and_explanation_round_trip_their_inputs() {
    let service = HttpStudyService::new(spawn_study_server().await);
    let solution = service
        .solve_doubt("why does ice float?")
        .await
        .expect("solution");
    assert_eq!(solution.problem, "why does ice float?");
    assert!(!solution.solution.is_empty());

    let explanation = service
        .explain_concept("Photosynthesis", "9")
        .await
        .expect("explanation");
    assert_eq!(explanation.concept, "Photosynthesis");
    assert_eq!(explanation.explanation, "Photosynthesis for grade 9");
}
