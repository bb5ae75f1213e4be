//! Remote study service boundary: the trait the orchestration core is
//! constructed with, plus the reqwest-backed implementation of it.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Chapter, ChapterId, Grade, GradeId, Material, Subject, SubjectId},
    error::{ApiErrorBody, FetchError},
    protocol::{
        ChapterSummary, ConceptExplanation, DoubtRequest, DoubtSolution, ExplainRequest,
        Flashcard, FlashcardsGenerateRequest, Quiz, QuizGenerateRequest, Video, VideosResponse,
    },
};

/// Logical operations of the remote service. Implementations are injected
/// into [`crate::StudyClient`] at construction time; there is no implicit
/// process-wide client.
#[async_trait]
pub trait StudyService: Send + Sync {
    async fn list_grades(&self) -> Result<Vec<Grade>, FetchError>;
    async fn get_grade(&self, id: GradeId) -> Result<Grade, FetchError>;
    async fn list_subjects(&self, grade: Option<GradeId>) -> Result<Vec<Subject>, FetchError>;
    async fn get_subject(&self, id: SubjectId) -> Result<Subject, FetchError>;
    async fn list_chapters(&self, subject: Option<SubjectId>) -> Result<Vec<Chapter>, FetchError>;
    async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, FetchError>;
    async fn list_materials(&self, chapter: Option<ChapterId>)
        -> Result<Vec<Material>, FetchError>;
    async fn fetch_videos(&self, chapter: ChapterId) -> Result<Vec<Video>, FetchError>;
    async fn generate_summary(&self, chapter: ChapterId) -> Result<ChapterSummary, FetchError>;
    async fn generate_quiz(&self, chapter: ChapterId, count: u32) -> Result<Quiz, FetchError>;
    async fn generate_flashcards(
        &self,
        chapter: ChapterId,
        count: u32,
    ) -> Result<Vec<Flashcard>, FetchError>;
    async fn solve_doubt(&self, problem: &str) -> Result<DoubtSolution, FetchError>;
    async fn explain_concept(
        &self,
        concept: &str,
        grade: &str,
    ) -> Result<ConceptExplanation, FetchError>;
}

/// HTTP+JSON implementation against the study hub REST API.
pub struct HttpStudyService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStudyService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build on a caller-configured client (timeouts, proxies).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::Transient(err.to_string()))?;
        read_body(response, false).await
    }

    /// POST to a generation endpoint. The service signals a chapter without
    /// source material as 400, which maps to the distinct `NoContent` error.
    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| FetchError::Transient(err.to_string()))?;
        read_body(response, true).await
    }
}

async fn read_body<T: DeserializeOwned>(
    response: reqwest::Response,
    generation: bool,
) -> Result<T, FetchError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if generation && status == StatusCode::BAD_REQUEST {
        return Err(FetchError::NoContent);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Transient(transient_detail(status, &body)));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| FetchError::Transient(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| FetchError::Schema(err.to_string()))
}

fn transient_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(envelope) => format!("status {status}: {}", envelope.error),
        Err(_) => format!("status {status}"),
    }
}

#[async_trait]
impl StudyService for HttpStudyService {
    async fn list_grades(&self) -> Result<Vec<Grade>, FetchError> {
        self.get_json("grades/", &[]).await
    }

    async fn get_grade(&self, id: GradeId) -> Result<Grade, FetchError> {
        self.get_json(&format!("grades/{}/", id.0), &[]).await
    }

    async fn list_subjects(&self, grade: Option<GradeId>) -> Result<Vec<Subject>, FetchError> {
        let mut query = Vec::new();
        if let Some(id) = grade {
            query.push(("grade_id", id.0.to_string()));
        }
        self.get_json("subjects/", &query).await
    }

    async fn get_subject(&self, id: SubjectId) -> Result<Subject, FetchError> {
        self.get_json(&format!("subjects/{}/", id.0), &[]).await
    }

    async fn list_chapters(&self, subject: Option<SubjectId>) -> Result<Vec<Chapter>, FetchError> {
        let mut query = Vec::new();
        if let Some(id) = subject {
            query.push(("subject_id", id.0.to_string()));
        }
        self.get_json("chapters/", &query).await
    }

    async fn get_chapter(&self, id: ChapterId) -> Result<Chapter, FetchError> {
        self.get_json(&format!("chapters/{}/", id.0), &[]).await
    }

    async fn list_materials(
        &self,
        chapter: Option<ChapterId>,
    ) -> Result<Vec<Material>, FetchError> {
        let mut query = Vec::new();
        if let Some(id) = chapter {
            query.push(("chapter_id", id.0.to_string()));
        }
        self.get_json("materials/", &query).await
    }

    async fn fetch_videos(&self, chapter: ChapterId) -> Result<Vec<Video>, FetchError> {
        let response: VideosResponse = self
            .get_json(&format!("chapters/{}/fetch_videos/", chapter.0), &[])
            .await?;
        Ok(response.videos)
    }

    async fn generate_summary(&self, chapter: ChapterId) -> Result<ChapterSummary, FetchError> {
        self.post_json(
            &format!("chapters/{}/generate_summary/", chapter.0),
            &serde_json::json!({}),
        )
        .await
    }

    async fn generate_quiz(&self, chapter: ChapterId, count: u32) -> Result<Quiz, FetchError> {
        self.post_json(
            &format!("chapters/{}/generate_quiz/", chapter.0),
            &QuizGenerateRequest {
                num_questions: count,
            },
        )
        .await
    }

    async fn generate_flashcards(
        &self,
        chapter: ChapterId,
        count: u32,
    ) -> Result<Vec<Flashcard>, FetchError> {
        self.post_json(
            &format!("chapters/{}/generate_flashcards/", chapter.0),
            &FlashcardsGenerateRequest { num_cards: count },
        )
        .await
    }

    async fn solve_doubt(&self, problem: &str) -> Result<DoubtSolution, FetchError> {
        self.post_json(
            "doubt-solver/ask_doubt/",
            &DoubtRequest {
                problem_description: problem.to_string(),
            },
        )
        .await
    }

    async fn explain_concept(
        &self,
        concept: &str,
        grade: &str,
    ) -> Result<ConceptExplanation, FetchError> {
        self.post_json(
            "explain/explain/",
            &ExplainRequest {
                concept: concept.to_string(),
                grade: grade.to_string(),
            },
        )
        .await
    }
}
