//! Request and response payloads for the study service REST boundary.

use serde::{Deserialize, Serialize};

use crate::domain::ChapterId;

/// Related video returned by the video lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideosResponse {
    pub videos: Vec<Video>,
}

/// Generated chapter summary, keyed to the chapter it was produced for.
/// The text is newline-delimited paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub chapter_id: ChapterId,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// Generated quiz. Question items are passed through unmodified; their
/// structure is owned by the service, not by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub questions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizGenerateRequest {
    pub num_questions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardsGenerateRequest {
    pub num_cards: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubtRequest {
    pub problem_description: String,
}

/// Solution text keyed to the problem that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubtSolution {
    pub problem: String,
    pub solution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub concept: String,
    pub grade: String,
}

/// Explanation text keyed to the concept that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptExplanation {
    pub concept: String,
    pub explanation: String,
}
