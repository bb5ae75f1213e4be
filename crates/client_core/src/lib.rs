//! Orchestration core for the study hub client: hierarchy navigation plus
//! per-chapter augmentation operations, each tracked by an independent
//! [`OperationSlot`]. Rendering code consumes read-only snapshots; it never
//! mutates core state directly.

use std::sync::Arc;

use shared::{
    domain::{Chapter, ChapterId, Grade, GradeId, Material, Subject, SubjectId},
    error::FetchError,
    protocol::{ChapterSummary, ConceptExplanation, DoubtSolution, Flashcard, Quiz, Video},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod error;
pub mod service;
pub mod slot;
pub mod validate;

pub use error::InvokeError;
pub use service::{HttpStudyService, StudyService};
pub use slot::{OperationSlot, RequestTicket, SlotState};

pub const DEFAULT_FLASHCARD_COUNT: u32 = 10;
pub const DEFAULT_QUIZ_QUESTION_COUNT: u32 = 10;

/// Augmentation operations available on the currently open chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterOperation {
    FetchVideos,
    GenerateSummary,
    GenerateFlashcards { count: Option<u32> },
    GenerateQuiz { count: Option<u32> },
}

/// Standalone AI utilities, not tied to the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantOperation {
    SolveDoubt { problem: String },
    ExplainConcept { concept: String, grade: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Read-only view of one operation slot for rendering.
#[derive(Debug, Clone)]
pub struct SlotView<T> {
    pub phase: SlotPhase,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T: Clone> SlotView<T> {
    fn of(slot: &OperationSlot<T>) -> Self {
        match slot.state() {
            SlotState::Idle => Self {
                phase: SlotPhase::Idle,
                result: None,
                error: None,
            },
            SlotState::Pending => Self {
                phase: SlotPhase::Pending,
                result: None,
                error: None,
            },
            SlotState::Succeeded(value) => Self {
                phase: SlotPhase::Succeeded,
                result: Some(value.clone()),
                error: None,
            },
            SlotState::Failed(err) => Self {
                phase: SlotPhase::Failed,
                result: None,
                error: Some(err.user_message()),
            },
        }
    }
}

/// Read-only view of a resolved hierarchy node or children list.
#[derive(Debug, Clone)]
pub struct NodeView<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Clone> NodeView<T> {
    fn of(slot: &OperationSlot<T>) -> Self {
        match slot.state() {
            SlotState::Idle => Self {
                data: None,
                loading: false,
                error: None,
            },
            SlotState::Pending => Self {
                data: None,
                loading: true,
                error: None,
            },
            SlotState::Succeeded(value) => Self {
                data: Some(value.clone()),
                loading: false,
                error: None,
            },
            SlotState::Failed(err) => Self {
                data: None,
                loading: false,
                error: Some(err.user_message()),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GradePage {
    pub grade: NodeView<Grade>,
    pub subjects: NodeView<Vec<Subject>>,
}

#[derive(Debug, Clone)]
pub struct SubjectPage {
    pub subject: NodeView<Subject>,
    pub chapters: NodeView<Vec<Chapter>>,
}

/// Snapshot of the chapter page: the resolved node plus the four
/// independently-lifecycled augmentation slots.
#[derive(Debug, Clone)]
pub struct ChapterWorkspace {
    pub chapter: NodeView<Chapter>,
    pub videos: SlotView<Vec<Video>>,
    pub summary: SlotView<ChapterSummary>,
    pub flashcards: SlotView<Vec<Flashcard>>,
    pub quiz: SlotView<Quiz>,
}

#[derive(Debug, Clone)]
pub struct AssistantPanel {
    pub doubt: SlotView<DoubtSolution>,
    pub explanation: SlotView<ConceptExplanation>,
}

#[derive(Default)]
struct GradePageState {
    node: OperationSlot<Grade>,
    subjects: OperationSlot<Vec<Subject>>,
}

#[derive(Default)]
struct SubjectPageState {
    node: OperationSlot<Subject>,
    chapters: OperationSlot<Vec<Chapter>>,
}

#[derive(Default)]
struct ChapterPageState {
    active: Option<ChapterId>,
    node: OperationSlot<Chapter>,
    videos: OperationSlot<Vec<Video>>,
    summary: OperationSlot<ChapterSummary>,
    flashcards: OperationSlot<Vec<Flashcard>>,
    quiz: OperationSlot<Quiz>,
}

#[derive(Default)]
struct AssistantState {
    doubt: OperationSlot<DoubtSolution>,
    explanation: OperationSlot<ConceptExplanation>,
}

#[derive(Default)]
struct ClientState {
    catalog: OperationSlot<Vec<Grade>>,
    grade: GradePageState,
    subject: SubjectPageState,
    chapter: ChapterPageState,
    assistant: AssistantState,
}

/// The orchestration core. One instance per client session, constructed
/// with an explicit service handle. All slot state lives behind a single
/// async mutex which is never held across a network await; staleness is
/// handled by ticket comparison, not by holding the lock.
pub struct StudyClient {
    service: Arc<dyn StudyService>,
    inner: Mutex<ClientState>,
}

impl StudyClient {
    pub fn new(service: Arc<dyn StudyService>) -> Self {
        Self {
            service,
            inner: Mutex::new(ClientState::default()),
        }
    }

    /// Load the top-level grade catalog.
    pub async fn load_grades(&self) {
        let ticket = { self.inner.lock().await.catalog.restart() };
        debug!("nav: loading grade catalog");
        let outcome = self.service.list_grades().await;
        let mut st = self.inner.lock().await;
        settle(&mut st.catalog, ticket, outcome, "list_grades");
    }

    /// Resolve a grade node and its subjects. A later `open_grade` always
    /// supersedes an outstanding one; the stale response is discarded.
    pub async fn open_grade(&self, id: GradeId) {
        let (node_ticket, children_ticket) = {
            let mut st = self.inner.lock().await;
            (st.grade.node.restart(), st.grade.subjects.restart())
        };
        debug!(grade_id = id.0, "nav: resolving grade");
        let node = self.service.get_grade(id).await;
        let children = self.service.list_subjects(Some(id)).await;

        let mut st = self.inner.lock().await;
        match node {
            Err(err) => {
                // NotFound is terminal for the page: no partial render of children.
                if st.grade.node.fail(node_ticket, err) {
                    st.grade.subjects.reset();
                } else {
                    info!(grade_id = id.0, "nav: discarded stale grade response");
                }
                return;
            }
            Ok(grade) => {
                if !st.grade.node.succeed(node_ticket, grade) {
                    info!(grade_id = id.0, "nav: discarded stale grade response");
                    return;
                }
            }
        }
        settle(&mut st.grade.subjects, children_ticket, children, "list_subjects");
    }

    /// Resolve a subject node and its chapters, ordered by chapter number.
    pub async fn open_subject(&self, id: SubjectId) {
        let (node_ticket, children_ticket) = {
            let mut st = self.inner.lock().await;
            (st.subject.node.restart(), st.subject.chapters.restart())
        };
        debug!(subject_id = id.0, "nav: resolving subject");
        let node = self.service.get_subject(id).await;
        let children = self.service.list_chapters(Some(id)).await.map(|mut chapters| {
            chapters.sort_by_key(|chapter| chapter.chapter_number);
            chapters
        });

        let mut st = self.inner.lock().await;
        match node {
            Err(err) => {
                if st.subject.node.fail(node_ticket, err) {
                    st.subject.chapters.reset();
                } else {
                    info!(subject_id = id.0, "nav: discarded stale subject response");
                }
                return;
            }
            Ok(subject) => {
                if !st.subject.node.succeed(node_ticket, subject) {
                    info!(subject_id = id.0, "nav: discarded stale subject response");
                    return;
                }
            }
        }
        settle(&mut st.subject.chapters, children_ticket, children, "list_chapters");
    }

    /// Open a chapter for augmentation. Any previous chapter's pending or
    /// settled augmentation results are discarded: each ephemeral result is
    /// scoped to exactly one chapter identifier.
    pub async fn open_chapter(&self, id: ChapterId) {
        let ticket = {
            let mut st = self.inner.lock().await;
            st.chapter.active = Some(id);
            st.chapter.videos.reset();
            st.chapter.summary.reset();
            st.chapter.flashcards.reset();
            st.chapter.quiz.reset();
            st.chapter.node.restart()
        };
        debug!(chapter_id = id.0, "nav: resolving chapter");
        let outcome = self.service.get_chapter(id).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.chapter.node, ticket, outcome, "get_chapter");
    }

    /// Materials for a chapter; pure request/response, no slot involved.
    pub async fn list_materials(&self, chapter: ChapterId) -> Result<Vec<Material>, FetchError> {
        self.service.list_materials(Some(chapter)).await
    }

    /// Imperative entry point for chapter augmentation operations.
    pub async fn invoke(&self, operation: ChapterOperation) -> Result<(), InvokeError> {
        match operation {
            ChapterOperation::FetchVideos => self.fetch_videos().await,
            ChapterOperation::GenerateSummary => self.generate_summary().await,
            ChapterOperation::GenerateFlashcards { count } => {
                self.generate_flashcards(count).await
            }
            ChapterOperation::GenerateQuiz { count } => self.generate_quiz(count).await,
        }
    }

    /// Imperative entry point for the standalone assistant operations.
    pub async fn invoke_assistant(&self, operation: AssistantOperation) -> Result<(), InvokeError> {
        match operation {
            AssistantOperation::SolveDoubt { problem } => self.solve_doubt(&problem).await,
            AssistantOperation::ExplainConcept { concept, grade } => {
                self.explain_concept(&concept, &grade).await
            }
        }
    }

    pub async fn fetch_videos(&self) -> Result<(), InvokeError> {
        let (chapter_id, ticket) = self.begin_chapter_op(|page| &mut page.videos).await?;
        debug!(chapter_id = chapter_id.0, "augment: fetching related videos");
        let outcome = self.service.fetch_videos(chapter_id).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.chapter.videos, ticket, outcome, "fetch_videos");
        Ok(())
    }

    pub async fn generate_summary(&self) -> Result<(), InvokeError> {
        let (chapter_id, ticket) = self.begin_chapter_op(|page| &mut page.summary).await?;
        debug!(chapter_id = chapter_id.0, "augment: generating summary");
        let outcome = self.service.generate_summary(chapter_id).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.chapter.summary, ticket, outcome, "generate_summary");
        Ok(())
    }

    pub async fn generate_flashcards(&self, count: Option<u32>) -> Result<(), InvokeError> {
        let count = validate::validate_count(count.unwrap_or(DEFAULT_FLASHCARD_COUNT))?;
        let (chapter_id, ticket) = self.begin_chapter_op(|page| &mut page.flashcards).await?;
        debug!(
            chapter_id = chapter_id.0,
            count, "augment: generating flashcards"
        );
        let outcome = self.service.generate_flashcards(chapter_id, count).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.chapter.flashcards, ticket, outcome, "generate_flashcards");
        Ok(())
    }

    pub async fn generate_quiz(&self, count: Option<u32>) -> Result<(), InvokeError> {
        let count = validate::validate_count(count.unwrap_or(DEFAULT_QUIZ_QUESTION_COUNT))?;
        let (chapter_id, ticket) = self.begin_chapter_op(|page| &mut page.quiz).await?;
        debug!(chapter_id = chapter_id.0, count, "augment: generating quiz");
        let outcome = self.service.generate_quiz(chapter_id, count).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.chapter.quiz, ticket, outcome, "generate_quiz");
        Ok(())
    }

    pub async fn solve_doubt(&self, text: &str) -> Result<(), InvokeError> {
        let problem = validate::validate_doubt(text)?.to_string();
        let ticket = { self.inner.lock().await.assistant.doubt.begin()? };
        debug!("assistant: solving doubt");
        let outcome = self.service.solve_doubt(&problem).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.assistant.doubt, ticket, outcome, "solve_doubt");
        Ok(())
    }

    pub async fn explain_concept(&self, concept: &str, grade: &str) -> Result<(), InvokeError> {
        let (concept, grade) = {
            let (concept, grade) = validate::validate_concept(concept, grade)?;
            (concept.to_string(), grade.to_string())
        };
        let ticket = { self.inner.lock().await.assistant.explanation.begin()? };
        debug!(concept = %concept, "assistant: explaining concept");
        let outcome = self.service.explain_concept(&concept, &grade).await;
        let mut st = self.inner.lock().await;
        settle(&mut st.assistant.explanation, ticket, outcome, "explain_concept");
        Ok(())
    }

    pub async fn catalog(&self) -> NodeView<Vec<Grade>> {
        NodeView::of(&self.inner.lock().await.catalog)
    }

    pub async fn grade_page(&self) -> GradePage {
        let st = self.inner.lock().await;
        GradePage {
            grade: NodeView::of(&st.grade.node),
            subjects: NodeView::of(&st.grade.subjects),
        }
    }

    pub async fn subject_page(&self) -> SubjectPage {
        let st = self.inner.lock().await;
        SubjectPage {
            subject: NodeView::of(&st.subject.node),
            chapters: NodeView::of(&st.subject.chapters),
        }
    }

    pub async fn chapter_workspace(&self) -> ChapterWorkspace {
        let st = self.inner.lock().await;
        ChapterWorkspace {
            chapter: NodeView::of(&st.chapter.node),
            videos: SlotView::of(&st.chapter.videos),
            summary: SlotView::of(&st.chapter.summary),
            flashcards: SlotView::of(&st.chapter.flashcards),
            quiz: SlotView::of(&st.chapter.quiz),
        }
    }

    pub async fn assistant_panel(&self) -> AssistantPanel {
        let st = self.inner.lock().await;
        AssistantPanel {
            doubt: SlotView::of(&st.assistant.doubt),
            explanation: SlotView::of(&st.assistant.explanation),
        }
    }

    async fn begin_chapter_op<T>(
        &self,
        slot_of: impl FnOnce(&mut ChapterPageState) -> &mut OperationSlot<T>,
    ) -> Result<(ChapterId, RequestTicket), InvokeError> {
        let mut st = self.inner.lock().await;
        let chapter_id = st.chapter.active.ok_or(InvokeError::NoActiveChapter)?;
        let ticket = slot_of(&mut st.chapter).begin()?;
        Ok((chapter_id, ticket))
    }
}

fn settle<T>(
    slot: &mut OperationSlot<T>,
    ticket: RequestTicket,
    outcome: Result<T, FetchError>,
    operation: &'static str,
) {
    match outcome {
        Ok(value) => {
            if !slot.succeed(ticket, value) {
                info!(operation, "discarded stale response");
            }
        }
        Err(err) => {
            let detail = err.to_string();
            if slot.fail(ticket, err) {
                warn!(operation, error = %detail, "operation failed");
            } else {
                info!(operation, "discarded stale response");
            }
        }
    }
}

#[cfg(test)]
mod tests;
