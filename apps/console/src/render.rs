//! Plain-text rendering of core snapshots. The core exposes read-only views;
//! everything here is formatting.

use client_core::{
    AssistantPanel, ChapterWorkspace, GradePage, NodeView, SlotPhase, SlotView, SubjectPage,
};
use shared::domain::{Grade, Material};

fn node_block<T>(label: &str, view: &NodeView<T>, body: impl FnOnce(&T) -> String) -> String {
    if view.loading {
        return format!("{label}: loading...\n");
    }
    if let Some(message) = &view.error {
        return format!("{label}: {message}\n");
    }
    match &view.data {
        Some(data) => body(data),
        None => format!("{label}: (nothing loaded)\n"),
    }
}

fn slot_block<T>(label: &str, view: &SlotView<T>, body: impl FnOnce(&T) -> String) -> String {
    match view.phase {
        SlotPhase::Idle => format!("{label}: (not requested)\n"),
        SlotPhase::Pending => format!("{label}: working...\n"),
        SlotPhase::Failed => format!(
            "{label}: {}\n",
            view.error.as_deref().unwrap_or("failed")
        ),
        SlotPhase::Succeeded => match &view.result {
            Some(result) => body(result),
            None => format!("{label}: (empty result)\n"),
        },
    }
}

pub fn catalog(view: &NodeView<Vec<Grade>>) -> String {
    node_block("grades", view, |grades| {
        let mut out = String::from("Grades:\n");
        for grade in grades {
            out.push_str(&format!("  [{}] {} - {}\n", grade.id.0, grade.level, grade.description));
        }
        out
    })
}

pub fn grade_page(page: &GradePage) -> String {
    let mut out = node_block("grade", &page.grade, |grade| {
        format!("Grade {} ({})\n{}\n", grade.id.0, grade.level, grade.description)
    });
    out.push_str(&node_block("subjects", &page.subjects, |subjects| {
        let mut section = String::from("Subjects:\n");
        for subject in subjects {
            section.push_str(&format!("  [{}] {}\n", subject.id.0, subject.name));
        }
        section
    }));
    out
}

pub fn subject_page(page: &SubjectPage) -> String {
    let mut out = node_block("subject", &page.subject, |subject| {
        format!("Subject {} ({})\n{}\n", subject.id.0, subject.name, subject.description)
    });
    out.push_str(&node_block("chapters", &page.chapters, |chapters| {
        let mut section = String::from("Chapters:\n");
        for chapter in chapters {
            section.push_str(&format!(
                "  {}. [{}] {}\n",
                chapter.chapter_number, chapter.id.0, chapter.title
            ));
        }
        section
    }));
    out
}

pub fn chapter_workspace(workspace: &ChapterWorkspace) -> String {
    let mut out = node_block("chapter", &workspace.chapter, |chapter| {
        format!(
            "Chapter {}: {}\n{}\n",
            chapter.chapter_number, chapter.title, chapter.description
        )
    });

    out.push_str(&slot_block("videos", &workspace.videos, |videos| {
        let mut section = String::from("Videos:\n");
        for video in videos {
            section.push_str(&format!(
                "  {} ({}) https://youtube.com/watch?v={}\n",
                video.title, video.channel, video.video_id
            ));
        }
        section
    }));

    out.push_str(&slot_block("summary", &workspace.summary, |summary| {
        let mut section = String::from("Summary:\n");
        for line in summary.summary.lines().filter(|line| !line.is_empty()) {
            section.push_str(&format!("  {line}\n"));
        }
        section
    }));

    out.push_str(&slot_block("flashcards", &workspace.flashcards, |cards| {
        let mut section = String::from("Flashcards:\n");
        for card in cards {
            section.push_str(&format!("  Q: {}\n  A: {}\n", card.question, card.answer));
        }
        section
    }));

    out.push_str(&slot_block("quiz", &workspace.quiz, |quiz| {
        let questions = serde_json::to_string_pretty(&quiz.questions)
            .unwrap_or_else(|_| "(unrenderable questions)".to_string());
        format!("Quiz: {}\n{questions}\n", quiz.title)
    }));

    out
}

pub fn assistant_panel(panel: &AssistantPanel) -> String {
    let mut out = slot_block("doubt", &panel.doubt, |solution| {
        format!("Problem: {}\nSolution:\n{}\n", solution.problem, solution.solution)
    });
    out.push_str(&slot_block("explanation", &panel.explanation, |explanation| {
        format!(
            "Concept: {}\nExplanation:\n{}\n",
            explanation.concept, explanation.explanation
        )
    }));
    out
}

pub fn materials(list: &[Material]) -> String {
    if list.is_empty() {
        return "No study materials.\n".to_string();
    }
    let mut out = String::from("Materials:\n");
    for material in list {
        out.push_str(&format!(
            "  [{}] {} ({:?})\n",
            material.id.0, material.title, material.material_type
        ));
    }
    out
}
