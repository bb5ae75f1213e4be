use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{AssistantOperation, ChapterOperation, HttpStudyService, StudyClient};
use futures::future::join_all;
use shared::domain::{ChapterId, GradeId, SubjectId};
use tracing::info;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "studyhub", about = "Terminal client for the study hub service")]
struct Cli {
    /// Override the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all grades.
    Grades,
    /// Show a grade and its subjects.
    Grade { grade_id: i64 },
    /// Show a subject and its chapters.
    Subject { subject_id: i64 },
    /// Open a chapter and run augmentation operations against it.
    Chapter {
        chapter_id: i64,
        /// Fetch related videos.
        #[arg(long)]
        videos: bool,
        /// Generate a summary.
        #[arg(long)]
        summary: bool,
        /// Generate this many flashcards.
        #[arg(long)]
        flashcards: Option<u32>,
        /// Generate a quiz with this many questions.
        #[arg(long)]
        quiz: Option<u32>,
        /// Run all four operations with default counts.
        #[arg(long)]
        all: bool,
    },
    /// List the study materials attached to a chapter.
    Materials { chapter_id: i64 },
    /// Ask the doubt solver.
    Doubt { problem: String },
    /// Explain a concept at a grade level.
    Explain { concept: String, grade: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let settings = config::load_settings();
    let raw_url = cli.api_url.unwrap_or_else(|| settings.api_base_url.clone());
    let api_url = config::validate_api_url(&raw_url)?;
    info!(api_url = %api_url, "using study service");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_seconds))
        .build()
        .context("failed to build http client")?;
    let service = Arc::new(HttpStudyService::with_client(http, api_url));
    let client = StudyClient::new(service);

    match cli.command {
        Command::Grades => {
            client.load_grades().await;
            print!("{}", render::catalog(&client.catalog().await));
        }
        Command::Grade { grade_id } => {
            client.open_grade(GradeId(grade_id)).await;
            print!("{}", render::grade_page(&client.grade_page().await));
        }
        Command::Subject { subject_id } => {
            client.open_subject(SubjectId(subject_id)).await;
            print!("{}", render::subject_page(&client.subject_page().await));
        }
        Command::Chapter {
            chapter_id,
            videos,
            summary,
            flashcards,
            quiz,
            all,
        } => {
            client.open_chapter(ChapterId(chapter_id)).await;

            let mut operations = Vec::new();
            if videos || all {
                operations.push(ChapterOperation::FetchVideos);
            }
            if summary || all {
                operations.push(ChapterOperation::GenerateSummary);
            }
            if flashcards.is_some() || all {
                operations.push(ChapterOperation::GenerateFlashcards { count: flashcards });
            }
            if quiz.is_some() || all {
                operations.push(ChapterOperation::GenerateQuiz { count: quiz });
            }

            // Slots are independent, so every requested operation runs concurrently.
            let outcomes = join_all(operations.into_iter().map(|op| client.invoke(op))).await;
            for outcome in outcomes {
                if let Err(err) = outcome {
                    eprintln!("operation skipped: {err}");
                }
            }
            print!(
                "{}",
                render::chapter_workspace(&client.chapter_workspace().await)
            );
        }
        Command::Materials { chapter_id } => {
            let materials = client.list_materials(ChapterId(chapter_id)).await?;
            print!("{}", render::materials(&materials));
        }
        Command::Doubt { problem } => {
            client
                .invoke_assistant(AssistantOperation::SolveDoubt { problem })
                .await?;
            print!("{}", render::assistant_panel(&client.assistant_panel().await));
        }
        Command::Explain { concept, grade } => {
            client
                .invoke_assistant(AssistantOperation::ExplainConcept { concept, grade })
                .await?;
            print!("{}", render::assistant_panel(&client.assistant_panel().await));
        }
    }

    Ok(())
}
