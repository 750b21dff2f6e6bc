//! Fire-and-forget machine translation of listing content.
//!
//! Create/update handlers enqueue a [`TranslationJob`] and return
//! immediately; a single worker drains the queue, calls the translator
//! collaborator, and persists results. Failures are logged and dropped --
//! no retry, and never surfaced to the original caller.
//!
//! Each job carries the task's `content_version` at enqueue time. The
//! repository refuses to store results whose version no longer matches, so
//! a translation of already-edited text cannot overwrite newer content.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use maistor_db::models::task::{Task, TranslatedContent};
use maistor_db::repositories::TaskRepo;
use maistor_db::DbPool;

/// Snapshot of a task's translatable content at enqueue time.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub task_id: Uuid,
    pub content_version: i32,
    pub source_language: String,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location_notes: Option<String>,
}

impl TranslationJob {
    /// Snapshot the current content of a task row.
    pub fn for_task(task: &Task) -> TranslationJob {
        TranslationJob {
            task_id: task.id,
            content_version: task.content_version,
            source_language: task.source_language.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            requirements: task.requirements.clone(),
            location_notes: task.location_notes.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translator request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The external translation collaborator. Any subset of the returned
/// fields may be absent; absent fields keep their stored value.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, job: &TranslationJob)
        -> Result<TranslatedContent, TranslationError>;
}

/// HTTP implementation posting to the configured translator endpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>) -> HttpTranslator {
        HttpTranslator {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    title: &'a str,
    description: &'a str,
    requirements: Option<&'a str>,
    location_notes: Option<&'a str>,
    source_locale: &'a str,
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        job: &TranslationJob,
    ) -> Result<TranslatedContent, TranslationError> {
        let request = TranslateRequest {
            title: &job.title,
            description: &job.description,
            requirements: job.requirements.as_deref(),
            location_notes: job.location_notes.as_deref(),
            source_locale: &job.source_language,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<TranslatedContent>().await?)
    }
}

/// Handle for enqueuing translation jobs from request handlers.
#[derive(Clone)]
pub struct TranslationQueue {
    tx: mpsc::UnboundedSender<TranslationJob>,
}

impl TranslationQueue {
    /// Hand a job to the background worker. Never blocks and never fails
    /// the caller: if the worker is gone the job is logged and dropped.
    pub fn enqueue(&self, job: TranslationJob) {
        if let Err(err) = self.tx.send(job) {
            tracing::warn!(task_id = %err.0.task_id, "Translation worker is gone; dropping job");
        }
    }
}

/// Spawn the translation worker. Returns the queue handle plus the worker's
/// join handle for shutdown.
pub fn spawn_translation_worker(
    pool: DbPool,
    translator: Arc<dyn Translator>,
    cancel: CancellationToken,
) -> (TranslationQueue, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<TranslationJob>();

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                job = rx.recv() => {
                    match job {
                        Some(job) => process_job(&pool, translator.as_ref(), job).await,
                        None => break,
                    }
                }
            }
        }
        tracing::info!("Translation worker stopped");
    });

    (TranslationQueue { tx }, handle)
}

async fn process_job(pool: &DbPool, translator: &dyn Translator, job: TranslationJob) {
    let translated = match translator.translate(&job).await {
        Ok(translated) => translated,
        Err(err) => {
            // Terminal from the caller's perspective: log only, no retry.
            tracing::warn!(task_id = %job.task_id, error = %err, "Translation failed");
            return;
        }
    };

    match TaskRepo::store_translations(pool, job.task_id, job.content_version, &translated).await
    {
        Ok(true) => {
            tracing::debug!(task_id = %job.task_id, "Stored translated content");
        }
        Ok(false) => {
            tracing::info!(
                task_id = %job.task_id,
                content_version = job.content_version,
                "Discarded stale translation (content edited since kickoff)",
            );
        }
        Err(err) => {
            tracing::warn!(task_id = %job.task_id, error = %err, "Failed to store translation");
        }
    }
}
