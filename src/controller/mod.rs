//! Upload state machine.
//!
//! `Idle -> Ready -> Submitting -> {Succeeded, Failed}`. A new pick moves
//! `Ready`, `Succeeded` or `Failed` back to `Ready` (valid file) or `Idle`
//! (invalid file); a new submit restarts `Submitting` on the same file.
//! Picks are ignored while a request is in flight.

use crate::client::{AnalysisClient, FilePart, HttpReply, TransportFailure};
use crate::error::{AppError, ErrorState};
use crate::model::{FileRef, SelectedFile};
use crate::models::AnalysisResult;
use crate::models::error::ErrorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

/// At most one of a report or an error is ever held.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Outcome {
    #[default]
    Empty,
    Report(AnalysisResult),
    Error(ErrorState),
}

/// Ticket for the request currently in flight.
#[derive(Debug)]
pub struct Submission {
    id: u64,
    part: FilePart,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }
}

pub struct UploadController<C> {
    client: C,
    endpoint: String,
    phase: InteractionPhase,
    selected: Option<SelectedFile>,
    outcome: Outcome,
    in_flight: Option<u64>,
    next_id: u64,
}

impl<C: AnalysisClient> UploadController<C> {
    pub fn new(client: C, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            phase: InteractionPhase::Idle,
            selected: None,
            outcome: Outcome::Empty,
            in_flight: None,
            next_id: 0,
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Outcome::Report(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorState> {
        match &self.outcome {
            Outcome::Error(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_loading()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handles a file-pick event. `None` means the picker came back empty.
    pub fn select_file(&mut self, file: Option<FileRef>) {
        if self.is_loading() {
            log::warn!("[upload] file pick ignored while a submission is in flight");
            return;
        }

        let selected = file
            .ok_or_else(AppError::invalid_extension)
            .and_then(SelectedFile::try_from);

        match selected {
            Ok(file) => {
                log::debug!("[upload] selected {} ({})", file.name(), file.extension());
                self.selected = Some(file);
                self.outcome = Outcome::Empty;
                self.phase = InteractionPhase::Ready;
            }
            Err(err) => {
                self.selected = None;
                self.outcome = Outcome::Error(ErrorState::from(&err));
                self.phase = InteractionPhase::Idle;
            }
        }
    }

    /// Moves to `Submitting` and hands back what must be posted.
    ///
    /// Returns `None` when nothing should be sent: either no file is selected
    /// (the error region is set) or a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.is_loading() {
            log::warn!("[upload] submit ignored, a request is already in flight");
            return None;
        }

        let Some(file) = self.selected.as_ref() else {
            self.outcome = Outcome::Error(ErrorState::from(&AppError::no_file_selected()));
            return None;
        };

        let part = FilePart::from(file);
        let id = self.next_id;
        self.next_id += 1;

        self.outcome = Outcome::Empty;
        self.phase = InteractionPhase::Submitting;
        self.in_flight = Some(id);
        log::debug!("[upload] submission #{} for {}", id, part.file_name);

        Some(Submission { id, part })
    }

    /// Applies the result of submission `id`.
    ///
    /// Anything but the outstanding submission is dropped.
    pub fn settle(&mut self, id: u64, reply: Result<HttpReply, TransportFailure>) {
        if self.in_flight != Some(id) {
            log::warn!("[upload] discarding stale result of submission #{}", id);
            return;
        }
        self.in_flight = None;

        match resolve(reply) {
            Ok(result) => {
                log::debug!(
                    "[upload] submission #{} succeeded, {} entries",
                    id,
                    result.iter().count()
                );
                self.outcome = Outcome::Report(result);
                self.phase = InteractionPhase::Succeeded;
            }
            Err(err) => {
                self.outcome = Outcome::Error(ErrorState::from(&err));
                self.phase = InteractionPhase::Failed;
            }
        }
    }

    /// Posts the selected file and applies the answer.
    pub async fn submit(&mut self) {
        let Some(Submission { id, part }) = self.begin_submit() else {
            return;
        };

        let reply = self.client.post(&self.endpoint, part).await;
        self.settle(id, reply);
    }
}

fn resolve(reply: Result<HttpReply, TransportFailure>) -> Result<AnalysisResult, AppError> {
    let reply = reply.map_err(|failure| {
        let detail = normalize(failure.to_string());
        match failure {
            TransportFailure::Unreachable(source) => AppError::Transport {
                detail,
                source: Some(source),
            },
            TransportFailure::Other(_) => AppError::transport(detail),
        }
    })?;

    if !reply.status.is_success() {
        let detail = ErrorBody::detail(&reply.body)
            .or(reply.status_text.filter(|text| !text.is_empty()))
            .unwrap_or_else(|| format!("Erro na requisição: status {}", reply.status.as_u16()));
        return Err(AppError::service(reply.status, detail));
    }

    AnalysisResult::from_slice(&reply.body)
        .map_err(|e| AppError::transport_with_source(e.to_string(), e))
}

fn normalize(message: String) -> String {
    if message.contains("Failed to fetch") {
        String::from("Failed to fetch")
    } else {
        message
    }
}

#[cfg(test)]
mod tests;
