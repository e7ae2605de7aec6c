//! Step-by-step wizards that collect, validate and generate documents.
//!
//! A [`Wizard`] owns one draft and walks it through the document type's
//! steps. `next` validates only the current step; `generate` checks the
//! critical fields of the whole draft, polishes free text, assembles the
//! HTML and tries to save it.

mod coshh;
mod rams;
mod toolbox;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, PoisonError},
    time::Duration,
};
use tracing::{error, info};

use crate::{
    assembly::{assemble, exceeds_signature_rows, DocumentData, MAX_SIGNATURE_ROWS},
    enhance::{enhance_fields, TextEnhancer},
    error::AppError,
    models::document::{DocumentKind, DocumentStore, NewDocument},
};

pub use coshh::CoshhDraft;
pub use rams::RamsDraft;
pub use toolbox::ToolboxDraft;

pub const NOT_SAVED_WARNING: &str =
    "Your document was generated but could not be saved to your account. Download it before leaving this page.";

/// Form state for one document type.
pub trait WizardDraft: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: DocumentKind;

    fn steps() -> &'static [&'static str];
    /// Checks the fields collected on `step`.
    fn validate_step(&self, step: usize) -> Result<(), String>;
    /// Fields that must be present no matter which step the user is on.
    fn validate_critical(&self) -> Result<(), String>;
    /// Changes a selector field and recomputes everything derived from it.
    fn select(&mut self, field: &str, value: &str) -> Result<(), String>;
    /// Free-text fields offered to the enhancer, keyed by response name.
    fn enhanceable_fields(&self) -> Vec<(&'static str, String)>;
    fn apply_enhanced(&mut self, enhanced: &HashMap<&'static str, String>);
    fn to_record(&self, generated_at: &str) -> DocumentData;
    fn default_name(&self, date: &str) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Generating,
    Done { document_id: Option<String> },
}

#[derive(Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(usize),
    /// The step did not validate. The message is `None` when it repeats
    /// the error already on display.
    Blocked(Option<String>),
    /// The last step validated; the draft can be generated.
    Ready,
}

pub struct GenerateContext<'a> {
    pub owner_id: &'a str,
    pub name: Option<String>,
    pub enhancer: &'a dyn TextEnhancer,
    pub enhance_timeout: Duration,
    pub store: &'a dyn DocumentStore,
    pub now: DateTime<Utc>,
}

#[derive(Debug)]
pub struct GenerationResult {
    pub html: String,
    pub record: DocumentData,
    pub name: String,
    pub document_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub warning: Option<String>,
    pub enhanced: HashMap<&'static str, String>,
}

impl GenerationResult {
    pub fn saved(&self) -> bool {
        self.document_id.is_some()
    }
}

#[derive(Debug)]
pub enum GenerateOutcome {
    Generated(GenerationResult),
    /// A generation already ran or is running for this wizard.
    Ignored,
}

pub struct Wizard<D> {
    draft: D,
    step: usize,
    phase: Phase,
    last_error: Option<String>,
}

impl<D: WizardDraft> Wizard<D> {
    pub fn new(draft: D) -> Self {
        Self::resume(draft, 0, None)
    }

    /// Rebuilds a wizard at `step` with the error currently on display.
    pub fn resume(draft: D, step: usize, last_error: Option<String>) -> Self {
        Self {
            draft,
            step: step.min(D::steps().len() - 1),
            phase: Phase::Editing,
            last_error,
        }
    }

    pub fn into_draft(self) -> D {
        self.draft
    }
    pub fn step(&self) -> usize {
        self.step
    }
    pub fn step_title(&self) -> &'static str {
        D::steps()[self.step]
    }
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn next(&mut self) -> StepOutcome {
        if self.phase != Phase::Editing {
            return StepOutcome::Blocked(None);
        }
        match self.draft.validate_step(self.step) {
            Err(message) => {
                let shown = match self.last_error.as_deref() {
                    Some(previous) if previous == message => None,
                    _ => Some(message.clone()),
                };
                self.last_error = Some(message);
                StepOutcome::Blocked(shown)
            }
            Ok(()) => {
                self.last_error = None;
                if self.step + 1 < D::steps().len() {
                    self.step += 1;
                    StepOutcome::Advanced(self.step)
                } else {
                    StepOutcome::Ready
                }
            }
        }
    }

    pub fn prev(&mut self) -> usize {
        self.last_error = None;
        self.step = self.step.saturating_sub(1);
        self.step
    }

    pub fn select(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        self.draft.select(field, value).map_err(AppError::Validation)
    }

    pub async fn generate(&mut self, ctx: GenerateContext<'_>) -> Result<GenerateOutcome, AppError> {
        if self.phase != Phase::Editing {
            return Ok(GenerateOutcome::Ignored);
        }
        self.draft.validate_critical().map_err(AppError::Validation)?;
        self.phase = Phase::Generating;

        let enhanced = enhance_fields(
            ctx.enhancer,
            self.draft.enhanceable_fields(),
            ctx.enhance_timeout,
        )
        .await;
        self.draft.apply_enhanced(&enhanced);

        let generated_at = ctx.now.format("%d/%m/%Y %H:%M").to_string();
        let record = self.draft.to_record(&generated_at);
        let html = assemble(&record);
        let name = ctx
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.draft.default_name(&ctx.now.format("%d/%m/%Y").to_string()));

        let saved = ctx
            .store
            .save(NewDocument {
                owner_id: ctx.owner_id.to_string(),
                name: name.clone(),
                kind: D::KIND,
                content: html.clone(),
                payload: serde_json::to_value(&record).unwrap_or_default(),
            })
            .await;
        let (document_id, created_at, warning) = match saved {
            Ok(saved) => {
                info!(document_id = %saved.id, owner = ctx.owner_id, kind = D::KIND.label(), "document generated");
                (Some(saved.id), Some(saved.created_at), None)
            }
            Err(error) => {
                error!(owner = ctx.owner_id, kind = D::KIND.label(), %error, "generated document was not saved");
                (None, None, Some(NOT_SAVED_WARNING.to_string()))
            }
        };

        self.phase = Phase::Done {
            document_id: document_id.clone(),
        };
        Ok(GenerateOutcome::Generated(GenerationResult {
            html,
            record,
            name,
            document_id,
            created_at,
            warning,
            enhanced,
        }))
    }
}

/// Tracks generations in progress so each owner runs at most one per
/// document type at a time.
#[derive(Default)]
pub struct InFlight {
    running: Mutex<HashSet<(String, DocumentKind)>>,
}

pub struct InFlightTicket<'a> {
    registry: &'a InFlight,
    key: (String, DocumentKind),
}

impl InFlight {
    pub fn try_acquire(&self, owner_id: &str, kind: DocumentKind) -> Option<InFlightTicket<'_>> {
        let key = (owner_id.to_string(), kind);
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.insert(key.clone()) {
            Some(InFlightTicket {
                registry: self,
                key,
            })
        } else {
            None
        }
    }
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.registry
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

pub(crate) fn require(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Rejects a head count that would overflow the signature register.
pub(crate) fn within_register(value: &str, label: &str) -> Result<(), String> {
    if exceeds_signature_rows(value) {
        Err(format!("{label} cannot be more than {MAX_SIGNATURE_ROWS}"))
    } else {
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::DisabledEnhancer;
    use crate::models::document::MemoryDocumentStore;
    use chrono::TimeZone;

    fn ready_draft() -> RamsDraft {
        let mut draft = RamsDraft {
            company_name: "Spark Bros Ltd".to_string(),
            client_name: "Mrs Jones".to_string(),
            site_address: "1 High Street".to_string(),
            start_date: "2024-05-01".to_string(),
            supervisor: "Dave".to_string(),
            first_aider: "Sam".to_string(),
            hospital: "City General".to_string(),
            fire_assembly: "Front gate".to_string(),
            ..RamsDraft::default()
        };
        draft.select("trade", "Electrician").expect("trade");
        draft.select("jobType", "Full House Rewire").expect("job");
        draft
    }

    fn context<'a>(store: &'a MemoryDocumentStore, enhancer: &'a dyn TextEnhancer) -> GenerateContext<'a> {
        GenerateContext {
            owner_id: "alice",
            name: None,
            enhancer,
            enhance_timeout: Duration::from_secs(1),
            store,
            now: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().expect("date"),
        }
    }

    #[test]
    fn repeated_identical_errors_are_suppressed() {
        let mut wizard = Wizard::new(RamsDraft::default());
        let first = wizard.next();
        assert!(matches!(first, StepOutcome::Blocked(Some(_))));
        assert_eq!(wizard.next(), StepOutcome::Blocked(None));
        assert_eq!(wizard.step(), 0);
    }

    #[test]
    fn prev_always_succeeds_without_validation() {
        let mut wizard = Wizard::resume(RamsDraft::default(), 3, None);
        assert_eq!(wizard.prev(), 2);
        assert_eq!(wizard.prev(), 1);
        assert_eq!(wizard.prev(), 0);
        assert_eq!(wizard.prev(), 0);
    }

    #[test]
    fn resume_clamps_step() {
        let wizard = Wizard::resume(ToolboxDraft::default(), 42, None);
        assert_eq!(wizard.step(), ToolboxDraft::steps().len() - 1);
    }

    #[tokio::test]
    async fn generate_saves_and_finishes() {
        let store = MemoryDocumentStore::new();
        let mut wizard = Wizard::new(ready_draft());
        let outcome = wizard
            .generate(context(&store, &test_support::PrefixEnhancer))
            .await
            .expect("generate");

        let GenerateOutcome::Generated(result) = outcome else {
            panic!("expected a generated document");
        };
        assert!(result.saved());
        assert!(result.html.contains("Full House Rewire"));
        assert!(result.enhanced.contains_key("scope"));
        assert_eq!(result.name, "RAMS - Full House Rewire - 01/05/2024");
        assert_eq!(
            wizard.phase,
            Phase::Done {
                document_id: result.document_id.clone()
            }
        );

        let stored = store
            .find("alice", result.document_id.as_deref().unwrap_or_default())
            .await
            .expect("stored");
        assert_eq!(stored.payload["type"], "RAMS");
        assert_eq!(assemble(&serde_json::from_value(stored.payload).expect("payload")), result.html);
    }

    #[tokio::test]
    async fn second_generate_is_ignored() {
        let store = MemoryDocumentStore::new();
        let mut wizard = Wizard::new(ready_draft());
        wizard.generate(context(&store, &DisabledEnhancer)).await.expect("generate");
        let again = wizard.generate(context(&store, &DisabledEnhancer)).await.expect("generate");
        assert!(matches!(again, GenerateOutcome::Ignored));
    }

    #[tokio::test]
    async fn critical_fields_block_generation() {
        let store = MemoryDocumentStore::new();
        let mut draft = ready_draft();
        draft.hospital.clear();
        let mut wizard = Wizard::new(draft);
        let error = wizard.generate(context(&store, &DisabledEnhancer)).await.err();
        assert!(matches!(error, Some(AppError::Validation(_))));
        assert_eq!(wizard.phase, Phase::Editing);
    }

    #[tokio::test]
    async fn failed_save_still_returns_the_document() {
        let store = MemoryDocumentStore::new();
        store.fail_writes(true);
        let mut wizard = Wizard::new(ready_draft());
        let outcome = wizard.generate(context(&store, &DisabledEnhancer)).await.expect("generate");
        let GenerateOutcome::Generated(result) = outcome else {
            panic!("expected a generated document");
        };
        assert!(!result.saved());
        assert_eq!(result.warning.as_deref(), Some(NOT_SAVED_WARNING));
        assert!(result.html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn in_flight_allows_one_generation_per_owner_and_kind() {
        let in_flight = InFlight::default();
        let ticket = in_flight.try_acquire("alice", DocumentKind::Rams);
        assert!(ticket.is_some());
        assert!(in_flight.try_acquire("alice", DocumentKind::Rams).is_none());
        assert!(in_flight.try_acquire("alice", DocumentKind::Coshh).is_some());
        assert!(in_flight.try_acquire("bob", DocumentKind::Rams).is_some());
        drop(ticket);
        assert!(in_flight.try_acquire("alice", DocumentKind::Rams).is_some());
    }
}
