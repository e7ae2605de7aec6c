use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    wizard::{CoshhDraft, RamsDraft, StepOutcome, ToolboxDraft, Wizard, WizardDraft},
};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Transition {
    Next,
    Prev,
    Select { field: String, value: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest<D> {
    pub draft: D,
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(flatten)]
    pub transition: Transition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse<D> {
    pub draft: D,
    pub step: usize,
    pub step_title: &'static str,
    pub steps: &'static [&'static str],
    pub ready: bool,
    /// Message to show; absent when the step is fine or the same message is
    /// already on screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

fn transition<D: WizardDraft>(request: TransitionRequest<D>) -> Result<TransitionResponse<D>, AppError> {
    let mut wizard = Wizard::resume(request.draft, request.step, request.last_error);
    let (ready, error) = match request.transition {
        Transition::Next => match wizard.next() {
            StepOutcome::Advanced(_) => (false, None),
            StepOutcome::Ready => (true, None),
            StepOutcome::Blocked(message) => (false, message),
        },
        Transition::Prev => {
            wizard.prev();
            (false, None)
        }
        Transition::Select { field, value } => {
            wizard.select(&field, &value)?;
            (false, None)
        }
    };

    let last_error = wizard.last_error().map(str::to_string);
    let step = wizard.step();
    let step_title = wizard.step_title();
    Ok(TransitionResponse {
        draft: wizard.into_draft(),
        step,
        step_title,
        steps: D::steps(),
        ready,
        error,
        last_error,
    })
}

#[post("/wizards/rams")]
pub async fn transition_rams(
    payload: web::Json<TransitionRequest<RamsDraft>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(transition(payload.into_inner())?))
}
#[post("/wizards/coshh")]
pub async fn transition_coshh(
    payload: web::Json<TransitionRequest<CoshhDraft>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(transition(payload.into_inner())?))
}
#[post("/wizards/toolbox")]
pub async fn transition_toolbox(
    payload: web::Json<TransitionRequest<ToolboxDraft>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(transition(payload.into_inner())?))
}
