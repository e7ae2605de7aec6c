use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{require, within_register, WizardDraft};
use crate::{
    assembly::{DocumentData, HazardRow, ToolboxRecord},
    catalog::{catalog, CUSTOM_TOPIC},
    models::document::DocumentKind,
    sanitize::{lenient_string, sanitize, title_case},
};

const STEPS: &[&str] = &["Talk Details", "Topic", "Discussion", "Attendance"];

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolboxDraft {
    pub company_name: String,
    pub logo: String,
    pub reference: String,
    pub presenter: String,
    pub talk_date: String,
    pub location: String,
    pub duration: String,

    pub topic: String,
    pub custom_topic: String,
    pub summary: String,
    pub key_points: Vec<String>,
    /// Catalog hazard keys discussed in the talk.
    pub hazards: Vec<String>,
    pub questions: Vec<String>,

    pub notes: String,
    #[serde(deserialize_with = "lenient_string")]
    pub attendees: String,
}

impl ToolboxDraft {
    fn is_custom_topic(&self) -> bool {
        self.topic == CUSTOM_TOPIC
    }

    /// Topic title as it appears on the document.
    fn title(&self) -> &str {
        if self.is_custom_topic() {
            &self.custom_topic
        } else {
            &self.topic
        }
    }

    fn select_topic(&mut self, name: &str) -> Result<(), String> {
        let topic = catalog()
            .topic(name)
            .ok_or_else(|| format!("Unknown talk topic: {name}"))?;
        self.topic = topic.name.to_string();
        if topic.name != CUSTOM_TOPIC {
            self.custom_topic.clear();
        }
        self.summary = topic.summary.to_string();
        self.key_points = topic.key_points.iter().map(|p| p.to_string()).collect();
        self.hazards = topic.hazards.iter().map(|h| h.to_string()).collect();
        self.questions = topic.questions.iter().map(|q| q.to_string()).collect();
        Ok(())
    }
}

impl WizardDraft for ToolboxDraft {
    const KIND: DocumentKind = DocumentKind::Toolbox;

    fn steps() -> &'static [&'static str] {
        STEPS
    }

    fn validate_step(&self, step: usize) -> Result<(), String> {
        match step {
            0 => {
                require(&self.presenter, "Presenter name is required")?;
                require(&self.talk_date, "Talk date is required")
            }
            1 => {
                require(&self.topic, "Select a topic")?;
                if self.is_custom_topic() {
                    require(&self.custom_topic, "Enter a title for the custom topic")?;
                }
                require(&self.summary, "Summary is required")
            }
            2 => {
                if self.key_points.iter().all(|point| point.trim().is_empty()) {
                    Err("Add at least one key point".to_string())
                } else {
                    Ok(())
                }
            }
            3 => within_register(&self.attendees, "Number of attendees"),
            _ => Ok(()),
        }
    }

    fn validate_critical(&self) -> Result<(), String> {
        require(&self.presenter, "Presenter name is required")?;
        require(self.title(), "Select a topic")?;
        require(&self.talk_date, "Talk date is required")?;
        within_register(&self.attendees, "Number of attendees")
    }

    fn select(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "topic" => self.select_topic(value),
            other => Err(format!("{other} is not a selector")),
        }
    }

    fn enhanceable_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("summary", self.summary.clone()),
            ("notes", self.notes.clone()),
        ]
    }

    fn apply_enhanced(&mut self, enhanced: &HashMap<&'static str, String>) {
        if let Some(summary) = enhanced.get("summary") {
            self.summary = summary.clone();
        }
        if let Some(notes) = enhanced.get("notes") {
            self.notes = notes.clone();
        }
    }

    fn to_record(&self, generated_at: &str) -> DocumentData {
        let hazards = self
            .hazards
            .iter()
            .filter_map(|key| catalog().hazard_meta(key))
            .map(|hazard| HazardRow {
                label: hazard.label.to_string(),
                risk: hazard.risk.to_string(),
                control: hazard.control.to_string(),
                initial_risk: hazard.initial.label(),
                residual_risk: hazard.residual.label(),
            })
            .collect();

        DocumentData::Toolbox(ToolboxRecord {
            company_name: self.company_name.clone(),
            logo: self.logo.clone(),
            reference: self.reference.clone(),
            topic: self.title().to_string(),
            presenter: self.presenter.clone(),
            talk_date: self.talk_date.clone(),
            location: self.location.clone(),
            duration: self.duration.clone(),
            summary: self.summary.clone(),
            key_points: self
                .key_points
                .iter()
                .map(|point| sanitize(point))
                .filter(|point| !point.is_empty())
                .collect(),
            hazards,
            questions: self.questions.clone(),
            notes: self.notes.clone(),
            attendees: self.attendees.clone(),
            generated_at: generated_at.to_string(),
        })
    }

    fn default_name(&self, date: &str) -> String {
        let topic = title_case(&sanitize(self.title()));
        if topic.is_empty() {
            format!("Toolbox Talk - {date}")
        } else {
            format!("Toolbox Talk - {topic} - {date}")
        }
    }
}
