use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, collections::HashMap, fmt};

use super::{require, within_register, WizardDraft};
use crate::{
    assembly::{CheckRow, DocumentData, ExtraSectionRow, HazardRow, PpeRow, RamsRecord, SubstanceRow},
    catalog::{catalog, Hazard},
    models::document::DocumentKind,
    sanitize::{lenient_string, sanitize, title_case},
};

const STEPS: &[&str] = &[
    "Company & Client",
    "Job Details",
    "Hazards & PPE",
    "Safety & Emergency",
    "Review",
];

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::NotApplicable => "N/A",
        })
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomHazard {
    pub label: String,
    pub risk: String,
    pub control: String,
    pub initial_risk: String,
    pub residual_risk: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RamsDraft {
    pub company_name: String,
    pub company_address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub logo: String,
    pub reference: String,
    pub client_name: String,
    pub site_address: String,

    pub trade: String,
    pub job_type: String,
    pub description: String,
    pub custom_description: String,
    pub start_date: String,
    pub duration: String,
    #[serde(deserialize_with = "lenient_string")]
    pub operatives: String,

    /// Catalog hazard keys, in display order.
    pub hazards: Vec<String>,
    pub custom_hazards: Vec<CustomHazard>,
    pub questions: Vec<String>,
    pub answers: BTreeMap<String, Answer>,
    pub ppe: Vec<String>,
    pub substances: Vec<String>,

    pub supervisor: String,
    pub first_aider: String,
    pub hospital: String,
    pub fire_assembly: String,
    pub emergency_contact: String,

    pub method_statement: String,
    /// Text for each extra section the job requires, by section key.
    pub extra_sections: BTreeMap<String, String>,
    pub additional_notes: String,
}

impl RamsDraft {
    fn is_custom_job(&self) -> bool {
        catalog()
            .job(&self.trade, &self.job_type)
            .map(|job| job.is_custom())
            .unwrap_or(false)
    }

    /// Scope of work as it will appear in the document.
    fn scope(&self) -> &str {
        if self.is_custom_job() {
            &self.custom_description
        } else {
            &self.description
        }
    }

    fn select_trade(&mut self, trade: &str) -> Result<(), String> {
        if catalog().trade(trade).is_none() {
            return Err(format!("Unknown trade: {trade}"));
        }
        self.trade = trade.to_string();
        self.job_type.clear();
        self.description.clear();
        self.custom_description.clear();
        self.hazards.clear();
        self.questions.clear();
        self.answers.clear();
        self.extra_sections.clear();
        self.recompute_ppe();
        Ok(())
    }

    fn select_job(&mut self, job_type: &str) -> Result<(), String> {
        let job = catalog()
            .job(&self.trade, job_type)
            .ok_or_else(|| format!("Unknown job for {}: {job_type}", self.trade))?;

        self.job_type = job.name.to_string();
        self.description = job.description.to_string();
        if !job.is_custom() {
            self.custom_description.clear();
        }
        self.hazards = job.hazards.iter().map(|key| key.to_string()).collect();
        self.questions = job.questions.iter().map(|q| q.to_string()).collect();
        let questions = &self.questions;
        self.answers.retain(|question, _| questions.contains(question));
        let mut sections = BTreeMap::new();
        for key in job.extra_sections {
            let text = self.extra_sections.remove(*key).unwrap_or_default();
            sections.insert(key.to_string(), text);
        }
        self.extra_sections = sections;
        self.recompute_ppe();
        Ok(())
    }

    fn toggle_hazard(&mut self, key: &str) -> Result<(), String> {
        if catalog().hazard_meta(key).is_none() {
            return Err(format!("Unknown hazard: {key}"));
        }
        match self.hazards.iter().position(|h| h == key) {
            Some(index) => {
                self.hazards.remove(index);
            }
            None => self.hazards.push(key.to_string()),
        }
        self.recompute_ppe();
        Ok(())
    }

    fn recompute_ppe(&mut self) {
        let catalog = catalog();
        self.ppe = catalog
            .recommend_ppe(
                catalog.trade(&self.trade),
                &self.hazards,
                catalog.job(&self.trade, &self.job_type),
            )
            .into_iter()
            .map(|definition| definition.item.to_string())
            .collect();
    }
}

fn hazard_row(hazard: &Hazard) -> HazardRow {
    HazardRow {
        label: hazard.label.to_string(),
        risk: hazard.risk.to_string(),
        control: hazard.control.to_string(),
        initial_risk: hazard.initial.label(),
        residual_risk: hazard.residual.label(),
    }
}

pub(super) fn substance_row(name: &str) -> Option<SubstanceRow> {
    let catalog = catalog();
    let substance = catalog.substance(name)?;
    let category = catalog
        .substance_library()
        .iter()
        .find(|category| category.substances.iter().any(|s| s.name == substance.name))
        .map(|category| category.name)
        .unwrap_or_default();
    Some(SubstanceRow {
        name: substance.name.to_string(),
        category: category.to_string(),
        hazard: substance.hazard.to_string(),
        controls: substance.controls.to_string(),
    })
}

pub(super) fn ppe_rows(items: &[String]) -> Vec<PpeRow> {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| PpeRow {
            item: item.clone(),
            reason: catalog()
                .ppe_item(item)
                .map(|definition| definition.reason.to_string())
                .unwrap_or_default(),
        })
        .collect()
}

impl WizardDraft for RamsDraft {
    const KIND: DocumentKind = DocumentKind::Rams;

    fn steps() -> &'static [&'static str] {
        STEPS
    }

    fn validate_step(&self, step: usize) -> Result<(), String> {
        match step {
            0 => {
                require(&self.company_name, "Company name is required")?;
                require(&self.client_name, "Client name is required")?;
                require(&self.site_address, "Site address is required")
            }
            1 => {
                require(&self.trade, "Select a trade")?;
                require(&self.job_type, "Select a job type")?;
                if self.is_custom_job() {
                    require(&self.custom_description, "Describe the custom job")?;
                } else {
                    require(&self.description, "Job description is required")?;
                }
                require(&self.start_date, "Start date is required")?;
                within_register(&self.operatives, "Number of operatives")
            }
            2 => match self
                .questions
                .iter()
                .find(|question| !self.answers.contains_key(*question))
            {
                Some(question) => Err(format!("Answer the pre-start check: {question}")),
                None => Ok(()),
            },
            3 => {
                require(&self.supervisor, "Site supervisor is required")?;
                require(&self.first_aider, "First aider is required")?;
                require(&self.hospital, "Nearest hospital is required")?;
                require(&self.fire_assembly, "Fire assembly point is required")
            }
            4 => {
                for (key, text) in &self.extra_sections {
                    if text.trim().is_empty() {
                        let title = catalog()
                            .extra_section(key)
                            .map(|section| section.title)
                            .unwrap_or(key.as_str());
                        return Err(format!("Complete the {title} section"));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn validate_critical(&self) -> Result<(), String> {
        require(&self.company_name, "Company name is required")?;
        within_register(&self.operatives, "Number of operatives")?;
        require(&self.supervisor, "Site supervisor is required")?;
        require(&self.first_aider, "First aider is required")?;
        require(&self.hospital, "Nearest hospital is required")?;
        require(&self.fire_assembly, "Fire assembly point is required")
    }

    fn select(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "trade" => self.select_trade(value),
            "jobType" => self.select_job(value),
            "hazard" => self.toggle_hazard(value),
            other => Err(format!("{other} is not a selector")),
        }
    }

    fn enhanceable_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scope", self.scope().to_string()),
            ("methodStatement", self.method_statement.clone()),
            ("additionalNotes", self.additional_notes.clone()),
        ]
    }

    fn apply_enhanced(&mut self, enhanced: &HashMap<&'static str, String>) {
        if let Some(scope) = enhanced.get("scope") {
            if self.is_custom_job() {
                self.custom_description = scope.clone();
            } else {
                self.description = scope.clone();
            }
        }
        if let Some(method) = enhanced.get("methodStatement") {
            self.method_statement = method.clone();
        }
        if let Some(notes) = enhanced.get("additionalNotes") {
            self.additional_notes = notes.clone();
        }
    }

    fn to_record(&self, generated_at: &str) -> DocumentData {
        let catalog = catalog();
        let mut hazards: Vec<HazardRow> = self
            .hazards
            .iter()
            .filter_map(|key| catalog.hazard_meta(key))
            .map(hazard_row)
            .collect();
        hazards.extend(
            self.custom_hazards
                .iter()
                .filter(|hazard| !hazard.label.trim().is_empty())
                .map(|hazard| HazardRow {
                    label: hazard.label.clone(),
                    risk: hazard.risk.clone(),
                    control: hazard.control.clone(),
                    initial_risk: hazard.initial_risk.clone(),
                    residual_risk: hazard.residual_risk.clone(),
                }),
        );

        let checks = self
            .questions
            .iter()
            .filter_map(|question| {
                self.answers.get(question).map(|answer| CheckRow {
                    question: question.clone(),
                    answer: answer.to_string(),
                })
            })
            .collect();

        let extra_sections = self
            .extra_sections
            .iter()
            .map(|(key, text)| ExtraSectionRow {
                key: key.clone(),
                title: catalog
                    .extra_section(key)
                    .map(|section| section.title.to_string())
                    .unwrap_or_else(|| title_case(&key.replace('_', " "))),
                text: text.clone(),
            })
            .collect();

        DocumentData::Rams(RamsRecord {
            company_name: self.company_name.clone(),
            company_address: self.company_address.clone(),
            contact_name: self.contact_name.clone(),
            contact_phone: self.contact_phone.clone(),
            logo: self.logo.clone(),
            reference: self.reference.clone(),
            client_name: self.client_name.clone(),
            site_address: self.site_address.clone(),
            trade: self.trade.clone(),
            job_type: self.job_type.clone(),
            start_date: self.start_date.clone(),
            duration: self.duration.clone(),
            operatives: self.operatives.clone(),
            supervisor: self.supervisor.clone(),
            first_aider: self.first_aider.clone(),
            hospital: self.hospital.clone(),
            fire_assembly: self.fire_assembly.clone(),
            emergency_contact: self.emergency_contact.clone(),
            scope: self.scope().to_string(),
            method_statement: self.method_statement.clone(),
            hazards,
            checks,
            extra_sections,
            ppe: ppe_rows(&self.ppe),
            substances: self.substances.iter().filter_map(|name| substance_row(name)).collect(),
            additional_notes: self.additional_notes.clone(),
            generated_at: generated_at.to_string(),
        })
    }

    fn default_name(&self, date: &str) -> String {
        let job = title_case(&sanitize(&self.job_type));
        if job.is_empty() {
            format!("RAMS - {date}")
        } else {
            format!("RAMS - {job} - {date}")
        }
    }
}
