use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{rams::ppe_rows, rams::substance_row, require, within_register, WizardDraft};
use crate::{
    assembly::{CoshhRecord, DocumentData, SubstanceRow},
    catalog::catalog,
    models::document::DocumentKind,
    sanitize::{lenient_string, sanitize, title_case},
};

const STEPS: &[&str] = &[
    "Assessment Details",
    "Work Activity",
    "Substances",
    "Controls & Emergency",
];

const CUSTOM_CATEGORY: &str = "Custom";

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SubstanceEntry {
    pub name: String,
    pub category: String,
    pub hazard: String,
    pub controls: String,
}

impl SubstanceEntry {
    fn row(&self, default_category: &str) -> SubstanceRow {
        SubstanceRow {
            name: self.name.clone(),
            category: if self.category.trim().is_empty() {
                default_category.to_string()
            } else {
                self.category.clone()
            },
            hazard: self.hazard.clone(),
            controls: self.controls.clone(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CoshhDraft {
    pub company_name: String,
    pub company_address: String,
    pub logo: String,
    pub reference: String,
    pub assessor: String,
    pub assessment_date: String,
    pub review_date: String,
    pub site_address: String,

    pub activity: String,
    #[serde(deserialize_with = "lenient_string")]
    pub operatives: String,

    /// Substance category currently browsed.
    pub category: String,
    /// Names in the browsed category.
    pub available_substances: Vec<String>,
    pub selected_substances: Vec<SubstanceEntry>,
    pub custom_substances: Vec<SubstanceEntry>,
    pub ppe: Vec<String>,

    pub storage: String,
    pub disposal: String,
    pub first_aid: String,
    pub emergency_procedures: String,
    pub monitoring: String,
}

impl CoshhDraft {
    fn substance_count(&self) -> usize {
        self.selected_substances.len()
            + self
                .custom_substances
                .iter()
                .filter(|entry| !entry.name.trim().is_empty())
                .count()
    }

    fn select_category(&mut self, name: &str) -> Result<(), String> {
        let category = catalog()
            .substance_category(name)
            .ok_or_else(|| format!("Unknown substance category: {name}"))?;
        self.category = category.name.to_string();
        self.available_substances = category
            .substances
            .iter()
            .map(|substance| substance.name.to_string())
            .collect();
        Ok(())
    }

    fn toggle_substance(&mut self, name: &str) -> Result<(), String> {
        if let Some(index) = self.selected_substances.iter().position(|s| s.name == name) {
            self.selected_substances.remove(index);
            return Ok(());
        }
        let row = substance_row(name).ok_or_else(|| format!("Unknown substance: {name}"))?;
        self.selected_substances.push(SubstanceEntry {
            name: row.name,
            category: row.category,
            hazard: row.hazard,
            controls: row.controls,
        });
        Ok(())
    }
}

impl WizardDraft for CoshhDraft {
    const KIND: DocumentKind = DocumentKind::Coshh;

    fn steps() -> &'static [&'static str] {
        STEPS
    }

    fn validate_step(&self, step: usize) -> Result<(), String> {
        match step {
            0 => {
                require(&self.company_name, "Company name is required")?;
                require(&self.assessor, "Assessor name is required")?;
                require(&self.assessment_date, "Assessment date is required")
            }
            1 => {
                require(&self.activity, "Describe the work activity")?;
                within_register(&self.operatives, "Persons exposed")
            }
            2 => {
                if self.substance_count() == 0 {
                    return Err("Add at least one substance".to_string());
                }
                for entry in &self.custom_substances {
                    if !entry.name.trim().is_empty() && entry.hazard.trim().is_empty() {
                        return Err(format!("Describe the hazard for {}", entry.name.trim()));
                    }
                }
                Ok(())
            }
            3 => {
                require(&self.first_aid, "First aid measures are required")?;
                require(&self.emergency_procedures, "Emergency procedures are required")
            }
            _ => Ok(()),
        }
    }

    fn validate_critical(&self) -> Result<(), String> {
        require(&self.company_name, "Company name is required")?;
        require(&self.assessor, "Assessor name is required")?;
        within_register(&self.operatives, "Persons exposed")?;
        if self.substance_count() == 0 {
            return Err("Add at least one substance".to_string());
        }
        Ok(())
    }

    fn select(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "category" => self.select_category(value),
            "substance" => self.toggle_substance(value),
            other => Err(format!("{other} is not a selector")),
        }
    }

    fn enhanceable_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("activity", self.activity.clone()),
            ("storage", self.storage.clone()),
            ("disposal", self.disposal.clone()),
            ("emergencyProcedures", self.emergency_procedures.clone()),
        ]
    }

    fn apply_enhanced(&mut self, enhanced: &HashMap<&'static str, String>) {
        for (field, text) in enhanced {
            let target = match *field {
                "activity" => &mut self.activity,
                "storage" => &mut self.storage,
                "disposal" => &mut self.disposal,
                "emergencyProcedures" => &mut self.emergency_procedures,
                _ => continue,
            };
            *target = text.clone();
        }
    }

    fn to_record(&self, generated_at: &str) -> DocumentData {
        let substances = self
            .selected_substances
            .iter()
            .map(|entry| entry.row(CUSTOM_CATEGORY))
            .chain(
                self.custom_substances
                    .iter()
                    .filter(|entry| !entry.name.trim().is_empty())
                    .map(|entry| entry.row(CUSTOM_CATEGORY)),
            )
            .collect();

        DocumentData::Coshh(CoshhRecord {
            company_name: self.company_name.clone(),
            company_address: self.company_address.clone(),
            logo: self.logo.clone(),
            reference: self.reference.clone(),
            assessor: self.assessor.clone(),
            assessment_date: self.assessment_date.clone(),
            review_date: self.review_date.clone(),
            site_address: self.site_address.clone(),
            activity: self.activity.clone(),
            operatives: self.operatives.clone(),
            substances,
            ppe: ppe_rows(&self.ppe),
            storage: self.storage.clone(),
            disposal: self.disposal.clone(),
            first_aid: self.first_aid.clone(),
            emergency_procedures: self.emergency_procedures.clone(),
            monitoring: self.monitoring.clone(),
            generated_at: generated_at.to_string(),
        })
    }

    fn default_name(&self, date: &str) -> String {
        let activity = sanitize(&self.activity);
        let activity = activity.lines().next().unwrap_or_default();
        if activity.is_empty() {
            format!("COSHH - {date}")
        } else {
            format!("COSHH - {} - {date}", title_case(activity))
        }
    }
}
