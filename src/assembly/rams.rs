use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::{
    hazard_table, key_value_table, or_dash, paragraphs_html, ppe_block,
    signature_rows, signature_table, substance_table, Header, HazardRow, HtmlDocument, PpeRow,
    SubstanceRow,
};
use crate::sanitize::{escape_html, sanitize, title_case};

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CheckRow {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ExtraSectionRow {
    pub key: String,
    pub title: String,
    pub text: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct RamsRecord {
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
    pub start_date: String,
    pub duration: String,
    pub operatives: String,
    pub supervisor: String,
    pub first_aider: String,
    pub hospital: String,
    pub fire_assembly: String,
    pub emergency_contact: String,
    pub scope: String,
    pub method_statement: String,
    pub hazards: Vec<HazardRow>,
    pub checks: Vec<CheckRow>,
    pub extra_sections: Vec<ExtraSectionRow>,
    pub ppe: Vec<PpeRow>,
    pub substances: Vec<SubstanceRow>,
    pub additional_notes: String,
    pub generated_at: String,
}

const NO_HAZARDS: &str = "No specific hazards were selected for this job. Review the task on site and record any hazards identified before work starts.";

pub(super) fn render(record: &RamsRecord) -> String {
    let job = title_case(&sanitize(&record.job_type));
    let mut doc = HtmlDocument::new(&format!("RAMS - {job}"));

    doc.header(&Header {
        title: "Risk Assessment & Method Statement",
        subtitle: job,
        company: &record.company_name,
        reference: &record.reference,
        generated_at: &record.generated_at,
        logo: &record.logo,
    });

    doc.section(
        "project-details",
        "Project Details",
        &key_value_table(&[
            ("Company", &record.company_name),
            ("Company address", &record.company_address),
            ("Contact", &contact_line(record)),
            ("Client", &record.client_name),
            ("Site address", &record.site_address),
            ("Trade", &record.trade),
            ("Start date", &record.start_date),
            ("Duration", &record.duration),
            ("Number of operatives", &record.operatives),
            ("Site supervisor", &record.supervisor),
        ]),
    );
    doc.section("scope", "Scope of Works", &paragraphs_html(&record.scope));
    doc.section("pre-start-checks", "Pre-start Checks", &checklist(&record.checks));
    doc.section(
        "risk-assessment",
        "Risk Assessment",
        &hazard_table(&record.hazards, NO_HAZARDS),
    );
    doc.section(
        "method-statement",
        "Method Statement",
        &method_statement(&record.method_statement),
    );
    for extra in &record.extra_sections {
        let body = paragraphs_html(&extra.text);
        let heading = if extra.title.trim().is_empty() {
            title_case(&extra.key.replace('_', " "))
        } else {
            sanitize(&extra.title)
        };
        doc.section(&format!("extra-{}", section_id(&extra.key)), &heading, &body);
    }
    doc.section("ppe", "Personal Protective Equipment", &ppe_block(&record.ppe));
    doc.section("coshh", "COSHH Substances", &substance_table(&record.substances));
    doc.section(
        "emergency",
        "Emergency Arrangements",
        &key_value_table(&[
            ("First aider", &record.first_aider),
            ("Nearest A&E hospital", &record.hospital),
            ("Fire assembly point", &record.fire_assembly),
            ("Emergency contact", &record.emergency_contact),
        ]),
    );
    doc.section("notes", "Additional Notes", &paragraphs_html(&record.additional_notes));
    doc.section_on_new_page(
        "sign-off",
        "Operative Briefing & Acknowledgement",
        &format!(
            "<p>I confirm that I have read and understood this risk assessment and method statement and will follow the control measures described.</p>{}",
            signature_table(
                signature_rows(&record.operatives),
                &["Name", "Signature", "Date"]
            )
        ),
    );

    doc.finish("This document must be reviewed if the scope of work, site conditions or personnel change.")
}

fn contact_line(record: &RamsRecord) -> String {
    [record.contact_name.trim(), record.contact_phone.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<&str>>()
        .join(" - ")
}

fn checklist(checks: &[CheckRow]) -> String {
    let checks: Vec<&CheckRow> = checks
        .iter()
        .filter(|check| !check.question.trim().is_empty())
        .collect();
    if checks.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        "<table class=\"checklist\"><thead><tr><th>Check</th><th class=\"answer\">Answer</th></tr></thead><tbody>",
    );
    for check in checks {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"answer\">{}</td></tr>",
            or_dash(&check.question),
            or_dash(&check.answer)
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Multi-line method statements render as numbered steps; a single
/// paragraph renders as prose.
fn method_statement(text: &str) -> String {
    let steps = crate::sanitize::paragraphs(text);
    match steps.len() {
        0 => String::new(),
        1 => paragraphs_html(text),
        _ => {
            let mut html = String::from("<ol class=\"method-steps\">");
            for step in &steps {
                let _ = write!(html, "<li>{}</li>", escape_html(step));
            }
            html.push_str("</ol>");
            html
        }
    }
}

fn section_id(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}
