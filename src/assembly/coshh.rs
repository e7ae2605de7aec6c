use serde::{Deserialize, Serialize};

use super::{
    key_value_table, paragraphs_html, ppe_block, signature_rows, signature_table,
    substance_table, Header, HtmlDocument, PpeRow, SubstanceRow,
};
use crate::sanitize::{sanitize, title_case};

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CoshhRecord {
    pub company_name: String,
    pub company_address: String,
    pub logo: String,
    pub reference: String,
    pub assessor: String,
    pub assessment_date: String,
    pub review_date: String,
    pub site_address: String,
    pub activity: String,
    pub operatives: String,
    pub substances: Vec<SubstanceRow>,
    pub ppe: Vec<PpeRow>,
    pub storage: String,
    pub disposal: String,
    pub first_aid: String,
    pub emergency_procedures: String,
    pub monitoring: String,
    pub generated_at: String,
}

const NO_SUBSTANCES: &str =
    "<p class=\"advisory\">No substances were recorded for this assessment.</p>";

pub(super) fn render(record: &CoshhRecord) -> String {
    let activity_title = record
        .activity
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| title_case(&sanitize(line)))
        .unwrap_or_default();
    let mut doc = HtmlDocument::new("COSHH Assessment");

    doc.header(&Header {
        title: "COSHH Assessment",
        subtitle: if activity_title.is_empty() || activity_title.chars().count() > 80 {
            "Control of Substances Hazardous to Health".to_string()
        } else {
            activity_title
        },
        company: &record.company_name,
        reference: &record.reference,
        generated_at: &record.generated_at,
        logo: &record.logo,
    });

    doc.section(
        "assessment-details",
        "Assessment Details",
        &key_value_table(&[
            ("Company", &record.company_name),
            ("Company address", &record.company_address),
            ("Site address", &record.site_address),
            ("Assessor", &record.assessor),
            ("Assessment date", &record.assessment_date),
            ("Review date", &record.review_date),
            ("Persons exposed", &record.operatives),
        ]),
    );
    doc.section("activity", "Work Activity", &paragraphs_html(&record.activity));

    let substances = substance_table(&record.substances);
    doc.section(
        "substances",
        "Substances & Hazards",
        if substances.is_empty() {
            NO_SUBSTANCES
        } else {
            substances.as_str()
        },
    );
    doc.section("ppe", "Personal Protective Equipment", &ppe_block(&record.ppe));

    let mut storage = String::new();
    for (heading, text) in [("Storage", &record.storage), ("Disposal", &record.disposal)] {
        let body = paragraphs_html(text);
        if !body.is_empty() {
            storage.push_str(&format!("<h3>{heading}</h3>{body}"));
        }
    }
    doc.section("storage-disposal", "Storage & Disposal", &storage);

    let mut emergency = String::new();
    for (heading, text) in [
        ("First aid", &record.first_aid),
        ("Spills & emergencies", &record.emergency_procedures),
    ] {
        let body = paragraphs_html(text);
        if !body.is_empty() {
            emergency.push_str(&format!("<h3>{heading}</h3>{body}"));
        }
    }
    doc.section("emergency", "First Aid & Emergency Procedures", &emergency);
    doc.section(
        "monitoring",
        "Monitoring & Health Surveillance",
        &paragraphs_html(&record.monitoring),
    );
    doc.section_on_new_page(
        "sign-off",
        "Assessment Briefing",
        &format!(
            "<p>The persons below have been briefed on the hazards and controls in this assessment.</p>{}",
            signature_table(
                signature_rows(&record.operatives),
                &["Name", "Signature", "Date"]
            )
        ),
    );

    doc.finish("Keep safety data sheets for every substance available on site. Review this assessment if products or methods change.")
}

#[cfg(test)]
mod tests {
    use super::super::{assemble, DocumentData};
    use super::*;

    fn record() -> CoshhRecord {
        CoshhRecord {
            company_name: "Brush & Roller Ltd".to_string(),
            assessor: "Amy Clarke".to_string(),
            activity: "exterior painting of windows".to_string(),
            substances: vec![SubstanceRow {
                name: "White Spirit".to_string(),
                category: "Chemicals & Solvents".to_string(),
                hazard: "Flammable liquid and vapour. Harmful if swallowed.".to_string(),
                controls: "Ventilate.".to_string(),
            }],
            storage: "Locked metal cabinet.".to_string(),
            generated_at: "01/02/2026 10:00".to_string(),
            ..CoshhRecord::default()
        }
    }

    #[test]
    fn renders_substances_with_pictograms() {
        let html = assemble(&DocumentData::Coshh(record()));
        assert!(html.contains("<p class=\"subtitle\">Exterior Painting Of Windows</p>"));
        assert!(html.contains("id=\"substances\""));
        assert!(html.contains("icon-ghs02-flammable"));
        assert!(html.contains("icon-ghs07-harmful"));
        assert!(html.contains("<h3>Storage</h3>"));
        assert!(!html.contains("<h3>Disposal</h3>"));
        assert!(!html.contains("id=\"monitoring\""));
    }

    #[test]
    fn empty_record_still_assembles() {
        let html = assemble(&DocumentData::Coshh(CoshhRecord::default()));
        assert!(html.contains("No substances were recorded"));
        assert!(html.contains("Control of Substances Hazardous to Health"));
        assert!(html.ends_with("</html>"));
    }
}
