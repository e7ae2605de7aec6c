use serde::{Deserialize, Serialize};

use super::{
    bullet_list, hazard_table, key_value_table, paragraphs_html, signature_rows, signature_table,
    Header, HazardRow, HtmlDocument,
};
use crate::sanitize::{sanitize, title_case};

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ToolboxRecord {
    pub company_name: String,
    pub logo: String,
    pub reference: String,
    pub topic: String,
    pub presenter: String,
    pub talk_date: String,
    pub location: String,
    pub duration: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub hazards: Vec<HazardRow>,
    pub questions: Vec<String>,
    pub notes: String,
    pub attendees: String,
    pub generated_at: String,
}

pub(super) fn render(record: &ToolboxRecord) -> String {
    let topic = title_case(&sanitize(&record.topic));
    let mut doc = HtmlDocument::new(&format!("Toolbox Talk - {topic}"));

    doc.header(&Header {
        title: "Toolbox Talk",
        subtitle: topic,
        company: &record.company_name,
        reference: &record.reference,
        generated_at: &record.generated_at,
        logo: &record.logo,
    });

    doc.section(
        "talk-details",
        "Talk Details",
        &key_value_table(&[
            ("Company", &record.company_name),
            ("Presented by", &record.presenter),
            ("Date", &record.talk_date),
            ("Location", &record.location),
            ("Duration", &record.duration),
        ]),
    );
    doc.section("summary", "Introduction", &paragraphs_html(&record.summary));
    doc.section("key-points", "Key Points", &bullet_list(&record.key_points));
    if record.hazards.iter().any(|row| !row.label.trim().is_empty()) {
        doc.section(
            "hazards",
            "Hazards & Controls",
            &hazard_table(&record.hazards, ""),
        );
    }
    doc.section(
        "discussion",
        "Discussion Questions",
        &bullet_list(&record.questions),
    );
    doc.section("notes", "Notes", &paragraphs_html(&record.notes));
    doc.section_on_new_page(
        "attendance",
        "Attendance Register",
        &format!(
            "<p>By signing below, attendees confirm they received and understood this briefing.</p>{}",
            signature_table(
                signature_rows(&record.attendees),
                &["Name", "Company", "Signature"]
            )
        ),
    );

    doc.finish("Toolbox talks should be delivered before work starts and repeated when conditions change.")
}

#[cfg(test)]
mod tests {
    use super::super::{assemble, DocumentData};
    use super::*;

    #[test]
    fn renders_topic_points_and_register() {
        let record = ToolboxRecord {
            topic: "working at height".to_string(),
            presenter: "Sam".to_string(),
            key_points: vec!["Inspect ladders .".to_string(), "  ".to_string()],
            questions: vec!["Who checked the tower?".to_string()],
            attendees: "4".to_string(),
            ..ToolboxRecord::default()
        };
        let html = assemble(&DocumentData::Toolbox(record));
        assert!(html.contains("<p class=\"subtitle\">Working At Height</p>"));
        assert!(html.contains("<ul><li>Inspect ladders.</li></ul>"));
        assert!(html.contains("id=\"discussion\""));
        assert!(!html.contains("id=\"hazards\""));
        let start = html.find("class=\"signatures\"").unwrap_or(0);
        assert_eq!(html[start..].matches("<tr><td>").count(), 4);
    }

    #[test]
    fn empty_record_has_single_register_row() {
        let html = assemble(&DocumentData::Toolbox(ToolboxRecord::default()));
        let start = html.find("class=\"signatures\"").unwrap_or(0);
        assert_eq!(html[start..].matches("<tr><td>").count(), 1);
        assert!(!html.contains("id=\"key-points\""));
    }

    #[test]
    fn oversized_attendance_is_capped() {
        let record = ToolboxRecord {
            attendees: "2000000".to_string(),
            ..ToolboxRecord::default()
        };
        let html = assemble(&DocumentData::Toolbox(record));
        let start = html.find("class=\"signatures\"").unwrap_or(0);
        assert_eq!(
            html[start..].matches("<tr><td>").count(),
            super::super::MAX_SIGNATURE_ROWS
        );
        assert!(html.len() < 100_000);
    }
}
