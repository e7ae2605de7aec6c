//! Deterministic HTML assembly for generated documents.
//!
//! Each document type renders a fixed sequence of sections. A section whose
//! backing data is empty is left out, but the relative order of the
//! sections that remain never changes. The only time-dependent value in
//! the output is the record's `generated_at` label, so assembling the same
//! record twice yields byte-identical HTML.

mod coshh;
mod rams;
mod toolbox;

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::classify::{classify_hazard_phrases, classify_ppe, render_icon_strip, GhsClass};
use crate::models::document::DocumentKind;
use crate::sanitize::{escape_html, paragraphs, sanitize};

pub use coshh::CoshhRecord;
pub use rams::{CheckRow, ExtraSectionRow, RamsRecord};
pub use toolbox::ToolboxRecord;

/// Pre-assembly record for any document type. This is what gets stored
/// as a document's payload so the HTML can be rebuilt later.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum DocumentData {
    #[serde(rename = "RAMS")]
    Rams(RamsRecord),
    #[serde(rename = "COSHH")]
    Coshh(CoshhRecord),
    #[serde(rename = "TOOLBOX")]
    Toolbox(ToolboxRecord),
}

impl DocumentData {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentData::Rams(_) => DocumentKind::Rams,
            DocumentData::Coshh(_) => DocumentKind::Coshh,
            DocumentData::Toolbox(_) => DocumentKind::Toolbox,
        }
    }
}

pub fn assemble(data: &DocumentData) -> String {
    match data {
        DocumentData::Rams(record) => rams::render(record),
        DocumentData::Coshh(record) => coshh::render(record),
        DocumentData::Toolbox(record) => toolbox::render(record),
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HazardRow {
    pub label: String,
    pub risk: String,
    pub control: String,
    pub initial_risk: String,
    pub residual_risk: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct PpeRow {
    pub item: String,
    pub reason: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SubstanceRow {
    pub name: String,
    pub category: String,
    pub hazard: String,
    pub controls: String,
}

/// Style class for a risk label. Matches on the words in the label rather
/// than the score so hand-typed labels colour the same way.
pub fn risk_class(label: &str) -> &'static str {
    if label.contains("High") {
        "risk-high"
    } else if label.contains("Medium") {
        "risk-medium"
    } else {
        "risk-low"
    }
}

/// Upper bound on rows in a signature register.
pub const MAX_SIGNATURE_ROWS: usize = 100;

fn leading_digits(value: &str) -> String {
    value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect()
}

/// Number of signature rows: the leading integer of the operatives field,
/// with anything unparseable or below one giving a single row. Counts
/// above `MAX_SIGNATURE_ROWS` are clamped to it.
pub fn signature_rows(operatives: &str) -> usize {
    let digits = leading_digits(operatives);
    if digits.is_empty() {
        return 1;
    }
    digits
        .parse::<usize>()
        .map_or(MAX_SIGNATURE_ROWS, |count| count.clamp(1, MAX_SIGNATURE_ROWS))
}

/// Whether the field asks for more rows than a register can hold.
pub fn exceeds_signature_rows(operatives: &str) -> bool {
    let digits = leading_digits(operatives);
    !digits.is_empty()
        && digits
            .parse::<usize>()
            .map_or(true, |count| count > MAX_SIGNATURE_ROWS)
}

const STYLE: &str = r#"
@page { size: A4; margin: 14mm 12mm; }
* { box-sizing: border-box; }
body { font-family: Arial, Helvetica, sans-serif; font-size: 10.5pt; color: #1f2937; margin: 0; line-height: 1.45; }
.document { max-width: 190mm; margin: 0 auto; }
.doc-header { border-bottom: 3px solid #f59e0b; padding-bottom: 8px; margin-bottom: 14px; display: flex; justify-content: space-between; align-items: flex-end; }
.doc-header .logo { max-height: 48px; max-width: 160px; }
.doc-header h1 { font-size: 18pt; margin: 0; color: #111827; }
.doc-header .subtitle { font-size: 12pt; margin: 2px 0 0; color: #374151; }
.doc-header .meta { text-align: right; font-size: 9pt; color: #4b5563; }
.doc-section { margin: 0 0 14px; }
.doc-section h2 { font-size: 12pt; background: #111827; color: #ffffff; padding: 4px 8px; margin: 0 0 6px; }
.doc-section h3 { font-size: 10.5pt; margin: 8px 0 4px; }
.doc-section p { margin: 0 0 6px; }
.page-break { page-break-before: always; }
table { width: 100%; border-collapse: collapse; margin-bottom: 6px; }
thead { display: table-header-group; }
tr { page-break-inside: avoid; }
th, td { border: 1px solid #d1d5db; padding: 4px 6px; text-align: left; vertical-align: top; }
th { background: #f3f4f6; font-weight: 600; }
table.key-value th { width: 32%; }
.risk { font-weight: 700; text-align: center; white-space: nowrap; }
.risk-high { background: #fecaca; color: #7f1d1d; }
.risk-medium { background: #fde68a; color: #78350f; }
.risk-low { background: #bbf7d0; color: #14532d; }
.advisory { border: 1px dashed #9ca3af; padding: 6px 8px; color: #4b5563; font-style: italic; }
.icon-strip { display: flex; flex-wrap: wrap; gap: 8px; margin: 4px 0 8px; }
.icon { margin: 0; width: 64px; text-align: center; font-size: 7.5pt; }
.icon img { width: 40px; height: 40px; display: block; margin: 0 auto 2px; }
.checklist .answer { width: 70px; text-align: center; font-weight: 600; }
.signatures td { height: 28px; }
.doc-footer { border-top: 1px solid #d1d5db; margin-top: 16px; padding-top: 4px; font-size: 8pt; color: #6b7280; }
"#;

struct HtmlDocument {
    buf: String,
}

impl HtmlDocument {
    fn new(title: &str) -> Self {
        let mut buf = String::with_capacity(32 * 1024);
        let _ = write!(
            buf,
            "<!DOCTYPE html><html lang=\"en-GB\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body><div class=\"document\">",
            escape_html(title),
            STYLE
        );
        Self { buf }
    }

    fn header(&mut self, header: &Header<'_>) {
        self.buf.push_str("<header class=\"doc-header\"><div>");
        if !header.logo.trim().is_empty() {
            let _ = write!(
                self.buf,
                "<img class=\"logo\" src=\"{}\" alt=\"\">",
                escape_html(header.logo.trim())
            );
        }
        let _ = write!(
            self.buf,
            "<h1>{}</h1><p class=\"subtitle\">{}</p></div><div class=\"meta\"><div class=\"company\">{}</div>",
            escape_html(header.title),
            escape_html(&header.subtitle),
            or_dash(header.company)
        );
        if !header.reference.trim().is_empty() {
            let _ = write!(
                self.buf,
                "<div class=\"reference\">Ref: {}</div>",
                escape_html(header.reference.trim())
            );
        }
        let _ = write!(
            self.buf,
            "<div class=\"generated-at\">Generated {}</div></div></header>",
            or_dash(header.generated_at)
        );
    }

    /// Appends a section unless `body` is empty.
    fn section(&mut self, id: &str, heading: &str, body: &str) {
        self.section_with_class(id, heading, body, "doc-section");
    }

    fn section_on_new_page(&mut self, id: &str, heading: &str, body: &str) {
        self.section_with_class(id, heading, body, "doc-section page-break");
    }

    fn section_with_class(&mut self, id: &str, heading: &str, body: &str, class: &str) {
        if body.is_empty() {
            return;
        }
        let _ = write!(
            self.buf,
            "<section class=\"{class}\" id=\"{id}\"><h2>{}</h2>{body}</section>",
            escape_html(heading)
        );
    }

    fn finish(mut self, footer: &str) -> String {
        let _ = write!(
            self.buf,
            "<footer class=\"doc-footer\">{}</footer></div></body></html>",
            escape_html(footer)
        );
        self.buf
    }
}

struct Header<'a> {
    title: &'a str,
    subtitle: String,
    company: &'a str,
    reference: &'a str,
    generated_at: &'a str,
    logo: &'a str,
}

fn or_dash(value: &str) -> String {
    let value = sanitize(value);
    if value.is_empty() {
        "—".to_string()
    } else {
        escape_html(&value)
    }
}

fn paragraphs_html(text: &str) -> String {
    paragraphs(text)
        .iter()
        .map(|paragraph| format!("<p>{}</p>", escape_html(paragraph)))
        .collect()
}

fn key_value_table(rows: &[(&str, &str)]) -> String {
    let mut html = String::from("<table class=\"key-value\"><tbody>");
    for (key, value) in rows {
        let _ = write!(html, "<tr><th>{}</th><td>{}</td></tr>", escape_html(key), or_dash(value));
    }
    html.push_str("</tbody></table>");
    html
}

fn bullet_list(items: &[String]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| sanitize(item))
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul>");
    for item in items {
        let _ = write!(html, "<li>{}</li>", escape_html(&item));
    }
    html.push_str("</ul>");
    html
}

fn risk_cell(label: &str) -> String {
    let label = sanitize(label);
    if label.is_empty() {
        return "<td class=\"risk\">—</td>".to_string();
    }
    format!(
        "<td class=\"risk {}\">{}</td>",
        risk_class(&label),
        escape_html(&label)
    )
}

/// Hazard table, or an advisory paragraph when there are no rows.
fn hazard_table(rows: &[HazardRow], advisory: &str) -> String {
    let rows: Vec<&HazardRow> = rows.iter().filter(|row| !row.label.trim().is_empty()).collect();
    if rows.is_empty() {
        return format!("<p class=\"advisory\">{}</p>", escape_html(advisory));
    }
    let mut html = String::from(
        "<table class=\"hazards\"><thead><tr><th>Hazard</th><th>Risk</th><th>Initial</th><th>Control measures</th><th>Residual</th></tr></thead><tbody>",
    );
    for row in rows {
        let _ = write!(
            html,
            "<tr><td><strong>{}</strong></td><td>{}</td>{}<td>{}</td>{}</tr>",
            or_dash(&row.label),
            or_dash(&row.risk),
            risk_cell(&row.initial_risk),
            or_dash(&row.control),
            risk_cell(&row.residual_risk)
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn ppe_block(rows: &[PpeRow]) -> String {
    let rows: Vec<&PpeRow> = rows.iter().filter(|row| !row.item.trim().is_empty()).collect();
    if rows.is_empty() {
        return String::new();
    }
    let icons: Vec<_> = rows.iter().map(|row| classify_ppe(&row.item)).collect();
    let mut html = render_icon_strip(&icons);
    html.push_str("<table class=\"ppe\"><thead><tr><th>Item</th><th>Reason for use</th></tr></thead><tbody>");
    for row in rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            or_dash(&row.item),
            or_dash(&row.reason)
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn substance_table(rows: &[SubstanceRow]) -> String {
    let rows: Vec<&SubstanceRow> = rows.iter().filter(|row| !row.name.trim().is_empty()).collect();
    if rows.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        "<table class=\"substances\"><thead><tr><th>Substance</th><th>Hazards</th><th>Control measures</th></tr></thead><tbody>",
    );
    for row in rows {
        let pictograms: Vec<Option<GhsClass>> = classify_hazard_phrases(&row.hazard);
        let _ = write!(
            html,
            "<tr class=\"substance\"><td><strong>{}</strong>{}</td><td>{}{}</td><td>{}</td></tr>",
            or_dash(&row.name),
            category_note(&row.category),
            render_icon_strip(&pictograms),
            or_dash(&row.hazard),
            or_dash(&row.controls)
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn category_note(category: &str) -> String {
    let category = sanitize(category);
    if category.is_empty() {
        String::new()
    } else {
        format!("<br><small>{}</small>", escape_html(&category))
    }
}

/// Blank signature register with `rows` lines.
fn signature_table(rows: usize, columns: &[&str]) -> String {
    let mut html = String::from("<table class=\"signatures\"><thead><tr><th>#</th>");
    for column in columns {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr></thead><tbody>");
    for number in 1..=rows {
        let _ = write!(html, "<tr><td>{number}</td>");
        for _ in columns {
            html.push_str("<td></td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
