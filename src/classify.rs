//! Keyword classification of free text into PPE icon types and GHS
//! pictogram classes, plus the icon strip used by document sections.
//!
//! Each classifier is an ordered rule table: the first rule with a keyword
//! contained in the lower-cased input wins. No match yields `None` and the
//! caller renders nothing for that item.

use serde::Serialize;
use std::fmt::Write as _;

use crate::sanitize::escape_html;

/// Category that can be drawn as an icon in a strip.
pub trait IconCategory: Copy + PartialEq {
    fn slug(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn asset_dir() -> &'static str;
}

struct Rule<T: 'static> {
    keywords: &'static [&'static str],
    category: T,
}

fn classify<T: Copy>(rules: &[Rule<T>], text: &str) -> Option<T> {
    let text = text.to_lowercase();
    if text.trim().is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|rule| rule.category)
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PpeType {
    Harness,
    FaceShield,
    Goggles,
    Respirator,
    Boots,
    Gloves,
    HighVis,
    HardHat,
    Overalls,
    EarProtection,
}

// "ear" is a substring of footwear, gear and wear, so hearing protection
// is matched last.
static PPE_RULES: &[Rule<PpeType>] = &[
    Rule {
        keywords: &["harness", "lanyard", "fall arrest"],
        category: PpeType::Harness,
    },
    Rule {
        keywords: &["face shield", "visor"],
        category: PpeType::FaceShield,
    },
    Rule {
        keywords: &["goggle", "glasses", "eye"],
        category: PpeType::Goggles,
    },
    Rule {
        keywords: &["mask", "respirator", "ffp", "rpe"],
        category: PpeType::Respirator,
    },
    Rule {
        keywords: &["boot", "footwear", "shoe"],
        category: PpeType::Boots,
    },
    Rule {
        keywords: &["glove"],
        category: PpeType::Gloves,
    },
    Rule {
        keywords: &["hi-vis", "hi vis", "high vis", "high-vis", "vest"],
        category: PpeType::HighVis,
    },
    Rule {
        keywords: &["hard hat", "helmet", "head protection"],
        category: PpeType::HardHat,
    },
    Rule {
        keywords: &["coverall", "overall", "apron"],
        category: PpeType::Overalls,
    },
    Rule {
        keywords: &["ear", "hearing", "defender"],
        category: PpeType::EarProtection,
    },
];

impl IconCategory for PpeType {
    fn slug(&self) -> &'static str {
        match self {
            PpeType::Harness => "harness",
            PpeType::FaceShield => "face-shield",
            PpeType::Goggles => "goggles",
            PpeType::Respirator => "respirator",
            PpeType::Boots => "boots",
            PpeType::Gloves => "gloves",
            PpeType::HighVis => "hi-vis",
            PpeType::HardHat => "hard-hat",
            PpeType::Overalls => "overalls",
            PpeType::EarProtection => "ear-protection",
        }
    }
    fn label(&self) -> &'static str {
        match self {
            PpeType::Harness => "Safety harness",
            PpeType::FaceShield => "Face shield",
            PpeType::Goggles => "Eye protection",
            PpeType::Respirator => "Respiratory protection",
            PpeType::Boots => "Safety footwear",
            PpeType::Gloves => "Gloves",
            PpeType::HighVis => "High visibility clothing",
            PpeType::HardHat => "Head protection",
            PpeType::Overalls => "Protective clothing",
            PpeType::EarProtection => "Hearing protection",
        }
    }
    fn asset_dir() -> &'static str {
        "/icons/ppe"
    }
}

pub fn classify_ppe(text: &str) -> Option<PpeType> {
    classify(PPE_RULES, text)
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhsClass {
    Explosive,
    Flammable,
    Oxidising,
    GasUnderPressure,
    Corrosive,
    Environmental,
    AcuteToxicity,
    SeriousHealthHazard,
    HealthHazard,
}

static GHS_RULES: &[Rule<GhsClass>] = &[
    Rule {
        keywords: &["explosive", "explode"],
        category: GhsClass::Explosive,
    },
    Rule {
        keywords: &["flammable", "combustible", "ignit"],
        category: GhsClass::Flammable,
    },
    Rule {
        keywords: &["oxidis", "oxidiz"],
        category: GhsClass::Oxidising,
    },
    Rule {
        keywords: &["pressurised", "pressurized", "under pressure", "compressed gas"],
        category: GhsClass::GasUnderPressure,
    },
    Rule {
        keywords: &["corrosive", "skin burns", "eye damage", "caustic", "acid"],
        category: GhsClass::Corrosive,
    },
    Rule {
        keywords: &["aquatic", "environment"],
        category: GhsClass::Environmental,
    },
    Rule {
        keywords: &["toxic", "fatal", "poison"],
        category: GhsClass::AcuteToxicity,
    },
    Rule {
        keywords: &[
            "carcinogen",
            "cancer",
            "mutagen",
            "respiratory sensitis",
            "silicosis",
            "organ",
            "lung",
        ],
        category: GhsClass::SeriousHealthHazard,
    },
    Rule {
        keywords: &["irritant", "irritat", "harmful", "dermatitis", "sensitis", "allergic", "drowsiness"],
        category: GhsClass::HealthHazard,
    },
];

impl IconCategory for GhsClass {
    fn slug(&self) -> &'static str {
        match self {
            GhsClass::Explosive => "ghs01-explosive",
            GhsClass::Flammable => "ghs02-flammable",
            GhsClass::Oxidising => "ghs03-oxidising",
            GhsClass::GasUnderPressure => "ghs04-gas",
            GhsClass::Corrosive => "ghs05-corrosive",
            GhsClass::AcuteToxicity => "ghs06-toxic",
            GhsClass::HealthHazard => "ghs07-harmful",
            GhsClass::SeriousHealthHazard => "ghs08-health",
            GhsClass::Environmental => "ghs09-environment",
        }
    }
    fn label(&self) -> &'static str {
        match self {
            GhsClass::Explosive => "Explosive",
            GhsClass::Flammable => "Flammable",
            GhsClass::Oxidising => "Oxidising",
            GhsClass::GasUnderPressure => "Gas under pressure",
            GhsClass::Corrosive => "Corrosive",
            GhsClass::AcuteToxicity => "Acute toxicity",
            GhsClass::HealthHazard => "Harmful / irritant",
            GhsClass::SeriousHealthHazard => "Serious health hazard",
            GhsClass::Environmental => "Hazardous to the environment",
        }
    }
    fn asset_dir() -> &'static str {
        "/icons/ghs"
    }
}

pub fn classify_hazard_class(text: &str) -> Option<GhsClass> {
    classify(GHS_RULES, text)
}

/// Classifies each sentence or clause of a hazard description so a single
/// substance can carry several pictograms.
pub fn classify_hazard_phrases(text: &str) -> Vec<Option<GhsClass>> {
    text.split(|c| c == '.' || c == ';')
        .map(classify_hazard_class)
        .collect()
}

/// Renders a row of icons, one per distinct category in first-seen order.
/// `None` entries are skipped; an input with no categories renders nothing.
pub fn render_icon_strip<T: IconCategory>(categories: &[Option<T>]) -> String {
    let mut seen: Vec<T> = Vec::new();
    for category in categories.iter().flatten() {
        if !seen.contains(category) {
            seen.push(*category);
        }
    }
    if seen.is_empty() {
        return String::new();
    }

    let mut html = String::from("<div class=\"icon-strip\">");
    for category in seen {
        let _ = write!(
            html,
            "<figure class=\"icon icon-{slug}\"><img src=\"{dir}/{slug}.svg\" alt=\"{label}\"><figcaption>{label}</figcaption></figure>",
            slug = category.slug(),
            dir = T::asset_dir(),
            label = escape_html(category.label()),
        );
    }
    html.push_str("</div>");
    html
}
