//! Static domain content: trades and their job clusters, hazards, PPE,
//! COSHH substances and toolbox talk topics.
//!
//! Tables are built once on first access and shared by reference for the
//! life of the process. Lookups by unknown names return `None` or an empty
//! slice; user-entered custom hazards and substances will never resolve.

mod hazards;
mod ppe;
mod substances;
mod topics;
mod trades;

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub use hazards::{Hazard, HazardGroup};
pub use ppe::PpeDefinition;
pub use substances::{Substance, SubstanceCategory};
pub use topics::{TalkTopic, CUSTOM_TOPIC};
pub use trades::{ExtraSection, Job, Trade, CUSTOM_JOB};

pub struct Catalog {
    hazards: HashMap<&'static str, &'static Hazard>,
    substances: HashMap<&'static str, &'static Substance>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog {
    hazards: hazards::HAZARDS.iter().map(|h| (h.key, h)).collect(),
    substances: substances::SUBSTANCE_LIBRARY
        .iter()
        .flat_map(|category| category.substances.iter())
        .map(|s| (s.name, s))
        .collect(),
});

pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    pub fn trades(&self) -> &'static [Trade] {
        trades::TRADES
    }
    pub fn trade(&self, name: &str) -> Option<&'static Trade> {
        trades::TRADES.iter().find(|trade| trade.name == name)
    }
    pub fn jobs_of(&self, trade: &str) -> &'static [Job] {
        self.trade(trade).map(|trade| trade.jobs).unwrap_or(&[])
    }
    pub fn job(&self, trade: &str, job: &str) -> Option<&'static Job> {
        self.jobs_of(trade).iter().find(|j| j.name == job)
    }
    pub fn hazard_meta(&self, key: &str) -> Option<&'static Hazard> {
        self.hazards.get(key).copied()
    }
    pub fn hazards(&self) -> &'static [Hazard] {
        hazards::HAZARDS
    }
    pub fn hazard_groups(&self) -> &'static [HazardGroup] {
        hazards::HAZARD_GROUPS
    }
    pub fn substance_library(&self) -> &'static [SubstanceCategory] {
        substances::SUBSTANCE_LIBRARY
    }
    pub fn substance_category(&self, name: &str) -> Option<&'static SubstanceCategory> {
        substances::SUBSTANCE_LIBRARY
            .iter()
            .find(|category| category.name == name)
    }
    pub fn substance(&self, name: &str) -> Option<&'static Substance> {
        self.substances.get(name).copied()
    }
    pub fn ppe_definitions(&self) -> &'static [PpeDefinition] {
        ppe::PPE_DEFINITIONS
    }
    pub fn ppe_item(&self, item: &str) -> Option<&'static PpeDefinition> {
        ppe::PPE_DEFINITIONS.iter().find(|ppe| ppe.item == item)
    }
    pub fn extra_section(&self, key: &str) -> Option<&'static ExtraSection> {
        trades::EXTRA_SECTIONS.iter().find(|section| section.key == key)
    }
    pub fn topics(&self) -> &'static [TalkTopic] {
        topics::TALK_TOPICS
    }
    pub fn topic(&self, name: &str) -> Option<&'static TalkTopic> {
        topics::TALK_TOPICS.iter().find(|topic| topic.name == name)
    }

    /// Recommended PPE for a selection: the trade's base kit, then one
    /// entry per hazard tag in hazard order, then job-specific extras.
    /// Duplicates keep their first position.
    pub fn recommend_ppe(
        &self,
        trade: Option<&Trade>,
        hazard_keys: &[String],
        job: Option<&Job>,
    ) -> Vec<&'static PpeDefinition> {
        let mut recommended: Vec<&'static PpeDefinition> = Vec::new();
        let mut push = |definition: &'static PpeDefinition| {
            if !recommended.iter().any(|r| r.item == definition.item) {
                recommended.push(definition);
            }
        };

        for item in trade.map(|t| t.base_ppe).unwrap_or(&[]) {
            if let Some(definition) = self.ppe_item(item) {
                push(definition);
            }
        }
        for key in hazard_keys {
            let Some(hazard) = self.hazard_meta(key) else {
                continue;
            };
            if let Some(definition) = ppe::PPE_DEFINITIONS
                .iter()
                .find(|ppe| ppe.tag == hazard.tag)
            {
                push(definition);
            }
        }
        for item in job.map(|j| j.ppe).unwrap_or(&[]) {
            if let Some(definition) = self.ppe_item(item) {
                push(definition);
            }
        }
        recommended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_job_hazard_resolves() {
        let catalog = catalog();
        for trade in catalog.trades() {
            for job in trade.jobs {
                for key in job.hazards {
                    assert!(
                        catalog.hazard_meta(key).is_some(),
                        "{} / {} references unknown hazard {key}",
                        trade.name,
                        job.name
                    );
                }
            }
        }
    }

    #[test]
    fn every_topic_and_group_hazard_resolves() {
        let catalog = catalog();
        for topic in catalog.topics() {
            for key in topic.hazards {
                assert!(catalog.hazard_meta(key).is_some(), "{key}");
            }
        }
        for group in catalog.hazard_groups() {
            for key in group.hazards {
                assert!(catalog.hazard_meta(key).is_some(), "{key}");
            }
        }
    }

    #[test]
    fn every_hazard_belongs_to_exactly_one_group() {
        let catalog = catalog();
        for hazard in catalog.hazards() {
            let groups = catalog
                .hazard_groups()
                .iter()
                .filter(|group| group.hazards.contains(&hazard.key))
                .count();
            assert_eq!(groups, 1, "{}", hazard.key);
        }
    }

    #[test]
    fn risk_ratings_sit_inside_their_bands_and_never_increase() {
        for hazard in catalog().hazards() {
            for rating in [hazard.initial, hazard.residual] {
                let (low, high) = rating.level.band();
                assert!(
                    (low..=high).contains(&rating.score),
                    "{} score {} outside {:?}",
                    hazard.key,
                    rating.score,
                    rating.level
                );
            }
            assert!(hazard.residual.score <= hazard.initial.score, "{}", hazard.key);
            assert!(hazard.residual.level <= hazard.initial.level, "{}", hazard.key);
        }
    }

    #[test]
    fn job_names_are_unique_within_a_trade_and_end_with_custom() {
        for trade in catalog().trades() {
            let names: HashSet<&str> = trade.jobs.iter().map(|job| job.name).collect();
            assert_eq!(names.len(), trade.jobs.len(), "{}", trade.name);
            assert!(trade.jobs.last().is_some_and(|job| job.is_custom()));
        }
    }

    #[test]
    fn job_extras_and_ppe_resolve() {
        let catalog = catalog();
        for trade in catalog.trades() {
            for item in trade.base_ppe {
                assert!(catalog.ppe_item(item).is_some(), "{item}");
            }
            for job in trade.jobs {
                for key in job.extra_sections {
                    assert!(catalog.extra_section(key).is_some(), "{key}");
                }
                for item in job.ppe {
                    assert!(catalog.ppe_item(item).is_some(), "{item}");
                }
            }
        }
    }

    #[test]
    fn unknown_lookups_return_nothing() {
        let catalog = catalog();
        assert!(catalog.hazard_meta("made_up").is_none());
        assert!(catalog.jobs_of("Astronaut").is_empty());
        assert!(catalog.substance("Unobtainium").is_none());
        assert!(catalog.topic("Juggling").is_none());
    }

    #[test]
    fn recommended_ppe_is_deduplicated_in_first_seen_order() {
        let catalog = catalog();
        let trade = catalog.trade("Electrician");
        let job = catalog.job("Electrician", "Full House Rewire");
        let hazards: Vec<String> = job
            .map(|j| j.hazards.iter().map(|h| h.to_string()).collect())
            .unwrap_or_default();

        let items: Vec<&str> = catalog
            .recommend_ppe(trade, &hazards, job)
            .iter()
            .map(|ppe| ppe.item)
            .collect();

        assert_eq!(items.first(), Some(&"Safety Boots"));
        assert!(items.contains(&"Insulated Gloves"));
        assert!(items.contains(&"FFP3 Dust Mask"));
        let unique: HashSet<&&str> = items.iter().collect();
        assert_eq!(unique.len(), items.len());
    }
}
