use serde::Serialize;

use super::hazards::HazardTag;

#[derive(Serialize, Debug)]
pub struct PpeDefinition {
    pub tag: HazardTag,
    pub item: &'static str,
    pub reason: &'static str,
}

pub static PPE_DEFINITIONS: &[PpeDefinition] = &[
    PpeDefinition {
        tag: HazardTag::General,
        item: "Safety Boots",
        reason: "Toe and mid-sole protection against dropped materials and sharp objects underfoot.",
    },
    PpeDefinition {
        tag: HazardTag::Electrical,
        item: "Insulated Gloves",
        reason: "Additional protection when working near conductors that cannot be made dead.",
    },
    PpeDefinition {
        tag: HazardTag::Dust,
        item: "FFP3 Dust Mask",
        reason: "Face-fit tested respiratory protection against fine and silica dust.",
    },
    PpeDefinition {
        tag: HazardTag::Dust,
        item: "Safety Goggles",
        reason: "Eye protection from dust and debris when drilling, chasing or cutting.",
    },
    PpeDefinition {
        tag: HazardTag::Height,
        item: "Hard Hat",
        reason: "Head protection from falling objects and low overhead structures.",
    },
    PpeDefinition {
        tag: HazardTag::Height,
        item: "Safety Harness",
        reason: "Fall arrest where collective edge protection cannot be provided.",
    },
    PpeDefinition {
        tag: HazardTag::Noise,
        item: "Ear Defenders",
        reason: "Hearing protection when noise exceeds the upper exposure action value.",
    },
    PpeDefinition {
        tag: HazardTag::ManualHandling,
        item: "Rigger Gloves",
        reason: "Grip and hand protection when carrying rough or heavy materials.",
    },
    PpeDefinition {
        tag: HazardTag::Chemical,
        item: "Nitrile Gloves",
        reason: "Skin protection from solvents, adhesives and cleaning chemicals.",
    },
    PpeDefinition {
        tag: HazardTag::HotWork,
        item: "Fire-Resistant Gloves",
        reason: "Protection from burns when using blowtorches or handling hot pipework.",
    },
    PpeDefinition {
        tag: HazardTag::HotWork,
        item: "Face Shield",
        reason: "Protection from sparks and molten spatter during hot works.",
    },
    PpeDefinition {
        tag: HazardTag::Sharps,
        item: "Cut-Resistant Gloves",
        reason: "Protection from blades, sheet metal and glass edges.",
    },
    PpeDefinition {
        tag: HazardTag::Asbestos,
        item: "Disposable Coveralls (Type 5/6)",
        reason: "Prevents fibre contamination of clothing if suspect material is disturbed.",
    },
    PpeDefinition {
        tag: HazardTag::Site,
        item: "Hi-Vis Vest",
        reason: "Visibility to plant operators, drivers and members of the public.",
    },
];
