use serde::Serialize;

/// Topic name that switches the toolbox wizard to a free-text talk.
pub const CUSTOM_TOPIC: &str = "Other (Custom)";

#[derive(Serialize, Debug)]
pub struct TalkTopic {
    pub name: &'static str,
    pub summary: &'static str,
    pub key_points: &'static [&'static str],
    pub hazards: &'static [&'static str],
    pub questions: &'static [&'static str],
}

pub static TALK_TOPICS: &[TalkTopic] = &[
    TalkTopic {
        name: "Working at Height",
        summary: "Falls from height remain the biggest cause of fatal injuries in construction. This talk covers choosing the right access equipment, checking it before use and the behaviours that keep us safe off the ground.",
        key_points: &[
            "Avoid work at height where it is reasonably practicable to do so.",
            "Use towers or podiums in preference to ladders for anything but short-duration work.",
            "Inspect access equipment before every use and report defects.",
            "Never overreach; move the equipment instead.",
        ],
        hazards: &["working_at_height", "falling_objects", "fragile_roof"],
        questions: &[
            "When did you last check the ladder you are using today?",
            "What would you do if you found a damaged scaffold board?",
        ],
    },
    TalkTopic {
        name: "Manual Handling",
        summary: "Musculoskeletal injuries cause more lost days than any other injury type in the trades. This talk covers planning lifts, using aids and recognising loads that need two people.",
        key_points: &[
            "Plan the lift and the route before picking anything up.",
            "Use trolleys, sack trucks and lifting aids wherever possible.",
            "Keep the load close to the waist and avoid twisting.",
            "Ask for help with heavy or awkward loads.",
        ],
        hazards: &["manual_handling", "slips_trips"],
        questions: &["Which loads on this job need a two-person lift?"],
    },
    TalkTopic {
        name: "Asbestos Awareness",
        summary: "Any building built before 2000 may contain asbestos. This talk covers where it is commonly found and what to do if you suspect you have disturbed it.",
        key_points: &[
            "Always check the asbestos survey before starting work.",
            "Common locations include textured coatings, floor tiles, soffits and pipe lagging.",
            "If you find suspect material, stop work, leave the area and report it.",
            "Never sweep up or vacuum suspect debris with a standard vacuum.",
        ],
        hazards: &["asbestos"],
        questions: &[
            "Where is the asbestos survey kept for this site?",
            "Who do you report suspect material to?",
        ],
    },
    TalkTopic {
        name: "Electrical Safety",
        summary: "Contact with live electricity can kill. This talk covers safe isolation, checking portable tools and avoiding hidden cables.",
        key_points: &[
            "Only competent persons work on electrical systems.",
            "Use 110V or battery tools on site and check leads before use.",
            "Scan walls and floors before drilling.",
            "Lock off and prove dead before touching any conductor.",
        ],
        hazards: &["live_electricity", "hidden_services"],
        questions: &["What is the safe isolation procedure on this site?"],
    },
    TalkTopic {
        name: "Silica Dust",
        summary: "Cutting, drilling and grinding concrete, brick and stone releases silica dust that causes irreversible lung disease. This talk covers controlling dust at source.",
        key_points: &[
            "Use water suppression or on-tool extraction on every cutting task.",
            "Wear a face-fit tested FFP3 mask and be clean shaven where it seals.",
            "Clean up with an H-class vacuum, never by dry sweeping.",
        ],
        hazards: &["silica", "dust_fumes"],
        questions: &["When was your mask last face-fit tested?"],
    },
    TalkTopic {
        name: "Slips, Trips & Falls",
        summary: "Most slips and trips are caused by poor housekeeping. This talk covers keeping walkways clear and managing cables and materials.",
        key_points: &[
            "Keep access routes clear of materials and waste.",
            "Route extension leads along walls, not across walkways.",
            "Clean up spills as soon as they happen.",
        ],
        hazards: &["slips_trips"],
        questions: &["Which areas on this site are trip hazards right now?"],
    },
    TalkTopic {
        name: "Fire Safety & Hot Works",
        summary: "Hot works cause a significant number of fires in buildings under refurbishment. This talk covers permits, fire watches and extinguisher use.",
        key_points: &[
            "Obtain a hot work permit where one is required.",
            "Remove or protect combustibles within 10 metres.",
            "Keep the correct extinguisher at hand and know how to use it.",
            "Carry out a fire watch for at least 60 minutes after finishing.",
        ],
        hazards: &["hot_works", "gas"],
        questions: &["Where is the nearest fire extinguisher and fire assembly point?"],
    },
    TalkTopic {
        name: CUSTOM_TOPIC,
        summary: "",
        key_points: &[],
        hazards: &[],
        questions: &[],
    },
];
