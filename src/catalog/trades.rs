use serde::Serialize;

/// Job name that switches the RAMS wizard to a free-text scope of work.
pub const CUSTOM_JOB: &str = "Other (Custom)";

#[derive(Serialize, Debug)]
pub struct Job {
    pub name: &'static str,
    pub description: &'static str,
    pub hazards: &'static [&'static str],
    pub questions: &'static [&'static str],
    pub extra_sections: &'static [&'static str],
    pub ppe: &'static [&'static str],
}

impl Job {
    pub fn is_custom(&self) -> bool {
        self.name == CUSTOM_JOB
    }
}

#[derive(Serialize, Debug)]
pub struct Trade {
    pub name: &'static str,
    pub base_ppe: &'static [&'static str],
    pub jobs: &'static [Job],
}

#[derive(Serialize, Debug)]
pub struct ExtraSection {
    pub key: &'static str,
    pub title: &'static str,
    pub prompt: &'static str,
}

const CUSTOM: Job = Job {
    name: CUSTOM_JOB,
    description: "",
    hazards: &[],
    questions: &[],
    extra_sections: &[],
    ppe: &[],
};

pub static EXTRA_SECTIONS: &[ExtraSection] = &[
    ExtraSection {
        key: "isolation_procedure",
        title: "Safe Isolation Procedure",
        prompt: "Describe how circuits will be isolated, locked off, proved dead and re-energised.",
    },
    ExtraSection {
        key: "gas_safety",
        title: "Gas Safety & Tightness Testing",
        prompt: "Describe isolation at the meter, purging, tightness testing and commissioning.",
    },
    ExtraSection {
        key: "working_at_height_plan",
        title: "Working at Height Plan",
        prompt: "Describe the access equipment, edge protection and rescue arrangements.",
    },
    ExtraSection {
        key: "hot_work_permit",
        title: "Hot Work Permit Arrangements",
        prompt: "Describe who issues the permit, the fire watch period and extinguisher provision.",
    },
    ExtraSection {
        key: "excavation_plan",
        title: "Excavation & Services Plan",
        prompt: "Describe service location, trench support, spoil storage and edge protection.",
    },
    ExtraSection {
        key: "temporary_works",
        title: "Temporary Works & Propping",
        prompt: "Describe the propping design, who checked it and the sequence for installing the lintel or beam.",
    },
];

pub static TRADES: &[Trade] = &[
    Trade {
        name: "Electrician",
        base_ppe: &["Safety Boots"],
        jobs: &[
            Job {
                name: "Full House Rewire",
                description: "Complete rewire of the property including removal of the existing wiring, first fix of new cables and back boxes, installation of a new consumer unit, second fix of accessories, and full testing and certification.",
                hazards: &[
                    "live_electricity",
                    "dust_fumes",
                    "manual_handling",
                    "working_at_height",
                    "hand_tools",
                    "asbestos",
                    "slips_trips",
                    "hidden_services",
                ],
                questions: &[
                    "Has the supply been isolated and locked off at the main switch?",
                    "Has the asbestos survey been reviewed for the property?",
                    "Will floorboards be lifted in occupied rooms?",
                    "Is the property occupied during the works?",
                ],
                extra_sections: &["isolation_procedure"],
                ppe: &["Insulated Gloves", "FFP3 Dust Mask", "Safety Goggles"],
            },
            Job {
                name: "Consumer Unit Replacement",
                description: "Replacement of the existing consumer unit with a new metal-clad unit with RCBO protection, including testing of all circuits and issue of an Electrical Installation Certificate.",
                hazards: &["live_electricity", "hand_tools", "dust_fumes", "asbestos"],
                questions: &[
                    "Has the DNO been contacted if the main fuse needs to be withdrawn?",
                    "Are existing circuits labelled and identified?",
                ],
                extra_sections: &["isolation_procedure"],
                ppe: &["Insulated Gloves"],
            },
            Job {
                name: "EICR / Periodic Inspection",
                description: "Periodic inspection and testing of the fixed electrical installation with an Electrical Installation Condition Report issued on completion.",
                hazards: &["live_electricity", "slips_trips", "lone_working"],
                questions: &["Has the client been told that the power will be interrupted?"],
                extra_sections: &[],
                ppe: &["Insulated Gloves"],
            },
            Job {
                name: "EV Charger Installation",
                description: "Installation of a dedicated electric vehicle charge point on an external wall, including a new radial circuit from the consumer unit and earthing arrangements.",
                hazards: &[
                    "live_electricity",
                    "hidden_services",
                    "manual_handling",
                    "hand_tools",
                    "adverse_weather",
                ],
                questions: &["Has the DNO notification been submitted?"],
                extra_sections: &[],
                ppe: &[],
            },
            CUSTOM,
        ],
    },
    Trade {
        name: "Plumber",
        base_ppe: &["Safety Boots"],
        jobs: &[
            Job {
                name: "Boiler Installation",
                description: "Removal of the existing boiler and installation of a new combination boiler, including flue, condensate, gas and water connections, system flush and commissioning.",
                hazards: &[
                    "gas",
                    "hot_works",
                    "manual_handling",
                    "dust_fumes",
                    "hand_tools",
                    "hot_water",
                ],
                questions: &[
                    "Has the gas supply been isolated at the meter?",
                    "Is the flue route clear of openings and boundaries?",
                ],
                extra_sections: &["gas_safety"],
                ppe: &["Rigger Gloves"],
            },
            Job {
                name: "Bathroom Refit",
                description: "Strip out of the existing bathroom suite and installation of new sanitaryware, pipework, tiling and extraction.",
                hazards: &[
                    "manual_handling",
                    "hot_water",
                    "slips_trips",
                    "sharp_edges",
                    "dust_fumes",
                    "chemicals",
                    "asbestos",
                ],
                questions: &[
                    "Has the water supply been isolated?",
                    "Will the client have access to another toilet during the works?",
                ],
                extra_sections: &[],
                ppe: &[],
            },
            Job {
                name: "Leak Repair",
                description: "Locate and repair a leak on domestic water or heating pipework, including making good of disturbed surfaces.",
                hazards: &["hot_water", "slips_trips", "live_electricity", "confined_space"],
                questions: &["Has water been near electrical fittings?"],
                extra_sections: &[],
                ppe: &[],
            },
            CUSTOM,
        ],
    },
    Trade {
        name: "Roofer",
        base_ppe: &["Safety Boots", "Hard Hat", "Hi-Vis Vest"],
        jobs: &[
            Job {
                name: "Re-roof (Pitched)",
                description: "Strip of existing tiles, battens and felt, installation of new breathable membrane and battens, and re-tiling of the pitched roof with new ridge and verge details.",
                hazards: &[
                    "working_at_height",
                    "fragile_roof",
                    "falling_objects",
                    "manual_handling",
                    "adverse_weather",
                    "asbestos",
                    "public_interface",
                ],
                questions: &[
                    "Has the scaffold been handed over with a signed inspection?",
                    "Are there roof lights or fragile areas on the roof?",
                ],
                extra_sections: &["working_at_height_plan"],
                ppe: &["Safety Harness", "Rigger Gloves"],
            },
            Job {
                name: "Flat Roof Repair",
                description: "Repair of a flat roof covering including removal of defective areas, replacement of decking where required and installation of a new waterproof membrane.",
                hazards: &[
                    "working_at_height",
                    "hot_works",
                    "fragile_roof",
                    "chemicals",
                    "adverse_weather",
                ],
                questions: &["Will torch-on felt be used?"],
                extra_sections: &["hot_work_permit"],
                ppe: &["Fire-Resistant Gloves"],
            },
            Job {
                name: "Gutter & Fascia Replacement",
                description: "Removal of existing timber fascias and gutters and installation of new uPVC fascias, soffits and guttering.",
                hazards: &[
                    "working_at_height",
                    "falling_objects",
                    "sharp_edges",
                    "public_interface",
                ],
                questions: &[],
                extra_sections: &[],
                ppe: &[],
            },
            CUSTOM,
        ],
    },
    Trade {
        name: "Carpenter / Joiner",
        base_ppe: &["Safety Boots"],
        jobs: &[
            Job {
                name: "Kitchen Fitting",
                description: "Installation of kitchen base and wall units, worktops, appliances and trims following strip out of the existing kitchen.",
                hazards: &[
                    "manual_handling",
                    "hand_tools",
                    "dust_fumes",
                    "noise",
                    "sharp_edges",
                    "hidden_services",
                ],
                questions: &["Have gas and electrical disconnections been arranged?"],
                extra_sections: &[],
                ppe: &["Safety Goggles"],
            },
            Job {
                name: "Staircase Installation",
                description: "Removal of the existing staircase and installation of a new staircase, balustrade and handrail.",
                hazards: &[
                    "working_at_height",
                    "manual_handling",
                    "hand_tools",
                    "dust_fumes",
                    "slips_trips",
                ],
                questions: &["Is there an alternative means of access to the upper floor during the works?"],
                extra_sections: &[],
                ppe: &[],
            },
            Job {
                name: "Stud Wall & Partitioning",
                description: "Construction of timber stud partitions with plasterboard linings, insulation and door linings.",
                hazards: &["dust_fumes", "hand_tools", "hidden_services", "manual_handling"],
                questions: &[],
                extra_sections: &[],
                ppe: &[],
            },
            CUSTOM,
        ],
    },
    Trade {
        name: "Painter & Decorator",
        base_ppe: &["Safety Boots"],
        jobs: &[
            Job {
                name: "Interior Redecoration",
                description: "Preparation and redecoration of internal walls, ceilings and woodwork, including filling, sanding and application of paint finishes.",
                hazards: &[
                    "chemicals",
                    "slips_trips",
                    "working_at_height",
                    "dust_fumes",
                    "lead_paint",
                ],
                questions: &["Is the paintwork likely to pre-date 1970?"],
                extra_sections: &[],
                ppe: &["Nitrile Gloves"],
            },
            Job {
                name: "Exterior Painting",
                description: "Preparation and painting of external joinery, render and metalwork from ladders, towers or scaffold.",
                hazards: &[
                    "working_at_height",
                    "adverse_weather",
                    "chemicals",
                    "public_interface",
                    "lead_paint",
                ],
                questions: &["Is scaffold or tower access required?"],
                extra_sections: &["working_at_height_plan"],
                ppe: &["Hi-Vis Vest"],
            },
            CUSTOM,
        ],
    },
    Trade {
        name: "Builder / Groundworker",
        base_ppe: &["Safety Boots", "Hard Hat", "Hi-Vis Vest"],
        jobs: &[
            Job {
                name: "Extension Foundations",
                description: "Excavation of strip foundations for a single-storey extension, concrete pour and construction of masonry up to damp proof course.",
                hazards: &[
                    "plant_machinery",
                    "hidden_services",
                    "manual_handling",
                    "noise",
                    "silica",
                    "public_interface",
                    "adverse_weather",
                ],
                questions: &[
                    "Have utility drawings been obtained?",
                    "Has building control been notified?",
                ],
                extra_sections: &["excavation_plan"],
                ppe: &["Ear Defenders", "Rigger Gloves"],
            },
            Job {
                name: "Knock-through / Wall Removal",
                description: "Removal of an internal load-bearing wall with temporary propping and installation of a steel beam to the structural engineer's design.",
                hazards: &[
                    "silica",
                    "dust_fumes",
                    "falling_objects",
                    "noise",
                    "asbestos",
                    "manual_handling",
                ],
                questions: &[
                    "Has a structural engineer's calculation been issued?",
                    "Has building control approved the beam design?",
                ],
                extra_sections: &["temporary_works"],
                ppe: &["FFP3 Dust Mask", "Ear Defenders"],
            },
            CUSTOM,
        ],
    },
];
