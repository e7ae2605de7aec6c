use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Substance {
    pub name: &'static str,
    pub hazard: &'static str,
    pub controls: &'static str,
}

#[derive(Serialize, Debug)]
pub struct SubstanceCategory {
    pub name: &'static str,
    pub substances: &'static [Substance],
}

pub static SUBSTANCE_LIBRARY: &[SubstanceCategory] = &[
    SubstanceCategory {
        name: "Dusts",
        substances: &[
            Substance {
                name: "Silica Dust (RCS)",
                hazard: "Respirable crystalline silica. Can cause silicosis and lung cancer.",
                controls: "Water suppression or on-tool extraction; FFP3 face-fit tested mask; H-class vacuum for clean up; no dry sweeping.",
            },
            Substance {
                name: "Hardwood Dust",
                hazard: "Carcinogen and respiratory sensitiser. Irritant to eyes and skin.",
                controls: "On-tool extraction; M-class vacuum; FFP3 mask; limit duration of sanding tasks.",
            },
            Substance {
                name: "Plaster / Gypsum Dust",
                hazard: "Irritant to eyes and respiratory tract.",
                controls: "Cut boards with a knife rather than a saw where possible; ventilate; FFP2 mask minimum.",
            },
        ],
    },
    SubstanceCategory {
        name: "Cements & Mortars",
        substances: &[
            Substance {
                name: "Cement & Mortar (Wet)",
                hazard: "Corrosive when wet; causes severe skin burns, dermatitis and serious eye damage.",
                controls: "Nitrile-coated gloves and long sleeves; eye protection when mixing; wash skin immediately after contact.",
            },
            Substance {
                name: "Hydrated Lime",
                hazard: "Causes serious eye damage. Irritating to skin and respiratory system.",
                controls: "Add slowly to water to avoid dust clouds; goggles and gloves; FFP2 mask when handling dry powder.",
            },
            Substance {
                name: "Tile Grout & Adhesive",
                hazard: "Irritant to skin and eyes; may cause an allergic skin reaction.",
                controls: "Mix in a ventilated area; nitrile gloves; avoid skin contact.",
            },
        ],
    },
    SubstanceCategory {
        name: "Chemicals & Solvents",
        substances: &[
            Substance {
                name: "White Spirit",
                hazard: "Flammable liquid and vapour. Harmful if swallowed. Toxic to aquatic life.",
                controls: "Use in well ventilated areas; keep away from ignition sources; nitrile gloves; dispose of rags in a sealed metal bin.",
            },
            Substance {
                name: "Solvent-based Adhesive",
                hazard: "Highly flammable. Vapour may cause drowsiness. Irritating to skin.",
                controls: "Ventilate; no smoking or naked flames; replace lids immediately after use; nitrile gloves.",
            },
            Substance {
                name: "Soldering Flux",
                hazard: "Irritant to skin and eyes; fumes when heated may cause respiratory irritation.",
                controls: "Apply sparingly with a brush; ventilate during soldering; gloves and eye protection.",
            },
            Substance {
                name: "PVC Solvent Cement",
                hazard: "Highly flammable. Causes serious eye irritation.",
                controls: "Ventilate; keep away from heat; close tin after use; safety glasses.",
            },
            Substance {
                name: "Expanding PU Foam",
                hazard: "Extremely flammable aerosol. Pressurised container. Harmful if inhaled; respiratory sensitiser.",
                controls: "Use in ventilated areas; gloves and eye protection; do not pierce or burn cans; store below 50C.",
            },
        ],
    },
    SubstanceCategory {
        name: "Gases & Fuels",
        substances: &[
            Substance {
                name: "Propane (LPG)",
                hazard: "Extremely flammable gas. Contains gas under pressure; may explode if heated.",
                controls: "Store cylinders upright outdoors; check hoses and regulators; fire extinguisher at hand; never use in basements.",
            },
            Substance {
                name: "Petrol (Small Plant)",
                hazard: "Highly flammable. May cause cancer. Toxic to aquatic life.",
                controls: "Store in approved containers; refuel with engines off and cool; no smoking; spill kit available.",
            },
        ],
    },
    SubstanceCategory {
        name: "Paints & Coatings",
        substances: &[
            Substance {
                name: "Water-based Paint",
                hazard: "Low hazard; may cause mild skin irritation.",
                controls: "Ventilate rooms; gloves for prolonged use; wash brushes into a container, not drains.",
            },
            Substance {
                name: "Solvent-based Gloss",
                hazard: "Flammable. Vapour may cause headaches and dizziness. Harmful to aquatic life.",
                controls: "Ventilate; no ignition sources; respirator with organic vapour filter in enclosed spaces.",
            },
            Substance {
                name: "Wood Preservative",
                hazard: "Harmful if swallowed. Toxic to aquatic life with long lasting effects.",
                controls: "Apply outdoors or with good ventilation; gloves and goggles; prevent run-off to drains.",
            },
            Substance {
                name: "Lead Paint (Existing)",
                hazard: "Toxic; lead exposure causes damage to organs through prolonged exposure.",
                controls: "No dry sanding or burning off; wet abrasion or chemical strippers; disposable coveralls; wash before eating.",
            },
        ],
    },
];
