use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Inclusive score band on the 5x5 likelihood/severity matrix.
    pub const fn band(self) -> (u8, u8) {
        match self {
            RiskLevel::Low => (1, 5),
            RiskLevel::Medium => (6, 12),
            RiskLevel::High => (15, 25),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct RiskRating {
    pub level: RiskLevel,
    pub score: u8,
}

impl RiskRating {
    const fn new(level: RiskLevel, score: u8) -> Self {
        let (low, high) = level.band();
        assert!(score >= low && score <= high, "risk score outside its band");
        Self { level, score }
    }

    /// Label carried into documents, e.g. `High (20)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.level, self.score)
    }
}

/// Coarse hazard family used to pick recommended PPE.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HazardTag {
    General,
    Electrical,
    Dust,
    Height,
    Noise,
    ManualHandling,
    Chemical,
    HotWork,
    Sharps,
    Asbestos,
    Site,
}

#[derive(Serialize, Debug)]
pub struct Hazard {
    pub key: &'static str,
    pub label: &'static str,
    pub risk: &'static str,
    pub control: &'static str,
    pub initial: RiskRating,
    pub residual: RiskRating,
    pub tag: HazardTag,
}

#[derive(Serialize, Debug)]
pub struct HazardGroup {
    pub name: &'static str,
    pub hazards: &'static [&'static str],
}

use HazardTag::*;
use RiskLevel::{High as H, Low as L, Medium as M};

pub static HAZARDS: &[Hazard] = &[
    Hazard {
        key: "live_electricity",
        label: "Live Electricity",
        risk: "Electric shock, burns or death from contact with live conductors, including back-fed or incorrectly labelled circuits.",
        control: "Safe isolation to GS38 with a proving unit; lock off and tag the supply; test before touch; only competent electricians work on circuits.",
        initial: RiskRating::new(H, 20),
        residual: RiskRating::new(L, 4),
        tag: Electrical,
    },
    Hazard {
        key: "dust_fumes",
        label: "Dust/Fumes",
        risk: "Inhalation of dust from chasing, drilling and cutting, and fumes from soldering or adhesives, causing respiratory irritation.",
        control: "Use on-tool extraction or an M-class vacuum; damp down where practical; ventilate the work area; wear FFP3 masks for dusty tasks.",
        initial: RiskRating::new(M, 12),
        residual: RiskRating::new(L, 4),
        tag: Dust,
    },
    Hazard {
        key: "working_at_height",
        label: "Working at Height",
        risk: "Falls from ladders, stepladders, towers or roof edges resulting in serious injury.",
        control: "Use podium steps or towers in preference to ladders; inspect access equipment before use; maintain three points of contact; never overreach.",
        initial: RiskRating::new(H, 16),
        residual: RiskRating::new(M, 6),
        tag: Height,
    },
    Hazard {
        key: "manual_handling",
        label: "Manual Handling",
        risk: "Back and musculoskeletal injury from lifting heavy or awkward materials such as cable drums, boards and appliances.",
        control: "Plan lifts; use trolleys and two-person lifts for heavy items; keep loads close to the body; break loads down where possible.",
        initial: RiskRating::new(M, 9),
        residual: RiskRating::new(L, 3),
        tag: ManualHandling,
    },
    Hazard {
        key: "slips_trips",
        label: "Slips, Trips & Falls",
        risk: "Injury from trailing cables, lifted floorboards, offcuts and wet surfaces.",
        control: "Keep walkways clear; route leads away from access routes; replace or cover lifted boards at the end of each day; clean spills immediately.",
        initial: RiskRating::new(M, 8),
        residual: RiskRating::new(L, 2),
        tag: General,
    },
    Hazard {
        key: "hand_tools",
        label: "Hand & Power Tools",
        risk: "Cuts, entanglement and impact injuries from drills, saws and multi-tools.",
        control: "Use 110V or battery tools; check tools and leads before use; keep guards fitted; disconnect before changing blades or bits.",
        initial: RiskRating::new(M, 9),
        residual: RiskRating::new(L, 3),
        tag: Sharps,
    },
    Hazard {
        key: "noise",
        label: "Noise & Vibration",
        risk: "Hearing damage and hand-arm vibration from breakers, SDS drills and cutting equipment.",
        control: "Limit trigger time; rotate tasks; use low-vibration tools; wear ear defenders when noise exceeds 85 dB(A).",
        initial: RiskRating::new(M, 9),
        residual: RiskRating::new(L, 3),
        tag: Noise,
    },
    Hazard {
        key: "asbestos",
        label: "Asbestos (Unexpected Discovery)",
        risk: "Disturbing asbestos-containing materials in pre-2000 buildings, releasing fibres that cause fatal lung disease.",
        control: "Review the asbestos survey before work; stop work immediately if suspect material is found; do not disturb; inform the client and arrange licensed testing.",
        initial: RiskRating::new(H, 20),
        residual: RiskRating::new(L, 5),
        tag: Asbestos,
    },
    Hazard {
        key: "hot_works",
        label: "Hot Works / Fire",
        risk: "Fire from blowtorches, soldering or grinding sparks igniting nearby combustible materials.",
        control: "Hot work permit where required; clear combustibles; keep a suitable extinguisher at hand; carry out a fire watch for 60 minutes after work ends.",
        initial: RiskRating::new(H, 15),
        residual: RiskRating::new(L, 5),
        tag: HotWork,
    },
    Hazard {
        key: "hot_water",
        label: "Hot Water & Scalding",
        risk: "Scalds from draining heating systems and hot water cylinders.",
        control: "Isolate and allow systems to cool before draining; use hoses to drain safely; warn occupants of hot surfaces.",
        initial: RiskRating::new(M, 8),
        residual: RiskRating::new(L, 2),
        tag: General,
    },
    Hazard {
        key: "gas",
        label: "Gas Leak",
        risk: "Fire, explosion or carbon monoxide poisoning from disturbing gas pipework or appliances.",
        control: "Only Gas Safe registered engineers work on gas; isolate at the meter; tightness test after work; no naked flames during purging.",
        initial: RiskRating::new(H, 20),
        residual: RiskRating::new(L, 5),
        tag: HotWork,
    },
    Hazard {
        key: "silica",
        label: "Silica Dust",
        risk: "Respirable crystalline silica from cutting concrete, brick and stone, causing silicosis and lung cancer.",
        control: "Use water suppression or on-tool extraction; wear face-fit tested FFP3 masks; clean up with an H-class vacuum, never dry sweep.",
        initial: RiskRating::new(H, 16),
        residual: RiskRating::new(L, 4),
        tag: Dust,
    },
    Hazard {
        key: "sharp_edges",
        label: "Sharp Edges & Blades",
        risk: "Lacerations from trunking, sheet metal, glass and knife blades.",
        control: "Use retractable knives; deburr cut edges; wear cut-resistant gloves when handling sheet materials.",
        initial: RiskRating::new(M, 6),
        residual: RiskRating::new(L, 2),
        tag: Sharps,
    },
    Hazard {
        key: "chemicals",
        label: "Chemicals & Adhesives",
        risk: "Skin irritation, dermatitis and inhalation effects from solvents, adhesives, sealants and cleaning agents.",
        control: "Follow COSHH assessments and data sheets; use the least hazardous product; ventilate; wear nitrile gloves and eye protection.",
        initial: RiskRating::new(M, 8),
        residual: RiskRating::new(L, 2),
        tag: Chemical,
    },
    Hazard {
        key: "lead_paint",
        label: "Lead Paint",
        risk: "Lead poisoning from sanding or burning off old paintwork.",
        control: "Test suspect paint; use wet abrasion or chemical strippers; never dry sand or burn off; wash hands before eating.",
        initial: RiskRating::new(M, 10),
        residual: RiskRating::new(L, 4),
        tag: Chemical,
    },
    Hazard {
        key: "lone_working",
        label: "Lone Working",
        risk: "Delay in receiving help following an accident or sudden illness while working alone.",
        control: "Agree check-in times with the office; carry a charged mobile phone; do not carry out high-risk tasks alone.",
        initial: RiskRating::new(M, 6),
        residual: RiskRating::new(L, 3),
        tag: General,
    },
    Hazard {
        key: "confined_space",
        label: "Confined Spaces",
        risk: "Asphyxiation or entrapment in lofts, under-floor voids, tanks and inspection chambers.",
        control: "Avoid entry where possible; assess the atmosphere; ensure a second person is present; plan the rescue before entry.",
        initial: RiskRating::new(H, 15),
        residual: RiskRating::new(L, 5),
        tag: General,
    },
    Hazard {
        key: "falling_objects",
        label: "Falling Objects",
        risk: "Injury to operatives or the public from tools and materials falling from height.",
        control: "Use toe boards and brick guards; tether tools; barrier off the area below; wear hard hats in the drop zone.",
        initial: RiskRating::new(H, 15),
        residual: RiskRating::new(L, 5),
        tag: Height,
    },
    Hazard {
        key: "adverse_weather",
        label: "Adverse Weather",
        risk: "Slips, wind-blown materials and cold stress when working outdoors.",
        control: "Check the forecast daily; stop roof and scaffold work in high winds, ice or heavy rain; secure loose materials.",
        initial: RiskRating::new(M, 8),
        residual: RiskRating::new(L, 4),
        tag: Site,
    },
    Hazard {
        key: "fragile_roof",
        label: "Fragile Roof Surfaces",
        risk: "Falling through roof lights, asbestos cement sheets or rotten decking.",
        control: "Treat all roofs as fragile until confirmed otherwise; use crawling boards and staging; install edge protection and netting.",
        initial: RiskRating::new(H, 20),
        residual: RiskRating::new(L, 5),
        tag: Height,
    },
    Hazard {
        key: "hidden_services",
        label: "Hidden Services & Cable Strikes",
        risk: "Striking buried or concealed cables and pipes when drilling, chasing or excavating.",
        control: "Check drawings; scan with a CAT and Genny before drilling or digging; hand dig trial holes near services.",
        initial: RiskRating::new(H, 15),
        residual: RiskRating::new(L, 4),
        tag: Electrical,
    },
    Hazard {
        key: "plant_machinery",
        label: "Plant & Machinery",
        risk: "Crush and impact injuries from excavators, dumpers and mixers.",
        control: "Only trained and certificated operators; segregate plant from pedestrians; use a banksman for reversing.",
        initial: RiskRating::new(H, 16),
        residual: RiskRating::new(M, 6),
        tag: Site,
    },
    Hazard {
        key: "public_interface",
        label: "Members of the Public",
        risk: "Occupants, neighbours and passers-by entering the work area.",
        control: "Barrier and sign the work area; agree access arrangements with the client; keep tools secured when unattended.",
        initial: RiskRating::new(M, 6),
        residual: RiskRating::new(L, 2),
        tag: Site,
    },
];

pub static HAZARD_GROUPS: &[HazardGroup] = &[
    HazardGroup {
        name: "Electrical & Services",
        hazards: &["live_electricity", "gas", "hidden_services"],
    },
    HazardGroup {
        name: "Height & Structure",
        hazards: &["working_at_height", "fragile_roof", "falling_objects"],
    },
    HazardGroup {
        name: "Health",
        hazards: &[
            "dust_fumes",
            "silica",
            "asbestos",
            "chemicals",
            "lead_paint",
            "noise",
        ],
    },
    HazardGroup {
        name: "Physical",
        hazards: &[
            "manual_handling",
            "slips_trips",
            "hand_tools",
            "sharp_edges",
            "hot_works",
            "hot_water",
            "plant_machinery",
            "confined_space",
        ],
    },
    HazardGroup {
        name: "Site & People",
        hazards: &["lone_working", "public_interface", "adverse_weather"],
    },
];
