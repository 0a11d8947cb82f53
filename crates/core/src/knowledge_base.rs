//! Static DCSPH knowledge base.
//!
//! A DCSPH code is made of a two-digit body location followed by a two-digit
//! pathology. The tables below hold the locations, the pathologies and the
//! code entries that are known to the system. Entries marked as not valid are
//! retired codes: they are recognised, but must no longer be used.

use serde::Serialize;
use utoipa::ToSchema;

/// A body location, identified by the first two digits of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub code: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

/// A pathology, identified by the last two digits of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pathology {
    pub code: &'static str,
    pub name: &'static str,
}

/// One known DCSPH code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCodeEntry {
    #[schema(value_type = String)]
    pub code: &'static str,
    #[schema(value_type = String)]
    pub category: &'static str,
    #[schema(value_type = String)]
    pub description: &'static str,
    pub is_valid: bool,
}

const HOOFD_HALS: &str = "Hoofd en hals";
const WERVELKOLOM: &str = "Wervelkolom";
const BOVENSTE_EXTREMITEIT: &str = "Bovenste extremiteit";
const BEKKEN_HEUP: &str = "Bekken en heup";
const ONDERSTE_EXTREMITEIT: &str = "Onderste extremiteit";
const OVERIG: &str = "Overig";

pub const LOCATIONS: &[Location] = &[
    Location { code: "10", name: "Hoofd", region: HOOFD_HALS },
    Location { code: "12", name: "Kaakgewricht", region: HOOFD_HALS },
    Location { code: "31", name: "Cervicale wervelkolom", region: WERVELKOLOM },
    Location { code: "32", name: "Thoracale wervelkolom", region: WERVELKOLOM },
    Location { code: "33", name: "Lumbale wervelkolom", region: WERVELKOLOM },
    Location { code: "34", name: "Sacro-iliacaal gewricht", region: WERVELKOLOM },
    Location { code: "40", name: "Schouder", region: BOVENSTE_EXTREMITEIT },
    Location { code: "41", name: "Acromioclaviculair gewricht", region: BOVENSTE_EXTREMITEIT },
    Location { code: "51", name: "Elleboog", region: BOVENSTE_EXTREMITEIT },
    Location { code: "52", name: "Pols", region: BOVENSTE_EXTREMITEIT },
    Location { code: "53", name: "Hand en vingers", region: BOVENSTE_EXTREMITEIT },
    Location { code: "60", name: "Heup", region: BEKKEN_HEUP },
    Location { code: "61", name: "Bekken", region: BEKKEN_HEUP },
    Location { code: "75", name: "Onderbeen", region: ONDERSTE_EXTREMITEIT },
    Location { code: "76", name: "Enkel", region: ONDERSTE_EXTREMITEIT },
    Location { code: "77", name: "Voet", region: ONDERSTE_EXTREMITEIT },
    Location { code: "79", name: "Knie", region: ONDERSTE_EXTREMITEIT },
    Location { code: "99", name: "Meerdere lokalisaties", region: OVERIG },
];

pub const PATHOLOGIES: &[Pathology] = &[
    Pathology { code: "10", name: "Tendinopathie" },
    Pathology { code: "20", name: "Artrose" },
    Pathology { code: "26", name: "Ligamentair letsel" },
    Pathology { code: "30", name: "Fractuur" },
    Pathology { code: "40", name: "Luxatie of instabiliteit" },
    Pathology { code: "50", name: "Contusie of distorsie" },
    Pathology { code: "60", name: "Status na operatie" },
    Pathology { code: "70", name: "Radiculair syndroom" },
    Pathology { code: "80", name: "Aspecifieke klachten" },
    Pathology { code: "90", name: "Overbelasting" },
];

macro_rules! entry {
    ($code:literal, $category:expr, $description:literal) => {
        DiagnosisCodeEntry {
            code: $code,
            category: $category,
            description: $description,
            is_valid: true,
        }
    };
    ($code:literal, $category:expr, $description:literal, retired) => {
        DiagnosisCodeEntry {
            code: $code,
            category: $category,
            description: $description,
            is_valid: false,
        }
    };
}

pub const ENTRIES: &[DiagnosisCodeEntry] = &[
    entry!("1080", HOOFD_HALS, "Aspecifieke hoofdpijnklachten"),
    entry!("1220", HOOFD_HALS, "Artrose van het kaakgewricht"),
    entry!("1280", HOOFD_HALS, "Aspecifieke klachten kaakgewricht"),
    entry!("3120", WERVELKOLOM, "Artrose cervicale wervelkolom"),
    entry!("3150", WERVELKOLOM, "Whiplash-geassocieerde klachten"),
    entry!("3170", WERVELKOLOM, "Cervicaal radiculair syndroom"),
    entry!("3180", WERVELKOLOM, "Aspecifieke nekpijn"),
    entry!("3280", WERVELKOLOM, "Aspecifieke thoracale rugpijn"),
    entry!("3320", WERVELKOLOM, "Artrose lumbale wervelkolom"),
    entry!("3330", WERVELKOLOM, "Wervelfractuur lumbaal"),
    entry!("3360", WERVELKOLOM, "Status na lumbale hernia-operatie"),
    entry!("3370", WERVELKOLOM, "Lumbosacraal radiculair syndroom"),
    entry!("3380", WERVELKOLOM, "Aspecifieke lage rugpijn"),
    entry!("3390", WERVELKOLOM, "Overbelasting lage rug", retired),
    entry!("3480", WERVELKOLOM, "Aspecifieke klachten SI-gewricht"),
    entry!("4010", BOVENSTE_EXTREMITEIT, "Tendinopathie rotator cuff"),
    entry!("4020", BOVENSTE_EXTREMITEIT, "Artrose glenohumeraal gewricht"),
    entry!("4040", BOVENSTE_EXTREMITEIT, "Schouderluxatie of instabiliteit"),
    entry!("4060", BOVENSTE_EXTREMITEIT, "Status na schouderoperatie"),
    entry!("4080", BOVENSTE_EXTREMITEIT, "Aspecifieke schouderklachten"),
    entry!("4140", BOVENSTE_EXTREMITEIT, "AC-luxatie"),
    entry!("5110", BOVENSTE_EXTREMITEIT, "Epicondylopathie (tennis- of golferselleboog)"),
    entry!("5130", BOVENSTE_EXTREMITEIT, "Fractuur elleboog"),
    entry!("5230", BOVENSTE_EXTREMITEIT, "Distale radiusfractuur"),
    entry!("5290", BOVENSTE_EXTREMITEIT, "Overbelasting pols", retired),
    entry!("5320", BOVENSTE_EXTREMITEIT, "Artrose hand en vingers"),
    entry!("6020", BEKKEN_HEUP, "Heupartrose"),
    entry!("6030", BEKKEN_HEUP, "Heupfractuur"),
    entry!("6060", BEKKEN_HEUP, "Status na totale heupprothese"),
    entry!("6080", BEKKEN_HEUP, "Aspecifieke heupklachten"),
    entry!("6180", BEKKEN_HEUP, "Bekkenpijn"),
    entry!("7510", ONDERSTE_EXTREMITEIT, "Tendinopathie achillespees"),
    entry!("7590", ONDERSTE_EXTREMITEIT, "Mediaal tibiaal stresssyndroom"),
    entry!("7626", ONDERSTE_EXTREMITEIT, "Enkelbandletsel"),
    entry!("7630", ONDERSTE_EXTREMITEIT, "Enkelfractuur"),
    entry!("7650", ONDERSTE_EXTREMITEIT, "Enkeldistorsie", retired),
    entry!("7710", ONDERSTE_EXTREMITEIT, "Fasciopathie plantaris"),
    entry!("7910", ONDERSTE_EXTREMITEIT, "Patellatendinopathie"),
    entry!("7920", ONDERSTE_EXTREMITEIT, "Knieartrose"),
    entry!("7926", ONDERSTE_EXTREMITEIT, "Letsel voorste kruisband"),
    entry!("7960", ONDERSTE_EXTREMITEIT, "Status na totale knieprothese"),
    entry!("7980", ONDERSTE_EXTREMITEIT, "Patellofemorale pijn"),
    entry!("9980", OVERIG, "Aspecifieke klachten op meerdere lokalisaties"),
];

/// Looks up a code entry, including retired entries.
pub fn find_entry(code: &str) -> Option<&'static DiagnosisCodeEntry> {
    ENTRIES.iter().find(|e| e.code == code)
}

pub fn find_location(code: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|l| l.code == code)
}

pub fn find_pathology(code: &str) -> Option<&'static Pathology> {
    PATHOLOGIES.iter().find(|p| p.code == code)
}
