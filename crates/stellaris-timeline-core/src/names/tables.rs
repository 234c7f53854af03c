//! Static lookup tables for planet classes and empire colors.

use std::collections::{HashMap, HashSet};

const COLONIZABLE_PLANET_CLASSES_PLANETS: &[&str] = &[
    "pc_desert",
    "pc_arid",
    "pc_savannah",
    "pc_tropical",
    "pc_continental",
    "pc_ocean",
    "pc_tundra",
    "pc_arctic",
    "pc_alpine",
    "pc_gaia",
    "pc_nuked",
    "pc_machine",
];

const COLONIZABLE_PLANET_CLASSES_MEGA_STRUCTURES: &[&str] = &["pc_ringworld_habitable", "pc_habitat"];

// Planetary Diversity mod
const COLONIZABLE_PLANET_CLASSES_PD_PLANETS: &[&str] = &[
    "pc_antarctic",
    "pc_deadcity",
    "pc_retinal",
    "pc_irradiated_terrestrial",
    "pc_lush",
    "pc_geocrystalline",
    "pc_marginal",
    "pc_irradiated_marginal",
    "pc_marginal_cold",
    "pc_crystal",
    "pc_floating",
    "pc_graveyard",
    "pc_mushroom",
    "pc_city",
    "pc_archive",
    "pc_biolumen",
    "pc_technoorganic",
    "pc_tidallylocked",
    "pc_glacial",
    "pc_frozen_desert",
    "pc_steppe",
    "pc_hadesert",
    "pc_boreal",
    "pc_sandsea",
    "pc_subarctic",
    "pc_geothermal",
    "pc_cascadian",
    "pc_swamp",
    "pc_mangrove",
    "pc_desertislands",
    "pc_mesa",
    "pc_oasis",
    "pc_hajungle",
    "pc_methane",
    "pc_ammonia",
];

const DESTROYED_BY_WEAPONS_PLANET_CLASSES: &[&str] = &[
    "pc_shattered",
    "pc_shielded",
    "pc_ringworld_shielded",
    "pc_habitat_shielded",
    "pc_ringworld_habitable_damaged",
];

const DESTROYED_BY_EVENTS_AND_CRISES_PLANET_CLASSES: &[&str] = &[
    "pc_egg_cracked",
    "pc_shrouded",
    "pc_ai",
    "pc_infested",
    "pc_gray_goo",
];

/// Words kept in lowercase when turning identifiers into labels.
pub const LOWERCASE_WORDS: &[&str] = &["the", "in", "of", "for", "is", "over", "under"];

/// Whole-word replacements applied after capitalization.
pub const WORD_REPLACEMENT: &[(&str, &str)] = &[("Ai", "AI"), ("Ftl", "FTL"), ("Tb", "Tile Blocker")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// colors.txt as of game version 3.5.3
const COLORS: &[(&str, Rgb)] = &[
    ("beige", Rgb::new(150, 126, 90)),
    ("black", Rgb::new(27, 27, 27)),
    ("blue", Rgb::new(46, 63, 153)),
    ("bright_purple", Rgb::new(194, 125, 227)),
    ("bright_yellow", Rgb::new(224, 214, 46)),
    ("brown", Rgb::new(156, 91, 45)),
    ("burgundy", Rgb::new(89, 18, 39)),
    ("cerise_red", Rgb::new(245, 102, 102)),
    ("cloud_purple", Rgb::new(167, 58, 217)),
    ("dark_blue", Rgb::new(45, 61, 116)),
    ("dark_brown", Rgb::new(107, 68, 40)),
    ("dark_green", Rgb::new(27, 66, 26)),
    ("dark_grey", Rgb::new(62, 62, 62)),
    ("dark_orange", Rgb::new(167, 57, 0)),
    ("dark_purple", Rgb::new(81, 15, 113)),
    ("dark_red", Rgb::new(103, 25, 39)),
    ("dark_steel", Rgb::new(76, 90, 98)),
    ("dark_teal", Rgb::new(51, 127, 91)),
    ("desert_yellow", Rgb::new(237, 231, 116)),
    ("faded_blue", Rgb::new(191, 187, 224)),
    ("frog_green", Rgb::new(209, 241, 126)),
    ("green", Rgb::new(46, 102, 41)),
    ("grey", Rgb::new(128, 128, 128)),
    ("hard_steel", Rgb::new(152, 168, 173)),
    ("ice_turquoise", Rgb::new(137, 237, 236)),
    ("indigo", Rgb::new(36, 21, 156)),
    ("intense_blue", Rgb::new(30, 159, 220)),
    ("intense_burgundy", Rgb::new(149, 20, 72)),
    ("intense_orange", Rgb::new(255, 86, 0)),
    ("intense_pink", Rgb::new(190, 40, 134)),
    ("intense_purple", Rgb::new(139, 39, 184)),
    ("intense_red", Rgb::new(241, 37, 15)),
    ("intense_turquoise", Rgb::new(55, 178, 170)),
    ("khaki_brown", Rgb::new(174, 121, 83)),
    ("light_blue", Rgb::new(71, 114, 178)),
    ("light_green", Rgb::new(160, 222, 141)),
    ("light_grey", Rgb::new(191, 191, 191)),
    ("light_indigo", Rgb::new(96, 82, 207)),
    ("light_orange", Rgb::new(244, 139, 15)),
    ("light_pink", Rgb::new(222, 64, 163)),
    ("light_turquoise", Rgb::new(23, 98, 98)),
    ("medium_steel", Rgb::new(101, 119, 128)),
    ("mist_blue", Rgb::new(137, 221, 246)),
    ("moss_green", Rgb::new(112, 142, 35)),
    ("ocean_turquoise", Rgb::new(49, 208, 198)),
    ("ochre_brown", Rgb::new(224, 197, 106)),
    ("off_white", Rgb::new(239, 239, 239)),
    ("orange", Rgb::new(237, 118, 25)),
    ("pink_purple", Rgb::new(221, 216, 254)),
    ("pink", Rgb::new(151, 15, 100)),
    ("pink_red", Rgb::new(237, 131, 131)),
    ("purple", Rgb::new(109, 24, 150)),
    ("red_orange", Rgb::new(224, 64, 64)),
    ("red", Rgb::new(151, 14, 18)),
    ("satin_burgundy", Rgb::new(116, 31, 65)),
    ("shadow_blue", Rgb::new(15, 17, 91)),
    ("shadow_green", Rgb::new(32, 55, 41)),
    ("shadow_purple", Rgb::new(63, 9, 89)),
    ("shadow_steel", Rgb::new(51, 60, 65)),
    ("shadow_teal", Rgb::new(9, 57, 57)),
    ("ship_steel", Rgb::new(131, 150, 156)),
    ("sick_green", Rgb::new(157, 175, 35)),
    ("silver_steel", Rgb::new(208, 225, 230)),
    ("sky_blue", Rgb::new(88, 188, 235)),
    ("sun_green", Rgb::new(230, 244, 147)),
    ("swamp_green", Rgb::new(88, 107, 39)),
    ("teal", Rgb::new(76, 153, 84)),
    ("toxic_green", Rgb::new(168, 218, 39)),
    ("turquoise", Rgb::new(61, 153, 147)),
    ("wave_blue", Rgb::new(159, 151, 224)),
    ("white", Rgb::new(255, 255, 255)),
    ("yellow", Rgb::new(204, 148, 41)),
];

lazy_static::lazy_static! {
    pub static ref COLONIZABLE_PLANET_CLASSES: HashSet<&'static str> =
        COLONIZABLE_PLANET_CLASSES_PLANETS
            .iter()
            .chain(COLONIZABLE_PLANET_CLASSES_MEGA_STRUCTURES)
            .chain(COLONIZABLE_PLANET_CLASSES_PD_PLANETS)
            .copied()
            .collect();

    pub static ref COLONIZABLE_MEGASTRUCTURE_CLASSES: HashSet<&'static str> =
        COLONIZABLE_PLANET_CLASSES_MEGA_STRUCTURES.iter().copied().collect();

    pub static ref DESTROYED_PLANET_CLASSES: HashSet<&'static str> =
        DESTROYED_BY_WEAPONS_PLANET_CLASSES
            .iter()
            .chain(DESTROYED_BY_EVENTS_AND_CRISES_PLANET_CLASSES)
            .copied()
            .collect();

    static ref COLOR_TABLE: HashMap<&'static str, Rgb> = COLORS.iter().copied().collect();
}

pub fn is_destroyed_planet(planet_class: &str) -> bool {
    DESTROYED_PLANET_CLASSES.contains(planet_class)
}

pub fn is_destroyed_by_weapons(planet_class: &str) -> bool {
    DESTROYED_BY_WEAPONS_PLANET_CLASSES.contains(&planet_class)
}

pub fn is_destroyed_by_event(planet_class: &str) -> bool {
    DESTROYED_BY_EVENTS_AND_CRISES_PLANET_CLASSES.contains(&planet_class)
}

pub fn is_colonizable_planet(planet_class: &str) -> bool {
    COLONIZABLE_PLANET_CLASSES.contains(planet_class)
}

pub fn is_colonizable_megastructure(planet_class: &str) -> bool {
    COLONIZABLE_MEGASTRUCTURE_CLASSES.contains(planet_class)
}

/// RGB value of a named empire color from the game's color table.
pub fn color(name: &str) -> Option<Rgb> {
    COLOR_TABLE.get(name).copied()
}
