/// Planet name resolution across English, Spanish and French spellings
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight supported planets, keyed by their canonical English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// Canonical identifier
    pub fn english_name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    pub fn localized_name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercurio",
            Planet::Venus => "Venus",
            Planet::Earth => "Tierra",
            Planet::Mars => "Marte",
            Planet::Jupiter => "Júpiter",
            Planet::Saturn => "Saturno",
            Planet::Uranus => "Urano",
            Planet::Neptune => "Neptuno",
        }
    }

    /// Wikipedia (es) article slug
    pub fn wiki_slug(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercurio_(planeta)",
            Planet::Venus => "Venus_(planeta)",
            Planet::Earth => "Tierra",
            Planet::Mars => "Marte_(planeta)",
            Planet::Jupiter => "Júpiter_(planeta)",
            Planet::Saturn => "Saturno_(planeta)",
            Planet::Uranus => "Urano_(planeta)",
            Planet::Neptune => "Neptuno_(planeta)",
        }
    }

    /// Identifier used by the solar-system bodies API
    pub fn body_id(self) -> &'static str {
        match self {
            Planet::Mercury => "mercure",
            Planet::Venus => "venus",
            Planet::Earth => "terre",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturne",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
        }
    }

    /// JPL Horizons major-body code
    pub fn horizons_code(self) -> &'static str {
        match self {
            Planet::Mercury => "199",
            Planet::Venus => "299",
            Planet::Earth => "399",
            Planet::Mars => "499",
            Planet::Jupiter => "599",
            Planet::Saturn => "699",
            Planet::Uranus => "799",
            Planet::Neptune => "899",
        }
    }

    pub fn from_english(name: &str) -> Option<Planet> {
        Planet::ALL
            .into_iter()
            .find(|p| p.english_name().eq_ignore_ascii_case(name))
    }

    pub fn info(self) -> CanonicalPlanetInfo {
        CanonicalPlanetInfo {
            planet: self,
            localized_name: self.localized_name(),
            wiki_slug: self.wiki_slug(),
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

/// Resolved metadata for one planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPlanetInfo {
    pub planet: Planet,
    #[serde(rename = "nameES")]
    pub localized_name: &'static str,
    pub wiki_slug: &'static str,
}

/// Lowercase spellings accepted in addition to the localized names.
const ALIASES: &[(&str, Planet)] = &[
    // English
    ("mercury", Planet::Mercury),
    ("venus", Planet::Venus),
    ("earth", Planet::Earth),
    ("mars", Planet::Mars),
    ("jupiter", Planet::Jupiter),
    ("saturn", Planet::Saturn),
    ("uranus", Planet::Uranus),
    ("neptune", Planet::Neptune),
    // Spanish
    ("mercurio", Planet::Mercury),
    ("tierra", Planet::Earth),
    ("marte", Planet::Mars),
    ("júpiter", Planet::Jupiter),
    ("saturno", Planet::Saturn),
    ("urano", Planet::Uranus),
    ("neptuno", Planet::Neptune),
    // French
    ("mercure", Planet::Mercury),
    ("terre", Planet::Earth),
    ("saturne", Planet::Saturn),
    // Misspellings seen in the wild
    ("jupitor", Planet::Jupiter),
    ("neptunus", Planet::Neptune),
];

/// Resolve a loosely specified planet name.
///
/// Lookup order, case-insensitive, first hit wins:
/// localized names, then the alias table, then canonical English names.
pub fn resolve(input: &str) -> Option<CanonicalPlanetInfo> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(planet) = Planet::ALL
        .into_iter()
        .find(|p| p.localized_name().to_lowercase() == needle)
    {
        return Some(planet.info());
    }

    if let Some((_, planet)) = ALIASES.iter().find(|(alias, _)| *alias == needle) {
        return Some(planet.info());
    }

    Planet::from_english(input.trim()).map(Planet::info)
}

/// Human readable list of accepted names, used in validation errors
pub fn supported_names() -> String {
    Planet::ALL
        .iter()
        .map(|p| p.english_name().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves_to_its_planet() {
        for (alias, planet) in ALIASES {
            assert_eq!(resolve(alias).map(|i| i.planet), Some(*planet), "{alias}");
            let upper = alias.to_uppercase();
            assert_eq!(resolve(&upper).map(|i| i.planet), Some(*planet), "{upper}");
        }
    }

    #[test]
    fn test_all_spellings_share_one_record() {
        let spellings = ["Mars", "mars", "MARTE", "Marte"];
        let records: Vec<_> = spellings.iter().filter_map(|s| resolve(s)).collect();
        assert_eq!(records.len(), spellings.len());
        assert!(records.iter().all(|r| *r == Planet::Mars.info()));
    }

    #[test]
    fn test_marte_resolves_to_mars() {
        let info = resolve("marte").unwrap();
        assert_eq!(info.planet.english_name(), "Mars");
        assert_eq!(info.localized_name, "Marte");
        assert_eq!(info.wiki_slug, "Marte_(planeta)");
    }

    #[test]
    fn test_accented_localized_name() {
        assert_eq!(resolve("JÚPITER").map(|i| i.planet), Some(Planet::Jupiter));
        assert_eq!(resolve("jupitor").map(|i| i.planet), Some(Planet::Jupiter));
    }

    #[test]
    fn test_unknown_names_are_not_found() {
        for input in ["pluto", "pluton", "", "   ", "sun", "marsx", "terra"] {
            assert_eq!(resolve(input), None, "{input:?}");
        }
    }

    #[test]
    fn test_body_ids_resolve_back() {
        for planet in Planet::ALL {
            assert_eq!(resolve(planet.body_id()).map(|i| i.planet), Some(planet));
        }
    }

    #[test]
    fn test_supported_names_lists_eight_planets() {
        let names = supported_names();
        assert_eq!(names.split(", ").count(), 8);
        assert!(names.starts_with("mercury"));
        assert!(names.ends_with("neptune"));
    }
}
