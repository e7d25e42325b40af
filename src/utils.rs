/// Utility functions
use std::cmp::Ordering;

/// Kilometres per astronomical unit
pub const AU_KM: f64 = 149_597_870.7;

/// Earth reference values used for relative metrics
pub const EARTH_MASS_KG: f64 = 5.972e24;
pub const EARTH_GRAVITY: f64 = 9.81;

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Strip Spanish/French diacritics so "Júpiter" sorts next to "Jupiter"
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Compare two names the way a Spanish reader expects: accents and case are
/// secondary, `ñ` sorts after `n`.
pub fn collate_es(a: &str, b: &str) -> Ordering {
    fn key(s: &str) -> Vec<(char, u8)> {
        fold_diacritics(s)
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'ñ' => ('n', 1),
                other => (other, 0),
            })
            .collect()
    }

    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Pull the observer distance (AU) out of a Horizons text ephemeris.
///
/// Rows live between `$$SOE` and `$$EOE`; the first numeric column after the
/// date and time is the distance.
pub fn parse_ephemeris_distance_au(result: &str) -> Option<f64> {
    let mut in_table = false;
    for line in result.lines() {
        let line = line.trim();
        if line.starts_with("$$SOE") {
            in_table = true;
            continue;
        }
        if line.starts_with("$$EOE") {
            break;
        }
        if !in_table || line.is_empty() {
            continue;
        }
        return line
            .split_whitespace()
            .find_map(|token| token.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.10745, 3), 0.107);
        assert_eq!(round_to(24.6229, 2), 24.62);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("Júpiter"), "Jupiter");
        assert_eq!(fold_diacritics("Mercure"), "Mercure");
    }

    #[test]
    fn test_collate_es_ignores_accents() {
        assert_eq!(collate_es("Júpiter", "Marte"), Ordering::Less);
        assert_eq!(collate_es("Júpiter", "Jupiter"), Ordering::Greater);
        assert_eq!(collate_es("Tierra", "saturno"), Ordering::Greater);
    }

    #[test]
    fn test_collate_es_enye_after_n() {
        assert_eq!(collate_es("ña", "nz"), Ordering::Greater);
        assert_eq!(collate_es("ña", "o"), Ordering::Less);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Marte", "MAR"));
        assert!(!contains_ignore_case("Venus", "mar"));
    }

    #[test]
    fn test_parse_ephemeris_distance() {
        let text = "header\n$$SOE\n 2025-Jan-01 00:00     1.52345678  -5.1234\n$$EOE\nfooter";
        assert_eq!(parse_ephemeris_distance_au(text), Some(1.52345678));
    }

    #[test]
    fn test_parse_ephemeris_without_table() {
        assert_eq!(parse_ephemeris_distance_au("no data here 42"), None);
        assert_eq!(parse_ephemeris_distance_au("$$SOE\n$$EOE"), None);
    }
}
