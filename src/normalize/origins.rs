use std::collections::BTreeSet;

use crate::models::CountryCode;

/// Aggregate regions and placeholders that never count as a country of origin.
const BLACKLIST: &[&str] = &[
    "UNKNOWN", "UNK", "N/A", "NONE", "NULL", "NAN", "XX", "ZZ", "EU", "UN", "WW", "INT",
    "WORLD", "AFR", "ASI", "EUR", "OCE", "AME", "LAT",
];

pub const ORIGIN_FIELDS: &[&str] = &["origins", "origin", "country", "countries"];
pub const ORIGIN_SEPARATORS: &[&str] = &[",", ";", "|", "/"];

/// Upper-cases, trims and filters raw origin tokens into a set of ISO-style codes.
pub fn normalize_origins<I, S>(tokens: I) -> BTreeSet<CountryCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| normalize_code(token.as_ref()))
        .collect()
}

pub fn normalize_code(token: &str) -> Option<CountryCode> {
    let code = token
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"' || c == '[' || c == ']')
        .trim()
        .to_ascii_uppercase();

    if BLACKLIST.contains(&code.as_str()) {
        return None;
    }

    let well_formed = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    well_formed.then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_trimmed_and_uppercased() {
        let set = normalize_origins([" us", "gb ", "US"]);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["GB", "US"]);
    }

    #[test]
    fn placeholders_and_regions_are_dropped() {
        assert!(normalize_origins(["unknown", "EU", "xx", "", "??", "United States"]).is_empty());
    }

    #[test]
    fn python_list_residue_is_stripped() {
        assert_eq!(normalize_code("['SE'"), Some("SE".to_string()));
    }
}
