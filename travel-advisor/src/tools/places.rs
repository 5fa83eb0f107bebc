use super::normalize;

/// Canonical city names known to the location-based tools.
pub(crate) const CITIES: &[&str] =
    &["Seoul", "Tokyo", "Vientiane", "Luang Prabang", "Bangkok", "Paris", "London", "New York"];

// Alias (normalized) -> canonical city. Countries map to their main travel city.
const ALIASES: &[(&str, &str)] = &[
    ("korea", "Seoul"),
    ("south korea", "Seoul"),
    ("japan", "Tokyo"),
    ("laos", "Vientiane"),
    ("lao pdr", "Vientiane"),
    ("thailand", "Bangkok"),
    ("france", "Paris"),
    ("uk", "London"),
    ("united kingdom", "London"),
    ("england", "London"),
    ("nyc", "New York"),
    ("new york city", "New York"),
    ("usa", "New York"),
    ("united states", "New York"),
];

/// Resolves free-form location text to a canonical city name.
pub(crate) fn resolve_city(input: &str) -> Option<&'static str> {
    let key = normalize(input);
    if key.is_empty() {
        return None;
    }
    CITIES
        .iter()
        .copied()
        .find(|city| city.to_lowercase() == key)
        .or_else(|| ALIASES.iter().find(|(alias, _)| *alias == key).map(|(_, city)| *city))
}
