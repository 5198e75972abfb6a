//! Storage locations the operator can move units between with one tap.

/// Outdoor selling spot; units here are highlighted and searchable on their own.
pub const FLEA_MARKET: &str = "Flea Market";

pub const KNOWN_LOCATIONS: &[&str] = &[
    FLEA_MARKET,
    "Showroom",
    "Unit 5",
    "Unit 7",
    "Unit 8",
    "Unit 12",
    "Unit 13",
    "Unit 15",
    "Unit 16",
    "Unit 22",
    "Unit 28",
    "Unit 31",
    "Unit 34",
    "Unit 36",
    "Unit 37",
    "Unit 43",
    "Unit 45",
    "Unit 45 2",
];

/// Free text is allowed anywhere a location is stored; this only tells whether
/// the label is one of the quick-pick ones.
pub fn is_known_location(label: &str) -> bool {
    KNOWN_LOCATIONS.contains(&label)
}
