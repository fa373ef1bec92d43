// 🩺 Provider Records - the searchable, displayable facts about a doctor
// Immutable for the lifetime of a search session

use serde::{Deserialize, Serialize};

// ============================================================================
// PROVIDER RECORD
// ============================================================================

/// A single care provider as shown in the doctor finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Opaque identifier, unique across the catalog
    pub id: String,

    pub name: String,

    /// Free-text specialty label, e.g. "Cardiologist"
    pub specialty: String,

    /// Street address shown on the card
    pub location: String,

    /// Display only. The distance filter never reads this.
    pub distance_miles: f64,

    /// Average rating in [0.0, 5.0]
    pub rating: f64,

    /// Time labels in chronological priority order
    #[serde(default)]
    pub available_slots: Vec<String>,

    pub accepting_new_patients: bool,
}

impl ProviderRecord {
    pub fn new(
        id: &str,
        name: &str,
        specialty: &str,
        location: &str,
        distance_miles: f64,
        rating: f64,
    ) -> Self {
        ProviderRecord {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            location: location.to_string(),
            distance_miles,
            rating,
            available_slots: Vec::new(),
            accepting_new_patients: true,
        }
    }

    pub fn with_slots(mut self, slots: &[&str]) -> Self {
        self.available_slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn not_accepting(mut self) -> Self {
        self.accepting_new_patients = false;
        self
    }

    /// "2.3 miles"
    pub fn distance_label(&self) -> String {
        format!("{:.1} miles", self.distance_miles)
    }

    /// Ratings outside [0, 5] have no defined star rendering
    pub fn has_valid_rating(&self) -> bool {
        self.rating.is_finite() && (0.0..=5.0).contains(&self.rating)
    }
}

// ============================================================================
// FILTER VOCABULARIES
// ============================================================================

/// Specialty filter values paired with their display labels.
/// The empty value means "All Specialties".
pub const SPECIALTY_OPTIONS: &[(&str, &str)] = &[
    ("", "All Specialties"),
    ("cardiologist", "Cardiologist"),
    ("primary care", "Primary Care"),
    ("neurologist", "Neurologist"),
    ("dermatologist", "Dermatologist"),
];

/// Distance buckets in miles. Recorded on the query but not applied.
pub const DISTANCE_OPTIONS: &[(&str, &str)] = &[
    ("", "Any Distance"),
    ("5", "Within 5 miles"),
    ("10", "Within 10 miles"),
    ("25", "Within 25 miles"),
];

/// Look up the canonical specialty filter value (case-insensitive).
///
/// Returns `None` for anything outside the vocabulary, which callers
/// treat as "no filter".
pub fn canonical_specialty(value: &str) -> Option<&'static str> {
    let lower = value.trim().to_lowercase();
    SPECIALTY_OPTIONS
        .iter()
        .map(|(v, _)| *v)
        .find(|v| *v == lower)
}

pub fn canonical_distance(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    DISTANCE_OPTIONS
        .iter()
        .map(|(v, _)| *v)
        .find(|v| *v == trimmed)
}

pub fn specialty_label(value: &str) -> &'static str {
    SPECIALTY_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("All Specialties")
}

pub fn distance_label(value: &str) -> &'static str {
    DISTANCE_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("Any Distance")
}

/// Next entry in a vocabulary, wrapping around. Used by the TUI selectors.
pub fn cycle_option(options: &[(&'static str, &'static str)], current: &str) -> &'static str {
    let pos = options.iter().position(|(v, _)| *v == current).unwrap_or(0);
    options[(pos + 1) % options.len()].0
}

// ============================================================================
// TESTS
// ============================================================================
