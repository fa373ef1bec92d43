// 🃏 Result Renderer - view-models for the doctor finder
// Pure functions of controller state; the front ends only draw what's here.

use crate::provider::ProviderRecord;
use crate::search::{CatalogStatus, QueryState, SearchController};
use serde::Serialize;

/// Cards show at most this many upcoming slots
pub const MAX_VISIBLE_SLOTS: usize = 3;

pub const MAX_STARS: u8 = 5;

pub const EMPTY_TITLE: &str = "No doctors found";
pub const EMPTY_HINT: &str = "Try adjusting your search criteria";

// ============================================================================
// STAR RATING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRating {
    pub filled_count: u8,
    pub label: String,
}

impl StarRating {
    pub fn empty_count(&self) -> u8 {
        MAX_STARS - self.filled_count
    }

    /// "★★★★☆"
    pub fn glyphs(&self) -> String {
        let mut stars = "★".repeat(self.filled_count as usize);
        stars.push_str(&"☆".repeat(self.empty_count() as usize));
        stars
    }
}

/// Round half up, clamped to [0, 5]. Expects a rating in [0, 5].
pub fn star_rating(rating: f64) -> StarRating {
    // f64::round is half-away-from-zero, which is half-up for non-negative input
    let filled = rating.round().clamp(0.0, MAX_STARS as f64) as u8;

    StarRating {
        filled_count: filled,
        // Ties on the tenths digit round up, matching the star count
        label: format!("{:.1}", (rating * 10.0).round() / 10.0),
    }
}

// ============================================================================
// CARDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCard {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub distance_miles: f64,
    pub distance_label: String,
    pub rating: f64,
    pub rating_label: String,
    pub filled_stars: u8,
    /// Full slot list, as on the record
    pub available_slots: Vec<String>,
    /// First MAX_VISIBLE_SLOTS slots, original order
    pub visible_slots: Vec<String>,
    pub accepting_new_patients: bool,
    pub availability_label: String,
}

impl From<&ProviderRecord> for ProviderCard {
    fn from(record: &ProviderRecord) -> Self {
        let stars = star_rating(record.rating);

        ProviderCard {
            id: record.id.clone(),
            name: record.name.clone(),
            specialty: record.specialty.clone(),
            location: record.location.clone(),
            distance_miles: record.distance_miles,
            distance_label: record.distance_label(),
            rating: record.rating,
            rating_label: stars.label,
            filled_stars: stars.filled_count,
            available_slots: record.available_slots.clone(),
            visible_slots: record
                .available_slots
                .iter()
                .take(MAX_VISIBLE_SLOTS)
                .cloned()
                .collect(),
            accepting_new_patients: record.accepting_new_patients,
            availability_label: if record.accepting_new_patients {
                "Accepting Patients".to_string()
            } else {
                "Not Accepting Patients".to_string()
            },
        }
    }
}

// ============================================================================
// RESULT VIEW
// ============================================================================

/// Exactly one of these is shown at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResultView {
    Populated {
        heading: String,
        cards: Vec<ProviderCard>,
    },
    Empty {
        heading: String,
        title: String,
        hint: String,
    },
    Unavailable {
        message: String,
        #[serde(rename = "retryLabel")]
        retry_label: String,
    },
}

impl ResultView {
    pub fn cards(&self) -> &[ProviderCard] {
        match self {
            ResultView::Populated { cards, .. } => cards.as_slice(),
            _ => &[],
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self, ResultView::Empty { .. })
    }
}

/// "2 cardiologist doctors available"
pub fn results_heading(count: usize, query: &QueryState) -> String {
    if query.specialty_filter.is_empty() {
        format!("{} doctors available", count)
    } else {
        format!("{} {} doctors available", count, query.specialty_filter)
    }
}

pub fn compose_results(
    results: &[ProviderRecord],
    query: &QueryState,
    status: &CatalogStatus,
) -> ResultView {
    if let CatalogStatus::Unavailable(message) = status {
        return ResultView::Unavailable {
            message: message.clone(),
            retry_label: "Retry".to_string(),
        };
    }

    let heading = results_heading(results.len(), query);
    if results.is_empty() {
        ResultView::Empty {
            heading,
            title: EMPTY_TITLE.to_string(),
            hint: EMPTY_HINT.to_string(),
        }
    } else {
        ResultView::Populated {
            heading,
            cards: results.iter().map(ProviderCard::from).collect(),
        }
    }
}

pub fn compose_view(controller: &SearchController) -> ResultView {
    compose_results(controller.results(), controller.query(), controller.status())
}

// ============================================================================
// TESTS
// ============================================================================
