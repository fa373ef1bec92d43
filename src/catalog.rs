// 📇 Provider Catalog - data-access boundary for provider records
//
// The finder never reads provider data directly. It asks a ProviderSource,
// so a remote or database-backed source can replace the built-in fixture
// without touching the filter or render code.

use crate::provider::ProviderRecord;
use crate::search::QueryState;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate provider id: {0}")]
    DuplicateId(String),

    #[error("Provider {id} has rating {rating}, expected a value in [0, 5]")]
    RatingOutOfRange { id: String, rating: f64 },

    #[error("Provider catalog unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// DATA-ACCESS TRAIT
// ============================================================================

/// Capability: fetch providers matching a query.
///
/// Implementations may narrow the result server-side or return the whole
/// catalog. The controller always re-applies the client-side predicate,
/// which is idempotent, so either is correct.
pub trait ProviderSource {
    fn fetch_providers(&self, query: &QueryState) -> Result<Vec<ProviderRecord>, CatalogError>;
}

/// Check the catalog invariants: unique ids, ratings in [0, 5].
pub fn validate_catalog(records: &[ProviderRecord]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(CatalogError::DuplicateId(record.id.clone()));
        }
        if !record.has_valid_rating() {
            return Err(CatalogError::RatingOutOfRange {
                id: record.id.clone(),
                rating: record.rating,
            });
        }
    }

    Ok(())
}

// ============================================================================
// STATIC CATALOG
// ============================================================================

/// In-memory catalog, validated on construction.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    records: Vec<ProviderRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<ProviderRecord>) -> Result<Self, CatalogError> {
        validate_catalog(&records)?;
        Ok(StaticCatalog { records })
    }

    /// The four sample providers the finder ships with
    pub fn fixture() -> Self {
        StaticCatalog {
            records: fixture_providers(),
        }
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ProviderRecord> {
        self.records
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::fixture()
    }
}

impl ProviderSource for StaticCatalog {
    fn fetch_providers(&self, _query: &QueryState) -> Result<Vec<ProviderRecord>, CatalogError> {
        Ok(self.records.clone())
    }
}

pub fn fixture_providers() -> Vec<ProviderRecord> {
    vec![
        ProviderRecord::new(
            "1",
            "Dr. Sarah Johnson",
            "Cardiologist",
            "123 Medical Center Dr, Suite 101",
            2.3,
            4.8,
        )
        .with_slots(&["Tomorrow at 10:00 AM", "Apr 25 at 2:30 PM", "Apr 26 at 11:15 AM"]),
        ProviderRecord::new(
            "2",
            "Dr. Michael Chen",
            "Cardiologist",
            "456 Health Parkway, Building B",
            3.7,
            4.6,
        )
        .with_slots(&["Apr 24 at 9:15 AM", "Apr 27 at 1:00 PM"]),
        ProviderRecord::new(
            "3",
            "Dr. Emily Rodriguez",
            "Primary Care",
            "789 Wellness Ave, Suite 205",
            1.8,
            4.9,
        )
        .with_slots(&["Tomorrow at 8:30 AM", "Tomorrow at 3:45 PM", "Apr 25 at 10:30 AM"]),
        ProviderRecord::new(
            "4",
            "Dr. James Wilson",
            "Neurologist",
            "567 Brain Health Center",
            4.2,
            4.7,
        )
        .with_slots(&["Apr 27 at 11:30 AM", "Apr 28 at 2:15 PM"])
        .not_accepting(),
    ]
}

// ============================================================================
// FILE LOADERS
// ============================================================================

/// Flat CSV row. Slots are joined with ';' in a single column.
#[derive(Debug, Deserialize)]
struct CsvProviderRow {
    id: String,
    name: String,
    specialty: String,
    location: String,
    distance_miles: f64,
    rating: f64,
    #[serde(default)]
    available_slots: String,
    accepting_new_patients: bool,
}

impl From<CsvProviderRow> for ProviderRecord {
    fn from(row: CsvProviderRow) -> Self {
        ProviderRecord {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            location: row.location,
            distance_miles: row.distance_miles,
            rating: row.rating,
            available_slots: row
                .available_slots
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            accepting_new_patients: row.accepting_new_patients,
        }
    }
}

pub fn load_csv_from_reader<R: Read>(reader: R) -> Result<StaticCatalog> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: CsvProviderRow = result.context("Failed to deserialize provider row")?;
        records.push(ProviderRecord::from(row));
    }

    Ok(StaticCatalog::new(records)?)
}

pub fn load_csv(csv_path: &Path) -> Result<StaticCatalog> {
    let file = fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV: {:?}", csv_path))?;
    load_csv_from_reader(file)
}

pub fn load_json_str(content: &str) -> Result<StaticCatalog> {
    let records: Vec<ProviderRecord> =
        serde_json::from_str(content).context("Failed to parse provider catalog JSON")?;
    Ok(StaticCatalog::new(records)?)
}

pub fn load_json(json_path: &Path) -> Result<StaticCatalog> {
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read catalog file: {:?}", json_path))?;
    load_json_str(&content)
}

/// Load a catalog file, picking the format from its extension
pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    let catalog = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_csv(path)?,
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path)?,
        _ => anyhow::bail!("Unsupported catalog format: {:?} (expected .json or .csv)", path),
    };

    tracing::info!(path = ?path, providers = catalog.len(), "Loaded provider catalog");
    Ok(catalog)
}

// ============================================================================
// TESTS
// ============================================================================
