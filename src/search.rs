// 🔎 Search/Filter Controller
//
// Owns the query a patient is building and the provider subset it selects.
// Every mutation recomputes the subset synchronously and bumps a generation
// counter; the front end redraws whenever the generation changes.

use crate::catalog::{validate_catalog, CatalogError, ProviderSource};
use crate::provider::{canonical_distance, canonical_specialty, ProviderRecord};
use serde::{Deserialize, Serialize};

// ============================================================================
// QUERY STATE
// ============================================================================

/// The user's current search inputs. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    #[serde(default)]
    pub search_term: String,

    /// Empty, or a value from SPECIALTY_OPTIONS
    #[serde(default)]
    pub specialty_filter: String,

    /// Empty, or a value from DISTANCE_OPTIONS. Not applied to results.
    #[serde(default)]
    pub distance_filter: String,
}

impl QueryState {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.specialty_filter.is_empty()
            && self.distance_filter.is_empty()
    }
}

// ============================================================================
// FILTER PREDICATE
// ============================================================================

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Free-text match against name or specialty. An empty term matches everything.
pub fn matches_search(record: &ProviderRecord, query: &QueryState) -> bool {
    query.search_term.is_empty()
        || contains_ignore_case(&record.name, &query.search_term)
        || contains_ignore_case(&record.specialty, &query.search_term)
}

pub fn matches_specialty(record: &ProviderRecord, query: &QueryState) -> bool {
    query.specialty_filter.is_empty()
        || record.specialty.to_lowercase() == query.specialty_filter.to_lowercase()
}

pub fn matches(record: &ProviderRecord, query: &QueryState) -> bool {
    matches_search(record, query) && matches_specialty(record, query)
}

/// Catalog order is preserved; nothing is ranked.
pub fn filter_providers(catalog: &[ProviderRecord], query: &QueryState) -> Vec<ProviderRecord> {
    catalog
        .iter()
        .filter(|record| matches(record, query))
        .cloned()
        .collect()
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    Ready,
    /// The source could not be read. The view offers a retry.
    Unavailable(String),
}

/// Handle for one issued remote query. Only the newest ticket is honoured.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    pub seq: u64,
    pub query: QueryState,
}

/// Records a remote query returned, and the query they answer
#[derive(Debug, Clone)]
struct RemoteResult {
    query: QueryState,
    records: Vec<ProviderRecord>,
}

pub struct SearchController {
    catalog: Vec<ProviderRecord>,
    /// Shown only while the query still equals the one it answers
    remote: Option<RemoteResult>,
    query: QueryState,
    results: Vec<ProviderRecord>,
    status: CatalogStatus,
    generation: u64,
    latest_ticket: u64,
}

impl SearchController {
    /// Controller over an already-resident catalog
    pub fn new(catalog: Vec<ProviderRecord>) -> Self {
        let mut controller = SearchController {
            catalog,
            remote: None,
            query: QueryState::default(),
            results: Vec::new(),
            status: CatalogStatus::Ready,
            generation: 0,
            latest_ticket: 0,
        };
        controller.recompute();
        controller
    }

    /// Create the controller and load its catalog from a source
    pub fn mount(source: &dyn ProviderSource) -> Self {
        let mut controller = SearchController::new(Vec::new());
        controller.load_from(source);
        controller
    }

    /// Reload after the catalog was unavailable
    pub fn retry(&mut self, source: &dyn ProviderSource) {
        tracing::info!("Retrying provider catalog load");
        self.load_from(source);
    }

    fn load_from(&mut self, source: &dyn ProviderSource) {
        let fetched = source
            .fetch_providers(&QueryState::default())
            .and_then(|records| validate_catalog(&records).map(|_| records));
        self.apply_outcome(fetched);
    }

    fn apply_outcome(&mut self, outcome: Result<Vec<ProviderRecord>, CatalogError>) {
        match outcome {
            Ok(records) => {
                tracing::debug!(providers = records.len(), "Provider catalog ready");
                self.catalog = records;
                self.remote = None;
                self.status = CatalogStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Provider catalog unavailable");
                self.catalog.clear();
                self.remote = None;
                self.status = CatalogStatus::Unavailable(err.to_string());
            }
        }
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.query.search_term = term.to_string();
        self.recompute();
    }

    /// Unknown specialties are treated as "no filter" rather than rejected
    pub fn set_specialty_filter(&mut self, value: &str) {
        self.query.specialty_filter = match canonical_specialty(value) {
            Some(v) => v.to_string(),
            None => {
                tracing::warn!(value, "Unknown specialty filter, ignoring");
                String::new()
            }
        };
        self.recompute();
    }

    /// Recorded only. No distance predicate exists yet: whether this should be
    /// a client-side cut on distance_miles or a server-side radius query is
    /// still undecided.
    pub fn set_distance_filter(&mut self, value: &str) {
        self.query.distance_filter = match canonical_distance(value) {
            Some(v) => v.to_string(),
            None => {
                tracing::warn!(value, "Unknown distance filter, ignoring");
                String::new()
            }
        };
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.query = QueryState::default();
        self.recompute();
    }

    /// Explicit search submission. Results are already live, so this only logs.
    pub fn submit_search(&self) {
        tracing::info!(
            search = %self.query.search_term,
            specialty = %self.query.specialty_filter,
            distance = %self.query.distance_filter,
            matches = self.results.len(),
            "Search submitted"
        );
        if !self.query.distance_filter.is_empty() {
            tracing::debug!(
                distance = %self.query.distance_filter,
                "Distance filter recorded but not applied to results"
            );
        }
    }

    /// Start a remote query. Any earlier ticket becomes stale.
    pub fn begin_remote_query(&mut self) -> QueryTicket {
        self.latest_ticket += 1;
        QueryTicket {
            seq: self.latest_ticket,
            query: self.query.clone(),
        }
    }

    /// Apply a remote query result. Returns false if the ticket was superseded,
    /// or the query changed since it was issued, and the outcome was dropped.
    ///
    /// A successful result narrows the view for its own query only. The
    /// mounted catalog is left alone, so the next query change filters the
    /// full catalog again.
    pub fn complete_remote_query(
        &mut self,
        ticket: &QueryTicket,
        outcome: Result<Vec<ProviderRecord>, CatalogError>,
    ) -> bool {
        if ticket.seq != self.latest_ticket {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_ticket,
                "Dropping stale query result"
            );
            return false;
        }
        if ticket.query != self.query {
            tracing::debug!(seq = ticket.seq, "Dropping result for an outdated query");
            return false;
        }

        match outcome.and_then(|records| validate_catalog(&records).map(|_| records)) {
            Ok(records) => {
                tracing::debug!(seq = ticket.seq, providers = records.len(), "Remote query applied");
                self.remote = Some(RemoteResult {
                    query: ticket.query.clone(),
                    records,
                });
                self.status = CatalogStatus::Ready;
                self.recompute();
            }
            Err(err) => self.apply_outcome(Err(err)),
        }
        true
    }

    fn recompute(&mut self) {
        if self.remote.as_ref().is_some_and(|r| r.query != self.query) {
            self.remote = None;
        }

        let source = match &self.remote {
            Some(remote) => &remote.records,
            None => &self.catalog,
        };
        self.results = filter_providers(source, &self.query);
        self.generation += 1;
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn results(&self) -> &[ProviderRecord] {
        &self.results
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixture_providers, StaticCatalog};

    struct DownSource;

    impl ProviderSource for DownSource {
        fn fetch_providers(&self, _query: &QueryState) -> Result<Vec<ProviderRecord>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    fn names(records: &[ProviderRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn query(term: &str, specialty: &str) -> QueryState {
        QueryState {
            search_term: term.to_string(),
            specialty_filter: specialty.to_string(),
            distance_filter: String::new(),
        }
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let q = QueryState::default();
        let mut odd = ProviderRecord::new("z", "", "", "", 0.0, 0.0);
        assert!(matches_search(&odd, &q));

        odd.name = "Dr. Ünïcødé 名前".to_string();
        assert!(matches_search(&odd, &q));
    }

    #[test]
    fn test_unicode_terms_match_case_insensitively() {
        let record = ProviderRecord::new("u", "Dr. Ünïcødé 名前", "Neurologist", "", 1.0, 4.0);

        assert!(matches_search(&record, &query("ü", "")));
        assert!(matches_search(&record, &query("ÜNÏ", "")));
        assert!(matches_search(&record, &query("名前", "")));
        assert!(!matches_search(&record, &query("名無し", "")));

        // Lowercasing İ changes its byte length
        let turkish = ProviderRecord::new("t", "Dr. İlker Aydın", "Cardiologist", "", 1.0, 4.0);
        assert!(matches_search(&turkish, &query("İ", "")));
        // Dotless ı has no ASCII uppercase partner
        assert!(!matches_search(&turkish, &query("AYDIN", "")));
        assert!(matches_search(&turkish, &query("aydın", "")));
        assert!(!matches_search(&fixture_providers()[0], &query("İ", "")));

        let odd_specialty = ProviderRecord::new("s", "Dr. Lee", "Ürology", "", 1.0, 4.0);
        assert!(matches_specialty(&odd_specialty, &query("", "ÜROLOGY")));
        assert!(!matches_specialty(&odd_specialty, &query("", "名前")));
    }

    #[test]
    fn test_unicode_input_through_controller() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("名前");
        assert!(controller.results().is_empty());

        controller.set_search_term("İ");
        assert!(controller.results().is_empty());

        controller.set_search_term("");
        controller.set_specialty_filter("名前");
        assert_eq!(controller.query().specialty_filter, "");
        assert_eq!(controller.results().len(), 4);
    }

    #[test]
    fn test_no_filters_returns_full_catalog_in_order() {
        let controller = SearchController::new(fixture_providers());
        assert_eq!(controller.results().len(), 4);
        assert_eq!(controller.results(), fixture_providers().as_slice());
    }

    #[test]
    fn test_partial_term_matches_specialty_case_insensitively() {
        let results = filter_providers(&fixture_providers(), &query("cardio", ""));
        assert_eq!(names(&results), vec!["Dr. Sarah Johnson", "Dr. Michael Chen"]);

        let results = filter_providers(&fixture_providers(), &query("CARDIO", ""));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_specialty_filter_selects_cardiologists() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_specialty_filter("cardiologist");

        assert_eq!(
            names(controller.results()),
            vec!["Dr. Sarah Johnson", "Dr. Michael Chen"]
        );
        assert!(controller.results().iter().all(|r| r.specialty == "Cardiologist"));
    }

    #[test]
    fn test_search_by_surname() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("Rodriguez");

        assert_eq!(names(controller.results()), vec!["Dr. Emily Rodriguez"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("xyz-no-match");

        assert!(controller.results().is_empty());
        assert_eq!(controller.status(), &CatalogStatus::Ready);
    }

    #[test]
    fn test_term_and_specialty_combine() {
        let results = filter_providers(&fixture_providers(), &query("chen", "cardiologist"));
        assert_eq!(names(&results), vec!["Dr. Michael Chen"]);

        let results = filter_providers(&fixture_providers(), &query("chen", "neurologist"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let catalog = fixture_providers();
        let q = query("dr", "primary care");

        let once = filter_providers(&catalog, &q);
        let twice = filter_providers(&catalog, &q);
        assert_eq!(once, twice);

        // Filtering the filtered set changes nothing either
        assert_eq!(filter_providers(&once, &q), once);
    }

    #[test]
    fn test_unknown_specialty_treated_as_no_filter() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_specialty_filter("cardiologist");
        controller.set_specialty_filter("podiatrist");

        assert_eq!(controller.query().specialty_filter, "");
        assert_eq!(controller.results().len(), 4);
    }

    #[test]
    fn test_specialty_filter_accepts_display_casing() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_specialty_filter("Primary Care");

        assert_eq!(controller.query().specialty_filter, "primary care");
        assert_eq!(names(controller.results()), vec!["Dr. Emily Rodriguez"]);
    }

    #[test]
    fn test_distance_filter_is_recorded_but_not_applied() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_distance_filter("5");

        assert_eq!(controller.query().distance_filter, "5");
        // Dr. Wilson is 4.2 miles away, Dr. Chen 3.7; all four still show
        assert_eq!(controller.results().len(), 4);

        controller.set_distance_filter("7");
        assert_eq!(controller.query().distance_filter, "");
    }

    #[test]
    fn test_submit_does_not_change_results() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("wilson");
        let before = controller.results().to_vec();
        let generation = controller.generation();

        controller.submit_search();

        assert_eq!(controller.results(), before.as_slice());
        assert_eq!(controller.generation(), generation);
    }

    #[test]
    fn test_every_mutation_bumps_generation() {
        let mut controller = SearchController::new(fixture_providers());
        let g0 = controller.generation();

        controller.set_search_term("a");
        controller.set_specialty_filter("");
        controller.set_distance_filter("10");
        controller.clear_filters();

        assert_eq!(controller.generation(), g0 + 4);
        assert!(controller.query().is_empty());
    }

    #[test]
    fn test_mount_from_source() {
        let controller = SearchController::mount(&StaticCatalog::fixture());
        assert_eq!(controller.status(), &CatalogStatus::Ready);
        assert_eq!(controller.catalog_len(), 4);
    }

    #[test]
    fn test_unavailable_catalog_then_retry() {
        let mut controller = SearchController::mount(&DownSource);
        assert!(matches!(controller.status(), CatalogStatus::Unavailable(msg) if msg.contains("connection refused")));
        assert!(controller.results().is_empty());

        controller.set_search_term("chen");
        controller.retry(&StaticCatalog::fixture());

        assert_eq!(controller.status(), &CatalogStatus::Ready);
        // The query typed while offline still applies after the retry
        assert_eq!(names(controller.results()), vec!["Dr. Michael Chen"]);
    }

    #[test]
    fn test_stale_remote_result_is_dropped() {
        let mut controller = SearchController::new(fixture_providers());

        controller.set_search_term("johnson");
        let first = controller.begin_remote_query();
        controller.set_search_term("wilson");
        let second = controller.begin_remote_query();

        // Newer query answers first
        let newer = vec![fixture_providers()[3].clone()];
        assert!(controller.complete_remote_query(&second, Ok(newer)));

        // Older one straggles in afterwards and must not overwrite it
        let older = vec![fixture_providers()[0].clone()];
        assert!(!controller.complete_remote_query(&first, Ok(older)));

        assert_eq!(names(controller.results()), vec!["Dr. James Wilson"]);
        assert_eq!(second.query.search_term, "wilson");
    }

    #[test]
    fn test_clear_filters_after_remote_result_shows_full_catalog() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("wilson");
        let ticket = controller.begin_remote_query();
        assert!(controller.complete_remote_query(&ticket, Ok(vec![fixture_providers()[3].clone()])));
        assert_eq!(names(controller.results()), vec!["Dr. James Wilson"]);

        controller.clear_filters();

        assert_eq!(controller.catalog_len(), 4);
        assert_eq!(controller.results(), fixture_providers().as_slice());
    }

    #[test]
    fn test_remote_result_for_changed_query_is_dropped() {
        let mut controller = SearchController::new(fixture_providers());
        controller.set_search_term("johnson");
        let ticket = controller.begin_remote_query();
        controller.set_search_term("chen");

        let applied = controller.complete_remote_query(&ticket, Ok(vec![fixture_providers()[0].clone()]));

        assert!(!applied);
        assert_eq!(names(controller.results()), vec!["Dr. Michael Chen"]);
    }

    #[test]
    fn test_remote_failure_marks_unavailable() {
        let mut controller = SearchController::new(fixture_providers());
        let ticket = controller.begin_remote_query();

        let applied = controller.complete_remote_query(
            &ticket,
            Err(CatalogError::Unavailable("timeout".to_string())),
        );

        assert!(applied);
        assert!(matches!(controller.status(), CatalogStatus::Unavailable(_)));
        assert!(controller.results().is_empty());
    }

    #[test]
    fn test_remote_result_with_duplicate_ids_is_rejected() {
        let mut controller = SearchController::new(Vec::new());
        let ticket = controller.begin_remote_query();

        let mut records = fixture_providers();
        records[1].id = records[0].id.clone();
        controller.complete_remote_query(&ticket, Ok(records));

        assert!(matches!(controller.status(), CatalogStatus::Unavailable(msg) if msg.contains("Duplicate")));
    }
}
