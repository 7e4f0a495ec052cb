//! Per-record selection decisions
//!
//! Checks run cheapest and most discriminating first: budget, search,
//! viewport, then exact filter matches. A pass stops at the first record
//! that finds the budget already spent.

use icpe_core::{EmptySelectionPolicy, Record, SelectionState, Settings, Viewport};

/// Why a record was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing constrains the selection and the policy shows nothing
    Unconstrained,
    /// No searchable attribute contains the search text
    Search,
    /// The point is outside the viewport
    Viewport,
    /// A filter value does not match
    Filter,
}

/// Decision for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Include,
    /// The budget was already reached; the pass is truncated
    OverBudget,
    Exclude(Rejection),
}

impl Verdict {
    pub fn include(&self) -> bool {
        matches!(self, Verdict::Include)
    }

    pub fn counts_toward_budget(&self) -> bool {
        self.include()
    }

    pub fn exhausts_budget(&self) -> bool {
        matches!(self, Verdict::OverBudget)
    }
}

/// Result of a full pass over the record store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Indices of accepted records, in store order
    pub included: Vec<usize>,
    /// The budget ran out before every record was evaluated
    pub truncated: bool,
}

impl SelectionOutcome {
    pub fn accepted_count(&self) -> usize {
        self.included.len()
    }
}

/// Selection state resolved once per pass
struct Criteria<'s> {
    blocked: bool,
    needle: Option<String>,
    filters: Vec<(&'s str, &'s str)>,
    budget: usize,
    viewport: Viewport,
}

/// The inclusion decision function
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    search_fields: Vec<String>,
    min_search_len: usize,
    empty_selection: EmptySelectionPolicy,
}

impl SelectionEngine {
    pub fn new(
        search_fields: Vec<String>,
        min_search_len: usize,
        empty_selection: EmptySelectionPolicy,
    ) -> Self {
        Self {
            search_fields,
            min_search_len,
            empty_selection,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.fields.search.clone(),
            settings.min_search_len,
            settings.empty_selection,
        )
    }

    pub fn empty_selection(&self) -> EmptySelectionPolicy {
        self.empty_selection
    }

    fn criteria<'s>(&self, state: &'s SelectionState, viewport: &Viewport) -> Criteria<'s> {
        let blocked = self.empty_selection == EmptySelectionPolicy::ShowNothing
            && !state.has_constraint(self.min_search_len);

        Criteria {
            blocked,
            needle: state.active_search(self.min_search_len).map(str::to_lowercase),
            filters: state.active_filters().collect(),
            budget: state.budget(),
            viewport: *viewport,
        }
    }

    /// Decide a single record given how many were already accepted this pass
    pub fn evaluate(
        &self,
        record: &Record,
        state: &SelectionState,
        viewport: &Viewport,
        running_count: usize,
    ) -> Verdict {
        self.decide(record, &self.criteria(state, viewport), running_count)
    }

    fn decide(&self, record: &Record, criteria: &Criteria<'_>, running_count: usize) -> Verdict {
        if criteria.blocked {
            return Verdict::Exclude(Rejection::Unconstrained);
        }

        if running_count >= criteria.budget {
            return Verdict::OverBudget;
        }

        if let Some(needle) = &criteria.needle {
            if !self.matches_search(record, needle) {
                return Verdict::Exclude(Rejection::Search);
            }
        }

        if !criteria.viewport.contains(record.point()) {
            return Verdict::Exclude(Rejection::Viewport);
        }

        let filters_match = criteria
            .filters
            .iter()
            .all(|(key, value)| record.attribute(key) == Some(*value));
        if !filters_match {
            return Verdict::Exclude(Rejection::Filter);
        }

        Verdict::Include
    }

    /// `needle` is already lowercased; absent attributes never match
    fn matches_search(&self, record: &Record, needle: &str) -> bool {
        self.search_fields.iter().any(|field| {
            record
                .attribute(field)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }

    /// Evaluate every record in order with a fresh running count
    pub fn run_pass(
        &self,
        records: &[Record],
        state: &SelectionState,
        viewport: &Viewport,
    ) -> SelectionOutcome {
        let criteria = self.criteria(state, viewport);
        if criteria.blocked {
            tracing::debug!("No filter or search active, selecting nothing");
            return SelectionOutcome::default();
        }

        let mut outcome = SelectionOutcome::default();
        for (index, record) in records.iter().enumerate() {
            match self.decide(record, &criteria, outcome.included.len()) {
                Verdict::Include => outcome.included.push(index),
                Verdict::OverBudget => {
                    outcome.truncated = true;
                    break;
                }
                Verdict::Exclude(_) => {}
            }
        }

        tracing::debug!(
            "Selection pass: {} of {} records accepted (budget {}, truncated: {})",
            outcome.accepted_count(),
            records.len(),
            criteria.budget,
            outcome.truncated
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icpe_core::GeoPoint;

    fn engine(policy: EmptySelectionPolicy) -> SelectionEngine {
        SelectionEngine::new(
            vec!["nom_ets".to_string(), "famille_ic".to_string()],
            3,
            policy,
        )
    }

    fn brittany() -> Viewport {
        Viewport::from_corners(GeoPoint::new(47.0, -5.0), GeoPoint::new(49.0, -1.0))
    }

    fn facility(name: &str, dep: &str) -> Record {
        Record::new(GeoPoint::new(48.1, -2.5))
            .with_attribute("nom_ets", name)
            .with_attribute("num_dep", dep)
    }

    #[test]
    fn test_verdict_flags() {
        assert!(Verdict::Include.include());
        assert!(Verdict::Include.counts_toward_budget());
        assert!(!Verdict::OverBudget.include());
        assert!(Verdict::OverBudget.exhausts_budget());
        assert!(!Verdict::Exclude(Rejection::Filter).counts_toward_budget());
    }

    #[test]
    fn test_budget_checked_before_anything_else() {
        let state = SelectionState::new(1).with_filter("num_dep", "99");
        let verdict = engine(EmptySelectionPolicy::ShowNothing).evaluate(
            &facility("Acme", "35"),
            &state,
            &brittany(),
            1,
        );
        assert_eq!(verdict, Verdict::OverBudget);
    }

    #[test]
    fn test_search_checked_before_viewport() {
        let outside = Record::new(GeoPoint::new(10.0, 10.0)).with_attribute("nom_ets", "Beta");
        let state = SelectionState::new(500).with_search("acme");

        let verdict = engine(EmptySelectionPolicy::ShowNothing).evaluate(&outside, &state, &brittany(), 0);
        assert_eq!(verdict, Verdict::Exclude(Rejection::Search));
    }

    #[test]
    fn test_filter_is_exact_and_case_sensitive() {
        let engine = engine(EmptySelectionPolicy::ShowNothing);
        let record = Record::new(GeoPoint::new(48.1, -2.5)).with_attribute("lib_regime", "Autorisation");

        for value in ["autorisation", "Autoris", "Autorisation "] {
            let state = SelectionState::new(500).with_filter("lib_regime", value);
            assert_eq!(
                engine.evaluate(&record, &state, &brittany(), 0),
                Verdict::Exclude(Rejection::Filter)
            );
        }

        let state = SelectionState::new(500).with_filter("lib_regime", "Autorisation");
        assert_eq!(engine.evaluate(&record, &state, &brittany(), 0), Verdict::Include);
    }

    #[test]
    fn test_missing_attribute_never_matches_filter() {
        let record = Record::new(GeoPoint::new(48.1, -2.5));
        let state = SelectionState::new(500).with_filter("num_dep", "35");

        assert_eq!(
            engine(EmptySelectionPolicy::ShowNothing).evaluate(&record, &state, &brittany(), 0),
            Verdict::Exclude(Rejection::Filter)
        );
    }

    #[test]
    fn test_search_is_literal_text() {
        let engine = engine(EmptySelectionPolicy::ShowNothing);
        let record = Record::new(GeoPoint::new(48.1, -2.5)).with_attribute("nom_ets", "S.A.R.L. (Nord)");

        let literal = SelectionState::new(500).with_search("l. (");
        assert_eq!(engine.evaluate(&record, &literal, &brittany(), 0), Verdict::Include);

        let pattern = SelectionState::new(500).with_search("s.*nord");
        assert_eq!(
            engine.evaluate(&record, &pattern, &brittany(), 0),
            Verdict::Exclude(Rejection::Search)
        );
    }

    #[test]
    fn test_search_skips_absent_attributes() {
        // No famille_ic at all; nom_ets still matches
        let record = Record::new(GeoPoint::new(48.1, -2.5)).with_attribute("nom_ets", "Laiterie Nouvelle");
        let state = SelectionState::new(500).with_search("LAITERIE");

        assert_eq!(
            engine(EmptySelectionPolicy::ShowNothing).evaluate(&record, &state, &brittany(), 0),
            Verdict::Include
        );
    }

    #[test]
    fn test_unconstrained_state_depends_on_policy() {
        let records = vec![facility("Acme", "35")];
        let state = SelectionState::new(500);

        let nothing = engine(EmptySelectionPolicy::ShowNothing).run_pass(&records, &state, &brittany());
        assert_eq!(nothing, SelectionOutcome::default());

        let all = engine(EmptySelectionPolicy::ShowAllInViewport).run_pass(&records, &state, &brittany());
        assert_eq!(all.included, vec![0]);
    }

    #[test]
    fn test_short_search_alone_is_unconstrained() {
        let records = vec![facility("Acme", "35")];
        let state = SelectionState::new(500).with_search("ac");

        let outcome = engine(EmptySelectionPolicy::ShowNothing).run_pass(&records, &state, &brittany());
        assert!(outcome.included.is_empty());
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_pass_marks_truncation_and_stops() {
        let records: Vec<_> = (0..10).map(|i| facility(&format!("Site {i}"), "35")).collect();
        let state = SelectionState::new(4).with_filter("num_dep", "35");

        let outcome = engine(EmptySelectionPolicy::ShowNothing).run_pass(&records, &state, &brittany());
        assert_eq!(outcome.included, vec![0, 1, 2, 3]);
        assert!(outcome.truncated);
    }

    #[test]
    fn test_exact_budget_fit_is_not_truncated() {
        let records: Vec<_> = (0..4).map(|i| facility(&format!("Site {i}"), "35")).collect();
        let state = SelectionState::new(4).with_filter("num_dep", "35");

        let outcome = engine(EmptySelectionPolicy::ShowNothing).run_pass(&records, &state, &brittany());
        assert_eq!(outcome.accepted_count(), 4);
        assert!(!outcome.truncated);
    }
}
