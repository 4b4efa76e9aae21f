use crate::errors::AppError;
use crate::models::Prospect;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Which partition of the filtered list is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Prospects not yet in the sent set.
    Pending,
    /// Prospects already acted upon this session.
    Sent,
}

/// Derived counters over the full prospect list and the sent set.
///
/// Filters never affect these numbers; they are recomputed from scratch on
/// every call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Stats {
    /// Length of the full prospect list.
    pub total: usize,
    /// total minus the sent-set size.
    pub pending: usize,
    /// Size of the sent set.
    pub sent_this_session: usize,
    /// Equal to `sent_this_session`; there is no long-term contacted
    /// tracking in this model.
    pub contacted_total: usize,
    /// round(contacted_total / total * 100), 0 when the list is empty.
    pub progress_pct: u32,
}

/// In-memory store for the prospect list, the sent set and the active
/// column filters.
///
/// Owns no persistence; callers persist the sent set through `state`.
#[derive(Debug, Clone)]
pub struct ProspectStore {
    prospects: Vec<Prospect>,
    sent: BTreeSet<String>,
    filters: BTreeMap<String, String>,
    filter_columns: Vec<String>,
}

impl ProspectStore {
    /// Creates a store over an already-adapted prospect list.
    pub fn new(prospects: Vec<Prospect>, filter_columns: Vec<String>) -> Self {
        Self {
            prospects,
            sent: BTreeSet::new(),
            filters: BTreeMap::new(),
            filter_columns,
        }
    }

    /// Full list, in source order.
    pub fn prospects(&self) -> &[Prospect] {
        &self.prospects
    }

    /// Looks up a prospect by identifier.
    pub fn get(&self, id: &str) -> Option<&Prospect> {
        self.prospects.iter().find(|p| p.id == id)
    }

    /// Declared filterable columns.
    pub fn filter_columns(&self) -> &[String] {
        &self.filter_columns
    }

    /// Active filters (column -> selected value).
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Sets or clears a column filter.
    ///
    /// An empty value means "show all" and clears the entry. Columns outside
    /// the declared filterable set are rejected, keeping the filter-map
    /// invariant.
    pub fn set_filter(&mut self, column: &str, value: &str) -> Result<(), AppError> {
        if !self.filter_columns.iter().any(|c| c == column) {
            return Err(AppError::UnknownColumn(column.to_string()));
        }
        if value.is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Clears every active filter.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Computes the visible subset for a view mode.
    ///
    /// Every active filter is applied first (exact string equality on the
    /// coerced field text, AND across filters), then the result is
    /// partitioned by sent-set membership. Recomputed from scratch each
    /// call; source order is preserved.
    pub fn visible(&self, mode: ViewMode) -> Vec<&Prospect> {
        self.prospects
            .iter()
            .filter(|p| self.matches_filters(p))
            .filter(|p| match mode {
                ViewMode::Pending => !self.sent.contains(&p.id),
                ViewMode::Sent => self.sent.contains(&p.id),
            })
            .collect()
    }

    fn matches_filters(&self, prospect: &Prospect) -> bool {
        self.filters.iter().all(|(column, wanted)| {
            // A prospect lacking the column simply fails to match
            prospect.field_text(column) == Some(wanted.as_str())
        })
    }

    /// Derives the selectable options for each declared filterable column:
    /// distinct non-empty values observed across the full list, in ascending
    /// lexical order.
    pub fn filter_options(&self) -> BTreeMap<String, Vec<String>> {
        self.filter_columns
            .iter()
            .map(|column| {
                let values: BTreeSet<String> = self
                    .prospects
                    .iter()
                    .filter_map(|p| p.field_text(column))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                (column.clone(), values.into_iter().collect())
            })
            .collect()
    }

    /// Adds an identifier to the sent set.
    ///
    /// Monotonic and idempotent; returns whether the id was newly inserted.
    /// There is no unsend.
    pub fn mark_sent(&mut self, id: &str) -> bool {
        self.sent.insert(id.to_string())
    }

    /// Whether a prospect has been acted upon this session.
    pub fn is_sent(&self, id: &str) -> bool {
        self.sent.contains(id)
    }

    /// Sent identifiers as an ordered list, for persistence.
    pub fn sent_ids(&self) -> Vec<String> {
        self.sent.iter().cloned().collect()
    }

    /// Restores a previously persisted sent set.
    pub fn restore_sent(&mut self, ids: Vec<String>) {
        self.sent = ids.into_iter().collect();
    }

    /// Recomputes the derived counters.
    pub fn stats(&self) -> Stats {
        let total = self.prospects.len();
        let sent = self.sent.len();
        let contacted_total = sent;
        let progress_pct = if total == 0 {
            0
        } else {
            ((contacted_total as f64 / total as f64) * 100.0).round() as u32
        };
        Stats {
            total,
            pending: total.saturating_sub(sent),
            sent_this_session: sent,
            contacted_total,
            progress_pct,
        }
    }
}
