/// Campaign coordinator: owns the prospect store, the notification center,
/// the current template and the external collaborators.
///
/// Every state transition happens synchronously in response to a discrete
/// caller action; the clock is passed in explicitly so the notification
/// lifecycle stays deterministic.
use crate::errors::AppError;
use crate::links::{self, LinkOpener, LINK_TARGET};
use crate::models::Prospect;
use crate::notifications::{Notification, NotificationCenter, Severity};
use crate::state::{self, StateStore};
use crate::store::{ProspectStore, Stats, ViewMode};
use crate::template;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Template used when no persisted template exists.
pub const DEFAULT_TEMPLATE: &str = "Hola {{nombre}}, soy asesor comercial. \
Vi que estás en la zona {{zone}} y me gustaría contarte sobre nuestras \
opciones. ¿Tienes un minuto?";

/// Outcome of a successful send action.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// The chat link handed to the opener.
    pub url: String,
    /// Whether the prospect was newly added to the sent set.
    pub newly_sent: bool,
}

pub struct Campaign<S: StateStore, L: LinkOpener> {
    store: ProspectStore,
    notifications: NotificationCenter,
    template: String,
    state: S,
    opener: L,
}

impl<S: StateStore, L: LinkOpener> Campaign<S, L> {
    /// Builds a campaign over an adapted prospect list, restoring the
    /// persisted template and sent set.
    ///
    /// Absent or malformed persisted state degrades silently to the
    /// built-in default template and an empty sent set.
    pub fn new(
        prospects: Vec<Prospect>,
        filter_columns: Vec<String>,
        default_template: Option<String>,
        state: S,
        opener: L,
    ) -> Self {
        let mut store = ProspectStore::new(prospects, filter_columns);

        let template = state::load_template(&state)
            .or(default_template)
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        let restored = state::load_sent_ids(&state);
        if !restored.is_empty() {
            tracing::info!("Restored {} sent ids from previous session", restored.len());
        }
        store.restore_sent(restored);

        Self {
            store,
            notifications: NotificationCenter::new(),
            template,
            state,
            opener,
        }
    }

    /// Current message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Saves a new template, persists it and confirms with a notification.
    pub fn save_template(&mut self, text: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        self.template = text.to_string();
        state::save_template(&mut self.state, &self.template)?;
        self.notifications
            .push("Plantilla guardada", Severity::Success, now);
        tracing::info!("Template saved ({} chars)", text.len());
        Ok(())
    }

    /// Renders the current template against a prospect without side effects.
    pub fn preview(&self, prospect_id: &str) -> Result<String, AppError> {
        let prospect = self.lookup(prospect_id)?;
        Ok(template::render(&self.template, &prospect.record()))
    }

    /// Sends the current template to a prospect.
    ///
    /// A prospect without a phone number fails with `MissingPhone`: an error
    /// notification is pushed and the sent set is left untouched. Otherwise
    /// the rendered message becomes a `wa.me` link, the prospect joins the
    /// sent set (idempotent, persisted on every change) and the link is
    /// handed to the opener. There is no unsend.
    pub fn send(&mut self, prospect_id: &str, now: DateTime<Utc>) -> Result<SendOutcome, AppError> {
        let prospect = match self.lookup(prospect_id) {
            Ok(p) => p.clone(),
            Err(e) => {
                self.notifications
                    .push("Prospecto no encontrado", Severity::Error, now);
                return Err(e);
            }
        };

        if prospect.phone.is_empty() {
            let name = prospect.display_name();
            tracing::warn!("Send rejected, no phone number for prospect {}", prospect.id);
            self.notifications.push(
                format!("{} no tiene número de teléfono", name),
                Severity::Error,
                now,
            );
            return Err(AppError::MissingPhone(name));
        }

        let message = template::render(&self.template, &prospect.record());
        let url = links::wa_link(&prospect.phone, &message)?;

        let newly_sent = self.store.mark_sent(&prospect.id);
        if newly_sent {
            // The send itself already happened; a persistence failure only
            // costs the next session its restore, so degrade to a toast
            if let Err(e) = state::save_sent_ids(&mut self.state, &self.store.sent_ids()) {
                tracing::error!("Failed to persist sent set: {}", e);
                self.notifications.push(
                    "No se pudo guardar el progreso de envíos",
                    Severity::Error,
                    now,
                );
            }
        }

        self.opener.open(&url, LINK_TARGET);
        tracing::info!(
            "✓ Prepared message for {} ({} chars, newly_sent: {})",
            prospect.id,
            message.len(),
            newly_sent
        );
        self.notifications.push(
            format!("Mensaje abierto para {}", prospect.display_name()),
            Severity::Success,
            now,
        );

        Ok(SendOutcome { url, newly_sent })
    }

    fn lookup(&self, prospect_id: &str) -> Result<&Prospect, AppError> {
        self.store
            .get(prospect_id)
            .ok_or_else(|| AppError::NotFound(format!("prospect {}", prospect_id)))
    }

    /// Sets or clears a column filter.
    pub fn set_filter(&mut self, column: &str, value: &str) -> Result<(), AppError> {
        self.store.set_filter(column, value)
    }

    /// Clears every active filter.
    pub fn clear_filters(&mut self) {
        self.store.clear_filters();
    }

    /// Visible prospects for a view mode (filters applied, then partitioned
    /// by sent-set membership).
    pub fn visible(&self, mode: ViewMode) -> Vec<&Prospect> {
        self.store.visible(mode)
    }

    /// Derived counters.
    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    /// Selectable values per filterable column.
    pub fn filter_options(&self) -> BTreeMap<String, Vec<String>> {
        self.store.filter_options()
    }

    /// Whether a prospect is in the sent set.
    pub fn is_sent(&self, prospect_id: &str) -> bool {
        self.store.is_sent(prospect_id)
    }

    /// Active notifications.
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    /// Dismisses a notification early; the later expiry sweep is a no-op.
    pub fn dismiss_notification(&mut self, id: Uuid) -> bool {
        self.notifications.dismiss(id)
    }

    /// Clock tick: drops expired notifications.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.notifications.purge_expired(now);
    }
}
