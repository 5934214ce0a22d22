//! Location-only editing of a stored record.

use crate::backend::RecordStore;
use crate::error::EditError;
use crate::records::{DateRange, WeatherRecord};

/// Snapshot of the record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub record_id: String,
    pub original_location: String,
    pub date_range: DateRange,
}

#[derive(Debug, Default)]
pub struct RecordEditor {
    session: Option<EditSession>,
    last_error: Option<String>,
}

impl RecordEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `record`, replacing any session in progress. Nothing is
    /// sent.
    pub fn begin_edit(&mut self, record: &WeatherRecord) {
        self.session = Some(EditSession {
            record_id: record.id.clone(),
            original_location: record.location.clone(),
            date_range: record.date_range,
        });
        self.last_error = None;
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn cancel(&mut self) {
        self.session = None;
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Send the new location with the record's original date range.
    ///
    /// On success the session ends and the stored record is returned. On
    /// failure the session is kept so the user can retry or cancel.
    pub async fn apply_edit<S: RecordStore>(
        &mut self,
        store: &S,
        new_location: &str,
    ) -> Result<WeatherRecord, EditError> {
        let result = self.try_apply(store, new_location).await;
        match &result {
            Ok(_) => {
                self.session = None;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Record edit failed: {}", e);
                self.last_error = Some(e.user_message());
            }
        }
        result
    }

    async fn try_apply<S: RecordStore>(
        &self,
        store: &S,
        new_location: &str,
    ) -> Result<WeatherRecord, EditError> {
        let session = self.session.as_ref().ok_or(EditError::NoSession)?;

        let location = new_location.trim();
        if location.is_empty() {
            return Err(EditError::EmptyLocation);
        }

        let updated = store
            .update_record(&session.record_id, location, session.date_range)
            .await?;
        tracing::info!(
            "Record {} location changed from {:?} to {:?}",
            session.record_id,
            session.original_location,
            updated.location
        );
        Ok(updated)
    }
}
