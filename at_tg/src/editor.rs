use std::sync::Arc;

use at_http::ReloadNotifier;
use at_params::ParamStore;
use at_params::ParameterSet;
use at_params::StoreError;
use at_params::ValidationError;
use at_params::validate;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;
use tracing::warn;

#[derive(Error, Debug)]
pub enum EditError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to save parameters: {0}")]
    Store(#[from] StoreError),

    #[error("Storage task failed: {0}")]
    Task(#[from] JoinError),
}

/// Result of an accepted edit
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Persisted and acknowledged by the engine
    Applied(ParameterSet),
    /// Persisted, but the engine never acknowledged the reload
    SavedNotApplied(ParameterSet),
}

impl EditOutcome {
    pub fn params(&self) -> &ParameterSet {
        match self {
            EditOutcome::Applied(params) | EditOutcome::SavedNotApplied(params) => params,
        }
    }
}

/// Read-modify-write of the shared parameter file followed by a reload request
pub struct ParamEditor<N> {
    store: Arc<ParamStore>,
    notifier: N,
}

impl<N: ReloadNotifier> ParamEditor<N> {
    pub fn new(store: Arc<ParamStore>, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<ParamStore> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Current parameters as persisted
    pub async fn current(&self) -> Result<ParameterSet, EditError> {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || store.load()).await?)
    }

    /// Validate `value` for `key` against the full set, persist, then ask for a reload.
    /// Nothing is written when validation fails.
    pub async fn apply(&self, key: &'static str, value: Value) -> Result<EditOutcome, EditError> {
        let mut raw = self.current().await?.to_raw();
        raw.insert(key.to_string(), value);
        let params = validate(&raw)?;

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.save(&params)).await??;
        info!(field = key, path = %self.store.path().display(), "Parameter saved, requesting reload");

        if self.notifier.notify().await {
            Ok(EditOutcome::Applied(params))
        } else {
            warn!(field = key, "Engine did not acknowledge reload, change saved but not applied");
            Ok(EditOutcome::SavedNotApplied(params))
        }
    }
}
