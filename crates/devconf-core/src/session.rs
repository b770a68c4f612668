//! Device configuration session.
//!
//! A [`ConfigureSession`] exclusively owns one draft for its whole lifetime:
//! it builds the draft from three independent fetches, applies edits through
//! its [`DraftStore`], and hands the current contents to the collaborators
//! on save or name suggestion. Collaborator failures never abort the
//! session; they degrade to defaults or are recorded as the last error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::attribute::{Attribute, AttributeOption};
use crate::catalog::FunctionCatalog;
use crate::device::{filter_by_kind, summarize_configs, DeviceKind, DeviceSummary};
use crate::draft::{ConfigDraft, DraftStore};
use crate::error::{ConfigError, Result, SourceError};
use crate::merge::{build_draft, LiveReadings};
use crate::recommend::{recommend, Recommendation};
use crate::source::{
    CaseFormat, ConfigStore, DeviceDataSource, FunctionCatalogSource, NameSuggester,
};

/// Progress of loading the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Progress of the last outbound request (save, suggest, delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendStatus {
    #[default]
    Idle,
    Saving,
    Succeeded,
    Failed,
}

/// A fetch made while loading the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSource {
    DeviceData,
    SavedConfig,
    FunctionCatalog,
}

impl FetchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeviceData => "device data",
            Self::SavedConfig => "saved configuration",
            Self::FunctionCatalog => "function catalog",
        }
    }
}

impl std::fmt::Display for FetchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub devices: Arc<dyn DeviceDataSource>,
    pub configs: Arc<dyn ConfigStore>,
    pub catalog: Arc<dyn FunctionCatalogSource>,
    pub suggester: Arc<dyn NameSuggester>,
}

impl Collaborators {
    pub fn new(
        devices: Arc<dyn DeviceDataSource>,
        configs: Arc<dyn ConfigStore>,
        catalog: Arc<dyn FunctionCatalogSource>,
        suggester: Arc<dyn NameSuggester>,
    ) -> Self {
        Self {
            devices,
            configs,
            catalog,
            suggester,
        }
    }

    /// Use one client for every concern.
    pub fn shared<C>(client: Arc<C>) -> Self
    where
        C: DeviceDataSource + ConfigStore + FunctionCatalogSource + NameSuggester + 'static,
    {
        Self {
            devices: client.clone(),
            configs: client.clone(),
            catalog: client.clone(),
            suggester: client,
        }
    }
}

/// Editing session for one device's configuration.
pub struct ConfigureSession {
    sources: Collaborators,
    kind: Option<DeviceKind>,
    store: DraftStore,
    catalog: FunctionCatalog,
    case_format: CaseFormat,
    load_status: LoadStatus,
    send_status: SendStatus,
    error: Option<String>,
    saved_before: bool,
    degraded: Vec<FetchSource>,
}

impl ConfigureSession {
    /// Create an idle session with an empty draft.
    pub fn new(sources: Collaborators) -> Self {
        Self {
            sources,
            kind: None,
            store: DraftStore::default(),
            catalog: FunctionCatalog::empty(),
            case_format: CaseFormat::default(),
            load_status: LoadStatus::Idle,
            send_status: SendStatus::Idle,
            error: None,
            saved_before: false,
            degraded: Vec::new(),
        }
    }

    /// Load live readings, the saved configuration and the function catalog,
    /// and merge them into a fresh draft.
    ///
    /// The three fetches run concurrently and each may fail on its own: no
    /// readings means the saved attributes are used as they are, no saved
    /// configuration means a first-time draft, and no catalog leaves only
    /// the none-function.
    pub async fn init(&mut self, device_id: &str, kind: DeviceKind) -> Result<()> {
        if device_id.trim().is_empty() {
            return self.fail_load(ConfigError::Validation(
                "device id must not be empty".to_string(),
            ));
        }

        self.load_status = LoadStatus::Loading;
        self.error = None;
        info!(device_id = %device_id, kind = %kind, "Initializing device configuration");

        let (readings, saved, functions) = tokio::join!(
            self.sources.devices.fetch_readings(device_id, kind),
            self.sources.configs.fetch_config(device_id),
            self.sources.catalog.fetch_functions(),
        );

        self.degraded.clear();
        let readings = self.settle(FetchSource::DeviceData, device_id, readings);
        let saved = self
            .settle(FetchSource::SavedConfig, device_id, saved)
            .flatten();
        let functions = self
            .settle(FetchSource::FunctionCatalog, device_id, functions)
            .unwrap_or_default();

        self.catalog = FunctionCatalog::new(functions);
        self.saved_before = saved.is_some();
        self.kind = Some(kind);
        self.store.replace(build_draft(
            device_id,
            kind.as_str(),
            readings.as_ref(),
            saved.as_ref(),
        ));
        self.load_status = LoadStatus::Succeeded;

        debug!(
            device_id = %device_id,
            attributes = self.store.attributes().len(),
            functions = self.catalog.len(),
            saved_before = self.saved_before,
            degraded = self.degraded.len(),
            "Draft ready"
        );
        Ok(())
    }

    /// Re-read the device and its saved configuration and rebuild the draft.
    ///
    /// Unlike [`init`](Self::init), a failed configuration fetch is an error
    /// here: the current draft is kept rather than replaced by one that has
    /// lost its customizations.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(kind) = self.kind else {
            return self.fail_load(ConfigError::Validation(
                "session has not been initialized".to_string(),
            ));
        };
        let device_id = self.store.draft().device_id.clone();

        self.load_status = LoadStatus::Loading;
        self.error = None;

        let (readings, saved) = tokio::join!(
            self.sources.devices.fetch_readings(&device_id, kind),
            self.sources.configs.fetch_config(&device_id),
        );

        let saved = match saved {
            Ok(saved) => saved,
            Err(e) => return self.fail_load(ConfigError::operation("Load configuration", e)),
        };
        self.degraded
            .retain(|source| *source == FetchSource::FunctionCatalog);
        let readings = self.settle(FetchSource::DeviceData, &device_id, readings);

        self.saved_before = saved.is_some();
        self.store.replace(build_draft(
            &device_id,
            kind.as_str(),
            readings.as_ref(),
            saved.as_ref(),
        ));
        self.load_status = LoadStatus::Succeeded;
        info!(device_id = %device_id, "Device configuration reloaded");
        Ok(())
    }

    /// Persist the current draft.
    pub async fn save(&mut self) -> Result<()> {
        self.begin_send();
        let draft = self.store.draft().clone();

        match self.sources.configs.save_config(&draft).await {
            Ok(()) => {
                self.store.replace(draft);
                self.saved_before = true;
                self.degraded
                    .retain(|source| *source != FetchSource::SavedConfig);
                self.send_status = SendStatus::Succeeded;
                info!(device_id = %self.store.draft().device_id, "Device configuration saved");
                Ok(())
            }
            Err(e) => self.fail_send(ConfigError::operation("Save configuration", e)),
        }
    }

    /// Ask for a rename suggestion for every attribute and apply them.
    pub async fn suggest_names(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .store
            .attributes()
            .iter()
            .map(|a| a.name.clone())
            .collect();
        self.request_suggestions(names).await
    }

    /// Ask for a rename suggestion for one attribute and apply it.
    pub async fn suggest_name(&mut self, attribute: &str) -> Result<()> {
        if self.store.attribute(attribute).is_none() {
            return Err(ConfigError::AttributeNotFound(attribute.to_string()));
        }
        self.request_suggestions(vec![attribute.to_string()]).await
    }

    async fn request_suggestions(&mut self, names: Vec<String>) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        self.begin_send();

        let result = self
            .sources
            .suggester
            .suggest_names(&names, self.case_format)
            .await
            .and_then(|suggestions| {
                if suggestions.len() == names.len() {
                    Ok(suggestions)
                } else {
                    Err(SourceError::InvalidResponse(format!(
                        "expected {} suggestions, got {}",
                        names.len(),
                        suggestions.len()
                    )))
                }
            });

        match result {
            Ok(suggestions) => {
                debug!(count = suggestions.len(), format = %self.case_format, "Applying name suggestions");
                self.store.apply_suggestions(names.into_iter().zip(suggestions));
                self.send_status = SendStatus::Idle;
                Ok(())
            }
            Err(e) => self.fail_send(ConfigError::operation("Suggest names", e)),
        }
    }

    /// Remove the device and, if one was saved, its configuration.
    pub async fn delete_device(&mut self) -> Result<()> {
        let Some(kind) = self.kind else {
            return Err(ConfigError::Validation(
                "session has not been initialized".to_string(),
            ));
        };
        self.begin_send();
        let device_id = self.store.draft().device_id.clone();

        if let Err(e) = self.sources.devices.delete_device(&device_id, kind).await {
            return self.fail_send(ConfigError::operation("Delete device", e));
        }
        if let Some(config_id) = self.store.draft().id.clone() {
            if let Err(e) = self.sources.configs.delete_config(&config_id).await {
                return self.fail_send(ConfigError::operation("Delete configuration", e));
            }
        }

        self.saved_before = false;
        self.send_status = SendStatus::Succeeded;
        info!(device_id = %device_id, "Device deleted");
        Ok(())
    }

    // Draft edits. Each one clears a previous send failure.

    pub fn set_option(&mut self, attribute: &str, option: AttributeOption) {
        self.store.set_option(attribute, option);
        self.reset_send_status();
    }

    pub fn set_rename(&mut self, attribute: &str, rename: impl Into<String>) {
        self.store.set_rename(attribute, rename);
        self.reset_send_status();
    }

    pub fn set_processing_function(&mut self, attribute: &str, proc: Option<String>) {
        if let Some(name) = proc.as_deref() {
            if !self.catalog.contains(name) {
                warn!(attribute = %attribute, function = %name, "Assigning function not in catalog");
            }
        }
        self.store.set_processing_function(attribute, proc);
        self.reset_send_status();
    }

    pub fn reset_all(&mut self) {
        self.store.reset_all();
        self.reset_send_status();
    }

    pub fn apply_type_defaults(&mut self) {
        self.store.apply_type_defaults();
        self.reset_send_status();
    }

    pub fn set_device_name(&mut self, name: &str) -> Result<()> {
        self.store.set_device_name(name)?;
        self.reset_send_status();
        Ok(())
    }

    pub fn set_case_format(&mut self, format: CaseFormat) {
        self.case_format = format;
    }

    pub fn reset_send_status(&mut self) {
        self.send_status = SendStatus::Idle;
        self.error = None;
    }

    /// Ranked processing functions for one attribute of the draft.
    pub fn recommendations_for(&self, attribute: &str) -> Result<Vec<Recommendation<'_>>> {
        let attr = self
            .store
            .attribute(attribute)
            .ok_or_else(|| ConfigError::AttributeNotFound(attribute.to_string()))?;
        Ok(recommend(attr, &self.catalog))
    }

    /// Ranked processing functions for every attribute, in draft order.
    pub fn recommendations(&self) -> Vec<(&Attribute, Vec<Recommendation<'_>>)> {
        self.store
            .attributes()
            .iter()
            .map(|attr| (attr, recommend(attr, &self.catalog)))
            .collect()
    }

    pub fn draft(&self) -> &ConfigDraft {
        self.store.draft()
    }

    pub fn catalog(&self) -> &FunctionCatalog {
        &self.catalog
    }

    pub fn device_kind(&self) -> Option<DeviceKind> {
        self.kind
    }

    pub fn case_format(&self) -> CaseFormat {
        self.case_format
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn send_status(&self) -> SendStatus {
        self.send_status
    }

    /// Message of the last failed operation, cleared by the next attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a configuration for this device exists in the store.
    ///
    /// Only meaningful when the saved configuration was actually fetched;
    /// see [`degraded_sources`](Self::degraded_sources).
    pub fn saved_before(&self) -> bool {
        self.saved_before
    }

    /// Fetches that failed during the last load and were replaced by
    /// defaults.
    pub fn degraded_sources(&self) -> &[FetchSource] {
        &self.degraded
    }

    /// Whether the draft was built without the saved configuration because
    /// fetching it failed. Saving such a draft replaces the stored one with
    /// an uncustomized copy.
    pub fn saved_config_unknown(&self) -> bool {
        self.degraded.contains(&FetchSource::SavedConfig)
    }

    /// Turn a failed fetch into "no data", recording and logging the failure.
    fn settle<T>(
        &mut self,
        source: FetchSource,
        device_id: &str,
        result: std::result::Result<T, SourceError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(device_id = %device_id, "Failed to fetch {}: {}", source, e);
                self.degraded.push(source);
                None
            }
        }
    }

    fn begin_send(&mut self) {
        self.send_status = SendStatus::Saving;
        self.error = None;
    }

    fn fail_load(&mut self, err: ConfigError) -> Result<()> {
        warn!("{}", err);
        self.load_status = LoadStatus::Failed;
        self.error = Some(err.to_string());
        Err(err)
    }

    fn fail_send(&mut self, err: ConfigError) -> Result<()> {
        warn!("{}", err);
        self.send_status = SendStatus::Failed;
        self.error = Some(err.to_string());
        Err(err)
    }
}


/// List configured devices, optionally restricted to one kind.
pub async fn list_devices(
    configs: &dyn ConfigStore,
    kind: Option<DeviceKind>,
) -> Result<Vec<DeviceSummary>> {
    let saved = configs
        .list_configs()
        .await
        .map_err(|e| ConfigError::operation("List devices", e))?;
    Ok(filter_by_kind(summarize_configs(&saved), kind))
}

/// Live readings of a device without starting a session.
pub async fn read_device(
    devices: &dyn DeviceDataSource,
    device_id: &str,
    kind: DeviceKind,
) -> Result<LiveReadings> {
    devices
        .fetch_readings(device_id, kind)
        .await
        .map_err(|e| ConfigError::operation("Read device", e))
}
