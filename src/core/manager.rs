//! Facade coordinating the registry document, persistence, the session
//! state file, and the stateless services.
//!
//! Frontends hold one `RegistryManager` and call through it; the services
//! stay directly usable for callers that manage their own registry.

use std::path::Path;

use crate::core::services::{
    export, ConsumptionService, EligibilityService, ImportService, ImportSummary,
    ReconcileOutcome, ReconcileService, ServiceError, ServiceResult, SessionService,
};
use crate::domain::{
    EligibleStudent, NewSession, RecordId, ServedRow, SessionContext, TargetServed,
};
use crate::errors::StorageError;
use crate::registry::Registry;
use crate::state::SessionStateFile;
use crate::storage::{JsonStorage, RegistryStore};

pub struct RegistryManager {
    registry: Registry,
    current_name: Option<String>,
    active: Option<SessionContext>,
    storage: Box<dyn RegistryStore>,
    state: SessionStateFile,
}

impl RegistryManager {
    pub fn new(storage: Box<dyn RegistryStore>, state: SessionStateFile) -> Self {
        Self {
            registry: Registry::new(),
            current_name: None,
            active: None,
            storage,
            state,
        }
    }

    /// Manager over the default app-data locations.
    pub fn new_default() -> Result<Self, StorageError> {
        Ok(Self::new(
            Box::new(JsonStorage::new_default()?),
            SessionStateFile::new(),
        ))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    // --- persistence ---

    pub fn load(&mut self, name: &str) -> Result<(), StorageError> {
        self.registry = self.storage.load(name)?;
        self.current_name = Some(name.to_string());
        self.active = None;
        Ok(())
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let name = self.current_name.as_deref().ok_or_else(|| {
            StorageError::NotFound("no registry name recorded for save".into())
        })?;
        self.storage.save(&self.registry, name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<(), StorageError> {
        self.storage.save(&self.registry, name)?;
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), StorageError> {
        self.storage.save_to_path(&self.registry, path)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<(), StorageError> {
        self.registry = self.storage.load_from_path(path)?;
        self.current_name = None;
        self.active = None;
        Ok(())
    }

    // --- session lifecycle ---

    pub fn active_session(&self) -> Option<&SessionContext> {
        self.active.as_ref()
    }

    /// Resumes the session recorded in the state file.
    pub fn resume_session(&mut self) -> ServiceResult<&SessionContext> {
        let ctx = SessionService::load(&self.registry, &self.state)?;
        Ok(&*self.active.insert(ctx))
    }

    pub fn start_session(&mut self, input: NewSession) -> ServiceResult<&SessionContext> {
        let ctx = SessionService::create(&mut self.registry, &self.state, input)?;
        Ok(&*self.active.insert(ctx))
    }

    /// Drops the active session and resets the state file to the sentinel.
    pub fn close_session(&mut self) -> ServiceResult<()> {
        self.active = None;
        self.state.clear()?;
        Ok(())
    }

    pub fn set_session_groups(&mut self, groups: Vec<String>) -> ServiceResult<Vec<String>> {
        let session_id = self.context()?.session_id;
        let updated = SessionService::set_groups(&mut self.registry, session_id, groups)?;
        if let Some(ctx) = self.active.as_mut() {
            ctx.groups = updated.clone();
        }
        Ok(updated)
    }

    // --- serving ---

    pub fn eligible(&self) -> ServiceResult<Vec<EligibleStudent>> {
        let ctx = self.context()?;
        EligibilityService::resolve(&self.registry, ctx)
    }

    /// Eligible students not yet in the served set.
    pub fn eligible_remaining(&self) -> ServiceResult<Vec<EligibleStudent>> {
        let ctx = self.context()?;
        EligibilityService::remaining(&self.registry, ctx)
    }

    pub fn mark_served(&mut self, code: &str) -> ServiceResult<RecordId> {
        let ctx = self.owned_context()?;
        ConsumptionService::mark_served(&mut self.registry, &ctx, code)
    }

    pub fn unmark_served(&mut self, code: &str) -> ServiceResult<()> {
        let ctx = self.owned_context()?;
        ConsumptionService::unmark_served(&mut self.registry, &ctx, code)
    }

    pub fn served_rows(&self) -> ServiceResult<Vec<ServedRow>> {
        let ctx = self.context()?;
        Ok(ConsumptionService::served_details(&self.registry, ctx.session_id))
    }

    pub fn served_table(&self) -> ServiceResult<Vec<[String; 5]>> {
        let ctx = self.context()?;
        Ok(export::served_table(&self.registry, ctx.session_id))
    }

    pub fn reconcile(&mut self, target: &[TargetServed]) -> ServiceResult<ReconcileOutcome> {
        let ctx = self.owned_context()?;
        ReconcileService::reconcile(&mut self.registry, &ctx, target)
    }

    // --- import ---

    pub fn import_students(&mut self, table: &[Vec<String>]) -> ServiceResult<ImportSummary> {
        ImportService::import_students(&mut self.registry, table)
    }

    pub fn import_reservations(&mut self, table: &[Vec<String>]) -> ServiceResult<ImportSummary> {
        ImportService::import_reservations(&mut self.registry, table)
    }

    pub fn reserve_snacks_for_all(&mut self, date: &str, dish: &str) -> usize {
        ImportService::reserve_snacks_for_all(&mut self.registry, date, dish)
    }

    fn context(&self) -> ServiceResult<&SessionContext> {
        self.active.as_ref().ok_or(ServiceError::NoActiveSession)
    }

    fn owned_context(&self) -> ServiceResult<SessionContext> {
        self.context().cloned()
    }
}
