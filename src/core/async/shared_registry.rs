//! Thread-safe registry for concurrent callers
//!
//! This module provides the `SharedRegistry`, which wraps an `EventRegistry`
//! so it can be driven from many tokio tasks at once.
//!
//! # Architecture
//!
//! ```text
//! SharedRegistry
//!     ├── Arc<RwLock<EventRegistry<S>>>          (collection reader/writer lock)
//!     ├── DashMap<EventId, Arc<Mutex<()>>>       (per-event admission locks)
//!     └── Duration                               (per-operation deadline)
//! ```
//!
//! # Concurrency Guarantees
//!
//! - **Admission**: the per-event lock is held from counting CONFIRMED seats
//!   until the new registration is recorded, so concurrent admissions for the
//!   same event can never oversell it. Admissions for different events only
//!   contend on the writer section that records them.
//! - **Check-in**: validated and applied under the writer lock, so two
//!   concurrent check-ins of the same code resolve to exactly one success.
//! - **Deadlines**: one deadline is taken when an operation starts and bounds
//!   every lock wait of that operation. Once the writer lock is held the
//!   commit runs to completion, so an expired operation has not changed
//!   anything.
//! - **Blocking I/O**: commits persist through the store on tokio's blocking
//!   pool while holding an owned writer guard, keeping runtime workers free.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock, RwLockReadGuard};
use tokio::time::Instant;
use tracing::warn;

use crate::core::registry::EventRegistry;
use crate::core::traits::RecordStore;
use crate::types::{
    AttendanceSummary, Attendee, AttendeeId, CheckInResult, Event, EventId, NewAttendee, NewEvent,
    Registration, RegistryError,
};

/// Concurrent wrapper around `EventRegistry`
#[derive(Debug)]
pub struct SharedRegistry<S: RecordStore> {
    /// The wrapped registry
    ///
    /// Readers plan admissions and build reports; writers record changes.
    registry: Arc<RwLock<EventRegistry<S>>>,

    /// One admission lock per event, created on first use
    event_locks: DashMap<EventId, Arc<Mutex<()>>>,

    /// Deadline applied to every operation
    operation_timeout: Duration,
}

impl<S: RecordStore + 'static> SharedRegistry<S> {
    /// Wrap a registry
    ///
    /// # Arguments
    ///
    /// * `registry` - The registry to share
    /// * `operation_timeout` - Deadline for each operation
    pub fn new(registry: EventRegistry<S>, operation_timeout: Duration) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            event_locks: DashMap::new(),
            operation_timeout,
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Shared read access to the wrapped registry
    pub async fn read(&self) -> RwLockReadGuard<'_, EventRegistry<S>> {
        self.registry.read().await
    }

    /// Unwrap the registry once no commit still holds it
    pub fn into_inner(self) -> Option<EventRegistry<S>> {
        Arc::try_unwrap(self.registry).ok().map(RwLock::into_inner)
    }

    /// Create an event
    ///
    /// # Errors
    ///
    /// Any error from `EventRegistry::create_event`, `Timeout` or `TaskFailed`.
    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event, RegistryError> {
        let deadline = self.deadline();
        let mut registry = self.write("create_event", deadline).await?;
        run_blocking("create_event", move || registry.create_event(new_event)).await
    }

    /// Create an attendee
    ///
    /// # Errors
    ///
    /// Any error from `EventRegistry::create_attendee`, `Timeout` or `TaskFailed`.
    pub async fn create_attendee(
        &self,
        new_attendee: NewAttendee,
    ) -> Result<Attendee, RegistryError> {
        let deadline = self.deadline();
        let mut registry = self.write("create_attendee", deadline).await?;
        run_blocking("create_attendee", move || {
            registry.create_attendee(new_attendee)
        })
        .await
    }

    /// Register an attendee for an event
    ///
    /// # Errors
    ///
    /// Any error from `EventRegistry::register`, `Timeout` or `TaskFailed`.
    pub async fn register(
        &self,
        event_id: EventId,
        attendee_id: AttendeeId,
    ) -> Result<Registration, RegistryError> {
        let deadline = self.deadline();
        self.admit("register", deadline, event_id, attendee_id).await
    }

    /// Register the attendee with `email` for an event
    ///
    /// # Errors
    ///
    /// Any error from `EventRegistry::register_by_email`, `Timeout` or
    /// `TaskFailed`.
    pub async fn register_by_email(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Registration, RegistryError> {
        let deadline = self.deadline();
        let attendee_id = self
            .acquire("register", deadline, self.registry.read())
            .await?
            .resolve_email(event_id, email)?;
        self.admit("register", deadline, event_id, attendee_id).await
    }

    /// Check in the registration holding `code`
    ///
    /// # Errors
    ///
    /// Any error from `EventRegistry::check_in`, `Timeout` or `TaskFailed`.
    pub async fn check_in(&self, code: &str) -> Result<CheckInResult, RegistryError> {
        let deadline = self.deadline();
        let mut registry = self.write("check_in", deadline).await?;
        let code = code.to_string();
        run_blocking("check_in", move || registry.check_in(&code)).await
    }

    /// Snapshot of the attendance report
    ///
    /// # Errors
    ///
    /// `Timeout` if the reader lock could not be taken in time.
    pub async fn attendance_report(&self) -> Result<Vec<AttendanceSummary>, RegistryError> {
        let deadline = self.deadline();
        let registry = self
            .acquire("attendance_report", deadline, self.registry.read())
            .await?;
        Ok(registry.attendance_report().collect())
    }

    async fn admit(
        &self,
        operation: &str,
        deadline: Instant,
        event_id: EventId,
        attendee_id: AttendeeId,
    ) -> Result<Registration, RegistryError> {
        if self
            .acquire(operation, deadline, self.registry.read())
            .await?
            .repository()
            .find_event_by_id(event_id)
            .is_none()
        {
            return Err(RegistryError::event_not_found(event_id));
        }

        let event_lock = self.event_locks.entry(event_id).or_default().value().clone();
        let _admission = self.acquire(operation, deadline, event_lock.lock()).await?;

        let ticket = self
            .acquire(operation, deadline, self.registry.read())
            .await?
            .plan_registration(event_id, attendee_id)?;

        let mut registry = self.write(operation, deadline).await?;
        run_blocking(operation, move || registry.commit_registration(ticket)).await
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.operation_timeout
    }

    async fn write(
        &self,
        operation: &str,
        deadline: Instant,
    ) -> Result<OwnedRwLockWriteGuard<EventRegistry<S>>, RegistryError> {
        self.acquire(operation, deadline, Arc::clone(&self.registry).write_owned())
            .await
    }

    /// Wait for a lock until the operation's deadline
    async fn acquire<T, F>(
        &self,
        operation: &str,
        deadline: Instant,
        lock: F,
    ) -> Result<T, RegistryError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout_at(deadline, lock).await.map_err(|_| {
            let timeout_ms = u64::try_from(self.operation_timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, timeout_ms, "operation deadline exceeded");
            RegistryError::timeout(operation, timeout_ms)
        })
    }
}

/// Run a commit on the blocking pool
///
/// The commit owns its writer guard, so the lock is released when it
/// returns or unwinds.
async fn run_blocking<T, F>(operation: &str, commit: F) -> Result<T, RegistryError>
where
    F: FnOnce() -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(commit)
        .await
        .map_err(|e| RegistryError::task_failed(operation, &e.to_string()))?
}
