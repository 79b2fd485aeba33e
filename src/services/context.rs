use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::DEFAULT_SYSTEM_OPERATOR_ID;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::repositories::Store;

/// Principal recorded as the performer of every movement. Never nil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new(id: Uuid) -> Result<Self, ServiceError> {
        if id.is_nil() {
            return Err(ServiceError::ValidationError(
                "PerformedBy is required.".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Stand-in operator used until callers are authenticated.
    pub fn system_operator() -> Self {
        Self(DEFAULT_SYSTEM_OPERATOR_ID)
    }

    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Source of transition timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Everything a service needs from its surroundings.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn Store>,
    pub actor: ActorId,
    pub clock: Arc<dyn Clock>,
    pub events: EventSender,
}

impl ServiceContext {
    pub fn new(
        store: Arc<dyn Store>,
        actor: ActorId,
        clock: Arc<dyn Clock>,
        events: EventSender,
    ) -> Self {
        Self {
            store,
            actor,
            clock,
            events,
        }
    }

    /// Same surroundings, different acting principal.
    pub fn with_actor(&self, actor: ActorId) -> Self {
        Self {
            actor,
            ..self.clone()
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}
