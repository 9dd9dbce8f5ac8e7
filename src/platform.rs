//! Lifecycle of an optional, externally loaded service such as a platform
//! pose/hit-test provider.
//!
//! The host owns an [`OptionalService`] and drives it through
//! `Uninitialized → Loading → Ready | Failed`. The scanning session only
//! looks at it once, when it starts.
use log::{info, warn};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceStatus {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum ServiceState<T> {
    Uninitialized,
    Loading,
    Ready(T),
    Failed(String),
}

/// An injected dependency that may or may not become available.
#[derive(Debug)]
pub struct OptionalService<T> {
    name: &'static str,
    state: ServiceState<T>,
}

impl<T> OptionalService<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: ServiceState::Uninitialized,
        }
    }

    /// Already-loaded service.
    pub fn ready(name: &'static str, service: T) -> Self {
        Self {
            name,
            state: ServiceState::Ready(service),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn status(&self) -> ServiceStatus {
        match self.state {
            ServiceState::Uninitialized => ServiceStatus::Uninitialized,
            ServiceState::Loading => ServiceStatus::Loading,
            ServiceState::Ready(_) => ServiceStatus::Ready,
            ServiceState::Failed(_) => ServiceStatus::Failed,
        }
    }

    /// Failure message, if loading failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ServiceState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Enter `Loading`. Allowed from `Uninitialized` and, as a retry, from
    /// `Failed`; returns false otherwise.
    pub fn begin_loading(&mut self) -> bool {
        match self.state {
            ServiceState::Uninitialized | ServiceState::Failed(_) => {
                self.state = ServiceState::Loading;
                true
            }
            ServiceState::Loading | ServiceState::Ready(_) => false,
        }
    }

    /// Resolve a pending load. Results arriving outside `Loading` are
    /// dropped and false is returned.
    pub fn finish(&mut self, result: Result<T, String>) -> bool {
        if !matches!(self.state, ServiceState::Loading) {
            warn!("{}: load result arrived while {:?}, dropped", self.name, self.status());
            return false;
        }
        self.state = match result {
            Ok(service) => {
                info!("{}: ready", self.name);
                ServiceState::Ready(service)
            }
            Err(msg) => {
                warn!("{}: failed to load: {}", self.name, msg);
                ServiceState::Failed(msg)
            }
        };
        true
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            ServiceState::Ready(service) => Some(service),
            _ => None,
        }
    }

    /// Take the service out if it is ready, leaving the slot uninitialized.
    pub fn take_ready(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, ServiceState::Uninitialized) {
            ServiceState::Ready(service) => Some(service),
            other => {
                self.state = other;
                None
            }
        }
    }
}
