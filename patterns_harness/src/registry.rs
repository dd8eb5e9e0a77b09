//! Participant registry with lazily built, cached bindings.

use patterns_env::{
    Capability, HarnessError, Participant, ParticipantFault, ParticipantKey, Role, Tracer, Value,
};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::debug;

type Factory = Arc<dyn Fn() -> Box<dyn Participant> + Send + Sync>;

/// A resolved participant.
///
/// Cloning the handle clones the reference, not the participant: every handle
/// obtained for one binding drives the same instance.
#[derive(Clone)]
pub struct ParticipantHandle {
    key: ParticipantKey,
    capability: Capability,
    inner: Arc<Mutex<Box<dyn Participant>>>,
}

impl ParticipantHandle {
    /// Returns the participant's key.
    pub fn key(&self) -> &ParticipantKey {
        &self.key
    }

    /// Returns the capability declared at registration.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Calls `method` on the participant.
    ///
    /// Methods outside the declared capability are refused before the
    /// participant sees them. Faults keep their message and gain the key.
    /// A panic inside the participant is caught here and reported as a fault.
    pub fn invoke(
        &self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, HarnessError> {
        if !self.capability.supports(method) {
            return Err(HarnessError::UnsupportedMethod {
                key: self.key.clone(),
                method: method.to_string(),
                capability: self.capability.name(),
            });
        }

        // A lock poisoned by an earlier panic still guards a usable participant
        let mut participant = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let outcome = catch_unwind(AssertUnwindSafe(|| participant.invoke(method, args, tracer)))
            .unwrap_or_else(|payload| Err(panic_fault(payload)));
        outcome.map_err(|fault| HarnessError::participant(&self.key, fault))
    }

    /// Returns true if both handles drive the same instance.
    pub fn same_instance(&self, other: &ParticipantHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn panic_fault(payload: Box<dyn Any + Send>) -> ParticipantFault {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    ParticipantFault::new(format!("panicked: {}", message))
}

impl std::fmt::Debug for ParticipantHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantHandle")
            .field("key", &self.key)
            .field("capability", &self.capability.name())
            .finish()
    }
}

/// One registration: how to build the participant, and the instance once built.
#[derive(Clone)]
struct Binding {
    capability: Capability,
    factory: Factory,
    instance: Arc<OnceLock<ParticipantHandle>>,
}

impl Binding {
    fn get_or_create(&self, key: &ParticipantKey) -> ParticipantHandle {
        self.instance
            .get_or_init(|| {
                debug!("Constructing participant {}", key);
                ParticipantHandle {
                    key: key.clone(),
                    capability: self.capability,
                    inner: Arc::new(Mutex::new((self.factory)())),
                }
            })
            .clone()
    }
}

fn resolve_in(
    bindings: &HashMap<ParticipantKey, Binding>,
    key: &ParticipantKey,
) -> Result<ParticipantHandle, HarnessError> {
    bindings
        .get(key)
        .map(|binding| binding.get_or_create(key))
        .ok_or_else(|| HarnessError::not_found(key))
}

/// Named role implementations keyed by (pattern, variant).
///
/// # Lifecycle
///
/// ```text
/// register(p, v, factory)      binding stored, nothing built
/// resolve(p, v)                factory runs once, instance cached
/// resolve(p, v)                same instance
/// register(p, v, factory2)     binding replaced; next resolve builds anew
/// ```
///
/// Every variant of a pattern must declare the same capability.
#[derive(Clone, Default)]
pub struct ParticipantRegistry {
    bindings: HashMap<ParticipantKey, Binding>,
}

impl ParticipantRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a lazily constructed participant under (pattern, variant).
    ///
    /// Re-registering a key replaces its binding (last write wins).
    ///
    /// # Returns
    /// * `Ok(())` - Binding stored
    /// * `Err(HarnessError::CapabilityMismatch)` - Another variant of `pattern`
    ///   declares a different capability
    pub fn register<P, F>(&mut self, pattern: &str, variant: &str, factory: F) -> Result<(), HarnessError>
    where
        P: Role,
        F: Fn() -> P + Send + Sync + 'static,
    {
        let key = ParticipantKey::new(pattern, variant);
        let conflict = self
            .bindings
            .iter()
            .find(|(k, b)| k.pattern == key.pattern && **k != key && b.capability != P::CAPABILITY);
        if let Some((_, existing)) = conflict {
            return Err(HarnessError::CapabilityMismatch {
                pattern: key.pattern,
                existing: existing.capability.name(),
                requested: P::CAPABILITY.name(),
            });
        }

        debug!("Registered {} as {}", key, P::CAPABILITY);
        self.bindings.insert(
            key,
            Binding {
                capability: P::CAPABILITY,
                factory: Arc::new(move || Box::new(factory()) as Box<dyn Participant>),
                instance: Arc::new(OnceLock::new()),
            },
        );
        Ok(())
    }

    /// Resolves (pattern, variant), building the participant on first use.
    pub fn resolve(&self, pattern: &str, variant: &str) -> Result<ParticipantHandle, HarnessError> {
        self.resolve_key(&ParticipantKey::new(pattern, variant))
    }

    /// Resolves a key, building the participant on first use.
    pub fn resolve_key(&self, key: &ParticipantKey) -> Result<ParticipantHandle, HarnessError> {
        resolve_in(&self.bindings, key)
    }

    /// Returns true if a binding exists for the key.
    pub fn contains(&self, key: &ParticipantKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Returns the capability registered for a key.
    pub fn capability_of(&self, key: &ParticipantKey) -> Option<Capability> {
        self.bindings.get(key).map(|b| b.capability)
    }

    /// Returns all registered keys, sorted.
    pub fn keys(&self) -> Vec<ParticipantKey> {
        let mut keys: Vec<_> = self.bindings.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Freezes the current bindings.
    ///
    /// The snapshot shares cached instances with this registry, but later
    /// registrations here are invisible to it.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            bindings: Arc::new(self.bindings.clone()),
        }
    }
}

impl std::fmt::Debug for ParticipantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Immutable view of a registry, taken when a run starts.
#[derive(Clone)]
pub struct RegistrySnapshot {
    bindings: Arc<HashMap<ParticipantKey, Binding>>,
}

impl RegistrySnapshot {
    /// Resolves a key, building the participant on first use.
    pub fn resolve(&self, key: &ParticipantKey) -> Result<ParticipantHandle, HarnessError> {
        resolve_in(&self.bindings, key)
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if the snapshot has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
