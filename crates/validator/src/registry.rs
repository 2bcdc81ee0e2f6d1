//! Type-key to rule-set resolution.
//!
//! A [`Registry`] maps a type key (usually the name of a domain type) to a
//! [`Resolver`]: a function that builds the type's [`RuleSet`] from the
//! current instance. Rule sets are rebuilt on every call, so a resolver can
//! include or drop rules based on other fields.
//!
//! A type may be redirected to another type's resolver with
//! [`Registry::declare_override`]. Declarations are folded into an override
//! table on the first resolution; later declarations take effect only after
//! [`Registry::clear_cache`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::foundation::{Error, RegistrationError};
use crate::rule::RuleSet;
use crate::validator::Validatable;

/// Builds the rule set for one instance.
pub type Resolver = Arc<dyn Fn(&Value) -> Result<RuleSet, Error> + Send + Sync>;

type OverrideTable = Arc<HashMap<String, String>>;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

#[derive(Default)]
struct Tables {
    resolvers: HashMap<String, Resolver>,
    declared_overrides: HashMap<String, String>,
}

/// Thread-safe table of resolvers keyed by type key.
///
/// ```
/// use formguard_validator::registry::Registry;
/// use formguard_validator::rule::{Rule, RuleSet};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// registry.register("Contact", |_: &serde_json::Value| {
///     Ok(RuleSet::new().rule(Rule::email("email", "email")?))
/// });
///
/// let rules = registry.rules_for("Contact", &json!({}))?;
/// assert_eq!(rules.len(), 1);
/// assert!(registry.resolve("Unknown").is_err());
/// # Ok::<(), formguard_validator::Error>(())
/// ```
pub struct Registry {
    tables: RwLock<Tables>,
    overrides: RwLock<Option<OverrideTable>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            overrides: RwLock::new(None),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register the resolver for `type_key`, replacing any previous one.
    pub fn register<F>(&self, type_key: impl Into<String>, resolver: F)
    where
        F: Fn(&Value) -> Result<RuleSet, Error> + Send + Sync + 'static,
    {
        let type_key = type_key.into();
        let replaced = self
            .tables
            .write()
            .resolvers
            .insert(type_key.clone(), Arc::new(resolver))
            .is_some();
        debug!(type_key = %type_key, replaced, "registered rule resolver");
    }

    /// Register a resolver that works on the typed instance.
    ///
    /// The instance is deserialized from its JSON form before the resolver
    /// runs. A value that does not fit `T` (missing or mistyped properties)
    /// is handed to the resolver as `T::default()`, so the rules still run
    /// against the raw value and report those properties as field errors.
    pub fn register_typed<T, F>(&self, resolver: F)
    where
        T: Validatable + DeserializeOwned + Default,
        F: Fn(&T) -> Result<RuleSet, Error> + Send + Sync + 'static,
    {
        self.register(T::TYPE_KEY, move |value: &Value| {
            let instance = T::deserialize(value).unwrap_or_else(|error| {
                warn!(
                    type_key = T::TYPE_KEY,
                    %error,
                    "instance does not fit its type, resolving with defaults"
                );
                T::default()
            });
            resolver(&instance)
        });
    }

    /// Resolve `type_key` with `target`'s resolver from now on.
    ///
    /// Not visible to resolutions until the override table is (re)built,
    /// which happens on the first resolution after construction,
    /// [`clear_cache`](Self::clear_cache) or [`clear`](Self::clear).
    pub fn declare_override(&self, type_key: impl Into<String>, target: impl Into<String>) {
        let type_key = type_key.into();
        let target = target.into();
        debug!(type_key = %type_key, target = %target, "declared rule override");
        self.tables
            .write()
            .declared_overrides
            .insert(type_key, target);
    }

    /// Look up the resolver for `type_key`, honouring overrides.
    pub fn resolve(&self, type_key: &str) -> Result<Resolver, RegistrationError> {
        let overrides = self.override_table();
        let tables = self.tables.read();

        match overrides.get(type_key) {
            Some(target) => {
                debug!(type_key, target = %target, "resolving through override");
                tables.resolvers.get(target).cloned().ok_or_else(|| {
                    RegistrationError::OverrideTargetMissing {
                        type_key: type_key.to_owned(),
                        target: target.clone(),
                    }
                })
            }
            None => tables.resolvers.get(type_key).cloned().ok_or_else(|| {
                RegistrationError::NotRegistered {
                    type_key: type_key.to_owned(),
                }
            }),
        }
    }

    /// Resolve `type_key` and build its rule set for `instance`.
    pub fn rules_for(&self, type_key: &str, instance: &Value) -> Result<RuleSet, Error> {
        let resolver = self.resolve(type_key)?;
        resolver(instance)
    }

    /// Drop the override table so the next resolution rebuilds it.
    pub fn clear_cache(&self) {
        *self.overrides.write() = None;
        debug!("cleared rule override table");
    }

    /// Remove every registration, declaration and the override table.
    pub fn clear(&self) {
        {
            let mut tables = self.tables.write();
            tables.resolvers.clear();
            tables.declared_overrides.clear();
        }
        *self.overrides.write() = None;
        debug!("cleared rule registry");
    }

    /// Whether a resolver is registered directly under `type_key`.
    pub fn contains(&self, type_key: &str) -> bool {
        self.tables.read().resolvers.contains_key(type_key)
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.tables.read().resolvers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.read().resolvers.is_empty()
    }

    /// Registered type keys, sorted.
    pub fn type_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.tables.read().resolvers.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    fn override_table(&self) -> OverrideTable {
        if let Some(table) = self.overrides.read().as_ref() {
            return Arc::clone(table);
        }

        // lock order: overrides, then tables
        let mut slot = self.overrides.write();
        let table = slot.get_or_insert_with(|| {
            let snapshot = self.tables.read().declared_overrides.clone();
            debug!(count = snapshot.len(), "built rule override table");
            Arc::new(snapshot)
        });
        Arc::clone(table)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type_keys", &self.type_keys())
            .field("override_table_built", &self.overrides.read().is_some())
            .finish()
    }
}
