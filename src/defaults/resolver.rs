//! Default resolution
//!
//! Runs a field's default rule against the injected collaborators and the
//! fields hydrated so far. Field values are never logged, only rule kinds.

use tracing::trace;

use crate::context::{Authorization, Settings};
use crate::hydrator::PartialObject;
use crate::observability::Event;
use crate::schema::{FieldDescriptor, SchemaError, SchemaResult};
use crate::value::Value;

use super::rule::{GateDecision, RuleKind};

/// Resolves default rules for one hydration pass.
pub struct DefaultResolver<'a> {
    authorization: &'a dyn Authorization,
    settings: &'a dyn Settings,
}

impl<'a> DefaultResolver<'a> {
    pub fn new(authorization: &'a dyn Authorization, settings: &'a dyn Settings) -> Self {
        Self {
            authorization,
            settings,
        }
    }

    /// Returns the default of `field`, or `None` when it has no rule or the
    /// rule yields nothing.
    ///
    /// # Errors
    ///
    /// HYDRATE_DEFAULT_CYCLE when a computed rule depends on a field that has
    /// not been hydrated yet.
    pub fn resolve(
        &self,
        field: &FieldDescriptor,
        partial: &PartialObject<'_>,
    ) -> SchemaResult<Option<Value>> {
        let Some(rule) = field.default_rule() else {
            return Ok(None);
        };

        let value = match rule.kind() {
            RuleKind::Constant(value) => Some(value.clone()),
            RuleKind::GateConditioned {
                decision,
                if_true,
                if_false,
            } => {
                if self.passes(decision) {
                    Some(if_true.clone())
                } else {
                    if_false.clone()
                }
            }
            RuleKind::Computed {
                depends_on,
                compute,
            } => {
                if let Some(pending) = depends_on.iter().find(|dep| !partial.is_resolved(dep)) {
                    return Err(SchemaError::default_cycle(
                        partial.schema_name(),
                        field.name(),
                        pending,
                    ));
                }
                (**compute)(partial)
            }
        };

        trace!(
            event = %Event::DefaultResolved,
            field = %field.name(),
            rule = rule.kind().name(),
            resolved = value.is_some(),
            "default resolved"
        );
        Ok(value)
    }

    fn passes(&self, decision: &GateDecision) -> bool {
        match decision {
            GateDecision::Authorized => self.authorization.is_authenticated(),
            GateDecision::Ability(ability) => self.authorization.allows(ability),
            GateDecision::Setting(key) => self.settings.flag(key),
        }
    }
}
