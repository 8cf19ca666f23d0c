//! Default rule definitions

use std::fmt;
use std::sync::Arc;

use crate::hydrator::PartialObject;
use crate::value::Value;

/// Computes a default from already-hydrated siblings
pub type ComputeFn = Arc<dyn Fn(&PartialObject<'_>) -> Option<Value> + Send + Sync>;

/// When a default rule runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyWhen {
    /// Only when the input key is absent
    #[default]
    Missing,
    /// Also when the key is present with an empty value
    MissingOrEmpty,
}

/// Outside decision a gate-conditioned default asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Whether the actor is authenticated
    Authorized,
    /// Whether the actor holds an ability
    Ability(String),
    /// Whether a settings flag is set
    Setting(String),
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateDecision::Authorized => write!(f, "authorized"),
            GateDecision::Ability(ability) => write!(f, "ability:{}", ability),
            GateDecision::Setting(key) => write!(f, "setting:{}", key),
        }
    }
}

#[derive(Clone)]
pub enum RuleKind {
    Constant(Value),
    GateConditioned {
        decision: GateDecision,
        if_true: Value,
        /// Absent means the field stays unset when the gate fails
        if_false: Option<Value>,
    },
    Computed {
        depends_on: Vec<String>,
        compute: ComputeFn,
    },
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Constant(_) => "constant",
            RuleKind::GateConditioned { .. } => "gate",
            RuleKind::Computed { .. } => "computed",
        }
    }
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            RuleKind::GateConditioned {
                decision,
                if_true,
                if_false,
            } => f
                .debug_struct("GateConditioned")
                .field("decision", decision)
                .field("if_true", if_true)
                .field("if_false", if_false)
                .finish(),
            RuleKind::Computed { depends_on, .. } => f
                .debug_struct("Computed")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// How to fill a field the input did not supply.
#[derive(Debug, Clone)]
pub struct DefaultRule {
    kind: RuleKind,
    apply_when: ApplyWhen,
}

impl DefaultRule {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            apply_when: ApplyWhen::Missing,
        }
    }

    /// A fixed value
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::new(RuleKind::Constant(value.into()))
    }

    /// `if_true` for authenticated actors, `if_false` otherwise
    pub fn when_authenticated(if_true: impl Into<Value>, if_false: Option<Value>) -> Self {
        Self::gate(GateDecision::Authorized, if_true, if_false)
    }

    /// `if_true` when the actor holds `ability`, `if_false` otherwise
    pub fn when_allowed(
        ability: impl Into<String>,
        if_true: impl Into<Value>,
        if_false: Option<Value>,
    ) -> Self {
        Self::gate(GateDecision::Ability(ability.into()), if_true, if_false)
    }

    /// `if_true` when the settings flag `key` is set, `if_false` otherwise
    pub fn when_setting(
        key: impl Into<String>,
        if_true: impl Into<Value>,
        if_false: Option<Value>,
    ) -> Self {
        Self::gate(GateDecision::Setting(key.into()), if_true, if_false)
    }

    fn gate(decision: GateDecision, if_true: impl Into<Value>, if_false: Option<Value>) -> Self {
        Self::new(RuleKind::GateConditioned {
            decision,
            if_true: if_true.into(),
            if_false,
        })
    }

    /// A value computed from fields declared before this one
    pub fn computed<I, S, F>(depends_on: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&PartialObject<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        Self::new(RuleKind::Computed {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            compute: Arc::new(compute),
        })
    }

    /// Also replace present but empty input
    pub fn also_when_empty(mut self) -> Self {
        self.apply_when = ApplyWhen::MissingOrEmpty;
        self
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn apply_when(&self) -> ApplyWhen {
        self.apply_when
    }

    pub fn applies_to_empty(&self) -> bool {
        self.apply_when == ApplyWhen::MissingOrEmpty
    }
}
