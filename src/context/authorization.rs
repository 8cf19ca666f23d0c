//! # Authorization gate
//!
//! The hydrator never decides permissions itself. Gate-conditioned defaults
//! ask an `Authorization` implementation supplied by the caller.

use std::collections::HashSet;

/// Answers whether the current actor passes a gate.
pub trait Authorization: Send + Sync {
    /// Whether the actor is authenticated
    fn is_authenticated(&self) -> bool;

    /// Whether the actor may perform `ability`
    fn allows(&self, _ability: &str) -> bool {
        self.is_authenticated()
    }
}

/// Actor context carried with each hydration
#[derive(Debug, Clone, Default)]
pub struct ActorContext {
    /// Whether the actor is authenticated
    pub is_authenticated: bool,

    /// Explicitly granted abilities; empty means every ability follows
    /// authentication
    pub abilities: HashSet<String>,
}

impl ActorContext {
    /// Create context for anonymous access
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create context for an authenticated actor
    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
            ..Self::default()
        }
    }

    /// Create an authenticated context restricted to the given abilities
    pub fn with_abilities<I, S>(abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_authenticated: true,
            abilities: abilities.into_iter().map(Into::into).collect(),
        }
    }
}

impl Authorization for ActorContext {
    fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn allows(&self, ability: &str) -> bool {
        if !self.is_authenticated {
            return false;
        }
        self.abilities.is_empty() || self.abilities.contains(ability)
    }
}

impl Authorization for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_denied() {
        let ctx = ActorContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.allows("publish"));
    }

    #[test]
    fn test_authenticated_allows_everything() {
        let ctx = ActorContext::authenticated();
        assert!(ctx.is_authenticated());
        assert!(ctx.allows("publish"));
    }

    #[test]
    fn test_abilities_restrict() {
        let ctx = ActorContext::with_abilities(["publish"]);
        assert!(ctx.allows("publish"));
        assert!(!ctx.allows("delete"));
    }

    #[test]
    fn test_bool_gate() {
        assert!(true.allows("anything"));
        assert!(!false.is_authenticated());
    }
}
