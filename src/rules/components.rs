//! Connectivity of the comparison graph
//!
//! Simultaneous rules only have a unique answer when every listed player is
//! linked to every other through some chain of competitions.

use crate::error::{RatingsError, Result};

/// Union-find over player positions
pub(crate) struct Components {
    parent: Vec<usize>,
}

impl Components {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    /// Number of disjoint groups; a player who never competed is its own group
    pub(crate) fn count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&x| self.find(x) == x).count()
    }

    /// Fail with `SolverFailure` on behalf of `rule` unless there is one group
    pub(crate) fn require_connected(&mut self, rule: &str) -> Result<()> {
        let groups = self.count();
        if groups > 1 {
            return Err(RatingsError::SolverFailure {
                rule: rule.to_string(),
                reason: format!("competition graph is disconnected ({} components)", groups),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;

    #[test]
    fn test_chain_is_one_group() {
        let mut components = Components::new(4);
        components.union(0, 1);
        components.union(2, 3);
        assert_eq!(components.count(), 2);

        components.union(1, 2);
        assert_eq!(components.count(), 1);
        assert!(components.require_connected("Massey").is_ok());
    }

    #[test]
    fn test_isolated_position_is_its_own_group() {
        let mut components = Components::new(3);
        components.union(0, 1);

        let err = components.require_connected("KeenerScores").unwrap_err();
        assert!(matches!(
            kind_of(&err),
            Some(RatingsError::SolverFailure { rule, .. }) if rule == "KeenerScores"
        ));
        assert!(err.to_string().contains("2 components"));
    }

    #[test]
    fn test_single_position_is_connected() {
        assert!(Components::new(1).require_connected("Massey").is_ok());
    }
}
