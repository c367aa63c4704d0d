//! Birth/survival thresholds and the transition table derived from them.

/// Two-threshold life rule. The default is B3/S23.
///
/// A dead cell is born when it has exactly `birth` live neighbours. A live
/// cell survives only with `survival` or `birth` neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeRule {
    pub birth: u8,
    pub survival: u8,
}

impl Default for LifeRule {
    fn default() -> Self {
        Self {
            birth: 3,
            survival: 2,
        }
    }
}

impl LifeRule {
    pub fn new(birth: u8, survival: u8) -> Self {
        Self { birth, survival }
    }

    /// Next state for a cell, or `None` when it does not change.
    #[inline]
    pub fn transition(&self, alive: bool, neighbors: u8) -> Option<bool> {
        if !alive && neighbors == self.birth {
            Some(true)
        } else if alive && neighbors != self.survival && neighbors != self.birth {
            Some(false)
        } else {
            None
        }
    }
}

const MAX_NEIGHBORS: usize = 8;

/// `LifeRule` expanded over every reachable `(alive, neighbors)` pair.
#[derive(Clone, Debug)]
pub struct RuleTable {
    table: [[Option<bool>; MAX_NEIGHBORS + 1]; 2],
}

impl RuleTable {
    pub fn new(rule: LifeRule) -> Self {
        let mut table = [[None; MAX_NEIGHBORS + 1]; 2];
        for (alive, row) in table.iter_mut().enumerate() {
            for (neighbors, slot) in row.iter_mut().enumerate() {
                *slot = rule.transition(alive == 1, neighbors as u8);
            }
        }
        Self { table }
    }

    #[inline(always)]
    pub fn lookup(&self, alive: bool, neighbors: u8) -> Option<bool> {
        self.table[alive as usize][neighbors as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::{LifeRule, RuleTable};

    fn expected_output(alive: bool, neighbors: u8) -> Option<bool> {
        let next_alive = if alive {
            neighbors == 2 || neighbors == 3
        } else {
            neighbors == 3
        };
        (next_alive != alive).then_some(next_alive)
    }

    #[test]
    fn default_table_matches_b3_s23() {
        let table = RuleTable::new(LifeRule::default());
        for alive in [false, true] {
            for neighbors in 0..=8u8 {
                assert_eq!(
                    table.lookup(alive, neighbors),
                    expected_output(alive, neighbors),
                    "alive={alive} neighbors={neighbors}"
                );
            }
        }
    }

    #[test]
    fn table_agrees_with_transition_for_custom_rule() {
        let rule = LifeRule::new(4, 1);
        let table = RuleTable::new(rule);
        for alive in [false, true] {
            for neighbors in 0..=8u8 {
                assert_eq!(
                    table.lookup(alive, neighbors),
                    rule.transition(alive, neighbors)
                );
            }
        }
    }

    #[test]
    fn birth_is_asymmetric_with_death() {
        let rule = LifeRule::default();
        // Only the birth count revives a dead cell.
        assert_eq!(rule.transition(false, 2), None);
        assert_eq!(rule.transition(false, 3), Some(true));
        // Both thresholds keep a live cell alive.
        assert_eq!(rule.transition(true, 2), None);
        assert_eq!(rule.transition(true, 3), None);
        assert_eq!(rule.transition(true, 1), Some(false));
        assert_eq!(rule.transition(true, 4), Some(false));
    }

    #[test]
    fn unreachable_thresholds_never_fire() {
        let table = RuleTable::new(LifeRule::new(9, 9));
        for neighbors in 0..=8u8 {
            assert_eq!(table.lookup(false, neighbors), None);
            assert_eq!(table.lookup(true, neighbors), Some(false));
        }
    }
}
