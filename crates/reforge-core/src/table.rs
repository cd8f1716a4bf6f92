//! Success-rate table: level -> success percentage.
//!
//! The table is externally supplied calibration data. Entries are preserved
//! verbatim, even when internally inconsistent (a mid-range level with a far
//! lower rate than its neighbours is legal); no smoothing is applied.

use std::collections::BTreeMap;

use crate::fixed::Fixed64;

/// Errors raised while building a [`RateTable`].
#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    /// A stored rate was outside [0, 100].
    #[error("rate {rate} for level {level} is outside [0, 100]")]
    RateOutOfRange { level: u32, rate: f64 },

    /// The default rate was outside [0, 100].
    #[error("default rate {rate} is outside [0, 100]")]
    DefaultOutOfRange { rate: f64 },
}

/// Ordered mapping from enhancement level to success percentage.
///
/// Lookups are pure and total: levels are unsigned, so negative levels are
/// unrepresentable by construction, and any unmapped level falls back to the
/// explicit `default_rate` rather than erroring. The system never stalls on
/// missing calibration data.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RateTable {
    entries: BTreeMap<u32, Fixed64>,
    default_rate: Fixed64,
}

impl RateTable {
    /// Build a table, validating that every rate (including the default) is
    /// a percentage in [0, 100].
    pub fn new(
        entries: BTreeMap<u32, Fixed64>,
        default_rate: Fixed64,
    ) -> Result<Self, RateTableError> {
        let hundred = Fixed64::from_num(100);
        for (&level, &rate) in &entries {
            if rate < Fixed64::ZERO || rate > hundred {
                return Err(RateTableError::RateOutOfRange {
                    level,
                    rate: rate.to_num(),
                });
            }
        }
        if default_rate < Fixed64::ZERO || default_rate > hundred {
            return Err(RateTableError::DefaultOutOfRange {
                rate: default_rate.to_num(),
            });
        }
        Ok(Self {
            entries,
            default_rate,
        })
    }

    /// The classic curve: 90/80/70/60/50 for levels 0-4, 5% beyond.
    pub fn default_curve() -> Self {
        let entries = [(0, 90), (1, 80), (2, 70), (3, 60), (4, 50)]
            .into_iter()
            .map(|(level, rate)| (level, Fixed64::from_num(rate)))
            .collect();
        Self {
            entries,
            default_rate: Fixed64::from_num(5),
        }
    }

    /// Success percentage for a level. Pure; unmapped levels return the
    /// configured default.
    pub fn success_rate(&self, level: u32) -> Fixed64 {
        self.entries
            .get(&level)
            .copied()
            .unwrap_or(self.default_rate)
    }

    /// The explicit fallback rate for unmapped levels.
    pub fn default_rate(&self) -> Fixed64 {
        self.default_rate
    }

    /// Number of explicitly mapped levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries (every level uses the default).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over explicit entries in level order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Fixed64)> + '_ {
        self.entries.iter().map(|(&l, &r)| (l, r))
    }
}
