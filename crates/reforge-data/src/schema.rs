//! On-disk schemas for widget tuning, and the builders that turn them into
//! validated runtime types.
//!
//! The schemas stay in plain `f64`/`u64` so they read naturally in RON, TOML,
//! and JSON; conversion into fixed-point happens in the builders, which also
//! run domain validation and fold any rejection into
//! [`DataLoadError::Invalid`](crate::loader::DataLoadError::Invalid).

use std::collections::BTreeMap;

use reforge_burst::bridge::EnhanceSession;
use reforge_burst::{BurstConfig, BurstSimulator};
use reforge_core::enhancer::{Enhancer, EnhancerConfig};
use reforge_core::fixed::{Fixed64, Ticks, f64_to_fixed64};
use reforge_core::rng::RollSource;
use reforge_core::table::RateTable;

use crate::loader::DataLoadError;

// ===========================================================================
// Rate table schema
// ===========================================================================

/// Serialized form of a success-rate table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RateTableSpec {
    /// Explicit level -> success percentage entries.
    #[serde(default)]
    pub rates: BTreeMap<u32, f64>,
    /// Fallback percentage for unmapped levels.
    #[serde(default = "default_fallback_rate")]
    pub default_rate: f64,
}

fn default_fallback_rate() -> f64 {
    5.0
}

impl Default for RateTableSpec {
    fn default() -> Self {
        Self {
            rates: [(0, 90.0), (1, 80.0), (2, 70.0), (3, 60.0), (4, 50.0)]
                .into_iter()
                .collect(),
            default_rate: default_fallback_rate(),
        }
    }
}

/// Convert a raw data-file number into fixed-point, rejecting anything the
/// fixed-point type cannot represent. RON happily parses `NaN` and `inf`
/// literals, so this must run before any conversion.
fn checked_fixed(value: f64, what: &str) -> Result<Fixed64, DataLoadError> {
    const LIMIT: f64 = (1i64 << 31) as f64;
    if !value.is_finite() || value.abs() >= LIMIT {
        return Err(DataLoadError::Invalid {
            detail: format!("{what} must be a finite number, got {value}"),
        });
    }
    Ok(f64_to_fixed64(value))
}

/// Validate a [`RateTableSpec`] into a runtime [`RateTable`].
pub fn build_rate_table(spec: &RateTableSpec) -> Result<RateTable, DataLoadError> {
    let mut entries = BTreeMap::new();
    for (&level, &rate) in &spec.rates {
        entries.insert(level, checked_fixed(rate, "rate")?);
    }
    let default_rate = checked_fixed(spec.default_rate, "default_rate")?;
    RateTable::new(entries, default_rate).map_err(|e| DataLoadError::Invalid {
        detail: e.to_string(),
    })
}

// ===========================================================================
// Widget schema
// ===========================================================================

/// Serialized form of a complete widget configuration: timing, economy,
/// rates, and burst tuning in one file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WidgetSpec {
    /// Total charge duration in ticks (milliseconds).
    pub charge_duration: Ticks,
    /// Fixed clock interval in ticks.
    pub tick_interval: Ticks,
    /// Cost deducted per attempt.
    pub cost: f64,
    /// Opening resource balance.
    pub starting_balance: f64,
    /// Seed for both the roll source and the burst's cosmetic stream.
    pub seed: u64,
    /// Success-rate calibration.
    pub rates: RateTableSpec,
    /// Particle burst tuning.
    pub burst: BurstConfig,
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self {
            charge_duration: 1500,
            tick_interval: 30,
            cost: 10.0,
            starting_balance: 100.0,
            seed: 0,
            rates: RateTableSpec::default(),
            burst: BurstConfig::default(),
        }
    }
}

impl WidgetSpec {
    /// The attempt cost as fixed-point, for feeding `start()`. Rejects
    /// non-finite or unrepresentable values.
    pub fn cost_fixed(&self) -> Result<Fixed64, DataLoadError> {
        checked_fixed(self.cost, "cost")
    }
}

/// Build a seeded, ready-to-tick [`EnhanceSession`] from a [`WidgetSpec`].
///
/// Selection readiness is left false; the caller flips it once an item and
/// catalyst are picked.
pub fn build_session(spec: &WidgetSpec) -> Result<EnhanceSession, DataLoadError> {
    let table = build_rate_table(&spec.rates)?;
    let starting_balance = checked_fixed(spec.starting_balance, "starting_balance")?;
    spec.cost_fixed()?;
    let enhancer = Enhancer::new(
        table,
        RollSource::seeded(spec.seed),
        starting_balance,
        EnhancerConfig {
            charge_duration: spec.charge_duration,
            tick_interval: spec.tick_interval,
        },
    );
    let burst =
        BurstSimulator::new(spec.burst.clone(), spec.seed).map_err(|e| DataLoadError::Invalid {
            detail: e.to_string(),
        })?;
    Ok(EnhanceSession::new(enhancer, burst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reforge_core::fixed::f64_to_fixed64;

    #[test]
    fn default_spec_matches_classic_calibration() {
        let spec = WidgetSpec::default();
        assert_eq!(spec.charge_duration, 1500);
        assert_eq!(spec.tick_interval, 30);
        assert_eq!(spec.burst.particle_count, 120);

        let table = build_rate_table(&spec.rates).unwrap();
        assert_eq!(table.success_rate(0), f64_to_fixed64(90.0));
        assert_eq!(table.success_rate(9), f64_to_fixed64(5.0));
    }

    #[test]
    fn out_of_range_rate_is_invalid() {
        let spec = RateTableSpec {
            rates: [(0, 120.0)].into_iter().collect(),
            default_rate: 5.0,
        };
        let err = build_rate_table(&spec).unwrap_err();
        assert!(matches!(err, DataLoadError::Invalid { .. }));
    }

    #[test]
    fn zero_particle_burst_is_invalid() {
        let spec = WidgetSpec {
            burst: BurstConfig {
                particle_count: 0,
                ..BurstConfig::default()
            },
            ..WidgetSpec::default()
        };
        assert!(matches!(
            build_session(&spec),
            Err(DataLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn built_session_is_runnable() {
        let spec = WidgetSpec {
            seed: 99,
            ..WidgetSpec::default()
        };
        let mut session = build_session(&spec).unwrap();
        session.enhancer.set_selection_ready(true);
        assert!(session.start(spec.cost_fixed().unwrap()));
        assert_eq!(session.enhancer.balance(), f64_to_fixed64(90.0));
    }

    #[test]
    fn extreme_charge_duration_ticks_without_aborting() {
        let spec = WidgetSpec {
            charge_duration: 1 << 32,
            ..WidgetSpec::default()
        };
        let mut session = build_session(&spec).unwrap();
        session.enhancer.set_selection_ready(true);
        assert!(session.start(spec.cost_fixed().unwrap()));
        for _ in 0..10 {
            session.tick(30);
        }
        assert!(session.progress() >= Fixed64::ZERO);
        assert!(session.progress() <= f64_to_fixed64(1.0));
    }

    #[test]
    fn non_finite_rates_are_invalid_not_fatal() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            let spec = RateTableSpec {
                rates: [(0, bad)].into_iter().collect(),
                default_rate: 5.0,
            };
            assert!(matches!(
                build_rate_table(&spec),
                Err(DataLoadError::Invalid { .. })
            ));

            let spec = RateTableSpec {
                rates: BTreeMap::new(),
                default_rate: bad,
            };
            assert!(matches!(
                build_rate_table(&spec),
                Err(DataLoadError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn non_finite_economy_values_are_invalid() {
        let spec = WidgetSpec {
            starting_balance: f64::INFINITY,
            ..WidgetSpec::default()
        };
        assert!(matches!(
            build_session(&spec),
            Err(DataLoadError::Invalid { .. })
        ));

        let spec = WidgetSpec {
            cost: f64::NAN,
            ..WidgetSpec::default()
        };
        assert!(matches!(
            build_session(&spec),
            Err(DataLoadError::Invalid { .. })
        ));
        assert!(spec.cost_fixed().is_err());
    }
}
