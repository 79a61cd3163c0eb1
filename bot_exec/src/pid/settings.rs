//! Controller settings

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::convert::TryFrom;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Unvalidated controller parameters, as read from a parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerParams {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,

    /// Error magnitude below which the integral accumulates.
    pub integral_band: f64,

    /// Error magnitude of the small settle band.
    pub small_error: f64,

    /// Time the error must stay in the small band to settle.
    ///
    /// Units: milliseconds
    pub small_error_timeout_ms: f64,

    /// Error magnitude of the large settle band.
    pub large_error: f64,

    /// Time the error must stay in the large band to settle.
    ///
    /// Units: milliseconds
    pub large_error_timeout_ms: f64,

    /// Maximum output change per millisecond. Zero or less disables slew
    /// limiting.
    pub max_slew: f64,
}

/// Validated, immutable controller settings.
///
/// Build with `ControllerSettings::try_from(params)`. Deserialising goes
/// through the same validation so a bad parameter file is rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControllerParams", into = "ControllerParams")]
pub struct ControllerSettings {
    params: ControllerParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a set of controller parameters can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Gain `{0}` must be finite, found {1}")]
    NonFiniteGain(&'static str, f64),

    #[error("`{0}` must be finite and non-negative, found {1}")]
    InvalidThreshold(&'static str, f64),

    #[error("`max_slew` must be finite, found {0}")]
    NonFiniteSlew(f64),

    #[error("`small_error` ({0}) must not be larger than `large_error` ({1})")]
    SmallErrorExceedsLarge(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControllerParams {
    /// Check the parameters describe a controller which can settle.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, gain) in [("k_p", self.k_p), ("k_i", self.k_i), ("k_d", self.k_d)].iter() {
            if !gain.is_finite() {
                return Err(SettingsError::NonFiniteGain(*name, *gain));
            }
        }

        for (name, value) in [
            ("integral_band", self.integral_band),
            ("small_error", self.small_error),
            ("small_error_timeout_ms", self.small_error_timeout_ms),
            ("large_error", self.large_error),
            ("large_error_timeout_ms", self.large_error_timeout_ms),
        ].iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(SettingsError::InvalidThreshold(*name, *value));
            }
        }

        if !self.max_slew.is_finite() {
            return Err(SettingsError::NonFiniteSlew(self.max_slew));
        }

        if self.small_error > self.large_error {
            return Err(SettingsError::SmallErrorExceedsLarge(
                self.small_error, self.large_error
            ));
        }

        Ok(())
    }
}

impl TryFrom<ControllerParams> for ControllerSettings {
    type Error = SettingsError;

    fn try_from(params: ControllerParams) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl From<ControllerSettings> for ControllerParams {
    fn from(settings: ControllerSettings) -> Self {
        settings.params
    }
}

impl ControllerSettings {
    pub fn k_p(&self) -> f64 {
        self.params.k_p
    }

    pub fn k_i(&self) -> f64 {
        self.params.k_i
    }

    pub fn k_d(&self) -> f64 {
        self.params.k_d
    }

    pub fn integral_band(&self) -> f64 {
        self.params.integral_band
    }

    pub fn small_error(&self) -> f64 {
        self.params.small_error
    }

    pub fn small_error_timeout_ms(&self) -> f64 {
        self.params.small_error_timeout_ms
    }

    pub fn large_error(&self) -> f64 {
        self.params.large_error
    }

    pub fn large_error_timeout_ms(&self) -> f64 {
        self.params.large_error_timeout_ms
    }

    pub fn max_slew(&self) -> f64 {
        self.params.max_slew
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// The tuning used on the competition robot for both controllers.
    pub(crate) fn competition_params() -> ControllerParams {
        ControllerParams {
            k_p: 10.0,
            k_i: 0.0,
            k_d: 3.0,
            integral_band: 3.0,
            small_error: 1.0,
            small_error_timeout_ms: 100.0,
            large_error: 3.0,
            large_error_timeout_ms: 500.0,
            max_slew: 5.0,
        }
    }

    #[test]
    fn test_valid_settings() {
        let s = ControllerSettings::try_from(competition_params()).unwrap();
        assert_eq!(s.k_p(), 10.0);
        assert_eq!(s.small_error_timeout_ms(), 100.0);
        assert_eq!(s.max_slew(), 5.0);

        // Zero timeouts and a disabled slew are allowed
        let s = ControllerSettings::try_from(ControllerParams {
            small_error_timeout_ms: 0.0,
            max_slew: -1.0,
            ..competition_params()
        });
        assert!(s.is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            ControllerSettings::try_from(ControllerParams {
                small_error: 4.0,
                ..competition_params()
            }),
            Err(SettingsError::SmallErrorExceedsLarge(4.0, 3.0))
        );
        assert_eq!(
            ControllerSettings::try_from(ControllerParams {
                large_error_timeout_ms: -10.0,
                ..competition_params()
            }),
            Err(SettingsError::InvalidThreshold("large_error_timeout_ms", -10.0))
        );
        assert!(matches!(
            ControllerSettings::try_from(ControllerParams {
                k_d: f64::NAN,
                ..competition_params()
            }),
            Err(SettingsError::NonFiniteGain("k_d", _))
        ));
        assert!(matches!(
            ControllerSettings::try_from(ControllerParams {
                max_slew: f64::INFINITY,
                ..competition_params()
            }),
            Err(SettingsError::NonFiniteSlew(_))
        ));
    }

    #[test]
    fn test_deserialise_validates() {
        let good = "k_p = 10.0\nk_i = 0.0\nk_d = 3.0\nintegral_band = 3.0\n\
            small_error = 1.0\nsmall_error_timeout_ms = 100.0\nlarge_error = 3.0\n\
            large_error_timeout_ms = 500.0\nmax_slew = 5.0\n";
        let s: ControllerSettings = util::params::from_str(good).unwrap();
        assert_eq!(s, ControllerSettings::try_from(competition_params()).unwrap());

        let bad = good.replace("small_error = 1.0", "small_error = 5.0");
        assert!(util::params::from_str::<ControllerSettings>(&bad).is_err());
    }
}
