//! Functions to compute temperature from raw sensor values.
//!
//! The camera stores uncalibrated detector counts. Each file
//! variant maps a count linearly onto a radiance proxy, which
//! is then inverted through the Stefan-Boltzmann law and
//! corrected for emissivity against the background
//! (reflected) temperature.
use serde_derive::*;

use crate::error::{Is2Error, Result};

const CELSIUS_OFFSET: f64 = 273.15;
const STEFAN_BOLTZMANN: f64 = 5.67e-8;
// Effective aperture factor of the detector, folded into σ.
const RADIANCE_FACTOR: f64 = 2.4;

/// Lowest temperature ever reported. Counts below this are
/// sensor noise.
pub const TEMPERATURE_FLOOR: f64 = -30.;

/// Linear map from raw counts to the radiance proxy.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub scale: f64,
    pub bias: f64,
}

impl Calibration {
    // The proxy is stored by the camera as a whole 16-bit
    // unit, so the fraction is dropped.
    fn radiance(&self, raw: u16) -> f64 {
        (raw as f64 * self.scale + self.bias).trunc()
    }
}

/// How the palette range is chosen.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum ScaleRange {
    /// Use the observed min / max of the frame.
    Auto,
    /// Use the given bounds.
    Manual { min: f64, max: f64 },
}

impl ScaleRange {
    /// `(0, 0)` selects automatic scaling; anything else is
    /// taken verbatim.
    pub fn from_bounds(min: f64, max: f64) -> Self {
        if min == 0. && max == 0. {
            ScaleRange::Auto
        } else {
            ScaleRange::Manual { min, max }
        }
    }
}

/// User supplied parameters for one conversion.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParams {
    background_temperature: f64,
    emissivity: f64,
    scale: ScaleRange,
}

impl CalibrationParams {
    pub fn new(background_temperature: f64, emissivity: f64, scale: ScaleRange) -> Result<Self> {
        if !background_temperature.is_finite() {
            return Err(Is2Error::InvalidCalibration(format!(
                "background temperature must be finite, got {}",
                background_temperature
            )));
        }
        if !(emissivity > 0. && emissivity <= 1.) {
            return Err(Is2Error::InvalidCalibration(format!(
                "emissivity must be in (0, 1], got {}",
                emissivity
            )));
        }
        Ok(CalibrationParams {
            background_temperature,
            emissivity,
            scale,
        })
    }

    pub fn background_temperature(&self) -> f64 {
        self.background_temperature
    }

    pub fn emissivity(&self) -> f64 {
        self.emissivity
    }

    pub fn scale(&self) -> ScaleRange {
        self.scale
    }
}

impl Default for CalibrationParams {
    fn default() -> Self {
        CalibrationParams {
            background_temperature: 20.,
            emissivity: 0.95,
            scale: ScaleRange::Auto,
        }
    }
}

/// Raw count to temperature conversion for one file variant
/// and one set of parameters.
#[derive(Debug, Clone, Copy)]
pub struct RadiometricConverter {
    calibration: Calibration,
    background_temperature: f64,
    emissivity: f64,
}

impl RadiometricConverter {
    pub fn new(calibration: Calibration, params: &CalibrationParams) -> Self {
        RadiometricConverter {
            calibration,
            background_temperature: params.background_temperature,
            emissivity: params.emissivity,
        }
    }

    // T = (P / (σ·k))^¼
    fn blackbody_temp(radiance: f64) -> f64 {
        (radiance / (STEFAN_BOLTZMANN * RADIANCE_FACTOR)).powf(0.25) - CELSIUS_OFFSET
    }

    fn emissivity_correction(&self, temp: f64) -> f64 {
        (temp - self.background_temperature) / self.emissivity + self.background_temperature
    }

    pub fn temperature_transform(&self) -> impl Fn(u16) -> f64 + '_ {
        move |raw| self.raw_to_temp(raw)
    }

    /// Temperature in celsius for a raw count.
    pub fn raw_to_temp(&self, raw: u16) -> f64 {
        let temp = Self::blackbody_temp(self.calibration.radiance(raw));
        self.emissivity_correction(temp).max(TEMPERATURE_FLOOR)
    }
}
