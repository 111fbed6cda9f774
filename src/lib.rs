//! Library to convert IS2 files from handheld thermal
//! cameras.
//!
//! An IS2 file bundles a 320x240 infrared frame with a
//! visible-light photo and, in older files, a voice
//! annotation. Two on-disk layouts exist:
//!
//! 1. A [raw binary layout](legacy) where blocks sit at fixed
//! distances from a run of 0xff padding bytes.
//!
//! 2. A [ZIP based layout](container) with named members.
//!
//! # Usage
//!
//! [`convert`] detects the layout, converts the detector
//! counts to temperatures and writes the requested artifacts:
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use is2::{convert, CalibrationParams, Conversion, ScaleRange};
//!
//! let params = CalibrationParams::new(20., 0.95, ScaleRange::Auto)?;
//! let report = convert(
//!     &Conversion::new("IR_0001.IS2")
//!         .ir_output("ir.jpg")
//!         .visual_output("vis.jpg")
//!         .params(params),
//! )?;
//! println!("{} .. {}", report.min.temperature, report.max.temperature);
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks are usable on their own: decode a
//! frame with [`frame::read_raw_frame`], convert it with a
//! [`RadiometricConverter`] into a
//! [`TemperatureField`](frame::TemperatureField), and render
//! it with [`render::compose`].

pub mod error;

pub mod format;
pub mod frame;
pub mod palette;
pub mod temperature;

pub mod audio;
pub mod container;
pub mod legacy;
pub mod visual;

pub mod convert;
pub mod render;

pub mod logger;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::convert::{convert, Conversion, ConversionReport};
pub use crate::error::{Is2Error, Result};
pub use crate::temperature::{CalibrationParams, RadiometricConverter, ScaleRange};
