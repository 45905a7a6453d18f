//! Load Model
//!
//! Canonical representations of the loads a simply-supported beam can carry,
//! plus the normalization step that turns raw wire-format descriptors into a
//! validated [`Beam`].
//!
//! Two layers:
//! - [`LoadDescriptor`] - the untrusted wire format (`kind`-tagged JSON) as it
//!   arrives from a case file, a web request, or any other ingestion surface.
//! - [`Load`] - the validated variant with unit-suffixed fields, guaranteed to
//!   lie within the beam span.
//!
//! ## Sign Convention
//!
//! Downward loads are positive; support reactions are reported upward-positive.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::loads::{Beam, LoadDescriptor};
//!
//! let beam = Beam::new(10.0, &[
//!     LoadDescriptor::Point { magnitude: 10.0, position: 5.0 },
//!     LoadDescriptor::Udl { intensity: 4.0, start: 2.0, end: 8.0 },
//! ]).unwrap();
//!
//! assert_eq!(beam.loads.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};

/// Fallback span when a case supplies none (m).
///
/// Ingestion surfaces infer the span from the furthest load extent but never
/// let it shrink below this default.
pub const DEFAULT_SPAN_M: f64 = 10.0;

/// Raw load descriptor as received on the wire.
///
/// This is the input contract shared by every ingestion surface: JSON case
/// files, web request bodies, and anything else that feeds the engine.
///
/// ## JSON Examples
///
/// ```json
/// { "kind": "point", "magnitude": 10.0, "position": 5.0 }
/// { "kind": "udl", "intensity": 4.0, "start": 0.0, "end": 8.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LoadDescriptor {
    /// Concentrated load: magnitude in kN, position in m from support A
    Point { magnitude: f64, position: f64 },
    /// Uniformly distributed load: intensity in kN/m over [start, end] m
    Udl { intensity: f64, start: f64, end: f64 },
}

impl LoadDescriptor {
    /// Furthest position this load reaches along the beam (m).
    pub fn extent_m(&self) -> f64 {
        match self {
            LoadDescriptor::Point { position, .. } => *position,
            LoadDescriptor::Udl { end, .. } => *end,
        }
    }
}

/// Infer a span from raw load positions, in the absence of an explicit one.
///
/// Returns the furthest load extent, clamped to a minimum of
/// [`DEFAULT_SPAN_M`]. With no loads at all, returns the default.
pub fn infer_span_m(descriptors: &[LoadDescriptor]) -> f64 {
    descriptors
        .iter()
        .map(LoadDescriptor::extent_m)
        .fold(DEFAULT_SPAN_M, f64::max)
}

/// A validated load on the beam.
///
/// Constructed only through [`Beam::new`], which guarantees all coordinates
/// lie within `[0, span]` and all magnitudes are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Load {
    /// Point load (kN) at a position (m from support A)
    Point { magnitude_kn: f64, position_m: f64 },

    /// Uniformly distributed load (kN/m) over [start, end] (m)
    Udl {
        intensity_kn_per_m: f64,
        start_m: f64,
        end_m: f64,
    },
}

impl Load {
    /// Total downward force of this load (kN).
    ///
    /// A UDL's total is `w * (end - start)`.
    pub fn total_kn(&self) -> f64 {
        match self {
            Load::Point { magnitude_kn, .. } => *magnitude_kn,
            Load::Udl {
                intensity_kn_per_m,
                start_m,
                end_m,
            } => intensity_kn_per_m * (end_m - start_m),
        }
    }

    /// Moment of this load about support A (kN.m).
    ///
    /// For moment purposes a UDL is equivalent to its resultant acting at the
    /// centroid `(start + end) / 2`.
    pub fn moment_about_a_knm(&self) -> f64 {
        match self {
            Load::Point {
                magnitude_kn,
                position_m,
            } => magnitude_kn * position_m,
            Load::Udl {
                intensity_kn_per_m,
                start_m,
                end_m,
            } => intensity_kn_per_m * (end_m - start_m) * (start_m + end_m) / 2.0,
        }
    }

    /// Resultant of the portion of this load acting at or left of station `x`.
    ///
    /// Returns `(force_kn, centroid_m)`, or `None` when nothing acts left of
    /// `x`. A point load sitting exactly at `x` counts in full: the shear jump
    /// is reported at the sampled station, not before it. A UDL contributes
    /// its `[start, min(x, end)]` portion as a resultant at that portion's own
    /// centroid.
    pub fn resultant_left_of(&self, x_m: f64) -> Option<(f64, f64)> {
        match self {
            Load::Point {
                magnitude_kn,
                position_m,
            } => {
                if *position_m <= x_m {
                    Some((*magnitude_kn, *position_m))
                } else {
                    None
                }
            }
            Load::Udl {
                intensity_kn_per_m,
                start_m,
                end_m,
            } => {
                if x_m > *start_m {
                    let covered_m = x_m.min(*end_m) - start_m;
                    Some((
                        intensity_kn_per_m * covered_m,
                        start_m + covered_m / 2.0,
                    ))
                } else {
                    None
                }
            }
        }
    }

    fn from_descriptor(descriptor: &LoadDescriptor, span_m: f64) -> BeamResult<Load> {
        match *descriptor {
            LoadDescriptor::Point {
                magnitude,
                position,
            } => {
                require_finite("magnitude", magnitude)?;
                require_in_span("position", position, span_m)?;
                Ok(Load::Point {
                    magnitude_kn: magnitude,
                    position_m: position,
                })
            }
            LoadDescriptor::Udl {
                intensity,
                start,
                end,
            } => {
                require_finite("intensity", intensity)?;
                require_in_span("start", start, span_m)?;
                require_in_span("end", end, span_m)?;
                if end <= start {
                    return Err(BeamError::validation(
                        "end",
                        end.to_string(),
                        format!("UDL end must be greater than start ({start})"),
                    ));
                }
                Ok(Load::Udl {
                    intensity_kn_per_m: intensity,
                    start_m: start,
                    end_m: end,
                })
            }
        }
    }
}

fn require_finite(field: &str, value: f64) -> BeamResult<()> {
    if !value.is_finite() {
        return Err(BeamError::validation(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    Ok(())
}

fn require_in_span(field: &str, value: f64, span_m: f64) -> BeamResult<()> {
    require_finite(field, value)?;
    if value < 0.0 || value > span_m {
        return Err(BeamError::validation(
            field,
            value.to_string(),
            format!("Position must lie within [0, {span_m}]"),
        ));
    }
    Ok(())
}

/// A simply-supported beam: span plus its validated load set.
///
/// Immutable once constructed for a given analysis run. Reactions and sample
/// series are pure functions of this value - see [`crate::analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Span between supports A (x = 0) and B (x = span) in meters
    pub span_m: f64,
    /// Validated loads, in input order
    pub loads: Vec<Load>,
}

impl Beam {
    /// Normalize raw load descriptors into a validated beam.
    ///
    /// # Errors
    ///
    /// * [`BeamError::DegenerateBeam`] - span is non-positive or non-finite
    /// * [`BeamError::Validation`] - a coordinate lies outside `[0, span]`,
    ///   a UDL has `end <= start`, or a magnitude is non-finite
    ///
    /// An empty descriptor list is valid; the resulting beam simply carries
    /// zero reactions.
    pub fn new(span_m: f64, descriptors: &[LoadDescriptor]) -> BeamResult<Beam> {
        if !span_m.is_finite() || span_m <= 0.0 {
            return Err(BeamError::DegenerateBeam { span_m });
        }

        let loads = descriptors
            .iter()
            .map(|d| Load::from_descriptor(d, span_m))
            .collect::<BeamResult<Vec<Load>>>()?;

        Ok(Beam { span_m, loads })
    }

    /// Sum of all load magnitudes (kN), UDLs taken as `w * (end - start)`.
    pub fn total_load_kn(&self) -> f64 {
        self.loads.iter().map(Load::total_kn).sum()
    }
}
