//! Diagram Data Adapter
//!
//! Projects a sampled series into the `(position, value)` pairs a rendering
//! collaborator consumes, whether that is a plot renderer or a JSON payload.
//! Pure projection: no computation happens here, and the station ordering is
//! preserved as-is.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::StationSample;
use crate::errors::BeamError;

/// Which internal-force curve to project out of a sample series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramChannel {
    /// Shear force V(x), kN
    Shear,
    /// Bending moment M(x), kN.m
    Moment,
}

impl DiagramChannel {
    /// Axis label for renderers
    pub fn axis_label(&self) -> &'static str {
        match self {
            DiagramChannel::Shear => "Shear Force (kN)",
            DiagramChannel::Moment => "Bending Moment (kN.m)",
        }
    }

    /// Diagram title for renderers
    pub fn title(&self) -> &'static str {
        match self {
            DiagramChannel::Shear => "Shear Force Diagram",
            DiagramChannel::Moment => "Bending Moment Diagram",
        }
    }
}

impl FromStr for DiagramChannel {
    type Err = BeamError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "shear" => Ok(DiagramChannel::Shear),
            "moment" => Ok(DiagramChannel::Moment),
            other => Err(BeamError::validation(
                "channel",
                other,
                "Expected 'shear' or 'moment'",
            )),
        }
    }
}

/// Project one channel of a sample series as ordered `(position, value)` pairs.
pub fn to_series(samples: &[StationSample], channel: DiagramChannel) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| match channel {
            DiagramChannel::Shear => (s.position_m, s.shear_kn),
            DiagramChannel::Moment => (s.position_m, s.moment_knm),
        })
        .collect()
}

/// Thin a series down to roughly `max_points` points, always keeping the
/// last one so the curve still ends at the right support.
///
/// Renderers with a bounded point budget (the report's vector plots) call
/// this; the engine itself never downsamples its output.
pub fn decimate(series: &[(f64, f64)], max_points: usize) -> Vec<(f64, f64)> {
    if series.len() <= max_points.max(1) {
        return series.to_vec();
    }

    let step = series.len().div_ceil(max_points.max(1));
    let mut thinned: Vec<(f64, f64)> = series.iter().copied().step_by(step).collect();

    if let Some(&last) = series.last() {
        if thinned.last() != Some(&last) {
            thinned.push(last);
        }
    }
    thinned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{sample, solve_reactions};
    use crate::loads::{Beam, LoadDescriptor};

    #[test]
    fn test_channel_parsing() {
        assert_eq!("shear".parse::<DiagramChannel>().unwrap(), DiagramChannel::Shear);
        assert_eq!("moment".parse::<DiagramChannel>().unwrap(), DiagramChannel::Moment);

        let err = "deflection".parse::<DiagramChannel>().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
    }

    #[test]
    fn test_projection_preserves_order_and_length() {
        let beam = Beam::new(
            10.0,
            &[LoadDescriptor::Point {
                magnitude: 10.0,
                position: 5.0,
            }],
        )
        .unwrap();
        let reactions = solve_reactions(&beam).unwrap();
        let samples = sample(&beam, &reactions, 51).unwrap();

        let shear = to_series(&samples, DiagramChannel::Shear);
        let moment = to_series(&samples, DiagramChannel::Moment);

        assert_eq!(shear.len(), 51);
        assert_eq!(moment.len(), 51);
        assert_eq!(shear[0], (0.0, samples[0].shear_kn));
        assert_eq!(moment[50].0, 10.0);
        assert!(shear.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_decimate_keeps_endpoints() {
        let series: Vec<(f64, f64)> = (0..500).map(|i| (i as f64, (i * 2) as f64)).collect();
        let thinned = decimate(&series, 200);

        assert!(thinned.len() <= 201);
        assert_eq!(thinned.first(), Some(&(0.0, 0.0)));
        assert_eq!(thinned.last(), Some(&(499.0, 998.0)));
    }

    #[test]
    fn test_decimate_short_series_untouched() {
        let series = vec![(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(decimate(&series, 200), series);
    }
}
