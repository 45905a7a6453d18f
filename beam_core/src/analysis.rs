//! Simply-Supported Beam Statics
//!
//! Reaction solving and discretized shear/moment sampling for a single-span,
//! simply-supported, statically determinate beam.
//!
//! ## Sign Convention
//!
//! - Downward loads positive; reactions upward-positive
//! - Positive shear: net upward force to the left of the cut
//! - Positive moment: sagging (tension on the bottom fiber)
//!
//! ## Discontinuity policy
//!
//! Shear jumps at a point load. A station that lands exactly on a point-load
//! position reports the value *after* the jump; downstream plots see the drop
//! at the sampled point, never one station late.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::analysis::analyze;
//! use beam_core::loads::{Beam, LoadDescriptor};
//!
//! // 10 m span, 10 kN at midspan
//! let beam = Beam::new(10.0, &[
//!     LoadDescriptor::Point { magnitude: 10.0, position: 5.0 },
//! ]).unwrap();
//!
//! let solution = analyze(&beam).unwrap();
//! println!("Ra = {:.2} kN, Rb = {:.2} kN", solution.reactions.ra_kn, solution.reactions.rb_kn);
//! println!("Peak moment: {:.2} kN.m", solution.max_moment_knm);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};
use crate::loads::Beam;

/// Default number of stations sampled across the span.
///
/// Fine enough for smooth diagrams at plotting scale; callers needing coarser
/// or finer output pass their own count to [`sample`] or
/// [`analyze_with_stations`].
pub const DEFAULT_STATION_COUNT: usize = 500;

/// Support reactions at the left (A) and right (B) ends, upward-positive (kN).
///
/// Derived per analysis run, never stored - a pure function of the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionSet {
    pub ra_kn: f64,
    pub rb_kn: f64,
}

/// Solve the two support reactions via static equilibrium.
///
/// Moments about A give `Rb = sum(moment about A) / span`; vertical
/// equilibrium then gives `Ra = sum(loads) - Rb`. An empty load set yields
/// zero reactions.
///
/// # Errors
///
/// [`BeamError::DegenerateBeam`] when the span is non-positive. `Beam::new`
/// already rejects such spans, but the fields are public, so the solver
/// checks again rather than divide by zero.
pub fn solve_reactions(beam: &Beam) -> BeamResult<ReactionSet> {
    if !beam.span_m.is_finite() || beam.span_m <= 0.0 {
        return Err(BeamError::DegenerateBeam {
            span_m: beam.span_m,
        });
    }

    let moment_about_a: f64 = beam.loads.iter().map(|l| l.moment_about_a_knm()).sum();
    let total_load = beam.total_load_kn();

    let rb_kn = moment_about_a / beam.span_m;
    let ra_kn = total_load - rb_kn;

    Ok(ReactionSet { ra_kn, rb_kn })
}

/// Internal forces at one sampled station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationSample {
    /// Distance from support A (m)
    pub position_m: f64,
    /// Shear force (kN)
    pub shear_kn: f64,
    /// Bending moment (kN.m)
    pub moment_knm: f64,
}

/// Ordered station samples across the span: strictly increasing positions,
/// first at 0, last at the span. The ordering is load-bearing for plotting.
pub type SampleSeries = Vec<StationSample>;

/// Shear force at station `x`: `Ra` minus everything acting at or left of `x`.
pub fn shear_at(beam: &Beam, reactions: &ReactionSet, x_m: f64) -> f64 {
    beam.loads
        .iter()
        .filter_map(|load| load.resultant_left_of(x_m))
        .fold(reactions.ra_kn, |v, (force_kn, _)| v - force_kn)
}

/// Bending moment at station `x`: `Ra * x` minus the moments of everything
/// left of `x`, each portion taken as a resultant at its own centroid.
pub fn moment_at(beam: &Beam, reactions: &ReactionSet, x_m: f64) -> f64 {
    beam.loads
        .iter()
        .filter_map(|load| load.resultant_left_of(x_m))
        .fold(reactions.ra_kn * x_m, |m, (force_kn, centroid_m)| {
            m - force_kn * (x_m - centroid_m)
        })
}

/// Sample shear and moment at `station_count` evenly spaced stations from 0
/// to the span inclusive.
///
/// # Errors
///
/// [`BeamError::InvalidParameter`] when `station_count < 2` - the series must
/// at least cover both supports.
pub fn sample(
    beam: &Beam,
    reactions: &ReactionSet,
    station_count: usize,
) -> BeamResult<SampleSeries> {
    if station_count < 2 {
        return Err(BeamError::invalid_parameter(
            "station_count",
            station_count.to_string(),
            "At least 2 stations are required to span both supports",
        ));
    }

    let mut series = Vec::with_capacity(station_count);
    for i in 0..station_count {
        // Fraction computed first so the last station lands exactly on the span
        let x_m = beam.span_m * (i as f64 / (station_count - 1) as f64);
        series.push(StationSample {
            position_m: x_m,
            shear_kn: shear_at(beam, reactions, x_m),
            moment_knm: moment_at(beam, reactions, x_m),
        });
    }

    Ok(series)
}

/// Full analysis output: reactions, peak values, and the sampled series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamSolution {
    /// Support reactions (kN, upward-positive)
    pub reactions: ReactionSet,

    /// Shear with the largest magnitude across the series, signed (kN)
    pub max_shear_kn: f64,
    /// Station of the peak shear (m from A)
    pub max_shear_position_m: f64,

    /// Moment with the largest magnitude across the series, signed (kN.m)
    pub max_moment_knm: f64,
    /// Station of the peak moment (m from A)
    pub max_moment_position_m: f64,

    /// Station samples, ordered by increasing position
    pub samples: SampleSeries,
}

/// Run the full analysis at the default station count.
pub fn analyze(beam: &Beam) -> BeamResult<BeamSolution> {
    analyze_with_stations(beam, DEFAULT_STATION_COUNT)
}

/// Run the full analysis at an explicit station count.
pub fn analyze_with_stations(beam: &Beam, station_count: usize) -> BeamResult<BeamSolution> {
    let reactions = solve_reactions(beam)?;
    let samples = sample(beam, &reactions, station_count)?;

    let mut max_shear_kn: f64 = 0.0;
    let mut max_shear_position_m = 0.0;
    let mut max_moment_knm: f64 = 0.0;
    let mut max_moment_position_m = 0.0;

    for station in &samples {
        if station.shear_kn.abs() > max_shear_kn.abs() {
            max_shear_kn = station.shear_kn;
            max_shear_position_m = station.position_m;
        }
        if station.moment_knm.abs() > max_moment_knm.abs() {
            max_moment_knm = station.moment_knm;
            max_moment_position_m = station.position_m;
        }
    }

    Ok(BeamSolution {
        reactions,
        max_shear_kn,
        max_shear_position_m,
        max_moment_knm,
        max_moment_position_m,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadDescriptor;
    use approx::assert_relative_eq;

    fn point(magnitude: f64, position: f64) -> LoadDescriptor {
        LoadDescriptor::Point {
            magnitude,
            position,
        }
    }

    fn udl(intensity: f64, start: f64, end: f64) -> LoadDescriptor {
        LoadDescriptor::Udl {
            intensity,
            start,
            end,
        }
    }

    #[test]
    fn test_no_loads_zero_reactions() {
        let beam = Beam::new(10.0, &[]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();
        assert_eq!(reactions.ra_kn, 0.0);
        assert_eq!(reactions.rb_kn, 0.0);
    }

    #[test]
    fn test_vertical_equilibrium() {
        let beam = Beam::new(
            12.0,
            &[point(10.0, 3.0), point(6.5, 9.0), udl(2.5, 4.0, 11.0)],
        )
        .unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(
            reactions.ra_kn + reactions.rb_kn,
            beam.total_load_kn(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_moment_equilibrium_about_a() {
        let beam = Beam::new(12.0, &[point(10.0, 3.0), udl(2.5, 4.0, 11.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        let load_moments: f64 = beam.loads.iter().map(|l| l.moment_about_a_knm()).sum();
        assert_relative_eq!(reactions.rb_kn * beam.span_m, load_moments, epsilon = 1e-9);
    }

    #[test]
    fn test_midspan_point_load() {
        // span = 10 m, 10 kN at x = 5: Ra = Rb = 5 kN, peak moment 25 kN.m
        let beam = Beam::new(10.0, &[point(10.0, 5.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(reactions.ra_kn, 5.0);
        assert_relative_eq!(reactions.rb_kn, 5.0);
        assert_relative_eq!(moment_at(&beam, &reactions, 5.0), 25.0);
    }

    #[test]
    fn test_full_span_udl() {
        // span = 8 m, 4 kN/m over [0, 8]: Ra = Rb = 16 kN, midspan moment
        // 16*4 - 4*4*2 = 32 kN.m
        let beam = Beam::new(8.0, &[udl(4.0, 0.0, 8.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(reactions.ra_kn, 16.0);
        assert_relative_eq!(reactions.rb_kn, 16.0);
        assert_relative_eq!(moment_at(&beam, &reactions, 4.0), 32.0);
    }

    #[test]
    fn test_point_load_at_support_a() {
        // A load directly over support A goes straight into it: Ra = 12, Rb = 0.
        // Must not error, and the station at x = 0 reports the post-jump shear.
        let beam = Beam::new(6.0, &[point(12.0, 0.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(reactions.ra_kn, 12.0);
        assert_relative_eq!(reactions.rb_kn, 0.0);
        assert_relative_eq!(shear_at(&beam, &reactions, 0.0), 0.0);
    }

    #[test]
    fn test_shear_boundary_values() {
        let beam = Beam::new(10.0, &[point(10.0, 5.0), udl(4.0, 2.0, 8.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        // Nothing acts left of x = 0, so shear there is Ra
        assert_relative_eq!(shear_at(&beam, &reactions, 0.0), reactions.ra_kn);
        // At x = span the whole load set is left of the cut: shear is -Rb
        assert_relative_eq!(
            shear_at(&beam, &reactions, 10.0),
            -reactions.rb_kn,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_moment_vanishes_at_supports() {
        let beam = Beam::new(10.0, &[point(7.0, 3.0), udl(1.5, 1.0, 9.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(moment_at(&beam, &reactions, 0.0), 0.0);
        assert_relative_eq!(moment_at(&beam, &reactions, 10.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shear_jump_reported_at_station() {
        // 10 kN at x = 5 on a 10 m span: Ra = 5. A station exactly on the
        // load reports the post-jump value, 5 - 10 = -5.
        let beam = Beam::new(10.0, &[point(10.0, 5.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        assert_relative_eq!(shear_at(&beam, &reactions, 5.0), -5.0);
        // Just before the load the shear is still Ra
        assert_relative_eq!(shear_at(&beam, &reactions, 4.999), 5.0);
    }

    #[test]
    fn test_series_shape() {
        let beam = Beam::new(10.0, &[point(10.0, 5.0)]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();
        let series = sample(&beam, &reactions, 101).unwrap();

        assert_eq!(series.len(), 101);
        assert_eq!(series.first().unwrap().position_m, 0.0);
        assert_eq!(series.last().unwrap().position_m, 10.0);
        assert!(series
            .windows(2)
            .all(|pair| pair[0].position_m < pair[1].position_m));
    }

    #[test]
    fn test_too_few_stations_rejected() {
        let beam = Beam::new(10.0, &[]).unwrap();
        let reactions = solve_reactions(&beam).unwrap();

        for count in [0, 1] {
            let err = sample(&beam, &reactions, count).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_PARAMETER");
        }
    }

    #[test]
    fn test_degenerate_span_surfaces_from_solver() {
        // Fields are public, so a degenerate beam can reach the solver directly
        let beam = Beam {
            span_m: -3.0,
            loads: Vec::new(),
        };
        let err = solve_reactions(&beam).unwrap_err();
        assert_eq!(err, BeamError::DegenerateBeam { span_m: -3.0 });
    }

    #[test]
    fn test_analyze_tracks_peaks() {
        let beam = Beam::new(10.0, &[point(10.0, 5.0)]).unwrap();
        // 501 stations puts a station exactly at midspan
        let solution = analyze_with_stations(&beam, 501).unwrap();

        assert_eq!(solution.samples.len(), 501);
        assert_relative_eq!(solution.max_moment_knm, 25.0);
        assert_relative_eq!(solution.max_moment_position_m, 5.0);
        // Peak shear magnitude is 5 kN at either support region
        assert_relative_eq!(solution.max_shear_kn.abs(), 5.0);
    }

    #[test]
    fn test_default_station_count() {
        let beam = Beam::new(10.0, &[udl(4.0, 0.0, 10.0)]).unwrap();
        let solution = analyze(&beam).unwrap();
        assert_eq!(solution.samples.len(), DEFAULT_STATION_COUNT);
    }
}
