//! # Spanwise CLI
//!
//! Terminal front end for the beam statics engine. Given a case-file path it
//! analyzes that case and writes the PDF report beside it; with no argument
//! it runs a small interactive demo.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use beam_core::analysis::analyze;
use beam_core::file_io::{load_case, CaseFile};
use beam_core::loads::{Beam, LoadDescriptor};
use beam_core::report::render_report;
use beam_core::{BeamResult, BeamSolution};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() -> ExitCode {
    println!("Spanwise - Simply Supported Beam Analysis");
    println!("=========================================");
    println!();

    let case = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            match load_case(&path) {
                Ok(case) => {
                    println!("Loaded case '{}' from {}", case.label, path.display());
                    case
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            println!("No case file given. Running interactive demo...");
            println!();
            interactive_case()
        }
    };

    match run(&case) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Build a one-point-load case from interactive prompts.
fn interactive_case() -> CaseFile {
    let span_m = prompt_f64("Enter beam span (m) [10.0]: ", 10.0);
    let magnitude = prompt_f64("Enter point load (kN) [10.0]: ", 10.0);
    let position = prompt_f64(
        &format!("Enter load position (m) [{:.1}]: ", span_m / 2.0),
        span_m / 2.0,
    );

    CaseFile::new("Interactive demo", "--", "--")
        .with_span(span_m)
        .with_load(LoadDescriptor::Point {
            magnitude,
            position,
        })
}

fn run(case: &CaseFile) -> BeamResult<()> {
    let beam = case.to_beam()?;
    let solution = analyze(&beam)?;

    print_results(&beam, &solution);

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&solution.reactions) {
        println!("{}", json);
    }

    let pdf = render_report(
        &beam,
        &solution,
        &case.label,
        &case.meta.engineer,
        &case.meta.job_id,
    )?;

    let report_path = Path::new("report.pdf");
    std::fs::write(report_path, &pdf).map_err(|e| {
        beam_core::BeamError::file_error(
            "write report",
            report_path.display().to_string(),
            e.to_string(),
        )
    })?;
    println!();
    println!("Report written to {}", report_path.display());

    Ok(())
}

fn print_results(beam: &Beam, solution: &BeamSolution) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  BEAM ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Span:   {:.2} m", beam.span_m);
    println!("  Loads:  {} ({} kN total)", beam.loads.len(), beam.total_load_kn());
    println!();
    println!("Reactions:");
    println!("  Ra = {:.2} kN", solution.reactions.ra_kn);
    println!("  Rb = {:.2} kN", solution.reactions.rb_kn);
    println!();
    println!("Peaks:");
    println!(
        "  V_max = {:.2} kN at x = {:.2} m",
        solution.max_shear_kn, solution.max_shear_position_m
    );
    println!(
        "  M_max = {:.2} kN.m at x = {:.2} m",
        solution.max_moment_knm, solution.max_moment_position_m
    );
    println!("═══════════════════════════════════════");
}
