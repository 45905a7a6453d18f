//! # Report Generation
//!
//! Generates the engineering report PDF for an analyzed beam using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via string formatting before compilation
//! - Diagram curves come from the diagram adapter's numeric pairs, decimated
//!   and scaled into the plot box here - the engine never formats coordinates
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::analysis::analyze;
//! use beam_core::loads::{Beam, LoadDescriptor};
//! use beam_core::report::render_report;
//!
//! let beam = Beam::new(10.0, &[
//!     LoadDescriptor::Point { magnitude: 10.0, position: 5.0 },
//! ]).unwrap();
//! let solution = analyze(&beam).unwrap();
//!
//! let pdf = render_report(&beam, &solution, "B-1", "A. Engineer", "26-014").unwrap();
//! std::fs::write("beam_report.pdf", pdf).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::analysis::BeamSolution;
use crate::diagram::{decimate, to_series, DiagramChannel};
use crate::errors::{BeamError, BeamResult};
use crate::loads::{Beam, Load};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct ReportWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl ReportWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        ReportWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();

        // Bundled fonts from typst-assets (Libertinus, math symbols, etc.)
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }

        fonts
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Report Template
// ============================================================================

/// Plot box dimensions for the force diagrams (pt)
const PLOT_WIDTH_PT: f64 = 420.0;
const PLOT_HEIGHT_PT: f64 = 120.0;

/// Point budget per diagram curve; finer sampling adds nothing at page scale
const PLOT_MAX_POINTS: usize = 200;

/// Typst template for the beam analysis report
const CASE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Spanwise Structural Analysis]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Simply Supported Beam Analysis]
    #v(4pt)
    #text(size: 14pt)[{{CASE_LABEL}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Model*
    #v(4pt)
    Single-span simply supported beam (pin-roller), statically determinate,
    discrete static loads only.
  ]
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Input Data

Span: {{SPAN_M}} m

#table(
  columns: (auto, auto, auto, 1fr),
  inset: 8pt,
  stroke: 0.5pt,
  align: (center, left, right, left),
  table.header([*No.*], [*Type*], [*Magnitude*], [*Location*]),
{{LOAD_ROWS}}
)

#v(12pt)

== Support Reactions

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Reaction*], [*Value*], [*Unit*]),
  [R#sub[A] (left support)], [{{RA_KN}}], [kN],
  [R#sub[B] (right support)], [{{RB_KN}}], [kN],
)

#v(12pt)

== Analysis Results

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Quantity*], [*Value*], [*Position*]),
  [Peak shear force], [{{MAX_SHEAR_KN}} kN], [x = {{MAX_SHEAR_POS_M}} m],
  [Peak bending moment], [{{MAX_MOMENT_KNM}} kN.m], [x = {{MAX_MOMENT_POS_M}} m],
)

#v(16pt)

=== Shear Force Diagram

#block(width: 100%, inset: 8pt, stroke: 0.5pt + gray)[
  #box(width: {{PLOT_W}}pt, height: {{PLOT_H}}pt)[
    #place(top + left, line(
      start: (0pt, {{SFD_AXIS_Y}}pt),
      end: ({{PLOT_W}}pt, {{SFD_AXIS_Y}}pt),
      stroke: 0.5pt + gray,
    ))
    #place(top + left, curve(
      stroke: 1.5pt + rgb("#1d4ed8"),
{{SFD_POINTS}}
    ))
  ]
  #v(2pt)
  #grid(
    columns: (1fr, 1fr),
    align(left)[#text(size: 9pt, fill: gray)[0 m]],
    align(right)[#text(size: 9pt, fill: gray)[{{SPAN_M}} m]],
  )
  #align(center)[#text(size: 9pt)[Shear Force (kN) vs Position (m)]]
]

#v(12pt)

=== Bending Moment Diagram

#block(width: 100%, inset: 8pt, stroke: 0.5pt + gray)[
  #box(width: {{PLOT_W}}pt, height: {{PLOT_H}}pt)[
    #place(top + left, line(
      start: (0pt, {{BMD_AXIS_Y}}pt),
      end: ({{PLOT_W}}pt, {{BMD_AXIS_Y}}pt),
      stroke: 0.5pt + gray,
    ))
    #place(top + left, curve(
      stroke: 1.5pt + rgb("#b91c1c"),
{{BMD_POINTS}}
    ))
  ]
  #v(2pt)
  #grid(
    columns: (1fr, 1fr),
    align(left)[#text(size: 9pt, fill: gray)[0 m]],
    align(right)[#text(size: 9pt, fill: gray)[{{SPAN_M}} m]],
  )
  #align(center)[#text(size: 9pt)[Bending Moment (kN.m) vs Position (m)]]
]

#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Generated by Spanwise \
  Calculations should be verified by a licensed professional engineer.
]
"##;

// ============================================================================
// Rendering Functions
// ============================================================================

/// Render an analyzed beam to a PDF report.
///
/// # Arguments
///
/// * `beam` - The validated beam that was analyzed
/// * `solution` - Output of [`crate::analysis::analyze`] for that beam
/// * `label` - Beam label shown in the title block
/// * `engineer` - Engineer name for the report header
/// * `job_id` - Job/project ID
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(BeamError::Render)` - If compilation or PDF export fails
pub fn render_report(
    beam: &Beam,
    solution: &BeamSolution,
    label: &str,
    engineer: &str,
    job_id: &str,
) -> BeamResult<Vec<u8>> {
    let shear = decimate(
        &to_series(&solution.samples, DiagramChannel::Shear),
        PLOT_MAX_POINTS,
    );
    let moment = decimate(
        &to_series(&solution.samples, DiagramChannel::Moment),
        PLOT_MAX_POINTS,
    );

    let (sfd_points, sfd_axis_y) = plot_geometry(&shear, beam.span_m);
    let (bmd_points, bmd_axis_y) = plot_geometry(&moment, beam.span_m);

    let source = CASE_TEMPLATE
        .replace("{{CASE_LABEL}}", &escape_typst(label))
        .replace("{{ENGINEER}}", &escape_typst(engineer))
        .replace("{{JOB_ID}}", &escape_typst(job_id))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{SPAN_M}}", &format!("{:.2}", beam.span_m))
        .replace("{{LOAD_ROWS}}", &load_rows(&beam.loads))
        .replace("{{RA_KN}}", &format!("{:.2}", solution.reactions.ra_kn))
        .replace("{{RB_KN}}", &format!("{:.2}", solution.reactions.rb_kn))
        .replace("{{MAX_SHEAR_KN}}", &format!("{:.2}", solution.max_shear_kn))
        .replace(
            "{{MAX_SHEAR_POS_M}}",
            &format!("{:.2}", solution.max_shear_position_m),
        )
        .replace(
            "{{MAX_MOMENT_KNM}}",
            &format!("{:.2}", solution.max_moment_knm),
        )
        .replace(
            "{{MAX_MOMENT_POS_M}}",
            &format!("{:.2}", solution.max_moment_position_m),
        )
        .replace("{{PLOT_W}}", &format!("{PLOT_WIDTH_PT}"))
        .replace("{{PLOT_H}}", &format!("{PLOT_HEIGHT_PT}"))
        .replace("{{SFD_POINTS}}", &sfd_points)
        .replace("{{SFD_AXIS_Y}}", &format!("{sfd_axis_y:.2}"))
        .replace("{{BMD_POINTS}}", &bmd_points)
        .replace("{{BMD_AXIS_Y}}", &format!("{bmd_axis_y:.2}"));

    // Compile the Typst document
    let world = ReportWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        BeamError::render(format!(
            "Typst compilation failed: {}",
            error_msgs.join("; ")
        ))
    })?;

    // Render to PDF
    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        BeamError::render(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    Ok(pdf_bytes)
}

/// Build the load-table body rows.
fn load_rows(loads: &[Load]) -> String {
    if loads.is_empty() {
        return "  [--], [No loads], [--], [--],".to_string();
    }

    loads
        .iter()
        .enumerate()
        .map(|(i, load)| match load {
            Load::Point {
                magnitude_kn,
                position_m,
            } => format!(
                "  [{}], [Point], [{:.2} kN], [at {:.2} m],",
                i + 1,
                magnitude_kn,
                position_m
            ),
            Load::Udl {
                intensity_kn_per_m,
                start_m,
                end_m,
            } => format!(
                "  [{}], [UDL], [{:.2} kN/m], [{:.2} m to {:.2} m],",
                i + 1,
                intensity_kn_per_m,
                start_m,
                end_m
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scale a `(position, value)` series into plot-box coordinates.
///
/// Returns the Typst curve segments and the y of the zero axis, both in pt.
/// Typst's y grows downward, so the value axis is flipped. The value range
/// always includes zero so the axis stays inside the box.
fn plot_geometry(series: &[(f64, f64)], span_m: f64) -> (String, f64) {
    let mut min_v = 0.0f64;
    let mut max_v = 0.0f64;
    for &(_, v) in series {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    let range = max_v - min_v;
    let range = if range > 0.0 { range } else { 1.0 };

    let x_pt = |x: f64| x / span_m * PLOT_WIDTH_PT;
    let y_pt = |v: f64| (max_v - v) / range * PLOT_HEIGHT_PT;

    let mut segments = Vec::with_capacity(series.len());
    for (i, &(x, v)) in series.iter().enumerate() {
        let verb = if i == 0 { "curve.move" } else { "curve.line" };
        segments.push(format!(
            "      {}(({:.2}pt, {:.2}pt)),",
            verb,
            x_pt(x),
            y_pt(v)
        ));
    }

    (segments.join("\n"), y_pt(0.0))
}

fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
