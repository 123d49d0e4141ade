#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering contracts for Schelling simulation adapters.
//!
//! Frames are rendered from [`CitySnapshot`] values so adapters never hold a
//! borrow of the engine while presenting.

use anyhow::{Context, Result as AnyResult};
use schelling_core::CitySnapshot;
use std::io::Write;
use thiserror::Error;

/// Marker printed for empty cells unless a style overrides it.
pub const DEFAULT_EMPTY_MARKER: char = 'X';

/// Suffix printed after a resident that does not meet the threshold.
const UNSATISFIED_SUFFIX: char = 'U';

/// Controls how cells are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStyle {
    annotate: bool,
    empty_marker: char,
}

impl FrameStyle {
    /// Creates a style, rejecting whitespace empty markers that would make the grid ambiguous.
    pub fn new(annotate: bool, empty_marker: char) -> Result<Self, RenderingError> {
        if empty_marker.is_whitespace() {
            return Err(RenderingError::InvalidEmptyMarker { empty_marker });
        }
        Ok(Self {
            annotate,
            empty_marker,
        })
    }

    /// Whether unsatisfied residents carry the `U` suffix.
    #[must_use]
    pub const fn annotate(&self) -> bool {
        self.annotate
    }

    /// Marker printed for empty cells.
    #[must_use]
    pub const fn empty_marker(&self) -> char {
        self.empty_marker
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            annotate: true,
            empty_marker: DEFAULT_EMPTY_MARKER,
        }
    }
}

/// Writes the grid of `snapshot`, one line per row.
///
/// Every cell takes two columns: the resident's type followed by `U` when it
/// is unsatisfied and annotation is enabled, or a space otherwise. Empty cells
/// print the style's marker followed by a space.
#[must_use]
pub fn render_grid(snapshot: &CitySnapshot, style: FrameStyle) -> String {
    let mut out = String::with_capacity(snapshot.cells.len() * 2 + snapshot.height);
    for row in snapshot.rows() {
        for cell in row {
            match cell {
                Some(occupant) => {
                    out.push_str(&occupant.kind.to_string());
                    if style.annotate && !occupant.satisfied {
                        out.push(UNSATISFIED_SUFFIX);
                    } else {
                        out.push(' ');
                    }
                }
                None => {
                    out.push(style.empty_marker);
                    out.push(' ');
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Writes a full status frame: iteration header, grid, and work-list counters.
#[must_use]
pub fn render_frame(snapshot: &CitySnapshot, style: FrameStyle) -> String {
    format!(
        "Iteration: {}\n{}Threshold: {} Neighborhood radius: {}\nUnsatisfied residents: {} Open Locations: {}",
        snapshot.iteration,
        render_grid(snapshot, style),
        snapshot.threshold,
        snapshot.radius,
        snapshot.unsatisfied,
        snapshot.open_locations,
    )
}

/// Destination for rendered frames.
pub trait RenderingBackend {
    /// Presents the frame describing `snapshot`.
    fn present(&mut self, snapshot: &CitySnapshot) -> AnyResult<()>;
}

/// Backend that writes text frames to any [`Write`] sink, each followed by a newline.
#[derive(Debug)]
pub struct TextBackend<W> {
    sink: W,
    style: FrameStyle,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `sink` with `style`.
    pub const fn new(sink: W, style: FrameStyle) -> Self {
        Self { sink, style }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, snapshot: &CitySnapshot) -> AnyResult<()> {
        writeln!(self.sink, "{}", render_frame(snapshot, self.style))
            .with_context(|| format!("failed to write frame {}", snapshot.iteration))?;
        self.sink.flush().context("failed to flush frame output")
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// Whitespace cannot mark an empty cell.
    #[error("empty cell marker must be visible (received {empty_marker:?})")]
    InvalidEmptyMarker {
        /// Marker that failed validation.
        empty_marker: char,
    },
}
