//! Grid layout for story frames.
//!
//! Column count and spans depend only on the number of frames. Frames flow
//! left to right and wrap to a new row when a cell does not fit, the way CSS
//! grid auto-placement does.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of grid columns for a story with `frame_count` frames.
///
/// # Examples
///
/// ```
/// use omni_story::grid_columns;
///
/// assert_eq!(grid_columns(1), 1);
/// assert_eq!(grid_columns(3), 2);
/// assert_eq!(grid_columns(10), 3);
/// ```
pub fn grid_columns(frame_count: usize) -> usize {
    match frame_count {
        0 | 1 => 1,
        2..=4 => 2,
        _ => 3,
    }
}

/// How many columns a frame occupies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Span {
    /// One column
    #[default]
    Normal,
    /// Two columns
    Double,
}

impl Span {
    /// Columns covered.
    pub fn columns(&self) -> usize {
        match self {
            Span::Normal => 1,
            Span::Double => 2,
        }
    }
}

/// Span of frame `index` in a story of `frame_count` frames.
///
/// The first frame is doubled when the count would otherwise leave a ragged
/// first row: 3, 5, and 7 or more frames.
pub fn span_override(frame_count: usize, index: usize) -> Span {
    if index == 0 && (frame_count == 3 || frame_count == 5 || frame_count >= 7) {
        Span::Double
    } else {
        Span::Normal
    }
}

/// Position of one frame on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// 0-based row
    pub row: usize,
    /// 0-based first column
    pub column: usize,
    /// Columns covered
    pub span: Span,
}

/// Column count plus span overrides for one frame count.
///
/// # Examples
///
/// ```
/// use omni_story::{LayoutPlan, Span};
///
/// let plan = LayoutPlan::for_frames(5);
/// assert_eq!(plan.column_count(), 3);
/// assert_eq!(plan.span(0), Span::Double);
/// assert_eq!(plan.rows(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    frame_count: usize,
    column_count: usize,
    span_overrides: BTreeMap<usize, Span>,
}

impl LayoutPlan {
    /// Plan for `frame_count` frames.
    pub fn for_frames(frame_count: usize) -> Self {
        let span_overrides = (0..frame_count)
            .map(|index| (index, span_override(frame_count, index)))
            .filter(|(_, span)| *span != Span::Normal)
            .collect();
        Self {
            frame_count,
            column_count: grid_columns(frame_count),
            span_overrides,
        }
    }

    /// Frames covered by this plan.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Grid columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Frames that do not use [`Span::Normal`].
    pub fn span_overrides(&self) -> &BTreeMap<usize, Span> {
        &self.span_overrides
    }

    /// Span of frame `index`.
    pub fn span(&self, index: usize) -> Span {
        self.span_overrides
            .get(&index)
            .copied()
            .unwrap_or_default()
    }

    /// Cell for every frame, in frame order.
    pub fn placements(&self) -> Vec<Placement> {
        let indices: Vec<usize> = (0..self.frame_count).collect();
        self.place(&indices)
    }

    /// Cells for a subset of frames, flowed in the order given.
    ///
    /// Each frame keeps the span of its original index; absent frames leave
    /// no gap, matching how a grid collapses around missing items.
    pub fn place(&self, indices: &[usize]) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(indices.len());
        let (mut row, mut column) = (0, 0);

        for &index in indices {
            let span = self.span(index);
            let width = span.columns().min(self.column_count);
            if column + width > self.column_count {
                row += 1;
                column = 0;
            }
            placements.push(Placement { row, column, span });
            column += width;
            if column >= self.column_count {
                row += 1;
                column = 0;
            }
        }
        placements
    }

    /// Number of grid rows used.
    pub fn rows(&self) -> usize {
        self.placements()
            .last()
            .map(|last| last.row + 1)
            .unwrap_or(0)
    }
}
