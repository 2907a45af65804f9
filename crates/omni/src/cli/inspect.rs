//! Offline inspection commands.

use omni::{LayoutPlan, Span, StoryType};
use std::fmt::Write as _;
use strum::IntoEnumIterator;

/// Print the grid plan for `frames` frames.
pub fn print_layout(frames: usize) {
    print!("{}", layout_table(frames));
}

/// Print every story type with its label.
pub fn list_types() {
    for story_type in StoryType::iter() {
        println!("{:<12} {}", story_type.as_ref(), story_type.label());
    }
}

fn layout_table(frames: usize) -> String {
    let plan = LayoutPlan::for_frames(frames);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} frames: {} columns, {} rows",
        plan.frame_count(),
        plan.column_count(),
        plan.rows()
    );
    for (index, placement) in plan.placements().iter().enumerate() {
        let marker = match placement.span {
            Span::Double => " (double)",
            Span::Normal => "",
        };
        let _ = writeln!(
            out,
            "  frame {}: row {}, col {}{}",
            index + 1,
            placement.row + 1,
            placement.column + 1,
            marker
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_frames_double_the_first() {
        let table = layout_table(5);
        assert!(table.starts_with("5 frames: 3 columns, 2 rows"));
        assert!(table.contains("frame 1: row 1, col 1 (double)"));
        assert!(table.contains("frame 5: row 2, col 3\n"));
    }

    #[test]
    fn zero_frames_has_no_rows() {
        assert_eq!(layout_table(0), "0 frames: 1 columns, 0 rows\n");
    }
}
