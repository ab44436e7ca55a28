use numera_core::{House, Position};

/// Row/column symmetry for line-based patterns.
///
/// A pattern found on base rows and cover columns has a mirror image on base columns and
/// cover rows; searches are written once against this trait.
pub(super) trait AxisOps {
    /// Plural name of the base lines.
    const LINES: &'static str;

    /// Returns the base line `index`.
    fn line(index: u8) -> House;

    /// Returns the cross line `index`.
    fn cross(index: u8) -> House;

    fn make_pos(line: u8, cross: u8) -> Position;
}

#[derive(Debug, Clone, Copy)]
pub(super) struct RowAxis;

#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnAxis;

impl AxisOps for RowAxis {
    const LINES: &'static str = "rows";

    #[inline]
    fn line(index: u8) -> House {
        House::Row { y: index }
    }

    #[inline]
    fn cross(index: u8) -> House {
        House::Column { x: index }
    }

    #[inline]
    fn make_pos(line: u8, cross: u8) -> Position {
        Position::new(cross, line)
    }
}

impl AxisOps for ColumnAxis {
    const LINES: &'static str = "columns";

    #[inline]
    fn line(index: u8) -> House {
        House::Column { x: index }
    }

    #[inline]
    fn cross(index: u8) -> House {
        House::Row { y: index }
    }

    #[inline]
    fn make_pos(line: u8, cross: u8) -> Position {
        Position::new(line, cross)
    }
}
