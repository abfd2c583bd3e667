/// Integer grid coordinate: `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A found route plus a cursor at the cell currently being walked to.
///
/// The cursor only moves forward. Once it passes the last cell the path is
/// finished and [`Path::current`] returns `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    cells: Vec<Cell>,
    cursor: usize,
}

impl Path {
    /// `None` for an empty cell list; a path always has a start.
    pub fn new(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self { cells, cursor: 0 })
    }

    pub fn current(&self) -> Option<Cell> {
        self.cells.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.cells.len() {
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.cells.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_list_is_not_a_path() {
        assert!(Path::new(Vec::new()).is_none());
    }

    #[test]
    fn endpoints_do_not_move_with_the_cursor() {
        let mut path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)]).unwrap();
        path.advance();
        assert_eq!(path.first(), Some(Cell::new(0, 0)));
        assert_eq!(path.last(), Some(Cell::new(1, 1)));
    }

    #[test]
    fn cursor_walks_forward_and_stops_past_the_end() {
        let mut path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0)]).unwrap();
        assert_eq!(path.current(), Some(Cell::new(0, 0)));
        path.advance();
        assert_eq!(path.current(), Some(Cell::new(1, 0)));
        assert!(!path.is_finished());
        path.advance();
        path.advance();
        assert_eq!(path.cursor(), 2);
        assert!(path.is_finished());
        assert_eq!(path.current(), None);
    }
}
