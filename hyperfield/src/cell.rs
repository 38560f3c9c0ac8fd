use crate::mine::MineType;

/// The reveal/flag state of a single cell.
///
/// `Hidden` and `Flagged` toggle back and forth; `Revealed` is terminal for
/// the rest of the game.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// One addressable unit of the minefield.
///
/// All cells are owned by the grid arena; `adjacent` holds indices into that
/// arena rather than owning references, so a whole field can be torn down as
/// one unit.
#[derive(Clone, Debug)]
pub struct Cell {
    coordinates: Vec<usize>,
    mine: Option<MineType>,
    state: CellState,
    adjacent: Vec<usize>,
}

impl Cell {
    pub(crate) fn new(coordinates: Vec<usize>) -> Self {
        Self {
            coordinates,
            mine: None,
            state: CellState::Hidden,
            adjacent: Vec::new(),
        }
    }

    /// The coordinate tuple assigned at creation, one entry per axis.
    pub fn coordinates(&self) -> &[usize] {
        &self.coordinates
    }

    pub fn mine(&self) -> Option<MineType> {
        self.mine
    }

    pub fn is_mine(&self) -> bool {
        self.mine.is_some()
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_hidden(&self) -> bool {
        self.state == CellState::Hidden
    }

    pub fn is_flagged(&self) -> bool {
        self.state == CellState::Flagged
    }

    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    /// Indices of all neighboring cells, sorted and free of duplicates.
    ///
    /// Computed exactly once after grid construction and never mutated
    /// afterwards.
    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }

    pub(crate) fn set_adjacent(&mut self, adjacent: Vec<usize>) {
        self.adjacent = adjacent;
    }

    /// Assigns a mine to this cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell already holds a mine; a mine is set at most once per
    /// game instance.
    pub(crate) fn set_mine(&mut self, mine: MineType) {
        assert!(self.mine.is_none(), "mine should be set at most once");
        self.mine = Some(mine);
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }
}
