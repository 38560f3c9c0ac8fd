use std::{
    cell::RefCell,
    collections::VecDeque,
    time::{Duration, Instant},
};

use bitvec::bitvec;
use itertools::Itertools;
use rand::{seq::SliceRandom, thread_rng};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cell::{Cell, CellState},
    grid::Grid,
    hint::{self, Hint},
    mine::MineType,
    settings::{self, ConfigError, LieMode, Settings},
};

/// Where in its lifecycle a game currently is.
///
/// `Won` and `Lost` are terminal; only starting a new game leaves them.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum GameState {
    #[default]
    NotStarted,
    InProgress,
    Paused,
    Won,
    Lost,
}

/// Wall-clock span of one game, closed once the game ends.
#[derive(Clone, Copy, Debug)]
pub struct TimeSpan {
    pub start: Instant,
    pub end: Option<Instant>,
}

impl TimeSpan {
    pub fn elapsed(&self) -> Duration {
        self.end
            .unwrap_or_else(Instant::now)
            .duration_since(self.start)
    }
}

/// Not enough hidden, mine-free cells to take the requested mine count.
///
/// Hitting this during a game is a contract violation: configuration
/// validation must reject any mine count the field cannot hold.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("not enough eligible cells to place all mines")]
pub struct PlacementExhausted;

/// A full description of one cell, as exposed to collaborators.
#[derive(Clone, Debug)]
pub struct CellSnapshot {
    pub coordinates: Vec<usize>,
    /// Only meaningful after a loss, or for debugging.
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mines: usize,
    pub hint: Hint,
}

struct HintCache {
    version: u64,
    hints: Vec<Option<Hint>>,
}

/// The engine orchestrating a minefield.
///
/// Owns the configuration, the grid arena and the game state machine. Every
/// operation runs to completion before the next one is accepted; derived
/// values are recomputed on query and memoized per state snapshot via a
/// version counter bumped on every mutation. Out-of-context calls (revealing
/// while paused, coordinates off the grid) are silently ignored.
pub struct Game {
    settings: Settings,
    grid: Option<Grid>,
    state: GameState,
    time: Option<TimeSpan>,
    mines_placed: bool,
    version: u64,
    hints: RefCell<HintCache>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            grid: None,
            state: GameState::NotStarted,
            time: None,
            mines_placed: false,
            version: 0,
            hints: RefCell::new(HintCache {
                version: 0,
                hints: Vec::new(),
            }),
        }
    }

    pub fn with_settings(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::new()
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn time(&self) -> Option<TimeSpan> {
        self.time
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.settings.dimensions
    }

    pub fn wrap(&self) -> &[bool] {
        &self.settings.wrap
    }

    /// Applies a new field shape and mine count.
    ///
    /// Rejected configurations leave the previously applied one untouched.
    pub fn configure(
        &mut self,
        dimensions: Vec<usize>,
        wrap: Vec<bool>,
        mines: usize,
    ) -> Result<(), ConfigError> {
        let mut candidate = self.settings.clone();
        candidate.dimensions = dimensions;
        candidate.wrap = wrap;
        candidate.mines = mines;
        candidate.validate()?;
        self.settings = candidate;
        self.bump_version();
        Ok(())
    }

    /// Selects which mine variants placement picks from.
    pub fn set_mine_catalog(&mut self, selection: Vec<MineType>) -> Result<(), ConfigError> {
        settings::validate_mine_selection(&selection)?;
        self.settings.mines_to_place = selection;
        self.bump_version();
        Ok(())
    }

    pub fn set_lazy_init(&mut self, lazy_init: bool) {
        self.settings.lazy_init = lazy_init;
        self.bump_version();
    }

    pub fn set_chording(&mut self, chording: bool) {
        self.settings.chording = chording;
        self.bump_version();
    }

    pub fn set_fail_on_wrong_flag(&mut self, fail_on_wrong_flag: bool) {
        self.settings.fail_on_wrong_flag = fail_on_wrong_flag;
        self.bump_version();
    }

    pub fn set_flag_compensation(&mut self, remove_flagged_mines: bool) {
        self.settings.remove_flagged_mines = remove_flagged_mines;
        self.bump_version();
    }

    pub fn set_lie_mode(&mut self, lie_mode: LieMode) {
        self.settings.lie_mode = lie_mode;
        self.bump_version();
    }

    /// Discards any previous field and starts over.
    ///
    /// Cells and adjacency are rebuilt from scratch; mines are placed right
    /// away unless lazy initialization defers them to the first reveal.
    pub fn start_new_game(&mut self) {
        self.bump_version();
        self.grid = Some(Grid::build(&self.settings.dimensions, &self.settings.wrap));
        self.mines_placed = false;
        if !self.settings.lazy_init {
            self.place_mines()
                .expect("a validated configuration should leave room for all mines");
        }
        self.state = GameState::InProgress;
        self.time = Some(TimeSpan {
            start: Instant::now(),
            end: None,
        });
        info!(
            dimensions = ?self.settings.dimensions,
            mines = self.settings.mines,
            "started a new game"
        );
    }

    /// Reveals the cell at the given coordinates.
    ///
    /// No-op unless the game is in progress and the cell is not flagged. On
    /// an already revealed cell this chords instead (when enabled). Unknown
    /// coordinates are ignored.
    pub fn reveal_cell(&mut self, coordinates: &[usize]) {
        let Some(index) = self
            .grid
            .as_ref()
            .and_then(|grid| grid.index_of(coordinates))
        else {
            return;
        };
        self.reveal_at(index);
        self.check_win();
    }

    /// Toggles the flag on the cell at the given coordinates.
    ///
    /// On an already revealed cell this cascade-flags its hidden neighbors
    /// instead (when chording is enabled and the counts account for them).
    pub fn flag_cell(&mut self, coordinates: &[usize]) {
        let Some(index) = self
            .grid
            .as_ref()
            .and_then(|grid| grid.index_of(coordinates))
        else {
            return;
        };
        self.flag_at(index);
        self.check_win();
    }

    pub fn pause(&mut self) {
        if self.state == GameState::InProgress {
            self.state = GameState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::InProgress;
        }
    }

    /// The configured mine count minus the number of standing flags.
    ///
    /// Negative once more flags are placed than mines exist.
    pub fn mines_remaining(&self) -> isize {
        self.settings.mines as isize - self.flagged_count() as isize
    }

    pub fn flagged_count(&self) -> usize {
        self.count_cells(Cell::is_flagged)
    }

    pub fn unrevealed_count(&self) -> usize {
        self.count_cells(|cell| !cell.is_revealed())
    }

    /// Cells that are neither revealed nor flagged.
    pub fn remaining_count(&self) -> usize {
        self.count_cells(Cell::is_hidden)
    }

    /// Snapshots of the whole field in arena order; empty before the first
    /// game.
    pub fn cells(&self) -> Vec<CellSnapshot> {
        match &self.grid {
            Some(grid) => (0..grid.len())
                .map(|index| self.snapshot_at(index))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn cell(&self, coordinates: &[usize]) -> Option<CellSnapshot> {
        let index = self.grid.as_ref()?.index_of(coordinates)?;
        Some(self.snapshot_at(index))
    }

    fn grid(&self) -> &Grid {
        self.grid
            .as_ref()
            .expect("a running game should have a grid")
    }

    fn grid_mut(&mut self) -> &mut Grid {
        self.grid
            .as_mut()
            .expect("a running game should have a grid")
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> usize {
        self.grid.as_ref().map_or(0, |grid| {
            grid.cells().iter().filter(|cell| predicate(cell)).count()
        })
    }

    fn reveal_at(&mut self, index: usize) {
        if self.state != GameState::InProgress {
            return;
        }
        let cell = self.grid().cell(index);
        if cell.is_flagged() {
            return;
        }
        if cell.is_revealed() && self.settings.chording {
            let grid = self.grid();
            if grid.adjacent_mines(index) == grid.neighbors_in(index, CellState::Flagged).count() {
                let hidden = grid.neighbors_in(index, CellState::Hidden).collect_vec();
                for neighbor in hidden {
                    self.reveal_at(neighbor);
                }
            }
            return;
        }

        self.bump_version();
        self.grid_mut()
            .cell_mut(index)
            .set_state(CellState::Revealed);
        // Lazy placement runs after the reveal so the candidate pool excludes
        // this cell, making the first reveal of a game safe.
        if !self.mines_placed {
            self.place_mines()
                .expect("a validated configuration should leave room for all mines");
        }
        let grid = self.grid();
        if !grid.cell(index).is_mine() && grid.adjacent_mines(index) == 0 {
            self.zero_spread(index);
        }
        if self.grid().cell(index).is_mine() {
            self.finish(GameState::Lost);
        }
    }

    fn flag_at(&mut self, index: usize) {
        if self.state != GameState::InProgress {
            return;
        }
        let grid = self.grid();
        if grid.cell(index).is_revealed() {
            let hidden = grid.neighbors_in(index, CellState::Hidden).collect_vec();
            let flagged = grid.neighbors_in(index, CellState::Flagged).count();
            if self.settings.chording && grid.adjacent_mines(index) == hidden.len() + flagged {
                for neighbor in hidden {
                    self.flag_at(neighbor);
                }
            }
            return;
        }

        self.bump_version();
        let cell = self.grid_mut().cell_mut(index);
        let toggled = match cell.state() {
            CellState::Hidden => CellState::Flagged,
            _ => CellState::Hidden,
        };
        cell.set_state(toggled);
        if toggled == CellState::Flagged
            && self.settings.fail_on_wrong_flag
            && !self.grid().cell(index).is_mine()
        {
            self.finish(GameState::Lost);
        }
    }

    /// Breadth-first auto-reveal of the zero-hint region around `start`.
    ///
    /// Never crosses into or reveals mine cells; terminates because the
    /// visited set only grows and is bounded by the cell count.
    fn zero_spread(&mut self, start: usize) {
        let grid = self
            .grid
            .as_mut()
            .expect("a running game should have a grid");
        let mut visited = bitvec![0; grid.len()];
        let mut queue = VecDeque::from([start]);
        visited.set(start, true);
        while let Some(index) = queue.pop_front() {
            let spread_to = grid
                .neighbors_in(index, CellState::Hidden)
                .filter(|&neighbor| !visited[neighbor] && !grid.cell(neighbor).is_mine())
                .collect_vec();
            for neighbor in spread_to {
                visited.set(neighbor, true);
                grid.cell_mut(neighbor).set_state(CellState::Revealed);
                if grid.adjacent_mines(neighbor) == 0 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// Places the configured number of mines into hidden, mine-free cells,
    /// each drawn uniformly from the catalog selection.
    fn place_mines(&mut self) -> Result<(), PlacementExhausted> {
        let mine_count = self.settings.mines;
        let catalog = self.settings.mines_to_place.clone();
        let grid = self
            .grid
            .as_mut()
            .expect("mines should only be placed into an existing grid");
        let mut rng = thread_rng();
        for _ in 0..mine_count {
            let candidates = grid
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_mine() && !cell.is_revealed())
                .map(|(index, _)| index)
                .collect_vec();
            let &index = candidates.choose(&mut rng).ok_or(PlacementExhausted)?;
            let mine = *catalog
                .choose(&mut rng)
                .expect("a validated mine selection should not be empty");
            grid.cell_mut(index).set_mine(mine);
        }
        self.mines_placed = true;
        debug!(mines = mine_count, "placed mines");
        Ok(())
    }

    fn check_win(&mut self) {
        if self.state != GameState::InProgress {
            return;
        }
        // Counting *all* non-revealed cells means a game can be won with
        // flags still standing, as long as they stand on mines.
        if self.unrevealed_count() == self.settings.mines {
            self.finish(GameState::Won);
        }
    }

    fn finish(&mut self, state: GameState) {
        self.state = state;
        if let Some(time) = &mut self.time {
            time.end = Some(Instant::now());
        }
        info!(?state, "game over");
    }

    fn snapshot_at(&self, index: usize) -> CellSnapshot {
        let grid = self.grid();
        let cell = grid.cell(index);
        CellSnapshot {
            coordinates: cell.coordinates().to_vec(),
            is_mine: cell.is_mine(),
            is_revealed: cell.is_revealed(),
            is_flagged: cell.is_flagged(),
            adjacent_mines: grid.adjacent_mines(index),
            hint: self.hint_at(index),
        }
    }

    fn hint_at(&self, index: usize) -> Hint {
        let grid = self.grid();
        let mut cache = self.hints.borrow_mut();
        if cache.version != self.version || cache.hints.len() != grid.len() {
            cache.version = self.version;
            cache.hints.clear();
            cache.hints.resize(grid.len(), None);
        }
        if let Some(hint) = cache.hints[index] {
            return hint;
        }
        let hint = self.compute_hint(index);
        cache.hints[index] = Some(hint);
        hint
    }

    fn compute_hint(&self, index: usize) -> Hint {
        let grid = self.grid();
        let cell = grid.cell(index);
        let chain = self.settings.hint_chain();
        let mut rng = thread_rng();
        let base = hint::evaluate(&chain, grid, cell.adjacent(), cell.coordinates(), &mut rng);
        if !self.settings.remove_flagged_mines {
            return base;
        }
        // Trusting your own flags: an independent evaluation restricted to
        // flagged neighbors, subtracted from the full result.
        let flagged = grid.neighbors_in(index, CellState::Flagged).collect_vec();
        let compensation = hint::evaluate(&chain, grid, &flagged, cell.coordinates(), &mut rng);
        match (base, compensation) {
            (Hint::Value(base), Hint::Value(compensation)) => Hint::Value(base - compensation),
            (base, _) => base,
        }
    }
}
