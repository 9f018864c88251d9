use rand::Rng;
use std::fmt;
use tilerl_core::Action;

/// Number of rows and columns.
pub const SIZE: usize = 4;

/// Number of cells.
pub const N_CELLS: usize = SIZE * SIZE;

/// Tiles of a 2048 board in row-major order; 0 is an empty cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Board([u32; N_CELLS]);

/// Indices of the `k`-th line along which tiles move, starting from the
/// side they move towards.
fn line_indices(action: Action, k: usize) -> [usize; SIZE] {
    let mut ixs = [0; SIZE];
    for (i, ix) in ixs.iter_mut().enumerate() {
        *ix = match action {
            Action::Left => SIZE * k + i,
            Action::Right => SIZE * k + (SIZE - 1 - i),
            Action::Up => SIZE * i + k,
            Action::Down => SIZE * (SIZE - 1 - i) + k,
        };
    }
    ixs
}

/// Slides the tiles of a line to its head and merges equal neighbours once.
///
/// Returns the new line and the sum of the merged tiles.
fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let mut out = [0; SIZE];
    let mut points = 0;
    let mut n = 0;
    let mut mergeable = false;

    for v in line.into_iter().filter(|&v| v != 0) {
        if mergeable && out[n - 1] == v {
            out[n - 1] *= 2;
            points += out[n - 1];
            mergeable = false;
        } else {
            out[n] = v;
            n += 1;
            mergeable = true;
        }
    }
    (out, points)
}

impl Board {
    /// Creates a board from tiles in row-major order.
    pub fn new(cells: [u32; N_CELLS]) -> Self {
        Self(cells)
    }

    /// Tiles in row-major order.
    pub fn cells(&self) -> &[u32; N_CELLS] {
        &self.0
    }

    /// Tile at the given row and column.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[SIZE * row + col]
    }

    /// Largest tile on the board.
    pub fn max_tile(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    fn empty_cells(&self) -> Vec<usize> {
        (0..N_CELLS).filter(|&i| self.0[i] == 0).collect()
    }

    /// Moves all tiles in the direction of `action`.
    ///
    /// Returns the points gained by merges, or `None` if the board did not
    /// change.
    pub fn shift(&mut self, action: Action) -> Option<u32> {
        let before = self.0;
        let mut points = 0;

        for k in 0..SIZE {
            let ixs = line_indices(action, k);
            let (line, p) = slide_line(ixs.map(|ix| self.0[ix]));
            for (ix, v) in ixs.into_iter().zip(line) {
                self.0[ix] = v;
            }
            points += p;
        }

        (self.0 != before).then_some(points)
    }

    /// Returns `true` if some move would change the board.
    pub fn has_legal_move(&self) -> bool {
        if self.0.contains(&0) {
            return true;
        }
        (0..SIZE).any(|r| {
            (0..SIZE).any(|c| {
                let v = self.get(r, c);
                let right = c + 1 < SIZE && self.get(r, c + 1) == v;
                let below = r + 1 < SIZE && self.get(r + 1, c) == v;
                right || below
            })
        })
    }

    /// Puts a 2 (probability 0.9) or a 4 on a random empty cell.
    ///
    /// Returns `false` if the board is full.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return false;
        }
        let ix = empty[rng.gen_range(0..empty.len())];
        self.0[ix] = if rng.gen::<f64>() < 0.9 { 2 } else { 4 };
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.chunks(SIZE).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let row = row.iter().map(|v| format!("{:>5}", v)).collect::<String>();
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}
