//! One episode of the falling-block game: a walled field, a ship pinned to
//! the bottom row, and block runs that drop one row per tick. The engine is
//! a pure step machine; pacing belongs to whatever driver calls it.

use crate::random::{ChanceEvent, Happens};
use rand::{Rng, RngCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Space,
    Block,
    Ship,
    Wall,
}

/// Steering input for a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    Straight,
}

pub type Field = Vec<Vec<Cell>>;

/// Features of the nearest block run, relative to the ship's column.
/// Offsets are fractional: an even-width run centers between two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub nearest_block_offset: f64,
    pub nearest_block_width: usize,
    pub widest_gap_offset: f64,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            nearest_block_offset: 1.,
            nearest_block_width: 1,
            widest_gap_offset: 0.,
        }
    }
}

/// Episode progress as of the last step. Terminal once `crashed` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub crashed: bool,
    pub score: u32,
    pub movements: u32,
}

/// A single episode. Invariants while running: every row is wall-capped on
/// both ends, and exactly one ship cell sits in the bottom (active) row.
/// A crash is terminal; every later step is a no-op reporting the same
/// outcome. Dropping the value ends the episode.
#[derive(Debug, Clone)]
pub struct Game {
    field: Field,
    width: usize,
    height: usize,
    score: u32,
    movements: u32,
    ticks: u64,
    spawned: bool,
    crashed: bool,
}

fn empty_row(width: usize) -> Vec<Cell> {
    let mut row = vec![Cell::Space; width];
    row[0] = Cell::Wall;
    row[width - 1] = Cell::Wall;
    row
}

impl Game {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width >= 5, "need room for a 3-wide run between walls");
        debug_assert!(height >= 2);
        let mut field: Field = (0..height).map(|_| empty_row(width)).collect();
        field[height - 1][width / 2] = Cell::Ship;
        Self {
            field,
            width,
            height,
            score: 0,
            movements: 0,
            ticks: 0,
            spawned: false,
            crashed: false,
        }
    }

    /// Advance one frame: rows shift down, the ship drops into the new
    /// active row (or crashes into whatever occupies its column), and on
    /// even ticks a block run may be stamped into the fresh top row.
    pub fn tick(&mut self, rng: &mut (impl RngCore + Happens)) -> Outcome {
        if self.crashed {
            return self.outcome();
        }

        self.field.insert(0, empty_row(self.width));
        let retired = self.field.pop().unwrap();
        let ship = retired.iter().position(|c| *c == Cell::Ship).unwrap();

        let active = self.height - 1;
        if self.field[active][ship] != Cell::Space {
            self.crashed = true;
            return self.outcome();
        }
        self.field[active][ship] = Cell::Ship;

        if self.ticks % 2 == 0 && rng.happens(ChanceEvent::SpawnBlock) {
            self.spawn_run(rng);
        }
        self.score += 1;
        self.ticks += 1;
        self.outcome()
    }

    /// Apply one steering decision. Straight costs nothing; Left/Right
    /// count as a movement even when the destination cell crashes the ship.
    pub fn steer(&mut self, steer: Steer) -> Outcome {
        if self.crashed || steer == Steer::Straight {
            return self.outcome();
        }

        let delta: isize = if steer == Steer::Left { -1 } else { 1 };
        let active = self.height - 1;
        let ship = self.ship_column();
        self.movements += 1;

        let dest = (ship as isize + delta) as usize;
        self.field[active][ship] = Cell::Space;
        if self.field[active][dest] != Cell::Space {
            self.crashed = true;
            return self.outcome();
        }
        self.field[active][dest] = Cell::Ship;
        self.outcome()
    }

    /// Summarize the nearest block run, scanning from the active row up.
    /// The gap target is a fixed guess, not a search: whichever side of the
    /// run's center has more room, aim for the middle of that side. Targets
    /// are fractional on purpose; an even run centers between columns, and
    /// genomes are trained against exactly this arithmetic.
    pub fn sensors(&self) -> SensorReading {
        if self.crashed {
            return SensorReading::default();
        }
        let ship = self.ship_column() as f64;
        let w = self.width as f64;

        for row in self.field.iter().rev() {
            let Some(block) = row.iter().position(|c| *c == Cell::Block) else {
                continue;
            };
            let mut width = 1usize;
            if row.get(block + 1) == Some(&Cell::Block) {
                width += 1;
            }
            if row.get(block + 2) == Some(&Cell::Block) {
                width += 1;
            }

            let half = (width as f64 - 1.) / 2.;
            let center = block as f64 + half;
            let target = if center >= w / 2. {
                ((center - 1.) / 2.).floor() + 1. - half
            } else {
                ((w - 2. - center) / 2.).round() + center + half
            };

            return SensorReading {
                nearest_block_offset: ship - center,
                nearest_block_width: width,
                widest_gap_offset: ship - target,
            };
        }

        SensorReading::default()
    }

    /// Read-only view of the grid, for display drivers.
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            crashed: self.crashed,
            score: self.score,
            movements: self.movements,
        }
    }

    pub fn crashed(&self) -> bool {
        self.crashed
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn ship_column(&self) -> usize {
        self.field[self.height - 1]
            .iter()
            .position(|c| *c == Cell::Ship)
            .unwrap()
    }

    /// Stamp one block run into the top row: 15% three wide, else 35% two
    /// wide, else one. The first run of an episode lands in the ship's
    /// column so idling is never a winning strategy.
    fn spawn_run(&mut self, rng: &mut (impl RngCore + Happens)) {
        let run = if rng.happens(ChanceEvent::SpawnTriple) {
            3
        } else if rng.happens(ChanceEvent::SpawnDouble) {
            2
        } else {
            1
        };

        let start = if run == 1 && !self.spawned {
            self.ship_column()
        } else {
            rng.random_range(1..self.width - run)
        };
        for cell in &mut self.field[0][start..start + run] {
            *cell = Cell::Block;
        }
        self.spawned = true;
    }
}
