//! LED strip mapping
//!
//! A track is shown as a row of discrete cells. Queued pucks stack up from
//! each end, active pucks light the cell under them, and an extended paddle
//! lights the end cell on its side.

use serde::{Deserialize, Serialize};

use crate::sim::{Side, Track};

/// Layout of the reference window (pixels)
pub const CELL_RADIUS: u32 = 5;
pub const CELL_GAP: u32 = 10;
pub const EDGE_OFFSET: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Off,
    Puck,
    Queued,
    Paddle,
}

impl Cell {
    pub fn as_char(self) -> char {
        match self {
            Cell::Off => '.',
            Cell::Puck => 'o',
            Cell::Queued => '*',
            Cell::Paddle => '|',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    cells: usize,
}

impl Strip {
    pub fn new(cells: usize) -> Self {
        Self {
            cells: cells.max(1),
        }
    }

    /// How many cells fit across a window `pixel_width` wide
    pub fn led_count(pixel_width: u32) -> usize {
        let usable = (pixel_width + CELL_GAP).saturating_sub(2 * EDGE_OFFSET);
        (usable / (2 * CELL_RADIUS + CELL_GAP)) as usize
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Cell under a track position
    pub fn cell_index(&self, position: f64, width: f64) -> usize {
        let index = (position / width * self.cells as f64).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.cells - 1)
        }
    }

    pub fn render(&self, track: &Track, time: f64) -> Vec<Cell> {
        let mut cells = vec![Cell::Off; self.cells];

        for position in track.active_pucks().iter().filter_map(|p| p.position) {
            cells[self.cell_index(position, track.width())] = Cell::Puck;
        }

        let last = self.cells - 1;
        for i in 0..track.queued_count(Side::Left).min(self.cells) {
            cells[i] = Cell::Queued;
        }
        for i in 0..track.queued_count(Side::Right).min(self.cells) {
            cells[last - i] = Cell::Queued;
        }

        if track.paddle(Side::Left).is_active(time) {
            cells[0] = Cell::Paddle;
        }
        if track.paddle(Side::Right).is_active(time) {
            cells[last] = Cell::Paddle;
        }

        cells
    }

    pub fn to_ascii(cells: &[Cell]) -> String {
        cells.iter().map(|c| c.as_char()).collect()
    }
}
