#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete-event water spread system.
//!
//! Water stays dormant for a configurable delay after a round starts, then
//! appears at the origin and floods open cells one queued front at a time.
//! Every front waits for a randomized dwell derived from the spread rate of its
//! direction class before it is allowed to wet its dry neighbours.

use std::{collections::VecDeque, f64::consts::E, time::Duration};

use floating_maze_core::{
    CellCoord, Direction, Maze, SpreadDirection, WaterEvent, WaterGrid, WaterParameters,
    WaterTuning,
};
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha stream reserved for water timing so it never overlaps maze carving.
pub const WATER_RNG_STREAM: u64 = 0x5741_5445_52;

/// Chance scale of the dwell discount draw.
const DISCOUNT_CHANCE: f64 = 0.25;

/// Spread rates for a round: `base * ln(e + round)`.
#[must_use]
pub fn schedule_rates(tuning: &WaterTuning, round: u32) -> WaterParameters {
    let factor = (E + f64::from(round)).ln();
    WaterParameters::new(tuning.normal_rate * factor, tuning.downward_rate * factor)
}

/// Creates the water random stream for a round seed, or from entropy when absent.
#[must_use]
pub fn water_rng(seed: Option<u64>) -> ChaCha8Rng {
    let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    rng.set_stream(WATER_RNG_STREAM);
    rng
}

/// Advances the spread process by `dt_secs` seconds.
///
/// Fronts are consumed in FIFO order while the accumulated time covers their
/// dwell. Newly wet cells are appended to `flooded` in discovery order. A
/// non-positive or non-finite rate stalls the queue instead of spinning.
pub fn advance_water<R: Rng + ?Sized>(
    maze: &Maze,
    grid: &mut WaterGrid,
    queue: &mut VecDeque<WaterEvent>,
    parameters: &mut WaterParameters,
    dt_secs: f64,
    rng: &mut R,
    flooded: &mut Vec<CellCoord>,
) {
    parameters.elapsed += dt_secs;

    while let Some(front) = queue.front().copied() {
        let rate = parameters.rate_for(front.direction);
        if !rate.is_finite() || rate <= 0.0 {
            break;
        }

        let jitter = rng.gen::<f64>() / rate;
        if rng.gen::<f64>() * DISCOUNT_CHANCE > rng.gen::<f64>() {
            let discount = rng.gen::<f64>() * DISCOUNT_CHANCE / rate;
            parameters.elapsed = (parameters.elapsed - discount).max(0.0);
        }

        let dwell = 1.0 / rate + jitter;
        if parameters.elapsed < dwell {
            break;
        }

        let _ = queue.pop_front();
        parameters.elapsed -= dwell;

        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        for direction in directions {
            let Some(next) = front.cell.step(direction, 1) else {
                continue;
            };
            if !maze.is_passable(next) || grid.is_wet(next) {
                continue;
            }

            let _ = grid.flood(next);
            let class = if direction.is_downward() {
                SpreadDirection::Downward
            } else {
                SpreadDirection::Normal
            };
            queue.push_back(WaterEvent::new(next, class));
            flooded.push(next);
        }
    }
}

/// Result of one [`WaterSimulator::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaterPhase {
    /// The delay has not yet run out.
    Dormant,
    /// The origin turned wet during this update.
    Released,
    /// Fronts were processed.
    Spreading,
}

/// Water state for a single round.
#[derive(Clone, Debug)]
pub struct WaterSimulator {
    tuning: WaterTuning,
    origin: CellCoord,
    grid: WaterGrid,
    queue: VecDeque<WaterEvent>,
    parameters: WaterParameters,
    rng: ChaCha8Rng,
    released: bool,
}

impl WaterSimulator {
    /// Dormant water for a fresh round on `maze`.
    #[must_use]
    pub fn for_round(maze: &Maze, tuning: WaterTuning, round: u32, seed: Option<u64>) -> Self {
        Self {
            tuning,
            origin: maze.origin(),
            grid: WaterGrid::dry(maze.dimensions()),
            queue: VecDeque::new(),
            parameters: schedule_rates(&tuning, round),
            rng: water_rng(seed),
            released: false,
        }
    }

    /// Rebuilds a simulator from persisted state. Any wet cell means the
    /// water was already released.
    #[must_use]
    pub fn from_parts(
        maze: &Maze,
        tuning: WaterTuning,
        grid: WaterGrid,
        queue: VecDeque<WaterEvent>,
        parameters: WaterParameters,
        seed: Option<u64>,
    ) -> Self {
        let released = grid.wet_count() > 0;
        Self {
            tuning,
            origin: maze.origin(),
            grid,
            queue,
            parameters,
            rng: water_rng(seed),
            released,
        }
    }

    /// Wets the origin and enqueues its first front. Does nothing once released.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        if self.grid.flood(self.origin) {
            self.queue
                .push_back(WaterEvent::new(self.origin, SpreadDirection::Normal));
        }
        debug!("water released at {:?}", self.origin);
        true
    }

    /// Spreads water by `dt` without consulting the delay.
    pub fn advance(&mut self, maze: &Maze, dt: Duration, flooded: &mut Vec<CellCoord>) {
        advance_water(
            maze,
            &mut self.grid,
            &mut self.queue,
            &mut self.parameters,
            dt.as_secs_f64(),
            &mut self.rng,
            flooded,
        );
    }

    /// Runs one tick given the round time elapsed including `dt`.
    ///
    /// Water is released on the first tick where `round_elapsed` strictly
    /// exceeds the delay; that tick does not spread.
    pub fn update(
        &mut self,
        maze: &Maze,
        round_elapsed: Duration,
        dt: Duration,
        flooded: &mut Vec<CellCoord>,
    ) -> WaterPhase {
        if self.released {
            self.advance(maze, dt, flooded);
            return WaterPhase::Spreading;
        }

        if round_elapsed > self.tuning.delay && self.release() {
            flooded.push(self.origin);
            return WaterPhase::Released;
        }

        WaterPhase::Dormant
    }

    /// Reports whether the origin has been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Cell the water starts from.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Current wet/dry grid.
    #[must_use]
    pub const fn grid(&self) -> &WaterGrid {
        &self.grid
    }

    /// Pending fronts in discovery order.
    #[must_use]
    pub const fn queue(&self) -> &VecDeque<WaterEvent> {
        &self.queue
    }

    /// Accumulated time and active rates.
    #[must_use]
    pub const fn parameters(&self) -> WaterParameters {
        self.parameters
    }

    /// Tuning the simulator was built with.
    #[must_use]
    pub const fn tuning(&self) -> WaterTuning {
        self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze() -> Maze {
        Maze::from_rows(&["#####", "#   #", "### #", "#  E#", "#####"]).expect("valid maze")
    }

    #[test]
    fn schedule_starts_at_base_rates() {
        let tuning = WaterTuning::default();
        let base = schedule_rates(&tuning, 0);
        assert!((base.normal - 6.0).abs() < 1e-9);
        assert!((base.downward - 10.0).abs() < 1e-9);
        assert_eq!(base.elapsed, 0.0);

        let first = schedule_rates(&tuning, 1);
        assert!((first.normal - 6.0 * (E + 1.0).ln()).abs() < 1e-9);
        assert!(first.normal > base.normal);
        assert!(schedule_rates(&tuning, 5).downward > first.downward);
    }

    #[test]
    fn stalled_rates_leave_the_queue_untouched() {
        let maze = maze();
        let mut grid = WaterGrid::dry(maze.dimensions());
        let _ = grid.flood(maze.origin());
        let mut queue = VecDeque::from([WaterEvent::new(maze.origin(), SpreadDirection::Normal)]);
        let mut parameters = WaterParameters::new(0.0, f64::NAN);
        let mut flooded = Vec::new();

        advance_water(
            &maze,
            &mut grid,
            &mut queue,
            &mut parameters,
            100.0,
            &mut ChaCha8Rng::seed_from_u64(1),
            &mut flooded,
        );

        assert_eq!(queue.len(), 1);
        assert!(flooded.is_empty());
        assert_eq!(grid.wet_count(), 1);
    }

    #[test]
    fn downward_fronts_are_classified_by_travel_direction() {
        let maze = maze();
        let mut grid = WaterGrid::dry(maze.dimensions());
        let corner = CellCoord::new(3, 1);
        let _ = grid.flood(corner);
        let mut queue = VecDeque::from([WaterEvent::new(corner, SpreadDirection::Normal)]);
        let mut parameters = WaterParameters::new(6.0, 10.0);
        let mut flooded = Vec::new();

        advance_water(
            &maze,
            &mut grid,
            &mut queue,
            &mut parameters,
            1.0,
            &mut ChaCha8Rng::seed_from_u64(3),
            &mut flooded,
        );

        let below = CellCoord::new(3, 2);
        let beside = CellCoord::new(2, 1);
        assert!(flooded.contains(&below));
        assert!(flooded.contains(&beside));
        assert!(queue.iter().all(|front| front.cell != below
            || front.direction == SpreadDirection::Downward));
    }

    #[test]
    fn streams_differ_from_the_plain_seed() {
        let mut water = water_rng(Some(9));
        let mut plain = ChaCha8Rng::seed_from_u64(9);
        assert_ne!(water.gen::<u64>(), plain.gen::<u64>());
    }
}
