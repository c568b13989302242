//! Movement validation with a best-first search over the hex plane
//!
//! Search costs are counted in half-steps: entering an empty hex costs
//! `STEP_COST` per hex of distance, entering an occupied hex costs five times
//! that unless the piece climbs. Counting half-steps keeps the axis heuristic
//! `|dx| + |dy|` from ever overestimating, so the first time the goal is
//! popped its path is the cheapest one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Board;
use crate::coordinate::{Coordinate, NEIGHBOR_OFFSETS};
use crate::error::{GameError, RuleError, StateError};
use crate::pieces::{Piece, Species};

pub const QUEEN_MAX_DISTANCE: usize = 1;
pub const PILL_BUG_MAX_DISTANCE: usize = 1;
pub const BEETLE_MAX_DISTANCE: usize = 1;
pub const SPIDER_MAX_DISTANCE: usize = 3;
pub const LADYBUG_MAX_DISTANCE: usize = 3;

const STEP_COST: u32 = 2;
const OCCUPIED_COST_FACTOR: u32 = 5;

/// Empty rows kept around the hive when bounding the search
const SEARCH_MARGIN: i8 = 2;

// ============================================================================
// MOVEMENT PROFILES
// ============================================================================

/// How a piece is allowed to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementProfile {
    /// May enter occupied hexes at normal cost and finish on top of the hive
    pub climbs: bool,
    /// Longest path, in steps, the piece may take
    pub max_steps: Option<usize>,
    /// Moves by jumping in a straight line instead of walking
    pub jumps: bool,
}

impl MovementProfile {
    const fn walker(max_steps: Option<usize>) -> Self {
        Self {
            climbs: false,
            max_steps,
            jumps: false,
        }
    }

    const fn climber(max_steps: usize) -> Self {
        Self {
            climbs: true,
            max_steps: Some(max_steps),
            jumps: false,
        }
    }

    pub fn for_species(species: Species) -> Self {
        match species {
            Species::Queen => Self::walker(Some(QUEEN_MAX_DISTANCE)),
            Species::PillBug => Self::walker(Some(PILL_BUG_MAX_DISTANCE)),
            Species::Spider => Self::walker(Some(SPIDER_MAX_DISTANCE)),
            Species::Ant | Species::Mosquito => Self::walker(None),
            Species::Beetle => Self::climber(BEETLE_MAX_DISTANCE),
            Species::Ladybug => Self::climber(LADYBUG_MAX_DISTANCE),
            Species::Grasshopper => Self {
                climbs: false,
                max_steps: None,
                jumps: true,
            },
        }
    }

    /// Profile of `piece` standing at `src`. A mosquito on top of the hive
    /// moves as a beetle; on the ground it borrows the climbing profile of
    /// the first adjacent beetle or ladybug and otherwise walks freely. Only
    /// the top piece of each neighboring column is visible to it.
    pub fn for_piece(board: &Board, piece: Piece, src: Coordinate) -> Option<Self> {
        let species = piece.species()?;
        if species != Species::Mosquito {
            return Some(Self::for_species(species));
        }

        if src.h() > 0 {
            return Some(Self::for_species(Species::Beetle));
        }

        let borrowed = src
            .neighbors()
            .filter_map(|c| board.top(c))
            .filter_map(|p| p.species())
            .find(|s| matches!(s, Species::Beetle | Species::Ladybug));

        Some(Self::for_species(borrowed.unwrap_or(Species::Mosquito)))
    }
}

// ============================================================================
// PATH VALIDATOR
// ============================================================================

/// Answers whether a piece can travel between two coordinates
pub struct PathValidator<'a> {
    board: &'a Board,
}

impl<'a> PathValidator<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Validate moving `piece` from `src` to `dst`, returning the discovered
    /// path (both endpoints included) on success.
    pub fn validate(
        &self,
        src: Coordinate,
        dst: Coordinate,
        piece: Piece,
    ) -> Result<Vec<Coordinate>, GameError> {
        let profile =
            MovementProfile::for_piece(self.board, piece, src).ok_or(StateError::UnknownPiece)?;

        // A move has to leave its own hex column
        if src.planar() == dst.planar() {
            return Err(StateError::InvalidCoordinate.into());
        }

        // Climbers are checked against the straight-line distance up front
        if let (true, Some(max)) = (profile.climbs, profile.max_steps) {
            if src.distance(dst) as usize > max {
                return Err(RuleError::MovementDistanceTooGreat.into());
            }
        }

        self.check_terrain(dst, profile)?;

        if profile.jumps {
            return Ok(self.jump(src, dst)?);
        }

        let path = self.search(src, dst, profile.climbs);
        let steps = path.len().saturating_sub(1);
        tracing::trace!(%piece, %src, %dst, steps, "path discovered");

        if let Some(max) = profile.max_steps {
            if steps > max {
                return Err(RuleError::MovementDistanceTooGreat.into());
            }
        }

        Ok(path)
    }

    /// Only climbers may finish above the surface, and never in mid-air
    fn check_terrain(&self, dst: Coordinate, profile: MovementProfile) -> Result<(), RuleError> {
        if dst.h() == 0 {
            return Ok(());
        }
        if !profile.climbs {
            return Err(RuleError::MayNotClimb);
        }
        if !self.board.is_occupied(dst.below()) {
            return Err(RuleError::UnsupportedDestination);
        }
        Ok(())
    }

    /// A jump runs along one axis over an unbroken line of pieces
    fn jump(&self, src: Coordinate, dst: Coordinate) -> Result<Vec<Coordinate>, RuleError> {
        let start = src.planar();
        let goal = dst.planar();
        let distance = start.distance(goal);
        if distance < 2 {
            return Err(RuleError::IllegalJump);
        }

        let direction = NEIGHBOR_OFFSETS
            .into_iter()
            .find(|&offset| (0..distance).fold(start, |c, _| c.add(offset)) == goal)
            .ok_or(RuleError::IllegalJump)?;

        let mut path = vec![src];
        let mut cell = start;
        for _ in 1..distance {
            cell = cell.add(direction);
            if !self.board.is_occupied(cell) {
                return Err(RuleError::IllegalJump);
            }
            path.push(cell);
        }
        path.push(dst);
        Ok(path)
    }

    /// Best-first search from `src` to the column of `dst`
    fn search(&self, src: Coordinate, dst: Coordinate, climbs: bool) -> Vec<Coordinate> {
        let start = src.planar();
        let goal = dst.planar();
        let bounds = SearchBounds::around(self.board, start, goal);

        let mut frontier = BinaryHeap::new();
        let mut costs: FxHashMap<Coordinate, u32> = FxHashMap::default();
        let mut came_from: FxHashMap<Coordinate, Coordinate> = FxHashMap::default();
        let mut closed: FxHashSet<Coordinate> = FxHashSet::default();

        costs.insert(start, 0);
        frontier.push(Frontier {
            priority: heuristic(goal, start),
            coordinate: start,
        });

        while let Some(Frontier { coordinate: current, .. }) = frontier.pop() {
            if current == goal {
                break;
            }
            if !closed.insert(current) {
                continue;
            }

            let current_cost = costs.get(&current).copied().unwrap_or(0);
            for next in current.neighbors() {
                if closed.contains(&next) || !bounds.contains(next) {
                    continue;
                }
                let cost = current_cost + self.movement_cost(current, next, climbs);
                if costs.get(&next).map_or(true, |&known| cost < known) {
                    costs.insert(next, cost);
                    came_from.insert(next, current);
                    frontier.push(Frontier {
                        priority: cost + heuristic(goal, next),
                        coordinate: next,
                    });
                }
            }
        }

        // Walk back from the goal. The bounds are a convex region holding
        // both endpoints, so the goal is always discovered.
        let mut path = vec![dst];
        let mut cell = goal;
        while cell != start {
            match came_from.get(&cell) {
                Some(&previous) => {
                    path.push(previous);
                    cell = previous;
                }
                None => break,
            }
        }
        path.reverse();
        path[0] = src;
        path
    }

    fn movement_cost(&self, from: Coordinate, to: Coordinate, climbs: bool) -> u32 {
        let cost = from.distance(to) * STEP_COST;
        if !climbs && self.board.is_occupied(to) {
            cost * OCCUPIED_COST_FACTOR
        } else {
            cost
        }
    }
}

/// Axis heuristic `|dx| + |dy|` between two coordinates
pub fn heuristic(a: Coordinate, b: Coordinate) -> u32 {
    (a.x() as i32 - b.x() as i32).unsigned_abs() + (a.y() as i32 - b.y() as i32).unsigned_abs()
}

// ============================================================================
// SEARCH HELPERS
// ============================================================================

/// Frontier entry, ordered so the cheapest pops first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frontier {
    priority: u32,
    coordinate: Coordinate,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.coordinate.cmp(&self.coordinate))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cube-coordinate box around the hive and both endpoints
#[derive(Clone, Copy, Debug)]
struct SearchBounds {
    min: [i16; 3],
    max: [i16; 3],
}

impl SearchBounds {
    fn around(board: &Board, start: Coordinate, goal: Coordinate) -> Self {
        let mut bounds = SearchBounds {
            min: axes(start),
            max: axes(start),
        };
        bounds.include(goal);
        for placed in board.pieces() {
            bounds.include(placed.coordinate);
        }
        let margin = SEARCH_MARGIN as i16;
        for i in 0..3 {
            bounds.min[i] -= margin;
            bounds.max[i] += margin;
        }
        bounds
    }

    fn include(&mut self, c: Coordinate) {
        for (i, v) in axes(c).into_iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
    }

    fn contains(&self, c: Coordinate) -> bool {
        axes(c)
            .into_iter()
            .enumerate()
            .all(|(i, v)| self.min[i] <= v && v <= self.max[i])
    }
}

fn axes(c: Coordinate) -> [i16; 3] {
    [c.x() as i16, c.y() as i16, c.z() as i16]
}
