use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    grid::{Grid, Position},
};

/// Value of a newly spawned tile: 4 with the configured probability, else 2.
#[derive(Debug, Copy, Clone)]
pub struct TileDistribution {
    four: Bernoulli,
}

impl TileDistribution {
    pub fn new(four_probability: f64) -> Result<Self> {
        let four = Bernoulli::new(four_probability).map_err(|e| {
            EngineError::InvalidConfig(format!("four probability {four_probability}: {e}"))
        })?;
        Ok(TileDistribution { four })
    }
}

impl Distribution<u32> for TileDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.four.sample(rng) {
            4
        } else {
            2
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub position: Position,
    pub value: u32,
}

/// Place one tile on a uniformly chosen empty cell. Returns `None` and leaves
/// the grid alone when it is full.
pub fn spawn_tile<R: Rng + ?Sized>(
    grid: &mut Grid,
    tiles: &TileDistribution,
    rng: &mut R,
) -> Option<SpawnedTile> {
    let open = grid.empty_cells();
    if open.is_empty() {
        return None;
    }

    let position = open[rng.random_range(0..open.len())];
    let value = tiles.sample(rng);
    grid.set(position, value);
    log::trace!("spawned {value} at ({}, {})", position.row, position.col);

    Some(SpawnedTile { position, value })
}
