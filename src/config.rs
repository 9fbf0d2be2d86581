//! Maze build settings, loadable from RON files.
//!
//! ```ron
//! (
//!     rows: 21,
//!     columns: 31,
//!     hall_width: 3.75,
//!     hall_height: 3.5,
//!     seed: Some(42),
//!     generator: RandomizedPrim,
//! )
//! ```
//!
//! Every field is optional and falls back to the defaults of `MazeSpec::default()`.

use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::*;
use crate::generators::{GridGenerator, RandomizedPrim, RecursiveBacktracker};
use crate::grid_dimensions::MazeDimensions;
use crate::mesh::{MeshSynthesizer, DEFAULT_HALL_HEIGHT, DEFAULT_HALL_WIDTH};
use crate::units::{ColumnsCount, HallHeight, HallWidth, RowsCount};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    RecursiveBacktracker,
    RandomizedPrim,
}

impl GeneratorKind {
    /// Seeded generators replay the same sequence of mazes; without a seed each run differs.
    pub fn generator(self, seed: Option<u64>) -> Box<dyn GridGenerator> {
        match (self, seed) {
            (GeneratorKind::RecursiveBacktracker, Some(s)) => {
                Box::new(RecursiveBacktracker::from_seed(s))
            }
            (GeneratorKind::RecursiveBacktracker, None) => {
                Box::new(RecursiveBacktracker::from_entropy())
            }
            (GeneratorKind::RandomizedPrim, Some(s)) => Box::new(RandomizedPrim::from_seed(s)),
            (GeneratorKind::RandomizedPrim, None) => Box::new(RandomizedPrim::from_entropy()),
        }
    }

    pub fn from_name(name: &str) -> Option<GeneratorKind> {
        match name {
            "backtracker" | "recursive-backtracker" => Some(GeneratorKind::RecursiveBacktracker),
            "prim" | "randomized-prim" => Some(GeneratorKind::RandomizedPrim),
            _ => None,
        }
    }
}

impl Default for GeneratorKind {
    fn default() -> Self {
        GeneratorKind::RecursiveBacktracker
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSpec {
    pub rows: usize,
    pub columns: usize,
    pub hall_width: f32,
    pub hall_height: f32,
    pub seed: Option<u64>,
    pub generator: GeneratorKind,
}

impl Default for MazeSpec {
    fn default() -> Self {
        MazeSpec {
            rows: 13,
            columns: 15,
            hall_width: DEFAULT_HALL_WIDTH.0,
            hall_height: DEFAULT_HALL_HEIGHT.0,
            seed: None,
            generator: GeneratorKind::default(),
        }
    }
}

impl MazeSpec {
    pub fn from_ron_str(text: &str) -> Result<MazeSpec> {
        let spec: MazeSpec = ron::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<MazeSpec> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .chain_err(|| format!("unable to read maze spec {}", path.display()))?;
        MazeSpec::from_ron_str(&text)
            .chain_err(|| format!("invalid maze spec {}", path.display()))
    }

    /// Hall sizes have to be positive and finite for the mesh to make sense.
    pub fn validate(&self) -> Result<()> {
        for &(name, value) in &[("hall_width", self.hall_width), ("hall_height", self.hall_height)] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        Ok(())
    }

    pub fn rows_count(&self) -> RowsCount {
        RowsCount(self.rows)
    }

    pub fn columns_count(&self) -> ColumnsCount {
        ColumnsCount(self.columns)
    }

    pub fn dimensions(&self) -> Result<MazeDimensions> {
        MazeDimensions::new(self.rows_count(), self.columns_count())
    }

    pub fn synthesizer(&self) -> MeshSynthesizer {
        MeshSynthesizer::new(HallWidth(self.hall_width), HallHeight(self.hall_height))
    }

    pub fn generator(&self) -> Box<dyn GridGenerator> {
        self.generator.generator(self.seed)
    }
}
