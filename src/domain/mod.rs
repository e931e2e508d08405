// Domain layer - Regions, grid, fleet snapshots and highlights
pub mod fleet;
pub mod grid;
pub mod highlight;
pub mod region;

use crate::domain::grid::GridModel;
use crate::domain::region::RegionRegistry;

/// Handles to the process-wide registry and grid, built once at startup
/// and passed explicitly to the poller and the render path.
#[derive(Debug, Clone, Copy)]
pub struct AppContext {
    pub registry: &'static RegionRegistry,
    pub grid: &'static GridModel,
}

impl AppContext {
    /// Builds (or reuses) the registry and grid and hands out references.
    pub fn bootstrap() -> Self {
        Self {
            registry: RegionRegistry::shared(),
            grid: GridModel::shared(),
        }
    }
}
