// Presentation layer - Render surface seam and terminal frontend
pub mod render;
pub mod terminal;
