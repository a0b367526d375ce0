//! Nearest-neighbour upscale from the region grid to the tile grid.

use crate::error::{Result, TerrainError};
use crate::grid::Grid;
use crate::region::RegionGrid;
use crate::tile::TileCode;

/// Fine grid of terrain codes.
pub type TileGrid = Grid<TileCode>;

/// Expand every region cell into a `factor x factor` block of tiles with
/// the same code. Consumes the region grid.
pub fn upscale(region: RegionGrid, factor: u32) -> Result<TileGrid> {
    let overflow = || TerrainError::DimensionOverflow {
        width: region.width() as u64 * factor as u64,
        height: region.height() as u64 * factor as u64,
    };
    let width = region.width().checked_mul(factor).ok_or_else(overflow)?;
    let height = region.height().checked_mul(factor).ok_or_else(overflow)?;
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(overflow());
    }

    let mut tiles = TileGrid::try_new(width, height, TileCode::Void)?;
    let k = factor as i32;
    for rx in 0..region.width() as i32 {
        for ry in 0..region.height() as i32 {
            let code = TileCode::from_elevation(region.get(rx, ry).unwrap_or(0));
            if code == TileCode::Void {
                continue;
            }
            for x in rx * k..(rx + 1) * k {
                for y in ry * k..(ry + 1) * k {
                    tiles.set(x, y, code);
                }
            }
        }
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_copy_region_value() {
        let mut region = RegionGrid::try_new(3, 2, 0).unwrap();
        region.set(0, 0, 3);
        region.set(2, 1, 1);
        region.set(1, 1, 2);

        let tiles = upscale(region, 4).unwrap();
        assert_eq!((tiles.width(), tiles.height()), (12, 8));
        assert_eq!(tiles.count(TileCode::Obstacle), 16);
        assert_eq!(tiles.count(TileCode::Rough), 16);
        assert_eq!(tiles.count(TileCode::Open), 16);
        assert_eq!(tiles.count(TileCode::Void), 48);

        assert_eq!(tiles.get(3, 3), Some(TileCode::Obstacle));
        assert_eq!(tiles.get(4, 3), Some(TileCode::Void));
        assert_eq!(tiles.get(11, 7), Some(TileCode::Open));
        assert_eq!(tiles.get(4, 4), Some(TileCode::Rough));
    }

    #[test]
    fn test_factor_one_is_identity_shape() {
        let mut region = RegionGrid::try_new(5, 4, 0).unwrap();
        region.set(2, 2, 2);
        let tiles = upscale(region, 1).unwrap();
        assert_eq!((tiles.width(), tiles.height()), (5, 4));
        assert_eq!(tiles.get(2, 2), Some(TileCode::Rough));
        assert_eq!(tiles.count(TileCode::Rough), 1);
    }

    #[test]
    fn test_overflow_rejected() {
        let region = RegionGrid::try_new(2, 2, 0).unwrap();
        assert!(matches!(
            upscale(region, u32::MAX),
            Err(TerrainError::DimensionOverflow { .. })
        ));
    }
}
