//! Terrain codes stored in the fine tile grid.

use serde::{Deserialize, Serialize};

/// Terrain category of a single fine tile.
///
/// The discriminants are the wire/render codes consumers index tilesets
/// with, so they must stay `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileCode {
    /// Impassable void (ocean / off-map).
    #[default]
    Void = 0,
    /// Open, walkable ground.
    Open = 1,
    /// Rough ground, walkable at reduced speed.
    Rough = 2,
    /// Obstacle mass.
    Obstacle = 3,
}

impl TileCode {
    /// All codes in ascending order.
    pub const ALL: [Self; 4] = [Self::Void, Self::Open, Self::Rough, Self::Obstacle];

    /// Numeric code of this tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Convert a raw code, rejecting values outside `0..=3`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Void),
            1 => Some(Self::Open),
            2 => Some(Self::Rough),
            3 => Some(Self::Obstacle),
            _ => None,
        }
    }

    /// Map a region elevation onto a tile code.
    ///
    /// Region cells only ever hold `0..=3`; anything higher saturates to
    /// [`TileCode::Obstacle`].
    #[must_use]
    pub const fn from_elevation(level: u8) -> Self {
        match level {
            0 => Self::Void,
            1 => Self::Open,
            2 => Self::Rough,
            _ => Self::Obstacle,
        }
    }

    /// Whether ground units may stand on this tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Void)
    }

    /// Single-character form used by ASCII previews and test fixtures.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Void => '~',
            Self::Open => '.',
            Self::Rough => ':',
            Self::Obstacle => '#',
        }
    }

    /// Inverse of [`TileCode::glyph`].
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '~' => Some(Self::Void),
            '.' => Some(Self::Open),
            ':' => Some(Self::Rough),
            '#' => Some(Self::Obstacle),
            _ => None,
        }
    }

    /// Index into per-code tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<TileCode> for u8 {
    fn from(tile: TileCode) -> Self {
        tile.code()
    }
}

impl TryFrom<u8> for TileCode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_code(value).ok_or(value)
    }
}
