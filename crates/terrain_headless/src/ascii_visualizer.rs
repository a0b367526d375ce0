//! ASCII minimap renderer for terminal review of generated maps.
//!
//! The minimap samples one tile out of every `shrink x shrink` block, the
//! same way the in-game minimap is drawn, and marks the spawn point.

use std::fmt::Write;

use terrain_core::generator::TileQuery;
use terrain_core::stats::TerrainHistogram;
use terrain_core::tile::TileCode;

/// Minimap rendering configuration.
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Tiles per minimap character along each axis.
    pub shrink: u32,
    /// Mark the spawn point with [`SPAWN_GLYPH`].
    pub mark_spawn: bool,
    /// Show a legend with tile counts.
    pub show_legend: bool,
    /// Use colored output (ANSI).
    pub use_color: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            shrink: 6,
            mark_spawn: true,
            show_legend: true,
            use_color: true,
        }
    }
}

/// Character drawn at the spawn point.
pub const SPAWN_GLYPH: char = '@';

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const GRAY: &str = "\x1b[90m";
}

fn tile_color(tile: TileCode) -> &'static str {
    match tile {
        TileCode::Void => colors::BLUE,
        TileCode::Open => colors::GREEN,
        TileCode::Rough => colors::YELLOW,
        TileCode::Obstacle => colors::GRAY,
    }
}

/// Minimap size in characters for a map and shrink factor.
#[must_use]
pub fn minimap_size(width: u32, height: u32, shrink: u32) -> (u32, u32) {
    let shrink = shrink.max(1);
    (width.div_ceil(shrink), height.div_ceil(shrink))
}

/// Render a map as an ASCII minimap.
pub fn render_minimap<Q: TileQuery + ?Sized>(map: &Q, config: &AsciiConfig) -> String {
    let shrink = config.shrink.max(1);
    let (cols, rows) = minimap_size(map.width(), map.height(), shrink);
    let spawn = map.spawn_point();
    let spawn_cell = (spawn.x / shrink, spawn.y / shrink);
    let (bold, reset) = if config.use_color {
        (colors::BOLD, colors::RESET)
    } else {
        ("", "")
    };

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{bold}╔══ Map {}x{} │ Spawn ({}, {}) │ 1:{shrink} ══╗{reset}",
        map.width(),
        map.height(),
        spawn.x,
        spawn.y,
    );

    let border = "═".repeat(cols as usize);
    let _ = writeln!(output, "║{border}║");

    let mut sampled = TerrainHistogram::default();
    for row in 0..rows {
        output.push('║');
        for col in 0..cols {
            let x = (col * shrink) as i32;
            let y = (row * shrink) as i32;
            let tile = map.tile_at(x, y).unwrap_or_default();
            sampled.counts[tile.index()] += 1;

            if config.mark_spawn && (col, row) == spawn_cell {
                if config.use_color {
                    let _ = write!(output, "{}{}{SPAWN_GLYPH}{}", colors::BOLD, colors::RED, colors::RESET);
                } else {
                    output.push(SPAWN_GLYPH);
                }
            } else if config.use_color {
                let _ = write!(output, "{}{}{}", tile_color(tile), tile.glyph(), colors::RESET);
            } else {
                output.push(tile.glyph());
            }
        }
        output.push_str("║\n");
    }

    if config.show_legend {
        let _ = writeln!(output, "╠{border}╣");
        let entries: Vec<String> = TileCode::ALL
            .iter()
            .map(|&tile| {
                format!(
                    "{}={:?} {:.0}%",
                    tile.glyph(),
                    tile,
                    sampled.fraction(tile) * 100.0
                )
            })
            .collect();
        let _ = writeln!(output, "║ {} {SPAWN_GLYPH}=Spawn", entries.join(" "));
    }

    let _ = writeln!(output, "╚{border}╝");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_core::generator::SpawnPoint;

    struct Fixture {
        rows: Vec<&'static str>,
        spawn: SpawnPoint,
    }

    impl TileQuery for Fixture {
        fn width(&self) -> u32 {
            self.rows[0].len() as u32
        }

        fn height(&self) -> u32 {
            self.rows.len() as u32
        }

        fn tile_at(&self, x: i32, y: i32) -> Option<TileCode> {
            let row = self.rows.get(usize::try_from(y).ok()?)?;
            let glyph = row.chars().nth(usize::try_from(x).ok()?)?;
            TileCode::from_glyph(glyph)
        }

        fn spawn_point(&self) -> SpawnPoint {
            self.spawn
        }
    }

    fn plain(shrink: u32) -> AsciiConfig {
        AsciiConfig {
            shrink,
            use_color: false,
            show_legend: false,
            ..Default::default()
        }
    }

    fn body(output: &str) -> Vec<String> {
        output
            .lines()
            .filter(|l| l.starts_with('║'))
            .skip(1)
            .map(|l| l.trim_matches('║').to_string())
            .collect()
    }

    #[test]
    fn test_minimap_size_rounds_up() {
        assert_eq!(minimap_size(600, 450, 6), (100, 75));
        assert_eq!(minimap_size(10, 7, 3), (4, 3));
        assert_eq!(minimap_size(5, 5, 0), (5, 5));
    }

    #[test]
    fn test_full_scale_render_marks_spawn() {
        let map = Fixture {
            rows: vec!["~~~~", "~..#", "~.:#"],
            spawn: SpawnPoint { x: 1, y: 2 },
        };
        let output = render_minimap(&map, &plain(1));
        assert_eq!(body(&output), ["~~~~", "~..#", "~@:#"]);
        assert!(output.contains("Map 4x3"));
        assert!(output.contains("Spawn (1, 2)"));
    }

    #[test]
    fn test_shrink_samples_block_corners() {
        let map = Fixture {
            rows: vec!["#~.~", "~~~~", ":~~~", "~~~~"],
            spawn: SpawnPoint { x: 3, y: 3 },
        };
        let mut config = plain(2);
        config.mark_spawn = false;
        assert_eq!(body(&render_minimap(&map, &config)), ["#.", ":~"]);
    }

    #[test]
    fn test_legend_and_color() {
        let map = Fixture {
            rows: vec!["..", ".."],
            spawn: SpawnPoint { x: 0, y: 0 },
        };
        let config = AsciiConfig {
            shrink: 1,
            ..Default::default()
        };
        let output = render_minimap(&map, &config);
        assert!(output.contains(colors::RESET));
        assert!(output.contains("=Spawn"));
        assert!(output.contains(".=Open"));
    }
}
