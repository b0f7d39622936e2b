//! ASCII rendering and export for world and local maps
//!
//! One character per tile, rows separated by newlines. The optional
//! coordinate decoration adds a column header of `x % 10` digits and a
//! three-wide row number in front of each row.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::map::{LocalMap, MapStatistics, MapTile, WorldMap};
use crate::terrain::{TemperatureCategory, TerrainKind};
use crate::tilemap::Tilemap;

/// Rendering mode for a local map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Terrain symbols
    Terrain,
    /// One digit per tile, `trunc(height * 9)`; `-` below sea level
    Height,
}

/// Height digit for a tile. Negative heights collapse to `-` to keep one
/// character per tile.
pub fn height_char(height: f32) -> char {
    let level = (height * 9.0) as i32;
    match char::from_digit(level.clamp(0, 9) as u32, 10) {
        Some(digit) if level >= 0 => digit,
        _ => '-',
    }
}

fn render_grid(tiles: &Tilemap<MapTile>, show_coordinates: bool, cell: impl Fn(&MapTile) -> char) -> String {
    let mut rows = Vec::with_capacity(tiles.height + 1);

    if show_coordinates {
        let header: String = (0..tiles.width)
            .filter_map(|x| char::from_digit((x % 10) as u32, 10))
            .collect();
        rows.push(format!("    {}", header));
    }

    for y in 0..tiles.height {
        let mut row = String::with_capacity(tiles.width + 4);
        if show_coordinates {
            row.push_str(&format!("{:3} ", y));
        }
        if let Some(cells) = tiles.row(y) {
            row.extend(cells.iter().map(&cell));
        }
        rows.push(row);
    }

    rows.join("\n")
}

/// Render the world map as terrain symbols
pub fn render_world_map(map: &WorldMap, show_coordinates: bool) -> String {
    render_grid(map.tiles(), show_coordinates, MapTile::ascii_char)
}

/// Render a local map as terrain symbols or height digits
pub fn render_local_map(map: &LocalMap, show_coordinates: bool, mode: AsciiMode) -> String {
    match mode {
        AsciiMode::Terrain => render_grid(map.tiles(), show_coordinates, MapTile::ascii_char),
        AsciiMode::Height => render_grid(map.tiles(), show_coordinates, |t| height_char(t.height)),
    }
}

/// Render the world tiles within `radius` of `(cx, cy)`, marking the centre
/// with `P`. The window is clamped to the map edges.
pub fn render_surroundings(map: &WorldMap, cx: i32, cy: i32, radius: u32) -> String {
    let r = i64::from(radius);
    let (cx, cy) = (i64::from(cx), i64::from(cy));
    let (x0, x1) = ((cx - r).max(0), (cx + r).min(map.width() as i64 - 1));
    let (y0, y1) = ((cy - r).max(0), (cy + r).min(map.height() as i64 - 1));

    (y0..=y1)
        .map(|y| {
            (x0..=x1)
                .map(|x| {
                    if (x, y) == (cx, cy) {
                        'P'
                    } else {
                        map.get(x as i32, y as i32).map_or(' ', MapTile::ascii_char)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Symbol and temperature legend
pub fn legend() -> String {
    let rule = "=".repeat(40);
    let mut lines = vec![rule.clone(), "MAP LEGEND".to_string(), rule.clone()];

    let mut seen = Vec::new();
    for kind in TerrainKind::all() {
        let symbol = kind.ascii_char();
        if seen.contains(&symbol) {
            continue;
        }
        seen.push(symbol);
        let description = match kind {
            TerrainKind::DeepOcean | TerrainKind::Ocean => "Ocean / Deep Ocean",
            other => other.name(),
        };
        lines.push(format!("  {}  {}", symbol, description));
    }

    lines.push(String::new());
    lines.push("TEMPERATURE:".to_string());
    let ranges = ["< -0.5", "-0.5 to -0.1", "-0.1 to 0.2", "0.2 to 0.5", "0.5 to 0.8", "> 0.8"];
    for (band, range) in TemperatureCategory::all().iter().zip(ranges) {
        lines.push(format!("  {:<10} {}", band.name(), range));
    }
    lines.push(rule);

    lines.join("\n")
}

/// Export the world map, legend and statistics to a text file
pub fn export_world_file(map: &WorldMap, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    let stats = MapStatistics::collect(map.tiles());

    writeln!(file, "=== SEEDED WORLD FILE ===")?;
    writeln!(file, "Seed: {}", map.seed)?;
    writeln!(file, "Size: {}x{}", map.width(), map.height())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    writeln!(file, "{}", render_world_map(map, true))?;
    writeln!(file)?;

    writeln!(file, "{}", legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "{}", stats.summary())?;

    Ok(())
}
