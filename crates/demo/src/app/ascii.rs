use std::collections::HashSet;
use std::io::{self, Write};

use ambition::{Camera, TileCoord, TileGrid};

use super::terrain::Terrain;

const PATH_GLYPH: char = '*';

/// Draw the cells the camera can see, one text row per grid row, and return
/// how many cells were drawn.
pub(crate) fn render_view<W: Write>(
    out: &mut W,
    grid: &TileGrid<Terrain>,
    camera: &Camera,
    path: &[TileCoord],
    start: TileCoord,
    goal: TileCoord,
) -> io::Result<usize> {
    writeln!(out, "view {} zoom {:.2}", camera.view(), camera.zoom())?;
    let Some(range) = camera.visible_cells(grid) else {
        writeln!(out, "(nothing visible)")?;
        return Ok(0);
    };

    let on_path: HashSet<TileCoord> = path.iter().copied().collect();
    let mut drawn = 0;
    for row in range.min.row..range.max.row {
        let mut line = String::with_capacity(range.cols() as usize);
        for col in range.min.col..range.max.col {
            let coord = TileCoord::new(row, col);
            let glyph = if coord == start {
                'S'
            } else if coord == goal {
                'G'
            } else if on_path.contains(&coord) {
                PATH_GLYPH
            } else {
                grid.tile(coord).map_or(' ', |terrain| terrain.glyph())
            };
            line.push(glyph);
            drawn += 1;
        }
        writeln!(out, "{line}")?;
    }

    if let Some(&end) = path.last() {
        let area = grid.tile_area(end);
        if camera.can_see_rect(area) {
            writeln!(
                out,
                "path end {} at canvas {}",
                end,
                camera.world_to_view(area.centre())
            )?;
        }
    }
    Ok(drawn)
}
