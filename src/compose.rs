// Colorization and composition of the tile hierarchy. Everything here is a
// pure derivation from the current document state; callers recompose after
// edits rather than patching buffers in place.
use crate::palette::{master_color, ColorRGB, PaletteSet, SubPaletteIdx};
use crate::state::{
    Document, MetametatileRef, MetatileRef, PixelIdx, SheetId, METAMETATILE_COUNT, METATILE_COUNT,
    ROOM_COLS, ROOM_COUNT, ROOM_ROWS, TILE_DIM,
};

pub const METATILE_DIM: usize = 2 * TILE_DIM;
pub const METAMETATILE_DIM: usize = 2 * METATILE_DIM;
pub const ROOM_PX_WIDTH: usize = ROOM_COLS * METAMETATILE_DIM;
pub const ROOM_PX_HEIGHT: usize = ROOM_ROWS * METAMETATILE_DIM;

/// An owned RGB pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBuffer {
    width: usize,
    height: usize,
    data: Vec<ColorRGB>,
}

impl RgbBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        RgbBuffer {
            width,
            height,
            data: vec![[0, 0, 0]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> ColorRGB {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: ColorRGB) {
        self.data[y * self.width + x] = color;
    }

    /// Copy `src` into this buffer with its top-left corner at (x0, y0).
    /// The source must fit entirely within the destination.
    pub fn blit(&mut self, src: &RgbBuffer, x0: usize, y0: usize) {
        for y in 0..src.height {
            for x in 0..src.width {
                self.set(x0 + x, y0 + y, src.get(x, y));
            }
        }
    }

    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for color in &self.data {
            bytes.extend(color);
        }
        bytes
    }

    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend(color);
            bytes.push(255); // alpha channel
        }
        bytes
    }
}

/// Resolve every pixel of an index grid through a sub-palette to the master
/// palette. Pure; the only color decision in the whole pipeline.
pub fn colorize<const W: usize, const H: usize>(
    grid: &[[PixelIdx; W]; H],
    palettes: &PaletteSet,
    subpalette: SubPaletteIdx,
) -> RgbBuffer {
    let sub = palettes.get(subpalette);
    let mut buf = RgbBuffer::new(W, H);
    for (y, row) in grid.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            buf.set(x, y, master_color(sub[(value & 3) as usize]));
        }
    }
    buf
}

/// Assemble a metatile's 16x16 index grid from its four referenced tiles in
/// sheet A. Quadrants are row-major 2x2.
pub fn metatile_grid(
    doc: &Document,
    metatile: MetatileRef,
) -> [[PixelIdx; METATILE_DIM]; METATILE_DIM] {
    let def = &doc.metatiles[metatile as usize % METATILE_COUNT];
    let mut grid = [[0; METATILE_DIM]; METATILE_DIM];
    for (quadrant, &tile) in def.tiles.iter().enumerate() {
        let block = doc.table_a.tile(tile);
        let qx = quadrant % 2 * TILE_DIM;
        let qy = quadrant / 2 * TILE_DIM;
        for y in 0..TILE_DIM {
            for x in 0..TILE_DIM {
                grid[qy + y][qx + x] = block[y][x];
            }
        }
    }
    grid
}

/// A metatile's composed 16x16 RGB buffer, colorized with its own
/// sub-palette.
pub fn compose_metatile(doc: &Document, metatile: MetatileRef) -> RgbBuffer {
    let def = &doc.metatiles[metatile as usize % METATILE_COUNT];
    colorize(&metatile_grid(doc, metatile), &doc.palettes, def.palette)
}

/// A metametatile's composed 32x32 RGB buffer. Each quadrant is the
/// referenced metatile's already-colorized buffer; colorization cannot be
/// deferred to this level since the quadrants may carry different palettes.
pub fn compose_metametatile(doc: &Document, mmt: MetametatileRef) -> RgbBuffer {
    let def = &doc.metametatiles[mmt as usize % METAMETATILE_COUNT];
    let mut buf = RgbBuffer::new(METAMETATILE_DIM, METAMETATILE_DIM);
    for (quadrant, &metatile) in def.metatiles.iter().enumerate() {
        let qx = quadrant % 2 * METATILE_DIM;
        let qy = quadrant / 2 * METATILE_DIM;
        buf.blit(&compose_metatile(doc, metatile), qx, qy);
    }
    buf
}

/// A room's composed 256x192 RGB buffer: cell (row, col) lands at pixel
/// (col * 32, row * 32).
pub fn compose_room(doc: &Document, room: usize) -> RgbBuffer {
    let def = &doc.rooms[room % ROOM_COUNT];
    let mut buf = RgbBuffer::new(ROOM_PX_WIDTH, ROOM_PX_HEIGHT);
    for row in 0..ROOM_ROWS {
        for col in 0..ROOM_COLS {
            let mmt = compose_metametatile(doc, def.cells[row][col]);
            buf.blit(&mmt, col * METAMETATILE_DIM, row * METAMETATILE_DIM);
        }
    }
    buf
}

/// A whole tile sheet colorized with one sub-palette, for display.
pub fn compose_sheet(doc: &Document, sheet: SheetId, subpalette: SubPaletteIdx) -> RgbBuffer {
    colorize(doc.sheet(sheet).rows(), &doc.palettes, subpalette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::master_color;
    use crate::state::{SheetId, TILE_DIM};

    #[test]
    fn colorize_resolves_through_subpalette_and_master() {
        let mut doc = Document::default();
        doc.palettes.set_entry(2, 0, 0x0d);
        doc.palettes.set_entry(2, 3, 0x30);
        let grid = [[0u8, 3], [3, 0]];
        let buf = colorize(&grid, &doc.palettes, 2);
        for y in 0..2 {
            for x in 0..2 {
                let expected = master_color(doc.palettes.entry(2, grid[y][x]));
                assert_eq!(buf.get(x, y), expected);
            }
        }
    }

    #[test]
    fn default_document_composes_uniform_metatiles() {
        let doc = Document::default();
        let background = master_color(doc.palettes.entry(0, 0));
        for metatile in 0..METATILE_COUNT as MetatileRef {
            let buf = compose_metatile(&doc, metatile);
            for y in 0..METATILE_DIM {
                for x in 0..METATILE_DIM {
                    assert_eq!(buf.get(x, y), background);
                }
            }
        }
    }

    #[test]
    fn metatile_quadrants_map_row_major() {
        let mut doc = Document::default();
        // Four distinct tiles, each filled with a different pixel value.
        for (tile, value) in [(1u8, 1u8), (2, 2), (3, 3), (4, 1)] {
            let block = [[value; TILE_DIM]; TILE_DIM];
            doc.table_a.set_tile(tile, block);
        }
        doc.set_tile_ref(0, 0, 1);
        doc.set_tile_ref(0, 1, 2);
        doc.set_tile_ref(0, 2, 3);
        doc.set_tile_ref(0, 3, 4);
        let grid = metatile_grid(&doc, 0);
        assert_eq!(grid[0][0], 1); // top-left
        assert_eq!(grid[0][15], 2); // top-right
        assert_eq!(grid[15][0], 3); // bottom-left
        assert_eq!(grid[15][15], 1); // bottom-right
    }

    #[test]
    fn tile_edit_propagates_to_exactly_one_quadrant() {
        let mut doc = Document::default();
        doc.set_tile_ref(7, 3, 42);
        let before = compose_metatile(&doc, 7);
        doc.set_pixel_index(
            SheetId::A,
            42 / 16 * TILE_DIM, // top-left pixel of tile 42
            42 % 16 * TILE_DIM,
            3,
        );
        let after = compose_metatile(&doc, 7);
        let mut changed = vec![];
        for y in 0..METATILE_DIM {
            for x in 0..METATILE_DIM {
                if before.get(x, y) != after.get(x, y) {
                    changed.push((x, y));
                }
            }
        }
        // Only the bottom-right quadrant's top-left pixel differs.
        assert_eq!(changed, vec![(8, 8)]);
    }

    #[test]
    fn palette_change_recolors_without_touching_indices() {
        let mut doc = Document::default();
        doc.table_a.set_tile(5, [[2; TILE_DIM]; TILE_DIM]);
        doc.set_tile_ref(0, 0, 5);
        doc.set_metatile_ref(0, 0, 0);
        doc.set_room_cell(0, 0, 0, 0);

        let grid_before = metatile_grid(&doc, 0);
        let room_before = compose_room(&doc, 0);
        doc.set_metatile_palette(0, 1);
        let grid_after = metatile_grid(&doc, 0);
        let room_after = compose_room(&doc, 0);

        assert_eq!(grid_before, grid_after);
        // The quadrant drawn from metatile 0 changed color.
        assert_ne!(room_before.get(0, 0), room_after.get(0, 0));
        assert_eq!(
            room_after.get(0, 0),
            master_color(doc.palettes.entry(1, 2))
        );
    }

    #[test]
    fn room_cell_places_metametatile_at_origin() {
        let mut doc = Document::default();
        // Make metametatile 5 visually distinct via its metatiles' palette.
        doc.palettes.set_entry(3, 0, 0x21);
        doc.set_metatile_palette(1, 3);
        for quadrant in 0..4 {
            doc.set_metatile_ref(5, quadrant, 1);
        }
        doc.set_room_cell(0, 0, 0, 5);

        let mmt = compose_metametatile(&doc, 5);
        let room = compose_room(&doc, 0);
        for y in 0..METAMETATILE_DIM {
            for x in 0..METAMETATILE_DIM {
                assert_eq!(room.get(x, y), mmt.get(x, y));
            }
        }
        // The neighboring cell still shows the default background.
        let background = master_color(doc.palettes.entry(0, 0));
        assert_eq!(room.get(METAMETATILE_DIM, 0), background);
        assert_eq!(room.get(0, METAMETATILE_DIM), background);
    }

    #[test]
    fn room_buffer_dimensions() {
        let doc = Document::default();
        let room = compose_room(&doc, 0);
        assert_eq!(room.width(), 256);
        assert_eq!(room.height(), 192);
        assert_eq!(room.to_rgba_bytes().len(), 256 * 192 * 4);
    }
}
