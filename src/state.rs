use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::palette::{PaletteSet, SubPaletteIdx};
use crate::persist;

pub type PixelIdx = u8; // 2-bit pixel value (0-3), index into a sub-palette
pub type TileRef = u8; // Index into a sheet's 16x16 tile grid (0-255)
pub type MetatileRef = u8; // Index into the metatile list (0-47)
pub type MetametatileRef = u8; // Index into the metametatile list (0-47)
pub type PixelCoord = u16;

pub const TILE_DIM: usize = 8;
pub const SHEET_TILES_PER_SIDE: usize = 16;
pub const SHEET_TILE_COUNT: usize = SHEET_TILES_PER_SIDE * SHEET_TILES_PER_SIDE;
pub const SHEET_DIM: usize = SHEET_TILES_PER_SIDE * TILE_DIM;

pub const METATILE_COUNT: usize = 48;
pub const METAMETATILE_COUNT: usize = 48;
pub const ROOM_COUNT: usize = 48;
pub const ROOM_ROWS: usize = 6;
pub const ROOM_COLS: usize = 8;

/// One decoded CHR pattern table: a 128x128 grid of 2-bit pixel values,
/// holding 256 8x8 tiles addressed as `tile = row * 16 + col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSheet {
    pixels: Box<[[PixelIdx; SHEET_DIM]; SHEET_DIM]>,
}

impl Default for TileSheet {
    fn default() -> Self {
        TileSheet {
            pixels: Box::new([[0; SHEET_DIM]; SHEET_DIM]),
        }
    }
}

impl TileSheet {
    pub fn pixel(&self, row: usize, col: usize) -> PixelIdx {
        self.pixels[row.min(SHEET_DIM - 1)][col.min(SHEET_DIM - 1)]
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, value: PixelIdx) {
        self.pixels[row.min(SHEET_DIM - 1)][col.min(SHEET_DIM - 1)] = value & 3;
    }

    pub fn rows(&self) -> &[[PixelIdx; SHEET_DIM]; SHEET_DIM] {
        &self.pixels
    }

    pub fn tile(&self, tile: TileRef) -> [[PixelIdx; TILE_DIM]; TILE_DIM] {
        let row0 = tile as usize / SHEET_TILES_PER_SIDE * TILE_DIM;
        let col0 = tile as usize % SHEET_TILES_PER_SIDE * TILE_DIM;
        let mut block = [[0; TILE_DIM]; TILE_DIM];
        for y in 0..TILE_DIM {
            for x in 0..TILE_DIM {
                block[y][x] = self.pixels[row0 + y][col0 + x];
            }
        }
        block
    }

    pub fn set_tile(&mut self, tile: TileRef, block: [[PixelIdx; TILE_DIM]; TILE_DIM]) {
        let row0 = tile as usize / SHEET_TILES_PER_SIDE * TILE_DIM;
        let col0 = tile as usize % SHEET_TILES_PER_SIDE * TILE_DIM;
        for y in 0..TILE_DIM {
            for x in 0..TILE_DIM {
                self.pixels[row0 + y][col0 + x] = block[y][x] & 3;
            }
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<PixelIdx>> {
        self.pixels.iter().map(|row| row.to_vec()).collect()
    }

    pub fn from_rows(rows: &[Vec<PixelIdx>]) -> Result<Self> {
        anyhow::ensure!(
            rows.len() == SHEET_DIM,
            "tile sheet has {} rows, expected {}",
            rows.len(),
            SHEET_DIM
        );
        let mut sheet = TileSheet::default();
        for (y, row) in rows.iter().enumerate() {
            anyhow::ensure!(
                row.len() == SHEET_DIM,
                "tile sheet row {} has {} columns, expected {}",
                y,
                row.len(),
                SHEET_DIM
            );
            for (x, &value) in row.iter().enumerate() {
                sheet.pixels[y][x] = value & 3;
            }
        }
        Ok(sheet)
    }
}

/// A 2x2 arrangement of tile references sharing one sub-palette.
/// Quadrants are row-major: 0 = top-left, 1 = top-right, 2 = bottom-left,
/// 3 = bottom-right.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Metatile {
    pub tiles: [TileRef; 4],
    pub palette: SubPaletteIdx,
}

/// A 2x2 arrangement of metatile references. Color comes transitively from
/// each referenced metatile's own sub-palette.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Metametatile {
    pub metatiles: [MetatileRef; 4],
}

/// A 6x8 grid of metametatile references, row-major.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Room {
    pub cells: [[MetametatileRef; ROOM_COLS]; ROOM_ROWS],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetId {
    A,
    B,
}

/// The whole editable document. All composition levels above the sheets
/// hold integer references into the level below, never pixel copies, so an
/// edit to a lower level is picked up the next time a consumer recomposes.
///
/// Invariant: stored references are always in range. Every write goes
/// through a `set_*` method (or snapshot restore), which masks pixel values
/// and sub-palette selectors and clamps metatile/metametatile references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub table_a: TileSheet,
    pub table_b: TileSheet,
    pub palettes: PaletteSet,
    pub metatiles: Vec<Metatile>,
    pub metametatiles: Vec<Metametatile>,
    pub rooms: Vec<Room>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            table_a: TileSheet::default(),
            table_b: TileSheet::default(),
            palettes: PaletteSet::default(),
            metatiles: vec![Metatile::default(); METATILE_COUNT],
            metametatiles: vec![Metametatile::default(); METAMETATILE_COUNT],
            rooms: vec![Room::default(); ROOM_COUNT],
        }
    }
}

fn clamp_metatile_ref(metatile: MetatileRef) -> MetatileRef {
    metatile.min(METATILE_COUNT as MetatileRef - 1)
}

fn clamp_metametatile_ref(mmt: MetametatileRef) -> MetametatileRef {
    mmt.min(METAMETATILE_COUNT as MetametatileRef - 1)
}

impl Document {
    pub fn sheet(&self, id: SheetId) -> &TileSheet {
        match id {
            SheetId::A => &self.table_a,
            SheetId::B => &self.table_b,
        }
    }

    pub fn set_pixel_index(&mut self, sheet: SheetId, row: usize, col: usize, value: PixelIdx) {
        let sheet = match sheet {
            SheetId::A => &mut self.table_a,
            SheetId::B => &mut self.table_b,
        };
        sheet.set_pixel(row, col, value);
    }

    pub fn set_tile_ref(&mut self, metatile: MetatileRef, quadrant: usize, tile: TileRef) {
        let metatile = clamp_metatile_ref(metatile);
        self.metatiles[metatile as usize].tiles[quadrant & 3] = tile;
    }

    pub fn set_metatile_palette(&mut self, metatile: MetatileRef, palette: SubPaletteIdx) {
        let metatile = clamp_metatile_ref(metatile);
        self.metatiles[metatile as usize].palette = palette & 3;
    }

    pub fn set_metatile_ref(
        &mut self,
        mmt: MetametatileRef,
        quadrant: usize,
        metatile: MetatileRef,
    ) {
        let mmt = clamp_metametatile_ref(mmt);
        self.metametatiles[mmt as usize].metatiles[quadrant & 3] = clamp_metatile_ref(metatile);
    }

    pub fn set_room_cell(&mut self, room: usize, row: usize, col: usize, mmt: MetametatileRef) {
        let room = room.min(ROOM_COUNT - 1);
        self.rooms[room].cells[row.min(ROOM_ROWS - 1)][col.min(ROOM_COLS - 1)] =
            clamp_metametatile_ref(mmt);
    }
}

#[derive(Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub chr_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Tiles,
    Metatiles,
    Metametatiles,
    Rooms,
}

pub enum Dialogue {
    Help,
}

pub struct EditorState {
    pub global_config_path: PathBuf,
    pub global_config: GlobalConfig,

    // Project data:
    pub document: Document,

    // Temporary editor state:
    pub mode: Mode,
    pub active_sheet: SheetId,
    pub selected_palette: SubPaletteIdx,
    pub selected_slot: PixelIdx,
    pub selected_tile: TileRef,
    pub selected_metatile: MetatileRef,
    pub selected_metametatile: MetametatileRef,
    pub active_room: u8,
    pub dialogue: Option<Dialogue>,
}

fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "NesRoomEditor")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}

pub fn get_initial_state() -> Result<EditorState> {
    let mut state = EditorState {
        global_config_path: get_global_config_path()?,
        global_config: GlobalConfig::default(),
        document: Document::default(),
        mode: Mode::Tiles,
        active_sheet: SheetId::A,
        selected_palette: 0,
        selected_slot: 0,
        selected_tile: 0,
        selected_metatile: 0,
        selected_metametatile: 0,
        active_room: 0,
        dialogue: None,
    };
    if let Err(e) = persist::load_global_config(&mut state) {
        info!("No global config loaded: {:#}", e);
    }

    // Restore the previous session's document, if any. A stale or unreadable
    // path only costs a diagnostic; the editor starts blank.
    if let Some(path) = state.global_config.snapshot_path.clone() {
        match persist::load_snapshot(&path) {
            Ok(document) => state.document = document,
            Err(e) => error!("Error restoring snapshot {}: {:#}", path.display(), e),
        }
    } else if let Some(path) = state.global_config.chr_path.clone() {
        let (table_a, table_b) = persist::load_chr(&path);
        state.document.table_a = table_a;
        state.document.table_b = table_b;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_addressing_matches_row_major_grid() {
        let mut sheet = TileSheet::default();
        // Tile 17 sits at tile row 1, tile col 1, so its top-left pixel is
        // sheet pixel (8, 8).
        sheet.set_pixel(8, 8, 3);
        assert_eq!(sheet.tile(17)[0][0], 3);
        assert_eq!(sheet.tile(0)[0][0], 0);

        let mut block = [[0; TILE_DIM]; TILE_DIM];
        block[7][7] = 2;
        sheet.set_tile(255, block);
        assert_eq!(sheet.pixel(SHEET_DIM - 1, SHEET_DIM - 1), 2);
    }

    #[test]
    fn pixel_writes_mask_to_two_bits() {
        let mut sheet = TileSheet::default();
        sheet.set_pixel(0, 0, 7);
        assert_eq!(sheet.pixel(0, 0), 3);
    }

    #[test]
    fn document_edits_clamp_references() {
        let mut doc = Document::default();
        doc.set_metatile_ref(0, 1, 200);
        assert_eq!(
            doc.metametatiles[0].metatiles[1],
            METATILE_COUNT as MetatileRef - 1
        );
        doc.set_room_cell(0, 0, 0, 99);
        assert_eq!(
            doc.rooms[0].cells[0][0],
            METAMETATILE_COUNT as MetametatileRef - 1
        );
        doc.set_metatile_palette(5, 6);
        assert_eq!(doc.metatiles[5].palette, 2);
    }

    #[test]
    fn default_document_is_empty() {
        let doc = Document::default();
        assert_eq!(doc.metatiles.len(), METATILE_COUNT);
        assert!(doc
            .metatiles
            .iter()
            .all(|m| m.tiles == [0; 4] && m.palette == 0));
        assert!(doc
            .rooms
            .iter()
            .all(|r| r.cells == [[0; ROOM_COLS]; ROOM_ROWS]));
        assert_eq!(doc.table_a.pixel(64, 64), 0);
    }

    #[test]
    fn sheet_rows_round_trip() {
        let mut sheet = TileSheet::default();
        sheet.set_pixel(3, 100, 1);
        sheet.set_pixel(127, 0, 2);
        let rows = sheet.to_rows();
        assert_eq!(TileSheet::from_rows(&rows).unwrap(), sheet);

        let short = vec![vec![0; SHEET_DIM]; SHEET_DIM - 1];
        assert!(TileSheet::from_rows(&short).is_err());
    }
}
