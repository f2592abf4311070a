use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::{error, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Serializer;

use crate::chr;
use crate::palette::{
    format_master_ref, parse_master_ref, PaletteSet, SubPaletteIdx, SUBPALETTE_COUNT,
    SUBPALETTE_LEN,
};
use crate::state::{
    Document, EditorState, Metametatile, MetametatileRef, Metatile, MetatileRef, PixelIdx, Room,
    TileRef, TileSheet, METAMETATILE_COUNT, METATILE_COUNT, ROOM_COLS, ROOM_COUNT, ROOM_ROWS,
};

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser).unwrap();
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn load_global_config(state: &mut EditorState) -> Result<()> {
    state.global_config = load_json(&state.global_config_path)?;
    Ok(())
}

pub fn save_global_config(state: &mut EditorState) -> Result<()> {
    if state.global_config.modified {
        save_json(&state.global_config_path, &state.global_config)?;
        state.global_config.modified = false;
    }
    Ok(())
}

/// The interchange form of the document. Palette references travel as
/// 0x-prefixed hex strings; everything else is plain decimal.
#[derive(Serialize, Deserialize)]
pub struct Snapshot {
    pub palettes: Vec<Vec<String>>,
    pub table_a: Vec<Vec<PixelIdx>>,
    pub table_b: Vec<Vec<PixelIdx>>,
    pub metatiles: Vec<[TileRef; 4]>,
    pub metatile_palettes: Vec<SubPaletteIdx>,
    pub metametatiles: Vec<[MetatileRef; 4]>,
    pub rooms: Vec<[[MetametatileRef; ROOM_COLS]; ROOM_ROWS]>,
}

pub fn snapshot(doc: &Document) -> Snapshot {
    Snapshot {
        palettes: (0..SUBPALETTE_COUNT as SubPaletteIdx)
            .map(|i| doc.palettes.get(i).iter().map(|&m| format_master_ref(m)).collect())
            .collect(),
        table_a: doc.table_a.to_rows(),
        table_b: doc.table_b.to_rows(),
        metatiles: doc.metatiles.iter().map(|m| m.tiles).collect(),
        metatile_palettes: doc.metatiles.iter().map(|m| m.palette).collect(),
        metametatiles: doc.metametatiles.iter().map(|m| m.metatiles).collect(),
        rooms: doc.rooms.iter().map(|r| r.cells).collect(),
    }
}

/// Rebuild a document from an interchange record. The shape is validated
/// up front and reference values go through the usual masking, so a
/// restored document satisfies the same invariants as an edited one. On
/// any failure the caller's current document is left untouched.
pub fn restore(record: &Snapshot) -> Result<Document> {
    ensure!(
        record.palettes.len() == SUBPALETTE_COUNT,
        "snapshot has {} palettes, expected {}",
        record.palettes.len(),
        SUBPALETTE_COUNT
    );
    ensure!(
        record.metatiles.len() == METATILE_COUNT,
        "snapshot has {} metatiles, expected {}",
        record.metatiles.len(),
        METATILE_COUNT
    );
    ensure!(
        record.metatile_palettes.len() == METATILE_COUNT,
        "snapshot has {} metatile palettes, expected {}",
        record.metatile_palettes.len(),
        METATILE_COUNT
    );
    ensure!(
        record.metametatiles.len() == METAMETATILE_COUNT,
        "snapshot has {} metametatiles, expected {}",
        record.metametatiles.len(),
        METAMETATILE_COUNT
    );
    ensure!(
        record.rooms.len() == ROOM_COUNT,
        "snapshot has {} rooms, expected {}",
        record.rooms.len(),
        ROOM_COUNT
    );

    let mut palettes = PaletteSet::default();
    for (i, sub) in record.palettes.iter().enumerate() {
        ensure!(
            sub.len() == SUBPALETTE_LEN,
            "sub-palette {} has {} entries, expected {}",
            i,
            sub.len(),
            SUBPALETTE_LEN
        );
        for (slot, s) in sub.iter().enumerate() {
            palettes.set_entry(i as SubPaletteIdx, slot as u8, parse_master_ref(s)?);
        }
    }

    let mut doc = Document {
        table_a: TileSheet::from_rows(&record.table_a).context("bad table_a")?,
        table_b: TileSheet::from_rows(&record.table_b).context("bad table_b")?,
        palettes,
        metatiles: vec![Metatile::default(); METATILE_COUNT],
        metametatiles: vec![Metametatile::default(); METAMETATILE_COUNT],
        rooms: vec![Room::default(); ROOM_COUNT],
    };
    for i in 0..METATILE_COUNT {
        for quadrant in 0..4 {
            doc.set_tile_ref(i as MetatileRef, quadrant, record.metatiles[i][quadrant]);
        }
        doc.set_metatile_palette(i as MetatileRef, record.metatile_palettes[i]);
    }
    for i in 0..METAMETATILE_COUNT {
        for quadrant in 0..4 {
            doc.set_metatile_ref(
                i as MetametatileRef,
                quadrant,
                record.metametatiles[i][quadrant],
            );
        }
    }
    for i in 0..ROOM_COUNT {
        for row in 0..ROOM_ROWS {
            for col in 0..ROOM_COLS {
                doc.set_room_cell(i, row, col, record.rooms[i][row][col]);
            }
        }
    }
    Ok(doc)
}

pub fn save_snapshot(path: &Path, doc: &Document) -> Result<()> {
    save_json(path, &snapshot(doc))
}

pub fn load_snapshot(path: &Path) -> Result<Document> {
    let record: Snapshot = load_json(path)?;
    restore(&record)
}

/// Load a CHR file into a pair of tile sheets. Unreadable data yields a
/// blank pair so the editor stays usable with an empty canvas.
pub fn load_chr(path: &Path) -> (TileSheet, TileSheet) {
    info!("Loading {}", path.display());
    match fs::read(path) {
        Ok(bytes) => chr::decode(&bytes),
        Err(e) => {
            error!("Error reading CHR file {}: {}", path.display(), e);
            (TileSheet::default(), TileSheet::default())
        }
    }
}

pub fn save_chr(path: &Path, doc: &Document) -> Result<()> {
    info!("Saving {}", path.display());
    fs::write(path, chr::encode(&doc.table_a, &doc.table_b))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SheetId;

    fn sample_document() -> Document {
        let mut doc = Document::default();
        doc.set_pixel_index(SheetId::A, 0, 0, 3);
        doc.set_pixel_index(SheetId::B, 127, 127, 1);
        doc.palettes.set_entry(1, 3, 0x2a);
        doc.set_tile_ref(0, 1, 200);
        doc.set_metatile_palette(0, 1);
        doc.set_metatile_ref(3, 2, 17);
        doc.set_room_cell(47, 5, 7, 21);
        doc
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let doc = sample_document();
        let restored = restore(&snapshot(&doc)).unwrap();
        assert!(restored == doc);
    }

    #[test]
    fn snapshot_uses_hex_palette_references() {
        let doc = Document::default();
        let record = snapshot(&doc);
        assert_eq!(record.palettes[0], ["0x0f", "0x13", "0x23", "0x30"]);
        assert_eq!(record.table_a.len(), 128);
        assert_eq!(record.rooms.len(), ROOM_COUNT);
    }

    #[test]
    fn restore_rejects_wrong_shapes() {
        let doc = Document::default();

        let mut record = snapshot(&doc);
        record.metatiles.pop();
        assert!(restore(&record).is_err());

        let mut record = snapshot(&doc);
        record.palettes[2].pop();
        assert!(restore(&record).is_err());

        let mut record = snapshot(&doc);
        record.table_a.pop();
        assert!(restore(&record).is_err());

        let mut record = snapshot(&doc);
        record.palettes[0][0] = "13".to_string();
        assert!(restore(&record).is_err());
    }

    #[test]
    fn restore_masks_out_of_range_references() {
        let mut record = snapshot(&Document::default());
        record.metametatiles[0][0] = 200;
        record.rooms[0][0][0] = 255;
        record.metatile_palettes[0] = 9;
        let doc = restore(&record).unwrap();
        assert_eq!(doc.metametatiles[0].metatiles[0], 47);
        assert_eq!(doc.rooms[0].cells[0][0], 47);
        assert_eq!(doc.metatiles[0].palette, 1);
    }

    #[test]
    fn snapshot_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let doc = sample_document();
        save_snapshot(&path, &doc).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded == doc);
    }

    #[test]
    fn malformed_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"{\"palettes\": []").unwrap();
        assert!(load_snapshot(&path).is_err());
    }

    #[test]
    fn chr_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphics.chr");
        let doc = sample_document();
        save_chr(&path, &doc).unwrap();
        let (table_a, table_b) = load_chr(&path);
        assert!(table_a == doc.table_a);
        assert!(table_b == doc.table_b);
    }

    #[test]
    fn missing_chr_file_recovers_blank() {
        let (table_a, table_b) = load_chr(Path::new("/nonexistent/graphics.chr"));
        assert!(table_a == TileSheet::default());
        assert!(table_b == TileSheet::default());
    }
}
