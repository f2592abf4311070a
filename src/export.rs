// One-way exports consumed outside the editor: C data tables for an NES
// build, and a PNG render of a composed room.
use std::fmt::Write as _;
use std::{fs, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use log::info;

use crate::compose;
use crate::palette::{format_master_ref, SubPaletteIdx, SUBPALETTE_COUNT, SUBPALETTE_LEN};
use crate::state::{Document, ROOM_COLS, ROOM_COUNT, ROOM_ROWS};

fn metatiles_table(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("const unsigned char metatiles[] = {\n");
    for metatile in &doc.metatiles {
        out.push('\t');
        for &tile in &metatile.tiles {
            write!(out, "{}, ", tile).unwrap();
        }
        write!(out, "{}, ", metatile.palette).unwrap();
        out.push('\n');
    }
    out.push_str("};\n\n");
    out
}

fn metametatiles_table(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("const unsigned char metametatiles[] = {\n");
    for mmt in &doc.metametatiles {
        out.push('\t');
        for &metatile in &mmt.metatiles {
            write!(out, "{}, ", metatile).unwrap();
        }
        out.push('\n');
    }
    out.push_str("};\n\n");
    out
}

fn rooms_table(doc: &Document) -> String {
    let mut out = String::new();
    for (i, room) in doc.rooms.iter().enumerate() {
        write!(out, "const unsigned char room_{}[] = {{\n", i).unwrap();
        for row in 0..ROOM_ROWS {
            out.push('\t');
            for col in 0..ROOM_COLS {
                write!(out, "{}, ", room.cells[row][col]).unwrap();
            }
            out.push('\n');
        }
        out.push_str("};\n\n");
    }
    out
}

fn palettes_table(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("const unsigned char palettes[] = {\n");
    for i in 0..SUBPALETTE_COUNT as SubPaletteIdx {
        out.push('\t');
        for slot in 0..SUBPALETTE_LEN as u8 {
            write!(out, "{}, ", format_master_ref(doc.palettes.entry(i, slot))).unwrap();
        }
        out.push('\n');
    }
    out.push_str("};\n\n");
    out
}

/// Write the document's reference tables as C array source files into
/// `dir`, one artifact per level. This is a lossy, one-way dump for the
/// game-engine build; there is no matching import.
pub fn write_tables(dir: &Path, doc: &Document) -> Result<()> {
    info!("Exporting data tables to {}", dir.display());
    fs::create_dir_all(dir)?;
    fs::write(dir.join("metatiles.h"), metatiles_table(doc))?;
    fs::write(dir.join("metametatiles.h"), metametatiles_table(doc))?;
    fs::write(dir.join("rooms.h"), rooms_table(doc))?;
    fs::write(dir.join("palettes.h"), palettes_table(doc))?;
    Ok(())
}

/// Render one composed room to an RGB PNG.
pub fn save_room_png(path: &Path, doc: &Document, room: usize) -> Result<()> {
    info!("Exporting room {} to {}", room % ROOM_COUNT, path.display());
    let buffer = compose::compose_room(doc, room);
    let file = fs::File::create(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        buffer.width() as u32,
        buffer.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&buffer.to_rgb_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::METATILE_COUNT;

    #[test]
    fn metatiles_rows_carry_palette_selector() {
        let mut doc = Document::default();
        doc.set_tile_ref(0, 0, 1);
        doc.set_tile_ref(0, 1, 2);
        doc.set_tile_ref(0, 2, 17);
        doc.set_tile_ref(0, 3, 18);
        doc.set_metatile_palette(0, 2);
        let table = metatiles_table(&doc);
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("const unsigned char metatiles[] = {"));
        assert_eq!(lines.next(), Some("\t1, 2, 17, 18, 2, "));
        assert_eq!(lines.next(), Some("\t0, 0, 0, 0, 0, "));
        assert_eq!(table.trim_end().lines().count(), METATILE_COUNT + 2);
        assert!(table.ends_with("};\n\n"));
    }

    #[test]
    fn rooms_table_has_one_array_per_room() {
        let mut doc = Document::default();
        doc.set_room_cell(1, 0, 2, 7);
        let table = rooms_table(&doc);
        assert_eq!(
            table.matches("const unsigned char room_").count(),
            ROOM_COUNT
        );
        assert!(table.contains("const unsigned char room_47[] = {\n"));
        assert!(table.contains("\t0, 0, 7, 0, 0, 0, 0, 0, \n"));
    }

    #[test]
    fn palettes_table_uses_hex_bytes() {
        let doc = Document::default();
        let table = palettes_table(&doc);
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("const unsigned char palettes[] = {"));
        assert_eq!(lines.next(), Some("\t0x0f, 0x13, 0x23, 0x30, "));
        assert_eq!(lines.next(), Some("\t0x0f, 0x16, 0x26, 0x37, "));
    }

    #[test]
    fn write_tables_emits_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::default();
        write_tables(dir.path(), &doc).unwrap();
        for name in ["metatiles.h", "metametatiles.h", "rooms.h", "palettes.h"] {
            let text = fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(text.contains("const unsigned char"), "{} is empty", name);
        }
    }

    #[test]
    fn room_png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room_0.png");
        let doc = Document::default();
        save_room_png(&path, &doc, 0).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
