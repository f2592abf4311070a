// Codec for the NES CHR pattern table format: 2 bits per pixel, stored as
// two 8-byte bit planes per 8x8 tile. Plane 0 carries bit 0 of each pixel,
// plane 1 carries bit 1, one byte per row, MSB = leftmost pixel.
use crate::state::{PixelIdx, TileRef, TileSheet, SHEET_TILE_COUNT, TILE_DIM};

pub const PLANE_BYTES: usize = TILE_DIM;
pub const TILE_BYTES: usize = 2 * PLANE_BYTES;
pub const SHEET_BYTES: usize = SHEET_TILE_COUNT * TILE_BYTES;
pub const CHR_BYTES: usize = 2 * SHEET_BYTES;

fn decode_tile(bytes: &[u8]) -> [[PixelIdx; TILE_DIM]; TILE_DIM] {
    let mut block = [[0; TILE_DIM]; TILE_DIM];
    for y in 0..TILE_DIM {
        for x in 0..TILE_DIM {
            let b0 = (bytes[y] >> (7 - x)) & 1;
            let b1 = (bytes[y + PLANE_BYTES] >> (7 - x)) & 1;
            block[y][x] = b0 | (b1 << 1);
        }
    }
    block
}

fn encode_tile(block: &[[PixelIdx; TILE_DIM]; TILE_DIM], out: &mut Vec<u8>) {
    for plane in 0..2 {
        for row in block.iter() {
            let mut byte = 0u8;
            for (x, &value) in row.iter().enumerate() {
                byte |= ((value >> plane) & 1) << (7 - x);
            }
            out.push(byte);
        }
    }
}

/// Decode a CHR byte stream into the two tile sheets. Tiles 0-255 fill
/// sheet A, tiles 256-511 fill sheet B, each placed in raster order within
/// its 16x16 tile grid. Input shorter than 512 tiles zero-fills the
/// remainder; a trailing partial tile record is ignored.
pub fn decode(bytes: &[u8]) -> (TileSheet, TileSheet) {
    let mut table_a = TileSheet::default();
    let mut table_b = TileSheet::default();
    for (i, chunk) in bytes
        .chunks_exact(TILE_BYTES)
        .take(2 * SHEET_TILE_COUNT)
        .enumerate()
    {
        let sheet = if i < SHEET_TILE_COUNT {
            &mut table_a
        } else {
            &mut table_b
        };
        sheet.set_tile((i % SHEET_TILE_COUNT) as TileRef, decode_tile(chunk));
    }
    (table_a, table_b)
}

/// Exact inverse of `decode`: emits 16 bytes per tile, all of sheet A
/// followed by all of sheet B, 8192 bytes total.
pub fn encode(table_a: &TileSheet, table_b: &TileSheet) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHR_BYTES);
    for sheet in [table_a, table_b] {
        for tile in 0..SHEET_TILE_COUNT {
            encode_tile(&sheet.tile(tile as TileRef), &mut out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SHEET_DIM;

    #[test]
    fn all_ones_tile_decodes_to_value_three() {
        // Both planes all-1 means bit0 = 1 and bit1 = 1 for every pixel.
        let mut bytes = vec![0u8; CHR_BYTES];
        for b in bytes[..TILE_BYTES].iter_mut() {
            *b = 0xff;
        }
        let (table_a, _) = decode(&bytes);
        for y in 0..TILE_DIM {
            for x in 0..TILE_DIM {
                assert_eq!(table_a.tile(0)[y][x], 3);
            }
        }
        assert_eq!(table_a.tile(1), [[0; TILE_DIM]; TILE_DIM]);
    }

    #[test]
    fn planes_combine_low_then_high() {
        let mut bytes = vec![0u8; TILE_BYTES];
        bytes[0] = 0b1000_0000; // plane 0, row 0: leftmost pixel
        bytes[PLANE_BYTES] = 0b0100_0000; // plane 1, row 0: second pixel
        let (table_a, _) = decode(&bytes);
        let tile = table_a.tile(0);
        assert_eq!(tile[0][0], 1);
        assert_eq!(tile[0][1], 2);
        assert_eq!(tile[0][2], 0);
    }

    #[test]
    fn tiles_fill_sheets_in_raster_order() {
        let mut bytes = vec![0u8; CHR_BYTES];
        // Tile 17 (sheet A) and tile 256 (first of sheet B): plane 0 all-1.
        for b in bytes[17 * TILE_BYTES..17 * TILE_BYTES + PLANE_BYTES].iter_mut() {
            *b = 0xff;
        }
        for b in bytes[256 * TILE_BYTES..256 * TILE_BYTES + PLANE_BYTES].iter_mut() {
            *b = 0xff;
        }
        let (table_a, table_b) = decode(&bytes);
        assert_eq!(table_a.pixel(8, 8), 1);
        assert_eq!(table_a.pixel(0, 0), 0);
        assert_eq!(table_b.pixel(0, 0), 1);
    }

    #[test]
    fn short_input_zero_fills() {
        // One full tile plus a partial record; the partial tile is dropped.
        let mut bytes = vec![0xff; TILE_BYTES + 7];
        bytes[TILE_BYTES..].fill(0xaa);
        let (table_a, table_b) = decode(&bytes);
        assert_eq!(table_a.tile(0)[0][0], 3);
        assert_eq!(table_a.tile(1), [[0; TILE_DIM]; TILE_DIM]);
        assert_eq!(table_b, TileSheet::default());
    }

    #[test]
    fn encode_decode_round_trips() {
        let mut table_a = TileSheet::default();
        let mut table_b = TileSheet::default();
        for row in 0..SHEET_DIM {
            for col in 0..SHEET_DIM {
                table_a.set_pixel(row, col, ((row * 7 + col * 3) % 4) as PixelIdx);
                table_b.set_pixel(row, col, ((row + col) % 4) as PixelIdx);
            }
        }
        let bytes = encode(&table_a, &table_b);
        assert_eq!(bytes.len(), CHR_BYTES);
        let (decoded_a, decoded_b) = decode(&bytes);
        assert_eq!(decoded_a, table_a);
        assert_eq!(decoded_b, table_b);
    }

    #[test]
    fn decode_encode_round_trips() {
        let bytes: Vec<u8> = (0..CHR_BYTES).map(|i| (i * 31 % 256) as u8).collect();
        let (table_a, table_b) = decode(&bytes);
        assert_eq!(encode(&table_a, &table_b), bytes);
    }
}
