// Fixed NES master palette plus the four editable 4-color sub-palettes.
use anyhow::{bail, Context, Result};

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorRGB = [ColorValue; 3];
pub type MasterRef = u8; // Index into the master palette (0-63)
pub type SubPaletteIdx = u8; // Index into the sub-palette list (0-3)

pub const MASTER_PALETTE_LEN: usize = 64;
pub const SUBPALETTE_COUNT: usize = 4;
pub const SUBPALETTE_LEN: usize = 4;

// The 2C02 output colors, one RGB triple per master palette entry.
pub const MASTER_PALETTE: [ColorRGB; MASTER_PALETTE_LEN] = [
    [124, 124, 124],
    [0, 0, 252],
    [0, 0, 188],
    [68, 40, 188],
    [148, 0, 132],
    [168, 0, 32],
    [96, 0, 0],
    [136, 20, 0],
    [80, 48, 0],
    [0, 120, 0],
    [0, 104, 0],
    [0, 88, 0],
    [0, 64, 88],
    [0, 0, 0],
    [0, 0, 0],
    [0, 0, 0],
    [188, 188, 188],
    [0, 120, 248],
    [0, 88, 248],
    [104, 68, 252],
    [216, 0, 204],
    [228, 0, 88],
    [152, 50, 0],
    [228, 92, 16],
    [172, 124, 0],
    [0, 184, 0],
    [0, 168, 0],
    [0, 168, 68],
    [0, 136, 136],
    [0, 0, 0],
    [0, 0, 0],
    [0, 0, 0],
    [248, 248, 248],
    [60, 188, 252],
    [104, 136, 252],
    [152, 120, 248],
    [248, 120, 248],
    [248, 88, 152],
    [255, 141, 108],
    [252, 160, 68],
    [248, 184, 0],
    [184, 248, 24],
    [88, 216, 84],
    [88, 248, 152],
    [0, 232, 216],
    [120, 120, 120],
    [0, 0, 0],
    [0, 0, 0],
    [252, 252, 252],
    [164, 228, 252],
    [184, 184, 248],
    [216, 184, 248],
    [248, 184, 248],
    [248, 164, 192],
    [244, 210, 198],
    [252, 224, 168],
    [248, 216, 120],
    [216, 248, 120],
    [184, 248, 184],
    [184, 248, 216],
    [0, 252, 252],
    [248, 216, 248],
    [0, 0, 0],
    [0, 0, 0],
];

const DEFAULT_SUBPALETTES: [[MasterRef; SUBPALETTE_LEN]; SUBPALETTE_COUNT] = [
    [0x0f, 0x13, 0x23, 0x30],
    [0x0f, 0x16, 0x26, 0x37],
    [0x0f, 0x0c, 0x1c, 0x2c],
    [0x0f, 0x29, 0x38, 0x30],
];

pub fn master_color(index: MasterRef) -> ColorRGB {
    MASTER_PALETTE[(index & 0x3f) as usize]
}

/// The four sub-palettes, each an ordered list of 4 master palette
/// references. Entry 0 is conventionally the background color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteSet {
    entries: [[MasterRef; SUBPALETTE_LEN]; SUBPALETTE_COUNT],
}

impl Default for PaletteSet {
    fn default() -> Self {
        PaletteSet {
            entries: DEFAULT_SUBPALETTES,
        }
    }
}

impl PaletteSet {
    pub fn get(&self, subpalette: SubPaletteIdx) -> [MasterRef; SUBPALETTE_LEN] {
        self.entries[(subpalette & 3) as usize]
    }

    pub fn entry(&self, subpalette: SubPaletteIdx, slot: u8) -> MasterRef {
        self.entries[(subpalette & 3) as usize][(slot & 3) as usize]
    }

    pub fn set_entry(&mut self, subpalette: SubPaletteIdx, slot: u8, master: MasterRef) {
        self.entries[(subpalette & 3) as usize][(slot & 3) as usize] = master & 0x3f;
    }

    pub fn color(&self, subpalette: SubPaletteIdx, slot: u8) -> ColorRGB {
        master_color(self.entry(subpalette, slot))
    }
}

// Master palette references travel as 0x-prefixed hex strings in the
// snapshot format, matching the conventional numbering of the NES palette.
pub fn format_master_ref(master: MasterRef) -> String {
    format!("{:#04x}", master)
}

pub fn parse_master_ref(s: &str) -> Result<MasterRef> {
    let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
        bail!("master palette reference {:?} is missing the 0x prefix", s);
    };
    let value = u8::from_str_radix(digits, 16)
        .with_context(|| format!("invalid master palette reference {:?}", s))?;
    Ok(value & 0x3f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_color_masks_high_bits() {
        assert_eq!(master_color(0xff), master_color(0xff & 0x3f));
        assert_eq!(master_color(0x30), [252, 252, 252]);
    }

    #[test]
    fn default_subpalettes() {
        let pal = PaletteSet::default();
        assert_eq!(pal.get(0), [0x0f, 0x13, 0x23, 0x30]);
        assert_eq!(pal.get(3), [0x0f, 0x29, 0x38, 0x30]);
        // Entry 0 of every default sub-palette is the shared background.
        for i in 0..SUBPALETTE_COUNT as SubPaletteIdx {
            assert_eq!(pal.entry(i, 0), 0x0f);
        }
    }

    #[test]
    fn set_entry_masks_value() {
        let mut pal = PaletteSet::default();
        pal.set_entry(1, 2, 0x7f);
        assert_eq!(pal.entry(1, 2), 0x3f);
    }

    #[test]
    fn hex_references_round_trip() {
        for master in 0..MASTER_PALETTE_LEN as MasterRef {
            let s = format_master_ref(master);
            assert_eq!(parse_master_ref(&s).unwrap(), master);
        }
        assert_eq!(format_master_ref(0x0f), "0x0f");
        assert_eq!(parse_master_ref("0x2C").unwrap(), 0x2c);
        assert!(parse_master_ref("2c").is_err());
        assert!(parse_master_ref("0xzz").is_err());
    }
}
