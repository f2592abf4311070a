use std::path::PathBuf;

use crate::palette::{MasterRef, SubPaletteIdx};
use crate::state::{MetametatileRef, MetatileRef, Mode, PixelCoord, PixelIdx, SheetId, TileRef};

#[derive(Debug, Clone)]
pub enum Message {
    Event(iced::Event),
    SetMode(Mode),
    SetSheet(SheetId),
    HelpDialogue,
    HideModal,

    // Palette editing:
    SelectColorSlot(SubPaletteIdx, PixelIdx),
    AssignMasterColor(MasterRef),

    // Hierarchy editing; the payload carries the click target, the current
    // selection supplies the value being assigned.
    PaintSheetPixel(PixelCoord, PixelCoord),
    SelectTile(TileRef),
    SetMetatileTile { metatile: MetatileRef, quadrant: u8 },
    SelectMetatile(MetatileRef),
    SetMetametatileCell { metametatile: MetametatileRef, quadrant: u8 },
    SelectMetametatile(MetametatileRef),
    SetRoomCell { row: u8, col: u8 },
    SetActiveRoom(u8),
    NextRoom,
    PrevRoom,

    // File operations, each a dialog pick followed by the completion:
    OpenChr,
    ChrOpened(Option<PathBuf>),
    SaveChr,
    ChrSaveSelected(Option<PathBuf>),
    ImportSnapshot,
    SnapshotOpened(Option<PathBuf>),
    ExportSnapshot,
    SnapshotSaveSelected(Option<PathBuf>),
    ExportTables,
    TablesDirSelected(Option<PathBuf>),
    ExportRoomPng,
    RoomPngSelected(Option<PathBuf>),
}
