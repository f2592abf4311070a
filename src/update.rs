use iced::{
    keyboard::{self, key},
    Event, Task,
};
use log::{error, info};

use crate::{
    message::Message,
    persist,
    state::{Dialogue, EditorState, Mode, ROOM_COUNT},
    view,
};

fn save_config(state: &mut EditorState) {
    if let Err(e) = persist::save_global_config(state) {
        error!("Error saving global config: {:#}", e);
    }
}

pub fn update(state: &mut EditorState, message: Message) -> Task<Message> {
    match message {
        Message::Event(event) => match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Escape),
                ..
            }) => {
                state.dialogue = None;
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowRight),
                ..
            }) => {
                if state.mode == Mode::Rooms {
                    state.active_room = (state.active_room + 1) % ROOM_COUNT as u8;
                }
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowLeft),
                ..
            }) => {
                if state.mode == Mode::Rooms {
                    state.active_room =
                        (state.active_room + ROOM_COUNT as u8 - 1) % ROOM_COUNT as u8;
                }
            }
            Event::Keyboard(keyboard::Event::KeyPressed { modified_key, .. }) => {
                if modified_key == keyboard::Key::Character("1".into()) {
                    state.mode = Mode::Tiles;
                } else if modified_key == keyboard::Key::Character("2".into()) {
                    state.mode = Mode::Metatiles;
                } else if modified_key == keyboard::Key::Character("3".into()) {
                    state.mode = Mode::Metametatiles;
                } else if modified_key == keyboard::Key::Character("4".into()) {
                    state.mode = Mode::Rooms;
                }
            }
            _ => {}
        },
        Message::SetMode(mode) => {
            state.mode = mode;
        }
        Message::SetSheet(sheet) => {
            state.active_sheet = sheet;
        }
        Message::HelpDialogue => {
            state.dialogue = Some(Dialogue::Help);
        }
        Message::HideModal => {
            state.dialogue = None;
        }
        Message::SelectColorSlot(subpalette, slot) => {
            state.selected_palette = subpalette;
            state.selected_slot = slot;
        }
        Message::AssignMasterColor(master) => {
            state
                .document
                .palettes
                .set_entry(state.selected_palette, state.selected_slot, master);
        }
        Message::PaintSheetPixel(x, y) => {
            state.document.set_pixel_index(
                state.active_sheet,
                y as usize,
                x as usize,
                state.selected_slot,
            );
        }
        Message::SelectTile(tile) => {
            state.selected_tile = tile;
        }
        Message::SetMetatileTile { metatile, quadrant } => {
            state
                .document
                .set_tile_ref(metatile, quadrant as usize, state.selected_tile);
            // Stamping a tile also claims the active sub-palette, matching
            // the metatile panel's click behavior.
            state
                .document
                .set_metatile_palette(metatile, state.selected_palette);
        }
        Message::SelectMetatile(metatile) => {
            state.selected_metatile = metatile;
        }
        Message::SetMetametatileCell {
            metametatile,
            quadrant,
        } => {
            state.document.set_metatile_ref(
                metametatile,
                quadrant as usize,
                state.selected_metatile,
            );
        }
        Message::SelectMetametatile(mmt) => {
            state.selected_metametatile = mmt;
        }
        Message::SetRoomCell { row, col } => {
            state.document.set_room_cell(
                state.active_room as usize,
                row as usize,
                col as usize,
                state.selected_metametatile,
            );
        }
        Message::SetActiveRoom(room) => {
            state.active_room = room.min(ROOM_COUNT as u8 - 1);
        }
        Message::NextRoom => {
            state.active_room = (state.active_room + 1) % ROOM_COUNT as u8;
        }
        Message::PrevRoom => {
            state.active_room = (state.active_room + ROOM_COUNT as u8 - 1) % ROOM_COUNT as u8;
        }
        Message::OpenChr => {
            return Task::perform(view::pick_chr_open(), Message::ChrOpened);
        }
        Message::ChrOpened(path) => {
            if let Some(p) = path {
                let (table_a, table_b) = persist::load_chr(&p);
                state.document.table_a = table_a;
                state.document.table_b = table_b;
                state.global_config.chr_path = Some(p);
                state.global_config.modified = true;
                save_config(state);
            }
        }
        Message::SaveChr => {
            return Task::perform(view::pick_chr_save(), Message::ChrSaveSelected);
        }
        Message::ChrSaveSelected(path) => {
            if let Some(p) = path {
                if let Err(e) = persist::save_chr(&p, &state.document) {
                    error!("Error saving CHR file: {:#}", e);
                    return Task::none();
                }
                state.global_config.chr_path = Some(p);
                state.global_config.modified = true;
                save_config(state);
            }
        }
        Message::ImportSnapshot => {
            return Task::perform(view::pick_snapshot_open(), Message::SnapshotOpened);
        }
        Message::SnapshotOpened(path) => {
            if let Some(p) = path {
                // The document is only replaced once the whole record has
                // been read and validated.
                match persist::load_snapshot(&p) {
                    Ok(document) => {
                        state.document = document;
                        state.global_config.snapshot_path = Some(p);
                        state.global_config.modified = true;
                        save_config(state);
                    }
                    Err(e) => {
                        error!("Error importing snapshot: {:#}", e);
                    }
                }
            }
        }
        Message::ExportSnapshot => {
            return Task::perform(view::pick_snapshot_save(), Message::SnapshotSaveSelected);
        }
        Message::SnapshotSaveSelected(path) => {
            if let Some(p) = path {
                if let Err(e) = persist::save_snapshot(&p, &state.document) {
                    error!("Error exporting snapshot: {:#}", e);
                    return Task::none();
                }
                state.global_config.snapshot_path = Some(p);
                state.global_config.modified = true;
                save_config(state);
            }
        }
        Message::ExportTables => {
            return Task::perform(view::pick_tables_dir(), Message::TablesDirSelected);
        }
        Message::TablesDirSelected(path) => {
            if let Some(p) = path {
                match crate::export::write_tables(&p, &state.document) {
                    Ok(()) => info!("Data tables written to {}", p.display()),
                    Err(e) => error!("Error exporting data tables: {:#}", e),
                }
            }
        }
        Message::ExportRoomPng => {
            return Task::perform(view::pick_png_save(), Message::RoomPngSelected);
        }
        Message::RoomPngSelected(path) => {
            if let Some(p) = path {
                if let Err(e) =
                    crate::export::save_room_png(&p, &state.document, state.active_room as usize)
                {
                    error!("Error exporting room PNG: {:#}", e);
                }
            }
        }
    }
    Task::none()
}
