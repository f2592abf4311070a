mod metatiles;
mod palette;
mod rooms;
mod sheet;

use std::path::PathBuf;

use iced::{
    alignment::Vertical,
    widget::{
        button, center, column, container, horizontal_space, mouse_area, opaque, row,
        scrollable::{Direction, Scrollbar},
        stack, text, Column, Scrollable,
    },
    Element, Font, Length, Theme,
};
use iced_aw::quad;

use crate::{
    message::Message,
    state::{Dialogue, EditorState, Mode, SheetId},
};

use metatiles::metatile_grid_view;
use palette::{color_scales_view, master_palette_view};
use rooms::{metametatile_grid_view, room_view};
use sheet::sheet_view;

pub async fn pick_chr_open() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Open CHR graphics ...")
        .add_filter("CHR graphics", &["chr"])
        .pick_file()
        .await;
    picked.map(|x| x.path().to_owned())
}

pub async fn pick_chr_save() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Save CHR graphics ...")
        .add_filter("CHR graphics", &["chr"])
        .save_file()
        .await;
    picked.map(|x| x.path().to_owned())
}

pub async fn pick_snapshot_open() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Import snapshot ...")
        .add_filter("JSON snapshot", &["json"])
        .pick_file()
        .await;
    picked.map(|x| x.path().to_owned())
}

pub async fn pick_snapshot_save() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Export snapshot ...")
        .add_filter("JSON snapshot", &["json"])
        .save_file()
        .await;
    picked.map(|x| x.path().to_owned())
}

pub async fn pick_tables_dir() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Select a folder for the exported data tables ...")
        .pick_folder()
        .await;
    picked.map(|x| x.path().to_owned())
}

pub async fn pick_png_save() -> Option<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Export room PNG ...")
        .add_filter("PNG image", &["png"])
        .save_file()
        .await;
    picked.map(|x| x.path().to_owned())
}

fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        iced::Color {
                            a: 0.5,
                            ..iced::Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

pub fn modal_background_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: iced::border::rounded(4)
            .color(palette.background.weak.color)
            .width(1.0),
        ..container::Style::default()
    }
}

fn vertical_separator() -> quad::Quad {
    quad::Quad {
        quad_color: iced::Color::from([0.5; 3]).into(),
        quad_border: iced::Border {
            radius: iced::border::Radius::new(1.0),
            ..Default::default()
        },
        inner_bounds: iced_aw::widget::InnerBounds::Ratio(1.0, 1.0),
        width: Length::Fixed(1.0),
        ..Default::default()
    }
}

pub fn help_view(_state: &EditorState) -> Element<Message> {
    let controls = vec![
        ("1", "Tiles view", "paint sheet pixels with the selected color"),
        ("2", "Metatiles view", "stamp tiles into 2x2 metatiles"),
        ("3", "Metametatiles view", "stamp metatiles into 2x2 blocks"),
        ("4", "Rooms view", "stamp metametatiles into the 6x8 room grid"),
        ("\u{2190}/\u{2192}", "Room navigation", "previous/next room"),
        ("Esc", "Close dialog", "dismiss this window"),
    ];
    let mut col = Column::new();
    col = col.push(text("Essential keyboard controls:"));
    for (key, name, desc) in controls {
        col = col.push(
            row![
                text(key).width(40).font(Font {
                    weight: iced::font::Weight::ExtraBold,
                    ..Default::default()
                }),
                text(format!("{}: {}", name, desc)).width(400),
            ]
            .align_y(Vertical::Center),
        );
    }

    container(col.spacing(10))
        .width(480)
        .padding(25)
        .style(modal_background_style)
        .into()
}

pub fn view_dialogue<'a>(
    state: &'a EditorState,
    main_view: Element<'a, Message>,
) -> Element<'a, Message> {
    if let Some(dialogue) = &state.dialogue {
        match dialogue {
            Dialogue::Help => modal(main_view, help_view(state), Message::HideModal),
        }
    } else {
        main_view
    }
}

fn mode_button(label: &str, mode: Mode, current: Mode) -> Element<'static, Message> {
    button(text(label.to_string()))
        .style(if mode == current {
            button::primary
        } else {
            button::secondary
        })
        .on_press(Message::SetMode(mode))
        .into()
}

fn toolbar(state: &EditorState) -> Element<Message> {
    row![
        button(text("Load CHR"))
            .style(button::secondary)
            .on_press(Message::OpenChr),
        button(text("Save CHR"))
            .style(button::secondary)
            .on_press(Message::SaveChr),
        button(text("Import"))
            .style(button::secondary)
            .on_press(Message::ImportSnapshot),
        button(text("Export"))
            .style(button::secondary)
            .on_press(Message::ExportSnapshot),
        button(text("Tables"))
            .style(button::secondary)
            .on_press(Message::ExportTables),
        button(text("PNG"))
            .style(button::secondary)
            .on_press(Message::ExportRoomPng),
        horizontal_space(),
        mode_button("Tiles", Mode::Tiles, state.mode),
        mode_button("Metatiles", Mode::Metatiles, state.mode),
        mode_button("Metametatiles", Mode::Metametatiles, state.mode),
        mode_button("Rooms", Mode::Rooms, state.mode),
        horizontal_space(),
        button(text("\u{F505}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press(Message::HelpDialogue),
    ]
    .spacing(10)
    .into()
}

fn sheet_button(label: &str, sheet: SheetId, current: SheetId) -> Element<'static, Message> {
    button(text(label.to_string()))
        .style(if sheet == current {
            button::primary
        } else {
            button::secondary
        })
        .on_press(Message::SetSheet(sheet))
        .into()
}

pub fn view(state: &EditorState) -> Element<Message> {
    let left_panel: Element<Message> = column![
        row![
            text("Tile sheet"),
            sheet_button("A", SheetId::A, state.active_sheet),
            sheet_button("B", SheetId::B, state.active_sheet),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        sheet_view(state),
        color_scales_view(state),
        master_palette_view(state),
    ]
    .spacing(10)
    .into();

    let right_panel: Element<Message> = match state.mode {
        Mode::Tiles => column![text(
            "Pick a color slot below, then paint pixels on the sheet."
        )]
        .width(420)
        .into(),
        Mode::Metatiles => column![text("Metatiles"), metatile_grid_view(state, false)]
            .spacing(5)
            .width(420)
            .into(),
        Mode::Metametatiles => Scrollable::with_direction(
            column![
                text("Metatiles"),
                metatile_grid_view(state, true),
                text("Metametatiles"),
                metametatile_grid_view(state, false),
            ]
            .spacing(5),
            Direction::Vertical(Scrollbar::default()),
        )
        .width(420)
        .height(Length::Fill)
        .into(),
        Mode::Rooms => Scrollable::with_direction(
            column![
                room_view(state),
                text("Metametatiles"),
                metametatile_grid_view(state, true),
            ]
            .spacing(5),
            Direction::Vertical(Scrollbar::default()),
        )
        .width(640)
        .height(Length::Fill)
        .into(),
    };

    let mut main_view: Element<Message> = column![
        toolbar(state),
        row![left_panel, vertical_separator(), right_panel]
            .spacing(10)
            .width(Length::Fill)
            .height(Length::Fill),
    ]
    .padding(10)
    .spacing(10)
    .into();

    main_view = view_dialogue(state, main_view);
    main_view
}
