// Module for displaying and editing the four sub-palettes and the fixed
// 64-color master palette.
use iced::{
    alignment::Vertical,
    mouse,
    widget::{canvas, row, text, Column, Row},
    Element, Size,
};

use crate::{
    message::Message,
    palette::{ColorRGB, MasterRef, MASTER_PALETTE, SUBPALETTE_LEN},
    state::EditorState,
};

#[derive(Debug)]
struct ColorBox {
    color: ColorRGB,
    thickness: f32,
    selected: bool,
    message: Message,
}

impl canvas::Program<Message> for ColorBox {
    // No internal state
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if cursor.position_in(bounds).is_none() {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            canvas::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::ButtonPressed(button) => {
                    let message = match button {
                        mouse::Button::Left => Some(self.message.clone()),
                        _ => None,
                    };
                    (canvas::event::Status::Captured, message)
                }
                _ => (canvas::event::Status::Ignored, None),
            },
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let thickness = self.thickness;
        let size = Size {
            width: frame.size().width - 2.0 * thickness,
            height: frame.size().height - 2.0 * thickness - 1.0,
        };
        frame.fill_rectangle(
            iced::Point {
                x: thickness,
                y: thickness,
            },
            size,
            iced::Color::from_rgb8(self.color[0], self.color[1], self.color[2]),
        );

        if self.selected {
            let border_color = if theme.extended_palette().is_dark {
                iced::Color::WHITE
            } else {
                iced::Color::BLACK
            };
            let size = Size {
                width: frame.size().width - thickness,
                height: frame.size().height - thickness - 1.0,
            };
            frame.stroke_rectangle(
                iced::Point {
                    x: thickness / 2.0,
                    y: thickness / 2.0,
                },
                size,
                canvas::Stroke {
                    width: thickness,
                    style: border_color.into(),
                    ..Default::default()
                },
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

/// The four sub-palettes as rows of 4 clickable swatches. Clicking selects
/// both the sub-palette and the color slot within it.
pub fn color_scales_view(state: &EditorState) -> Element<Message> {
    let mut col: Column<Message> = Column::new().spacing(2);
    let size = 25.0;
    for subpalette in 0..4u8 {
        let mut colors_row: Row<Message> = Row::new().spacing(2);
        colors_row = colors_row.push(
            text(format!("{}", subpalette))
                .width(15)
                .align_y(Vertical::Center),
        );
        for slot in 0..SUBPALETTE_LEN as u8 {
            colors_row = colors_row.push(
                canvas(ColorBox {
                    color: state.document.palettes.color(subpalette, slot),
                    thickness: 2.0,
                    selected: subpalette == state.selected_palette
                        && slot == state.selected_slot,
                    message: Message::SelectColorSlot(subpalette, slot),
                })
                .width(size)
                .height(size),
            );
        }
        col = col.push(colors_row.align_y(Vertical::Center));
    }
    row![col].padding(5).into()
}

/// The 64-entry master palette as a 4x16 grid. Clicking assigns the master
/// color to the selected sub-palette slot.
pub fn master_palette_view(state: &EditorState) -> Element<Message> {
    let selected_master = state
        .document
        .palettes
        .entry(state.selected_palette, state.selected_slot);
    let mut col: Column<Message> = Column::new();
    let size = 22.0;
    for row_idx in 0..4 {
        let mut colors_row: Row<Message> = Row::new();
        for col_idx in 0..16 {
            let master = (row_idx * 16 + col_idx) as MasterRef;
            colors_row = colors_row.push(
                canvas(ColorBox {
                    color: MASTER_PALETTE[master as usize],
                    thickness: 1.0,
                    selected: master == selected_master,
                    message: Message::AssignMasterColor(master),
                })
                .width(size)
                .height(size),
            );
        }
        col = col.push(colors_row);
    }
    row![col].padding(5).into()
}
