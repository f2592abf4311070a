// Module for the metametatile grid and the active room canvas.
use iced::{
    alignment::Vertical,
    mouse,
    widget::{button, canvas, column, row, stack, text},
    Element, Point, Rectangle, Size,
};
use iced_aw::number_input;

use crate::{
    compose::{self, RgbBuffer, METAMETATILE_DIM, METATILE_DIM},
    message::Message,
    state::{EditorState, MetametatileRef, METAMETATILE_COUNT, ROOM_COUNT},
};

use super::sheet::SelectionBox;

const GRID_COLS: usize = 6;
const GRID_ROWS: usize = METAMETATILE_COUNT / GRID_COLS;

struct MetametatileGrid {
    buffer: RgbBuffer,
    pixel_size: f32,
    select_only: bool,
}

impl canvas::Program<Message> for MetametatileGrid {
    // No internal state
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(p) = cursor.position_in(bounds) else {
            return (canvas::event::Status::Ignored, None);
        };
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let x = (p.x / self.pixel_size) as usize;
                let y = (p.y / self.pixel_size) as usize;
                let slot_col = x / METAMETATILE_DIM;
                let slot_row = y / METAMETATILE_DIM;
                if slot_col >= GRID_COLS || slot_row >= GRID_ROWS {
                    return (canvas::event::Status::Ignored, None);
                }
                let slot = (slot_row * GRID_COLS + slot_col) as MetametatileRef;
                let message = if self.select_only {
                    Message::SelectMetametatile(slot)
                } else {
                    let quadrant_col = x % METAMETATILE_DIM / METATILE_DIM;
                    let quadrant_row = y % METAMETATILE_DIM / METATILE_DIM;
                    Message::SetMetametatileCell {
                        metametatile: slot,
                        quadrant: (quadrant_row * 2 + quadrant_col) as u8,
                    }
                };
                (canvas::event::Status::Captured, Some(message))
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let image = iced::advanced::image::Image::new(iced::advanced::image::Handle::from_rgba(
            self.buffer.width() as u32,
            self.buffer.height() as u32,
            self.buffer.to_rgba_bytes(),
        ))
        .filter_method(iced::widget::image::FilterMethod::Nearest)
        .snap(true);

        frame.draw_image(
            Rectangle::new(
                Point::new(1.0, 1.0),
                Size {
                    width: self.buffer.width() as f32 * self.pixel_size,
                    height: self.buffer.height() as f32 * self.pixel_size,
                },
            ),
            image,
        );

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

struct RoomCanvas {
    buffer: RgbBuffer,
    pixel_size: f32,
}

impl canvas::Program<Message> for RoomCanvas {
    // No internal state
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(p) = cursor.position_in(bounds) else {
            return (canvas::event::Status::Ignored, None);
        };
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let x = (p.x / self.pixel_size) as usize;
                let y = (p.y / self.pixel_size) as usize;
                if x >= self.buffer.width() || y >= self.buffer.height() {
                    return (canvas::event::Status::Ignored, None);
                }
                (
                    canvas::event::Status::Captured,
                    Some(Message::SetRoomCell {
                        row: (y / METAMETATILE_DIM) as u8,
                        col: (x / METAMETATILE_DIM) as u8,
                    }),
                )
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let image = iced::advanced::image::Image::new(iced::advanced::image::Handle::from_rgba(
            self.buffer.width() as u32,
            self.buffer.height() as u32,
            self.buffer.to_rgba_bytes(),
        ))
        .filter_method(iced::widget::image::FilterMethod::Nearest)
        .snap(true);

        frame.draw_image(
            Rectangle::new(
                Point::new(1.0, 1.0),
                Size {
                    width: self.buffer.width() as f32 * self.pixel_size,
                    height: self.buffer.height() as f32 * self.pixel_size,
                },
            ),
            image,
        );

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

fn grid_buffer(state: &EditorState) -> RgbBuffer {
    let mut buffer = RgbBuffer::new(GRID_COLS * METAMETATILE_DIM, GRID_ROWS * METAMETATILE_DIM);
    for i in 0..METAMETATILE_COUNT {
        let x = i % GRID_COLS * METAMETATILE_DIM;
        let y = i / GRID_COLS * METAMETATILE_DIM;
        buffer.blit(
            &compose::compose_metametatile(&state.document, i as MetametatileRef),
            x,
            y,
        );
    }
    buffer
}

pub fn metametatile_grid_view(state: &EditorState, select_only: bool) -> Element<Message> {
    let pixel_size = 1.5;
    let buffer = grid_buffer(state);
    let width = buffer.width() as f32 * pixel_size + 2.0;
    let height = buffer.height() as f32 * pixel_size + 2.0;

    let base = canvas(MetametatileGrid {
        buffer,
        pixel_size,
        select_only,
    })
    .width(width)
    .height(height);

    if select_only {
        let slot_px = METAMETATILE_DIM as f32 * pixel_size;
        let slot = state.selected_metametatile as usize;
        stack![
            base,
            canvas(SelectionBox {
                x0: (slot % GRID_COLS) as f32 * slot_px,
                y0: (slot / GRID_COLS) as f32 * slot_px,
                width: slot_px,
                height: slot_px,
                thickness: 1.0,
            })
            .width(width)
            .height(height)
        ]
        .into()
    } else {
        base.into()
    }
}

pub fn room_view(state: &EditorState) -> Element<Message> {
    let pixel_size = 2.0;
    let buffer = compose::compose_room(&state.document, state.active_room as usize);
    let width = buffer.width() as f32 * pixel_size + 2.0;
    let height = buffer.height() as f32 * pixel_size + 2.0;

    column![
        row![
            text("Room"),
            button(text("\u{2190}")).on_press(Message::PrevRoom),
            number_input(
                &state.active_room,
                0..=(ROOM_COUNT as u8 - 1),
                Message::SetActiveRoom
            )
            .width(60),
            button(text("\u{2192}")).on_press(Message::NextRoom),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        canvas(RoomCanvas { buffer, pixel_size })
            .width(width)
            .height(height),
    ]
    .spacing(5)
    .into()
}
