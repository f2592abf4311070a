// Module for displaying and editing the 48 metatile slots, arranged in a
// 6-wide grid and drawn as one composed raster.
use iced::{
    mouse,
    widget::{canvas, stack},
    Element, Point, Rectangle, Size,
};

use crate::{
    compose::{self, RgbBuffer, METATILE_DIM},
    message::Message,
    state::{EditorState, MetatileRef, METATILE_COUNT, TILE_DIM},
};

use super::sheet::SelectionBox;

const GRID_COLS: usize = 6;
const GRID_ROWS: usize = METATILE_COUNT / GRID_COLS;

struct MetatileGrid {
    buffer: RgbBuffer,
    pixel_size: f32,
    select_only: bool,
}

impl canvas::Program<Message> for MetatileGrid {
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
                let slot_col = x / METATILE_DIM;
                let slot_row = y / METATILE_DIM;
                if slot_col >= GRID_COLS || slot_row >= GRID_ROWS {
                    return (canvas::event::Status::Ignored, None);
                }
                let slot = (slot_row * GRID_COLS + slot_col) as MetatileRef;
                let message = if self.select_only {
                    Message::SelectMetatile(slot)
                } else {
                    let quadrant_col = x % METATILE_DIM / TILE_DIM;
                    let quadrant_row = y % METATILE_DIM / TILE_DIM;
                    Message::SetMetatileTile {
                        metatile: slot,
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

fn grid_buffer(state: &EditorState) -> RgbBuffer {
    let mut buffer = RgbBuffer::new(GRID_COLS * METATILE_DIM, GRID_ROWS * METATILE_DIM);
    for i in 0..METATILE_COUNT {
        let x = i % GRID_COLS * METATILE_DIM;
        let y = i / GRID_COLS * METATILE_DIM;
        buffer.blit(
            &compose::compose_metatile(&state.document, i as MetatileRef),
            x,
            y,
        );
    }
    buffer
}

pub fn metatile_grid_view(state: &EditorState, select_only: bool) -> Element<Message> {
    let pixel_size = 3.0;
    let buffer = grid_buffer(state);
    let width = buffer.width() as f32 * pixel_size + 2.0;
    let height = buffer.height() as f32 * pixel_size + 2.0;

    let base = canvas(MetatileGrid {
        buffer,
        pixel_size,
        select_only,
    })
    .width(width)
    .height(height);

    if select_only {
        let slot_px = METATILE_DIM as f32 * pixel_size;
        let slot = state.selected_metatile as usize;
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
