// Module for displaying and editing the active tile sheet. In tiles mode
// clicks paint individual pixels; in every other mode clicks pick the 8x8
// tile under the cursor.
use iced::{
    mouse,
    widget::{canvas, stack},
    Element, Point, Rectangle, Size,
};

use crate::{
    compose::{self, RgbBuffer},
    message::Message,
    state::{EditorState, Mode, PixelCoord, TileRef, SHEET_DIM, SHEET_TILES_PER_SIDE, TILE_DIM},
};

struct SheetGrid {
    buffer: RgbBuffer,
    pixel_size: f32,
    select_tiles: bool,
}

#[derive(Default)]
struct InternalState {
    clicking: bool,
}

impl canvas::Program<Message> for SheetGrid {
    type State = InternalState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let Some(p) = cursor.position_in(bounds) else {
            return (canvas::event::Status::Ignored, None);
        };

        let mut click: bool = false;
        match event {
            canvas::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    state.clicking = true;
                    click = true;
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) => {
                    state.clicking = false;
                }
                mouse::Event::CursorMoved { .. } => {
                    // Dragging paints; tile picking is press-only.
                    if state.clicking && !self.select_tiles {
                        click = true;
                    }
                }
                mouse::Event::CursorLeft => {
                    state.clicking = false;
                }
                _ => {}
            },
            _ => {}
        }

        if click {
            let x = (p.x / self.pixel_size) as i32;
            let y = (p.y / self.pixel_size) as i32;
            if x < 0 || x >= SHEET_DIM as i32 || y < 0 || y >= SHEET_DIM as i32 {
                return (canvas::event::Status::Ignored, None);
            }
            let message = if self.select_tiles {
                let tile = (y as usize / TILE_DIM * SHEET_TILES_PER_SIDE
                    + x as usize / TILE_DIM) as TileRef;
                Message::SelectTile(tile)
            } else {
                Message::PaintSheetPixel(x as PixelCoord, y as PixelCoord)
            };
            (canvas::event::Status::Captured, Some(message))
        } else {
            (canvas::event::Status::Ignored, None)
        }
    }

    fn draw(
        &self,
        _state: &InternalState,
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
        if !self.select_tiles && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

// Selection rectangle drawn on its own canvas stacked above the raster one,
// since rectangles cannot be drawn on top of images within a single canvas.
pub struct SelectionBox {
    pub x0: f32,
    pub y0: f32,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

impl canvas::Program<Message> for SelectionBox {
    // No internal state
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let path = canvas::Path::rectangle(
            iced::Point {
                x: self.x0 + self.thickness * 0.5,
                y: self.y0 + self.thickness * 0.5,
            },
            Size {
                width: self.width,
                height: self.height,
            },
        );
        for i in 0..2 {
            frame.stroke(
                &path,
                canvas::Stroke {
                    style: if i == 0 {
                        canvas::stroke::Style::Solid(iced::Color::WHITE)
                    } else {
                        canvas::stroke::Style::Solid(iced::Color::BLACK)
                    },
                    width: self.thickness,
                    line_dash: canvas::LineDash {
                        offset: i,
                        segments: &[0.0, 0.0, 4.0, 4.0],
                    },
                    ..Default::default()
                },
            );
        }
        vec![frame.into_geometry()]
    }
}

pub fn sheet_view(state: &EditorState) -> Element<Message> {
    let pixel_size = 3.0;
    let buffer = compose::compose_sheet(
        &state.document,
        state.active_sheet,
        state.selected_palette,
    );
    let select_tiles = state.mode != Mode::Tiles;
    let side = SHEET_DIM as f32 * pixel_size + 2.0;

    let base = canvas(SheetGrid {
        buffer,
        pixel_size,
        select_tiles,
    })
    .width(side)
    .height(side);

    if select_tiles {
        let tile_px = TILE_DIM as f32 * pixel_size;
        let tile_x = (state.selected_tile as usize % SHEET_TILES_PER_SIDE) as f32 * tile_px;
        let tile_y = (state.selected_tile as usize / SHEET_TILES_PER_SIDE) as f32 * tile_px;
        stack![
            base,
            canvas(SelectionBox {
                x0: tile_x,
                y0: tile_y,
                width: tile_px,
                height: tile_px,
                thickness: 1.0,
            })
            .width(side)
            .height(side)
        ]
        .into()
    } else {
        base.into()
    }
}
