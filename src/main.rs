use iced::{Task, Theme};
use log::error;

use nes_room_editor::state::{self, EditorState};
use nes_room_editor::{message::Message, update, view};

fn theme(_state: &EditorState) -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

fn subscription(_state: &EditorState) -> iced::Subscription<Message> {
    iced::event::listen().map(Message::Event)
}

pub fn main() -> iced::Result {
    env_logger::init();
    iced::application("NES Room Editor", update::update, view::view)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .subscription(subscription)
        .theme(theme)
        .run_with(|| match state::get_initial_state() {
            Ok(state) => (state, Task::none()),
            Err(e) => {
                error!("Error initializing editor: {:#}", e);
                std::process::exit(1);
            }
        })
}
