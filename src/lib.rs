pub mod chr;
pub mod compose;
pub mod export;
pub mod message;
pub mod palette;
pub mod persist;
pub mod state;
pub mod update;
pub mod view;
