// Headless exporter: turns a saved editor snapshot into the C data tables
// consumed by the game build, without launching the GUI.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use nes_room_editor::{export, persist};

#[derive(Parser, Debug)]
struct Args {
    /// Path to an editor snapshot (JSON)
    #[arg(long)]
    snapshot: PathBuf,

    /// Directory where the data tables are written
    #[arg(long)]
    out: PathBuf,
}

pub fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let document = persist::load_snapshot(&args.snapshot)?;
    export::write_tables(&args.out, &document)?;
    Ok(())
}
