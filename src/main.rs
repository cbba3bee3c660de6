// What you SEE:
// • A white pad. Hold Left Mouse to draw with a round black pen.
// • Enter encodes the pad into one alpha byte per pixel and writes it out
//   as comma-separated values (file from --output, else stdout).
// • C clears the pad (and the saved copy). ESC quits.
// • The pad is saved after every submit and comes back on the next start.

mod config;
mod draw;
mod encoder;
mod error;
mod input;
mod persist;
mod session;
mod stroke;
mod types;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;

use config::Config;
use draw::{Drawer, HUD_HEIGHT, HUD_TEXT, HUD_WARN, Hud, compose, draw_hud};
use encoder::FeatureVector;
use error::Error;
use input::{DeviceEvent, MouseEvent, SurfaceOffset};
use persist::{BlobStore, FileStore, MemoryStore};
use session::Session;
use stroke::PenState;
use types::FrameBuffer;

fn main() -> Result<(), Error> {
    env_logger::init();
    let config = Config::parse();
    config.validate()?;

    let store: Box<dyn BlobStore> = if config.no_persist {
        Box::new(MemoryStore::default())
    } else {
        log::info!("snapshot directory: {}", config.store_dir.display());
        Box::new(FileStore::new(&config.store_dir))
    };
    let mut session = Session::new(&config, store, Hud::new());

    // The status strip sits on top; the surface starts right below it.
    let offset = SurfaceOffset { left: 0.0, top: HUD_HEIGHT as f32 };
    session.set_offset(offset);

    let (w, h) = (config.width, config.height);
    let mut drawer = Drawer::new("Sketchpad", w, h + HUD_HEIGHT)?;
    let mut screen = FrameBuffer::new(w, h + HUD_HEIGHT);

    let mut was_down = false;
    let mut last_pos: Option<(f32, f32)> = None;

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Mouse -> device events, in the order a browser would fire them. */
        let down = drawer.left_mouse_down();
        if let Some((x, y)) = drawer.mouse_pos() {
            // minifb reports window pixels; the mouse event carries its offset inside the surface.
            let at = MouseEvent { offset_x: x - offset.left, offset_y: y - offset.top };
            if last_pos != Some((x, y)) {
                session.handle(&DeviceEvent::MouseMove(at));
                last_pos = Some((x, y));
            }
            if down && !was_down {
                session.handle(&DeviceEvent::MouseDown(at));
            }
        }
        if !down && was_down {
            session.handle(&DeviceEvent::MouseUp);
            log::debug!("pen up at {:?}", session.pen().state().current);
        }
        was_down = down;

        /* 2) Keys */
        if drawer.enter_pressed_once() {
            let encoding = session.submit();
            if let Err(e) = deliver(&encoding.vector, &config) {
                log::error!("{e}");
            }
        }
        if drawer.c_pressed_once() {
            session.clear();
        }

        /* 3) Paper, ink, status strip. */
        draw::fill(&mut screen);
        compose(session.surface(), &mut screen, HUD_HEIGHT);
        let hud = session.notifier();
        let pen = match session.pen().pen() {
            PenState::Drawing => "DRAWING",
            PenState::Idle => "IDLE",
        };
        let color = if hud.warning { HUD_WARN } else { HUD_TEXT };
        draw_hud(&mut screen, 0, &format!("{pen} | {}", hud.text), color);

        drawer.present(&screen)?;
    }

    Ok(())
}

/// Hand the vector to the transfer slot: the output file, or stdout.
fn deliver(vector: &FeatureVector, config: &Config) -> Result<(), Error> {
    let pooled;
    let vector = match config.pool {
        Some(factor) => {
            pooled = vector.pooled(config.width, config.height, factor).ok_or_else(|| {
                Error::Config(format!("pool factor {factor} does not fit {}x{}", config.width, config.height))
            })?;
            &pooled
        }
        None => vector,
    };
    match &config.output {
        Some(path) => write_csv(path, vector),
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", vector.to_csv()).map_err(Error::Output)
        }
    }
}

fn write_csv(path: &Path, vector: &FeatureVector) -> Result<(), Error> {
    fs::write(path, format!("{}\n", vector.to_csv())).map_err(Error::Output)?;
    log::info!("wrote {} values to {}", vector.len(), path.display());
    Ok(())
}
