// One drawing session: the surface, the pen that writes it, the encoder that
// reads it, and the store that keeps it across restarts.
// Everything runs on the caller's thread, one event at a time.

use crate::config::Config;
use crate::encoder::{Encoder, Encoding, Notifier};
use crate::input::{DeviceEvent, SurfaceOffset, normalize};
use crate::persist::{BlobStore, SNAPSHOT_KEY, decode_snapshot, encode_snapshot};
use crate::stroke::StrokeEngine;
use crate::types::Surface;

pub struct Session<S: BlobStore, N: Notifier> {
    surface: Surface,
    pen: StrokeEngine,
    encoder: Encoder<N>,
    store: S,
    offset: SurfaceOffset,
}

impl<S: BlobStore, N: Notifier> Session<S, N> {
    /// Fresh blank surface, then the stored snapshot painted on top if there is one.
    pub fn new(config: &Config, store: S, notifier: N) -> Self {
        let mut session = Self {
            surface: Surface::new(config.width, config.height),
            pen: StrokeEngine::new(config.stroke_width, !config.no_antialias),
            encoder: Encoder::new(notifier),
            store,
            offset: SurfaceOffset::default(),
        };
        session.restore();
        session
    }

    /// Where the surface sits in the coordinate space device events use.
    pub fn set_offset(&mut self, offset: SurfaceOffset) {
        self.offset = offset;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn pen(&self) -> &StrokeEngine {
        &self.pen
    }

    pub fn notifier(&self) -> &N {
        self.encoder.notifier()
    }

    #[cfg(test)]
    pub fn into_store(self) -> S {
        self.store
    }

    /// A missing or unreadable snapshot just means starting blank.
    fn restore(&mut self) -> bool {
        let bytes = match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("no saved sketch, starting blank");
                return false;
            }
            Err(e) => {
                log::warn!("could not read saved sketch: {e}");
                return false;
            }
        };
        match decode_snapshot(&bytes, self.surface.width(), self.surface.height()) {
            Ok(saved) => {
                self.surface.clear();
                if !self.surface.paint_from(&saved) {
                    log::warn!(
                        "saved sketch is {}x{}, surface is {}x{}; starting blank",
                        saved.width(),
                        saved.height(),
                        self.surface.width(),
                        self.surface.height()
                    );
                    return false;
                }
                log::info!("restored saved sketch ({} bytes)", bytes.len());
                true
            }
            Err(e) => {
                log::warn!("ignoring saved sketch: {e}");
                false
            }
        }
    }

    /// Feed one raw device event to the pen. Returns true if ink was laid down.
    pub fn handle(&mut self, event: &DeviceEvent) -> bool {
        match normalize(event, self.offset) {
            Some(pointer) => self.pen.apply(&mut self.surface, pointer),
            None => false,
        }
    }

    /// Validate and encode the surface, then snapshot it.
    /// A blank surface still encodes (to zeros); the notifier carries the warning.
    pub fn submit(&mut self) -> Encoding {
        let encoding = self.encoder.encode(&self.surface);
        log::debug!(
            "encoded {} values ({} dots, {} segments so far)",
            encoding.vector.len(),
            self.pen.dots_drawn(),
            self.pen.segments_drawn()
        );
        self.save();
        encoding
    }

    /// Blank the surface, drop the displayed result, and forget the snapshot
    /// so a restart after clearing comes back empty.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.pen.reset();
        self.encoder.notifier_mut().clear_result();
        if let Err(e) = self.store.remove(SNAPSHOT_KEY) {
            log::warn!("could not delete saved sketch: {e}");
        }
        log::info!("surface cleared");
    }

    fn save(&mut self) {
        let result = encode_snapshot(&self.surface).and_then(|png| self.store.put(SNAPSHOT_KEY, &png));
        if let Err(e) = result {
            log::warn!("could not save sketch: {e}");
        }
    }
}
