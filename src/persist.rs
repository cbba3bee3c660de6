// Snapshot persistence: the surface survives a restart as one PNG blob
// stored under a fixed key. PNG carries its own size and pixel format,
// so the blob is self-describing.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};

use crate::error::Error;
use crate::types::Surface;

/// The one key the sketch is stored under.
pub const SNAPSHOT_KEY: &str = "sketchpad";

/// Named-blob store. Writes replace the whole blob.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;
    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), Error>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        (**self).get(key)
    }
    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), Error> {
        (**self).put(key, blob)
    }
    fn remove(&mut self, key: &str) -> Result<(), Error> {
        (**self).remove(key)
    }
}

/// One file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.png"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Store { path, source }),
        }
    }

    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| Error::Store { path: self.dir.clone(), source })?;
        let path = self.path_for(key);
        fs::write(&path, blob).map_err(|source| Error::Store { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Store { path, source }),
        }
    }
}

/// Process-local store; nothing outlives the run.
#[derive(Default)]
pub struct MemoryStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &[u8]) -> Result<(), Error> {
        self.blobs.insert(key.to_owned(), blob.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// Surface -> PNG bytes (RGBA8, lossless).
pub fn encode_snapshot(surface: &Surface) -> Result<Vec<u8>, Error> {
    let img = RgbaImage::from_raw(
        surface.width() as u32,
        surface.height() as u32,
        surface.as_bytes().to_vec(),
    )
    .ok_or_else(|| Error::SnapshotSize {
        found_w: surface.width(),
        found_h: surface.height(),
        want_w: surface.width(),
        want_h: surface.height(),
    })?;
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(Error::SnapshotEncode)?;
    Ok(out)
}

/// PNG bytes -> surface, which must be exactly `width` x `height`.
pub fn decode_snapshot(bytes: &[u8], width: usize, height: usize) -> Result<Surface, Error> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(Error::SnapshotDecode)?
        .to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w != width || h != height {
        return Err(Error::SnapshotSize { found_w: w, found_h: h, want_w: width, want_h: height });
    }
    Surface::from_rgba(w, h, img.into_raw()).ok_or(Error::SnapshotSize {
        found_w: w,
        found_h: h,
        want_w: width,
        want_h: height,
    })
}
