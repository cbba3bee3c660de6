// Every variant states *where* things went wrong.
// The drawing core itself never fails; only the collaborators around it do.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store I/O error at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot encode error: {0}")]
    SnapshotEncode(#[source] image::ImageError),

    #[error("snapshot decode error: {0}")]
    SnapshotDecode(#[source] image::ImageError),

    #[error("snapshot is {found_w}x{found_h}, surface is {want_w}x{want_h}")]
    SnapshotSize { found_w: usize, found_h: usize, want_w: usize, want_h: usize },

    #[error("failed to write feature vector: {0}")]
    Output(#[source] std::io::Error),
}
