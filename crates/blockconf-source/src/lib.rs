//! blockconf sources
//!
//! Turns a path into something the parser can pull lines from, and a path into
//! something the printer can write to.
//!
//! Paths ending in `.gz` or `.zst` are transparently decompressed on open and
//! compressed on write. Every other path is treated as plain text.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::io::BufRead;
//!
//! let reader = blockconf_source::open("forest.conf.zst")?;
//! for line in reader.lines() {
//!     println!("{}", line?);
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Compression level used for `.gz` sinks
pub const GZIP_LEVEL: u32 = 6;

/// Compression level used for `.zst` sinks
pub const ZSTD_LEVEL: i32 = 3;

/// Compression selected from a file-name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain text
    #[default]
    None,
    /// gzip stream (`.gz`), possibly several concatenated members
    Gzip,
    /// zstd frame (`.zst`)
    Zstd,
}

impl Compression {
    /// Pick the compression for a path from its extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::Gzip,
            Some("zst") => Self::Zstd,
            _ => Self::None,
        }
    }
}

/// Errors raised while opening, reading or writing a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The path could not be opened or created
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read failed part way through
    #[error("read error in {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The compressed payload is corrupt
    #[error("cannot decompress {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write or flush failed
    #[error("write error in {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// Create a read error for path
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Open `path` as a buffered line source
///
/// Compressed files are decompressed in full and served from memory, so a
/// corrupt payload is reported here rather than halfway through parsing.
///
/// # Errors
/// - `SourceError::Open` if the file cannot be opened or read
/// - `SourceError::Decompress` if a `.gz` or `.zst` payload is invalid
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send>, SourceError> {
    let path = path.as_ref();
    let compression = Compression::from_path(path);
    tracing::debug!(path = %path.display(), ?compression, "opening source");

    let open_err = |source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    };
    let decompress_err = |source| SourceError::Decompress {
        path: path.to_path_buf(),
        source,
    };

    match compression {
        Compression::None => {
            let file = File::open(path).map_err(open_err)?;
            Ok(Box::new(BufReader::new(file)))
        }
        Compression::Gzip => {
            let bytes = std::fs::read(path).map_err(open_err)?;
            let mut decoded = Vec::new();
            MultiGzDecoder::new(bytes.as_slice())
                .read_to_end(&mut decoded)
                .map_err(decompress_err)?;
            Ok(Box::new(Cursor::new(decoded)))
        }
        Compression::Zstd => {
            let bytes = std::fs::read(path).map_err(open_err)?;
            let decoded = zstd::decode_all(bytes.as_slice()).map_err(decompress_err)?;
            Ok(Box::new(Cursor::new(decoded)))
        }
    }
}

/// Create (or truncate) `path` as an output sink
///
/// # Errors
/// Returns `SourceError::Open` if the file cannot be created
pub fn create(path: impl AsRef<Path>) -> Result<Sink, SourceError> {
    let path = path.as_ref();
    let compression = Compression::from_path(path);
    tracing::debug!(path = %path.display(), ?compression, "creating sink");

    let open_err = |source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = BufWriter::new(File::create(path).map_err(open_err)?);
    let inner = match compression {
        Compression::None => SinkInner::Plain(file),
        Compression::Gzip => {
            SinkInner::Gzip(GzEncoder::new(file, flate2::Compression::new(GZIP_LEVEL)))
        }
        Compression::Zstd => {
            SinkInner::Zstd(zstd::stream::write::Encoder::new(file, ZSTD_LEVEL).map_err(open_err)?)
        }
    };

    Ok(Sink {
        path: path.to_path_buf(),
        inner,
    })
}

/// Output sink returned by [`create`]
///
/// Call [`Sink::finish`] once done; dropping a compressed sink without
/// finishing leaves a truncated stream.
pub struct Sink {
    path: PathBuf,
    inner: SinkInner,
}

enum SinkInner {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Zstd(zstd::stream::write::Encoder<'static, BufWriter<File>>),
}

impl Sink {
    /// Path being written
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered output and close the compression frame
    ///
    /// # Errors
    /// Returns `SourceError::Write` if flushing fails
    pub fn finish(self) -> Result<(), SourceError> {
        let path = self.path;
        let write_err = |source| SourceError::Write {
            path: path.clone(),
            source,
        };
        match self.inner {
            SinkInner::Plain(mut w) => w.flush().map_err(write_err),
            SinkInner::Gzip(encoder) => {
                let mut w = encoder.finish().map_err(write_err)?;
                w.flush().map_err(write_err)
            }
            SinkInner::Zstd(encoder) => {
                let mut w = encoder.finish().map_err(write_err)?;
                w.flush().map_err(write_err)
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            SinkInner::Plain(w) => w.write(buf),
            SinkInner::Gzip(w) => w.write(buf),
            SinkInner::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            SinkInner::Plain(w) => w.flush(),
            SinkInner::Gzip(w) => w.flush(),
            SinkInner::Zstd(w) => w.flush(),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let compression = match self.inner {
            SinkInner::Plain(_) => Compression::None,
            SinkInner::Gzip(_) => Compression::Gzip,
            SinkInner::Zstd(_) => Compression::Zstd,
        };
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("compression", &compression)
            .finish()
    }
}
