//! Reading track logs from file-like sources.
//!
//! A [`TrackSource`] is consumed by the read: it is dropped once the document
//! is in memory, or when the pending future is dropped, so no handle outlives
//! a call to [`parse_from_source`].

use std::future::Future;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::Result;
use crate::options::ParseOptions;
use crate::parser;
use crate::track::Track;

/// A file-like resource holding a complete GPX document.
pub trait TrackSource {
    /// Read the whole document into memory.
    fn read_document(self) -> impl Future<Output = Result<String>>;
}

/// Read `source` to the end and parse it with default options.
pub async fn parse_from_source<S: TrackSource>(source: S) -> Result<Track> {
    parse_from_source_with_options(source, &ParseOptions::default()).await
}

/// Read `source` to the end and parse it.
pub async fn parse_from_source_with_options<S: TrackSource>(
    source: S,
    opts: &ParseOptions,
) -> Result<Track> {
    let document = source.read_document().await?;
    debug!(bytes = document.len(), "read track source");
    parser::parse_with_options(&document, opts)
}

/// Whether a picked file looks like a GPX route file.
pub fn is_track_file_name(name: &str) -> bool {
    let name = name.trim_end();
    name.len() > 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".gpx"))
}

/// Any async byte stream, read to the end as UTF-8.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: AsyncRead + Unpin> TrackSource for ReaderSource<R> {
    async fn read_document(mut self) -> Result<String> {
        let mut document = String::new();
        self.reader.read_to_string(&mut document).await?;
        Ok(document)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileSource;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use super::{ReaderSource, TrackSource};
    use crate::error::Result;

    /// A GPX file on the local filesystem.
    #[derive(Debug, Clone)]
    pub struct FileSource {
        path: PathBuf,
    }

    impl FileSource {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }
    }

    impl TrackSource for FileSource {
        async fn read_document(self) -> Result<String> {
            let file = tokio::fs::File::open(&self.path).await?;
            ReaderSource::new(file).read_document().await
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::BlobSource;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use super::TrackSource;
    use crate::error::Result;

    /// A browser `Blob` or `File`, e.g. from a file input or a drop event.
    #[derive(Debug)]
    pub struct BlobSource {
        blob: web_sys::Blob,
    }

    impl BlobSource {
        pub fn new(blob: web_sys::Blob) -> Self {
            Self { blob }
        }
    }

    impl TrackSource for BlobSource {
        async fn read_document(self) -> Result<String> {
            let text = JsFuture::from(self.blob.text())
                .await
                .map_err(|e| std::io::Error::other(describe(&e)))?;
            text.as_string().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "blob text is not a string")
                    .into()
            })
        }
    }

    /// Best-effort message for a rejected read, which is usually a DOMException.
    fn describe(value: &wasm_bindgen::JsValue) -> String {
        if let Some(err) = value.dyn_ref::<js_sys::Error>() {
            return String::from(err.message());
        }
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"))
    }
}
