//! Byte sources and sinks consumed by the reader and writer.

use crate::reader::ReadError;
use crate::writer::WriteError;
use nmrpipe_core::fdata::FDATA_BYTES;
use nmrpipe_core::layout::LayoutDescriptor;
use nmrpipe_core::LayoutError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Something that yields a header followed by data bytes.
pub trait SpectrumSource {
    fn read_header(&mut self) -> Result<[u8; FDATA_BYTES], ReadError>;

    /// Read exactly `byte_count` bytes of data.
    fn read_data(&mut self, byte_count: usize) -> Result<Vec<u8>, ReadError>;
}

/// Something that accepts a header followed by data bytes.
pub trait SpectrumSink {
    fn write_header(&mut self, header: &[u8; FDATA_BYTES]) -> Result<(), WriteError>;

    fn write_data(&mut self, bytes: &[u8]) -> Result<(), WriteError>;

    fn finish(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}

/// Opens and creates the member files of a plane or cube series.
pub trait PlaneEnumerator {
    type Source: SpectrumSource;
    type Sink: SpectrumSink;

    fn open(&mut self, name: &str) -> Result<Self::Source, ReadError>;

    fn create(&mut self, name: &str) -> Result<Self::Sink, WriteError>;

    /// Member names in storage order, as predicted by the layout's template.
    fn enumerate_planes(&self, layout: &LayoutDescriptor) -> Result<Vec<String>, LayoutError> {
        layout.file_names()
    }
}

// ─── Streams ────────────────────────────────────────────────────────────────

/// A [`SpectrumSource`] over any reader (file, pipe, in-memory buffer).
pub struct StreamSource<R: Read> {
    reader: R,
    name: String,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_exactly(&mut self, byte_count: usize) -> Result<Vec<u8>, ReadError> {
        let mut buf = Vec::with_capacity(byte_count);
        (&mut self.reader)
            .take(byte_count as u64)
            .read_to_end(&mut buf)?;
        if buf.len() != byte_count {
            return Err(ReadError::Truncated {
                name: self.name.clone(),
                expected: byte_count,
                got: buf.len(),
            });
        }
        Ok(buf)
    }
}

impl<R: Read> SpectrumSource for StreamSource<R> {
    fn read_header(&mut self) -> Result<[u8; FDATA_BYTES], ReadError> {
        let buf = self.read_exactly(FDATA_BYTES)?;
        let mut header = [0u8; FDATA_BYTES];
        header.copy_from_slice(&buf);
        Ok(header)
    }

    fn read_data(&mut self, byte_count: usize) -> Result<Vec<u8>, ReadError> {
        self.read_exactly(byte_count)
    }
}

/// A [`SpectrumSink`] over any writer.
pub struct StreamSink<W: Write> {
    writer: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SpectrumSink for StreamSink<W> {
    fn write_header(&mut self, header: &[u8; FDATA_BYTES]) -> Result<(), WriteError> {
        self.writer.write_all(header)?;
        Ok(())
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        self.writer.flush()?;
        Ok(())
    }
}

// ─── Filesystem series ──────────────────────────────────────────────────────

/// Plane series members resolved relative to a directory.
#[derive(Debug, Clone)]
pub struct FsPlanes {
    root: PathBuf,
}

impl FsPlanes {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl PlaneEnumerator for FsPlanes {
    type Source = StreamSource<BufReader<File>>;
    type Sink = StreamSink<BufWriter<File>>;

    fn open(&mut self, name: &str) -> Result<Self::Source, ReadError> {
        let path = self.path(name);
        let file = File::open(&path).map_err(|source| ReadError::MissingPlane {
            path: path.display().to_string(),
            source,
        })?;
        Ok(StreamSource::new(BufReader::new(file), path.display().to_string()))
    }

    fn create(&mut self, name: &str) -> Result<Self::Sink, WriteError> {
        let path = self.path(name);
        let create = |path: &Path| -> std::io::Result<File> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(path)
        };
        let file = create(&path).map_err(|source| WriteError::CreatePlane {
            path: path.display().to_string(),
            source,
        })?;
        Ok(StreamSink::new(BufWriter::new(file)))
    }
}
