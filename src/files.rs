//! Path-based loading and saving.
//!
//! A path containing a `%` placeholder (`fid/test%03d.fid`) names a plane
//! or cube series; anything else is a single file or stream.

use nmrpipe_core::layout::FileTemplate;
use nmrpipe_io::{
    read_nmrpipe, read_series, write_nmrpipe, write_series, FsPlanes, ReadError, StreamSink,
    StreamSource, WriteError,
};
use nmrpipe_proc::{History, Pipeline, ProcError, Spectrum};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Proc(#[from] ProcError),
}

fn series_template(path: &Path) -> Option<String> {
    let text = path.to_string_lossy();
    if !text.contains('%') {
        return None;
    }
    match FileTemplate::parse(&text) {
        Ok(t) if t.placeholders() > 0 => Some(text.into_owned()),
        _ => None,
    }
}

/// Load a spectrum from a single file or a plane series.
pub fn load(path: impl AsRef<Path>) -> Result<Spectrum, EngineError> {
    let path = path.as_ref();
    let (header, data) = match series_template(path) {
        Some(template) => read_series(&mut FsPlanes::new(""), &template)?,
        None => {
            let file = File::open(path).map_err(|source| EngineError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let mut src = StreamSource::new(BufReader::new(file), path.display().to_string());
            read_nmrpipe(&mut src)?
        }
    };
    log::info!("loaded {}", path.display());
    Ok(Spectrum::new(header, data)?)
}

/// Save a spectrum to a single file or, for a templated path, a plane series.
///
/// Returns the files written.
pub fn save(spectrum: &Spectrum, path: impl AsRef<Path>) -> Result<Vec<String>, EngineError> {
    let path = path.as_ref();
    if let Some(template) = series_template(path) {
        let mut planes = FsPlanes::new("");
        let names = write_series(&mut planes, &template, spectrum.header(), spectrum.data())?;
        return Ok(names);
    }
    let io_err = |source: std::io::Error| EngineError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut sink = StreamSink::new(BufWriter::new(file));
    write_nmrpipe(&mut sink, spectrum.header(), spectrum.data())?;
    Ok(vec![path.display().to_string()])
}

/// Read a pipeline description from a JSON file.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Pipeline, EngineError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Pipeline::from_json(&json)?)
}

/// Load `input`, run `pipeline` on it and save the result to `output`.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    pipeline: &Pipeline,
) -> Result<History, EngineError> {
    let input = input.as_ref();
    let mut history = History::new();
    history.set_source(&input.display().to_string());
    let spectrum = load(input)?;
    let processed = pipeline.run(spectrum, &mut history)?;
    save(&processed, output)?;
    Ok(history)
}
