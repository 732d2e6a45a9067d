//! NMRPipe data reader: header + spectral data from sources and series.

use crate::adapter::{PlaneEnumerator, SpectrumSource};
use crate::byteswap::floats_from_bytes;
use nmrpipe_core::enums::{Endian, HdrStatus};
use nmrpipe_core::fdata::*;
use nmrpipe_core::layout::{self, FileVariant, FileTemplate};
use nmrpipe_core::{HeaderError, LayoutError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("{name}: data truncated: expected {expected} bytes, got {got}")]
    Truncated {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("plane file {path} could not be opened: {source}")]
    MissingPlane {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("plane file {name} does not match the series: {reason}")]
    PlaneMismatch { name: String, reason: String },
    #[error("{0:?} data is split across files; read it as a series")]
    SeriesVariant(FileVariant),
}

/// Read and parse an FDATA header.
pub fn read_fdata_header<S: SpectrumSource>(src: &mut S) -> Result<(Fdata, HdrStatus), ReadError> {
    let buf = src.read_header()?;
    let (fdata, status) = Fdata::parse(&buf)?;
    if status == HdrStatus::Swapped {
        log::debug!("header is byte-swapped ({:?})", fdata.endian());
    }
    Ok((fdata, status))
}

/// Read `count` floats stored in `endian` order.
pub fn read_float_data<S: SpectrumSource>(
    src: &mut S,
    count: usize,
    endian: Endian,
) -> Result<Vec<f32>, ReadError> {
    let buf = src.read_data(count * 4)?;
    Ok(floats_from_bytes(buf, endian))
}

/// Read a single-file or stream spectrum: header + all data.
pub fn read_nmrpipe<S: SpectrumSource>(src: &mut S) -> Result<(Fdata, Vec<f32>), ReadError> {
    let (fdata, _) = read_fdata_header(src)?;
    let layout = layout::derive(&fdata, None)?;
    match layout.variant {
        FileVariant::SingleFile | FileVariant::Stream => {}
        variant => return Err(ReadError::SeriesVariant(variant)),
    }
    let data = read_float_data(src, layout.shape.total(), fdata.endian())?;
    log::info!(
        "read {}D spectrum: {} floats ({:?})",
        layout.ndim,
        data.len(),
        layout.variant
    );
    Ok((fdata, data))
}

/// Read a plane or cube series named by `template`.
///
/// The first member's header describes the whole data set; every member
/// must be present, parse, agree on sizes, and hold exactly one plane/cube.
pub fn read_series<E: PlaneEnumerator>(
    planes: &mut E,
    template: &str,
) -> Result<(Fdata, Vec<f32>), ReadError> {
    let parsed = FileTemplate::parse(template)?;
    let first_name = parsed.format(&vec![1; parsed.placeholders()])?;
    let (fdata, _) = read_fdata_header(&mut planes.open(&first_name)?)?;

    let layout = layout::derive(&fdata, Some(template))?;
    if !matches!(layout.variant, FileVariant::PlaneSeries | FileVariant::CubeSeries) {
        return Err(LayoutError::Template {
            template: template.to_string(),
            reason: format!("{:?} data is not a file series", layout.variant),
        }
        .into());
    }

    let names = planes.enumerate_planes(&layout)?;
    let per_file = layout.floats_per_file();
    let mut data = Vec::with_capacity(per_file * names.len());
    for name in &names {
        let mut src = planes.open(name)?;
        let (member, _) = read_fdata_header(&mut src)?;
        for loc in [FDDIMCOUNT, FDSIZE, FDSPECNUM, FDF3SIZE, FDF4SIZE] {
            if member.get(loc) != fdata.get(loc) {
                return Err(ReadError::PlaneMismatch {
                    name: name.clone(),
                    reason: format!(
                        "slot {loc} is {}, expected {}",
                        member.get(loc),
                        fdata.get(loc)
                    ),
                });
            }
        }
        data.extend(read_float_data(&mut src, per_file, member.endian())?);
    }
    log::info!(
        "read {}D {:?}: {} files, {} floats",
        layout.ndim,
        layout.variant,
        names.len(),
        data.len()
    );
    Ok((fdata, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StreamSource;
    use crate::byteswap::floats_to_bytes;
    use nmrpipe_core::params::CUR_XDIM;
    use std::io::Cursor;

    fn header_1d(n: usize, endian: Endian) -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_spectral(CUR_XDIM, n, 1000.0, 100.0, 0.0, 0.0, "1H", true)
            .unwrap();
        fd.set_endian(endian);
        fd
    }

    fn file_bytes(fd: &Fdata, data: &[f32]) -> Vec<u8> {
        let mut bytes = fd.to_bytes().to_vec();
        bytes.extend(floats_to_bytes(data, fd.endian()));
        bytes
    }

    #[test]
    fn reads_both_byte_orders() {
        let data: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();
        for endian in [Endian::Little, Endian::Big] {
            let fd = header_1d(8, endian);
            let mut src = StreamSource::new(Cursor::new(file_bytes(&fd, &data)), "mem");
            let (read, values) = read_nmrpipe(&mut src).unwrap();
            assert_eq!(read.endian(), endian);
            assert_eq!(values, data);
        }
    }

    #[test]
    fn short_data_is_an_error() {
        let fd = header_1d(8, Endian::NATIVE);
        let bytes = file_bytes(&fd, &[0.0; 15]);
        let mut src = StreamSource::new(Cursor::new(bytes), "short.fid");
        assert!(matches!(
            read_nmrpipe(&mut src),
            Err(ReadError::Truncated { expected: 64, got: 60, .. })
        ));
    }

    #[test]
    fn bad_header_reports_offset() {
        let mut bytes = vec![0u8; FDATA_BYTES];
        bytes[FDFLTORDER * 4..FDFLTORDER * 4 + 4].copy_from_slice(&9.0f32.to_ne_bytes());
        let mut src = StreamSource::new(Cursor::new(bytes), "bad");
        match read_nmrpipe(&mut src) {
            Err(ReadError::Header(HeaderError::InvalidHeader { offset, found, .. })) => {
                assert_eq!(offset, FDFLTORDER);
                assert_eq!(found, 9.0);
            }
            other => panic!("expected invalid header, got {:?}", other.map(|r| r.1.len())),
        }
    }
}
