//! NMRPipe data writer: header + spectral data to sinks and series.

use crate::adapter::{PlaneEnumerator, SpectrumSink};
use crate::byteswap::floats_to_bytes;
use nmrpipe_core::enums::Endian;
use nmrpipe_core::fdata::*;
use nmrpipe_core::layout::{self, FileVariant};
use nmrpipe_core::{HeaderError, LayoutError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("plane file {path} could not be created: {source}")]
    CreatePlane {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Write an NMRPipe FDATA header in its remembered byte order.
pub fn write_fdata_header<S: SpectrumSink>(sink: &mut S, fdata: &Fdata) -> Result<(), WriteError> {
    sink.write_header(&fdata.to_bytes())
}

/// Write spectral data as f32 values in `endian` order.
pub fn write_float_data<S: SpectrumSink>(
    sink: &mut S,
    data: &[f32],
    endian: Endian,
) -> Result<(), WriteError> {
    sink.write_data(&floats_to_bytes(data, endian))
}

fn check_length(expected: usize, data: &[f32]) -> Result<(), WriteError> {
    if data.len() != expected {
        return Err(LayoutError::DataLength {
            expected,
            got: data.len(),
        }
        .into());
    }
    Ok(())
}

/// Write a complete spectrum as one header followed by all data.
///
/// 3D/4D data that would otherwise be a plane or cube series is written
/// as a stream, with FDPIPEFLAG set so the file describes itself.
pub fn write_nmrpipe<S: SpectrumSink>(
    sink: &mut S,
    fdata: &Fdata,
    data: &[f32],
) -> Result<(), WriteError> {
    let layout = layout::derive(fdata, None)?;
    check_length(layout.shape.total(), data)?;

    let mut header = fdata.clone();
    if matches!(layout.variant, FileVariant::PlaneSeries | FileVariant::CubeSeries) {
        header.set_pipe_flag(true);
    }
    layout::write_slice_count(&mut header, layout.shape.trace_count() as u64);

    write_fdata_header(sink, &header)?;
    write_float_data(sink, data, header.endian())?;
    sink.finish()?;
    log::info!("wrote {}D spectrum: {} floats", layout.ndim, data.len());
    Ok(())
}

/// Write a 3D/4D spectrum as a plane or cube series named by `template`.
///
/// Every member carries the full header with the file count recorded.
pub fn write_series<E: PlaneEnumerator>(
    planes: &mut E,
    template: &str,
    fdata: &Fdata,
    data: &[f32],
) -> Result<Vec<String>, WriteError> {
    let mut header = fdata.clone();
    header.set_pipe_flag(false);
    header.set(FDFILECOUNT, 0.0);

    let layout = layout::derive(&header, Some(template))?;
    if !matches!(layout.variant, FileVariant::PlaneSeries | FileVariant::CubeSeries) {
        return Err(LayoutError::Template {
            template: template.to_string(),
            reason: format!("{:?} data is not written as a file series", layout.variant),
        }
        .into());
    }
    check_length(layout.shape.total(), data)?;
    header.set(FDFILECOUNT, layout.file_count as f32);

    let names = planes.enumerate_planes(&layout)?;
    let per_file = layout.floats_per_file();
    for (name, chunk) in names.iter().zip(data.chunks_exact(per_file)) {
        let mut sink = planes.create(name)?;
        write_fdata_header(&mut sink, &header)?;
        write_float_data(&mut sink, chunk, header.endian())?;
        sink.finish()?;
    }
    log::info!(
        "wrote {}D {:?}: {} files of {} floats",
        layout.ndim,
        layout.variant,
        names.len(),
        per_file
    );
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FsPlanes, StreamSink, StreamSource};
    use crate::reader::{read_nmrpipe, read_series, ReadError};
    use nmrpipe_core::params::{CUR_XDIM, CUR_YDIM, CUR_ZDIM};
    use std::io::Cursor;

    fn header_3d() -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_count(3);
        fd.set_dim_spectral(CUR_XDIM, 8, 8000.0, 600.0, 0.0, 4.7, "HN", true)
            .unwrap();
        fd.set_dim_spectral(CUR_YDIM, 4, 2000.0, 60.0, 0.0, 118.0, "N", false)
            .unwrap();
        fd.set_dim_spectral(CUR_ZDIM, 3, 3000.0, 150.0, 0.0, 56.0, "CA", false)
            .unwrap();
        fd
    }

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn rejects_wrong_data_length() {
        let fd = header_3d();
        let mut sink = StreamSink::new(Vec::new());
        assert!(matches!(
            write_nmrpipe(&mut sink, &fd, &[0.0; 5]),
            Err(WriteError::Layout(LayoutError::DataLength { expected: 192, got: 5 }))
        ));
    }

    #[test]
    fn series_data_is_streamed_with_pipe_flag() {
        let fd = header_3d();
        let data = ramp(16 * 4 * 3);
        let mut sink = StreamSink::new(Vec::new());
        write_nmrpipe(&mut sink, &fd, &data).unwrap();

        let bytes = sink.into_inner();
        assert_eq!(bytes.len(), FDATA_BYTES + data.len() * 4);
        let mut src = StreamSource::new(Cursor::new(bytes), "mem");
        let (read, values) = read_nmrpipe(&mut src).unwrap();
        assert!(read.is_pipe());
        assert_eq!(layout::read_slice_count(&read), 12);
        assert_eq!(values, data);
    }

    #[test]
    fn plane_series_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut planes = FsPlanes::new(dir.path());
        let fd = header_3d();
        let data = ramp(16 * 4 * 3);

        let names = write_series(&mut planes, "test%03d.ft3", &fd, &data).unwrap();
        assert_eq!(names, vec!["test001.ft3", "test002.ft3", "test003.ft3"]);
        for name in &names {
            let len = std::fs::metadata(dir.path().join(name)).unwrap().len();
            assert_eq!(len as usize, FDATA_BYTES + 16 * 4 * 4);
        }

        let (read, values) = read_series(&mut planes, "test%03d.ft3").unwrap();
        assert_eq!(read.get_i(FDFILECOUNT), 3);
        assert_eq!(values, data);
    }

    #[test]
    fn missing_member_fails_the_series() {
        let dir = tempfile::tempdir().unwrap();
        let mut planes = FsPlanes::new(dir.path());
        let fd = header_3d();
        write_series(&mut planes, "p%d.ft3", &fd, &ramp(192)).unwrap();
        std::fs::remove_file(dir.path().join("p2.ft3")).unwrap();
        assert!(matches!(
            read_series(&mut planes, "p%d.ft3"),
            Err(ReadError::MissingPlane { .. })
        ));
    }

    #[test]
    fn two_dimensional_data_is_not_a_series() {
        let mut fd = header_3d();
        fd.set_dim_count(2);
        let mut planes = FsPlanes::new(tempfile::tempdir().unwrap().path());
        assert!(matches!(
            write_series(&mut planes, "x%d.ft2", &fd, &ramp(64)),
            Err(WriteError::Layout(LayoutError::Template { .. }))
        ));
    }
}
