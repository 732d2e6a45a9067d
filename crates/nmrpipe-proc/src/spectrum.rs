//! In-memory spectrum: an owned header plus the samples it describes.

use crate::error::ProcError;
use nmrpipe_core::enums::{ApodCode, DataType, Domain, QuadFlag};
use nmrpipe_core::fdata::*;
use nmrpipe_core::layout::{self, AxisShape, LayoutDescriptor, Shape};
use nmrpipe_core::params::{ParmRole, CUR_ADIM, CUR_ZDIM};
use nmrpipe_core::LayoutError;

/// Window recorded on an axis by the last apodization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApodState {
    pub code: Option<ApodCode>,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    /// First-point scale (stored as `c - 1`).
    pub c: f64,
    /// Points covered by the window.
    pub size: usize,
}

/// A header and its samples, in storage order.
///
/// The data length always matches the shape decoded from the header; every
/// constructor checks it. Operations build a new `Spectrum` rather than
/// mutating one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    header: Fdata,
    data: Vec<f32>,
    shape: Shape,
}

impl Spectrum {
    pub fn new(header: Fdata, data: Vec<f32>) -> Result<Self, ProcError> {
        let layout = layout::derive(&header, None)?;
        if data.len() != layout.shape.total() {
            return Err(LayoutError::DataLength {
                expected: layout.shape.total(),
                got: data.len(),
            }
            .into());
        }
        Ok(Self {
            header,
            data,
            shape: layout.shape,
        })
    }

    /// Rebuild from an operation's output, writing the new shape into the header.
    pub(crate) fn from_parts(
        mut header: Fdata,
        data: Vec<f32>,
        shape: Shape,
    ) -> Result<Self, ProcError> {
        shape.write_sizes(&mut header)?;
        sync_quad_flag(&mut header, &shape);
        Self::new(header, data)
    }

    pub fn header(&self) -> &Fdata {
        &self.header
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn into_parts(self) -> (Fdata, Vec<f32>) {
        (self.header, self.data)
    }

    pub fn layout(&self) -> Result<LayoutDescriptor, ProcError> {
        Ok(layout::derive(&self.header, None)?)
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Complex or real points along an axis (1-based).
    pub fn size(&self, axis: usize) -> usize {
        self.shape.axis(axis - 1).points
    }

    pub fn sw(&self, axis: usize) -> Result<f64, ProcError> {
        Ok(self.header.try_parm(ParmRole::Sw, axis)? as f64)
    }

    pub fn domain(&self, axis: usize) -> Domain {
        self.header.domain(axis)
    }

    pub fn data_type(&self, axis: usize) -> DataType {
        let x_complex = self.shape.axis(0).is_complex();
        match (self.shape.axis(axis - 1).is_complex(), axis == 1 || !x_complex) {
            (false, _) => DataType::Real,
            (true, true) => DataType::Complex,
            (true, false) => DataType::Hypercomplex,
        }
    }

    /// Digital-filter delay in points (0 when absent).
    pub fn group_delay(&self) -> f64 {
        self.header.group_delay().max(0.0)
    }

    pub fn apod_state(&self, axis: usize) -> Result<ApodState, ProcError> {
        let parm = |role| self.header.try_parm(role, axis).map(f64::from);
        Ok(ApodState {
            code: ApodCode::from_i32(parm(ParmRole::ApodCode)? as i32)
                .filter(|c| *c != ApodCode::None),
            q1: parm(ParmRole::ApodQ1)?,
            q2: parm(ParmRole::ApodQ2)?,
            q3: parm(ParmRole::ApodQ3)?,
            c: parm(ParmRole::C1)? + 1.0,
            size: parm(ParmRole::Apod)?.max(0.0) as usize,
        })
    }

    /// Zero- and first-order phase recorded on an axis, in degrees.
    pub fn phase_state(&self, axis: usize) -> Result<(f64, f64), ProcError> {
        Ok((
            self.header.try_parm(ParmRole::P0, axis)? as f64,
            self.header.try_parm(ParmRole::P1, axis)? as f64,
        ))
    }

    /// Recompute FDMIN/FDMAX from the data.
    pub fn refresh_min_max(&mut self) {
        let (min, max) = min_max(&self.data);
        self.header.set_min_max(min, max);
    }

    // ─── Partitions ─────────────────────────────────────────────────────

    /// Extract XY planes `first..=last` (1-based, Z inner, A outer) as a
    /// standalone spectrum.
    ///
    /// The outer axes are collapsed into one real Z axis holding the
    /// selected planes; the bounds are recorded in FDFIRSTPLANE/FDLASTPLANE.
    pub fn plane_subset(&self, first: usize, last: usize) -> Result<Spectrum, ProcError> {
        let planes = self.shape.plane_count();
        if first == 0 || last < first || last > planes {
            return Err(ProcError::range(
                "partition",
                format!("planes {first}..={last} outside 1..={planes}"),
            ));
        }
        let plane_len = self.shape.plane_len();
        let data = self.data[(first - 1) * plane_len..last * plane_len].to_vec();

        let ndim = self.ndim();
        let mut header = self.header.clone();
        let mut axes = self.shape.axes()[..ndim.min(2)].to_vec();
        if ndim > 2 {
            axes.push(AxisShape::real(last - first + 1));
            collapse_outer_axis(&mut header, CUR_ZDIM)?;
        }
        if ndim > 3 {
            // The dimension count is kept; A holds a single plane.
            axes.push(AxisShape::real(1));
            collapse_outer_axis(&mut header, CUR_ADIM)?;
        }
        let shape = Shape::new(axes);
        header.set(FDPARTITION, 1.0);
        header.set(FDFIRSTPLANE, first as f32);
        header.set(FDLASTPLANE, last as f32);
        log::debug!("plane subset {first}..={last} of {planes}");
        Self::from_parts(header, data, shape)
    }

    /// Merge processed partitions back into one spectrum.
    ///
    /// `original` is the header the partitions were cut from; its outer
    /// axes are restored. Partitions must cover every plane exactly once,
    /// in order.
    pub fn reassemble(original: &Fdata, parts: Vec<Spectrum>) -> Result<Spectrum, ProcError> {
        let full = Shape::from_header(original)?;
        let mut expected_first = 1;
        for part in &parts {
            let first = part.header.get_i(FDFIRSTPLANE).max(0) as usize;
            let last = part.header.get_i(FDLASTPLANE).max(0) as usize;
            if first != expected_first || last < first {
                return Err(ProcError::range(
                    "reassemble",
                    format!("partition {first}..={last} does not start at plane {expected_first}"),
                ));
            }
            expected_first = last + 1;
        }
        if expected_first != full.plane_count() + 1 {
            return Err(ProcError::range(
                "reassemble",
                format!(
                    "partitions cover {} of {} planes",
                    expected_first - 1,
                    full.plane_count()
                ),
            ));
        }

        let mut parts = parts.into_iter();
        let first = parts
            .next()
            .ok_or_else(|| ProcError::range("reassemble", "no partitions"))?;
        let (mut header, mut data) = first.into_parts();
        for part in parts {
            data.extend_from_slice(&part.data);
        }

        let mut axes = Shape::from_header(&header)?.axes()[..full.ndim().min(2)].to_vec();
        axes.extend_from_slice(&full.axes()[full.ndim().min(2)..]);
        for axis in [CUR_ZDIM, CUR_ADIM].into_iter().filter(|a| *a <= full.ndim()) {
            for role in [ParmRole::QuadFlag, ParmRole::AqSign] {
                header.set_parm(role, axis, original.try_parm(role, axis)?)?;
            }
        }
        for loc in [FDPARTITION, FDFIRSTPLANE, FDLASTPLANE] {
            header.set(loc, 0.0);
        }
        Self::from_parts(header, data, Shape::new(axes))
    }
}

/// Mark an outer axis real so it can hold an arbitrary plane count.
fn collapse_outer_axis(header: &mut Fdata, axis: usize) -> Result<(), ProcError> {
    header.set_parm(ParmRole::QuadFlag, axis, QuadFlag::Real as i32 as f32)?;
    header.set_parm(ParmRole::AqSign, axis, 0.0)?;
    Ok(())
}

/// FDQUADFLAG is 1 only when every axis is real.
pub(crate) fn sync_quad_flag(header: &mut Fdata, shape: &Shape) {
    let all_real = shape.axes().iter().all(|a| !a.is_complex());
    header.set(FDQUADFLAG, if all_real { 1.0 } else { 0.0 });
}

pub(crate) fn min_max(data: &[f32]) -> (f32, f32) {
    if data.is_empty() {
        return (0.0, 0.0);
    }
    data.iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nmrpipe_core::params::{CUR_XDIM, CUR_YDIM};

    /// 1D complex FID with the given points and sweep width.
    pub(crate) fn fid_1d(points: usize, sw: f64, data: Vec<f32>) -> Spectrum {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_spectral(CUR_XDIM, points, sw, 500.0, 0.0, 4.7, "1H", true)
            .unwrap();
        Spectrum::new(fd, data).unwrap()
    }

    pub(crate) fn header_3d(x: usize, y: usize, z: usize, z_complex: bool) -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_count(3);
        fd.set_dim_spectral(CUR_XDIM, x, 8000.0, 600.0, 0.0, 4.7, "HN", true)
            .unwrap();
        fd.set_dim_spectral(CUR_YDIM, y, 2000.0, 60.0, 0.0, 118.0, "N", true)
            .unwrap();
        fd.set_dim_spectral(CUR_ZDIM, z, 3000.0, 150.0, 0.0, 56.0, "CA", z_complex)
            .unwrap();
        fd
    }

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn rejects_wrong_length() {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_spectral(CUR_XDIM, 8, 1000.0, 500.0, 0.0, 0.0, "H", true)
            .unwrap();
        assert!(matches!(
            Spectrum::new(fd, vec![0.0; 8]),
            Err(ProcError::UnsupportedLayout(LayoutError::DataLength { expected: 16, got: 8 }))
        ));
    }

    #[test]
    fn accessors_follow_header() {
        // X complex 4, Y complex: Y stores 2 * 3 rows.
        let mut fd = header_3d(4, 6, 1, false);
        fd.set_dim_count(2);
        let spec = Spectrum::new(fd, ramp(8 * 6)).unwrap();
        assert_eq!(spec.size(1), 4);
        assert_eq!(spec.size(2), 3);
        assert_eq!(spec.data_type(1), DataType::Complex);
        assert_eq!(spec.data_type(2), DataType::Hypercomplex);
        assert_eq!(spec.domain(1), Domain::Time);
        assert_eq!(spec.sw(2).unwrap(), 2000.0);
        let apod = spec.apod_state(1).unwrap();
        assert_eq!(apod.code, None);
        assert_eq!(apod.c, 1.0);
        assert!(spec.phase_state(9).is_err());
    }

    #[test]
    fn subset_and_reassemble() {
        // 2 complex Z points = 4 planes of 8 * 2 floats.
        let fd = header_3d(4, 2, 4, true);
        let full = Spectrum::new(fd.clone(), ramp(8 * 2 * 4)).unwrap();
        assert_eq!(full.shape().plane_count(), 4);

        let a = full.plane_subset(1, 3).unwrap();
        let b = full.plane_subset(4, 4).unwrap();
        assert_eq!(a.shape().plane_count(), 3);
        assert_eq!(a.header().get_i(FDFIRSTPLANE), 1);
        assert_eq!(a.header().get_i(FDLASTPLANE), 3);
        assert_eq!(a.data(), &full.data()[..48]);
        assert!(a.layout().unwrap().plane_bounds.is_some());

        let merged = Spectrum::reassemble(&fd, vec![a, b]).unwrap();
        assert_eq!(merged.data(), full.data());
        assert_eq!(merged.shape(), full.shape());
        assert_eq!(merged.header().get_i(FDPARTITION), 0);
        assert!(merged.header().is_complex(CUR_ZDIM));
    }

    #[test]
    fn reassemble_detects_gaps() {
        let fd = header_3d(4, 2, 4, true);
        let full = Spectrum::new(fd.clone(), ramp(64)).unwrap();
        let a = full.plane_subset(1, 2).unwrap();
        let c = full.plane_subset(4, 4).unwrap();
        assert!(matches!(
            Spectrum::reassemble(&fd, vec![a, c]),
            Err(ProcError::Range { .. })
        ));
    }

    #[test]
    fn subset_out_of_range() {
        let full = Spectrum::new(header_3d(4, 2, 4, true), ramp(64)).unwrap();
        assert!(full.plane_subset(0, 1).is_err());
        assert!(full.plane_subset(2, 5).is_err());
    }
}
