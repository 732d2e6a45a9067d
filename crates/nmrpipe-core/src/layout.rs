//! Data layout: how the intensities described by a header sit in memory and
//! on disk.
//!
//! Storage order, outermost first, is `A, Z, Y, X`. Complex X vectors hold a
//! block of reals followed by a block of imaginaries; complex Y/Z/A points
//! interleave real and imaginary rows one after the other.
//!
//! Recorded sizes are not uniform across axes: X records complex points; Y
//! records real+imaginary rows when X is complex but complex points when X
//! is real; Z and A record real+imaginary planes.

use crate::enums::*;
use crate::error::{HeaderError, LayoutError};
use crate::fdata::*;
use crate::params::ParmRole;

/// Multiplier of the second slice-count field.
pub const MAX_AXIS_SIZE: u64 = MAX_NMR_SIZE as u64;

// ─── Shape ──────────────────────────────────────────────────────────────────

/// Points and components (1 real, 2 complex) of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisShape {
    pub points: usize,
    pub components: usize,
}

impl AxisShape {
    pub fn real(points: usize) -> Self {
        Self { points, components: 1 }
    }

    pub fn complex(points: usize) -> Self {
        Self { points, components: 2 }
    }

    pub fn is_complex(&self) -> bool {
        self.components == 2
    }

    /// Real plus imaginary sample count.
    pub fn total(&self) -> usize {
        self.points * self.components
    }
}

/// Axis shapes in X, Y, Z, A order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    axes: Vec<AxisShape>,
}

impl Shape {
    pub fn new(axes: Vec<AxisShape>) -> Self {
        Self { axes }
    }

    /// Decode the shape recorded in a header.
    pub fn from_header(hdr: &Fdata) -> Result<Self, LayoutError> {
        let ndim = checked_dim_count(hdr)?;
        check_dim_order(hdr, ndim)?;

        let complex: Vec<bool> = (1..=ndim)
            .map(|axis| quad_flag(hdr, axis).map(QuadFlag::is_complex))
            .collect::<Result<_, _>>()?;

        let mut axes = Vec::with_capacity(ndim);
        for axis in 1..=ndim {
            let stored = stored_size(hdr, axis)?;
            let c = complex[axis - 1];
            // X records complex points; Y records complex points only when X is real.
            let records_points = axis == 1 || (axis == 2 && !complex[0]);
            let shape = if !c {
                AxisShape::real(stored)
            } else if records_points {
                AxisShape::complex(stored)
            } else {
                if stored % 2 != 0 {
                    return Err(LayoutError::OddInterleave {
                        axis: axis_char(axis),
                        size: stored,
                    });
                }
                AxisShape::complex(stored / 2)
            };
            axes.push(shape);
        }
        Ok(Self { axes })
    }

    /// Record this shape's sizes and the stream slice count in a header.
    ///
    /// Quad flags are not touched; they must already describe the shape.
    pub fn write_sizes(&self, hdr: &mut Fdata) -> Result<(), HeaderError> {
        let x_complex = self.axes.first().map(AxisShape::is_complex).unwrap_or(false);
        for axis in 1..=4 {
            let stored = match self.axes.get(axis - 1) {
                None => 1,
                Some(s) if axis == 1 => s.points,
                Some(s) if axis == 2 && !x_complex => s.points,
                Some(s) => s.total(),
            };
            hdr.set_size(axis, stored)?;
        }
        hdr.set_dim_count(self.axes.len() as i32);
        write_slice_count(hdr, self.trace_count() as u64);
        Ok(())
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[AxisShape] {
        &self.axes
    }

    /// Shape of an axis by 0-based index (X = 0).
    pub fn axis(&self, index: usize) -> AxisShape {
        self.axes.get(index).copied().unwrap_or(AxisShape::real(1))
    }

    pub fn set_axis(&mut self, index: usize, shape: AxisShape) {
        self.axes[index] = shape;
    }

    pub fn swap_axes(&mut self, a: usize, b: usize) {
        self.axes.swap(a, b);
    }

    /// Floats in one X vector.
    pub fn trace_len(&self) -> usize {
        self.axis(0).total()
    }

    /// Number of X vectors (real and imaginary rows counted separately).
    pub fn trace_count(&self) -> usize {
        self.axes.iter().skip(1).map(AxisShape::total).product()
    }

    /// Floats in one XY plane.
    pub fn plane_len(&self) -> usize {
        self.axis(0).total() * self.axis(1).total()
    }

    /// Number of XY planes (Z and A real/imaginary planes counted separately).
    pub fn plane_count(&self) -> usize {
        self.axes.iter().skip(2).map(AxisShape::total).product()
    }

    pub fn total(&self) -> usize {
        self.trace_len() * self.trace_count()
    }
}

fn axis_char(axis: usize) -> char {
    DimCode::from_i32(axis as i32)
        .map(DimCode::axis_char_upper)
        .unwrap_or('?')
}

fn checked_dim_count(hdr: &Fdata) -> Result<usize, LayoutError> {
    let n = hdr.dim_count();
    if (1..=4).contains(&n) {
        Ok(n as usize)
    } else {
        Err(LayoutError::DimCount(n))
    }
}

fn check_dim_order(hdr: &Fdata, ndim: usize) -> Result<(), LayoutError> {
    let order = hdr.dim_order();
    let active = &order[..ndim];
    let valid = active.iter().all(|d| (1..=4).contains(d))
        && active
            .iter()
            .enumerate()
            .all(|(i, d)| !active[..i].contains(d));
    if valid {
        Ok(())
    } else {
        Err(LayoutError::DimOrder(order.iter().map(|&d| d as i32).collect()))
    }
}

fn quad_flag(hdr: &Fdata, axis: usize) -> Result<QuadFlag, LayoutError> {
    let code = hdr.quad_code(axis);
    QuadFlag::from_i32(code).ok_or(LayoutError::QuadFlag {
        axis: axis_char(axis),
        value: code,
    })
}

fn stored_size(hdr: &Fdata, axis: usize) -> Result<usize, LayoutError> {
    let size = hdr.get_parm(ParmRole::Size, axis);
    if size >= 1.0 && size.fract() == 0.0 {
        Ok(size as usize)
    } else {
        Err(LayoutError::Size {
            axis: axis_char(axis),
            size,
        })
    }
}

/// Per-axis data types: indirect complex axes of X-complex data are hypercomplex.
pub fn data_types(hdr: &Fdata) -> Result<Vec<DataType>, LayoutError> {
    let ndim = checked_dim_count(hdr)?;
    let flags: Vec<QuadFlag> = (1..=ndim)
        .map(|axis| quad_flag(hdr, axis))
        .collect::<Result<_, _>>()?;
    let x_complex = flags[0].is_complex();
    Ok(flags
        .iter()
        .enumerate()
        .map(|(i, q)| match (q.is_complex(), i == 0 || !x_complex) {
            (false, _) => DataType::Real,
            (true, true) => DataType::Complex,
            (true, false) => DataType::Hypercomplex,
        })
        .collect())
}

// ─── Slice count ────────────────────────────────────────────────────────────

/// Combine the two slice-count fields.
pub fn decode_slice_count(field0: f32, field1: f32) -> u64 {
    field0.max(0.0) as u64 + MAX_AXIS_SIZE * field1.max(0.0) as u64
}

/// Split a slice count into its two fields, using the second only when needed.
pub fn encode_slice_count(total: u64) -> (f32, f32) {
    if total < MAX_AXIS_SIZE {
        (total as f32, 0.0)
    } else {
        ((total % MAX_AXIS_SIZE) as f32, (total / MAX_AXIS_SIZE) as f32)
    }
}

pub fn read_slice_count(hdr: &Fdata) -> u64 {
    decode_slice_count(hdr.get(FDSLICECOUNT0), hdr.get(FDSLICECOUNT1))
}

pub fn write_slice_count(hdr: &mut Fdata, total: u64) {
    let (f0, f1) = encode_slice_count(total);
    hdr.set(FDSLICECOUNT0, f0);
    hdr.set(FDSLICECOUNT1, f1);
}

// ─── File templates ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Literal(String),
    Index { width: usize, zero_pad: bool },
}

/// A printf-style file name template such as `fid/test%03d.fid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate {
    raw: String,
    parts: Vec<TemplatePart>,
}

impl FileTemplate {
    /// Parse `%d`, `%Nd`, `%0Nd` placeholders and `%%` escapes.
    pub fn parse(template: &str) -> Result<Self, LayoutError> {
        let bad = |reason: &str| LayoutError::Template {
            template: template.to_string(),
            reason: reason.to_string(),
        };
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            let zero_pad = chars.peek() == Some(&'0');
            if zero_pad {
                chars.next();
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                digits.push(*d);
                chars.next();
            }
            if chars.next() != Some('d') {
                return Err(bad("only integer placeholders are supported"));
            }
            let width = if digits.is_empty() {
                0
            } else {
                digits.parse().map_err(|_| bad("placeholder width is not a number"))?
            };
            if !literal.is_empty() {
                parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
            }
            parts.push(TemplatePart::Index { width, zero_pad });
        }
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }
        Ok(Self {
            raw: template.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, TemplatePart::Index { .. }))
            .count()
    }

    /// Substitute 1-based indices, outermost first.
    pub fn format(&self, indices: &[usize]) -> Result<String, LayoutError> {
        if indices.len() != self.placeholders() {
            return Err(LayoutError::Template {
                template: self.raw.clone(),
                reason: format!(
                    "{} indices for {} placeholders",
                    indices.len(),
                    self.placeholders()
                ),
            });
        }
        let mut out = String::new();
        let mut next = indices.iter();
        for part in &self.parts {
            match part {
                TemplatePart::Literal(s) => out.push_str(s),
                TemplatePart::Index { width, zero_pad } => {
                    let i = next.next().copied().unwrap_or_default();
                    if *zero_pad {
                        out.push_str(&format!("{i:0width$}", width = *width));
                    } else {
                        out.push_str(&format!("{i:width$}", width = *width));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Check that each fixed-width placeholder can hold its largest index.
    fn check_widths(&self, maxima: &[usize]) -> Result<(), LayoutError> {
        let widths = self.parts.iter().filter_map(|p| match p {
            TemplatePart::Index { width, .. } => Some(*width),
            TemplatePart::Literal(_) => None,
        });
        for (width, max) in widths.zip(maxima) {
            if width > 0 && max.to_string().len() > width {
                return Err(LayoutError::Template {
                    template: self.raw.clone(),
                    reason: format!("index {max} does not fit in {width} digits"),
                });
            }
        }
        Ok(())
    }
}

// ─── Layout descriptor ──────────────────────────────────────────────────────

/// How real and imaginary samples of an axis are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// Real axis.
    None,
    /// Real block, then imaginary block (complex X).
    Block,
    /// Real and imaginary alternate point by point (complex Y/Z/A).
    Single,
}

/// Layout of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    pub axis: DimCode,
    pub phys_dim: usize,
    pub quad_flag: QuadFlag,
    pub data_type: DataType,
    pub domain: Domain,
    /// Complex or real points.
    pub points: usize,
    /// Value recorded in the header size slot.
    pub stored_size: usize,
    /// Real plus imaginary samples.
    pub samples: usize,
    pub interleave: Interleave,
    /// Bytes between consecutive points.
    pub stride_bytes: usize,
    /// Bytes between the real and imaginary part of one point (0 if real).
    pub component_stride_bytes: usize,
}

/// How the data set is split across files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVariant {
    /// 1D/2D data in one file.
    SingleFile,
    /// One header followed by all data (FDPIPEFLAG set).
    Stream,
    /// One file per XY plane (3D/4D).
    PlaneSeries,
    /// One file per XYZ cube (4D, FDCUBEFLAG set).
    CubeSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub ndim: usize,
    pub axes: Vec<AxisLayout>,
    pub shape: Shape,
    pub variant: FileVariant,
    pub template: Option<FileTemplate>,
    pub slice_count: u64,
    pub file_count: usize,
    /// 1-based inclusive plane range held by a partition.
    pub plane_bounds: Option<(usize, usize)>,
    pub endian: Endian,
}

impl LayoutDescriptor {
    /// Floats stored in each file of the data set.
    pub fn floats_per_file(&self) -> usize {
        match self.variant {
            FileVariant::SingleFile | FileVariant::Stream => self.shape.total(),
            FileVariant::PlaneSeries => self.shape.plane_len(),
            FileVariant::CubeSeries => self.shape.plane_len() * self.shape.axis(2).total(),
        }
    }

    pub fn data_bytes_per_file(&self) -> usize {
        self.floats_per_file() * 4
    }

    /// Index ranges of the template placeholders, outermost first.
    fn index_maxima(&self) -> Vec<usize> {
        match (self.variant, self.ndim) {
            (FileVariant::PlaneSeries, 4) => {
                vec![self.shape.axis(3).total(), self.shape.axis(2).total()]
            }
            (FileVariant::PlaneSeries, _) => vec![self.shape.axis(2).total()],
            (FileVariant::CubeSeries, _) => vec![self.shape.axis(3).total()],
            _ => Vec::new(),
        }
    }

    /// File names of a series in storage order: A outermost, Z inner.
    pub fn file_names(&self) -> Result<Vec<String>, LayoutError> {
        let template = match &self.template {
            Some(t) => t,
            None => {
                return Err(LayoutError::Template {
                    template: String::new(),
                    reason: format!("{:?} data needs a file name template", self.variant),
                })
            }
        };
        match self.index_maxima().as_slice() {
            [] => Ok(vec![template.format(&[])?]),
            [n] => (1..=*n).map(|i| template.format(&[i])).collect(),
            [na, nz] => {
                let mut names = Vec::with_capacity(na * nz);
                for a in 1..=*na {
                    for z in 1..=*nz {
                        names.push(template.format(&[a, z])?);
                    }
                }
                Ok(names)
            }
            _ => unreachable!("at most two placeholders"),
        }
    }
}

/// Interpret a header as a concrete layout.
///
/// `template` names the per-plane or per-cube files of a series; it is
/// validated against the variant and sizes when given.
pub fn derive(hdr: &Fdata, template: Option<&str>) -> Result<LayoutDescriptor, LayoutError> {
    let shape = Shape::from_header(hdr)?;
    let ndim = shape.ndim();
    let types = data_types(hdr)?;

    let mut axes = Vec::with_capacity(ndim);
    let mut lower = 1usize;
    for (i, s) in shape.axes().iter().enumerate() {
        let axis = i + 1;
        let dim = DimCode::from_i32(axis as i32).unwrap_or(DimCode::X);
        let quad = quad_flag(hdr, axis)?;
        let code = hdr.aq_sign_code(axis);
        match AqSign::from_i32(code) {
            Some(sign) if sign.accepts(types[i]) => {}
            _ => {
                return Err(LayoutError::SignCode {
                    axis: axis_char(axis),
                    code,
                })
            }
        }
        let interleave = match (s.is_complex(), axis == 1) {
            (false, _) => Interleave::None,
            (true, true) => Interleave::Block,
            (true, false) => Interleave::Single,
        };
        let (stride_bytes, component_stride_bytes) = match interleave {
            Interleave::None => (if axis == 1 { 4 } else { lower * 4 }, 0),
            Interleave::Block => (4, s.points * 4),
            Interleave::Single => (lower * 2 * 4, lower * 4),
        };
        axes.push(AxisLayout {
            axis: dim,
            phys_dim: hdr.dim_order()[i],
            quad_flag: quad,
            data_type: types[i],
            domain: hdr.domain(axis),
            points: s.points,
            stored_size: hdr.get_size(axis),
            samples: s.total(),
            interleave,
            stride_bytes,
            component_stride_bytes,
        });
        lower *= s.total();
    }

    let variant = if hdr.get_i(FDPIPEFLAG) != 0 {
        FileVariant::Stream
    } else if ndim <= 2 {
        FileVariant::SingleFile
    } else if hdr.get_i(FDCUBEFLAG) == 1 {
        if ndim != 4 {
            return Err(LayoutError::CubeDims(ndim));
        }
        FileVariant::CubeSeries
    } else {
        FileVariant::PlaneSeries
    };

    let slice_count = read_slice_count(hdr);
    let expected_slices = shape.trace_count() as u64;
    if variant == FileVariant::Stream && slice_count != 0 && slice_count != expected_slices {
        return Err(LayoutError::SliceCount {
            declared: slice_count,
            expected: expected_slices,
        });
    }

    let mut layout = LayoutDescriptor {
        ndim,
        axes,
        shape,
        variant,
        template: None,
        slice_count: if slice_count == 0 { expected_slices } else { slice_count },
        file_count: 1,
        plane_bounds: None,
        endian: hdr.endian(),
    };

    let maxima = layout.index_maxima();
    layout.file_count = maxima.iter().product::<usize>().max(1);
    let declared_files = hdr.get_i(FDFILECOUNT).max(0) as usize;
    if declared_files > 1 && declared_files != layout.file_count {
        return Err(LayoutError::FileCount {
            declared: declared_files,
            expected: layout.file_count,
        });
    }

    if let Some(t) = template {
        let t = FileTemplate::parse(t)?;
        if t.placeholders() != maxima.len() {
            return Err(LayoutError::Template {
                template: t.as_str().to_string(),
                reason: format!(
                    "{:?} with {} dimensions needs {} placeholders, found {}",
                    variant,
                    ndim,
                    maxima.len(),
                    t.placeholders()
                ),
            });
        }
        t.check_widths(&maxima)?;
        layout.template = Some(t);
    }

    let first = hdr.get_i(FDFIRSTPLANE).max(0) as usize;
    let last = hdr.get_i(FDLASTPLANE).max(0) as usize;
    if first > 0 || last > 0 {
        let planes = layout.shape.plane_count();
        if first == 0 || last < first || last - first + 1 != planes {
            return Err(LayoutError::PlaneBounds { first, last, planes });
        }
        layout.plane_bounds = Some((first, last));
    }

    log::debug!(
        "derived layout: {:?}, {}D, shape {:?}, {} slices, {} file(s)",
        layout.variant,
        layout.ndim,
        layout.shape.axes(),
        layout.slice_count,
        layout.file_count
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::*;

    fn header(ndim: usize, sizes: &[usize], complex: &[bool]) -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_count(ndim as i32);
        for axis in 1..=ndim {
            let (size, is_complex) = (sizes[axis - 1], complex[axis - 1]);
            fd.set_dim_spectral(axis, size, 1000.0, 100.0, 0.0, 0.0, "", is_complex)
                .unwrap();
        }
        fd
    }

    #[test]
    fn y_size_doubles_when_x_complex() {
        let shape = Shape::new(vec![AxisShape::complex(640), AxisShape::complex(184)]);
        let mut fd = header(2, &[1, 1], &[true, true]);
        shape.write_sizes(&mut fd).unwrap();
        assert_eq!(fd.get(FDSPECNUM), 368.0);
        assert_eq!(fd.get(FDSIZE), 640.0);
        assert_eq!(Shape::from_header(&fd).unwrap(), shape);
    }

    #[test]
    fn y_size_unscaled_when_x_real() {
        let shape = Shape::new(vec![AxisShape::real(640), AxisShape::complex(184)]);
        let mut fd = header(2, &[1, 1], &[false, true]);
        shape.write_sizes(&mut fd).unwrap();
        assert_eq!(fd.get(FDSPECNUM), 184.0);
        let decoded = Shape::from_header(&fd).unwrap();
        assert_eq!(decoded, shape);
        assert_eq!(decoded.trace_count(), 368);
    }

    #[test]
    fn z_and_a_record_total_samples() {
        let fd = header(4, &[64, 32, 20, 16], &[true, true, true, true]);
        let shape = Shape::from_header(&fd).unwrap();
        assert_eq!(shape.axis(2), AxisShape::complex(10));
        assert_eq!(shape.axis(3), AxisShape::complex(8));
        assert_eq!(shape.plane_count(), 320);
        assert_eq!(shape.trace_len(), 128);
    }

    #[test]
    fn odd_interleaved_size_is_rejected() {
        let fd = header(3, &[64, 32, 7], &[true, true, true]);
        assert!(matches!(
            Shape::from_header(&fd),
            Err(LayoutError::OddInterleave { axis: 'Z', size: 7 })
        ));
    }

    #[test]
    fn data_type_classification() {
        let fd = header(3, &[64, 32, 8], &[true, true, false]);
        assert_eq!(
            data_types(&fd).unwrap(),
            vec![DataType::Complex, DataType::Hypercomplex, DataType::Real]
        );
        let fd = header(2, &[64, 32], &[false, true]);
        assert_eq!(data_types(&fd).unwrap(), vec![DataType::Real, DataType::Complex]);
    }

    #[test]
    fn strides_follow_interleaving() {
        let fd = header(2, &[640, 368], &[true, true]);
        let layout = derive(&fd, None).unwrap();
        let x = &layout.axes[0];
        let y = &layout.axes[1];
        assert_eq!(x.interleave, Interleave::Block);
        assert_eq!(x.stride_bytes, 4);
        assert_eq!(x.component_stride_bytes, 640 * 4);
        assert_eq!(y.interleave, Interleave::Single);
        assert_eq!(y.component_stride_bytes, 1280 * 4);
        assert_eq!(y.stride_bytes, 2 * 1280 * 4);
        assert_eq!(y.points, 184);
        assert_eq!(y.stored_size, 368);
        assert_eq!(layout.variant, FileVariant::SingleFile);
    }

    #[test]
    fn slice_count_two_fields() {
        assert_eq!(decode_slice_count(1_000_000.0, 2.0), 1_000_000 + 2 * 16_777_216);
        let total = 1_000_000 + 2 * 16_777_216;
        assert_eq!(encode_slice_count(total), (1_000_000.0, 2.0));
        assert_eq!(encode_slice_count(4096), (4096.0, 0.0));
    }

    #[test]
    fn stream_slice_count_must_match() {
        let mut fd = header(3, &[64, 32, 8], &[true, true, true]);
        fd.set_pipe_flag(true);
        write_slice_count(&mut fd, 256);
        assert_eq!(derive(&fd, None).unwrap().slice_count, 256);
        write_slice_count(&mut fd, 255);
        assert!(matches!(
            derive(&fd, None),
            Err(LayoutError::SliceCount { declared: 255, expected: 256 })
        ));
    }

    #[test]
    fn plane_series_template() {
        let fd = header(3, &[64, 32, 12], &[true, true, true]);
        let layout = derive(&fd, Some("fid/test%03d.fid")).unwrap();
        assert_eq!(layout.variant, FileVariant::PlaneSeries);
        assert_eq!(layout.file_count, 12);
        let names = layout.file_names().unwrap();
        assert_eq!(names.first().unwrap(), "fid/test001.fid");
        assert_eq!(names.last().unwrap(), "fid/test012.fid");
        assert_eq!(layout.floats_per_file(), 128 * 32);

        assert!(derive(&fd, Some("fid/test%d%d.fid")).is_err());
        assert!(derive(&fd, Some("fid/test%01d.fid")).is_err());
        assert!(derive(&fd, Some("fid/test%03f.fid")).is_err());
    }

    #[test]
    fn four_d_plane_series_orders_a_outer() {
        let fd = header(4, &[16, 8, 4, 4], &[true, true, true, true]);
        let layout = derive(&fd, Some("ft/test%02d%03d.ft4")).unwrap();
        let names = layout.file_names().unwrap();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "ft/test01001.ft4");
        assert_eq!(names[1], "ft/test01002.ft4");
        assert_eq!(names[4], "ft/test02001.ft4");
    }

    #[test]
    fn cube_series_needs_4d() {
        let mut fd = header(3, &[16, 8, 4], &[true, true, true]);
        fd.set(FDCUBEFLAG, 1.0);
        assert_eq!(derive(&fd, None), Err(LayoutError::CubeDims(3)));

        let mut fd = header(4, &[16, 8, 4, 6], &[true, true, true, true]);
        fd.set(FDCUBEFLAG, 1.0);
        let layout = derive(&fd, Some("cube%d.ft4")).unwrap();
        assert_eq!(layout.variant, FileVariant::CubeSeries);
        assert_eq!(layout.file_count, 6);
        assert_eq!(layout.floats_per_file(), 32 * 8 * 4);
        assert_eq!(layout.data_bytes_per_file(), 32 * 8 * 4 * 4);
    }

    #[test]
    fn declared_file_count_must_match() {
        let mut fd = header(3, &[64, 32, 12], &[true, true, true]);
        fd.set(FDFILECOUNT, 10.0);
        assert_eq!(
            derive(&fd, None),
            Err(LayoutError::FileCount { declared: 10, expected: 12 })
        );
    }

    #[test]
    fn sign_code_must_fit_data_type() {
        let mut fd = header(2, &[64, 32], &[true, true]);
        fd.set_aqsign(CUR_YDIM, AqSign::States).unwrap();
        assert!(derive(&fd, None).is_ok());
        fd.set_aqsign(CUR_YDIM, AqSign::Sequential).unwrap();
        assert_eq!(
            derive(&fd, None),
            Err(LayoutError::SignCode { axis: 'Y', code: 1 })
        );
    }

    #[test]
    fn dim_order_must_be_permutation() {
        let mut fd = header(2, &[64, 32], &[true, true]);
        fd.set_dim_order([2, 2, 3, 4]);
        assert!(matches!(Shape::from_header(&fd), Err(LayoutError::DimOrder(_))));
    }

    #[test]
    fn plane_bounds_match_plane_count() {
        let mut fd = header(3, &[64, 32, 4], &[true, true, true]);
        fd.set(FDFIRSTPLANE, 5.0);
        fd.set(FDLASTPLANE, 8.0);
        assert_eq!(derive(&fd, None).unwrap().plane_bounds, Some((5, 8)));
        fd.set(FDLASTPLANE, 9.0);
        assert!(matches!(derive(&fd, None), Err(LayoutError::PlaneBounds { .. })));
    }
}
