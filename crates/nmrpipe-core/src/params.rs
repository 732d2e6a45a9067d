//! Per-axis parameter roles and typed header accessors.
//!
//! Every per-axis lookup goes through [`Fdata::loc`], which resolves a
//! (role, axis) pair to a header slot. Axes 1-4 use the legacy per-dimension
//! locations via the FDDIMORDER permutation; axes 5-8 use the generalized
//! block starting at [`EXT_AXIS_BASE`].

use crate::enums::*;
use crate::error::HeaderError;
use crate::fdata::*;
use crate::text;
use std::fmt;

/// Axis identifiers (1-based), relative to the current transposition.
pub const CUR_XDIM: usize = 1;
pub const CUR_YDIM: usize = 2;
pub const CUR_ZDIM: usize = 3;
pub const CUR_ADIM: usize = 4;

/// Base code of the generalized ND parameters.
pub const NDPARM: i32 = 1000;

/// Highest axis number reachable through [`Fdata::loc`].
pub const MAX_ND_DIMS: usize = 8;
/// First slot of the generalized per-axis block (unused by the legacy layout).
pub const EXT_AXIS_BASE: usize = 484;
/// Slots per axis in the generalized block.
pub const EXT_AXIS_STRIDE: usize = 7;

/// Per-axis parameter roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParmRole {
    Size,
    Apod,
    Sw,
    Orig,
    Obs,
    FtFlag,
    QuadFlag,
    Units,
    Label,
    P0,
    P1,
    Car,
    Center,
    AqSign,
    ApodCode,
    ApodQ1,
    ApodQ2,
    ApodQ3,
    C1,
    Zf,
    X1,
    Xn,
    OffPpm,
    FtSize,
    TdSize,
    Lb,
    Gb,
    GOff,
    ObsMid,
}

// Columns are physical dimensions F2, F1, F3, F4.
const ND_LOC_TABLE: [[usize; 4]; 29] = [
    [FDSIZE, FDSPECNUM, FDF3SIZE, FDF4SIZE],
    [FDF2APOD, FDF1APOD, FDF3APOD, FDF4APOD],
    [FDF2SW, FDF1SW, FDF3SW, FDF4SW],
    [FDF2ORIG, FDF1ORIG, FDF3ORIG, FDF4ORIG],
    [FDF2OBS, FDF1OBS, FDF3OBS, FDF4OBS],
    [FDF2FTFLAG, FDF1FTFLAG, FDF3FTFLAG, FDF4FTFLAG],
    [FDF2QUADFLAG, FDF1QUADFLAG, FDF3QUADFLAG, FDF4QUADFLAG],
    [FDF2UNITS, FDF1UNITS, FDF3UNITS, FDF4UNITS],
    [FDF2LABEL, FDF1LABEL, FDF3LABEL, FDF4LABEL],
    [FDF2P0, FDF1P0, FDF3P0, FDF4P0],
    [FDF2P1, FDF1P1, FDF3P1, FDF4P1],
    [FDF2CAR, FDF1CAR, FDF3CAR, FDF4CAR],
    [FDF2CENTER, FDF1CENTER, FDF3CENTER, FDF4CENTER],
    [FDF2AQSIGN, FDF1AQSIGN, FDF3AQSIGN, FDF4AQSIGN],
    [FDF2APODCODE, FDF1APODCODE, FDF3APODCODE, FDF4APODCODE],
    [FDF2APODQ1, FDF1APODQ1, FDF3APODQ1, FDF4APODQ1],
    [FDF2APODQ2, FDF1APODQ2, FDF3APODQ2, FDF4APODQ2],
    [FDF2APODQ3, FDF1APODQ3, FDF3APODQ3, FDF4APODQ3],
    [FDF2C1, FDF1C1, FDF3C1, FDF4C1],
    [FDF2ZF, FDF1ZF, FDF3ZF, FDF4ZF],
    [FDF2X1, FDF1X1, FDF3X1, FDF4X1],
    [FDF2XN, FDF1XN, FDF3XN, FDF4XN],
    [FDF2OFFPPM, FDF1OFFPPM, FDF3OFFPPM, FDF4OFFPPM],
    [FDF2FTSIZE, FDF1FTSIZE, FDF3FTSIZE, FDF4FTSIZE],
    [FDF2TDSIZE, FDF1TDSIZE, FDF3TDSIZE, FDF4TDSIZE],
    [FDF2LB, FDF1LB, FDF3LB, FDF4LB],
    [FDF2GB, FDF1GB, FDF3GB, FDF4GB],
    [FDF2GOFF, FDF1GOFF, FDF3GOFF, FDF4GOFF],
    [FDF2OBSMID, FDF1OBSMID, FDF3OBSMID, FDF4OBSMID],
];

impl ParmRole {
    pub const ALL: [ParmRole; 29] = [
        Self::Size,
        Self::Apod,
        Self::Sw,
        Self::Orig,
        Self::Obs,
        Self::FtFlag,
        Self::QuadFlag,
        Self::Units,
        Self::Label,
        Self::P0,
        Self::P1,
        Self::Car,
        Self::Center,
        Self::AqSign,
        Self::ApodCode,
        Self::ApodQ1,
        Self::ApodQ2,
        Self::ApodQ3,
        Self::C1,
        Self::Zf,
        Self::X1,
        Self::Xn,
        Self::OffPpm,
        Self::FtSize,
        Self::TdSize,
        Self::Lb,
        Self::Gb,
        Self::GOff,
        Self::ObsMid,
    ];

    fn row(self) -> usize {
        self as usize
    }

    /// NMRPipe parameter code (NDSIZE = 1001, ...).
    pub fn code(self) -> i32 {
        let n = match self {
            Self::Size => 1,
            Self::Apod => 2,
            Self::Sw => 3,
            Self::Orig => 4,
            Self::Obs => 5,
            Self::FtFlag => 6,
            Self::QuadFlag => 7,
            Self::Units => 8,
            Self::Label => 9,
            Self::P0 => 11,
            Self::P1 => 12,
            Self::Car => 13,
            Self::Center => 14,
            Self::AqSign => 15,
            Self::ApodCode => 16,
            Self::ApodQ1 => 17,
            Self::ApodQ2 => 18,
            Self::ApodQ3 => 19,
            Self::C1 => 20,
            Self::Zf => 21,
            Self::X1 => 22,
            Self::Xn => 23,
            Self::OffPpm => 24,
            Self::FtSize => 25,
            Self::TdSize => 26,
            Self::Lb => 29,
            Self::Gb => 30,
            Self::GOff => 31,
            Self::ObsMid => 32,
        };
        NDPARM + n
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Size => "NDSIZE",
            Self::Apod => "NDAPOD",
            Self::Sw => "NDSW",
            Self::Orig => "NDORIG",
            Self::Obs => "NDOBS",
            Self::FtFlag => "NDFTFLAG",
            Self::QuadFlag => "NDQUADFLAG",
            Self::Units => "NDUNITS",
            Self::Label => "NDLABEL",
            Self::P0 => "NDP0",
            Self::P1 => "NDP1",
            Self::Car => "NDCAR",
            Self::Center => "NDCENTER",
            Self::AqSign => "NDAQSIGN",
            Self::ApodCode => "NDAPODCODE",
            Self::ApodQ1 => "NDAPODQ1",
            Self::ApodQ2 => "NDAPODQ2",
            Self::ApodQ3 => "NDAPODQ3",
            Self::C1 => "NDC1",
            Self::Zf => "NDZF",
            Self::X1 => "NDX1",
            Self::Xn => "NDXN",
            Self::OffPpm => "NDOFFPPM",
            Self::FtSize => "NDFTSIZE",
            Self::TdSize => "NDTDSIZE",
            Self::Lb => "NDLB",
            Self::Gb => "NDGB",
            Self::GOff => "NDGOFF",
            Self::ObsMid => "NDOBSMID",
        }
    }

    pub fn is_text(self) -> bool {
        self == Self::Label
    }

    /// Sizes follow the axis (X→FDSIZE, Y→FDSPECNUM, ...), every other
    /// role follows the physical dimension the axis currently holds.
    pub fn keyed_by_axis(self) -> bool {
        self == Self::Size
    }

    /// Offset inside one axis block of the generalized scheme.
    fn ext_slot(self) -> Option<usize> {
        match self {
            Self::Size => Some(0),
            Self::Sw => Some(1),
            Self::Obs => Some(2),
            Self::Orig => Some(3),
            Self::FtFlag => Some(4),
            Self::QuadFlag => Some(5),
            Self::Car => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for ParmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column of a physical dimension in the legacy table.
fn dim_column(phys_dim: usize) -> Option<usize> {
    match phys_dim {
        2 => Some(0),
        1 => Some(1),
        3 => Some(2),
        4 => Some(3),
        _ => None,
    }
}

impl Fdata {
    // ─── Role resolution ────────────────────────────────────────────────

    /// Physical dimension held by an axis.
    pub fn phys_dim(&self, axis: usize) -> Result<usize, HeaderError> {
        match axis {
            1..=4 => {
                let value = self.get(FDDIMORDER + axis - 1);
                let dim = value as usize;
                if value.fract() == 0.0 && (1..=4).contains(&dim) {
                    Ok(dim)
                } else {
                    Err(HeaderError::BadDimOrder { axis, value })
                }
            }
            5..=MAX_ND_DIMS => Ok(axis),
            _ => Err(HeaderError::BadDimOrder {
                axis,
                value: 0.0,
            }),
        }
    }

    /// Header slot of a (role, axis) pair.
    pub fn loc(&self, role: ParmRole, axis: usize) -> Result<usize, HeaderError> {
        let missing = HeaderError::NoLocation { role, axis };
        match axis {
            1..=4 => {
                let column = if role.keyed_by_axis() {
                    axis - 1
                } else {
                    dim_column(self.phys_dim(axis)?).ok_or(missing)?
                };
                Ok(ND_LOC_TABLE[role.row()][column])
            }
            5..=MAX_ND_DIMS => role
                .ext_slot()
                .map(|s| EXT_AXIS_BASE + (axis - 5) * EXT_AXIS_STRIDE + s)
                .ok_or(missing),
            _ => Err(missing),
        }
    }

    pub fn try_parm(&self, role: ParmRole, axis: usize) -> Result<f32, HeaderError> {
        if role.is_text() {
            return Err(HeaderError::TextRole { role });
        }
        Ok(self.get(self.loc(role, axis)?))
    }

    /// Get a parameter value by role and axis; unresolvable pairs read as zero.
    pub fn get_parm(&self, role: ParmRole, axis: usize) -> f32 {
        self.try_parm(role, axis).unwrap_or(0.0)
    }

    pub fn set_parm(&mut self, role: ParmRole, axis: usize, value: f32) -> Result<(), HeaderError> {
        if role.is_text() {
            return Err(HeaderError::TextRole { role });
        }
        let loc = self.loc(role, axis)?;
        self.set(loc, value);
        Ok(())
    }

    /// Text value of a text role (axis labels).
    pub fn get_parm_str(&self, role: ParmRole, axis: usize) -> Result<String, HeaderError> {
        let field = self.label_field(role, axis)?;
        Ok(self.text(&field))
    }

    pub fn set_parm_str(
        &mut self,
        role: ParmRole,
        axis: usize,
        value: &str,
    ) -> Result<(), HeaderError> {
        let field = self.label_field(role, axis)?;
        self.set_text(&field, value);
        Ok(())
    }

    fn label_field(&self, role: ParmRole, axis: usize) -> Result<text::TextField, HeaderError> {
        if !role.is_text() || axis > 4 {
            return Err(HeaderError::NoLocation { role, axis });
        }
        text::label_field(self.phys_dim(axis)?).ok_or(HeaderError::NoLocation { role, axis })
    }

    // ─── Convenience getters ────────────────────────────────────────────

    /// Number of stored points recorded for an axis (see [`crate::layout`]
    /// for how Y sizes depend on the X data type).
    pub fn get_size(&self, axis: usize) -> usize {
        self.get_parm(ParmRole::Size, axis).max(0.0) as usize
    }

    pub fn set_size(&mut self, axis: usize, size: usize) -> Result<(), HeaderError> {
        self.set_parm(ParmRole::Size, axis, size as f32)
    }

    /// Get the spectral width in Hz.
    pub fn get_sw(&self, axis: usize) -> f64 {
        self.get_parm(ParmRole::Sw, axis) as f64
    }

    /// Get the observe frequency in MHz.
    pub fn get_obs(&self, axis: usize) -> f64 {
        self.get_parm(ParmRole::Obs, axis) as f64
    }

    /// Get the spectral origin in Hz (frequency of the last point).
    pub fn get_orig(&self, axis: usize) -> f64 {
        self.get_parm(ParmRole::Orig, axis) as f64
    }

    /// Carrier position in ppm.
    pub fn get_car_ppm(&self, axis: usize) -> f64 {
        self.get_parm(ParmRole::Car, axis) as f64
    }

    /// Carrier position in Hz.
    pub fn get_car_hz(&self, axis: usize) -> f64 {
        self.get_car_ppm(axis) * self.get_obs(axis)
    }

    pub fn get_center(&self, axis: usize) -> f64 {
        self.get_parm(ParmRole::Center, axis) as f64
    }

    pub fn domain(&self, axis: usize) -> Domain {
        Domain::from_ftflag(self.get_parm(ParmRole::FtFlag, axis))
    }

    /// Is this axis in the frequency domain?
    pub fn is_freq(&self, axis: usize) -> bool {
        self.domain(axis) == Domain::Frequency
    }

    pub fn set_domain(&mut self, axis: usize, domain: Domain) -> Result<(), HeaderError> {
        self.set_parm(ParmRole::FtFlag, axis, domain.ftflag())
    }

    /// Raw quad flag code of an axis.
    pub fn quad_code(&self, axis: usize) -> i32 {
        self.get_parm(ParmRole::QuadFlag, axis) as i32
    }

    pub fn quad_flag(&self, axis: usize) -> Option<QuadFlag> {
        QuadFlag::from_i32(self.quad_code(axis))
    }

    /// Is this axis stored as real/imaginary pairs?
    pub fn is_complex(&self, axis: usize) -> bool {
        self.quad_flag(axis).map(QuadFlag::is_complex).unwrap_or(false)
    }

    pub fn aq_sign_code(&self, axis: usize) -> i32 {
        self.get_parm(ParmRole::AqSign, axis) as i32
    }

    /// Set the acquisition sign (quadrature detection method).
    pub fn set_aqsign(&mut self, axis: usize, aqsign: AqSign) -> Result<(), HeaderError> {
        self.set_parm(ParmRole::AqSign, axis, aqsign as i32 as f32)
    }

    /// Valid time-domain size recorded before zero filling.
    pub fn get_apod_size(&self, axis: usize) -> usize {
        self.get_parm(ParmRole::Apod, axis).max(0.0) as usize
    }

    pub fn label(&self, axis: usize) -> String {
        self.get_parm_str(ParmRole::Label, axis).unwrap_or_default()
    }

    pub fn set_label(&mut self, axis: usize, label: &str) -> Result<(), HeaderError> {
        self.set_parm_str(ParmRole::Label, axis, label)
    }

    /// Physical dimension held by each of the four axes.
    pub fn dim_order(&self) -> [usize; 4] {
        [FDDIMORDER1, FDDIMORDER2, FDDIMORDER3, FDDIMORDER4]
            .map(|loc| self.get_i(loc).max(0) as usize)
    }

    pub fn set_dim_order(&mut self, order: [usize; 4]) {
        for (i, dim) in order.iter().enumerate() {
            self.set(FDDIMORDER + i, *dim as f32);
        }
    }

    // ─── Dimension setup helpers ────────────────────────────────────────

    /// Set up an axis' spectral parameters in one call.
    ///
    /// `size` is stored as given; `car_ppm` is the carrier in ppm.
    #[allow(clippy::too_many_arguments)]
    pub fn set_dim_spectral(
        &mut self,
        axis: usize,
        size: usize,
        sw: f64,
        obs: f64,
        orig: f64,
        car_ppm: f64,
        label: &str,
        is_complex: bool,
    ) -> Result<(), HeaderError> {
        self.set_parm(ParmRole::Size, axis, size as f32)?;
        self.set_parm(ParmRole::Sw, axis, sw as f32)?;
        self.set_parm(ParmRole::Obs, axis, obs as f32)?;
        self.set_parm(ParmRole::Orig, axis, orig as f32)?;
        self.set_parm(ParmRole::Car, axis, car_ppm as f32)?;
        if axis <= 4 {
            self.set_label(axis, label)?;
        }
        let quad = if is_complex {
            QuadFlag::Complex
        } else {
            QuadFlag::Real
        };
        self.set_parm(ParmRole::QuadFlag, axis, quad as i32 as f32)?;
        self.set_parm(ParmRole::FtFlag, axis, 0.0)
    }

    /// Recompute the origin from carrier, sweep width and center point.
    ///
    /// NMRPipe convention: `orig = car*obs - sw*(size - center)/size`, with
    /// `size` the point count along the axis.
    pub fn compute_orig(&mut self, axis: usize, size: usize) -> Result<(), HeaderError> {
        let sw = self.get_sw(axis);
        let car = self.get_car_hz(axis);
        let center = self.get_center(axis);
        if size == 0 {
            return Ok(());
        }
        let n = size as f64;
        let orig = car - sw * (n - center) / n;
        self.set_parm(ParmRole::Orig, axis, orig as f32)
    }

    /// Center point (1-based) for a given point count.
    pub fn center_for(size: usize) -> usize {
        size / 2 + 1
    }

    /// Set whether data is transposed.
    pub fn set_transposed(&mut self, transposed: bool) {
        self.set(FDTRANSPOSED, if transposed { 1.0 } else { 0.0 });
    }

    /// Is data transposed?
    pub fn is_transposed(&self) -> bool {
        self.get_i(FDTRANSPOSED) != 0
    }

    /// Set pipe/stream mode.
    pub fn set_pipe_flag(&mut self, is_pipe: bool) {
        self.set(FDPIPEFLAG, if is_pipe { 1.0 } else { 0.0 });
    }

    /// Is pipe/stream mode?
    pub fn is_pipe(&self) -> bool {
        self.get_i(FDPIPEFLAG) != 0
    }

    // ─── Title / Comment ────────────────────────────────────────────────

    pub fn set_title(&mut self, title: &str) {
        self.set_text(&text::TITLE, title);
    }

    pub fn get_title(&self) -> String {
        self.text(&text::TITLE)
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.set_text(&text::COMMENT, comment);
    }

    pub fn get_comment(&self) -> String {
        self.text(&text::COMMENT)
    }

    pub fn set_srcname(&mut self, name: &str) {
        self.set_text(&text::SRCNAME, name);
    }

    pub fn set_username(&mut self, name: &str) {
        self.set_text(&text::USERNAME, name);
    }

    pub fn set_opername(&mut self, name: &str) {
        self.set_text(&text::OPERNAME, name);
    }

    // ─── DMX / digital filter ───────────────────────────────────────────

    /// Set digital-filter related parameters.
    pub fn set_dmx(&mut self, group_delay: f32, mode: DmxMode) {
        self.set(FDDMXVAL, group_delay);
        self.set(FDDMXFLAG, mode as i32 as f32);
    }

    /// Group delay of the digital filter, in points.
    pub fn group_delay(&self) -> f64 {
        self.get(FDDMXVAL) as f64
    }

    pub fn dmx_mode(&self) -> DmxMode {
        DmxMode::from_i32(self.get_i(FDDMXFLAG)).unwrap_or_default()
    }

    // ─── Min / Max ──────────────────────────────────────────────────────

    pub fn set_min_max(&mut self, min: f32, max: f32) {
        self.set(FDMIN, min);
        self.set(FDMAX, max);
        self.set(FDDISPMIN, min);
        self.set(FDDISPMAX, max);
        self.set(FDSCALEFLAG, 1.0);
    }

    pub fn get_min(&self) -> f32 {
        self.get(FDMIN)
    }

    pub fn get_max(&self) -> f32 {
        self.get(FDMAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_2d() -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_count(2);
        fd.set_dim_spectral(CUR_XDIM, 2048, 12000.0, 600.13, 4800.0, 4.7, "1H", true)
            .unwrap();
        fd.set_dim_spectral(CUR_YDIM, 256, 3000.0, 60.81, 1500.0, 120.0, "15N", true)
            .unwrap();
        fd
    }

    #[test]
    fn test_dim_spectral() {
        let fd = header_2d();
        assert_eq!(fd.get_size(CUR_XDIM), 2048);
        assert_eq!(fd.get_size(CUR_YDIM), 256);
        assert!((fd.get_sw(CUR_XDIM) - 12000.0).abs() < 0.01);
        assert!((fd.get_obs(CUR_YDIM) - 60.81).abs() < 0.01);
        assert_eq!(fd.label(CUR_YDIM), "15N");
        assert!((fd.get_car_hz(CUR_XDIM) - 4.7 * 600.13).abs() < 1e-3);
    }

    #[test]
    fn legacy_table_matches_named_locations() {
        let fd = header_2d();
        assert_eq!(fd.loc(ParmRole::Sw, CUR_XDIM).unwrap(), FDF2SW);
        assert_eq!(fd.loc(ParmRole::Sw, CUR_YDIM).unwrap(), FDF1SW);
        assert_eq!(fd.loc(ParmRole::Obs, CUR_ZDIM).unwrap(), FDF3OBS);
        assert_eq!(fd.loc(ParmRole::FtFlag, CUR_ADIM).unwrap(), FDF4FTFLAG);
        assert_eq!(fd.loc(ParmRole::Size, CUR_YDIM).unwrap(), FDSPECNUM);
    }

    #[test]
    fn sizes_follow_axis_after_reordering() {
        let mut fd = header_2d();
        fd.set_dim_order([1, 2, 3, 4]);
        assert_eq!(fd.loc(ParmRole::Size, CUR_XDIM).unwrap(), FDSIZE);
        assert_eq!(fd.loc(ParmRole::Sw, CUR_XDIM).unwrap(), FDF1SW);
        assert!((fd.get_sw(CUR_XDIM) - 3000.0).abs() < 0.01);
        assert_eq!(fd.label(CUR_XDIM), "15N");
    }

    #[test]
    fn generalized_axes_use_extended_block() {
        let mut fd = header_2d();
        assert_eq!(fd.loc(ParmRole::Size, 5).unwrap(), EXT_AXIS_BASE);
        assert_eq!(fd.loc(ParmRole::Car, 8).unwrap(), EXT_AXIS_BASE + 3 * EXT_AXIS_STRIDE + 6);
        assert_eq!(fd.loc(ParmRole::Car, 8).unwrap(), crate::fdata::FDATA_SIZE - 1);
        assert!(fd.loc(ParmRole::P0, 5).is_err());
        assert!(fd.loc(ParmRole::Sw, 9).is_err());
        fd.set_parm(ParmRole::Sw, 6, 1234.5).unwrap();
        assert_eq!(fd.get_parm(ParmRole::Sw, 6), 1234.5);
    }

    #[test]
    fn generalized_block_does_not_touch_legacy_slots() {
        let used: Vec<usize> = ParmRole::ALL
            .iter()
            .flat_map(|r| ND_LOC_TABLE[r.row()].iter().copied())
            .collect();
        for axis in 5..=MAX_ND_DIMS {
            for role in ParmRole::ALL {
                if let Some(slot) = role.ext_slot() {
                    let loc = EXT_AXIS_BASE + (axis - 5) * EXT_AXIS_STRIDE + slot;
                    assert!(loc < FDATA_SIZE);
                    assert!(!used.contains(&loc));
                    assert!(!text::is_text_slot(loc));
                }
            }
        }
    }

    #[test]
    fn text_role_is_not_numeric() {
        let mut fd = header_2d();
        assert_eq!(
            fd.try_parm(ParmRole::Label, CUR_XDIM),
            Err(HeaderError::TextRole {
                role: ParmRole::Label
            })
        );
        assert!(fd.set_parm(ParmRole::Label, CUR_XDIM, 1.0).is_err());
    }

    #[test]
    fn bad_dim_order_is_reported() {
        let mut fd = header_2d();
        fd.set(FDDIMORDER1, 7.0);
        assert!(matches!(
            fd.loc(ParmRole::Sw, CUR_XDIM),
            Err(HeaderError::BadDimOrder { axis: 1, .. })
        ));
    }

    #[test]
    fn compute_orig_uses_center() {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_spectral(CUR_XDIM, 1598, 10000.0, 500.0, 0.0, 2385.889 / 500.0, "1H", true)
            .unwrap();
        fd.set_parm(ParmRole::Center, CUR_XDIM, Fdata::center_for(1598) as f32)
            .unwrap();
        fd.compute_orig(CUR_XDIM, 1598).unwrap();
        let expected = 2385.889 - 10000.0 * (1598.0 - 800.0) / 1598.0;
        assert!((fd.get_orig(CUR_XDIM) - expected).abs() < 0.01);
    }

    #[test]
    fn role_codes_roundtrip() {
        for role in ParmRole::ALL {
            assert_eq!(ParmRole::from_code(role.code()), Some(role));
        }
        assert_eq!(ParmRole::Size.code(), 1001);
        assert_eq!(ParmRole::ObsMid.code(), 1032);
    }

    #[test]
    fn test_title_comment() {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_title("Test experiment");
        assert_eq!(fd.get_title(), "Test experiment");
        fd.set_comment("This is a longer comment string");
        assert_eq!(fd.get_comment(), "This is a longer comment string");
    }

    #[test]
    fn name_fields_and_min_max() {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_srcname("test.fid");
        fd.set_username("nmr");
        fd.set_opername("spectrometer operator");
        assert_eq!(fd.text(&text::SRCNAME), "test.fid");
        assert_eq!(fd.text(&text::USERNAME), "nmr");
        assert_eq!(fd.text(&text::OPERNAME), "spectrometer operator");

        fd.set_min_max(-2.5, 7.0);
        assert_eq!((fd.get_min(), fd.get_max()), (-2.5, 7.0));
        assert_eq!(fd.get_i(FDSCALEFLAG), 1);
    }

    #[test]
    fn domain_follows_ft_flag() {
        let mut fd = Fdata::new();
        fd.init_default();
        assert!(!fd.is_freq(CUR_XDIM));
        fd.set_domain(CUR_XDIM, Domain::Frequency).unwrap();
        assert!(fd.is_freq(CUR_XDIM));
        assert!(!fd.is_freq(CUR_YDIM));
    }
}
