//! Enumerations for NMRPipe data types, axis modes and header codes.
//!
//! Numeric values match the codes stored in the FDATA header.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Quad Flag (FDQUADFLAG, NDQUADFLAG) ─────────────────────────────────────

/// Quadrature detection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum QuadFlag {
    /// Complex (quad detected).
    Complex = 0,
    /// Real (singlature).
    Real = 1,
    /// Pseudo-quad (treated as real on output).
    PseudoQuad = 2,
    /// States-Echo (SE).
    StatesEcho = 3,
    /// Gradient (Rance-Kay / Echo-AntiEcho).
    Gradient = 4,
}

impl QuadFlag {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Complex),
            1 => Some(Self::Real),
            2 => Some(Self::PseudoQuad),
            3 => Some(Self::StatesEcho),
            4 => Some(Self::Gradient),
            _ => None,
        }
    }

    /// Whether samples along this axis are stored as real/imaginary pairs.
    ///
    /// States-echo and gradient data are stored interleaved like States data;
    /// pseudo-quad is stored as real.
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Complex | Self::StatesEcho | Self::Gradient)
    }
}

impl fmt::Display for QuadFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complex => write!(f, "Complex"),
            Self::Real => write!(f, "Real"),
            Self::PseudoQuad => write!(f, "PseudoQuad"),
            Self::StatesEcho => write!(f, "States-Echo"),
            Self::Gradient => write!(f, "Gradient"),
        }
    }
}

// ─── Data type / domain per axis ────────────────────────────────────────────

/// Storage classification of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Real,
    Complex,
    /// Complex indirect axis of data that is also complex along X.
    Hypercomplex,
}

impl DataType {
    pub fn components(self) -> usize {
        match self {
            Self::Real => 1,
            Self::Complex | Self::Hypercomplex => 2,
        }
    }

    pub fn is_complex(self) -> bool {
        self != Self::Real
    }
}

/// Time or frequency domain of one axis (NDFTFLAG).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Time,
    Frequency,
}

impl Domain {
    pub fn from_ftflag(v: f32) -> Self {
        if v as i32 != 0 {
            Self::Frequency
        } else {
            Self::Time
        }
    }

    pub fn ftflag(self) -> f32 {
        match self {
            Self::Time => 0.0,
            Self::Frequency => 1.0,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Frequency => write!(f, "frequency"),
        }
    }
}

// ─── Sign Alternation (NDAQSIGN) ───────────────────────────────────────────

/// Sign adjustment needed before the Fourier transform.
///
/// The low bits select alternation, `+16` requests negation of imaginaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AqSign {
    None = 0,
    Sequential = 1,
    States = 2,
    NoneNeg = 16,
    SequentialNeg = 17,
    StatesNeg = 18,
}

impl AqSign {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Sequential),
            2 => Some(Self::States),
            16 => Some(Self::NoneNeg),
            17 => Some(Self::SequentialNeg),
            18 => Some(Self::StatesNeg),
            _ => None,
        }
    }

    /// Sign alternation of every other point.
    pub fn alternates(self) -> bool {
        matches!(
            self,
            Self::Sequential | Self::States | Self::SequentialNeg | Self::StatesNeg
        )
    }

    /// Negation of the imaginary part.
    pub fn negates_imag(self) -> bool {
        (self as i32) >= 16
    }

    /// Sequential codes describe real data, States codes describe complex data.
    pub fn accepts(self, data_type: DataType) -> bool {
        match self {
            Self::Sequential | Self::SequentialNeg => !data_type.is_complex(),
            Self::States | Self::StatesNeg => data_type.is_complex(),
            Self::None | Self::NoneNeg => true,
        }
    }
}

// ─── DMX Mode ───────────────────────────────────────────────────────────────

/// Digital filter (group delay) correction mode, stored in FDDMXFLAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum DmxMode {
    #[default]
    Auto = 0,
    On = 1,
    Off = -1,
}

impl DmxMode {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Auto),
            1 => Some(Self::On),
            -1 => Some(Self::Off),
            _ => None,
        }
    }
}

// ─── Apodization code (NDAPODCODE) ─────────────────────────────────────────

/// Window function recorded in the header after apodization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ApodCode {
    None = 0,
    Sp = 1,
    Em = 2,
    Gm = 3,
    Tm = 4,
    Ze = 5,
    Tri = 6,
}

impl ApodCode {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Sp),
            2 => Some(Self::Em),
            3 => Some(Self::Gm),
            4 => Some(Self::Tm),
            5 => Some(Self::Ze),
            6 => Some(Self::Tri),
            _ => None,
        }
    }
}

impl fmt::Display for ApodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Sp => write!(f, "SP"),
            Self::Em => write!(f, "EM"),
            Self::Gm => write!(f, "GM"),
            Self::Tm => write!(f, "TM"),
            Self::Ze => write!(f, "ZE"),
            Self::Tri => write!(f, "TRI"),
        }
    }
}

// ─── Dimension Codes ────────────────────────────────────────────────────────

/// Current axis identifiers (X=1, Y=2, Z=3, A=4).
///
/// Axis codes are relative to the current transposition state; the
/// physical dimension held by each axis is recorded in FDDIMORDER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum DimCode {
    X = 1,
    Y = 2,
    Z = 3,
    A = 4,
}

impl DimCode {
    pub const ALL: [DimCode; 4] = [Self::X, Self::Y, Self::Z, Self::A];

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Self::X),
            2 => Some(Self::Y),
            3 => Some(Self::Z),
            4 => Some(Self::A),
            _ => None,
        }
    }

    /// 1-based axis number.
    pub fn number(self) -> usize {
        self as usize
    }

    /// 0-based position in X, Y, Z, A order.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Returns the lowercase axis letter.
    pub fn axis_char_lower(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
            Self::A => 'a',
        }
    }

    /// Returns the uppercase axis letter.
    pub fn axis_char_upper(self) -> char {
        self.axis_char_lower().to_ascii_uppercase()
    }
}

impl fmt::Display for DimCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.axis_char_upper())
    }
}

// ─── Header validation ─────────────────────────────────────────────────────

/// Result of header validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrStatus {
    Ok,
    Swapped,
    Bad,
}

/// Byte order of a serialized header and the data that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    pub fn swapped(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqsign_flags() {
        assert!(!AqSign::None.alternates());
        assert!(AqSign::States.alternates());
        assert!(!AqSign::States.negates_imag());
        assert!(AqSign::NoneNeg.negates_imag());
        assert!(!AqSign::NoneNeg.alternates());
        assert!(AqSign::StatesNeg.alternates() && AqSign::StatesNeg.negates_imag());
    }

    #[test]
    fn aqsign_data_type_combinations() {
        assert!(AqSign::Sequential.accepts(DataType::Real));
        assert!(!AqSign::Sequential.accepts(DataType::Complex));
        assert!(AqSign::States.accepts(DataType::Hypercomplex));
        assert!(!AqSign::StatesNeg.accepts(DataType::Real));
        assert!(AqSign::NoneNeg.accepts(DataType::Real));
    }

    #[test]
    fn quad_flag_storage() {
        assert!(QuadFlag::Complex.is_complex());
        assert!(QuadFlag::Gradient.is_complex());
        assert!(!QuadFlag::PseudoQuad.is_complex());
        assert_eq!(QuadFlag::from_i32(7), None);
    }

    #[test]
    fn dim_code_letters() {
        assert_eq!(DimCode::Z.axis_char_upper(), 'Z');
        assert_eq!(DimCode::A.index(), 3);
        assert_eq!(DimCode::from_i32(0), None);
    }
}
