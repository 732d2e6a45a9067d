//! NMRPipe FDATA header: 512 four-byte slots describing a spectrum.
//!
//! The header is 2048 bytes. Each slot is either numeric or one quarter of a
//! packed text field (see [`crate::text`]). Parsing detects the byte order
//! from FDFLTORDER, converts numeric slots to native values, and keeps text
//! slots as raw bytes; serializing writes back in the remembered order.

use crate::enums::*;
use crate::error::HeaderError;
use crate::text::{self, TextField};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Number of 4-byte float values in the FDATA header.
pub const FDATA_SIZE: usize = 512;
/// Header size in bytes.
pub const FDATA_BYTES: usize = FDATA_SIZE * 4; // 2048
/// IEEE floating-point format constant.
pub const FD_IEEE_CONS: u32 = 0xEEEEEEEE;
/// VAX floating-point format constant.
pub const FD_VAX_CONS: u32 = 0x11111111;
/// Byte-order test constant.
pub const FD_ORDER_CONS: f32 = 2.345;
/// Equivalent for zero in some legacy contexts.
pub const ZERO_EQUIV: f32 = -666.0;
/// Maximum number of points in a given dimension (limited by f32 precision).
pub const MAX_NMR_SIZE: i32 = 16_777_216;

// ─── General parameter locations ────────────────────────────────────────────

pub const FDMAGIC: usize = 0;
pub const FDFLTFORMAT: usize = 1;
pub const FDFLTORDER: usize = 2;
pub const FDID: usize = 3;

pub const FDSIZE: usize = 99;
pub const FDREALSIZE: usize = 97;
pub const FDSPECNUM: usize = 219;
pub const FDQUADFLAG: usize = 106;
pub const FD2DPHASE: usize = 256;

// ─── Dimension order ────────────────────────────────────────────────────────

pub const FDTRANSPOSED: usize = 221;
pub const FDDIMCOUNT: usize = 9;
pub const FDDIMORDER: usize = 24;
pub const FDDIMORDER1: usize = 24;
pub const FDDIMORDER2: usize = 25;
pub const FDDIMORDER3: usize = 26;
pub const FDDIMORDER4: usize = 27;

pub const FDNUSDIM: usize = 45;

// ─── Pipeline / stream parameters ──────────────────────────────────────────

pub const FDPIPEFLAG: usize = 57;
pub const FDCUBEFLAG: usize = 447;
pub const FDPIPECOUNT: usize = 75;
pub const FDSLICECOUNT0: usize = 443;
pub const FDSLICECOUNT1: usize = 446;
pub const FDFILECOUNT: usize = 442;

pub const FDTHREADCOUNT: usize = 444;
pub const FDTHREADID: usize = 445;

pub const FDFIRSTPLANE: usize = 77;
pub const FDLASTPLANE: usize = 78;
pub const FDPARTITION: usize = 65;

pub const FDPLANELOC: usize = 14;

// ─── Min/Max ────────────────────────────────────────────────────────────────

pub const FDMAX: usize = 247;
pub const FDMIN: usize = 248;
pub const FDSCALEFLAG: usize = 250;
pub const FDDISPMAX: usize = 251;
pub const FDDISPMIN: usize = 252;
pub const FDPTHRESH: usize = 253;
pub const FDNTHRESH: usize = 254;

// ─── User ───────────────────────────────────────────────────────────────────

pub const FDUSER1: usize = 70;
pub const FDUSER2: usize = 71;
pub const FDUSER3: usize = 72;
pub const FDUSER4: usize = 73;
pub const FDUSER5: usize = 74;
pub const FDUSER6: usize = 76;

// ─── Footer / block locations ───────────────────────────────────────────────

pub const FDLASTBLOCK: usize = 359;
pub const FDCONTBLOCK: usize = 360;
pub const FDBASEBLOCK: usize = 361;
pub const FDPEAKBLOCK: usize = 362;
pub const FDBMAPBLOCK: usize = 363;
pub const FDHISTBLOCK: usize = 364;
pub const FD1DBLOCK: usize = 365;

// ─── Date/time ──────────────────────────────────────────────────────────────

pub const FDMONTH: usize = 294;
pub const FDDAY: usize = 295;
pub const FDYEAR: usize = 296;
pub const FDHOURS: usize = 283;
pub const FDMINS: usize = 284;
pub const FDSECS: usize = 285;

// ─── Miscellaneous ──────────────────────────────────────────────────────────

pub const FDMCFLAG: usize = 135;
pub const FDNOISE: usize = 153;
pub const FDRANK: usize = 180;
pub const FDTEMPERATURE: usize = 157;
pub const FDPRESSURE: usize = 158;
pub const FD2DVIRGIN: usize = 399;
pub const FDTAU: usize = 199;
pub const FDDOMINFO: usize = 266;
pub const FDMETHINFO: usize = 267;

pub const FDSCALE: usize = 478;
pub const FDSCORE: usize = 370;
pub const FDSCANS: usize = 371;

pub const FDSRCNAME: usize = 286;
pub const FDUSERNAME: usize = 290;
pub const FDOPERNAME: usize = 464;
pub const FDTITLE: usize = 297;
pub const FDCOMMENT: usize = 312;

// ─── DMX ────────────────────────────────────────────────────────────────────

pub const FDDMXVAL: usize = 40;
pub const FDDMXFLAG: usize = 41;
pub const FDDELTATR: usize = 42;

// ─── F2 (dimension 2, often direct detect / X-axis) ─────────────────────────

pub const FDF2LABEL: usize = 16;
pub const FDF2APOD: usize = 95;
pub const FDF2SW: usize = 100;
pub const FDF2OBS: usize = 119;
pub const FDF2OBSMID: usize = 378;
pub const FDF2ORIG: usize = 101;
pub const FDF2UNITS: usize = 152;
pub const FDF2QUADFLAG: usize = 56;
pub const FDF2FTFLAG: usize = 220;
pub const FDF2AQSIGN: usize = 64;
pub const FDF2CAR: usize = 66;
pub const FDF2CENTER: usize = 79;
pub const FDF2OFFPPM: usize = 480;
pub const FDF2P0: usize = 109;
pub const FDF2P1: usize = 110;
pub const FDF2APODCODE: usize = 413;
pub const FDF2APODQ1: usize = 415;
pub const FDF2APODQ2: usize = 416;
pub const FDF2APODQ3: usize = 417;
pub const FDF2LB: usize = 111;
pub const FDF2GB: usize = 374;
pub const FDF2GOFF: usize = 382;
pub const FDF2C1: usize = 418;
pub const FDF2APODDF: usize = 419;
pub const FDF2ZF: usize = 108;
pub const FDF2X1: usize = 257;
pub const FDF2XN: usize = 258;
pub const FDF2FTSIZE: usize = 96;
pub const FDF2TDSIZE: usize = 386;

// ─── F1 (dimension 1, first indirect / Y-axis) ─────────────────────────────

pub const FDF1LABEL: usize = 18;
pub const FDF1APOD: usize = 428;
pub const FDF1SW: usize = 229;
pub const FDF1OBS: usize = 218;
pub const FDF1OBSMID: usize = 379;
pub const FDF1ORIG: usize = 249;
pub const FDF1UNITS: usize = 234;
pub const FDF1FTFLAG: usize = 222;
pub const FDF1AQSIGN: usize = 475;
pub const FDF1QUADFLAG: usize = 55;
pub const FDF1CAR: usize = 67;
pub const FDF1CENTER: usize = 80;
pub const FDF1OFFPPM: usize = 481;
pub const FDF1P0: usize = 245;
pub const FDF1P1: usize = 246;
pub const FDF1APODCODE: usize = 414;
pub const FDF1APODQ1: usize = 420;
pub const FDF1APODQ2: usize = 421;
pub const FDF1APODQ3: usize = 422;
pub const FDF1LB: usize = 243;
pub const FDF1GB: usize = 375;
pub const FDF1GOFF: usize = 383;
pub const FDF1C1: usize = 423;
pub const FDF1ZF: usize = 437;
pub const FDF1X1: usize = 259;
pub const FDF1XN: usize = 260;
pub const FDF1FTSIZE: usize = 98;
pub const FDF1TDSIZE: usize = 387;

// ─── F3 (Z-axis) ───────────────────────────────────────────────────────────

pub const FDF3LABEL: usize = 20;
pub const FDF3APOD: usize = 50;
pub const FDF3OBS: usize = 10;
pub const FDF3OBSMID: usize = 380;
pub const FDF3SW: usize = 11;
pub const FDF3ORIG: usize = 12;
pub const FDF3FTFLAG: usize = 13;
pub const FDF3AQSIGN: usize = 476;
pub const FDF3SIZE: usize = 15;
pub const FDF3QUADFLAG: usize = 51;
pub const FDF3UNITS: usize = 58;
pub const FDF3P0: usize = 60;
pub const FDF3P1: usize = 61;
pub const FDF3CAR: usize = 68;
pub const FDF3CENTER: usize = 81;
pub const FDF3OFFPPM: usize = 482;
pub const FDF3APODCODE: usize = 400;
pub const FDF3APODQ1: usize = 401;
pub const FDF3APODQ2: usize = 402;
pub const FDF3APODQ3: usize = 403;
pub const FDF3LB: usize = 372;
pub const FDF3GB: usize = 376;
pub const FDF3GOFF: usize = 384;
pub const FDF3C1: usize = 404;
pub const FDF3ZF: usize = 438;
pub const FDF3X1: usize = 261;
pub const FDF3XN: usize = 262;
pub const FDF3FTSIZE: usize = 200;
pub const FDF3TDSIZE: usize = 388;

// ─── F4 (A-axis) ───────────────────────────────────────────────────────────

pub const FDF4LABEL: usize = 22;
pub const FDF4APOD: usize = 53;
pub const FDF4OBS: usize = 28;
pub const FDF4OBSMID: usize = 381;
pub const FDF4SW: usize = 29;
pub const FDF4ORIG: usize = 30;
pub const FDF4FTFLAG: usize = 31;
pub const FDF4AQSIGN: usize = 477;
pub const FDF4SIZE: usize = 32;
pub const FDF4QUADFLAG: usize = 54;
pub const FDF4UNITS: usize = 59;
pub const FDF4P0: usize = 62;
pub const FDF4P1: usize = 63;
pub const FDF4CAR: usize = 69;
pub const FDF4CENTER: usize = 82;
pub const FDF4OFFPPM: usize = 483;
pub const FDF4APODCODE: usize = 405;
pub const FDF4APODQ1: usize = 406;
pub const FDF4APODQ2: usize = 407;
pub const FDF4APODQ3: usize = 408;
pub const FDF4LB: usize = 373;
pub const FDF4GB: usize = 377;
pub const FDF4GOFF: usize = 385;
pub const FDF4C1: usize = 409;
pub const FDF4ZF: usize = 439;
pub const FDF4X1: usize = 263;
pub const FDF4XN: usize = 264;
pub const FDF4FTSIZE: usize = 201;
pub const FDF4TDSIZE: usize = 389;

// ─── Label sizes ────────────────────────────────────────────────────────────

pub const SIZE_NDLABEL: usize = 8;
pub const SIZE_F2LABEL: usize = 8;
pub const SIZE_F1LABEL: usize = 8;
pub const SIZE_F3LABEL: usize = 8;
pub const SIZE_F4LABEL: usize = 8;
pub const SIZE_SRCNAME: usize = 16;
pub const SIZE_USERNAME: usize = 16;
pub const SIZE_OPERNAME: usize = 32;
pub const SIZE_COMMENT: usize = 160;
pub const SIZE_TITLE: usize = 60;

// ─── FDATA structure ────────────────────────────────────────────────────────

/// One header slot: a number, or four bytes of packed text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Num(f32),
    Text([u8; 4]),
}

impl Slot {
    fn blank(loc: usize) -> Self {
        if text::is_text_slot(loc) {
            Slot::Text([0; 4])
        } else {
            Slot::Num(0.0)
        }
    }
}

/// The FDATA header.
///
/// Numeric slots hold native values regardless of the byte order the header
/// was read in; `endian` records that order for serialization.
#[derive(Clone, PartialEq)]
pub struct Fdata {
    slots: [Slot; FDATA_SIZE],
    endian: Endian,
}

impl Default for Fdata {
    fn default() -> Self {
        Self::new()
    }
}

impl Fdata {
    /// Create a zeroed FDATA header in native byte order.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(Slot::blank),
            endian: Endian::NATIVE,
        }
    }

    /// Initialize with NMRPipe defaults (float format, byte order, dimension order 2 1 3 4).
    pub fn init_default(&mut self) {
        self.slots = std::array::from_fn(Slot::blank);
        // (float)FD_IEEE_CONS is an integer-to-float numeric conversion
        self.set(FDFLTFORMAT, FD_IEEE_CONS as f32);
        self.set(FDFLTORDER, FD_ORDER_CONS);
        self.set(FDDIMORDER1, 2.0);
        self.set(FDDIMORDER2, 1.0);
        self.set(FDDIMORDER3, 3.0);
        self.set(FDDIMORDER4, 4.0);
        self.set(FD2DVIRGIN, 1.0);
        self.set(FDDIMCOUNT, 1.0);
        for loc in [FDSPECNUM, FDF3SIZE, FDF4SIZE] {
            self.set(loc, 1.0);
        }
    }

    pub fn slot(&self, loc: usize) -> Slot {
        self.slots[loc]
    }

    /// Numeric value at a slot. Text slots read as zero.
    pub fn get(&self, loc: usize) -> f32 {
        match self.slots.get(loc) {
            Some(Slot::Num(v)) => *v,
            _ => 0.0,
        }
    }

    pub fn get_i(&self, loc: usize) -> i32 {
        self.get(loc) as i32
    }

    /// Set a numeric slot. Writes to text slots are ignored.
    pub fn set(&mut self, loc: usize, value: f32) {
        match self.slots.get_mut(loc) {
            Some(Slot::Text(_)) => {
                log::warn!("ignoring numeric write of {value} to text slot {loc}");
            }
            Some(slot) => *slot = Slot::Num(value),
            None => log::warn!("ignoring write to slot {loc} beyond the header"),
        }
    }

    /// Read a packed text field.
    pub fn text(&self, field: &TextField) -> String {
        let raw: Vec<[u8; 4]> = self.slots[field.loc..field.loc + field.slots()]
            .iter()
            .map(|s| match s {
                Slot::Text(b) => *b,
                Slot::Num(v) => v.to_ne_bytes(),
            })
            .collect();
        text::unpack(&raw, field.bytes)
    }

    /// Write a packed text field, truncating to its capacity.
    pub fn set_text(&mut self, field: &TextField, value: &str) {
        for (i, b) in text::pack(value, field.bytes, field.slots())
            .into_iter()
            .enumerate()
        {
            self.slots[field.loc + i] = Slot::Text(b);
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Choose the byte order used by [`Fdata::to_bytes`] and for the data.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Get dimension count.
    pub fn dim_count(&self) -> i32 {
        self.get_i(FDDIMCOUNT)
    }

    /// Set dimension count.
    pub fn set_dim_count(&mut self, n: i32) {
        self.set(FDDIMCOUNT, n as f32);
    }

    // ─── Header I/O ─────────────────────────────────────────────────────

    /// Detect the byte order of a raw header from its FDFLTORDER slot.
    pub fn detect_endian(buf: &[u8]) -> Result<Endian, HeaderError> {
        if buf.len() < FDATA_BYTES {
            return Err(HeaderError::Truncated {
                expected: FDATA_BYTES,
                got: buf.len(),
            });
        }
        let raw = &buf[FDFLTORDER * 4..FDFLTORDER * 4 + 4];
        if is_order_cons(LittleEndian::read_f32(raw)) {
            Ok(Endian::Little)
        } else if is_order_cons(BigEndian::read_f32(raw)) {
            Ok(Endian::Big)
        } else {
            let found = read_f32(raw, Endian::NATIVE);
            Err(HeaderError::InvalidHeader {
                offset: FDFLTORDER,
                expected: FD_ORDER_CONS,
                found,
                found_bits: found.to_bits(),
            })
        }
    }

    /// Parse 2048 header bytes, auto-detecting byte order.
    pub fn parse(buf: &[u8]) -> Result<(Self, HdrStatus), HeaderError> {
        let endian = Self::detect_endian(buf)?;
        let slots = std::array::from_fn(|loc| {
            let raw = &buf[loc * 4..loc * 4 + 4];
            if text::is_text_slot(loc) {
                Slot::Text([raw[0], raw[1], raw[2], raw[3]])
            } else {
                Slot::Num(read_f32(raw, endian))
            }
        });
        let status = if endian.is_native() {
            HdrStatus::Ok
        } else {
            HdrStatus::Swapped
        };
        Ok((Self { slots, endian }, status))
    }

    /// Serialize in the remembered byte order.
    pub fn to_bytes(&self) -> [u8; FDATA_BYTES] {
        self.to_bytes_with(self.endian)
    }

    /// Serialize in an explicit byte order. Text slots are written verbatim.
    pub fn to_bytes_with(&self, endian: Endian) -> [u8; FDATA_BYTES] {
        let mut buf = [0u8; FDATA_BYTES];
        for (loc, slot) in self.slots.iter().enumerate() {
            let dst = &mut buf[loc * 4..loc * 4 + 4];
            match slot {
                Slot::Num(v) => write_f32(dst, *v, endian),
                Slot::Text(b) => dst.copy_from_slice(b),
            }
        }
        buf
    }

    /// Bring a raw header buffer to native byte order in place.
    ///
    /// Numeric slots are swapped, text slots are left alone. A buffer that
    /// is already native reports `Ok` and is not touched, so repeating the
    /// call is a no-op.
    pub fn normalize_bytes(buf: &mut [u8]) -> Result<HdrStatus, HeaderError> {
        if Self::detect_endian(buf)?.is_native() {
            return Ok(HdrStatus::Ok);
        }
        for loc in (0..FDATA_SIZE).filter(|&loc| !text::is_text_slot(loc)) {
            buf[loc * 4..loc * 4 + 4].reverse();
        }
        Ok(HdrStatus::Swapped)
    }

    /// Test if this is a valid FDATA header.
    pub fn test_header(&self) -> HdrStatus {
        if is_order_cons(self.get(FDFLTORDER)) {
            HdrStatus::Ok
        } else {
            HdrStatus::Bad
        }
    }

    /// Repair missing dimension order, dimension count and format constants.
    pub fn fixfdata(&mut self) {
        for (loc, default) in [
            (FDDIMORDER1, 2.0),
            (FDDIMORDER2, 1.0),
            (FDDIMORDER3, 3.0),
            (FDDIMORDER4, 4.0),
        ] {
            if self.get(loc) == 0.0 {
                self.set(loc, default);
            }
        }
        if self.get(FDDIMCOUNT) < 1.0 {
            self.set(FDDIMCOUNT, 1.0);
        }
        self.set(FDFLTFORMAT, FD_IEEE_CONS as f32);
        self.set(FDFLTORDER, FD_ORDER_CONS);
    }
}

fn is_order_cons(v: f32) -> bool {
    (v - FD_ORDER_CONS).abs() < 0.001
}

fn read_f32(raw: &[u8], endian: Endian) -> f32 {
    match endian {
        Endian::Little => LittleEndian::read_f32(raw),
        Endian::Big => BigEndian::read_f32(raw),
    }
}

fn write_f32(dst: &mut [u8], v: f32, endian: Endian) {
    match endian {
        Endian::Little => LittleEndian::write_f32(dst, v),
        Endian::Big => BigEndian::write_f32(dst, v),
    }
}

impl fmt::Debug for Fdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fdata")
            .field("endian", &self.endian)
            .field("dim_count", &self.dim_count())
            .field(
                "dim_order",
                &[
                    self.get_i(FDDIMORDER1),
                    self.get_i(FDDIMORDER2),
                    self.get_i(FDDIMORDER3),
                    self.get_i(FDDIMORDER4),
                ],
            )
            .field("x_size", &self.get(FDSIZE))
            .field("y_size", &self.get(FDSPECNUM))
            .field("z_size", &self.get(FDF3SIZE))
            .field("a_size", &self.get(FDF4SIZE))
            .finish()
    }
}

/// Compute the next power of 2 >= n.
pub fn next_power2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_header() -> Fdata {
        let mut fd = Fdata::new();
        fd.init_default();
        fd.set_dim_count(2);
        fd.set(FDSIZE, 640.0);
        fd.set(FDSPECNUM, 368.0);
        fd.set(FDF2SW, 8012.821);
        fd.set(FDF2OBS, 500.13);
        fd.set_text(&text::TITLE, "hsqc test");
        fd.set_text(&text::F2LABEL, "HN");
        fd.set_text(&text::COMMENT, "synthetic");
        fd
    }

    #[test]
    fn test_new_header() {
        let mut fd = Fdata::new();
        fd.init_default();
        assert_eq!(fd.dim_count(), 1);
        assert_eq!(fd.get_i(FDDIMORDER1), 2);
        assert_eq!(fd.get_i(FDDIMORDER2), 1);
        assert_eq!(fd.test_header(), HdrStatus::Ok);
    }

    #[test]
    fn test_next_power2() {
        assert_eq!(next_power2(0), 1);
        assert_eq!(next_power2(3), 4);
        assert_eq!(next_power2(1024), 1024);
        assert_eq!(next_power2(1025), 2048);
    }

    #[test]
    fn test_roundtrip_both_orders() {
        let fd = sample_header();
        for endian in [Endian::Little, Endian::Big] {
            let bytes = fd.to_bytes_with(endian);
            let (parsed, status) = Fdata::parse(&bytes).unwrap();
            assert_eq!(parsed.endian(), endian);
            let expected = if endian.is_native() {
                HdrStatus::Ok
            } else {
                HdrStatus::Swapped
            };
            assert_eq!(status, expected);
            assert_eq!(parsed.to_bytes()[..], bytes[..]);
            assert_eq!(parsed.text(&text::TITLE), "hsqc test");
            assert_eq!(parsed.text(&text::F2LABEL), "HN");
            assert!((parsed.get(FDF2SW) - 8012.821).abs() < 1e-3);
        }
    }

    #[test]
    fn text_bytes_are_not_swapped() {
        let fd = sample_header();
        let le = fd.to_bytes_with(Endian::Little);
        let be = fd.to_bytes_with(Endian::Big);
        let title = FDTITLE * 4..FDTITLE * 4 + 9;
        assert_eq!(&le[title.clone()], b"hsqc test");
        assert_eq!(&be[title], b"hsqc test");
        assert_ne!(le[FDSIZE * 4..FDSIZE * 4 + 4], be[FDSIZE * 4..FDSIZE * 4 + 4]);
    }

    #[test]
    fn invalid_order_constant() {
        let mut bytes = sample_header().to_bytes();
        bytes[FDFLTORDER * 4..FDFLTORDER * 4 + 4].copy_from_slice(&1.0f32.to_ne_bytes());
        match Fdata::parse(&bytes) {
            Err(HeaderError::InvalidHeader {
                offset, expected, found, ..
            }) => {
                assert_eq!(offset, FDFLTORDER);
                assert_eq!(expected, FD_ORDER_CONS);
                assert_eq!(found, 1.0);
            }
            other => panic!("expected InvalidHeader, got {other:?}"),
        }
    }

    #[test]
    fn truncated_buffer() {
        let err = Fdata::parse(&[0u8; 100]).unwrap_err();
        assert_eq!(
            err,
            HeaderError::Truncated {
                expected: FDATA_BYTES,
                got: 100
            }
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let fd = sample_header();
        let mut buf = fd.to_bytes_with(Endian::NATIVE.swapped());
        assert_eq!(Fdata::normalize_bytes(&mut buf).unwrap(), HdrStatus::Swapped);
        let once = buf;
        assert_eq!(Fdata::normalize_bytes(&mut buf).unwrap(), HdrStatus::Ok);
        assert_eq!(buf, once);
        assert_eq!(buf, fd.to_bytes_with(Endian::NATIVE));
    }

    #[test]
    fn numeric_write_to_text_slot_is_ignored() {
        let mut fd = sample_header();
        fd.set(FDTITLE, 12.0);
        assert_eq!(fd.text(&text::TITLE), "hsqc test");
        assert_eq!(fd.get(FDTITLE), 0.0);
    }

    #[test]
    fn fixfdata_restores_defaults() {
        let mut fd = Fdata::new();
        fd.fixfdata();
        assert_eq!(fd.get_i(FDDIMORDER1), 2);
        assert_eq!(fd.get_i(FDDIMORDER4), 4);
        assert_eq!(fd.dim_count(), 1);
        assert_eq!(fd.test_header(), HdrStatus::Ok);
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_slots(
            words in proptest::collection::vec(any::<u32>(), FDATA_SIZE),
            big in any::<bool>(),
        ) {
            let endian = if big { Endian::Big } else { Endian::Little };
            let mut bytes = [0u8; FDATA_BYTES];
            for (loc, w) in words.iter().enumerate() {
                let dst = &mut bytes[loc * 4..loc * 4 + 4];
                match endian {
                    Endian::Little => LittleEndian::write_u32(dst, *w),
                    Endian::Big => BigEndian::write_u32(dst, *w),
                }
            }
            write_f32(&mut bytes[FDFLTORDER * 4..FDFLTORDER * 4 + 4], FD_ORDER_CONS, endian);
            let (fd, _) = Fdata::parse(&bytes).unwrap();
            prop_assert_eq!(&fd.to_bytes()[..], &bytes[..]);
        }
    }
}
