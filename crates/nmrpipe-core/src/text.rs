//! Packed-text slots of the FDATA header.
//!
//! Text fields store 4 ASCII bytes per slot. Their raw bytes are kept
//! verbatim: they are never byte-swapped or interpreted as numbers.

use crate::fdata::*;

/// A contiguous run of header slots holding packed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub name: &'static str,
    /// First slot.
    pub loc: usize,
    /// Capacity in bytes.
    pub bytes: usize,
}

impl TextField {
    pub const fn new(name: &'static str, loc: usize, bytes: usize) -> Self {
        Self { name, loc, bytes }
    }

    pub const fn slots(&self) -> usize {
        (self.bytes + 3) / 4
    }

    pub const fn contains(&self, loc: usize) -> bool {
        loc >= self.loc && loc < self.loc + self.slots()
    }
}

pub const F2LABEL: TextField = TextField::new("FDF2LABEL", FDF2LABEL, SIZE_F2LABEL);
pub const F1LABEL: TextField = TextField::new("FDF1LABEL", FDF1LABEL, SIZE_F1LABEL);
pub const F3LABEL: TextField = TextField::new("FDF3LABEL", FDF3LABEL, SIZE_F3LABEL);
pub const F4LABEL: TextField = TextField::new("FDF4LABEL", FDF4LABEL, SIZE_F4LABEL);
pub const SRCNAME: TextField = TextField::new("FDSRCNAME", FDSRCNAME, SIZE_SRCNAME);
pub const USERNAME: TextField = TextField::new("FDUSERNAME", FDUSERNAME, SIZE_USERNAME);
pub const OPERNAME: TextField = TextField::new("FDOPERNAME", FDOPERNAME, SIZE_OPERNAME);
pub const TITLE: TextField = TextField::new("FDTITLE", FDTITLE, SIZE_TITLE);
pub const COMMENT: TextField = TextField::new("FDCOMMENT", FDCOMMENT, SIZE_COMMENT);

/// Every slot range of the header that is text rather than numeric.
pub const TEXT_FIELDS: [TextField; 9] = [
    F2LABEL, F1LABEL, F3LABEL, F4LABEL, SRCNAME, USERNAME, OPERNAME, TITLE, COMMENT,
];

/// The text field covering a slot, if any.
pub fn text_field_at(loc: usize) -> Option<&'static TextField> {
    TEXT_FIELDS.iter().find(|f| f.contains(loc))
}

pub fn is_text_slot(loc: usize) -> bool {
    text_field_at(loc).is_some()
}

/// Label field of a physical dimension (1-4).
pub fn label_field(phys_dim: usize) -> Option<TextField> {
    match phys_dim {
        2 => Some(F2LABEL),
        1 => Some(F1LABEL),
        3 => Some(F3LABEL),
        4 => Some(F4LABEL),
        _ => None,
    }
}

/// Pack text into `slots` slots, truncating to `max_bytes` and zero padding.
pub fn pack(text: &str, max_bytes: usize, slots: usize) -> Vec<[u8; 4]> {
    let src = text.as_bytes();
    let n = src.len().min(max_bytes).min(slots * 4);
    let mut bytes = vec![0u8; slots * 4];
    bytes[..n].copy_from_slice(&src[..n]);
    bytes
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect()
}

/// Unpack text up to the first NUL, trimming trailing whitespace.
pub fn unpack(slots: &[[u8; 4]], max_bytes: usize) -> String {
    let bytes: Vec<u8> = slots
        .iter()
        .flat_map(|s| s.iter().copied())
        .take(max_bytes)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).trim_end().to_string()
}
