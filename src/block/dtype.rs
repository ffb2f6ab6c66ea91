/// Per-element data type of a block.
///
/// Non-generic types carry a fixed per-element byte size (see
/// [`DataType::fixed_element_size`]); `Generic` and `Meta` leave sizing to
/// the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DataType {
    Generic = 0,
    Meta = 1,
    Float = 2,
    Float3 = 3,
    Int = 4,
    Int3 = 5,
    Mat3 = 6,
    Mat4 = 7,
    Ref = 8,
    TRef = 9,
}

impl DataType {
    pub const NUM_DTYPES: usize = 10;

    /// The fixed per-element byte size for non-generic data types, per the
    /// persisted-layout size table. `None` for `Generic`/`Meta`, whose size
    /// is supplied by the caller at template construction.
    pub fn fixed_element_size(self) -> Option<u32> {
        use DataType::*;
        match self {
            Generic | Meta => None,
            Float => Some(4),
            Float3 => Some(12),
            Int => Some(4),
            Int3 => Some(12),
            Mat3 => Some(36),
            Mat4 => Some(64),
            Ref => Some(4),
            TRef => Some(4 + 64),
        }
    }

    pub(crate) fn from_u8(v: u8) -> Option<DataType> {
        use DataType::*;
        Some(match v {
            0 => Generic,
            1 => Meta,
            2 => Float,
            3 => Float3,
            4 => Int,
            5 => Int3,
            6 => Mat3,
            7 => Mat4,
            8 => Ref,
            9 => TRef,
            _ => return None,
        })
    }
}
