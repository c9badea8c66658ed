/// Genotype class of one sample at one variant, using the store's integer codes.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeCode {
    Unknown = -1,
    HomRef = 0,
    Het = 1,
    HomAlt = 2,
}

impl GenotypeCode {
    /// Raw code the store uses for a no-call.
    pub const UNKNOWN_CODE: i8 = GenotypeCode::Unknown as i8;

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(GenotypeCode::Unknown),
            0 => Some(GenotypeCode::HomRef),
            1 => Some(GenotypeCode::Het),
            2 => Some(GenotypeCode::HomAlt),
            _ => None,
        }
    }

    pub fn code(self) -> i8 {
        self as i8
    }
}

pub struct Site {
    pub variant_id: i64,
    pub genotypes: Vec<GenotypeCode>,
}
