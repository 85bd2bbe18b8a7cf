use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::StoreError;

/// Fixed-width encoding of a single matrix cell.
///
/// Values are stored as little-endian IEEE-754 floats.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub enum CellType {
    /// 4-byte `f32` cells.
    Float32,
    /// 8-byte `f64` cells.
    #[default]
    Float64,
}

impl CellType {
    /// Number of bytes occupied by one cell.
    pub const fn byte_width(&self) -> usize {
        match self {
            CellType::Float32 => 4,
            CellType::Float64 => 8,
        }
    }

    /// Returns the cell type with the given byte width, if one exists.
    pub fn from_byte_width(width: usize) -> Option<Self> {
        match width {
            4 => Some(CellType::Float32),
            8 => Some(CellType::Float64),
            _ => None,
        }
    }

    /// Encodes `value` into `buf`, which must be exactly
    /// [`byte_width`](Self::byte_width) bytes long.
    #[inline]
    pub fn encode(
        &self,
        value: f64,
        buf: &mut [u8],
    ) {
        match self {
            CellType::Float32 => buf.copy_from_slice(&(value as f32).to_le_bytes()),
            CellType::Float64 => buf.copy_from_slice(&value.to_le_bytes()),
        }
    }

    /// Decodes one cell from `buf`, which must be exactly
    /// [`byte_width`](Self::byte_width) bytes long.
    #[inline]
    pub fn decode(
        &self,
        buf: &[u8],
    ) -> f64 {
        match self {
            CellType::Float32 => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(buf);
                f32::from_le_bytes(raw) as f64
            },
            CellType::Float64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(buf);
                f64::from_le_bytes(raw)
            },
        }
    }
}

impl Display for CellType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            CellType::Float32 => write!(f, "f32"),
            CellType::Float64 => write!(f, "f64"),
        }
    }
}

/// Bit pattern held by cells that were never written by a fill.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub enum Sentinel {
    /// Quiet NaN in the store's cell type.
    #[default]
    NaN,
    /// All-zero bytes, i.e. `0.0`.
    Zero,
}

impl Sentinel {
    pub fn value(&self) -> f64 {
        match self {
            Sentinel::NaN => f64::NAN,
            Sentinel::Zero => 0.0,
        }
    }

    /// Whether a decoded value carries this sentinel's bit pattern.
    pub fn matches(
        &self,
        value: f64,
    ) -> bool {
        match self {
            Sentinel::NaN => value.is_nan(),
            Sentinel::Zero => value == 0.0 && value.is_sign_positive(),
        }
    }
}

impl Display for Sentinel {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Sentinel::NaN => write!(f, "nan"),
            Sentinel::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for Sentinel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nan" | "na" => Ok(Sentinel::NaN),
            "zero" | "0" => Ok(Sentinel::Zero),
            other => Err(format!("unknown sentinel '{}'", other)),
        }
    }
}

/// Illumina methylation array designs with a canonical probe catalog.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    /// Infinium HumanMethylation27.
    Hm27,
    /// Infinium HumanMethylation450.
    Hm450,
    /// Infinium MethylationEPIC.
    Epic,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Hm27, Platform::Hm450, Platform::Epic];

    /// Annotation package name conventionally used for the design.
    pub fn array_name(&self) -> &'static str {
        match self {
            Platform::Hm27 => "IlluminaHumanMethylation27k",
            Platform::Hm450 => "IlluminaHumanMethylation450k",
            Platform::Epic => "IlluminaHumanMethylationEPIC",
        }
    }
}

impl Display for Platform {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Platform::Hm27 => write!(f, "27k"),
            Platform::Hm450 => write!(f, "450k"),
            Platform::Epic => write!(f, "EPIC"),
        }
    }
}

impl FromStr for Platform {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let tag = normalized
            .strip_prefix("illuminahumanmethylation")
            .unwrap_or(&normalized);
        match tag {
            "27" | "27k" | "hm27" => Ok(Platform::Hm27),
            "450" | "450k" | "hm450" => Ok(Platform::Hm450),
            "epic" | "850k" | "hmepic" => Ok(Platform::Epic),
            _ => Err(StoreError::UnknownPlatform(s.to_string())),
        }
    }
}

/// What fill does with probe identifiers that are not in the store.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default)]
pub enum UnknownProbePolicy {
    /// Skip them and report the count.
    #[default]
    Ignore,
    /// Fail the call before any byte is written.
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_type_width() {
        assert_eq!(CellType::Float32.byte_width(), 4);
        assert_eq!(CellType::Float64.byte_width(), 8);
        assert_eq!(CellType::from_byte_width(8), Some(CellType::Float64));
        assert_eq!(CellType::from_byte_width(4), Some(CellType::Float32));
        assert_eq!(CellType::from_byte_width(2), None);
    }

    #[test]
    fn test_cell_type_codec() {
        let mut buf = [0u8; 8];
        CellType::Float64.encode(0.123456789, &mut buf);
        assert_eq!(CellType::Float64.decode(&buf), 0.123456789);

        let mut buf = [0u8; 4];
        CellType::Float32.encode(0.5, &mut buf);
        assert_eq!(CellType::Float32.decode(&buf), 0.5);
        assert_eq!(buf, 0.5f32.to_le_bytes());
    }

    #[test]
    fn test_sentinel_matches() {
        assert!(Sentinel::NaN.matches(f64::NAN));
        assert!(!Sentinel::NaN.matches(0.0));
        assert!(Sentinel::Zero.matches(0.0));
        assert!(!Sentinel::Zero.matches(0.25));
        assert!(Sentinel::NaN.value().is_nan());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!(Platform::from_str("450k").unwrap(), Platform::Hm450);
        assert_eq!(Platform::from_str("EPIC").unwrap(), Platform::Epic);
        assert_eq!(
            Platform::from_str("IlluminaHumanMethylation27k").unwrap(),
            Platform::Hm27
        );
        for platform in Platform::ALL {
            assert_eq!(Platform::from_str(platform.array_name()).unwrap(), platform);
            assert_eq!(Platform::from_str(&platform.to_string()).unwrap(), platform);
        }
        assert!(matches!(
            Platform::from_str("hiseq"),
            Err(StoreError::UnknownPlatform(tag)) if tag == "hiseq"
        ));
    }
}
