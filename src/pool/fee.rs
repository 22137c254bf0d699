use crate::error::PoolError;

/// Fee tiers in hundredths of a basis point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[repr(u32)]
pub enum FeeAmount {
    Lowest = 100,
    Low200 = 200,
    Low300 = 300,
    Low400 = 400,
    Low = 500,
    Medium = 3000,
    High = 10000,
}

impl FeeAmount {
    pub const ALL: [FeeAmount; 7] = [
        Self::Lowest,
        Self::Low200,
        Self::Low300,
        Self::Low400,
        Self::Low,
        Self::Medium,
        Self::High,
    ];

    #[inline]
    pub const fn pips(self) -> u32 {
        self as u32
    }

    /// Distance between initializable ticks for this tier.
    #[inline]
    pub const fn tick_spacing(self) -> i32 {
        match self {
            Self::Lowest => 1,
            Self::Low200 => 4,
            Self::Low300 => 6,
            Self::Low400 => 8,
            Self::Low => 10,
            Self::Medium => 60,
            Self::High => 200,
        }
    }

    /// Bitmap words to prefetch on each side of the current tick.
    #[inline]
    pub const fn scan_words(self) -> u16 {
        match self {
            Self::Lowest => 4,
            Self::Low200 | Self::Low300 | Self::Low400 | Self::Low => 2,
            Self::Medium | Self::High => 1,
        }
    }
}

impl TryFrom<u32> for FeeAmount {
    type Error = PoolError;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.pips() == fee)
            .ok_or(PoolError::UnsupportedFeeTier(fee))
    }
}

impl From<FeeAmount> for u32 {
    #[inline]
    fn from(fee: FeeAmount) -> Self {
        fee.pips()
    }
}
