//! Fixed-point ratio thresholds and bucket lookup tables for sprite orientation.
//!
//! All ratios are `(numerator << 16) / denominator` in unsigned 32-bit space.
//! A zero denominator yields [`RATIO_SENTINEL`], which lands in the last bucket
//! of every table. Threshold values are inclusive lower bounds and must stay
//! bit-exact: sprite selection, and therefore replays, depend on them.

/// Ratio reported when the denominator is zero.
pub const RATIO_SENTINEL: u32 = u32::MAX;

/// Compute `(numerator << 16) / denominator`, or the sentinel when dividing by zero.
pub fn fixed_point_ratio(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return RATIO_SENTINEL;
    }
    (((numerator as u64) << 16) / denominator as u64).min(RATIO_SENTINEL as u64) as u32
}

/// Number of thresholds in `thresholds` that `ratio` reaches.
pub fn bucket_of(ratio: u32, thresholds: &[u32]) -> usize {
    thresholds.partition_point(|&t| t <= ratio)
}

/// Pitch index added for a downward slope.
pub const PITCH_DOWN_OFFSET: usize = 5;

/// Slope ratios for regular track pieces.
pub const PITCH_NORMAL_THRESHOLDS: [u32; 2] = [3331, 9000];

/// Slope ratios for vehicles with steep-slope sprites.
/// The second boundary is strictly greater than 10064, hence 10065 here.
pub const PITCH_STEEP_THRESHOLDS: [u32; 4] = [3331, 10_064 + 1, 20500, 22000];

/// Thresholds and mirrored lookup table for one yaw resolution.
///
/// An index is composed as `bucket + (dx < 0) * (n + 1) + (dy < 0) * 2 * (n + 1)`
/// where `n` is the number of thresholds, then mapped through `index_to_yaw`.
#[derive(Debug, Clone, Copy)]
pub struct YawTable {
    pub thresholds: &'static [u32],
    pub index_to_yaw: &'static [u8],
}

impl YawTable {
    /// Index offset applied when dx is negative.
    pub const fn x_offset(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Index offset applied when dy is negative.
    pub const fn y_offset(&self) -> usize {
        2 * (self.thresholds.len() + 1)
    }
}

/// Four directions in the 0..=63 yaw scale.
pub const YAW_3BIT: YawTable = YawTable {
    thresholds: &[65536],
    index_to_yaw: &[16, 32, 16, 0, 48, 32, 48, 0],
};

/// Eight directions.
pub const YAW_4BIT: YawTable = YawTable {
    thresholds: &[27146, 158218],
    index_to_yaw: &[16, 24, 32, 16, 8, 0, 48, 40, 32, 48, 56, 0],
};

/// Eight directions with the wider diagonal used by aircraft.
pub const YAW_4BIT_PLANE: YawTable = YawTable {
    thresholds: &[3434, 1250501],
    index_to_yaw: &[16, 24, 32, 16, 8, 0, 48, 40, 32, 48, 56, 0],
};

/// Sixteen directions.
pub const YAW_5BIT: YawTable = YawTable {
    thresholds: &[13036, 43790, 98082, 329472],
    index_to_yaw: &[
        16, 20, 24, 28, 32, //
        16, 12, 8, 4, 0, //
        48, 44, 40, 36, 32, //
        48, 52, 56, 60, 0,
    ],
};

/// Thirty-two directions.
pub const YAW_6BIT: YawTable = YawTable {
    thresholds: &[6455, 19880, 35030, 53784, 79856, 122609, 216043, 665398],
    index_to_yaw: &[
        16, 18, 20, 22, 24, 26, 28, 30, 32, //
        16, 14, 12, 10, 8, 6, 4, 2, 0, //
        48, 46, 44, 42, 40, 38, 36, 34, 32, //
        48, 50, 52, 54, 56, 58, 60, 62, 0,
    ],
};

/// Sixty-four directions.
pub const YAW_7BIT: YawTable = YawTable {
    thresholds: &[
        3220, 9721, 16416, 23449, 30996, 39281, 48605, 59398, 72308, 88365, 109340, 138564,
        183161, 261634, 441808, 1334016,
    ],
    index_to_yaw: &[
        16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, //
        16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, //
        48, 47, 46, 45, 44, 43, 42, 41, 40, 39, 38, 37, 36, 35, 34, 33, 32, //
        48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 0,
    ],
};
