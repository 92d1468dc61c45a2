use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdherenceTier {
    None,
    Poor,
    BelowAverage,
    Good,
    VeryGood,
    Excellent,
}

/// A color assigned to one tier. `rgb` mirrors `hex` for terminal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorToken {
    pub hex: &'static str,
    #[serde(skip)]
    pub rgb: (u8, u8, u8),
}

impl AdherenceTier {
    pub const ALL: [AdherenceTier; 6] = [
        Self::None,
        Self::Poor,
        Self::BelowAverage,
        Self::Good,
        Self::VeryGood,
        Self::Excellent,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::None => "No activity recorded",
            Self::Poor => "Poor adherence",
            Self::BelowAverage => "Below average adherence",
            Self::Good => "Good adherence",
            Self::VeryGood => "Very good adherence",
            Self::Excellent => "Excellent adherence",
        }
    }

    pub fn color(self) -> ColorToken {
        let (hex, rgb) = match self {
            Self::None => ("#ebedf0", (235, 237, 240)),
            Self::Poor => ("#fecaca", (254, 202, 202)),
            Self::BelowAverage => ("#fde68a", (253, 230, 138)),
            Self::Good => ("#bbf7d0", (187, 247, 208)),
            Self::VeryGood => ("#4ade80", (74, 222, 128)),
            Self::Excellent => ("#15803d", (21, 128, 61)),
        };
        ColorToken { hex, rgb }
    }
}

impl fmt::Display for AdherenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Poor => write!(f, "poor"),
            Self::BelowAverage => write!(f, "belowAverage"),
            Self::Good => write!(f, "good"),
            Self::VeryGood => write!(f, "veryGood"),
            Self::Excellent => write!(f, "excellent"),
        }
    }
}

/// Buckets a daily score in [0, 5]. Upper bounds are inclusive; anything past 4
/// (including values above 5) is excellent.
pub fn tier_of(score: f64) -> AdherenceTier {
    match score {
        s if s == 0.0 => AdherenceTier::None,
        s if s <= 1.0 => AdherenceTier::Poor,
        s if s <= 2.0 => AdherenceTier::BelowAverage,
        s if s <= 3.0 => AdherenceTier::Good,
        s if s <= 4.0 => AdherenceTier::VeryGood,
        _ => AdherenceTier::Excellent,
    }
}

pub fn description_of(score: f64) -> &'static str {
    tier_of(score).description()
}

pub fn color_of(score: f64) -> ColorToken {
    tier_of(score).color()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade for an aggregate adherence percentage.
///
/// | percentage | grade |
/// |------------|-------|
/// | >= 90      | A+    |
/// | >= 80      | A     |
/// | >= 70      | B+    |
/// | >= 60      | B     |
/// | >= 50      | C     |
/// | otherwise  | D     |
///
/// Input is not clamped: anything above 100 is A+, anything below 50 (negatives
/// included) is D.
pub fn grade_of(percentage: f64) -> Grade {
    match percentage {
        p if p >= 90.0 => Grade::APlus,
        p if p >= 80.0 => Grade::A,
        p if p >= 70.0 => Grade::BPlus,
        p if p >= 60.0 => Grade::B,
        p if p >= 50.0 => Grade::C,
        _ => Grade::D,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tiers_follow_inclusive_upper_bounds() {
        assert_eq!(tier_of(0.0), AdherenceTier::None);
        assert_eq!(tier_of(0.1), AdherenceTier::Poor);
        assert_eq!(tier_of(1.0), AdherenceTier::Poor);
        assert_eq!(tier_of(1.5), AdherenceTier::BelowAverage);
        assert_eq!(tier_of(2.0), AdherenceTier::BelowAverage);
        assert_eq!(tier_of(2.5), AdherenceTier::Good);
        assert_eq!(tier_of(3.0), AdherenceTier::Good);
        assert_eq!(tier_of(4.0), AdherenceTier::VeryGood);
        assert_eq!(tier_of(4.01), AdherenceTier::Excellent);
        assert_eq!(tier_of(5.0), AdherenceTier::Excellent);
    }

    #[test]
    fn description_and_color_agree_with_tier_on_boundaries() {
        for score in [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0] {
            let tier = tier_of(score);
            assert_eq!(description_of(score), tier.description());
            assert_eq!(color_of(score), tier.color());
        }
    }

    #[test]
    fn every_tier_has_a_distinct_color_and_description() {
        for (i, a) in AdherenceTier::ALL.iter().enumerate() {
            assert_eq!(a.ordinal() as usize, i);
            for b in &AdherenceTier::ALL[i + 1..] {
                assert_ne!(a.color().hex, b.color().hex);
                assert_ne!(a.description(), b.description());
            }
        }
    }

    #[test]
    fn grades_match_reference_cases() {
        assert_eq!(grade_of(95.0), Grade::APlus);
        assert_eq!(grade_of(90.0), Grade::APlus);
        assert_eq!(grade_of(85.0), Grade::A);
        assert_eq!(grade_of(72.0), Grade::BPlus);
        assert_eq!(grade_of(61.0), Grade::B);
        assert_eq!(grade_of(50.0), Grade::C);
        assert_eq!(grade_of(49.9), Grade::D);
        assert_eq!(grade_of(0.0), Grade::D);
    }

    #[test]
    fn out_of_range_percentages_fall_through() {
        assert_eq!(grade_of(140.0), Grade::APlus);
        assert_eq!(grade_of(-12.0), Grade::D);
        assert_eq!(grade_of(95.0).to_string(), "A+");
        assert_eq!(grade_of(72.0).to_string(), "B+");
    }

    proptest! {
        #[test]
        fn grade_never_rises_as_percentage_drops(a in -20.0f64..120.0, b in -20.0f64..120.0) {
            let (high, low) = if a >= b { (a, b) } else { (b, a) };
            prop_assert!(grade_of(high) >= grade_of(low));
        }

        #[test]
        fn tier_never_drops_as_score_rises(a in 0.0f64..=5.0, b in 0.0f64..=5.0) {
            let (high, low) = if a >= b { (a, b) } else { (b, a) };
            prop_assert!(tier_of(high) >= tier_of(low));
            prop_assert_eq!(description_of(a), tier_of(a).description());
            prop_assert_eq!(color_of(a), tier_of(a).color());
        }
    }
}
