// ABOUTME: Macro splitter deriving protein/carb/fat targets from a calorie total
// ABOUTME: Goal-based base split with activity shifts, converted to whole grams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::macros::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use pierre_core::models::{ActivityLevel, MacroBreakdown, MacroTarget, UserProfile};

/// Percentage points moved by an activity adjustment
const ACTIVITY_SHIFT_PCT: u8 = 5;

/// Share of calories per macronutrient.
///
/// The three percentages always sum to 100: the constructors only build the
/// base splits and the shifts move points from one macro to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroDistribution {
    protein_pct: u8,
    carbs_pct: u8,
    fat_pct: u8,
}

impl MacroDistribution {
    /// Deficit split: protein 35, carbs 35, fat 30
    pub const LOSS: Self = Self::new(35, 35, 30);
    /// Surplus or maintenance split: protein 30, carbs 45, fat 25
    pub const GAIN_OR_MAINTAIN: Self = Self::new(30, 45, 25);

    const fn new(protein_pct: u8, carbs_pct: u8, fat_pct: u8) -> Self {
        debug_assert!(
            protein_pct as u16 + carbs_pct as u16 + fat_pct as u16 == 100,
            "Macro percentages must sum to 100"
        );
        Self {
            protein_pct,
            carbs_pct,
            fat_pct,
        }
    }

    /// Base split for a goal with the activity shift applied:
    /// active/very active move 5 points fat to carbs, sedentary moves 5
    /// points carbs to protein
    #[must_use]
    pub const fn for_goal(is_loss: bool, level: ActivityLevel) -> Self {
        let base = if is_loss {
            Self::LOSS
        } else {
            Self::GAIN_OR_MAINTAIN
        };
        match level {
            ActivityLevel::Active | ActivityLevel::VeryActive => Self::new(
                base.protein_pct,
                base.carbs_pct + ACTIVITY_SHIFT_PCT,
                base.fat_pct - ACTIVITY_SHIFT_PCT,
            ),
            ActivityLevel::Sedentary => Self::new(
                base.protein_pct + ACTIVITY_SHIFT_PCT,
                base.carbs_pct - ACTIVITY_SHIFT_PCT,
                base.fat_pct,
            ),
            ActivityLevel::Light | ActivityLevel::Moderate => base,
        }
    }

    /// Get as a tuple (protein, carbs, fat)
    #[must_use]
    pub const fn as_tuple(&self) -> (u8, u8, u8) {
        (self.protein_pct, self.carbs_pct, self.fat_pct)
    }
}

/// Split a calorie total into gram targets
#[must_use]
pub fn split(calories: u32, profile: &UserProfile, is_loss: bool) -> MacroBreakdown {
    let distribution = MacroDistribution::for_goal(is_loss, profile.activity_level);
    to_breakdown(calories, distribution)
}

/// Convert a distribution to grams: protein and carbs at 4 kcal/g, fat at 9 kcal/g
#[must_use]
pub fn to_breakdown(calories: u32, distribution: MacroDistribution) -> MacroBreakdown {
    let (protein_pct, carbs_pct, fat_pct) = distribution.as_tuple();
    MacroBreakdown {
        protein: target(calories, protein_pct, KCAL_PER_GRAM_PROTEIN),
        carbs: target(calories, carbs_pct, KCAL_PER_GRAM_CARBS),
        fat: target(calories, fat_pct, KCAL_PER_GRAM_FAT),
    }
}

fn target(calories: u32, percentage: u8, kcal_per_gram: f64) -> MacroTarget {
    let kcal = f64::from(calories) * f64::from(percentage) / 100.0;
    MacroTarget {
        grams: (kcal / kcal_per_gram).round() as u32,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_core::models::Sex;

    #[test]
    fn test_percentages_sum_to_100_everywhere() {
        for level in ActivityLevel::ALL {
            for is_loss in [true, false] {
                let (p, c, f) = MacroDistribution::for_goal(is_loss, level).as_tuple();
                assert_eq!(u16::from(p) + u16::from(c) + u16::from(f), 100, "{level} loss={is_loss}");
            }
        }
    }

    #[test]
    fn test_active_shift_moves_fat_to_carbs() {
        assert_eq!(
            MacroDistribution::for_goal(false, ActivityLevel::VeryActive).as_tuple(),
            (30, 50, 20)
        );
        assert_eq!(
            MacroDistribution::for_goal(true, ActivityLevel::Active).as_tuple(),
            (35, 40, 25)
        );
    }

    #[test]
    fn test_sedentary_shift_moves_carbs_to_protein() {
        assert_eq!(
            MacroDistribution::for_goal(true, ActivityLevel::Sedentary).as_tuple(),
            (40, 30, 30)
        );
    }

    #[test]
    fn test_gram_conversion() {
        let profile =
            UserProfile::new(30, 180.0, 90.0, Sex::Male, ActivityLevel::Moderate, Some(80.0))
                .unwrap();
        let macros = split(2000, &profile, true);
        // 35% of 2000 = 700 kcal protein -> 175 g; 30% fat = 600 kcal -> 67 g
        assert_eq!(macros.protein.grams, 175);
        assert_eq!(macros.carbs.grams, 175);
        assert_eq!(macros.fat.grams, 67);
        assert_eq!(macros.total_percentage(), 100);
    }
}
