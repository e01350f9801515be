//! Deterministic synthetic survey responses for tests.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::record::{ExerciseFrequency, FeatureRecord, Sex, YesNo};
use crate::domain::screen_time::ScreenTime;
use crate::domain::traits::LabeledRecord;

/// `n` labelled responses with a learnable sleep pattern.
///
/// When `with_often` is false no respondent exercises often, so that
/// category is unseen by anything fitted on the result.
pub fn survey(n: usize, seed: u64, with_often: bool) -> Vec<LabeledRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let age: u32 = rng.gen_range(15..60);
            let sex = if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female };
            let condition = if rng.gen_bool(0.2) { YesNo::Yes } else { YesNo::No };
            let screen = match rng.gen_range(0..3) {
                0 => ScreenTime::UnderTwoHours,
                1 => ScreenTime::TwoToFourHours,
                _ => ScreenTime::OverFourHours,
            };
            let exercise = match rng.gen_range(0..if with_often { 3 } else { 2 }) {
                0 => ExerciseFrequency::Rarely,
                1 => ExerciseFrequency::Sometimes,
                _ => ExerciseFrequency::Often,
            };
            let smokes = if rng.gen_bool(0.3) { YesNo::Yes } else { YesNo::No };

            let mut hours = 8.2 - 0.02 * f64::from(age - 15) - 0.35 * screen.hours();
            if condition == YesNo::Yes {
                hours -= 0.6;
            }
            if smokes == YesNo::Yes {
                hours -= 0.4;
            }
            hours += match exercise {
                ExerciseFrequency::Rarely    => 0.0,
                ExerciseFrequency::Sometimes => 0.3,
                ExerciseFrequency::Often     => 0.5,
            };
            hours += rng.gen_range(-0.25..0.25);

            LabeledRecord {
                features: FeatureRecord::new(
                    Some(age),
                    Some(sex),
                    Some(condition),
                    Some(screen),
                    Some(exercise),
                    Some(smokes),
                )
                .expect("synthetic record is valid"),
                sleep_hours: hours,
            }
        })
        .collect()
}
