// ============================================================
// Layer 3 — FeatureRecord
// ============================================================
// One respondent's six normalized attributes. Every field is
// optional because the imputers fill gaps from training-set
// statistics; a present value has always been validated.
//
// Categorical answers arrive either in the survey's Indonesian
// wording ("Laki-laki", "Ya", "Kadang") or in English. Both
// parse to the same variant, and the encoder only ever sees the
// canonical English `label()`.

use serde::{Deserialize, Serialize};

use crate::domain::screen_time::ScreenTime;
use crate::error::{PipelineError, Result};

/// A closed set of answers for one categorical survey question.
pub trait Category: Sized + Copy + 'static {
    /// Canonical feature name of the question.
    const FIELD: &'static str;

    /// Every variant, in form order.
    const ALL: &'static [Self];

    /// Canonical label seen by the encoder.
    fn label(self) -> &'static str;

    /// Label shown on the prediction form.
    fn form_label(self) -> &'static str;

    /// Accepted spellings besides `label()` and `form_label()`.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Case-insensitive parse of any accepted spelling.
    fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.iter().copied().find(|v| {
            v.label() == needle
                || v.form_label().to_lowercase() == needle
                || v.aliases().iter().any(|a| *a == needle)
        })
    }

    /// Strict parse for user input: unknown spellings are an error.
    fn parse_strict(raw: &str) -> Result<Self> {
        Self::parse(raw).ok_or_else(|| PipelineError::InvalidFeature {
            field:  Self::FIELD,
            reason: format!(
                "unrecognised answer '{}' (expected one of: {})",
                raw.trim(),
                Self::ALL.iter().map(|v| v.form_label()).collect::<Vec<_>>().join(", "),
            ),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Category for Sex {
    const FIELD: &'static str = "sex";
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn label(self) -> &'static str {
        match self {
            Self::Male   => "male",
            Self::Female => "female",
        }
    }

    fn form_label(self) -> &'static str {
        match self {
            Self::Male   => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Male   => &["pria", "l", "m"],
            Self::Female => &["wanita", "p", "f"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl Category for YesNo {
    // Shared by two questions; the record reports the concrete field name.
    const FIELD: &'static str = "yes/no answer";
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No  => "no",
        }
    }

    fn form_label(self) -> &'static str {
        match self {
            Self::Yes => "Ya",
            Self::No  => "Tidak",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Yes => &["y", "true"],
            Self::No  => &["n", "false", "tdk"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseFrequency {
    Rarely,
    Sometimes,
    Often,
}

impl Category for ExerciseFrequency {
    const FIELD: &'static str = "exercise_frequency";
    const ALL: &'static [Self] = &[Self::Rarely, Self::Sometimes, Self::Often];

    fn label(self) -> &'static str {
        match self {
            Self::Rarely    => "rarely",
            Self::Sometimes => "sometimes",
            Self::Often     => "often",
        }
    }

    fn form_label(self) -> &'static str {
        match self {
            Self::Rarely    => "Jarang",
            Self::Sometimes => "Kadang",
            Self::Often     => "Sering",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Rarely    => &["jarang sekali", "tidak pernah", "never"],
            Self::Sometimes => &["kadang-kadang", "kadang kadang"],
            Self::Often     => &["sangat sering", "rutin"],
        }
    }
}

/// The six-field input to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    age:                    Option<u32>,
    sex:                    Option<Sex>,
    has_physical_condition: Option<YesNo>,
    screen_time:            Option<ScreenTime>,
    exercise_frequency:     Option<ExerciseFrequency>,
    smokes_or_drinks:       Option<YesNo>,
}

impl FeatureRecord {
    /// Build a record. A present age must be a positive number of years.
    pub fn new(
        age:                    Option<u32>,
        sex:                    Option<Sex>,
        has_physical_condition: Option<YesNo>,
        screen_time:            Option<ScreenTime>,
        exercise_frequency:     Option<ExerciseFrequency>,
        smokes_or_drinks:       Option<YesNo>,
    ) -> Result<Self> {
        if age == Some(0) {
            return Err(PipelineError::InvalidFeature {
                field:  "age",
                reason: "age must be a positive number of years".to_string(),
            });
        }
        Ok(Self {
            age,
            sex,
            has_physical_condition,
            screen_time,
            exercise_frequency,
            smokes_or_drinks,
        })
    }

    /// Build a fully populated record from form/CLI answers.
    ///
    /// Categorical answers must be recognised; the screen-time text goes
    /// through the normalizer and may legitimately come out missing.
    pub fn from_answers(
        age:                u32,
        sex:                &str,
        physical_condition: &str,
        screen_time:        &str,
        exercise:           &str,
        smokes_or_drinks:   &str,
    ) -> Result<Self> {
        let yes_no = |field: &'static str, raw: &str| {
            YesNo::parse_strict(raw).map_err(|e| match e {
                PipelineError::InvalidFeature { reason, .. } => {
                    PipelineError::InvalidFeature { field, reason }
                }
                other => other,
            })
        };

        Self::new(
            Some(age),
            Some(Sex::parse_strict(sex)?),
            Some(yes_no("has_physical_condition", physical_condition)?),
            ScreenTime::normalize(screen_time),
            Some(ExerciseFrequency::parse_strict(exercise)?),
            Some(yes_no("smokes_or_drinks", smokes_or_drinks)?),
        )
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn has_physical_condition(&self) -> Option<YesNo> {
        self.has_physical_condition
    }

    pub fn screen_time(&self) -> Option<ScreenTime> {
        self.screen_time
    }

    pub fn screen_time_hours(&self) -> Option<f64> {
        self.screen_time.map(ScreenTime::hours)
    }

    pub fn exercise_frequency(&self) -> Option<ExerciseFrequency> {
        self.exercise_frequency
    }

    pub fn smokes_or_drinks(&self) -> Option<YesNo> {
        self.smokes_or_drinks
    }

    /// Numeric features in `schema::NUMERIC_FEATURES` order.
    pub fn numeric_values(&self) -> [Option<f64>; 2] {
        [self.age().map(f64::from), self.screen_time_hours()]
    }

    /// Categorical labels in `schema::CATEGORICAL_FEATURES` order.
    pub fn categorical_labels(&self) -> [Option<&'static str>; 4] {
        [
            self.sex().map(Sex::label),
            self.has_physical_condition().map(YesNo::label),
            self.exercise_frequency().map(ExerciseFrequency::label),
            self.smokes_or_drinks().map(YesNo::label),
        ]
    }
}
