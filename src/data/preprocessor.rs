// ============================================================
// Layer 4 — Survey Cleaner
// ============================================================
// Turns a `RawTable` from the survey form into labelled records:
//
//   1. Trim headers and rename the survey questions to the
//      canonical feature names (canonical names are accepted too)
//   2. Fail fast if any of the six features or the target
//      column is missing
//   3. Clean each row:
//        age          → first run of digits in the cell text
//        screen time  → ScreenTime::normalize
//        categoricals → Category::parse; unknown answers are
//                       logged and left missing for the imputer
//        sleep_time   → numeric cell, or first (signed) number in
//                       the text; a missing target fails the whole run

use crate::data::loader::{Cell, RawTable};
use crate::domain::record::{Category, ExerciseFrequency, FeatureRecord, Sex, YesNo};
use crate::domain::schema::TARGET;
use crate::domain::screen_time::ScreenTime;
use crate::domain::traits::LabeledRecord;
use crate::error::{PipelineError, Result};

/// Survey question headers and the feature each one feeds.
pub const HEADER_RENAMES: [(&str, &str); 7] = [
    ("Berapa usia Anda saat ini?", "age"),
    ("Pilih jenis kelamin Anda", "sex"),
    ("Apakah Anda memiliki penyakit fisik (misalnya penyakit kronis)?", "has_physical_condition"),
    (
        "Berapa lama rata-rata waktu penggunaan layar Anda setiap hari (HP, laptop, TV, dll)?",
        "screen_time_hours",
    ),
    ("Seberapa sering Anda berolahraga?", "exercise_frequency"),
    ("Apakah Anda memiliki kebiasaan merokok atau minum alkohol?", "smokes_or_drinks"),
    ("sleep_time", TARGET),
];

/// Column positions of every required field in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub age:                    usize,
    pub sex:                    usize,
    pub has_physical_condition: usize,
    pub screen_time:            usize,
    pub exercise_frequency:     usize,
    pub smokes_or_drinks:       usize,
    pub target:                 usize,
}

impl ColumnIndex {
    /// Locate every required column, renaming survey headers first.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let canonical: Vec<&str> = headers
            .iter()
            .map(|h| {
                let h = h.trim();
                HEADER_RENAMES
                    .iter()
                    .find(|(question, _)| *question == h)
                    .map(|(_, name)| *name)
                    .unwrap_or(h)
            })
            .collect();

        let find = |name: &'static str| -> Result<usize> {
            canonical.iter().position(|c| *c == name).ok_or_else(|| {
                let header = HEADER_RENAMES
                    .iter()
                    .find(|(_, n)| *n == name)
                    .map(|(q, _)| *q)
                    .unwrap_or(name);
                PipelineError::MissingColumn { column: name, header }
            })
        };

        Ok(Self {
            age:                    find("age")?,
            sex:                    find("sex")?,
            has_physical_condition: find("has_physical_condition")?,
            screen_time:            find("screen_time_hours")?,
            exercise_frequency:     find("exercise_frequency")?,
            smokes_or_drinks:       find("smokes_or_drinks")?,
            target:                 find(TARGET)?,
        })
    }
}

pub struct SurveyCleaner;

impl SurveyCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Clean every row of the table into a labelled record.
    pub fn clean(&self, table: &RawTable) -> Result<Vec<LabeledRecord>> {
        let columns = ColumnIndex::resolve(&table.headers)?;
        table
            .rows
            .iter()
            .enumerate()
            // +2: one for the header row, one for 1-based sheet rows
            .map(|(i, row)| self.clean_row(i + 2, row, &columns))
            .collect()
    }

    fn clean_row(&self, row_no: usize, row: &[Cell], columns: &ColumnIndex) -> Result<LabeledRecord> {
        let text = |idx: usize| row.get(idx).and_then(Cell::as_text);

        let age = text(columns.age)
            .as_deref()
            .and_then(first_digit_run)
            .filter(|&a| a > 0);

        let sleep_hours = row
            .get(columns.target)
            .and_then(|c| match c {
                Cell::Number(n) => Some(*n),
                other => other.as_text().as_deref().and_then(first_number),
            })
            .filter(|h| h.is_finite())
            .ok_or(PipelineError::MissingTarget { row: row_no, column: TARGET })?;

        let features = FeatureRecord::new(
            age,
            parse_answer::<Sex>(row_no, "sex", text(columns.sex)),
            parse_answer::<YesNo>(row_no, "has_physical_condition", text(columns.has_physical_condition)),
            text(columns.screen_time).as_deref().and_then(ScreenTime::normalize),
            parse_answer::<ExerciseFrequency>(row_no, "exercise_frequency", text(columns.exercise_frequency)),
            parse_answer::<YesNo>(row_no, "smokes_or_drinks", text(columns.smokes_or_drinks)),
        )?;

        Ok(LabeledRecord { features, sleep_hours })
    }
}

impl Default for SurveyCleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_answer<C: Category>(row_no: usize, field: &str, raw: Option<String>) -> Option<C> {
    let raw = raw?;
    let parsed = C::parse(&raw);
    if parsed.is_none() {
        tracing::warn!("Row {row_no}: unrecognised {field} answer '{raw}', treating as missing");
    }
    parsed
}

/// First run of ASCII digits, e.g. "21 tahun" → 21.
pub fn first_digit_run(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// First decimal number, accepting ',' as the decimal mark, e.g. "7,5 jam" → 7.5.
/// A '-' directly before the first digit is kept as the sign.
pub fn first_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let mut out = String::new();
    if s[..start].ends_with('-') {
        out.push('-');
    }
    let mut seen_mark = false;
    for c in s[start..].chars() {
        match c {
            '0'..='9' => out.push(c),
            '.' | ',' if !seen_mark => {
                seen_mark = true;
                out.push('.');
            }
            _ => break,
        }
    }
    out.trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey_headers() -> Vec<String> {
        HEADER_RENAMES.iter().map(|(q, _)| format!(" {q} ")).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_resolves_survey_headers_after_trimming() {
        let idx = ColumnIndex::resolve(&survey_headers()).unwrap();
        assert_eq!(idx.age, 0);
        assert_eq!(idx.target, 6);
    }

    #[test]
    fn test_accepts_canonical_headers() {
        let headers: Vec<String> = [
            "sleep_time", "smokes_or_drinks", "exercise_frequency",
            "screen_time_hours", "has_physical_condition", "sex", "age",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let idx = ColumnIndex::resolve(&headers).unwrap();
        assert_eq!(idx.age, 6);
        assert_eq!(idx.target, 0);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let mut headers = survey_headers();
        headers.remove(4);
        match ColumnIndex::resolve(&headers) {
            Err(PipelineError::MissingColumn { column, .. }) => {
                assert_eq!(column, "exercise_frequency")
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_cleans_a_survey_row() {
        let table = RawTable {
            headers: survey_headers(),
            rows: vec![vec![
                text("21 tahun"),
                text("Perempuan"),
                text("Tidak"),
                text("> 4 jam"),
                text("Jarang"),
                text("Tidak"),
                Cell::Number(6.5),
            ]],
        };
        let records = SurveyCleaner::new().clean(&table).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.sleep_hours, 6.5);
        assert_eq!(r.features.age(), Some(21));
        assert_eq!(r.features.sex(), Some(Sex::Female));
        assert_eq!(r.features.screen_time_hours(), Some(5.0));
        assert_eq!(r.features.exercise_frequency(), Some(ExerciseFrequency::Rarely));
    }

    #[test]
    fn test_unknown_answers_become_missing() {
        let table = RawTable {
            headers: survey_headers(),
            rows: vec![vec![
                Cell::Empty,
                text("lainnya"),
                text("Ya"),
                text("tidak tentu"),
                text("Sering"),
                text("Ya"),
                text("8 jam"),
            ]],
        };
        let records = SurveyCleaner::new().clean(&table).unwrap();
        let f = &records[0].features;
        assert_eq!(f.age(), None);
        assert_eq!(f.sex(), None);
        assert_eq!(f.screen_time_hours(), None);
        assert_eq!(records[0].sleep_hours, 8.0);
    }

    #[test]
    fn test_missing_target_aborts() {
        let table = RawTable {
            headers: survey_headers(),
            rows: vec![vec![
                Cell::Number(30.0),
                text("Laki-laki"),
                text("Tidak"),
                text("< 2 jam"),
                text("Kadang"),
                text("Tidak"),
                Cell::Empty,
            ]],
        };
        assert!(matches!(
            SurveyCleaner::new().clean(&table),
            Err(PipelineError::MissingTarget { row: 2, .. })
        ));
    }

    #[test]
    fn test_number_extraction() {
        assert_eq!(first_digit_run("usia 19"), Some(19));
        assert_eq!(first_digit_run("25.0"), Some(25));
        assert_eq!(first_digit_run("tidak tahu"), None);
        assert_eq!(first_number("7,5 jam"), Some(7.5));
        assert_eq!(first_number("sekitar 8. jam"), Some(8.0));
        assert_eq!(first_number("-"), None);
    }

    #[test]
    fn test_negative_number_keeps_its_sign() {
        assert_eq!(first_number("-1"), Some(-1.0));
        assert_eq!(first_number("kira-kira -0,5"), Some(-0.5));
        assert_eq!(first_number("7-8 jam"), Some(7.0));
        assert_eq!(first_number("- 6 jam"), Some(6.0));
    }

    #[test]
    fn test_negative_text_target_matches_numeric_cell() {
        let row = |target: Cell| {
            vec![
                Cell::Number(30.0),
                text("Laki-laki"),
                text("Tidak"),
                text("< 2 jam"),
                text("Kadang"),
                text("Tidak"),
                target,
            ]
        };
        let table = RawTable { headers: survey_headers(), rows: vec![row(text("-1")), row(Cell::Number(-1.0))] };
        let records = SurveyCleaner::new().clean(&table).unwrap();
        assert_eq!(records[0].sleep_hours, -1.0);
        assert_eq!(records[0].sleep_hours, records[1].sleep_hours);
    }
}
