// ============================================================
// Layer 1 — Interactive Predictor
// ============================================================
// Terminal version of the three-page app. Each pass of the loop
// shows the current page, then asks the sidebar menu where to go
// next. The session value is replaced, never mutated in place.
//
// End of input at any prompt ends the app cleanly.

use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use anyhow::Result;

use crate::application::predict_use_case::PredictUseCase;
use crate::application::session::{Action, Page, Session};
use crate::cli::pages;
use crate::domain::record::{Category, ExerciseFrequency, FeatureRecord, Sex, YesNo};
use crate::domain::screen_time::ScreenTime;

const AGE_RANGE: RangeInclusive<u32> = 10..=100;
const DEFAULT_AGE: u32 = 25;

pub struct InteractiveApp<'a, R, W> {
    predictor: &'a PredictUseCase,
    input:     R,
    output:    W,
}

impl<'a, R: BufRead, W: Write> InteractiveApp<'a, R, W> {
    pub fn new(predictor: &'a PredictUseCase, input: R, output: W) -> Self {
        Self { predictor, input, output }
    }

    pub fn run(mut self) -> Result<()> {
        let mut session = Session::default();
        loop {
            let Some(next) = self.show(&session)? else { break };
            // capturing a name opens the form straight away
            if next.page() != session.page() {
                session = next;
                continue;
            }
            let Some(page) = self.choose_page(&next)? else { break };
            session = next.apply(Action::Navigate(page));
        }
        writeln!(self.output, "\nSampai jumpa!")?;
        Ok(())
    }

    /// Render one page. `None` means the input ended.
    fn show(&mut self, session: &Session) -> Result<Option<Session>> {
        match session.page() {
            Page::Landing => {
                write!(self.output, "{}", pages::render_landing(session))?;
                if session.user_name().is_some() {
                    return Ok(Some(session.clone()));
                }
                // a blank name leaves the visitor anonymous and opens the menu
                let Some(name) = self.prompt("Masukkan Nama Anda (kosongkan untuk menu): ")? else {
                    return Ok(None);
                };
                let next = session.apply(Action::SubmitName(name));
                if let Some(name) = next.user_name() {
                    write!(self.output, "{}", pages::render_welcome(name))?;
                }
                Ok(Some(next))
            }
            Page::PredictForm => {
                write!(self.output, "{}", pages::render_form_header(session))?;
                let Some(record) = self.read_form()? else { return Ok(None) };
                let prediction = self.predictor.predict(&record)?;
                write!(
                    self.output,
                    "{}",
                    pages::render_prediction(&prediction, self.predictor.metrics())
                )?;
                Ok(Some(session.clone()))
            }
            Page::Contact => {
                write!(self.output, "{}", pages::render_contact())?;
                Ok(Some(session.clone()))
            }
        }
    }

    fn choose_page(&mut self, session: &Session) -> Result<Option<Page>> {
        loop {
            write!(self.output, "{}", pages::render_menu(session))?;
            let Some(choice) = self.prompt("Pilihan: ")? else { return Ok(None) };
            let choice = choice.trim();
            if choice.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=Page::ALL.len()).contains(&n) => return Ok(Some(Page::ALL[n - 1])),
                _ => writeln!(self.output, "Pilihan tidak dikenal: '{choice}'")?,
            }
        }
    }

    fn read_form(&mut self) -> Result<Option<FeatureRecord>> {
        let Some(age) = self.ask_age()? else { return Ok(None) };
        let Some(sex) = self.ask_category::<Sex>("Jenis Kelamin")? else { return Ok(None) };
        let Some(condition) = self.ask_category::<YesNo>("Penyakit Fisik")? else { return Ok(None) };
        let Some(screen) = self.ask_choice("Waktu Penggunaan Layar (per hari)", &ScreenTime::FORM_OPTIONS)?
        else {
            return Ok(None);
        };
        let Some(exercise) = self.ask_category::<ExerciseFrequency>("Frekuensi Olahraga")? else {
            return Ok(None);
        };
        let Some(smokes) = self.ask_category::<YesNo>("Kebiasaan Merokok atau Minum Alkohol")? else {
            return Ok(None);
        };

        let record = FeatureRecord::new(
            Some(age),
            Some(sex),
            Some(condition),
            ScreenTime::normalize(ScreenTime::FORM_OPTIONS[screen]),
            Some(exercise),
            Some(smokes),
        )?;
        Ok(Some(record))
    }

    fn ask_age(&mut self) -> Result<Option<u32>> {
        let prompt = format!(
            "Usia (dalam tahun) [{}-{}, default {DEFAULT_AGE}]: ",
            AGE_RANGE.start(),
            AGE_RANGE.end()
        );
        loop {
            let Some(line) = self.prompt(&prompt)? else { return Ok(None) };
            let line = line.trim();
            if line.is_empty() {
                return Ok(Some(DEFAULT_AGE));
            }
            match line.parse::<u32>() {
                Ok(age) if AGE_RANGE.contains(&age) => return Ok(Some(age)),
                _ => writeln!(
                    self.output,
                    "Masukkan angka antara {} dan {}.",
                    AGE_RANGE.start(),
                    AGE_RANGE.end()
                )?,
            }
        }
    }

    fn ask_category<C: Category>(&mut self, label: &str) -> Result<Option<C>> {
        let options: Vec<&str> = C::ALL.iter().map(|c| c.form_label()).collect();
        Ok(self.ask_choice(label, &options)?.map(|i| C::ALL[i]))
    }

    /// Numbered select box; empty input picks the first option.
    fn ask_choice(&mut self, label: &str, options: &[&str]) -> Result<Option<usize>> {
        loop {
            writeln!(self.output, "{label}:")?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "  [{}] {option}", i + 1)?;
            }
            let Some(line) = self.prompt("Pilih [1]: ")? else { return Ok(None) };
            let line = line.trim();
            if line.is_empty() {
                return Ok(Some(0));
            }
            if let Ok(n) = line.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(Some(n - 1));
                }
            }
            if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(line)) {
                return Ok(Some(i));
            }
            writeln!(self.output, "Pilihan tidak dikenal: '{line}'")?;
        }
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::data::dataset::SurveyDataset;
    use crate::data::synthetic;
    use crate::ml::evaluation::Evaluation;
    use crate::ml::inferencer::Inferencer;
    use crate::ml::model::{Activation, HyperParams, Solver};
    use crate::ml::pipeline::SleepPipeline;
    use crate::ml::trainer::FitSettings;

    fn predictor() -> PredictUseCase {
        let params = HyperParams {
            hidden_layer_sizes: vec![8],
            activation:         Activation::Relu,
            alpha:              1e-4,
            learning_rate_init: 1e-2,
            solver:             Solver::Adam,
            max_epochs:         20,
        };
        let ds = SurveyDataset::new(synthetic::survey(40, 13, true));
        let (pipeline, _) = SleepPipeline::fit(&params, ds.records(), ds.targets(), &FitSettings::default()).unwrap();
        let eval = Evaluation { mae: 0.5, mse: 0.45, rows: 8 };
        PredictUseCase::with_inferencer(Inferencer::new(pipeline, Some(eval)))
    }

    fn run(script: &str) -> String {
        let predictor = predictor();
        let mut out = Vec::new();
        InteractiveApp::new(&predictor, Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_walkthrough() {
        // name, form (default age, then options by number and by label), contact, quit
        let out = run("Budi\n\n1\nTidak\n2\nkadang\n2\n3\nq\n");
        assert!(out.contains("Selamat datang, Budi!"));
        assert!(out.contains("Pengguna: Budi"));
        assert!(out.contains("Prediksi waktu tidur Anda adalah: "));
        assert!(out.contains("Kesimpulan: "));
        assert!(out.contains("MAE |"));
        assert!(out.contains("Email: cobacoba@gmail.com"));
        assert!(out.ends_with("Sampai jumpa!\n"));
    }

    #[test]
    fn test_blank_name_opens_the_menu() {
        let out = run("\n3\nq\n");
        assert_eq!(out.matches("Masukkan Nama Anda").count(), 1);
        assert!(out.contains("Email: cobacoba@gmail.com"));
        assert!(!out.contains("Selamat datang"));
    }

    #[test]
    fn test_form_is_reachable_without_a_name() {
        let out = run("\n2\n\n1\n1\n1\n1\n1\nq\n");
        assert!(out.contains("Prediksi waktu tidur Anda adalah: "));
        assert!(!out.contains("Pengguna:"));
    }

    #[test]
    fn test_name_can_be_given_after_returning_to_landing() {
        let out = run("  \n1\nSari\n");
        assert_eq!(out.matches("Masukkan Nama Anda").count(), 2);
        assert!(out.contains("Selamat datang, Sari!"));
    }

    #[test]
    fn test_age_outside_range_is_rejected() {
        let out = run("Budi\n5\n101\n40\n");
        assert_eq!(out.matches("Masukkan angka antara 10 dan 100.").count(), 2);
        assert!(out.contains("Jenis Kelamin:"));
    }

    #[test]
    fn test_unknown_menu_choice_is_reported() {
        let out = run("Budi\n30\n1\n1\n1\n1\n1\n9\nq\n");
        assert!(out.contains("Pilihan tidak dikenal: '9'"));
    }

    #[test]
    fn test_end_of_input_quits_cleanly() {
        let out = run("");
        assert!(out.contains("Tentang Aplikasi"));
        assert!(out.ends_with("Sampai jumpa!\n"));
    }
}
