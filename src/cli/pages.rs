// ============================================================
// Layer 1 — Page Rendering
// ============================================================
// Pure functions from session context to text. Nothing here
// reads input or touches the model; the interactive loop in
// app.rs decides what to show and when.

use std::fmt::Write as _;

use crate::application::predict_use_case::Prediction;
use crate::application::session::{Page, Session};
use crate::ml::evaluation::Evaluation;

pub const CONTACT_EMAIL: &str = "cobacoba@gmail.com";

const ABOUT_TEXT: &str = "Aplikasi ini memprediksi waktu tidur Anda berdasarkan beberapa faktor \
kesehatan seperti usia, jenis kelamin, kebiasaan olahraga, waktu penggunaan layar, dan lainnya. \
Masukkan nama Anda untuk melanjutkan.";

const BAR_WIDTH: usize = 30;

fn heading(title: &str) -> String {
    format!("\n{title}\n{}\n", "=".repeat(title.chars().count()))
}

/// Sidebar navigation, with the current page marked.
pub fn render_menu(session: &Session) -> String {
    let mut out = String::from("\nPilih Halaman\n");
    for (i, page) in Page::ALL.iter().enumerate() {
        let marker = if *page == session.page() { '>' } else { ' ' };
        let _ = writeln!(out, " {marker} [{}] {}", i + 1, page.title());
    }
    out.push_str("   [q] Keluar\n");
    out
}

pub fn render_landing(session: &Session) -> String {
    let mut out = heading(Page::Landing.title());
    out.push_str(ABOUT_TEXT);
    out.push('\n');
    if let Some(name) = session.user_name() {
        out.push('\n');
        out.push_str(&render_welcome(name));
    }
    out
}

pub fn render_welcome(name: &str) -> String {
    format!("Selamat datang, {name}!\n")
}

pub fn render_form_header(session: &Session) -> String {
    let mut out = heading("Prediksi Waktu Tidur Berdasarkan Fitur Kesehatan");
    if let Some(name) = session.user_name() {
        let _ = writeln!(out, "Pengguna: {name}");
    }
    out
}

/// Prediction, conclusion and the stored metrics chart.
pub fn render_prediction(prediction: &Prediction, metrics: Option<Evaluation>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nPrediksi waktu tidur Anda adalah: {:.2} jam", prediction.hours);
    let _ = writeln!(out, "\nKesimpulan: {}", prediction.conclusion.message());
    out.push('\n');
    out.push_str(&render_metrics(metrics));
    out
}

/// MAE / MSE as a two-bar text chart.
pub fn render_metrics(metrics: Option<Evaluation>) -> String {
    let Some(eval) = metrics else {
        return "Metrik evaluasi tidak tersedia untuk model ini.\n".to_string();
    };

    let mut out = format!("Evaluasi model pada data uji ({} baris)\n", eval.rows);
    let max = eval.mae.max(eval.mse);
    for (label, value) in [("MAE", eval.mae), ("MSE", eval.mse)] {
        let len = if max > 0.0 && value.is_finite() {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(out, "  {label} | {:<width$} {value:.3}", "█".repeat(len), width = BAR_WIDTH);
    }
    out
}

pub fn render_contact() -> String {
    let mut out = heading(Page::Contact.title());
    out.push_str("Jika Anda memiliki pertanyaan atau feedback, silakan hubungi kami di:\n");
    let _ = writeln!(out, "Email: {CONTACT_EMAIL}");
    out
}
