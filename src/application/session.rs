// ============================================================
// Layer 2 — Navigation State Machine
// ============================================================
//
//            SubmitName(non-blank)
//   Landing ───────────────────────► PredictForm
//      ▲  ╲                              │
//      │   ╲ Navigate(p)                 │ Navigate(p)
//      │    ╲                            ▼
//      └──── any page ◄──────────────► Contact
//
// A Session is a value. `apply` returns the next one and never
// touches the old one, so a page render only ever sees the
// context it was handed.

/// The three pages of the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Landing,
    PredictForm,
    Contact,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Landing, Page::PredictForm, Page::Contact];

    pub fn title(self) -> &'static str {
        match self {
            Page::Landing     => "Tentang Aplikasi",
            Page::PredictForm => "Prediksi Waktu Tidur",
            Page::Contact     => "Hubungi Kami",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Page),
    /// Name typed on the landing page.
    SubmitName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    page:      Page,
    user_name: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self { page: Page::Landing, user_name: None }
    }
}

impl Session {
    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn apply(&self, action: Action) -> Session {
        match action {
            Action::Navigate(page) => Session { page, ..self.clone() },
            Action::SubmitName(name) => {
                let name = name.trim();
                if self.page != Page::Landing || name.is_empty() {
                    return self.clone();
                }
                Session {
                    page:      Page::PredictForm,
                    user_name: Some(name.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_landing_without_name() {
        let s = Session::default();
        assert_eq!(s.page(), Page::Landing);
        assert_eq!(s.user_name(), None);
    }

    #[test]
    fn test_name_moves_landing_to_form() {
        let s = Session::default().apply(Action::SubmitName("  Budi ".to_string()));
        assert_eq!(s.page(), Page::PredictForm);
        assert_eq!(s.user_name(), Some("Budi"));
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let start = Session::default();
        assert_eq!(start.apply(Action::SubmitName("   ".to_string())), start);
    }

    #[test]
    fn test_name_outside_landing_is_ignored() {
        let contact = Session::default().apply(Action::Navigate(Page::Contact));
        assert_eq!(contact.apply(Action::SubmitName("Sari".to_string())), contact);
    }

    #[test]
    fn test_navigation_keeps_name_and_old_session() {
        let named = Session::default().apply(Action::SubmitName("Sari".to_string()));
        let moved = named.apply(Action::Navigate(Page::Contact));
        assert_eq!(moved.page(), Page::Contact);
        assert_eq!(moved.user_name(), Some("Sari"));
        // the previous value is untouched
        assert_eq!(named.page(), Page::PredictForm);
    }

    #[test]
    fn test_every_page_is_reachable_from_every_page() {
        for from in Page::ALL {
            let s = Session::default().apply(Action::Navigate(from));
            for to in Page::ALL {
                assert_eq!(s.apply(Action::Navigate(to)).page(), to);
            }
        }
    }
}
