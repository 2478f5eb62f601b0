use herald_common::types::{StatusChange, Verdict};

/// Static lookup from review status codes to the verdict text shown to the user.
pub struct StatusCatalog;

impl StatusCatalog {
    /// Fixed verdict text for a known status.
    pub fn verdict_text(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }

    /// Look up a raw status code.
    pub fn lookup(code: &str) -> StatusChange {
        StatusChange::resolve(code)
    }

    /// Text describing a status change, including unknown codes.
    pub fn describe(change: &StatusChange) -> String {
        match change {
            StatusChange::Known(verdict) => Self::verdict_text(*verdict).to_string(),
            StatusChange::Unknown(raw) => format!("Новый статус: {}.", raw),
        }
    }
}
