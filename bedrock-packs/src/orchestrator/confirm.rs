//! Explicit confirmation for irreversible actions.

/// Answer to an irreversible-action prompt.
///
/// Anything other than an explicit yes declines, including no input at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    Confirmed,
    #[default]
    Declined,
}

impl Confirmation {
    /// Interpret a typed answer. Only `y` and `yes` (any case) confirm.
    pub fn parse(answer: Option<&str>) -> Self {
        match answer.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
            Some("y") | Some("yes") => Self::Confirmed,
            _ => Self::Declined,
        }
    }

    /// From an already decided flag, such as `--yes`.
    pub fn from_flag(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    pub fn is_confirmed(&self) -> bool {
        *self == Self::Confirmed
    }
}
