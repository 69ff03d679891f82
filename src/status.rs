use ratatui::style::{Color, Modifier, Style};

/// Outcome of the current round. `Unset` covers both idle and in-play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum RoundStatus {
    #[default]
    Unset,
    Win,
    Lose,
}

impl RoundStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundStatus::Win | RoundStatus::Lose)
    }
}

/// Heading shown above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title {
    pub text: &'static str,
    pub style: Style,
}

pub fn title(status: RoundStatus) -> Title {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    match status {
        RoundStatus::Lose => Title {
            text: "GAME OVER",
            style: bold.fg(Color::Red),
        },
        RoundStatus::Win => Title {
            text: "ALL CLEARED",
            style: bold.fg(Color::Green),
        },
        RoundStatus::Unset => Title {
            text: "LET'S PLAY",
            style: bold,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_per_status() {
        assert_eq!(title(RoundStatus::Lose).text, "GAME OVER");
        assert_eq!(title(RoundStatus::Win).text, "ALL CLEARED");
        assert_eq!(title(RoundStatus::Unset).text, "LET'S PLAY");
    }

    #[test]
    fn test_title_colours_distinguish_outcomes() {
        assert_eq!(title(RoundStatus::Lose).style.fg, Some(Color::Red));
        assert_eq!(title(RoundStatus::Win).style.fg, Some(Color::Green));
        assert_eq!(title(RoundStatus::Unset).style.fg, None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RoundStatus::Win.is_terminal());
        assert!(RoundStatus::Lose.is_terminal());
        assert!(!RoundStatus::Unset.is_terminal());
        assert_eq!(RoundStatus::default(), RoundStatus::Unset);
    }

    #[test]
    fn test_status_display_for_logs() {
        assert_eq!(RoundStatus::Win.to_string(), "Win");
        assert_eq!(RoundStatus::Lose.to_string(), "Lose");
        assert_eq!(RoundStatus::Unset.to_string(), "Unset");
    }
}
