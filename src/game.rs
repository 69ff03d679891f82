use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    marker::{self, Marker},
    runtime::TickScheduler,
    session::{SessionConfig, SessionState},
    status::{self, RoundStatus, Title},
};

/// Which branch `start_or_restart` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Restarted,
    /// Restart pressed with an empty field: back to idle with no markers.
    ResetToIdle,
    /// Start pressed with nothing to play; "Points is required" is showing.
    Rejected,
}

/// Result of clicking a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No active round, or the round is already lost.
    Ignored,
    Advanced { next: u32 },
    Cleared,
    Missed { expected: u32, clicked: u32 },
}

/// Parse the points field the way a numeric text input does: blank is zero,
/// anything else must be a finite number.
pub fn parse_points(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// One player's game: the points field, the round in play and its timer.
#[derive(Debug)]
pub struct GameSession<T: TickScheduler> {
    state: SessionState,
    max_points: u32,
    rng: StdRng,
    ticker: T,
}

impl<T: TickScheduler> GameSession<T> {
    pub fn new(ticker: T, config: &SessionConfig) -> Self {
        let mut session = Self {
            state: SessionState::default(),
            max_points: config.max_points,
            rng: StdRng::from_entropy(),
            ticker,
        };

        if let Some(points) = &config.initial_points {
            if !session.set_target_count(points) {
                debug!(points = %points, "ignoring unusable initial points");
            }
        }

        session
    }

    /// Replace the layout randomness, mainly so tests get stable positions.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Update the points field. Returns false when the text was rejected;
    /// the "Points is required" hint is cleared either way.
    pub fn set_target_count(&mut self, raw_text: &str) -> bool {
        self.state.points_required = false;

        match parse_points(raw_text) {
            Some(value) if value <= self.max_points as f64 => {
                self.state.points_text = raw_text.to_string();
                true
            }
            _ => {
                debug!(raw_text, "points input rejected");
                false
            }
        }
    }

    /// Points the next round would be generated with.
    pub fn target_count(&self) -> u32 {
        parse_points(&self.state.points_text)
            .map(|v| v.max(0.0).floor() as u32)
            .unwrap_or(0)
    }

    /// The primary button: start, restart, or drop back to idle.
    pub fn start_or_restart(&mut self) -> StartOutcome {
        let field_empty = self.state.points_text.is_empty();

        let outcome = if self.state.running && field_empty {
            self.state.running = false;
            self.state.points_text.clear();
            StartOutcome::ResetToIdle
        } else {
            if !self.state.running && (field_empty || self.target_count() == 0) {
                self.state.points_required = true;
                return StartOutcome::Rejected;
            }

            let was_running = self.state.running;
            self.state.status = RoundStatus::Unset;
            self.state.running = true;
            if was_running {
                StartOutcome::Restarted
            } else {
                StartOutcome::Started
            }
        };

        self.generate_markers();
        self.state.status = RoundStatus::Unset;
        self.state.clicked_order.clear();
        self.state.elapsed_tenths = 0;

        if self.state.running {
            self.ticker.arm();
        } else {
            self.ticker.disarm();
        }

        info!(?outcome, points = self.state.round_target, "round reset");
        outcome
    }

    fn generate_markers(&mut self) {
        let count = self.target_count();
        self.state.round_target = count;
        self.state.markers = marker::generate(count, &mut self.rng);
    }

    pub fn handle_marker_click(&mut self, value: u32) -> ClickOutcome {
        if self.state.status.is_terminal() || !self.state.running {
            return ClickOutcome::Ignored;
        }

        let expected = self.state.expected_value();
        if value != expected {
            self.stop(RoundStatus::Lose);
            info!(
                expected,
                clicked = value,
                status = %self.state.status,
                elapsed = %self.elapsed_display(),
                "wrong marker, round lost"
            );
            return ClickOutcome::Missed {
                expected,
                clicked: value,
            };
        }

        self.state.clicked_order.push(value);
        self.state.markers.retain(|m| m.value != value);

        if self.state.clicked_order.len() as u32 == self.state.round_target {
            self.state.clicked_order.clear();
            self.stop(RoundStatus::Win);
            info!(
                points = self.state.round_target,
                status = %self.state.status,
                elapsed = %self.elapsed_display(),
                "all markers cleared"
            );
            ClickOutcome::Cleared
        } else {
            ClickOutcome::Advanced {
                next: self.state.expected_value(),
            }
        }
    }

    fn stop(&mut self, status: RoundStatus) {
        self.state.status = status;
        self.state.running = false;
        self.ticker.disarm();
    }

    /// Advance the clock by one tenth. Returns false when the tick is stale
    /// or nothing is running.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        if !self.state.running || !self.ticker.accepts(generation) {
            return false;
        }
        self.state.elapsed_tenths += 1;
        true
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn points_text(&self) -> &str {
        &self.state.points_text
    }

    pub fn markers(&self) -> &[Marker] {
        &self.state.markers
    }

    pub fn clicked_order(&self) -> &[u32] {
        &self.state.clicked_order
    }

    pub fn status(&self) -> RoundStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn points_required(&self) -> bool {
        self.state.points_required
    }

    pub fn elapsed_tenths(&self) -> u64 {
        self.state.elapsed_tenths
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.state.elapsed_tenths as f64 / 10.0
    }

    /// Elapsed time as `<seconds>.<tenths>s`.
    pub fn elapsed_display(&self) -> String {
        format!(
            "{}.{}s",
            self.state.elapsed_tenths / 10,
            self.state.elapsed_tenths % 10
        )
    }

    pub fn button_label(&self) -> &'static str {
        if self.state.running {
            "Restart"
        } else {
            "Play"
        }
    }

    pub fn title(&self) -> Title {
        status::title(self.state.status)
    }
}

impl<T: TickScheduler> Drop for GameSession<T> {
    fn drop(&mut self) {
        self.ticker.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{AppEvent, ManualTicker};
    use assert_matches::assert_matches;

    fn session() -> GameSession<ManualTicker> {
        GameSession::new(ManualTicker::new(), &SessionConfig::default())
            .with_rng(StdRng::seed_from_u64(3))
    }

    fn started(points: &str) -> GameSession<ManualTicker> {
        let mut s = session();
        assert!(s.set_target_count(points));
        assert_eq!(s.start_or_restart(), StartOutcome::Started);
        s
    }

    fn tick(s: &mut GameSession<ManualTicker>) -> bool {
        match s.ticker().tick() {
            Some(AppEvent::Tick(generation)) => s.on_tick(generation),
            _ => false,
        }
    }

    fn assert_invariants(s: &GameSession<ManualTicker>) {
        if s.is_running() && s.status() == RoundStatus::Unset {
            let target = s.state().round_target as usize;
            assert_eq!(s.clicked_order().len(), target - s.markers().len());
            let mut remaining: Vec<u32> = s.markers().iter().map(|m| m.value).collect();
            remaining.sort_unstable();
            let expected: Vec<u32> =
                (s.clicked_order().len() as u32 + 1..=target as u32).collect();
            assert_eq!(remaining, expected);
        }
    }

    #[test]
    fn test_parse_points() {
        assert_eq!(parse_points(""), Some(0.0));
        assert_eq!(parse_points("  "), Some(0.0));
        assert_eq!(parse_points(" 7 "), Some(7.0));
        assert_eq!(parse_points("3.5"), Some(3.5));
        assert_eq!(parse_points("-2"), Some(-2.0));
        assert_eq!(parse_points("abc"), None);
        assert_eq!(parse_points("3a"), None);
        assert_eq!(parse_points("NaN"), None);
        assert_eq!(parse_points("inf"), None);
    }

    #[test]
    fn test_set_target_count_rejects_non_numeric() {
        let mut s = session();
        assert!(s.set_target_count("12"));
        assert!(!s.set_target_count("12x"));
        assert_eq!(s.points_text(), "12");
        assert_eq!(s.target_count(), 12);
    }

    #[test]
    fn test_set_target_count_rejects_above_cap() {
        let mut s = GameSession::new(
            ManualTicker::new(),
            &SessionConfig {
                initial_points: None,
                max_points: 20,
            },
        );
        assert!(s.set_target_count("20"));
        assert!(!s.set_target_count("21"));
        assert_eq!(s.points_text(), "20");
    }

    #[test]
    fn test_set_target_count_clears_required_message_even_when_rejected() {
        let mut s = session();
        assert_eq!(s.start_or_restart(), StartOutcome::Rejected);
        assert!(s.points_required());

        assert!(!s.set_target_count("x"));
        assert!(!s.points_required());
    }

    #[test]
    fn test_set_target_count_does_not_start() {
        let mut s = session();
        s.set_target_count("5");
        assert!(!s.is_running());
        assert!(s.markers().is_empty());
    }

    #[test]
    fn test_target_count_floors_and_clamps() {
        let mut s = session();
        s.set_target_count("3.9");
        assert_eq!(s.target_count(), 3);
        s.set_target_count("-4");
        assert_eq!(s.target_count(), 0);
    }

    #[test]
    fn test_initial_points_from_config() {
        let s = GameSession::new(
            ManualTicker::new(),
            &SessionConfig {
                initial_points: Some("8".into()),
                ..SessionConfig::default()
            },
        );
        assert_eq!(s.points_text(), "8");

        let s = GameSession::new(
            ManualTicker::new(),
            &SessionConfig {
                initial_points: Some("eight".into()),
                ..SessionConfig::default()
            },
        );
        assert_eq!(s.points_text(), "");
    }

    #[test]
    fn test_start_generates_round() {
        let s = started("5");
        assert!(s.is_running());
        assert_eq!(s.markers().len(), 5);
        assert_eq!(s.status(), RoundStatus::Unset);
        assert_eq!(s.elapsed_tenths(), 0);
        assert!(s.ticker().is_armed());
        assert_eq!(s.button_label(), "Restart");
        assert_invariants(&s);
    }

    #[test]
    fn test_start_with_empty_field_while_idle_is_rejected() {
        let mut s = session();
        assert_eq!(s.start_or_restart(), StartOutcome::Rejected);
        assert!(!s.is_running());
        assert!(s.points_required());
        assert!(s.markers().is_empty());
        assert_eq!(s.elapsed_tenths(), 0);
        assert_eq!(s.status(), RoundStatus::Unset);
        assert_eq!(s.ticker().arm_count, 0);
        assert_eq!(s.button_label(), "Play");
    }

    #[test]
    fn test_start_with_zero_is_rejected() {
        let mut s = session();
        s.set_target_count("0");
        assert_eq!(s.start_or_restart(), StartOutcome::Rejected);
        assert!(s.points_required());
        assert!(!s.is_running());
    }

    #[test]
    fn test_rejected_start_after_loss_keeps_outcome() {
        let mut s = started("3");
        s.handle_marker_click(2);
        assert_eq!(s.status(), RoundStatus::Lose);
        s.set_target_count("");

        assert_eq!(s.start_or_restart(), StartOutcome::Rejected);
        assert_eq!(s.status(), RoundStatus::Lose);
        assert_eq!(s.markers().len(), 3);
    }

    #[test]
    fn test_restart_while_running_with_empty_field_resets_to_idle() {
        let mut s = started("4");
        s.handle_marker_click(1);
        tick(&mut s);
        tick(&mut s);
        s.set_target_count("");

        assert_eq!(s.start_or_restart(), StartOutcome::ResetToIdle);
        assert!(!s.is_running());
        assert!(s.markers().is_empty());
        assert!(s.clicked_order().is_empty());
        assert_eq!(s.elapsed_tenths(), 0);
        assert_eq!(s.status(), RoundStatus::Unset);
        assert!(!s.points_required());
        assert!(!s.ticker().is_armed());
        assert_eq!(s.points_text(), "");
    }

    #[test]
    fn test_restart_while_running_with_zero_field_plays_empty_round() {
        let mut s = started("3");
        s.handle_marker_click(1);
        tick(&mut s);
        let before = s.ticker().generation();
        assert!(s.set_target_count("0"));

        assert_eq!(s.start_or_restart(), StartOutcome::Restarted);
        assert!(s.is_running());
        assert!(!s.points_required());
        assert!(s.markers().is_empty());
        assert!(s.clicked_order().is_empty());
        assert_eq!(s.elapsed_tenths(), 0);
        assert_eq!(s.status(), RoundStatus::Unset);
        assert!(s.ticker().is_armed());
        assert!(s.ticker().generation() > before);
    }

    #[test]
    fn test_restart_while_running_regenerates() {
        let mut s = started("4");
        s.handle_marker_click(1);
        tick(&mut s);
        let before = s.ticker().generation();

        assert_eq!(s.start_or_restart(), StartOutcome::Restarted);
        assert!(s.is_running());
        assert_eq!(s.markers().len(), 4);
        assert!(s.clicked_order().is_empty());
        assert_eq!(s.elapsed_tenths(), 0);
        assert!(s.ticker().generation() > before);
        assert!(!s.on_tick(before));
        assert_invariants(&s);
    }

    #[test]
    fn test_example_round_three_points() {
        let mut s = started("3");

        assert_eq!(s.handle_marker_click(1), ClickOutcome::Advanced { next: 2 });
        assert_eq!(s.clicked_order(), &[1]);
        assert_invariants(&s);

        assert_eq!(s.handle_marker_click(2), ClickOutcome::Advanced { next: 3 });
        assert_eq!(s.clicked_order(), &[1, 2]);
        assert_eq!(s.markers().len(), 1);
        assert_eq!(s.markers()[0].value, 3);

        assert_eq!(s.handle_marker_click(3), ClickOutcome::Cleared);
        assert_eq!(s.status(), RoundStatus::Win);
        assert!(s.clicked_order().is_empty());
        assert!(s.markers().is_empty());
        assert!(!s.is_running());
        assert!(!s.ticker().is_armed());
        assert_eq!(s.title().text, "ALL CLEARED");
    }

    #[test]
    fn test_win_only_after_last_marker() {
        let n = 12;
        let mut s = started(&n.to_string());
        for value in 1..n {
            assert_matches!(s.handle_marker_click(value), ClickOutcome::Advanced { .. });
            assert_eq!(s.status(), RoundStatus::Unset);
            assert_invariants(&s);
        }
        assert_eq!(s.handle_marker_click(n), ClickOutcome::Cleared);
        assert_eq!(s.status(), RoundStatus::Win);
    }

    #[test]
    fn test_any_wrong_value_loses() {
        for wrong in [0, 3, 4, 99] {
            let mut s = started("4");
            s.handle_marker_click(1);
            assert_matches!(
                s.handle_marker_click(wrong),
                ClickOutcome::Missed { expected: 2, clicked } if clicked == wrong
            );
            assert_eq!(s.status(), RoundStatus::Lose);
            assert!(!s.is_running());
            assert!(!s.ticker().is_armed());
            assert_eq!(s.title().text, "GAME OVER");
        }
    }

    #[test]
    fn test_clicks_after_loss_are_ignored() {
        let mut s = started("5");
        s.handle_marker_click(1);
        s.handle_marker_click(3);
        let snapshot = s.state().clone();

        for value in [2, 3, 1, 5] {
            assert_eq!(s.handle_marker_click(value), ClickOutcome::Ignored);
        }
        assert_eq!(s.state(), &snapshot);
    }

    #[test]
    fn test_clicks_after_win_are_ignored() {
        let mut s = started("1");
        assert_eq!(s.handle_marker_click(1), ClickOutcome::Cleared);
        assert_eq!(s.handle_marker_click(1), ClickOutcome::Ignored);
        assert_eq!(s.status(), RoundStatus::Win);
        assert!(s.clicked_order().is_empty());
    }

    #[test]
    fn test_clicks_while_idle_are_ignored() {
        let mut s = session();
        assert_eq!(s.handle_marker_click(1), ClickOutcome::Ignored);
        assert!(s.clicked_order().is_empty());
    }

    #[test]
    fn test_new_round_after_win_clears_status() {
        let mut s = started("1");
        assert_eq!(s.handle_marker_click(1), ClickOutcome::Cleared);

        assert_eq!(s.start_or_restart(), StartOutcome::Started);
        assert_eq!(s.status(), RoundStatus::Unset);
        assert_eq!(s.title().text, "LET'S PLAY");
        assert_eq!(s.markers().len(), 1);
    }

    #[test]
    fn test_editing_field_mid_round_keeps_round_target() {
        let mut s = started("3");
        s.set_target_count("1");
        assert_eq!(s.handle_marker_click(1), ClickOutcome::Advanced { next: 2 });
        assert_eq!(s.handle_marker_click(2), ClickOutcome::Advanced { next: 3 });
        assert_eq!(s.handle_marker_click(3), ClickOutcome::Cleared);
    }

    #[test]
    fn test_ticks_count_tenths_while_running() {
        let mut s = started("2");
        for _ in 0..15 {
            assert!(tick(&mut s));
        }
        assert_eq!(s.elapsed_tenths(), 15);
        assert_eq!(s.elapsed_display(), "1.5s");
        assert!((s.elapsed_secs() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ticks_stop_counting_after_loss() {
        let mut s = started("2");
        tick(&mut s);
        let generation = s.ticker().generation();
        s.handle_marker_click(2);

        assert!(!s.on_tick(generation));
        assert!(!tick(&mut s));
        assert_eq!(s.elapsed_tenths(), 1);
    }

    #[test]
    fn test_ticks_ignored_while_idle() {
        let mut s = session();
        assert!(!s.on_tick(0));
        assert_eq!(s.elapsed_display(), "0.0s");
    }

    #[test]
    fn test_drop_disarms_timer() {
        use std::sync::mpsc;
        use std::time::Duration;

        let (tx, rx) = mpsc::channel();
        let ticker = crate::runtime::ThreadTicker::new(tx, Duration::from_millis(5));
        let mut s = GameSession::new(ticker, &SessionConfig::default());
        s.set_target_count("2");
        s.start_or_restart();
        drop(s);

        std::thread::sleep(Duration::from_millis(50));
        let first = rx.try_iter().count();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(rx.try_iter().count(), 0, "ticks after drop ({} before)", first);
    }
}
