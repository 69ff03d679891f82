use crate::{marker::Marker, status::RoundStatus};

/// Upper bound on the points a player may ask for when nothing else is
/// configured.
pub const DEFAULT_MAX_POINTS: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// text pre-filled into the points field
    pub initial_points: Option<String>,
    pub max_points: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_points: None,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl From<&crate::config::Config> for SessionConfig {
    fn from(cfg: &crate::config::Config) -> Self {
        Self {
            initial_points: cfg.default_points.clone(),
            max_points: cfg.max_points,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// raw text of the points field, always parseable or empty
    pub points_text: String,
    pub running: bool,
    /// elapsed time in tenths of a second
    pub elapsed_tenths: u64,
    /// remaining markers, in draw order
    pub markers: Vec<Marker>,
    pub clicked_order: Vec<u32>,
    pub status: RoundStatus,
    /// "Points is required" is showing
    pub points_required: bool,
    /// marker count the current round was generated with
    pub round_target: u32,
}

impl SessionState {
    /// The next value the player has to click.
    pub fn expected_value(&self) -> u32 {
        self.clicked_order.len() as u32 + 1
    }
}
