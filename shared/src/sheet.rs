//! Bottom sheet and quick-actions state machines.
//!
//! Logical state only changes on discrete events. Spring animations and drag
//! offsets are rendering concerns; `SheetPresentation` derives the targets the
//! shell animates towards.

use serde::{Deserialize, Serialize};

use crate::config::InteractionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetPanel {
    NewDelivery,
    Tracking,
    Packages,
    Schedule,
    Profile,
}

/// A panel exists if and only if the sheet is not closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "level", content = "panel", rename_all = "snake_case")]
pub enum SheetState {
    #[default]
    Closed,
    HalfOpen(SheetPanel),
    FullOpen(SheetPanel),
}

impl SheetState {
    #[must_use]
    pub const fn panel(self) -> Option<SheetPanel> {
        match self {
            Self::Closed => None,
            Self::HalfOpen(panel) | Self::FullOpen(panel) => Some(panel),
        }
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Opens at half height, or swaps the panel if already open.
    #[must_use]
    pub const fn open(self, panel: SheetPanel) -> Self {
        match self {
            Self::Closed | Self::HalfOpen(_) => Self::HalfOpen(panel),
            Self::FullOpen(_) => Self::FullOpen(panel),
        }
    }

    #[must_use]
    pub const fn expand(self) -> Self {
        match self {
            Self::HalfOpen(panel) => Self::FullOpen(panel),
            other => other,
        }
    }

    #[must_use]
    pub const fn collapse(self) -> Self {
        match self {
            Self::FullOpen(panel) => Self::HalfOpen(panel),
            other => other,
        }
    }

    /// One level down: full to half, half to closed.
    #[must_use]
    pub const fn step_down(self) -> Self {
        match self {
            Self::FullOpen(panel) => Self::HalfOpen(panel),
            Self::HalfOpen(_) | Self::Closed => Self::Closed,
        }
    }

    #[must_use]
    pub const fn close(self) -> Self {
        Self::Closed
    }

    /// Applies a finished drag to the sheet.
    #[must_use]
    pub fn release(self, policy: &DragPolicy, release: DragRelease) -> DragOutcome<Self> {
        if self.is_closed() {
            return DragOutcome::Ignored;
        }
        match policy.classify(release) {
            DragDirection::None => DragOutcome::Ignored,
            DragDirection::Down => DragOutcome::Committed(self.step_down()),
            DragDirection::Up => match self {
                Self::HalfOpen(_) => DragOutcome::Committed(self.expand()),
                _ => DragOutcome::SnapBack,
            },
            DragDirection::Undecided => DragOutcome::SnapBack,
        }
    }
}

/// Vertical drag at release. Positive `dy` and `vy` point downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragRelease {
    pub dy: f64,
    /// px per millisecond
    pub vy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    /// Never left the dead zone; not a drag at all.
    None,
    /// Intentional but below both thresholds.
    Undecided,
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome<S> {
    Ignored,
    SnapBack,
    Committed(S),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPolicy {
    pub dead_zone: f64,
    pub distance_threshold: f64,
    pub velocity_threshold: f64,
}

impl DragPolicy {
    #[must_use]
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            dead_zone: config.dead_zone_px,
            distance_threshold: config.drag_threshold_px,
            velocity_threshold: config.velocity_threshold,
        }
    }

    /// Whether a drag in progress has left the dead zone.
    #[must_use]
    pub fn is_intentional(&self, dy: f64) -> bool {
        dy.abs() >= self.dead_zone
    }

    /// Displacement beyond the threshold OR velocity beyond the threshold
    /// commits; displacement is checked first.
    #[must_use]
    pub fn classify(&self, release: DragRelease) -> DragDirection {
        if !self.is_intentional(release.dy) {
            return DragDirection::None;
        }
        if release.dy > self.distance_threshold {
            return DragDirection::Down;
        }
        if release.dy < -self.distance_threshold {
            return DragDirection::Up;
        }
        if release.vy > self.velocity_threshold {
            return DragDirection::Down;
        }
        if release.vy < -self.velocity_threshold {
            return DragDirection::Up;
        }
        DragDirection::Undecided
    }
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickActionsState {
    #[default]
    Closed,
    Open,
}

impl QuickActionsState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// Upward commit opens, downward commit closes.
    #[must_use]
    pub fn release(self, policy: &DragPolicy, release: DragRelease) -> DragOutcome<Self> {
        match (policy.classify(release), self) {
            (DragDirection::None, _) => DragOutcome::Ignored,
            (DragDirection::Up, Self::Closed) => DragOutcome::Committed(Self::Open),
            (DragDirection::Down, Self::Open) => DragOutcome::Committed(Self::Closed),
            _ => DragOutcome::SnapBack,
        }
    }
}

/// Rendering targets for the sheet; the shell springs towards them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetPresentation {
    pub height_fraction: f64,
    pub backdrop_opacity: f64,
    pub transition_ms: u32,
    /// Live finger offset while dragging, in px. Zero at rest.
    pub drag_offset_px: f64,
}

impl SheetPresentation {
    #[must_use]
    pub fn of(state: SheetState, drag_offset_px: f64, config: &InteractionConfig) -> Self {
        let (height_fraction, backdrop_opacity) = match state {
            SheetState::Closed => (0.0, 0.0),
            SheetState::HalfOpen(_) => (config.half_open_fraction, 0.3),
            SheetState::FullOpen(_) => (config.full_open_fraction, 0.5),
        };
        Self {
            height_fraction,
            backdrop_opacity,
            transition_ms: config.sheet_transition_ms,
            drag_offset_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuickActionsPresentation {
    pub content_opacity: f64,
    pub chevron_rotation_deg: f64,
    pub transition_ms: u32,
}

impl QuickActionsPresentation {
    #[must_use]
    pub fn of(state: QuickActionsState, config: &InteractionConfig) -> Self {
        let (content_opacity, chevron_rotation_deg) = match state {
            QuickActionsState::Open => (1.0, 180.0),
            QuickActionsState::Closed => (0.0, 0.0),
        };
        Self {
            content_opacity,
            chevron_rotation_deg,
            transition_ms: config.sheet_transition_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: SheetPanel = SheetPanel::NewDelivery;

    fn drag(dy: f64, vy: f64) -> DragRelease {
        DragRelease { dy, vy }
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_initial_state_is_closed() {
            assert_eq!(SheetState::default(), SheetState::Closed);
            assert_eq!(SheetState::default().panel(), None);
        }

        #[test]
        fn test_open_expand_collapse() {
            let s = SheetState::Closed.open(PANEL);
            assert_eq!(s, SheetState::HalfOpen(PANEL));
            let s = s.expand();
            assert_eq!(s, SheetState::FullOpen(PANEL));
            let s = s.collapse();
            assert_eq!(s, SheetState::HalfOpen(PANEL));
        }

        #[test]
        fn test_expand_is_idempotent_when_full() {
            let full = SheetState::FullOpen(PANEL);
            assert_eq!(full.expand(), full);
        }

        #[test]
        fn test_expand_and_collapse_noop_when_closed() {
            assert_eq!(SheetState::Closed.expand(), SheetState::Closed);
            assert_eq!(SheetState::Closed.collapse(), SheetState::Closed);
        }

        #[test]
        fn test_close_from_any_state() {
            for s in [
                SheetState::Closed,
                SheetState::HalfOpen(PANEL),
                SheetState::FullOpen(SheetPanel::Profile),
            ] {
                assert_eq!(s.close(), SheetState::Closed);
                assert_eq!(s.close().panel(), None);
            }
        }

        #[test]
        fn test_open_switches_panel_keeping_level() {
            let s = SheetState::FullOpen(SheetPanel::Packages).open(SheetPanel::Schedule);
            assert_eq!(s, SheetState::FullOpen(SheetPanel::Schedule));
        }
    }

    mod drag_tests {
        use super::*;

        #[test]
        fn test_dead_zone_ignored_even_with_velocity() {
            let policy = DragPolicy::default();
            let s = SheetState::HalfOpen(PANEL);
            assert_eq!(s.release(&policy, drag(5.0, 3.0)), DragOutcome::Ignored);
        }

        #[test]
        fn test_below_threshold_snaps_back() {
            let policy = DragPolicy::default();
            let s = SheetState::HalfOpen(PANEL);
            assert_eq!(s.release(&policy, drag(50.0, 0.1)), DragOutcome::SnapBack);
            assert_eq!(s.release(&policy, drag(-30.0, 0.0)), DragOutcome::SnapBack);
        }

        #[test]
        fn test_drag_down_closes_half() {
            let policy = DragPolicy::default();
            let s = SheetState::HalfOpen(PANEL);
            assert_eq!(
                s.release(&policy, drag(80.0, 0.0)),
                DragOutcome::Committed(SheetState::Closed)
            );
        }

        #[test]
        fn test_drag_down_collapses_full() {
            let policy = DragPolicy::default();
            let s = SheetState::FullOpen(PANEL);
            assert_eq!(
                s.release(&policy, drag(80.0, 0.0)),
                DragOutcome::Committed(SheetState::HalfOpen(PANEL))
            );
        }

        #[test]
        fn test_drag_up_expands_half_only() {
            let policy = DragPolicy::default();
            assert_eq!(
                SheetState::HalfOpen(PANEL).release(&policy, drag(-80.0, 0.0)),
                DragOutcome::Committed(SheetState::FullOpen(PANEL))
            );
            assert_eq!(
                SheetState::FullOpen(PANEL).release(&policy, drag(-80.0, 0.0)),
                DragOutcome::SnapBack
            );
        }

        #[test]
        fn test_fast_flick_commits_below_distance() {
            let policy = DragPolicy::default();
            let s = SheetState::FullOpen(PANEL);
            assert_eq!(
                s.release(&policy, drag(20.0, 1.2)),
                DragOutcome::Committed(SheetState::HalfOpen(PANEL))
            );
        }

        #[test]
        fn test_displacement_wins_over_opposing_velocity() {
            let policy = DragPolicy::default();
            assert_eq!(policy.classify(drag(70.0, -2.0)), DragDirection::Down);
        }

        #[test]
        fn test_closed_sheet_ignores_drags() {
            let policy = DragPolicy::default();
            assert_eq!(
                SheetState::Closed.release(&policy, drag(-200.0, -3.0)),
                DragOutcome::Ignored
            );
        }
    }

    mod quick_actions_tests {
        use super::*;

        #[test]
        fn test_toggle() {
            assert!(QuickActionsState::Closed.toggled().is_open());
            assert!(!QuickActionsState::Open.toggled().is_open());
        }

        #[test]
        fn test_distance_or_velocity_commits() {
            let policy = DragPolicy::default();
            assert_eq!(
                QuickActionsState::Closed.release(&policy, drag(-60.0, 0.0)),
                DragOutcome::Committed(QuickActionsState::Open)
            );
            assert_eq!(
                QuickActionsState::Closed.release(&policy, drag(-15.0, -0.9)),
                DragOutcome::Committed(QuickActionsState::Open)
            );
            assert_eq!(
                QuickActionsState::Open.release(&policy, drag(15.0, 0.9)),
                DragOutcome::Committed(QuickActionsState::Closed)
            );
        }

        #[test]
        fn test_wrong_direction_snaps_back() {
            let policy = DragPolicy::default();
            assert_eq!(
                QuickActionsState::Open.release(&policy, drag(-90.0, 0.0)),
                DragOutcome::SnapBack
            );
        }
    }

    mod presentation_tests {
        use super::*;

        #[test]
        fn test_presentation_follows_state() {
            let config = InteractionConfig::default();
            let closed = SheetPresentation::of(SheetState::Closed, 0.0, &config);
            assert_eq!(closed.height_fraction, 0.0);
            assert_eq!(closed.backdrop_opacity, 0.0);

            let half = SheetPresentation::of(SheetState::HalfOpen(PANEL), 12.0, &config);
            assert_eq!(half.height_fraction, config.half_open_fraction);
            assert_eq!(half.drag_offset_px, 12.0);
            assert_eq!(half.transition_ms, config.sheet_transition_ms);

            let full = SheetPresentation::of(SheetState::FullOpen(PANEL), 0.0, &config);
            assert!(full.height_fraction > half.height_fraction);
        }

        #[test]
        fn test_quick_actions_presentation() {
            let config = InteractionConfig::default();
            let open = QuickActionsPresentation::of(QuickActionsState::Open, &config);
            assert_eq!(open.content_opacity, 1.0);
            assert_eq!(open.chevron_rotation_deg, 180.0);
        }
    }
}
