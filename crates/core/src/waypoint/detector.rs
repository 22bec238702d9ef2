//! Arrival edge detector
//!
//! # Rules
//!
//! A waypoint counts as reached when all of the following hold on one poll:
//!
//! - the vehicle is armed
//! - the flight mode is in the configured navigation mode set
//! - the distance to the active nav waypoint is known, finite and below
//!   the arrival radius
//!
//! Each nav index fires at most once while it stays the active waypoint.
//! Any change of the active index (forward, backward, or a loop back to an
//! index already visited) re-arms detection for the new index.

use crate::traits::{MissionProgress, ModeCode, VehicleState};

/// Default arrival radius in meters
pub const DEFAULT_WAYPOINT_RADIUS_M: f32 = 5.0;

/// Set of mode codes, one bit per code (codes 0..31).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeMask(u32);

impl ModeMask {
    /// AUTO, GUIDED and RTL
    pub const NAVIGATION: ModeMask =
        ModeMask::empty().with(ModeCode::AUTO).with(ModeCode::GUIDED).with(ModeCode::RTL);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Add a mode. Codes above 31 cannot be represented and are ignored.
    pub const fn with(self, mode: ModeCode) -> Self {
        if mode.0 < 32 {
            Self(self.0 | (1 << mode.0))
        } else {
            self
        }
    }

    pub const fn contains(self, mode: ModeCode) -> bool {
        mode.0 < 32 && self.0 & (1 << mode.0) != 0
    }
}

impl Default for ModeMask {
    fn default() -> Self {
        Self::NAVIGATION
    }
}

/// Detector configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Arrival radius (meters, exclusive)
    pub radius_m: f32,
    /// Modes in which waypoint arrival is meaningful
    pub nav_modes: ModeMask,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_WAYPOINT_RADIUS_M,
            nav_modes: ModeMask::NAVIGATION,
        }
    }
}

/// Edge memory: the active nav index and whether it already fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaypointEdge {
    pub current: Option<u16>,
    pub fired: bool,
}

/// One-shot waypoint arrival detector.
#[derive(Clone, Debug, Default)]
pub struct ArrivalDetector {
    config: DetectorConfig,
    edge: WaypointEdge,
}

impl ArrivalDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            edge: WaypointEdge::default(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn edge(&self) -> WaypointEdge {
        self.edge
    }

    /// Check telemetry and return the nav index on its arrival edge.
    ///
    /// Unknown or non-finite distances are "not arrived"; this never fails.
    pub fn poll(&mut self, vehicle: &dyn VehicleState, mission: &dyn MissionProgress) -> Option<u16> {
        let index = mission.current_nav_id();
        if self.edge.current != Some(index) {
            self.edge = WaypointEdge {
                current: Some(index),
                fired: false,
            };
        }

        if self.edge.fired || !vehicle.is_armed() || !self.config.nav_modes.contains(vehicle.mode()) {
            return None;
        }

        let distance = mission.current_nav_distance()?;
        if !distance.is_finite() || distance < 0.0 || distance >= self.config.radius_m {
            return None;
        }

        self.edge.fired = true;
        Some(index)
    }

    /// Forget edge memory for a fresh mission run.
    pub fn reset(&mut self) {
        self.edge = WaypointEdge::default();
    }
}
