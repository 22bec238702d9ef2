//! Vehicle and mission telemetry interfaces.
//!
//! Narrow read-only views onto the host autopilot. The action core never
//! mutates vehicle state directly; changes go out through
//! [`CommandTransport`](super::CommandTransport).

use core::cell::Cell;

/// Flight mode number as reported by the autopilot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeCode(pub u8);

impl ModeCode {
    pub const STABILIZE: ModeCode = ModeCode(0);
    pub const AUTO: ModeCode = ModeCode(3);
    pub const GUIDED: ModeCode = ModeCode(4);
    pub const LOITER: ModeCode = ModeCode(5);
    pub const RTL: ModeCode = ModeCode(6);
    pub const BRAKE: ModeCode = ModeCode(17);

    /// Short name for logs. Unknown codes map to `"?"`.
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "STABILIZE",
            3 => "AUTO",
            4 => "GUIDED",
            5 => "LOITER",
            6 => "RTL",
            17 => "BRAKE",
            _ => "?",
        }
    }
}

/// Geographic position (degrees, meters above home).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub alt: f32,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64, alt: f32) -> Self {
        Self { lat, lng, alt }
    }
}

/// Vehicle state as seen by the action core.
pub trait VehicleState {
    /// Current flight mode.
    fn mode(&self) -> ModeCode;

    /// True when motors are armed.
    fn is_armed(&self) -> bool;

    /// Current position, `None` without a usable fix.
    fn position(&self) -> Option<GeoPoint>;

    /// Heading in radians (-PI..PI, 0 = north).
    fn yaw_rad(&self) -> f32;
}

/// Mission progress as seen by the action core.
pub trait MissionProgress {
    /// Index of the NAV command the vehicle is currently flying to.
    fn current_nav_id(&self) -> u16;

    /// Horizontal distance to the current NAV waypoint, `None` if unknown.
    fn current_nav_distance(&self) -> Option<f32>;

    /// Index most recently reported as reached by the mission.
    fn last_reached_wp(&self) -> Option<u16>;
}

// ============================================================================
// Mock Implementations (always available for testing)
// ============================================================================

/// Settable vehicle state for host tests.
#[derive(Clone)]
pub struct MockVehicle {
    mode: Cell<ModeCode>,
    armed: Cell<bool>,
    position: Cell<Option<GeoPoint>>,
    yaw_rad: Cell<f32>,
}

impl Default for MockVehicle {
    fn default() -> Self {
        Self {
            mode: Cell::new(ModeCode::AUTO),
            armed: Cell::new(true),
            position: Cell::new(None),
            yaw_rad: Cell::new(0.0),
        }
    }
}

impl MockVehicle {
    /// Armed, in AUTO, no position fix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&self, mode: ModeCode) {
        self.mode.set(mode);
    }

    pub fn set_armed(&self, armed: bool) {
        self.armed.set(armed);
    }

    pub fn set_position(&self, position: Option<GeoPoint>) {
        self.position.set(position);
    }

    pub fn set_yaw_rad(&self, yaw: f32) {
        self.yaw_rad.set(yaw);
    }
}

impl VehicleState for MockVehicle {
    fn mode(&self) -> ModeCode {
        self.mode.get()
    }

    fn is_armed(&self) -> bool {
        self.armed.get()
    }

    fn position(&self) -> Option<GeoPoint> {
        self.position.get()
    }

    fn yaw_rad(&self) -> f32 {
        self.yaw_rad.get()
    }
}

/// Settable mission progress for host tests.
#[derive(Clone, Default)]
pub struct MockMission {
    nav_id: Cell<u16>,
    distance: Cell<Option<f32>>,
    last_reached: Cell<Option<u16>>,
}

impl MockMission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the mission to `nav_id` at the given distance.
    pub fn set_target(&self, nav_id: u16, distance: Option<f32>) {
        self.nav_id.set(nav_id);
        self.distance.set(distance);
    }

    pub fn set_distance(&self, distance: Option<f32>) {
        self.distance.set(distance);
    }

    pub fn set_last_reached(&self, index: Option<u16>) {
        self.last_reached.set(index);
    }
}

impl MissionProgress for MockMission {
    fn current_nav_id(&self) -> u16 {
        self.nav_id.get()
    }

    fn current_nav_distance(&self) -> Option<f32> {
        self.distance.get()
    }

    fn last_reached_wp(&self) -> Option<u16> {
        self.last_reached.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_code_names() {
        assert_eq!(ModeCode::AUTO.name(), "AUTO");
        assert_eq!(ModeCode::LOITER.name(), "LOITER");
        assert_eq!(ModeCode(99).name(), "?");
    }

    #[test]
    fn mock_vehicle_defaults_armed_in_auto() {
        let vehicle = MockVehicle::new();
        assert!(vehicle.is_armed());
        assert_eq!(vehicle.mode(), ModeCode::AUTO);
        assert!(vehicle.position().is_none());
    }

    #[test]
    fn mock_mission_tracks_target() {
        let mission = MockMission::new();
        mission.set_target(3, Some(12.5));
        mission.set_last_reached(Some(2));
        assert_eq!(mission.current_nav_id(), 3);
        assert_eq!(mission.current_nav_distance(), Some(12.5));
        assert_eq!(mission.last_reached_wp(), Some(2));
    }
}
