//! Waypoint Action Parameter Definitions
//!
//! # Parameters
//!
//! - `ACT_WP_RADIUS` - Waypoint arrival radius in meters
//! - `ACT_RATE_HZ` - Dispatcher update rate
//! - `ACT_LOIT_MAX` - Maximum timed hold duration in seconds
//! - `ACT_SPD_MIN` / `ACT_SPD_MAX` - Light pattern speed bounds
//! - `ACT_PWM_MIN` / `ACT_PWM_MAX` - Actuator PWM range in microseconds
//! - `ACT_PAN_MIN` / `ACT_PAN_MAX` - Gimbal pan range in degrees
//! - `ACT_TILT_MIN` / `ACT_TILT_MAX` - Gimbal tilt range in degrees
//! - `ACT_NAV_MODES` - Bitmask of mode codes counted as navigating
//!
//! Out-of-range values are clamped on load; inconsistent pairs fall back to
//! their defaults.

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::servo::{ServoConfig, ServoMap};
use crate::waypoint::{DetectorConfig, ModeMask};

const DEFAULT_WP_RADIUS: f32 = 5.0;
const MIN_WP_RADIUS: f32 = 0.5;
const MAX_WP_RADIUS: f32 = 100.0;

const DEFAULT_RATE_HZ: u8 = 10;
const MIN_RATE_HZ: u8 = 1;
const MAX_RATE_HZ: u8 = 50;

const DEFAULT_LOIT_MAX_S: u16 = 30;
const MIN_LOIT_MAX_S: u16 = 1;
const MAX_LOIT_MAX_S: u16 = 600;

const DEFAULT_SPD_MIN: u8 = 1;
const DEFAULT_SPD_MAX: u8 = 10;
const SPD_LIMIT: u8 = 20;

const DEFAULT_PWM_MIN: u16 = 1000;
const DEFAULT_PWM_MAX: u16 = 2000;
const PWM_LOWER: u16 = 500;
const PWM_UPPER: u16 = 2500;

const DEFAULT_PAN_MIN: f32 = -180.0;
const DEFAULT_PAN_MAX: f32 = 180.0;
const DEFAULT_TILT_MIN: f32 = -90.0;
const DEFAULT_TILT_MAX: f32 = 30.0;
const TILT_UPPER: f32 = 90.0;

/// Waypoint action parameters loaded from the parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct ActionParams {
    /// Arrival radius in meters
    pub wp_radius: f32,
    /// Dispatcher update rate in Hz
    pub rate_hz: u8,
    /// Longest timed hold in seconds
    pub loit_max_s: u16,
    pub speed_min: u8,
    pub speed_max: u8,
    pub pwm_min: u16,
    pub pwm_max: u16,
    pub pan_min: f32,
    pub pan_max: f32,
    pub tilt_min: f32,
    pub tilt_max: f32,
    pub nav_modes: ModeMask,
}

impl Default for ActionParams {
    fn default() -> Self {
        Self {
            wp_radius: DEFAULT_WP_RADIUS,
            rate_hz: DEFAULT_RATE_HZ,
            loit_max_s: DEFAULT_LOIT_MAX_S,
            speed_min: DEFAULT_SPD_MIN,
            speed_max: DEFAULT_SPD_MAX,
            pwm_min: DEFAULT_PWM_MIN,
            pwm_max: DEFAULT_PWM_MAX,
            pan_min: DEFAULT_PAN_MIN,
            pan_max: DEFAULT_PAN_MAX,
            tilt_min: DEFAULT_TILT_MIN,
            tilt_max: DEFAULT_TILT_MAX,
            nav_modes: ModeMask::NAVIGATION,
        }
    }
}

fn read_f32(store: &ParameterStore, name: &str, default: f32, min: f32, max: f32) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if v.is_finite() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

fn read_int(store: &ParameterStore, name: &str, default: i32, min: i32, max: i32) -> i32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(min, max),
        Some(ParamValue::Float(v)) if v.is_finite() => (*v as i32).clamp(min, max),
        _ => default,
    }
}

impl ActionParams {
    /// Register action parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register("ACT_WP_RADIUS", ParamValue::Float(DEFAULT_WP_RADIUS), none)?;
        store.register("ACT_RATE_HZ", ParamValue::Int(DEFAULT_RATE_HZ as i32), none)?;
        store.register("ACT_LOIT_MAX", ParamValue::Int(DEFAULT_LOIT_MAX_S as i32), none)?;
        store.register("ACT_SPD_MIN", ParamValue::Int(DEFAULT_SPD_MIN as i32), none)?;
        store.register("ACT_SPD_MAX", ParamValue::Int(DEFAULT_SPD_MAX as i32), none)?;
        store.register("ACT_PWM_MIN", ParamValue::Int(DEFAULT_PWM_MIN as i32), none)?;
        store.register("ACT_PWM_MAX", ParamValue::Int(DEFAULT_PWM_MAX as i32), none)?;
        store.register("ACT_PAN_MIN", ParamValue::Float(DEFAULT_PAN_MIN), none)?;
        store.register("ACT_PAN_MAX", ParamValue::Float(DEFAULT_PAN_MAX), none)?;
        store.register("ACT_TILT_MIN", ParamValue::Float(DEFAULT_TILT_MIN), none)?;
        store.register("ACT_TILT_MAX", ParamValue::Float(DEFAULT_TILT_MAX), none)?;
        store.register(
            "ACT_NAV_MODES",
            ParamValue::Int(ModeMask::NAVIGATION.bits() as i32),
            none,
        )?;
        Ok(())
    }

    /// Load action parameters from the store, clamped to valid bounds
    pub fn from_store(store: &ParameterStore) -> Self {
        let wp_radius = read_f32(store, "ACT_WP_RADIUS", DEFAULT_WP_RADIUS, MIN_WP_RADIUS, MAX_WP_RADIUS);
        let rate_hz = read_int(
            store,
            "ACT_RATE_HZ",
            DEFAULT_RATE_HZ as i32,
            MIN_RATE_HZ as i32,
            MAX_RATE_HZ as i32,
        ) as u8;
        let loit_max_s = read_int(
            store,
            "ACT_LOIT_MAX",
            DEFAULT_LOIT_MAX_S as i32,
            MIN_LOIT_MAX_S as i32,
            MAX_LOIT_MAX_S as i32,
        ) as u16;

        let mut speed_min = read_int(store, "ACT_SPD_MIN", DEFAULT_SPD_MIN as i32, 1, SPD_LIMIT as i32) as u8;
        let mut speed_max = read_int(store, "ACT_SPD_MAX", DEFAULT_SPD_MAX as i32, 1, SPD_LIMIT as i32) as u8;
        if speed_min > speed_max {
            speed_min = DEFAULT_SPD_MIN;
            speed_max = DEFAULT_SPD_MAX;
        }

        let lower = PWM_LOWER as i32;
        let upper = PWM_UPPER as i32;
        let mut pwm_min = read_int(store, "ACT_PWM_MIN", DEFAULT_PWM_MIN as i32, lower, upper) as u16;
        let mut pwm_max = read_int(store, "ACT_PWM_MAX", DEFAULT_PWM_MAX as i32, lower, upper) as u16;
        if pwm_min >= pwm_max {
            pwm_min = DEFAULT_PWM_MIN;
            pwm_max = DEFAULT_PWM_MAX;
        }

        let pan_min = read_f32(store, "ACT_PAN_MIN", DEFAULT_PAN_MIN, -180.0, 0.0);
        let pan_max = read_f32(store, "ACT_PAN_MAX", DEFAULT_PAN_MAX, 0.0, 180.0);
        let tilt_min = read_f32(store, "ACT_TILT_MIN", DEFAULT_TILT_MIN, -90.0, 0.0);
        let tilt_max = read_f32(store, "ACT_TILT_MAX", DEFAULT_TILT_MAX, 0.0, TILT_UPPER);

        let nav_modes = match store.get("ACT_NAV_MODES") {
            Some(ParamValue::Int(bits)) => ModeMask::from_bits(*bits as u32),
            _ => ModeMask::NAVIGATION,
        };

        Self {
            wp_radius,
            rate_hz,
            loit_max_s,
            speed_min,
            speed_max,
            pwm_min,
            pwm_max,
            pan_min,
            pan_max,
            tilt_min,
            tilt_max,
            nav_modes,
        }
    }

    /// Validate action parameters
    pub fn is_valid(&self) -> bool {
        if !(MIN_WP_RADIUS..=MAX_WP_RADIUS).contains(&self.wp_radius) {
            return false;
        }
        if !(MIN_RATE_HZ..=MAX_RATE_HZ).contains(&self.rate_hz) {
            return false;
        }
        if !(MIN_LOIT_MAX_S..=MAX_LOIT_MAX_S).contains(&self.loit_max_s) {
            return false;
        }
        if self.speed_min == 0 || self.speed_min > self.speed_max || self.speed_max > SPD_LIMIT {
            return false;
        }
        if self.pwm_min >= self.pwm_max || self.pwm_min < PWM_LOWER || self.pwm_max > PWM_UPPER {
            return false;
        }
        if self.pan_min >= self.pan_max || self.tilt_min >= self.tilt_max {
            return false;
        }
        self.nav_modes != ModeMask::empty()
    }

    /// Milliseconds between dispatcher updates
    pub fn update_interval_ms(&self) -> u32 {
        1000 / self.rate_hz.max(1) as u32
    }

    /// Clamp a requested pattern speed into `[speed_min, speed_max]`
    pub fn clamp_speed(&self, speed: u8) -> u8 {
        speed.clamp(self.speed_min, self.speed_max.max(self.speed_min))
    }

    /// Clamp a requested hold duration to `ACT_LOIT_MAX`
    pub fn clamp_hold_ms(&self, duration_ms: u32) -> u32 {
        duration_ms.min(self.loit_max_s as u32 * 1000)
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            radius_m: self.wp_radius,
            nav_modes: self.nav_modes,
        }
    }

    pub fn servo_config(&self, map: ServoMap) -> ServoConfig {
        ServoConfig {
            pwm_min: self.pwm_min,
            pwm_max: self.pwm_max,
            pan_min: self.pan_min,
            pan_max: self.pan_max,
            tilt_min: self.tilt_min,
            tilt_max: self.tilt_max,
            map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ModeCode;

    fn loaded(overrides: &[(&str, ParamValue)]) -> ActionParams {
        let mut store = ParameterStore::new();
        ActionParams::register_defaults(&mut store).unwrap();
        for (name, value) in overrides {
            store.set(name, *value).unwrap();
        }
        ActionParams::from_store(&store)
    }

    #[test]
    fn test_defaults() {
        let params = ActionParams::default();
        assert!((params.wp_radius - 5.0).abs() < 0.001);
        assert_eq!(params.rate_hz, 10);
        assert_eq!(params.loit_max_s, 30);
        assert_eq!((params.speed_min, params.speed_max), (1, 10));
        assert_eq!((params.pwm_min, params.pwm_max), (1000, 2000));
        assert!(params.nav_modes.contains(ModeCode::AUTO));
        assert!(params.is_valid());
    }

    #[test]
    fn test_from_store_matches_defaults() {
        assert_eq!(loaded(&[]), ActionParams::default());
    }

    #[test]
    fn test_from_store_custom() {
        let params = loaded(&[
            ("ACT_WP_RADIUS", ParamValue::Float(2.5)),
            ("ACT_RATE_HZ", ParamValue::Int(20)),
            ("ACT_SPD_MAX", ParamValue::Int(15)),
            (
                "ACT_NAV_MODES",
                ParamValue::Int(ModeMask::empty().with(ModeCode::GUIDED).bits() as i32),
            ),
        ]);
        assert!((params.wp_radius - 2.5).abs() < 0.001);
        assert_eq!(params.update_interval_ms(), 50);
        assert_eq!(params.speed_max, 15);
        assert!(!params.nav_modes.contains(ModeCode::AUTO));
        assert!(params.nav_modes.contains(ModeCode::GUIDED));
        assert!(params.is_valid());
    }

    #[test]
    fn test_from_store_clamps() {
        let params = loaded(&[
            ("ACT_WP_RADIUS", ParamValue::Float(500.0)),
            ("ACT_RATE_HZ", ParamValue::Int(0)),
            ("ACT_LOIT_MAX", ParamValue::Int(10_000)),
            ("ACT_TILT_MAX", ParamValue::Float(120.0)),
        ]);
        assert!((params.wp_radius - 100.0).abs() < 0.001);
        assert_eq!(params.rate_hz, 1);
        assert_eq!(params.loit_max_s, 600);
        assert!((params.tilt_max - 90.0).abs() < 0.001);
        assert!(params.is_valid());
    }

    #[test]
    fn test_inverted_pairs_fall_back() {
        let params = loaded(&[
            ("ACT_SPD_MIN", ParamValue::Int(12)),
            ("ACT_SPD_MAX", ParamValue::Int(4)),
            ("ACT_PWM_MIN", ParamValue::Int(2100)),
            ("ACT_PWM_MAX", ParamValue::Int(1900)),
        ]);
        assert_eq!((params.speed_min, params.speed_max), (1, 10));
        assert_eq!((params.pwm_min, params.pwm_max), (1000, 2000));
    }

    #[test]
    fn test_clamp_speed_and_hold() {
        let params = loaded(&[("ACT_SPD_MIN", ParamValue::Int(2))]);
        assert_eq!(params.clamp_speed(0), 2);
        assert_eq!(params.clamp_speed(5), 5);
        assert_eq!(params.clamp_speed(200), 10);
        assert_eq!(params.clamp_hold_ms(10_000), 10_000);
        assert_eq!(params.clamp_hold_ms(120_000), 30_000);
    }

    #[test]
    fn test_invalid_detection() {
        let mut params = ActionParams::default();
        params.nav_modes = ModeMask::empty();
        assert!(!params.is_valid());

        let mut params = ActionParams::default();
        params.wp_radius = 0.1;
        assert!(!params.is_valid());
    }

    #[test]
    fn test_derived_configs() {
        let params = ActionParams::default();
        let detector = params.detector_config();
        assert!((detector.radius_m - 5.0).abs() < 0.001);
        assert_eq!(detector.nav_modes, ModeMask::NAVIGATION);

        let servo = params.servo_config(ServoMap::default());
        assert_eq!(servo, ServoConfig::default());
    }
}
