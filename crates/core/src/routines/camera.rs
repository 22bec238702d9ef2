//! Camera and gimbal routines

use crate::navigation::gimbal_angles;
use crate::output::{Channels, OutputChannel};
use crate::scheduler::{Routine, RoutineContext, RoutineFault, Step};
use crate::traits::{Command, GeoPoint};

/// Number of interpolation steps in a camera sweep
pub const SWEEP_STEPS: u8 = 20;

/// Photo is taken every this many sweep steps
pub const SWEEP_PHOTO_INTERVAL: u8 = 4;

/// Tracking update cadence
pub const TRACKING_CADENCE_MS: u32 = 100;

/// Recording elapsed-time check cadence
pub const RECORDING_CHECK_MS: u32 = 1000;

/// Linear pan sweep from `start_pan` to `end_pan` at a fixed tilt.
///
/// Visits `SWEEP_STEPS + 1` evenly spaced positions (both ends included),
/// optionally triggering the camera on every fourth one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSweep {
    start_pan: f32,
    end_pan: f32,
    tilt: f32,
    step_delay_ms: u32,
    photo: bool,
    step: u8,
}

impl CameraSweep {
    pub fn new(start_pan: f32, end_pan: f32, tilt: f32, sweep_ms: u32, photo: bool) -> Self {
        Self {
            start_pan,
            end_pan,
            tilt,
            step_delay_ms: sweep_ms / SWEEP_STEPS as u32,
            photo,
            step: 0,
        }
    }

    /// Pan angle at a given step.
    pub fn pan_at(&self, step: u8) -> f32 {
        let t = step.min(SWEEP_STEPS) as f32 / SWEEP_STEPS as f32;
        self.start_pan + (self.end_pan - self.start_pan) * t
    }

    pub fn step_delay_ms(&self) -> u32 {
        self.step_delay_ms
    }
}

impl Routine for CameraSweep {
    fn run(&mut self, _now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        ctx.outputs.write(OutputChannel::Pan, self.pan_at(self.step));
        ctx.outputs.write(OutputChannel::Tilt, self.tilt);
        if self.photo && self.step % SWEEP_PHOTO_INTERVAL == 0 {
            ctx.commands.send(Command::TriggerCamera);
        }

        if self.step >= SWEEP_STEPS {
            return Ok(Step::Done);
        }
        self.step += 1;
        Ok(Step::Rearm(self.step_delay_ms))
    }

    fn channels(&self) -> Channels {
        Channels::GIMBAL
    }

    fn name(&self) -> &'static str {
        "camera_sweep"
    }
}

/// Keep the gimbal pointed at a fixed target.
///
/// Re-aims every 100 ms. Ends when `duration_ms` elapses, and faults with
/// [`RoutineFault::TelemetryUnavailable`] as soon as the vehicle position
/// is unknown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetTracking {
    target: GeoPoint,
    duration_ms: Option<u32>,
    started_at: Option<u64>,
}

impl TargetTracking {
    pub fn new(target: GeoPoint, duration_ms: Option<u32>) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
        }
    }
}

impl Routine for TargetTracking {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        let started = *self.started_at.get_or_insert(now_ms);
        if let Some(duration) = self.duration_ms {
            if now_ms.saturating_sub(started) >= duration as u64 {
                return Ok(Step::Done);
            }
        }

        let position = ctx
            .vehicle
            .position()
            .ok_or(RoutineFault::TelemetryUnavailable)?;
        let (pan, tilt) = gimbal_angles(&position, &self.target, ctx.vehicle.yaw_rad());
        if !pan.is_finite() || !tilt.is_finite() {
            return Err(RoutineFault::InvalidState("orientation not computable"));
        }

        ctx.outputs.write(OutputChannel::Pan, pan);
        ctx.outputs.write(OutputChannel::Tilt, tilt);
        Ok(Step::Rearm(TRACKING_CADENCE_MS))
    }

    fn channels(&self) -> Channels {
        Channels::GIMBAL
    }

    fn name(&self) -> &'static str {
        "target_tracking"
    }
}

/// Set the gimbal once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointGimbal {
    pub pan: f32,
    pub tilt: f32,
}

impl Routine for PointGimbal {
    fn run(&mut self, _now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        ctx.outputs.write(OutputChannel::Pan, self.pan);
        ctx.outputs.write(OutputChannel::Tilt, self.tilt);
        Ok(Step::Done)
    }

    fn channels(&self) -> Channels {
        Channels::GIMBAL
    }

    fn name(&self) -> &'static str {
        "point_gimbal"
    }
}

/// Take one photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Photo;

impl Routine for Photo {
    fn run(&mut self, _now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        ctx.commands.send(Command::TriggerCamera);
        Ok(Step::Done)
    }

    fn name(&self) -> &'static str {
        "photo"
    }
}

/// Record video for a fixed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedRecording {
    duration_ms: u32,
    started_at: Option<u64>,
}

impl TimedRecording {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            started_at: None,
        }
    }
}

impl Routine for TimedRecording {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        let started = match self.started_at {
            Some(t) => t,
            None => {
                ctx.commands.send(Command::StartRecording);
                self.started_at = Some(now_ms);
                now_ms
            }
        };

        if now_ms.saturating_sub(started) >= self.duration_ms as u64 {
            ctx.commands.send(Command::StopRecording);
            return Ok(Step::Done);
        }
        Ok(Step::Rearm(RECORDING_CHECK_MS))
    }

    fn name(&self) -> &'static str {
        "timed_recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::offset;
    use crate::output::MockOutputs;
    use crate::traits::{MockVehicle, RecordingTransport};

    struct Io {
        vehicle: MockVehicle,
        outputs: MockOutputs,
        commands: RecordingTransport,
    }

    impl Io {
        fn new() -> Self {
            Self {
                vehicle: MockVehicle::new(),
                outputs: MockOutputs::new(),
                commands: RecordingTransport::new(),
            }
        }

        fn run<R: Routine>(&mut self, routine: &mut R, now: u64) -> Result<Step, RoutineFault> {
            let mut ctx = RoutineContext {
                vehicle: &self.vehicle,
                outputs: &mut self.outputs,
                commands: &mut self.commands,
            };
            routine.run(now, &mut ctx)
        }
    }

    #[test]
    fn sweep_interpolates_and_triggers_photos() {
        let mut io = Io::new();
        let mut sweep = CameraSweep::new(-90.0, 90.0, -30.0, 10_000, true);
        assert_eq!(sweep.step_delay_ms(), 500);

        let mut pans = [0.0f32; SWEEP_STEPS as usize + 1];
        let mut now = 0;
        for (i, pan) in pans.iter_mut().enumerate() {
            let step = io.run(&mut sweep, now).unwrap();
            *pan = io.outputs.value(OutputChannel::Pan);
            if i < SWEEP_STEPS as usize {
                assert_eq!(step, Step::Rearm(500));
            } else {
                assert_eq!(step, Step::Done);
            }
            now += 500;
        }

        assert_eq!(pans[0], -90.0);
        assert_eq!(pans[10], 0.0);
        assert_eq!(pans[20], 90.0);
        assert!((pans[1] + 81.0).abs() < 1e-3);
        assert_eq!(io.outputs.value(OutputChannel::Tilt), -30.0);
        // Steps 0, 4, 8, 12, 16, 20
        assert_eq!(io.commands.count(|c| *c == Command::TriggerCamera), 6);
    }

    #[test]
    fn sweep_without_photos() {
        let mut io = Io::new();
        let mut sweep = CameraSweep::new(0.0, 45.0, 0.0, 2_000, false);
        while io.run(&mut sweep, 0).unwrap() != Step::Done {}
        assert!(io.commands.sent().is_empty());
        assert_eq!(io.outputs.value(OutputChannel::Pan), 45.0);
    }

    #[test]
    fn tracking_points_at_target() {
        let mut io = Io::new();
        let here = GeoPoint::new(35.0, 139.0, 50.0);
        io.vehicle.set_position(Some(here));
        io.vehicle.set_yaw_rad(core::f32::consts::PI);

        let mut target = offset(&here, 200.0, 0.0);
        target.alt = 50.0;
        let mut tracking = TargetTracking::new(target, None);

        assert_eq!(io.run(&mut tracking, 0), Ok(Step::Rearm(TRACKING_CADENCE_MS)));
        // Target north, vehicle facing south: directly behind
        let pan = io.outputs.value(OutputChannel::Pan);
        assert!((pan.abs() - 180.0).abs() < 0.5);
        assert!(io.outputs.value(OutputChannel::Tilt).abs() < 0.1);
    }

    #[test]
    fn tracking_faults_without_position() {
        let mut io = Io::new();
        let mut tracking = TargetTracking::new(GeoPoint::new(35.0, 139.0, 0.0), None);
        assert_eq!(
            io.run(&mut tracking, 0),
            Err(RoutineFault::TelemetryUnavailable)
        );
        assert!(io.outputs.history().is_empty());
    }

    #[test]
    fn tracking_ends_after_duration() {
        let mut io = Io::new();
        io.vehicle.set_position(Some(GeoPoint::new(35.0, 139.0, 10.0)));
        let mut tracking = TargetTracking::new(GeoPoint::new(35.001, 139.0, 0.0), Some(300));
        assert!(matches!(io.run(&mut tracking, 1_000), Ok(Step::Rearm(_))));
        assert!(matches!(io.run(&mut tracking, 1_200), Ok(Step::Rearm(_))));
        assert_eq!(io.run(&mut tracking, 1_300), Ok(Step::Done));
    }

    #[test]
    fn point_gimbal_and_photo_are_one_shot() {
        let mut io = Io::new();
        let mut point = PointGimbal {
            pan: 30.0,
            tilt: -45.0,
        };
        assert_eq!(io.run(&mut point, 0), Ok(Step::Done));
        assert_eq!(io.outputs.value(OutputChannel::Pan), 30.0);
        assert_eq!(io.outputs.value(OutputChannel::Tilt), -45.0);

        assert_eq!(io.run(&mut Photo, 0), Ok(Step::Done));
        assert_eq!(io.commands.sent(), &[Command::TriggerCamera]);
    }

    #[test]
    fn recording_starts_then_stops_after_duration() {
        let mut io = Io::new();
        let mut recording = TimedRecording::new(2_500);

        assert_eq!(io.run(&mut recording, 10_000), Ok(Step::Rearm(1000)));
        assert_eq!(io.run(&mut recording, 11_000), Ok(Step::Rearm(1000)));
        assert_eq!(io.run(&mut recording, 12_000), Ok(Step::Rearm(1000)));
        assert_eq!(io.run(&mut recording, 13_000), Ok(Step::Done));
        assert_eq!(
            io.commands.sent(),
            &[Command::StartRecording, Command::StopRecording]
        );
    }
}
