//! Waypoint action dispatcher
//!
//! Glue between the control loop and the action core. One [`update`] call
//! per control-loop iteration:
//!
//! 1. run every scheduled routine that is due
//! 2. poll the arrival detector
//! 3. on an arrival edge, dispatch the waypoint's action
//!
//! Newly dispatched actions therefore take their first step on the next
//! update, never inside the update that detected the arrival.
//!
//! Nothing here fails the caller. Unmapped waypoints, invalid pattern ids,
//! a full task table and routine faults are logged and otherwise ignored.
//!
//! [`update`]: ActionDispatcher::update

use trail_actions_core::actions::{
    Action, ActionError, ActionRegistry, ActionSpec, DispatchOutcome,
};
use trail_actions_core::output::{reset_channels, OutputSink};
use trail_actions_core::parameters::ActionParams;
use trail_actions_core::routines::Rgb;
use trail_actions_core::scheduler::{
    Routine, RoutineContext, Scheduler, SchedulerEvent, SchedulerStats,
};
use trail_actions_core::traits::{CommandTransport, MissionProgress, VehicleState};
use trail_actions_core::waypoint::ArrivalDetector;

use crate::log_buffer::{LogLevel, RingBufferSink};

/// Maximum concurrently live routines
pub const MAX_TASKS: usize = 16;

/// Maximum waypoint bindings (power of two)
pub const MAX_BINDINGS: usize = 64;

/// Host collaborators for one update
pub struct ActionIo<'a> {
    pub vehicle: &'a dyn VehicleState,
    pub mission: &'a dyn MissionProgress,
    pub outputs: &'a mut dyn OutputSink,
    pub commands: &'a mut dyn CommandTransport,
}

/// Log through the macros and into the dispatcher's ring buffer.
macro_rules! record {
    ($sink:expr, Debug, $($arg:tt)*) => {{
        crate::log_debug!($($arg)*);
        $sink.log(LogLevel::Debug, format_args!($($arg)*));
    }};
    ($sink:expr, Info, $($arg:tt)*) => {{
        crate::log_info!($($arg)*);
        $sink.log(LogLevel::Info, format_args!($($arg)*));
    }};
    ($sink:expr, Warn, $($arg:tt)*) => {{
        crate::log_warn!($($arg)*);
        $sink.log(LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Detector, registry and scheduler driven as one unit
pub struct ActionDispatcher {
    params: ActionParams,
    detector: ArrivalDetector,
    registry: ActionRegistry<MAX_BINDINGS>,
    scheduler: Scheduler<Action, MAX_TASKS>,
    logs: RingBufferSink,
}

impl ActionDispatcher {
    pub fn new(params: ActionParams) -> Self {
        let detector = ArrivalDetector::new(params.detector_config());
        Self {
            params,
            detector,
            registry: ActionRegistry::new(),
            scheduler: Scheduler::new(),
            logs: RingBufferSink::new(),
        }
    }

    pub fn params(&self) -> &ActionParams {
        &self.params
    }

    /// Bind an action to a waypoint index, replacing any earlier binding.
    pub fn register(&mut self, index: u16, spec: ActionSpec, delay_ms: u32) -> Result<(), ActionError> {
        match self.registry.register(index, spec, delay_ms) {
            Ok(Some(_)) => {
                record!(self.logs, Debug, "WP{}: binding replaced", index);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                record!(self.logs, Warn, "WP{}: {}", index, e);
                Err(e)
            }
        }
    }

    /// Bind a light pattern selected by numeric id.
    ///
    /// Unknown ids are logged and leave the registry unchanged.
    pub fn register_pattern_id(
        &mut self,
        index: u16,
        pattern_id: u8,
        speed: u8,
        color: Rgb,
        duration_ms: Option<u32>,
    ) -> Result<(), ActionError> {
        match ActionSpec::lights_from_id(pattern_id, speed, color, duration_ms) {
            Ok(spec) => self.register(index, spec, 0),
            Err(e) => {
                record!(self.logs, Warn, "WP{}: {}", index, e);
                Err(e)
            }
        }
    }

    pub fn unregister(&mut self, index: u16) -> bool {
        self.registry.unregister(index).is_some()
    }

    pub fn bindings(&self) -> usize {
        self.registry.len()
    }

    /// Advance routines and react to waypoint arrival.
    ///
    /// Returns the waypoint index whose arrival edge fired in this update.
    pub fn update(&mut self, now_ms: u64, io: &mut ActionIo<'_>) -> Option<u16> {
        let events = {
            let mut ctx = RoutineContext {
                vehicle: io.vehicle,
                outputs: &mut *io.outputs,
                commands: &mut *io.commands,
            };
            self.scheduler.tick(now_ms, &mut ctx)
        };
        for event in events.iter() {
            self.log_event(event);
        }

        let index = self.detector.poll(io.vehicle, io.mission)?;
        record!(self.logs, Info, "WP{} reached", index);

        match self
            .registry
            .dispatch(index, &self.params, &mut self.scheduler, &mut *io.outputs)
        {
            Ok(DispatchOutcome::Unmapped) => {
                record!(self.logs, Debug, "WP{}: no action", index);
            }
            Ok(DispatchOutcome::Scheduled { handle, replaced }) => {
                let name = self
                    .scheduler
                    .routine(handle)
                    .map(|action| action.name())
                    .unwrap_or("?");
                record!(self.logs, Info, "WP{}: {} started as {}", index, name, handle);
                if !replaced.is_empty() {
                    record!(self.logs, Debug, "WP{}: superseded running outputs", index);
                }
            }
            Err(e) => {
                record!(self.logs, Warn, "WP{}: action not started: {}", index, e);
            }
        }
        Some(index)
    }

    /// Start a fresh mission run: forget arrivals, stop every routine and
    /// zero the outputs they owned.
    pub fn reset_mission(&mut self, outputs: &mut dyn OutputSink) {
        self.detector.reset();
        let released = self.scheduler.cancel_all();
        reset_channels(outputs, released);
        record!(self.logs, Info, "Mission reset");
    }

    /// Number of live routines
    pub fn live_tasks(&self) -> usize {
        self.scheduler.live_count()
    }

    pub fn stats(&self) -> &SchedulerStats {
        self.scheduler.stats()
    }

    pub fn logs(&self) -> &RingBufferSink {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut RingBufferSink {
        &mut self.logs
    }

    fn log_event(&mut self, event: &SchedulerEvent) {
        match event {
            SchedulerEvent::Completed { handle, name } => {
                record!(self.logs, Debug, "{} {} finished", name, handle);
            }
            SchedulerEvent::Faulted {
                handle,
                name,
                fault,
            } => {
                record!(self.logs, Warn, "{} {} aborted: {}", name, handle, fault);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trail_actions_core::output::{MockOutputs, OutputChannel};
    use trail_actions_core::routines::PatternKind;
    use trail_actions_core::traits::{Command, MockMission, MockVehicle, ModeCode, RecordingTransport};

    struct Host {
        vehicle: MockVehicle,
        mission: MockMission,
        outputs: MockOutputs,
        commands: RecordingTransport,
    }

    impl Host {
        fn new() -> Self {
            Self {
                vehicle: MockVehicle::new(),
                mission: MockMission::new(),
                outputs: MockOutputs::new(),
                commands: RecordingTransport::new(),
            }
        }

        fn update(&mut self, dispatcher: &mut ActionDispatcher, now: u64) -> Option<u16> {
            let mut io = ActionIo {
                vehicle: &self.vehicle,
                mission: &self.mission,
                outputs: &mut self.outputs,
                commands: &mut self.commands,
            };
            dispatcher.update(now, &mut io)
        }
    }

    #[test]
    fn arrival_starts_action_on_next_update() {
        let mut dispatcher = ActionDispatcher::new(ActionParams::default());
        dispatcher.register(2, ActionSpec::Photo, 0).unwrap();
        let mut host = Host::new();

        host.mission.set_target(2, Some(3.0));
        assert_eq!(host.update(&mut dispatcher, 0), Some(2));
        assert_eq!(dispatcher.live_tasks(), 1);
        assert!(host.commands.sent().is_empty());

        assert_eq!(host.update(&mut dispatcher, 100), None);
        assert_eq!(host.commands.sent(), &[Command::TriggerCamera]);
        assert_eq!(dispatcher.live_tasks(), 0);
        assert_eq!(dispatcher.stats().completions, 1);
    }

    #[test]
    fn unmapped_arrival_is_logged_only() {
        let mut dispatcher = ActionDispatcher::new(ActionParams::default());
        let mut host = Host::new();
        host.mission.set_target(7, Some(1.0));

        assert_eq!(host.update(&mut dispatcher, 0), Some(7));
        assert_eq!(dispatcher.live_tasks(), 0);
        assert!(dispatcher
            .logs()
            .iter()
            .any(|m| m.message.as_str() == "WP7: no action"));
    }

    #[test]
    fn invalid_pattern_id_warns_without_binding() {
        let mut dispatcher = ActionDispatcher::new(ActionParams::default());
        assert_eq!(
            dispatcher.register_pattern_id(1, 42, 5, Rgb::WHITE, None),
            Err(ActionError::UnknownPattern(42))
        );
        assert_eq!(dispatcher.bindings(), 0);
        assert_eq!(dispatcher.logs().count_at_least(LogLevel::Warn), 1);

        dispatcher
            .register_pattern_id(1, PatternKind::Pulse as u8, 5, Rgb::GREEN, None)
            .unwrap();
        assert_eq!(dispatcher.bindings(), 1);
    }

    #[test]
    fn routine_fault_is_logged_and_isolated() {
        let mut dispatcher = ActionDispatcher::new(ActionParams::default());
        dispatcher
            .register(
                1,
                ActionSpec::TrackTarget {
                    target: trail_actions_core::traits::GeoPoint::new(35.0, 139.0, 0.0),
                    duration_ms: None,
                },
                0,
            )
            .unwrap();
        let mut host = Host::new();
        host.mission.set_target(1, Some(1.0));

        host.update(&mut dispatcher, 0);
        host.update(&mut dispatcher, 100);

        assert_eq!(dispatcher.live_tasks(), 0);
        assert_eq!(dispatcher.stats().faults, 1);
        assert!(dispatcher
            .logs()
            .iter()
            .any(|m| m.level == LogLevel::Warn && m.message.contains("telemetry unavailable")));
    }

    #[test]
    fn reset_mission_stops_routines_and_rearms_detector() {
        let mut dispatcher = ActionDispatcher::new(ActionParams::default());
        dispatcher
            .register(
                1,
                ActionSpec::Lights {
                    kind: PatternKind::Solid,
                    speed: 1,
                    color: Rgb::BLUE,
                    duration_ms: None,
                },
                0,
            )
            .unwrap();
        dispatcher
            .register(
                2,
                ActionSpec::HoldThenRevert {
                    hold_mode: Some(ModeCode::LOITER),
                    revert_mode: ModeCode::AUTO,
                    duration_ms: 10_000,
                },
                0,
            )
            .unwrap();
        let mut host = Host::new();

        host.mission.set_target(1, Some(1.0));
        host.update(&mut dispatcher, 0);
        host.update(&mut dispatcher, 100);
        assert_eq!(host.outputs.value(OutputChannel::Blue), 100.0);

        host.mission.set_target(2, Some(1.0));
        host.update(&mut dispatcher, 200);
        host.update(&mut dispatcher, 300);
        assert_eq!(dispatcher.live_tasks(), 1);

        dispatcher.reset_mission(&mut host.outputs);
        assert_eq!(dispatcher.live_tasks(), 0);

        // Same waypoint fires again after a reset
        assert_eq!(host.update(&mut dispatcher, 400), Some(2));
    }
}
