//! Action variants
//!
//! [`ActionSpec`] is the static, registered description of what a waypoint
//! should do. [`ActionSpec::build`] turns it into a runnable [`Action`] at
//! dispatch time, so parameters are bound late against the active
//! [`ActionParams`].

use crate::output::Channels;
use crate::parameters::ActionParams;
use crate::routines::{
    CameraSweep, GridSurvey, LightPattern, PatternKind, Photo, PointGimbal, Rgb, SurveyGrid,
    TargetTracking, TimedModeRevert, TimedRecording,
};
use crate::scheduler::{Routine, RoutineContext, RoutineFault, Step};
use crate::traits::{GeoPoint, ModeCode};

use super::registry::ActionError;

/// Registered action description
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionSpec {
    /// Light pattern; speed is clamped to the configured bounds
    Lights {
        kind: PatternKind,
        speed: u8,
        color: Rgb,
        duration_ms: Option<u32>,
    },
    /// Pan sweep at fixed tilt
    CameraSweep {
        start_pan: f32,
        end_pan: f32,
        tilt: f32,
        sweep_ms: u32,
        photo: bool,
    },
    /// Keep the gimbal on a ground target
    TrackTarget {
        target: GeoPoint,
        duration_ms: Option<u32>,
    },
    PointGimbal { pan: f32, tilt: f32 },
    Photo,
    Record { duration_ms: u32 },
    /// Optional hold mode, then revert after `duration_ms` (capped by `ACT_LOIT_MAX`)
    HoldThenRevert {
        hold_mode: Option<ModeCode>,
        revert_mode: ModeCode,
        duration_ms: u32,
    },
    /// Lawnmower survey in GUIDED, resuming AUTO when done
    Survey {
        grid: SurveyGrid,
        leg_timeout_ms: u32,
        photo: bool,
    },
}

impl ActionSpec {
    /// Light pattern selected by numeric id (0 off, 1 solid, 2 strobe,
    /// 3 alternate, 4 pulse, 5 rainbow).
    pub fn lights_from_id(
        id: u8,
        speed: u8,
        color: Rgb,
        duration_ms: Option<u32>,
    ) -> Result<Self, ActionError> {
        let kind = PatternKind::from_id(id).ok_or(ActionError::UnknownPattern(id))?;
        Ok(ActionSpec::Lights {
            kind,
            speed,
            color,
            duration_ms,
        })
    }

    /// Instantiate the routine with parameters bound now.
    pub fn build(&self, params: &ActionParams) -> Action {
        match *self {
            ActionSpec::Lights {
                kind,
                speed,
                color,
                duration_ms,
            } => Action::Lights(LightPattern::new(
                kind,
                params.clamp_speed(speed),
                color,
                duration_ms,
            )),
            ActionSpec::CameraSweep {
                start_pan,
                end_pan,
                tilt,
                sweep_ms,
                photo,
            } => Action::Sweep(CameraSweep::new(start_pan, end_pan, tilt, sweep_ms, photo)),
            ActionSpec::TrackTarget {
                target,
                duration_ms,
            } => Action::Track(TargetTracking::new(target, duration_ms)),
            ActionSpec::PointGimbal { pan, tilt } => Action::Point(PointGimbal { pan, tilt }),
            ActionSpec::Photo => Action::Photo(Photo),
            ActionSpec::Record { duration_ms } => Action::Record(TimedRecording::new(duration_ms)),
            ActionSpec::HoldThenRevert {
                hold_mode,
                revert_mode,
                duration_ms,
            } => Action::ModeRevert(TimedModeRevert::new(
                hold_mode,
                revert_mode,
                params.clamp_hold_ms(duration_ms),
            )),
            ActionSpec::Survey {
                grid,
                leg_timeout_ms,
                photo,
            } => Action::Survey(GridSurvey::new(
                grid,
                params.wp_radius,
                leg_timeout_ms,
                photo,
                ModeCode::AUTO,
            )),
        }
    }
}

/// A runnable action, owned by one scheduler task
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Lights(LightPattern),
    Sweep(CameraSweep),
    Track(TargetTracking),
    Point(PointGimbal),
    Photo(Photo),
    Record(TimedRecording),
    ModeRevert(TimedModeRevert),
    Survey(GridSurvey),
}

impl Action {
    fn routine_mut(&mut self) -> &mut dyn Routine {
        match self {
            Action::Lights(r) => r,
            Action::Sweep(r) => r,
            Action::Track(r) => r,
            Action::Point(r) => r,
            Action::Photo(r) => r,
            Action::Record(r) => r,
            Action::ModeRevert(r) => r,
            Action::Survey(r) => r,
        }
    }

    fn routine(&self) -> &dyn Routine {
        match self {
            Action::Lights(r) => r,
            Action::Sweep(r) => r,
            Action::Track(r) => r,
            Action::Point(r) => r,
            Action::Photo(r) => r,
            Action::Record(r) => r,
            Action::ModeRevert(r) => r,
            Action::Survey(r) => r,
        }
    }
}

impl Routine for Action {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        self.routine_mut().run(now_ms, ctx)
    }

    fn channels(&self) -> Channels {
        self.routine().channels()
    }

    fn name(&self) -> &'static str {
        self.routine().name()
    }
}
