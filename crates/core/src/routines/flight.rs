//! Flight maneuver routines
//!
//! Both routines express "do X, then after some condition do Y" as a state
//! machine re-armed through the scheduler. Neither waits inline.

use heapless::Vec;

use crate::navigation::{distance_bearing, offset};
use crate::scheduler::{Routine, RoutineContext, RoutineFault, Step};
use crate::traits::{Command, GeoPoint, ModeCode};

/// Elapsed-time check cadence for [`TimedModeRevert`]
pub const MODE_REVERT_CHECK_MS: u32 = 1000;

/// Arrival check cadence for [`GridSurvey`]
pub const SURVEY_POLL_MS: u32 = 500;

/// Maximum number of survey points (two per row)
pub const MAX_SURVEY_POINTS: usize = 32;

/// Hold a mode for a fixed time, then switch to another.
///
/// On the first step the optional hold mode is requested (for example
/// LOITER); once `duration_ms` has elapsed the revert mode is requested and
/// the routine finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedModeRevert {
    hold_mode: Option<ModeCode>,
    revert_mode: ModeCode,
    duration_ms: u32,
    started_at: Option<u64>,
}

impl TimedModeRevert {
    pub fn new(hold_mode: Option<ModeCode>, revert_mode: ModeCode, duration_ms: u32) -> Self {
        Self {
            hold_mode,
            revert_mode,
            duration_ms,
            started_at: None,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

impl Routine for TimedModeRevert {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        let started = match self.started_at {
            Some(t) => t,
            None => {
                if let Some(mode) = self.hold_mode {
                    ctx.commands.send(Command::SetMode(mode));
                }
                self.started_at = Some(now_ms);
                now_ms
            }
        };

        if now_ms.saturating_sub(started) >= self.duration_ms as u64 {
            ctx.commands.send(Command::SetMode(self.revert_mode));
            return Ok(Step::Done);
        }
        Ok(Step::Rearm(MODE_REVERT_CHECK_MS))
    }

    fn name(&self) -> &'static str {
        "timed_mode_revert"
    }
}

/// Lawnmower grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurveyGrid {
    /// Number of parallel legs
    pub rows: u8,
    /// Distance between legs (meters, northwards)
    pub spacing_m: f32,
    /// Length of each leg (meters, eastwards)
    pub leg_m: f32,
}

impl SurveyGrid {
    /// Corner points of the grid, starting at `origin` and alternating
    /// direction on every row. Rows beyond capacity are dropped.
    pub fn points(&self, origin: &GeoPoint) -> Vec<GeoPoint, MAX_SURVEY_POINTS> {
        let mut points = Vec::new();
        for row in 0..self.rows {
            let north = row as f32 * self.spacing_m;
            let (from, to) = if row % 2 == 0 {
                (0.0, self.leg_m)
            } else {
                (self.leg_m, 0.0)
            };
            if points.push(offset(origin, north, from)).is_err()
                || points.push(offset(origin, north, to)).is_err()
            {
                break;
            }
        }
        points
    }
}

#[derive(Clone, Debug, PartialEq)]
enum SurveyState {
    Start,
    Flying { index: u8, since: u64 },
}

/// Fly a survey grid in GUIDED, then resume a mode.
///
/// The grid is laid out from the vehicle position at the first step. Each
/// point is sent as a single `GotoPosition`; the routine then polls every
/// 500 ms until the vehicle is within `radius_m` of it or `leg_timeout_ms`
/// elapses, optionally taking a photo on arrival.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSurvey {
    grid: SurveyGrid,
    radius_m: f32,
    leg_timeout_ms: u32,
    photo: bool,
    resume_mode: ModeCode,
    points: Vec<GeoPoint, MAX_SURVEY_POINTS>,
    state: SurveyState,
}

impl GridSurvey {
    pub fn new(
        grid: SurveyGrid,
        radius_m: f32,
        leg_timeout_ms: u32,
        photo: bool,
        resume_mode: ModeCode,
    ) -> Self {
        Self {
            grid,
            radius_m,
            leg_timeout_ms,
            photo,
            resume_mode,
            points: Vec::new(),
            state: SurveyState::Start,
        }
    }

    /// Index of the point being flown to, if started.
    pub fn current_point(&self) -> Option<u8> {
        match self.state {
            SurveyState::Start => None,
            SurveyState::Flying { index, .. } => Some(index),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    fn arrived(&self, position: Option<GeoPoint>, index: u8) -> bool {
        match (position, self.points.get(index as usize)) {
            (Some(here), Some(target)) => distance_bearing(&here, target).0 < self.radius_m,
            _ => false,
        }
    }
}

impl Routine for GridSurvey {
    fn run(&mut self, now_ms: u64, ctx: &mut RoutineContext<'_>) -> Result<Step, RoutineFault> {
        match self.state {
            SurveyState::Start => {
                let origin = ctx
                    .vehicle
                    .position()
                    .ok_or(RoutineFault::TelemetryUnavailable)?;
                self.points = self.grid.points(&origin);
                let first = *self
                    .points
                    .first()
                    .ok_or(RoutineFault::InvalidState("empty survey grid"))?;

                ctx.commands.send(Command::SetMode(ModeCode::GUIDED));
                ctx.commands.send(Command::GotoPosition(first));
                self.state = SurveyState::Flying {
                    index: 0,
                    since: now_ms,
                };
                Ok(Step::Rearm(SURVEY_POLL_MS))
            }
            SurveyState::Flying { index, since } => {
                let arrived = self.arrived(ctx.vehicle.position(), index);
                let timed_out = now_ms.saturating_sub(since) >= self.leg_timeout_ms as u64;
                if !arrived && !timed_out {
                    return Ok(Step::Rearm(SURVEY_POLL_MS));
                }

                if arrived && self.photo {
                    ctx.commands.send(Command::TriggerCamera);
                }

                let next = index + 1;
                match self.points.get(next as usize) {
                    Some(point) => {
                        ctx.commands.send(Command::GotoPosition(*point));
                        self.state = SurveyState::Flying {
                            index: next,
                            since: now_ms,
                        };
                        Ok(Step::Rearm(SURVEY_POLL_MS))
                    }
                    None => {
                        ctx.commands.send(Command::SetMode(self.resume_mode));
                        Ok(Step::Done)
                    }
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "grid_survey"
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
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

    const ORIGIN: GeoPoint = GeoPoint::new(35.0, 139.0, 20.0);

    #[test]
    fn mode_revert_holds_then_reverts() {
        let mut io = Io::new();
        let mut revert = TimedModeRevert::new(Some(ModeCode::LOITER), ModeCode::AUTO, 3_000);

        assert_eq!(io.run(&mut revert, 500), Ok(Step::Rearm(1000)));
        assert_eq!(io.commands.sent(), &[Command::SetMode(ModeCode::LOITER)]);

        assert_eq!(io.run(&mut revert, 1_500), Ok(Step::Rearm(1000)));
        assert_eq!(io.run(&mut revert, 2_500), Ok(Step::Rearm(1000)));
        assert_eq!(io.commands.sent().len(), 1);

        assert_eq!(io.run(&mut revert, 3_500), Ok(Step::Done));
        assert_eq!(
            io.commands.sent(),
            &[
                Command::SetMode(ModeCode::LOITER),
                Command::SetMode(ModeCode::AUTO)
            ]
        );
    }

    #[test]
    fn mode_revert_zero_duration_reverts_immediately() {
        let mut io = Io::new();
        let mut revert = TimedModeRevert::new(None, ModeCode::RTL, 0);
        assert_eq!(io.run(&mut revert, 0), Ok(Step::Done));
        assert_eq!(io.commands.sent(), &[Command::SetMode(ModeCode::RTL)]);
    }

    #[test]
    fn grid_points_alternate_direction() {
        let grid = SurveyGrid {
            rows: 3,
            spacing_m: 10.0,
            leg_m: 50.0,
        };
        let points = grid.points(&ORIGIN);
        assert_eq!(points.len(), 6);

        let (d, _) = distance_bearing(&ORIGIN, &points[1]);
        assert!((d - 50.0).abs() < 0.5);
        // Second row starts at the far end
        let (d, _) = distance_bearing(&points[1], &points[2]);
        assert!((d - 10.0).abs() < 0.5);
        let (d, _) = distance_bearing(&ORIGIN, &points[3]);
        assert!((d - 10.0).abs() < 0.5);
    }

    #[test]
    fn grid_points_capped_at_capacity() {
        let grid = SurveyGrid {
            rows: 40,
            spacing_m: 5.0,
            leg_m: 20.0,
        };
        assert_eq!(grid.points(&ORIGIN).len(), MAX_SURVEY_POINTS);
    }

    fn survey(photo: bool) -> GridSurvey {
        GridSurvey::new(
            SurveyGrid {
                rows: 2,
                spacing_m: 20.0,
                leg_m: 40.0,
            },
            5.0,
            60_000,
            photo,
            ModeCode::AUTO,
        )
    }

    #[test]
    fn survey_visits_every_point_then_resumes() {
        let mut io = Io::new();
        io.vehicle.set_position(Some(ORIGIN));
        let mut routine = survey(true);

        assert_eq!(io.run(&mut routine, 0), Ok(Step::Rearm(SURVEY_POLL_MS)));
        assert_eq!(io.commands.sent()[0], Command::SetMode(ModeCode::GUIDED));
        assert_eq!(routine.current_point(), Some(0));
        let points: std::vec::Vec<GeoPoint> = routine.points().to_vec();
        assert_eq!(points.len(), 4);

        let mut now = 0;
        for (i, point) in points.iter().enumerate() {
            io.vehicle.set_position(Some(*point));
            now += SURVEY_POLL_MS as u64;
            let step = io.run(&mut routine, now).unwrap();
            if i + 1 < points.len() {
                assert_eq!(step, Step::Rearm(SURVEY_POLL_MS));
                assert_eq!(routine.current_point(), Some(i as u8 + 1));
            } else {
                assert_eq!(step, Step::Done);
            }
        }

        let gotos = io
            .commands
            .count(|c| matches!(c, Command::GotoPosition(_)));
        assert_eq!(gotos, 4);
        assert_eq!(io.commands.count(|c| *c == Command::TriggerCamera), 4);
        assert_eq!(
            io.commands.sent().last(),
            Some(&Command::SetMode(ModeCode::AUTO))
        );
    }

    #[test]
    fn survey_waits_while_en_route() {
        let mut io = Io::new();
        io.vehicle.set_position(Some(ORIGIN));
        let mut routine = survey(false);
        io.run(&mut routine, 0).unwrap();

        // Point 0 is the origin itself; move the vehicle away first
        io.vehicle.set_position(Some(offset(&ORIGIN, -100.0, 0.0)));
        for i in 1..10 {
            let step = io.run(&mut routine, i * SURVEY_POLL_MS as u64).unwrap();
            assert_eq!(step, Step::Rearm(SURVEY_POLL_MS));
            assert_eq!(routine.current_point(), Some(0));
        }
    }

    #[test]
    fn survey_leg_timeout_skips_point_without_photo() {
        let mut io = Io::new();
        io.vehicle.set_position(Some(ORIGIN));
        let mut routine = GridSurvey::new(
            SurveyGrid {
                rows: 1,
                spacing_m: 10.0,
                leg_m: 30.0,
            },
            2.0,
            1_000,
            true,
            ModeCode::RTL,
        );
        io.run(&mut routine, 0).unwrap();
        io.vehicle.set_position(None);

        assert_eq!(io.run(&mut routine, 500), Ok(Step::Rearm(SURVEY_POLL_MS)));
        assert_eq!(io.run(&mut routine, 1_000), Ok(Step::Rearm(SURVEY_POLL_MS)));
        assert_eq!(routine.current_point(), Some(1));
        assert_eq!(io.run(&mut routine, 2_000), Ok(Step::Done));
        assert_eq!(io.commands.count(|c| *c == Command::TriggerCamera), 0);
        assert_eq!(
            io.commands.sent().last(),
            Some(&Command::SetMode(ModeCode::RTL))
        );
    }

    #[test]
    fn survey_needs_position_to_start() {
        let mut io = Io::new();
        let mut routine = survey(false);
        assert_eq!(
            io.run(&mut routine, 0),
            Err(RoutineFault::TelemetryUnavailable)
        );
        assert!(io.commands.sent().is_empty());
    }

    #[test]
    fn survey_with_no_rows_is_invalid() {
        let mut io = Io::new();
        io.vehicle.set_position(Some(ORIGIN));
        let mut routine = GridSurvey::new(
            SurveyGrid {
                rows: 0,
                spacing_m: 10.0,
                leg_m: 10.0,
            },
            2.0,
            1_000,
            false,
            ModeCode::AUTO,
        );
        assert_eq!(
            io.run(&mut routine, 0),
            Err(RoutineFault::InvalidState("empty survey grid"))
        );
    }
}
