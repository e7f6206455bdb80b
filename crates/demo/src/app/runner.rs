use std::io::{self, Write};

use ambition::{
    Camera, InputAction, InputSnapshot, Interactive, PathSearch, Rect, UpdateResult, Vec2,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::ascii;
use super::bootstrap::DemoConfig;
use super::scenario::{builtin_scenario, load_scenario, Scenario, ScenarioError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("failed to write view: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DemoSummary {
    pub(crate) reached: bool,
    pub(crate) path_len: usize,
    pub(crate) explored: usize,
    pub(crate) frames_run: usize,
    pub(crate) exited_early: bool,
    pub(crate) zoom: f32,
    pub(crate) view: Rect,
}

pub(crate) fn run(config: &DemoConfig) -> Result<(), AppError> {
    let stdout = io::stdout();
    let summary = run_demo(config, &mut stdout.lock())?;
    info!(
        reached = summary.reached,
        path_len = summary.path_len,
        explored = summary.explored,
        frames = summary.frames_run,
        exited_early = summary.exited_early,
        zoom = summary.zoom,
        view = %summary.view,
        "demo_finished"
    );
    Ok(())
}

pub(crate) fn run_demo<W: Write>(
    config: &DemoConfig,
    out: &mut W,
) -> Result<DemoSummary, AppError> {
    let scenario = match &config.scenario_path {
        Some(path) => load_scenario(path)?,
        None => builtin_scenario()?,
    };
    run_scenario(&scenario, out)
}

fn run_scenario<W: Write>(scenario: &Scenario, out: &mut W) -> Result<DemoSummary, AppError> {
    info!(
        grid = %scenario.grid,
        start = %scenario.start,
        goal = %scenario.goal,
        heuristic = ?scenario.heuristic,
        "scenario_loaded"
    );

    let search = PathSearch::with_heuristic(
        &scenario.grid,
        scenario.start,
        scenario.goal,
        scenario.heuristic.function(),
    );
    let path = search.path();
    if search.has_result() {
        info!(
            steps = path.len(),
            explored = search.explored(),
            "path_found"
        );
    } else {
        warn!(
            fallback = %search.end_tile(),
            explored = search.explored(),
            "goal_unreachable"
        );
    }

    let focus = scenario.grid.tile_area(search.end_tile()).centre();
    let mut session = ViewerSession::new(scenario, focus);
    let mut frames_run = 0;
    let mut exited_early = false;
    for input in &scenario.frames {
        frames_run += 1;
        if session.process_input(input) == UpdateResult::Exit {
            info!(frame = frames_run, "exit_requested");
            exited_early = true;
            break;
        }
    }

    let camera = session.camera;
    let drawn = ascii::render_view(
        out,
        &scenario.grid,
        &camera,
        &path,
        scenario.start,
        scenario.goal,
    )?;
    debug!(cells = drawn, "view_rendered");

    Ok(DemoSummary {
        reached: search.has_result(),
        path_len: path.len(),
        explored: search.explored(),
        frames_run,
        exited_early,
        zoom: camera.zoom(),
        view: camera.view(),
    })
}

/// Camera driven by scripted input. Confirm recentres on the end of the
/// path and Cancel ends the session.
struct ViewerSession {
    camera: Camera,
    focus: Vec2,
}

impl ViewerSession {
    fn new(scenario: &Scenario, focus: Vec2) -> Self {
        Self {
            camera: Camera::with_config(scenario.camera, scenario.canvas_size, scenario.boundary),
            focus,
        }
    }
}

impl Interactive for ViewerSession {
    fn process_input(&mut self, input: &InputSnapshot) -> UpdateResult {
        if input.was_pressed(InputAction::Cancel) {
            return UpdateResult::Exit;
        }
        if input.was_pressed(InputAction::Confirm) {
            self.camera.set_position(self.focus);
            debug!(focus = %self.focus, view = %self.camera.view(), "camera_focused");
        }
        self.camera.process_input(input)
    }
}
