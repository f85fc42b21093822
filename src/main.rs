//! STACKMATCH - match the clue to the right OSI layer port before the link
//! drops. All sound is synthesized from raw waveform math at boot.

use bevy::audio::AddAudioSource;
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow, WindowResolution};

mod catalog;
mod grid;
mod hud;
mod particles;
mod port;
mod session;
mod sfx;
mod synth;

use particles::Spark;
use port::Port;
use session::{Phase, Session, Verdict};
use sfx::{PlaySfx, Sfx};

// SETTINGS
pub const SCREEN_W: f32 = 1024.0;
pub const SCREEN_H: f32 = 768.0;
pub const HALF_H: f32 = SCREEN_H / 2.0;

// Gameplay tuning, all in frames at the 60 fps target.
pub const QUESTION_FRAMES: i32 = 600;
pub const FEEDBACK_FRAMES: i32 = 60;
pub const SCORE_PER_HIT: u32 = 100;
pub const WRONG_PENALTY: i32 = 20;
pub const TIMEOUT_PENALTY: i32 = 10;
pub const BURST_COUNT: usize = 40;
pub const GRAVITY: f32 = 0.4;
pub const PARTICLE_SHRINK: f32 = 0.95;
pub const HOVER_RAISE: f32 = 20.0;
pub const EASE_FACTOR: f32 = 0.2;

// Port row layout: seven 90x130 ports with 25 px gaps, centered.
pub const PORT_W: f32 = 90.0;
pub const PORT_H: f32 = 130.0;
pub const PORT_PITCH: f32 = 115.0;
pub const PORT_FIRST_X: f32 = -345.0;
pub const PORT_REST_Y: f32 = -249.0;

// Z layering.
pub const Z_GRID: f32 = -10.0;
pub const Z_PARTICLES: f32 = 5.0;
pub const Z_UI: f32 = 10.0;

// COLORS - CRT phosphor palette.
pub const C_BG: Color = Color::srgb(0.02, 0.02, 0.047);
pub const C_GRID: Color = Color::srgb(0.157, 0.0, 0.235);
pub const C_GRID_LIGHT: Color = Color::srgb(0.314, 0.0, 0.471);
pub const C_TEXT_MAIN: Color = Color::srgb(0.784, 0.941, 1.0);
pub const C_TEXT_DIM: Color = Color::srgb(0.392, 0.392, 0.392);
pub const C_ACCENT_CORRECT: Color = Color::srgb(0.0, 1.0, 0.502);
pub const C_ACCENT_WRONG: Color = Color::srgb(1.0, 0.157, 0.235);
pub const C_ACCENT_ACTIVE: Color = Color::srgb(0.0, 1.0, 1.0);
pub const C_HINT: Color = Color::srgb(1.0, 0.784, 0.0);
pub const C_PORT_BODY: Color = Color::srgb(0.039, 0.039, 0.059);
pub const C_PORT_IDLE: Color = Color::srgb(0.235, 0.235, 0.314);
pub const C_PORT_CONNECTOR: Color = Color::srgb(0.196, 0.196, 0.275);
pub const C_LED_OFF: Color = Color::srgb(0.078, 0.078, 0.078);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "STACKMATCH".into(),
                resolution: WindowResolution::new(SCREEN_W, SCREEN_H),
                resizable: false,
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_audio_source::<synth::SfxBuffer>()
        .insert_resource(ClearColor(C_BG))
        .insert_resource(Session::new(&mut rand::rng()))
        .init_resource::<grid::GridScroll>()
        .add_event::<PlaySfx>()
        .add_systems(
            Startup,
            (
                setup_camera,
                grid::spawn_grid,
                port::spawn_ports,
                hud::setup_hud,
                sfx::setup_sfx,
            ),
        )
        // One chain so the per-frame order is fixed: shake decay, particles,
        // input, state stepping, then port hover easing.
        .add_systems(
            Update,
            (
                decay_shake,
                particles::update_sparks,
                handle_restart,
                handle_click,
                run_tick,
                feedback_tick,
                port::update_ports,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                grid::scroll_grid,
                port::render_ports,
                hud::sync_hud,
                hud::draw_overlay,
                sfx::play_sfx,
            ),
        )
        .run();
}

fn setup_camera(mut cmd: Commands) {
    cmd.spawn(Camera2d);
    info!("kernel up: {} prompts in catalog", catalog::CATALOG.len());
}

/// Pointer position in world coordinates, when it is inside the window.
pub fn cursor_world(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cam: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let win = windows.get_single().ok()?;
    let (camera, cam_transform) = cam.get_single().ok()?;
    let cursor = win.cursor_position()?;
    camera.viewport_to_world_2d(cam_transform, cursor).ok()
}

/// Primary click: boots the game from the menu, otherwise resolves a port
/// hit during RUN. Clicks are inert in FEEDBACK and GAMEOVER.
fn handle_click(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cam: Query<(&Camera, &GlobalTransform)>,
    mut session: ResMut<Session>,
    mut ports: Query<(&mut Port, &Transform)>,
    mut cmd: Commands,
    mut sfx: EventWriter<PlaySfx>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let mut rng = rand::rng();

    match session.phase {
        Phase::Menu => {
            session.soft_reset(&mut rng);
            sfx.send(PlaySfx(Sfx::Boot));
        }
        Phase::Run => {
            let Some(cursor) = cursor_world(&windows, &cam) else {
                return;
            };
            let Some(clicked) = ports
                .iter()
                .find(|(_, t)| port::hit(t.translation.truncate(), cursor))
                .map(|(p, _)| p.layer)
            else {
                return;
            };

            let wanted = session.prompt.layer;
            match session.answer(clicked, &mut rng) {
                Verdict::Correct => {
                    particles::spawn_burst(&mut cmd, cursor, C_ACCENT_CORRECT, BURST_COUNT);
                    sfx.send(PlaySfx(Sfx::Correct));
                }
                Verdict::Wrong => {
                    particles::spawn_burst(&mut cmd, cursor, C_ACCENT_WRONG, BURST_COUNT);
                    sfx.send(PlaySfx(Sfx::Wrong));
                    // Mark the mistake and hint the port that was wanted.
                    for (mut p, _) in &mut ports {
                        if p.layer == clicked {
                            p.highlight = Some(C_ACCENT_WRONG);
                        } else if p.layer == wanted {
                            p.highlight = Some(C_HINT);
                        }
                    }
                }
                Verdict::Fatal => {
                    particles::spawn_burst(&mut cmd, cursor, C_ACCENT_WRONG, BURST_COUNT);
                    sfx.send(PlaySfx(Sfx::Wrong));
                }
            }
        }
        Phase::Feedback | Phase::GameOver => {}
    }
}

/// [R] restarts from any state: clear particles and highlights, reshuffle
/// the pool, back to RUN.
fn handle_restart(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<Session>,
    mut ports: Query<&mut Port>,
    sparks: Query<Entity, With<Spark>>,
    mut cmd: Commands,
    mut sfx: EventWriter<PlaySfx>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    for entity in &sparks {
        cmd.entity(entity).despawn();
    }
    for mut p in &mut ports {
        p.highlight = None;
    }
    session.soft_reset(&mut rand::rng());
    sfx.send(PlaySfx(Sfx::Boot));
    info!("soft reset, {} prompts queued", session.pool_remaining());
}

fn run_tick(
    mut session: ResMut<Session>,
    mut ports: Query<&mut Port>,
    mut sfx: EventWriter<PlaySfx>,
) {
    if session.phase != Phase::Run {
        return;
    }
    let tick = session.step_run(&mut rand::rng());
    if tick.typed {
        sfx.send(PlaySfx(Sfx::Type));
    }
    if tick.timed_out {
        for mut p in &mut ports {
            p.highlight = None;
        }
    }
}

fn feedback_tick(mut session: ResMut<Session>, mut ports: Query<&mut Port>) {
    if session.phase != Phase::Feedback {
        return;
    }
    if session.step_feedback(&mut rand::rng()) {
        for mut p in &mut ports {
            p.highlight = None;
        }
    }
}

/// Offsets the camera by the current shake magnitude, re-rolled every frame,
/// and decays the magnitude by one per frame.
fn decay_shake(mut session: ResMut<Session>, mut cam: Query<&mut Transform, With<Camera2d>>) {
    let (ox, oy) = session.shake_offset(&mut rand::rng());
    for mut transform in &mut cam {
        transform.translation.x = ox;
        transform.translation.y = oy;
    }
}
