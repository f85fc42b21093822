//! HUD, menu and game-over overlays, and the greedy word wrap applied to the
//! typewriter text every frame.

use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::text::{JustifyText, TextLayout};

use crate::port::Port;
use crate::session::{Phase, Session};
use crate::{
    C_ACCENT_CORRECT, C_ACCENT_WRONG, C_GRID_LIGHT, C_HINT, C_TEXT_DIM, C_TEXT_MAIN,
    QUESTION_FRAMES, Z_UI,
};

/// Column budget for the question panel (panel width minus padding, divided
/// by the nominal glyph advance of the 24pt font).
pub const QUESTION_COLS: usize = 56;

const BAR_W: f32 = 300.0;
const BAR_LEFT_X: f32 = -492.0;
const TIMER_MAX_W: f32 = 824.0;
const PANEL_POS: Vec2 = Vec2::new(0.0, 209.0);
const PANEL_SIZE: Vec2 = Vec2::new(824.0, 150.0);

#[derive(Component)]
pub struct MenuUi;
#[derive(Component)]
pub struct HudUi;
#[derive(Component)]
pub struct OverUi;
#[derive(Component)]
pub struct ScoreText;
#[derive(Component)]
pub struct QuestionText;
#[derive(Component)]
pub struct FinalScoreText;
#[derive(Component)]
pub struct IntegrityFill;
#[derive(Component)]
pub struct TimerFill;

/// Greedy word wrap into lines of at most `max_cols` characters. Recomputed
/// from the revealed substring every frame; a single overlong word gets a
/// line of its own.
pub fn wrap(text: &str, max_cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if !line.is_empty() && candidate > max_cols {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    lines.push(line);
    lines
}

pub fn setup_hud(mut cmd: Commands) {
    // Menu splash.
    cmd.spawn((
        Text2d::new("STACKMATCH"),
        TextFont {
            font_size: 60.0,
            ..default()
        },
        TextColor(C_ACCENT_CORRECT),
        Transform::from_xyz(0.0, 84.0, Z_UI),
        MenuUi,
    ));
    cmd.spawn((
        Text2d::new("SYSTEM READY // CLICK TO BOOT"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(C_TEXT_MAIN),
        Transform::from_xyz(0.0, 4.0, Z_UI),
        MenuUi,
    ));

    // Integrity bar, score and restart hint.
    cmd.spawn((
        Sprite::from_color(Color::srgb(0.196, 0.0, 0.0), Vec2::new(BAR_W, 20.0)),
        Transform::from_xyz(BAR_LEFT_X + BAR_W / 2.0, 354.0, 1.0),
        HudUi,
    ));
    cmd.spawn((
        Sprite::from_color(C_ACCENT_CORRECT, Vec2::new(BAR_W, 20.0)),
        Transform::from_xyz(BAR_LEFT_X + BAR_W / 2.0, 354.0, 2.0),
        HudUi,
        IntegrityFill,
    ));
    cmd.spawn((
        Text2d::new("SCORE: 0"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(C_TEXT_MAIN),
        Anchor::TopLeft,
        Transform::from_xyz(262.0, 364.0, Z_UI),
        HudUi,
        ScoreText,
    ));
    cmd.spawn((
        Text2d::new("[R] RESTART"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(C_TEXT_DIM),
        Anchor::TopLeft,
        Transform::from_xyz(262.0, 334.0, Z_UI),
        HudUi,
    ));

    // Question panel with typewriter text and countdown bar beneath it.
    cmd.spawn((
        Sprite::from_color(Color::srgba(0.0, 0.0, 0.0, 0.8), PANEL_SIZE),
        Transform::from_xyz(PANEL_POS.x, PANEL_POS.y, 1.0),
        HudUi,
    ));
    cmd.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(C_TEXT_MAIN),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_xyz(PANEL_POS.x, PANEL_POS.y, 2.0),
        HudUi,
        QuestionText,
    ));
    cmd.spawn((
        Sprite::from_color(C_HINT, Vec2::new(TIMER_MAX_W, 5.0)),
        Transform::from_xyz(0.0, 121.5, 1.0),
        HudUi,
        TimerFill,
    ));

    // Game-over screen.
    cmd.spawn((
        Text2d::new("CONNECTION LOST"),
        TextFont {
            font_size: 60.0,
            ..default()
        },
        TextColor(C_ACCENT_WRONG),
        Transform::from_xyz(0.0, 104.0, Z_UI),
        OverUi,
    ));
    cmd.spawn((
        Text2d::new("FINAL SCORE: 0"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(C_TEXT_MAIN),
        Transform::from_xyz(0.0, 42.0, Z_UI),
        OverUi,
        FinalScoreText,
    ));
    cmd.spawn((
        Text2d::new("PRESS [R] TO REBOOT"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(C_HINT),
        Transform::from_xyz(0.0, -28.0, Z_UI),
        OverUi,
    ));
}

#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn sync_hud(
    session: Res<Session>,
    mut menu: Query<&mut Visibility, With<MenuUi>>,
    mut hud: Query<&mut Visibility, (With<HudUi>, Without<MenuUi>)>,
    mut over: Query<&mut Visibility, (With<OverUi>, Without<MenuUi>, Without<HudUi>)>,
    mut port_vis: Query<
        &mut Visibility,
        (With<Port>, Without<MenuUi>, Without<HudUi>, Without<OverUi>),
    >,
    mut score: Query<&mut Text2d, With<ScoreText>>,
    mut question: Query<&mut Text2d, (With<QuestionText>, Without<ScoreText>)>,
    mut final_score: Query<
        &mut Text2d,
        (With<FinalScoreText>, Without<ScoreText>, Without<QuestionText>),
    >,
    mut integrity: Query<(&mut Sprite, &mut Transform), (With<IntegrityFill>, Without<TimerFill>)>,
    mut timer: Query<(&mut Sprite, &mut Transform), (With<TimerFill>, Without<IntegrityFill>)>,
) {
    let vis = |shown| if shown { Visibility::Visible } else { Visibility::Hidden };
    let in_game = matches!(session.phase, Phase::Run | Phase::Feedback);

    for mut v in &mut menu {
        *v = vis(session.phase == Phase::Menu);
    }
    for mut v in &mut hud {
        *v = vis(in_game);
    }
    for mut v in &mut over {
        *v = vis(session.phase == Phase::GameOver);
    }
    for mut v in &mut port_vis {
        *v = vis(in_game);
    }

    for mut text in &mut score {
        text.0 = format!("SCORE: {}", session.score);
    }
    for mut text in &mut final_score {
        text.0 = format!("FINAL SCORE: {}", session.score);
    }

    let shown = wrap(session.revealed_text(), QUESTION_COLS).join("\n");
    for mut text in &mut question {
        if text.0 != shown {
            text.0.clone_from(&shown);
        }
    }

    // Negative integrity must never render a negative-width bar.
    let level = session.integrity.clamp(0, 100) as f32;
    for (mut sprite, mut transform) in &mut integrity {
        sprite.custom_size = Some(Vec2::new(3.0 * level, 20.0));
        sprite.color = if session.integrity > 40 {
            C_ACCENT_CORRECT
        } else {
            C_ACCENT_WRONG
        };
        transform.translation.x = BAR_LEFT_X + 1.5 * level;
    }

    // Countdown bar only runs during RUN; frozen feedback frames show none.
    let frac = if session.phase == Phase::Run {
        session.countdown.max(0) as f32 / QUESTION_FRAMES as f32
    } else {
        0.0
    };
    for (mut sprite, mut transform) in &mut timer {
        let w = frac * TIMER_MAX_W;
        sprite.custom_size = Some(Vec2::new(w, 5.0));
        transform.translation.x = -TIMER_MAX_W / 2.0 + w / 2.0;
    }
}

/// Question panel border, drawn over the panel sprite.
pub fn draw_overlay(session: Res<Session>, mut gizmos: Gizmos) {
    if matches!(session.phase, Phase::Run | Phase::Feedback) {
        gizmos.rect_2d(PANEL_POS, PANEL_SIZE, C_GRID_LIGHT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_splits_on_word_boundaries() {
        assert_eq!(wrap("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("short text", 56), vec!["short text"]);
    }

    #[test]
    fn wrap_gives_overlong_words_their_own_line() {
        assert_eq!(
            wrap("a incomprehensibilities b", 8),
            vec!["a", "incomprehensibilities", "b"]
        );
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 56), vec![""]);
    }

    #[test]
    fn wrap_lines_fit_the_budget() {
        let text = "Splits data into segments and stamps each with a port number.";
        for line in wrap(text, QUESTION_COLS) {
            assert!(line.chars().count() <= QUESTION_COLS, "too long: {line}");
        }
    }
}
