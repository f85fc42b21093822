//! The seven layer ports along the bottom of the screen: hover-eased hit
//! targets with staggered blinking LEDs and highlight overrides.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::catalog::{layer_tag, LAYER_COUNT};
use crate::session::{Phase, Session};
use crate::sfx::{PlaySfx, Sfx};
use crate::{
    C_ACCENT_ACTIVE, C_LED_OFF, C_PORT_BODY, C_PORT_CONNECTOR, C_PORT_IDLE, C_TEXT_DIM, EASE_FACTOR,
    HALF_H, HOVER_RAISE, PORT_FIRST_X, PORT_H, PORT_PITCH, PORT_REST_Y, PORT_W,
};

/// Raised-by-hover detection threshold, in world units above rest.
const RAISE_EPS: f32 = 5.0;
const LED_RADIUS: f32 = 4.0;

#[derive(Component)]
pub struct Port {
    pub layer: u8,
    pub rest_y: f32,
    pub highlight: Option<Color>,
    blink: u32,
}

#[derive(Component)]
pub struct Led(u32);

/// Marker for the big "L{n}" label whose color follows the border.
#[derive(Component)]
pub struct PortTag;

/// Single-pole exponential smoothing step toward the target.
pub fn ease(current: f32, target: f32) -> f32 {
    current + (target - current) * EASE_FACTOR
}

/// Rect hit test against the port's current (animated) center.
pub fn hit(center: Vec2, point: Vec2) -> bool {
    (point.x - center.x).abs() <= PORT_W / 2.0 && (point.y - center.y).abs() <= PORT_H / 2.0
}

/// Each of the three LEDs blinks on its own divisor so the column never
/// flashes in unison.
pub fn led_on(blink: u32, index: u32) -> bool {
    (blink / (10 + index * 5)) % 2 == 0
}

impl Port {
    pub fn border_color(&self, current_y: f32) -> Color {
        if let Some(color) = self.highlight {
            color
        } else if current_y > self.rest_y + RAISE_EPS {
            C_ACCENT_ACTIVE
        } else {
            C_PORT_IDLE
        }
    }
}

pub fn spawn_ports(
    mut cmd: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<ColorMaterial>>,
) {
    let led_mesh = meshes.add(Circle::new(LED_RADIUS));
    let mut rng = rand::rng();

    for layer in 1..=LAYER_COUNT {
        let x = PORT_FIRST_X + (layer - 1) as f32 * PORT_PITCH;
        cmd.spawn((
            Sprite::from_color(C_PORT_BODY, Vec2::new(PORT_W, PORT_H)),
            Transform::from_xyz(x, PORT_REST_Y, 0.0),
            Visibility::Hidden,
            Port {
                layer,
                rest_y: PORT_REST_Y,
                highlight: None,
                blink: rng.random_range(0..60),
            },
        ))
        .with_children(|parent| {
            for i in 0..3 {
                parent.spawn((
                    Mesh2d(led_mesh.clone()),
                    MeshMaterial2d(mats.add(ColorMaterial::from(C_LED_OFF))),
                    Transform::from_xyz(i as f32 * 15.0 - 25.0, 50.0, 1.0),
                    Led(i),
                ));
            }
            parent.spawn((
                Text2d::new(format!("L{layer}")),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(C_PORT_IDLE),
                Transform::from_xyz(0.0, -2.0, 1.0),
                PortTag,
            ));
            parent.spawn((
                Text2d::new(layer_tag(layer)),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(C_TEXT_DIM),
                Transform::from_xyz(0.0, -47.0, 1.0),
            ));
        });
    }
}

/// Eases every port toward its hover target and reports hover transitions to
/// the session so the hover blip fires once per entry, not per frame.
pub fn update_ports(
    windows: Query<&Window, With<PrimaryWindow>>,
    cam: Query<(&Camera, &GlobalTransform)>,
    mut ports: Query<(&mut Port, &mut Transform)>,
    mut session: ResMut<Session>,
    mut sfx: EventWriter<PlaySfx>,
) {
    let cursor = crate::cursor_world(&windows, &cam);
    let mut over = None;

    for (mut port, mut transform) in &mut ports {
        let center = transform.translation.truncate();
        let hovered = cursor.is_some_and(|c| hit(center, c));
        if hovered {
            over = Some(port.layer);
        }

        let target = if hovered {
            port.rest_y + HOVER_RAISE
        } else {
            port.rest_y
        };
        transform.translation.y = ease(transform.translation.y, target);
        port.blink += 1;
    }

    if session.phase == Phase::Run && session.note_hover(over) {
        sfx.send(PlaySfx(Sfx::Hover));
    }
}

pub fn render_ports(
    mut gizmos: Gizmos,
    session: Res<Session>,
    ports: Query<(&Port, &Transform, &Children)>,
    leds: Query<(&Led, &MeshMaterial2d<ColorMaterial>)>,
    mut tags: Query<&mut TextColor, With<PortTag>>,
    mut mats: ResMut<Assets<ColorMaterial>>,
) {
    if !matches!(session.phase, Phase::Run | Phase::Feedback) {
        return;
    }

    for (port, transform, children) in &ports {
        let center = transform.translation.truncate();
        let border = port.border_color(center.y);

        gizmos.line_2d(
            Vec2::new(center.x, center.y - PORT_H / 2.0),
            Vec2::new(center.x, -HALF_H),
            C_PORT_CONNECTOR,
        );
        gizmos.rect_2d(center, Vec2::new(PORT_W, PORT_H), border);

        for child in children {
            if let Ok((led, material)) = leds.get(*child) {
                let lit = led_on(port.blink, led.0);
                if let Some(mat) = mats.get_mut(&material.0) {
                    mat.color = if lit { border } else { C_LED_OFF };
                }
            }
            if let Ok(mut tag) = tags.get_mut(*child) {
                tag.0 = border;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_converges_within_epsilon() {
        let mut y = 0.0;
        for _ in 0..40 {
            y = ease(y, 100.0);
        }
        assert!((y - 100.0).abs() < 0.1, "still {y} after 40 frames");
    }

    #[test]
    fn ease_never_overshoots() {
        let mut y = 0.0;
        for _ in 0..200 {
            let next = ease(y, 100.0);
            assert!(next >= y && next <= 100.0);
            y = next;
        }
    }

    #[test]
    fn hit_test_uses_half_extents() {
        let center = Vec2::new(10.0, -20.0);
        assert!(hit(center, center));
        assert!(hit(center, center + Vec2::new(PORT_W / 2.0, PORT_H / 2.0)));
        assert!(!hit(center, center + Vec2::new(PORT_W / 2.0 + 1.0, 0.0)));
        assert!(!hit(center, center - Vec2::new(0.0, PORT_H / 2.0 + 1.0)));
    }

    #[test]
    fn leds_blink_at_staggered_rates() {
        // First toggle happens at the divisor boundary: 10, 15 and 20.
        assert!(led_on(9, 0));
        assert!(!led_on(10, 0));
        assert!(led_on(14, 1));
        assert!(!led_on(15, 1));
        assert!(led_on(19, 2));
        assert!(!led_on(20, 2));
    }

    #[test]
    fn highlight_overrides_border_color() {
        let port = Port {
            layer: 1,
            rest_y: 0.0,
            highlight: Some(Color::WHITE),
            blink: 0,
        };
        assert_eq!(port.border_color(40.0), Color::WHITE);

        let plain = Port { highlight: None, ..port };
        assert_eq!(plain.border_color(40.0), C_ACCENT_ACTIVE);
        assert_eq!(plain.border_color(0.0), C_PORT_IDLE);
    }
}
