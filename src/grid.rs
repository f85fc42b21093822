//! Decorative background: a perspective fan of slanted lines plus horizontal
//! lines that scroll downward forever.

use bevy::prelude::*;

use crate::{C_GRID, C_GRID_LIGHT, HALF_H, SCREEN_W, Z_GRID};

const GRID_STEP: f32 = 40.0;
const GRID_SPEED: f32 = 2.0;
/// Rows brighten once they scroll past this distance from the top, in pixels.
const BRIGHT_BELOW: f32 = 200.0;
const LINE_THICKNESS: f32 = 2.0;

#[derive(Component)]
pub struct GridRow(usize);

#[derive(Resource, Default)]
pub struct GridScroll(f32);

pub fn spawn_grid(mut cmd: Commands) {
    // Slanted lines fanning out from the vertical center line.
    for i in -10..=10i32 {
        let top = Vec2::new(i as f32 * 80.0, HALF_H);
        let bottom = Vec2::new(i as f32 * 300.0, -HALF_H);
        let delta = bottom - top;
        let mid = (top + bottom) / 2.0;
        cmd.spawn((
            Sprite::from_color(C_GRID, Vec2::new(delta.length(), LINE_THICKNESS)),
            Transform::from_xyz(mid.x, mid.y, Z_GRID)
                .with_rotation(Quat::from_rotation_z(delta.y.atan2(delta.x))),
        ));
    }

    let rows = (2.0 * HALF_H / GRID_STEP) as usize + 2;
    for i in 0..=rows {
        cmd.spawn((
            Sprite::from_color(C_GRID, Vec2::new(SCREEN_W, LINE_THICKNESS)),
            Transform::from_xyz(0.0, HALF_H - i as f32 * GRID_STEP, Z_GRID),
            GridRow(i),
        ));
    }
}

pub fn scroll_grid(
    mut scroll: ResMut<GridScroll>,
    mut rows: Query<(&GridRow, &mut Transform, &mut Sprite)>,
) {
    scroll.0 = (scroll.0 + GRID_SPEED) % GRID_STEP;
    for (row, mut transform, mut sprite) in &mut rows {
        let from_top = row.0 as f32 * GRID_STEP + scroll.0;
        transform.translation.y = HALF_H - from_top;
        sprite.color = if from_top > BRIGHT_BELOW {
            C_GRID_LIGHT
        } else {
            C_GRID
        };
    }
}
