//! The sound bank: five effects compiled once at startup, triggered
//! fire-and-forget through `PlaySfx` events.

use bevy::audio::{PlaybackMode, Volume};
use bevy::prelude::*;

use crate::synth::{SfxBuffer, Wave};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Hover,
    Correct,
    Wrong,
    Type,
    Boot,
}

#[derive(Event)]
pub struct PlaySfx(pub Sfx);

#[derive(Resource)]
pub struct SfxBank {
    handles: [Handle<SfxBuffer>; 5],
}

impl SfxBank {
    pub fn handle(&self, sfx: Sfx) -> Handle<SfxBuffer> {
        self.handles[sfx as usize].clone()
    }
}

pub fn setup_sfx(
    mut cmd: Commands,
    mut clips: ResMut<Assets<SfxBuffer>>,
    mut sfx: EventWriter<PlaySfx>,
) {
    let bank = SfxBank {
        handles: [
            clips.add(SfxBuffer::synthesize(600.0, 0.05, Wave::Square, -200.0)),
            clips.add(SfxBuffer::synthesize(880.0, 0.4, Wave::Sine, 400.0)),
            clips.add(SfxBuffer::synthesize(150.0, 0.5, Wave::Saw, -50.0)),
            clips.add(SfxBuffer::synthesize(800.0, 0.03, Wave::Noise, 0.0)),
            clips.add(SfxBuffer::synthesize(440.0, 1.0, Wave::Sine, 880.0)),
        ],
    };
    cmd.insert_resource(bank);
    info!("sound bank compiled (5 clips)");

    sfx.send(PlaySfx(Sfx::Boot));
}

pub fn play_sfx(mut cmd: Commands, mut events: EventReader<PlaySfx>, bank: Option<Res<SfxBank>>) {
    let Some(bank) = bank else { return };

    for event in events.read() {
        // Overlapping playback is fine; each trigger is its own entity that
        // despawns when the clip ends.
        cmd.spawn((
            AudioPlayer(bank.handle(event.0)),
            PlaybackSettings {
                mode: PlaybackMode::Despawn,
                volume: Volume::new(0.8),
                ..default()
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sfx_indices_are_dense() {
        let all = [Sfx::Hover, Sfx::Correct, Sfx::Wrong, Sfx::Type, Sfx::Boot];
        for (i, sfx) in all.into_iter().enumerate() {
            assert_eq!(sfx as usize, i);
        }
    }
}
