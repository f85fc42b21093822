//! The game session: one owned struct holding score, integrity, the current
//! prompt and every frame counter. Systems in `main.rs` step it once per
//! frame and turn the returned outcomes into sound, particles and highlights.

use bevy::prelude::Resource;
use rand::Rng;

use crate::catalog::{Prompt, PromptPool};
use crate::{FEEDBACK_FRAMES, QUESTION_FRAMES, SCORE_PER_HIT, TIMEOUT_PENALTY, WRONG_PENALTY};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Run,
    Feedback,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Correct,
    Wrong,
    /// Wrong answer that drained the last of the integrity meter.
    Fatal,
}

pub struct RunTick {
    /// A new character was revealed this frame.
    pub typed: bool,
    /// The question countdown expired this frame.
    pub timed_out: bool,
}

#[derive(Resource)]
pub struct Session {
    pub phase: Phase,
    pub score: u32,
    pub integrity: i32,
    pub prompt: &'static Prompt,
    pub countdown: i32,
    pub shake: i32,
    pool: PromptPool,
    revealed: usize,
    text_tick: u32,
    wait: i32,
    hovered: Option<u8>,
}

impl Session {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut pool = PromptPool::shuffled(rng);
        let prompt = pool.draw(rng);
        Self {
            phase: Phase::Menu,
            score: 0,
            integrity: 100,
            prompt,
            countdown: QUESTION_FRAMES,
            shake: 0,
            pool,
            revealed: 0,
            text_tick: 0,
            wait: 0,
            hovered: None,
        }
    }

    /// Fresh run: zeroed score, full integrity, reshuffled pool, first
    /// question drawn. Callers clear particles and play the boot sound.
    pub fn soft_reset<R: Rng>(&mut self, rng: &mut R) {
        self.score = 0;
        self.integrity = 100;
        self.shake = 0;
        self.hovered = None;
        self.pool.refill(rng);
        self.next_prompt(rng);
        self.phase = Phase::Run;
    }

    fn next_prompt<R: Rng>(&mut self, rng: &mut R) {
        self.prompt = self.pool.draw(rng);
        self.revealed = 0;
        self.text_tick = 0;
        self.countdown = QUESTION_FRAMES;
    }

    /// The portion of the prompt the typewriter has revealed so far.
    pub fn revealed_text(&self) -> &str {
        match self.prompt.text.char_indices().nth(self.revealed) {
            Some((idx, _)) => &self.prompt.text[..idx],
            None => self.prompt.text,
        }
    }

    /// One RUN frame: typewriter advance and countdown. A timeout costs
    /// integrity, shakes the screen and rolls the next question without
    /// leaving RUN; hitting zero integrity ends the session this same frame.
    pub fn step_run<R: Rng>(&mut self, rng: &mut R) -> RunTick {
        let mut typed = false;
        if self.revealed < self.prompt.text.chars().count() {
            self.text_tick += 1;
            if self.text_tick % 2 == 0 {
                self.revealed += 1;
                typed = true;
            }
        }

        self.countdown -= 1;
        let mut timed_out = false;
        if self.countdown <= 0 {
            self.integrity -= TIMEOUT_PENALTY;
            self.shake = 10;
            self.next_prompt(rng);
            timed_out = true;
        }

        if self.integrity <= 0 {
            self.phase = Phase::GameOver;
        }
        RunTick { typed, timed_out }
    }

    /// Resolves a click on the port for `layer` against the current prompt.
    pub fn answer<R: Rng>(&mut self, layer: u8, rng: &mut R) -> Verdict {
        if layer == self.prompt.layer {
            self.score += SCORE_PER_HIT;
            self.next_prompt(rng);
            Verdict::Correct
        } else {
            self.integrity -= WRONG_PENALTY;
            self.shake = 20;
            if self.integrity <= 0 {
                self.phase = Phase::GameOver;
                Verdict::Fatal
            } else {
                self.phase = Phase::Feedback;
                self.wait = FEEDBACK_FRAMES;
                Verdict::Wrong
            }
        }
    }

    /// One FEEDBACK frame. Returns true when the wait expires and the
    /// session is back in RUN with a fresh question.
    pub fn step_feedback<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.wait -= 1;
        if self.wait <= 0 {
            self.next_prompt(rng);
            self.phase = Phase::Run;
            true
        } else {
            false
        }
    }

    /// Tracks which port the pointer is over. Returns true exactly once per
    /// transition onto a widget, which is when the hover sound fires.
    pub fn note_hover(&mut self, over: Option<u8>) -> bool {
        if over == self.hovered {
            return false;
        }
        self.hovered = over;
        over.is_some()
    }

    /// Rolls this frame's shake offset and decays the magnitude by one.
    pub fn shake_offset<R: Rng>(&mut self, rng: &mut R) -> (f32, f32) {
        if self.shake <= 0 {
            return (0.0, 0.0);
        }
        let m = self.shake;
        self.shake -= 1;
        (
            rng.random_range(-m..=m) as f32,
            rng.random_range(-m..=m) as f32,
        )
    }

    pub fn pool_remaining(&self) -> usize {
        self.pool.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn running() -> (Session, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = Session::new(&mut rng);
        session.soft_reset(&mut rng);
        (session, rng)
    }

    fn wrong_layer(session: &Session) -> u8 {
        session.prompt.layer % 7 + 1
    }

    #[test]
    fn starts_in_menu() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = Session::new(&mut rng);
        assert_eq!(session.phase, Phase::Menu);
        assert_eq!(session.revealed_text(), "");
    }

    #[test]
    fn correct_click_scores_and_advances() {
        let (mut session, mut rng) = running();
        let before = session.prompt;
        let verdict = session.answer(before.layer, &mut rng);

        assert_eq!(verdict, Verdict::Correct);
        assert_eq!(session.score, 100);
        assert_eq!(session.phase, Phase::Run);
        assert_eq!(session.countdown, QUESTION_FRAMES);
        assert!(!std::ptr::eq(before, session.prompt));
    }

    #[test]
    fn wrong_click_enters_feedback_then_recovers() {
        let (mut session, mut rng) = running();
        let verdict = session.answer(wrong_layer(&session), &mut rng);

        assert_eq!(verdict, Verdict::Wrong);
        assert_eq!(session.integrity, 80);
        assert_eq!(session.shake, 20);
        assert_eq!(session.phase, Phase::Feedback);

        let before = session.prompt;
        for _ in 0..FEEDBACK_FRAMES - 1 {
            assert!(!session.step_feedback(&mut rng));
            assert_eq!(session.phase, Phase::Feedback);
        }
        assert!(session.step_feedback(&mut rng));
        assert_eq!(session.phase, Phase::Run);
        assert_eq!(session.countdown, QUESTION_FRAMES);
        assert!(!std::ptr::eq(before, session.prompt));
    }

    #[test]
    fn fatal_click_ends_session_same_frame() {
        let (mut session, mut rng) = running();
        session.integrity = 20;
        let verdict = session.answer(wrong_layer(&session), &mut rng);

        assert_eq!(verdict, Verdict::Fatal);
        assert_eq!(session.integrity, 0);
        assert_eq!(session.phase, Phase::GameOver);
    }

    #[test]
    fn timeout_penalizes_and_stays_in_run() {
        let (mut session, mut rng) = running();
        let before = session.prompt;
        for frame in 1..=QUESTION_FRAMES {
            let tick = session.step_run(&mut rng);
            assert_eq!(tick.timed_out, frame == QUESTION_FRAMES, "frame {frame}");
        }
        assert_eq!(session.integrity, 90);
        assert_eq!(session.shake, 10);
        assert_eq!(session.phase, Phase::Run);
        assert_eq!(session.countdown, QUESTION_FRAMES);
        assert!(!std::ptr::eq(before, session.prompt));
    }

    #[test]
    fn timeout_at_low_integrity_is_game_over() {
        let (mut session, mut rng) = running();
        session.integrity = 10;
        for _ in 0..QUESTION_FRAMES {
            session.step_run(&mut rng);
        }
        assert_eq!(session.phase, Phase::GameOver);
    }

    #[test]
    fn typewriter_reveals_one_char_per_two_frames() {
        let (mut session, mut rng) = running();
        let text = session.prompt.text;
        let chars = text.chars().count();

        for _ in 0..2 {
            session.step_run(&mut rng);
        }
        assert_eq!(session.revealed_text().chars().count(), 1);

        for _ in 2..chars * 2 {
            session.step_run(&mut rng);
        }
        assert_eq!(session.revealed_text(), text);
    }

    #[test]
    fn soft_reset_restores_everything() {
        let (mut session, mut rng) = running();
        session.answer(session.prompt.layer, &mut rng);
        session.answer(wrong_layer(&session), &mut rng);
        session.soft_reset(&mut rng);

        assert_eq!(session.score, 0);
        assert_eq!(session.integrity, 100);
        assert_eq!(session.shake, 0);
        assert_eq!(session.phase, Phase::Run);
    }

    #[test]
    fn hover_sound_fires_once_per_transition() {
        let (mut session, _) = running();
        assert!(session.note_hover(Some(3)));
        assert!(!session.note_hover(Some(3)));
        assert!(session.note_hover(Some(4)));
        assert!(!session.note_hover(None));
        // Re-entering the same widget after leaving it retriggers.
        assert!(session.note_hover(Some(4)));
    }

    #[test]
    fn shake_decays_to_zero() {
        let (mut session, mut rng) = running();
        session.shake = 3;
        for expected in [2, 1, 0] {
            let (ox, oy) = session.shake_offset(&mut rng);
            assert!(ox.abs() <= expected as f32 + 1.0 && oy.abs() <= expected as f32 + 1.0);
            assert_eq!(session.shake, expected);
        }
        assert_eq!(session.shake_offset(&mut rng), (0.0, 0.0));
    }
}
