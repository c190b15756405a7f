//! Transitions between scenes and the completion notification they fire.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crossbeam_channel::Sender;
use glam::Vec4;

/// A host-driven visual effect played while switching scenes.
///
/// The director registers a [`Completion`] with [`on_completion`](Self::on_completion),
/// then calls [`play`](Self::play). The transition must fire the completion
/// exactly once when its effect is over; the switch to the next scene happens
/// at that point. Transitions run on the host's clock: the director forwards
/// every [`SceneDirector::update`](super::SceneDirector::update) to
/// [`update`](Self::update).
pub trait Transition {
    fn on_completion(&mut self, completion: Completion);

    fn play(&mut self);

    /// Advance to host time `time` (seconds).
    fn update(&mut self, _time: f32) {}
}

impl<T: Transition + ?Sized> Transition for Box<T> {
    fn on_completion(&mut self, completion: Completion) {
        (**self).on_completion(completion);
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn update(&mut self, time: f32) {
        (**self).update(time);
    }
}

/// Lets the host keep a handle to a transition it also renders.
impl<T: Transition + ?Sized> Transition for Rc<RefCell<T>> {
    fn on_completion(&mut self, completion: Completion) {
        self.borrow_mut().on_completion(completion);
    }

    fn play(&mut self) {
        self.borrow_mut().play();
    }

    fn update(&mut self, time: f32) {
        self.borrow_mut().update(time);
    }
}

/// One-shot completion notification handed to a [`Transition`].
///
/// Firing consumes the token. It may be fired from another thread; the
/// director applies it on its own thread during the next `update`, or right
/// away when fired synchronously from `play`.
pub struct Completion {
    token: u64,
    sender: Sender<u64>,
}

impl Completion {
    pub(crate) fn new(token: u64, sender: Sender<u64>) -> Self {
        Self { token, sender }
    }

    pub fn fire(self) {
        // The director may already be gone.
        let _ = self.sender.send(self.token);
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("token", &self.token)
            .finish()
    }
}

/// Completes as soon as it is played.
#[derive(Debug, Default)]
pub struct Immediate {
    completion: Option<Completion>,
}

impl Transition for Immediate {
    fn on_completion(&mut self, completion: Completion) {
        self.completion = Some(completion);
    }

    fn play(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion.fire();
        }
    }
}

/// Progress curve of a [`Fade`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow finish.
    EaseOut,
    /// Cubic smoothstep, slow at both ends.
    EaseInOut,
}

impl Easing {
    /// Map linear progress onto the curve. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t.powi(2),
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Visual style of a [`Fade`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadeKind {
    /// Fade out to a solid color, then fade in the next scene.
    ThroughColor(Vec4),
    /// Blend the current scene out while the next one blends in.
    Crossfade,
}

/// Where a [`Fade`] is in its timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    /// Created, not yet played.
    Idle,
    /// Played; waiting for the first clock tick.
    Starting,
    FadingOut,
    FadingIn,
    Crossfading,
    Finished,
}

/// Timed fade transition driven by the host clock.
///
/// Hosts read [`overlay`](Self::overlay) or [`crossfade_blend`](Self::crossfade_blend)
/// each frame to paint the effect. The clock starts at the first
/// [`update`](Transition::update) after [`play`](Transition::play).
///
/// ```
/// use stagehand::scene::{Easing, Fade};
///
/// let fade = Fade::to_black(0.5).easing(Easing::Linear);
/// assert_eq!(fade.duration_secs(), 0.5);
/// ```
#[derive(Debug)]
pub struct Fade {
    kind: FadeKind,
    duration: f32,
    easing: Easing,
    phase: FadePhase,
    progress: f32,
    start_time: Option<f32>,
    completion: Option<Completion>,
}

impl Fade {
    pub fn new(kind: FadeKind, duration: f32) -> Self {
        Self {
            kind,
            duration: duration.max(0.0),
            easing: Easing::EaseInOut,
            phase: FadePhase::Idle,
            progress: 0.0,
            start_time: None,
            completion: None,
        }
    }

    /// Fade through black. Half the duration fades out, half fades in.
    pub fn to_black(duration: f32) -> Self {
        Self::through_color(Vec4::new(0.0, 0.0, 0.0, 1.0), duration)
    }

    pub fn to_white(duration: f32) -> Self {
        Self::through_color(Vec4::ONE, duration)
    }

    /// Fade through an RGBA color.
    pub fn through_color(color: Vec4, duration: f32) -> Self {
        Self::new(FadeKind::ThroughColor(color), duration)
    }

    pub fn crossfade(duration: f32) -> Self {
        Self::new(FadeKind::Crossfade, duration)
    }

    /// Set the easing function for this transition.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn kind(&self) -> FadeKind {
        self.kind
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// Eased progress within the current phase (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.phase == FadePhase::Finished
    }

    /// Color to paint over the scene, with alpha scaled by the fade.
    ///
    /// `None` for crossfades and when nothing should be painted.
    pub fn overlay(&self) -> Option<Vec4> {
        let FadeKind::ThroughColor(color) = self.kind else {
            return None;
        };
        let alpha = match self.phase {
            FadePhase::FadingOut => self.progress,
            FadePhase::FadingIn => 1.0 - self.progress,
            FadePhase::Starting => 0.0,
            FadePhase::Idle | FadePhase::Crossfading | FadePhase::Finished => return None,
        };
        Some(color.truncate().extend(color.w * alpha))
    }

    /// How much of the next scene to show (0.0 = all current, 1.0 = all next).
    pub fn crossfade_blend(&self) -> f32 {
        match self.phase {
            FadePhase::Crossfading => self.progress,
            FadePhase::Finished => 1.0,
            _ => 0.0,
        }
    }

    fn finish(&mut self) {
        self.phase = FadePhase::Finished;
        self.progress = 1.0;
        if let Some(completion) = self.completion.take() {
            completion.fire();
        }
    }
}

impl Transition for Fade {
    fn on_completion(&mut self, completion: Completion) {
        self.completion = Some(completion);
    }

    fn play(&mut self) {
        if self.phase != FadePhase::Idle {
            return;
        }
        if self.duration <= 0.0 {
            self.finish();
        } else {
            self.phase = FadePhase::Starting;
        }
    }

    fn update(&mut self, time: f32) {
        if matches!(self.phase, FadePhase::Idle | FadePhase::Finished) {
            return;
        }
        let start = *self.start_time.get_or_insert(time);
        let elapsed = (time - start).max(0.0);

        match self.kind {
            FadeKind::ThroughColor(_) => {
                let half = self.duration / 2.0;
                if elapsed < half {
                    self.phase = FadePhase::FadingOut;
                    self.progress = self.easing.apply(elapsed / half);
                } else if elapsed < self.duration {
                    self.phase = FadePhase::FadingIn;
                    self.progress = self.easing.apply((elapsed - half) / half);
                } else {
                    self.finish();
                }
            }
            FadeKind::Crossfade => {
                if elapsed < self.duration {
                    self.phase = FadePhase::Crossfading;
                    self.progress = self.easing.apply(elapsed / self.duration);
                } else {
                    self.finish();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn wired(mut fade: Fade) -> (Fade, crossbeam_channel::Receiver<u64>) {
        let (tx, rx) = unbounded();
        fade.on_completion(Completion::new(7, tx));
        (fade, rx)
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInOut.apply(0.25), 0.15625);
        assert_eq!(Easing::EaseOut.apply(2.0), 1.0);
    }

    #[test]
    fn immediate_fires_on_play() {
        let (tx, rx) = unbounded();
        let mut t = Immediate::default();
        t.on_completion(Completion::new(3, tx));
        assert!(rx.try_recv().is_err());
        t.play();
        assert_eq!(rx.try_recv().unwrap(), 3);
    }

    #[test]
    fn fade_through_color_runs_both_halves() {
        let (mut fade, rx) = wired(Fade::to_black(1.0).easing(Easing::Linear));
        fade.play();
        assert_eq!(fade.phase(), FadePhase::Starting);

        fade.update(10.0);
        assert_eq!(fade.phase(), FadePhase::FadingOut);

        fade.update(10.25);
        assert_eq!(fade.phase(), FadePhase::FadingOut);
        assert!((fade.overlay().unwrap().w - 0.5).abs() < 1e-5);

        fade.update(10.75);
        assert_eq!(fade.phase(), FadePhase::FadingIn);
        assert!((fade.overlay().unwrap().w - 0.5).abs() < 1e-5);
        assert!(rx.try_recv().is_err());

        fade.update(11.0);
        assert!(fade.is_finished());
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn crossfade_reports_blend() {
        let (mut fade, rx) = wired(Fade::crossfade(2.0).easing(Easing::Linear));
        fade.play();
        fade.update(0.0);
        fade.update(1.0);
        assert!((fade.crossfade_blend() - 0.5).abs() < 1e-5);
        assert!(fade.overlay().is_none());

        fade.update(2.5);
        assert_eq!(fade.crossfade_blend(), 1.0);
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn completion_fires_once() {
        let (mut fade, rx) = wired(Fade::crossfade(0.5));
        fade.play();
        fade.update(0.0);
        fade.update(1.0);
        fade.update(2.0);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn zero_duration_completes_on_play() {
        let (mut fade, rx) = wired(Fade::to_white(0.0));
        fade.play();
        assert!(fade.is_finished());
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn not_playing_ignores_clock() {
        let (mut fade, rx) = wired(Fade::to_black(0.1));
        fade.update(5.0);
        assert_eq!(fade.phase(), FadePhase::Idle);
        assert!(rx.try_recv().is_err());
    }
}
