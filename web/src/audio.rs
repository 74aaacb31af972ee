//! Sound output behind an injected port.
//!
//! The game state machine never touches audio; the view hands cues to
//! whatever [`AudioPort`] it was given. On the web the effects are
//! procedurally generated through the Web Audio API - no sound files to
//! load - and every playback failure is swallowed.

/// Fire-and-forget sound events emitted by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SoundCue {
    /// A committed shot that barely scratched the wall
    Shoot,
    /// A committed shot with real impact
    Break,
    /// Overkill warning
    Explosion,
    /// Wall breached at exactly zero
    LevelComplete,
    /// Lockout or over-breach
    GameOver,
}

pub(crate) trait AudioPort {
    fn play(&self, cue: SoundCue);
    fn set_music(&self, on: bool);
}

/// Sink that ignores every cue. Selected off-wasm, which also keeps the
/// component logic testable without a playback environment.
pub(crate) struct NullAudio;

impl AudioPort for NullAudio {
    fn play(&self, _cue: SoundCue) {}
    fn set_music(&self, _on: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub(crate) use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use super::{AudioPort, SoundCue};
    use std::cell::RefCell;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    const SFX_VOLUME: f32 = 0.6;
    const MUSIC_VOLUME: f32 = 0.3;

    pub(crate) struct WebAudio {
        ctx: Option<AudioContext>,
        music: RefCell<Vec<OscillatorNode>>,
    }

    impl WebAudio {
        pub(crate) fn new() -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music: RefCell::new(Vec::new()),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Shot fired - thin laser zap
        fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Wall chunk breaking off - crunch plus bass thump
        fn play_break(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 160.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(160.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Overkill - boom!
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.6).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 45.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.45, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }

        /// Mission complete - rising arpeggio
        fn play_level_complete(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                    continue;
                };
                let start = t + i as f64 * 0.12;

                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();

                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }

        /// Core lost - slow descending triad
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            for (i, freq) in [392.0, 311.13, 233.08].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                    continue;
                };
                let start = t + i as f64 * 0.25;

                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.35, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                    .ok();

                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.45).ok();
            }
        }

        /// Background drone - root plus fifth, runs until stopped
        fn start_music(&self, ctx: &AudioContext) {
            let mut music = self.music.borrow_mut();
            if !music.is_empty() {
                return;
            }

            for freq in [55.0, 82.5] {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle)
                else {
                    continue;
                };
                gain.gain().set_value(MUSIC_VOLUME * 0.2);
                osc.start().ok();
                music.push(osc);
            }
        }

        fn stop_music(&self) {
            for osc in self.music.borrow_mut().drain(..) {
                osc.stop().ok();
            }
        }

        /// Resume context if suspended (browsers require a user gesture)
        fn resume(&self, ctx: &AudioContext) {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    impl AudioPort for WebAudio {
        fn play(&self, cue: SoundCue) {
            let Some(ctx) = &self.ctx else { return };
            self.resume(ctx);

            match cue {
                SoundCue::Shoot => self.play_shoot(ctx, SFX_VOLUME),
                SoundCue::Break => self.play_break(ctx, SFX_VOLUME),
                SoundCue::Explosion => self.play_explosion(ctx, SFX_VOLUME),
                SoundCue::LevelComplete => self.play_level_complete(ctx, SFX_VOLUME),
                SoundCue::GameOver => self.play_game_over(ctx, SFX_VOLUME),
            }
        }

        fn set_music(&self, on: bool) {
            let Some(ctx) = &self.ctx else { return };
            self.resume(ctx);

            if on {
                self.start_music(ctx);
            } else {
                self.stop_music();
            }
        }
    }
}
