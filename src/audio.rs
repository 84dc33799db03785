//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a background drone, no external
//! files needed. The simulation never touches audio: the host drains
//! `GameEvent`s after each tick and maps them through `sound_for`.

use crate::sim::{CrashCause, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Kick started
    Kick,
    /// Bike hit a car, or police latched onto one
    Collision,
    /// Police caught the bike
    PoliceCollision,
    /// Points awarded
    Score,
    /// A pursuer slot activated
    PoliceAppear,
}

/// Which sound (if any) an event triggers
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::KickStarted => Some(SoundEffect::Kick),
        GameEvent::PursuerKicked { .. }
        | GameEvent::ObstaclePassed
        | GameEvent::PursuerCarriedOff { .. } => Some(SoundEffect::Score),
        GameEvent::PursuerAppeared { .. } => Some(SoundEffect::PoliceAppear),
        GameEvent::PursuerAttached { .. } => Some(SoundEffect::Collision),
        GameEvent::GameOver { cause, .. } => Some(match cause {
            CrashCause::Obstacle => SoundEffect::Collision,
            CrashCause::Pursuer => SoundEffect::PoliceCollision,
        }),
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, sound_for};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
        music: Option<(OscillatorNode, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings: settings.clone(),
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up new volumes/mute state
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.settings = settings.clone();
            if let Some((_, gain)) = &self.music {
                gain.gain()
                    .set_value(self.settings.effective_music_volume() * 0.2);
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            let mut settings = self.settings.clone();
            settings.muted = muted;
            self.apply_settings(&settings);
        }

        pub fn is_muted(&self) -> bool {
            self.settings.muted
        }

        /// Play whatever sounds this tick's events call for
        pub fn play_events(&self, events: &[GameEvent]) {
            for effect in events.iter().filter_map(sound_for) {
                self.play(effect);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.settings.effect_volume(effect);
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Kick => self.play_kick(ctx, vol),
                SoundEffect::Collision => self.play_collision(ctx, vol),
                SoundEffect::PoliceCollision => self.play_police_collision(ctx, vol),
                SoundEffect::Score => self.play_score(ctx, vol),
                SoundEffect::PoliceAppear => self.play_siren(ctx, vol),
            }
        }

        /// Start the looping background drone (restarts it if already playing)
        pub fn start_music(&mut self) {
            self.stop_music();
            let Some(ctx) = &self.ctx else { return };

            let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Sawtooth) else {
                log::debug!("Background loop unavailable");
                return;
            };
            gain.gain()
                .set_value(self.settings.effective_music_volume() * 0.2);
            if osc.start().is_err() {
                log::debug!("Background loop failed to start");
                return;
            }
            self.music = Some((osc, gain));
        }

        /// Stop the background drone
        pub fn stop_music(&mut self) {
            if let Some((osc, gain)) = self.music.take() {
                osc.stop().ok();
                let _ = gain.disconnect();
            }
        }

        /// Silence everything before a new session
        pub fn stop_all(&mut self) {
            self.stop_music();
        }

        // === Sound generators ===

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

        /// Kick - short whoosh up
        fn play_kick(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(520.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Collision - crunch with a bass thump
        fn play_collision(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(35.0, t + 0.35)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }

        /// Caught by police - crunch followed by a falling two-tone
        fn play_police_collision(&self, ctx: &AudioContext, vol: f32) {
            self.play_collision(ctx, vol);
            for (i, freq) in [880.0, 660.0, 880.0, 660.0].iter().enumerate() {
                let delay = 0.1 + i as f64 * 0.15;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.15, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.14)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }

        /// Score - happy ding
        fn play_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [800.0, 1200.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }

        /// Police appear - short wailing siren sweep
        fn play_siren(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, t + 0.8)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.0)
                .ok();
            osc.frequency().set_value_at_time(600.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(1100.0, t + 0.25)
                .ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(600.0, t + 0.5)
                .ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(1100.0, t + 0.75)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.0).ok();
        }
    }
}
