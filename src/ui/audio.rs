/// Background music: a best-effort toggle per screen.
///
/// `AudioCompanion` owns the user's intent (`playing`) and drives an
/// `AudioOutput`. Starting playback can be refused (no device, or
/// unsolicited playback blocked); the companion then settles on
/// `playing = false` and carries on muted. Nothing here is fatal.
///
/// With the "sound" feature the output is a looping, procedurally
/// generated tune played through rodio. Without it, a silent output
/// accepts every call.

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("autoplay blocked until the user starts playback")]
    AutoplayBlocked,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// External audio-output collaborator. Both calls are idempotent.
pub trait AudioOutput {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
}

/// Which loop a screen plays.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Track {
    Landing,
    Home,
    Credits,
}

pub struct AudioCompanion {
    output: Box<dyn AudioOutput>,
    playing: bool,
    /// Unsolicited starts (`autoplay`) are refused when false.
    autoplay_allowed: bool,
}

impl AudioCompanion {
    pub fn new(output: Box<dyn AudioOutput>, autoplay_allowed: bool) -> Self {
        AudioCompanion { output, playing: false, autoplay_allowed }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    /// User-initiated flip. Returns the settled state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.output.pause();
            self.playing = false;
        } else {
            self.start();
        }
        self.playing
    }

    /// User-initiated start (e.g. the welcome dialog's "play" choice).
    pub fn play(&mut self) -> bool {
        if !self.playing {
            self.start();
        }
        self.playing
    }

    /// Start without a user gesture, as on screen mount.
    pub fn autoplay(&mut self) -> bool {
        if self.playing {
            return true;
        }
        if !self.autoplay_allowed {
            info!(error = %PlaybackError::AutoplayBlocked, "auto-play failed");
            self.playing = false;
            return false;
        }
        self.start();
        self.playing
    }

    /// Silence on teardown.
    pub fn stop(&mut self) {
        self.output.pause();
        self.playing = false;
    }

    fn start(&mut self) {
        match self.output.play() {
            Ok(()) => {
                debug!("music playing");
                self.playing = true;
            }
            Err(e) => {
                info!(error = %e, "playback rejected; staying muted");
                self.playing = false;
            }
        }
    }
}

/// Output used when the audio device can't be opened: every start is refused.
pub struct UnavailableOutput(pub PlaybackError);

impl AudioOutput for UnavailableOutput {
    fn play(&mut self) -> Result<(), PlaybackError> {
        Err(self.0.clone())
    }
    fn pause(&mut self) {}
}

/// Open the output for `track`, or an unavailable stand-in.
pub fn open_output(track: Track, volume: f32, enabled: bool) -> Box<dyn AudioOutput> {
    if !enabled {
        return Box::new(UnavailableOutput(PlaybackError::NoDevice));
    }
    match inner::MusicOutput::open(track, volume) {
        Ok(out) => Box::new(out),
        Err(e) => {
            info!(error = %e, ?track, "audio output unavailable");
            Box::new(UnavailableOutput(e))
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;

    use rodio::{OutputStream, Sink, Source};

    use super::{AudioOutput, PlaybackError, Track};

    const SAMPLE_RATE: u32 = 22050;

    /// One looping tune on its own sink. Starts paused.
    pub struct MusicOutput {
        _stream: OutputStream,
        sink: Sink,
    }

    impl MusicOutput {
        pub fn open(track: Track, volume: f32) -> Result<Self, PlaybackError> {
            let (stream, handle) = OutputStream::try_default().map_err(|_| PlaybackError::NoDevice)?;
            let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Backend(e.to_string()))?;

            let wav = make_wav(&gen_loop(track));
            let src = rodio::Decoder::new(Cursor::new(wav))
                .map_err(|e| PlaybackError::Backend(e.to_string()))?;
            sink.pause();
            sink.set_volume(volume.clamp(0.0, 1.0));
            sink.append(src.repeat_infinite());

            Ok(MusicOutput { _stream: stream, sink })
        }
    }

    impl AudioOutput for MusicOutput {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.sink.play();
            Ok(())
        }

        fn pause(&mut self) {
            self.sink.pause();
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Tunes — each is one loop of mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// (frequency Hz, beats). 0.0 is a rest.
    fn score(track: Track) -> (&'static [(f32, f32)], f32) {
        const LANDING: &[(f32, f32)] = &[
            (392.0, 1.0), (440.0, 1.0), (494.0, 1.0), (392.0, 1.0),
            (523.0, 2.0), (494.0, 1.0), (440.0, 1.0),
            (392.0, 1.0), (330.0, 1.0), (294.0, 2.0),
            (0.0, 1.0), (294.0, 1.0), (392.0, 2.0),
        ];
        const HOME: &[(f32, f32)] = &[
            (523.0, 1.0), (659.0, 1.0), (784.0, 2.0),
            (659.0, 1.0), (698.0, 1.0), (784.0, 2.0),
            (880.0, 1.0), (784.0, 1.0), (659.0, 1.0), (523.0, 1.0),
            (587.0, 2.0), (523.0, 2.0),
        ];
        const CREDITS: &[(f32, f32)] = &[
            (262.0, 2.0), (330.0, 2.0), (392.0, 4.0),
            (349.0, 2.0), (294.0, 2.0), (262.0, 4.0),
        ];
        match track {
            Track::Landing => (LANDING, 0.22),
            Track::Home => (HOME, 0.18),
            Track::Credits => (CREDITS, 0.35),
        }
    }

    fn gen_loop(track: Track) -> Vec<f32> {
        let (notes, beat) = score(track);
        let mut samples = Vec::new();
        for &(freq, beats) in notes {
            let n = (SAMPLE_RATE as f32 * beat * beats) as usize;
            for i in 0..n {
                if freq == 0.0 {
                    samples.push(0.0);
                    continue;
                }
                let t = i as f32 / SAMPLE_RATE as f32;
                // Short attack, gentle decay: keeps note boundaries audible
                let pos = i as f32 / n as f32;
                let env = (pos * 40.0).min(1.0) * (1.0 - pos * 0.6);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.2
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_sizes_match_samples() {
            let wav = make_wav(&[0.0; 10]);
            assert_eq!(wav.len(), 44 + 20);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 20);
        }

        #[test]
        fn every_track_generates_a_loop() {
            for track in [Track::Landing, Track::Home, Track::Credits] {
                assert!(!gen_loop(track).is_empty());
            }
        }
    }
}

#[cfg(not(feature = "sound"))]
mod inner {
    use super::{AudioOutput, PlaybackError, Track};

    pub struct MusicOutput;

    impl MusicOutput {
        pub fn open(_track: Track, _volume: f32) -> Result<Self, PlaybackError> {
            Ok(MusicOutput)
        }
    }

    impl AudioOutput for MusicOutput {
        fn play(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn pause(&mut self) {}
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{AudioOutput, PlaybackError};

    /// Output with a scripted `play` result; records every call.
    #[derive(Clone, Default)]
    pub struct ScriptedOutput {
        pub reject_with: Option<PlaybackError>,
        pub calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ScriptedOutput {
        pub fn accepting() -> Self {
            Self::default()
        }

        pub fn rejecting(err: PlaybackError) -> Self {
            ScriptedOutput { reject_with: Some(err), ..Self::default() }
        }
    }

    impl AudioOutput for ScriptedOutput {
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push("play");
            match &self.reject_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        fn pause(&mut self) {
            self.calls.borrow_mut().push("pause");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedOutput;
    use super::*;

    #[test]
    fn toggle_flips_between_play_and_pause() {
        let out = ScriptedOutput::accepting();
        let calls = out.calls.clone();
        let mut audio = AudioCompanion::new(Box::new(out), true);
        assert!(!audio.playing());
        assert!(audio.toggle());
        assert!(!audio.toggle());
        assert_eq!(*calls.borrow(), vec!["play", "pause"]);
    }

    #[test]
    fn rejected_play_settles_muted() {
        let out = ScriptedOutput::rejecting(PlaybackError::NoDevice);
        let mut audio = AudioCompanion::new(Box::new(out), true);
        assert!(!audio.toggle());
        assert!(!audio.playing());
        // Still recoverable: another attempt is allowed and also settles.
        assert!(!audio.toggle());
        assert!(!audio.playing());
    }

    #[test]
    fn blocked_autoplay_never_touches_output() {
        let out = ScriptedOutput::accepting();
        let calls = out.calls.clone();
        let mut audio = AudioCompanion::new(Box::new(out), false);
        assert!(!audio.autoplay());
        assert!(calls.borrow().is_empty());
        // A user gesture still starts playback.
        assert!(audio.toggle());
    }

    #[test]
    fn autoplay_starts_when_allowed() {
        let mut audio = AudioCompanion::new(Box::new(ScriptedOutput::accepting()), true);
        assert!(audio.autoplay());
        assert!(audio.autoplay());
    }

    #[test]
    fn stop_pauses_output() {
        let out = ScriptedOutput::accepting();
        let calls = out.calls.clone();
        let mut audio = AudioCompanion::new(Box::new(out), true);
        audio.play();
        audio.stop();
        assert!(!audio.playing());
        assert_eq!(*calls.borrow(), vec!["play", "pause"]);
    }

    #[test]
    fn unavailable_output_rejects() {
        let mut audio = AudioCompanion::new(Box::new(UnavailableOutput(PlaybackError::NoDevice)), true);
        assert!(!audio.autoplay());
    }

    #[test]
    fn disabled_audio_opens_unavailable_output() {
        let mut out = open_output(Track::Landing, 0.5, false);
        assert_eq!(out.play(), Err(PlaybackError::NoDevice));
    }
}
