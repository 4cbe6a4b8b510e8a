use feynman_core::model::VoiceSettings;

/// Synthesis parameters for a single utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: Option<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
            lang: None,
        }
    }
}

impl From<&VoiceSettings> for SpeechOptions {
    fn from(voice: &VoiceSettings) -> Self {
        Self {
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
            lang: Some(voice.lang.clone()),
        }
    }
}

/// Text-to-speech capability supplied by the front-end.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str, options: &SpeechOptions);
}

/// Speaker that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeaker;

impl Speaker for NoopSpeaker {
    fn speak(&self, _text: &str, _options: &SpeechOptions) {}
}
