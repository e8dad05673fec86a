use std::sync::Arc;

use locale::storage::{LocalStorage, HAPTIC_ENABLED_KEY};
use serde::Serialize;
use shared::domain::NotificationKind;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub gain: f32,
    pub duration_ms: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundCue {
    pub kind: NotificationKind,
    pub tones: Vec<Tone>,
}

impl SoundCue {
    pub fn for_kind(kind: NotificationKind) -> Self {
        let tone = |frequency_hz, gain, duration_ms, delay_ms| Tone {
            frequency_hz,
            gain,
            duration_ms,
            delay_ms,
        };
        let tones = match kind {
            NotificationKind::Message => vec![tone(800.0, 0.1, 100, 0)],
            NotificationKind::Call => vec![tone(600.0, 0.15, 200, 0), tone(600.0, 0.15, 200, 300)],
            NotificationKind::Error => vec![tone(400.0, 0.12, 150, 0)],
            NotificationKind::Success => {
                vec![tone(1000.0, 0.1, 80, 0), tone(1200.0, 0.1, 80, 100)]
            }
            NotificationKind::Default | NotificationKind::Warning | NotificationKind::Info => {
                vec![tone(700.0, 0.1, 100, 0)]
            }
        };
        Self { kind, tones }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
    Selection,
    Notification,
}

impl HapticPattern {
    pub fn pulses(self) -> &'static [u64] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[20],
            Self::Heavy => &[30],
            Self::Success => &[10, 50, 10],
            Self::Warning => &[20, 100, 20],
            Self::Error => &[30, 100, 30, 100, 30],
            Self::Selection => &[5],
            Self::Notification => &[15, 50, 15],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration_ms: u64,
    pub position: &'static str,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PhoneEffect {
    PlaySound(SoundCue),
    Haptic(HapticPattern),
    ApplyTheme(String),
    Toast(Toast),
}

pub trait EffectSink: Send + Sync {
    fn emit(&self, effect: PhoneEffect);
}

impl EffectSink for UnboundedSender<PhoneEffect> {
    fn emit(&self, effect: PhoneEffect) {
        if self.send(effect).is_err() {
            debug!("effect receiver dropped; effect discarded");
        }
    }
}

pub struct TracingEffectSink;

impl EffectSink for TracingEffectSink {
    fn emit(&self, effect: PhoneEffect) {
        match &effect {
            PhoneEffect::Toast(toast) => info!(
                kind = toast.kind.as_str(),
                title = %toast.title,
                message = %toast.message,
                "notification"
            ),
            other => debug!(effect = ?other, "phone effect"),
        }
    }
}

#[derive(Clone)]
pub struct Haptics {
    storage: Arc<dyn LocalStorage>,
    sink: Arc<dyn EffectSink>,
}

impl Haptics {
    pub fn new(storage: Arc<dyn LocalStorage>, sink: Arc<dyn EffectSink>) -> Self {
        Self { storage, sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.storage
            .get_item(HAPTIC_ENABLED_KEY)
            .map_or(true, |value| value == "true")
    }

    pub fn trigger(&self, pattern: HapticPattern) {
        if self.is_enabled() {
            self.sink.emit(PhoneEffect::Haptic(pattern));
        }
    }
}
