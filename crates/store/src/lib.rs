pub mod actions;
pub mod apps;
pub mod calls;
pub mod contacts;
pub mod effects;
pub mod garage;
pub mod media;
pub mod messages;
pub mod notify;
pub mod phone;
pub mod settings;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use serde::Serialize;
use shared::domain::{NotificationId, NotificationKind, NotificationRequest, TextMessage};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    apps::{AppsMutation, AppsState},
    calls::{CallsMutation, CallsState},
    contacts::{ContactsMutation, ContactsState},
    effects::{EffectSink, PhoneEffect, SoundCue},
    garage::{GarageMutation, GarageState},
    media::{MediaMutation, MediaState},
    messages::{MessagesMutation, MessagesState},
    phone::{Notification, PhoneMutation, PhoneState},
    settings::{SettingsMutation, SettingsState},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootState {
    pub phone: PhoneState,
    pub contacts: ContactsState,
    pub messages: MessagesState,
    pub calls: CallsState,
    pub apps: AppsState,
    pub settings: SettingsState,
    pub media: MediaState,
    pub garage: GarageState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Phone(PhoneMutation),
    Contacts(ContactsMutation),
    Messages(MessagesMutation),
    Calls(CallsMutation),
    Apps(AppsMutation),
    Settings(SettingsMutation),
    Media(MediaMutation),
    Garage(GarageMutation),
}

macro_rules! mutation_from {
    ($($module:ident => $variant:ident,)+) => {
        $(impl From<$module> for Mutation {
            fn from(mutation: $module) -> Self {
                Mutation::$variant(mutation)
            }
        })+
    };
}

mutation_from! {
    PhoneMutation => Phone,
    ContactsMutation => Contacts,
    MessagesMutation => Messages,
    CallsMutation => Calls,
    AppsMutation => Apps,
    SettingsMutation => Settings,
    MediaMutation => Media,
    GarageMutation => Garage,
}

impl RootState {
    pub fn apply(&mut self, mutation: Mutation) -> Option<PhoneEffect> {
        match mutation {
            Mutation::Phone(m) => self.phone.apply(m),
            Mutation::Contacts(m) => self.contacts.apply(m),
            Mutation::Messages(m) => self.messages.apply(m, &self.phone.phone_number),
            Mutation::Calls(m) => self.calls.apply(m),
            Mutation::Apps(m) => self.apps.apply(m),
            Mutation::Settings(m) => return self.settings.apply(m),
            Mutation::Media(m) => self.media.apply(m),
            Mutation::Garage(m) => self.garage.apply(m),
        }
        None
    }
}

pub struct Store {
    state: Mutex<RootState>,
    effects: Arc<dyn EffectSink>,
    timers: Mutex<HashMap<NotificationId, JoinHandle<()>>>,
}

impl Store {
    pub fn new(effects: Arc<dyn EffectSink>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RootState::default()),
            effects,
            timers: Mutex::new(HashMap::new()),
        })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RootState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, HashMap<NotificationId, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `mutation` atomically. Any requested effect is emitted after
    /// the state lock is released.
    pub fn commit(&self, mutation: impl Into<Mutation>) {
        let effect = self.lock_state().apply(mutation.into());
        if let Some(effect) = effect {
            self.effects.emit(effect);
        }
    }

    pub fn snapshot(&self) -> RootState {
        self.lock_state().clone()
    }

    pub fn read<T>(&self, f: impl FnOnce(&RootState) -> T) -> T {
        f(&self.lock_state())
    }

    pub fn emit(&self, effect: PhoneEffect) {
        self.effects.emit(effect);
    }

    pub fn effects(&self) -> Arc<dyn EffectSink> {
        Arc::clone(&self.effects)
    }

    pub fn show_notification(self: &Arc<Self>, request: NotificationRequest) -> NotificationId {
        let (notification, sound_allowed) = {
            let mut state = self.lock_state();
            let id = state.phone.next_notification_id();
            let notification = Notification::from_request(id, request);
            state
                .phone
                .apply(PhoneMutation::AddNotification(notification.clone()));
            (notification, state.settings.sound_enabled)
        };

        debug!(
            id = notification.id.0,
            kind = notification.kind.as_str(),
            title = %notification.title,
            "notification added"
        );

        if notification.sound && sound_allowed {
            self.effects
                .emit(PhoneEffect::PlaySound(SoundCue::for_kind(notification.kind)));
        }

        self.schedule_dismiss(notification.id, Duration::from_millis(notification.duration_ms));
        notification.id
    }

    fn schedule_dismiss(self: &Arc<Self>, id: NotificationId, after: Duration) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(id = id.0, "no async runtime; notification will not auto-dismiss");
            return;
        };
        let store: Weak<Self> = Arc::downgrade(self);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(store) = store.upgrade() {
                store.lock_timers().remove(&id);
                store.commit(PhoneMutation::RemoveNotification(id));
            }
        });
        self.lock_timers().insert(id, timer);
    }

    pub fn dismiss_notification(&self, id: NotificationId) {
        if let Some(timer) = self.lock_timers().remove(&id) {
            timer.abort();
        }
        self.commit(PhoneMutation::RemoveNotification(id));
    }

    pub fn clear_notifications(&self) {
        for (_, timer) in self.lock_timers().drain() {
            timer.abort();
        }
        self.commit(PhoneMutation::ClearAllNotifications);
    }

    pub fn receive_message(self: &Arc<Self>, message: TextMessage) -> NotificationId {
        let request = NotificationRequest {
            data: serde_json::to_value(&message).ok(),
            ..NotificationRequest::new(
                NotificationKind::Message,
                "New Message",
                format!("From: {}", message.sender_number),
            )
        };
        self.commit(MessagesMutation::AddMessage(message));
        self.show_notification(request)
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        let timers = self.timers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, timer) in timers.drain() {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
