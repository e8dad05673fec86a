use std::sync::Arc;

use locale::I18n;
use shared::{
    domain::{NotificationKind, NotificationRequest, SettingsSnapshot, CALL_SCREEN_APP},
    protocol::{HostAction, HostActionKind},
};
use store::{
    actions::now_millis,
    apps::AppsMutation,
    calls::CallsMutation,
    contacts::ContactsMutation,
    messages::MessagesMutation,
    notify::Notifier,
    phone::PhoneMutation,
    settings::SettingsMutation,
    Store,
};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid `{action}` payload: {source}")]
    InvalidPayload {
        action: HostActionKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{0}` needs an async runtime to continue")]
    NoRuntime(HostActionKind),
}

#[derive(Clone)]
pub struct ActionHandlers {
    store: Arc<Store>,
    i18n: Arc<I18n>,
    notifier: Notifier,
}

impl ActionHandlers {
    pub fn new(store: Arc<Store>, i18n: Arc<I18n>, notifier: Notifier) -> Self {
        Self {
            store,
            i18n,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn handle(&self, action: HostAction) -> Result<(), HandlerError> {
        let store = &self.store;
        let kind = action.kind();
        match action {
            HostAction::SetVisible(p) => store.commit(PhoneMutation::SetVisible(p.visible)),
            HostAction::SetPhoneNumber(p) => {
                store.commit(PhoneMutation::SetPhoneNumber(p.phone_number))
            }
            HostAction::SetTheme(p) => store.commit(SettingsMutation::SetTheme(p.into_theme())),
            HostAction::LoadPhoneData(p) => {
                if let Some(contacts) = p.contacts {
                    store.commit(ContactsMutation::SetList(contacts));
                }
                if let Some(messages) = p.messages {
                    store.commit(MessagesMutation::SetConversations(messages));
                }
                if let Some(history) = p.call_history {
                    store.commit(CallsMutation::SetHistory(history));
                }
            }
            HostAction::ShowNotification(request) | HostAction::Notification(request) => {
                store.show_notification(request);
            }
            HostAction::ReceiveMessage(message) => {
                store.receive_message(message);
            }
            HostAction::IncomingCall(p) => {
                store.commit(CallsMutation::ReceiveIncoming {
                    number: p.caller_number,
                    caller_name: p.caller_name,
                    at: now_millis(),
                });
                store.commit(PhoneMutation::SetCurrentApp(Some(CALL_SCREEN_APP.to_string())));
            }
            HostAction::CallAccepted => store.commit(CallsMutation::Connect { at: now_millis() }),
            HostAction::CallEnded => self.finish_call(None),
            HostAction::CallBusy => self.finish_call(Some("The person you are calling is busy")),
            HostAction::CallTimeout => self.finish_call(Some("Call timed out")),
            HostAction::UpdateCallState(p) => store.commit(CallsMutation::SetState(p.state)),
            HostAction::SwitchToCallScreen => {
                store.commit(PhoneMutation::SetCurrentApp(Some(CALL_SCREEN_APP.to_string())))
            }
            HostAction::NewTweet(chirp) => store.commit(AppsMutation::AddChirpToFeed(chirp)),
            HostAction::TweetLikeUpdate(p) => store.commit(AppsMutation::UpdateChirpLikes {
                chirp_id: p.tweet_id,
                likes: p.likes,
                is_liked: false,
            }),
            HostAction::SetVolume(p) => store.commit(SettingsMutation::SetVolume(p.into_volume())),
            HostAction::SetNotificationEnabled(p) => {
                store.commit(SettingsMutation::SetNotificationEnabled(p.into_enabled()))
            }
            HostAction::SetSoundEnabled(p) => {
                store.commit(SettingsMutation::SetSoundEnabled(p.into_enabled()))
            }
            HostAction::SetCustomSettings(p) => {
                for (key, value) in p.settings.unwrap_or_default() {
                    store.commit(SettingsMutation::SetCustomSetting { key, value });
                }
            }
            HostAction::SettingsLoaded(p) | HostAction::SettingsUpdated(p) => {
                if let Some(settings) = p.settings {
                    self.apply_settings(kind, settings)?;
                }
            }
            HostAction::SettingsError(p) => {
                store.show_notification(NotificationRequest::new(
                    NotificationKind::Error,
                    "Settings Error",
                    p.error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| "Failed to update settings".to_string()),
                ));
            }
            HostAction::ShowShareDeclinedNotification(p) => {
                self.notifier.share_declined(&p.contact_name);
            }
            HostAction::ShowShareErrorNotification(p) => {
                self.notifier.share_error(p.error_message.as_deref());
            }
            HostAction::ShowBroadcastContactAddedNotification(p) => {
                self.notifier.broadcast_contact_added(&p.added_by);
            }
        }
        Ok(())
    }

    fn finish_call(&self, failure: Option<&str>) {
        self.store.commit(CallsMutation::Finish { at: now_millis() });
        self.store.commit(PhoneMutation::SetCurrentApp(None));
        if let Some(reason) = failure {
            self.store.show_notification(NotificationRequest::new(
                NotificationKind::Error,
                "Call Failed",
                reason,
            ));
        }
    }

    fn apply_settings(
        &self,
        kind: HostActionKind,
        settings: SettingsSnapshot,
    ) -> Result<(), HandlerError> {
        let locale = settings.locale.clone();
        self.store.commit(SettingsMutation::SetAllSettings(settings));

        let Some(code) = locale.filter(|c| !c.is_empty()) else {
            return Ok(());
        };
        let runtime = Handle::try_current().map_err(|_| HandlerError::NoRuntime(kind))?;
        let i18n = Arc::clone(&self.i18n);
        runtime.spawn(async move {
            if !i18n.load_locale_from_settings(Some(&code)) {
                warn!(locale = %code, "unsupported locale in settings");
                return;
            }
            let locale = i18n.current_locale();
            if i18n.load_locale_messages(locale).await {
                debug!(locale = %locale, "locale switched from settings");
            }
        });
        Ok(())
    }
}
