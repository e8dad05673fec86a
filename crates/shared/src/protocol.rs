use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{
        CallRecord, CallState, Chirp, ChirpId, Contact, NotificationRequest, SettingsSnapshot,
        TextMessage,
    },
    error::{ErrorCode, RpcFailure},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ActionEnvelope {
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: Some(action.into()),
            data: Some(data),
        }
    }
}

macro_rules! action_table {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $wire:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownAction;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownAction(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

action_table! {
    pub enum HostActionKind {
        SetVisible => "setVisible",
        SetPhoneNumber => "setPhoneNumber",
        SetTheme => "setTheme",
        LoadPhoneData => "loadPhoneData",
        ShowNotification => "showNotification",
        Notification => "notification",
        ReceiveMessage => "receiveMessage",
        IncomingCall => "incomingCall",
        CallAccepted => "callAccepted",
        CallEnded => "callEnded",
        CallBusy => "callBusy",
        CallTimeout => "callTimeout",
        UpdateCallState => "updateCallState",
        SwitchToCallScreen => "switchToCallScreen",
        NewTweet => "newTweet",
        TweetLikeUpdate => "tweetLikeUpdate",
        SetVolume => "setVolume",
        SetNotificationEnabled => "setNotificationEnabled",
        SetSoundEnabled => "setSoundEnabled",
        SetCustomSettings => "setCustomSettings",
        SettingsLoaded => "settingsLoaded",
        SettingsUpdated => "settingsUpdated",
        SettingsError => "settingsError",
        ShowShareDeclinedNotification => "showShareDeclinedNotification",
        ShowShareErrorNotification => "showShareErrorNotification",
        ShowBroadcastContactAddedNotification => "showBroadcastContactAddedNotification",
    }
}

action_table! {
    pub enum RpcAction {
        GetMessages => "getMessages",
        SendMessage => "sendMessage",
        MarkMessagesRead => "markMessagesRead",
        GetContacts => "getContacts",
        AddContact => "addContact",
        EditContact => "editContact",
        DeleteContact => "deleteContact",
        InitiateCall => "initiateCall",
        AcceptCall => "acceptCall",
        EndCall => "endCall",
        GetCallHistory => "getCallHistory",
        GetBankData => "getBankData",
        TransferMoney => "transferMoney",
        GetChirperFeed => "getChirperFeed",
        PostChirp => "postChirp",
        LikeChirp => "likeChirp",
        GetCryptoData => "getCryptoData",
        TradeCrypto => "tradeCrypto",
        GetAvailableApps => "getAvailableApps",
        InstallApp => "installApp",
        UninstallApp => "uninstallApp",
        GetSettings => "getSettings",
        UpdateSettings => "updateSettings",
        UpdateSetting => "updateSetting",
        GetMedia => "getMedia",
        DeleteMedia => "deleteMedia",
        BulkDeleteMedia => "bulkDeleteMedia",
        GetAlbums => "getAlbums",
        CreateAlbum => "createAlbum",
        UpdateAlbum => "updateAlbum",
        DeleteAlbum => "deleteAlbum",
        AddMediaToAlbum => "addMediaToAlbum",
        RemoveMediaFromAlbum => "removeMediaFromAlbum",
        GetAlbumMedia => "getAlbumMedia",
        SetAlbumCover => "setAlbumCover",
        GetVehicles => "garage:getVehicles",
        RequestValet => "garage:requestValet",
        LocateVehicle => "garage:locateVehicle",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisibilityPayload {
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneNumberPayload {
    pub phone_number: String,
}

/// Accepts `{ "theme": "dark" }` as well as a bare `"dark"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThemePayload {
    Wrapped { theme: String },
    Bare(String),
}

impl ThemePayload {
    pub fn into_theme(self) -> String {
        match self {
            Self::Wrapped { theme } | Self::Bare(theme) => theme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VolumePayload {
    Wrapped { volume: f64 },
    Bare(f64),
}

impl VolumePayload {
    pub fn into_volume(self) -> f64 {
        match self {
            Self::Wrapped { volume } | Self::Bare(volume) => volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TogglePayload {
    Wrapped { enabled: bool },
    Bare(bool),
}

impl TogglePayload {
    pub fn into_enabled(self) -> bool {
        match self {
            Self::Wrapped { enabled } | Self::Bare(enabled) => enabled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhoneDataPayload {
    pub contacts: Option<Vec<Contact>>,
    pub messages: Option<Vec<TextMessage>>,
    pub call_history: Option<Vec<CallRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingCallPayload {
    pub caller_number: String,
    pub caller_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CallStatePayload {
    pub state: CallState,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TweetLikePayload {
    pub tweet_id: ChirpId,
    pub likes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomSettingsPayload {
    pub settings: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsPayload {
    pub settings: Option<SettingsSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsErrorPayload {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareDeclinedPayload {
    pub contact_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareErrorPayload {
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BroadcastContactAddedPayload {
    pub added_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    SetVisible(VisibilityPayload),
    SetPhoneNumber(PhoneNumberPayload),
    SetTheme(ThemePayload),
    LoadPhoneData(PhoneDataPayload),
    ShowNotification(NotificationRequest),
    Notification(NotificationRequest),
    ReceiveMessage(TextMessage),
    IncomingCall(IncomingCallPayload),
    CallAccepted,
    CallEnded,
    CallBusy,
    CallTimeout,
    UpdateCallState(CallStatePayload),
    SwitchToCallScreen,
    NewTweet(Chirp),
    TweetLikeUpdate(TweetLikePayload),
    SetVolume(VolumePayload),
    SetNotificationEnabled(TogglePayload),
    SetSoundEnabled(TogglePayload),
    SetCustomSettings(CustomSettingsPayload),
    SettingsLoaded(SettingsPayload),
    SettingsUpdated(SettingsPayload),
    SettingsError(SettingsErrorPayload),
    ShowShareDeclinedNotification(ShareDeclinedPayload),
    ShowShareErrorNotification(ShareErrorPayload),
    ShowBroadcastContactAddedNotification(BroadcastContactAddedPayload),
}

impl HostAction {
    /// Decodes `data` for `kind`. A missing payload decodes as `{}` so that
    /// record payloads fall back to their defaults; payloads without an
    /// object form (bare theme, volume or toggle values) still fail.
    pub fn decode(kind: HostActionKind, data: Option<Value>) -> Result<Self, serde_json::Error> {
        let data = match data {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        Ok(match kind {
            HostActionKind::SetVisible => Self::SetVisible(payload(data)?),
            HostActionKind::SetPhoneNumber => Self::SetPhoneNumber(payload(data)?),
            HostActionKind::SetTheme => Self::SetTheme(payload(data)?),
            HostActionKind::LoadPhoneData => Self::LoadPhoneData(payload(data)?),
            HostActionKind::ShowNotification => Self::ShowNotification(payload(data)?),
            HostActionKind::Notification => Self::Notification(payload(data)?),
            HostActionKind::ReceiveMessage => Self::ReceiveMessage(payload(data)?),
            HostActionKind::IncomingCall => Self::IncomingCall(payload(data)?),
            HostActionKind::CallAccepted => Self::CallAccepted,
            HostActionKind::CallEnded => Self::CallEnded,
            HostActionKind::CallBusy => Self::CallBusy,
            HostActionKind::CallTimeout => Self::CallTimeout,
            HostActionKind::UpdateCallState => Self::UpdateCallState(payload(data)?),
            HostActionKind::SwitchToCallScreen => Self::SwitchToCallScreen,
            HostActionKind::NewTweet => Self::NewTweet(payload(data)?),
            HostActionKind::TweetLikeUpdate => Self::TweetLikeUpdate(payload(data)?),
            HostActionKind::SetVolume => Self::SetVolume(payload(data)?),
            HostActionKind::SetNotificationEnabled => {
                Self::SetNotificationEnabled(payload(data)?)
            }
            HostActionKind::SetSoundEnabled => Self::SetSoundEnabled(payload(data)?),
            HostActionKind::SetCustomSettings => Self::SetCustomSettings(payload(data)?),
            HostActionKind::SettingsLoaded => Self::SettingsLoaded(payload(data)?),
            HostActionKind::SettingsUpdated => Self::SettingsUpdated(payload(data)?),
            HostActionKind::SettingsError => Self::SettingsError(payload(data)?),
            HostActionKind::ShowShareDeclinedNotification => {
                Self::ShowShareDeclinedNotification(payload(data)?)
            }
            HostActionKind::ShowShareErrorNotification => {
                Self::ShowShareErrorNotification(payload(data)?)
            }
            HostActionKind::ShowBroadcastContactAddedNotification => {
                Self::ShowBroadcastContactAddedNotification(payload(data)?)
            }
        })
    }

    pub fn kind(&self) -> HostActionKind {
        match self {
            Self::SetVisible(_) => HostActionKind::SetVisible,
            Self::SetPhoneNumber(_) => HostActionKind::SetPhoneNumber,
            Self::SetTheme(_) => HostActionKind::SetTheme,
            Self::LoadPhoneData(_) => HostActionKind::LoadPhoneData,
            Self::ShowNotification(_) => HostActionKind::ShowNotification,
            Self::Notification(_) => HostActionKind::Notification,
            Self::ReceiveMessage(_) => HostActionKind::ReceiveMessage,
            Self::IncomingCall(_) => HostActionKind::IncomingCall,
            Self::CallAccepted => HostActionKind::CallAccepted,
            Self::CallEnded => HostActionKind::CallEnded,
            Self::CallBusy => HostActionKind::CallBusy,
            Self::CallTimeout => HostActionKind::CallTimeout,
            Self::UpdateCallState(_) => HostActionKind::UpdateCallState,
            Self::SwitchToCallScreen => HostActionKind::SwitchToCallScreen,
            Self::NewTweet(_) => HostActionKind::NewTweet,
            Self::TweetLikeUpdate(_) => HostActionKind::TweetLikeUpdate,
            Self::SetVolume(_) => HostActionKind::SetVolume,
            Self::SetNotificationEnabled(_) => HostActionKind::SetNotificationEnabled,
            Self::SetSoundEnabled(_) => HostActionKind::SetSoundEnabled,
            Self::SetCustomSettings(_) => HostActionKind::SetCustomSettings,
            Self::SettingsLoaded(_) => HostActionKind::SettingsLoaded,
            Self::SettingsUpdated(_) => HostActionKind::SettingsUpdated,
            Self::SettingsError(_) => HostActionKind::SettingsError,
            Self::ShowShareDeclinedNotification(_) => {
                HostActionKind::ShowShareDeclinedNotification
            }
            Self::ShowShareErrorNotification(_) => HostActionKind::ShowShareErrorNotification,
            Self::ShowBroadcastContactAddedNotification(_) => {
                HostActionKind::ShowBroadcastContactAddedNotification
            }
        }
    }
}

fn payload<T: DeserializeOwned>(data: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RpcResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(code: ErrorCode) -> Self {
        Self {
            success: false,
            error: Some(code.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => serde_json::from_value(value.clone()).ok(),
        }
    }

    pub fn success_field<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        if self.success {
            self.field(name)
        } else {
            None
        }
    }

    pub fn into_result(self) -> Result<Self, RpcFailure> {
        if self.success {
            return Ok(self);
        }
        let code = self
            .error
            .clone()
            .unwrap_or_else(|| "UNKNOWN_ERROR".to_string());
        let message = self.message.clone().unwrap_or_else(|| code.clone());
        Err(RpcFailure::new(code, message))
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
