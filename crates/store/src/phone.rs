use serde::Serialize;
use serde_json::Value;
use shared::domain::{NotificationId, NotificationKind, NotificationRequest};

pub const DEFAULT_NOTIFICATION_TITLE: &str = "Notification";
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 5000;
pub const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration_ms: u64,
    pub sound: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Notification {
    pub fn from_request(id: NotificationId, request: NotificationRequest) -> Self {
        Self {
            id,
            kind: request.kind.unwrap_or_default(),
            title: request
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
            message: request.message.unwrap_or_default(),
            duration_ms: request
                .duration
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_NOTIFICATION_DURATION_MS),
            sound: request.sound.unwrap_or(true),
            data: request.data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneState {
    pub is_visible: bool,
    pub phone_number: String,
    pub current_app: Option<String>,
    pub notifications: Vec<Notification>,
    pub notification_queue: Vec<Notification>,
    pub max_notifications: usize,
    last_notification_id: u64,
}

impl Default for PhoneState {
    fn default() -> Self {
        Self {
            is_visible: false,
            phone_number: String::new(),
            current_app: None,
            notifications: Vec::new(),
            notification_queue: Vec::new(),
            max_notifications: MAX_VISIBLE_NOTIFICATIONS,
            last_notification_id: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhoneMutation {
    SetVisible(bool),
    SetPhoneNumber(String),
    SetCurrentApp(Option<String>),
    AddNotification(Notification),
    RemoveNotification(NotificationId),
    ClearAllNotifications,
}

impl PhoneState {
    pub fn next_notification_id(&mut self) -> NotificationId {
        self.last_notification_id += 1;
        NotificationId(self.last_notification_id)
    }

    pub fn apply(&mut self, mutation: PhoneMutation) {
        match mutation {
            PhoneMutation::SetVisible(visible) => self.is_visible = visible,
            PhoneMutation::SetPhoneNumber(number) => self.phone_number = number,
            PhoneMutation::SetCurrentApp(app) => self.current_app = app,
            PhoneMutation::AddNotification(notification) => {
                if self.notifications.len() >= self.max_notifications {
                    self.notification_queue.push(notification);
                } else {
                    self.notifications.push(notification);
                }
            }
            PhoneMutation::RemoveNotification(id) => {
                self.notifications.retain(|n| n.id != id);
                self.notification_queue.retain(|n| n.id != id);
                while self.notifications.len() < self.max_notifications
                    && !self.notification_queue.is_empty()
                {
                    let next = self.notification_queue.remove(0);
                    self.notifications.push(next);
                }
            }
            PhoneMutation::ClearAllNotifications => {
                self.notifications.clear();
                self.notification_queue.clear();
            }
        }
    }

    pub fn notification_ids(&self) -> impl Iterator<Item = NotificationId> + '_ {
        self.notifications
            .iter()
            .chain(self.notification_queue.iter())
            .map(|n| n.id)
    }
}
