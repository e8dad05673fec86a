use std::sync::Arc;

use chrono::Utc;
use locale::{currency::CurrencyError, I18n};
use shared::domain::NotificationKind;
use tracing::info;

use crate::effects::{EffectSink, HapticPattern, Haptics, PhoneEffect, Toast};

pub const DEFAULT_TOAST_POSITION: &str = "top-right";

#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn EffectSink>,
    i18n: Arc<I18n>,
    haptics: Option<Haptics>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn EffectSink>, i18n: Arc<I18n>) -> Self {
        Self {
            sink,
            i18n,
            haptics: None,
        }
    }

    pub fn with_haptics(mut self, haptics: Haptics) -> Self {
        self.haptics = Some(haptics);
        self
    }

    fn text(
        &self,
        key: &str,
        params: &[(&str, &str)],
        fallback: impl FnOnce() -> String,
    ) -> String {
        self.i18n.try_t(key, params).unwrap_or_else(fallback)
    }

    pub fn show(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Toast {
        let toast = Toast {
            kind,
            title: title.into(),
            message: message.into(),
            duration_ms,
            position: DEFAULT_TOAST_POSITION,
            timestamp: Utc::now().timestamp_millis(),
        };
        info!(
            kind = kind.as_str(),
            title = %toast.title,
            message = %toast.message,
            "toast"
        );
        if let Some(haptics) = &self.haptics {
            haptics.trigger(match kind {
                NotificationKind::Success => HapticPattern::Success,
                NotificationKind::Error => HapticPattern::Error,
                NotificationKind::Warning => HapticPattern::Warning,
                _ => HapticPattern::Notification,
            });
        }
        self.sink.emit(PhoneEffect::Toast(toast.clone()));
        toast
    }

    pub fn success(&self, message: impl Into<String>, title: Option<&str>) -> Toast {
        self.show(NotificationKind::Success, title.unwrap_or("Success"), message, 3000)
    }

    pub fn error(&self, message: impl Into<String>, title: Option<&str>) -> Toast {
        self.show(NotificationKind::Error, title.unwrap_or("Error"), message, 5000)
    }

    pub fn warning(&self, message: impl Into<String>, title: Option<&str>) -> Toast {
        self.show(NotificationKind::Warning, title.unwrap_or("Warning"), message, 4000)
    }

    pub fn info(&self, message: impl Into<String>, title: Option<&str>) -> Toast {
        self.show(NotificationKind::Info, title.unwrap_or("Info"), message, 3000)
    }

    pub fn currency_error(&self, error: &CurrencyError) -> Toast {
        let message = self.text(&error.message_key(), &[], || error.to_string());
        let title = self.text("currency.formatError", &[], || "Currency Error".to_string());
        self.error(message, Some(title.as_str()))
    }

    pub fn transaction_error(&self, error_key: &str) -> Toast {
        let message = self.text(&format!("currency.errors.{error_key}"), &[], || {
            "Transaction failed".to_string()
        });
        let title = self.text("bank.failed", &[], || "Transaction Failed".to_string());
        self.error(message, Some(title.as_str()))
    }

    pub fn insufficient_funds(&self) -> Toast {
        let message = self.text("currency.errors.insufficientFunds", &[], || {
            "Insufficient funds for this transaction".to_string()
        });
        let title = self.text("bank.insufficient", &[], || "Insufficient Funds".to_string());
        self.error(message, Some(title.as_str()))
    }

    pub fn amount_exceeds_maximum(&self, max_amount: &str) -> Toast {
        let message = self.text("currency.errors.exceedsMaximum", &[("max", max_amount)], || {
            format!("Amount exceeds maximum limit of {max_amount}")
        });
        let title = self.text("currency.formatError", &[], || "Amount Too Large".to_string());
        self.error(message, Some(title.as_str()))
    }

    pub fn contact_added(&self, contact_name: &str) -> Toast {
        let message = self.text(
            "contact_sharing.contact_added",
            &[("name", contact_name)],
            || format!("{contact_name} added to contacts"),
        );
        let title = self.text("contact_sharing.contact_added_title", &[], || {
            "Contact Added".to_string()
        });
        self.show(NotificationKind::Success, title, message, 3000)
    }

    pub fn share_success(&self, contact_name: &str) -> Toast {
        let message = self.text(
            "contact_sharing.contact_shared",
            &[("name", contact_name)],
            || format!("Contact shared with {contact_name}"),
        );
        let title = self.text("contact_sharing.share_success", &[], || {
            "Contact Shared".to_string()
        });
        self.show(NotificationKind::Success, title, message, 3000)
    }

    pub fn share_declined(&self, contact_name: &str) -> Toast {
        let message = self.text(
            "contact_sharing.request_declined",
            &[("name", contact_name)],
            || format!("{contact_name} declined your contact request"),
        );
        let title = self.text("contact_sharing.request_declined_title", &[], || {
            "Request Declined".to_string()
        });
        self.show(NotificationKind::Warning, title, message, 4000)
    }

    pub fn share_error(&self, error_message: Option<&str>) -> Toast {
        let title = self.text("contact_sharing.share_error", &[], || "Share Failed".to_string());
        let message = error_message
            .filter(|m| !m.is_empty())
            .map(|raw| {
                self.i18n
                    .try_t(&format!("contact_sharing.errors.{raw}"), &[])
                    .unwrap_or_else(|| raw.to_string())
            })
            .unwrap_or_else(|| "Failed to share contact".to_string());
        self.show(NotificationKind::Error, title, message, 5000)
    }

    pub fn broadcast_started(&self) -> Toast {
        let message = self.text("contact_sharing.visible_to_nearby", &[], || {
            "Your contact is visible to nearby players".to_string()
        });
        let title = self.text("contact_sharing.sharing_contact", &[], || {
            "Sharing Contact".to_string()
        });
        self.show(NotificationKind::Info, title, message, 3000)
    }

    pub fn broadcast_stopped(&self, reason: &str) -> Toast {
        let message = self.text(
            &format!("contact_sharing.broadcast_stopped_{reason}"),
            &[],
            || "Contact sharing stopped".to_string(),
        );
        let title = self.text("contact_sharing.sharing_stopped", &[], || {
            "Sharing Stopped".to_string()
        });
        self.show(NotificationKind::Info, title, message, 2000)
    }

    pub fn broadcast_contact_added(&self, added_by: &str) -> Toast {
        let message = self.text(
            "contact_sharing.broadcast_contact_added",
            &[("name", added_by)],
            || format!("{added_by} added your contact"),
        );
        let title = self.text("contact_sharing.contact_added_title", &[], || {
            "Contact Added".to_string()
        });
        self.show(NotificationKind::Success, title, message, 3000)
    }
}
