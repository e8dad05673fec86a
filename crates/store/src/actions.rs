use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use locale::{
    currency::{validate_currency, ValidationOptions},
    Locale,
};
use nui_bridge::HostRpc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use shared::{
    domain::{
        BankTransaction, CallRecord, Chirp, ChirpId, Contact, ContactId, CryptoHolding,
        CryptoPrice, SettingsSnapshot, TextMessage,
    },
    protocol::{RpcAction, RpcResponse},
};
use tracing::{debug, warn};

use crate::{
    apps::AppsMutation, calls::CallsMutation, contacts::ContactsMutation,
    messages::MessagesMutation, settings::SettingsMutation, Store,
};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactDraft {
    pub contact_name: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Clone)]
pub struct PhoneActions {
    store: Arc<Store>,
    rpc: Arc<dyn HostRpc>,
}

impl PhoneActions {
    pub fn new(store: Arc<Store>, rpc: Arc<dyn HostRpc>) -> Self {
        Self { store, rpc }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub(crate) async fn call(&self, action: RpcAction, payload: Value) -> RpcResponse {
        let response = self.rpc.call_action(action, payload).await;
        if response.success {
            debug!(action = %action, "host call succeeded");
        } else {
            warn!(
                action = %action,
                error = response.error.as_deref().unwrap_or("UNKNOWN_ERROR"),
                "host call failed"
            );
        }
        response
    }

    // contacts

    pub async fn fetch_contacts(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetContacts, json!({})).await;
        if response.success {
            let contacts: Vec<Contact> = response.field("contacts").unwrap_or_default();
            self.store.commit(ContactsMutation::SetList(contacts));
        }
        response
    }

    pub async fn add_contact(&self, draft: &ContactDraft) -> RpcResponse {
        let response = self.call(RpcAction::AddContact, json!(draft)).await;
        if let Some(contact) = response.success_field::<Contact>("contact") {
            self.store.commit(ContactsMutation::Add(contact));
        }
        response
    }

    pub async fn edit_contact(&self, id: ContactId, draft: &ContactDraft) -> RpcResponse {
        let payload = json!({
            "id": id,
            "contact_name": draft.contact_name,
            "contact_number": draft.contact_number,
        });
        let response = self.call(RpcAction::EditContact, payload).await;
        if let Some(contact) = response.success_field::<Contact>("contact") {
            self.store.commit(ContactsMutation::Update(contact));
        }
        response
    }

    pub async fn delete_contact(&self, id: ContactId) -> RpcResponse {
        let response = self
            .call(RpcAction::DeleteContact, json!({ "id": id }))
            .await;
        if response.success {
            self.store.commit(ContactsMutation::Remove(id));
        }
        response
    }

    // messages

    pub async fn fetch_messages(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetMessages, json!({})).await;
        if response.success {
            let messages: Vec<TextMessage> = response.field("messages").unwrap_or_default();
            self.store.commit(MessagesMutation::SetConversations(messages));
        }
        response
    }

    pub async fn send_message(&self, target_number: &str, message: &str) -> RpcResponse {
        let payload = json!({ "targetNumber": target_number, "message": message });
        let response = self.call(RpcAction::SendMessage, payload).await;
        if let Some(sent) = response.success_field::<TextMessage>("message") {
            self.store.commit(MessagesMutation::AddMessage(sent));
        }
        response
    }

    pub async fn mark_as_read(&self, phone_number: &str) -> RpcResponse {
        let payload = json!({ "phoneNumber": phone_number });
        let response = self.call(RpcAction::MarkMessagesRead, payload).await;
        if response.success {
            self.store
                .commit(MessagesMutation::MarkConversationRead(phone_number.to_string()));
        }
        response
    }

    // calls

    pub async fn initiate_call(&self, phone_number: &str) -> RpcResponse {
        let payload = json!({ "phoneNumber": phone_number });
        let response = self.call(RpcAction::InitiateCall, payload).await;
        if response.success {
            self.store.commit(CallsMutation::StartOutgoing {
                number: phone_number.to_string(),
                at: now_millis(),
            });
        }
        response
    }

    pub async fn accept_call(&self) -> RpcResponse {
        let response = self.call(RpcAction::AcceptCall, json!({})).await;
        if response.success {
            self.store.commit(CallsMutation::Connect { at: now_millis() });
        }
        response
    }

    pub async fn end_call(&self) -> RpcResponse {
        let response = self.call(RpcAction::EndCall, json!({})).await;
        if response.success {
            self.store.commit(CallsMutation::Finish { at: now_millis() });
        }
        response
    }

    pub async fn get_call_history(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetCallHistory, json!({})).await;
        if let Some(history) = response.success_field::<Vec<CallRecord>>("history") {
            self.store.commit(CallsMutation::SetHistory(history));
        }
        response
    }

    // bank

    pub async fn fetch_bank_data(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetBankData, json!({})).await;
        if response.success {
            let balance = response.field::<f64>("balance").unwrap_or(0.0);
            let transactions: Vec<BankTransaction> =
                response.field("transactions").unwrap_or_default();
            self.store.commit(AppsMutation::SetBalance(balance));
            self.store.commit(AppsMutation::SetTransactions(transactions));
        }
        response
    }

    pub async fn transfer_money(
        &self,
        target_number: &str,
        amount: f64,
        locale: Locale,
    ) -> RpcResponse {
        let options = ValidationOptions {
            locale,
            ..ValidationOptions::default()
        };
        let amount = match validate_currency(amount, &options) {
            Ok(amount) => amount,
            Err(err) => {
                debug!(%err, "transfer rejected before sending");
                return RpcResponse {
                    success: false,
                    error: Some(err.key().to_string()),
                    message: Some(err.to_string()),
                    fields: Map::new(),
                };
            }
        };

        let payload = json!({ "targetNumber": target_number, "amount": amount });
        let response = self.call(RpcAction::TransferMoney, payload).await;
        if response.success {
            if let Some(balance) = response.field::<f64>("newBalance") {
                self.store.commit(AppsMutation::SetBalance(balance));
            }
            let now = now_millis();
            self.store.commit(AppsMutation::AddTransaction(BankTransaction {
                id: now,
                kind: "sent".to_string(),
                phone_number: Some(target_number.to_string()),
                amount,
                timestamp: now,
                extra: Map::new(),
            }));
        }
        response
    }

    // chirper

    pub async fn fetch_chirper_feed(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetChirperFeed, json!({})).await;
        if response.success {
            let feed: Vec<Chirp> = response.field("feed").unwrap_or_default();
            let mine: Vec<Chirp> = response.field("myChirps").unwrap_or_default();
            self.store.commit(AppsMutation::SetChirperFeed(feed));
            self.store.commit(AppsMutation::SetMyChirps(mine));
        }
        response
    }

    pub async fn post_chirp(&self, content: &str) -> RpcResponse {
        let response = self
            .call(RpcAction::PostChirp, json!({ "content": content }))
            .await;
        if let Some(chirp) = response.success_field::<Chirp>("chirp") {
            self.store.commit(AppsMutation::AddChirpToFeed(chirp.clone()));
            self.store.commit(AppsMutation::AddMyChirp(chirp));
        }
        response
    }

    pub async fn like_chirp(&self, chirp_id: ChirpId) -> RpcResponse {
        let response = self
            .call(RpcAction::LikeChirp, json!({ "chirpId": chirp_id }))
            .await;
        if response.success {
            if let Some(likes) = response.field::<i64>("likes") {
                self.store.commit(AppsMutation::UpdateChirpLikes {
                    chirp_id,
                    likes,
                    is_liked: response.field("isLiked").unwrap_or(false),
                });
            }
        }
        response
    }

    // crypto

    pub async fn fetch_crypto_data(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetCryptoData, json!({})).await;
        if response.success {
            let portfolio: Vec<CryptoHolding> = response.field("portfolio").unwrap_or_default();
            let prices: BTreeMap<String, CryptoPrice> =
                response.field("prices").unwrap_or_default();
            self.store.commit(AppsMutation::SetCryptoPortfolio(portfolio));
            self.store.commit(AppsMutation::SetCryptoPrices(prices));
        }
        response
    }

    pub async fn trade_crypto(
        &self,
        crypto_type: &str,
        amount: f64,
        side: TradeSide,
    ) -> RpcResponse {
        let payload = json!({ "cryptoType": crypto_type, "amount": amount, "action": side });
        let response = self.call(RpcAction::TradeCrypto, payload).await;
        if response.success {
            if let Some(new_amount) = response.field::<f64>("newAmount") {
                self.store.commit(AppsMutation::UpdateCryptoHolding {
                    crypto_type: crypto_type.to_string(),
                    amount: new_amount,
                });
            }
            if let Some(balance) = response.field::<f64>("newBalance") {
                self.store.commit(AppsMutation::SetBalance(balance));
            }
        }
        response
    }

    // app store

    pub async fn fetch_app_store_data(&self) -> RpcResponse {
        self.store.commit(AppsMutation::SetAppStoreLoading(true));
        let response = self.call(RpcAction::GetAvailableApps, json!({})).await;
        if response.success {
            let available: Vec<Value> = response.field("apps").unwrap_or_default();
            let installed: Vec<String> = response.field("installedApps").unwrap_or_default();
            self.store.commit(AppsMutation::SetAvailableApps(available));
            self.store.commit(AppsMutation::SetInstalledApps(installed));
        }
        self.store.commit(AppsMutation::SetAppStoreLoading(false));
        response
    }

    pub async fn install_app(&self, app_id: &str) -> RpcResponse {
        let response = self
            .call(RpcAction::InstallApp, json!({ "appId": app_id }))
            .await;
        if response.success {
            self.store.commit(AppsMutation::InstallApp(app_id.to_string()));
        }
        response
    }

    pub async fn uninstall_app(&self, app_id: &str) -> RpcResponse {
        let response = self
            .call(RpcAction::UninstallApp, json!({ "appId": app_id }))
            .await;
        if response.success {
            self.store.commit(AppsMutation::UninstallApp(app_id.to_string()));
        }
        response
    }

    // settings

    pub async fn load_settings(&self) -> RpcResponse {
        let response = self.call(RpcAction::GetSettings, json!({})).await;
        match response.success_field::<SettingsSnapshot>("settings") {
            Some(settings) => self.store.commit(SettingsMutation::SetAllSettings(settings)),
            None if response.success => warn!("settings response carried no settings"),
            None => {}
        }
        response
    }

    pub async fn update_settings(&self, updates: SettingsSnapshot) -> RpcResponse {
        let response = self
            .call(RpcAction::UpdateSettings, json!({ "settings": updates }))
            .await;
        if response.success {
            if let Some(theme) = updates.theme {
                self.store.commit(SettingsMutation::SetTheme(theme));
            }
            if let Some(enabled) = updates.notification_enabled {
                self.store.commit(SettingsMutation::SetNotificationEnabled(enabled));
            }
            if let Some(enabled) = updates.sound_enabled {
                self.store.commit(SettingsMutation::SetSoundEnabled(enabled));
            }
            if let Some(volume) = updates.volume {
                self.store.commit(SettingsMutation::SetVolume(volume));
            }
            for (key, value) in updates.custom_settings.unwrap_or_default() {
                self.store
                    .commit(SettingsMutation::SetCustomSetting { key, value });
            }
        }
        response
    }

    pub async fn update_setting(&self, key: &str, value: Value) -> RpcResponse {
        let response = self
            .call(RpcAction::UpdateSetting, json!({ "key": key, "value": value }))
            .await;
        if !response.success {
            return response;
        }
        let mutation = match (key, &value) {
            ("theme", Value::String(theme)) => Some(SettingsMutation::SetTheme(theme.clone())),
            ("notificationEnabled", Value::Bool(enabled)) => {
                Some(SettingsMutation::SetNotificationEnabled(*enabled))
            }
            ("soundEnabled", Value::Bool(enabled)) => {
                Some(SettingsMutation::SetSoundEnabled(*enabled))
            }
            ("volume", Value::Number(volume)) => volume.as_f64().map(SettingsMutation::SetVolume),
            _ => None,
        };
        match mutation {
            Some(mutation) => self.store.commit(mutation),
            None => debug!(key, "setting stored by host only"),
        }
        response
    }

    pub async fn change_theme(&self, theme: &str) -> RpcResponse {
        self.update_setting("theme", json!(theme)).await
    }

    pub async fn toggle_notifications(&self) -> RpcResponse {
        let enabled = self.store.read(|s| s.settings.notification_enabled);
        self.update_setting("notificationEnabled", json!(!enabled)).await
    }

    pub async fn toggle_sound(&self) -> RpcResponse {
        let enabled = self.store.read(|s| s.settings.sound_enabled);
        self.update_setting("soundEnabled", json!(!enabled)).await
    }

    pub async fn set_volume_level(&self, volume: f64) -> RpcResponse {
        self.update_setting("volume", json!(volume)).await
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
