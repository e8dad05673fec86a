use std::collections::BTreeMap;

use serde::Serialize;
use shared::domain::TextMessage;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagesState {
    pub conversations: BTreeMap<String, Vec<TextMessage>>,
    pub unread_count: usize,
    pub active_conversation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessagesMutation {
    SetConversations(Vec<TextMessage>),
    SetUnreadCount(usize),
    SetActiveConversation(Option<String>),
    AddMessage(TextMessage),
    MarkConversationRead(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary<'a> {
    pub phone_number: &'a str,
    pub messages: &'a [TextMessage],
    pub last_message: Option<&'a TextMessage>,
    pub unread_count: usize,
    pub timestamp: i64,
}

fn is_unread_for(message: &TextMessage, my_number: &str) -> bool {
    !message.is_read && message.receiver_number == my_number
}

impl MessagesState {
    pub fn apply(&mut self, mutation: MessagesMutation, my_number: &str) {
        match mutation {
            MessagesMutation::SetConversations(messages) => {
                let mut conversations: BTreeMap<String, Vec<TextMessage>> = BTreeMap::new();
                self.unread_count = messages
                    .iter()
                    .filter(|m| is_unread_for(m, my_number))
                    .count();
                for message in messages {
                    conversations
                        .entry(message.other_party(my_number).to_string())
                        .or_default()
                        .push(message);
                }
                for thread in conversations.values_mut() {
                    thread.sort_by_key(TextMessage::created_at_millis);
                }
                self.conversations = conversations;
            }
            MessagesMutation::SetUnreadCount(count) => self.unread_count = count,
            MessagesMutation::SetActiveConversation(number) => self.active_conversation = number,
            MessagesMutation::AddMessage(message) => {
                if is_unread_for(&message, my_number) {
                    self.unread_count += 1;
                }
                self.conversations
                    .entry(message.other_party(my_number).to_string())
                    .or_default()
                    .push(message);
            }
            MessagesMutation::MarkConversationRead(number) => {
                if let Some(thread) = self.conversations.get_mut(&number) {
                    for message in thread.iter_mut().filter(|m| is_unread_for(m, my_number)) {
                        message.is_read = true;
                        self.unread_count = self.unread_count.saturating_sub(1);
                    }
                }
            }
        }
    }

    pub fn conversation_list(&self, my_number: &str) -> Vec<ConversationSummary<'_>> {
        let mut list: Vec<ConversationSummary<'_>> = self
            .conversations
            .iter()
            .map(|(number, messages)| {
                let last_message = messages.last();
                ConversationSummary {
                    phone_number: number,
                    messages,
                    last_message,
                    unread_count: messages.iter().filter(|m| is_unread_for(m, my_number)).count(),
                    timestamp: last_message.map_or(0, TextMessage::created_at_millis),
                }
            })
            .collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        list
    }

    pub fn active_messages(&self) -> &[TextMessage] {
        self.active_conversation
            .as_ref()
            .and_then(|number| self.conversations.get(number))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_unread(&self) -> usize {
        self.unread_count
    }
}
