use serde::Serialize;
use shared::domain::{Contact, ContactId};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactsState {
    pub list: Vec<Contact>,
    pub search_query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactsMutation {
    SetList(Vec<Contact>),
    SetSearchQuery(String),
    Add(Contact),
    Update(Contact),
    Remove(ContactId),
}

impl ContactsState {
    pub fn apply(&mut self, mutation: ContactsMutation) {
        match mutation {
            ContactsMutation::SetList(list) => self.list = list,
            ContactsMutation::SetSearchQuery(query) => self.search_query = query,
            ContactsMutation::Add(contact) => self.list.push(contact),
            ContactsMutation::Update(contact) => {
                if let Some(slot) = self.list.iter_mut().find(|c| c.id == contact.id) {
                    *slot = contact;
                }
            }
            ContactsMutation::Remove(id) => self.list.retain(|c| c.id != id),
        }
    }

    pub fn filtered_contacts(&self) -> Vec<&Contact> {
        let query = self.search_query.to_lowercase();
        let mut contacts: Vec<&Contact> = self
            .list
            .iter()
            .filter(|c| {
                query.is_empty()
                    || c.contact_name.to_lowercase().contains(&query)
                    || c.contact_number.contains(&self.search_query)
            })
            .collect();
        contacts.sort_by(|a, b| {
            a.contact_name
                .to_lowercase()
                .cmp(&b.contact_name.to_lowercase())
                .then_with(|| a.contact_name.cmp(&b.contact_name))
        });
        contacts
    }
}
