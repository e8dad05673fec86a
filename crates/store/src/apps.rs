use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use shared::domain::{BankTransaction, Chirp, ChirpId, CryptoHolding, CryptoPrice};

pub const MAX_BANK_TRANSACTIONS: usize = 50;
pub const MAX_CHIRPER_FEED: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BankState {
    pub balance: f64,
    pub transactions: Vec<BankTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChirperState {
    pub feed: Vec<Chirp>,
    pub my_chirps: Vec<Chirp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CryptoState {
    pub portfolio: Vec<CryptoHolding>,
    pub prices: BTreeMap<String, CryptoPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppStoreState {
    pub available_apps: Vec<Value>,
    pub installed_apps: Vec<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppsState {
    pub bank: BankState,
    pub chirper: ChirperState,
    pub crypto: CryptoState,
    pub appstore: AppStoreState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppsMutation {
    SetBalance(f64),
    SetTransactions(Vec<BankTransaction>),
    AddTransaction(BankTransaction),
    SetChirperFeed(Vec<Chirp>),
    SetMyChirps(Vec<Chirp>),
    AddChirpToFeed(Chirp),
    AddMyChirp(Chirp),
    UpdateChirpLikes {
        chirp_id: ChirpId,
        likes: i64,
        is_liked: bool,
    },
    SetCryptoPortfolio(Vec<CryptoHolding>),
    SetCryptoPrices(BTreeMap<String, CryptoPrice>),
    UpdateCryptoPrices(BTreeMap<String, CryptoPrice>),
    UpdateCryptoHolding {
        crypto_type: String,
        amount: f64,
    },
    SetAvailableApps(Vec<Value>),
    SetInstalledApps(Vec<String>),
    SetAppStoreLoading(bool),
    InstallApp(String),
    UninstallApp(String),
}

impl AppsState {
    pub fn apply(&mut self, mutation: AppsMutation) {
        match mutation {
            AppsMutation::SetBalance(balance) => self.bank.balance = balance,
            AppsMutation::SetTransactions(transactions) => self.bank.transactions = transactions,
            AppsMutation::AddTransaction(transaction) => {
                self.bank.transactions.insert(0, transaction);
                self.bank.transactions.truncate(MAX_BANK_TRANSACTIONS);
            }
            AppsMutation::SetChirperFeed(feed) => self.chirper.feed = feed,
            AppsMutation::SetMyChirps(chirps) => self.chirper.my_chirps = chirps,
            AppsMutation::AddChirpToFeed(chirp) => {
                self.chirper.feed.insert(0, chirp);
                self.chirper.feed.truncate(MAX_CHIRPER_FEED);
            }
            AppsMutation::AddMyChirp(chirp) => self.chirper.my_chirps.insert(0, chirp),
            AppsMutation::UpdateChirpLikes {
                chirp_id,
                likes,
                is_liked,
            } => {
                let chirps = self
                    .chirper
                    .feed
                    .iter_mut()
                    .chain(self.chirper.my_chirps.iter_mut());
                for chirp in chirps.filter(|c| c.id == chirp_id) {
                    chirp.likes = likes;
                    chirp.is_liked = is_liked;
                }
            }
            AppsMutation::SetCryptoPortfolio(portfolio) => self.crypto.portfolio = portfolio,
            AppsMutation::SetCryptoPrices(prices) => self.crypto.prices = prices,
            AppsMutation::UpdateCryptoPrices(mut prices) => {
                for (symbol, price) in prices.iter_mut() {
                    if let Some(old) = self.crypto.prices.get(symbol) {
                        price.previous_price = Some(old.current_price);
                    }
                }
                self.crypto.prices = prices;
            }
            AppsMutation::UpdateCryptoHolding {
                crypto_type,
                amount,
            } => {
                match self
                    .crypto
                    .portfolio
                    .iter_mut()
                    .find(|h| h.crypto_type == crypto_type)
                {
                    Some(holding) => holding.amount = amount,
                    None if amount > 0.0 => self.crypto.portfolio.push(CryptoHolding {
                        crypto_type,
                        amount,
                    }),
                    None => {}
                }
            }
            AppsMutation::SetAvailableApps(apps) => self.appstore.available_apps = apps,
            AppsMutation::SetInstalledApps(apps) => self.appstore.installed_apps = apps,
            AppsMutation::SetAppStoreLoading(loading) => self.appstore.is_loading = loading,
            AppsMutation::InstallApp(app_id) => {
                if !self.appstore.installed_apps.contains(&app_id) {
                    self.appstore.installed_apps.push(app_id);
                }
            }
            AppsMutation::UninstallApp(app_id) => {
                self.appstore.installed_apps.retain(|id| *id != app_id);
            }
        }
    }
}
