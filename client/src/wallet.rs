// Bountyhub
// Copyright (C) 2026 The Bountyhub developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Wallet providers.
//!
//! Wallets are injected into the environment under a well known global name. A [WalletHost]
//! gives access to these globals. [WalletProvider::detect] looks up the supported names in order
//! of preference and wraps the first wallet found.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::backend::{RemoteAccount, RemoteNode};
use crate::interface::*;

/// Global name the ArgentX wallet is injected under.
pub const ARGENT_X_GLOBAL: &str = "starknet_argentX";

/// Global name the Braavos wallet is injected under.
pub const BRAAVOS_GLOBAL: &str = "starknet_braavos";

/// Wallet object injected into the environment.
#[async_trait::async_trait]
pub trait InjectedWallet: Send + Sync {
    /// Ask the wallet for access to its account.
    async fn enable(&self) -> Result<(), Error>;

    fn is_connected(&self) -> bool;

    /// The account of the wallet. `None` until the wallet is enabled.
    fn account(&self) -> Option<Arc<dyn Account>>;
}

/// Environment that wallets are injected into.
pub trait WalletHost: Send + Sync {
    fn lookup(&self, global_name: &str) -> Option<Arc<dyn InjectedWallet>>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WalletKind {
    #[serde(rename = "argentX")]
    ArgentX,
    #[serde(rename = "braavos")]
    Braavos,
}

impl WalletKind {
    /// Supported wallets in the order they are looked up.
    pub const ALL: [WalletKind; 2] = [WalletKind::ArgentX, WalletKind::Braavos];

    pub fn global_name(self) -> &'static str {
        match self {
            WalletKind::ArgentX => ARGENT_X_GLOBAL,
            WalletKind::Braavos => BRAAVOS_GLOBAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WalletKind::ArgentX => "ArgentX",
            WalletKind::Braavos => "Braavos",
        }
    }
}

impl core::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected wallet.
#[derive(Clone)]
pub enum WalletProvider {
    ArgentX(Arc<dyn InjectedWallet>),
    Braavos(Arc<dyn InjectedWallet>),
}

impl WalletProvider {
    /// Returns the first supported wallet found in `host`.
    pub fn detect(host: &dyn WalletHost) -> Result<Self, Error> {
        for kind in WalletKind::ALL.iter() {
            if let Some(wallet) = host.lookup(kind.global_name()) {
                log::debug!("found {} wallet", kind);
                return Ok(match kind {
                    WalletKind::ArgentX => WalletProvider::ArgentX(wallet),
                    WalletKind::Braavos => WalletProvider::Braavos(wallet),
                });
            }
        }
        Err(Error::WalletNotFound)
    }

    pub fn kind(&self) -> WalletKind {
        match self {
            WalletProvider::ArgentX(_) => WalletKind::ArgentX,
            WalletProvider::Braavos(_) => WalletKind::Braavos,
        }
    }

    fn wallet(&self) -> &Arc<dyn InjectedWallet> {
        match self {
            WalletProvider::ArgentX(wallet) | WalletProvider::Braavos(wallet) => wallet,
        }
    }

    /// Enable the wallet and return its account.
    pub async fn connect(&self) -> Result<Arc<dyn Account>, Error> {
        let wallet = self.wallet();
        let rejected = |message: String| Error::WalletRejected {
            wallet: self.kind().name(),
            message,
        };
        wallet
            .enable()
            .await
            .map_err(|error| rejected(error.to_string()))?;
        if !wallet.is_connected() {
            return Err(rejected("wallet is not connected after enabling".into()));
        }
        wallet
            .account()
            .ok_or_else(|| rejected("wallet did not expose an account".into()))
    }
}

/// [WalletHost] with an explicit set of injected wallets.
#[derive(Default)]
pub struct MemoryWalletHost {
    wallets: HashMap<String, Arc<dyn InjectedWallet>>,
}

impl MemoryWalletHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject `wallet` under the global name of `kind`.
    pub fn inject(&mut self, kind: WalletKind, wallet: Arc<dyn InjectedWallet>) {
        self.wallets.insert(kind.global_name().to_string(), wallet);
    }

    pub fn with(mut self, kind: WalletKind, wallet: Arc<dyn InjectedWallet>) -> Self {
        self.inject(kind, wallet);
        self
    }
}

impl WalletHost for MemoryWalletHost {
    fn lookup(&self, global_name: &str) -> Option<Arc<dyn InjectedWallet>> {
        self.wallets.get(global_name).cloned()
    }
}

/// Wallet holding an account that is available as soon as the wallet is enabled.
pub struct AccountWallet {
    account: Arc<dyn Account>,
    enabled: Mutex<bool>,
}

impl AccountWallet {
    pub fn new(account: Arc<dyn Account>) -> Self {
        AccountWallet {
            account,
            enabled: Mutex::new(false),
        }
    }

    fn enabled(&self) -> bool {
        self.enabled.lock().map_or(false, |enabled| *enabled)
    }
}

#[async_trait::async_trait]
impl InjectedWallet for AccountWallet {
    async fn enable(&self) -> Result<(), Error> {
        *self
            .enabled
            .lock()
            .map_err(|_| Error::from("wallet state poisoned"))? = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.enabled()
    }

    fn account(&self) -> Option<Arc<dyn Account>> {
        if self.enabled() {
            Some(self.account.clone())
        } else {
            None
        }
    }
}

/// Wallet backed by a locally stored account key. Enabling it connects the account to a node.
pub struct KeystoreWallet {
    node: Arc<RemoteNode>,
    address: ContractAddress,
    private_key: Felt,
    account: Mutex<Option<Arc<dyn Account>>>,
}

impl KeystoreWallet {
    pub fn new(node: Arc<RemoteNode>, address: ContractAddress, private_key: Felt) -> Self {
        KeystoreWallet {
            node,
            address,
            private_key,
            account: Mutex::new(None),
        }
    }

    fn connected_account(&self) -> Option<Arc<dyn Account>> {
        self.account.lock().ok().and_then(|account| account.clone())
    }
}

#[async_trait::async_trait]
impl InjectedWallet for KeystoreWallet {
    async fn enable(&self) -> Result<(), Error> {
        let account = RemoteAccount::connect(&self.node, self.address, self.private_key).await?;
        let mut slot = self
            .account
            .lock()
            .map_err(|_| Error::from("wallet state poisoned"))?;
        *slot = Some(Arc::new(account));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected_account().is_some()
    }

    fn account(&self) -> Option<Arc<dyn Account>> {
        self.connected_account()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::Emulator;

    fn wallet(emulator: &Emulator, n: u64) -> Arc<dyn InjectedWallet> {
        let address = ContractAddress::from_felt(Felt::from(n));
        Arc::new(AccountWallet::new(Arc::new(emulator.account(address))))
    }

    struct RejectingWallet;

    #[async_trait::async_trait]
    impl InjectedWallet for RejectingWallet {
        async fn enable(&self) -> Result<(), Error> {
            Err("user rejected the request".into())
        }

        fn is_connected(&self) -> bool {
            false
        }

        fn account(&self) -> Option<Arc<dyn Account>> {
            None
        }
    }

    #[test]
    fn detect_without_wallets() {
        match WalletProvider::detect(&MemoryWalletHost::new()) {
            Err(error) => assert!(error.to_string().contains("not found")),
            Ok(provider) => panic!("detected {}", provider.kind()),
        }
    }

    #[test]
    fn detect_prefers_argent_x() {
        let emulator = Emulator::new();
        let host = MemoryWalletHost::new()
            .with(WalletKind::Braavos, wallet(&emulator, 1))
            .with(WalletKind::ArgentX, wallet(&emulator, 2));
        let provider = WalletProvider::detect(&host).unwrap();
        assert_eq!(provider.kind(), WalletKind::ArgentX);
    }

    #[test]
    fn detect_braavos() {
        let emulator = Emulator::new();
        let host = MemoryWalletHost::new().with(WalletKind::Braavos, wallet(&emulator, 1));
        let provider = WalletProvider::detect(&host).unwrap();
        assert_eq!(provider.kind(), WalletKind::Braavos);
    }

    #[tokio::test]
    async fn connect_returns_account() {
        let emulator = Emulator::new();
        let host = MemoryWalletHost::new().with(WalletKind::Braavos, wallet(&emulator, 7));
        let account = WalletProvider::detect(&host)
            .unwrap()
            .connect()
            .await
            .unwrap();
        assert_eq!(account.address(), ContractAddress::from_felt(Felt::from(7u64)));
    }

    #[tokio::test]
    async fn connect_rejected() {
        let host = MemoryWalletHost::new().with(WalletKind::ArgentX, Arc::new(RejectingWallet));
        let error = WalletProvider::detect(&host)
            .unwrap()
            .connect()
            .await
            .err()
            .unwrap();
        match error {
            Error::WalletRejected { wallet, .. } => assert_eq!(wallet, "ArgentX"),
            other => panic!("unexpected error {}", other),
        }
    }
}
