//! Boundary types for the wallet/chain collaborator.
//!
//! Nothing in this module talks to a network. It describes the requests the
//! application hands to the wallet client, the records the chain hands
//! back, and the status machine a submitted transaction moves through.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

use crate::config::{is_account_address, ChainConfig};
use crate::hashing::hash;
use crate::scene::GeneratedArtwork;
use crate::text::preview_text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: TxStatus, to: TxStatus },

    #[error("Unknown transaction status code {0}")]
    UnknownStatusCode(i32),

    #[error("Invalid account address: {0:?}")]
    InvalidAddress(String),
}

/// Wallet session as mirrored by the UI. `logged_in` is `None` until the
/// wallet client has reported at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub logged_in: Option<bool>,
    pub address: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.logged_in == Some(true) && self.address.is_some()
    }
}

/// Typed argument in JSON-Cadence form.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    String(String),
    Address(String),
    UInt64(u64),
    UFix64(f64),
}

impl Arg {
    pub fn address(value: &str) -> Result<Self, ChainError> {
        if is_account_address(value) {
            Ok(Arg::Address(value.to_string()))
        } else {
            Err(ChainError::InvalidAddress(value.to_string()))
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::String(_) => "String",
            Arg::Address(_) => "Address",
            Arg::UInt64(_) => "UInt64",
            Arg::UFix64(_) => "UFix64",
        }
    }

    /// `{"type": ..., "value": ...}`; numeric values travel as strings.
    pub fn to_json(&self) -> Value {
        let value = match self {
            Arg::String(s) | Arg::Address(s) => s.clone(),
            Arg::UInt64(n) => n.to_string(),
            Arg::UFix64(f) => format!("{:.8}", f),
        };
        json!({ "type": self.type_name(), "value": value })
    }
}

/// Cadence bodies. `0x<Contract>` placeholders are resolved against
/// [`ChainConfig`] when a request is built.
pub mod cadence {
    pub const BLOCK_HEIGHT: &str = r#"access(all) fun main(): UInt64 {
    return getCurrentBlock().height
}"#;

    pub const ACCOUNT_BALANCE: &str = r#"import FlowToken from 0xFlowToken

access(all) fun main(address: Address): UFix64 {
    let account = getAccount(address)
    if let balanceRef = account.capabilities.borrow<&{FlowToken.Balance}>(/public/flowTokenBalance) {
        return balanceRef.balance
    }
    return 0.0
}"#;

    pub const BLOCK_INFO: &str = r#"access(all) struct BlockInfo {
    access(all) let height: UInt64
    access(all) let timestamp: UFix64

    init(height: UInt64, timestamp: UFix64) {
        self.height = height
        self.timestamp = timestamp
    }
}

access(all) fun main(): BlockInfo {
    let block = getCurrentBlock()
    return BlockInfo(height: block.height, timestamp: block.timestamp)
}"#;

    pub const LIST_QUOTES: &str = r#"import QuoteNFT from 0xQuoteNFT
import NonFungibleToken from 0xNonFungibleToken
import MetadataViews from 0xMetadataViews

access(all) struct QuoteNFTData {
    access(all) let id: UInt64
    access(all) let quote: String
    access(all) let author: String
    access(all) let artwork: String
    access(all) let dateCreated: UFix64

    init(id: UInt64, quote: String, author: String, artwork: String, dateCreated: UFix64) {
        self.id = id
        self.quote = quote
        self.author = author
        self.artwork = artwork
        self.dateCreated = dateCreated
    }
}

access(all) fun main(address: Address): [QuoteNFTData] {
    let account = getAccount(address)
    let collectionRef = account.capabilities.borrow<&QuoteNFT.Collection>(QuoteNFT.CollectionPublicPath)
    if collectionRef == nil {
        return []
    }
    let nfts: [QuoteNFTData] = []
    for id in collectionRef!.getIDs() {
        if let nft = collectionRef!.borrowQuoteNFT(id: id) {
            nfts.append(QuoteNFTData(
                id: nft.id,
                quote: nft.quote,
                author: nft.author,
                artwork: nft.artwork,
                dateCreated: nft.dateCreated
            ))
        }
    }
    return nfts
}"#;

    pub const CHECK_SETUP: &str = r#"import QuoteNFT from 0xQuoteNFT

access(all) fun main(address: Address): Bool {
    let account = getAccount(address)
    return account.capabilities.get<&QuoteNFT.Collection>(QuoteNFT.CollectionPublicPath).check()
}"#;

    pub const SIMPLE_MESSAGE: &str = r#"transaction(message: String) {
    prepare(signer: auth(Storage) &Account) {
        log("Transaction executed by: ".concat(signer.address.toString()))
        log("Message: ".concat(message))
    }

    execute {
        log("Simple transaction completed successfully!")
    }
}"#;

    pub const SETUP_ACCOUNT: &str = r#"import QuoteNFT from 0xQuoteNFT
import NonFungibleToken from 0xNonFungibleToken
import MetadataViews from 0xMetadataViews

transaction {
    prepare(signer: auth(Storage, Capabilities) &Account) {
        if signer.storage.borrow<&QuoteNFT.Collection>(from: QuoteNFT.CollectionStoragePath) == nil {
            let collection <- QuoteNFT.createEmptyCollection(nftType: Type<@QuoteNFT.NFT>()) as! @QuoteNFT.Collection
            signer.storage.save(<-collection, to: QuoteNFT.CollectionStoragePath)
            signer.capabilities.publish(
                signer.capabilities.storage.issue<&QuoteNFT.Collection>(QuoteNFT.CollectionStoragePath),
                at: QuoteNFT.CollectionPublicPath
            )
            log("Account setup complete - ready to receive QuoteNFTs!")
        } else {
            log("Account already set up for QuoteNFTs")
        }
    }
}"#;

    pub const MINT_QUOTE: &str = r#"import QuoteNFT from 0xQuoteNFT
import NonFungibleToken from 0xNonFungibleToken
import MetadataViews from 0xMetadataViews

transaction(quote: String, author: String, artwork: String) {
    let recipient: &QuoteNFT.Collection

    prepare(signer: auth(Storage) &Account) {
        self.recipient = signer.capabilities.borrow<&QuoteNFT.Collection>(QuoteNFT.CollectionPublicPath)
            ?? panic("Could not borrow receiver reference")
    }

    execute {
        let newID = QuoteNFT.publicMintNFT(
            recipient: self.recipient,
            quote: quote,
            author: author,
            artwork: artwork
        )
        log("Minted QuoteNFT with ID: ".concat(newID.toString()))
    }
}"#;
}

/// Read-only request.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub cadence: String,
    pub args: Vec<Arg>,
}

impl Script {
    pub fn new(config: &ChainConfig, body: &str, args: Vec<Arg>) -> Self {
        Self { cadence: config.resolve_imports(body), args }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "cadence": self.cadence,
            "args": self.args.iter().map(Arg::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Who signs in a given role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signer {
    /// Whoever is logged in to the wallet.
    CurrentUser,
    Account(String),
}

/// State-changing request.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub cadence: String,
    pub args: Vec<Arg>,
    pub limit: u64,
    pub proposer: Signer,
    pub payer: Signer,
    pub authorizations: Vec<Signer>,
}

/// Compute limit for mint and setup transactions.
pub const MINT_COMPUTE_LIMIT: u64 = 300;
/// Compute limit for the plain message transaction.
pub const SIMPLE_COMPUTE_LIMIT: u64 = 100;

impl Transaction {
    /// Transaction signed by the current user in every role.
    pub fn by_current_user(config: &ChainConfig, body: &str, args: Vec<Arg>, limit: u64) -> Self {
        Self {
            cadence: config.resolve_imports(body),
            args,
            limit,
            proposer: Signer::CurrentUser,
            payer: Signer::CurrentUser,
            authorizations: vec![Signer::CurrentUser],
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "cadence": self.cadence,
            "args": self.args.iter().map(Arg::to_json).collect::<Vec<_>>(),
            "limit": self.limit,
            "proposer": self.proposer,
            "payer": self.payer,
            "authorizations": self.authorizations,
        })
    }
}

pub fn block_height_script(config: &ChainConfig) -> Script {
    Script::new(config, cadence::BLOCK_HEIGHT, vec![])
}

pub fn block_info_script(config: &ChainConfig) -> Script {
    Script::new(config, cadence::BLOCK_INFO, vec![])
}

pub fn account_balance_script(config: &ChainConfig, address: &str) -> Result<Script, ChainError> {
    Ok(Script::new(config, cadence::ACCOUNT_BALANCE, vec![Arg::address(address)?]))
}

pub fn list_quotes_script(config: &ChainConfig, address: &str) -> Result<Script, ChainError> {
    Ok(Script::new(config, cadence::LIST_QUOTES, vec![Arg::address(address)?]))
}

pub fn check_setup_script(config: &ChainConfig, address: &str) -> Result<Script, ChainError> {
    Ok(Script::new(config, cadence::CHECK_SETUP, vec![Arg::address(address)?]))
}

pub fn simple_message_transaction(config: &ChainConfig, message: &str) -> Transaction {
    Transaction::by_current_user(
        config,
        cadence::SIMPLE_MESSAGE,
        vec![Arg::String(message.to_string())],
        SIMPLE_COMPUTE_LIMIT,
    )
}

pub fn setup_account_transaction(config: &ChainConfig) -> Transaction {
    Transaction::by_current_user(config, cadence::SETUP_ACCOUNT, vec![], MINT_COMPUTE_LIMIT)
}

/// Mint request for a quote; the artwork argument is generated here.
pub fn mint_transaction(config: &ChainConfig, quote: &str, author: &str) -> Transaction {
    let artwork = GeneratedArtwork::generate(quote, author).to_svg();
    Transaction::by_current_user(
        config,
        cadence::MINT_QUOTE,
        vec![
            Arg::String(quote.to_string()),
            Arg::String(author.to_string()),
            Arg::String(artwork),
        ],
        MINT_COMPUTE_LIMIT,
    )
}

/// Lifecycle of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Submitted,
    Included,
    Finalized,
    Sealed,
    Failed,
}

impl TxStatus {
    /// Map a wallet-client status code.
    pub fn from_code(code: i32) -> Result<Self, ChainError> {
        match code {
            0 | 1 => Ok(TxStatus::Submitted),
            2 => Ok(TxStatus::Included),
            3 => Ok(TxStatus::Finalized),
            4 => Ok(TxStatus::Sealed),
            5 | -1 => Ok(TxStatus::Failed),
            other => Err(ChainError::UnknownStatusCode(other)),
        }
    }

    /// Canonical wallet-client code for this state.
    pub fn code(self) -> i32 {
        match self {
            TxStatus::Submitted => 1,
            TxStatus::Included => 2,
            TxStatus::Finalized => 3,
            TxStatus::Sealed => 4,
            TxStatus::Failed => -1,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Sealed | TxStatus::Failed)
    }

    /// Forward moves only; any live state may fail; terminal states are
    /// final. Repeating the current state is allowed.
    pub fn can_advance_to(self, next: TxStatus) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, TxStatus::Failed) => true,
            (s, n) => n > s,
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxStatus::Submitted => "submitted",
            TxStatus::Included => "included",
            TxStatus::Finalized => "finalized",
            TxStatus::Sealed => "sealed",
            TxStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Status label the wallet client reports next to a raw code.
pub fn status_string(code: i32) -> &'static str {
    match code {
        1 => "PENDING",
        2 => "FINALIZED",
        3 => "EXECUTED",
        4 => "SEALED",
        5 => "EXPIRED",
        _ => "UNKNOWN",
    }
}

/// Folds status updates for one transaction.
#[derive(Debug, Clone)]
pub struct TxTracker {
    id: String,
    status: TxStatus,
}

impl TxTracker {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), status: TxStatus::Submitted }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    /// Apply a raw status code and return the message to show the user:
    /// `Transaction <code> - <label>` while live, the outcome once terminal.
    pub fn update(&mut self, code: i32) -> Result<String, ChainError> {
        let next = TxStatus::from_code(code)?;
        self.transition(next)?;
        Ok(self.message(code))
    }

    pub fn advance(&mut self, next: TxStatus) -> Result<String, ChainError> {
        self.transition(next)?;
        Ok(self.message(next.code()))
    }

    fn transition(&mut self, next: TxStatus) -> Result<(), ChainError> {
        if !self.status.can_advance_to(next) {
            return Err(ChainError::InvalidTransition { from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }

    fn message(&self, code: i32) -> String {
        match self.status {
            TxStatus::Sealed => "🎉 NFT minted successfully!".to_string(),
            TxStatus::Failed => "❌ NFT minting failed!".to_string(),
            _ => format!("Transaction {} - {}", code, status_string(code)),
        }
    }
}

/// A minted quote as stored in the on-chain collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub id: u64,
    pub quote: String,
    pub author: String,
    pub artwork: String,
    /// Unix seconds (UFix64 on chain).
    pub date_created: f64,
}

impl QuoteRecord {
    pub fn title(&self) -> String {
        format!("Quote NFT #{}", self.id)
    }

    pub fn preview(&self) -> String {
        preview_text(&self.quote)
    }

    pub fn minted_at(&self) -> Option<DateTime<Utc>> {
        if !self.date_created.is_finite() || self.date_created < 0.0 {
            return None;
        }
        Utc.timestamp_opt(self.date_created.trunc() as i64, 0).single()
    }

    /// `Month D, YYYY`, as shown on gallery cards.
    pub fn minted_on(&self) -> Option<String> {
        self.minted_at().map(|t| t.format("%B %-d, %Y").to_string())
    }

    /// Whether the stored artwork is what this engine produces for the
    /// record's quote and author.
    pub fn artwork_matches(&self) -> bool {
        GeneratedArtwork::generate(&self.quote, &self.author).to_svg() == self.artwork
    }
}

/// Title shown before minting: derived from the quote text alone.
pub fn token_title(quote: &str) -> String {
    format!("Quote NFT #{}", hash(quote).primary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TxStatus::from_code(1).unwrap(), TxStatus::Submitted);
        assert_eq!(TxStatus::from_code(4).unwrap(), TxStatus::Sealed);
        assert_eq!(TxStatus::from_code(-1).unwrap(), TxStatus::Failed);
        assert_eq!(TxStatus::from_code(9), Err(ChainError::UnknownStatusCode(9)));
    }

    #[test]
    fn test_tracker_happy_path() {
        let mut tracker = TxTracker::new("abc");
        assert_eq!(tracker.update(1).unwrap(), "Transaction 1 - PENDING");
        assert_eq!(tracker.update(2).unwrap(), "Transaction 2 - FINALIZED");
        assert_eq!(tracker.advance(TxStatus::Finalized).unwrap(), "Transaction 3 - EXECUTED");
        assert_eq!(tracker.update(4).unwrap(), "🎉 NFT minted successfully!");
        assert!(tracker.status().is_terminal());
    }

    #[test]
    fn test_tracker_rejects_backward() {
        let mut tracker = TxTracker::new("abc");
        tracker.advance(TxStatus::Finalized).unwrap();
        let err = tracker.advance(TxStatus::Included).unwrap_err();
        assert_eq!(
            err,
            ChainError::InvalidTransition { from: TxStatus::Finalized, to: TxStatus::Included }
        );
    }

    #[test]
    fn test_terminal_is_final() {
        assert!(!TxStatus::Sealed.can_advance_to(TxStatus::Failed));
        assert!(!TxStatus::Failed.can_advance_to(TxStatus::Sealed));
        assert!(TxStatus::Included.can_advance_to(TxStatus::Failed));
    }

    #[test]
    fn test_arg_json() {
        assert_eq!(
            Arg::UInt64(7).to_json(),
            json!({"type": "UInt64", "value": "7"})
        );
        assert_eq!(
            Arg::UFix64(1.5).to_json(),
            json!({"type": "UFix64", "value": "1.50000000"})
        );
    }

    #[test]
    fn test_address_validation() {
        assert!(Arg::address("0xf8d6e0586b0a20c7").is_ok());
        assert_eq!(
            Arg::address("f8d6"),
            Err(ChainError::InvalidAddress("f8d6".to_string()))
        );
    }

    #[test]
    fn test_mint_transaction_carries_artwork() {
        let config = ChainConfig::default();
        let tx = mint_transaction(&config, "Dream bigger. Do bigger.", "Unknown");
        assert_eq!(tx.limit, 300);
        assert_eq!(tx.authorizations, vec![Signer::CurrentUser]);
        assert!(tx.cadence.contains("import QuoteNFT from 0xf8d6e0586b0a20c7"));
        assert!(!tx.cadence.contains("0xQuoteNFT"));
        match &tx.args[2] {
            Arg::String(svg) => assert!(svg.starts_with("<svg")),
            other => panic!("unexpected arg {other:?}"),
        }
    }

    #[test]
    fn test_session() {
        assert!(!Session::default().is_authenticated());
        let session = Session { logged_in: Some(true), address: Some("0x01".into()) };
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_record_helpers() {
        let record = QuoteRecord {
            id: 3,
            quote: "q".repeat(70),
            author: "a".into(),
            artwork: GeneratedArtwork::generate(&"q".repeat(70), "a").to_svg(),
            date_created: 1_700_000_000.0,
        };
        assert_eq!(record.title(), "Quote NFT #3");
        assert_eq!(record.preview().chars().count(), 60);
        assert_eq!(record.minted_on().unwrap(), "November 14, 2023");
        assert!(record.artwork_matches());
    }

    #[test]
    fn test_token_title() {
        assert_eq!(token_title("A"), "Quote NFT #65");
    }
}
