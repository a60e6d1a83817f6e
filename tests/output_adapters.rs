//! Output adapter and chain boundary tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tempfile::TempDir;

use quoteart_core::{
    chain::{self, Arg, TxStatus, TxTracker},
    data_url, display_reference, download, generate, with_display_reference, AppConfig,
    ReferenceRegistry,
};

const QUOTE: &str = "The way to get started is to quit talking and begin doing.";
const AUTHOR: &str = "Walt Disney";

#[test]
fn test_display_references_released() {
    let registry = ReferenceRegistry::new();
    {
        let first = display_reference(&registry, QUOTE, AUTHOR);
        let second = display_reference(&registry, QUOTE, AUTHOR);
        assert_ne!(first.url(), second.url());
        assert_eq!(registry.live_count(), 2);

        let bytes = registry.resolve(first.url()).unwrap();
        assert_eq!(&bytes[..], generate(QUOTE, AUTHOR).as_bytes());

        second.release();
        assert_eq!(registry.live_count(), 1);
    }
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn test_scoped_reference_released_on_return() {
    let registry = ReferenceRegistry::new();
    let url = with_display_reference(&registry, QUOTE, AUTHOR, |url| {
        assert_eq!(registry.live_count(), 1);
        url.to_string()
    });
    assert_eq!(registry.live_count(), 0);
    assert!(registry.resolve(&url).is_none());
}

#[test]
fn test_scoped_reference_released_on_panic() {
    let registry = ReferenceRegistry::new();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        with_display_reference(&registry, QUOTE, AUTHOR, |_| panic!("display failed"))
    }));
    assert!(outcome.is_err());
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn test_download_saved_under_author_name() {
    let dir = TempDir::new().unwrap();
    let blob = download(QUOTE, AUTHOR, None);
    assert_eq!(blob.filename(), "quote-nft-walt-disney.svg");
    assert_eq!(blob.mime(), "image/svg+xml");

    let path = blob.save_in(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("quote-nft-walt-disney.svg"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), generate(QUOTE, AUTHOR));
}

#[test]
fn test_download_refuses_escaping_names() {
    let dir = TempDir::new().unwrap();
    for name in ["../escape.svg", "nested/art.svg", ".."] {
        let blob = download(QUOTE, AUTHOR, Some(name));
        assert!(blob.save_in(dir.path()).is_err(), "{name}");
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_data_url_carries_svg() {
    let svg = generate(QUOTE, AUTHOR);
    let url = data_url(&svg);
    let payload = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
    assert_eq!(STANDARD.decode(payload).unwrap(), svg.as_bytes());
}

#[test]
fn test_config_file_with_partial_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quoteart.json");
    std::fs::write(
        &path,
        r#"{"chain": {"contracts": {"QuoteNFT": "0x01cf0e2f2f715450"}}, "logLevel": "info"}"#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.log_level, "info");
    assert_eq!(config.chain.contract_address("QuoteNFT"), Some("0x01cf0e2f2f715450"));
    assert_eq!(config.chain.access_node, AppConfig::default().chain.access_node);
}

#[test]
fn test_config_rejects_bad_address() {
    let err = AppConfig::from_json(r#"{"chain": {"contracts": {"QuoteNFT": "0x12"}}}"#);
    assert!(err.is_err());
}

#[test]
fn test_mint_request_resolves_imports() {
    let config = AppConfig::default();
    let tx = chain::mint_transaction(&config.chain, QUOTE, AUTHOR);

    assert!(!tx.cadence.contains("0xQuoteNFT"));
    assert!(tx.cadence.contains("0xf8d6e0586b0a20c7"));
    assert_eq!(tx.limit, chain::MINT_COMPUTE_LIMIT);
    assert_eq!(tx.args[2], Arg::String(generate(QUOTE, AUTHOR)));

    let json = tx.to_json();
    assert_eq!(json["args"][0]["type"], "String");
    assert_eq!(json["args"][1]["value"], AUTHOR);
}

#[test]
fn test_mint_lifecycle_messages() {
    let mut tracker = TxTracker::new("abc123");
    assert_eq!(tracker.update(2).unwrap(), "Transaction 2 - FINALIZED");
    assert_eq!(tracker.update(3).unwrap(), "Transaction 3 - EXECUTED");
    assert_eq!(tracker.update(4).unwrap(), "🎉 NFT minted successfully!");
    assert_eq!(tracker.status(), TxStatus::Sealed);
    assert!(tracker.update(5).is_err());

    let mut expired = TxTracker::new("def456");
    assert_eq!(expired.update(5).unwrap(), "❌ NFT minting failed!");
}

#[test]
fn test_token_title_from_quote_only() {
    assert_eq!(chain::token_title("A"), "Quote NFT #65");
    assert_eq!(chain::token_title(QUOTE), chain::token_title(QUOTE));
}
