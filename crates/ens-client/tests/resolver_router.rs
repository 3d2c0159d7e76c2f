//! Resolver routing and record access integration tests

mod common;

use common::{config, MockLedger, Record, BROKEN_RESOLVER, REGISTRY, RESOLVER, SIGNER};
use ens_client::{Ens, EnsConfig, Error, Token, TransportError};
use ens_core::{namehash, Address, ProtocolType};

const QM: &str = "QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4";
const QM_HEX: &str =
    "e3010170122029f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f";

fn owned(resolver: Address) -> Record {
    Record {
        owner: SIGNER,
        resolver,
        ttl: 0,
    }
}

async fn connect(ledger: &std::sync::Arc<MockLedger>) -> Ens {
    Ens::connect(ledger.clone(), config()).await.unwrap()
}

#[tokio::test]
async fn test_records_through_registry_fallback() {
    let ledger = MockLedger::new(1337);
    let node = namehash("foo.eth");
    let target = Address::new([0xaa; 20]);
    ledger.set_record(node, owned(RESOLVER));
    ledger.with_resolver(RESOLVER, |r| {
        r.addrs.insert(node, target);
        r.contenthashes.insert(node, hex::decode(QM_HEX).unwrap());
        r.texts
            .insert((node, "url".to_string()), "https://example.com".to_string());
        r.coin_addrs.insert((node, 0), vec![0x00, 0x14]);
    });
    let ens = connect(&ledger).await;
    let router = ens.resolver();

    assert_eq!(router.resolver_for("foo.eth").await.unwrap(), Some(RESOLVER));
    assert_eq!(router.get_address("foo.eth").await.unwrap(), target);
    assert_eq!(router.get_text("foo.eth", "url").await, "https://example.com");
    assert_eq!(router.get_text("foo.eth", "missing").await, "");
    assert_eq!(
        router.get_coin_address("foo.eth", 0).await.unwrap(),
        vec![0x00, 0x14]
    );

    let content = router.get_content("foo.eth").await.unwrap();
    assert_eq!(content.protocol_type, ProtocolType::Ipfs);
    assert_eq!(content.decoded, QM);
    assert_eq!(content.to_uri().unwrap(), format!("ipfs://{}", QM));
}

#[tokio::test]
async fn test_no_resolver_sentinels() {
    let ledger = MockLedger::new(1337);
    let ens = connect(&ledger).await;
    let router = ens.resolver();

    assert_eq!(router.resolver_for("none.eth").await.unwrap(), None);
    assert_eq!(router.get_address("none.eth").await.unwrap(), Address::ZERO);
    assert_eq!(router.get_address("").await.unwrap(), Address::ZERO);
    assert_eq!(router.get_text("none.eth", "email").await, "");
    assert_eq!(router.get_content("none.eth").await, None);
    assert!(router.get_coin_address("none.eth", 60).await.unwrap().is_empty());
    assert!(!router.supports_wildcard("none.eth").await.unwrap());
    assert_eq!(ledger.calls_to(RESOLVER), 0);

    let err = router
        .set_text("none.eth", "email", "a@b.c")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ResolverAbsent(name) if name == "none.eth"));
    assert!(ledger.sent().is_empty());
}

#[tokio::test]
async fn test_native_resolver_preferred() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(BROKEN_RESOLVER));
    ledger.set_native_resolver("foo.eth", RESOLVER);
    let ens = connect(&ledger).await;

    assert_eq!(
        ens.resolver().resolver_for("foo.eth").await.unwrap(),
        Some(RESOLVER)
    );
    assert_eq!(ledger.call_count("resolver(bytes32)"), 0);

    // names the native lookup does not know have no resolver
    assert_eq!(ens.resolver().resolver_for("bar.eth").await.unwrap(), None);
}

#[tokio::test]
async fn test_native_resolver_disabled() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(RESOLVER));
    ledger.set_native_resolver("foo.eth", BROKEN_RESOLVER);
    let ens = Ens::connect(
        ledger.clone(),
        EnsConfig {
            prefer_native_resolver: false,
            ..config()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ens.resolver().resolver_for("foo.eth").await.unwrap(),
        Some(RESOLVER)
    );
}

#[tokio::test]
async fn test_failing_resolver_reads() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(BROKEN_RESOLVER));
    let ens = connect(&ledger).await;
    let router = ens.resolver();

    assert_eq!(router.get_text("foo.eth", "url").await, "");

    let content = router.get_content("foo.eth").await.unwrap();
    assert!(content.is_error());
    assert!(content.decoded.contains("reverted"));

    let err = router.get_address("foo.eth").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_domain_details_without_resolver() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(Address::ZERO));
    let ens = connect(&ledger).await;

    let details = ens.resolver().get_domain_details("foo.eth").await.unwrap();
    assert_eq!(details.owner, SIGNER);
    assert_eq!(details.resolver, Address::ZERO);
    assert_eq!(details.addr, None);
    assert_eq!(details.content, None);
    assert_eq!(details.content_type(), None);
    assert_eq!(details.label.as_known(), Some("foo"));
    assert_eq!(details.parent, "eth");

    assert_eq!(ledger.call_count("addr(bytes32)"), 0);
    assert_eq!(ledger.call_count("contenthash(bytes32)"), 0);
}

#[tokio::test]
async fn test_domain_details_with_resolver() {
    let ledger = MockLedger::new(1337);
    let node = namehash("foo.eth");
    let target = Address::new([0xaa; 20]);
    ledger.set_record(node, owned(RESOLVER));
    ledger.with_resolver(RESOLVER, |r| {
        r.addrs.insert(node, target);
        r.contenthashes.insert(node, hex::decode(QM_HEX).unwrap());
    });
    let ens = connect(&ledger).await;

    let details = ens.resolver().get_domain_details("foo.eth").await.unwrap();
    assert_eq!(details.resolver, RESOLVER);
    assert_eq!(details.addr, Some(target));
    assert_eq!(details.content_type(), Some(ProtocolType::Ipfs));
    assert_eq!(ledger.call_count("addr(bytes32)"), 1);
    assert_eq!(ledger.call_count("contenthash(bytes32)"), 1);
}

#[tokio::test]
async fn test_domain_details_with_failing_resolver() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(BROKEN_RESOLVER));
    let ens = connect(&ledger).await;

    let details = ens.resolver().get_domain_details("foo.eth").await.unwrap();
    assert_eq!(details.owner, SIGNER);
    assert_eq!(details.addr, Some(Address::ZERO));
    let content = details.content.clone().unwrap();
    assert_eq!(content.decoded, "0x0");
    assert_eq!(details.content_type(), Some(ProtocolType::Error));
}

#[tokio::test]
async fn test_domain_details_survive_resolver_lookup_failure() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(RESOLVER));
    ledger.fail_native_discovery(TransportError::Network("connection reset".to_string()));
    let ens = connect(&ledger).await;

    let details = ens.resolver().get_domain_details("foo.eth").await.unwrap();
    assert_eq!(details.owner, SIGNER);
    assert_eq!(details.resolver, Address::ZERO);
    assert_eq!(details.addr, None);
    assert_eq!(details.content, None);
    assert_eq!(ledger.call_count("addr(bytes32)"), 0);

    let err = ens.resolver().resolver_for("foo.eth").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_legacy_content_fallback() {
    let ledger = MockLedger::new(1337);
    let node = namehash("old.eth");
    ledger.set_record(node, owned(RESOLVER));
    ledger.with_resolver(RESOLVER, |r| {
        r.legacy = true;
        r.old_content.insert(node, [0xab; 32]);
    });

    // default: always the contenthash accessor, failure surfaces as error content
    let ens = connect(&ledger).await;
    assert!(ens.resolver().get_content("old.eth").await.unwrap().is_error());
    assert_eq!(ledger.call_count("supportsInterface(bytes4)"), 0);

    let ens = Ens::connect(
        ledger.clone(),
        EnsConfig {
            legacy_content_check: true,
            ..config()
        },
    )
    .await
    .unwrap();
    let content = ens.resolver().get_content("old.eth").await.unwrap();
    assert_eq!(content.protocol_type, ProtocolType::OldContent);
    assert_eq!(content.decoded, format!("0x{}", "ab".repeat(32)));
    assert_eq!(ledger.call_count("supportsInterface(bytes4)"), 1);

    let old = ens.resolver().get_old_content("old.eth").await.unwrap();
    assert_eq!(old, Some(content));
}

#[tokio::test]
async fn test_setters_target_resolver() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(RESOLVER));
    let ens = connect(&ledger).await;
    let router = ens.resolver();
    let target = Address::new([0xaa; 20]);

    router.set_address("foo.eth", target).await.unwrap();
    router.set_coin_address("foo.eth", 0, vec![1, 2, 3]).await.unwrap();
    router.set_text("foo.eth", "url", "https://x").await.unwrap();
    router
        .set_content("foo.eth", &format!("ipfs://{}", QM))
        .await
        .unwrap();
    router.set_content("foo.eth", "0x").await.unwrap();

    let sent = ledger.sent();
    assert_eq!(sent.len(), 5);
    assert!(sent.iter().all(|tx| tx.to == RESOLVER));
    assert_eq!(sent[0].call.args[1], Token::Address(target));
    assert_eq!(sent[3].call.args[1], Token::Bytes(hex::decode(QM_HEX).unwrap()));
    assert_eq!(sent[4].call.args[1], Token::Bytes(Vec::new()));
}

#[tokio::test]
async fn test_set_content_rejects_unknown_scheme() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(RESOLVER));
    let ens = connect(&ledger).await;

    let err = ens
        .resolver()
        .set_content("foo.eth", "gopher://hole")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Core(ens_core::Error::UnsupportedScheme(_))));
    assert!(ledger.sent().is_empty());
}

#[tokio::test]
async fn test_reverse_name_and_wildcard() {
    let ledger = MockLedger::new(1337);
    ledger.set_record(namehash("foo.eth"), owned(RESOLVER));
    ledger.set_reverse_name(SIGNER, "foo.eth");
    let ens = connect(&ledger).await;

    assert_eq!(
        ens.resolver().get_reverse_name(SIGNER).await.unwrap(),
        Some("foo.eth".to_string())
    );
    assert_eq!(ens.resolver().get_reverse_name(REGISTRY).await.unwrap(), None);
    assert!(ens.resolver().supports_wildcard("foo.eth").await.unwrap());
}
