//! Tests contra Postgres real. Se omiten si `DATABASE_URL` no está definido.

use chrono::Utc;
use deploy_core::{Address, HistoryStore, LibraryBindings, PublishedRecord};
use deploy_persistence::{build_pool, DbConfig, PgHistoryStore, PgPool, PoolProvider};
use once_cell::sync::Lazy;
use serde_json::json;

static TEST_POOL: Lazy<Option<PgPool>> = Lazy::new(|| {
    let cfg = DbConfig::from_env().ok()?;
    match build_pool(&cfg.url, 1, 1) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("could not build test pool: {e}");
            None
        }
    }
});

fn store(network: &str) -> Option<PgHistoryStore<PoolProvider>> {
    let pool = TEST_POOL.as_ref()?.clone();
    Some(PgHistoryStore::new(PoolProvider { pool }, network))
}

fn unique_network(tag: &str) -> String {
    format!("test-{tag}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

fn record(name: &str) -> PublishedRecord {
    PublishedRecord { name: name.to_string(),
                      location: Address::from_bytes(&[0x42; 20]),
                      bytecode_ref: name.to_string(),
                      constructor_args_used: vec![json!(0), json!("0x6edce65403992e310a62460808c4b910d972f10f")],
                      libraries_used: LibraryBindings::new(),
                      salt: "salt".into(),
                      transaction_ref: Some("0xabc".into()),
                      published_at: Utc::now(),
                      verified: false }
}

#[test]
fn upsert_then_flip_verified() {
    let network = unique_network("upsert");
    let Some(mut store) = store(&network) else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let mut rec = record("Crucible");
    store.record(&rec).expect("insert");
    rec.mark_verified();
    store.record(&rec).expect("update");

    let history = store.load().expect("load");
    assert_eq!(history.len(), 1);
    assert!(history["Crucible"].verified);
    assert_eq!(history["Crucible"].constructor_args_used, rec.constructor_args_used);
    assert_eq!(store.get("Missing").expect("get"), None);
}

#[test]
fn networks_do_not_share_rows() {
    let (a, b) = (unique_network("a"), unique_network("b"));
    let (Some(mut store_a), Some(store_b)) = (store(&a), store(&b)) else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    store_a.record(&record("Token")).expect("insert");
    assert!(store_b.load().expect("load").is_empty());
}
