//! End-to-end behaviour of the locked name mempool service:
//! submission → chaining → block connection → wallet notifications.

use std::sync::Arc;

use namepool_mempool::{RemovalNotice, RemovalReason};
use namepool_node::{NamePoolService, NodeConfig, NodeError};
use namepool_nullables::NullNameStore;
use namepool_store::NameRecord;
use namepool_types::{Name, NameScript, NameValue, OutPoint, Transaction, TxId, TxIn, TxOut};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ADDR: &[u8] = &[0x51];

fn register(name: &str, value: &str, inputs: &[OutPoint]) -> Transaction {
    Transaction::new(
        inputs.iter().copied().map(TxIn::new).collect(),
        vec![TxOut::name(
            1,
            NameScript::register(ADDR, Name::from(name), NameValue::from(value)),
        )],
    )
}

fn update(name: &str, value: &str, inputs: &[OutPoint]) -> Transaction {
    Transaction::new(
        inputs.iter().copied().map(TxIn::new).collect(),
        vec![
            TxOut::plain(1, ADDR),
            TxOut::name(
                1,
                NameScript::update(ADDR, Name::from(name), NameValue::from(value)),
            ),
        ],
    )
}

fn name_out(tx: &Transaction) -> OutPoint {
    let index = tx
        .outputs
        .iter()
        .position(|o| o.script.name_script().is_some())
        .expect("name output");
    OutPoint::new(tx.txid(), index as u32)
}

fn record(value: &str, update_outpoint: OutPoint) -> NameRecord {
    NameRecord {
        value: NameValue::from(value),
        owner: ADDR.to_vec(),
        update_outpoint,
        height: 1,
    }
}

fn service_with(config: NodeConfig) -> (Arc<NullNameStore>, NamePoolService) {
    let store = Arc::new(NullNameStore::new());
    let service = NamePoolService::new(&config, store.clone()).expect("service");
    (store, service)
}

fn service() -> (Arc<NullNameStore>, NamePoolService) {
    let mut config = NodeConfig::default();
    config.enable_metrics = true;
    config.mempool.sanity_check_names = true;
    service_with(config)
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_rejects_competing_registration() {
    let (_store, service) = service();
    service.submit(register("foo", "a", &[])).await.unwrap();

    let err = service.submit(register("foo", "b", &[])).await.unwrap_err();
    assert!(matches!(err, NodeError::NameConflict(n) if n == Name::from("foo")));
    assert_eq!(service.len().await, 1);

    let metrics = service.metrics().expect("metrics enabled");
    assert_eq!(metrics.name_ops_admitted.get(), 1);
    assert_eq!(metrics.name_ops_rejected.get(), 1);
    assert_eq!(metrics.pending_registrations.get(), 1);
}

#[tokio::test]
async fn submit_accepts_chained_updates() {
    let (_store, service) = service();
    let reg = register("foo", "a", &[]);
    service.submit(reg.clone()).await.unwrap();

    let mut tip = name_out(&reg);
    for value in ["b", "c", "d"] {
        assert_eq!(service.update_input(&Name::from("foo")).await.unwrap(), tip);
        let upd = update("foo", value, &[tip]);
        service.submit(upd.clone()).await.unwrap();
        tip = name_out(&upd);
    }

    assert_eq!(service.update_input(&Name::from("foo")).await.unwrap(), tip);
    assert!(service.registers_name(&Name::from("foo")).await);
    assert!(service.updates_name(&Name::from("foo")).await);
    assert_eq!(service.len().await, 4);

    // an update that does not extend the chain competes with it
    let rival = update("foo", "x", &[]);
    assert!(matches!(
        service.submit(rival).await,
        Err(NodeError::NameConflict(_))
    ));
}

#[tokio::test]
async fn submit_duplicate_is_mempool_error() {
    let (_store, service) = service();
    let tx = Transaction::new(vec![], vec![TxOut::plain(5, ADDR)]);
    service.submit(tx.clone()).await.unwrap();
    assert!(matches!(service.submit(tx).await, Err(NodeError::Mempool(_))));
}

// ---------------------------------------------------------------------------
// Wallet helpers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_input_falls_back_to_confirmed_state() {
    let (store, service) = service();
    let confirmed_out = OutPoint::new(TxId::new([3; 32]), 1);
    store.set_name(Name::from("foo"), record("a", confirmed_out));

    assert_eq!(
        service.update_input(&Name::from("foo")).await.unwrap(),
        confirmed_out
    );
    assert!(matches!(
        service.update_input(&Name::from("unknown")).await,
        Err(NodeError::NameNotUpdatable(_))
    ));
}

#[tokio::test]
async fn ensure_registrable_sees_pending_registration() {
    let (_store, service) = service();
    service.ensure_registrable(&Name::from("foo")).await.unwrap();

    service.submit(register("foo", "a", &[])).await.unwrap();
    assert!(matches!(
        service.ensure_registrable(&Name::from("foo")).await,
        Err(NodeError::PendingRegistration(_))
    ));
}

// ---------------------------------------------------------------------------
// Block connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_block_evicts_and_notifies() {
    let (store, service) = service();
    let mine = register("foo", "mine", &[]);
    service.submit(mine.clone()).await.unwrap();
    let child = Transaction::new(
        vec![TxIn::new(OutPoint::new(mine.txid(), 0))],
        vec![TxOut::plain(1, ADDR)],
    );
    service.submit(child.clone()).await.unwrap();
    let mut removals = service.subscribe_removals().await;

    // someone else's registration of the same name was mined
    let theirs = register("foo", "theirs", &[]);
    store.set_name(Name::from("foo"), record("theirs", name_out(&theirs)));
    let evicted = service.connect_block(&[theirs]).await.unwrap();

    assert_eq!(evicted, vec![mine.txid(), child.txid()]);
    assert_eq!(service.len().await, 0);
    assert!(!service.registers_name(&Name::from("foo")).await);
    assert_eq!(
        removals.try_recv().unwrap(),
        RemovalNotice {
            txid: mine.txid(),
            reason: RemovalReason::NameConflict
        }
    );
    assert_eq!(removals.try_recv().unwrap().txid, child.txid());

    let metrics = service.metrics().expect("metrics enabled");
    assert_eq!(metrics.name_conflicts_evicted.get(), 2);
    assert_eq!(metrics.pool_size.get(), 0);
}

#[tokio::test]
async fn connect_block_keeps_continuations_of_mined_registration() {
    let (store, service) = service();
    let reg = register("foo", "a", &[]);
    let upd = update("foo", "b", &[name_out(&reg)]);
    service.submit(reg.clone()).await.unwrap();
    service.submit(upd.clone()).await.unwrap();

    store.set_name(Name::from("foo"), record("a", name_out(&reg)));
    let evicted = service.connect_block(&[reg]).await.unwrap();

    assert!(evicted.is_empty());
    assert_eq!(service.len().await, 1);
    assert_eq!(
        service.update_input(&Name::from("foo")).await.unwrap(),
        name_out(&upd)
    );
    service.check_names().await.unwrap();
}

#[tokio::test]
async fn remove_releases_slots() {
    let (_store, service) = service();
    let txid = service.submit(register("foo", "a", &[])).await.unwrap();
    let mut removals = service.subscribe_removals().await;

    assert_eq!(service.remove(&txid, RemovalReason::Manual).await, vec![txid]);
    assert_eq!(
        removals.try_recv().unwrap(),
        RemovalNotice {
            txid,
            reason: RemovalReason::Manual
        }
    );
    assert!(!service.registers_name(&Name::from("foo")).await);
    service.ensure_registrable(&Name::from("foo")).await.unwrap();
}

#[tokio::test]
async fn metrics_disabled_by_default() {
    let (_store, service) = service_with(NodeConfig::default());
    service.submit(register("foo", "a", &[])).await.unwrap();
    assert!(service.metrics().is_none());
}

#[tokio::test]
async fn caller_composes_check_and_add_under_one_lock() {
    let (_store, service) = service();
    let tx = register("foo", "a", &[]);
    {
        let mut pool = service.mempool().lock().await;
        assert!(pool.check_name_ops(&tx));
        pool.add_unchecked(tx).unwrap();
    }
    assert!(service.registers_name(&Name::from("foo")).await);
}
