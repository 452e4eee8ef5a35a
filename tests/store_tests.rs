// Integration tests for the hand-off store backends.
//
// Every property is checked against both the in-memory and the
// file-backed store; backend choice is a deployment concern and must
// not change the put/take/sweep contract.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use voice_handoff::{FileStore, HandoffStore, MemoryStore, StoreError};

const DAY: Duration = Duration::from_secs(86_400);
const SHORT_TTL: Duration = Duration::from_millis(50);

async fn both_backends(dir: &TempDir, ttl: Duration) -> Result<Vec<Arc<dyn HandoffStore>>> {
    Ok(vec![
        Arc::new(MemoryStore::new(ttl)),
        Arc::new(FileStore::new(dir.path(), ttl).await?),
    ])
}

fn fresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[tokio::test]
async fn test_put_then_take_consumes_record() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, DAY).await? {
        let token = fresh_token();
        store.put(&token, "hello").await?;

        let record = store.take(&token).await?.expect("record should be live");
        assert_eq!(record.text, "hello");
        assert!(record.timestamp_ms() > 0);

        // One-shot: the first read consumed it.
        assert!(store.take(&token).await?.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_put_overwrites_previous_record() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, DAY).await? {
        let token = fresh_token();
        store.put(&token, "first").await?;
        store.put(&token, "second").await?;

        let record = store.take(&token).await?.expect("record should be live");
        assert_eq!(record.text, "second");
        assert!(store.take(&token).await?.is_none(), "only one record may survive an overwrite");
    }
    Ok(())
}

#[tokio::test]
async fn test_take_unknown_token_is_absent() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, DAY).await? {
        assert!(store.take(&fresh_token()).await?.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_put_rejects_empty_arguments() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, DAY).await? {
        let token = fresh_token();

        let err = store.put("", "hello").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));

        let err = store.put(&token, "").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));

        // Neither call may have stored anything.
        assert!(store.take(&token).await?.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_expired_record_is_lazily_absent() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, SHORT_TTL).await? {
        let token = fresh_token();
        store.put(&token, "stale").await?;

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Never swept, but past TTL: take reports absence.
        assert!(store.take(&token).await?.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_sweep_removes_only_expired_records() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, SHORT_TTL).await? {
        let expired = fresh_token();
        store.put(&expired, "old").await?;

        tokio::time::sleep(Duration::from_millis(100)).await;

        let live = fresh_token();
        store.put(&live, "new").await?;

        let removed = store.sweep(Utc::now()).await?;
        assert_eq!(removed, 1);

        // Idempotent: a second sweep finds nothing.
        assert_eq!(store.sweep(Utc::now()).await?, 0);

        // The fresh record survived the sweep.
        let record = store.take(&live).await?.expect("live record should survive sweep");
        assert_eq!(record.text, "new");
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_takes_deliver_exactly_once() -> Result<()> {
    let dir = TempDir::new()?;
    for store in both_backends(&dir, DAY).await? {
        let token = fresh_token();
        store.put(&token, "hello").await?;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let token = token.clone();
            handles.push(tokio::spawn(async move { store.take(&token).await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await?.expect("take should not error").is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one racing take may observe the record");
    }
    Ok(())
}

#[tokio::test]
async fn test_file_store_put_racing_take_is_never_lost() -> Result<()> {
    let dir = TempDir::new()?;
    let store = Arc::new(FileStore::new(dir.path(), DAY).await?);

    // A take racing an overwrite may deliver either record, but an
    // acknowledged put must stay readable until something consumes it.
    for _ in 0..200 {
        let token = fresh_token();
        store.put(&token, "old").await?;

        let taker = {
            let store = Arc::clone(&store);
            let token = token.clone();
            tokio::spawn(async move { store.take(&token).await })
        };
        store.put(&token, "new").await?;

        match taker.await?? {
            Some(record) if record.text == "old" => {
                let record = store
                    .take(&token)
                    .await?
                    .expect("overwrite must remain readable after the old record was taken");
                assert_eq!(record.text, "new");
            }
            Some(record) => {
                assert_eq!(record.text, "new");
                assert!(store.take(&token).await?.is_none());
            }
            None => panic!("a record was live for the whole race; take may not observe absence"),
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_file_store_survives_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let token = fresh_token();

    {
        let store = FileStore::new(dir.path(), DAY).await?;
        store.put(&token, "persisted").await?;
    }

    // A new store over the same directory still has the record.
    let store = FileStore::new(dir.path(), DAY).await?;
    let record = store.take(&token).await?.expect("record should survive reopen");
    assert_eq!(record.text, "persisted");

    Ok(())
}
