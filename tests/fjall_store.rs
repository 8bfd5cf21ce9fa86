//! Integration tests for the fjall-backed store.

#![cfg(feature = "fjall")]

mod common;

use common::{Anything, Greeting, Launches, Owner, Prefs, Profile, Recent};
use serde_json::json;
use tempfile::TempDir;
use typed_kv::{Durability, FjallStore, RawStore, StoreConfig, TypedStore};

fn open(dir: &TempDir) -> anyhow::Result<TypedStore<Prefs, FjallStore>> {
    Ok(TypedStore::new(FjallStore::open(dir.path())?))
}

#[tokio::test]
async fn test_values_survive_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    {
        let prefs = open(&dir)?;
        prefs.set(Greeting, "hello".to_string()).await?;
        prefs
            .set(
                Owner,
                Profile {
                    name: "Alice".to_string(),
                    age: 31,
                    email: None,
                },
            )
            .await?;
    }

    let prefs = open(&dir)?;
    assert_eq!(prefs.get(Greeting).await?.as_deref(), Some("hello"));
    assert_eq!(prefs.get(Owner).await?.map(|o| o.age), Some(31));
    assert_eq!(prefs.raw().get("greeting").await?.as_deref(), Some("hello"));

    Ok(())
}

#[tokio::test]
async fn test_config_from_toml() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let toml = format!(
        "path = {:?}\nkeyspace = \"prefs\"\ndurability = \"sync-data\"\n",
        dir.path().join("db").display().to_string()
    );
    let config = StoreConfig::from_str(&toml)?;
    assert_eq!(config.keyspace, "prefs");
    assert_eq!(config.durability, Durability::SyncData);

    let prefs: TypedStore<Prefs, _> = TypedStore::new(FjallStore::from_config(&config)?);
    prefs.set(Launches, 5).await?;
    assert_eq!(prefs.get(Launches).await?, Some(5));

    Ok(())
}

#[tokio::test]
async fn test_keyspaces_are_separate() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    {
        let config = StoreConfig::new(dir.path()).with_keyspace("first");
        let first: TypedStore<Prefs, _> = TypedStore::new(FjallStore::from_config(&config)?);
        first.set(Launches, 1).await?;
    }

    let config = StoreConfig::new(dir.path()).with_keyspace("second");
    let second: TypedStore<Prefs, _> = TypedStore::new(FjallStore::from_config(&config)?);
    assert_eq!(second.get(Launches).await?, None);
    assert!(second.get_all_keys().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_merge_and_batches() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let prefs = open(&dir)?;

    prefs.set(Anything, json!({"a": 1, "b": 1})).await?;
    prefs
        .multi_merge(((Anything, json!({"b": 2, "c": 3})), (Recent, vec!["x".to_string()])))
        .await?;
    prefs.merge(Recent, vec!["y".to_string()]).await?;

    let ((_, anything), (_, recent), (_, launches)) =
        prefs.multi_get((Anything, Recent, Launches)).await?;
    assert_eq!(anything, Some(json!({"a": 1, "b": 2, "c": 3})));
    // Arrays are replaced, not concatenated.
    assert_eq!(recent, Some(vec!["y".to_string()]));
    assert_eq!(launches, None);

    prefs
        .multi_set(((Launches, 2), (Greeting, "hi".to_string())))
        .await?;
    prefs.multi_remove((Anything, Recent)).await?;

    assert_eq!(prefs.stored_schema_keys().await?, vec!["greeting", "launches"]);
    Ok(())
}

#[tokio::test]
async fn test_merge_rejected_without_write() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let prefs = open(&dir)?;

    let result = prefs.merge(Anything, json!(1)).await;
    assert!(matches!(result, Err(ref e) if e.is_invalid_argument()));
    assert!(prefs.get_all_keys().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_clear_removes_foreign_keys() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let prefs = open(&dir)?;

    prefs.raw().set("foreign", "x").await?;
    prefs.set(Launches, 1).await?;
    assert_eq!(prefs.get_all_keys().await?.len(), 2);

    prefs.clear().await?;
    prefs.flush_get_requests().await?;
    assert!(prefs.get_all_keys().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unpersisted_durability_still_reads_back() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = StoreConfig::new(dir.path()).with_durability(Durability::None);
    let prefs: TypedStore<Prefs, _> = TypedStore::new(FjallStore::from_config(&config)?);

    prefs.set(Launches, 11).await?;
    assert_eq!(prefs.get(Launches).await?, Some(11));

    Ok(())
}

#[tokio::test]
async fn test_batch_writes_survive_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    {
        let prefs = open(&dir)?;
        prefs
            .multi_set(((Launches, 4), (Greeting, "kept".to_string()), (Recent, vec![])))
            .await?;
        prefs.multi_remove((Recent,)).await?;
    }

    let prefs = open(&dir)?;
    let ((_, launches), (_, greeting), (_, recent)) =
        prefs.multi_get((Launches, Greeting, Recent)).await?;
    assert_eq!(launches, Some(4));
    assert_eq!(greeting.as_deref(), Some("kept"));
    assert_eq!(recent, None);

    Ok(())
}

#[tokio::test]
async fn test_repeated_key_in_one_merge_batch() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FjallStore::open(dir.path())?;

    store.set("profile", r#"{"name":"Ada"}"#).await?;
    store
        .multi_merge(&[
            ("profile".to_string(), r#"{"age":36}"#.to_string()),
            ("profile".to_string(), r#"{"city":"London"}"#.to_string()),
        ])
        .await?;

    let stored = store.get("profile").await?.unwrap_or_default();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stored)?,
        json!({"name": "Ada", "age": 36, "city": "London"})
    );

    Ok(())
}

#[tokio::test]
async fn test_clear_reports_every_key_gone() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FjallStore::open(dir.path())?;

    let pairs: Vec<(String, String)> = (0..200)
        .map(|i| (format!("key.{i:03}"), i.to_string()))
        .collect();
    store.multi_set(&pairs).await?;
    assert_eq!(store.get_all_keys().await?.len(), 200);

    store.clear().await?;
    assert!(store.get_all_keys().await?.is_empty());

    // The cleared store stays usable.
    store.set("after", "1").await?;
    assert_eq!(store.get_all_keys().await?, vec!["after".to_string()]);

    Ok(())
}
