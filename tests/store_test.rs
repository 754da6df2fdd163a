use std::fs;
use syntaxtyper::content::Profile;
use syntaxtyper::registry::LessonKey;
use syntaxtyper::store::{
    FileProfileStore, InMemoryProfileStore, InMemoryProgressStore, JsonProgressStore, LessonProgress,
    ProfileStore, ProgressStore, ProgressUpdate,
};

#[tokio::test]
async fn test_in_memory_progress_merges_updates() {
    let store = InMemoryProgressStore::new();
    let key = LessonKey::new("javascript", 1);

    assert_eq!(store.get(&key).await.unwrap(), LessonProgress::default());

    store
        .update(&key, ProgressUpdate { best_wpm: Some(42.0), ..Default::default() })
        .await
        .unwrap();
    let record = store
        .update(&key, ProgressUpdate { completed_step: Some(3), ..Default::default() })
        .await
        .unwrap();

    assert_eq!(record.completed_step, 3);
    assert_eq!(record.best_wpm, Some(42.0));
    assert_eq!(store.get(&key).await.unwrap(), record);
}

#[tokio::test]
async fn test_typing_results_only_raise_the_bests() {
    let store = InMemoryProgressStore::new();
    let key = LessonKey::new("react", 1);

    let first = store.get(&key).await.unwrap().improvements(40.0, 90.0);
    assert_eq!(first.best_wpm, Some(40.0));
    assert_eq!(first.best_acc, Some(90.0));
    let record = store.update(&key, first).await.unwrap();

    let slower_but_cleaner = record.improvements(35.0, 98.0);
    assert_eq!(slower_but_cleaner.best_wpm, None);
    assert_eq!(slower_but_cleaner.completed_step, None);
    let record = store.update(&key, slower_but_cleaner).await.unwrap();

    assert_eq!(record.best_wpm, Some(40.0));
    assert_eq!(record.best_acc, Some(98.0));
    assert_eq!(record.improvements(40.0, 98.0), ProgressUpdate::default());
}

#[tokio::test]
async fn test_json_progress_persists_by_track_and_lesson() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("state").join("progress.json");
    let key = LessonKey::new("React", 1);

    let store = JsonProgressStore::new(&path);
    assert_eq!(store.get(&key).await.unwrap().completed_step, 0);
    store
        .update(
            &key,
            ProgressUpdate { completed_step: Some(2), best_acc: Some(97.5), ..Default::default() },
        )
        .await
        .unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["react:1"]["completedStep"], 2);
    assert_eq!(raw["react:1"]["bestAcc"], 97.5);
    assert!(raw["react:1"].get("bestWPM").is_none());

    let reopened = JsonProgressStore::new(&path);
    let record = reopened.get(&key).await.unwrap();
    assert_eq!(record.completed_step, 2);
    assert_eq!(record.best_acc, Some(97.5));
    assert_eq!(reopened.get(&LessonKey::new("react", 2)).await.unwrap(), LessonProgress::default());
}

#[tokio::test]
async fn test_file_profile_store_round_trip_and_fallback() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("profile");

    let store = FileProfileStore::new(&path, Profile::Construction);
    assert_eq!(store.get().await.unwrap(), Profile::Construction);

    store.set(Profile::Finance).await.unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "finance");
    assert_eq!(store.get().await.unwrap(), Profile::Finance);

    fs::write(&path, "astronaut\n").unwrap();
    assert_eq!(store.get().await.unwrap(), Profile::Construction);
}

#[tokio::test]
async fn test_in_memory_profile_store() {
    let store = InMemoryProfileStore::default();
    assert_eq!(store.get().await.unwrap(), Profile::General);
    store.set(Profile::Construction).await.unwrap();
    assert_eq!(store.get().await.unwrap(), Profile::Construction);
}
