//! Integration tests for the scheduler against both store backends.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::join_all;
use lexis_core::{
    ErrorCode, InMemoryWordStore, LearnerSettings, LearnerStats, LexisError, LexisResult,
    Progress, ProgressCreate, ProgressDelta, RankOrder, Scheduler, ScriptedRandom,
    SqliteWordStore, Word, WordStore,
};

fn vocabulary() -> Vec<Word> {
    vec![
        Word::new("le", vec!["the".into()], 1, "det").with_id("w-le"),
        Word::new("être", vec!["to be".into(), "being".into()], 2, "verb").with_id("w-etre"),
        Word::new("avoir", vec!["to have".into()], 3, "verb").with_id("w-avoir"),
        Word::new("maison", vec!["house".into(), "home".into()], 4, "noun")
            .with_id("w-maison")
            .with_distractors(vec![
                vec!["car".into()],
                vec!["tree".into(), "wood".into()],
            ]),
        Word::new("chat", vec!["cat".into()], 5, "noun").with_id("w-chat"),
        Word::new("chien", vec!["dog".into()], 6, "noun").with_id("w-chien"),
    ]
}

async fn stores() -> Vec<(&'static str, Arc<dyn WordStore>)> {
    let sqlite = SqliteWordStore::in_memory().unwrap();
    sqlite.insert_words(vocabulary()).await.unwrap();
    vec![
        ("memory", Arc::new(InMemoryWordStore::with_words(vocabulary())) as Arc<dyn WordStore>),
        ("sqlite", Arc::new(sqlite) as Arc<dyn WordStore>),
    ]
}

/// Store wrapper that counts every call.
struct CountingStore {
    inner: InMemoryWordStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryWordStore::with_words(vocabulary()),
            calls: AtomicUsize::new(0),
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WordStore for CountingStore {
    async fn find_word_by_extreme(&self, order: RankOrder, unseen_by: Option<&str>) -> LexisResult<Option<Word>> {
        self.hit();
        self.inner.find_word_by_extreme(order, unseen_by).await
    }

    async fn find_word_due_for_review(&self, learner_id: &str, threshold: i64, order: RankOrder) -> LexisResult<Option<Word>> {
        self.hit();
        self.inner.find_word_due_for_review(learner_id, threshold, order).await
    }

    async fn get_word_by_key(&self, term: &str) -> LexisResult<Option<Word>> {
        self.hit();
        self.inner.get_word_by_key(term).await
    }

    async fn get_word(&self, id: &str) -> LexisResult<Option<Word>> {
        self.hit();
        self.inner.get_word(id).await
    }

    async fn sample_other_words(&self, exclude_term: &str, limit: usize, order: RankOrder) -> LexisResult<Vec<Word>> {
        self.hit();
        self.inner.sample_other_words(exclude_term, limit, order).await
    }

    async fn get_progress(&self, learner_id: &str, word_id: &str) -> LexisResult<Option<Progress>> {
        self.hit();
        self.inner.get_progress(learner_id, word_id).await
    }

    async fn insert_progress_if_absent(&self, learner_id: &str, word_id: &str, create: ProgressCreate) -> LexisResult<bool> {
        self.hit();
        self.inner.insert_progress_if_absent(learner_id, word_id, create).await
    }

    async fn upsert_progress(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
        delta: ProgressDelta,
    ) -> LexisResult<Progress> {
        self.hit();
        self.inner.upsert_progress(learner_id, word_id, create, delta).await
    }

    async fn get_settings(&self, learner_id: &str) -> LexisResult<Option<LearnerSettings>> {
        self.hit();
        self.inner.get_settings(learner_id).await
    }

    async fn put_settings(&self, learner_id: &str, settings: &LearnerSettings) -> LexisResult<()> {
        self.hit();
        self.inner.put_settings(learner_id, settings).await
    }

    async fn insert_words(&self, words: Vec<Word>) -> LexisResult<usize> {
        self.hit();
        self.inner.insert_words(words).await
    }

    async fn clear_words(&self) -> LexisResult<()> {
        self.hit();
        self.inner.clear_words().await
    }

    async fn count_words(&self) -> LexisResult<u64> {
        self.hit();
        self.inner.count_words().await
    }

    async fn learner_stats(&self, learner_id: &str, threshold: i64) -> LexisResult<LearnerStats> {
        self.hit();
        self.inner.learner_stats(learner_id, threshold).await
    }
}

/// Store whose every call fails as an unreachable backend would.
struct FailingStore;

fn unavailable<T>() -> LexisResult<T> {
    Err(LexisError::store("connection refused"))
}

#[async_trait]
impl WordStore for FailingStore {
    async fn find_word_by_extreme(&self, _: RankOrder, _: Option<&str>) -> LexisResult<Option<Word>> {
        unavailable()
    }

    async fn find_word_due_for_review(&self, _: &str, _: i64, _: RankOrder) -> LexisResult<Option<Word>> {
        unavailable()
    }

    async fn get_word_by_key(&self, _: &str) -> LexisResult<Option<Word>> {
        unavailable()
    }

    async fn get_word(&self, _: &str) -> LexisResult<Option<Word>> {
        unavailable()
    }

    async fn sample_other_words(&self, _: &str, _: usize, _: RankOrder) -> LexisResult<Vec<Word>> {
        unavailable()
    }

    async fn get_progress(&self, _: &str, _: &str) -> LexisResult<Option<Progress>> {
        unavailable()
    }

    async fn insert_progress_if_absent(&self, _: &str, _: &str, _: ProgressCreate) -> LexisResult<bool> {
        unavailable()
    }

    async fn upsert_progress(
        &self,
        _: &str,
        _: &str,
        _: ProgressCreate,
        _: ProgressDelta,
    ) -> LexisResult<Progress> {
        unavailable()
    }

    async fn get_settings(&self, _: &str) -> LexisResult<Option<LearnerSettings>> {
        unavailable()
    }

    async fn put_settings(&self, _: &str, _: &LearnerSettings) -> LexisResult<()> {
        unavailable()
    }

    async fn insert_words(&self, _: Vec<Word>) -> LexisResult<usize> {
        unavailable()
    }

    async fn clear_words(&self) -> LexisResult<()> {
        unavailable()
    }

    async fn count_words(&self) -> LexisResult<u64> {
        unavailable()
    }

    async fn learner_stats(&self, _: &str, _: i64) -> LexisResult<LearnerStats> {
        unavailable()
    }
}

fn assert_store_unavailable(err: LexisError) {
    assert!(err.is_retryable(), "expected retryable error, got {err}");
    assert!(matches!(err, LexisError::StoreUnavailable { .. }));
    assert_eq!(err.code(), ErrorCode::StoreOperationFailed);
}

#[tokio::test]
async fn test_new_learner_gets_extreme_word_and_one_progress_record() {
    for (name, store) in stores().await {
        let scheduler = Scheduler::new(store.clone());
        let settings = LearnerSettings::default();

        let word = scheduler
            .select_next_word(Some("learner"), &settings)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(word.term, "le", "backend {name}");

        let progress = store.get_progress("learner", "w-le").await.unwrap().unwrap();
        assert_eq!(progress.mastery_level, 0, "backend {name}");
        assert_eq!(progress.times_correct, 0);
        assert_eq!(progress.times_wrong, 0);
        assert!(progress.next_review.is_some());

        let stats = store.learner_stats("learner", 3).await.unwrap();
        assert_eq!(stats.words_seen, 1, "backend {name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_selection_creates_single_record() {
    for (name, store) in stores().await {
        let scheduler = Arc::new(Scheduler::new(store.clone()));
        let settings = LearnerSettings::default();

        let tasks = (0..8).map(|_| {
            let scheduler = scheduler.clone();
            let settings = settings.clone();
            tokio::spawn(async move {
                scheduler
                    .select_next_word(Some("racer"), &settings)
                    .await
                    .unwrap()
            })
        });
        let selected: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap().id)
            .collect();

        // Every presented word has exactly one record, whatever the interleaving.
        let distinct: HashSet<_> = selected.iter().cloned().collect();
        let stats = store.learner_stats("racer", 3).await.unwrap();
        assert_eq!(stats.words_seen as usize, distinct.len(), "backend {name}");
        assert!(distinct.contains("w-le"), "backend {name}");
    }
}

#[tokio::test]
async fn test_racing_first_presentations_of_same_word() {
    for (name, store) in stores().await {
        let now = Utc::now();
        let results = join_all((0..4).map(|_| {
            store.insert_progress_if_absent("racer", "w-le", ProgressCreate::first_presentation(now))
        }))
        .await;

        let created = results.into_iter().filter(|r| *r.as_ref().unwrap()).count();
        assert_eq!(created, 1, "backend {name}");
    }
}

#[tokio::test]
async fn test_anonymous_answer_never_contacts_store() {
    let store = Arc::new(CountingStore::new());
    let scheduler = Scheduler::new(store.clone());

    let result = scheduler.submit_answer(None, "w-le", true).await.unwrap();

    assert!(result.is_none());
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_anonymous_selection_creates_no_progress() {
    let store = Arc::new(CountingStore::new());
    let scheduler = Scheduler::new(store.clone());
    let settings = LearnerSettings {
        use_frequency_order: false,
        ..Default::default()
    };

    let word = scheduler.select_next_word(None, &settings).await.unwrap().unwrap();
    assert_eq!(word.term, "chien");
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.inner.learner_stats("", 3).await.unwrap().words_seen, 0);
}

#[tokio::test]
async fn test_stored_distractors_prepend_correct_answer() {
    for (name, store) in stores().await {
        let scheduler = Scheduler::new(store);

        let options = scheduler.generate_options("maison", 3).await.unwrap();
        assert_eq!(
            options,
            vec!["house / home".to_string(), "car".to_string(), "tree / wood".to_string()],
            "backend {name}"
        );
    }
}

#[tokio::test]
async fn test_fallback_options_exclude_target() {
    for (name, store) in stores().await {
        let scheduler = Scheduler::new(store);

        for _ in 0..4 {
            let options = scheduler.generate_options("chat", 3).await.unwrap();
            assert_eq!(options.len(), 3, "backend {name}");
            for option in &options {
                assert!(!option.is_empty());
                assert_ne!(option, "chat");
                assert_ne!(option, "cat");
            }
        }
    }
}

#[tokio::test]
async fn test_fallback_direction_follows_random_source() {
    for (name, store) in stores().await {
        let scheduler =
            Scheduler::new(store).with_random(Arc::new(ScriptedRandom::new([true, false])));

        let ascending = scheduler.generate_options("chat", 2).await.unwrap();
        let descending = scheduler.generate_options("chat", 2).await.unwrap();

        let ascending: HashSet<_> = ascending.into_iter().collect();
        let descending: HashSet<_> = descending.into_iter().collect();
        assert_eq!(
            ascending,
            HashSet::from(["the".to_string(), "to be / being".to_string()]),
            "backend {name}"
        );
        assert_eq!(
            descending,
            HashSet::from(["dog".to_string(), "house / home".to_string()]),
            "backend {name}"
        );
    }
}

#[tokio::test]
async fn test_repeated_answers_are_monotonic_without_floor() {
    for (name, store) in stores().await {
        let scheduler = Scheduler::new(store.clone());
        store
            .put_settings("learner", &LearnerSettings::default())
            .await
            .unwrap();
        let now = Utc::now();

        let mut last_correct = 0;
        let mut last_wrong = 0;
        for correct in [true, false, false, false, true] {
            let progress = scheduler
                .submit_answer_at(Some("learner"), "w-avoir", correct, now)
                .await
                .unwrap()
                .unwrap();
            assert!(progress.times_correct >= last_correct);
            assert!(progress.times_wrong >= last_wrong);
            last_correct = progress.times_correct;
            last_wrong = progress.times_wrong;
        }

        let progress = store.get_progress("learner", "w-avoir").await.unwrap().unwrap();
        assert_eq!(progress.times_correct, 2, "backend {name}");
        assert_eq!(progress.times_wrong, 3, "backend {name}");
        // 1 -> 0 -> -1 -> -2 -> -1
        assert_eq!(progress.mastery_level, -1, "backend {name}");
        // Negative mastery before the last correct answer: shortest bucket.
        assert_eq!(progress.next_review, Some(now + Duration::hours(4)));
    }
}

#[tokio::test]
async fn test_concurrent_answers_are_both_counted() {
    for (name, store) in stores().await {
        let scheduler = Arc::new(Scheduler::new(store.clone()));
        store
            .put_settings("learner", &LearnerSettings::default())
            .await
            .unwrap();
        let now = Utc::now();

        let results = join_all((0..2).map(|_| {
            let scheduler = scheduler.clone();
            async move {
                scheduler
                    .submit_answer_at(Some("learner"), "w-chat", true, now)
                    .await
            }
        }))
        .await;
        assert!(results.iter().all(|r| r.is_ok()), "backend {name}");

        let progress = store.get_progress("learner", "w-chat").await.unwrap().unwrap();
        assert_eq!(progress.times_correct, 2, "backend {name}");
        assert_eq!(progress.mastery_level, 2, "backend {name}");
        assert!(progress.next_review.is_some_and(|t| t > now), "backend {name}");
    }
}

#[tokio::test]
async fn test_due_review_ignores_next_review_time() {
    for (name, store) in stores().await {
        let scheduler = Scheduler::new(store.clone());
        let settings = LearnerSettings::default();
        store.put_settings("learner", &settings).await.unwrap();

        for _ in 0..vocabulary().len() {
            scheduler.select_next_word(Some("learner"), &settings).await.unwrap();
        }
        // Wrong answer schedules "le" an hour out, yet it is still selected.
        scheduler.submit_answer(Some("learner"), "w-le", false).await.unwrap();

        let next = scheduler
            .select_next_word(Some("learner"), &settings)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.term, "le", "backend {name}");
    }
}

#[tokio::test]
async fn test_sqlite_file_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexis.db");

    {
        let store = SqliteWordStore::new(&path).unwrap();
        store.insert_words(vocabulary()).await.unwrap();
        store
            .put_settings("learner", &LearnerSettings::default())
            .await
            .unwrap();
        let scheduler = Scheduler::new(Arc::new(store));
        scheduler.submit_answer(Some("learner"), "w-chat", true).await.unwrap();
    }

    let reopened = SqliteWordStore::new(&path).unwrap();
    assert_eq!(reopened.count_words().await.unwrap(), 6);
    let progress = reopened.get_progress("learner", "w-chat").await.unwrap().unwrap();
    assert_eq!(progress.mastery_level, 1);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_retryable_error() {
    let scheduler = Scheduler::new(Arc::new(FailingStore));
    let settings = LearnerSettings::default();

    assert_store_unavailable(
        scheduler
            .select_next_word(Some("learner"), &settings)
            .await
            .unwrap_err(),
    );
    assert_store_unavailable(scheduler.select_next_word(None, &settings).await.unwrap_err());
    assert_store_unavailable(scheduler.generate_options("chat", 3).await.unwrap_err());
    assert_store_unavailable(
        scheduler
            .submit_answer(Some("learner"), "w-chat", true)
            .await
            .unwrap_err(),
    );

    // Anonymous answers still never reach the store.
    assert!(scheduler.submit_answer(None, "w-chat", true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_backends_agree_on_shared_ids() {
    let batch = || {
        vec![
            Word::new("a", vec!["a-en".into()], 1, "noun").with_id("same"),
            Word::new("b", vec!["b-en".into()], 2, "noun").with_id("same"),
            Word::new("c", vec!["c-en".into()], 3, "noun").with_id("other"),
        ]
    };
    let backends: Vec<(&str, Arc<dyn WordStore>)> = vec![
        ("memory", Arc::new(InMemoryWordStore::new())),
        ("sqlite", Arc::new(SqliteWordStore::in_memory().unwrap())),
    ];

    for (name, store) in backends {
        let inserted = store.insert_words(batch()).await.unwrap();
        assert_eq!(inserted, 2, "backend {name}");
        assert!(store.get_word_by_key("b").await.unwrap().is_none(), "backend {name}");

        let scheduler = Scheduler::new(store.clone());
        let settings = LearnerSettings::default();
        let first = scheduler.select_next_word(Some("learner"), &settings).await.unwrap();
        let second = scheduler.select_next_word(Some("learner"), &settings).await.unwrap();
        assert_eq!(first.unwrap().term, "a", "backend {name}");
        assert_eq!(second.unwrap().term, "c", "backend {name}");
    }
}
