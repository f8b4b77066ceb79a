//! The word scheduler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::interval::next_review_time;
use crate::error::{LexisError, LexisResult};
use crate::events::{EventBus, StudyEvent};
use crate::random::{RandomSource, ThreadRandom};
use crate::traits::WordStore;
use crate::types::{
    LearnerSettings, LearnerStats, Progress, ProgressCreate, ProgressDelta, RankOrder,
    SettingsUpdate, Word, OPTION_SEPARATOR,
};

/// Stateless word scheduler.
///
/// Every call receives the learner, settings and word it needs as arguments;
/// all persistent state lives in the [`WordStore`].
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use lexis_core::{InMemoryWordStore, LearnerSettings, Scheduler};
///
/// let scheduler = Scheduler::new(Arc::new(InMemoryWordStore::new()));
/// let settings = LearnerSettings::default();
/// if let Some(word) = scheduler.select_next_word(Some("learner-1"), &settings).await? {
///     let options = scheduler.generate_options(&word.term, 3).await?;
///     scheduler.submit_answer(Some("learner-1"), &word.id, true).await?;
/// }
/// ```
pub struct Scheduler {
    store: Arc<dyn WordStore>,
    random: Arc<dyn RandomSource>,
    events: Option<EventBus>,
}

impl Scheduler {
    /// Create a scheduler over a store, using thread-local randomness.
    pub fn new(store: Arc<dyn WordStore>) -> Self {
        Self {
            store,
            random: Arc::new(ThreadRandom),
            events: None,
        }
    }

    /// Replace the random source.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Announce study events on the given bus.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn WordStore> {
        &self.store
    }

    fn emit(&self, event: StudyEvent) {
        if let Some(ref bus) = self.events {
            bus.emit(event);
        }
    }

    /// Select the next word to show.
    ///
    /// Returns `None` when there is nothing to study right now.
    pub async fn select_next_word(
        &self,
        learner_id: Option<&str>,
        settings: &LearnerSettings,
    ) -> LexisResult<Option<Word>> {
        self.select_next_word_at(learner_id, settings, Utc::now()).await
    }

    /// [`select_next_word`](Self::select_next_word) with an explicit clock.
    ///
    /// Priority order:
    /// 1. anonymous sessions get the word at the ranking extreme, untracked;
    /// 2. the extreme word the learner has never seen, recording its first
    ///    presentation;
    /// 3. the extreme word whose mastery is below the threshold.
    ///
    /// The review branch does not filter on `next_review`.
    pub async fn select_next_word_at(
        &self,
        learner_id: Option<&str>,
        settings: &LearnerSettings,
        now: DateTime<Utc>,
    ) -> LexisResult<Option<Word>> {
        let order = settings.rank_order();

        let Some(learner_id) = learner_id else {
            debug!(%order, "Selecting word for anonymous session");
            return self.store.find_word_by_extreme(order, None).await;
        };

        if let Some(word) = self
            .store
            .find_word_by_extreme(order, Some(learner_id))
            .await?
        {
            let created = self
                .store
                .insert_progress_if_absent(
                    learner_id,
                    &word.id,
                    ProgressCreate::first_presentation(now),
                )
                .await?;

            if created {
                debug!(learner_id, word = %word.term, "Presenting unseen word");
                self.emit(StudyEvent::ProgressStarted {
                    learner_id: learner_id.to_string(),
                    word_id: word.id.clone(),
                    timestamp: now,
                });
            }
            return Ok(Some(word));
        }

        let due = self
            .store
            .find_word_due_for_review(learner_id, settings.mastery_threshold(), order)
            .await?;

        match due {
            Some(ref word) => debug!(learner_id, word = %word.term, "Presenting word for review"),
            None => debug!(learner_id, "Nothing to study"),
        }

        Ok(due)
    }

    /// Build answer options for the word with the given term.
    ///
    /// With stored distractors the result is the correct translation followed
    /// by each distractor group, in storage order and unshuffled. Otherwise
    /// it holds up to `count` translations of other words, walked from a
    /// randomly chosen end of the frequency ranking.
    pub async fn generate_options(&self, term: &str, count: usize) -> LexisResult<Vec<String>> {
        let word = self
            .store
            .get_word_by_key(term)
            .await?
            .ok_or_else(|| LexisError::word_not_found(term))?;

        if let Some(groups) = word.distractor_groups() {
            let mut options = Vec::with_capacity(groups.len() + 1);
            options.push(word.joined_translations());
            options.extend(groups.iter().map(|group| group.join(OPTION_SEPARATOR)));
            return Ok(options);
        }

        let order = RankOrder::from_coin(self.random.coin_flip());
        debug!(term, count, %order, "No stored distractors, sampling other words");

        let others = self.store.sample_other_words(term, count, order).await?;
        Ok(others.iter().map(Word::joined_translations).collect())
    }

    /// Shuffle options for display with the injected random source.
    pub fn shuffle_options(&self, options: &mut [String]) {
        self.random.shuffle(options);
    }

    /// Record an answer.
    ///
    /// Anonymous answers are ignored without touching the store and return
    /// `None`. Otherwise returns the stored progress.
    pub async fn submit_answer(
        &self,
        learner_id: Option<&str>,
        word_id: &str,
        correct: bool,
    ) -> LexisResult<Option<Progress>> {
        self.submit_answer_at(learner_id, word_id, correct, Utc::now())
            .await
    }

    /// [`submit_answer`](Self::submit_answer) with an explicit clock.
    ///
    /// The counter and mastery update is a single atomic upsert, but the
    /// review interval is derived from mastery read beforehand. Two answers
    /// racing on the same word both count, and the later write's
    /// `next_review` may reflect the mastery both of them read.
    pub async fn submit_answer_at(
        &self,
        learner_id: Option<&str>,
        word_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> LexisResult<Option<Progress>> {
        let Some(learner_id) = learner_id else {
            debug!(word_id, "Ignoring answer from anonymous session");
            return Ok(None);
        };

        let (settings, word) = tokio::try_join!(
            self.store.get_settings(learner_id),
            self.store.get_word(word_id)
        )?;
        let settings = settings.ok_or_else(|| LexisError::settings_not_found(learner_id))?;
        if word.is_none() {
            return Err(LexisError::word_not_found(word_id));
        }

        let prior_mastery = self
            .store
            .get_progress(learner_id, word_id)
            .await?
            .map(|p| p.mastery_level)
            .unwrap_or(0);
        let next_review = next_review_time(
            prior_mastery,
            correct,
            settings.required_correct_answers,
            now,
        );

        let progress = self
            .store
            .upsert_progress(
                learner_id,
                word_id,
                ProgressCreate::first_answer(correct, now, next_review),
                ProgressDelta::for_answer(correct, now, next_review),
            )
            .await?;

        info!(
            learner_id,
            word_id,
            correct,
            mastery_level = progress.mastery_level,
            next_review = %next_review,
            "Answer recorded"
        );

        self.emit(StudyEvent::AnswerRecorded {
            learner_id: learner_id.to_string(),
            word_id: word_id.to_string(),
            correct,
            mastery_level: progress.mastery_level,
            next_review: progress.next_review,
            timestamp: now,
        });
        self.emit(StudyEvent::QueueInvalidated {
            learner_id: learner_id.to_string(),
            timestamp: now,
        });

        Ok(Some(progress))
    }

    /// Settings to select with: the learner's stored settings, or `defaults`
    /// for anonymous sessions and learners who never saved any.
    pub async fn settings_for_selection(
        &self,
        learner_id: Option<&str>,
        defaults: &LearnerSettings,
    ) -> LexisResult<LearnerSettings> {
        match learner_id {
            Some(learner_id) => Ok(self
                .store
                .get_settings(learner_id)
                .await?
                .unwrap_or_else(|| defaults.clone())),
            None => Ok(defaults.clone()),
        }
    }

    /// Validate a partial update, merge it onto the current settings and save.
    pub async fn update_settings(
        &self,
        learner_id: &str,
        update: &SettingsUpdate,
        defaults: &LearnerSettings,
    ) -> LexisResult<LearnerSettings> {
        update.validate()?;

        let current = self
            .settings_for_selection(Some(learner_id), defaults)
            .await?;
        let merged = update.apply_to(&current)?;
        self.store.put_settings(learner_id, &merged).await?;

        info!(learner_id, "Learner settings saved");
        self.emit(StudyEvent::QueueInvalidated {
            learner_id: learner_id.to_string(),
            timestamp: Utc::now(),
        });

        Ok(merged)
    }

    /// Progress summary measured against the learner's mastery threshold.
    pub async fn learner_stats(
        &self,
        learner_id: &str,
        defaults: &LearnerSettings,
    ) -> LexisResult<LearnerStats> {
        let settings = self
            .settings_for_selection(Some(learner_id), defaults)
            .await?;
        let stats = self
            .store
            .learner_stats(learner_id, settings.mastery_threshold())
            .await?;

        Ok(LearnerStats {
            target_words: settings.target_words,
            daily_goal: settings.daily_goal,
            ..stats
        })
    }
}
