//! Daily plan generator: one persisted plan per study day.

use crate::error::Result;
use crate::review::ReviewScheduler;
use crate::store::{self, KeyValueStore, PlanRepository, ProgressRepository, DAILY_PLANS_KEY};
use chrono::{DateTime, NaiveDate, Utc};
use lexicon_core::algorithm::ReviewAlgorithm;
use lexicon_core::calendar::week_days;
use lexicon_core::mastery::normalize_word;
use lexicon_core::planner::{generate_plan, PlanRequest};
use lexicon_core::types::{DailyPlan, UserLevel};
use lexicon_core::Corpus;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info};

pub struct DailyPlanner<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    corpus: &'a C,
    algorithm: &'a dyn ReviewAlgorithm,
}

impl<'a, S, C> DailyPlanner<'a, S, C>
where
    S: KeyValueStore + ?Sized,
    C: Corpus + ?Sized,
{
    pub fn new(store: &'a S, corpus: &'a C, algorithm: &'a dyn ReviewAlgorithm) -> Self {
        Self {
            store,
            corpus,
            algorithm,
        }
    }

    /// The stored plan for `date`, generating and storing one if there is none.
    ///
    /// An existing plan is returned unchanged whatever `level` or
    /// `target_words` are passed.
    pub fn get_or_create<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        level: UserLevel,
        target_words: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> store::Result<DailyPlan> {
        let mut plans = self.store.load_daily_plans()?;
        if let Some(plan) = plans.get(&date) {
            return Ok(plan.clone());
        }

        let learned: HashSet<String> = self.store.load_word_progress()?.into_keys().collect();
        let due = ReviewScheduler::new(self.store, self.algorithm).due_words(now)?;
        let request = PlanRequest {
            date,
            level,
            target_words,
            learned: &learned,
            due: &due,
        };
        let plan = generate_plan(self.corpus, &request, rng);

        plans.insert(date, plan.clone());
        self.store.save_daily_plans(&plans)?;
        info!(
            date = %date,
            level = level.as_str(),
            core = plan.core_words.len(),
            extended = plan.extended_words.len(),
            review = plan.review_words.len(),
            "daily plan generated"
        );
        Ok(plan)
    }

    /// The stored plan for `date`, without generating one.
    pub fn get_plan(&self, date: NaiveDate) -> store::Result<Option<DailyPlan>> {
        Ok(self.store.load_daily_plans()?.remove(&date))
    }

    /// Mark a planned word complete.
    ///
    /// Returns `None` when there is no plan for `date`. Words outside the
    /// plan and repeated marks leave the plan as it was.
    pub fn mark_completed(&self, date: NaiveDate, word: &str) -> Result<Option<DailyPlan>> {
        let word = normalize_word(word)?;
        let mut plans = self.store.load_daily_plans()?;
        let Some(plan) = plans.get_mut(&date) else {
            debug!(date = %date, "no plan to mark");
            return Ok(None);
        };

        if plan.mark_completed(&word) {
            let updated = plan.clone();
            self.store.save_daily_plans(&plans)?;
            debug!(date = %date, word = %word, progress = ?updated.progress, "plan word completed");
            return Ok(Some(updated));
        }
        Ok(Some(plan.clone()))
    }

    /// Stored plans for the week containing `today`, oldest first.
    pub fn weekly_plans(&self, today: NaiveDate) -> store::Result<Vec<DailyPlan>> {
        let mut plans = self.store.load_daily_plans()?;
        Ok(week_days(today).filter_map(|day| plans.remove(&day)).collect())
    }

    pub fn clear_all(&self) -> store::Result<()> {
        self.store.delete(DAILY_PLANS_KEY)
    }
}
