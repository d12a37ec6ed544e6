//! Daily plan generation.
//!
//! A plan splits the day's target into three disjoint word lists:
//! - core: unfamiliar words whose roots recur most across the candidate pool
//! - extended: further unfamiliar words chosen for root diversity
//! - review: learned words currently due, weakest first

use crate::corpus::{Corpus, WordEntry};
use crate::types::{DailyPlan, Difficulty, PlanProgress, UserLevel};
use chrono::NaiveDate;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Default number of words in a daily plan.
pub const DEFAULT_TARGET_WORDS: u32 = 10;

/// Chance of accepting an extended word that brings no new root.
const REPEAT_ROOT_ACCEPTANCE: f64 = 0.5;

/// How many words of each kind a plan should hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanQuotas {
    pub core: usize,
    pub extended: usize,
    pub review: usize,
}

impl PlanQuotas {
    /// 60% core, 30% extended, 20% review, each rounded up.
    pub fn for_target(target_words: u32) -> Self {
        let target = target_words as usize;
        Self {
            core: ceil_percent(target, 60),
            extended: ceil_percent(target, 30),
            review: ceil_percent(target, 20),
        }
    }
}

// Integer arithmetic keeps 10 * 30% at exactly 3.
fn ceil_percent(value: usize, percent: usize) -> usize {
    (value * percent).div_ceil(100)
}

/// Inputs for generating one plan.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub date: NaiveDate,
    pub level: UserLevel,
    pub target_words: u32,
    /// Words already in the progress store.
    pub learned: &'a HashSet<String>,
    /// Due words, already ordered weakest/stalest first.
    pub due: &'a [String],
}

/// Generate a fresh plan.
pub fn generate_plan<C, R>(corpus: &C, request: &PlanRequest<'_>, rng: &mut R) -> DailyPlan
where
    C: Corpus + ?Sized,
    R: Rng + ?Sized,
{
    let quotas = PlanQuotas::for_target(request.target_words);

    let candidates: Vec<&WordEntry> = corpus
        .words_at_level(request.level)
        .into_iter()
        .filter(|entry| !request.learned.contains(&entry.word))
        .collect();

    let core_words = select_core_words(&candidates, quotas.core);
    let chosen: HashSet<&str> = core_words.iter().map(String::as_str).collect();
    let remaining: Vec<&WordEntry> = candidates
        .iter()
        .copied()
        .filter(|entry| !chosen.contains(entry.word.as_str()))
        .collect();
    let extended_words = select_extended_words(&remaining, quotas.extended, rng);

    let review_words: Vec<String> = request.due.iter().take(quotas.review).cloned().collect();

    DailyPlan {
        date: request.date,
        difficulty: plan_difficulty(core_words.len(), extended_words.len()),
        estimated_time: estimated_minutes(core_words.len(), extended_words.len(), review_words.len()),
        core_words,
        extended_words,
        review_words,
        progress: PlanProgress::NotStarted,
        completed_words: Vec::new(),
        notes: None,
    }
}

/// Pick the `count` candidates whose roots are most frequent across the pool.
///
/// Ties keep corpus order.
pub fn select_core_words(candidates: &[&WordEntry], count: usize) -> Vec<String> {
    let mut root_frequency: HashMap<&str, usize> = HashMap::new();
    for entry in candidates {
        for root in &entry.roots {
            *root_frequency.entry(root.as_str()).or_insert(0) += 1;
        }
    }

    let mut scored: Vec<(usize, &WordEntry)> = candidates
        .iter()
        .map(|entry| {
            let score = entry
                .roots
                .iter()
                .map(|root| root_frequency.get(root.as_str()).copied().unwrap_or(0))
                .sum();
            (score, *entry)
        })
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(count)
        .map(|(_, entry)| entry.word.clone())
        .collect()
}

/// Single greedy pass in corpus order favouring words that add a new root.
///
/// A word that adds no new root is still accepted half of the time.
pub fn select_extended_words<R: Rng + ?Sized>(
    candidates: &[&WordEntry],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut selected = Vec::with_capacity(count);
    let mut covered: HashSet<&str> = HashSet::new();

    for entry in candidates {
        if selected.len() >= count {
            break;
        }
        let adds_root = entry.roots.iter().any(|root| !covered.contains(root.as_str()));
        if adds_root || rng.gen_bool(REPEAT_ROOT_ACCEPTANCE) {
            selected.push(entry.word.clone());
            covered.extend(entry.roots.iter().map(String::as_str));
        }
    }
    selected
}

/// Difficulty from the number of new words in the plan.
pub fn plan_difficulty(core: usize, extended: usize) -> Difficulty {
    match core + extended {
        0..=8 => Difficulty::Easy,
        9..=15 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

/// Minutes: 3 per core word, 2 per extended word, 1 per review word.
pub fn estimated_minutes(core: usize, extended: usize, review: usize) -> u32 {
    (core * 3 + extended * 2 + review) as u32
}
