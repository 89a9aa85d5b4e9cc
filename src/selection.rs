//! Best-of-N level selection
//!
//! Drunken walks produce uneven caves, so many are generated and the one whose
//! start-to-end route is longest is kept. Unreachable candidates score zero
//! and stay in the pool. Ties go to the candidate generated first.

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::excavation::{excavate, Candidate, ExcavationParams};
use crate::pathfinding::{solve, SearchPath};
use crate::seeds::candidate_rng;

/// A candidate together with its solution route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Position in generation order
    pub index: usize,
    pub candidate: Candidate,
    pub path: SearchPath,
}

impl ScoredCandidate {
    /// Route length in cells; zero when the end is unreachable.
    pub fn score(&self) -> usize {
        self.path.len()
    }
}

/// Summary of the scores of one batch
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub candidates: usize,
    pub unreachable: usize,
    pub min_score: usize,
    pub max_score: usize,
    pub mean_score: f64,
}

impl SelectionStats {
    pub fn from_scores(scores: &[usize]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let total: usize = scores.iter().sum();
        Self {
            candidates: scores.len(),
            unreachable: scores.iter().filter(|s| **s == 0).count(),
            min_score: scores.iter().copied().min().unwrap_or(0),
            max_score: scores.iter().copied().max().unwrap_or(0),
            mean_score: total as f64 / scores.len() as f64,
        }
    }
}

/// Winner of a selection run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selection {
    pub best: ScoredCandidate,
    pub stats: SelectionStats,
}

impl Selection {
    pub fn into_candidate(self) -> Candidate {
        self.best.candidate
    }
}

fn check_count(candidate_count: usize) -> Result<(), LevelError> {
    if candidate_count == 0 {
        return Err(LevelError::InvalidConfiguration(
            "candidate count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Solve a candidate and attach its route.
pub fn score_candidate(index: usize, candidate: Candidate) -> Result<ScoredCandidate, LevelError> {
    let path = solve(&candidate.grid, candidate.start, candidate.end)?;
    debug!("Candidate {} scored {}", index, path.len());
    Ok(ScoredCandidate {
        index,
        candidate,
        path,
    })
}

/// Run `count` excavations, one after another on the same generator.
pub fn generate_candidates<R: Rng + ?Sized>(
    count: usize,
    params: &ExcavationParams,
    rng: &mut R,
) -> Result<Vec<Candidate>, LevelError> {
    params.validate()?;
    (0..count).map(|_| excavate(params, rng)).collect()
}

/// Score every candidate, keeping generation order.
pub fn evaluate_candidates(candidates: Vec<Candidate>) -> Result<Vec<ScoredCandidate>, LevelError> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| score_candidate(index, candidate))
        .collect()
}

/// Highest-scoring candidate; on ties the one with the lowest index.
pub fn best_of<I>(scored: I) -> Option<ScoredCandidate>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    scored.into_iter().fold(None, |best, next| match best {
        Some(current) if !outranks(&next, &current) => Some(current),
        _ => Some(next),
    })
}

fn outranks(a: &ScoredCandidate, b: &ScoredCandidate) -> bool {
    a.score() > b.score() || (a.score() == b.score() && a.index < b.index)
}

/// Generate `candidate_count` caves and return the one with the longest route.
///
/// # Errors
///
/// Returns [`LevelError::InvalidConfiguration`] for a zero count or invalid
/// excavation parameters.
pub fn select_best<R: Rng + ?Sized>(
    candidate_count: usize,
    params: &ExcavationParams,
    rng: &mut R,
) -> Result<Candidate, LevelError> {
    select_best_scored(candidate_count, params, rng).map(Selection::into_candidate)
}

/// [`select_best`] with the winning route and batch statistics.
///
/// Candidates are excavated and scored one at a time; only the current best
/// grid is kept alive.
pub fn select_best_scored<R: Rng + ?Sized>(
    candidate_count: usize,
    params: &ExcavationParams,
    rng: &mut R,
) -> Result<Selection, LevelError> {
    check_count(candidate_count)?;
    params.validate()?;

    let mut scores = Vec::with_capacity(candidate_count);
    let mut best: Option<ScoredCandidate> = None;

    for index in 0..candidate_count {
        let candidate = excavate(params, rng)?;
        let scored = score_candidate(index, candidate)?;
        scores.push(scored.score());
        best = best_of(best.into_iter().chain(std::iter::once(scored)));
    }

    finish(best, &scores)
}

/// Parallel selection with one independent generator per candidate.
///
/// Candidate `i` always draws from [`candidate_rng`]`(master_seed, i)`, so the
/// result is the same for any thread count.
pub fn select_best_parallel(
    candidate_count: usize,
    params: &ExcavationParams,
    master_seed: u64,
) -> Result<Selection, LevelError> {
    check_count(candidate_count)?;
    params.validate()?;

    let scored: Vec<ScoredCandidate> = (0..candidate_count)
        .into_par_iter()
        .map(|index| {
            let mut rng = candidate_rng(master_seed, index);
            let candidate = excavate(params, &mut rng)?;
            score_candidate(index, candidate)
        })
        .collect::<Result<Vec<_>, LevelError>>()?;

    let scores: Vec<usize> = scored.iter().map(ScoredCandidate::score).collect();
    finish(best_of(scored), &scores)
}

fn finish(best: Option<ScoredCandidate>, scores: &[usize]) -> Result<Selection, LevelError> {
    let best = best.ok_or_else(|| {
        LevelError::InvalidConfiguration("no candidates were generated".to_string())
    })?;
    let stats = SelectionStats::from_scores(scores);

    info!(
        "Selected candidate {} of {} with score {} (mean {:.1}, {} unreachable)",
        best.index,
        stats.candidates,
        best.score(),
        stats.mean_score,
        stats.unreachable
    );

    Ok(Selection { best, stats })
}
