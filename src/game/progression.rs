//! Progression state: score, position in the level/prompt hierarchy, and
//! unlocked levels.
//!
//! Only [`ProgressionState::apply_verdict`] mutates this state, and only
//! after a verdict exists — the scoring pipeline itself never touches it.
//! A false verdict changes nothing; the user retries the same prompt.

use std::collections::HashSet;

use crate::game::content::Level;

// ---------------------------------------------------------------------------
// Advance
// ---------------------------------------------------------------------------

/// What happened to the user's position after a verdict was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Verdict was false: same prompt, nothing changed.
    Retry,
    /// Moved to the next prompt within the current level.
    NextPrompt,
    /// Finished a level; the next one was unlocked and entered.
    NextLevel,
    /// The final prompt of the final level was passed; position stays put.
    Finished,
}

// ---------------------------------------------------------------------------
// ProgressionState
// ---------------------------------------------------------------------------

/// Cumulative session progress through a cohort's level table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    /// Number of prompts passed this session.
    pub score: u32,
    /// Zero-based index into the level table.
    pub level_index: usize,
    /// Zero-based index into the current level's prompts.
    pub prompt_index: usize,
    /// Identifiers of levels the user has reached.
    pub unlocked_levels: HashSet<String>,
}

impl ProgressionState {
    /// Start at the first prompt of the first level, which begins unlocked.
    pub fn new(levels: &[Level]) -> Self {
        let mut unlocked_levels = HashSet::new();
        if let Some(first) = levels.first() {
            unlocked_levels.insert(first.id.to_string());
        }
        Self {
            score: 0,
            level_index: 0,
            prompt_index: 0,
            unlocked_levels,
        }
    }

    /// The prompt the user should say next, or `None` past the end of
    /// content.
    pub fn current_prompt<'a>(&self, levels: &'a [Level]) -> Option<&'a str> {
        levels
            .get(self.level_index)
            .and_then(|l| l.prompts.get(self.prompt_index))
            .copied()
    }

    /// Apply a correctness verdict and advance accordingly.
    ///
    /// True: score increments and the position moves to the next prompt,
    /// rolling into the next level (unlocking it) when the current one is
    /// done; at the end of all content the position stays on the final
    /// prompt.  False: nothing changes.
    pub fn apply_verdict(&mut self, verdict: bool, levels: &[Level]) -> Advance {
        if !verdict {
            return Advance::Retry;
        }

        self.score += 1;

        let level = match levels.get(self.level_index) {
            Some(level) => level,
            None => return Advance::Finished,
        };

        if self.prompt_index + 1 < level.prompts.len() {
            self.prompt_index += 1;
            return Advance::NextPrompt;
        }

        if self.level_index + 1 < levels.len() {
            self.level_index += 1;
            self.prompt_index = 0;
            self.unlocked_levels
                .insert(levels[self.level_index].id.to_string());
            log::info!("progression: unlocked level {}", levels[self.level_index].id);
            return Advance::NextLevel;
        }

        Advance::Finished
    }

    /// Returns `true` when the level with `id` has been reached.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_levels.contains(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: &[Level] = &[
        Level {
            id: "one",
            name: "One",
            prompts: &["a", "b"],
        },
        Level {
            id: "two",
            name: "Two",
            prompts: &["c"],
        },
    ];

    #[test]
    fn starts_at_first_prompt_with_first_level_unlocked() {
        let state = ProgressionState::new(LEVELS);
        assert_eq!(state.score, 0);
        assert_eq!(state.current_prompt(LEVELS), Some("a"));
        assert!(state.is_unlocked("one"));
        assert!(!state.is_unlocked("two"));
    }

    #[test]
    fn false_verdict_changes_nothing() {
        let mut state = ProgressionState::new(LEVELS);
        let before = state.clone();
        assert_eq!(state.apply_verdict(false, LEVELS), Advance::Retry);
        assert_eq!(state, before);
    }

    #[test]
    fn true_verdict_advances_prompt_and_score() {
        let mut state = ProgressionState::new(LEVELS);
        assert_eq!(state.apply_verdict(true, LEVELS), Advance::NextPrompt);
        assert_eq!(state.score, 1);
        assert_eq!(state.current_prompt(LEVELS), Some("b"));
    }

    #[test]
    fn finishing_a_level_unlocks_and_enters_the_next() {
        let mut state = ProgressionState::new(LEVELS);
        state.apply_verdict(true, LEVELS); // a → b
        assert_eq!(state.apply_verdict(true, LEVELS), Advance::NextLevel);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.prompt_index, 0);
        assert_eq!(state.current_prompt(LEVELS), Some("c"));
        assert!(state.is_unlocked("two"));
    }

    #[test]
    fn passing_the_final_prompt_stays_put() {
        let mut state = ProgressionState::new(LEVELS);
        state.apply_verdict(true, LEVELS);
        state.apply_verdict(true, LEVELS);
        assert_eq!(state.apply_verdict(true, LEVELS), Advance::Finished);
        assert_eq!(state.score, 3);
        // Position remains on the final prompt; further passes keep counting.
        assert_eq!(state.current_prompt(LEVELS), Some("c"));
        assert_eq!(state.apply_verdict(true, LEVELS), Advance::Finished);
        assert_eq!(state.score, 4);
    }

    #[test]
    fn empty_level_table_is_harmless() {
        let mut state = ProgressionState::new(&[]);
        assert_eq!(state.current_prompt(&[]), None);
        assert_eq!(state.apply_verdict(true, &[]), Advance::Finished);
    }
}
