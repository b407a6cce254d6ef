//! Practice content: age cohorts and their level/prompt tables.
//!
//! A level is an ordered sequence of prompts; each cohort has its own
//! ordered level list.  Content is compiled in — the tables below mirror the
//! practice sets the therapists curated for each age band.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AgeCohort
// ---------------------------------------------------------------------------

/// The three age bands the product serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeCohort {
    Kids,
    Teens,
    Adults,
}

impl AgeCohort {
    /// Representative age sent to the feedback service for tone selection.
    pub fn representative_age(&self) -> u8 {
        match self {
            AgeCohort::Kids => 7,
            AgeCohort::Teens => 14,
            AgeCohort::Adults => 30,
        }
    }

    /// The ordered level table for this cohort.
    pub fn levels(&self) -> &'static [Level] {
        match self {
            AgeCohort::Kids => KIDS_LEVELS,
            AgeCohort::Teens => TEENS_LEVELS,
            AgeCohort::Adults => ADULTS_LEVELS,
        }
    }
}

impl Default for AgeCohort {
    fn default() -> Self {
        AgeCohort::Kids
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// One practice level: an identifier, a display name, and ordered prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Stable identifier, used in the unlocked-level set.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Prompts the user is asked to say, in order.
    pub prompts: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Content tables
// ---------------------------------------------------------------------------

pub const KIDS_LEVELS: &[Level] = &[
    Level {
        id: "kids-sounds",
        name: "First Sounds",
        prompts: &["ba", "da", "ma", "pa"],
    },
    Level {
        id: "kids-animals",
        name: "Animal Friends",
        prompts: &["cat", "dog", "fish", "bird", "rabbit"],
    },
    Level {
        id: "kids-food",
        name: "Snack Time",
        prompts: &["banana", "apple", "cookie", "water"],
    },
    Level {
        id: "kids-phrases",
        name: "Little Phrases",
        prompts: &["big red ball", "i like cats", "more juice please"],
    },
];

pub const TEENS_LEVELS: &[Level] = &[
    Level {
        id: "teens-words",
        name: "Everyday Words",
        prompts: &["school", "friends", "music", "weekend"],
    },
    Level {
        id: "teens-clusters",
        name: "Tricky Clusters",
        prompts: &["strength", "squirrel", "thirteenth", "crisps"],
    },
    Level {
        id: "teens-sentences",
        name: "Full Sentences",
        prompts: &[
            "can i borrow your charger",
            "we should practice after class",
            "the match starts at seven",
        ],
    },
];

pub const ADULTS_LEVELS: &[Level] = &[
    Level {
        id: "adults-words",
        name: "Clear Speech",
        prompts: &["particular", "communication", "responsibility", "appointment"],
    },
    Level {
        id: "adults-work",
        name: "At Work",
        prompts: &[
            "let me summarize the main points",
            "could you repeat the question",
            "i will follow up by email",
        ],
    },
    Level {
        id: "adults-fluency",
        name: "Fluency Practice",
        prompts: &[
            "thank you for your patience",
            "the quarterly figures look promising",
            "please schedule a meeting for thursday",
        ],
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
