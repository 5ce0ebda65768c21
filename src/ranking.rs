use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::collector::ReactionEvent;

/// How a collected reaction contributes to its emoji's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountingStrategy {
    /// One per qualifying reaction event, i.e. per user who applied it
    #[default]
    PerReaction,
    /// The `count` Slack reports on the reaction, taken once per message
    /// and emoji however many scanned users applied it
    ReportedCount,
}

impl CountingStrategy {
    fn weight(self, event: &ReactionEvent) -> u64 {
        match self {
            CountingStrategy::PerReaction => 1,
            CountingStrategy::ReportedCount => event.reported_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEmoji {
    pub emoji_name: String,
    pub count: u64,
}

/// Emoji name to count, remembering first-seen order.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: Vec<RankedEmoji>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: &[ReactionEvent], strategy: CountingStrategy) -> Self {
        let mut table = Self::new();
        // (message, emoji) pairs already summed in reported-count mode
        let mut summed: HashSet<(&str, &str)> = HashSet::new();
        for event in events {
            if strategy == CountingStrategy::ReportedCount
                && !summed.insert((event.message_id.as_str(), event.emoji_name.as_str()))
            {
                continue;
            }
            table.add(&event.emoji_name, strategy.weight(event));
        }
        table
    }

    pub fn add(&mut self, emoji_name: &str, amount: u64) {
        if let Some(entry) = self
            .index
            .get(emoji_name)
            .and_then(|&pos| self.counts.get_mut(pos))
        {
            entry.count += amount;
            return;
        }

        self.index.insert(emoji_name.to_string(), self.counts.len());
        self.counts.push(RankedEmoji {
            emoji_name: emoji_name.to_string(),
            count: amount,
        });
    }

    pub fn get(&self, emoji_name: &str) -> u64 {
        self.index
            .get(emoji_name)
            .and_then(|&pos| self.counts.get(pos))
            .map_or(0, |entry| entry.count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries by descending count.
    ///
    /// Ties keep first-seen order, but callers should only rely on higher
    /// counts preceding lower ones.
    pub fn ranked(&self) -> Vec<RankedEmoji> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}
