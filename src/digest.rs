//! The digest pipeline: enumerate users, collect their reactions, rank the
//! emoji and publish the result.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::collector::{ReactionCollector, ReactionEvent, UserScan};
use crate::config::DigestOptions;
use crate::model::User;
use crate::ranking::{FrequencyTable, RankedEmoji};
use crate::report::{format_digest, resolve_channel_id};
use crate::slack::SlackApi;
use crate::window::TimeWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    Posted,
    Failed(String),
    DryRun,
}

#[derive(Debug)]
pub struct DigestReport {
    pub users: usize,
    pub scans: Vec<UserScan>,
    pub ranked: Vec<RankedEmoji>,
    pub text: String,
    /// Empty when no channel matched the configured name
    pub channel_id: String,
    pub publication: Publication,
}

impl DigestReport {
    pub fn failed_scans(&self) -> usize {
        self.scans.iter().filter(|scan| scan.failed()).count()
    }
}

/// State of a single digest run.
pub struct DigestRun<'a, A: SlackApi + ?Sized> {
    api: &'a A,
    options: &'a DigestOptions,
    window: TimeWindow,
    events: Vec<ReactionEvent>,
    scans: Vec<UserScan>,
}

impl<'a, A: SlackApi + ?Sized> DigestRun<'a, A> {
    pub fn new(api: &'a A, options: &'a DigestOptions, started_at: DateTime<Utc>) -> Self {
        Self {
            api,
            options,
            window: TimeWindow::trailing(started_at, options.window_days),
            events: Vec::new(),
            scans: Vec::new(),
        }
    }

    pub fn execute(mut self) -> DigestReport {
        let users = self.enumerate_users();
        self.collect(&users);

        let table = FrequencyTable::from_events(&self.events, self.options.counting);
        let ranked = table.ranked();
        let text = format_digest(&ranked);
        info!(
            emoji = ranked.len(),
            reactions = self.events.len(),
            counting = ?self.options.counting,
            "ranked reactions"
        );

        let channel_id = self.resolve_channel();
        let publication = if self.options.dry_run {
            info!(channel = %self.options.channel, "dry run, not posting digest");
            Publication::DryRun
        } else {
            self.publish(&channel_id, &text)
        };

        DigestReport {
            users: users.len(),
            scans: self.scans,
            ranked,
            text,
            channel_id,
            publication,
        }
    }

    fn enumerate_users(&self) -> Vec<User> {
        match self.api.list_users() {
            Ok(users) => {
                info!(count = users.len(), "listed workspace members");
                users
            }
            Err(e) => {
                warn!("users.list failed, digest will be empty: {}", e);
                Vec::new()
            }
        }
    }

    fn collect(&mut self, users: &[User]) {
        info!(
            users = users.len(),
            cutoff = self.window.cutoff(),
            "collecting reactions"
        );
        let collector = ReactionCollector::new(self.api, self.window, self.options.max_pages);
        for user in users {
            let scan = collector.collect_user(user, &mut self.events);
            self.scans.push(scan);
        }
    }

    fn resolve_channel(&self) -> String {
        let channels = match self.api.list_channels() {
            Ok(channels) => channels,
            Err(e) => {
                warn!("conversations.list failed: {}", e);
                Vec::new()
            }
        };

        resolve_channel_id(&channels, &self.options.channel).unwrap_or_else(|| {
            warn!(channel = %self.options.channel, "no channel with that name, posting anyway");
            String::new()
        })
    }

    fn publish(&self, channel_id: &str, text: &str) -> Publication {
        match self.api.post_message(channel_id, text) {
            Ok(()) => {
                info!(channel = %self.options.channel, "posted digest");
                Publication::Posted
            }
            Err(e) => {
                warn!(channel = %self.options.channel, "failed to post digest: {}", e);
                Publication::Failed(e.to_string())
            }
        }
    }
}

/// Run the whole pipeline once with a window ending at `started_at`.
pub fn run_digest<A: SlackApi + ?Sized>(
    api: &A,
    options: &DigestOptions,
    started_at: DateTime<Utc>,
) -> DigestReport {
    DigestRun::new(api, options, started_at).execute()
}
