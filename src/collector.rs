//! Per-user scan of `reactions.list`.
//!
//! A scan walks one user's cursor chain and keeps the reactions that user
//! applied to messages inside the time window. Each message is taken into
//! account once per user even when overlapping pages return it again.

use std::collections::HashSet;

use tracing::{debug, info, trace, warn};

use crate::cursor::Cursor;
use crate::model::{Message, ReactedItem, User};
use crate::slack::SlackApi;
use crate::window::TimeWindow;

pub const DEFAULT_MAX_PAGES: usize = 200;

/// A reaction the scanned user applied to an in-window message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub emoji_name: String,
    pub reactor_user_ids: HashSet<String>,
    pub reported_count: u64,
    pub message_id: String,
    pub message_ts: String,
}

/// Message identifiers already processed while scanning one user.
#[derive(Debug, Default)]
pub struct SeenMessageSet {
    ids: HashSet<String>,
}

impl SeenMessageSet {
    /// Records `id`; returns `false` if it was already present.
    pub fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// How a user scan came to an end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEnd {
    /// The cursor chain ran out.
    Exhausted,
    /// The page cap was reached with pages still pending.
    PageLimit,
    /// A request failed; the pages read so far still count.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScan {
    pub user_id: String,
    pub pages: usize,
    pub messages: usize,
    pub reactions: usize,
    pub end: ScanEnd,
}

impl UserScan {
    pub fn failed(&self) -> bool {
        matches!(self.end, ScanEnd::Failed(_))
    }
}

pub struct ReactionCollector<'a, A: SlackApi + ?Sized> {
    api: &'a A,
    window: TimeWindow,
    max_pages: usize,
}

impl<'a, A: SlackApi + ?Sized> ReactionCollector<'a, A> {
    pub fn new(api: &'a A, window: TimeWindow, max_pages: usize) -> Self {
        Self {
            api,
            window,
            max_pages: max_pages.max(1),
        }
    }

    /// Scan every page of `user`'s reactions, appending kept reactions to `events`.
    ///
    /// Failures end this user's scan and are reported in the returned summary.
    /// The client reports a Slack `ok: false` page as an error.
    pub fn collect_user(&self, user: &User, events: &mut Vec<ReactionEvent>) -> UserScan {
        let mut seen = SeenMessageSet::default();
        let mut cursor = Cursor::NotStarted;
        let mut scan = UserScan {
            user_id: user.id.clone(),
            pages: 0,
            messages: 0,
            reactions: 0,
            end: ScanEnd::PageLimit,
        };

        while scan.pages < self.max_pages {
            let page = match self.api.list_reactions(&user.id, &cursor) {
                Ok(page) => page,
                Err(e) => {
                    warn!(user = %user.id, page = scan.pages + 1, "reactions.list failed: {}", e);
                    scan.end = ScanEnd::Failed(e.to_string());
                    return scan;
                }
            };
            scan.pages += 1;

            let kept = absorb_items(&user.id, &page.items, &self.window, &mut seen, events);
            scan.messages = seen.len();
            scan.reactions += kept;
            debug!(
                user = %user.id,
                page = scan.pages,
                items = page.items.len(),
                kept,
                "processed reactions page"
            );

            cursor = Cursor::after_page(page.next_cursor());
            if cursor.is_exhausted() {
                scan.end = ScanEnd::Exhausted;
                break;
            }
        }

        if scan.end == ScanEnd::PageLimit {
            warn!(user = %user.id, max_pages = self.max_pages, "stopped scan at page limit");
        }

        info!(
            user = %user.id,
            name = %user.name,
            pages = scan.pages,
            messages = scan.messages,
            reactions = scan.reactions,
            "scanned user reactions"
        );
        scan
    }
}

/// Fold one page of items into `events`, returning how many reactions were kept.
///
/// File items are skipped: their reactions are already counted on the
/// message that shares the file.
fn absorb_items(
    user_id: &str,
    items: &[ReactedItem],
    window: &TimeWindow,
    seen: &mut SeenMessageSet,
    events: &mut Vec<ReactionEvent>,
) -> usize {
    let mut kept = 0;

    for item in items {
        let ReactedItem::Message { channel, message } = item else {
            continue;
        };

        if !window.contains_ts(&message.ts) {
            continue;
        }

        let message_id = message_key(channel, message);
        if !seen.insert(message_id.clone()) {
            continue;
        }

        for reaction in &message.reactions {
            if !reaction.has_reactor(user_id) {
                continue;
            }
            let event = ReactionEvent {
                emoji_name: reaction.name.clone(),
                reactor_user_ids: reaction.users.iter().cloned().collect(),
                reported_count: reaction.count,
                message_id: message_id.clone(),
                message_ts: message.ts.clone(),
            };
            trace!(
                user = %user_id,
                emoji = %event.emoji_name,
                message = %event.message_id,
                ts = %event.message_ts,
                "kept reaction"
            );
            events.push(event);
            kept += 1;
        }
    }

    kept
}

/// Identifier used to recognise a message across pages.
///
/// Bot and integration messages carry no `client_msg_id`; channel and `ts`
/// identify them instead.
fn message_key(channel: &str, message: &Message) -> String {
    match message.client_msg_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}:{}", channel, message.ts),
    }
}
