use crate::model::Channel;
use crate::ranking::RankedEmoji;

/// Slack message text: one `:name: : count` line per ranked emoji.
pub fn format_digest(ranked: &[RankedEmoji]) -> String {
    ranked
        .iter()
        .map(|entry| format!(":{}: : {}", entry.emoji_name, entry.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Console rendering of the digest, with the glyph of each standard emoji.
///
/// Custom workspace emoji have no Unicode glyph and keep only the shortcode.
pub fn preview_digest(ranked: &[RankedEmoji]) -> String {
    ranked
        .iter()
        .map(|entry| match emojis::get_by_shortcode(&entry.emoji_name) {
            Some(emoji) => format!("{} :{}: : {}", emoji.as_str(), entry.emoji_name, entry.count),
            None => format!(":{}: : {}", entry.emoji_name, entry.count),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// ID of the channel named exactly `name`, if any.
///
/// The match is case sensitive; when several channels share the name the
/// last one listed wins.
pub fn resolve_channel_id(channels: &[Channel], name: &str) -> Option<String> {
    channels
        .iter()
        .rev()
        .find(|channel| channel.name == name)
        .map(|channel| channel.id.clone())
}
