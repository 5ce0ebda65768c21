/// Position in a cursor-paginated Slack listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// No page requested yet; the first request carries no cursor.
    #[default]
    NotStarted,
    /// Token to send with the next request.
    Continuation(String),
    /// The last page has been read.
    Exhausted,
}

impl Cursor {
    /// Cursor following a page whose `next_cursor` was `next`.
    ///
    /// Slack signals the last page with an empty or missing `next_cursor`.
    pub fn after_page(next: Option<&str>) -> Self {
        match next {
            Some(token) if !token.is_empty() => Cursor::Continuation(token.to_string()),
            _ => Cursor::Exhausted,
        }
    }

    /// Value for the `cursor` query parameter, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Cursor::Continuation(token) => Some(token),
            Cursor::NotStarted | Cursor::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }
}
