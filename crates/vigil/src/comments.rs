// File: src/comments.rs
// Purpose: Comment store and the comment board controller

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::CommentError;
use crate::flight::{Flight, FlightHandle};
use crate::identity::{relative_label, Clock, IdSource, SystemClock, UuidIds};
use crate::notify::{Notification, NotificationSink};
use crate::simulator::{Operation, Receipt, Submitter};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shortest comment accepted, counted on the untrimmed text
pub const MIN_COMMENT_LENGTH: usize = 10;

/// Longest comment accepted
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Past this many characters the counter is shown as a warning
pub const NEAR_LIMIT_LENGTH: usize = 900;

/// Author label given to comments posted from the board
pub const DEFAULT_AUTHOR: &str = "Anonymous User";

const JUST_NOW: &str = "Just now";

/// A posted comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    /// Age label captured when the comment was created
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    #[serde(default)]
    pub verified: bool,
}

impl Comment {
    /// Up to two upper-case initials of the author, for the avatar
    pub fn initials(&self) -> String {
        self.author
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    /// Age label relative to `now`
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        relative_label(self.created_at, now)
    }
}

/// Ordered comments, newest first
pub struct CommentStore {
    comments: Vec<Comment>,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self {
            comments: Vec::new(),
            ids: Arc::new(UuidIds),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the contents with the four fixture comments
    pub fn seeded(mut self) -> Self {
        let now = self.clock.now();
        let fixture = |id: &str, author: &str, content: &str, age: Duration, likes: u32, verified: bool| {
            let created_at = now - age;
            Comment {
                id: id.to_string(),
                author: author.to_string(),
                content: content.to_string(),
                timestamp: relative_label(created_at, now),
                created_at,
                likes,
                verified,
            }
        };

        self.comments = vec![
            fixture(
                "1",
                "Dr. Sarah Johnson",
                "Thank you for providing such comprehensive information about COVID-19 safety measures. This resource has been invaluable for educating my patients.",
                Duration::hours(2),
                24,
                true,
            ),
            fixture(
                "2",
                "Mike Chen",
                "The testing center locator helped me find a convenient location near my workplace. Got tested quickly and received results within 24 hours!",
                Duration::hours(5),
                12,
                false,
            ),
            fixture(
                "3",
                "Jennifer Martinez",
                "Great resource for staying updated on vaccination information. The guidelines are clear and easy to understand.",
                Duration::days(1),
                8,
                false,
            ),
            fixture(
                "4",
                "Robert Kim",
                "The prevention tips section is particularly helpful. I've shared this website with my family and colleagues.",
                Duration::days(2),
                15,
                false,
            ),
        ];
        self
    }

    /// Check a comment before it is posted
    ///
    /// Emptiness is judged on the trimmed text but the minimum length on the
    /// raw text, so padding counts towards the ten characters.
    pub fn validate(content: &str) -> Result<(), CommentError> {
        if content.trim().is_empty() {
            return Err(CommentError::Empty);
        }

        let length = content.chars().count();
        if length < MIN_COMMENT_LENGTH {
            return Err(CommentError::TooShort {
                min: MIN_COMMENT_LENGTH,
            });
        }
        if length > MAX_COMMENT_LENGTH {
            return Err(CommentError::TooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }
        Ok(())
    }

    /// Validate and prepend a new comment
    pub fn add(&mut self, content: &str, author: &str) -> Result<&Comment, CommentError> {
        Self::validate(content)?;
        Ok(self.insert(content, author))
    }

    fn insert(&mut self, content: &str, author: &str) -> &Comment {
        let comment = Comment {
            id: self.ids.next_id(),
            author: author.to_string(),
            content: content.to_string(),
            timestamp: JUST_NOW.to_string(),
            created_at: self.clock.now(),
            likes: 0,
            verified: false,
        };
        tracing::info!(comment = %comment.id, author = %comment.author, "comment added");

        self.comments.insert(0, comment);
        &self.comments[0]
    }

    /// Add one like to a comment
    ///
    /// Repeat likes are all counted. Returns the new count, or `None` if no
    /// comment has that id.
    pub fn like(&mut self, id: &str) -> Option<u32> {
        let comment = self.comments.iter_mut().find(|comment| comment.id == id)?;
        comment.likes = comment.likes.saturating_add(1);
        tracing::debug!(comment = %id, likes = comment.likes, "comment liked");
        Some(comment.likes)
    }

    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Text being typed into the comment box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    text: String,
}

impl CommentDraft {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Characters typed so far
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters left before the limit
    pub fn remaining(&self) -> usize {
        MAX_COMMENT_LENGTH.saturating_sub(self.len())
    }

    pub fn near_limit(&self) -> bool {
        self.len() > NEAR_LIMIT_LENGTH
    }
}

/// A comment post handed to the submitter
///
/// Dropping it before it resolves gives up the post and re-enables the
/// board.
pub struct PendingComment {
    id: String,
    content: String,
    future: BoxFuture<'static, Receipt>,
    handle: FlightHandle,
}

impl PendingComment {
    /// Token identifying this post in the payload
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub async fn wait(mut self) -> PostedComment {
        let receipt = (&mut self.future).await;
        self.handle.complete();
        PostedComment { receipt }
    }
}

impl std::fmt::Debug for PendingComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingComment")
            .field("id", &self.id)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// A resolved comment post, ready to be handed back to its board
#[derive(Debug, Clone, PartialEq)]
pub struct PostedComment {
    receipt: Receipt,
}

impl PostedComment {
    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }
}

/// The post a board is waiting on, with the content that passed validation
struct OutstandingPost {
    flight: Flight,
    content: String,
}

/// Result of calling [`CommentBoard::submit`]
#[derive(Debug)]
pub enum CommentAttempt {
    Started(PendingComment),
    Rejected(CommentError),
    Busy,
}

/// Result of [`CommentBoard::post_and_wait`]
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    Posted(Comment),
    Rejected(CommentError),
    Busy,
}

/// Controller for the comment form and the list beneath it
pub struct CommentBoard {
    store: CommentStore,
    draft: CommentDraft,
    outstanding: Option<OutstandingPost>,
    author: String,
    submitter: Arc<dyn Submitter>,
    sink: Arc<dyn NotificationSink>,
    ids: Arc<dyn IdSource>,
}

impl CommentBoard {
    pub fn new(store: CommentStore, submitter: Arc<dyn Submitter>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            draft: CommentDraft::default(),
            outstanding: None,
            author: DEFAULT_AUTHOR.to_string(),
            submitter,
            sink,
            ids: Arc::new(UuidIds),
        }
    }

    /// Replace the generator of post tokens
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Label attached to comments posted from this board
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    pub fn comments(&self) -> &[Comment] {
        self.store.comments()
    }

    pub fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.outstanding
            .as_ref()
            .is_some_and(|outstanding| !outstanding.flight.is_abandoned())
    }

    /// Whether the post button should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.draft.len() >= MIN_COMMENT_LENGTH
    }

    /// Validate the draft and, if it passes, hand it to the submitter
    pub fn submit(&mut self) -> CommentAttempt {
        self.settle();
        if self.outstanding.is_some() {
            tracing::debug!("comment submit ignored while a post is outstanding");
            return CommentAttempt::Busy;
        }

        let content = self.draft.text.clone();
        if let Err(err) = CommentStore::validate(&content) {
            self.sink
                .notify(Notification::destructive(err.title(), err.to_string()));
            return CommentAttempt::Rejected(err);
        }

        let id = self.ids.next_id();
        let (flight, handle) = Flight::start(id.clone());
        self.outstanding = Some(OutstandingPost {
            flight,
            content: content.clone(),
        });

        let payload = json!({
            "submission_id": id,
            "author": self.author,
            "content": content,
        });
        let submitter = Arc::clone(&self.submitter);
        tracing::info!(submission = %id, submitter = submitter.name(), length = self.draft.len(), "posting comment");

        let future: BoxFuture<'static, Receipt> =
            Box::pin(async move { submitter.submit(Operation::PostComment, payload).await });

        CommentAttempt::Started(PendingComment {
            id,
            content,
            future,
            handle,
        })
    }

    /// Add a resolved post to the store and reset the form
    ///
    /// The stored content is the text validated by `submit`. Returns the new
    /// comment, or `None` (changing nothing) unless `posted` resolves the
    /// post this board has outstanding.
    pub fn resolve(&mut self, posted: PostedComment) -> Option<&Comment> {
        self.settle();
        let Some(outstanding) = &self.outstanding else {
            tracing::warn!(receipt = %posted.receipt.id, "resolve called with no comment post outstanding");
            return None;
        };
        if posted.receipt.operation != Operation::PostComment {
            tracing::warn!(operation = %posted.receipt.operation, "receipt is not for a comment post");
            return None;
        }
        if !outstanding.flight.issued(&posted.receipt) {
            tracing::warn!(
                submission = %outstanding.flight.id(),
                receipt = %posted.receipt.id,
                "receipt belongs to a different comment post"
            );
            return None;
        }

        let outstanding = self.outstanding.take()?;
        self.draft = CommentDraft::default();

        let comment = self.store.insert(&outstanding.content, &self.author);
        self.sink.notify(Notification::success(
            "Comment Posted",
            "Your comment has been successfully posted!",
        ));
        Some(comment)
    }

    /// Submit the draft, wait for the submitter and resolve
    pub async fn post_and_wait(&mut self) -> PostOutcome {
        match self.submit() {
            CommentAttempt::Started(pending) => {
                let posted = pending.wait().await;
                match self.resolve(posted) {
                    Some(comment) => PostOutcome::Posted(comment.clone()),
                    None => PostOutcome::Busy,
                }
            }
            CommentAttempt::Rejected(err) => PostOutcome::Rejected(err),
            CommentAttempt::Busy => PostOutcome::Busy,
        }
    }

    pub fn like(&mut self, id: &str) -> Option<u32> {
        self.store.like(id)
    }

    /// Forget a post whose pending value was dropped unresolved
    fn settle(&mut self) {
        let abandoned = self
            .outstanding
            .as_ref()
            .is_some_and(|outstanding| outstanding.flight.is_abandoned());
        if !abandoned {
            return;
        }
        if let Some(outstanding) = self.outstanding.take() {
            tracing::warn!(submission = %outstanding.flight.id(), "comment post dropped before it resolved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{FixedClock, SequentialIds};
    use crate::notify::{MemorySink, Severity};
    use crate::simulator::{SubmissionDelays, SubmissionSimulator};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn store() -> CommentStore {
        CommentStore::new().with_ids(Arc::new(SequentialIds::new("c")))
    }

    #[rstest]
    #[case::empty("", CommentError::Empty)]
    #[case::whitespace_only("            ", CommentError::Empty)]
    #[case::short("short", CommentError::TooShort { min: 10 })]
    #[case::nine_chars("123456789", CommentError::TooShort { min: 10 })]
    fn test_validate_rejects(#[case] content: &str, #[case] expected: CommentError) {
        assert_eq!(CommentStore::validate(content), Err(expected));
    }

    #[test]
    fn test_validate_length_bounds() {
        assert_eq!(CommentStore::validate("1234567890"), Ok(()));
        assert_eq!(CommentStore::validate(&"x".repeat(1000)), Ok(()));
        assert_eq!(
            CommentStore::validate(&"x".repeat(1001)),
            Err(CommentError::TooLong { max: 1000 })
        );
    }

    #[test]
    fn test_padding_counts_towards_minimum_length() {
        // one visible character, ten raw characters
        assert_eq!(CommentStore::validate("    a     "), Ok(()));
    }

    #[test]
    fn test_add_prepends() {
        let mut store = store().seeded();
        assert_eq!(store.len(), 4);

        let added = store.add("1234567890", DEFAULT_AUTHOR).unwrap().clone();
        assert_eq!(added.id, "c-1");
        assert_eq!(added.timestamp, "Just now");
        assert_eq!(added.likes, 0);
        assert!(!added.verified);

        assert_eq!(store.len(), 5);
        assert_eq!(store.comments()[0], added);
        assert_eq!(store.comments()[1].id, "1");
    }

    #[test]
    fn test_add_rejects_short_comment_without_change() {
        let mut store = store().seeded();
        assert_eq!(
            store.add("short", DEFAULT_AUTHOR).unwrap_err(),
            CommentError::TooShort { min: 10 }
        );
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_like_increments_and_repeats() {
        let mut store = store().seeded();
        assert_eq!(store.like("2"), Some(13));
        assert_eq!(store.like("2"), Some(14));
        assert_eq!(store.get("2").unwrap().likes, 14);
    }

    #[test]
    fn test_like_unknown_id_is_noop() {
        let mut store = store().seeded();
        let before = store.comments().to_vec();
        assert_eq!(store.like("missing"), None);
        assert_eq!(store.comments(), before.as_slice());
    }

    #[test]
    fn test_seed_fixtures() {
        let now = Utc::now();
        let store = CommentStore::new().with_clock(Arc::new(FixedClock(now))).seeded();

        let labels: Vec<&str> = store.comments().iter().map(|c| c.timestamp.as_str()).collect();
        assert_eq!(labels, vec!["2 hours ago", "5 hours ago", "1 day ago", "2 days ago"]);

        let verified: Vec<&str> = store
            .comments()
            .iter()
            .filter(|c| c.verified)
            .map(|c| c.author.as_str())
            .collect();
        assert_eq!(verified, vec!["Dr. Sarah Johnson"]);
        assert_eq!(store.comments()[0].likes, 24);
    }

    #[test]
    fn test_initials() {
        let store = store().seeded();
        assert_eq!(store.comments()[0].initials(), "DS");
        assert_eq!(store.comments()[1].initials(), "MC");
    }

    #[test]
    fn test_draft_counter() {
        let mut draft = CommentDraft::default();
        assert_eq!(draft.remaining(), 1000);
        draft.text = "y".repeat(901);
        assert!(draft.near_limit());
        assert_eq!(draft.remaining(), 99);
    }

    #[tokio::test]
    async fn test_board_rejection_notifies() {
        let sink = Arc::new(MemorySink::new());
        let submitter = Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()));
        let mut board = CommentBoard::new(store(), submitter, sink.clone());

        board.set_draft("   ");
        assert!(matches!(board.submit(), CommentAttempt::Rejected(CommentError::Empty)));

        let notification = sink.last().unwrap();
        assert_eq!(notification.title, "Comment Required");
        assert_eq!(notification.message, "Please enter a comment before submitting.");
        assert_eq!(notification.severity, Severity::Destructive);
        assert!(!board.is_submitting());
    }

    #[tokio::test]
    async fn test_board_post_clears_draft() {
        let sink = Arc::new(MemorySink::new());
        let submitter = Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()));
        let mut board = CommentBoard::new(store().seeded(), submitter, sink.clone());

        board.set_draft("Testing was quick and easy.");
        assert!(board.can_submit());

        let comment = match board.post_and_wait().await {
            PostOutcome::Posted(comment) => comment,
            other => panic!("expected the comment to be posted, got {:?}", other),
        };
        assert_eq!(comment.author, DEFAULT_AUTHOR);
        assert_eq!(board.comments()[0].id, comment.id);
        assert!(board.draft().is_empty());
        assert!(!board.is_submitting());
        assert_eq!(sink.last().unwrap().title, "Comment Posted");
    }

    fn started(attempt: CommentAttempt) -> PendingComment {
        match attempt {
            CommentAttempt::Started(pending) => pending,
            other => panic!("expected the post to start, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dropped_post_re_enables_board() {
        let sink = Arc::new(MemorySink::new());
        let submitter = Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()));
        let mut board = CommentBoard::new(store().seeded(), submitter, sink.clone())
            .with_ids(Arc::new(SequentialIds::new("post")));

        board.set_draft("Masks are still available at the clinic.");
        let pending = started(board.submit());
        assert_eq!(pending.id(), "post-1");
        assert!(!board.can_submit());

        drop(pending);
        assert!(!board.is_submitting());
        assert!(board.can_submit());
        assert_eq!(board.draft().as_str(), "Masks are still available at the clinic.");

        let pending = started(board.submit());
        assert_eq!(pending.id(), "post-2");
        let posted = pending.wait().await;
        assert!(board.resolve(posted).is_some());
        assert_eq!(board.comments().len(), 5);
    }

    #[tokio::test]
    async fn test_resolve_stores_validated_content_only() {
        let sink = Arc::new(MemorySink::new());
        let submitter = Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()));
        let mut board = CommentBoard::new(store(), submitter.clone(), sink.clone())
            .with_ids(Arc::new(SequentialIds::new("post")));

        board.set_draft("Booster clinic opens Monday.");
        let pending = started(board.submit());

        // a receipt for another operation, carrying content that never passed validation
        let login = PostedComment {
            receipt: submitter
                .submit(Operation::Login, json!({ "submission_id": "post-1", "content": "" }))
                .await,
        };
        assert!(board.resolve(login).is_none());

        let forged = PostedComment {
            receipt: submitter
                .submit(Operation::PostComment, json!({ "submission_id": "post-1", "content": "" }))
                .await,
        };
        let stored = board.resolve(forged).unwrap().clone();
        assert_eq!(stored.content, "Booster clinic opens Monday.");

        // the real receipt arrives after the post was already resolved
        assert!(board.resolve(pending.wait().await).is_none());
        assert_eq!(board.comments().len(), 1);
    }
}
