pub mod auth;
pub mod comments;
pub mod demo;
pub mod validate;

use std::sync::Arc;

use vigil::{
    CommentBoard, CommentStore, Config, FormController, MemorySink, SubmissionDelays,
    SubmissionSimulator, TeeSink, TracingSink,
};

/// Shared wiring for every command
pub struct App {
    pub config: Config,
    /// Notifications not yet printed
    pub inbox: Arc<MemorySink>,
    sink: Arc<TeeSink>,
    submitter: Arc<SubmissionSimulator>,
}

impl App {
    pub fn new(config: Config, delays: SubmissionDelays) -> Self {
        let inbox = Arc::new(MemorySink::new());
        let sink = Arc::new(
            TeeSink::new()
                .with(Arc::new(TracingSink))
                .with(inbox.clone()),
        );

        Self {
            config,
            inbox,
            sink,
            submitter: Arc::new(SubmissionSimulator::with_delays(delays)),
        }
    }

    pub fn login_form(&self) -> FormController {
        FormController::login(self.submitter.clone(), self.sink.clone())
    }

    pub fn register_form(&self) -> FormController {
        FormController::register(self.submitter.clone(), self.sink.clone())
    }

    pub fn comment_board(&self) -> CommentBoard {
        let store = if self.config.comments.seed {
            CommentStore::new().seeded()
        } else {
            CommentStore::new()
        };
        CommentBoard::new(store, self.submitter.clone(), self.sink.clone())
            .with_author(self.config.comments.author.clone())
    }
}
