use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::papers::SearchParameters;

pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

/// Everything one browser session keeps between actions.
///
/// `search_id` changes whenever a search starts; `revision` changes whenever
/// the questions the answers belong to may have changed. Actions that run
/// across I/O hold on to these and only write back if they still match.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub form: SearchParameters,
    pub question_set: String,
    pub answer_set: String,
    pub(crate) flash: Option<String>,
    pub(crate) search_id: u64,
    pub(crate) revision: u64,
}

impl SessionState {
    /// Starts a search cycle: answers belong to the previous questions and
    /// are dropped before anything else happens. Returns the ticket the
    /// search must present to store its questions.
    pub fn begin_search(&mut self, form: SearchParameters) -> u64 {
        self.answer_set.clear();
        self.form = form;
        self.search_id += 1;
        self.revision += 1;
        self.search_id
    }

    /// Same as [`SessionState::begin_search`] for a form that could not be
    /// parsed; the last good form stays selected.
    pub fn restart_search(&mut self) -> u64 {
        let form = self.form.clone();
        self.begin_search(form)
    }

    /// Stores the questions of search `search_id` unless a newer search has
    /// started since.
    pub fn complete_search(&mut self, search_id: u64, questions: String) -> bool {
        if search_id != self.search_id {
            return false;
        }
        self.question_set = questions;
        self.answer_set.clear();
        self.revision += 1;
        true
    }

    /// The stored questions and the revision they were read at.
    pub fn answer_ticket(&self) -> Option<(u64, String)> {
        if self.has_questions() {
            Some((self.revision, self.question_set.clone()))
        } else {
            None
        }
    }

    /// Stores answers generated from the questions seen at `revision`.
    pub fn complete_answers(&mut self, revision: u64, answers: String) -> bool {
        if revision != self.revision {
            return false;
        }
        self.answer_set = answers;
        true
    }

    pub fn has_questions(&self) -> bool {
        !self.question_set.is_empty()
    }

    #[cfg(test)]
    pub fn has_answers(&self) -> bool {
        !self.answer_set.is_empty()
    }

    /// One-shot message shown on the next page render.
    pub fn set_flash(&mut self, message: String) {
        self.flash = Some(message);
    }

    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

/// Sessions keyed by cookie id. Least recently used sessions are evicted
/// once `capacity` is reached.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<String, SessionState>>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Snapshot of a session; unknown ids start from the defaults.
    pub async fn get(&self, id: &str) -> SessionState {
        self.sessions
            .lock()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub async fn put(&self, id: String, state: SessionState) {
        self.sessions.lock().await.put(id, state);
    }

    /// Applies `f` to the stored session without copying it out.
    pub async fn update<F, R>(&self, id: &str, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut sessions = self.sessions.lock().await;
        let state = sessions.get_or_insert_mut(id.to_string(), SessionState::default);
        f(state)
    }
}
