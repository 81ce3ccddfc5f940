//! Shared command plumbing: context open/finish and entity resolution.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use studyroom_core::storage::data_dir;
use studyroom_core::{
    Action, Config, Database, JsonDirRemote, RemoteStore, StatePersister, Store, StoreState,
    SyncDispatcher, SyncWorker, SystemClock, ValidationError, WriteQueue,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Everything a command needs: config, local store, persister, and the
/// remote mirror plumbing.
pub struct AppContext {
    pub config: Config,
    dispatcher: SyncDispatcher<SystemClock>,
    queue: Arc<Mutex<WriteQueue<SystemClock>>>,
    remote: Option<Arc<dyn RemoteStore>>,
    persister: StatePersister<SystemClock>,
}

impl AppContext {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        let state = match db.load_state()? {
            Some(state) => state,
            None => StoreState {
                settings: config.default_pomodoro_settings(),
                ..StoreState::default()
            },
        };

        let mut queue = WriteQueue::new(
            SystemClock,
            Duration::seconds(config.sync.debounce_secs as i64),
            config.sync.max_attempts,
        )
        .with_queue_file(data_dir()?.join("sync_queue.json"));
        queue.load()?;
        let queue = Arc::new(Mutex::new(queue));

        let remote: Option<Arc<dyn RemoteStore>> = if config.sync.enabled {
            let root = config
                .sync
                .remote_dir
                .clone()
                .map(PathBuf::from)
                .unwrap_or(data_dir()?.join("remote"));
            Some(Arc::new(JsonDirRemote::new(root)) as Arc<dyn RemoteStore>)
        } else {
            None
        };

        let persister = StatePersister::new(
            db,
            Duration::seconds(config.persistence.quiet_secs as i64),
            SystemClock,
        );

        Ok(Self {
            config,
            dispatcher: SyncDispatcher::new(Store::new(state), queue.clone()),
            queue,
            remote,
            persister,
        })
    }

    pub fn state(&self) -> &StoreState {
        self.dispatcher.state()
    }

    /// Apply an action locally and queue its remote mirror.
    pub fn dispatch(&mut self, action: Action) {
        self.dispatcher.dispatch(action);
        self.persister.mark_dirty();
    }

    /// Debounced persistence tick for long-running commands.
    pub fn maybe_flush(&mut self) -> Result<()> {
        self.persister.maybe_flush(self.dispatcher.state())?;
        Ok(())
    }

    /// Background sync worker for long-running commands.
    pub fn spawn_worker(&self) -> Option<tokio::task::JoinHandle<()>> {
        self.remote
            .as_ref()
            .map(|remote| SyncWorker::spawn(self.queue.clone(), remote.clone()))
    }

    /// Flush state and the outbound queue, then persist what remains.
    pub async fn finish(mut self) -> Result<()> {
        self.persister.flush(self.dispatcher.state())?;
        if let Some(remote) = &self.remote {
            SyncWorker::flush(&self.queue, remote.as_ref()).await;
        }
        self.queue
            .lock()
            .expect("queue lock poisoned")
            .persist()?;
        Ok(())
    }
}

/// Resolve a subject by exact id or unique name.
pub fn resolve_subject(state: &StoreState, ident: &str) -> Result<String> {
    if let Some(subject) = state.subject(ident) {
        return Ok(subject.id.clone());
    }
    let mut matches = state.subjects.iter().filter(|s| s.name == ident);
    match (matches.next(), matches.next()) {
        (Some(subject), None) => Ok(subject.id.clone()),
        (Some(_), Some(_)) => Err(Box::new(ValidationError::InvalidValue {
            field: "subject".into(),
            message: format!("name '{ident}' is ambiguous, use the id"),
        })),
        _ => Err(Box::new(ValidationError::NotFound {
            entity: "subject",
            id: ident.to_string(),
        })),
    }
}

/// Resolve a topic within a subject by exact id or unique name.
pub fn resolve_topic(state: &StoreState, subject_id: &str, ident: &str) -> Result<String> {
    let subject = state.subject(subject_id).ok_or(ValidationError::NotFound {
        entity: "subject",
        id: subject_id.to_string(),
    })?;
    if let Some(topic) = subject.topic(ident) {
        return Ok(topic.id.clone());
    }
    let mut matches = subject.topics.iter().filter(|t| t.name == ident);
    match (matches.next(), matches.next()) {
        (Some(topic), None) => Ok(topic.id.clone()),
        (Some(_), Some(_)) => Err(Box::new(ValidationError::InvalidValue {
            field: "topic".into(),
            message: format!("name '{ident}' is ambiguous, use the id"),
        })),
        _ => Err(Box::new(ValidationError::NotFound {
            entity: "topic",
            id: ident.to_string(),
        })),
    }
}

/// Positive-duration guard applied before any action is built.
pub fn require_positive(field: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(Box::new(ValidationError::InvalidValue {
            field: field.into(),
            message: "must be positive".into(),
        }));
    }
    Ok(value)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
