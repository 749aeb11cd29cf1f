//! This module provides the task store: the ordered task collection, mirrored to a persistence medium
//!
//! The whole collection is written back after every mutation. Persistence is best-effort: failures are logged
//! (and reported on the optional [feedback channel](feedback::feedback_channel)), but they never prevent the
//! in-memory collection from being used.

use std::error::Error;

use crate::config;
use crate::draft::TaskDraft;
use crate::error::TaskError;
use crate::task::{Task, TaskPatch};
use crate::traits::{KeyValueStore, SeedSource};
use crate::validation::validate;

pub mod feedback;
use feedback::{FeedbackSender, StoreEvent};


/// The ordered collection of tasks, together with the storage it is persisted into
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    feedback_channel: Option<FeedbackSender>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Create an empty store, that will save to the [default key](crate::config::STORAGE_KEY) of `storage`.
    ///
    /// This does not read anything from `storage`. See [`TaskStore::load`] for this.
    pub fn new(storage: S) -> Self {
        Self::new_with_key(storage, config::storage_key())
    }

    /// Create an empty store, that will save to `key` in `storage`
    pub fn new_with_key(storage: S, key: String) -> Self {
        Self {
            storage,
            key,
            tasks: Vec::new(),
            feedback_channel: None,
        }
    }

    /// Create a store from the collection saved under the [default key](crate::config::STORAGE_KEY) of `storage`.
    ///
    /// Missing or corrupt data yields an empty store (see [`TaskStore::reload`])
    pub fn load(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.reload();
        store
    }

    /// Create a store from the collection saved under `key` in `storage`
    pub fn load_with_key(storage: S, key: String) -> Self {
        let mut store = Self::new_with_key(storage, key);
        store.reload();
        store
    }

    /// Replace the in-memory collection with the one from storage.
    ///
    /// This never fails: in case the stored data is unreadable, malformed, or holds a task that does not pass
    /// validation, this is logged and the store becomes empty.
    pub fn reload(&mut self) {
        self.tasks = match read_collection(&self.storage, &self.key) {
            Ok(tasks) => {
                log::debug!("Loaded {} tasks from key {:?}", tasks.len(), self.key);
                tasks
            },
            Err(err) => {
                log::warn!("Invalid stored tasks ({}). Starting with an empty list", err);
                Vec::new()
            },
        };
    }

    /// Every [`StoreEvent`] will be sent to this channel from now on
    pub fn set_feedback_channel(&mut self, sender: FeedbackSender) {
        self.feedback_channel = Some(sender);
    }

    pub fn tasks(&self) -> &[Task]    { &self.tasks }
    pub fn len(&self) -> usize        { self.tasks.len() }
    pub fn is_empty(&self) -> bool    { self.tasks.is_empty() }
    pub fn key(&self) -> &str         { &self.key }
    pub fn storage(&self) -> &S       { &self.storage }
    pub fn storage_mut(&mut self) -> &mut S { &mut self.storage }

    /// Returns the task at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Returns the task at `index`, or an error if there is none
    pub fn get_checked(&self, index: usize) -> Result<&Task, TaskError> {
        self.tasks.get(index)
            .ok_or(TaskError::IndexOutOfRange{ index, len: self.tasks.len() })
    }

    /// Add a task at the end of the list, and save.
    ///
    /// A task that does not pass validation is rejected, and the store is left untouched
    pub fn append(&mut self, task: Task) -> Result<(), TaskError> {
        check_task(&task)?;
        log::debug!("Adding task {:?}", task.title());
        self.tasks.push(task);
        self.save();
        Ok(())
    }

    /// Merge the fields present in `patch` into the task at `index`, and save.
    ///
    /// In case the patched task would not pass validation, it is rejected and the store is left untouched
    pub fn replace_at(&mut self, index: usize, patch: TaskPatch) -> Result<&Task, TaskError> {
        let mut patched = self.get_checked(index)?.clone();
        patched.apply(patch);
        check_task(&patched)?;

        log::debug!("Updating task #{} ({:?})", index, patched.title());
        self.tasks[index] = patched;
        self.save();
        self.get_checked(index)
    }

    /// Remove the task at `index`, and save
    pub fn remove_at(&mut self, index: usize) -> Result<Task, TaskError> {
        if index >= self.tasks.len() {
            return Err(TaskError::IndexOutOfRange{ index, len: self.tasks.len() });
        }
        let removed = self.tasks.remove(index);
        log::debug!("Removed task #{} ({:?})", index, removed.title());
        self.save();
        Ok(removed)
    }

    /// Returns the tasks whose title, description, author or category contains `term` (case-insensitive),
    /// along with their index in the whole collection. Matches keep their relative order.
    ///
    /// An empty term matches every task.
    pub fn search(&self, term: &str) -> Vec<(usize, &Task)> {
        let needle = term.to_lowercase();
        self.tasks.iter()
            .enumerate()
            .filter(|(_, task)| task.matches_lowercase(&needle))
            .collect()
    }

    /// Replace the whole collection with the tasks provided by an external source, and save.
    ///
    /// This unconditionally overwrites whatever was loaded from storage.
    /// It returns whether the collection has been replaced: in case the fetch fails, or the fetched data holds an invalid task,
    /// this is logged and the current collection is kept.
    pub async fn seed_from_external_source<T>(&mut self, source: &T) -> bool
    where
        T: SeedSource + ?Sized,
    {
        let tasks = match source.fetch_tasks().await {
            Err(err) => {
                log::error!("Unable to fetch seed tasks: {}", err);
                return false;
            },
            Ok(tasks) => tasks,
        };

        if let Err(err) = check_collection(&tasks) {
            log::error!("Ignoring seed tasks: {}", err);
            return false;
        }

        if self.tasks.is_empty() == false {
            log::warn!("Seeding discards the {} tasks that were loaded from storage", self.tasks.len());
        }
        log::info!("Seeded {} tasks", tasks.len());
        self.tasks = tasks;
        self.save();
        true
    }

    /// Write the whole collection to storage.
    ///
    /// This is called after every mutation. Failures are logged and sent to the feedback channel (if any), nothing more.
    pub fn save(&mut self) {
        let event = match self.try_save() {
            Ok(()) => {
                log::debug!("Saved {} tasks to key {:?}", self.tasks.len(), self.key);
                StoreEvent::Saved{ tasks: self.tasks.len() }
            },
            Err(err) => {
                log::warn!("Unable to save tasks: {}", err);
                StoreEvent::SaveFailed{ reason: err.to_string() }
            },
        };
        self.feedback(event);
    }

    fn try_save(&mut self) -> Result<(), Box<dyn Error>> {
        let json = serialize_collection(&self.tasks)?;
        self.storage.set(&self.key, &json)
    }

    fn feedback(&self, event: StoreEvent) {
        if let Some(sender) = &self.feedback_channel {
            // Nobody may be listening anymore, this is fine
            let _ = sender.send(event);
        }
    }
}


/// Serialize a task collection into its storage format
pub fn serialize_collection(tasks: &[Task]) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parse a task collection from its storage format.
///
/// This only checks the format. Use [`check_collection`] to check that every task is valid
pub fn deserialize_collection(json: &str) -> Result<Vec<Task>, Box<dyn Error>> {
    Ok(serde_json::from_str(json)?)
}

/// Make sure a task passes validation
pub fn check_task(task: &Task) -> Result<(), TaskError> {
    let errors = validate(&TaskDraft::from(task));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskError::Invalid(errors))
    }
}

/// Make sure every task of a collection passes validation
pub fn check_collection(tasks: &[Task]) -> Result<(), Box<dyn Error>> {
    for (index, task) in tasks.iter().enumerate() {
        if let Err(err) = check_task(task) {
            return Err(format!("task #{} ({:?}): {}", index, task.title(), err).into());
        }
    }
    Ok(())
}

fn read_collection<S: KeyValueStore>(storage: &S, key: &str) -> Result<Vec<Task>, Box<dyn Error>> {
    let json = match storage.get(key)? {
        None => {
            log::info!("No tasks stored under key {:?} yet", key);
            return Ok(Vec::new());
        },
        Some(json) => json,
    };
    let tasks = deserialize_collection(&json)?;
    check_collection(&tasks)?;
    Ok(tasks)
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use crate::mock_behaviour::MockBehaviour;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    use crate::draft::Field;
    use crate::task::Category;
    use crate::store::feedback::feedback_channel;

    fn three_tasks() -> Vec<Task> {
        vec![
            Task::new("Write the report".to_string(), Category::Work),
            Task::new("Buy milk".to_string(), Category::Personal),
            Task::new("Go running".to_string(), Category::Sport),
        ]
    }

    fn stored(tasks: &[Task]) -> MemoryStorage {
        MemoryStorage::with_value("tasks", &serialize_collection(tasks).unwrap())
    }

    #[test]
    fn load_missing_data() {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = TaskStore::load(MemoryStorage::new());
        assert!(store.is_empty());
    }

    #[test]
    fn load_corrupt_data() {
        let _ = env_logger::builder().is_test(true).try_init();

        for corrupt in ["{not json", r#"{"title": "not a list"}"#, r#"[{"title": "Run", "category": "hobbies"}]"#].iter() {
            let store = TaskStore::load(MemoryStorage::with_value("tasks", corrupt));
            assert!(store.is_empty(), "{} should have been rejected", corrupt);
        }
    }

    #[test]
    fn load_rejects_invalid_tasks() {
        let _ = env_logger::builder().is_test(true).try_init();
        let json = r#"[{"title": "Fine", "category": "work"}, {"title": "Too far", "category": "work", "progress": 150}]"#;
        let store = TaskStore::load(MemoryStorage::with_value("tasks", json));
        assert!(store.is_empty());
    }

    #[test]
    fn load_unreadable_storage() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut storage = stored(&three_tasks());
        storage.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::fail_now(1)))));
        let store = TaskStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn round_trip() {
        let tasks = three_tasks();
        let store = TaskStore::load(stored(&tasks));
        assert_eq!(store.tasks(), &tasks[..]);

        let mut store = store;
        store.save();
        let reloaded = TaskStore::load(MemoryStorage::with_value("tasks", store.storage().raw("tasks").unwrap()));
        assert_eq!(reloaded.tasks(), &tasks[..]);
    }

    #[test]
    fn custom_key() {
        let mut store = TaskStore::new_with_key(MemoryStorage::new(), "my-list".to_string());
        store.append(Task::new("Stretch".to_string(), Category::Sport)).unwrap();
        assert!(store.storage().raw("my-list").is_some());
        assert!(store.storage().raw("tasks").is_none());
        assert_eq!(store.key(), "my-list");
    }

    #[test]
    fn mutations_are_saved() {
        let mut store = TaskStore::new(MemoryStorage::new());
        store.append(Task::new("One".to_string(), Category::Other)).unwrap();
        store.append(Task::new("Two".to_string(), Category::Other)).unwrap();

        let saved = deserialize_collection(store.storage().raw("tasks").unwrap()).unwrap();
        assert_eq!(saved, store.tasks());

        let mut patch = TaskPatch::new();
        patch.urgency = Some(true);
        let updated = store.replace_at(1, patch).unwrap();
        assert!(updated.urgency());
        let saved = deserialize_collection(store.storage().raw("tasks").unwrap()).unwrap();
        assert!(saved[1].urgency());

        let removed = store.remove_at(0).unwrap();
        assert_eq!(removed.title(), "One");
        let saved = deserialize_collection(store.storage().raw("tasks").unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title(), "Two");
    }

    #[test]
    fn out_of_range() {
        let mut store = TaskStore::load(stored(&three_tasks()));
        assert_eq!(store.remove_at(3), Err(TaskError::IndexOutOfRange{ index: 3, len: 3 }));
        assert_eq!(store.replace_at(7, TaskPatch::new()).unwrap_err(), TaskError::IndexOutOfRange{ index: 7, len: 3 });
        assert!(store.get_checked(3).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn failed_saves_are_reported() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (sender, receiver) = feedback_channel();
        assert_eq!(*receiver.borrow(), StoreEvent::NotSaved);

        let mut storage = MemoryStorage::new();
        storage.set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour { set_behaviour: (0, 1), ..MockBehaviour::default() }))));
        let mut store = TaskStore::new(storage);
        store.set_feedback_channel(sender);

        store.append(Task::new("One".to_string(), Category::Other)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(&*receiver.borrow(), StoreEvent::SaveFailed{ .. }));
        assert!(store.storage().raw("tasks").is_none());

        store.append(Task::new("Two".to_string(), Category::Other)).unwrap();
        assert_eq!(*receiver.borrow(), StoreEvent::Saved{ tasks: 2 });
        assert_eq!(deserialize_collection(store.storage().raw("tasks").unwrap()).unwrap().len(), 2);
    }

    #[test]
    fn invalid_tasks_are_never_stored() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut store = TaskStore::new(MemoryStorage::new());
        store.append(Task::new("Valid".to_string(), Category::Work)).unwrap();
        let saved_before = store.storage().raw("tasks").unwrap().to_string();

        match store.append(Task::new("   ".to_string(), Category::Work)) {
            Err(TaskError::Invalid(errors)) => assert!(errors.get(Field::Title).is_some()),
            other => panic!("Unexpected result {:?}", other),
        }

        let mut patch = TaskPatch::new();
        patch.progress = Some(200);
        match store.replace_at(0, patch) {
            Err(TaskError::Invalid(errors)) => assert!(errors.get(Field::Progress).is_some()),
            other => panic!("Unexpected result {:?}", other),
        }

        let mut patch = TaskPatch::new();
        patch.start_date = Some(NaiveDate::from_ymd_opt(2024, 5, 2));
        patch.end_date = Some(NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(store.replace_at(0, patch).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].progress(), 0);
        assert_eq!(store.tasks()[0].start_date(), None);
        assert_eq!(store.storage().raw("tasks").unwrap(), saved_before);

        // What has been stored can still be loaded
        let reloaded = TaskStore::load(MemoryStorage::with_value("tasks", &saved_before));
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn search() {
        let store = TaskStore::load(stored(&three_tasks()));
        let all: Vec<usize> = store.search("").into_iter().map(|(i, _)| i).collect();
        assert_eq!(all, vec![0, 1, 2]);

        let found = store.search("MILK");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 1);

        // "personal" has no "t", "sport" has one
        let found = store.search("T");
        let indices: Vec<usize> = found.into_iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);

        assert!(store.search("nothing like this").is_empty());
    }
}
