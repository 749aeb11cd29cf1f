//! External sources a [`TaskStore`](crate::store::TaskStore) can be seeded from
//!
//! Every source provides a JSON array of tasks, in the same format the store persists.

use std::error::Error;
use std::path::{Path, PathBuf};
#[cfg(any(test, feature = "mocked_storage"))]
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use url::Url;

use crate::store::deserialize_collection;
use crate::traits::SeedSource;
use crate::Task;
#[cfg(any(test, feature = "mocked_storage"))]
use crate::mock_behaviour::MockBehaviour;


/// A seed source that downloads its tasks from an HTTP endpoint
#[derive(Clone, Debug)]
pub struct HttpSeedSource {
    url: Url,
}

impl HttpSeedSource {
    /// Create a source. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        log::info!("Fetching seed tasks from {}", self.url);
        let res = reqwest::Client::new()
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if res.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?} from {}", res.status(), self.url).into());
        }

        let text = res.text().await?;
        deserialize_collection(&text)
    }
}


/// A seed source that reads its tasks from a local JSON file
#[derive(Clone, Debug)]
pub struct JsonFileSeedSource {
    path: PathBuf,
}

impl JsonFileSeedSource {
    pub fn new(path: &Path) -> Self {
        Self { path: PathBuf::from(path) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SeedSource for JsonFileSeedSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let content = match std::fs::read_to_string(&self.path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", self.path, err).into());
            },
            Ok(content) => content,
        };
        deserialize_collection(&content)
    }
}


/// A seed source that serves a JSON document embedded in the app
#[derive(Clone, Debug)]
pub struct StaticSeedSource {
    json: String,

    #[cfg(any(test, feature = "mocked_storage"))]
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl StaticSeedSource {
    pub fn new<S: Into<String>>(json: S) -> Self {
        Self {
            json: json.into(),
            #[cfg(any(test, feature = "mocked_storage"))]
            mock_behaviour: None,
        }
    }

    #[cfg(any(test, feature = "mocked_storage"))]
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        #[cfg(any(test, feature = "mocked_storage"))]
        self.mock_behaviour.as_ref().map_or(Ok(()), |b| b.lock().unwrap().can_fetch())?;

        deserialize_collection(&self.json)
    }
}
