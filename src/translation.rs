//! Cached translation of generated text.
//!
//! Translations are keyed by target language and source text. Any failure
//! along the way hands back the source text unchanged.

use crate::ai::CompletionService;
use crate::models::{CompletionRequest, Config};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const TRANSLATION_TEMPERATURE: f32 = 0.2;
const TRANSLATION_MAX_TOKENS: u32 = 1024;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn flush(&self) -> Result<()>;
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        locked(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(locked(&self.entries).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        locked(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A JSON object on disk, loaded once and written back on `flush`.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open `path`; a missing file starts an empty cache.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::Cache(format!("Invalid cache file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(Error::Io(e)),
        };

        debug!(
            "Loaded {} cached translations from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(locked(&self.entries).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        locked(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let json = {
            let entries = locked(&self.entries);
            serde_json::to_string_pretty(&*entries)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct TranslationCache {
    store: Arc<dyn CacheStore>,
}

impl TranslationCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// File-backed when `TRANSLATION_CACHE_PATH` is configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match &config.translation_cache_path {
            Some(path) => Ok(Self::new(Arc::new(JsonFileStore::open(path).await?))),
            None => Ok(Self::in_memory()),
        }
    }

    fn key(language: &str, text: &str) -> String {
        format!("{}:{}", language.trim().to_lowercase(), text)
    }

    pub async fn get(&self, language: &str, text: &str) -> Result<Option<String>> {
        self.store.get(&Self::key(language, text)).await
    }

    pub async fn set(&self, language: &str, text: &str, translation: &str) -> Result<()> {
        self.store
            .set(&Self::key(language, text), translation)
            .await
    }

    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }
}

fn is_english(language: &str) -> bool {
    let language = language.trim().to_lowercase();
    language == "en" || language == "english" || language.starts_with("en-")
}

pub struct Translator {
    completion: Option<Arc<dyn CompletionService>>,
    cache: TranslationCache,
}

impl Translator {
    pub fn new(completion: Option<Arc<dyn CompletionService>>, cache: TranslationCache) -> Self {
        Self { completion, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate `text` into `language`, or return it unchanged.
    pub async fn translate(&self, text: &str, language: &str) -> String {
        if text.trim().is_empty() || is_english(language) {
            return text.to_string();
        }

        match self.cache.get(language, text).await {
            Ok(Some(cached)) => {
                debug!("Translation cache hit ({})", language);
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!("Translation cache lookup failed: {}", e),
        }

        let Some(completion) = &self.completion else {
            return text.to_string();
        };

        let request = CompletionRequest {
            system_instruction: prompts::render(
                prompts::TRANSLATE_SYSTEM,
                &[("language", language)],
            )
            .trim_end()
            .to_string(),
            user_payload: text.to_string(),
            temperature: TRANSLATION_TEMPERATURE,
            max_output_tokens: TRANSLATION_MAX_TOKENS,
        };

        let translated = match completion.complete(&request).await {
            Ok(result) => result.trim().to_string(),
            Err(e) => {
                warn!("Translation to {} failed: {}", language, e);
                return text.to_string();
            }
        };

        if translated.is_empty() {
            warn!("Empty translation to {}; keeping source text", language);
            return text.to_string();
        }

        if let Err(e) = self.cache.set(language, text, &translated).await {
            warn!("Failed to cache translation: {}", e);
        }
        info!("Translated {} chars into {}", text.len(), language);
        translated
    }

    pub async fn flush(&self) -> Result<()> {
        self.cache.flush().await
    }
}
