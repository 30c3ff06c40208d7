use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use doodleboard_shared::{
    decode_record_file, encode_record_file, sort_newest_first, DrawingRecord, RecordCodecError,
};
use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::RwLock;

const RECORD_EXTENSION: &str = "bin";
const S3_FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("drawing {0} not found")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] RecordCodecError),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn insert(&self, record: &DrawingRecord) -> Result<(), StorageError>;
    async fn get(&self, id: &str) -> Result<DrawingRecord, StorageError>;
    /// All stored drawings, newest first.
    async fn list(&self) -> Result<Vec<DrawingRecord>, StorageError>;
}

pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn insert(&self, record: &DrawingRecord) -> Result<(), StorageError> {
        let payload = encode_record_file(record)?;
        let path = self.record_path(&record.id);
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, payload).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<DrawingRecord, StorageError> {
        let payload = match tokio::fs::read(self.record_path(id)).await {
            Ok(payload) => payload,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Err(error) => return Err(error.into()),
        };
        Ok(decode_record_file(&payload)?)
    }

    async fn list(&self) -> Result<Vec<DrawingRecord>, StorageError> {
        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let decoded = match tokio::fs::read(&path).await {
                Ok(payload) => decode_record_file(&payload).map_err(StorageError::from),
                Err(error) => Err(error.into()),
            };
            match decoded {
                Ok(record) => records.push(record),
                Err(error) => tracing::warn!(path = %path.display(), %error, "skipping unreadable drawing"),
            }
        }
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, DrawingRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert(&self, record: &DrawingRecord) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<DrawingRecord, StorageError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<DrawingRecord>, StorageError> {
        let mut records = self
            .records
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Static keys for S3 compatible stores that are not on the AWS chain.
#[derive(Clone, Debug)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Where and how drawings are kept in a bucket.
#[derive(Clone, Debug, Default)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub credentials: Option<S3Credentials>,
}

impl S3StorageConfig {
    async fn client(&self) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(keys) = &self.credentials {
            loader = loader.credentials_provider(Credentials::new(
                keys.access_key_id.clone(),
                keys.secret_access_key.clone(),
                None,
                None,
                "doodleboard",
            ));
        }
        if let Some(region) = &self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let mut s3_config = aws_sdk_s3::config::Builder::from(&loader.load().await)
            .force_path_style(self.force_path_style);
        if let Some(endpoint_url) = &self.endpoint_url {
            s3_config = s3_config.endpoint_url(endpoint_url);
        }
        Client::from_conf(s3_config.build())
    }
}

/// Key layout of drawings in a bucket: `<prefix>/<id>.bin`, or `<id>.bin`
/// without a prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().trim_matches('/').to_string(),
        }
    }

    fn list_prefix(&self) -> Option<String> {
        (!self.prefix.is_empty()).then(|| format!("{}/", self.prefix))
    }

    fn key_for(&self, id: &str) -> String {
        match self.list_prefix() {
            Some(dir) => format!("{dir}{id}.{RECORD_EXTENSION}"),
            None => format!("{id}.{RECORD_EXTENSION}"),
        }
    }

    /// Only direct children ending in `.bin` are drawings.
    fn is_record_key(&self, key: &str) -> bool {
        let name = match self.list_prefix() {
            Some(dir) => match key.strip_prefix(&dir) {
                Some(name) => name,
                None => return false,
            },
            None => key,
        };
        !name.contains('/')
            && name
                .strip_suffix(&format!(".{RECORD_EXTENSION}"))
                .is_some_and(|id| !id.is_empty())
    }
}

/// The token for the next listing page, if the listing was cut short.
fn next_page_token(is_truncated: Option<bool>, token: Option<&str>) -> Option<String> {
    match (is_truncated, token) {
        (Some(true), Some(token)) if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

pub struct S3Storage {
    bucket: String,
    layout: KeyLayout,
    client: Client,
}

impl S3Storage {
    pub async fn new(config: S3StorageConfig) -> Self {
        let client = config.client().await;
        Self {
            layout: KeyLayout::new(config.prefix.as_deref()),
            bucket: config.bucket,
            client,
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token = None;
        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_prefix(self.layout.list_prefix())
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|error| StorageError::Backend(format!("list failed: {error:?}")))?;
            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| self.layout.is_record_key(key))
                    .map(str::to_string),
            );
            continuation_token =
                next_page_token(output.is_truncated(), output.next_continuation_token());
            if continuation_token.is_none() {
                break;
            }
        }
        Ok(keys)
    }

    async fn fetch(&self, key: &str) -> Result<DrawingRecord, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| {
                if error
                    .as_service_error()
                    .is_some_and(|service_error| service_error.is_no_such_key())
                {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Backend(format!("get {key} failed: {error:?}"))
                }
            })?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|error| StorageError::Backend(format!("read {key} failed: {error:?}")))?
            .into_bytes();
        Ok(decode_record_file(&bytes)?)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn insert(&self, record: &DrawingRecord) -> Result<(), StorageError> {
        let payload = encode_record_file(record)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.layout.key_for(&record.id))
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(|error| {
                StorageError::Backend(format!("put {} failed: {error:?}", record.id))
            })?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<DrawingRecord, StorageError> {
        self.fetch(&self.layout.key_for(id))
            .await
            .map_err(|error| match error {
                StorageError::NotFound(_) => StorageError::NotFound(id.to_string()),
                other => other,
            })
    }

    async fn list(&self) -> Result<Vec<DrawingRecord>, StorageError> {
        let keys = self.list_keys().await?;
        let results = stream::iter(keys)
            .map(|key| async move {
                let result = self.fetch(&key).await;
                (key, result)
            })
            .buffer_unordered(S3_FETCH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        let mut records = Vec::with_capacity(results.len());
        for (key, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(error) => tracing::warn!(%key, %error, "skipping unreadable drawing"),
            }
        }
        sort_newest_first(&mut records);
        Ok(records)
    }
}
