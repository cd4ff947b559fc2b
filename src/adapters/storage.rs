use crate::core::ContentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Content documents under a local directory, `{root}/{slug}/{document}`.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    base_path: PathBuf,
}

impl LocalContentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn read_document(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.base_path.join(key);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        format!("local:{}", self.base_path.display())
    }
}

#[cfg(feature = "s3")]
pub use s3::S3ContentStore;

#[cfg(feature = "s3")]
mod s3 {
    use crate::core::ContentStore;
    use crate::utils::error::{Result, SiteError};
    use async_trait::async_trait;
    use aws_sdk_s3::Client as S3Client;

    /// Content documents in an S3 bucket, `{prefix}/{slug}/{document}`.
    #[derive(Debug, Clone)]
    pub struct S3ContentStore {
        client: S3Client,
        bucket: String,
        prefix: String,
    }

    impl S3ContentStore {
        pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
            Self {
                client,
                bucket,
                prefix: prefix.trim_matches('/').to_string(),
            }
        }

        pub async fn from_env(bucket: String, prefix: String, region: Option<String>) -> Self {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let mut builder = aws_sdk_s3::config::Builder::from(&config).force_path_style(true);
            if let Some(region) = region {
                builder = builder.region(aws_sdk_s3::config::Region::new(region));
            }
            Self::new(S3Client::from_conf(builder.build()), bucket, prefix)
        }

        fn object_key(&self, key: &str) -> String {
            if self.prefix.is_empty() || self.prefix == "." {
                key.to_string()
            } else {
                format!("{}/{}", self.prefix, key)
            }
        }
    }

    #[async_trait]
    impl ContentStore for S3ContentStore {
        async fn read_document(&self, key: &str) -> Result<Option<Vec<u8>>> {
            let object_key = self.object_key(key);
            let resp = match self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(&object_key)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    if err
                        .as_service_error()
                        .is_some_and(|e| e.is_no_such_key())
                    {
                        return Ok(None);
                    }
                    return Err(SiteError::ContentStoreError {
                        message: format!("Failed to read s3://{}/{}: {}", self.bucket, object_key, err),
                    });
                }
            };

            let data = resp
                .body
                .collect()
                .await
                .map_err(|e| SiteError::ContentStoreError {
                    message: format!("Failed to collect S3 data: {}", e),
                })?;

            Ok(Some(data.into_bytes().to_vec()))
        }

        fn describe(&self) -> String {
            format!("s3://{}/{}", self.bucket, self.prefix)
        }
    }
}
