use crate::artifacts::core::error::OrbitError;
use crate::artifacts::remote::ObjectStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

/// S3 bucket holding the objects of every repository, keyed by repository name
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS configuration
    ///
    /// Credentials come from the usual provider chain (`AWS_ACCESS_KEY_ID`,
    /// profiles, instance metadata). A custom `endpoint` switches to path-style
    /// addressing for S3-compatible services.
    pub async fn connect(bucket: String, region: String, endpoint: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region));
        if let Some(endpoint) = &endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint.is_some())
            .build();

        S3ObjectStore {
            client: Client::from_conf(s3_config),
            bucket,
        }
    }

    fn failure<E: ProvideErrorMetadata>(&self, operation: &str, key: &str, e: E) -> OrbitError {
        let code = e.code().unwrap_or("unknown");
        let message = e.message().unwrap_or("unknown");
        OrbitError::network(
            key,
            format!(
                "S3 {} failed for bucket={}: code={} message={}",
                operation, self.bucket, code, message
            ),
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), OrbitError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_length(body.len() as i64)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| self.failure("put", key, e))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, OrbitError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| self.failure("get", key, e))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| OrbitError::network(key, format!("S3 get body failed: {}", e)))?;

        Ok(body.into_bytes())
    }

    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, OrbitError> {
        let mut keys = Vec::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| self.failure("list", prefix, e))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }
        keys.sort();

        Ok(keys)
    }

    fn describe(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}
