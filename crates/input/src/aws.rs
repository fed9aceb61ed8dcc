//! AWS SDK backed object store

use crate::s3::{Credentials, ObjectClient, ObjectStore};
use crate::InputError;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use bytes::Bytes;

const PROVIDER_NAME: &str = "vlad-input";

const AUTH_ERROR_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "AccessDenied",
    "ExpiredToken",
    "InvalidToken",
];

/// S3 (or S3-compatible) object store.
///
/// Without explicit credentials the SDK's default provider chain is used
/// (environment, profile, IMDS, ...).
#[derive(Debug, Clone, Default)]
pub struct S3ObjectStore {
    region: Option<String>,
    endpoint_url: Option<String>,
    force_path_style: bool,
}

impl S3ObjectStore {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Point the client at an S3-compatible endpoint (MinIO, LocalStack, ...).
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn connect(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Box<dyn ObjectClient>, InputError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                credentials.access_key(),
                credentials.secret_key(),
                credentials.session_token().map(str::to_string),
                None,
                PROVIDER_NAME,
            ));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if self.force_path_style {
            builder = builder.force_path_style(true);
        }

        Ok(Box::new(S3Client {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }))
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

struct S3Client {
    client: aws_sdk_s3::Client,
}

#[async_trait]
impl ObjectClient for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, InputError> {
        let locator = format!("s3://{bucket}/{key}");

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(locator.clone(), e))?;

        // Read the entire body into memory
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| InputError::transient(locator, e))?;

        Ok(body.into_bytes())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FailureKind {
    NotFound,
    Authentication,
    Transient,
}

/// Map an SDK failure onto the source error taxonomy.
fn classify(locator: String, err: SdkError<GetObjectError, HttpResponse>) -> InputError {
    let kind = match &err {
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            let inner = service.err();
            service_failure_kind(inner.is_no_such_key(), inner.code(), status)
        }
        // Credential resolution runs during dispatch, so a missing or
        // unloadable identity arrives wrapped in a connector error.
        _ if caused_by_credentials(&err) => FailureKind::Authentication,
        _ => FailureKind::Transient,
    };

    match kind {
        FailureKind::NotFound => InputError::not_found(locator, err),
        FailureKind::Authentication => InputError::authentication(locator, err),
        FailureKind::Transient => InputError::transient(locator, err),
    }
}

fn caused_by_credentials(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<CredentialsError>() {
            return true;
        }
        current = e.source();
    }
    false
}

fn service_failure_kind(no_such_key: bool, code: Option<&str>, status: u16) -> FailureKind {
    if no_such_key || code == Some("NoSuchBucket") || status == 404 {
        FailureKind::NotFound
    } else if code.is_some_and(|code| AUTH_ERROR_CODES.contains(&code))
        || status == 401
        || status == 403
    {
        FailureKind::Authentication
    } else {
        FailureKind::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_smithy_runtime_api::client::result::ConnectorError;

    #[test]
    fn test_builder() {
        let store = S3ObjectStore::default()
            .with_region("eu-west-1")
            .with_endpoint_url("http://localhost:9000")
            .with_force_path_style(true);
        assert_eq!(store.region.as_deref(), Some("eu-west-1"));
        assert_eq!(store.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(store.force_path_style);
        assert_eq!(store.name(), "s3");
    }

    type GetObjectSdkError = SdkError<GetObjectError, HttpResponse>;

    const LOCATOR: &str = "s3://bucket1/key1";

    #[test]
    fn test_missing_credentials_during_dispatch_is_authentication() {
        let err = GetObjectSdkError::dispatch_failure(ConnectorError::other(
            Box::new(CredentialsError::not_loaded("no providers in chain provided credentials")),
            None,
        ));
        let err = classify(LOCATOR.to_string(), err);
        assert!(matches!(err, InputError::Authentication { .. }), "{err:?}");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_credentials_error_during_construction_is_authentication() {
        let err = GetObjectSdkError::construction_failure(CredentialsError::provider_error(
            "profile could not be parsed",
        ));
        assert!(matches!(
            classify(LOCATOR.to_string(), err),
            InputError::Authentication { .. }
        ));
    }

    #[test]
    fn test_connector_failure_is_transient() {
        let err = GetObjectSdkError::dispatch_failure(ConnectorError::other(
            Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
            None,
        ));
        let err = classify(LOCATOR.to_string(), err);
        assert!(matches!(err, InputError::TransientRemote { .. }), "{err:?}");
        assert!(err.is_retryable());

        let err = GetObjectSdkError::dispatch_failure(ConnectorError::io(Box::new(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"),
        )));
        assert!(matches!(
            classify(LOCATOR.to_string(), err),
            InputError::TransientRemote { .. }
        ));
    }

    #[test]
    fn test_timeout_is_transient() {
        let err = GetObjectSdkError::timeout_error("operation timed out");
        assert!(matches!(
            classify(LOCATOR.to_string(), err),
            InputError::TransientRemote { .. }
        ));
    }

    #[test]
    fn test_other_construction_failure_is_transient() {
        let err = GetObjectSdkError::construction_failure("invalid request parameters");
        assert!(matches!(
            classify(LOCATOR.to_string(), err),
            InputError::TransientRemote { .. }
        ));
    }

    #[test]
    fn test_classified_error_keeps_locator() {
        let err = classify(
            LOCATOR.to_string(),
            GetObjectSdkError::timeout_error("operation timed out"),
        );
        assert_eq!(err.to_string(), format!("Remote request failed for {LOCATOR}"));
    }

    #[test]
    fn test_service_failure_kind() {
        assert_eq!(service_failure_kind(true, Some("NoSuchKey"), 404), FailureKind::NotFound);
        assert_eq!(service_failure_kind(false, Some("NoSuchBucket"), 404), FailureKind::NotFound);
        assert_eq!(service_failure_kind(false, None, 404), FailureKind::NotFound);
        assert_eq!(
            service_failure_kind(false, Some("InvalidAccessKeyId"), 403),
            FailureKind::Authentication
        );
        assert_eq!(
            service_failure_kind(false, Some("SignatureDoesNotMatch"), 403),
            FailureKind::Authentication
        );
        assert_eq!(service_failure_kind(false, None, 401), FailureKind::Authentication);
        assert_eq!(
            service_failure_kind(false, Some("SlowDown"), 503),
            FailureKind::Transient
        );
        assert_eq!(
            service_failure_kind(false, Some("InternalError"), 500),
            FailureKind::Transient
        );
    }
}
