use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use vlad::input::InputError;
use vlad::{build_source, Locator, RemoteOpts};

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    remote: RemoteOpts,
}

#[test]
fn test_locator_selection() {
    assert_eq!(Locator::parse("-"), Locator::Stdin);
    assert_eq!(
        Locator::parse("s3://bucket1/key1"),
        Locator::Remote("s3://bucket1/key1".to_string())
    );
    assert_eq!(
        Locator::parse("data/people.csv.gz"),
        Locator::Local(PathBuf::from("data/people.csv.gz"))
    );
    assert_eq!(
        Locator::parse("./s3:/not-remote"),
        Locator::Local(PathBuf::from("./s3:/not-remote"))
    );
}

#[test]
fn test_remote_opts_parse() {
    let cli = TestCli::try_parse_from([
        "vlad",
        "--access-key",
        "AKIAEXAMPLE",
        "--secret-key",
        "secret",
        "--region",
        "eu-west-1",
        "--endpoint-url",
        "http://localhost:9000",
        "--force-path-style",
    ])
    .unwrap();

    assert_eq!(cli.remote.region.as_deref(), Some("eu-west-1"));
    assert_eq!(cli.remote.endpoint_url.as_deref(), Some("http://localhost:9000"));
    assert!(cli.remote.force_path_style);

    let credentials = cli.remote.credentials().unwrap().unwrap();
    assert_eq!(credentials.access_key(), "AKIAEXAMPLE");
    assert_eq!(credentials.secret_key(), "secret");
}

#[test]
fn test_credentials_require_both_halves() {
    let opts = RemoteOpts {
        access_key: Some("AKIAEXAMPLE".to_string()),
        ..Default::default()
    };
    assert!(opts.credentials().is_err());

    let opts = RemoteOpts {
        secret_key: Some("secret".to_string()),
        ..Default::default()
    };
    assert!(opts.credentials().is_err());

    assert!(RemoteOpts::default().credentials().unwrap().is_none());
}

#[test]
fn test_session_token_is_attached() {
    let opts = RemoteOpts {
        access_key: Some("AKIAEXAMPLE".to_string()),
        secret_key: Some("secret".to_string()),
        session_token: Some("token".to_string()),
        ..Default::default()
    };
    let credentials = opts.credentials().unwrap().unwrap();
    assert_eq!(credentials.session_token(), Some("token"));
}

#[tokio::test]
async fn test_build_local_source() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("people.csv");
    std::fs::write(&path, "name\nalice\n").unwrap();

    let source = build_source(path.to_str().unwrap(), &RemoteOpts::default())
        .await
        .unwrap();
    assert!(source.to_string().starts_with("LocalSource('"));

    let mut contents = String::new();
    source
        .open()
        .await
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "name\nalice\n");
}

#[tokio::test]
async fn test_build_local_source_missing_file() {
    let source = build_source("/nonexistent/people.csv", &RemoteOpts::default())
        .await
        .unwrap();
    let err = source.open().await.unwrap_err();
    assert!(matches!(err, InputError::NotFound { .. }));
}

#[cfg(feature = "s3")]
#[tokio::test]
async fn test_build_remote_source_hides_credentials() {
    let opts = RemoteOpts {
        access_key: Some("AKIAEXAMPLE".to_string()),
        secret_key: Some("supersecret".to_string()),
        ..Default::default()
    };
    let source = build_source("s3://bucket1/key1.csv.gz", &opts).await.unwrap();
    assert_eq!(source.to_string(), "RemoteObjectSource('s3://bucket1/key1.csv.gz')");
}

#[cfg(not(feature = "s3"))]
#[tokio::test]
async fn test_build_remote_source_without_s3() {
    let err = build_source("s3://bucket1/key1", &RemoteOpts::default())
        .await
        .err().expect("expected build_source to fail");
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::MissingCapability(_))
    ));
}

#[cfg(feature = "s3")]
#[tokio::test]
async fn test_build_remote_source_rejects_bad_locator() {
    let err = build_source("s3://bucket-only", &RemoteOpts::default())
        .await
        .err().expect("expected build_source to fail");
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::Configuration(_))
    ));
}
