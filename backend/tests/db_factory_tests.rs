//! Tests for db::factory and db::repo_config - repository creation and configuration.

mod support;

use std::str::FromStr;
use std::sync::Arc;

use subway_backend::db::factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
use subway_backend::db::repositories::FileConfig;
use subway_backend::db::repository::{
    FullRepository, LineRepository, RepositoryError, StationRepository,
};
use subway_backend::db::RepositoryConfig;

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("postgres");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_str_is_case_insensitive() {
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("Json").unwrap(), RepositoryType::File);
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("SUBWAY_DATA_FILE", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_data_file() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("SUBWAY_DATA_FILE", Some("/tmp/subway.json")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::File);
        },
    );
}

#[test]
fn test_repository_type_env_var_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("SUBWAY_DATA_FILE", Some("/tmp/subway.json")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_from_env_file_without_path_is_configuration_error() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", Some("file")), ("SUBWAY_DATA_FILE", None)],
        || {
            let result = support::block_on(RepositoryFactory::from_env());
            assert!(matches!(
                result.err(),
                Some(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}

#[test]
fn test_from_env_opens_file_repository() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subway.json");
    let path_str = path.to_str().unwrap();

    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("SUBWAY_DATA_FILE", Some(path_str)),
            ("SUBWAY_DATA_PRETTY", Some("true")),
        ],
        || {
            let config = FileConfig::from_env().unwrap();
            assert_eq!(config.path, path);
            assert!(config.pretty);

            let repo = support::block_on(RepositoryFactory::from_env()).unwrap();
            assert!(support::block_on(repo.health_check()).unwrap());
        },
    );
}

#[tokio::test]
async fn test_factory_create_local() {
    let repo: Arc<dyn FullRepository> = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.list_lines().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("lines.json");
    let config_path = dir.path().join("repository.toml");
    std::fs::write(
        &config_path,
        format!(
            "[repository]\ntype = \"file\"\n\n[file]\npath = {:?}\n",
            data.to_str().unwrap()
        ),
    )
    .unwrap();

    let config = RepositoryConfig::from_file(&config_path).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::File);

    let repo = RepositoryFactory::from_config_file(&config_path)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_from_config_file_missing() {
    let result = RepositoryConfig::from_file("/definitely/not/here/repository.toml");
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_builder_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("repository.toml");
    std::fs::write(&config_path, "[repository]\ntype = \"local\"\n").unwrap();

    let repo = RepositoryBuilder::new()
        .repository_type(RepositoryType::File)
        .from_config_file(&config_path)
        .unwrap()
        .build()
        .await
        .unwrap();

    assert!(repo.list_stations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_config_file_is_not_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("repository.toml");
    std::fs::write(
        &config_path,
        "[repository]\ntype = \"file\"\n\n[file]\npath = \"data.json\"\npretty = yes\n",
    )
    .unwrap();

    let result = RepositoryFactory::from_config_or_env(Some(&config_path)).await;
    assert!(matches!(
        result.err(),
        Some(RepositoryError::ConfigurationError { .. })
    ));
}

#[test]
fn test_missing_config_file_falls_back_to_env() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("SUBWAY_DATA_FILE", None)],
        || {
            let repo = support::block_on(RepositoryFactory::from_config_or_env(None)).unwrap();
            assert!(support::block_on(repo.health_check()).unwrap());
        },
    );
}

#[test]
fn test_unknown_repository_type_env_falls_back_to_local() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", Some("postgres")), ("SUBWAY_DATA_FILE", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}
