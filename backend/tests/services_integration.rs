mod support;

use std::sync::Arc;

use subway_backend::chain::ChainError;
use subway_backend::db::repositories::{FileRepository, LocalRepository};
use subway_backend::db::repository::{SectionRepository, StationRepository};
use subway_backend::db::services::{self, ServiceError};
use subway_backend::models::{LineId, Station};
use subway_backend::services::LineLocks;

fn st(name: &str) -> Station {
    Station::from(name)
}

fn names(stations: &[Station]) -> Vec<&str> {
    stations.iter().map(Station::name).collect()
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_line_lifecycle() {
    let repo = LocalRepository::new();
    let locks = LineLocks::new();

    let line_id = support::seeded_line(
        &repo,
        &locks,
        "Line2",
        &[("Gangnam", "Yeoksam", 10), ("Yeoksam", "Seolleung", 10)],
    )
    .await;

    let view = services::register_section(
        &repo,
        &locks,
        line_id,
        st("Gyodae"),
        st("Gangnam"),
        7,
    )
    .await
    .unwrap();
    assert_eq!(
        names(&view.stations),
        ["Gyodae", "Gangnam", "Yeoksam", "Seolleung"]
    );
    assert_eq!(view.total_distance, 27);

    let view = services::delete_station(&repo, &locks, line_id, &st("Yeoksam"))
        .await
        .unwrap();
    assert_eq!(names(&view.stations), ["Gyodae", "Gangnam", "Seolleung"]);
    assert_eq!(view.total_distance, 27);

    services::delete_line(&repo, &locks, line_id).await.unwrap();
    assert!(services::list_line_stations(&repo).await.unwrap().is_empty());
    // Stations stay in the registry after their line is gone.
    assert_eq!(repo.list_stations().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_duplicate_and_disconnected_sections() {
    let repo = LocalRepository::new();
    let locks = LineLocks::new();
    let line_id = support::seeded_line(&repo, &locks, "Line3", &[("A", "B", 5)]).await;

    let err = services::register_section(&repo, &locks, line_id, st("B"), st("A"), 2)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_SEGMENT");

    let err = services::register_section(&repo, &locks, line_id, st("X"), st("Y"), 2)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DISCONNECTED_SEGMENT");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sections_on_one_line_stay_a_path() {
    let repo = Arc::new(LocalRepository::new());
    let locks = LineLocks::new();
    let line_id = support::seeded_line(&repo, &locks, "Busy", &[("S0", "S1", 1)]).await;

    // Every task extends the tail or prepends a new head. Without the
    // per-line lock two of them could both extend from the same snapshot.
    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = Arc::clone(&repo);
        let locks = locks.clone();
        handles.push(tokio::spawn(async move {
            let current = services::get_line_stations(repo.as_ref(), line_id)
                .await
                .unwrap();
            let (source, target) = if i % 2 == 0 {
                (current.stations[current.stations.len() - 1].clone(), st(&format!("T{}", i)))
            } else {
                (st(&format!("H{}", i)), current.stations[0].clone())
            };
            services::register_section(repo.as_ref(), &locks, line_id, source, target, 1).await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            // A stale read picked an endpoint that is now interior; the
            // chain refuses it instead of forking.
            Err(ServiceError::Chain(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    let view = services::get_line_stations(repo.as_ref(), line_id)
        .await
        .unwrap();
    assert_eq!(view.stations.len(), 2 + committed);
    assert_eq!(repo.segment_count(line_id), 1 + committed);
    assert_eq!(view.total_distance, 1 + committed as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_splits_conserve_distance() {
    let repo = Arc::new(LocalRepository::new());
    let locks = LineLocks::new();
    let line_id = support::seeded_line(&repo, &locks, "Split", &[("A", "B", 1000)]).await;

    let mut handles = Vec::new();
    for i in 0..20u32 {
        let repo = Arc::clone(&repo);
        let locks = locks.clone();
        handles.push(tokio::spawn(async move {
            services::register_section(
                repo.as_ref(),
                &locks,
                line_id,
                st("A"),
                st(&format!("M{}", i)),
                i + 1,
            )
            .await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(ServiceError::Chain(ChainError::DistanceTooLong { .. })) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert!(committed >= 1);

    let view = services::get_line_stations(repo.as_ref(), line_id)
        .await
        .unwrap();
    assert_eq!(view.stations.len(), 2 + committed);
    assert_eq!(view.stations.first(), Some(&st("A")));
    assert_eq!(view.stations.last(), Some(&st("B")));
    assert_eq!(view.total_distance, 1000);
}

#[tokio::test]
async fn test_file_repository_round_trip_through_services() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subway.json");
    let locks = LineLocks::new();

    let line_id = {
        let repo = FileRepository::open(&path, true).await.unwrap();
        let line = services::create_line(&repo, "Sinbundang", "red").await.unwrap();
        services::register_section(&repo, &locks, line.id, st("Gangnam"), st("Yangjae"), 6)
            .await
            .unwrap();
        services::register_section(&repo, &locks, line.id, st("Gangnam"), st("Sinsa"), 6)
            .await
            .unwrap_err();
        services::register_section(&repo, &locks, line.id, st("Sinsa"), st("Gangnam"), 4)
            .await
            .unwrap();
        line.id
    };

    let reopened = FileRepository::open(&path, true).await.unwrap();
    let view = services::get_line_stations(&reopened, line_id).await.unwrap();
    assert_eq!(names(&view.stations), ["Sinsa", "Gangnam", "Yangjae"]);
    assert_eq!(view.total_distance, 10);
    assert_eq!(reopened.sections_for_line(line_id).await.unwrap().len(), 2);

    let next = services::create_line(&reopened, "Line9", "gold").await.unwrap();
    assert!(next.id.value() > line_id.value());
}

#[tokio::test]
async fn test_failed_persist_does_not_register_stations() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir(&data_dir).unwrap();
    let repo = FileRepository::open(data_dir.join("subway.json"), false)
        .await
        .unwrap();
    let locks = LineLocks::new();
    let line = services::create_line(&repo, "Line7", "olive").await.unwrap();

    // Every later persist fails once the directory is gone.
    std::fs::remove_dir_all(&data_dir).unwrap();

    let err = services::register_section(&repo, &locks, line.id, st("A"), st("B"), 5)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "STORAGE_ERROR");
    assert!(repo.sections_for_line(line.id).await.unwrap().is_empty());
    assert!(repo.list_stations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_line_is_not_found() {
    let repo = LocalRepository::new();
    let err = services::get_line_stations(&repo, LineId::new(404))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
