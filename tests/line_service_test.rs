use subway_lines::core::dto::{LineRequest, LineUpdateRequest, SectionRequest};
use subway_lines::domain::ports::{LineRepository, StationRepository};
use subway_lines::{InMemoryLineRepository, InMemoryStationRepository, LineService, SubwayError};

struct Fixture {
    service: LineService<InMemoryLineRepository, InMemoryStationRepository>,
    lines: InMemoryLineRepository,
    yangjae: u64,
    jeongja: u64,
    pangyo: u64,
    gwanggyo: u64,
}

async fn fixture() -> Fixture {
    let stations = InMemoryStationRepository::new();
    let yangjae = stations.save("양재역").await.unwrap().id();
    let jeongja = stations.save("정자역").await.unwrap().id();
    let pangyo = stations.save("판교역").await.unwrap().id();
    let gwanggyo = stations.save("광교역").await.unwrap().id();

    let lines = InMemoryLineRepository::new();
    Fixture {
        service: LineService::new(lines.clone(), stations),
        lines,
        yangjae,
        jeongja,
        pangyo,
        gwanggyo,
    }
}

async fn create_sinbundang(f: &Fixture) -> u64 {
    f.service
        .create_line(LineRequest {
            name: "신분당선".to_string(),
            color: "bg-red-600".to_string(),
            up_station_id: f.yangjae,
            down_station_id: f.jeongja,
            distance: 10,
        })
        .await
        .unwrap()
        .id
}

fn names(response: &subway_lines::core::dto::SectionsResponse) -> Vec<(String, String, u64)> {
    response
        .sections
        .iter()
        .map(|s| {
            (
                s.up_station.name.clone(),
                s.down_station.name.clone(),
                s.distance,
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_and_find_line() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let line = f.service.find_line(line_id).await.unwrap();
    assert_eq!(line.name, "신분당선");
    assert_eq!(line.distance, 10);
    let stations: Vec<_> = line.stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stations, vec!["양재역", "정자역"]);

    assert_eq!(f.service.find_all_lines().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_line_with_unknown_station_fails() {
    let f = fixture().await;
    let result = f
        .service
        .create_line(LineRequest {
            name: "신분당선".to_string(),
            color: "bg-red-600".to_string(),
            up_station_id: f.yangjae,
            down_station_id: 999,
            distance: 10,
        })
        .await;

    assert!(matches!(result, Err(SubwayError::StationNotFound { .. })));
    assert!(f.lines.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_section_extends_down_terminus() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let response = f
        .service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.jeongja,
                down_station_id: f.gwanggyo,
                distance: 7,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        names(&response),
        vec![
            ("양재역".to_string(), "정자역".to_string(), 10),
            ("정자역".to_string(), "광교역".to_string(), 7),
        ]
    );
    assert!(response.sections.iter().all(|s| s.id.is_some()));
    assert_eq!(response.newest_section_id(), response.sections[1].id);
}

#[tokio::test]
async fn test_add_section_splits_and_remove_merges() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let split = f
        .service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.pangyo,
                down_station_id: f.jeongja,
                distance: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        names(&split),
        vec![
            ("양재역".to_string(), "판교역".to_string(), 7),
            ("판교역".to_string(), "정자역".to_string(), 3),
        ]
    );

    let merged = f.service.remove_section(line_id, f.pangyo).await.unwrap();
    assert_eq!(
        names(&merged),
        vec![("양재역".to_string(), "정자역".to_string(), 10)]
    );

    let line = f.service.find_line(line_id).await.unwrap();
    assert_eq!(line.distance, 10);
}

#[tokio::test]
async fn test_rejected_section_is_not_persisted() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let duplicate = f
        .service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.yangjae,
                down_station_id: f.jeongja,
                distance: 7,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(SubwayError::DuplicateSection { .. })));

    let too_long = f
        .service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.pangyo,
                down_station_id: f.jeongja,
                distance: 10,
            },
        )
        .await;
    assert!(matches!(too_long, Err(SubwayError::InvalidDistance { .. })));

    let disconnected = f
        .service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.pangyo,
                down_station_id: f.gwanggyo,
                distance: 3,
            },
        )
        .await;
    assert!(matches!(
        disconnected,
        Err(SubwayError::DisconnectedSection { .. })
    ));

    let stored = f.lines.find_by_id(line_id).await.unwrap().unwrap();
    assert_eq!(stored.sections().len(), 1);
    assert_eq!(stored.version(), 1);
}

#[tokio::test]
async fn test_remove_rules() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let last = f.service.remove_section(line_id, f.jeongja).await;
    assert!(matches!(last, Err(SubwayError::LastSectionRemoval)));

    f.service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.jeongja,
                down_station_id: f.gwanggyo,
                distance: 7,
            },
        )
        .await
        .unwrap();

    let absent = f.service.remove_section(line_id, f.pangyo).await;
    assert!(matches!(absent, Err(SubwayError::StationNotFound { .. })));

    let unknown_id = f.service.remove_section(line_id, 999).await;
    assert!(matches!(unknown_id, Err(SubwayError::StationNotFound { .. })));

    let remaining = f.service.remove_section(line_id, f.yangjae).await.unwrap();
    assert_eq!(
        names(&remaining),
        vec![("정자역".to_string(), "광교역".to_string(), 7)]
    );
}

#[tokio::test]
async fn test_update_and_delete_line() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    let updated = f
        .service
        .update_line(
            line_id,
            LineUpdateRequest {
                name: "구분당선".to_string(),
                color: "bg-blue-600".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "구분당선");
    assert_eq!(updated.stations.len(), 2);

    f.service.delete_line(line_id).await.unwrap();
    assert!(matches!(
        f.service.find_line(line_id).await,
        Err(SubwayError::LineNotFound { .. })
    ));
    assert!(matches!(
        f.service.delete_line(line_id).await,
        Err(SubwayError::LineNotFound { .. })
    ));
}

#[tokio::test]
async fn test_interleaved_mutation_is_detected() {
    let f = fixture().await;
    let line_id = create_sinbundang(&f).await;

    // Two callers read the same version of the line.
    let mut first = f.lines.find_by_id(line_id).await.unwrap().unwrap();
    let second = f.lines.find_by_id(line_id).await.unwrap().unwrap();

    first.rename("구분당선", "bg-blue-600").unwrap();
    f.lines.save(first).await.unwrap();

    let result = f.lines.save(second).await;
    assert!(matches!(
        result,
        Err(SubwayError::ConcurrentModification { .. })
    ));

    // The service always reloads, so it sees the newer version.
    f.service
        .add_section(
            line_id,
            SectionRequest {
                up_station_id: f.jeongja,
                down_station_id: f.gwanggyo,
                distance: 7,
            },
        )
        .await
        .unwrap();
    let line = f.service.find_line(line_id).await.unwrap();
    assert_eq!(line.name, "구분당선");
    assert_eq!(line.stations.len(), 3);
}

#[tokio::test]
async fn test_huge_distances_fail_instead_of_overflowing() {
    let f = fixture().await;
    let line_id = f
        .service
        .create_line(LineRequest {
            name: "신분당선".to_string(),
            color: "bg-red-600".to_string(),
            up_station_id: f.yangjae,
            down_station_id: f.pangyo,
            distance: i64::MAX,
        })
        .await
        .unwrap()
        .id;
    for (up, down) in [(f.pangyo, f.jeongja), (f.jeongja, f.gwanggyo)] {
        let result = f
            .service
            .add_section(
                line_id,
                SectionRequest {
                    up_station_id: up,
                    down_station_id: down,
                    distance: i64::MAX,
                },
            )
            .await;
        assert!(result.is_ok());
    }

    assert!(matches!(
        f.service.find_line(line_id).await,
        Err(SubwayError::InvalidDistance { .. })
    ));

    f.service.remove_section(line_id, f.pangyo).await.unwrap();
    let merge = f.service.remove_section(line_id, f.jeongja).await;
    assert!(matches!(merge, Err(SubwayError::InvalidDistance { .. })));

    let stored = f.lines.find_by_id(line_id).await.unwrap().unwrap();
    assert_eq!(stored.sections().len(), 2);
}
