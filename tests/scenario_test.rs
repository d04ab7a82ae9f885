use std::io::Write;
use subway_lines::app::OutcomeStatus;
use subway_lines::utils::validation::Validate;
use subway_lines::{
    InMemoryLineRepository, InMemoryStationRepository, LineService, ScenarioConfig,
    ScenarioRunner, SubwayError,
};
use tempfile::NamedTempFile;

const SCENARIO: &str = r#"
[settings]
name = "신분당선"

[[stations]]
name = "양재역"

[[stations]]
name = "정자역"

[[stations]]
name = "판교역"

[[stations]]
name = "광교역"

[[lines]]
name = "신분당선"
color = "bg-red-600"
up_station = "양재역"
down_station = "정자역"
distance = 10

[[operations]]
type = "add_section"
line = "신분당선"
up_station = "정자역"
down_station = "광교역"
distance = 7

[[operations]]
type = "add_section"
line = "신분당선"
up_station = "판교역"
down_station = "정자역"
distance = 10

[[operations]]
type = "add_section"
line = "신분당선"
up_station = "판교역"
down_station = "정자역"
distance = 3

[[operations]]
type = "remove_section"
line = "신분당선"
station = "판교역"

[[operations]]
type = "show_line"
line = "신분당선"
"#;

fn runner(
    config: ScenarioConfig,
) -> ScenarioRunner<InMemoryLineRepository, InMemoryStationRepository> {
    let service = LineService::new(
        InMemoryLineRepository::new(),
        InMemoryStationRepository::new(),
    );
    ScenarioRunner::new(service, config)
}

#[tokio::test]
async fn test_scenario_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SCENARIO.as_bytes()).unwrap();

    let config = ScenarioConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let report = runner(config).run().await.unwrap();

    assert_eq!(report.stations.len(), 4);
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed, 1);

    let rejected = &report.outcomes[1];
    assert_eq!(rejected.status, OutcomeStatus::Error);
    assert_eq!(rejected.error.as_ref().unwrap().kind, "invalid_distance");

    let shown = report.outcomes[4].response.as_ref().unwrap();
    assert_eq!(shown["distance"], 17);
    let stations: Vec<&str> = shown["stations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(stations, vec!["양재역", "정자역", "광교역"]);
}

#[tokio::test]
async fn test_stop_on_error_aborts() {
    let mut config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
    config.settings.stop_on_error = true;

    let result = runner(config).run().await;
    assert!(matches!(result, Err(SubwayError::InvalidDistance { .. })));
}

#[tokio::test]
async fn test_unknown_names_are_reported_per_operation() {
    let config = ScenarioConfig::from_toml_str(
        r#"
[[stations]]
name = "양재역"

[[stations]]
name = "정자역"

[[lines]]
name = "신분당선"
color = "bg-red-600"
up_station = "양재역"
down_station = "정자역"
distance = 10

[[operations]]
type = "remove_section"
line = "신분당선"
station = "판교역"

[[operations]]
type = "delete_line"
line = "신분당선"

[[operations]]
type = "show_line"
line = "신분당선"

[[operations]]
type = "show_lines"
"#,
    )
    .unwrap();

    let report = runner(config).run().await.unwrap();
    let kinds: Vec<Option<&str>> = report
        .outcomes
        .iter()
        .map(|o| o.error.as_ref().map(|e| e.kind.as_str()))
        .collect();

    assert_eq!(
        kinds,
        vec![Some("station_not_found"), None, Some("line_not_found"), None]
    );
    assert_eq!(
        report.outcomes[3].response,
        Some(serde_json::json!([]))
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let result = ScenarioConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(SubwayError::IoError(_))));
}

#[tokio::test]
async fn test_renamed_line_is_addressed_by_new_name_only() {
    let config = ScenarioConfig::from_toml_str(
        r#"
[[stations]]
name = "양재역"

[[stations]]
name = "정자역"

[[lines]]
name = "신분당선"
color = "bg-red-600"
up_station = "양재역"
down_station = "정자역"
distance = 10

[[operations]]
type = "update_line"
line = "신분당선"
name = "구분당선"
color = "bg-blue-600"

[[operations]]
type = "show_line"
line = "구분당선"

[[operations]]
type = "show_line"
line = "신분당선"
"#,
    )
    .unwrap();

    let report = runner(config).run().await.unwrap();

    assert_eq!(report.outcomes[1].status, OutcomeStatus::Ok);
    assert_eq!(report.outcomes[2].status, OutcomeStatus::Error);
    assert_eq!(report.outcomes[2].error.as_ref().unwrap().kind, "config");
}

#[tokio::test]
async fn test_report_lines_reflect_final_state() {
    let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();

    let report = runner(config).run().await.unwrap();

    let line = &report.lines[0];
    assert_eq!(line.distance, 17);
    let stations: Vec<&str> = line.stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stations, vec!["양재역", "정자역", "광교역"]);
}
