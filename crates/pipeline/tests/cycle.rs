use std::fs;
use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use ecochart_data::FilterSpec;
use ecochart_data::error::FetchError;
use ecochart_data::source::Source;
use ecochart_pipeline::Pipeline;
use ecochart_pipeline::PipelineError;
use ecochart_pipeline::ScenarioConfig;
use ecochart_pipeline::UiState;
use ecochart_vis::render::Render;
use ecochart_vis::render::output::OutputFile;
use ecochart_vis::render::output::PAGE_FILE_NAME;
use ecochart_vis::render::page::Page;
use ecochart_vis::render::surface::Surface;
use ecochart_vis::scene::Shape;
use serde_json::json;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), value.to_string()).unwrap();
}

fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buffer = [0u8; 1024];
        let _ = stream.read(&mut buffer);

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
            len = body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{address}")
}

fn emissions() -> serde_json::Value {
    json!([
        { "jahr": 1990, "emission": 120.5, "thg": "CO2", "untergruppe": "Abfallverbrennung" },
        { "jahr": 1991, "emission": 98.0, "thg": "CO2", "untergruppe": "Abfallverbrennung" },
        { "jahr": 1991, "emission": 40.0, "thg": "CH4", "untergruppe": "Abfallverbrennung" },
        { "jahr": 1992, "emission": 77.0, "thg": "CO2", "untergruppe": "Verkehr" },
    ])
}

#[test]
fn render_bar_chart_page_from_local_data() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_json(data.path(), "data.json", emissions());

    let scenario = ScenarioConfig::builtin("bar-chart").unwrap();
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data.path())));

    let scene = pipeline.render_cycle(&UiState::default()).unwrap();
    let keys: Vec<_> = scene.elements.iter().map(|e| e.data.key.as_str()).collect();
    assert_eq!(keys, vec!["1990", "1991"]);

    let mut surface = Surface::new(&scenario.target);
    surface.draw(&scene).unwrap();
    let mut file = OutputFile::new(out.path(), PAGE_FILE_NAME).unwrap();
    Page::new(&scenario.title, &surface).render(&mut file).unwrap();
    let path = file.finish().unwrap();

    let html = fs::read_to_string(path).unwrap();
    assert!(html.contains(r#"<div id="container"><svg"#));
    assert!(html.contains("<title>1990: 120.50</title>"));
    assert!(html.contains("Emissions CO2 (tons per year)"));
}

#[test]
fn render_icon_grid_with_a_missing_icon() {
    let data = tempfile::tempdir().unwrap();
    write_json(
        data.path(),
        "food-data.json",
        json!({
            "screen_time_data": {
                "less_than_3_hours": { "banana": 2.2, "tomato": 1.0 },
                "greater_than_7_hours": { "banana": 9.0, "tomato": 4.0 }
            }
        }),
    );
    fs::create_dir(data.path().join("food")).unwrap();
    fs::write(
        data.path().join("food/banana.svg"),
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 10"><path d="M0 0h20v10z"/></svg>"#,
    )
    .unwrap();

    let scenario = ScenarioConfig::builtin("screen-time-icons").unwrap();
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data.path())));

    let highlighted = UiState::new(scenario.controls.clone());
    let scene = pipeline.render_cycle(&highlighted).unwrap();
    assert_eq!(scene.elements.len(), 2);
    assert!(scene
        .elements
        .iter()
        .all(|e| matches!(e.shape, Shape::Icon { asset: Some(_), .. })));

    let everything = UiState::new(FilterSpec::new(Some(String::from("more7")), Vec::new(), None));
    let scene = pipeline.render_cycle(&everything).unwrap();
    let blank = scene
        .elements
        .iter()
        .filter(|e| matches!(e.shape, Shape::Icon { asset: None, .. }))
        .count();
    assert_eq!(scene.elements.len(), 13);
    assert_eq!(blank, 4);
}

#[test]
fn fetch_dataset_over_http() {
    let base = serve_once("200 OK", emissions().to_string());
    let scenario = ScenarioConfig::parse(&format!(
        r#"
            name = "remote"
            source = "{base}/data.json"

            [transform]
            kind = "group-sum"
            key_field = "jahr"
            value_field = "emission"

            [layout]
            kind = "stack"
        "#
    ))
    .unwrap();
    let data = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data.path())));

    let scene = pipeline.render_cycle(&UiState::default()).unwrap();

    let values: Vec<_> = scene.elements.iter().map(|e| e.data.value).collect();
    assert_eq!(values, vec![120.5, 138.0, 77.0]);
}

#[test]
fn http_failure_aborts_the_cycle() {
    let base = serve_once("503 Service Unavailable", String::new());
    let scenario = ScenarioConfig::parse(&format!(
        r#"
            name = "remote"
            source = "{base}/data.json"

            [transform]
            kind = "multi-field-sum"
            fields = ["food_emissions_beef"]

            [layout]
            kind = "stack"
        "#
    ))
    .unwrap();
    let data = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data.path())));

    let error = pipeline.render_cycle(&UiState::default()).unwrap_err();

    assert!(matches!(error, PipelineError::Fetch(FetchError::Http { .. })));
    assert_eq!(error.alert_message(), "HTTP-Error: 503");
}

#[test]
fn unknown_combination_is_reported_to_the_page() {
    let data = tempfile::tempdir().unwrap();
    write_json(
        data.path(),
        "phone_usage_food_emissions.json",
        json!({
            "less_than_3_hours": {
                "Instagram, TikTok": { "Food Equivalents": { "Banana": 3.4 } }
            }
        }),
    );

    let scenario = ScenarioConfig::builtin("app-food-icons").unwrap();
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data.path())));

    let known = FilterSpec::new(
        Some(String::from("less_than_3_hours")),
        vec![String::from("TikTok"), String::from("Instagram")],
        None,
    );
    let scene = pipeline.render_cycle(&UiState::new(known)).unwrap();
    assert_eq!(scene.elements.len(), 3);

    let unknown = FilterSpec::new(Some(String::from("less_than_3_hours")), vec![String::from("Gaming")], None);
    let error = pipeline.render_cycle(&UiState::new(unknown)).unwrap_err();
    assert_eq!(error.alert_message(), "No data available for this combination!");

    let none = FilterSpec::new(Some(String::from("less_than_3_hours")), Vec::new(), None);
    let error = pipeline.render_cycle(&UiState::new(none)).unwrap_err();
    assert_eq!(error.alert_message(), "Please select at least one app!");
}
