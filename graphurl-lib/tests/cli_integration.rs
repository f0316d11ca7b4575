//! Integration tests that drive the command-line interface in-process.

use graphurl_lib::Host;
use graphurl_lib::query::{RenderMode, format_time, parse_url};
use serde_json::Value;
use std::path::Path;

/// Test host that captures output to in-memory buffers.
#[derive(Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

fn run(args: &[&str]) -> (TestHost, graphurl_lib::Result<()>) {
    let mut host = TestHost::default();
    let result = graphurl_lib::run(&mut host, core::iter::once("graphurl").chain(args.iter().copied()));
    (host, result)
}

fn write_file(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("Failed to write test file");
    path.to_string_lossy().into_owned()
}

const CONFIG: &str = r#"
uri = "http://graphite.example.com:8080/"
tz = "UTC"

[styles.default]
line_style = "connected"

[styles.dashboard]
font_size = 18

[[rewrite]]
pattern = "_sum$"
replacement = ""

[[rewrite]]
pattern = '^(world)'
replacement = 'hello.\1'
"#;

#[test]
fn test_render() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);

    let (host, result) = run(&[
        "render",
        "--config",
        &config,
        "--from",
        "-1d",
        "--until",
        "now",
        "--title",
        "CPU usage",
        "--min",
        "0",
        "--target",
        r#"alias(color(web01.cpu.user,"red"),"User")"#,
        "-t",
        "web01.cpu.system",
    ]);
    result.unwrap();

    insta::assert_snapshot!(
        host.output_str().trim_end(),
        @r#"http://graphite.example.com:8080/render/?width=586&height=308&fontSize=8&lineMode=connected&from=-1d&until=now&tz=UTC&title=CPU%20usage&yMin=0&target=alias(color(web01.cpu.user,"red"),"User")&target=web01.cpu.system"#
    );
}

#[test]
fn test_render_composer_with_overrides() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);

    let (host, result) = run(&[
        "render",
        "--config",
        &config,
        "--server",
        "http://other/",
        "--mode",
        "composer",
        "--style",
        "dashboard",
        "--width",
        "1000",
        "--target",
        "a.b",
    ]);
    result.unwrap();

    let query = parse_url(host.output_str().trim()).unwrap();
    assert_eq!(query.server(), "http://other");
    assert_eq!(query.style().width.get(), 1000);
    assert_eq!(query.style().font_size.get(), 18);
    assert_eq!(query.start(), format_time(0));
    assert!(host.output_str().starts_with("http://other/composer/?"));
}

#[test]
fn test_render_rejects_malformed_target() {
    let (_, result) = run(&["render", "--target", "sumSeries(a.b"]);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("offset"), "{err:#}");
}

#[test]
fn test_parse() {
    let url = r#"http://g:8080/graphite/render/?width=100&height=50&fontSize=9&from=-2h&until=now&title=Load%20avg&yMax=4.5&target=alias(color(web01.load.load1,"green"),"load1")&bogus=1"#;
    let (host, result) = run(&["parse", url]);
    result.unwrap();

    let json: Value = serde_json::from_str(&host.output_str()).unwrap();
    assert_eq!(json["server"], "http://g:8080/graphite");
    assert_eq!(json["from"], "-2h");
    assert_eq!(json["title"], "Load avg");
    assert_eq!(json["max"], 4.5);
    assert!(json.get("min").is_none());
    assert_eq!(json["style"]["width"], 100);
    assert_eq!(json["style"]["font_size"], 9);
    assert_eq!(json["targets"][0]["expression"], "web01.load.load1");
    assert_eq!(json["targets"][0]["alias"], "load1");
    assert_eq!(json["targets"][0]["color"], "green");
}

#[test]
fn test_metric() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);

    let (host, result) = run(&["metric", "--config", &config, "", "web 01", "Load", "load1_sum"]);
    result.unwrap();
    assert_eq!(host.output_str(), "web_01.Load.load1\n");

    let (host, result) = run(&["metric", "--config", &config, "worldx_sum"]);
    result.unwrap();
    assert_eq!(host.output_str(), "hello.worldx\n");
}

#[test]
fn test_graphs_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);

    let (host, result) = run(&[
        "graphs",
        "--config",
        &config,
        "--host",
        "web01",
        "--service",
        "Load",
        "--metric",
        "load1;5;10",
        "--metric",
        "load5",
        "--from",
        "0",
        "--until",
        "3600",
        "--json",
    ]);
    result.unwrap();

    let json: Value = serde_json::from_str(&host.output_str()).unwrap();
    let graphs = json.as_array().unwrap();
    assert_eq!(graphs.len(), 2);

    let first = parse_url(graphs[0]["img_src"].as_str().unwrap()).unwrap();
    assert_eq!(first.server(), "http://graphite.example.com:8080");
    assert_eq!(first.title(), Some("web01/Load - load1"));
    assert_eq!(first.timezone(), Some("UTC"));
    assert_eq!(first.start(), format_time(0));
    assert_eq!(first.end(), format_time(3600));
    assert_eq!(first.targets().len(), 3);
    assert_eq!(first.targets()[0].to_string(), r#"alias(color(web01.Load.load1,"green"),"load1")"#);
    assert_eq!(first.targets()[2].to_string(), r#"alias(color(constantLine(10),"red"),"Critical")"#);

    let link = graphs[0]["link"].as_str().unwrap();
    assert_eq!(link, first.url(RenderMode::Composer));

    let second = parse_url(graphs[1]["img_src"].as_str().unwrap()).unwrap();
    assert_eq!(second.targets().len(), 1);
}

#[test]
fn test_graphs_text_output() {
    let (host, result) = run(&["graphs", "--host", "web01", "--metric", "rta", "--from", "-1h", "--until", "now"]);
    result.unwrap();

    let output = host.output_str();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("link: "));
    assert!(lines[0].contains("/composer/?"));
    assert!(lines[1].starts_with("img_src: "));
    assert!(lines[1].contains("web01.__HOST__.rta"));
}

#[test]
fn test_template_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);
    let template = write_file(
        temp_dir.path(),
        "load.graph",
        r#"[{"title": "{host} load", "min": 0, "targets": [{"target": "{host}.{service}.load1", "alias": "1 min"}]}]"#,
    );

    let (host, result) = run(&[
        "template", &template, "--config", &config, "--host", "web01", "--service", "Load", "--json",
    ]);
    result.unwrap();

    let json: Value = serde_json::from_str(&host.output_str()).unwrap();
    let query = parse_url(json[0]["img_src"].as_str().unwrap()).unwrap();
    assert_eq!(query.title(), Some("web01 load"));
    assert_eq!(query.min(), Some(0.0));
    assert_eq!(query.targets()[0].to_string(), r#"alias(web01.Load.load1,"1 min")"#);
}

#[test]
fn test_template_lines() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "graphurl.toml", CONFIG);
    let template = write_file(
        temp_dir.path(),
        "load.graph",
        "${uri}render/?width=10&target=$host.$service.load1\n\n${uri}render/?target=$host.$service.load5\n",
    );

    let (host, result) = run(&[
        "template", &template, "--config", &config, "--host", "web01", "--source", "dashboard", "--json",
    ]);
    result.unwrap();

    let json: Value = serde_json::from_str(&host.output_str()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);

    let query = parse_url(json[1]["img_src"].as_str().unwrap()).unwrap();
    assert_eq!(query.style().font_size.get(), 18);
    assert_eq!(query.style().width.get(), 586);
    assert_eq!(query.targets()[0].to_string(), "web01.__HOST__.load5");
}

#[test]
fn test_template_missing_file() {
    let (_, result) = run(&["template", "/definitely/not/here.graph", "--host", "h"]);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("reading template file"));
}

#[test]
fn test_init_then_validate() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("graphurl.toml").to_string_lossy().into_owned();

    let (host, result) = run(&["init", &path]);
    result.unwrap();
    assert!(host.output_str().contains("Generated default configuration file"));

    let (host, result) = run(&["validate", "--config", &path]);
    result.unwrap();
    assert!(host.output_str().contains("Configuration file is valid"));
    assert!(host.exit_code.is_none());
}

#[test]
fn test_validate_reports_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_file(temp_dir.path(), "bad.toml", "uri = \"\"\n[styles.default]\n");

    let (host, result) = run(&["validate", "--config", &config]);
    let _ = result.unwrap_err();
    assert_eq!(host.exit_code, Some(1));
    assert!(String::from_utf8_lossy(&host.error_buf).contains("uri must not be empty"));
}
