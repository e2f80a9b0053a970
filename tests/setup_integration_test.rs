use anyhow::Result;
use aoc_setup::core::skeleton::SkeletonTemplate;
use aoc_setup::{AocClient, AocError, CliConfig, LocalStorage, PuzzleSession, SetupEngine, Settings};
use clap::Parser;
use httpmock::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const TOKEN: &str = "53616c7465645f5f6e6f74617265616c746f6b656e";

const PUZZLE_PAGE: &str = r#"<!DOCTYPE html><html><body><main>
<article class="day-desc"><h2>--- Day 4: Camp Cleanup ---</h2>
<p>For example, consider the following list of section assignment pairs:</p>
<pre><code>2-4,6-8
2-3,4-5
5-7,7-9
</code></pre>
<p>In how many assignment pairs does one range fully contain the other? <code><em>2</em></code></p>
</article>
<p>Your puzzle answer was <code>571</code>.</p>
<article class="day-desc"><h2 id="part2">--- Part Two ---</h2>
<p>So, in this example, the number of overlapping assignment pairs is <code><em>4</em></code>.</p>
</article>
</main></body></html>"#;

fn settings(root: &Path, server: &MockServer, extra: &[&str]) -> Settings {
    let root = root.to_str().unwrap().to_string();
    let base_url = server.base_url();
    let mut args: Vec<&str> = vec![
        "aoc-setup",
        "--year",
        "2022",
        "--day",
        "4",
        "--repo-root",
        root.as_str(),
        "--token",
        TOKEN,
        "--no-browser",
        "--base-url",
        base_url.as_str(),
    ];
    args.extend_from_slice(extra);
    let cli = CliConfig::try_parse_from(args).unwrap();
    Settings::resolve(&cli, None, chrono::Utc::now()).unwrap()
}

fn write_template(root: &Path) {
    let dir = root.join("tools/templates/day/src");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("main.cpp"),
        "// adventofcode.com/{{ year }}/day/{{ day }}\n// {{ title }}\n#include \"{{ lib_dir_relative }}/io.h\"\n",
    )
    .unwrap();
}

async fn run_setup(settings: Settings) -> aoc_setup::Result<aoc_setup::SetupReport> {
    let tokens = settings.token_chain()?;
    let client = AocClient::new(&settings.base_url, &settings.user_agent, settings.timeout)?;
    let session = PuzzleSession::new(settings.puzzle, tokens, client);
    let template = SkeletonTemplate::load(&settings.repo_root.join(&settings.template_dir))?;
    let storage = LocalStorage::new(settings.repo_root.clone());

    let mut engine = SetupEngine::new(session, storage, settings).with_template(template);
    engine.run().await
}

fn mock_site(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let cookie = format!("session={}", TOKEN);
    let input = server.mock(|when, then| {
        when.method(GET)
            .path("/2022/day/4/input")
            .header("cookie", cookie.as_str());
        then.status(200).body("2-4,6-8\n2-3,4-5\n");
    });
    let page = server.mock(|when, then| {
        when.method(GET)
            .path("/2022/day/4")
            .header("cookie", cookie.as_str());
        then.status(200)
            .header("Content-Type", "text/html")
            .body(PUZZLE_PAGE);
    });
    (input, page)
}

#[tokio::test]
async fn test_end_to_end_setup_writes_day_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_template(temp_dir.path());
    let server = MockServer::start();
    let (input_mock, page_mock) = mock_site(&server);

    let report = run_setup(settings(temp_dir.path(), &server, &[])).await?;

    input_mock.assert();
    page_mock.assert();
    assert_eq!(report.title.as_deref(), Some("Camp Cleanup"));
    assert_eq!(report.examples, 1);
    assert_eq!(report.answers, vec!["571".to_string()]);

    let day_dir = temp_dir.path().join("src/2022/04");
    assert_eq!(
        std::fs::read_to_string(day_dir.join("data/input.txt"))?,
        "2-4,6-8\n2-3,4-5\n"
    );
    assert_eq!(
        std::fs::read_to_string(day_dir.join("data/example.txt"))?,
        "2-4,6-8\n2-3,4-5\n5-7,7-9\n"
    );

    let examples: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(day_dir.join("data/examples.json"))?)?;
    assert_eq!(examples[0]["answer_a"], "2");
    assert_eq!(examples[0]["answer_b"], "4");

    let main_cpp = std::fs::read_to_string(day_dir.join("src/main.cpp"))?;
    assert!(main_cpp.contains("// adventofcode.com/2022/day/4"));
    assert!(main_cpp.contains("// Camp Cleanup"));
    assert!(main_cpp.contains("#include \"../../lib/io.h\""));
    Ok(())
}

#[tokio::test]
async fn test_second_run_keeps_existing_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_template(temp_dir.path());
    let server = MockServer::start();
    let (input_mock, _page_mock) = mock_site(&server);

    run_setup(settings(temp_dir.path(), &server, &[])).await?;

    let main_cpp = temp_dir.path().join("src/2022/04/src/main.cpp");
    std::fs::write(&main_cpp, "// my solution\n")?;

    let report = run_setup(settings(temp_dir.path(), &server, &[])).await?;

    input_mock.assert_hits(1);
    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), 4);
    assert_eq!(std::fs::read_to_string(&main_cpp)?, "// my solution\n");
    Ok(())
}

#[tokio::test]
async fn test_force_refetches_and_overwrites() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_template(temp_dir.path());
    let server = MockServer::start();
    let (input_mock, _page_mock) = mock_site(&server);

    run_setup(settings(temp_dir.path(), &server, &[])).await?;
    let report = run_setup(settings(temp_dir.path(), &server, &["--force"])).await?;

    input_mock.assert_hits(2);
    assert_eq!(report.written.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_leaves_repo_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_template(temp_dir.path());
    let server = MockServer::start();
    mock_site(&server);

    let report = run_setup(settings(temp_dir.path(), &server, &["--dry-run"])).await?;

    assert_eq!(report.planned.len(), 4);
    assert!(report.written.is_empty());
    assert!(!temp_dir.path().join("src").exists());
    Ok(())
}

#[tokio::test]
async fn test_rejected_session_surfaces_as_auth_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/2022/day/4");
        then.status(200).body(PUZZLE_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/2022/day/4/input");
        then.status(400)
            .body("Puzzle inputs differ by user.  Please log in to get your puzzle input.");
    });

    let err = run_setup(settings(temp_dir.path(), &server, &["--skip-skeleton"]))
        .await
        .unwrap_err();

    assert!(matches!(err, AocError::InvalidSession { status: 400 }));
    assert_eq!(err.exit_code(), 1);
    assert!(!temp_dir.path().join("src/2022/04/data/input.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_template_is_not_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    mock_site(&server);

    let report = run_setup(settings(temp_dir.path(), &server, &[])).await?;

    assert_eq!(report.written.len(), 3);
    assert!(temp_dir.path().join("src/2022/04/data/input.txt").exists());
    Ok(())
}
