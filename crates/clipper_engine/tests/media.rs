use std::sync::Mutex;

use clipper_core::ModuleNaming;
use clipper_engine::{
    download_assets, plan_assets, AssetFailurePolicy, ClipError, ClipEvent, FetchSettings,
    MediaSettings, PlannedAsset, ProgressSink, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use scraper::Html;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ClipEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<ClipEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ClipEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings(assets_dir: std::path::PathBuf, origin: &str) -> MediaSettings {
    MediaSettings {
        assets_dir,
        naming: ModuleNaming::new("Lesson", "1", "p"),
        origin: Url::parse(origin).unwrap(),
        on_error: AssetFailurePolicy::Abort,
    }
}

fn plan_for(html: &str, origin: &str) -> Vec<PlannedAsset> {
    let doc = Html::parse_document(html);
    let temp = std::env::temp_dir();
    plan_assets(doc.root_element(), &settings(temp, origin))
}

#[test]
fn assets_are_numbered_in_document_order() {
    let html = r#"
        <img src="/pics/a.png">
        <video><source src="/clips/b.mp4"></video>
        <audio src="/sounds/c.mp3"></audio>
    "#;
    let plan = plan_for(html, "https://ex.com/lesson/1");

    let filenames: Vec<_> = plan.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(filenames, vec!["p_1_1.png", "p_1_2.mp4", "p_1_3.mp3"]);
    assert_eq!(plan[0].url.as_str(), "https://ex.com/pics/a.png");
    assert_eq!(plan[1].url.as_str(), "https://ex.com/clips/b.mp4");
}

#[test]
fn sources_resolve_against_the_page_url() {
    // Leading-slash, relative, protocol-relative, and absolute all resolve.
    let html = r#"
        <img src="/abs.png">
        <img src="rel.png">
        <img src="//cdn.ex.com/c.png">
        <img src="https://other.com/d.png">
    "#;
    let plan = plan_for(html, "https://ex.com/course/lesson.html");

    let urls: Vec<_> = plan.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://ex.com/abs.png",
            "https://ex.com/course/rel.png",
            "https://cdn.ex.com/c.png",
            "https://other.com/d.png",
        ]
    );
}

#[test]
fn query_strings_do_not_leak_into_extensions() {
    let plan = plan_for(r#"<img src="/pics/a.png?v=2&w=100">"#, "https://ex.com");
    assert_eq!(plan[0].filename, "p_1_1.png");
}

#[test]
fn extensionless_sources_fall_back_to_bin() {
    let plan = plan_for(r#"<img src="/stream/media">"#, "https://ex.com");
    assert_eq!(plan[0].filename, "p_1_1.bin");
}

#[test]
fn sourceless_media_is_skipped() {
    let html = r#"<img src="/a.png"><video><p>no source</p></video><img src="/b.png">"#;
    let plan = plan_for(html, "https://ex.com");
    let filenames: Vec<_> = plan.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(filenames, vec!["p_1_1.png", "p_1_2.png"]);
}

#[test]
fn media_inside_dropped_subtrees_is_not_planned() {
    // The sanitizer strips figures and flattens anchors, so media under
    // either would be written but never referenced.
    let html = r#"
        <figure><img src="/figure.png"></figure>
        <a href="/x"><img src="/linked.png"></a>
        <img src="/kept.png">
    "#;
    let plan = plan_for(html, "https://ex.com");
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].url.as_str(), "https://ex.com/kept.png");
}

#[tokio::test]
async fn downloads_write_assets_and_produce_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pics/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"\x89PNG-bytes"[..], "image/png"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let html = r#"<img src="/pics/a.png">"#;
    let doc = Html::parse_document(html);
    let media = settings(temp.path().to_path_buf(), &server.uri());
    let plan = plan_assets(doc.root_element(), &media);

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let sink = RecordingSink::default();
    let (saved, rewrites) = download_assets(&fetcher, &plan, &media, &sink)
        .await
        .expect("downloads ok");

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].filename, "p_1_1.png");
    assert_eq!(std::fs::read(&saved[0].path).unwrap(), b"\x89PNG-bytes");
    assert_eq!(
        rewrites.get(&plan[0].node),
        Some(&"![[p_1_1.png]]".to_string())
    );
    assert!(sink.take().iter().any(|event| matches!(
        event,
        ClipEvent::AssetSaved { filename, .. } if filename == "p_1_1.png"
    )));
}

#[tokio::test]
async fn failed_download_aborts_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"ok"[..], "image/png"))
        .mount(&server)
        .await;
    // /broken.png is unmocked and returns 404.

    let temp = TempDir::new().unwrap();
    let html = r#"<img src="/ok.png"><img src="/broken.png">"#;
    let doc = Html::parse_document(html);
    let media = settings(temp.path().to_path_buf(), &server.uri());
    let plan = plan_assets(doc.root_element(), &media);

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = download_assets(&fetcher, &plan, &media, &RecordingSink::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClipError::Asset { ref url, .. } if url.ends_with("/broken.png")));
    // The first asset stays on disk; there is no rollback.
    assert!(temp.path().join("p_1_1.png").exists());
}

#[tokio::test]
async fn skip_policy_leaves_failed_elements_unrewritten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"ok"[..], "image/png"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let html = r#"<img src="/broken.png"><img src="/ok.png">"#;
    let doc = Html::parse_document(html);
    let mut media = settings(temp.path().to_path_buf(), &server.uri());
    media.on_error = AssetFailurePolicy::Skip;
    let plan = plan_assets(doc.root_element(), &media);

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let (saved, rewrites) = download_assets(&fetcher, &plan, &media, &RecordingSink::default())
        .await
        .expect("skip policy keeps going");

    // The failed element keeps its planned number; the survivor keeps its.
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].filename, "p_1_2.png");
    assert_eq!(rewrites.len(), 1);
    assert!(!rewrites.contains_key(&plan[0].node));
}
