//! End-to-end pipeline tests against a scaffolded extension project.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use wext_config::{BrowserId, BuildEnvironment, ConfigError, Mode, PageConfig, ProjectConfig};
use wext_pipeline::Pipeline;

/// Lay down a minimal but complete extension project: three script units,
/// two UI pages, a manifest, a package descriptor, and one static asset.
fn scaffold(root: &Path) -> ProjectConfig {
    fs::create_dir_all(root.join("src/background")).unwrap();
    fs::create_dir_all(root.join("src/popup")).unwrap();
    fs::create_dir_all(root.join("src/options")).unwrap();
    fs::create_dir_all(root.join("static/views")).unwrap();
    fs::create_dir_all(root.join("static/assets/icons")).unwrap();

    fs::write(root.join("src/background/index.js"), "startBackground();\n").unwrap();
    fs::write(root.join("src/popup/popup.css"), ".popup { width: 320px }\n").unwrap();
    fs::write(
        root.join("src/popup/index.jsx"),
        "import './popup.css';\nrenderPopup();\n",
    )
    .unwrap();
    fs::write(root.join("src/options/index.jsx"), "renderOptions();\n").unwrap();

    fs::write(
        root.join("src/manifest.json"),
        r#"{ "name": "demo-extension", "version": "0.0.1", "manifest_version": 2 }"#,
    )
    .unwrap();
    fs::write(
        root.join("package.json"),
        r#"{ "name": "demo-extension", "version": "1.0.0" }"#,
    )
    .unwrap();

    let template = "<html>\n<head>\n  <title>{}</title>\n</head>\n<body>\n  <div id=\"root\"></div>\n</body>\n</html>\n";
    fs::write(root.join("static/views/popup.html"), template).unwrap();
    fs::write(root.join("static/views/options.html"), template).unwrap();

    fs::write(root.join("static/assets/icons/16.png"), [0x89u8, 0x50]).unwrap();

    let mut entries = BTreeMap::new();
    entries.insert(
        "background".to_string(),
        PathBuf::from("src/background/index.js"),
    );
    entries.insert("popup".to_string(), PathBuf::from("src/popup/index.jsx"));
    entries.insert(
        "options".to_string(),
        PathBuf::from("src/options/index.jsx"),
    );

    ProjectConfig {
        root: root.to_path_buf(),
        entries,
        manifest: PathBuf::from("src/manifest.json"),
        pages: vec![
            PageConfig {
                name: "popup".to_string(),
                template: None,
                filename: None,
                entries: None,
            },
            PageConfig {
                name: "options".to_string(),
                template: None,
                filename: None,
                entries: None,
            },
        ],
        views: PathBuf::from("static/views"),
        static_assets: PathBuf::from("static/assets"),
        package_json: PathBuf::from("package.json"),
        use_package_version: true,
    }
}

async fn build(root: &Path, mode: Mode, browser: BrowserId) -> wext_pipeline::BuildReport {
    let project = scaffold(root);
    let env = BuildEnvironment::new(mode, browser);
    let pipeline = Pipeline::new(env, project).unwrap();
    pipeline.run().await.unwrap()
}

#[tokio::test]
async fn full_build_produces_expected_tree() {
    let dir = tempfile::tempdir().unwrap();
    let report = build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    let root = dir.path().join("dist/production/chrome");
    assert!(root.join("js/background.bundle.js").is_file());
    assert!(root.join("js/popup.bundle.js").is_file());
    assert!(root.join("js/options.bundle.js").is_file());
    assert!(root.join("css/popup.css").is_file());
    assert!(root.join("assets/icons/16.png").is_file());
    assert!(root.join("popup.html").is_file());
    assert!(root.join("options.html").is_file());
    assert!(root.join("manifest.json").is_file());

    assert_eq!(report.bundles, 3);
    assert_eq!(report.pages, 2);
    assert_eq!(report.archive, dir.path().join("dist/production/chrome.zip"));
    assert!(report.archive.is_file());
}

#[tokio::test]
async fn archive_extension_follows_browser_family() {
    for (browser, ext) in [
        (BrowserId::Chrome, "zip"),
        (BrowserId::Edge, "zip"),
        (BrowserId::Opera, "crx"),
        (BrowserId::Firefox, "xpi"),
        (BrowserId::Other("vivaldi".to_string()), "zip"),
    ] {
        let dir = tempfile::tempdir().unwrap();
        let report = build(dir.path(), Mode::Production, browser.clone()).await;
        assert_eq!(
            report.archive.extension().unwrap().to_str().unwrap(),
            ext,
            "browser {browser} should package as .{ext}"
        );
        // Exactly one archive per build.
        let pair_dir = dir.path().join("dist/production");
        let archives = fs::read_dir(&pair_dir)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().is_file())
            .count();
        assert_eq!(archives, 1);
    }
}

#[tokio::test]
async fn rebuild_reproduces_identical_pages_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    let root = dir.path().join("dist/production/chrome");
    let popup_first = fs::read(root.join("popup.html")).unwrap();
    let manifest_first = fs::read(root.join("manifest.json")).unwrap();

    build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    assert_eq!(fs::read(root.join("popup.html")).unwrap(), popup_first);
    assert_eq!(fs::read(root.join("manifest.json")).unwrap(), manifest_first);
}

#[tokio::test]
async fn clean_leaves_sibling_pairs_untouched() {
    let dir = tempfile::tempdir().unwrap();
    build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    let chrome_root = dir.path().join("dist/production/chrome");
    let marker = chrome_root.join("marker.txt");
    fs::write(&marker, "keep me").unwrap();

    build(dir.path(), Mode::Development, BrowserId::Firefox).await;

    assert!(marker.is_file());
    assert!(dir.path().join("dist/production/chrome.zip").is_file());
    assert!(dir.path().join("dist/development/firefox.xpi").is_file());
}

#[tokio::test]
async fn stale_output_is_removed_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join("dist/production/chrome/js/old.bundle.js");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "stale();").unwrap();

    build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    assert!(!stale.exists());
    assert!(dir
        .path()
        .join("dist/production/chrome/js/background.bundle.js")
        .is_file());
}

#[tokio::test]
async fn pages_reference_only_their_bound_bundles() {
    let dir = tempfile::tempdir().unwrap();
    build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    let root = dir.path().join("dist/production/chrome");
    let popup = fs::read_to_string(root.join("popup.html")).unwrap();
    assert!(popup.contains("js/popup.bundle.js"));
    assert!(popup.contains("css/popup.css"));
    assert!(!popup.contains("options.bundle.js"));
    assert!(!popup.contains("background.bundle.js"));

    let options = fs::read_to_string(root.join("options.html")).unwrap();
    assert!(options.contains("js/options.bundle.js"));
    assert!(!options.contains("popup.bundle.js"));
    // Options imports no stylesheet, so no link tag is injected.
    assert!(!options.contains("css/options.css"));
}

#[tokio::test]
async fn manifest_version_comes_from_package_descriptor() {
    for version in ["1.0.0", "2.3.4-beta"] {
        let dir = tempfile::tempdir().unwrap();
        let mut project = scaffold(dir.path());
        fs::write(
            dir.path().join("package.json"),
            format!(r#"{{ "name": "demo-extension", "version": "{version}" }}"#),
        )
        .unwrap();
        project.use_package_version = true;

        let env = BuildEnvironment::new(Mode::Production, BrowserId::Chrome);
        Pipeline::new(env, project).unwrap().run().await.unwrap();

        let manifest: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("dist/production/chrome/manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["version"].as_str(), Some(version));
    }
}

#[tokio::test]
async fn dangling_page_binding_fails_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = scaffold(dir.path());
    project.pages.push(PageConfig {
        name: "welcome".to_string(),
        template: None,
        filename: None,
        entries: Some(vec!["missingUnit".to_string()]),
    });

    let env = BuildEnvironment::new(Mode::Production, BrowserId::Chrome);
    let err = match Pipeline::new(env, project) {
        Ok(_) => panic!("expected a configuration error"),
        Err(err) => err,
    };
    assert!(matches!(err, ConfigError::DanglingPageBinding { .. }));
    assert!(!dir.path().join("dist").exists());
}

#[tokio::test]
async fn transform_failure_names_the_unit_and_stage() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = scaffold(dir.path());
    project
        .entries
        .insert("broken".to_string(), PathBuf::from("src/missing.js"));

    let env = BuildEnvironment::new(Mode::Production, BrowserId::Chrome);
    let err = Pipeline::new(env, project)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.stage, wext_pipeline::Stage::Scripts);
    assert!(err.to_string().contains("broken"));
}

#[tokio::test]
async fn failed_build_finishes_its_sibling_stage_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = scaffold(dir.path());
    project
        .entries
        .insert("broken".to_string(), PathBuf::from("src/missing.js"));

    let env = BuildEnvironment::new(Mode::Production, BrowserId::Chrome);
    let err = Pipeline::new(env, project)
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.stage, wext_pipeline::Stage::Scripts);

    // The concurrent manifest and asset tasks ran to completion before the
    // error surfaced; nothing is still writing into the output root.
    let root = dir.path().join("dist/production/chrome");
    assert!(root.join("manifest.json").is_file());
    assert!(root.join("assets/icons/16.png").is_file());
}

#[tokio::test]
async fn archive_holds_the_full_output_tree() {
    let dir = tempfile::tempdir().unwrap();
    let report = build(dir.path(), Mode::Production, BrowserId::Chrome).await;

    let mut zip =
        zip::ZipArchive::new(fs::File::open(&report.archive).unwrap()).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();

    for expected in [
        "manifest.json",
        "popup.html",
        "options.html",
        "js/background.bundle.js",
        "css/popup.css",
        "assets/icons/16.png",
    ] {
        assert!(
            names.iter().any(|name| name == expected),
            "archive missing {expected}"
        );
    }
}
