use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use artboards_core::{
    ArtboardListing, ExportConfig, ExportFormat, ExportJob, ExportScale, ListedArtboard,
    ListedPage,
};
use artboards_sync::{
    pipeline::{run, ExportRequest},
    DesignTool, ReconcileOutcome, SyncError, VersionControl,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory design file: pages of artboards plus the bytes each renders to.
struct FakeTool {
    pages: Vec<(String, Vec<String>)>,
    renders: HashMap<String, Vec<u8>>,
    skip: Vec<String>,
    fail_export: bool,
    raw_listing: Option<Vec<u8>>,
    jobs: RefCell<Vec<ExportJob>>,
}

impl FakeTool {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(p, boards)| (p.to_string(), boards.iter().map(|b| b.to_string()).collect()))
                .collect(),
            renders: HashMap::new(),
            skip: Vec::new(),
            fail_export: false,
            raw_listing: None,
            jobs: RefCell::new(Vec::new()),
        }
    }

    fn render(mut self, artboard: &str, bytes: &[u8]) -> Self {
        self.renders.insert(artboard.to_string(), bytes.to_vec());
        self
    }
}

impl DesignTool for FakeTool {
    fn list_artboards(&self, _source: &Path) -> Result<ArtboardListing, SyncError> {
        if let Some(raw) = &self.raw_listing {
            return artboards_sync::tool::parse_listing(raw);
        }
        Ok(ArtboardListing {
            pages: self
                .pages
                .iter()
                .map(|(name, boards)| ListedPage {
                    name: name.clone(),
                    artboards: boards
                        .iter()
                        .map(|b| ListedArtboard { name: b.clone() })
                        .collect(),
                })
                .collect(),
        })
    }

    fn export_artboards(&self, job: &ExportJob) -> Result<(), SyncError> {
        self.jobs.borrow_mut().push(job.clone());
        if self.fail_export {
            return Err(SyncError::Tool {
                program: PathBuf::from("sketchtool"),
                action: "export artboards".into(),
                status: "exit status: 1".into(),
                stderr: "document is damaged".into(),
            });
        }
        for item in &job.items {
            if self.skip.contains(item) {
                continue;
            }
            let bytes = self
                .renders
                .get(item)
                .cloned()
                .unwrap_or_else(|| format!("pixels of {item}").into_bytes());
            let path = job.output_path_for(item);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("fake export dirs");
            }
            fs::write(path, bytes).expect("fake export write");
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingVcs {
    staged: RefCell<Vec<PathBuf>>,
    fail: bool,
}

impl VersionControl for RecordingVcs {
    fn stage(&self, path: &Path) -> Result<(), SyncError> {
        if self.fail {
            return Err(SyncError::Vcs {
                path: path.to_path_buf(),
                message: "not a git repository".into(),
            });
        }
        self.staged.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(overview: bool) -> ExportConfig {
    ExportConfig {
        export_folder: PathBuf::from("out"),
        export_format: ExportFormat::default(),
        export_scale: ExportScale::default(),
        include_overview_file: overview,
        sketchtool: PathBuf::from("sketchtool"),
        stage_with_git: true,
    }
}

fn request(proj: &TempDir, overview: bool) -> ExportRequest {
    ExportRequest {
        source: proj.path().join("Design.sketch"),
        config: config(overview),
        dry_run: false,
    }
}

fn staging_dir(proj: &TempDir) -> PathBuf {
    proj.path().join(".oldArtboards")
}

fn dest(proj: &TempDir) -> PathBuf {
    proj.path().join("out").join("Design")
}

fn dir_snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| {
            (
                e.file_name().to_string_lossy().into_owned(),
                fs::read(e.path()).expect("read file"),
            )
        })
        .collect();
    files.sort();
    files
}

fn age_files(dir: &Path) -> FileTime {
    let old = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(24 * 60 * 60));
    for entry in fs::read_dir(dir).expect("read dir").filter_map(|e| e.ok()) {
        set_file_mtime(entry.path(), old).expect("set mtime");
    }
    old
}

fn mtime(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::metadata(path).expect("metadata"))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn ignored_page_is_not_exported() {
    init_logging();
    let proj = TempDir::new().expect("proj");
    fs::write(proj.path().join(".sketchignore"), "^Details/\n").expect("ignore file");
    let tool = FakeTool::new(&[("Cover", &["Hero"]), ("Details", &["Panel"])]);
    let vcs = RecordingVcs::default();

    let report = run(&request(&proj, false), &tool, &vcs).expect("export");

    assert_eq!(report.artboards, vec!["Hero"]);
    assert_eq!(report.ignored, 1);
    assert_eq!(tool.jobs.borrow()[0].items_arg(), "Hero");
    assert!(dest(&proj).join("Hero.png").is_file());
    assert!(!dest(&proj).join("Panel.png").exists());
    assert!(matches!(report.outcomes[0], ReconcileOutcome::Added { .. }));
    assert_eq!(*vcs.staged.borrow(), vec![proj.path().join("out")]);
    assert!(!staging_dir(&proj).exists());
}

#[test]
fn gallery_is_written_and_staged() {
    let proj = TempDir::new().expect("proj");
    fs::write(proj.path().join(".sketchignore"), "^Details/\n").expect("ignore file");
    let tool = FakeTool::new(&[("Cover", &["Hero"]), ("Details", &["Panel"])]);
    let vcs = RecordingVcs::default();

    let report = run(&request(&proj, true), &tool, &vcs).expect("export");

    let gallery_path = proj.path().join("Design-boards.md");
    assert_eq!(report.gallery.as_deref(), Some(gallery_path.as_path()));
    let gallery = fs::read_to_string(&gallery_path).expect("gallery");
    assert!(gallery.starts_with("# Artboards"));
    assert!(gallery.contains("## Hero"));
    assert!(gallery.contains("![Hero](./out/Design/Hero.png)"));
    assert!(!gallery.contains("Panel"));
    assert_eq!(
        *vcs.staged.borrow(),
        vec![proj.path().join("out"), gallery_path]
    );
}

#[test]
fn gallery_lists_every_artboard_in_export_order() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Page", &["b", "A", "c"])]);
    run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("first");
    // Second run restores everything; the gallery must still list all three.
    run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("second");

    let gallery = fs::read_to_string(proj.path().join("Design-boards.md")).expect("gallery");
    let positions: Vec<usize> = ["## A", "## b", "## c"]
        .iter()
        .map(|h| gallery.find(h).expect("heading"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{gallery}");
    assert_eq!(gallery.matches("## ").count(), 3);
}

#[test]
fn second_run_without_changes_restores_every_file() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Cover", &["Hero", "About"])]);

    run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("first");
    let before = dir_snapshot(&dest(&proj));
    let old_time = age_files(&dest(&proj));

    let report = run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("second");

    assert_eq!(report.unchanged_count(), 2);
    assert_eq!(report.written_count(), 0);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o, ReconcileOutcome::Unchanged { .. })));
    assert_eq!(dir_snapshot(&dest(&proj)), before);
    assert_eq!(mtime(&dest(&proj).join("Hero.png")), old_time, "previous file must be kept");
    assert_eq!(mtime(&dest(&proj).join("About.png")), old_time);
    assert!(!staging_dir(&proj).exists());
}

#[test]
fn changed_artboard_gets_new_bytes_others_keep_old_file() {
    let proj = TempDir::new().expect("proj");
    let first = FakeTool::new(&[("Site", &["Home", "Pricing"])]).render("Home", b"home v1");
    run(&request(&proj, false), &first, &RecordingVcs::default()).expect("first");
    let old_time = age_files(&dest(&proj));

    let second = FakeTool::new(&[("Site", &["Home", "Pricing"])]).render("Home", b"home v2");
    let report = run(&request(&proj, false), &second, &RecordingVcs::default()).expect("second");

    let by_name: HashMap<&str, &ReconcileOutcome> =
        report.outcomes.iter().map(|o| (o.artboard(), o)).collect();
    assert!(matches!(by_name["Home"], ReconcileOutcome::Changed { .. }));
    assert!(matches!(by_name["Pricing"], ReconcileOutcome::Unchanged { .. }));

    assert_eq!(fs::read(dest(&proj).join("Home.png")).unwrap(), b"home v2");
    assert_ne!(mtime(&dest(&proj).join("Home.png")), old_time);
    assert_eq!(mtime(&dest(&proj).join("Pricing.png")), old_time);
}

#[test]
fn dropped_artboard_is_reported_and_removed() {
    let proj = TempDir::new().expect("proj");
    let first = FakeTool::new(&[("Cover", &["Hero", "Legacy"])]);
    run(&request(&proj, false), &first, &RecordingVcs::default()).expect("first");

    let second = FakeTool::new(&[("Cover", &["Hero"])]);
    let report = run(&request(&proj, false), &second, &RecordingVcs::default()).expect("second");

    assert_eq!(report.removed, vec!["Legacy.png"]);
    assert!(!dest(&proj).join("Legacy.png").exists());
    assert!(!staging_dir(&proj).exists());
}

#[test]
fn slash_named_artboard_is_restored_not_reported_removed() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Mobile", &["Nav/Home", "Hero"])]);
    run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("first");
    let old_time = age_files(&dest(&proj).join("Nav"));

    let report = run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("second");

    assert_eq!(report.written_count(), 0);
    assert!(report.removed.is_empty(), "removed: {:?}", report.removed);
    let nested = dest(&proj).join("Nav").join("Home.png");
    assert_eq!(fs::read(&nested).unwrap(), b"pixels of Nav/Home");
    assert_eq!(mtime(&nested), old_time);

    let gallery = fs::read_to_string(proj.path().join("Design-boards.md")).expect("gallery");
    assert!(gallery.contains("![Nav/Home](./out/Design/Nav/Home.png)"), "{gallery}");
}

#[test]
fn dropped_nested_artboard_is_reported_by_relative_path() {
    let proj = TempDir::new().expect("proj");
    let first = FakeTool::new(&[("Mobile", &["Nav/Home", "Nav/Settings"])]);
    run(&request(&proj, false), &first, &RecordingVcs::default()).expect("first");

    let second = FakeTool::new(&[("Mobile", &["Nav/Home"])]);
    let report = run(&request(&proj, false), &second, &RecordingVcs::default()).expect("second");

    assert_eq!(report.removed, vec!["Nav/Settings.png"]);
    assert!(!dest(&proj).join("Nav").join("Settings.png").exists());
}

#[test]
fn same_name_on_two_pages_is_unchanged_on_rerun() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("A", &["Hero"]), ("B", &["Hero"])]);
    run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("first");

    let report = run(&request(&proj, true), &tool, &RecordingVcs::default()).expect("second");

    assert_eq!(report.artboards, vec!["Hero", "Hero"]);
    assert_eq!(report.written_count(), 0);
    assert_eq!(report.unchanged_count(), 2);
    assert!(dest(&proj).join("Hero.png").is_file());

    let gallery = fs::read_to_string(proj.path().join("Design-boards.md")).expect("gallery");
    assert_eq!(gallery.matches("## Hero").count(), 2, "one section per artboard");
}

#[test]
fn format_change_writes_new_extension() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("png run");

    let mut jpg = request(&proj, false);
    jpg.config.export_format = ExportFormat::from("jpg");
    let report = run(&jpg, &tool, &RecordingVcs::default()).expect("jpg run");

    assert!(matches!(report.outcomes[0], ReconcileOutcome::Added { .. }));
    assert_eq!(report.removed, vec!["Hero.png"]);
    assert!(dest(&proj).join("Hero.jpg").is_file());
    assert!(!dest(&proj).join("Hero.png").exists());
}

// ---------------------------------------------------------------------------
// Failure paths and staging invariant
// ---------------------------------------------------------------------------

#[test]
fn failed_export_leaves_no_staging_and_retry_succeeds() {
    let proj = TempDir::new().expect("proj");
    let good = FakeTool::new(&[("Cover", &["Hero"])]);
    run(&request(&proj, false), &good, &RecordingVcs::default()).expect("first");

    let mut broken = FakeTool::new(&[("Cover", &["Hero"])]);
    broken.fail_export = true;
    let err = run(&request(&proj, false), &broken, &RecordingVcs::default()).unwrap_err();
    assert!(matches!(err, SyncError::Tool { .. }), "got: {err}");
    assert!(!staging_dir(&proj).exists(), "staging must not survive a failed run");

    let report = run(&request(&proj, false), &good, &RecordingVcs::default()).expect("retry");
    assert_eq!(report.artboards, vec!["Hero"]);
    assert!(dest(&proj).join("Hero.png").is_file());
    assert!(!staging_dir(&proj).exists());
}

#[test]
fn stale_staging_from_crashed_run_is_cleared() {
    let proj = TempDir::new().expect("proj");
    let stale = staging_dir(&proj);
    fs::create_dir_all(&stale).expect("mkdir");
    fs::write(stale.join("Hero.png"), b"from a crashed run").expect("write");

    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    let report = run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("export");

    assert!(
        matches!(report.outcomes[0], ReconcileOutcome::Added { .. }),
        "stale staging must not be used as a baseline"
    );
    assert!(!stale.exists());
}

#[test]
fn stray_file_at_destination_is_replaced_by_directory() {
    let proj = TempDir::new().expect("proj");
    fs::create_dir_all(proj.path().join("out")).expect("mkdir");
    fs::write(dest(&proj), b"stray").expect("stray file");

    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("export");
    assert!(dest(&proj).is_dir());
    assert!(dest(&proj).join("Hero.png").is_file());
}

#[test]
fn unparseable_listing_aborts_before_touching_disk() {
    let proj = TempDir::new().expect("proj");
    let mut tool = FakeTool::new(&[]);
    tool.raw_listing = Some(b"<html>license expired</html>".to_vec());

    let err = run(&request(&proj, false), &tool, &RecordingVcs::default()).unwrap_err();
    assert!(matches!(err, SyncError::ListingParse { .. }), "got: {err}");
    assert!(!proj.path().join("out").exists());
    assert!(tool.jobs.borrow().is_empty());
}

#[test]
fn missing_export_for_previously_exported_artboard_is_fatal() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("first");

    let mut skipping = FakeTool::new(&[("Cover", &["Hero"])]);
    skipping.skip.push("Hero".into());
    let err = run(&request(&proj, false), &skipping, &RecordingVcs::default()).unwrap_err();
    assert!(matches!(err, SyncError::MissingExport { .. }), "got: {err}");
    assert!(!staging_dir(&proj).exists());
}

#[test]
fn version_control_failure_is_fatal_but_cleans_staging() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    run(&request(&proj, false), &tool, &RecordingVcs::default()).expect("first");

    let vcs = RecordingVcs {
        fail: true,
        ..Default::default()
    };
    let err = run(&request(&proj, false), &tool, &vcs).unwrap_err();
    assert!(matches!(err, SyncError::Vcs { .. }), "got: {err}");
    assert!(!staging_dir(&proj).exists());
    assert!(dest(&proj).join("Hero.png").is_file(), "reconciled output stays");
}

#[test]
fn missing_export_folder_in_nested_path_is_created() {
    let proj = TempDir::new().expect("proj");
    let tool = FakeTool::new(&[("Cover", &["Hero"])]);
    let mut req = request(&proj, false);
    req.config.export_folder = PathBuf::from("docs/artboards");

    let report = run(&req, &tool, &RecordingVcs::default()).expect("export");
    assert_eq!(
        report.destination,
        proj.path().join("docs").join("artboards").join("Design")
    );
    assert!(report.destination.join("Hero.png").is_file());
}
