//! Integration tests for the headless editor host (canvas-cli).

use canvas_cli::{parse_script, EditorConfig, EditorSession};
use canvas_core::{ElementKind, GRID_SIZE};
use canvas_renderer::{ExportConfig, PageExporter};

fn session_in(dir: &std::path::Path) -> EditorSession {
    let config = EditorConfig {
        surface_width: 320,
        surface_height: 200,
        out_dir: dir.to_path_buf(),
        ..EditorConfig::default()
    };
    EditorSession::new(config)
        .expect("runtime")
        .with_exporter(PageExporter::new(ExportConfig {
            system_fonts: false,
            ..ExportConfig::default()
        }))
}

fn run(session: &mut EditorSession, json: &str) {
    session.run(parse_script(json).expect("script"));
}

// ==========================================================================
// Editing
// ==========================================================================

#[tokio::test]
async fn test_drag_is_coalesced_per_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_element", "name": "note", "kind": { "type": "text", "content": "hi" } },
            { "op": "pointer", "phase": "down", "x": 100, "y": 90 },
            { "op": "pointer", "phase": "move", "x": 140, "y": 90 },
            { "op": "pointer", "phase": "move", "x": 171, "y": 129 }
        ]"#,
    );

    let id = session.element("note").expect("named");
    let t = session.document().active_element(id).expect("element").transform;
    assert!((t.x - 50.0).abs() < f32::EPSILON, "nothing applied before a frame");

    run(&mut session, r#"[{ "op": "frame" }]"#);
    let t = session.document().active_element(id).expect("element").transform;
    assert!((t.x - 120.0).abs() < f32::EPSILON);
    assert!((t.y - 80.0).abs() < f32::EPSILON);

    run(&mut session, r#"[{ "op": "pointer", "phase": "up", "x": 171, "y": 129 }]"#);
    assert!(session.controller().is_idle());
    assert_eq!(session.controller().captures().active(), 0);
}

#[tokio::test]
async fn test_resize_handle_snaps_and_floors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    // Text at (50,50) 150x100 has its resize handle around (188,138).
    run(
        &mut session,
        r#"[
            { "op": "add_element", "name": "note", "kind": { "type": "text", "content": "hi" } },
            { "op": "pointer", "phase": "down", "x": 192, "y": 142 },
            { "op": "pointer", "phase": "move", "x": 192, "y": 82 },
            { "op": "pointer", "phase": "up", "x": 192, "y": 82 }
        ]"#,
    );
    let id = session.element("note").expect("named");
    let t = session.document().active_element(id).expect("element").transform;
    assert!((t.width - 160.0).abs() < f32::EPSILON);
    assert!((t.height - 60.0).abs() < f32::EPSILON);
    assert!(t.height % GRID_SIZE == 0.0);
}

#[tokio::test]
async fn test_delete_button_forgets_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_element", "name": "card", "kind": { "type": "flip", "front": "Q", "back": "A" } },
            { "op": "pointer", "phase": "down", "x": 60, "y": 60 },
            { "op": "pointer", "phase": "up", "x": 60, "y": 60 },
            { "op": "toggle_flip", "element": "card" }
        ]"#,
    );

    assert!(session.element("card").is_none());
    assert!(session.document().active_page().is_empty());
}

#[tokio::test]
async fn test_flip_and_recolor_by_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r##"[
            { "op": "add_element", "name": "card", "kind": { "type": "flip", "front": "Q", "back": "A" } },
            { "op": "toggle_flip", "element": "card" },
            { "op": "recolor", "element": "card", "color": "#fde68a" },
            { "op": "recolor", "element": "ghost", "color": "#000000" }
        ]"##,
    );

    let id = session.element("card").expect("named");
    match &session.document().active_element(id).expect("element").kind {
        ElementKind::Flip {
            is_flipped, color, ..
        } => {
            assert!(*is_flipped);
            assert_eq!(color, "#fde68a");
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_page_switch_is_a_notification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_page" },
            { "op": "switch_page", "index": 7 },
            { "op": "remove_page", "index": 0 },
            { "op": "remove_page", "index": 0 }
        ]"#,
    );

    assert_eq!(session.notifications().len(), 1);
    assert_eq!(session.document().page_count(), 1);
    assert_eq!(session.document().active_index(), 0);
}

// ==========================================================================
// Export
// ==========================================================================

#[tokio::test]
async fn test_exports_are_written_after_finish() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_element", "kind": { "type": "text", "content": "page one" } },
            { "op": "export", "format": "png" },
            { "op": "add_page" },
            { "op": "add_element", "kind": { "type": "flip", "front": "F", "back": "B" } },
            { "op": "export", "format": "pdf" }
        ]"#,
    );

    let report = session.finish().await;
    assert!(report.notifications.is_empty(), "{:?}", report.notifications);
    assert_eq!(report.skipped, 0);
    assert_eq!(
        report.written,
        vec![
            dir.path().join("canvas-page-1.png"),
            dir.path().join("canvas-page-2.pdf"),
        ]
    );

    let png = image::open(dir.path().join("canvas-page-1.png")).expect("open png");
    assert_eq!((png.width(), png.height()), (640, 400));

    let pdf = std::fs::read(dir.path().join("canvas-page-2.pdf")).expect("read pdf");
    assert!(pdf.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_export_snapshots_the_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_element", "name": "a", "kind": { "type": "text", "content": "before" } },
            { "op": "export", "format": "png" },
            { "op": "delete_element", "element": "a" }
        ]"#,
    );
    assert!(session.document().active_page().is_empty());

    let report = session.finish().await;
    assert_eq!(report.written.len(), 1);
}

#[tokio::test]
async fn test_unmounted_export_is_skipped_silently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "unmount" },
            { "op": "export", "format": "png" },
            { "op": "mount", "width": 100, "height": 150 },
            { "op": "export", "format": "png" }
        ]"#,
    );

    let report = session.finish().await;
    assert_eq!(report.skipped, 1);
    assert!(report.notifications.is_empty());
    assert_eq!(report.written.len(), 1);

    let png = image::open(&report.written[0]).expect("open png");
    assert_eq!((png.width(), png.height()), (200, 300));
}

#[tokio::test]
async fn test_capture_failure_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session_in(dir.path());

    run(
        &mut session,
        r#"[
            { "op": "add_element", "kind": { "type": "image", "src": "/nowhere/missing.png" } },
            { "op": "export", "format": "pdf" }
        ]"#,
    );

    let report = session.finish().await;
    assert!(report.written.is_empty());
    assert_eq!(report.notifications.len(), 1);
    assert!(report.notifications[0].starts_with("Export failed"));
}
