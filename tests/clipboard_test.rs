use clip_history::clipboard::content_type::{PLAIN_TEXT, PNG};
use clip_history::clipboard::{CaptureEngine, ImageCrateResizer, SystemClipboard};
use clip_history::{ClipboardService, HistoryStore};

/// Tests that actually access clipboard are disabled in automated testing
/// Set ENABLE_CLIPBOARD_TESTS=1 to run these tests locally.
fn should_test_clipboard() -> bool {
    std::env::var("ENABLE_CLIPBOARD_TESTS").is_ok()
}

fn system_clipboard() -> Option<SystemClipboard> {
    if !should_test_clipboard() {
        eprintln!("Skipping clipboard access test (set ENABLE_CLIPBOARD_TESTS=1 to run)");
        return None;
    }

    match SystemClipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            // Expected in CI/headless environments
            let err_msg = format!("{:#}", e).to_lowercase();
            assert!(
                err_msg.contains("clipboard") || err_msg.contains("display"),
                "Unexpected error type: {}",
                e
            );
            None
        }
    }
}

#[test]
fn test_clipboard_integration_capture_and_restore_text() {
    let Some(mut writer) = system_clipboard() else {
        return;
    };
    let Some(reader) = system_clipboard() else {
        return;
    };

    let temp_dir = tempfile::TempDir::new().unwrap();
    let history_path = temp_dir.path().join("history.json");
    let mut engine = CaptureEngine::new(Box::new(reader), Box::new(ImageCrateResizer));
    let mut store = HistoryStore::new(5);

    writer.write_bytes(PLAIN_TEXT, "Integration test: first copy".as_bytes()).unwrap();
    let first = engine.capture(&mut store, &history_path);
    assert_eq!(first.display_text(), "Integration test: first copy");

    writer.write_bytes(PLAIN_TEXT, "Integration test: second copy".as_bytes()).unwrap();
    engine.capture(&mut store, &history_path);
    assert_eq!(store.len(), 2);

    engine.restore_index(&store, 1).unwrap();
    assert_eq!(writer.read_text().as_deref(), Some("Integration test: first copy"));

    // Restoring is not a new copy
    engine.capture(&mut store, &history_path);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_clipboard_integration_special_characters() {
    let Some(mut clipboard) = system_clipboard() else {
        return;
    };

    let test_cases = [
        "Text with\nnewlines\nand\ttabs",
        "Unicode: 世界 🚀 émoji",
        "Code: fn main() { println!(\"Hello\"); }",
        "JSON: {\"key\": \"value\", \"nested\": {\"a\": 1}}",
    ];

    for test_text in test_cases {
        clipboard.write_bytes(PLAIN_TEXT, test_text.as_bytes()).unwrap();
        assert_eq!(
            clipboard.read_bytes(PLAIN_TEXT).as_deref(),
            Some(test_text.as_bytes()),
            "Clipboard should preserve special characters"
        );
    }
}

#[test]
fn test_clipboard_integration_image() {
    let Some(mut clipboard) = system_clipboard() else {
        return;
    };

    let image = image::RgbaImage::from_pixel(8, 4, image::Rgba([10, 20, 30, 255]));
    let mut png = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png).unwrap();

    clipboard.write_bytes(PNG, &png).unwrap();
    assert!(clipboard.available_types().contains(&PNG.to_string()));

    let read_back = clipboard.read_bytes(PNG).expect("image should be readable");
    let decoded = image::load_from_memory(&read_back).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 4));
}

#[test]
fn test_clipboard_integration_unsupported_type_is_skipped() {
    let Some(mut clipboard) = system_clipboard() else {
        return;
    };

    assert!(clipboard.write_bytes("com.example.private", b"ignored").is_ok());
    assert_eq!(clipboard.read_bytes("com.example.private"), None);
}
