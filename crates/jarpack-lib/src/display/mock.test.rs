use super::*;

#[test]
fn test_mock_records_status_calls() {
    let display = MockDisplayProvider::new();
    display.status().success("Exported", "/ws/app.jar");
    display.status().warning("No main class");

    assert!(display.has_call(&DisplayCall::StatusSuccess {
        item: "Exported".to_string(),
        details: "/ws/app.jar".to_string(),
    }));
    assert_eq!(display.count_calls("status_warning"), 1);
}

#[test]
fn test_mock_records_progress_lifecycle() {
    let display = MockDisplayProvider::new();
    let bar = display.progress().bar(2, "Writing jar");
    bar.inc();
    bar.inc();
    bar.finish("done");

    assert_eq!(
        display.get_calls(),
        vec![
            DisplayCall::ProgressBar {
                total: 2,
                message: "Writing jar".to_string(),
            },
            DisplayCall::ProgressInc,
            DisplayCall::ProgressInc,
            DisplayCall::ProgressFinish {
                message: "done".to_string(),
            },
        ]
    );

    display.clear_calls();
    assert!(display.get_calls().is_empty());
}
