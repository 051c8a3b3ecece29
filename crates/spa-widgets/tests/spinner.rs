//! Integration tests for the spinner driven through the test harness.
//!
//! Every test hosts the selected index in a page state and rebuilds the
//! spinner from it, the way a settings screen would.

use serde::{Deserialize, Serialize};
use spa_core::{Command, Event, Key, MouseButton, Point, State, Theme};
use spa_test::{init_test_logging, Harness, HarnessError};
use spa_widgets::{Spinner, SpinnerError, SpinnerIndexChanged};

const OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsPage {
    selected_index: usize,
    changes: u32,
}

impl State for SettingsPage {
    type Message = SpinnerIndexChanged;

    fn update(&mut self, msg: SpinnerIndexChanged) -> Command<SpinnerIndexChanged> {
        self.selected_index = msg.index;
        self.changes += 1;
        Command::None
    }
}

fn settings_harness(selected_index: usize) -> Harness<SettingsPage> {
    init_test_logging();
    let page = SettingsPage {
        selected_index,
        changes: 0,
    };
    Harness::set_content(page, |page: &SettingsPage| {
        Spinner::from_strings(OPTIONS, page.selected_index)
            .map(|s| s.with_test_id("network-mode"))
    })
    .expect("valid content")
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_spinner_shows_selected_option() {
    let mut harness = settings_harness(0);

    harness.on_node_with_text("Option 1").assert_is_displayed();
    harness.on_node_with_text("Option 2").assert_does_not_exist();
    harness.on_node_with_text("Option 3").assert_does_not_exist();
}

#[test]
fn test_spinner_shows_initial_index_other_than_first() {
    let mut harness = settings_harness(2);

    harness.on_node_with_text("Option 3").assert_is_displayed();
    harness.on_node_with_text("Option 1").assert_does_not_exist();
}

#[test]
fn test_spinner_exposes_combobox_semantics() {
    let harness = settings_harness(0);

    harness
        .assert_exists("[data-testid='network-mode']")
        .assert_exists("[role='combobox']")
        .assert_exists("[aria-label='Option 1']");
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_spinner_change_selection() {
    let mut harness = settings_harness(0);

    harness.on_node_with_text("Option 1").perform_click();
    // Header and first row both show the current label
    assert_eq!(harness.on_all_nodes_with_text("Option 1").len(), 2);
    harness.on_node_with_text("Option 2").perform_click();

    assert_eq!(harness.state().selected_index, 1);
    harness.on_node_with_text("Option 2").assert_is_displayed();
    harness.on_node_with_text("Option 1").assert_does_not_exist();
    harness.on_node_with_text("Option 3").assert_does_not_exist();
}

#[test]
fn test_spinner_opening_does_not_change_host_state() {
    let mut harness = settings_harness(0);

    harness.on_node_with_tag("network-mode").perform_click();

    assert_eq!(harness.revision(), 0);
    assert_eq!(harness.state().selected_index, 0);
    harness.assert_count("text='Option 2'", 1);
    harness.assert_count("text='Option 3'", 1);
}

#[test]
fn test_spinner_repicking_current_option_notifies_host() {
    let mut harness = settings_harness(0);

    harness.on_node_with_tag("network-mode").perform_click();
    // Row 0 repeats the header label, so target it by position
    let row = harness
        .on_all_nodes_with_text("Option 1")
        .into_iter()
        .map(|n| n.bounds)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .expect("row label");
    harness
        .send(Event::MouseDown {
            position: row.center(),
            button: MouseButton::Left,
        })
        .expect("render");

    assert_eq!(harness.state().changes, 1);
    assert_eq!(harness.state().selected_index, 0);
    harness.assert_count("text='Option 1'", 1);
}

#[test]
fn test_spinner_click_outside_dismisses_without_change() {
    let mut harness = settings_harness(1);

    harness.on_node_with_text("Option 2").perform_click();
    harness
        .send(Event::MouseDown {
            position: Point::new(1000.0, 600.0),
            button: MouseButton::Left,
        })
        .expect("render");

    assert_eq!(harness.revision(), 0);
    harness.on_node_with_text("Option 2").assert_is_displayed();
    harness.on_node_with_text("Option 1").assert_does_not_exist();
}

#[test]
fn test_spinner_focus_out_dismisses() {
    let mut harness = settings_harness(0);

    harness.on_node_with_text("Option 1").perform_click();
    harness.focus_out().expect("render");

    harness.on_node_with_text("Option 1").assert_is_displayed();
    harness.on_node_with_text("Option 3").assert_does_not_exist();
}

// =============================================================================
// Keyboard
// =============================================================================

#[test]
fn test_spinner_keyboard_selection() {
    let mut harness = settings_harness(0);

    harness
        .press_key(Key::Enter)
        .and_then(|h| h.press_key(Key::Down))
        .and_then(|h| h.press_key(Key::Down))
        .and_then(|h| h.press_key(Key::Enter))
        .expect("render");

    assert_eq!(harness.state().selected_index, 2);
    harness.on_node_with_text("Option 3").assert_is_displayed();
}

#[test]
fn test_spinner_escape_keeps_selection() {
    let mut harness = settings_harness(1);

    harness
        .press_key(Key::Space)
        .and_then(|h| h.press_key(Key::End))
        .and_then(|h| h.press_key(Key::Escape))
        .expect("render");

    assert_eq!(harness.revision(), 0);
    harness.on_node_with_text("Option 2").assert_is_displayed();
    harness.on_node_with_text("Option 3").assert_does_not_exist();
}

// =============================================================================
// Host Wiring
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ThemePage {
    mode: usize,
}

#[derive(Debug)]
enum PageMsg {
    ModeChanged(usize),
}

impl State for ThemePage {
    type Message = PageMsg;

    fn update(&mut self, msg: PageMsg) -> Command<PageMsg> {
        match msg {
            PageMsg::ModeChanged(mode) => self.mode = mode,
        }
        Command::None
    }
}

#[test]
fn test_spinner_with_custom_message_mapper() {
    let theme = Theme::from_toml(
        r##"
base = "dark"

[colors]
primary = "#BB86FC"
"##,
    )
    .expect("valid theme");

    let mut harness = Harness::set_content(ThemePage::default(), move |page: &ThemePage| {
        Spinner::from_strings(["Light", "Dark", "System"], page.mode).map(|s| s.theme(&theme))
    })
    .expect("valid content")
    .with_message_mapper(|msg| {
        msg.downcast::<SpinnerIndexChanged>()
            .ok()
            .map(|changed| PageMsg::ModeChanged(changed.index))
    });

    harness.on_node_with_text("Light").perform_click();
    harness.on_node_with_text("System").perform_click();

    assert_eq!(harness.state().mode, 2);
    harness.on_node_with_text("System").assert_is_displayed();
}

#[test]
fn test_spinner_duplicate_labels_are_distinct_rows() {
    let page = SettingsPage::default();
    let mut harness = Harness::set_content(page, |page: &SettingsPage| {
        Spinner::from_strings(["Auto", "Auto", "Manual"], page.selected_index)
    })
    .expect("valid content");

    harness.on_node_with_text("Auto").perform_click();
    harness.assert_count("text='Auto'", 3);
    harness.on_node_with_text("Manual").perform_click();

    assert_eq!(harness.state().selected_index, 2);
}

#[test]
fn test_spinner_invalid_host_state_surfaces_as_render_error() {
    let page = SettingsPage {
        selected_index: 5,
        changes: 0,
    };
    let result = Harness::set_content(page, |page: &SettingsPage| {
        Spinner::from_strings(OPTIONS, page.selected_index)
    });

    let Err(HarnessError::Render(source)) = result else {
        panic!("Expected render error");
    };
    assert_eq!(
        source.to_string(),
        SpinnerError::InvalidIndex { index: 5, len: 3 }.to_string()
    );
}

#[test]
fn test_spinner_empty_options_rejected() {
    let result = Harness::set_content(SettingsPage::default(), |_: &SettingsPage| {
        Spinner::from_strings(Vec::<String>::new(), 0)
    });
    assert!(matches!(result, Err(HarnessError::Render(_))));
}

#[test]
fn test_disabled_spinner_ignores_clicks() {
    let mut harness = Harness::set_content(SettingsPage::default(), |page: &SettingsPage| {
        Spinner::from_strings(OPTIONS, page.selected_index).map(|s| s.disabled(true))
    })
    .expect("valid content");

    harness.on_node_with_text("Option 1").perform_click();

    harness.assert_count("text='Option 1'", 1);
    harness.on_node_with_text("Option 2").assert_does_not_exist();
}
