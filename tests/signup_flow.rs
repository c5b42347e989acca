// Integration tests for the sign-up board controller
//
// These drive the full client-side flow through the public API:
// 1. Parse a catalog the way the list endpoint returns it
// 2. Build the rendered cards
// 3. Feed worker events into the controller
// 4. Verify the rendered state and the commands sent back to the worker

use std::sync::mpsc;

use rosterboard::api::{ApiCommand, ApiEvent};
use rosterboard::ui::board::SignupBoardApp;
use rosterboard::ui::config::AppConfig;
use rosterboard::ui::{UnregisterToken, build_cards};
use rosterboard::{ActivityCatalog, RosterboardError};

fn sample_catalog() -> ActivityCatalog {
    serde_json::from_str(
        r#"{
            "Chess Club": {
                "description": "Learn strategies and compete in tournaments",
                "schedule": "Fridays, 3:30 PM - 5:00 PM",
                "max_participants": 2,
                "participants": ["michael@mergington.edu", "daniel@mergington.edu", "emma@mergington.edu"]
            },
            "Programming Class": {
                "description": "Learn programming fundamentals",
                "schedule": "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                "max_participants": 20,
                "participants": ["sophia@mergington.edu"]
            },
            "Art Studio": {
                "description": "Painting and drawing",
                "schedule": "Thursdays, 3:30 PM - 5:00 PM",
                "max_participants": 15,
                "participants": []
            }
        }"#,
    )
    .unwrap()
}

fn app_with_catalog() -> (SignupBoardApp, mpsc::Receiver<ApiCommand>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (_event_tx, event_rx) = mpsc::channel::<ApiEvent>();
    let mut app = SignupBoardApp::new(command_tx, event_rx, AppConfig::default());
    app.handle_event(ApiEvent::CatalogLoaded(Ok(sample_catalog())));
    (app, command_rx)
}

#[test]
fn test_rendering_a_catalog_is_idempotent() {
    let catalog = sample_catalog();
    assert_eq!(build_cards(&catalog), build_cards(&catalog));
}

#[test]
fn test_cards_follow_server_order_and_arithmetic() {
    let cards = build_cards(&sample_catalog());

    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Chess Club", "Programming Class", "Art Studio"]);

    // Raw max - registered, negative when the server over-admits.
    assert_eq!(cards[0].spots_left, -1);
    assert_eq!(cards[1].spots_left, 19);
    assert_eq!(cards[2].spots_left, 15);
}

#[test]
fn test_empty_activity_renders_placeholder_instead_of_rows() {
    let cards = build_cards(&sample_catalog());
    let art = &cards[2];
    assert_eq!(art.name, "Art Studio");
    assert!(art.participants.is_empty());
}

#[test]
fn test_participant_tokens_survive_awkward_names() {
    let catalog: ActivityCatalog = serde_json::from_str(
        r#"{
            "Debate & Rhetoric (Advanced)": {
                "description": "Argue well",
                "schedule": "Mondays",
                "max_participants": 10,
                "participants": ["first+last@mergington.edu"]
            }
        }"#,
    )
    .unwrap();

    let cards = build_cards(&catalog);
    let token = &cards[0].participants[0].token;
    assert_eq!(
        token.decode(),
        (
            "Debate & Rhetoric (Advanced)".to_string(),
            "first+last@mergington.edu".to_string()
        )
    );
    assert_eq!(
        *token,
        UnregisterToken::encode("Debate & Rhetoric (Advanced)", "first+last@mergington.edu")
    );
}

#[test]
fn test_selector_lists_placeholder_selection_after_every_load() {
    let (mut app, _commands) = app_with_catalog();
    assert_eq!(app.selected_activity(), None);
    assert_eq!(app.activity_names().len(), 3);

    // A re-fetch rebuilds the selector from scratch and drops the selection.
    app.handle_event(ApiEvent::CatalogLoaded(Ok(sample_catalog())));
    assert_eq!(app.selected_activity(), None);
}

#[test]
fn test_signup_success_refetches_exactly_once() {
    let (mut app, commands) = app_with_catalog();

    app.handle_event(ApiEvent::SignupDone(Ok("Signed up emma!".to_string())));

    assert_eq!(app.status().unwrap().text, "Signed up emma!");
    assert_eq!(commands.try_recv().unwrap(), ApiCommand::LoadCatalog);
    assert!(commands.try_recv().is_err());
}

#[test]
fn test_signup_rejection_does_not_refetch() {
    let (mut app, commands) = app_with_catalog();

    app.handle_event(ApiEvent::SignupDone(Err(RosterboardError::Rejected {
        status: 400,
        detail: Some("Already signed up".to_string()),
    })));

    assert_eq!(app.status().unwrap().text, "Already signed up");
    assert!(commands.try_recv().is_err());
}

#[test]
fn test_optimistic_removal_is_superseded_by_refetch() {
    let (mut app, commands) = app_with_catalog();

    app.handle_event(ApiEvent::UnregisterDone {
        activity: "Chess Club".to_string(),
        email: "daniel@mergington.edu".to_string(),
        result: Ok(()),
    });

    // The one matching row is gone immediately.
    let chess = &app.cards().unwrap()[0];
    let emails: Vec<&str> = chess.participants.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails, vec!["michael@mergington.edu", "emma@mergington.edu"]);
    assert_eq!(commands.try_recv().unwrap(), ApiCommand::LoadCatalog);

    // The server disagrees with the optimistic edit; its answer wins.
    let server_truth: ActivityCatalog = serde_json::from_str(
        r#"{
            "Chess Club": {
                "description": "Learn strategies and compete in tournaments",
                "schedule": "Fridays, 3:30 PM - 5:00 PM",
                "max_participants": 2,
                "participants": ["michael@mergington.edu", "daniel@mergington.edu"]
            }
        }"#,
    )
    .unwrap();
    app.handle_event(ApiEvent::CatalogLoaded(Ok(server_truth.clone())));
    assert_eq!(app.cards().unwrap(), build_cards(&server_truth).as_slice());
}

#[test]
fn test_declining_the_prompt_is_a_no_op() {
    let (mut app, commands) = app_with_catalog();
    let before = app.cards().unwrap().to_vec();

    app.unregister_if_confirmed("Chess Club", "michael@mergington.edu", false);

    assert!(commands.try_recv().is_err());
    assert_eq!(app.cards().unwrap(), before.as_slice());
    assert!(app.status().is_none());
}

#[test]
fn test_controller_stays_usable_after_failures() {
    let (mut app, commands) = app_with_catalog();

    app.handle_event(ApiEvent::CatalogLoaded(Err(RosterboardError::Rejected {
        status: 500,
        detail: None,
    })));
    assert!(app.cards().is_none());

    // A later successful fetch fully recovers the view.
    app.handle_event(ApiEvent::CatalogLoaded(Ok(sample_catalog())));
    assert_eq!(app.cards().unwrap().len(), 3);

    app.handle_event(ApiEvent::SignupDone(Ok("Signed up!".to_string())));
    assert_eq!(commands.try_recv().unwrap(), ApiCommand::LoadCatalog);
}
