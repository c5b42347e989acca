// The view-sync controller: renders the activity roster and keeps it
// consistent with the server by re-fetching after every successful mutation.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use egui::{Button, Color32, ComboBox, RichText, ScrollArea, TextEdit};
use log::error;

use crate::RosterboardError;
use crate::api::{ApiCommand, ApiEvent};

use super::config::AppConfig;
use super::{ActivityCard, StatusKind, StatusMessage, build_cards};

const STATUS_VISIBLE: Duration = Duration::from_secs(5);
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const ACTIVITY_PLACEHOLDER: &str = "-- Select an activity --";
const ROSTER_LOADING_TEXT: &str = "Loading activities...";
const ROSTER_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
const NO_PARTICIPANTS_TEXT: &str = "No participants yet.";
const GENERIC_SIGNUP_FAILURE: &str = "Failed to sign up. Please try again.";
const GENERIC_REJECTION_TEXT: &str = "An error occurred";
const GENERIC_UNREGISTER_FAILURE: &str = "Failed to unregister participant";
const TRANSPORT_UNREGISTER_FAILURE: &str = "Error unregistering participant. Please try again.";

/// What the roster area currently shows.
#[derive(Debug, PartialEq)]
pub enum RosterView {
    /// Initial state, before the first catalog response arrives.
    Pending,
    Loaded(Vec<ActivityCard>),
    /// The last fetch failed; a static failure message is shown.
    Unavailable,
}

/// `SignupBoardApp` renders the activity catalog and the sign-up form.
///
/// All state here is a projection of the last server response plus the
/// transient form fields; the server stays the sole source of truth. Network
/// work happens on the API worker thread, and its results arrive as
/// `ApiEvent`s drained at the top of every frame.
pub struct SignupBoardApp {
    commands: Sender<ApiCommand>,
    events: Receiver<ApiEvent>,
    app_config: AppConfig,
    roster: RosterView,
    activity_names: Vec<String>,
    email: String,
    selected_activity: Option<String>,
    status: Option<StatusMessage>,
    // One deadline per shown message, not debounced: an older deadline
    // firing hides whatever message is visible at that moment.
    status_hide_deadlines: Vec<Instant>,
}

impl SignupBoardApp {
    pub fn new(
        commands: Sender<ApiCommand>,
        events: Receiver<ApiEvent>,
        app_config: AppConfig,
    ) -> Self {
        Self {
            commands,
            events,
            app_config,
            roster: RosterView::Pending,
            activity_names: Vec::new(),
            email: String::new(),
            selected_activity: None,
            status: None,
            status_hide_deadlines: Vec::new(),
        }
    }

    pub fn roster(&self) -> &RosterView {
        &self.roster
    }

    pub fn cards(&self) -> Option<&[ActivityCard]> {
        match &self.roster {
            RosterView::Loaded(cards) => Some(cards),
            _ => None,
        }
    }

    pub fn activity_names(&self) -> &[String] {
        &self.activity_names
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn selected_activity(&self) -> Option<&str> {
        self.selected_activity.as_deref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Apply one completed request to the rendered state. Returns the text
    /// of a blocking alert to show, if any (unregister failures only).
    pub fn handle_event(&mut self, event: ApiEvent) -> Option<String> {
        match event {
            ApiEvent::CatalogLoaded(Ok(catalog)) => {
                // Full rebuild of both the card list and the selector; the
                // placeholder stays first and becomes the selection again.
                self.activity_names = catalog.names().map(str::to_string).collect();
                self.selected_activity = None;
                self.roster = RosterView::Loaded(build_cards(&catalog));
                None
            }
            ApiEvent::CatalogLoaded(Err(e)) => {
                error!("Error fetching activities: {}", e);
                self.roster = RosterView::Unavailable;
                None
            }
            ApiEvent::SignupDone(Ok(message)) => {
                self.show_status(StatusMessage::success(message));
                self.email.clear();
                self.selected_activity = None;
                self.send(ApiCommand::LoadCatalog);
                None
            }
            ApiEvent::SignupDone(Err(e)) => {
                let text = match &e {
                    RosterboardError::Rejected { detail, .. } => detail
                        .clone()
                        .unwrap_or_else(|| GENERIC_REJECTION_TEXT.to_string()),
                    _ => {
                        error!("Error signing up: {}", e);
                        GENERIC_SIGNUP_FAILURE.to_string()
                    }
                };
                self.show_status(StatusMessage::error(text));
                None
            }
            ApiEvent::UnregisterDone {
                activity,
                email,
                result: Ok(()),
            } => {
                // Optimistic removal of the one matching row; the
                // availability line stays stale until the re-fetch lands.
                if let RosterView::Loaded(cards) = &mut self.roster {
                    if let Some(card) = cards.iter_mut().find(|c| c.name == activity) {
                        if let Some(pos) =
                            card.participants.iter().position(|row| row.email == email)
                        {
                            card.participants.remove(pos);
                        }
                    }
                }
                self.send(ApiCommand::LoadCatalog);
                None
            }
            ApiEvent::UnregisterDone {
                result: Err(e), ..
            } => match &e {
                RosterboardError::Rejected { detail, .. } => Some(
                    detail
                        .clone()
                        .unwrap_or_else(|| GENERIC_UNREGISTER_FAILURE.to_string()),
                ),
                _ => {
                    error!("Error unregistering participant: {}", e);
                    Some(TRANSPORT_UNREGISTER_FAILURE.to_string())
                }
            },
        }
    }

    /// Issue the unregister request, unless the user declined the
    /// confirmation prompt. Declining sends nothing and changes nothing.
    pub fn unregister_if_confirmed(&mut self, activity: &str, email: &str, confirmed: bool) {
        if !confirmed {
            return;
        }
        self.send(ApiCommand::Unregister {
            activity: activity.to_string(),
            email: email.to_string(),
        });
    }

    fn show_status(&mut self, message: StatusMessage) {
        self.status = Some(message);
        self.status_hide_deadlines.push(Instant::now() + STATUS_VISIBLE);
    }

    fn expire_status(&mut self, now: Instant) {
        if self.status_hide_deadlines.iter().any(|d| *d <= now) {
            self.status_hide_deadlines.retain(|d| *d > now);
            self.status = None;
        }
    }

    fn send(&self, command: ApiCommand) {
        if self.commands.send(command).is_err() {
            error!("API worker is no longer running, dropping request");
        }
    }

    fn form_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sign Up for an Activity");
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Email:");
            ui.add(
                TextEdit::singleline(&mut self.email).hint_text("your-email@mergington.edu"),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Activity:");
            let selected_text = self
                .selected_activity
                .as_deref()
                .unwrap_or(ACTIVITY_PLACEHOLDER)
                .to_string();
            ComboBox::from_id_salt("activity-select")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.selected_activity, None, ACTIVITY_PLACEHOLDER);
                    for name in &self.activity_names {
                        ui.selectable_value(
                            &mut self.selected_activity,
                            Some(name.clone()),
                            name,
                        );
                    }
                });
        });

        // The form controls enforce selection and a non-empty email; the
        // email format itself is validated server-side only.
        let can_submit = self.selected_activity.is_some() && !self.email.is_empty();
        if ui.add_enabled(can_submit, Button::new("Sign Up")).clicked() {
            if let Some(activity) = self.selected_activity.clone() {
                self.send(ApiCommand::Signup {
                    activity,
                    email: self.email.clone(),
                });
            }
        }

        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Success => Color32::DARK_GREEN,
                StatusKind::Error => Color32::RED,
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    }

    fn roster_section(&self, ui: &mut egui::Ui) -> Option<(String, String)> {
        let mut unregister_request = None;

        ui.separator();
        ui.heading("Current Activities");
        ui.add_space(4.0);

        match &self.roster {
            RosterView::Pending => {
                ui.label(ROSTER_LOADING_TEXT);
            }
            RosterView::Unavailable => {
                ui.label(ROSTER_FAILED_TEXT);
            }
            RosterView::Loaded(cards) => {
                for card in cards {
                    ui.add_space(6.0);
                    ui.group(|ui| {
                        ui.heading(&card.name);
                        ui.label(&card.description);
                        ui.label(format!("Schedule: {}", card.schedule));
                        ui.label(format!("Availability: {} spots left", card.spots_left));
                        ui.add_space(4.0);
                        ui.label(RichText::new("Participants").strong());
                        if card.participants.is_empty() {
                            ui.label(
                                RichText::new(NO_PARTICIPANTS_TEXT)
                                    .italics()
                                    .color(Color32::GRAY),
                            );
                        } else {
                            for row in &card.participants {
                                ui.horizontal(|ui| {
                                    ui.label(&row.email);
                                    if ui
                                        .small_button("🗑")
                                        .on_hover_text("Unregister")
                                        .clicked()
                                    {
                                        unregister_request = Some(row.token.decode());
                                    }
                                });
                            }
                        }
                    });
                }
            }
        }

        unregister_request
    }
}

impl eframe::App for SignupBoardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut alerts = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let Some(text) = self.handle_event(event) {
                alerts.push(text);
            }
        }

        self.expire_status(Instant::now());

        if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }

        let mut unregister_request = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.form_section(ui);
                    unregister_request = self.roster_section(ui);
                });
        });

        for text in alerts {
            show_unregister_alert(&text);
        }

        if let Some((activity, email)) = unregister_request {
            let confirmed = confirm_unregister(&activity, &email);
            self.unregister_if_confirmed(&activity, &email, confirmed);
        }

        // Worker events arrive between frames; poll for them while idle.
        ctx.request_repaint_after(EVENT_POLL_INTERVAL);
    }
}

fn confirm_unregister(activity: &str, email: &str) -> bool {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Unregister participant")
        .set_description(format!("Unregister {} from {}?", email, activity))
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

fn show_unregister_alert(text: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Unregister failed")
        .set_description(text)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
