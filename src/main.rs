use std::{sync::mpsc, thread};

use clap::Parser;
use egui::Vec2;

use rosterboard::api::{self, ActivitiesClient, ApiCommand};
use rosterboard::ui::board::SignupBoardApp;
use rosterboard::ui::config::AppConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the activity sign-up server
    #[arg(short, long)]
    server: Option<String>,
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let args = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(server) = args.server {
        app_config.server_url = server;
    }

    let client =
        ActivitiesClient::new(&app_config.server_url).expect("Invalid activities server URL");

    let (command_tx, command_rx) = mpsc::channel::<ApiCommand>();
    let (event_tx, event_rx) = mpsc::channel();
    thread::spawn(move || api::run_worker(client, command_rx, event_tx));

    // kick off the initial catalog fetch before the first frame
    command_tx
        .send(ApiCommand::LoadCatalog)
        .expect("API worker exited before startup");

    let window_position = app_config.window_position.clone();
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(520., 720.))
        .with_position(window_position);

    eframe::run_native(
        "Rosterboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(SignupBoardApp::new(command_tx, event_rx, app_config)))),
    )
    .expect("could not start app");
}
