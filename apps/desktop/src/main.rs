use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    Action, ClientEvent, EmployeeRow, ErrorSlot, HttpSchedulerApi, NewEmployee, ProfileUpdate,
    ScheduleRow, SchedulerClient, View, ViewData,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the scheduling service; overrides config file and environment.
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    println!("shift scheduler shell: {}", settings.server_url);
    println!(
        "commands: login <user> <pass> | logout | view <name> | \
         profile <first> <last> <email> [phone] | generate | \
         add-employee <user> <first> <last> <email> | edit-employee <user> | quit"
    );

    let api = Arc::new(HttpSchedulerApi::new(settings.server_url));
    let client = SchedulerClient::new(api);

    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            render_event(event);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        match parse_command(line) {
            Some(action) => client.dispatch(action).await,
            None => {
                warn!(command = line, "unrecognized command");
                println!("unrecognized command: {line}");
            }
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> Option<Action> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["login", username, password] => Some(Action::SubmitLogin {
            username: (*username).to_string(),
            password: (*password).to_string(),
        }),
        ["logout"] => Some(Action::Logout),
        ["view", name] => parse_view(name).map(Action::Navigate),
        ["profile", first, last, email] => Some(Action::SubmitProfile(ProfileUpdate {
            first_name: (*first).to_string(),
            last_name: (*last).to_string(),
            email: (*email).to_string(),
            phone: None,
        })),
        ["profile", first, last, email, phone] => Some(Action::SubmitProfile(ProfileUpdate {
            first_name: (*first).to_string(),
            last_name: (*last).to_string(),
            email: (*email).to_string(),
            phone: Some((*phone).to_string()),
        })),
        ["generate"] => Some(Action::GenerateSchedule),
        ["add-employee", username, first, last, email] => {
            Some(Action::AddEmployee(NewEmployee {
                username: (*username).to_string(),
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
                email: (*email).to_string(),
                phone: None,
                password: None,
            }))
        }
        ["edit-employee", username] => Some(Action::EditEmployee {
            username: (*username).to_string(),
        }),
        _ => None,
    }
}

fn parse_view(name: &str) -> Option<View> {
    match name {
        "login" => Some(View::Login),
        "home" => Some(View::Home),
        "schedules" => Some(View::Schedules),
        "employees" => Some(View::Employees),
        "profile" => Some(View::Profile),
        _ => None,
    }
}

fn render_event(event: ClientEvent) {
    match event {
        ClientEvent::SessionEstablished { profile } => {
            println!(
                "Hello, {} {}! Role: {}",
                profile.first_name,
                profile.last_name,
                profile.role.as_str()
            );
        }
        ClientEvent::SessionUpdated { profile } => {
            println!("profile saved for {}", profile.username);
        }
        ClientEvent::SessionCleared => println!("signed out"),
        ClientEvent::ViewChanged { to, .. } => println!("-- {} --", to.as_str()),
        ClientEvent::ScheduleDataChanged(data) => render_schedules(data),
        ClientEvent::EmployeeDataChanged(data) => render_employees(data),
        ClientEvent::SlotErrorChanged {
            slot,
            message: Some(message),
        } => println!("[{}] {message}", slot_label(slot)),
        ClientEvent::SlotErrorChanged { message: None, .. } => {}
        ClientEvent::NoticePosted { message, .. } => println!("* {message}"),
        ClientEvent::NoticeExpired { .. } => {}
    }
}

fn slot_label(slot: ErrorSlot) -> &'static str {
    match slot {
        ErrorSlot::Login => "login",
        ErrorSlot::General => "error",
    }
}

fn render_schedules(data: ViewData<ScheduleRow>) {
    match data {
        ViewData::Idle => {}
        ViewData::Empty => println!("No schedules found for this week"),
        ViewData::Rows(rows) => {
            for row in rows {
                println!(
                    "{} | {} | {} | {} hours",
                    row.date, row.day, row.time_range, row.hours
                );
            }
        }
        ViewData::Failed(message) => println!("{message}"),
    }
}

fn render_employees(data: ViewData<EmployeeRow>) {
    match data {
        ViewData::Idle => {}
        ViewData::Empty => println!("No employees found"),
        ViewData::Rows(rows) => {
            for row in rows {
                println!(
                    "{} | {} | {} | {}",
                    row.username,
                    row.name,
                    row.email,
                    row.role.as_str()
                );
            }
        }
        ViewData::Failed(message) => println!("{message}"),
    }
}
