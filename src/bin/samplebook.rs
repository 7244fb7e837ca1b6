//! samplebook CLI
//!
//! Drives the view controller from the command line: one action per run
//! against the configured store.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use crossbeam::channel::Receiver;
use samplebook::columns::{label, FieldKind};
use samplebook::notify::{ChannelNotifier, Notification};
use samplebook::view::{TableView, ViewSnapshot, DELETE_CONFIRM_MESSAGE, LOADING_MESSAGE};
use samplebook::{Config, LatencyProfile, RecordStore, StorageBackend, ViewController, ViewError};
use tracing_subscriber::{fmt, EnvFilter};

/// samplebook
#[derive(Parser, Debug)]
#[command(name = "samplebook")]
#[command(about = "View, search, edit and manage records from the samples table")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./samplebook_data")]
    data_dir: String,

    /// Keep the collection in memory only (lost on exit)
    #[arg(long)]
    memory: bool,

    /// Simulate a slow backend (300 ms schema, 500 ms reads and writes)
    #[arg(long)]
    simulate_latency: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List records
    List {
        /// Case-insensitive search over the displayed columns
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the column schema
    Columns,

    /// Add a new record
    Add {
        /// Field assignment, e.g. --set name=Widget
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Edit an existing record
    Edit {
        /// The record id
        id: u64,

        /// Field assignment, e.g. --set description="New text"
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a record
    Delete {
        /// The record id
        id: u64,

        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(column, value)| (column.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected column=value, got '{}'", s))
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,samplebook=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let backend = if args.memory {
        StorageBackend::Memory
    } else {
        StorageBackend::File
    };
    let latency = if args.simulate_latency {
        LatencyProfile::simulated()
    } else {
        LatencyProfile::none()
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .backend(backend)
        .latency(latency)
        .build();

    tracing::debug!("samplebook v{}", samplebook::VERSION);

    let (notifier, notifications) = ChannelNotifier::new();
    let store = match RecordStore::open(config, Arc::new(notifier)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    };

    let view = ViewController::new(store);
    let outcome = run(&view, args.command).await;

    print_notifications(&notifications);
    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(view: &ViewController, command: Commands) -> Result<(), ViewError> {
    view.mount().await?;

    match command {
        Commands::List { search } => {
            if let Some(query) = search {
                view.set_search(query);
            }
            print_snapshot(&view.snapshot());
        }

        Commands::Columns => {
            let model = view.column_model();
            for column in view.schema().columns() {
                let mut flags = Vec::new();
                if model.is_editable(column) {
                    flags.push(match model.field_kind(column) {
                        FieldKind::SingleLine => "editable",
                        FieldKind::MultiLine => "editable, multi-line",
                    });
                }
                if !model.displayable().contains(column) {
                    flags.push("hidden");
                }
                println!("{:<16} {:<16} {}", column, label(column), flags.join(", "));
            }
        }

        Commands::Add { set } => {
            view.add_new()?;
            for (column, value) in set {
                view.set_field(&column, value)?;
            }
            let saved = view.submit().await?;
            println!("Created record {}", saved.display_value("id"));
            print_snapshot(&view.snapshot());
        }

        Commands::Edit { id, set } => {
            view.edit_row(id)?;
            for (column, value) in set {
                view.set_field(&column, value)?;
            }
            view.submit().await?;
            println!("Updated record {}", id);
            print_snapshot(&view.snapshot());
        }

        Commands::Delete { id, yes } => {
            view.request_delete(id)?;
            if yes {
                view.confirm_delete().await?;
                println!("Deleted record {}", id);
                print_snapshot(&view.snapshot());
            } else {
                view.cancel_delete()?;
                println!("{}", DELETE_CONFIRM_MESSAGE);
                println!("Re-run with --yes to delete record {}.", id);
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &ViewSnapshot) {
    match &snapshot.table {
        None => println!("{}", LOADING_MESSAGE),
        Some(table) => print_table(table),
    }
}

fn print_table(table: &TableView) {
    if let Some(empty) = table.empty {
        println!("{}", empty.message());
        println!("{}", empty.hint());
        return;
    }

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let headers: Vec<String> = table.headers.iter().map(|h| h.to_uppercase()).collect();
    println!("{}", line(&headers));
    for row in &table.rows {
        println!("{}", line(&row.cells));
    }
}

fn print_notifications(notifications: &Receiver<Notification>) {
    for notification in notifications.try_iter() {
        println!("{}", notification);
    }
}
