//! Decodes files of events and folds their state into rooms.
//!
//! Each input file holds either a JSON array of events or one event object
//! after another (e.g. newline delimited). Invalid JSON ends the file: with
//! `fail_fast` unset it is logged and counted, and the remaining files are
//! still read.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};

use failure::Error;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use mxevents::{Content, Event, Rooms};

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
struct Settings {
    /// Room used for events that don't carry a `room_id`, as is the case
    /// for the state lists in sync responses.
    default_room_id: Option<String>,
    /// Stop at the first event that fails to decode.
    fail_fast: bool,
}

#[derive(Debug, Default)]
struct Stats {
    decoded: usize,
    failed: usize,
    unreadable: usize,
    state: usize,
    fallback: usize,
}

struct Processor<W> {
    settings: Settings,
    rooms: Rooms,
    stats: Stats,
    reencode: Option<W>,
}

impl<W: Write> Processor<W> {
    #[tracing::instrument(skip(self))]
    fn process_file(&mut self, path: &str) -> Result<(), Error> {
        self.process_reader(BufReader::new(File::open(path)?))
    }

    fn process_reader(&mut self, reader: impl Read) -> Result<(), Error> {
        let values =
            serde_json::Deserializer::from_reader(reader).into_iter::<Value>();

        let mut seen = 0;
        for value in values {
            let value = match value {
                Ok(value) => value,
                Err(e) if self.settings.fail_fast => return Err(e.into()),
                Err(e) => {
                    // The stream can't resync after a syntax error.
                    warn!("Abandoning rest of file after {} values: {}", seen, e);
                    self.stats.unreadable += 1;
                    break;
                }
            };
            seen += 1;

            match value {
                Value::Array(values) => {
                    for value in values {
                        self.process_value(value)?;
                    }
                }
                value => self.process_value(value)?,
            }
        }

        debug!("Read {} values", seen);

        Ok(())
    }

    fn process_value(&mut self, value: Value) -> Result<(), Error> {
        let event = match Event::from_value(value) {
            Ok(event) => event,
            Err(e) if self.settings.fail_fast => return Err(e.into()),
            Err(e) => {
                warn!("Skipping event: {}", e);
                self.stats.failed += 1;
                return Ok(());
            }
        };

        self.stats.decoded += 1;
        if let Content::Other(_) = event.content() {
            self.stats.fallback += 1;
        }

        if let Some(out) = &mut self.reencode {
            out.write_all(&event.encode()?)?;
            out.write_all(b"\n")?;
        }

        if !event.is_state() {
            return Ok(());
        }

        let room_id = match event
            .room_id()
            .or_else(|| self.settings.default_room_id.as_deref())
        {
            Some(room_id) => room_id.to_string(),
            None => {
                info!(
                    "Ignoring state event {:?} without a room",
                    event.event_id()
                );
                return Ok(());
            }
        };

        self.rooms.apply_state(&room_id, event)?;
        self.stats.state += 1;

        Ok(())
    }
}

/// Prints log records, which `tracing_log` forwards as events, along with
/// the spans they happened in.
fn subscriber() -> impl Subscriber + Send + Sync {
    let log_layer = tracing_subscriber::fmt::layer().with_ansi(false);
    Registry::default().with(log_layer)
}

fn main() -> Result<(), Error> {
    tracing_log::env_logger::init();
    tracing::subscriber::set_global_default(subscriber())?;

    // We need to import this due to clap::app_from_crate!.
    use clap::{crate_authors, crate_description, crate_name, crate_version};

    let matches = clap::app_from_crate!()
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Specify config files to load"),
        )
        .arg(
            clap::Arg::with_name("user")
                .short("u")
                .long("user")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Print this user's membership in every room"),
        )
        .arg(
            clap::Arg::with_name("reencode")
                .long("reencode")
                .help("Write every decoded event back out as JSON"),
        )
        .arg(
            clap::Arg::with_name("input")
                .required(true)
                .multiple(true)
                .help("Files of events to read"),
        )
        .get_matches();

    let mut settings = config::Config::new();
    for config_file in matches.values_of("config").unwrap_or_default() {
        settings.merge(config::File::with_name(config_file))?;
    }
    let settings: Settings = settings.try_into()?;

    let stdout = io::stdout();
    let mut processor = Processor {
        settings,
        rooms: Rooms::new(),
        stats: Stats::default(),
        reencode: if matches.is_present("reencode") {
            Some(stdout.lock())
        } else {
            None
        },
    };

    for path in matches.values_of("input").unwrap_or_default() {
        processor.process_file(path)?;
    }

    let Processor { rooms, stats, .. } = processor;

    info!(
        "Decoded {} events ({} fallback), {} failed, {} state applied, {} files cut short",
        stats.decoded, stats.failed, stats.fallback, stats.state, stats.unreadable
    );

    let users: Vec<&str> = matches.values_of("user").unwrap_or_default().collect();

    let mut room_ids: Vec<&str> = rooms.room_ids().collect();
    room_ids.sort();

    for room_id in room_ids {
        let room = match rooms.get(room_id) {
            Some(room) => room,
            None => continue,
        };

        eprintln!(
            "{} name={:?} topic={:?} state_entries={} joined={}",
            room_id,
            room.name(),
            room.topic(),
            room.len(),
            room.users_with_membership("join").count(),
        );

        for user in &users {
            eprintln!("  {} {}", user, room.membership(user));
        }
    }

    Ok(())
}
