// Bountyhub
// Copyright (C) 2026 The Bountyhub developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Logger setup for the indexer binary.
use env_logger::fmt::{Color, Formatter};
use log::{Level, LevelFilter, Record};
use std::io::Write as _;

/// Crates whose debug output drowns the monitor logs.
const QUIET_CRATES: [&str; 3] = ["hyper", "reqwest", "starknet_providers"];

/// Log to stdout with the filter from `RUST_LOG`, `info` if unset.
///
/// Records look like `12:03:44.015 INFO  monitor  processed blocks 10..=12`.
pub fn init() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    for name in QUIET_CRATES.iter() {
        builder.filter_module(name, LevelFilter::Warn);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .format(format_record)
        .target(env_logger::Target::Stdout)
        .init();
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug | Level::Trace => Color::Cyan,
    }
}

fn format_record(formatter: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let now = time::OffsetDateTime::now_local();
    // `bountyhub_indexer::monitor` is shown as `monitor`.
    let target = record
        .target()
        .rsplit("::")
        .next()
        .unwrap_or_else(|| record.target());

    let mut time_style = formatter.style();
    time_style.set_color(Color::Black).set_intense(true);
    let mut level_style = formatter.style();
    level_style.set_color(level_color(record.level()));

    writeln!(
        formatter,
        "{}.{:03} {:<5} {}  {}",
        time_style.value(now.format("%H:%M:%S")),
        now.millisecond(),
        level_style.value(record.level()),
        target,
        record.args()
    )
}
