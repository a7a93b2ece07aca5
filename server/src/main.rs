/*
 * Created on Mon Jul 27 2026
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2026, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! `graphd` boot entry point. There is no network server here (see
//! this core's scope) — this binary exists to load configuration, stand
//! up logging, and construct an empty [`graphd::Grmap`]/[`graphd::HullSet`]
//! pair as a smoke test of the library surface.

use graphd::{alloc::Global, config::Config, logger::EnvLogger, Grmap, HullSet};
use std::env;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
/// Jemallocator - this is the default memory allocator for platforms other than msvc
static GLOBAL: Jemalloc = Jemalloc;

const CONFIG_PATH: &str = "graphd.yaml";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = Config::load_file(CONFIG_PATH).unwrap_or_else(|e| {
        eprintln!("warning: {e}, falling back to defaults");
        Config::default()
    });
    config.apply_cli_overrides(args);

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    log::info!(
        "starting graphd with table_size={} hull_max_slots={}",
        config.table_size,
        config.hull_max_slots
    );

    let mut grmap = Grmap::init(&Global, EnvLogger);
    grmap
        .set_table_size(config.table_size)
        .expect("table_size is configured before first use");

    let hullset = HullSet::create_default(EnvLogger, config.hull_max_slots)
        .expect("hull_max_slots is clamped into a valid range by HullSet::create");

    log::info!(
        "boot smoke test ok: grmap table_size={} hullset slot_count={}",
        grmap.table_size(),
        hullset.slot_count()
    );
}
