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

//! Process configuration: a YAML file overlaid with CLI flags.

use serde::Deserialize;
use std::{fs, path::Path};

/// Default GRMAP table size.
pub const DEFAULT_TABLE_SIZE: usize = 1024;
/// Default HullSet slot budget (clamped into `[3, 32768]` at construction).
pub const DEFAULT_HULL_MAX_SLOTS: usize = 512;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table_size: usize,
    pub hull_max_slots: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            hull_max_slots: DEFAULT_HULL_MAX_SLOTS,
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Load from a YAML file, falling back to defaults for any field the
    /// file omits. Returns the default config if `path` does not exist.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| format!("failed to read {path:?}: {e}"))?;
        serde_yaml::from_str(&raw).map_err(|e| format!("failed to parse {path:?}: {e}"))
    }

    /// Apply `--table-size=N` / `--hull-max-slots=N` / `--log-level=L`
    /// overrides from a raw argv slice of `--option=value` flags.
    pub fn apply_cli_overrides<I: IntoIterator<Item = String>>(&mut self, args: I) {
        for arg in args {
            let Some(rest) = arg.strip_prefix("--") else {
                continue;
            };
            let Some((key, value)) = rest.split_once('=') else {
                continue;
            };
            match key {
                "table-size" => {
                    if let Ok(n) = value.parse() {
                        self.table_size = n;
                    }
                }
                "hull-max-slots" => {
                    if let Ok(n) = value.parse() {
                        self.hull_max_slots = n;
                    }
                }
                "log-level" => self.log_level = value.to_owned(),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.table_size, 1024);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load_file("/nonexistent/path/graphd.yaml").unwrap();
        assert_eq!(cfg.table_size, DEFAULT_TABLE_SIZE);
    }

    #[test]
    fn cli_overrides_apply() {
        let mut cfg = Config::default();
        cfg.apply_cli_overrides(
            ["--table-size=2048".to_owned(), "--log-level=debug".to_owned()],
        );
        assert_eq!(cfg.table_size, 2048);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn unknown_or_malformed_flags_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_cli_overrides(["--bogus".to_owned(), "--table-size=notanumber".to_owned()]);
        assert_eq!(cfg.table_size, DEFAULT_TABLE_SIZE);
    }
}
