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

//! Logger abstraction used for assertions and diagnostics inside
//! [`crate::grmap`] and [`crate::hullset`].
//!
//! Both cores are handed a `&dyn Logger` rather than calling the `log`
//! crate's global macros directly, so that an embedder can route
//! diagnostics wherever it likes without this crate assuming a process-wide
//! subscriber is installed.

/// Diagnostic sink for the core subsystems.
pub trait Logger {
    fn debug(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Default [`Logger`] that forwards to the `log` crate's global facade,
/// which `main` wires up with `env_logger` at process start.
#[derive(Clone, Copy, Default)]
pub struct EnvLogger;

impl Logger for EnvLogger {
    fn debug(&self, msg: &str) {
        log::debug!("{msg}");
    }
    fn warn(&self, msg: &str) {
        log::warn!("{msg}");
    }
    fn error(&self, msg: &str) {
        log::error!("{msg}");
    }
}

/// A [`Logger`] that discards everything, handy for tests that don't want
/// to depend on `env_logger` having been initialized.
#[derive(Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}
