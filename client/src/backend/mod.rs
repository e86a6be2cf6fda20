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

//! Provide the emulator and remote node implementations of [crate::Backend] and
//! [crate::Account].
mod emulator;
mod remote_node;

pub use emulator::{Emulator, EmulatorAccount, EMULATOR_OWNER, PLATFORM_FEE_BASIS_POINTS};
pub use remote_node::{RemoteAccount, RemoteNode};
