// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::WeakBridge;
use rhai::Engine;

type Installer = Box<dyn FnOnce(&mut Engine, &'static str, WeakBridge)>;

/// The table of native functions exposed to scripts.
///
/// Each entry pairs a script-visible name with an installer that registers
/// one or more overloads under that name. Installers run in insertion order
/// when the bridge is created and receive a [`WeakBridge`] so native code can
/// run other script functions.
///
/// ```
/// use ember_script::{HostFunctions, INT};
///
/// let mut host = HostFunctions::new();
/// host.insert("answer", |engine, name, _bridge| {
///     engine.register_fn(name, || 42 as INT);
/// });
/// assert_eq!(host.names().collect::<Vec<_>>(), vec!["answer"]);
/// ```
#[derive(Default)]
pub struct HostFunctions {
    entries: Vec<(&'static str, Installer)>,
}

impl HostFunctions {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. The same name may appear more than once to register
    /// overloads of different arity.
    pub fn insert<F>(&mut self, name: &'static str, install: F) -> &mut Self
    where
        F: FnOnce(&mut Engine, &'static str, WeakBridge) + 'static,
    {
        self.entries.push((name, Box::new(install)));
        self
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn install(self, engine: &mut Engine, bridge: &WeakBridge) {
        for (name, install) in self.entries {
            log::trace!("Registering host function '{name}'.");
            install(engine, name, bridge.clone());
        }
    }
}
