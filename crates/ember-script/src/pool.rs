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

use rhai::Scope;

/// A fixed set of execution contexts.
///
/// A context is taken out of its slot for the duration of a call, so the pool
/// itself is never borrowed while script code runs.
pub(crate) struct ContextPool {
    slots: Vec<Option<Scope<'static>>>,
    active: usize,
    exhausted: bool,
}

/// A context taken from the pool; must be handed back with [`ContextPool::release`].
pub(crate) struct Lease {
    pub slot: usize,
    pub scope: Scope<'static>,
}

impl ContextPool {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| Some(Scope::new())).collect(),
            active: 0,
            exhausted: false,
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Takes the first free context. On failure the current call chain is
    /// marked exhausted.
    pub fn acquire(&mut self) -> Option<Lease> {
        let found = self
            .slots
            .iter_mut()
            .enumerate()
            .find_map(|(slot, s)| s.take().map(|scope| Lease { slot, scope }));
        match found {
            Some(lease) => {
                self.active += 1;
                Some(lease)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Returns a context to its slot.
    ///
    /// ## Returns
    /// `true` if this release ended a call chain in which an acquisition failed.
    /// The flag is reset for the next chain.
    pub fn release(&mut self, mut lease: Lease) -> bool {
        lease.scope.clear();
        self.slots[lease.slot] = Some(lease.scope);
        self.active -= 1;
        if self.active == 0 && self.exhausted {
            self.exhausted = false;
            return true;
        }
        false
    }
}
