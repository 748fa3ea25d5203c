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

use crossbeam_channel::{Receiver, Sender};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Recursive file-system watch feeding changed paths into a channel.
///
/// The channel outlives the OS watch, so invalidations can still be queued
/// through [`FileWatcher::sender`] when watching is unavailable.
pub(crate) struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    sender: Sender<PathBuf>,
    receiver: Receiver<PathBuf>,
}

impl FileWatcher {
    /// Starts watching `root`. Failure is logged and leaves the watcher inert.
    pub fn watch(root: &Path) -> Self {
        let mut watcher = Self::inert();
        match Self::spawn(root, watcher.sender.clone()) {
            Ok(w) => {
                log::info!("Watching '{}' for changes.", root.display());
                watcher.watcher = Some(w);
            }
            Err(e) => {
                log::warn!(
                    "Hot reload disabled, cannot watch '{}': {e}",
                    root.display()
                );
            }
        }
        watcher
    }

    /// A watcher with no OS watch; only explicit invalidations are seen.
    pub fn inert() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            watcher: None,
            sender,
            receiver,
        }
    }

    fn spawn(root: &Path, sender: Sender<PathBuf>) -> notify::Result<RecommendedWatcher> {
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        return;
                    }
                    for path in event.paths {
                        if let Err(e) = sender.send(path) {
                            log::trace!("Dropping change notification: {e}");
                        }
                    }
                }
                Err(e) => log::warn!("File watch error: {e}"),
            })?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(watcher)
    }

    pub fn is_active(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn sender(&self) -> Sender<PathBuf> {
        self.sender.clone()
    }

    /// Takes every pending path, deduplicated.
    pub fn drain(&self) -> BTreeSet<PathBuf> {
        self.receiver.try_iter().collect()
    }
}
