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

/// A single-owner FIFO event channel.
///
/// The bus is generic over the event type `T` so that `ember-core` stays
/// decoupled from event types defined in higher-level crates. Extra senders can
/// be handed out with [`EventBus::sender`]; the owner drains the queue.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates a new EventBus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Queues an event.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    pub fn publish(&self, event: T) {
        log::trace!("Publishing an event.");

        // The bus owns its receiver, so the channel cannot be disconnected here.
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns the oldest queued event, if any, without blocking.
    pub fn poll(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Removes and returns every queued event in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if no event is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Returns a clone of the sender end of the channel.
    ///
    /// ## Returns
    /// A sender that queues onto this bus.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Resized { width: u32, height: u32 },
        Key(String),
        Quit,
    }

    #[test]
    fn poll_empty_bus() {
        let bus = EventBus::<TestEvent>::new();
        assert!(bus.is_empty());
        assert_eq!(bus.poll(), None);
    }

    #[test]
    fn events_are_delivered_in_order() {
        let bus = EventBus::<TestEvent>::new();
        bus.publish(TestEvent::Resized {
            width: 1,
            height: 1,
        });
        bus.publish(TestEvent::Key("w".to_string()));
        bus.sender().send(TestEvent::Quit).expect("Send should succeed");

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.poll(),
            Some(TestEvent::Resized {
                width: 1,
                height: 1
            })
        );
        assert_eq!(
            bus.drain(),
            vec![TestEvent::Key("w".to_string()), TestEvent::Quit]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn send_from_thread() {
        let bus = EventBus::<TestEvent>::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            sender.send(TestEvent::Quit).expect("Send from thread failed");
        });
        handle.join().expect("Thread join failed");

        assert_eq!(bus.poll(), Some(TestEvent::Quit));
    }
}
