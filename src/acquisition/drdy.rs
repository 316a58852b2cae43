//! Data-ready event handoff.
//!
//! The falling-edge callback on the DRDY line never touches the bus.
//! It owns a [`DrdyNotifier`] and records the edge with a bounded,
//! non-blocking enqueue; the acquisition loop owns the matching
//! [`DrdyListener`] and drains events in its own context. With exactly
//! one bus owner there is nothing for the edge context and the loop to
//! race on.

use core::convert::Infallible;
use heapless::spsc::{Consumer, Producer, Queue};

/// Backing depth of the data-ready queue. The queue holds up to
/// `DRDY_QUEUE_DEPTH - 1` pending events; edges arriving beyond that
/// are dropped, never blocked on.
pub const DRDY_QUEUE_DEPTH: usize = 8;

/// Backing storage for one notifier/listener pair.
pub type DrdyQueue = Queue<DrdyEvent, DRDY_QUEUE_DEPTH>;

/// A falling edge observed on the data-ready line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrdyEvent {
    /// Identifier of the input line that fired, as handed to the edge
    /// callback by the interrupt source.
    pub line: u8,
}

/// Producer half, owned by the edge callback.
pub struct DrdyNotifier<'a> {
    producer: Producer<'a, DrdyEvent, DRDY_QUEUE_DEPTH>,
}

impl DrdyNotifier<'_> {
    /// Records one falling edge. Bounded and non-blocking: returns
    /// `false` when the queue was full and the event was dropped.
    pub fn notify(&mut self, line: u8) -> bool {
        self.producer.enqueue(DrdyEvent { line }).is_ok()
    }
}

/// Consumer half, owned by the acquisition loop.
pub struct DrdyListener<'a> {
    consumer: Consumer<'a, DrdyEvent, DRDY_QUEUE_DEPTH>,
}

impl DrdyListener<'_> {
    /// Takes the next pending event; `WouldBlock` when none is pending.
    pub fn poll(&mut self) -> nb::Result<DrdyEvent, Infallible> {
        self.consumer.dequeue().ok_or(nb::Error::WouldBlock)
    }
}

/// Splits queue storage into the notifier/listener pair.
pub fn split(queue: &mut DrdyQueue) -> (DrdyNotifier<'_>, DrdyListener<'_>) {
    let (producer, consumer) = queue.split();
    (DrdyNotifier { producer }, DrdyListener { consumer })
}
