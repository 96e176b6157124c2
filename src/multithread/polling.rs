//! Polling-based monitoring of asynchronous operations
//!
//! This module provides a way to monitor an operation without ever blocking:
//! the operation is started, and its completion is written into a triple
//! buffer which the client may check whenever it sees fit. It is the right
//! tool when a client is only interested in periodically checking whether an
//! operation is over, for example to refresh a progress display.

use crate::completion::Completion;
use crate::receiver::Receiver;
use crate::sender::{Connect, OperationState, Sender};
use triple_buffer::{Input, Output, TripleBuffer};


/// Status of a monitored operation
#[derive(Clone, Debug)]
pub enum OperationStatus<T> {
    /// The operation has not completed yet
    Pending,

    /// The operation has completed
    Complete(Completion<T>),
}
//
impl<T> OperationStatus<T> {
    /// Truth that the operation has completed (i.e. won't change anymore)
    pub fn is_final(&self) -> bool {
        matches!(self, OperationStatus::Complete(_))
    }
}


/// Start a sender, and monitor its completion by polling
pub fn poll<S>(sender: S) -> PollingMonitor<<S as Sender>::Value>
    where S: Sender + Connect<PollingReceiver<<S as Sender>::Value>>,
          <S as Sender>::Value: Clone + Send
{
    // Setup triple buffer-based producer/client communication...
    let buffer = TripleBuffer::new(&OperationStatus::Pending);
    let (input, output) = buffer.split();

    // ...then start the operation
    let mut operation = sender.connect(PollingReceiver { input });
    operation.start();
    PollingMonitor { output }
}


/// Receiver which publishes the completion into a triple buffer
pub struct PollingReceiver<T: Clone + Send> {
    /// The completion will be sent through this triple buffer
    input: Input<OperationStatus<T>>,
}
//
impl<T: Clone + Send> Receiver<T> for PollingReceiver<T> {
    fn complete(mut self, completion: Completion<T>) {
        self.input.write(OperationStatus::Complete(completion));
    }
}


/// Client interface, used to check the operation status
pub struct PollingMonitor<T: Clone + Send> {
    /// Current operation status will be read through this triple buffer
    output: Output<OperationStatus<T>>,
}
//
impl<T: Clone + Send> PollingMonitor<T> {
    /// Access the current operation status
    pub fn status(&mut self) -> &OperationStatus<T> {
        self.output.read()
    }

    /// Truth that the operation has completed
    pub fn is_complete(&mut self) -> bool {
        self.status().is_final()
    }
}


/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::just::just;
    use crate::multithread::deferred::deferred;
    use crate::sender::SenderExt;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Inline senders are complete as soon as they are started
    #[test]
    fn inline_completion() {
        let mut monitor = poll(just(2).then(|x: i32| x + 1));
        assert!(monitor.is_complete());
        assert!(matches!(monitor.status(),
                         OperationStatus::Complete(Completion::Value(3))));
    }

    /// Status changes propagate from the producer to the client
    #[test]
    fn status_propagation() {
        let (sender, mut completer) = deferred::<String>();
        let mut monitor = sender.poll();
        assert!(matches!(monitor.status(), OperationStatus::Pending));

        completer.set_value("finished".to_owned());
        match monitor.status() {
            OperationStatus::Complete(Completion::Value(s)) => {
                assert_eq!(s, "finished")
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    /// Polling picks up completions signaled from another thread
    #[test]
    fn cross_thread_polling() {
        let (sender, mut completer) = deferred::<u8>();
        let mut monitor = poll(sender);
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            completer.set_done();
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while !monitor.is_complete() {
            assert!(Instant::now() < deadline, "completion never showed up");
            thread::yield_now();
        }
        assert!(matches!(monitor.status(),
                         OperationStatus::Complete(Completion::Done)));
        producer.join().unwrap();
    }
}
