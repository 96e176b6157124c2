//! Sending side of the completion protocol
//!
//! A sender is a blueprint for an asynchronous computation. It declares up
//! front which kind of value it produces (`()` standing for "no value"), that
//! its errors are `ExecError`s like everywhere else in this crate, and whether
//! it may complete through the cancellation channel.
//!
//! Nothing happens until the sender is connected to a receiver and the
//! resulting operation state is started. Where the work then runs is up to the
//! concrete sender: inline senders complete inside `start()`, others hand the
//! work over to some external execution context.

use crate::completion::Completion;
use crate::error::ExecError;
use crate::multithread::blocking::{self, GetReceiver};
use crate::multithread::polling::{self, PollingMonitor, PollingReceiver};
use crate::receiver::FnReceiver;
use crate::then::{self, Continuation, Then};


/// Description of an asynchronous computation
pub trait Sender {
    /// Type of the value produced on success, `()` if there is none
    type Value;

    /// Truth that this sender may complete through the cancellation channel
    const SENDS_DONE: bool;
}


/// Ability of a sender to be connected to a given receiver type
pub trait Connect<R>: Sender {
    /// Operation state produced by the connection
    type Operation: OperationState;

    /// Bind the sender to a receiver, without starting any work
    fn connect(self, receiver: R) -> Self::Operation;
}


/// Connected pairing of a sender's execution and a receiver
///
/// Operation states must be started exactly once. Starting an operation for
/// the second time is a usage violation, which panics.
///
pub trait OperationState {
    /// Begin the computation
    fn start(&mut self);
}


/// Bind a sender to a receiver, without starting any work
pub fn connect<S, R>(sender: S, receiver: R) -> S::Operation
    where S: Connect<R>
{
    sender.connect(receiver)
}

/// Begin the computation described by an operation state
pub fn start<O: OperationState>(operation: &mut O) {
    operation.start();
}

/// Connect a sender to a completion callback and start it without waiting
///
/// Operation states in this crate hand their receiver over to the completion
/// path as soon as they are started, so the operation state can be discarded
/// right away.
///
pub fn start_detached<S, F>(sender: S, callback: F)
    where S: Sender + Connect<FnReceiver<<S as Sender>::Value, F>>,
          F: FnOnce(Completion<<S as Sender>::Value>)
{
    let mut operation = sender.connect(FnReceiver::new(callback));
    operation.start();
}


/// Extract the contents of an operation state's slot on start, enforcing the
/// single-start rule
pub(crate) fn take_on_start<T>(slot: &mut Option<T>) -> T {
    match slot.take() {
        Some(contents) => contents,
        None => panic!("operation started twice"),
    }
}


/// Method syntax for the algorithms of this crate
pub trait SenderExt: Sender + Sized {
    /// Map the value of this sender through a continuation
    fn then<F, Marker>(self, f: F) -> Then<Self, F, Marker>
        where F: Continuation<<Self as Sender>::Value, Marker>
    {
        then::then(self, f)
    }

    /// Block until this sender completes, returning its value
    fn get(self) -> Result<<Self as Sender>::Value, ExecError>
        where Self: Connect<GetReceiver<<Self as Sender>::Value>>
    {
        blocking::get(self)
    }

    /// Block until this sender completes, returning its raw completion
    fn wait(self) -> Completion<<Self as Sender>::Value>
        where Self: Connect<GetReceiver<<Self as Sender>::Value>>
    {
        blocking::wait(self)
    }

    /// Start this sender and monitor its completion by polling
    fn poll(self) -> PollingMonitor<<Self as Sender>::Value>
        where Self: Connect<PollingReceiver<<Self as Sender>::Value>>,
              <Self as Sender>::Value: Clone + Send
    {
        polling::poll(self)
    }

    /// Start this sender, handing its completion over to a callback
    fn start_detached<F>(self, callback: F)
        where Self: Connect<FnReceiver<<Self as Sender>::Value, F>>,
              F: FnOnce(Completion<<Self as Sender>::Value>)
    {
        start_detached(self, callback)
    }
}
//
impl<S: Sender> SenderExt for S {}


/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::just::{just, just_done, just_error};
    use crate::receiver::Receiver;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Receiver which counts how many times each channel was used
    #[derive(Clone, Default)]
    struct CountingReceiver {
        values: Rc<Cell<usize>>,
        errors: Rc<Cell<usize>>,
        dones: Rc<Cell<usize>>,
    }
    //
    impl CountingReceiver {
        fn total(&self) -> usize {
            self.values.get() + self.errors.get() + self.dones.get()
        }
    }
    //
    impl<T> Receiver<T> for CountingReceiver {
        fn complete(self, completion: Completion<T>) {
            let counter = match completion {
                Completion::Value(_) => &self.values,
                Completion::Error(_) => &self.errors,
                Completion::Done => &self.dones,
            };
            counter.set(counter.get() + 1);
        }
    }

    /// Connecting does not start any work, starting completes exactly once
    #[test]
    fn exactly_once_completion() {
        let receiver = CountingReceiver::default();
        let mut operation = connect(just(5), receiver.clone());
        assert_eq!(receiver.total(), 0);
        start(&mut operation);
        assert_eq!(receiver.total(), 1);
        assert_eq!(receiver.values.get(), 1);

        let receiver = CountingReceiver::default();
        let mut operation =
            connect(just_error::<u8>(ExecError::Abandoned), receiver.clone());
        start(&mut operation);
        assert_eq!(receiver.total(), 1);
        assert_eq!(receiver.errors.get(), 1);

        let receiver = CountingReceiver::default();
        let mut operation = connect(just_done::<u8>(), receiver.clone());
        start(&mut operation);
        assert_eq!(receiver.total(), 1);
        assert_eq!(receiver.dones.get(), 1);
    }

    /// Exactly-once completion holds through combinators too
    #[test]
    fn exactly_once_through_then() {
        let receiver = CountingReceiver::default();
        let sender = just(1).then(|x: i32| x + 1).then(|x: i32| x * 3);
        let mut operation = connect(sender, receiver.clone());
        assert_eq!(receiver.total(), 0);
        operation.start();
        assert_eq!(receiver.total(), 1);
        assert_eq!(receiver.values.get(), 1);
    }

    /// Starting an operation twice is a usage violation
    #[test]
    #[should_panic(expected = "operation started twice")]
    fn single_start_enforcement() {
        let receiver = CountingReceiver::default();
        let mut operation = connect(just(5), receiver);
        operation.start();
        operation.start();
    }

    /// Detached start hands the completion to the callback
    #[test]
    fn detached_start() {
        let result = Rc::new(Cell::new(0));
        let c_result = result.clone();
        just(20).then(|x: i32| x + 1).start_detached(move |c| {
            if let Completion::Value(v) = c {
                c_result.set(v);
            }
        });
        assert_eq!(result.get(), 21);
    }
}
