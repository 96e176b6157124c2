//! Receiving side of the completion protocol
//!
//! A receiver is supplied by the consumer of an asynchronous computation, and
//! is handed the single `Completion` of that computation once it resolves.
//! Receivers are consumed when they are completed, so that signaling twice
//! through the same receiver is rejected at compile time.
//!
//! Whether the completion gets delivered on the thread which started the
//! operation or on some other execution context is a property of the sender,
//! so receivers which may cross threads should be `Send`.

use crate::completion::Completion;
use crate::error::ExecError;
use std::marker::PhantomData;


/// Consumer of the single completion of an asynchronous operation
pub trait Receiver<T> {
    /// Deliver the final outcome of the operation
    fn complete(self, completion: Completion<T>);

    /// Signal success
    fn set_value(self, value: T) where Self: Sized {
        self.complete(Completion::Value(value));
    }

    /// Signal failure
    fn set_error(self, error: ExecError) where Self: Sized {
        self.complete(Completion::Error(error));
    }

    /// Signal cancellation
    fn set_done(self) where Self: Sized {
        self.complete(Completion::Done);
    }
}


/// Receiver which hands the completion over to a callback
///
/// The callback runs on whichever execution context delivers the completion,
/// so it should be kept short.
///
pub struct FnReceiver<T, F: FnOnce(Completion<T>)> {
    callback: F,
    value: PhantomData<fn(T)>,
}
//
impl<T, F: FnOnce(Completion<T>)> FnReceiver<T, F> {
    /// Wrap a completion callback
    pub fn new(callback: F) -> Self {
        FnReceiver {
            callback,
            value: PhantomData,
        }
    }
}
//
impl<T, F: FnOnce(Completion<T>)> Receiver<T> for FnReceiver<T, F> {
    fn complete(self, completion: Completion<T>) {
        (self.callback)(completion);
    }
}


/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// The callback is not called before the receiver is completed
    #[test]
    fn callback_setup() {
        let called = Rc::new(Cell::new(false));
        let c_called = called.clone();
        let _receiver = FnReceiver::new(move |_: Completion<u8>| {
            c_called.set(true)
        });
        assert!(!called.get());
    }

    /// Each provided entry point maps to the matching completion
    #[test]
    fn entry_points() {
        let seen = Rc::new(RefCell::new(Vec::new()));

        let make = |seen: Rc<RefCell<Vec<&'static str>>>| {
            FnReceiver::new(move |c: Completion<u32>| {
                seen.borrow_mut().push(c.channel())
            })
        };

        make(seen.clone()).set_value(3);
        make(seen.clone()).set_error(ExecError::Abandoned);
        make(seen.clone()).set_done();
        assert_eq!(*seen.borrow(), vec!["value", "error", "done"]);
    }
}
