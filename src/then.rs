//! Continuation combinator
//!
//! `then(sender, f)` describes a computation which runs `sender`, and then
//! feeds its value into the continuation `f`. The value produced by `f`
//! becomes the value of the combined sender. Errors and cancellations coming
//! from upstream are forwarded to the downstream receiver untouched, without
//! ever invoking `f`.
//!
//! The continuation's signature follows the shape of the upstream value:
//!
//! - If the upstream sender produces no value (its value type is `()`), the
//!   continuation takes no argument: `|| 42`
//! - Otherwise, it takes the value as its single argument: `|x: i32| x * 2`
//!
//! Symmetrically, a continuation which returns `()` turns the combined sender
//! into a sender which produces no value.
//!
//! Since the arity of the continuation is selected through a trait rather than
//! through a closure bound, closure arguments must carry a type annotation.
//!
//! If the continuation panics, the panic is caught and forwarded to the
//! downstream receiver as `ExecError::Panicked`, so that the consumer still
//! observes exactly one completion.

use crate::completion::Completion;
use crate::error::ExecError;
use crate::receiver::Receiver;
use crate::sender::{Connect, Sender};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};


/// Function which can process the value of an upstream sender
///
/// The `Marker` parameter only serves to tell apart the implementations for
/// each supported arity, and is inferred by the compiler.
///
pub trait Continuation<Args, Marker> {
    /// Result of the continuation
    type Output;

    /// Run the continuation on the upstream value
    fn invoke(self, args: Args) -> Self::Output;
}

/// Marker of continuations which process a sender without value
pub enum NoArgs {}

/// Marker of continuations which process a sender's single value
pub enum OneArg {}

impl<F, U> Continuation<(), NoArgs> for F
    where F: FnOnce() -> U
{
    type Output = U;

    fn invoke(self, _args: ()) -> U {
        self()
    }
}

impl<F, T, U> Continuation<T, OneArg> for F
    where F: FnOnce(T) -> U
{
    type Output = U;

    fn invoke(self, args: T) -> U {
        self(args)
    }
}


/// Sender which maps the value of an upstream sender through a continuation
pub struct Then<S, F, Marker> {
    /// Upstream sender
    sender: S,

    /// Continuation applied to the upstream value
    f: F,

    marker: PhantomData<fn() -> Marker>,
}
//
impl<S, F, Marker> Sender for Then<S, F, Marker>
    where S: Sender,
          F: Continuation<S::Value, Marker>
{
    type Value = F::Output;

    // Cancellation never originates here, but upstream cancellations are
    // forwarded as they come.
    const SENDS_DONE: bool = S::SENDS_DONE;
}
//
impl<S, F, Marker, R> Connect<R> for Then<S, F, Marker>
    where S: Connect<ThenReceiver<R, F, Marker>>,
          F: Continuation<<S as Sender>::Value, Marker>,
          R: Receiver<F::Output>
{
    type Operation = S::Operation;

    fn connect(self, receiver: R) -> Self::Operation {
        self.sender.connect(
            ThenReceiver {
                receiver,
                f: self.f,
                marker: PhantomData,
            }
        )
    }
}


/// Chain a continuation after a sender
pub fn then<S, F, Marker>(sender: S, f: F) -> Then<S, F, Marker>
    where S: Sender,
          F: Continuation<S::Value, Marker>
{
    Then {
        sender,
        f,
        marker: PhantomData,
    }
}


/// Receiver which runs the continuation, then notifies the downstream receiver
pub struct ThenReceiver<R, F, Marker> {
    /// Downstream receiver
    receiver: R,

    /// Continuation applied to the upstream value
    f: F,

    marker: PhantomData<fn() -> Marker>,
}
//
impl<T, R, F, Marker> Receiver<T> for ThenReceiver<R, F, Marker>
    where F: Continuation<T, Marker>,
          R: Receiver<F::Output>
{
    fn complete(self, completion: Completion<T>) {
        let ThenReceiver { receiver, f, .. } = self;
        match completion {
            Completion::Value(value) => {
                match panic::catch_unwind(AssertUnwindSafe(|| f.invoke(value))) {
                    Ok(output) => receiver.set_value(output),
                    Err(payload) => {
                        let error = ExecError::from_panic(payload);
                        log::warn!("forwarding continuation failure: {}", error);
                        receiver.set_error(error);
                    }
                }
            }
            Completion::Error(error) => receiver.set_error(error),
            Completion::Done => receiver.set_done(),
        }
    }
}
