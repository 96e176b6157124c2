//! Composable asynchronous operations
//!
//! Picture yourself in a situation where: you want to delegate work to another
//! hardware or software entity, such as a thread, a GPU, an IO device, or even
//! a server over a network. You would like to describe what should happen with
//! the result of that work once it comes in, and chain several such steps into
//! a pipeline, without stalling the thread which sets the pipeline up. But at
//! some point, some code is going to need the final result, and will have to
//! wait for it.
//!
//! This crate models that situation with three concepts:
//!
//! - A **sender** describes a deferred computation. It does nothing by itself,
//!   it is only a blueprint which declares what kind of value it produces.
//! - A **receiver** consumes the single completion of a computation, which is
//!   either a value, an error, or a cancellation (see `Completion`).
//! - An **operation state** is what you get by connecting a sender to a
//!   receiver. Starting it launches the computation, which eventually
//!   completes the receiver, exactly once.
//!
//! Pipelines are built by chaining continuations with `then`, and the way back
//! to synchronous code is `get`, which blocks until a sender completes:
//!
//! ```
//! use threaded_senders::{just, SenderExt};
//!
//! let sender = just(5).then(|x: i32| x * 2)
//!                     .then(|x: i32| format!("result is {}", x));
//! assert_eq!(sender.get().unwrap(), "result is 10");
//! ```
//!
//! This crate does not schedule any work by itself. Where a computation runs
//! is decided by whoever completes it, for example by another thread holding
//! the completer of a `deferred` sender.

pub mod allocator;
pub mod completer;
pub mod completion;
pub mod config;
pub mod error;
pub mod just;
pub mod multithread;
pub mod receiver;
pub mod runtime;
pub mod sender;
pub mod then;

pub use completion::Completion;
pub use error::ExecError;
pub use just::{just, just_done, just_error};
pub use multithread::blocking::{get, wait};
pub use multithread::deferred::{deferred, DeferredCompleter, DeferredSender};
pub use multithread::polling::{poll, OperationStatus, PollingMonitor};
pub use receiver::{FnReceiver, Receiver};
pub use sender::{connect, start, start_detached};
pub use sender::{Connect, OperationState, Sender, SenderExt};
pub use then::{then, Continuation, Then};
