//! Multithreaded completion facilities
//!
//! This submodule provides the pieces of the protocol which deal with
//! completions crossing thread boundaries.
//!
//! - Deferred senders are the entry point: some other thread gets hold of a
//!   completer, and signals the outcome of its work through it.
//! - Blocking allows a client to wait for a sender's completion and extract
//!   its result. Although easy to use and reason about, this synchronization
//!   method should be used sparingly as it stalls the calling thread.
//! - Polling is suitable when a client is only interested in periodically
//!   checking whether an operation is over, without synchronizing with it.


pub mod blocking;
pub mod deferred;
pub mod polling;
