//! Asynchronous pipelines (thread backend)
//!
//! Small demonstration of the crate: a worker thread computes a value, a
//! pipeline of continuations processes it, and the entry function waits for
//! the final result before exiting.

use std::process;
use std::thread;
use std::time::Duration;
use threaded_senders::{deferred, runtime, ExecError, SenderExt};


fn main() {
    let exit_code = runtime::run_main(|argc, argv| {
        // Parse the input, if any
        let input = match argv.get(1).map(|arg| arg.parse::<u64>()) {
            None => 10,
            Some(Ok(input)) => input,
            Some(Err(error)) => {
                eprintln!("usage: {} [count]: {}", argv[0], error);
                return 2;
            }
        };
        log::debug!("started with {} arguments", argc);

        // Hand the heavy work over to another thread
        let (sender, mut completer) = deferred::<u64>();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            completer.set_value((1..=input).sum());
        });

        // Describe what should happen with the result, then wait for it
        let pipeline = sender
            .then(|sum: u64| sum * 2)
            .then(|doubled: u64| format!("twice the sum is {}", doubled));
        let outcome = pipeline.get();
        if worker.join().is_err() {
            log::error!("worker thread panicked");
        }

        match outcome {
            Ok(message) => {
                println!("{}", message);
                0
            }
            Err(ExecError::Cancelled) => {
                println!("operation was cancelled");
                1
            }
            Err(error) => {
                eprintln!("operation failed: {}", error);
                1
            }
        }
    });
    process::exit(exit_code);
}
