//! Program entry and exit glue
//!
//! The runtime invokes a user-supplied entry function with the program's
//! argument count and argument vector, and runs the registered teardown hooks
//! once the entry function is over, before handing its exit code back. The
//! blocking extractor may be used inside the entry function to obtain the
//! results of asynchronous work started during startup.

use crate::config::RuntimeConfig;
use std::env;


/// Teardown notification
pub type TeardownHook = Box<dyn FnOnce() + Send>;


/// Entry/exit harness
pub struct Runtime {
    /// Runtime configuration
    config: RuntimeConfig,

    /// Hooks to be run on teardown, in registration order
    teardown: Vec<TeardownHook>,
}
//
impl Runtime {
    /// Create a runtime with some configuration
    pub fn new(config: RuntimeConfig) -> Self {
        Runtime {
            config,
            teardown: Vec::new(),
        }
    }

    /// Access the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Register a hook to be run on teardown
    pub fn on_teardown<F>(&mut self, hook: F) -> &mut Self
        where F: FnOnce() + Send + 'static
    {
        self.teardown.push(Box::new(hook));
        self
    }

    /// Run the entry function, then tear the runtime down
    ///
    /// Teardown hooks also run if the entry function panics, while the panic
    /// unwinds through this function.
    ///
    pub fn run<F>(self, args: Vec<String>, entry: F) -> i32
        where F: FnOnce(usize, &[String]) -> i32
    {
        let Runtime { config, teardown } = self;
        if config.install_logger {
            install_logger(&config.log_filter);
        }

        let _teardown = TeardownGuard(teardown);
        log::debug!("running entry function with {} arguments", args.len());
        let exit_code = entry(args.len(), &args);
        log::info!("entry function returned {}, tearing down", exit_code);
        exit_code
    }
}


/// Run an entry function with the process arguments, configured from the
/// environment
pub fn run_main<F>(entry: F) -> i32
    where F: FnOnce(usize, &[String]) -> i32
{
    let (config, config_error) = match RuntimeConfig::load() {
        Ok(config) => (config, None),
        Err(error) => (RuntimeConfig::default(), Some(error)),
    };
    let runtime = Runtime::new(config);
    if let Some(error) = config_error {
        if runtime.config.install_logger {
            install_logger(&runtime.config.log_filter);
        }
        log::warn!("ignoring invalid runtime configuration: {}", error);
    }
    runtime.run(env::args().collect(), entry)
}


/// Install the logger, unless one is already there
fn install_logger(filter: &str) {
    let result = env_logger::Builder::new()
        .parse_filters(filter)
        .try_init();
    if result.is_err() {
        log::debug!("a logger is already installed, keeping it");
    }
}


/// Runs the teardown hooks when dropped
struct TeardownGuard(Vec<TeardownHook>);
//
impl Drop for TeardownGuard {
    fn drop(&mut self) {
        for hook in self.0.drain(..) {
            hook();
        }
    }
}


/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::just::just;
    use crate::sender::SenderExt;
    use std::panic;
    use std::sync::{Arc, Mutex};

    fn quiet_config() -> RuntimeConfig {
        RuntimeConfig {
            install_logger: false,
            ..RuntimeConfig::default()
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// The entry function sees the arguments, and its exit code is returned
    #[test]
    fn entry_and_exit_code() {
        let runtime = Runtime::new(quiet_config());
        let code = runtime.run(args(&["prog", "a", "b"]), |argc, argv| {
            assert_eq!(argc, 3);
            assert_eq!(argv[1], "a");
            7
        });
        assert_eq!(code, 7);
    }

    /// Teardown hooks run after the entry function, in registration order
    #[test]
    fn teardown_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = Runtime::new(quiet_config());
        for name in &["first", "second"] {
            let events = events.clone();
            runtime.on_teardown(move || events.lock().unwrap().push(*name));
        }

        let entry_events = events.clone();
        runtime.run(args(&["prog"]), move |_, _| {
            entry_events.lock().unwrap().push("entry");
            0
        });
        assert_eq!(*events.lock().unwrap(), vec!["entry", "first", "second"]);
    }

    /// Teardown hooks still run when the entry function panics
    #[test]
    fn teardown_on_panic() {
        let torn_down = Arc::new(Mutex::new(false));
        let c_torn_down = torn_down.clone();
        let mut runtime = Runtime::new(quiet_config());
        runtime.on_teardown(move || *c_torn_down.lock().unwrap() = true);

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            runtime.run(args(&["prog"]), |_, _| panic!("entry failed"))
        }));
        assert!(result.is_err());
        assert!(*torn_down.lock().unwrap());
    }

    /// Asynchronous results can be extracted from within the entry function
    #[test]
    fn blocking_inside_entry() {
        let runtime = Runtime::new(quiet_config());
        let code = runtime.run(args(&["prog", "41"]), |_, argv| {
            let input: i32 = argv[1].parse().unwrap();
            just(input).then(|x: i32| x + 1).get().unwrap()
        });
        assert_eq!(code, 42);
    }
}
