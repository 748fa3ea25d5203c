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

use crate::host::HostFunctions;
use crate::pool::ContextPool;
use crate::ScriptError;
use ember_io::{Handle, Script};
use rhai::{CallFnOptions, Dynamic, Engine};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Number of execution contexts used unless configured otherwise.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Severity of a diagnostic reported by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Output of the script `print` function.
    Print,
    /// Output of the script `debug` function.
    Debug,
    /// A script runtime error or pool exhaustion.
    Error,
}

type MessageCallback = Box<dyn Fn(MessageKind, &str)>;

fn log_message(kind: MessageKind, text: &str) {
    match kind {
        MessageKind::Print => log::info!(target: "script", "{text}"),
        MessageKind::Debug => log::debug!(target: "script", "{text}"),
        MessageKind::Error => log::error!(target: "script", "{text}"),
    }
}

struct BridgeInner {
    engine: Engine,
    pool: RefCell<ContextPool>,
    messages: Rc<RefCell<MessageCallback>>,
}

/// Shared handle to the script engine and its context pool.
///
/// Cloning is cheap; all clones drive the same engine.
#[derive(Clone)]
pub struct ScriptBridge {
    inner: Rc<BridgeInner>,
}

/// A non-owning [`ScriptBridge`] reference held by native functions.
#[derive(Clone)]
pub struct WeakBridge {
    inner: Weak<BridgeInner>,
}

impl WeakBridge {
    /// Returns the bridge if it is still alive.
    pub fn upgrade(&self) -> Option<ScriptBridge> {
        self.inner.upgrade().map(|inner| ScriptBridge { inner })
    }
}

impl ScriptBridge {
    /// Creates the script engine, installs `host` and allocates `pool_size`
    /// execution contexts.
    ///
    /// `print` and `debug` are always available to scripts; their output is
    /// routed through the message callback, which logs to the `script` target
    /// until replaced with [`ScriptBridge::set_message_callback`].
    pub fn init(host: HostFunctions, pool_size: usize) -> Result<Self, ScriptError> {
        if pool_size == 0 {
            return Err(ScriptError::InvalidPoolSize);
        }

        let callback: MessageCallback = Box::new(log_message);
        let messages = Rc::new(RefCell::new(callback));
        let host_count = host.len();

        let inner = Rc::new_cyclic(|weak: &Weak<BridgeInner>| {
            let mut engine = Engine::new();

            let sink = Rc::clone(&messages);
            engine.on_print(move |text| (*sink.borrow())(MessageKind::Print, text));
            let sink = Rc::clone(&messages);
            engine.on_debug(move |text, source, pos| {
                let line = match source {
                    Some(source) => format!("{source} {pos}: {text}"),
                    None => format!("{pos}: {text}"),
                };
                (*sink.borrow())(MessageKind::Debug, &line);
            });

            host.install(
                &mut engine,
                &WeakBridge {
                    inner: weak.clone(),
                },
            );

            BridgeInner {
                engine,
                pool: RefCell::new(ContextPool::new(pool_size)),
                messages,
            }
        });

        log::info!(
            "Script bridge initialized with {host_count} host functions and {pool_size} contexts."
        );
        Ok(Self { inner })
    }

    /// Replaces the diagnostic message callback.
    pub fn set_message_callback(&self, callback: impl Fn(MessageKind, &str) + 'static) {
        *self.inner.messages.borrow_mut() = Box::new(callback);
    }

    fn report(&self, kind: MessageKind, text: &str) {
        (*self.inner.messages.borrow())(kind, text);
    }

    /// A non-owning reference to this bridge.
    pub fn downgrade(&self) -> WeakBridge {
        WeakBridge {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Runs `function` from the module behind `script` and waits for it to finish.
    ///
    /// The function is looked up by name and arity: zero parameters when `arg`
    /// is `None`, one otherwise. The call executes in a context taken from the
    /// pool and returned afterwards, so native functions may call `run` again.
    ///
    /// ## Returns
    /// The function's return value. Script errors are reported through the
    /// message callback and returned as [`ScriptError::Runtime`]. If any call
    /// of a nested chain found the pool exhausted, the outermost call of that
    /// chain returns [`ScriptError::PoolExhausted`].
    pub fn run(
        &self,
        script: &Handle<Script>,
        function: &str,
        arg: Option<Dynamic>,
    ) -> Result<Dynamic, ScriptError> {
        let module = script.path();
        let ast = match script.get() {
            Some(script) => script.ast(),
            None => return Err(ScriptError::UnavailableModule { path: module }),
        };

        let arity = usize::from(arg.is_some());
        if !ast
            .iter_functions()
            .any(|f| f.name == function && f.params.len() == arity)
        {
            return Err(ScriptError::FunctionNotFound {
                module,
                function: function.to_string(),
                arity,
            });
        }

        let size = self.pool_size();
        let Some(mut lease) = self.inner.pool.borrow_mut().acquire() else {
            self.report(
                MessageKind::Error,
                &format!(
                    "No free script context for '{function}' in '{}': all {size} contexts are in use.",
                    module.display()
                ),
            );
            return Err(ScriptError::PoolExhausted { size });
        };

        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
        let result = match arg {
            Some(arg) => self.inner.engine.call_fn_with_options::<Dynamic>(
                options,
                &mut lease.scope,
                &ast,
                function,
                (arg,),
            ),
            None => self.inner.engine.call_fn_with_options::<Dynamic>(
                options,
                &mut lease.scope,
                &ast,
                function,
                (),
            ),
        };

        let chain_exhausted = self.inner.pool.borrow_mut().release(lease);

        match result {
            _ if chain_exhausted => Err(ScriptError::PoolExhausted { size }),
            Ok(value) => Ok(value),
            Err(e) => {
                let message = e.to_string();
                self.report(
                    MessageKind::Error,
                    &format!("{} in '{function}': {message}", module.display()),
                );
                Err(ScriptError::Runtime {
                    module,
                    function: function.to_string(),
                    message,
                })
            }
        }
    }

    /// Returns true if the module behind `script` defines `function` taking
    /// `arity` parameters.
    pub fn has_function(&self, script: &Handle<Script>, function: &str, arity: usize) -> bool {
        script.get().is_some_and(|s| {
            s.ast()
                .iter_functions()
                .any(|f| f.name == function && f.params.len() == arity)
        })
    }

    /// Number of contexts currently executing.
    pub fn active_contexts(&self) -> usize {
        self.inner.pool.borrow().active()
    }

    /// Total number of contexts.
    pub fn pool_size(&self) -> usize {
        self.inner.pool.borrow().size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::INT;

    #[test]
    fn zero_pool_size_is_rejected() {
        assert!(matches!(
            ScriptBridge::init(HostFunctions::new(), 0),
            Err(ScriptError::InvalidPoolSize)
        ));
    }

    #[test]
    fn host_functions_receive_a_live_bridge() {
        let mut host = HostFunctions::new();
        host.insert("pool_size", |engine, name, bridge| {
            engine.register_fn(name, move || {
                bridge.upgrade().map_or(0, |b| b.pool_size() as INT)
            });
        });
        let bridge = ScriptBridge::init(host, 3).unwrap();
        let value: INT = bridge.inner.engine.eval("pool_size()").unwrap();
        assert_eq!(value, 3);
        assert!(bridge.downgrade().upgrade().is_some());
    }

    #[test]
    fn print_goes_through_message_callback() {
        let bridge = ScriptBridge::init(HostFunctions::new(), 1).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bridge.set_message_callback(move |kind, text| {
            sink.borrow_mut().push((kind, text.to_string()));
        });
        bridge.inner.engine.run(r#"print("hello")"#).unwrap();
        assert_eq!(
            seen.borrow().as_slice(),
            &[(MessageKind::Print, "hello".to_string())]
        );
    }
}
