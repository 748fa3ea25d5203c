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

use anyhow::Result;
use ember_io::{Handle, ResourceCache, Script};
use ember_script::{
    Dynamic, EvalAltResult, HostFunctions, MessageKind, ScriptBridge, ScriptError, INT,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::{tempdir, TempDir};

const CHAIN: &str = r#"
fn step(n) {
    if n <= 1 {
        active()
    } else {
        descend(n - 1)
    }
}
"#;

const BASICS: &str = r#"
fn add_one(x) { x + 1 }
fn update() { 7 }
fn boom() { throw "bad things"; }
"#;

fn data_dir(files: &[(&str, &str)]) -> Result<(TempDir, ResourceCache)> {
    let dir = tempdir()?;
    for (name, source) in files {
        std::fs::write(dir.path().join(name), source)?;
    }
    let cache = ResourceCache::unwatched(dir.path())?;
    Ok((dir, cache))
}

/// Host table with `descend(n)`, which runs `step(n)` in `chain` again, and
/// `active()`, which reports the number of busy contexts.
fn chain_host(chain: Handle<Script>) -> HostFunctions {
    let mut host = HostFunctions::new();
    host.insert("descend", move |engine, name, bridge| {
        engine.register_fn(name, move |n: INT| -> Result<Dynamic, Box<EvalAltResult>> {
            let bridge = bridge.upgrade().ok_or("bridge is gone")?;
            bridge
                .run(&chain, "step", Some(Dynamic::from(n)))
                .map_err(|e| e.to_string().into())
        });
    });
    host.insert("active", |engine, name, bridge| {
        engine.register_fn(name, move || {
            bridge.upgrade().map_or(-1, |b| b.active_contexts() as INT)
        });
    });
    host
}

#[test]
fn test_run_returns_function_value() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("basics.rhai", BASICS)])?;
    let script = cache.get_script("basics.rhai").unwrap();
    let bridge = ScriptBridge::init(HostFunctions::new(), 8)?;

    let value = bridge.run(&script, "add_one", Some(Dynamic::from(41 as INT)))?;
    assert_eq!(value.as_int().ok(), Some(42));
    let value = bridge.run(&script, "update", None)?;
    assert_eq!(value.as_int().ok(), Some(7));
    assert_eq!(bridge.active_contexts(), 0);
    Ok(())
}

#[test]
fn test_lookup_matches_name_and_arity() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("basics.rhai", BASICS)])?;
    let script = cache.get_script("basics.rhai").unwrap();
    let bridge = ScriptBridge::init(HostFunctions::new(), 8)?;

    let err = bridge
        .run(&script, "update", Some(Dynamic::from(1 as INT)))
        .unwrap_err();
    assert!(matches!(err, ScriptError::FunctionNotFound { arity: 1, .. }));
    assert!(err.is_missing_function());

    let err = bridge.run(&script, "draw", None).unwrap_err();
    assert!(err.is_missing_function());

    assert!(bridge.has_function(&script, "add_one", 1));
    assert!(!bridge.has_function(&script, "add_one", 0));
    Ok(())
}

#[test]
fn test_failed_module_is_unavailable() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("broken.rhai", "fn update( {")])?;
    let script = cache.get_script("broken.rhai").unwrap();
    let bridge = ScriptBridge::init(HostFunctions::new(), 8)?;

    let err = bridge.run(&script, "update", None).unwrap_err();
    assert!(matches!(err, ScriptError::UnavailableModule { .. }));
    Ok(())
}

#[test]
fn test_script_errors_are_contained_and_reported() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("basics.rhai", BASICS)])?;
    let script = cache.get_script("basics.rhai").unwrap();
    let bridge = ScriptBridge::init(HostFunctions::new(), 8)?;

    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reported);
    bridge.set_message_callback(move |kind, text| {
        sink.borrow_mut().push((kind, text.to_string()));
    });

    let err = bridge.run(&script, "boom", None).unwrap_err();
    match err {
        ScriptError::Runtime { message, .. } => assert!(message.contains("bad things")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(reported.borrow().len(), 1);
    assert_eq!(reported.borrow()[0].0, MessageKind::Error);

    // The bridge keeps working.
    assert_eq!(bridge.run(&script, "update", None)?.as_int().ok(), Some(7));
    assert_eq!(bridge.active_contexts(), 0);
    Ok(())
}

#[test]
fn test_nested_runs_take_distinct_contexts() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("chain.rhai", CHAIN)])?;
    let chain = cache.get_script("chain.rhai").unwrap();
    let bridge = ScriptBridge::init(chain_host(chain.clone()), 8)?;

    let depth = bridge.run(&chain, "step", Some(Dynamic::from(3 as INT)))?;
    assert_eq!(depth.as_int().ok(), Some(3));

    // Exactly as deep as the pool.
    let depth = bridge.run(&chain, "step", Some(Dynamic::from(8 as INT)))?;
    assert_eq!(depth.as_int().ok(), Some(8));
    assert_eq!(bridge.active_contexts(), 0);
    Ok(())
}

#[test]
fn test_pool_exhaustion_fails_the_whole_chain() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("chain.rhai", CHAIN)])?;
    let chain = cache.get_script("chain.rhai").unwrap();
    let bridge = ScriptBridge::init(chain_host(chain.clone()), 8)?;

    let errors = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&errors);
    bridge.set_message_callback(move |kind, _| {
        if kind == MessageKind::Error {
            *sink.borrow_mut() += 1;
        }
    });

    let err = bridge
        .run(&chain, "step", Some(Dynamic::from(9 as INT)))
        .unwrap_err();
    assert!(matches!(err, ScriptError::PoolExhausted { size: 8 }));
    assert!(*errors.borrow() >= 1);
    assert_eq!(bridge.active_contexts(), 0);

    // The next chain starts clean.
    let depth = bridge.run(&chain, "step", Some(Dynamic::from(2 as INT)))?;
    assert_eq!(depth.as_int().ok(), Some(2));
    Ok(())
}

#[test]
fn test_small_pool_bounds_nesting() -> Result<()> {
    let (_dir, mut cache) = data_dir(&[("chain.rhai", CHAIN)])?;
    let chain = cache.get_script("chain.rhai").unwrap();
    let bridge = ScriptBridge::init(chain_host(chain.clone()), 2)?;

    assert!(bridge
        .run(&chain, "step", Some(Dynamic::from(2 as INT)))
        .is_ok());
    assert!(matches!(
        bridge.run(&chain, "step", Some(Dynamic::from(3 as INT))),
        Err(ScriptError::PoolExhausted { size: 2 })
    ));
    Ok(())
}
