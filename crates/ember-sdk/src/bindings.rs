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

//! Native functions the engine exposes to scripts.
//!
//! Numbers may be passed as integers or floats. Lookups that find nothing
//! return `()` (or `-1` for `spawn_entity`) instead of raising an error, so
//! scripts can test the result.

use crate::entity::EntityId;
use crate::timing::FIXED_TICK;
use crate::EngineContext;
use ember_core::math::{Mat4, Vec3};
use ember_script::{
    Array, Dynamic, EvalAltResult, HostFunctions, Map, WeakBridge, FLOAT, INT,
};
use std::rc::Rc;

type NativeResult<T> = Result<T, Box<EvalAltResult>>;

fn number(value: &Dynamic) -> NativeResult<f32> {
    if let Ok(v) = value.as_float() {
        return Ok(v as f32);
    }
    if let Ok(v) = value.as_int() {
        return Ok(v as f32);
    }
    Err(format!("expected a number, found {}", value.type_name()).into())
}

fn vec3(x: &Dynamic, y: &Dynamic, z: &Dynamic) -> NativeResult<Vec3> {
    Ok(Vec3::new(number(x)?, number(y)?, number(z)?))
}

fn floats(values: &[f32]) -> Array {
    values.iter().map(|&v| Dynamic::from_float(v as FLOAT)).collect()
}

fn matrix(m: Mat4) -> Array {
    floats(&m.to_cols_array())
}

fn entity_id(id: INT) -> Option<EntityId> {
    usize::try_from(id).ok().map(EntityId)
}

fn spawned(id: Option<EntityId>) -> INT {
    id.map_or(-1, |id| id.0 as INT)
}

fn call_script(
    context: &EngineContext,
    bridge: &WeakBridge,
    path: &str,
    function: &str,
    arg: Option<Dynamic>,
) -> NativeResult<Dynamic> {
    let bridge = bridge.upgrade().ok_or("the script bridge is shut down")?;
    let script = context
        .resources()
        .borrow_mut()
        .get_script(path)
        .ok_or_else(|| format!("'{path}' is not a script"))?;
    bridge
        .run(&script, function, arg)
        .map_err(|e| e.to_string().into())
}

/// Builds the host-function table bound to `context`.
pub(crate) fn host_functions(context: &Rc<EngineContext>) -> HostFunctions {
    let mut host = HostFunctions::new();
    register_entities(&mut host, context);
    register_actions(&mut host, context);
    register_camera(&mut host, context);
    register_engine(&mut host, context);
    host
}

fn register_entities(host: &mut HostFunctions, context: &Rc<EngineContext>) {
    let ctx = Rc::clone(context);
    host.insert("create_entity_type", move |engine, name, _| {
        engine.register_fn(name, move |type_name: &str, path: &str| {
            ctx.create_entity_type(type_name, path)
        });
    });

    let ctx = Rc::clone(context);
    host.insert("spawn_entity", move |engine, name, _| {
        let short = Rc::clone(&ctx);
        engine.register_fn(
            name,
            move |type_name: &str, x: Dynamic, y: Dynamic, z: Dynamic| -> NativeResult<INT> {
                let position = vec3(&x, &y, &z)?;
                Ok(spawned(short.spawn_entity(type_name, position, Vec3::ZERO)))
            },
        );
        engine.register_fn(
            name,
            move |type_name: &str,
                  x: Dynamic,
                  y: Dynamic,
                  z: Dynamic,
                  rx: Dynamic,
                  ry: Dynamic,
                  rz: Dynamic|
                  -> NativeResult<INT> {
                let position = vec3(&x, &y, &z)?;
                let rotation = vec3(&rx, &ry, &rz)?;
                Ok(spawned(ctx.spawn_entity(type_name, position, rotation)))
            },
        );
    });

    let ctx = Rc::clone(context);
    host.insert("entity_count", move |engine, name, _| {
        engine.register_fn(name, move || ctx.entity_count() as INT);
    });

    let ctx = Rc::clone(context);
    host.insert("entity_type", move |engine, name, _| {
        engine.register_fn(name, move |id: INT| {
            let world = ctx.world().borrow();
            entity_id(id)
                .and_then(|id| world.get(id))
                .map_or(Dynamic::UNIT, |e| Dynamic::from(e.entity_type().name().to_string()))
        });
    });

    let ctx = Rc::clone(context);
    host.insert("entity_position", move |engine, name, _| {
        engine.register_fn(name, move |id: INT| {
            let world = ctx.world().borrow();
            entity_id(id)
                .and_then(|id| world.get(id))
                .map_or(Dynamic::UNIT, |e| {
                    Dynamic::from_array(floats(&e.position.to_array()))
                })
        });
    });

    let ctx = Rc::clone(context);
    host.insert("set_entity_position", move |engine, name, _| {
        engine.register_fn(
            name,
            move |id: INT, x: Dynamic, y: Dynamic, z: Dynamic| -> NativeResult<bool> {
                let position = vec3(&x, &y, &z)?;
                let mut world = ctx.world().borrow_mut();
                Ok(match entity_id(id).and_then(|id| world.get_mut(id)) {
                    Some(entity) => {
                        entity.position = position;
                        true
                    }
                    None => false,
                })
            },
        );
    });

    let ctx = Rc::clone(context);
    host.insert("entity_rotation", move |engine, name, _| {
        engine.register_fn(name, move |id: INT| {
            let world = ctx.world().borrow();
            entity_id(id)
                .and_then(|id| world.get(id))
                .map_or(Dynamic::UNIT, |e| {
                    Dynamic::from_array(floats(&e.rotation.to_array()))
                })
        });
    });

    let ctx = Rc::clone(context);
    host.insert("set_entity_rotation", move |engine, name, _| {
        engine.register_fn(
            name,
            move |id: INT, x: Dynamic, y: Dynamic, z: Dynamic| -> NativeResult<bool> {
                let rotation = vec3(&x, &y, &z)?;
                let mut world = ctx.world().borrow_mut();
                Ok(match entity_id(id).and_then(|id| world.get_mut(id)) {
                    Some(entity) => {
                        entity.rotation = rotation;
                        true
                    }
                    None => false,
                })
            },
        );
    });
}

fn register_actions(host: &mut HostFunctions, context: &Rc<EngineContext>) {
    let ctx = Rc::clone(context);
    host.insert("action_active", move |engine, name, _| {
        engine.register_fn(name, move |action: &str| ctx.actions().borrow().is_active(action));
    });

    let ctx = Rc::clone(context);
    host.insert("action_payload", move |engine, name, _| {
        engine.register_fn(name, move |action: &str| {
            ctx.actions()
                .borrow()
                .payload(action)
                .map_or(Dynamic::UNIT, |p| Dynamic::from(p.to_string()))
        });
    });

    let ctx = Rc::clone(context);
    host.insert("next_action", move |engine, name, _| {
        engine.register_fn(name, move || {
            let Some(event) = ctx.actions().borrow().poll() else {
                return Dynamic::UNIT;
            };
            let mut map = Map::new();
            map.insert("name".into(), Dynamic::from(event.name));
            map.insert("payload".into(), Dynamic::from(event.payload));
            map.insert("continuous".into(), Dynamic::from_bool(event.continuous));
            Dynamic::from_map(map)
        });
    });

    let ctx = Rc::clone(context);
    host.insert("trigger_action", move |engine, name, _| {
        let short = Rc::clone(&ctx);
        engine.register_fn(name, move |action: &str| {
            short.actions().borrow_mut().trigger(action, "", false);
        });
        let medium = Rc::clone(&ctx);
        engine.register_fn(name, move |action: &str, payload: &str| {
            medium.actions().borrow_mut().trigger(action, payload, false);
        });
        engine.register_fn(name, move |action: &str, payload: &str, continuous: bool| {
            ctx.actions().borrow_mut().trigger(action, payload, continuous);
        });
    });

    let ctx = Rc::clone(context);
    host.insert("untrigger_action", move |engine, name, _| {
        engine.register_fn(name, move |action: &str| ctx.actions().borrow_mut().untrigger(action));
    });
}

fn register_camera(host: &mut HostFunctions, context: &Rc<EngineContext>) {
    let ctx = Rc::clone(context);
    host.insert("camera_position", move |engine, name, _| {
        engine.register_fn(name, move || floats(&ctx.camera().position.to_array()));
    });

    let ctx = Rc::clone(context);
    host.insert("set_camera_position", move |engine, name, _| {
        engine.register_fn(
            name,
            move |x: Dynamic, y: Dynamic, z: Dynamic| -> NativeResult<()> {
                let mut camera = ctx.camera();
                camera.position = vec3(&x, &y, &z)?;
                ctx.set_camera(camera);
                Ok(())
            },
        );
    });

    let ctx = Rc::clone(context);
    host.insert("camera_rotation", move |engine, name, _| {
        engine.register_fn(name, move || {
            let camera = ctx.camera();
            floats(&[camera.yaw, camera.pitch])
        });
    });

    let ctx = Rc::clone(context);
    host.insert("rotate_camera", move |engine, name, _| {
        engine.register_fn(
            name,
            move |yaw: Dynamic, pitch: Dynamic| -> NativeResult<()> {
                let mut camera = ctx.camera();
                camera.rotate(number(&yaw)?, number(&pitch)?);
                ctx.set_camera(camera);
                Ok(())
            },
        );
    });

    let ctx = Rc::clone(context);
    host.insert("projection_matrix", move |engine, name, _| {
        engine.register_fn(name, move || matrix(ctx.projection()));
    });

    let ctx = Rc::clone(context);
    host.insert("view_matrix", move |engine, name, _| {
        engine.register_fn(name, move || matrix(ctx.view()));
    });
}

fn register_engine(host: &mut HostFunctions, context: &Rc<EngineContext>) {
    let ctx = Rc::clone(context);
    host.insert("fps", move |engine, name, _| {
        engine.register_fn(name, move || INT::from(ctx.fps()));
    });

    let ctx = Rc::clone(context);
    host.insert("ms", move |engine, name, _| {
        engine.register_fn(name, move || ctx.ms() as FLOAT);
    });

    host.insert("tick", |engine, name, _| {
        engine.register_fn(name, || FIXED_TICK as FLOAT);
    });

    let ctx = Rc::clone(context);
    host.insert("config_string", move |engine, name, _| {
        engine.register_fn(name, move |key: &str, default: &str| {
            ctx.config().borrow().get_string(key, default)
        });
    });

    let ctx = Rc::clone(context);
    host.insert("call_script", move |engine, name, bridge| {
        let short = Rc::clone(&ctx);
        let short_bridge = bridge.clone();
        engine.register_fn(name, move |path: &str, function: &str| {
            call_script(&short, &short_bridge, path, function, None)
        });
        engine.register_fn(name, move |path: &str, function: &str, arg: Dynamic| {
            call_script(&ctx, &bridge, path, function, Some(arg))
        });
    });

    let ctx = Rc::clone(context);
    host.insert("quit", move |engine, name, _| {
        engine.register_fn(name, move || {
            log::info!("Quit requested by script.");
            ctx.set_running(false);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Config;
    use ember_io::ResourceCache;
    use ember_script::ScriptBridge;

    fn bridge(dir: &tempfile::TempDir) -> (Rc<EngineContext>, ScriptBridge) {
        let cache = ResourceCache::unwatched(dir.path()).unwrap();
        let context = Rc::new(EngineContext::new(cache, Config::new()));
        let bridge = ScriptBridge::init(host_functions(&context), 4).unwrap();
        (context, bridge)
    }

    fn run(
        dir: &tempfile::TempDir,
        bridge: &ScriptBridge,
        context: &EngineContext,
        body: &str,
    ) -> Dynamic {
        std::fs::write(dir.path().join("probe.rhai"), format!("fn probe() {{ {body} }}")).unwrap();
        let mut resources = context.resources().borrow_mut();
        resources.clear();
        let script = resources.get_script("probe.rhai").unwrap();
        drop(resources);
        bridge.run(&script, "probe", None).unwrap()
    }

    #[test]
    fn every_documented_binding_is_registered() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::unwatched(dir.path()).unwrap();
        let context = Rc::new(EngineContext::new(cache, Config::new()));
        let host = host_functions(&context);
        let names: Vec<_> = host.names().collect();
        for expected in [
            "spawn_entity",
            "create_entity_type",
            "entity_count",
            "entity_position",
            "set_entity_position",
            "entity_rotation",
            "set_entity_rotation",
            "entity_type",
            "action_active",
            "action_payload",
            "next_action",
            "trigger_action",
            "fps",
            "ms",
            "tick",
            "camera_position",
            "set_camera_position",
            "rotate_camera",
            "config_string",
            "call_script",
            "projection_matrix",
            "view_matrix",
            "quit",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn spawn_accepts_ints_and_floats_and_reports_unknown_types() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("crate.rhai"), "fn update(id) {}").unwrap();
        let (context, bridge) = bridge(&dir);

        let id = run(
            &dir,
            &bridge,
            &context,
            r#"create_entity_type("crate", "crate.rhai"); spawn_entity("crate", 1, 2.5, -3)"#,
        );
        assert_eq!(id.as_int().unwrap(), 0);
        assert_eq!(
            context.world().borrow().get(EntityId(0)).unwrap().position,
            Vec3::new(1.0, 2.5, -3.0)
        );

        let missing = run(&dir, &bridge, &context, r#"spawn_entity("ghost", 0, 0, 0)"#);
        assert_eq!(missing.as_int().unwrap(), -1);
        assert_eq!(context.entity_count(), 1);
    }

    #[test]
    fn trigger_and_poll_actions_from_script() {
        let dir = tempfile::tempdir().unwrap();
        let (context, bridge) = bridge(&dir);

        let payload = run(
            &dir,
            &bridge,
            &context,
            r#"trigger_action("jump", "high"); let e = next_action(); e.payload"#,
        );
        assert_eq!(payload.into_string().unwrap(), "high");
        assert!(context.actions().borrow().is_active("jump"));

        let empty = run(&dir, &bridge, &context, "next_action()");
        assert!(empty.is_unit());
    }

    #[test]
    fn quit_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (context, bridge) = bridge(&dir);
        context.set_running(true);
        run(&dir, &bridge, &context, "quit();");
        assert!(!context.is_running());
    }

    #[test]
    fn tick_and_config_are_visible() {
        let dir = tempfile::tempdir().unwrap();
        let (context, bridge) = bridge(&dir);
        context
            .config()
            .borrow_mut()
            .set_string("player.name", "ada");

        let tick = run(&dir, &bridge, &context, "tick()");
        assert!((tick.as_float().unwrap() - 0.032).abs() < 1e-9);

        let name = run(&dir, &bridge, &context, r#"config_string("player.name", "nobody")"#);
        assert_eq!(name.into_string().unwrap(), "ada");
    }
}
