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

//! The loop orchestrator.

use crate::bindings;
use crate::entity::{EntityId, World};
use crate::input::InputMapper;
use crate::overlay::DebugOverlay;
use crate::timing::{FrameTimer, FIXED_TICK};
use crate::{EngineContext, EngineError};
use ember_core::audio::AudioBackend;
use ember_core::math::Vec3;
use ember_core::physics::PhysicsBackend;
use ember_core::platform::Platform;
use ember_core::renderer::RenderBackend;
use ember_core::timer::seconds_between;
use ember_core::{Camera, Clock, Config, PerformanceClock};
use ember_infra::{HeadlessRenderer, SilentAudio, StepPhysics};
use ember_io::{Handle, ResourceCache, Script};
use ember_script::{Dynamic, ScriptBridge, ScriptError, DEFAULT_POOL_SIZE, INT};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Construction-time settings of an [`Engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Root of every resource path.
    pub data_dir: PathBuf,
    /// Runtime configuration file, relative to `data_dir`.
    pub settings_file: PathBuf,
    /// Script providing `init`, `update` and `draw`, relative to `data_dir`.
    pub main_script: PathBuf,
    /// Number of script execution contexts.
    pub context_pool_size: usize,
    /// Upper bound on fixed ticks per frame. `None` always catches up fully.
    pub max_ticks_per_frame: Option<u32>,
    /// Watch `data_dir` and reload changed resources.
    pub hot_reload: bool,
}

impl EngineConfig {
    /// Settings with every default for the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            settings_file: PathBuf::from("settings.ron"),
            main_script: PathBuf::from("main.rhai"),
            context_pool_size: DEFAULT_POOL_SIZE,
            max_ticks_per_frame: None,
            hot_reload: true,
        }
    }

    /// Full path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }
}

/// Assembles an [`Engine`] from its collaborators.
///
/// Only the platform is mandatory; the other backends default to the
/// headless implementations of `ember-infra`.
pub struct EngineBuilder {
    config: EngineConfig,
    platform: Option<Box<dyn Platform>>,
    renderer: Box<dyn RenderBackend>,
    audio: Box<dyn AudioBackend>,
    physics: Box<dyn PhysicsBackend>,
    clock: Box<dyn Clock>,
}

impl EngineBuilder {
    /// Starts a builder for the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: EngineConfig::new(data_dir),
            platform: None,
            renderer: Box::new(HeadlessRenderer::default()),
            audio: Box::new(SilentAudio::new()),
            physics: Box::new(StepPhysics::new()),
            clock: Box::new(PerformanceClock::new()),
        }
    }

    /// Replaces all construction settings.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the settings file name.
    pub fn with_settings_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config.settings_file = file.into();
        self
    }

    /// Sets the main script name.
    pub fn with_main_script(mut self, file: impl Into<PathBuf>) -> Self {
        self.config.main_script = file.into();
        self
    }

    /// Sets the number of script execution contexts.
    pub fn with_context_pool_size(mut self, size: usize) -> Self {
        self.config.context_pool_size = size;
        self
    }

    /// Bounds the number of fixed ticks run per frame. `Some(0)` runs unbounded.
    pub fn with_max_ticks_per_frame(mut self, max: Option<u32>) -> Self {
        self.config.max_ticks_per_frame = max;
        self
    }

    /// Enables or disables file watching.
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.config.hot_reload = enabled;
        self
    }

    /// Sets the platform.
    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    /// Sets the render backend.
    pub fn with_renderer(mut self, renderer: impl RenderBackend + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Sets the audio backend.
    pub fn with_audio(mut self, audio: impl AudioBackend + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Sets the physics backend.
    pub fn with_physics(mut self, physics: impl PhysicsBackend + 'static) -> Self {
        self.physics = Box::new(physics);
        self
    }

    /// Sets the frame clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Builds the engine. Nothing is initialized until [`Engine::init`].
    pub fn build(self) -> Result<Engine, EngineError> {
        let platform = self.platform.ok_or(EngineError::MissingPlatform)?;
        Ok(Engine {
            timer: FrameTimer::new(self.config.max_ticks_per_frame),
            config: self.config,
            platform,
            renderer: self.renderer,
            audio: self.audio,
            physics: self.physics,
            clock: self.clock,
            context: None,
            bridge: None,
            input: InputMapper::new(),
            overlay: DebugOverlay::default(),
            last_counter: 0,
            shut_down: false,
        })
    }
}

/// The game loop: owns every subsystem and drives them in a fixed order.
pub struct Engine {
    config: EngineConfig,
    platform: Box<dyn Platform>,
    renderer: Box<dyn RenderBackend>,
    audio: Box<dyn AudioBackend>,
    physics: Box<dyn PhysicsBackend>,
    clock: Box<dyn Clock>,
    context: Option<Rc<EngineContext>>,
    bridge: Option<ScriptBridge>,
    timer: FrameTimer,
    input: InputMapper,
    overlay: DebugOverlay,
    last_counter: u64,
    shut_down: bool,
}

impl Engine {
    /// Brings every subsystem up and runs the main script's `init()`.
    ///
    /// Stages run in order: configuration, platform, renderer, resource
    /// cache, audio, physics, script bridge, overlay. The first failing stage
    /// aborts the sequence. On error the engine is not running.
    pub fn init(&mut self) -> Result<(), EngineError> {
        log::info!(
            "Initializing engine with data directory '{}'.",
            self.config.data_dir.display()
        );

        let settings_path = self.config.settings_path();
        let settings = Config::load(&settings_path).unwrap_or_else(|e| {
            log::warn!("{e}. Using default settings.");
            Config::new()
        });

        self.platform.init().map_err(EngineError::Platform)?;
        self.renderer.init().map_err(EngineError::Renderer)?;

        let resources = if self.config.hot_reload {
            ResourceCache::init(&self.config.data_dir)?
        } else {
            ResourceCache::unwatched(&self.config.data_dir)?
        };
        let context = Rc::new(EngineContext::new(resources, settings));
        self.context = Some(Rc::clone(&context));

        self.audio.init().map_err(EngineError::Audio)?;
        self.physics.init().map_err(EngineError::Physics)?;

        let bridge = ScriptBridge::init(
            bindings::host_functions(&context),
            self.config.context_pool_size,
        )?;
        self.bridge = Some(bridge.clone());

        let overlay_enabled = context.config().borrow().get_bool("debug.overlay", true);
        self.overlay = DebugOverlay::new(overlay_enabled);

        context.set_running(true);

        let main = match self.main_script(&context) {
            Some(main) if !main.is_failed() => main,
            _ => {
                let path = self.config.data_dir.join(&self.config.main_script);
                log::warn!("Main script '{}' not found.", path.display());
                context.set_running(false);
                return Err(EngineError::MainScriptMissing(path));
            }
        };
        Self::call(&bridge, &main, "init", None);
        context.set_camera(Camera::default());

        self.last_counter = self.clock.counter();
        log::info!("Engine initialized.");
        Ok(())
    }

    fn main_script(&self, context: &EngineContext) -> Option<Handle<Script>> {
        context
            .resources()
            .borrow_mut()
            .get_script(&self.config.main_script)
    }

    fn call(bridge: &ScriptBridge, script: &Handle<Script>, function: &str, arg: Option<Dynamic>) {
        match bridge.run(script, function, arg) {
            Ok(_) => {}
            Err(e @ (ScriptError::FunctionNotFound { .. } | ScriptError::UnavailableModule { .. })) => {
                log::trace!("{e}");
            }
            Err(e @ ScriptError::PoolExhausted { .. }) => log::error!("{e}"),
            // Already reported through the bridge's message callback.
            Err(e) => log::debug!("{e}"),
        }
    }

    fn call_entities(&self, bridge: &ScriptBridge, context: &EngineContext, function: &str) {
        for index in 0..context.entity_count() {
            if let Some(script) = context.entity_script(EntityId(index)) {
                Self::call(bridge, &script, function, Some(Dynamic::from(index as INT)));
            }
        }
    }

    /// Runs one frame: as many fixed ticks as the elapsed time allows, then a
    /// single draw and present. Does nothing once the engine stopped running.
    pub fn update(&mut self) {
        let (Some(context), Some(bridge)) = (self.context.clone(), self.bridge.clone()) else {
            return;
        };
        if !context.is_running() {
            return;
        }

        let frequency = self.clock.frequency();
        let start = self.clock.counter();
        let time = seconds_between(self.last_counter, start, frequency);
        self.last_counter = start;

        if self.timer.begin_frame(time) {
            context.set_frame_stats(self.timer.fps(), self.timer.ms());
            self.overlay.report(&context);
        }

        let camera = context.camera();
        self.renderer.update(&camera);
        context.set_matrices(self.renderer.projection(), self.renderer.view());

        let reloaded = context.resources().borrow_mut().update();
        if reloaded > 0 {
            log::debug!("Reloaded {reloaded} resources.");
        }
        self.audio.update(&camera);

        let main = self.main_script(&context);

        while self.timer.consume_tick() {
            let quit = self.input.handle_events(
                self.platform.as_mut(),
                self.renderer.as_mut(),
                &context.config().borrow(),
                &mut context.actions().borrow_mut(),
            );
            if quit {
                log::info!("Quit requested.");
                context.set_running(false);
                break;
            }

            if let Some(main) = &main {
                Self::call(&bridge, main, "update", None);
            }
            self.call_entities(&bridge, &context, "update");
            self.physics.step(FIXED_TICK as f32);

            if !context.is_running() {
                break;
            }
        }

        let camera = context.camera();
        self.renderer.update(&camera);
        context.set_matrices(self.renderer.projection(), self.renderer.view());

        self.call_entities(&bridge, &context, "draw");
        if let Some(main) = &main {
            Self::call(&bridge, main, "draw", None);
        }

        context.actions().borrow_mut().update();
        self.renderer.swap();

        let end = self.clock.counter();
        self.timer
            .record_frame_cost(seconds_between(start, end, frequency) * 1000.0);
        context.set_frame_stats(self.timer.fps(), self.timer.ms());
    }

    /// Destroys every entity and type, saves the configuration and tears the
    /// backends down. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::info!("Shutting down engine.");

        if let Some(context) = self.context.take() {
            context.world().borrow_mut().clear();
            context.set_running(false);
            let path = self.config.settings_path();
            if let Err(e) = context.config().borrow().save(&path) {
                log::warn!("{e}");
            }
        }
        self.bridge = None;

        self.audio.shutdown();
        self.renderer.shutdown();
        self.platform.shutdown();
        log::info!("Engine shut down.");
    }

    /// Whether the loop should keep calling [`Engine::update`].
    pub fn is_running(&self) -> bool {
        self.context.as_ref().is_some_and(|c| c.is_running())
    }

    /// Simulated seconds per fixed tick.
    pub fn tick(&self) -> f64 {
        FIXED_TICK
    }

    /// Frames counted in the last closed one-second window.
    pub fn fps(&self) -> u32 {
        self.timer.fps()
    }

    /// Average frame cost in milliseconds, ceiled to one decimal.
    pub fn ms(&self) -> f64 {
        self.timer.ms()
    }

    /// Simulated time waiting for the next tick.
    pub fn accumulator(&self) -> f64 {
        self.timer.accumulator()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.context.as_ref().map_or(0, |c| c.entity_count())
    }

    /// The shared context, once initialized.
    pub fn context(&self) -> Option<&Rc<EngineContext>> {
        self.context.as_ref()
    }

    /// Construction settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Data directory.
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Registers an entity type backed by the script at `script_path`.
    pub fn create_entity_type(&self, name: &str, script_path: impl AsRef<Path>) -> bool {
        self.context
            .as_ref()
            .is_some_and(|c| c.create_entity_type(name, script_path))
    }

    /// Spawns an entity of the registered type `name`. Returns `None` for an
    /// unknown type.
    pub fn spawn_entity(&self, name: &str, position: Vec3, rotation: Vec3) -> Option<EntityId> {
        self.context
            .as_ref()
            .and_then(|c| c.spawn_entity(name, position, rotation))
    }

    /// Read access to the entity world.
    pub fn with_world<R>(&self, f: impl FnOnce(&World) -> R) -> Option<R> {
        self.context.as_ref().map(|c| f(&c.world().borrow()))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
