/// A tiny 2D scene and the reversible actions that edit it.
use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use linear_undo::Action;
use serde::Serialize;

/// A named object placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Object {
    pub x: f32,
    pub y: f32,
    /// Inactive objects are hidden but kept in reserve for a redo.
    pub active: bool,
}

/// All objects, keyed by name.
#[derive(Debug, Default, Serialize)]
pub struct Scene {
    objects: BTreeMap<String, Object>,
}

impl Scene {
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    /// Names of visible objects, sorted.
    pub fn active_names(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|(_, o)| o.active)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Number of objects, including reserved ones.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut Object> {
        self.objects
            .get_mut(name)
            .with_context(|| format!("No object named '{name}'"))
    }

    fn set_active(&mut self, name: &str, active: bool) -> Result<()> {
        self.object_mut(name)?.active = active;
        Ok(())
    }

    fn translate(&mut self, name: &str, dx: f32, dy: f32) -> Result<()> {
        let object = self.object_mut(name)?;
        if !object.active {
            bail!("Object '{name}' is not in the scene");
        }
        object.x += dx;
        object.y += dy;
        Ok(())
    }
}

/// Places a new object. Undo hides it; the object is only removed for
/// good once the action is culled while hidden.
#[derive(Debug)]
pub struct SpawnAction {
    name: String,
}

impl SpawnAction {
    /// Spawns `name` at `(x, y)` and returns the action to record.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken, including by an object held in
    /// reserve for a redo.
    pub fn apply(scene: &mut Scene, name: &str, x: f32, y: f32) -> Result<Self> {
        if scene.objects.contains_key(name) {
            bail!("Object '{name}' already exists");
        }
        scene.objects.insert(
            name.to_string(),
            Object {
                x,
                y,
                active: true,
            },
        );
        Ok(Self {
            name: name.to_string(),
        })
    }
}

impl Action<Scene> for SpawnAction {
    fn undo(&mut self, scene: &mut Scene) -> Result<()> {
        scene.set_active(&self.name, false)
    }

    fn redo(&mut self, scene: &mut Scene) -> Result<()> {
        scene.set_active(&self.name, true)
    }

    fn cull(&mut self, scene: &mut Scene) -> Result<()> {
        if scene.get(&self.name).is_some_and(|o| !o.active) {
            tracing::debug!("Releasing reserved object '{}'", self.name);
            scene.objects.remove(&self.name);
        }
        Ok(())
    }

    fn label(&self) -> String {
        format!("Spawn({})", self.name)
    }
}

/// Moves an object by a fixed offset.
#[derive(Debug)]
pub struct TranslateAction {
    name: String,
    dx: f32,
    dy: f32,
}

impl TranslateAction {
    /// Moves `name` by `(dx, dy)` and returns the action to record.
    ///
    /// # Errors
    ///
    /// Fails if the object is missing or hidden.
    pub fn apply(scene: &mut Scene, name: &str, dx: f32, dy: f32) -> Result<Self> {
        scene.translate(name, dx, dy)?;
        Ok(Self {
            name: name.to_string(),
            dx,
            dy,
        })
    }

    /// Moves the object, unless its spawn was culled and it no longer
    /// exists. A released object has nothing left to move.
    fn shift(&self, scene: &mut Scene, dx: f32, dy: f32) -> Result<()> {
        if scene.get(&self.name).is_none() {
            tracing::debug!("Object '{}' was released, skipping move", self.name);
            return Ok(());
        }
        scene.translate(&self.name, dx, dy)
    }
}

impl Action<Scene> for TranslateAction {
    fn undo(&mut self, scene: &mut Scene) -> Result<()> {
        self.shift(scene, -self.dx, -self.dy)
    }

    fn redo(&mut self, scene: &mut Scene) -> Result<()> {
        self.shift(scene, self.dx, self.dy)
    }

    fn label(&self) -> String {
        format!("Translate({})", self.name)
    }
}
