//! Sprite sheet loading.
//!
//! Decoding images is the host's business. The core only needs each sheet's
//! grid layout and frame size, which an [`AssetProvider`] supplies. Clips are
//! memoized by name and every species' clip set is built before the first
//! entity enters the tank, so nothing in a tick ever waits on a load.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::animation::{Clip, ClipRole, ClipSet, PlaybackMode};
use crate::entity::EntityKind;
use crate::error::AssetError;

/// Source of sprite sheets.
pub trait AssetProvider {
    fn load_clip(
        &mut self,
        name: &str,
        rows: usize,
        columns: usize,
        mode: PlaybackMode,
    ) -> Result<Clip, AssetError>;
}

// ── Built-in manifest ────────────────────────────────────────────────────────

/// Known sheets and their full pixel size (width, height).
const BUILTIN_SHEETS: &[(&str, f32, f32)] = &[
    ("smallswim", 800.0, 400.0),
    ("hungryswim", 800.0, 400.0),
    ("smallturn", 800.0, 400.0),
    ("smalleat", 800.0, 400.0),
    ("smalldie", 800.0, 400.0),
    ("balrog", 1600.0, 320.0),
    ("food", 400.0, 200.0),
    ("money", 720.0, 360.0),
    ("stinky", 800.0, 240.0),
    ("splash", 800.0, 80.0),
];

/// An [`AssetProvider`] backed by a table of sheet dimensions.
#[derive(Clone, Debug)]
pub struct SheetManifest {
    sheets: HashMap<String, (f32, f32)>,
}

impl Default for SheetManifest {
    fn default() -> Self {
        let sheets = BUILTIN_SHEETS
            .iter()
            .map(|&(name, w, h)| (name.to_string(), (w, h)))
            .collect();
        Self { sheets }
    }
}

impl SheetManifest {
    pub fn empty() -> Self {
        Self {
            sheets: HashMap::new(),
        }
    }

    /// Register (or replace) a sheet of `width` x `height` pixels.
    pub fn insert(&mut self, name: &str, width: f32, height: f32) {
        self.sheets.insert(name.to_string(), (width, height));
    }
}

impl AssetProvider for SheetManifest {
    fn load_clip(
        &mut self,
        name: &str,
        rows: usize,
        columns: usize,
        mode: PlaybackMode,
    ) -> Result<Clip, AssetError> {
        if rows == 0 || columns == 0 {
            return Err(AssetError::EmptyGrid {
                name: name.to_string(),
                rows,
                columns,
            });
        }
        let &(width, height) = self
            .sheets
            .get(name)
            .ok_or_else(|| AssetError::UnknownSheet(name.to_string()))?;
        Ok(Clip {
            name: name.to_string(),
            rows,
            columns,
            mode,
            frame_width: width / columns as f32,
            frame_height: height / rows as f32,
        })
    }
}

// ── Memoization ──────────────────────────────────────────────────────────────

/// Memoizes clips by sheet name. The first successful load of a name wins.
pub struct ClipCache<P> {
    provider: P,
    clips: HashMap<String, Arc<Clip>>,
}

impl<P: AssetProvider> ClipCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            clips: HashMap::new(),
        }
    }

    pub fn get(
        &mut self,
        name: &str,
        rows: usize,
        columns: usize,
        mode: PlaybackMode,
    ) -> Result<Arc<Clip>, AssetError> {
        if let Some(clip) = self.clips.get(name) {
            return Ok(Arc::clone(clip));
        }
        let clip = Arc::new(self.provider.load_clip(name, rows, columns, mode)?);
        debug!(
            sheet = name,
            rows,
            columns,
            frame_width = clip.frame_width,
            frame_height = clip.frame_height,
            "loaded sprite sheet"
        );
        self.clips.insert(name.to_string(), Arc::clone(&clip));
        Ok(clip)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

// ── Species clip sets ────────────────────────────────────────────────────────

/// Every clip set the simulation spawns entities with, loaded up front.
#[derive(Clone, Debug)]
pub struct SpriteBank {
    pub fish: Arc<ClipSet>,
    pub enemy: Arc<ClipSet>,
    pub food: Arc<ClipSet>,
    pub money: Arc<ClipSet>,
    pub friend: Arc<ClipSet>,
    pub splash: Arc<ClipSet>,
}

impl SpriteBank {
    pub fn load<P: AssetProvider>(cache: &mut ClipCache<P>) -> Result<Self, AssetError> {
        use PlaybackMode::{Loop, Once};

        let fish = ClipSet::new(cache.get("smallswim", 5, 10, Loop)?)
            .with(ClipRole::Hungry, cache.get("hungryswim", 5, 10, Loop)?)
            .with(ClipRole::Turn, cache.get("smallturn", 5, 10, Once)?)
            .with(ClipRole::Eat, cache.get("smalleat", 5, 10, Once)?)
            .with(ClipRole::Die, cache.get("smalldie", 5, 10, Once)?);
        let enemy = ClipSet::new(cache.get("balrog", 2, 10, Loop)?);
        let food = ClipSet::new(cache.get("food", 5, 10, Loop)?);
        let money = ClipSet::new(cache.get("money", 5, 10, Loop)?);
        let friend = ClipSet::new(cache.get("stinky", 3, 10, Loop)?);
        let splash = ClipSet::new(cache.get("splash", 1, 10, Once)?);

        Ok(Self {
            fish: Arc::new(fish),
            enemy: Arc::new(enemy),
            food: Arc::new(food),
            money: Arc::new(money),
            friend: Arc::new(friend),
            splash: Arc::new(splash),
        })
    }

    /// Clip set used when spawning an entity of `kind`. Stationary sprites
    /// borrow the fish sheet.
    pub fn for_kind(&self, kind: EntityKind) -> &Arc<ClipSet> {
        match kind {
            EntityKind::Fish | EntityKind::Stationary => &self.fish,
            EntityKind::Enemy => &self.enemy,
            EntityKind::Food => &self.food,
            EntityKind::Money => &self.money,
            EntityKind::Friend => &self.friend,
            EntityKind::OneShotEffect => &self.splash,
        }
    }
}
