//! Per-map item storage with stable handles.
//!
//! Each map owns a fixed-capacity slot array allocated up front. Slots are
//! filled in order and never freed or moved, so an [`ItemHandle`] taken
//! when an item is spawned stays valid for the rest of the game.

use crate::entities::Item;
use crate::level::MapId;

/// Index of an item slot within one map's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(u32);

impl ItemId {
    /// Get the underlying slot index (useful for debugging).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Map-qualified reference to an item, valid across maps and insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    pub map: MapId,
    pub id: ItemId,
}

/// Fixed-capacity slot array; empty slots are `None`.
#[derive(Clone, Debug)]
pub struct ItemArena {
    slots: Box<[Option<Item>]>,
    len: usize,
}

impl ItemArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store an item in the next free slot. Returns `None` when the arena is full.
    pub fn insert(&mut self, item: Item) -> Option<ItemId> {
        let slot = self.slots.get_mut(self.len)?;
        *slot = Some(item);
        let id = ItemId(self.len as u32);
        self.len += 1;
        Some(id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Occupied slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (ItemId(index as u32), item)))
    }
}

/// Item storage for all three maps.
#[derive(Clone, Debug)]
pub struct World {
    maps: [ItemArena; 3],
}

impl World {
    /// Upper bound on items a single map can ever hold.
    pub const MAP_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self {
            maps: [
                ItemArena::with_capacity(Self::MAP_CAPACITY),
                ItemArena::with_capacity(Self::MAP_CAPACITY),
                ItemArena::with_capacity(Self::MAP_CAPACITY),
            ],
        }
    }

    pub fn items(&self, map: MapId) -> &ItemArena {
        &self.maps[map.index()]
    }

    /// Add an item to a map, logging instead of failing when the map is full.
    pub fn spawn(&mut self, map: MapId, item: Item) -> Option<ItemHandle> {
        match self.maps[map.index()].insert(item) {
            Some(id) => Some(ItemHandle { map, id }),
            None => {
                log::warn!("Item storage for {map:?} is full; dropping spawned item");
                None
            }
        }
    }

    pub fn get(&self, handle: ItemHandle) -> Option<&Item> {
        self.maps[handle.map.index()].get(handle.id)
    }

    pub fn get_mut(&mut self, handle: ItemHandle) -> Option<&mut Item> {
        self.maps[handle.map.index()].get_mut(handle.id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
