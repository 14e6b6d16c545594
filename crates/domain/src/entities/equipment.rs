//! Equipment slots and the equip/unequip state machine
//!
//! Slots are partitioned into three groups: body (including the sword/shield
//! hand slots), rings, and accessories (bracelets, amulet). Placement rules
//! are pure transitions on [`EquipmentSlots`]; every operation returns an
//! [`EquipOutcome`] and a rejected operation leaves the mapping untouched.
//!
//! Invariant: an item identity appears in at most one slot across all groups.
//! Enforced procedurally - the previous slot is cleared before or while the
//! new one is set, and swaps exchange occupants atomically.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::entities::item::{EquipClass, Item};
use crate::error::DomainError;
use crate::ids::ItemId;

/// Number of ring slots on the sheet.
pub const RING_SLOTS: usize = 8;

/// Number of bracelet slots on the sheet.
pub const BRACELET_SLOTS: usize = 2;

/// Body slot identifiers. Sword and Shield are the two hand slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodySlot {
    Head,
    Body,
    Cloak,
    Belt,
    Boots,
    Sword,
    Shield,
}

impl BodySlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Cloak => "cloak",
            Self::Belt => "belt",
            Self::Boots => "boots",
            Self::Sword => "sword",
            Self::Shield => "shield",
        }
    }

    pub fn all() -> [BodySlot; 7] {
        [
            Self::Head,
            Self::Body,
            Self::Cloak,
            Self::Belt,
            Self::Boots,
            Self::Sword,
            Self::Shield,
        ]
    }

    /// True for the two hand slots weapons may occupy.
    pub fn is_hand(&self) -> bool {
        matches!(self, Self::Sword | Self::Shield)
    }
}

impl fmt::Display for BodySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any slot across the three groups, addressable from a sheet drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Body(BodySlot),
    Ring(usize),
    Bracelet(usize),
    Amulet,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body(slot) => write!(f, "{slot}"),
            Self::Ring(i) => write!(f, "ring{i}"),
            Self::Bracelet(i) => write!(f, "bracelet{i}"),
            Self::Amulet => write!(f, "amulet"),
        }
    }
}

impl FromStr for SlotKey {
    type Err = DomainError;

    /// Parse a sheet-supplied slot key. Malformed keys are parse errors so
    /// the service boundary can turn them into silent no-ops.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "amulet" {
            return Ok(Self::Amulet);
        }
        for slot in BodySlot::all() {
            if s == slot.as_str() {
                return Ok(Self::Body(slot));
            }
        }
        if let Some(index) = s.strip_prefix("ring") {
            let i: usize = index
                .parse()
                .map_err(|_| DomainError::parse(format!("Malformed ring slot key: {s}")))?;
            if i < RING_SLOTS {
                return Ok(Self::Ring(i));
            }
            return Err(DomainError::parse(format!("Ring slot out of range: {s}")));
        }
        if let Some(index) = s.strip_prefix("bracelet") {
            let i: usize = index
                .parse()
                .map_err(|_| DomainError::parse(format!("Malformed bracelet slot key: {s}")))?;
            if i < BRACELET_SLOTS {
                return Ok(Self::Bracelet(i));
            }
            return Err(DomainError::parse(format!(
                "Bracelet slot out of range: {s}"
            )));
        }
        Err(DomainError::parse(format!("Unknown slot key: {s}")))
    }
}

/// Result of an equip/unequip transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipOutcome {
    /// Item placed into the slot
    Placed(SlotKey),
    /// Item placed, previous occupant pushed out of the mapping
    Displaced { slot: SlotKey, displaced: ItemId },
    /// The item and the destination occupant exchanged slots atomically
    Swapped { from: SlotKey, to: SlotKey },
    /// Operation was semantically invalid; state unchanged
    Rejected,
}

impl EquipOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// The slot-to-item mapping for one actor.
///
/// Items themselves are owned by the actor's inventory collection; slots hold
/// references by identity only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSlots {
    pub head: Option<ItemId>,
    pub body: Option<ItemId>,
    pub cloak: Option<ItemId>,
    pub belt: Option<ItemId>,
    pub boots: Option<ItemId>,
    pub sword: Option<ItemId>,
    pub shield: Option<ItemId>,
    pub rings: [Option<ItemId>; RING_SLOTS],
    pub bracelets: [Option<ItemId>; BRACELET_SLOTS],
    pub amulet: Option<ItemId>,
}

impl EquipmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current occupant of a slot.
    pub fn occupant(&self, key: SlotKey) -> Option<ItemId> {
        match key {
            SlotKey::Body(slot) => *self.body_slot(slot),
            SlotKey::Ring(i) => self.rings.get(i).copied().flatten(),
            SlotKey::Bracelet(i) => self.bracelets.get(i).copied().flatten(),
            SlotKey::Amulet => self.amulet,
        }
    }

    fn body_slot(&self, slot: BodySlot) -> &Option<ItemId> {
        match slot {
            BodySlot::Head => &self.head,
            BodySlot::Body => &self.body,
            BodySlot::Cloak => &self.cloak,
            BodySlot::Belt => &self.belt,
            BodySlot::Boots => &self.boots,
            BodySlot::Sword => &self.sword,
            BodySlot::Shield => &self.shield,
        }
    }

    fn slot_mut(&mut self, key: SlotKey) -> &mut Option<ItemId> {
        match key {
            SlotKey::Body(BodySlot::Head) => &mut self.head,
            SlotKey::Body(BodySlot::Body) => &mut self.body,
            SlotKey::Body(BodySlot::Cloak) => &mut self.cloak,
            SlotKey::Body(BodySlot::Belt) => &mut self.belt,
            SlotKey::Body(BodySlot::Boots) => &mut self.boots,
            SlotKey::Body(BodySlot::Sword) => &mut self.sword,
            SlotKey::Body(BodySlot::Shield) => &mut self.shield,
            SlotKey::Ring(i) => &mut self.rings[i],
            SlotKey::Bracelet(i) => &mut self.bracelets[i],
            SlotKey::Amulet => &mut self.amulet,
        }
    }

    fn all_keys() -> impl Iterator<Item = SlotKey> {
        BodySlot::all()
            .into_iter()
            .map(SlotKey::Body)
            .chain((0..RING_SLOTS).map(SlotKey::Ring))
            .chain((0..BRACELET_SLOTS).map(SlotKey::Bracelet))
            .chain(std::iter::once(SlotKey::Amulet))
    }

    /// Locate an item across every slot group by identity.
    pub fn find(&self, item_id: ItemId) -> Option<SlotKey> {
        Self::all_keys().find(|&key| self.occupant(key) == Some(item_id))
    }

    /// True when the item currently occupies any slot.
    pub fn is_equipped(&self, item_id: ItemId) -> bool {
        self.find(item_id).is_some()
    }

    /// Every equipped item identity. Derived, recomputed on demand.
    pub fn occupant_ids(&self) -> HashSet<ItemId> {
        Self::all_keys()
            .filter_map(|key| self.occupant(key))
            .collect()
    }

    /// True when no item identity occupies two slots. Checked by tests and
    /// debug assertions after every transition.
    pub fn occupancy_is_unique(&self) -> bool {
        let mut seen = HashSet::new();
        Self::all_keys()
            .filter_map(|key| self.occupant(key))
            .all(|id| seen.insert(id))
    }

    /// Route an equip request to the owning slot group.
    ///
    /// Items dropped on a slot group their classification does not match are
    /// rejected, never errors - drags can be semantically invalid.
    pub fn equip(&mut self, item: &Item, requested: SlotKey) -> EquipOutcome {
        let outcome = match requested {
            SlotKey::Body(slot) => self.equip_to_body(item, slot),
            SlotKey::Ring(i) => self.equip_ring(item, Some(i)),
            SlotKey::Bracelet(i) => self.equip_bracelet(item, Some(i)),
            SlotKey::Amulet => self.equip_amulet(item),
        };
        debug_assert!(self.occupancy_is_unique());
        outcome
    }

    /// Equip into the body group. Rules, in priority order:
    ///
    /// 1. Armor self-slots into the slot matching its own piece, ignoring the
    ///    requested slot.
    /// 2. An unequipped weapon dropped outside the hand slots defaults to the
    ///    sword slot.
    /// 3. An equipped weapon dropped outside the hand slots is a no-op.
    /// 4. A weapon moving between the hand slots swaps atomically with the
    ///    destination occupant.
    /// 5. Otherwise the weapon is placed into the requested hand slot, its
    ///    previous slot cleared first.
    pub fn equip_to_body(&mut self, item: &Item, requested: BodySlot) -> EquipOutcome {
        match item.classification() {
            EquipClass::Armor(own_slot) => self.place(item.id, SlotKey::Body(own_slot)),
            EquipClass::Weapon => {
                let current = self.find(item.id);
                if !requested.is_hand() {
                    if current.is_none() {
                        return self.place(item.id, SlotKey::Body(BodySlot::Sword));
                    }
                    return EquipOutcome::Rejected;
                }
                if let Some(SlotKey::Body(held)) = current {
                    let destination_occupant = self.occupant(SlotKey::Body(requested));
                    if held.is_hand()
                        && held != requested
                        && destination_occupant.is_some_and(|occ| occ != item.id)
                    {
                        return self.swap(SlotKey::Body(held), SlotKey::Body(requested));
                    }
                }
                self.place(item.id, SlotKey::Body(requested))
            }
            _ => EquipOutcome::Rejected,
        }
    }

    /// Equip a ring. With no requested slot the first empty ring slot is
    /// used; a requested occupied slot swaps when the ring is already
    /// equipped elsewhere, and displaces the occupant otherwise.
    pub fn equip_ring(&mut self, item: &Item, requested: Option<usize>) -> EquipOutcome {
        if item.classification() != EquipClass::Ring {
            return EquipOutcome::Rejected;
        }
        self.equip_indexed(item.id, requested, RING_SLOTS, SlotKey::Ring)
    }

    /// Equip a bracelet; same pattern as rings over the two bracelet slots.
    pub fn equip_bracelet(&mut self, item: &Item, requested: Option<usize>) -> EquipOutcome {
        if item.classification() != EquipClass::Bracelet {
            return EquipOutcome::Rejected;
        }
        self.equip_indexed(item.id, requested, BRACELET_SLOTS, SlotKey::Bracelet)
    }

    /// Equip an amulet into its single fixed slot.
    pub fn equip_amulet(&mut self, item: &Item) -> EquipOutcome {
        if item.classification() != EquipClass::Amulet {
            return EquipOutcome::Rejected;
        }
        self.place(item.id, SlotKey::Amulet)
    }

    fn equip_indexed(
        &mut self,
        item_id: ItemId,
        requested: Option<usize>,
        len: usize,
        key: fn(usize) -> SlotKey,
    ) -> EquipOutcome {
        let target = match requested {
            Some(i) if i < len => key(i),
            Some(_) => return EquipOutcome::Rejected,
            None => match (0..len).map(key).find(|&k| self.occupant(k).is_none()) {
                Some(empty) => empty,
                None => return EquipOutcome::Rejected,
            },
        };

        let current = self.find(item_id);
        if self.occupant(target).is_some_and(|occ| occ != item_id) {
            if let Some(held) = current {
                return self.swap(held, target);
            }
        }
        self.place(item_id, target)
    }

    /// Clear the item's current slot, scanning every group by identity.
    pub fn unequip(&mut self, item_id: ItemId) -> Option<SlotKey> {
        let key = self.find(item_id)?;
        *self.slot_mut(key) = None;
        Some(key)
    }

    /// Clear-then-set placement. The previous slot of the item is cleared
    /// before the destination is written, so the uniqueness invariant holds
    /// at every step.
    fn place(&mut self, item_id: ItemId, target: SlotKey) -> EquipOutcome {
        if let Some(previous) = self.find(item_id) {
            if previous == target {
                return EquipOutcome::Placed(target);
            }
            *self.slot_mut(previous) = None;
        }
        let displaced = self.slot_mut(target).replace(item_id);
        match displaced {
            Some(old) if old != item_id => EquipOutcome::Displaced {
                slot: target,
                displaced: old,
            },
            _ => EquipOutcome::Placed(target),
        }
    }

    /// Exchange the occupants of two slots atomically.
    fn swap(&mut self, from: SlotKey, to: SlotKey) -> EquipOutcome {
        let a = self.slot_mut(from).take();
        let b = std::mem::replace(self.slot_mut(to), a);
        *self.slot_mut(from) = b;
        EquipOutcome::Swapped { from, to }
    }
}
