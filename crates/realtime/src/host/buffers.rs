use bevy::prelude::*;

use crate::citizen::{
    BuildingId, CitizenId, CitizenLocation, CitizenRecord, FamilyMembers, FlagMatch,
    InstanceFlags, InstanceId, InstanceRecord, NodeId, UnitId, Wealth,
};

use super::{HostError, HostStateAdapter};

/// Default buffer sizes, matching the host's array limits.
pub const DEFAULT_MAX_CITIZENS: u32 = 1 << 20;
pub const DEFAULT_MAX_INSTANCES: u32 = 1 << 16;

/// A goods storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoodsUnit {
    pub goods: u16,
}

/// Slot-allocated buffers with the host's id semantics: slot 0 is reserved
/// as the "none" sentinel and freed slots are reused.
#[derive(Debug, Clone)]
struct SlotBuffer<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    live: u32,
    max: u32,
}

impl<T> SlotBuffer<T> {
    fn new(max: u32) -> Self {
        Self {
            slots: vec![None],
            free: Vec::new(),
            live: 0,
            max,
        }
    }

    fn insert(&mut self, value: T) -> Option<u32> {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                let next = self.slots.len() as u32;
                if next >= self.max {
                    return None;
                }
                self.slots.push(None);
                next
            }
        };
        self.slots[id as usize] = Some(value);
        self.live += 1;
        Some(id)
    }

    fn remove(&mut self, id: u32) -> Option<T> {
        if id == 0 {
            return None;
        }
        let value = self.slots.get_mut(id as usize)?.take()?;
        self.free.push(id);
        self.live -= 1;
        Some(value)
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize)?.as_ref()
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    fn lookup(&self, what: &'static str, id: u32) -> Result<&T, HostError> {
        if id == 0 || id >= self.max {
            return Err(HostError::OutOfRange { what, id });
        }
        self.get(id).ok_or(HostError::Released { what, id })
    }

    fn lookup_mut(&mut self, what: &'static str, id: u32) -> Result<&mut T, HostError> {
        if id == 0 || id >= self.max {
            return Err(HostError::OutOfRange { what, id });
        }
        self.get_mut(id).ok_or(HostError::Released { what, id })
    }
}

/// In-process host state: citizens, their instances and goods units.
#[derive(Resource, Debug, Clone)]
pub struct HostBuffers {
    citizens: SlotBuffer<CitizenRecord>,
    instances: SlotBuffer<InstanceRecord>,
    units: SlotBuffer<GoodsUnit>,
}

impl Default for HostBuffers {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_CITIZENS, DEFAULT_MAX_INSTANCES)
    }
}

impl HostBuffers {
    pub fn with_capacity(max_citizens: u32, max_instances: u32) -> Self {
        Self {
            citizens: SlotBuffer::new(max_citizens),
            instances: SlotBuffer::new(max_instances),
            units: SlotBuffer::new(u32::MAX),
        }
    }

    // -----------------------------------------------------------------------
    // Host-side allocation
    // -----------------------------------------------------------------------

    /// Allocate a citizen record. Returns `None` when the buffer is full.
    pub fn create_citizen(&mut self, record: CitizenRecord) -> Option<CitizenId> {
        self.citizens.insert(record).map(CitizenId)
    }

    /// Allocate an instance for an existing citizen and link the two.
    pub fn create_instance(&mut self, citizen: CitizenId, position: Vec3) -> Option<InstanceId> {
        self.citizens.get(citizen.0)?;
        let id = self.instances.insert(InstanceRecord {
            citizen,
            flags: InstanceFlags::CREATED,
            position,
            ..Default::default()
        })?;
        // Instance ids are u16 in the host.
        let Ok(instance) = u16::try_from(id).map(InstanceId) else {
            self.instances.remove(id);
            return None;
        };
        if let Some(record) = self.citizens.get_mut(citizen.0) {
            record.instance = instance;
        }
        Some(instance)
    }

    pub fn create_unit(&mut self, goods: u16) -> Option<UnitId> {
        self.units.insert(GoodsUnit { goods }).map(UnitId)
    }

    pub fn citizen(&self, citizen: CitizenId) -> Option<&CitizenRecord> {
        self.citizens.get(citizen.0)
    }

    pub fn instance(&self, instance: InstanceId) -> Option<&InstanceRecord> {
        self.instances.get(instance.0 as u32)
    }

    pub fn instance_mut(&mut self, instance: InstanceId) -> Option<&mut InstanceRecord> {
        self.instances.get_mut(instance.0 as u32)
    }

    pub fn unit(&self, unit: UnitId) -> Option<&GoodsUnit> {
        self.units.get(unit.0)
    }

    pub fn citizens_count(&self) -> u32 {
        self.citizens.live
    }
}

impl HostStateAdapter for HostBuffers {
    fn release_citizen(&mut self, citizen: CitizenId) {
        if let Some(record) = self.citizens.remove(citizen.0) {
            self.instances.remove(record.instance.0 as u32);
        }
    }

    fn target_building(&self, instance: InstanceId) -> Option<BuildingId> {
        self.instance(instance)
            .map(|i| i.target_building)
            .filter(|b| !b.is_none())
    }

    fn set_target_building(&mut self, instance: InstanceId, building: BuildingId) {
        if let Some(record) = self.instance_mut(instance) {
            record.target_building = building;
            record.flags = record.flags & !InstanceFlags::TARGET_IS_NODE;
        }
    }

    fn target_node(&self, instance: InstanceId) -> Option<NodeId> {
        self.instance(instance)
            .filter(|i| i.flags.contains(InstanceFlags::TARGET_IS_NODE))
            .map(|i| i.target_node)
            .filter(|n| !n.is_none())
    }

    fn set_target_node(&mut self, instance: InstanceId, node: NodeId) {
        if let Some(record) = self.instance_mut(instance) {
            record.target_node = node;
            record.flags = record.flags | InstanceFlags::TARGET_IS_NODE;
        }
    }

    fn instance_has_flags(
        &self,
        instance: InstanceId,
        flags: InstanceFlags,
        mode: FlagMatch,
    ) -> bool {
        self.instance(instance).is_some_and(|i| match mode {
            FlagMatch::All => i.flags.contains(flags),
            FlagMatch::Any => i.flags.intersects(flags),
        })
    }

    fn instance_flags(&self, instance: InstanceId, mask: InstanceFlags) -> InstanceFlags {
        self.instance(instance)
            .map(|i| i.flags & mask)
            .unwrap_or(InstanceFlags::NONE)
    }

    fn set_instance_flags(&mut self, instance: InstanceId, flags: InstanceFlags, enabled: bool) {
        if let Some(record) = self.instance_mut(instance) {
            record.flags = if enabled {
                record.flags | flags
            } else {
                record.flags & !flags
            };
        }
    }

    fn instance_wait_counter(&self, instance: InstanceId) -> u8 {
        self.instance(instance).map(|i| i.wait_counter).unwrap_or(0)
    }

    fn is_area_evacuating(&self, instance: InstanceId) -> bool {
        self.instance(instance).is_some_and(|i| i.evacuating)
    }

    fn modify_unit_goods(&mut self, unit: UnitId, amount: i32) -> bool {
        let Some(slot) = self.units.get_mut(unit.0) else {
            return false;
        };
        let updated = slot.goods as i64 + amount as i64;
        if updated < 0 {
            return false;
        }
        slot.goods = updated.min(u16::MAX as i64) as u16;
        true
    }

    fn instances_count(&self) -> u32 {
        self.instances.live
    }

    fn max_instances_count(&self) -> u32 {
        self.instances.max
    }

    fn max_citizens_count(&self) -> u32 {
        self.citizens.max
    }

    fn citizen_location(&self, citizen: CitizenId) -> Result<CitizenLocation, HostError> {
        Ok(self.citizens.lookup("citizen", citizen.0)?.location)
    }

    fn citizen_wealth(&self, citizen: CitizenId) -> Result<Wealth, HostError> {
        Ok(self.citizens.lookup("citizen", citizen.0)?.wealth)
    }

    fn citizen_family(&self, citizen: CitizenId) -> Result<FamilyMembers, HostError> {
        Ok(self.citizens.lookup("citizen", citizen.0)?.family)
    }

    fn citizen_mut(&mut self, instance: InstanceId) -> Result<&mut CitizenRecord, HostError> {
        let id = self.instances.lookup("instance", instance.0 as u32)?.citizen;
        self.citizens.lookup_mut("citizen", id.0)
    }

    fn citizen_position(&self, instance: InstanceId) -> Result<Vec3, HostError> {
        Ok(self.instances.lookup("instance", instance.0 as u32)?.position)
    }

    fn stop_moving(&mut self, instance: InstanceId, reset_target: bool) {
        if let Some(record) = self.instance_mut(instance) {
            record.has_path = false;
            record.wait_counter = 0;
            record.flags = record.flags & !InstanceFlags::WAITING_PATH;
            if reset_target {
                record.target_building = BuildingId(0);
                record.target_node = NodeId(0);
                record.flags = record.flags & !InstanceFlags::TARGET_IS_NODE;
            }
        }
    }
}
