//! Demo inhabitants and workplaces.

use bevy::prelude::*;
use rand::Rng;
use realtime::citizen::{
    BuildingId, CitizenCreated, CitizenLocation, CitizenRecord, EducationLevel, RawAge, Wealth,
};
use realtime::host::HostBuffers;
use realtime::work_schedule::{WorkScheduleRecord, WorkScheduleStore};

use crate::demo_rng::DemoRng;

/// Workplaces configured at startup, one per schedule kind.
pub const WORKPLACES: [(BuildingId, &str); 6] = [
    (BuildingId(1), "office"),
    (BuildingId(2), "shop"),
    (BuildingId(3), "restaurant"),
    (BuildingId(4), "factory"),
    (BuildingId(5), "hospital"),
    (BuildingId(6), "power plant"),
];

pub fn workplace_name(building: BuildingId) -> &'static str {
    WORKPLACES
        .iter()
        .find(|(id, _)| *id == building)
        .map_or("workplace", |(_, name)| name)
}

fn workplace_schedule(name: &str) -> WorkScheduleRecord {
    let base = WorkScheduleRecord::default();
    match name {
        "shop" => WorkScheduleRecord {
            works_on_weekends: true,
            shift_count: 2,
            ..base
        },
        "restaurant" => WorkScheduleRecord {
            works_on_weekends: true,
            ..base
        }
        .with_extended_shift(true),
        "factory" => WorkScheduleRecord {
            works_at_night: true,
            shift_count: 3,
            ..base
        },
        "hospital" => WorkScheduleRecord {
            works_at_night: true,
            works_on_weekends: true,
            shift_count: 2,
            ..base
        }
        .with_continuous_shift(true),
        "power plant" => WorkScheduleRecord {
            works_on_weekends: true,
            ..base
        }
        .with_continuous_shift(true),
        _ => base,
    }
}

/// Store a schedule for every demo workplace.
pub fn configure_workplaces(world: &mut World) {
    let mut store = world.resource_mut::<WorkScheduleStore>();
    for (building, name) in WORKPLACES {
        store.set(building, workplace_schedule(name));
        debug!("{name} ({building:?}): {:?}", store.get(building));
    }
}

fn random_record(rng: &mut impl Rng) -> CitizenRecord {
    CitizenRecord {
        age: RawAge(rng.gen()),
        education: EducationLevel::ALL[rng.gen_range(0..EducationLevel::ALL.len())],
        location: CitizenLocation::Home,
        wealth: match rng.gen_range(0..3) {
            0 => Wealth::Low,
            1 => Wealth::Medium,
            _ => Wealth::High,
        },
        ..Default::default()
    }
}

/// Create `count` random inhabitants in the host and announce each one.
/// Returns how many were created before the host ran out of slots.
pub fn seed_citizens(world: &mut World, count: u32) -> u32 {
    let mut created = Vec::with_capacity(count as usize);
    world.resource_scope(|world, mut rng: Mut<DemoRng>| {
        let mut host = world.resource_mut::<HostBuffers>();
        for _ in 0..count {
            let record = random_record(&mut rng.0);
            let position = Vec3::new(
                rng.0.gen_range(0.0..4096.0),
                0.0,
                rng.0.gen_range(0.0..4096.0),
            );
            let Some(citizen) = host.create_citizen(record) else {
                warn!("Host citizen buffer is full");
                break;
            };
            match host.create_instance(citizen, position) {
                Some(instance) => created.push(instance),
                None => {
                    warn!("Host instance buffer is full");
                    break;
                }
            }
        }
    });

    let total = created.len() as u32;
    for instance in created {
        world.send_event(CitizenCreated { instance });
    }
    total
}
