use dashmap::DashMap;
use uuid::Uuid;

use crate::models::zone::Zone;

/// Zone id -> zone name resolver for access events.
pub struct ZoneRegistry {
    zones: DashMap<Uuid, Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self {
            zones: DashMap::new(),
        }
    }

    pub fn add_zone(&self, zone: Zone) {
        self.zones.insert(zone.id, zone);
    }

    pub fn resolve(&self, id: Uuid) -> Option<Zone> {
        self.zones.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let registry = ZoneRegistry::new();
        let id = Uuid::new_v4();
        registry.add_zone(Zone::new(id, "Entrada Principal"));

        assert_eq!(registry.resolve(id).unwrap().nombre, "Entrada Principal");
        assert!(registry.resolve(Uuid::new_v4()).is_none());
    }
}
