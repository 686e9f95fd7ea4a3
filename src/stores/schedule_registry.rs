use dashmap::DashMap;
use uuid::Uuid;

use crate::models::schedule::ClassSchedule;

/// Class id -> schedule lookup, built once from configuration.
pub struct ScheduleRegistry {
    classes: DashMap<Uuid, ClassSchedule>,
}

impl ScheduleRegistry {
    pub fn from_classes(classes: &[ClassSchedule]) -> Self {
        let registry = Self {
            classes: DashMap::with_capacity(classes.len()),
        };
        for class in classes {
            registry.classes.insert(class.id, class.clone());
        }
        registry
    }

    pub fn get(&self, class_id: Uuid) -> Option<ClassSchedule> {
        self.classes.get(&class_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
