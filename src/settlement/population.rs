//! Settlements, their population groups and size promotion

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{CivError, Result};
use crate::core::types::{
    Assignment, GroupId, Location, PopulationCenterSize, PopulationGroupType, PopulationId,
    SettlementId, Turn,
};
use crate::settlement::area::{AreaKind, SettlementArea};

/// One unit of population living in a group's tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub id: PopulationId,
    pub born_on: Turn,
    pub assignment: Assignment,
    pub workplace: Option<Location>,
}

impl Population {
    pub fn new(born_on: Turn) -> Self {
        Self {
            id: PopulationId::new(),
            born_on,
            assignment: Assignment::Unassigned,
            workplace: None,
        }
    }

    pub fn assign_work(&mut self, workplace: Location) {
        self.assignment = Assignment::Worker;
        self.workplace = Some(workplace);
    }
}

/// A district or village belonging to a settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationGroup {
    pub id: GroupId,
    pub name: String,
    pub established_on: Turn,
    pub group_type: PopulationGroupType,
    pub location: Location,
    /// Only villages get a footprint of their own
    pub border_area: SettlementArea,
    pub populations: Vec<Population>,
}

impl PopulationGroup {
    pub fn new(
        name: impl Into<String>,
        group_type: PopulationGroupType,
        location: Location,
        established_on: Turn,
    ) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            established_on,
            group_type,
            location,
            border_area: SettlementArea::default(),
            populations: Vec::new(),
        }
    }

    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    pub fn add_population(&mut self, born_on: Turn) -> PopulationId {
        let population = Population::new(born_on);
        let id = population.id;
        self.populations.push(population);
        id
    }

    pub fn is_district(&self) -> bool {
        self.group_type == PopulationGroupType::District
    }

    pub fn is_village(&self) -> bool {
        self.group_type == PopulationGroupType::Village
    }
}

/// District occupancy thresholds a settlement must reach for each size:
/// (size, populated districts, districts with >1, districts with >2)
const PROMOTION_THRESHOLDS: [(PopulationCenterSize, usize, usize, usize); 3] = [
    (PopulationCenterSize::Large, 13, 5, 1),
    (PopulationCenterSize::Medium, 8, 3, 0),
    (PopulationCenterSize::Small, 3, 1, 0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub name: String,
    pub founded_on: Turn,
    pub size: PopulationCenterSize,
    pub center: Location,
    pub borders: SettlementArea,
    /// Present once the settlement is Medium or larger
    pub outskirts: Option<SettlementArea>,
    pub groups: AHashMap<GroupId, PopulationGroup>,
    pub central_district: GroupId,
}

impl Settlement {
    /// A new Tiny settlement whose central district holds one population
    pub fn found(name: impl Into<String>, center: Location, turn: Turn) -> Self {
        let name = name.into();
        let mut district = PopulationGroup::new(
            format!("{name} Center"),
            PopulationGroupType::District,
            center,
            turn,
        );
        district.add_population(turn);
        let central_district = district.id;

        let mut groups = AHashMap::new();
        groups.insert(central_district, district);

        Self {
            id: SettlementId::new(),
            name,
            founded_on: turn,
            size: PopulationCenterSize::Tiny,
            center,
            borders: SettlementArea::default(),
            outskirts: None,
            groups,
            central_district,
        }
    }

    pub fn add_group(&mut self, group: PopulationGroup) -> GroupId {
        let id = group.id;
        self.groups.insert(id, group);
        id
    }

    pub fn group(&self, id: GroupId) -> Result<&PopulationGroup> {
        self.groups.get(&id).ok_or(CivError::PopulationGroupNotFound(id))
    }

    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut PopulationGroup> {
        self.groups
            .get_mut(&id)
            .ok_or(CivError::PopulationGroupNotFound(id))
    }

    /// The area a renderer draws visuals for
    pub fn area_mut(&mut self, kind: AreaKind) -> Result<&mut SettlementArea> {
        match kind {
            AreaKind::Borders => Ok(&mut self.borders),
            AreaKind::Outskirts => self
                .outskirts
                .as_mut()
                .ok_or_else(|| CivError::NoOutskirts(self.name.clone())),
            AreaKind::Village(id) => {
                let group = self.group_mut(id)?;
                if !group.is_village() {
                    return Err(CivError::NotAVillage(id));
                }
                Ok(&mut group.border_area)
            }
        }
    }

    pub fn central_district(&self) -> Result<&PopulationGroup> {
        self.group(self.central_district)
    }

    pub fn districts(&self) -> impl Iterator<Item = &PopulationGroup> {
        self.groups.values().filter(|group| group.is_district())
    }

    pub fn villages(&self) -> impl Iterator<Item = &PopulationGroup> {
        self.groups.values().filter(|group| group.is_village())
    }

    pub fn population_count(&self) -> usize {
        self.groups.values().map(PopulationGroup::population_count).sum()
    }

    /// Promote the settlement if its districts are populated enough.
    /// Size never shrinks. Returns true when the size grew.
    pub fn determine_size(&mut self) -> bool {
        let (mut populated, mut crowded, mut packed) = (0, 0, 0);
        for district in self.districts() {
            let count = district.population_count();
            if count > 0 {
                populated += 1;
            }
            if count > 1 {
                crowded += 1;
            }
            if count > 2 {
                packed += 1;
            }
        }

        let earned = PROMOTION_THRESHOLDS
            .iter()
            .find(|(_, min_populated, min_crowded, min_packed)| {
                populated >= *min_populated && crowded >= *min_crowded && packed >= *min_packed
            })
            .map_or(PopulationCenterSize::Tiny, |(size, ..)| *size);

        if earned > self.size {
            self.size = earned;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district_with(settlement: &mut Settlement, col: i32, populations: usize) -> GroupId {
        let mut group = PopulationGroup::new(
            format!("District {col}"),
            PopulationGroupType::District,
            Location::new(10, col),
            1,
        );
        for _ in 0..populations {
            group.add_population(1);
        }
        settlement.add_group(group)
    }

    #[test]
    fn test_found_creates_central_district() {
        let settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        let center = settlement.central_district().unwrap();
        assert_eq!(center.location, Location::new(24, 1));
        assert!(center.is_district());
        assert_eq!(center.population_count(), 1);
        assert_eq!(settlement.size, PopulationCenterSize::Tiny);
        assert!(settlement.outskirts.is_none());
    }

    #[test]
    fn test_promotes_tiny_to_small() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        // Central district already holds one population
        district_with(&mut settlement, 3, 2);
        let third = district_with(&mut settlement, 5, 1);

        assert!(settlement.determine_size());
        assert_eq!(settlement.size, PopulationCenterSize::Small);

        // Emptying a district does not demote
        settlement.group_mut(third).unwrap().populations.clear();
        assert!(!settlement.determine_size());
        assert_eq!(settlement.size, PopulationCenterSize::Small);
    }

    #[test]
    fn test_three_single_districts_stay_tiny() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        district_with(&mut settlement, 3, 1);
        district_with(&mut settlement, 5, 1);
        assert!(!settlement.determine_size());
        assert_eq!(settlement.size, PopulationCenterSize::Tiny);
    }

    #[test]
    fn test_promotes_to_medium_and_large() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        for col in 0..7 {
            district_with(&mut settlement, 10 + col, if col < 3 { 2 } else { 1 });
        }
        assert!(settlement.determine_size());
        assert_eq!(settlement.size, PopulationCenterSize::Medium);

        for col in 0..5 {
            district_with(&mut settlement, 30 + col, if col < 2 { 3 } else { 1 });
        }
        assert!(settlement.determine_size());
        assert_eq!(settlement.size, PopulationCenterSize::Large);
    }

    #[test]
    fn test_large_needs_a_packed_district() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        for col in 0..12 {
            district_with(&mut settlement, 10 + col, 2);
        }
        settlement.determine_size();
        assert_eq!(settlement.size, PopulationCenterSize::Medium);
    }

    #[test]
    fn test_villages_do_not_count_towards_size() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        for col in 0..4 {
            let mut village =
                PopulationGroup::new("Hamlet", PopulationGroupType::Village, Location::new(5, col * 4), 1);
            village.add_population(1);
            village.add_population(1);
            settlement.add_group(village);
        }
        assert!(!settlement.determine_size());
        assert_eq!(settlement.villages().count(), 4);
        assert_eq!(settlement.population_count(), 9);
    }

    #[test]
    fn test_missing_group() {
        let settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        assert!(matches!(
            settlement.group(GroupId::new()),
            Err(CivError::PopulationGroupNotFound(_))
        ));
    }

    #[test]
    fn test_area_mut_selects_area() {
        let mut settlement = Settlement::found("Babylon", Location::new(24, 1), 1);
        let district = settlement.central_district;
        let village = settlement.add_group(PopulationGroup::new(
            "Hamlet",
            PopulationGroupType::Village,
            Location::new(5, 4),
            1,
        ));

        assert!(settlement.area_mut(AreaKind::Borders).is_ok());
        assert!(settlement.area_mut(AreaKind::Village(village)).is_ok());
        assert!(matches!(
            settlement.area_mut(AreaKind::Outskirts),
            Err(CivError::NoOutskirts(_))
        ));
        assert!(matches!(
            settlement.area_mut(AreaKind::Village(district)),
            Err(CivError::NotAVillage(_))
        ));
    }

    #[test]
    fn test_assign_work() {
        let mut population = Population::new(4);
        population.assign_work(Location::new(3, 3));
        assert_eq!(population.assignment, Assignment::Worker);
        assert_eq!(population.workplace, Some(Location::new(3, 3)));
    }
}
