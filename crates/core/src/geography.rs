//! Geographic containment hierarchy: regions, departments, cities.
//!
//! Geography is bootstrapped once by the host and never mutated afterwards,
//! so these are plain value types. The only rule the engine relies on is
//! containment: a region contains a city iff one of its departments lists it.

use serde::{Deserialize, Serialize};

/// A city, identified by its name and postal code together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub postal_code: String,
}

impl City {
    pub fn new(name: impl Into<String>, postal_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// An administrative department: a code and the cities it covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    code: String,
    cities: Vec<City>,
}

impl Department {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            cities: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Adds a city, preserving insertion order. Adding a city twice is a
    /// no-op.
    pub fn add_city(&mut self, city: City) {
        if !self.cities.contains(&city) {
            self.cities.push(city);
        }
    }

    pub fn contains_city(&self, city: &City) -> bool {
        self.cities.contains(city)
    }
}

/// A region: a named set of departments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    departments: Vec<Department>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            departments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn add_department(&mut self, department: Department) {
        if !self.departments.contains(&department) {
            self.departments.push(department);
        }
    }

    /// A region contains a city iff some department in it lists that city.
    pub fn contains_city(&self, city: &City) -> bool {
        self.departments
            .iter()
            .any(|department| department.contains_city(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_contains_city_through_a_department() {
        let westbrook = City::new("Westbrook", "78000");
        let harwick = City::new("Harwick", "76000");

        let mut department = Department::new("78");
        department.add_city(westbrook.clone());

        let mut region = Region::new("Northshire");
        region.add_department(department);

        assert!(region.contains_city(&westbrook));
        assert!(!region.contains_city(&harwick));
    }

    #[test]
    fn adding_the_same_city_twice_keeps_one_entry() {
        let mut department = Department::new("78");
        department.add_city(City::new("Westbrook", "78000"));
        department.add_city(City::new("Westbrook", "78000"));

        assert_eq!(department.cities().len(), 1);
    }

    #[test]
    fn cities_differing_only_by_postal_code_are_distinct() {
        let mut department = Department::new("78");
        department.add_city(City::new("Westbrook", "78000"));
        department.add_city(City::new("Westbrook", "78100"));

        assert_eq!(department.cities().len(), 2);
    }
}
