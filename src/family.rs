use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A spousal relation entry. Current spouses carry only the marriage date;
/// former spouses also carry the divorce date when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpouseLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub married_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divorced_date: Option<NaiveDate>,
}

impl SpouseLink {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            married_date: None,
            divorced_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    #[serde(default = "default_living")]
    pub is_living: bool,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub spouses: Vec<SpouseLink>,
    #[serde(default)]
    pub previous_spouses: Vec<SpouseLink>,
    #[serde(default)]
    pub siblings: Vec<String>,
}

fn default_living() -> bool {
    true
}

impl Person {
    pub fn new(id: &str, name: &str, gender: Gender) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            gender,
            birth_date: None,
            death_date: None,
            is_living: true,
            parents: Vec::new(),
            children: Vec::new(),
            spouses: Vec::new(),
            previous_spouses: Vec::new(),
            siblings: Vec::new(),
        }
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_date.map(|d| d.year())
    }

    pub fn death_year(&self) -> Option<i32> {
        self.death_date.map(|d| d.year())
    }

    /// Age as of the given year. Deceased people stop aging at their death
    /// year. Unknown birth date yields None.
    pub fn age_at(&self, year: i32) -> Option<i32> {
        let birth = self.birth_year()?;
        let until = match self.death_year() {
            Some(death) => death.min(year),
            None => year,
        };
        Some((until - birth).max(0))
    }

    pub fn has_spouse(&self) -> bool {
        !self.spouses.is_empty() || !self.previous_spouses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    /// The current (primary) person selection changed.
    CurrentChanged,
    /// People or relations were added, removed or edited.
    ContentChanged,
}

pub type GraphListener = Box<dyn Fn(GraphEvent)>;

/// In-memory family graph: people keyed by id plus the current (primary)
/// selection. Relation accessors resolve id lists to people and silently
/// skip ids that no longer resolve.
#[derive(Default)]
pub struct FamilyGraph {
    people: BTreeMap<String, Person>,
    current: Option<String>,
    listeners: Vec<(usize, GraphListener)>,
    next_listener: usize,
}

impl std::fmt::Debug for FamilyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilyGraph")
            .field("people", &self.people)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, person: Person) {
        self.people.insert(person.id.clone(), person);
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.people.get_mut(id)
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn current(&self) -> Option<&Person> {
        self.current.as_deref().and_then(|id| self.people.get(id))
    }

    pub fn set_current(&mut self, id: Option<&str>) {
        let resolved = id.filter(|id| self.people.contains_key(*id));
        if self.current.as_deref() != resolved {
            self.current = resolved.map(str::to_string);
            self.emit(GraphEvent::CurrentChanged);
        }
    }

    /// Signal that people or relations changed out from under observers.
    pub fn notify_content_changed(&self) {
        self.emit(GraphEvent::ContentChanged);
    }

    pub fn subscribe(&mut self, listener: GraphListener) -> usize {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: usize) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    fn emit(&self, event: GraphEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    fn resolve(&self, ids: &[String]) -> Vec<&Person> {
        ids.iter().filter_map(|id| self.people.get(id)).collect()
    }

    pub fn parents_of(&self, person: &Person) -> Vec<&Person> {
        self.resolve(&person.parents)
    }

    pub fn children_of(&self, person: &Person) -> Vec<&Person> {
        self.resolve(&person.children)
    }

    pub fn siblings_of(&self, person: &Person) -> Vec<&Person> {
        self.resolve(&person.siblings)
    }

    pub fn spouses_of(&self, person: &Person) -> Vec<&Person> {
        person
            .spouses
            .iter()
            .filter_map(|link| self.people.get(&link.id))
            .collect()
    }

    pub fn previous_spouses_of(&self, person: &Person) -> Vec<&Person> {
        person
            .previous_spouses
            .iter()
            .filter_map(|link| self.people.get(&link.id))
            .collect()
    }

    pub fn are_spouses(&self, a: &Person, b: &Person) -> bool {
        a.spouses.iter().any(|link| link.id == b.id)
            || a.previous_spouses.iter().any(|link| link.id == b.id)
    }

    /// Make every relation symmetric: parents/children mirror each other,
    /// spousal links exist on both ends (dates copied from whichever end has
    /// them), siblings mirror. Also derives siblings from shared parents.
    pub fn normalize(&mut self) {
        let ids: Vec<String> = self.people.keys().cloned().collect();

        for id in &ids {
            let parents = self.people[id].parents.clone();
            for parent_id in parents {
                if let Some(parent) = self.people.get_mut(&parent_id)
                    && !parent.children.contains(id)
                {
                    parent.children.push(id.clone());
                }
            }
            let children = self.people[id].children.clone();
            for child_id in children {
                if let Some(child) = self.people.get_mut(&child_id)
                    && !child.parents.contains(id)
                {
                    child.parents.push(id.clone());
                }
            }
        }

        for id in &ids {
            for former in [false, true] {
                let links = if former {
                    self.people[id].previous_spouses.clone()
                } else {
                    self.people[id].spouses.clone()
                };
                for link in links {
                    let Some(other) = self.people.get_mut(&link.id) else {
                        continue;
                    };
                    let mirror = if former {
                        &mut other.previous_spouses
                    } else {
                        &mut other.spouses
                    };
                    match mirror.iter_mut().find(|l| l.id == *id) {
                        Some(existing) => {
                            if existing.married_date.is_none() {
                                existing.married_date = link.married_date;
                            }
                            if existing.divorced_date.is_none() {
                                existing.divorced_date = link.divorced_date;
                            }
                        }
                        None => mirror.push(SpouseLink {
                            id: id.clone(),
                            married_date: link.married_date,
                            divorced_date: link.divorced_date,
                        }),
                    }
                }
            }
        }

        // Derive siblings from shared parents, then mirror explicit ones.
        for id in &ids {
            let parents = self.people[id].parents.clone();
            let mut derived: Vec<String> = Vec::new();
            for parent_id in &parents {
                let Some(parent) = self.people.get(parent_id) else {
                    continue;
                };
                for child_id in &parent.children {
                    if child_id != id && !derived.contains(child_id) {
                        derived.push(child_id.clone());
                    }
                }
            }
            if let Some(person) = self.people.get_mut(id) {
                for child_id in derived {
                    if !person.siblings.contains(&child_id) {
                        person.siblings.push(child_id);
                    }
                }
            }
        }
        for id in &ids {
            let siblings = self.people[id].siblings.clone();
            for sibling_id in siblings {
                if let Some(sibling) = self.people.get_mut(&sibling_id)
                    && !sibling.siblings.contains(id)
                {
                    sibling.siblings.push(id.clone());
                }
            }
        }
    }
}

pub fn current_calendar_year() -> i32 {
    chrono::Local::now().year()
}
