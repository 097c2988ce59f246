use serde::Deserialize;
use thiserror::Error;

use crate::family::{FamilyGraph, Person};

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("invalid family JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate person id {0:?}")]
    DuplicateId(String),
    #[error("person {person:?} references unknown {role} {target:?}")]
    UnknownRelation {
        person: String,
        role: &'static str,
        target: String,
    },
    #[error("current person {0:?} is not in the family")]
    UnknownCurrent(String),
}

#[derive(Debug, Deserialize)]
struct FamilyFile {
    people: Vec<Person>,
    #[serde(default)]
    current: Option<String>,
}

/// Parse a family JSON document into a normalized FamilyGraph.
///
/// Relation symmetry is repaired (a parent entry implies the child entry on
/// the other end, spousal links are mirrored with their dates), so the
/// layout engine can assume symmetric relations. Dangling relation ids are
/// a hard error here rather than a silent skip later.
pub fn parse_family(input: &str) -> Result<FamilyGraph, FamilyError> {
    let file: FamilyFile = serde_json::from_str(input)?;

    let mut graph = FamilyGraph::new();
    for person in file.people {
        if graph.person(&person.id).is_some() {
            return Err(FamilyError::DuplicateId(person.id));
        }
        graph.add_person(person);
    }

    validate_relations(&graph)?;
    graph.normalize();

    if let Some(current) = file.current {
        if graph.person(&current).is_none() {
            return Err(FamilyError::UnknownCurrent(current));
        }
        graph.set_current(Some(&current));
    }

    Ok(graph)
}

fn validate_relations(graph: &FamilyGraph) -> Result<(), FamilyError> {
    for person in graph.people() {
        let plain = [
            ("parent", &person.parents),
            ("child", &person.children),
            ("sibling", &person.siblings),
        ];
        for (role, ids) in plain {
            for id in ids {
                if graph.person(id).is_none() {
                    return Err(FamilyError::UnknownRelation {
                        person: person.id.clone(),
                        role,
                        target: id.clone(),
                    });
                }
            }
        }
        for (role, links) in [
            ("spouse", &person.spouses),
            ("previous spouse", &person.previous_spouses),
        ] {
            for link in links {
                if graph.person(&link.id).is_none() {
                    return Err(FamilyError::UnknownRelation {
                        person: person.id.clone(),
                        role,
                        target: link.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
