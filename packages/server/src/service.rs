//! Request flow behind the areas graph endpoint.
//!
//! Fetches run one after another: the assignment, then for each session its
//! assignee and area, then every location of the organization. The results
//! are handed to the [`AreaVisitAggregator`].

use canvass_map_canvass_models::{Area, Assignment, ResolvedSession};
use canvass_map_database::{CanvassStore, StoreError};
use canvass_map_graph::{AreaVisitAggregator, AreasGraph};
use canvass_map_people::{PeopleError, PersonDirectory};
use chrono::{DateTime, Utc};

/// Errors from building an areas graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The assignment does not exist in the requested organization.
    #[error("Assignment not found: {0}")]
    NotFound(String),

    /// The canvass store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The person directory failed.
    #[error("People error: {0}")]
    People(#[from] PeopleError),
}

/// Resolves the assignee and area of every session, in session order.
///
/// Sessions whose person or area cannot be found are skipped.
///
/// # Errors
///
/// Returns [`GraphError`] if a lookup fails.
pub async fn resolve_sessions(
    store: &dyn CanvassStore,
    people: &dyn PersonDirectory,
    org_id: i64,
    assignment: &Assignment,
) -> Result<Vec<ResolvedSession>, GraphError> {
    let mut sessions = Vec::with_capacity(assignment.sessions.len());

    for session in &assignment.sessions {
        let assignee = people.get_person(org_id, session.person_id).await?;
        let area = store.get_area(&session.area_id).await?;

        match (assignee, area) {
            (Some(assignee), Some(area)) => sessions.push(ResolvedSession { assignee, area }),
            (assignee, area) => log::warn!(
                "Skipping session of assignment {} (person {} found: {}, area {} found: {})",
                assignment.id,
                session.person_id,
                assignee.is_some(),
                session.area_id,
                area.is_some(),
            ),
        }
    }

    Ok(sessions)
}

/// Builds the areas graph of an assignment.
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if the assignment does not exist or
/// belongs to another organization, and other [`GraphError`] variants if a
/// fetch fails.
pub async fn load_areas_graph(
    store: &dyn CanvassStore,
    people: &dyn PersonDirectory,
    aggregator: &AreaVisitAggregator,
    org_id: i64,
    assignment_id: &str,
    now: DateTime<Utc>,
) -> Result<AreasGraph, GraphError> {
    let assignment = store
        .get_assignment(assignment_id)
        .await?
        .filter(|a| a.org_id == org_id)
        .ok_or_else(|| GraphError::NotFound(assignment_id.to_string()))?;

    let sessions = resolve_sessions(store, people, org_id, &assignment).await?;
    let areas: Vec<Area> = sessions.into_iter().map(|s| s.area).collect();
    let locations = store.list_locations(org_id).await?;

    Ok(aggregator.aggregate(&assignment, &areas, &locations, now))
}

#[cfg(test)]
pub(crate) mod tests {
    use canvass_map_canvass_models::{
        CanvassSnapshot, Household, LatLng, Location, Metric, MetricKind, MetricResponse, Person,
        ReportingLevel, SessionRef, Visit,
    };
    use canvass_map_database::memory::MemoryStore;
    use canvass_map_graph_models::{NO_AREA_ID, OverlapPolicy};
    use canvass_map_people::StaticPersonDirectory;

    use super::*;

    pub const ORG_ID: i64 = 1;
    pub const ASSIGNMENT_ID: &str = "ass-a";

    fn square(id: &str, min: f64, max: f64) -> Area {
        Area {
            id: id.to_string(),
            org_id: ORG_ID,
            title: Some(id.to_uppercase()),
            description: None,
            points: vec![[min, min], [min, max], [max, max], [max, min]],
        }
    }

    fn location(id: &str, lat: f64, lng: f64, timestamp: &str) -> Location {
        Location {
            id: id.to_string(),
            org_id: ORG_ID,
            title: None,
            description: None,
            position: LatLng::new(lat, lng),
            households: vec![Household {
                id: format!("{id}-hh"),
                floor: None,
                title: None,
                visits: vec![Visit {
                    id: format!("{id}-visit"),
                    assignment_id: ASSIGNMENT_ID.to_string(),
                    person_id: 10,
                    timestamp: timestamp.parse().unwrap(),
                    door_was_opened: true,
                    mission_accomplished: true,
                    responses: vec![MetricResponse {
                        metric_id: "done".to_string(),
                        response: "yes".to_string(),
                    }],
                    note_to_official: None,
                }],
            }],
        }
    }

    pub fn snapshot() -> CanvassSnapshot {
        CanvassSnapshot {
            areas: vec![square("x", 0.0, 10.0), square("y", 20.0, 30.0)],
            assignments: vec![Assignment {
                id: ASSIGNMENT_ID.to_string(),
                org_id: ORG_ID,
                campaign_id: 5,
                title: Some("Door to door".to_string()),
                instructions: String::new(),
                start_date: None,
                end_date: None,
                metrics: vec![Metric {
                    id: "done".to_string(),
                    question: "Done?".to_string(),
                    description: None,
                    kind: MetricKind::Boolean,
                    defines_done: true,
                }],
                reporting_level: ReportingLevel::Household,
                sessions: vec![
                    SessionRef {
                        person_id: 10,
                        area_id: "x".to_string(),
                    },
                    SessionRef {
                        person_id: 11,
                        area_id: "y".to_string(),
                    },
                    SessionRef {
                        person_id: 11,
                        area_id: "x".to_string(),
                    },
                    SessionRef {
                        person_id: 99,
                        area_id: "y".to_string(),
                    },
                    SessionRef {
                        person_id: 10,
                        area_id: "deleted".to_string(),
                    },
                ],
            }],
            locations: vec![
                location("in-x", 5.0, 5.0, "2024-05-01T10:00:00Z"),
                location("in-y", 25.0, 25.0, "2024-05-01T11:00:00Z"),
                location("outside", 50.0, 50.0, "2024-05-01T12:00:00Z"),
            ],
        }
    }

    pub fn people() -> StaticPersonDirectory {
        StaticPersonDirectory::new([10, 11].map(|id| Person {
            id,
            first_name: format!("Canvasser {id}"),
            last_name: String::new(),
        }))
    }

    fn now() -> DateTime<Utc> {
        "2024-06-01T00:00:00Z".parse().unwrap()
    }

    #[actix_web::test]
    async fn unresolved_sessions_are_skipped() {
        let store = MemoryStore::new(snapshot());
        let assignment = store.snapshot().assignments[0].clone();

        let sessions = resolve_sessions(&store, &people(), ORG_ID, &assignment)
            .await
            .unwrap();

        let pairs: Vec<(i64, &str)> = sessions
            .iter()
            .map(|s| (s.assignee.id, s.area.id.as_str()))
            .collect();
        assert_eq!(pairs, vec![(10, "x"), (11, "y"), (11, "x")]);
    }

    #[actix_web::test]
    async fn builds_graph_for_known_assignment() {
        let store = MemoryStore::new(snapshot());
        let aggregator = AreaVisitAggregator::new(OverlapPolicy::AllMatches);

        let graph = load_areas_graph(&store, &people(), &aggregator, ORG_ID, ASSIGNMENT_ID, now())
            .await
            .unwrap();

        let ids: Vec<&str> = graph.buckets.iter().map(|b| b.area.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", NO_AREA_ID]);
        assert_eq!(graph.range.start, "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(graph.range.end, "2024-05-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[actix_web::test]
    async fn unknown_or_foreign_assignment_is_not_found() {
        let store = MemoryStore::new(snapshot());
        let aggregator = AreaVisitAggregator::default();

        let missing = load_areas_graph(&store, &people(), &aggregator, ORG_ID, "nope", now()).await;
        assert!(matches!(missing, Err(GraphError::NotFound(id)) if id == "nope"));

        let foreign = load_areas_graph(&store, &people(), &aggregator, 2, ASSIGNMENT_ID, now()).await;
        assert!(matches!(foreign, Err(GraphError::NotFound(_))));
    }
}
