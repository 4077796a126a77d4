use std::collections::HashSet;

use crate::models::Event;

#[derive(Debug, Clone)]
pub struct EventWithTags {
    pub event: Event,
    pub tags: Vec<String>,
}

fn score(tags: &[String], interests: &HashSet<String>) -> usize {
    tags.iter().filter(|tag| interests.contains(*tag)).count()
}

/// Orders candidates by how many tags they share with the user's interest
/// set; equal scores order by earlier start time. Pure and deterministic.
pub fn rank(mut events: Vec<EventWithTags>, interests: &HashSet<String>) -> Vec<EventWithTags> {
    events.sort_by(|a, b| {
        score(&b.tags, interests)
            .cmp(&score(&a.tags, interests))
            .then(a.event.dt.cmp(&b.event.dt))
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn event(hours_from_now: i64) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "event".to_string(),
            descr: String::new(),
            dt: Utc::now() + Duration::hours(hours_from_now),
            place: None,
            address: None,
            max_attendees: None,
            number_of_attendees: 0,
            status: EventStatus::Active,
            creator: Uuid::new_v4(),
            created_at: Utc::now()
        }
    }

    fn candidate(hours_from_now: i64, tags: &[&str]) -> EventWithTags {
        EventWithTags {
            event: event(hours_from_now),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn interests(tags: &[&str]) -> HashSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn more_shared_tags_rank_higher() {
        let ranked = rank(
            vec![
                candidate(1, &["music"]),
                candidate(2, &["music", "food"]),
            ],
            &interests(&["music", "food"]),
        );
        assert_eq!(ranked[0].tags.len(), 2);
        assert_eq!(ranked[1].tags.len(), 1);
    }

    #[test]
    fn equal_scores_order_by_earliest_start() {
        let ranked = rank(
            vec![
                candidate(48, &["music"]),
                candidate(2, &["music"]),
            ],
            &interests(&["music"]),
        );
        assert!(ranked[0].event.dt < ranked[1].event.dt);
    }

    #[test]
    fn ranking_is_deterministic() {
        let input = vec![
            candidate(10, &["a", "b"]),
            candidate(5, &["a"]),
            candidate(1, &[]),
        ];
        let wanted = interests(&["a", "b"]);
        let first: Vec<Uuid> = rank(input.clone(), &wanted).iter().map(|e| e.event.id).collect();
        let second: Vec<Uuid> = rank(input, &wanted).iter().map(|e| e.event.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unrelated_tags_do_not_score() {
        let ranked = rank(
            vec![
                candidate(1, &["knitting"]),
                candidate(2, &["music"]),
            ],
            &interests(&["music"]),
        );
        assert_eq!(ranked[0].tags, vec!["music".to_string()]);
    }
}
