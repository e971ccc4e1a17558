//! Display order for eligible recipients.

use std::cmp::{Ordering, Reverse};

use crate::domain::{ServiceName, ServiceStatus, User};

/// An eligible recipient with the services it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub recipient: User,
    pub matched_services: Vec<ServiceName>,
}

impl RankedCandidate {
    fn needs_general_check(&self) -> bool {
        self.recipient.service_status(&ServiceName::general_check())
            == Some(ServiceStatus::NeedAssistance)
    }
}

fn compare(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    Reverse(a.needs_general_check())
        .cmp(&Reverse(b.needs_general_check()))
        .then_with(|| a.recipient.last_ok().cmp(&b.recipient.last_ok()))
        .then_with(|| {
            Reverse(a.matched_services.len()).cmp(&Reverse(b.matched_services.len()))
        })
}

/// Order candidates for display.
///
/// Recipients whose general check is needed come first, then the longest
/// unconfirmed, then those sharing more services with the volunteer. The
/// sort is stable, so input order breaks remaining ties and re-ranking an
/// already ranked list leaves it unchanged.
pub fn rank(mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    candidates.sort_by(compare);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GENERAL_CHECK;
    use crate::test_support::users::UserBuilder;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn candidate(
        name: &str,
        general_check: ServiceStatus,
        last_ok: DateTime<Utc>,
        matched: usize,
    ) -> RankedCandidate {
        let recipient = UserBuilder::recipient()
            .first_name(name)
            .service(GENERAL_CHECK, general_check)
            .last_ok(last_ok)
            .build();
        let matched_services = (0..matched)
            .map(|i| ServiceName::new(format!("Service {i}")).expect("valid name"))
            .collect();
        RankedCandidate {
            recipient,
            matched_services,
        }
    }

    fn names(ranked: &[RankedCandidate]) -> Vec<&str> {
        ranked
            .iter()
            .map(|c| c.recipient.contact().first_name.as_str())
            .collect()
    }

    #[rstest]
    fn general_check_need_comes_first(now: DateTime<Utc>) {
        let ranked = rank(vec![
            candidate("older", ServiceStatus::DoNotNeedAssistance, now - Duration::days(3), 1),
            candidate("check", ServiceStatus::NeedAssistance, now, 1),
        ]);
        assert_eq!(names(&ranked), vec!["check", "older"]);
    }

    #[rstest]
    fn longest_unconfirmed_first_within_partition(now: DateTime<Utc>) {
        let ranked = rank(vec![
            candidate("recent", ServiceStatus::NeedAssistance, now - Duration::hours(1), 1),
            candidate("oldest", ServiceStatus::NeedAssistance, now - Duration::days(2), 1),
            candidate("middle", ServiceStatus::NeedAssistance, now - Duration::days(1), 1),
        ]);
        assert_eq!(names(&ranked), vec!["oldest", "middle", "recent"]);
    }

    #[rstest]
    fn more_shared_services_break_ties(now: DateTime<Utc>) {
        let ranked = rank(vec![
            candidate("one", ServiceStatus::DoNotNeedAssistance, now, 1),
            candidate("three", ServiceStatus::DoNotNeedAssistance, now, 3),
        ]);
        assert_eq!(names(&ranked), vec!["three", "one"]);
    }

    #[rstest]
    fn equal_keys_keep_input_order_and_rerank_is_stable(now: DateTime<Utc>) {
        let input = vec![
            candidate("b", ServiceStatus::DoNotNeedAssistance, now, 1),
            candidate("a", ServiceStatus::DoNotNeedAssistance, now, 1),
            candidate("c", ServiceStatus::NeedAssistance, now, 1),
        ];
        let once = rank(input);
        assert_eq!(names(&once), vec!["c", "b", "a"]);
        let twice = rank(once.clone());
        assert_eq!(twice, once);
    }
}
