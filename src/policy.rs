use chrono::{DateTime, Utc};

use crate::models::Paste;

/// What an access request may do with a paste at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Alive,
    ExpiredByTime,
    ExpiredByViews,
}

/// Decide whether a paste may still be served at `current_time`.
///
/// An access exactly at `expires_at` is still valid. The view guard runs
/// against the stored count, before any increment, so the `max_views`-th
/// access passes and is the last one to do so.
pub fn evaluate(paste: &Paste, current_time: DateTime<Utc>) -> Access {
    if let Some(expires_at) = paste.expires_at {
        if current_time > expires_at {
            return Access::ExpiredByTime;
        }
    }

    if let Some(max_views) = paste.max_views {
        if paste.views >= max_views {
            return Access::ExpiredByViews;
        }
    }

    Access::Alive
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn paste(
        expires_at: Option<DateTime<Utc>>,
        max_views: Option<i64>,
        views: i64,
    ) -> Paste {
        Paste {
            id: "abcd1234".to_owned(),
            content: "hello".to_owned(),
            delete_key: "key".to_owned(),
            created_at: at(0),
            expires_at,
            max_views,
            views,
        }
    }

    #[test]
    fn unbounded_paste_is_alive() {
        assert_eq!(evaluate(&paste(None, None, 1_000_000), at(0)), Access::Alive);
    }

    #[test]
    fn access_exactly_at_expiry_is_valid() {
        let p = paste(Some(at(60)), None, 0);
        assert_eq!(evaluate(&p, at(60)), Access::Alive);
    }

    #[test]
    fn access_past_expiry_is_rejected() {
        let p = paste(Some(at(60)), None, 0);
        let just_after = at(60) + Duration::milliseconds(1);
        assert_eq!(evaluate(&p, just_after), Access::ExpiredByTime);
    }

    #[test]
    fn last_remaining_view_passes_the_guard() {
        let p = paste(None, Some(3), 2);
        assert_eq!(evaluate(&p, at(0)), Access::Alive);
    }

    #[test]
    fn exhausted_views_are_rejected() {
        let p = paste(None, Some(3), 3);
        assert_eq!(evaluate(&p, at(0)), Access::ExpiredByViews);
    }

    #[test]
    fn time_expiry_is_checked_before_views() {
        let p = paste(Some(at(60)), Some(3), 3);
        assert_eq!(evaluate(&p, at(120)), Access::ExpiredByTime);
    }
}
