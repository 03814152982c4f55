//! Fixed-window rate limiting
//!
//! Calendar-aligned windows keyed by subject: bucket index =
//! floor(unix_seconds / window). O(1) memory and decision cost per
//! subject; a burst of up to 2x quota can be admitted straddling a window
//! edge, which is accepted for an abuse-prevention limiter. Expired
//! buckets are lazily replaced on access, never consulted for decisions.
//!
//! Buckets are sharded by subject hash so unrelated subjects never
//! contend on the same lock; the critical section is one bucket
//! read-modify-write.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

const SHARD_COUNT: usize = 16;

/// Result of a rate-limit check
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    /// Whether the call is admitted
    pub allowed: bool,

    /// When the subject's current window resets
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Bucket {
    window: i64,
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Per-subject fixed-window request counter
pub struct RateLimiter {
    quota: u32,
    window_secs: i64,
    shards: Vec<Mutex<HashMap<String, Bucket>>>,
}

impl RateLimiter {
    /// Create a limiter. `window_secs` of zero is clamped to one second.
    pub fn new(quota: u32, window_secs: u64) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            quota,
            window_secs: (window_secs.max(1)) as i64,
            shards,
        }
    }

    /// Check the subject's quota and consume one slot if admitted.
    /// Atomic per key: concurrent callers for one subject observe a
    /// serialized sequence of increments.
    pub fn check_and_consume(&self, subject: &str, now: DateTime<Utc>) -> RateDecision {
        let window = now.timestamp().div_euclid(self.window_secs);
        let reset_at = self.window_end(window);

        // A zero quota admits nothing; never create a bucket for it, or
        // the fresh-bucket arm would hand out one free call per window.
        if self.quota == 0 {
            return RateDecision {
                allowed: false,
                reset_at,
            };
        }

        let mut shard = match self.shards[self.shard_for(subject)].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match shard.get_mut(subject) {
            Some(bucket) if bucket.window == window => {
                if bucket.count < self.quota {
                    bucket.count += 1;
                    RateDecision {
                        allowed: true,
                        reset_at: bucket.reset_at,
                    }
                } else {
                    RateDecision {
                        allowed: false,
                        reset_at: bucket.reset_at,
                    }
                }
            }
            // Missing or expired bucket: start a fresh window
            _ => {
                shard.insert(
                    subject.to_string(),
                    Bucket {
                        window,
                        count: 1,
                        reset_at,
                    },
                );
                RateDecision {
                    allowed: true,
                    reset_at,
                }
            }
        }
    }

    fn window_end(&self, window: i64) -> DateTime<Utc> {
        let secs = (window + 1) * self.window_secs;
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    fn shard_for(&self, subject: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        subject.hash(&mut hasher);
        (hasher.finish() as usize) % SHARD_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_quota_admissions_then_rejection() {
        let limiter = RateLimiter::new(3, 3600);
        let now = at(10_000);
        for _ in 0..3 {
            assert!(limiter.check_and_consume("alice", now).allowed);
        }
        let decision = limiter.check_and_consume("alice", now);
        assert!(!decision.allowed);
    }

    #[test]
    fn test_zero_quota_rejects_every_call() {
        let limiter = RateLimiter::new(0, 3600);
        let now = at(10_000);
        assert!(!limiter.check_and_consume("alice", now).allowed);
        // Still rejected in a later window; no bucket ever grants a slot.
        let decision = limiter.check_and_consume("alice", now + Duration::seconds(7200));
        assert!(!decision.allowed);
        assert_eq!(decision.reset_at, at(18_000));
    }

    #[test]
    fn test_new_window_admits_again() {
        let limiter = RateLimiter::new(1, 3600);
        let now = at(10_000);
        assert!(limiter.check_and_consume("alice", now).allowed);
        assert!(!limiter.check_and_consume("alice", now).allowed);

        let later = now + Duration::seconds(3600);
        assert!(limiter.check_and_consume("alice", later).allowed);
    }

    #[test]
    fn test_reset_at_is_window_end() {
        let limiter = RateLimiter::new(5, 3600);
        let now = at(7_300); // window 2 of 3600s windows
        let decision = limiter.check_and_consume("alice", now);
        assert_eq!(decision.reset_at, at(10_800));
    }

    #[test]
    fn test_rejection_keeps_existing_reset_at() {
        let limiter = RateLimiter::new(1, 3600);
        let now = at(7_300);
        let first = limiter.check_and_consume("alice", now);
        let rejected = limiter.check_and_consume("alice", now + Duration::seconds(5));
        assert!(!rejected.allowed);
        assert_eq!(rejected.reset_at, first.reset_at);
    }

    #[test]
    fn test_subjects_are_independent() {
        let limiter = RateLimiter::new(1, 3600);
        let now = at(10_000);
        assert!(limiter.check_and_consume("alice", now).allowed);
        assert!(limiter.check_and_consume("bob", now).allowed);
        assert!(!limiter.check_and_consume("alice", now).allowed);
    }

    #[test]
    fn test_boundary_burst_documented_behavior() {
        // quota per window on each side of the boundary; 2x quota total
        // admitted across the edge is accepted fixed-window behavior.
        let limiter = RateLimiter::new(2, 3600);
        let end_of_window = at(3_599);
        let start_of_next = at(3_600);
        assert!(limiter.check_and_consume("alice", end_of_window).allowed);
        assert!(limiter.check_and_consume("alice", end_of_window).allowed);
        assert!(limiter.check_and_consume("alice", start_of_next).allowed);
        assert!(limiter.check_and_consume("alice", start_of_next).allowed);
    }

    #[test]
    fn test_concurrent_same_subject_no_double_admission() {
        use std::sync::Arc;
        use std::thread;

        let limiter = Arc::new(RateLimiter::new(50, 3600));
        let now = at(10_000);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(thread::spawn(move || {
                let mut admitted = 0u32;
                for _ in 0..25 {
                    if limiter.check_and_consume("shared", now).allowed {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }
        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 50);
    }
}
