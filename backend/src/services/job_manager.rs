use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::models::jobs::{Job, JobKind};

pub struct JobManager {
    jobs: DashMap<String, Arc<Job>>,
    idempotency_keys: DashMap<String, (String, chrono::DateTime<chrono::Utc>)>,
    idempotency_ttl_secs: u64,
}

impl JobManager {
    pub fn new(idempotency_ttl_secs: u64) -> Self {
        Self {
            jobs: DashMap::new(),
            idempotency_keys: DashMap::new(),
            idempotency_ttl_secs,
        }
    }

    /// Job already registered under a live idempotency key, if any.
    pub fn job_for_key(&self, key: &str) -> Option<String> {
        let entry = self.idempotency_keys.get(key)?;
        let (job_id, expires) = entry.value();
        (*expires > Utc::now() && self.jobs.contains_key(job_id)).then(|| job_id.clone())
    }

    /// Returns `(job_id, job, created)`; `created` is false when an idempotency
    /// key hit an existing job. The key's shard stays locked from lookup to
    /// insert, so concurrent retries converge on one job.
    pub fn create_job(
        &self,
        kind: JobKind,
        idempotency_key: Option<&str>,
    ) -> (String, Arc<Job>, bool) {
        let Some(key) = idempotency_key else {
            let (job_id, job) = self.register(kind);
            return (job_id, job, true);
        };

        let now = Utc::now();
        let expires = now + Duration::seconds(self.idempotency_ttl_secs as i64);
        match self.idempotency_keys.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let (existing_id, existing_expiry) = entry.get().clone();
                if existing_expiry > now {
                    if let Some(job) = self.get_job(&existing_id) {
                        debug!(job_id = %existing_id, "Idempotency key matched existing job");
                        return (existing_id, job, false);
                    }
                }
                let (job_id, job) = self.register(kind);
                entry.insert((job_id.clone(), expires));
                (job_id, job, true)
            }
            Entry::Vacant(entry) => {
                let (job_id, job) = self.register(kind);
                entry.insert((job_id.clone(), expires));
                (job_id, job, true)
            }
        }
    }

    fn register(&self, kind: JobKind) -> (String, Arc<Job>) {
        let (job_id, job) = Job::new(kind);
        self.jobs.insert(job_id.clone(), job.clone());
        (job_id, job)
    }

    pub fn get_job(&self, job_id: &str) -> Option<Arc<Job>> {
        self.jobs.get(job_id).map(|j| j.value().clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn cleanup_old_jobs(&self) {
        let cutoff = Utc::now() - Duration::hours(1);
        self.jobs.retain(|_, job| {
            let info = job.get_info();
            match chrono::DateTime::parse_from_rfc3339(&info.created_at) {
                Ok(created) => created >= cutoff,
                Err(_) => false,
            }
        });

        let now = Utc::now();
        self.idempotency_keys.retain(|_, (_, expires)| *expires >= now);
    }
}
