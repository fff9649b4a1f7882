use std::fmt;
use std::marker::PhantomData;

use slurm_types::{
    Job, JobAllocateResponse, JobAllocation, JobEvent, JobFilter, JobSubmission,
    JobSubmitResponse, JobUpdate, JobWatchOptions, Page, apply_filter,
};
use slurm_wire::WireRequest;
use slurm_wire::schema::v0_0_42::JobAllocResponse;
use tokio::sync::mpsc;
use tracing::info;

use super::ManagerBase;
use crate::capability::Operation;
use crate::context::RequestContext;
use crate::error::{SlurmError, SlurmResult};
use crate::mapper::{Dialect, controller};
use crate::operations::{JobOperations, OpFuture};
use crate::request::Requester;
use crate::watch::{JobTracker, spawn_watch, validate_interval};

/// Requeue flag understood by every supported version.
const REQUEUE_FLAG: &str = "FEDERATION_REQUEUE";

/// Jobs, spoken in dialect `D`.
pub struct JobManager<D> {
    base: ManagerBase,
    dialect: PhantomData<fn() -> D>,
}

impl<D> Clone for JobManager<D> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            dialect: PhantomData,
        }
    }
}

impl<D> fmt::Debug for JobManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobManager").field("base", &self.base).finish()
    }
}

impl<D: Dialect> JobManager<D> {
    /// Create a manager.
    #[must_use]
    pub fn new(base: ManagerBase) -> Self {
        Self {
            base,
            dialect: PhantomData,
        }
    }

    fn job_path(&self, job_id: u32) -> String {
        self.base.requester().slurm(&["job", &job_id.to_string()])
    }
}

async fn fetch_jobs<D: Dialect>(
    requester: &Requester,
    ctx: &RequestContext,
) -> SlurmResult<Vec<Job>> {
    let mut envelope = requester
        .send(ctx, WireRequest::get(requester.slurm(&["jobs"])))
        .await?;
    Ok(requester.items(&mut envelope, "jobs", D::job))
}

impl<D: Dialect> JobOperations for JobManager<D> {
    fn list<'a>(
        &'a self,
        ctx: &'a RequestContext,
        filter: Option<&'a JobFilter>,
    ) -> OpFuture<'a, Page<Job>> {
        Box::pin(self.base.guarded(Operation::JobList, async move {
            let jobs = fetch_jobs::<D>(self.base.requester(), ctx).await?;
            Ok(apply_filter(jobs, filter))
        }))
    }

    fn get<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, Job> {
        Box::pin(self.base.guarded(Operation::JobGet, async move {
            let requester = self.base.requester();
            let mut envelope = requester
                .send(ctx, WireRequest::get(self.job_path(job_id)))
                .await?;
            requester.one(&mut envelope, "jobs", &format!("job {job_id}"), D::job)
        }))
    }

    fn submit<'a>(
        &'a self,
        ctx: &'a RequestContext,
        submission: &'a JobSubmission,
    ) -> OpFuture<'a, JobSubmitResponse> {
        Box::pin(self.base.guarded(Operation::JobSubmit, async move {
            submission.validate()?;
            let requester = self.base.requester();
            let request =
                WireRequest::post(requester.slurm(&["job", "submit"]), D::submit_body(submission)?);
            let envelope = requester.send(ctx, request).await?;

            let wire: D::Submitted = envelope.payload_as().map_err(|err| {
                SlurmError::malformed("undecodable submit response").with_source(err)
            })?;
            let mut response = D::submitted(wire)?;
            response.warnings = envelope.warning_texts();

            info!(
                version = %D::VERSION,
                job_id = response.job_id,
                warnings = response.warnings.len(),
                "Job submitted"
            );
            Ok(response)
        }))
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        update: &'a JobUpdate,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobUpdate, async move {
            if update.is_empty() {
                return Err(SlurmError::validation("job update changes nothing"));
            }
            let request = WireRequest::post(self.job_path(job_id), D::update_body(update)?);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, "Job updated");
            Ok(())
        }))
    }

    fn cancel<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobCancel, async move {
            self.base
                .requester()
                .execute(ctx, WireRequest::delete(self.job_path(job_id)))
                .await?;
            info!(version = %D::VERSION, job_id, "Job cancelled");
            Ok(())
        }))
    }

    fn signal<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        signal: &'a str,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobSignal, async move {
            let signal = super::identifier("signal", signal)?;
            let request = WireRequest::delete(self.job_path(job_id)).with_query("signal", signal);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, signal, "Job signalled");
            Ok(())
        }))
    }

    fn hold<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobHold, async move {
            let request = WireRequest::post(self.job_path(job_id), D::hold_body(true)?);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, "Job held");
            Ok(())
        }))
    }

    fn release<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobRelease, async move {
            let request = WireRequest::post(self.job_path(job_id), D::hold_body(false)?);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, "Job released");
            Ok(())
        }))
    }

    fn requeue<'a>(&'a self, ctx: &'a RequestContext, job_id: u32) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobRequeue, async move {
            let request =
                WireRequest::delete(self.job_path(job_id)).with_query("flags", REQUEUE_FLAG);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, "Job requeued");
            Ok(())
        }))
    }

    fn watch<'a>(
        &'a self,
        ctx: &'a RequestContext,
        options: JobWatchOptions,
    ) -> OpFuture<'a, mpsc::Receiver<JobEvent>> {
        Box::pin(self.base.guarded(Operation::JobWatch, async move {
            validate_interval(options.poll_interval)?;
            let requester = self.base.requester().clone();
            Ok(spawn_watch(
                ctx,
                "jobs",
                options.poll_interval,
                options.buffer,
                JobTracker::new(&options),
                move |ctx| {
                    let requester = requester.clone();
                    async move { fetch_jobs::<D>(&requester, &ctx).await }
                },
            ))
        }))
    }

    fn allocate<'a>(
        &'a self,
        ctx: &'a RequestContext,
        allocation: &'a JobAllocation,
    ) -> OpFuture<'a, JobAllocateResponse> {
        Box::pin(self.base.guarded(Operation::JobAllocate, async move {
            allocation.validate()?;
            let requester = self.base.requester();
            let request = WireRequest::post(
                requester.slurm(&["job", "allocate"]),
                D::allocate_body(allocation)?,
            );
            let envelope = requester.send(ctx, request).await?;

            // Same payload shape in every version that allocates.
            let wire: JobAllocResponse = envelope.payload_as().map_err(|err| {
                SlurmError::malformed("undecodable allocate response").with_source(err)
            })?;
            let mut response = controller::allocated(wire.job_id, wire.job_submit_user_msg)?;
            response.warnings = envelope.warning_texts();

            info!(version = %D::VERSION, job_id = response.job_id, "Job allocated");
            Ok(response)
        }))
    }

    fn notify<'a>(
        &'a self,
        ctx: &'a RequestContext,
        job_id: u32,
        message: &'a str,
    ) -> OpFuture<'a, ()> {
        Box::pin(self.base.guarded(Operation::JobNotify, async move {
            let message = super::identifier("message", message)?;
            let update = JobUpdate {
                comment: Some(message.to_string()),
                ..JobUpdate::default()
            };
            let request = WireRequest::post(self.job_path(job_id), D::update_body(&update)?);
            self.base.requester().execute(ctx, request).await?;
            info!(version = %D::VERSION, job_id, "Job notified");
            Ok(())
        }))
    }
}
