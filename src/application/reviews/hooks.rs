//! Registered pre/post-processing callbacks invoked synchronously around
//! each write operation.
//!
//! An explicit, ordered list under a typed contract: a pre-write hook
//! receives the mapped patch and returns it (possibly mutated) or a typed
//! rejection; a response hook receives and returns the outgoing review.
//! Registration order is invocation order.

use crate::domain::review::entity::{CommentPatch, Review};
use crate::domain::review::errors::ReviewError;

type PreWriteHook = Box<dyn Fn(CommentPatch) -> Result<CommentPatch, ReviewError> + Send + Sync>;
type ResponseHook = Box<dyn Fn(Review) -> Review + Send + Sync>;

#[derive(Default)]
pub struct ReviewHooks {
    pre_write: Vec<PreWriteHook>,
    response: Vec<ResponseHook>,
}

impl ReviewHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pre_write<F>(&mut self, hook: F)
    where
        F: Fn(CommentPatch) -> Result<CommentPatch, ReviewError> + Send + Sync + 'static,
    {
        self.pre_write.push(Box::new(hook));
    }

    pub fn on_response<F>(&mut self, hook: F)
    where
        F: Fn(Review) -> Review + Send + Sync + 'static,
    {
        self.response.push(Box::new(hook));
    }

    /// Run every pre-write hook in order; the first rejection aborts.
    pub fn run_pre_write(&self, mut patch: CommentPatch) -> Result<CommentPatch, ReviewError> {
        for hook in &self.pre_write {
            patch = hook(patch)?;
        }
        Ok(patch)
    }

    pub fn run_response(&self, mut review: Review) -> Review {
        for hook in &self.response {
            review = hook(review);
        }
        review
    }
}
