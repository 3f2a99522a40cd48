//! Tests for `context`: claims, settling, abandonment and the step log.

use std::rc::Rc;

use serde_json::json;

use crate::context::{Claim, ResolutionContext};
use crate::error::ResolveError;
use crate::types::{NodeId, StepStatus};

fn id(s: &str) -> NodeId {
  s.into()
}

#[test]
fn first_claim_owns_then_others_wait() {
  let ctx = ResolutionContext::new(0);
  assert!(matches!(ctx.claim(&id("a")), Claim::Owner));
  let Claim::Wait(mut rx) = ctx.claim(&id("a")) else {
    panic!("second claim should wait");
  };
  assert!(matches!(rx.try_recv(), Ok(None)));

  let values: Rc<[serde_json::Value]> = vec![json!(1)].into();
  ctx.settle(&id("a"), Ok(Rc::clone(&values)));
  assert_eq!(rx.try_recv().unwrap(), Some(Ok(values.clone())));
  assert!(matches!(ctx.claim(&id("a")), Claim::Settled(Ok(v)) if v == values));
}

#[test]
fn settled_failures_are_shared() {
  let ctx = ResolutionContext::new(0);
  assert!(matches!(ctx.claim(&id("a")), Claim::Owner));
  ctx.settle(&id("a"), Err(ResolveError::Cancelled));
  assert!(matches!(
    ctx.claim(&id("a")),
    Claim::Settled(Err(ResolveError::Cancelled))
  ));
}

#[test]
fn abandoned_claim_closes_waiters_and_frees_the_node() {
  let ctx = ResolutionContext::new(0);
  assert!(matches!(ctx.claim(&id("a")), Claim::Owner));
  let Claim::Wait(mut rx) = ctx.claim(&id("a")) else {
    panic!("second claim should wait");
  };
  ctx.abandon(&id("a"));
  assert!(rx.try_recv().is_err());
  assert!(matches!(ctx.claim(&id("a")), Claim::Owner));
}

#[test]
fn abandon_leaves_settled_entries_alone() {
  let ctx = ResolutionContext::new(0);
  assert!(matches!(ctx.claim(&id("a")), Claim::Owner));
  ctx.settle(&id("a"), Ok(Rc::from(Vec::<serde_json::Value>::new())));
  ctx.abandon(&id("a"));
  assert!(matches!(ctx.claim(&id("a")), Claim::Settled(Ok(_))));
}

#[test]
fn steps_are_numbered_and_counted() {
  let ctx = ResolutionContext::new(7);
  ctx.record(&id("a"), StepStatus::Computed, None);
  ctx.record(&id("b"), StepStatus::Cached, None);
  ctx.record(&id("a"), StepStatus::Discarded, Some("cancelled".to_string()));
  ctx.record(&id("c"), StepStatus::Skipped, None);

  assert_eq!(ctx.executions("a"), 2);
  assert_eq!(ctx.executions("b"), 0);
  assert_eq!(ctx.executions("c"), 0);

  let log = ctx.execution_log();
  assert_eq!(log.context_id, ctx.id());
  assert_eq!(log.epoch, 7);
  let steps: Vec<u64> = log.steps.iter().map(|s| s.step).collect();
  assert_eq!(steps, vec![1, 2, 3, 4]);
  assert_eq!(log.steps[2].message.as_deref(), Some("cancelled"));
}

#[test]
fn cancellation_is_shared_through_the_token() {
  let ctx = ResolutionContext::new(0);
  let token = ctx.cancellation_token();
  assert!(!ctx.is_cancelled());
  token.cancel();
  assert!(ctx.is_cancelled());
}

#[test]
fn contexts_get_distinct_ids() {
  assert_ne!(ResolutionContext::new(0).id(), ResolutionContext::new(0).id());
}
